//! Pointer events and input-modality filtering.
//!
//! Hover is meaningless for touch input (a finger cannot rest over an element
//! without pressing it), so enter/leave events from touch pointers are dropped
//! before they reach the gesture detector. Press and move events are accepted
//! from every device.

use serde::{Deserialize, Serialize};

/// Device that produced a pointer event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerType {
    Mouse,
    Touch,
    Pen,
    /// Reported by the host but not recognised. Treated like a mouse.
    Unknown(String),
}

impl PointerType {
    /// Parse a host pointer type string (`"mouse"`, `"touch"`, `"pen"`).
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mouse" => Self::Mouse,
            "touch" => Self::Touch,
            "pen" => Self::Pen,
            _ => Self::Unknown(name.to_string()),
        }
    }

    /// Resolve an optional pointer type. A missing type counts as a mouse.
    pub fn effective(pointer_type: Option<&PointerType>) -> PointerType {
        pointer_type.cloned().unwrap_or(Self::Mouse)
    }

    pub fn is_touch(&self) -> bool {
        matches!(self, Self::Touch)
    }
}

/// Low-level pointer event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEventKind {
    Enter,
    Leave,
    Down,
    Up,
    Move,
    Cancel,
}

impl PointerEventKind {
    /// Whether this event only matters for hover.
    pub const fn is_hover(self) -> bool {
        matches!(self, Self::Enter | Self::Leave)
    }
}

/// A raw pointer event targeted at one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    #[serde(default)]
    pub pointer_type: Option<PointerType>,
    /// Pointer position in host coordinates.
    #[serde(default)]
    pub position: [f64; 2],
}

impl PointerEvent {
    pub fn new(kind: PointerEventKind) -> Self {
        Self {
            kind,
            pointer_type: None,
            position: [0.0, 0.0],
        }
    }

    pub fn enter() -> Self {
        Self::new(PointerEventKind::Enter)
    }

    pub fn leave() -> Self {
        Self::new(PointerEventKind::Leave)
    }

    pub fn down() -> Self {
        Self::new(PointerEventKind::Down)
    }

    pub fn up() -> Self {
        Self::new(PointerEventKind::Up)
    }

    pub fn cancel() -> Self {
        Self::new(PointerEventKind::Cancel)
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerEventKind::Move).at(x, y)
    }

    pub fn with_pointer_type(mut self, pointer_type: PointerType) -> Self {
        self.pointer_type = Some(pointer_type);
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = [x, y];
        self
    }

    /// Device that produced the event, with the permissive default applied.
    pub fn effective_pointer_type(&self) -> PointerType {
        PointerType::effective(self.pointer_type.as_ref())
    }
}

/// Whether an event should reach the gesture detector.
pub fn accepts(event: &PointerEvent) -> bool {
    !(event.kind.is_hover() && event.effective_pointer_type().is_touch())
}
