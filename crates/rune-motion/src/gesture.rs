//! Gesture detection: filtered pointer and focus input to start/end signals.
//!
//! Each node owns a [`GestureDetector`]. It keeps the node's [`GestureSet`]
//! and reports a [`GestureTransition`] only when a kind actually flips, so
//! repeated raw events (two enters in a row, a stray up) never produce
//! duplicate signals.
//!
//! Drag is a two-step gesture: pointer down arms it at the pointer position,
//! and the first move that travels at least the threshold distance starts it.

use super::modality::{PointerEvent, PointerEventKind};
use super::types::GestureKind;

/// Active/inactive flag per gesture kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GestureSet([bool; GestureKind::COUNT]);

impl GestureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, kind: GestureKind) -> bool {
        self.0[kind.index()]
    }

    /// Set a kind's flag. Returns whether it changed.
    pub fn set(&mut self, kind: GestureKind, active: bool) -> bool {
        let slot = &mut self.0[kind.index()];
        let changed = *slot != active;
        *slot = active;
        changed
    }

    /// Active kinds, highest priority first.
    pub fn iter(&self) -> impl Iterator<Item = GestureKind> + '_ {
        GestureKind::PRIORITY
            .into_iter()
            .filter(|kind| self.is_active(*kind))
    }

    pub fn is_empty(&self) -> bool {
        !self.0.iter().any(|a| *a)
    }
}

/// A gesture kind flipping on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureTransition {
    pub kind: GestureKind,
    pub started: bool,
}

/// Per-node gesture state machine.
#[derive(Debug, Clone, Default)]
pub struct GestureDetector {
    active: GestureSet,
    draggable: bool,
    drag_origin: Option<[f64; 2]>,
}

impl GestureDetector {
    pub fn new(draggable: bool) -> Self {
        Self {
            draggable,
            ..Self::default()
        }
    }

    /// Current active set.
    pub fn active(&self) -> GestureSet {
        self.active
    }

    /// Whether a drag is armed (pointer down on a draggable node).
    pub fn is_drag_armed(&self) -> bool {
        self.drag_origin.is_some()
    }

    /// Force a kind on or off. Returns the transition if the flag flipped.
    pub fn set(&mut self, kind: GestureKind, active: bool) -> Option<GestureTransition> {
        if kind == GestureKind::Drag && !active {
            self.drag_origin = None;
        }
        self.active
            .set(kind, active)
            .then_some(GestureTransition { kind, started: active })
    }

    /// Focus gained or lost.
    pub fn focus(&mut self, focused: bool) -> Option<GestureTransition> {
        self.set(GestureKind::Focus, focused)
    }

    /// Feed a pointer event that already passed the modality filter.
    pub fn pointer(&mut self, event: &PointerEvent, drag_threshold: f64) -> Vec<GestureTransition> {
        let mut out = Vec::new();
        match event.kind {
            PointerEventKind::Enter => out.extend(self.set(GestureKind::Hover, true)),
            PointerEventKind::Leave => out.extend(self.set(GestureKind::Hover, false)),
            PointerEventKind::Down => {
                if self.draggable {
                    self.drag_origin = Some(event.position);
                }
                out.extend(self.set(GestureKind::Tap, true));
            }
            PointerEventKind::Move => {
                if let Some([ox, oy]) = self.drag_origin {
                    let [x, y] = event.position;
                    let distance = (x - ox).hypot(y - oy);
                    if distance >= drag_threshold {
                        out.extend(self.set(GestureKind::Drag, true));
                    }
                }
            }
            PointerEventKind::Up | PointerEventKind::Cancel => {
                out.extend(self.set(GestureKind::Drag, false));
                out.extend(self.set(GestureKind::Tap, false));
            }
        }
        out
    }
}
