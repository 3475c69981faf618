//! Core motion types and data structures.
//!
//! This module defines the fundamental types shared by every stage of the
//! engine:
//! - `NodeId`: Generational handle for a component node
//! - `GestureKind` / `Owner`: Interaction states and their fixed priority
//! - `AnimatableProperty` / `AnimatableValue`: What is animated, and to what
//! - `AnimationId` / `AnimationState`: Animation task bookkeeping

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifier for a node in the motion tree (generational).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.0, self.1)
    }
}

/// Unique identifier for an animation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl AnimationId {
    /// Generate a new unique animation ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Current state of an animation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationState {
    /// Task has been created but is still waiting out its delay.
    #[default]
    Pending,
    /// Task is actively writing its value store.
    Running,
    /// Task reached its target.
    Finished,
    /// Task was pre-empted before reaching its target.
    Cancelled,
}

/// A class of interaction that can own animatable properties.
///
/// Variants are declared in priority order, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    /// Pointer drag on a draggable node.
    Drag,
    /// Pointer pressed on the node.
    Tap,
    /// Non-touch pointer over the node.
    Hover,
    /// Node holds keyboard focus.
    Focus,
}

impl GestureKind {
    /// Number of gesture kinds.
    pub const COUNT: usize = 4;

    /// Global priority order, highest first. `Owner::Base` ranks below all of them.
    pub const PRIORITY: [Self; Self::COUNT] = [Self::Drag, Self::Tap, Self::Hover, Self::Focus];

    /// Position in [`GestureKind::PRIORITY`]; lower is stronger.
    pub const fn index(self) -> usize {
        match self {
            Self::Drag => 0,
            Self::Tap => 1,
            Self::Hover => 2,
            Self::Focus => 3,
        }
    }

    /// Lower-case name, matching the `while<Gesture>` binding it feeds.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Drag => "drag",
            Self::Tap => "tap",
            Self::Hover => "hover",
            Self::Focus => "focus",
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which interaction state controls a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "gesture", rename_all = "snake_case")]
pub enum Owner {
    /// The node's base render values (or its `animate` layer).
    Base,
    /// An active gesture layer.
    Gesture(GestureKind),
}

impl Owner {
    /// Rank in the total ownership order; higher wins.
    pub const fn priority(self) -> usize {
        match self {
            Self::Base => 0,
            Self::Gesture(kind) => GestureKind::COUNT - kind.index(),
        }
    }

    /// The gesture behind this owner, if any.
    pub const fn gesture(self) -> Option<GestureKind> {
        match self {
            Self::Base => None,
            Self::Gesture(kind) => Some(kind),
        }
    }
}

impl From<GestureKind> for Owner {
    fn from(kind: GestureKind) -> Self {
        Self::Gesture(kind)
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Base => f.write_str("base"),
            Self::Gesture(kind) => write!(f, "while-{kind}"),
        }
    }
}

/// Enum representing all animatable value types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimatableValue {
    /// Numeric value (opacity, scale, width, custom attributes, etc.)
    F64 { value: f64 },
    /// RGBA color value.
    Color { rgba: [f32; 4] },
}

impl AnimatableValue {
    /// Try to extract an f64 value.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64 { value } => Some(*value),
            _ => None,
        }
    }

    /// Try to extract a color value.
    pub fn as_color(&self) -> Option<[f32; 4]> {
        match self {
            Self::Color { rgba } => Some(*rgba),
            _ => None,
        }
    }
}

impl From<f64> for AnimatableValue {
    fn from(v: f64) -> Self {
        Self::F64 { value: v }
    }
}

impl From<[f32; 4]> for AnimatableValue {
    fn from(c: [f32; 4]) -> Self {
        Self::Color { rgba: c }
    }
}

/// Properties a node can animate.
///
/// Host-specific attributes that have no built-in variant use
/// [`AnimatableProperty::Custom`], usually together with a transform mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimatableProperty {
    // Visual
    Opacity,
    BackgroundColor,
    Color,
    BorderColor,
    BorderRadius,

    // Transform
    X,
    Y,
    Scale,
    ScaleX,
    ScaleY,
    Rotate,

    // Geometry
    Width,
    Height,

    /// Any other host attribute, by name.
    Custom(String),
}

impl AnimatableProperty {
    /// Shorthand for a custom attribute.
    pub fn custom(name: impl Into<String>) -> Self {
        Self::Custom(name.into())
    }

    /// Value a freshly created store starts from when the node never declared one.
    ///
    /// Returns `None` for properties whose resting value depends on the host.
    pub fn default_value(&self) -> Option<AnimatableValue> {
        match self {
            Self::Opacity | Self::Scale | Self::ScaleX | Self::ScaleY => Some(1.0.into()),
            Self::X | Self::Y | Self::Rotate | Self::BorderRadius => Some(0.0.into()),
            Self::BackgroundColor | Self::BorderColor => Some([0.0, 0.0, 0.0, 0.0].into()),
            Self::Color | Self::Width | Self::Height | Self::Custom(_) => None,
        }
    }
}

impl fmt::Display for AnimatableProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(name) => f.write_str(name),
            other => write!(f, "{other:?}"),
        }
    }
}
