//! Error types for the motion engine.

use thiserror::Error;

use super::types::{AnimatableProperty, NodeId};

/// Result type for motion engine operations.
pub type Result<T> = std::result::Result<T, MotionError>;

/// Structural misuse of the engine.
///
/// Gesture and animation processing never fail; only tree and declaration
/// mistakes surface here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// The node was removed, or the id never belonged to this engine.
    #[error("node {0} is not alive")]
    StaleNode(NodeId),

    /// Two stores were declared for the same property on one node.
    #[error("duplicate value store for property {0}")]
    DuplicateStore(AnimatableProperty),
}
