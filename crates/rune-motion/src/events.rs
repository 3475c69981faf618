//! Motion events for host polling.
//!
//! Everything the engine reports through [`crate::GestureHandlers`] is also
//! queued here, together with per-task transition events, so hosts that
//! prefer polling can drain the queue after input or after each frame.
//!
//! # Usage
//!
//! ```ignore
//! engine.tick(16.0);
//! for event in engine.drain_events() {
//!     if let MotionEvent::AnimationComplete { node, owner, .. } = event {
//!         println!("{node} settled for {owner}");
//!     }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::types::{AnimatableProperty, AnimationId, GestureKind, NodeId, Owner};

/// Event emitted when a single property task changes state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionEvent {
    /// Task has started.
    Started {
        transition_id: AnimationId,
        node: NodeId,
        property: AnimatableProperty,
    },
    /// Task reached its target.
    Ended {
        transition_id: AnimationId,
        node: NodeId,
        property: AnimatableProperty,
    },
    /// Task was pre-empted by a newer task for the same property.
    Cancelled {
        transition_id: AnimationId,
        node: NodeId,
        property: AnimatableProperty,
    },
}

impl TransitionEvent {
    /// Node the task belongs to.
    pub fn node(&self) -> NodeId {
        match self {
            Self::Started { node, .. } | Self::Ended { node, .. } | Self::Cancelled { node, .. } => *node,
        }
    }

    /// Get the transition ID for this event.
    pub fn transition_id(&self) -> AnimationId {
        match self {
            Self::Started { transition_id, .. }
            | Self::Ended { transition_id, .. }
            | Self::Cancelled { transition_id, .. } => *transition_id,
        }
    }

    /// Get the property for this event.
    pub fn property(&self) -> &AnimatableProperty {
        match self {
            Self::Started { property, .. }
            | Self::Ended { property, .. }
            | Self::Cancelled { property, .. } => property,
        }
    }
}

/// Engine-level events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionEvent {
    /// A gesture became active on a node.
    GestureStart { node: NodeId, gesture: GestureKind },
    /// A gesture stopped being active on a node.
    GestureEnd { node: NodeId, gesture: GestureKind },
    /// Every task an owner started in its latest recomputation has settled.
    AnimationComplete {
        node: NodeId,
        owner: Owner,
        /// Variant label of the owning layer, if it came from one.
        label: Option<String>,
    },
    /// A per-property task event.
    Transition(TransitionEvent),
}

impl MotionEvent {
    /// Node this event concerns.
    pub fn node(&self) -> NodeId {
        match self {
            Self::GestureStart { node, .. }
            | Self::GestureEnd { node, .. }
            | Self::AnimationComplete { node, .. } => *node,
            Self::Transition(e) => e.node(),
        }
    }

    /// Check if this is an animation completion.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::AnimationComplete { .. })
    }
}

impl From<TransitionEvent> for MotionEvent {
    fn from(event: TransitionEvent) -> Self {
        Self::Transition(event)
    }
}

/// Queue for collecting events between polls.
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<MotionEvent>,
}

impl EventQueue {
    /// Create a new empty event queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an event onto the queue.
    pub fn push(&mut self, event: impl Into<MotionEvent>) {
        self.events.push_back(event.into());
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Get the number of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Pop the next event from the queue.
    pub fn pop(&mut self) -> Option<MotionEvent> {
        self.events.pop_front()
    }

    /// Drain all events from the queue, returning an iterator.
    pub fn drain(&mut self) -> impl Iterator<Item = MotionEvent> + '_ {
        self.events.drain(..)
    }

    /// Peek at the next event without removing it.
    pub fn peek(&self) -> Option<&MotionEvent> {
        self.events.front()
    }

    /// Clear all pending events.
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Get events for a specific node.
    pub fn events_for_node(&self, node: NodeId) -> Vec<&MotionEvent> {
        self.events.iter().filter(|e| e.node() == node).collect()
    }
}
