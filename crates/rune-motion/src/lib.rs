//! Gesture-driven variant animation for rune component trees.
//!
//! Components declare target visual states ("variants") for their base render
//! and for hover, tap, drag and focus. The engine detects those interactions,
//! decides per property which active state owns it, propagates variant labels
//! down the tree, and drives value stores toward the resolved targets.
//!
//! # Architecture
//!
//! ```text
//! MotionEngine
//!   ├── modality      (drop touch for hover)
//!   ├── gesture       (per-node start/end state machines)
//!   ├── propagation   (parent labels → children)
//!   ├── resolver      (per-property owner: Drag > Tap > Hover > Focus > Base)
//!   ├── sequencer     (ownership diffs → tasks, completion records)
//!   │     └── Animator (TweenAnimator writes MotionValue stores)
//!   ├── transform_values (forward/inverse mappings)
//!   └── frame         (Read → Update → Render → PostRender)
//! ```

pub mod animator;
pub mod easing;
pub mod engine;
pub mod error;
pub mod events;
pub mod frame;
pub mod gesture;
pub mod handlers;
pub mod interpolate;
pub mod modality;
pub mod propagation;
pub mod resolver;
pub mod sequencer;
pub mod transform_values;
pub mod transition;
pub mod tree;
pub mod types;
pub mod value;
pub mod variants;

pub use animator::{Animator, TweenAnimator};
pub use easing::EasingFunction;
pub use engine::{MotionEngine, MotionNode, RenderUpdate};
pub use error::{MotionError, Result};
pub use events::{EventQueue, MotionEvent, TransitionEvent};
pub use frame::{FrameData, FrameJob, FrameLoop, FrameScheduler, Phase};
pub use gesture::{GestureDetector, GestureSet, GestureTransition};
pub use handlers::GestureHandlers;
pub use interpolate::Interpolate;
pub use modality::{PointerEvent, PointerEventKind, PointerType};
pub use propagation::{InheritedLabel, PropagatedState};
pub use resolver::{Resolution, ResolvedLayer, ResolvedProperty, VariantResolver};
pub use sequencer::{Completed, NodeSequencer, NodeStores, PropertyState};
pub use transform_values::{TransformMapping, TransformValues};
pub use transition::{TransitionConfig, TransitionKind, TransitionSpec};
pub use tree::MotionTree;
pub use types::{AnimatableProperty, AnimatableValue, AnimationId, AnimationState, GestureKind, NodeId, Owner};
pub use value::{MotionValue, SubscriptionId, ValueListener};
pub use variants::{Binding, MotionProps, Snapshot, Variants};
