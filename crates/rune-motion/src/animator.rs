//! Animation primitive driving value stores.
//!
//! The sequencer never interpolates by itself; it hands a store, an origin, a
//! target and a [`TransitionSpec`] to an [`Animator`] and gets back an
//! [`AnimationId`]. Each frame the engine calls [`Animator::advance`] and
//! routes the ids of settled tasks back to the sequencer.
//!
//! [`TweenAnimator`] is the reference implementation: eased interpolation
//! with an optional delay, written through the property's transform mapping.

use std::collections::HashMap;

use tracing::trace;

use super::interpolate::Interpolate;
use super::transform_values::TransformMapping;
use super::transition::{TransitionKind, TransitionSpec};
use super::types::{AnimatableValue, AnimationId, AnimationState};
use super::value::MotionValue;

/// Drives stores toward targets over time.
pub trait Animator: Send {
    /// Start animating `store` from `from` to `to` (both in declared space).
    ///
    /// `mapping`, when present, converts each interpolated value before it is
    /// written to the store.
    fn animate(
        &mut self,
        store: MotionValue,
        from: AnimatableValue,
        to: AnimatableValue,
        spec: &TransitionSpec,
        mapping: Option<TransformMapping>,
    ) -> AnimationId;

    /// Detach a task. Its settlement is never reported. Returns `false` if unknown.
    fn cancel(&mut self, id: AnimationId) -> bool;

    /// Advance all tasks by `delta_ms`, returning the ids that settled.
    fn advance(&mut self, delta_ms: f32) -> Vec<AnimationId>;

    fn is_running(&self, id: AnimationId) -> bool;

    /// Number of tasks in flight.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Runtime state of one tween.
#[derive(Debug)]
struct TweenTask {
    store: MotionValue,
    mapping: Option<TransformMapping>,
    from: AnimatableValue,
    to: AnimatableValue,
    spec: TransitionSpec,
    elapsed_ms: f32,
    state: AnimationState,
}

impl TweenTask {
    fn new(
        store: MotionValue,
        from: AnimatableValue,
        to: AnimatableValue,
        spec: TransitionSpec,
        mapping: Option<TransformMapping>,
    ) -> Self {
        let state = match spec.kind {
            TransitionKind::Tween { delay_ms, .. } if delay_ms > 0.0 => AnimationState::Pending,
            _ => AnimationState::Running,
        };
        Self {
            store,
            mapping,
            from,
            to,
            spec,
            elapsed_ms: 0.0,
            state,
        }
    }

    fn write(&self, declared: &AnimatableValue) {
        let stored = match &self.mapping {
            Some(mapping) => mapping.forward(declared),
            None => declared.clone(),
        };
        self.store.set(stored);
    }

    /// Eased progress in `[0, 1]`.
    fn progress(&self) -> f32 {
        match self.spec.kind {
            TransitionKind::Instant => 1.0,
            TransitionKind::Tween {
                duration_ms,
                delay_ms,
                easing,
            } => {
                let active = (self.elapsed_ms - delay_ms).max(0.0);
                let linear = if duration_ms > 0.0 {
                    (active / duration_ms).clamp(0.0, 1.0)
                } else {
                    1.0
                };
                easing.evaluate(linear)
            }
        }
    }

    /// Update the tween by the given delta time.
    ///
    /// Returns `true` while still running.
    fn update(&mut self, delta_ms: f32) -> bool {
        self.elapsed_ms += delta_ms;
        let (duration_ms, delay_ms) = match self.spec.kind {
            TransitionKind::Instant => (0.0, 0.0),
            TransitionKind::Tween {
                duration_ms,
                delay_ms,
                ..
            } => (duration_ms, delay_ms),
        };

        if self.elapsed_ms < delay_ms {
            return true;
        }
        self.state = AnimationState::Running;

        if self.elapsed_ms - delay_ms >= duration_ms {
            self.write(&self.to.clone());
            self.state = AnimationState::Finished;
            return false;
        }
        let value = self.from.interpolate(&self.to, self.progress());
        self.write(&value);
        true
    }
}

/// Reference animator: eased tweens stepped by frame time.
#[derive(Debug, Default)]
pub struct TweenAnimator {
    tasks: HashMap<AnimationId, TweenTask>,
}

impl TweenAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// State of a task still held by the animator.
    pub fn state(&self, id: AnimationId) -> Option<AnimationState> {
        self.tasks.get(&id).map(|t| t.state)
    }
}

impl Animator for TweenAnimator {
    fn animate(
        &mut self,
        store: MotionValue,
        from: AnimatableValue,
        to: AnimatableValue,
        spec: &TransitionSpec,
        mapping: Option<TransformMapping>,
    ) -> AnimationId {
        let id = AnimationId::new();
        let task = TweenTask::new(store, from, to, *spec, mapping);
        if spec.is_instant() {
            task.write(&task.to);
        }
        trace!(?id, ?spec, "tween started");
        self.tasks.insert(id, task);
        id
    }

    fn cancel(&mut self, id: AnimationId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    fn advance(&mut self, delta_ms: f32) -> Vec<AnimationId> {
        if self.tasks.is_empty() {
            return Vec::new();
        }

        let mut settled = Vec::new();
        for (id, task) in self.tasks.iter_mut() {
            if !task.update(delta_ms) {
                settled.push(*id);
            }
        }
        // Start order, so completions are reported deterministically
        settled.sort_by_key(|id| id.0);
        for id in &settled {
            self.tasks.remove(id);
        }
        settled
    }

    fn is_running(&self, id: AnimationId) -> bool {
        self.tasks.contains_key(&id)
    }

    fn len(&self) -> usize {
        self.tasks.len()
    }
}

static_assertions::assert_impl_all!(TweenAnimator: Send);
