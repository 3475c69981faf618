//! The motion engine: public facade tying every stage together.
//!
//! `MotionEngine` owns the node tree, the animator, the event queue and the
//! frame loop. Input calls (`handle_pointer`, `handle_focus`,
//! `set_gesture_active`) run the whole pipeline synchronously:
//!
//! ```text
//! pointer event -> modality filter -> gesture detector -> host hooks
//!     -> propagation + resolution (node and subtree, top-down)
//!     -> sequencer -> animator / value stores
//! ```
//!
//! Time only moves in [`MotionEngine::tick`], which advances tweens, settles
//! completion records and collects render updates.
//!
//! # Usage
//!
//! ```ignore
//! let mut engine = MotionEngine::new();
//! let opacity = MotionValue::new(1.0);
//! let node = engine.insert(
//!     None,
//!     MotionProps::new()
//!         .while_hover(Snapshot::new().with(AnimatableProperty::Opacity, 0.0))
//!         .transition(TransitionConfig::instant())
//!         .value(AnimatableProperty::Opacity, opacity.clone()),
//! )?;
//!
//! engine.handle_pointer(node, &PointerEvent::enter())?;
//! assert_eq!(opacity.get_f64(), Some(0.0));
//! ```

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use rune_config::RuneConfig;
use tracing::{debug, trace};

use super::animator::{Animator, TweenAnimator};
use super::error::{MotionError, Result};
use super::events::{EventQueue, MotionEvent};
use super::frame::{FrameData, FrameLoop, FrameScheduler, Phase};
use super::gesture::{GestureDetector, GestureSet, GestureTransition};
use super::modality::{self, PointerEvent};
use super::propagation::{self, PropagatedState};
use super::resolver::VariantResolver;
use super::sequencer::{Completed, NodeSequencer, NodeStores, SequencerContext};
use super::transition::TransitionSpec;
use super::tree::MotionTree;
use super::types::{AnimatableProperty, AnimatableValue, AnimationId, GestureKind, NodeId, Owner};
use super::value::MotionValue;
use super::variants::{MotionProps, StoreSource};

/// A component node and all per-node engine state.
#[derive(Debug)]
pub struct MotionNode {
    props: MotionProps,
    detector: GestureDetector,
    /// Labels accepted from the parent.
    received: PropagatedState,
    /// Labels handed to children.
    forwarded: PropagatedState,
    stores: NodeStores,
    sequencer: NodeSequencer,
}

impl MotionNode {
    pub fn props(&self) -> &MotionProps {
        &self.props
    }

    pub fn active(&self) -> GestureSet {
        self.detector.active()
    }

    pub fn propagated(&self) -> &PropagatedState {
        &self.received
    }
}

/// Host-visible style of a node whose stores changed since the last render.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderUpdate {
    pub node: NodeId,
    pub style: BTreeMap<AnimatableProperty, AnimatableValue>,
}

/// Gesture-driven animation engine for a tree of motion nodes.
pub struct MotionEngine {
    tree: MotionTree<MotionNode>,
    animator: Box<dyn Animator>,
    tasks: HashMap<AnimationId, NodeId>,
    events: EventQueue,
    frames: FrameLoop,
    render_updates: Vec<RenderUpdate>,
    default_spec: TransitionSpec,
    drag_threshold: f64,
}

impl fmt::Debug for MotionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionEngine")
            .field("tree", &self.tree)
            .field("running_tasks", &self.animator.len())
            .field("events", &self.events.len())
            .field("default_spec", &self.default_spec)
            .field("drag_threshold", &self.drag_threshold)
            .finish_non_exhaustive()
    }
}

impl Default for MotionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionEngine {
    /// Engine with default configuration and the reference tween animator.
    pub fn new() -> Self {
        Self::with_config(&RuneConfig::default())
    }

    pub fn with_config(config: &RuneConfig) -> Self {
        Self {
            tree: MotionTree::new(),
            animator: Box::new(TweenAnimator::new()),
            tasks: HashMap::new(),
            events: EventQueue::new(),
            frames: FrameLoop::new(),
            render_updates: Vec::new(),
            default_spec: TransitionSpec::from_config(&config.motion),
            drag_threshold: config.gestures.drag_threshold_px.max(0.0),
        }
    }

    /// Replace the animation primitive. Call before inserting nodes.
    pub fn with_animator(mut self, animator: impl Animator + 'static) -> Self {
        self.animator = Box::new(animator);
        self
    }

    /// Transition used when neither a layer nor the node configures one.
    pub fn default_transition(&self) -> TransitionSpec {
        self.default_spec
    }

    /// Insert a node under `parent` (or as a root) and resolve its initial state.
    pub fn insert(&mut self, parent: Option<NodeId>, props: MotionProps) -> Result<NodeId> {
        let from_parent = match parent {
            Some(p) => self
                .tree
                .get(p)
                .map(|n| n.forwarded.clone())
                .ok_or(MotionError::StaleNode(p))?,
            None => PropagatedState::default(),
        };

        let mut seen = HashSet::new();
        for (property, _) in &props.stores {
            if !seen.insert(property) {
                return Err(MotionError::DuplicateStore(property.clone()));
            }
        }

        let mut stores = NodeStores::new(props.transform_values.clone());
        for (property, source) in &props.stores {
            match source {
                StoreSource::Shared(store) => stores.attach(property.clone(), store.clone()),
                StoreSource::Style(value) => stores.attach_declared(property.clone(), value),
            }
        }

        let received = propagation::receive(&props, &from_parent);
        let detector = GestureDetector::new(props.draggable);
        let forwarded = propagation::forward(&props, detector.active(), &received);
        let node = MotionNode {
            props,
            detector,
            received,
            forwarded,
            stores,
            sequencer: NodeSequencer::new(),
        };
        let id = self.tree.insert(parent, node)?;
        debug!(node = %id, parent = ?parent, "node inserted");
        self.reconcile(id);
        Ok(id)
    }

    /// Remove a node and its subtree, cancelling their tasks.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        for (removed, mut node) in self.tree.remove(id)? {
            let mut ctx = SequencerContext {
                node: removed,
                animator: &mut *self.animator,
                events: &mut self.events,
                tasks: &mut self.tasks,
                default_spec: self.default_spec,
            };
            node.sequencer.cancel_all(&mut ctx);
            node.stores.detach_all();
        }
        debug!(node = %id, "node removed");
        Ok(())
    }

    /// Feed a raw pointer event targeted at `id`.
    pub fn handle_pointer(&mut self, id: NodeId, event: &PointerEvent) -> Result<()> {
        let threshold = self.drag_threshold;
        let node = self.node_mut(id)?;
        if !modality::accepts(event) {
            trace!(node = %id, kind = ?event.kind, "pointer event filtered by modality");
            return Ok(());
        }
        let transitions = node.detector.pointer(event, threshold);
        self.apply_transitions(id, transitions);
        Ok(())
    }

    /// Focus gained (`true`) or lost (`false`).
    pub fn handle_focus(&mut self, id: NodeId, focused: bool) -> Result<()> {
        let transition = self.node_mut(id)?.detector.focus(focused);
        self.apply_transitions(id, transition.into_iter().collect());
        Ok(())
    }

    /// Drive a gesture directly. Returns whether the flag changed.
    pub fn set_gesture_active(&mut self, id: NodeId, kind: GestureKind, active: bool) -> Result<bool> {
        let transition = self.node_mut(id)?.detector.set(kind, active);
        let changed = transition.is_some();
        self.apply_transitions(id, transition.into_iter().collect());
        Ok(changed)
    }

    /// Run one frame: read, update, render, post-render.
    pub fn tick(&mut self, delta_ms: f32) -> FrameData {
        let mut batch = self.frames.begin(delta_ms);
        batch.run(Phase::Read);

        for task in self.animator.advance(delta_ms) {
            self.settle(task);
        }
        batch.run(Phase::Update);

        self.collect_render_updates();
        batch.run(Phase::Render);

        batch.run(Phase::PostRender);
        *batch.data()
    }

    /// Queue a host job for the next frame's `phase`.
    pub fn schedule(&self, phase: Phase, job: impl FnOnce(&FrameData) + Send + 'static) {
        self.frames.scheduler().schedule(phase, job);
    }

    /// Handle for scheduling jobs from outside the engine.
    pub fn scheduler(&self) -> FrameScheduler {
        self.frames.scheduler()
    }

    /// Drain all queued events, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = MotionEvent> + '_ {
        self.events.drain()
    }

    /// Take the render updates collected by past frames.
    pub fn drain_render_updates(&mut self) -> Vec<RenderUpdate> {
        std::mem::take(&mut self.render_updates)
    }

    /// Current host-visible style of a node.
    pub fn render_style(&self, id: NodeId) -> Result<BTreeMap<AnimatableProperty, AnimatableValue>> {
        Ok(self.node(id)?.stores.render_style())
    }

    pub fn active_gestures(&self, id: NodeId) -> Result<GestureSet> {
        Ok(self.node(id)?.detector.active())
    }

    /// Which owner currently controls a property on a node.
    pub fn owner_of(&self, id: NodeId, property: &AnimatableProperty) -> Result<Owner> {
        Ok(self.node(id)?.sequencer.owner_of(property))
    }

    /// The store backing a property, if the node has one.
    pub fn store(&self, id: NodeId, property: &AnimatableProperty) -> Result<Option<MotionValue>> {
        Ok(self.node(id)?.stores.get(property).cloned())
    }

    pub fn node(&self, id: NodeId) -> Result<&MotionNode> {
        self.tree.get(id).ok_or(MotionError::StaleNode(id))
    }

    pub fn tree(&self) -> &MotionTree<MotionNode> {
        &self.tree
    }

    /// Whether any task is in flight.
    pub fn is_animating(&self) -> bool {
        !self.animator.is_empty()
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut MotionNode> {
        self.tree.get_mut(id).ok_or(MotionError::StaleNode(id))
    }

    fn apply_transitions(&mut self, id: NodeId, transitions: Vec<GestureTransition>) {
        if transitions.is_empty() {
            return;
        }
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        for GestureTransition { kind, started } in transitions {
            trace!(node = %id, gesture = %kind, started, "gesture transition");
            node.props.handlers.fire(kind, started);
            self.events.push(if started {
                MotionEvent::GestureStart { node: id, gesture: kind }
            } else {
                MotionEvent::GestureEnd { node: id, gesture: kind }
            });
        }
        self.refresh_subtree(id);
    }

    /// Recompute propagation and ownership for `root` and its descendants, parents first.
    fn refresh_subtree(&mut self, root: NodeId) {
        for id in self.tree.subtree(root) {
            let from_parent = self
                .tree
                .parent_of(id)
                .and_then(|p| self.tree.get(p))
                .map(|p| p.forwarded.clone())
                .unwrap_or_default();
            if let Some(node) = self.tree.get_mut(id) {
                node.received = propagation::receive(&node.props, &from_parent);
                node.forwarded = propagation::forward(&node.props, node.detector.active(), &node.received);
            }
            self.reconcile(id);
        }
    }

    fn reconcile(&mut self, id: NodeId) {
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        let resolution = VariantResolver::new(&node.props).resolve(node.detector.active(), &node.received);
        let mut ctx = SequencerContext {
            node: id,
            animator: &mut *self.animator,
            events: &mut self.events,
            tasks: &mut self.tasks,
            default_spec: self.default_spec,
        };
        let completed = node
            .sequencer
            .reconcile(&resolution, &mut node.stores, &node.props.transition, &mut ctx);
        for done in completed {
            report_completion(&mut self.events, id, node, done);
        }
    }

    fn settle(&mut self, task: AnimationId) {
        let Some(id) = self.tasks.remove(&task) else {
            return;
        };
        let Some(node) = self.tree.get_mut(id) else {
            return;
        };
        let mut ctx = SequencerContext {
            node: id,
            animator: &mut *self.animator,
            events: &mut self.events,
            tasks: &mut self.tasks,
            default_spec: self.default_spec,
        };
        if let Some(done) = node.sequencer.settle(task, &mut node.stores, &mut ctx) {
            report_completion(&mut self.events, id, node, done);
        }
    }

    fn collect_render_updates(&mut self) {
        let ids: Vec<_> = self.tree.ids().collect();
        for id in ids {
            if let Some(node) = self.tree.get(id)
                && node.stores.take_dirty()
            {
                self.render_updates.push(RenderUpdate {
                    node: id,
                    style: node.stores.render_style(),
                });
            }
        }
    }
}

fn report_completion(events: &mut EventQueue, id: NodeId, node: &mut MotionNode, done: Completed) {
    events.push(MotionEvent::AnimationComplete {
        node: id,
        owner: done.owner,
        label: done.label.clone(),
    });
    node.props.handlers.fire_complete(done.owner, done.label.as_deref());
}

static_assertions::assert_impl_all!(MotionEngine: Send);
