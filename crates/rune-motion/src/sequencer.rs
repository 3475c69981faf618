//! Animation sequencing: ownership diffs to animation tasks.
//!
//! A [`NodeSequencer`] remembers, for every property a node has ever
//! animated, which owner controls it, the target it was sent to, and the task
//! currently writing it. Reconciling against a fresh [`Resolution`]:
//!
//! 1. builds the desired `(owner, target)` per property; properties no layer
//!    defines any more fall back to [`Owner::Base`] and their captured base value;
//! 2. for each property whose pair changed, cancels the in-flight task and
//!    starts a new one from the store's current (inverse-mapped) value;
//! 3. opens a completion record per owner that changed anything, replacing any
//!    older record of that owner. The record counts every task the owner has
//!    in flight, not only the ones just started.
//!
//! A record completes once every task it counts has settled. At that point the
//! owner's `transition_end` values are written to the properties it still
//! owns. Records whose tasks are all stolen by other owners are dropped
//! without completing.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, trace};

use super::animator::Animator;
use super::events::{EventQueue, TransitionEvent};
use super::resolver::Resolution;
use super::transform_values::TransformValues;
use super::transition::{TransitionConfig, TransitionSpec};
use super::types::{AnimatableProperty, AnimatableValue, AnimationId, NodeId, Owner};
use super::value::{MotionValue, SubscriptionId};

/// A node's value stores, viewed through its transform mappings.
#[derive(Debug)]
pub struct NodeStores {
    stores: BTreeMap<AnimatableProperty, MotionValue>,
    subscriptions: Vec<(MotionValue, SubscriptionId)>,
    transform_values: TransformValues,
    dirty: Arc<AtomicBool>,
}

impl NodeStores {
    pub fn new(transform_values: TransformValues) -> Self {
        Self {
            stores: BTreeMap::new(),
            subscriptions: Vec::new(),
            transform_values,
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attach a store. Every change to it marks the node dirty for rendering.
    pub fn attach(&mut self, property: AnimatableProperty, store: MotionValue) {
        let dirty = self.dirty.clone();
        let id = store.subscribe(move |_| dirty.store(true, Ordering::Release));
        self.subscriptions.push((store.clone(), id));
        self.stores.insert(property, store);
        self.dirty.store(true, Ordering::Release);
    }

    /// Attach a store created from a declared value.
    pub fn attach_declared(&mut self, property: AnimatableProperty, declared: &AnimatableValue) {
        let store = MotionValue::new(self.transform_values.to_store(&property, declared));
        self.attach(property, store);
    }

    pub fn get(&self, property: &AnimatableProperty) -> Option<&MotionValue> {
        self.stores.get(property)
    }

    pub fn contains(&self, property: &AnimatableProperty) -> bool {
        self.stores.contains_key(property)
    }

    /// The store for a property, created from its default value if missing.
    pub fn get_or_create(&mut self, property: &AnimatableProperty) -> Option<MotionValue> {
        if !self.stores.contains_key(property) {
            let Some(initial) = property.default_value() else {
                debug!(%property, "no store declared and no default value");
                return None;
            };
            self.attach_declared(property.clone(), &initial);
        }
        self.stores.get(property).cloned()
    }

    /// Current value in declared space.
    pub fn read(&self, property: &AnimatableProperty) -> Option<AnimatableValue> {
        self.stores
            .get(property)
            .map(|store| self.transform_values.from_store(property, &store.get()))
    }

    /// Write a declared value. Returns `false` if the property has no store.
    pub fn write(&mut self, property: &AnimatableProperty, declared: &AnimatableValue) -> bool {
        match self.get_or_create(property) {
            Some(store) => {
                store.set(self.transform_values.to_store(property, declared));
                true
            }
            None => false,
        }
    }

    pub fn transform_values(&self) -> &TransformValues {
        &self.transform_values
    }

    /// Clear and return the dirty flag.
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }

    /// Host-visible style: every stored value, fanned out through mappings.
    pub fn render_style(&self) -> BTreeMap<AnimatableProperty, AnimatableValue> {
        let mut style = BTreeMap::new();
        for (property, store) in &self.stores {
            style.extend(self.transform_values.host_attributes(property, &store.get()));
        }
        style
    }

    /// Drop change listeners from every store, including host-owned ones.
    pub fn detach_all(&mut self) {
        for (store, id) in self.subscriptions.drain(..) {
            store.unsubscribe(id);
        }
    }
}

/// Sequencer bookkeeping for one property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyState {
    pub owner: Owner,
    /// Declared-space target of the last task started for this property.
    pub target: Option<AnimatableValue>,
    /// Task currently writing the store.
    pub task: Option<AnimationId>,
}

/// An owner's latest batch of tasks.
#[derive(Debug, Clone)]
struct CompletionRecord {
    owner: Owner,
    label: Option<String>,
    pending: HashSet<AnimationId>,
    end_values: BTreeMap<AnimatableProperty, AnimatableValue>,
}

/// A completion record that settled.
#[derive(Debug, Clone, PartialEq)]
pub struct Completed {
    pub owner: Owner,
    pub label: Option<String>,
}

/// Shared collaborators for one reconcile or settle call.
pub struct SequencerContext<'a> {
    pub node: NodeId,
    pub animator: &'a mut dyn Animator,
    pub events: &'a mut EventQueue,
    /// Routes task settlements back to their node.
    pub tasks: &'a mut HashMap<AnimationId, NodeId>,
    /// Used when neither the layer nor the node configures a transition.
    pub default_spec: TransitionSpec,
}

/// Per-node ownership and task tracking.
#[derive(Debug, Default)]
pub struct NodeSequencer {
    states: BTreeMap<AnimatableProperty, PropertyState>,
    base_values: HashMap<AnimatableProperty, AnimatableValue>,
    records: Vec<CompletionRecord>,
}

impl NodeSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, property: &AnimatableProperty) -> Option<&PropertyState> {
        self.states.get(property)
    }

    /// Current owner of a property.
    pub fn owner_of(&self, property: &AnimatableProperty) -> Owner {
        self.states.get(property).map_or(Owner::Base, |s| s.owner)
    }

    /// Value captured before a gesture first took the property.
    pub fn base_value(&self, property: &AnimatableProperty) -> Option<&AnimatableValue> {
        self.base_values.get(property)
    }

    /// Owners with a completion record still waiting on tasks.
    pub fn pending_owners(&self) -> Vec<Owner> {
        self.records.iter().map(|r| r.owner).collect()
    }

    /// Drive the node toward `resolution`. Returns records that completed synchronously.
    pub fn reconcile(
        &mut self,
        resolution: &Resolution,
        stores: &mut NodeStores,
        node_transition: &TransitionConfig,
        ctx: &mut SequencerContext<'_>,
    ) -> Vec<Completed> {
        let mut desired: BTreeMap<AnimatableProperty, (Owner, Option<AnimatableValue>)> = resolution
            .properties
            .iter()
            .map(|(property, resolved)| (property.clone(), (resolved.owner, resolved.value.clone())))
            .collect();
        for property in self.states.keys() {
            if !desired.contains_key(property) {
                let restore = self.base_values.get(property).cloned();
                desired.insert(property.clone(), (Owner::Base, restore));
            }
        }

        let mut touched: Vec<Owner> = Vec::new();
        for (property, (owner, target)) in desired {
            let old = self.states.get(&property).cloned();
            if old
                .as_ref()
                .is_some_and(|s| s.owner == owner && s.target == target)
            {
                continue;
            }

            if owner != Owner::Base {
                let from_base = old.as_ref().is_none_or(|s| s.owner == Owner::Base);
                let idle = old.as_ref().is_none_or(|s| s.task.is_none());
                if from_base && (idle || !self.base_values.contains_key(&property)) {
                    let current = stores.read(&property).or_else(|| property.default_value());
                    if let Some(current) = current {
                        self.base_values.insert(property.clone(), current);
                    }
                }
            }

            if let Some(id) = old.as_ref().and_then(|s| s.task) {
                self.cancel_task(id, &property, ctx);
            }

            let task = match &target {
                Some(to) => {
                    let spec = resolution
                        .layer(owner)
                        .and_then(|l| l.transition())
                        .and_then(|t| t.get_spec(&property))
                        .or_else(|| node_transition.get_spec(&property))
                        .copied()
                        .unwrap_or(ctx.default_spec);
                    self.start_task(&property, to, &spec, stores, ctx)
                }
                None => None,
            };

            if owner == Owner::Base && target.is_none() && task.is_none() {
                self.states.remove(&property);
            } else {
                self.states.insert(property.clone(), PropertyState { owner, target, task });
            }

            if !touched.contains(&owner) {
                touched.push(owner);
            }
        }

        let mut completed = Vec::new();
        for owner in touched {
            self.records.retain(|r| r.owner != owner);
            // Untouched properties still tweening for this owner keep the record open
            let pending = self
                .states
                .values()
                .filter(|s| s.owner == owner)
                .filter_map(|s| s.task)
                .collect();
            let layer = resolution.layer(owner);
            let record = CompletionRecord {
                owner,
                label: layer.and_then(|l| l.label.clone()),
                pending,
                end_values: layer
                    .map(|l| l.snapshot.transition_end.clone())
                    .unwrap_or_default(),
            };
            if record.pending.is_empty() {
                completed.push(record);
            } else {
                self.records.push(record);
            }
        }

        completed
            .into_iter()
            .map(|record| self.complete(record, stores))
            .collect()
    }

    /// A task reported by the animator settled.
    pub fn settle(&mut self, id: AnimationId, stores: &mut NodeStores, ctx: &mut SequencerContext<'_>) -> Option<Completed> {
        let Some((property, state)) = self.states.iter_mut().find(|(_, s)| s.task == Some(id)) else {
            trace!(?id, "stale settlement ignored");
            return None;
        };
        state.task = None;
        ctx.events.push(TransitionEvent::Ended {
            transition_id: id,
            node: ctx.node,
            property: property.clone(),
        });

        let index = self.records.iter().position(|r| r.pending.contains(&id))?;
        let record = &mut self.records[index];
        record.pending.remove(&id);
        if !record.pending.is_empty() {
            return None;
        }
        let record = self.records.remove(index);
        Some(self.complete(record, stores))
    }

    /// Cancel every in-flight task, e.g. when the node is removed.
    pub fn cancel_all(&mut self, ctx: &mut SequencerContext<'_>) {
        let running: Vec<_> = self
            .states
            .iter()
            .filter_map(|(p, s)| s.task.map(|id| (id, p.clone())))
            .collect();
        for (id, property) in running {
            self.cancel_task(id, &property, ctx);
            if let Some(state) = self.states.get_mut(&property) {
                state.task = None;
            }
        }
        self.records.clear();
    }

    fn start_task(
        &mut self,
        property: &AnimatableProperty,
        to: &AnimatableValue,
        spec: &TransitionSpec,
        stores: &mut NodeStores,
        ctx: &mut SequencerContext<'_>,
    ) -> Option<AnimationId> {
        if spec.is_instant() {
            stores.write(property, to);
            trace!(node = %ctx.node, %property, "instant write");
            return None;
        }

        let store = stores.get_or_create(property)?;
        let from = stores.read(property).unwrap_or_else(|| to.clone());
        let mapping = stores.transform_values().get(property).cloned();
        let id = ctx.animator.animate(store, from, to.clone(), spec, mapping);
        ctx.tasks.insert(id, ctx.node);
        ctx.events.push(TransitionEvent::Started {
            transition_id: id,
            node: ctx.node,
            property: property.clone(),
        });
        trace!(node = %ctx.node, %property, ?id, "task started");
        Some(id)
    }

    fn cancel_task(&mut self, id: AnimationId, property: &AnimatableProperty, ctx: &mut SequencerContext<'_>) {
        ctx.animator.cancel(id);
        ctx.tasks.remove(&id);
        ctx.events.push(TransitionEvent::Cancelled {
            transition_id: id,
            node: ctx.node,
            property: property.clone(),
        });
        for record in &mut self.records {
            record.pending.remove(&id);
        }
        // Records whose every task was taken over complete never
        self.records.retain(|r| !r.pending.is_empty());
    }

    fn complete(&mut self, record: CompletionRecord, stores: &mut NodeStores) -> Completed {
        for (property, value) in &record.end_values {
            if self.owner_of(property) == record.owner {
                stores.write(property, value);
            }
        }
        debug!(owner = %record.owner, label = ?record.label, "animation complete");
        Completed {
            owner: record.owner,
            label: record.label,
        }
    }
}
