//! Declarative motion surface for a node.
//!
//! A node declares named [`Snapshot`]s in its [`Variants`] table, binds
//! gestures to them (by label or inline), and optionally provides value
//! stores, transitions and transform mappings. [`MotionProps`] collects all of
//! it with a builder API.
//!
//! # Example
//!
//! ```ignore
//! let props = MotionProps::new()
//!     .variants(Variants::new().with("hovered", Snapshot::new().with(AnimatableProperty::Opacity, 0.5)))
//!     .while_hover("hovered")
//!     .transition(TransitionConfig::instant())
//!     .value(AnimatableProperty::Opacity, opacity.clone());
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::handlers::GestureHandlers;
use super::transform_values::TransformValues;
use super::transition::TransitionConfig;
use super::types::{AnimatableProperty, AnimatableValue, GestureKind};
use super::value::MotionValue;

/// Target values for a set of properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Values the owning layer animates to.
    #[serde(default)]
    pub values: BTreeMap<AnimatableProperty, AnimatableValue>,
    /// Transition override for tasks this snapshot starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition: Option<TransitionConfig>,
    /// Values written once the layer's entry animation completes.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub transition_end: BTreeMap<AnimatableProperty, AnimatableValue>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a target value.
    pub fn with(mut self, property: AnimatableProperty, value: impl Into<AnimatableValue>) -> Self {
        self.values.insert(property, value.into());
        self
    }

    /// Add a value applied after the entry animation completes.
    pub fn with_end(mut self, property: AnimatableProperty, value: impl Into<AnimatableValue>) -> Self {
        self.transition_end.insert(property, value.into());
        self
    }

    /// Override the transition for this snapshot.
    pub fn with_transition(mut self, transition: TransitionConfig) -> Self {
        self.transition = Some(transition);
        self
    }

    /// Whether the snapshot mentions a property at all.
    pub fn defines(&self, property: &AnimatableProperty) -> bool {
        self.values.contains_key(property) || self.transition_end.contains_key(property)
    }

    /// Every property the snapshot mentions, sorted and deduplicated.
    pub fn properties(&self) -> impl Iterator<Item = &AnimatableProperty> {
        let mut props: Vec<_> = self.values.keys().chain(self.transition_end.keys()).collect();
        props.sort();
        props.dedup();
        props.into_iter()
    }
}

/// Named snapshots declared by a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variants(HashMap<String, Snapshot>);

impl Variants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, label: impl Into<String>, snapshot: Snapshot) -> Self {
        self.0.insert(label.into(), snapshot);
        self
    }

    pub fn insert(&mut self, label: impl Into<String>, snapshot: Snapshot) {
        self.0.insert(label.into(), snapshot);
    }

    pub fn get(&self, label: &str) -> Option<&Snapshot> {
        self.0.get(label)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// What a gesture (or the base `animate` layer) resolves to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    /// Look the snapshot up in the node's variants. Propagates to children.
    Variant(String),
    /// Use this snapshot directly. Does not propagate.
    Inline(Snapshot),
}

impl Binding {
    /// Variant label, if this is a label binding.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Variant(label) => Some(label),
            Self::Inline(_) => None,
        }
    }
}

impl From<&str> for Binding {
    fn from(label: &str) -> Self {
        Self::Variant(label.to_string())
    }
}

impl From<String> for Binding {
    fn from(label: String) -> Self {
        Self::Variant(label)
    }
}

impl From<Snapshot> for Binding {
    fn from(snapshot: Snapshot) -> Self {
        Self::Inline(snapshot)
    }
}

/// Where a node's store for a property comes from.
#[derive(Debug, Clone)]
pub(crate) enum StoreSource {
    /// Host-owned store, already in host space.
    Shared(MotionValue),
    /// Initial declared value; the engine creates the store.
    Style(AnimatableValue),
}

/// Everything a node declares about its motion.
#[derive(Debug)]
pub struct MotionProps {
    pub(crate) variants: Variants,
    pub(crate) bindings: [Option<Binding>; GestureKind::COUNT],
    pub(crate) animate: Option<Binding>,
    pub(crate) transition: TransitionConfig,
    pub(crate) transform_values: TransformValues,
    pub(crate) stores: Vec<(AnimatableProperty, StoreSource)>,
    pub(crate) inherit: bool,
    pub(crate) draggable: bool,
    pub(crate) handlers: GestureHandlers,
}

impl Default for MotionProps {
    fn default() -> Self {
        Self {
            variants: Variants::default(),
            bindings: Default::default(),
            animate: None,
            transition: TransitionConfig::default(),
            transform_values: TransformValues::default(),
            stores: Vec::new(),
            inherit: true,
            draggable: false,
            handlers: GestureHandlers::default(),
        }
    }
}

impl MotionProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variants(mut self, variants: Variants) -> Self {
        self.variants = variants;
        self
    }

    /// Bind a gesture to a variant label or an inline snapshot.
    pub fn while_gesture(mut self, kind: GestureKind, binding: impl Into<Binding>) -> Self {
        self.bindings[kind.index()] = Some(binding.into());
        self
    }

    pub fn while_hover(self, binding: impl Into<Binding>) -> Self {
        self.while_gesture(GestureKind::Hover, binding)
    }

    pub fn while_tap(self, binding: impl Into<Binding>) -> Self {
        self.while_gesture(GestureKind::Tap, binding)
    }

    pub fn while_drag(self, binding: impl Into<Binding>) -> Self {
        self.while_gesture(GestureKind::Drag, binding)
    }

    pub fn while_focus(self, binding: impl Into<Binding>) -> Self {
        self.while_gesture(GestureKind::Focus, binding)
    }

    /// Base layer target, owned by [`crate::Owner::Base`].
    pub fn animate(mut self, binding: impl Into<Binding>) -> Self {
        self.animate = Some(binding.into());
        self
    }

    pub fn transition(mut self, transition: TransitionConfig) -> Self {
        self.transition = transition;
        self
    }

    pub fn transform_values(mut self, transform_values: TransformValues) -> Self {
        self.transform_values = transform_values;
        self
    }

    /// Use a host-owned store for a property.
    pub fn value(mut self, property: AnimatableProperty, store: MotionValue) -> Self {
        self.stores.push((property, StoreSource::Shared(store)));
        self
    }

    /// Give a property an initial declared value; the engine owns its store.
    pub fn style(mut self, property: AnimatableProperty, value: impl Into<AnimatableValue>) -> Self {
        self.stores.push((property, StoreSource::Style(value.into())));
        self
    }

    /// Whether this node takes part in label propagation. Defaults to `true`.
    pub fn inherit(mut self, inherit: bool) -> Self {
        self.inherit = inherit;
        self
    }

    /// Allow drag gestures on this node.
    pub fn draggable(mut self, draggable: bool) -> Self {
        self.draggable = draggable;
        self
    }

    pub fn handlers(mut self, handlers: GestureHandlers) -> Self {
        self.handlers = handlers;
        self
    }

    /// The node's own binding for a gesture kind.
    pub fn binding(&self, kind: GestureKind) -> Option<&Binding> {
        self.bindings[kind.index()].as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_defines_end_values() {
        let snapshot = Snapshot::new()
            .with(AnimatableProperty::Opacity, 0.5)
            .with_end(AnimatableProperty::Opacity, 0.75)
            .with_end(AnimatableProperty::Scale, 2.0);

        assert!(snapshot.defines(&AnimatableProperty::Opacity));
        assert!(snapshot.defines(&AnimatableProperty::Scale));
        assert!(!snapshot.defines(&AnimatableProperty::X));
        assert_eq!(
            snapshot.properties().cloned().collect::<Vec<_>>(),
            vec![AnimatableProperty::Opacity, AnimatableProperty::Scale]
        );
    }

    #[test]
    fn test_binding_conversions() {
        let label: Binding = "hovered".into();
        assert_eq!(label.label(), Some("hovered"));

        let inline: Binding = Snapshot::new().with(AnimatableProperty::Opacity, 0.0).into();
        assert_eq!(inline.label(), None);
    }

    #[test]
    fn test_props_builder() {
        let props = MotionProps::new()
            .variants(Variants::new().with("pressed", Snapshot::new().with(AnimatableProperty::Scale, 0.9)))
            .while_tap("pressed")
            .while_hover(Snapshot::new().with(AnimatableProperty::Opacity, 0.5))
            .style(AnimatableProperty::Opacity, 1.0)
            .draggable(true);

        assert!(props.inherit);
        assert!(props.draggable);
        assert_eq!(props.binding(GestureKind::Tap).and_then(Binding::label), Some("pressed"));
        assert!(matches!(props.binding(GestureKind::Hover), Some(Binding::Inline(_))));
        assert!(props.binding(GestureKind::Drag).is_none());
        assert_eq!(props.variants.len(), 1);
        assert_eq!(props.stores.len(), 1);
    }

    #[test]
    fn test_snapshot_serialization() {
        let snapshot = Snapshot::new()
            .with(AnimatableProperty::Opacity, 0.5)
            .with_transition(TransitionConfig::instant());
        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
    }
}
