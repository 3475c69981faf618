//! Per-property ownership resolution.
//!
//! The `VariantResolver` turns a node's declarations, its active gestures and
//! the labels it inherited into an ordered list of layers and a map from each
//! property to the layer that owns it.
//!
//! # Usage
//!
//! ```ignore
//! let resolution = VariantResolver::new(&props).resolve(active, &propagated);
//! if let Some(resolved) = resolution.property(&AnimatableProperty::Scale) {
//!     println!("scale owned by {}", resolved.owner);
//! }
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use super::gesture::GestureSet;
use super::propagation::PropagatedState;
use super::transition::TransitionConfig;
use super::types::{AnimatableProperty, AnimatableValue, GestureKind, Owner};
use super::variants::{Binding, MotionProps, Snapshot};

/// An active layer contributing targets.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLayer {
    pub owner: Owner,
    /// Variant label the layer came from; `None` for inline snapshots.
    pub label: Option<String>,
    pub snapshot: Snapshot,
}

impl ResolvedLayer {
    /// Transition override carried by the layer's snapshot.
    pub fn transition(&self) -> Option<&TransitionConfig> {
        self.snapshot.transition.as_ref()
    }
}

/// Owner and targets of one property.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedProperty {
    pub owner: Owner,
    /// Target to animate to. `None` when the owner only sets an end value.
    pub value: Option<AnimatableValue>,
    /// Value written once the owner's animation completes.
    pub end_value: Option<AnimatableValue>,
}

/// Result of resolving one node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution {
    /// Active layers, highest priority first; the base layer comes last.
    pub layers: Vec<ResolvedLayer>,
    pub properties: BTreeMap<AnimatableProperty, ResolvedProperty>,
}

impl Resolution {
    /// Layer for an owner, if it is active.
    pub fn layer(&self, owner: Owner) -> Option<&ResolvedLayer> {
        self.layers.iter().find(|l| l.owner == owner)
    }

    pub fn property(&self, property: &AnimatableProperty) -> Option<&ResolvedProperty> {
        self.properties.get(property)
    }

    pub fn owner_of(&self, property: &AnimatableProperty) -> Owner {
        self.properties
            .get(property)
            .map_or(Owner::Base, |p| p.owner)
    }
}

/// Resolves a node's declarations against its gesture state.
pub struct VariantResolver<'a> {
    props: &'a MotionProps,
}

impl<'a> VariantResolver<'a> {
    pub fn new(props: &'a MotionProps) -> Self {
        Self { props }
    }

    /// The binding in effect for `kind` and whether it is active.
    ///
    /// The node's own binding wins over an inherited label.
    pub fn effective_binding(
        &self,
        kind: GestureKind,
        active: GestureSet,
        propagated: &PropagatedState,
    ) -> Option<(Binding, bool)> {
        if let Some(binding) = self.props.binding(kind) {
            return Some((binding.clone(), active.is_active(kind)));
        }
        if !self.props.inherit {
            return None;
        }
        propagated
            .get(kind)
            .map(|inherited| (Binding::Variant(inherited.label.clone()), inherited.active))
    }

    pub fn resolve(&self, active: GestureSet, propagated: &PropagatedState) -> Resolution {
        let mut layers = Vec::new();
        for kind in GestureKind::PRIORITY {
            let Some((binding, true)) = self.effective_binding(kind, active, propagated) else {
                continue;
            };
            if let Some(layer) = self.layer(Owner::Gesture(kind), &binding) {
                layers.push(layer);
            }
        }
        if let Some(binding) = &self.props.animate
            && let Some(layer) = self.layer(Owner::Base, binding)
        {
            layers.push(layer);
        }

        let mut properties = BTreeMap::new();
        for layer in &layers {
            for property in layer.snapshot.properties() {
                properties
                    .entry(property.clone())
                    .or_insert_with(|| ResolvedProperty {
                        owner: layer.owner,
                        value: layer.snapshot.values.get(property).cloned(),
                        end_value: layer.snapshot.transition_end.get(property).cloned(),
                    });
            }
        }

        Resolution { layers, properties }
    }

    fn layer(&self, owner: Owner, binding: &Binding) -> Option<ResolvedLayer> {
        match binding {
            Binding::Inline(snapshot) => Some(ResolvedLayer {
                owner,
                label: None,
                snapshot: snapshot.clone(),
            }),
            Binding::Variant(label) => match self.props.variants.get(label) {
                Some(snapshot) => Some(ResolvedLayer {
                    owner,
                    label: Some(label.clone()),
                    snapshot: snapshot.clone(),
                }),
                None => {
                    debug!("variant {label:?} not declared for {owner}, no override");
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propagation::InheritedLabel;
    use crate::variants::Variants;

    fn active(kinds: &[GestureKind]) -> GestureSet {
        let mut set = GestureSet::new();
        for kind in kinds {
            set.set(*kind, true);
        }
        set
    }

    fn hover_tap_props() -> MotionProps {
        MotionProps::new()
            .variants(
                Variants::new()
                    .with(
                        "hovering",
                        Snapshot::new()
                            .with(AnimatableProperty::Opacity, 0.5)
                            .with(AnimatableProperty::Scale, 0.5),
                    )
                    .with("tapping", Snapshot::new().with(AnimatableProperty::Scale, 2.0)),
            )
            .while_hover("hovering")
            .while_tap("tapping")
    }

    #[test]
    fn test_nothing_active_resolves_empty() {
        let props = hover_tap_props();
        let resolution = VariantResolver::new(&props).resolve(GestureSet::new(), &PropagatedState::new());
        assert!(resolution.layers.is_empty());
        assert_eq!(resolution.owner_of(&AnimatableProperty::Opacity), Owner::Base);
    }

    #[test]
    fn test_priority_is_per_property() {
        let props = hover_tap_props();
        let resolution = VariantResolver::new(&props)
            .resolve(active(&[GestureKind::Hover, GestureKind::Tap]), &PropagatedState::new());

        let scale = resolution.property(&AnimatableProperty::Scale).unwrap();
        assert_eq!(scale.owner, Owner::Gesture(GestureKind::Tap));
        assert_eq!(scale.value, Some(2.0.into()));

        let opacity = resolution.property(&AnimatableProperty::Opacity).unwrap();
        assert_eq!(opacity.owner, Owner::Gesture(GestureKind::Hover));
        assert_eq!(opacity.value, Some(0.5.into()));

        assert_eq!(resolution.layers[0].label.as_deref(), Some("tapping"));
    }

    #[test]
    fn test_end_values_claim_ownership() {
        let props = MotionProps::new()
            .while_focus(Snapshot::new().with_end(AnimatableProperty::X, 10.0))
            .animate(Snapshot::new().with(AnimatableProperty::X, 0.0));
        let resolution = VariantResolver::new(&props).resolve(active(&[GestureKind::Focus]), &PropagatedState::new());
        let x = resolution.property(&AnimatableProperty::X).unwrap();
        assert_eq!(x.owner, Owner::Gesture(GestureKind::Focus));
        assert_eq!(x.value, None);
        assert_eq!(x.end_value, Some(10.0.into()));
    }

    #[test]
    fn test_base_layer_from_animate() {
        let props = MotionProps::new()
            .variants(Variants::new().with("visible", Snapshot::new().with(AnimatableProperty::Opacity, 1.0)))
            .animate("visible");
        let resolution = VariantResolver::new(&props).resolve(GestureSet::new(), &PropagatedState::new());
        let layer = resolution.layer(Owner::Base).unwrap();
        assert_eq!(layer.label.as_deref(), Some("visible"));
        assert_eq!(resolution.owner_of(&AnimatableProperty::Opacity), Owner::Base);
    }

    #[test]
    fn test_inherited_label_resolves_against_own_variants() {
        let props = MotionProps::new()
            .variants(Variants::new().with("hidden", Snapshot::new().with(AnimatableProperty::Opacity, 0.2)));
        let mut propagated = PropagatedState::new();
        propagated.set(
            GestureKind::Hover,
            Some(InheritedLabel {
                label: "hidden".to_string(),
                active: true,
            }),
        );

        // The child's own hover flag is irrelevant for an inherited label
        let resolution = VariantResolver::new(&props).resolve(GestureSet::new(), &propagated);
        let opacity = resolution.property(&AnimatableProperty::Opacity).unwrap();
        assert_eq!(opacity.owner, Owner::Gesture(GestureKind::Hover));
        assert_eq!(opacity.value, Some(0.2.into()));

        let isolated = MotionProps::new()
            .variants(Variants::new().with("hidden", Snapshot::new().with(AnimatableProperty::Opacity, 0.2)))
            .inherit(false);
        assert!(VariantResolver::new(&isolated).resolve(GestureSet::new(), &propagated).layers.is_empty());
    }

    #[test]
    fn test_own_binding_beats_inherited_label() {
        let props = MotionProps::new()
            .variants(
                Variants::new()
                    .with("outer", Snapshot::new().with(AnimatableProperty::Opacity, 0.1))
                    .with("inner", Snapshot::new().with(AnimatableProperty::Opacity, 0.9)),
            )
            .while_hover("inner");
        let mut propagated = PropagatedState::new();
        propagated.set(
            GestureKind::Hover,
            Some(InheritedLabel {
                label: "outer".to_string(),
                active: true,
            }),
        );

        let resolver = VariantResolver::new(&props);
        assert!(resolver.resolve(GestureSet::new(), &propagated).layers.is_empty());
        let resolution = resolver.resolve(active(&[GestureKind::Hover]), &propagated);
        assert_eq!(resolution.property(&AnimatableProperty::Opacity).unwrap().value, Some(0.9.into()));
    }

    #[test]
    fn test_missing_variant_falls_through() {
        let props = MotionProps::new()
            .variants(Variants::new().with("hovering", Snapshot::new().with(AnimatableProperty::Scale, 1.1)))
            .while_tap("nope")
            .while_hover("hovering");
        let resolution = VariantResolver::new(&props)
            .resolve(active(&[GestureKind::Hover, GestureKind::Tap]), &PropagatedState::new());
        assert_eq!(resolution.layers.len(), 1);
        assert_eq!(
            resolution.owner_of(&AnimatableProperty::Scale),
            Owner::Gesture(GestureKind::Hover)
        );
    }
}
