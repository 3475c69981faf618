//! Label propagation from parents to descendants.
//!
//! Propagation is label-based: a parent never pushes values to its children,
//! only the variant label it is bound to for a gesture and whether that
//! gesture is active on the parent. Each child then resolves the label against
//! its own variants table.
//!
//! For every gesture kind a node forwards:
//! - its own label, with its own active flag, if it binds the kind to a variant;
//! - nothing, if it binds the kind inline;
//! - whatever it received, if it has no binding of its own.
//!
//! A node that opts out with `inherit(false)` receives nothing, and therefore
//! forwards only its own labels.

use super::gesture::GestureSet;
use super::types::GestureKind;
use super::variants::{Binding, MotionProps};

/// An ancestor's label for one gesture kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InheritedLabel {
    pub label: String,
    /// Whether the ancestor that declared the label has the gesture active.
    pub active: bool,
}

/// Per-kind inherited labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagatedState([Option<InheritedLabel>; GestureKind::COUNT]);

impl PropagatedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: GestureKind) -> Option<&InheritedLabel> {
        self.0[kind.index()].as_ref()
    }

    pub fn set(&mut self, kind: GestureKind, label: Option<InheritedLabel>) {
        self.0[kind.index()] = label;
    }

    /// Whether an inherited label for `kind` is active.
    pub fn is_active(&self, kind: GestureKind) -> bool {
        self.get(kind).is_some_and(|l| l.active)
    }
}

/// What a node with `props` accepts from a parent that forwards `from_parent`.
pub fn receive(props: &MotionProps, from_parent: &PropagatedState) -> PropagatedState {
    if props.inherit {
        from_parent.clone()
    } else {
        PropagatedState::default()
    }
}

/// What a node forwards to its children, given what it received.
pub fn forward(props: &MotionProps, active: GestureSet, received: &PropagatedState) -> PropagatedState {
    let mut out = PropagatedState::default();
    for kind in GestureKind::PRIORITY {
        let label = match props.binding(kind) {
            Some(Binding::Variant(label)) => Some(InheritedLabel {
                label: label.clone(),
                active: active.is_active(kind),
            }),
            Some(Binding::Inline(_)) => None,
            None => received.get(kind).cloned(),
        };
        out.set(kind, label);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AnimatableProperty;
    use crate::variants::Snapshot;

    fn hovering(active: bool) -> GestureSet {
        let mut set = GestureSet::new();
        set.set(GestureKind::Hover, active);
        set
    }

    #[test]
    fn test_own_variant_label_is_forwarded_with_own_state() {
        let props = MotionProps::new().while_hover("hidden");
        let out = forward(&props, hovering(true), &PropagatedState::new());
        assert_eq!(
            out.get(GestureKind::Hover),
            Some(&InheritedLabel {
                label: "hidden".to_string(),
                active: true
            })
        );
        assert!(out.get(GestureKind::Tap).is_none());

        let out = forward(&props, hovering(false), &PropagatedState::new());
        assert!(!out.is_active(GestureKind::Hover));
    }

    #[test]
    fn test_own_binding_terminates_inherited_label() {
        let mut received = PropagatedState::new();
        received.set(
            GestureKind::Hover,
            Some(InheritedLabel {
                label: "outer".to_string(),
                active: true,
            }),
        );

        let props = MotionProps::new().while_hover("inner");
        let out = forward(&props, hovering(false), &received);
        assert_eq!(out.get(GestureKind::Hover).map(|l| l.label.as_str()), Some("inner"));
        assert!(!out.is_active(GestureKind::Hover));

        let inline = MotionProps::new().while_hover(Snapshot::new().with(AnimatableProperty::Opacity, 0.0));
        assert!(forward(&inline, hovering(true), &received).get(GestureKind::Hover).is_none());
    }

    #[test]
    fn test_unbound_node_passes_through() {
        let mut received = PropagatedState::new();
        received.set(
            GestureKind::Tap,
            Some(InheritedLabel {
                label: "pressed".to_string(),
                active: true,
            }),
        );
        let props = MotionProps::new();
        // The node's own activity does not change an inherited flag
        let out = forward(&props, GestureSet::new(), &received);
        assert_eq!(out, received);
    }

    #[test]
    fn test_inherit_false_receives_nothing() {
        let mut from_parent = PropagatedState::new();
        from_parent.set(
            GestureKind::Hover,
            Some(InheritedLabel {
                label: "hidden".to_string(),
                active: true,
            }),
        );
        let isolated = MotionProps::new().inherit(false);
        assert_eq!(receive(&isolated, &from_parent), PropagatedState::new());
        assert_eq!(receive(&MotionProps::new(), &from_parent), from_parent);
    }
}
