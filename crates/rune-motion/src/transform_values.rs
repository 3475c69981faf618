//! Forward/inverse mappings for properties the host cannot interpolate natively.
//!
//! A mapped property is animated in *declared* space (the numbers written in
//! variants) but stored in *host* space. Every write to its store goes through
//! `forward`, and every read used for an animation origin or for restoration
//! goes through `inverse`.
//!
//! ```ignore
//! // `size` drives both width and height on the host.
//! let values = TransformValues::new().with(
//!     AnimatableProperty::custom("size"),
//!     TransformMapping::identity()
//!         .with_outputs([AnimatableProperty::Width, AnimatableProperty::Height]),
//! );
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::types::{AnimatableProperty, AnimatableValue};

/// Value conversion function shared between nodes.
pub type ValueMapFn = Arc<dyn Fn(&AnimatableValue) -> AnimatableValue + Send + Sync>;

/// A forward/inverse pair for one property.
#[derive(Clone)]
pub struct TransformMapping {
    forward: ValueMapFn,
    inverse: ValueMapFn,
    outputs: Vec<AnimatableProperty>,
}

impl fmt::Debug for TransformMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformMapping")
            .field("outputs", &self.outputs)
            .finish_non_exhaustive()
    }
}

impl TransformMapping {
    /// Create a mapping from a forward conversion and its inverse.
    pub fn new(
        forward: impl Fn(&AnimatableValue) -> AnimatableValue + Send + Sync + 'static,
        inverse: impl Fn(&AnimatableValue) -> AnimatableValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            forward: Arc::new(forward),
            inverse: Arc::new(inverse),
            outputs: Vec::new(),
        }
    }

    /// A mapping that leaves values unchanged, useful with [`Self::with_outputs`].
    pub fn identity() -> Self {
        Self::new(|v| v.clone(), |v| v.clone())
    }

    /// Numeric mapping built from two `f64` conversions. Non-numeric values pass through.
    pub fn numeric(
        forward: impl Fn(f64) -> f64 + Send + Sync + 'static,
        inverse: impl Fn(f64) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self::new(
            move |v| match v.as_f64() {
                Some(n) => forward(n).into(),
                None => v.clone(),
            },
            move |v| match v.as_f64() {
                Some(n) => inverse(n).into(),
                None => v.clone(),
            },
        )
    }

    /// Host attributes that receive the forward-mapped value when rendering.
    ///
    /// Without outputs the property renders under its own name.
    pub fn with_outputs(mut self, outputs: impl IntoIterator<Item = AnimatableProperty>) -> Self {
        self.outputs = outputs.into_iter().collect();
        self
    }

    /// Declared value to host value.
    pub fn forward(&self, value: &AnimatableValue) -> AnimatableValue {
        (self.forward)(value)
    }

    /// Host value back to declared value.
    pub fn inverse(&self, value: &AnimatableValue) -> AnimatableValue {
        (self.inverse)(value)
    }

    /// Host attributes this mapping renders to.
    pub fn outputs(&self) -> &[AnimatableProperty] {
        &self.outputs
    }
}

/// Per-node table of property mappings.
#[derive(Debug, Clone, Default)]
pub struct TransformValues {
    mappings: HashMap<AnimatableProperty, TransformMapping>,
}

impl TransformValues {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mapping for a property.
    pub fn with(mut self, property: AnimatableProperty, mapping: TransformMapping) -> Self {
        self.insert(property, mapping);
        self
    }

    /// Register or replace a mapping for a property.
    pub fn insert(&mut self, property: AnimatableProperty, mapping: TransformMapping) {
        self.mappings.insert(property, mapping);
    }

    /// Mapping registered for a property.
    pub fn get(&self, property: &AnimatableProperty) -> Option<&TransformMapping> {
        self.mappings.get(property)
    }

    /// Whether the table has no mappings.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Convert a declared value into what the store holds.
    pub fn to_store(&self, property: &AnimatableProperty, value: &AnimatableValue) -> AnimatableValue {
        match self.mappings.get(property) {
            Some(mapping) => mapping.forward(value),
            None => value.clone(),
        }
    }

    /// Convert a stored value back into declared space.
    pub fn from_store(&self, property: &AnimatableProperty, value: &AnimatableValue) -> AnimatableValue {
        match self.mappings.get(property) {
            Some(mapping) => mapping.inverse(value),
            None => value.clone(),
        }
    }

    /// Host attributes a stored value renders to.
    pub fn host_attributes(
        &self,
        property: &AnimatableProperty,
        stored: &AnimatableValue,
    ) -> Vec<(AnimatableProperty, AnimatableValue)> {
        match self.mappings.get(property) {
            Some(mapping) if !mapping.outputs().is_empty() => mapping
                .outputs()
                .iter()
                .map(|out| (out.clone(), stored.clone()))
                .collect(),
            _ => vec![(property.clone(), stored.clone())],
        }
    }
}
