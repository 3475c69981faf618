//! Transition configuration.
//!
//! This module provides:
//! - `TransitionKind`: Tweened interpolation or an instant jump
//! - `TransitionSpec`: Timing for one animation task
//! - `TransitionConfig`: Shared default plus per-property overrides for a node
//!
//! # Example
//!
//! ```ignore
//! // Fade opacity over 300ms, snap everything else.
//! let config = TransitionConfig::all(TransitionSpec::instant())
//!     .with_property(AnimatableProperty::Opacity, TransitionSpec::tween(300.0));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use rune_config::MotionConfig;
use tracing::warn;

use super::easing::EasingFunction;
use super::types::AnimatableProperty;

/// How a task moves its store toward the target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransitionKind {
    /// Interpolate over time.
    Tween {
        /// Duration in milliseconds.
        duration_ms: f32,
        /// Delay before the value starts moving, in milliseconds.
        delay_ms: f32,
        /// Timing curve.
        easing: EasingFunction,
    },
    /// Write the target immediately; the task settles synchronously.
    Instant,
}

/// Specification for one animation task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionSpec {
    /// Interpolation mode and timing.
    pub kind: TransitionKind,
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self::tween(300.0)
    }
}

impl TransitionSpec {
    /// Tween over `duration_ms` with the default easing.
    pub fn tween(duration_ms: f32) -> Self {
        Self {
            kind: TransitionKind::Tween {
                duration_ms,
                delay_ms: 0.0,
                easing: EasingFunction::Ease,
            },
        }
    }

    /// No interpolation: targets are applied immediately.
    pub fn instant() -> Self {
        Self {
            kind: TransitionKind::Instant,
        }
    }

    /// Set the delay. Ignored for instant transitions.
    pub fn with_delay(mut self, delay: f32) -> Self {
        if let TransitionKind::Tween { delay_ms, .. } = &mut self.kind {
            *delay_ms = delay;
        }
        self
    }

    /// Set the easing function. Ignored for instant transitions.
    pub fn with_easing(mut self, curve: EasingFunction) -> Self {
        if let TransitionKind::Tween { easing, .. } = &mut self.kind {
            *easing = curve;
        }
        self
    }

    /// Whether this spec applies targets without interpolation.
    pub fn is_instant(&self) -> bool {
        matches!(self.kind, TransitionKind::Instant)
    }

    /// Build the engine-wide default from configuration.
    pub fn from_config(config: &MotionConfig) -> Self {
        if config.instant {
            return Self::instant();
        }
        let easing = EasingFunction::from_name(&config.default_easing).unwrap_or_else(|| {
            warn!(
                "unknown easing {:?}, falling back to ease",
                config.default_easing
            );
            EasingFunction::Ease
        });
        Self::tween(config.default_duration_ms.max(0.0))
            .with_delay(config.default_delay_ms.max(0.0))
            .with_easing(easing)
    }
}

/// Transition configuration for a node or a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Default spec for all properties.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_spec: Option<TransitionSpec>,
    /// Per-property specs (override default).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub property_specs: HashMap<AnimatableProperty, TransitionSpec>,
}

impl TransitionConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Config with one spec shared by every property.
    pub fn all(spec: TransitionSpec) -> Self {
        Self {
            default_spec: Some(spec),
            property_specs: HashMap::new(),
        }
    }

    /// Shorthand for `TransitionConfig::all(TransitionSpec::instant())`.
    pub fn instant() -> Self {
        Self::all(TransitionSpec::instant())
    }

    /// Set the shared default spec.
    pub fn with_default(mut self, spec: TransitionSpec) -> Self {
        self.default_spec = Some(spec);
        self
    }

    /// Set a specific spec for a property.
    pub fn with_property(mut self, property: AnimatableProperty, spec: TransitionSpec) -> Self {
        self.property_specs.insert(property, spec);
        self
    }

    /// Spec for a property: the per-property entry, else the shared default.
    pub fn get_spec(&self, property: &AnimatableProperty) -> Option<&TransitionSpec> {
        self.property_specs
            .get(property)
            .or(self.default_spec.as_ref())
    }

    /// Whether anything is configured.
    pub fn has_transitions(&self) -> bool {
        self.default_spec.is_some() || !self.property_specs.is_empty()
    }
}
