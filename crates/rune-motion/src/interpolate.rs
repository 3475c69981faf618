//! Interpolation for animatable values.
//!
//! Interpolation happens in declared space: transform-mapped properties are
//! inverse-mapped before they reach this module and forward-mapped after.

use super::types::AnimatableValue;

/// Trait for types that can be interpolated between two values.
///
/// When `t = 0.0`, returns `self`; when `t = 1.0`, returns `to`.
pub trait Interpolate: Sized {
    /// Interpolate between self and another value.
    fn interpolate(&self, to: &Self, t: f32) -> Self;
}

#[inline]
fn lerp_f64(from: f64, to: f64, t: f32) -> f64 {
    from + (to - from) * t as f64
}

#[inline]
fn lerp_f32(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        lerp_f64(*self, *to, t)
    }
}

impl Interpolate for [f32; 4] {
    /// Per-component RGBA interpolation.
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        [
            lerp_f32(self[0], to[0], t),
            lerp_f32(self[1], to[1], t),
            lerp_f32(self[2], to[2], t),
            lerp_f32(self[3], to[3], t),
        ]
    }
}

impl Interpolate for AnimatableValue {
    /// Both values must be the same variant. Mismatched kinds cannot be
    /// blended, so they switch to `to` at the end of the animation.
    fn interpolate(&self, to: &Self, t: f32) -> Self {
        match (self, to) {
            (Self::F64 { value: from }, Self::F64 { value: to_val }) => Self::F64 {
                value: from.interpolate(to_val, t),
            },
            (Self::Color { rgba: from }, Self::Color { rgba: to_val }) => Self::Color {
                rgba: from.interpolate(to_val, t),
            },
            _ => {
                if t >= 1.0 {
                    to.clone()
                } else {
                    self.clone()
                }
            }
        }
    }
}
