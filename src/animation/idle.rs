//! Idle overlay: small organic motion while a family is not assembled.
//!
//! Position sway/jitter, spin and scale pulse are multiplied by
//! [`idle_weight`], which is exactly zero at progress 1 so a settled shape
//! never shimmers. Sparkle is a color effect and keeps running.

use std::f32::consts::TAU;

use glam::{Quat, Vec3};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::registry::{Element, ElementMotion};

/// Idle overlay amplitude at the given progress.
#[inline]
#[must_use]
pub fn idle_weight(progress: f32) -> f32 {
    (1.0 - progress).clamp(0.0, 1.0)
}

/// Per-family idle motion parameters.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema,
)]
#[serde(default)]
pub struct IdleMotion {
    /// Slow positional sway amplitude (world units).
    pub sway_amplitude: f32,
    /// Sway angular frequency (radians per second).
    pub sway_frequency: f32,
    /// Fast positional jitter amplitude (world units).
    pub jitter_amplitude: f32,
    /// Relative scale pulse amplitude.
    pub pulse_amplitude: f32,
    /// Pulse angular frequency (radians per second).
    pub pulse_frequency: f32,
    /// Peak color boost of a sparkle.
    pub sparkle_intensity: f32,
    /// Sparkle angular frequency (radians per second).
    pub sparkle_speed: f32,
}

impl Default for IdleMotion {
    fn default() -> Self {
        Self {
            sway_amplitude: 0.3,
            sway_frequency: 0.8,
            jitter_amplitude: 0.02,
            pulse_amplitude: 0.0,
            pulse_frequency: 2.0,
            sparkle_intensity: 0.0,
            sparkle_speed: 3.0,
        }
    }
}

impl IdleMotion {
    /// No overlay at all.
    pub const STILL: Self = Self {
        sway_amplitude: 0.0,
        sway_frequency: 0.0,
        jitter_amplitude: 0.0,
        pulse_amplitude: 0.0,
        pulse_frequency: 0.0,
        sparkle_intensity: 0.0,
        sparkle_speed: 0.0,
    };

    /// Positional offset for one element.
    #[must_use]
    pub fn offset(&self, elapsed: f32, phase: f32, weight: f32) -> Vec3 {
        if weight <= 0.0 {
            return Vec3::ZERO;
        }
        let p = phase * TAU;
        let w = elapsed * self.sway_frequency;
        let sway = Vec3::new(
            (w + p).sin(),
            (w * 0.7 + p * 2.0).cos() * 0.5,
            (w * 0.9 + p * 3.0).cos(),
        ) * self.sway_amplitude;
        let j = elapsed * 11.0 + p * 5.0;
        let jitter = Vec3::new(
            (j * 1.3).sin(),
            (j * 1.7).cos(),
            (j * 1.1).sin(),
        ) * self.jitter_amplitude;
        (sway + jitter) * weight
    }

    /// Accumulate spin for this frame and return the idle rotation.
    ///
    /// The spin angle keeps accumulating (scaled by `weight`) so a tumble
    /// slows down rather than snapping; the rotation then slerps back to
    /// identity as `weight` reaches zero.
    pub fn rotation(
        &self,
        element: &Element,
        motion: &mut ElementMotion,
        delta: f32,
        weight: f32,
    ) -> Quat {
        let attrs = element.attributes();
        if delta > 0.0 {
            motion.spin = (motion.spin + attrs.spin_speed * delta * weight) % TAU;
        }
        if weight <= 0.0 || attrs.spin_speed == 0.0 {
            return Quat::IDENTITY;
        }
        let spun = Quat::from_axis_angle(attrs.rotation_axis, motion.spin);
        Quat::IDENTITY.slerp(spun, weight)
    }

    /// Scale multiplier (pulse).
    #[must_use]
    pub fn scale(&self, elapsed: f32, phase: f32, weight: f32) -> f32 {
        if weight <= 0.0 {
            return 1.0;
        }
        1.0 + self.pulse_amplitude
            * (elapsed * self.pulse_frequency + phase * TAU).sin()
            * weight
    }

    /// Sparkled color. Independent of progress.
    #[must_use]
    pub fn color(&self, base: Vec3, elapsed: f32, phase: f32) -> Vec3 {
        if self.sparkle_intensity <= 0.0 {
            return base;
        }
        let wave =
            0.5 + 0.5 * (elapsed * self.sparkle_speed + phase * TAU * 7.0).sin();
        base * (1.0 + self.sparkle_intensity * wave.powi(8))
    }
}
