//! Phase-staggered blend for point clouds.

use glam::Vec3;

use super::traits::{mix, BlendFrame, BlendStrategy};
use crate::error::MorphError;
use crate::registry::{Element, ElementMotion};
use crate::util::easing::EasingFunction;

/// Cascading blend where each element's start is delayed by its phase.
///
/// `delayed_t = clamp(ease(progress) · gain − phase · spread, 0, 1)`.
/// Elements with a higher phase start later and finish later. Requiring
/// `gain ≥ 1 + spread` guarantees every phase in `[0, 1)` reaches exactly 1
/// at progress 1, and `delayed_t` is 0 for every element at progress 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Staggered {
    gain: f32,
    spread: f32,
    easing: EasingFunction,
}

impl Staggered {
    /// Create a staggered strategy.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidFamily`] if `spread` is negative or
    /// `gain < 1 + spread`.
    pub fn new(
        gain: f32,
        spread: f32,
        easing: EasingFunction,
    ) -> Result<Self, MorphError> {
        if !spread.is_finite() || spread < 0.0 {
            return Err(MorphError::InvalidFamily(format!(
                "stagger spread must be finite and >= 0, got {spread}"
            )));
        }
        if !gain.is_finite() || gain < 1.0 + spread {
            return Err(MorphError::InvalidFamily(format!(
                "stagger gain {gain} must be at least 1 + spread ({})",
                1.0 + spread
            )));
        }
        Ok(Self {
            gain,
            spread,
            easing,
        })
    }

    /// Time multiplier `k`.
    #[inline]
    #[must_use]
    pub fn gain(&self) -> f32 {
        self.gain
    }

    /// Phase delay scale.
    #[inline]
    #[must_use]
    pub fn spread(&self) -> f32 {
        self.spread
    }

    /// Easing applied to progress before the stagger.
    #[inline]
    #[must_use]
    pub fn easing(&self) -> EasingFunction {
        self.easing
    }

    /// Per-element interpolation factor.
    #[inline]
    #[must_use]
    pub fn delayed_t(&self, progress: f32, phase: f32) -> f32 {
        self.delayed_t_eased(self.easing.evaluate(progress), phase)
    }

    /// Per-element interpolation factor from an already eased progress.
    /// This is the form a shader evaluates from [`FamilyUniforms`].
    ///
    /// [`FamilyUniforms`]: crate::sink::FamilyUniforms
    #[inline]
    #[must_use]
    pub fn delayed_t_eased(&self, eased: f32, phase: f32) -> f32 {
        (eased * self.gain - phase * self.spread).clamp(0.0, 1.0)
    }
}

impl Default for Staggered {
    fn default() -> Self {
        Self {
            gain: 1.4,
            spread: 0.4,
            easing: EasingFunction::CubicInOut,
        }
    }
}

impl BlendStrategy for Staggered {
    fn position(
        &self,
        frame: &BlendFrame,
        element: &Element,
        motion: &mut ElementMotion,
    ) -> Vec3 {
        let t = self.delayed_t(frame.progress, element.phase());
        motion.position = mix(element.scatter(), element.target(), t);
        motion.position
    }

    fn name(&self) -> &'static str {
        "staggered"
    }

    fn as_staggered(&self) -> Option<&Staggered> {
        Some(self)
    }
}
