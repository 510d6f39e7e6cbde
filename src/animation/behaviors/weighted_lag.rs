//! Host-side weighted lag filter for rigid instances.

use glam::Vec3;

use super::traits::{mix, BlendFrame, BlendStrategy};
use crate::error::MorphError;
use crate::registry::{Element, ElementMotion};
use crate::util::easing::EasingFunction;

/// Floor applied to element weights before dividing.
pub const MIN_WEIGHT: f32 = 1e-3;

/// Weight assumed for elements built without one.
pub const DEFAULT_WEIGHT: f32 = 1.0;

/// First-order lag toward the instantaneous blend target.
///
/// Each frame the element moves a fraction
/// `clamp(Δ · base_rate / (max(weight, MIN_WEIGHT) + offset), 0, 1)` of the
/// way from its current position to `mix(scatter, target, ease(progress))`.
/// Heavier elements take smaller steps and trail further behind.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedLag {
    base_rate: f32,
    offset: f32,
    easing: EasingFunction,
}

impl WeightedLag {
    /// Create a weighted lag strategy.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidFamily`] unless `base_rate > 0` and
    /// `offset >= 0`.
    pub fn new(
        base_rate: f32,
        offset: f32,
        easing: EasingFunction,
    ) -> Result<Self, MorphError> {
        if !base_rate.is_finite() || base_rate <= 0.0 {
            return Err(MorphError::InvalidFamily(format!(
                "lag base rate must be finite and > 0, got {base_rate}"
            )));
        }
        if !offset.is_finite() || offset < 0.0 {
            return Err(MorphError::InvalidFamily(format!(
                "lag weight offset must be finite and >= 0, got {offset}"
            )));
        }
        Ok(Self {
            base_rate,
            offset,
            easing,
        })
    }

    /// Fraction of the remaining distance covered this frame.
    #[inline]
    #[must_use]
    pub fn lerp_factor(&self, delta: f32, weight: f32) -> f32 {
        let weight = weight.max(MIN_WEIGHT);
        let factor = delta * (self.base_rate / (weight + self.offset));
        if factor.is_nan() {
            return 0.0;
        }
        factor.clamp(0.0, 1.0)
    }
}

impl Default for WeightedLag {
    fn default() -> Self {
        Self {
            base_rate: 2.0,
            offset: 0.5,
            easing: EasingFunction::CubicInOut,
        }
    }
}

impl BlendStrategy for WeightedLag {
    fn position(
        &self,
        frame: &BlendFrame,
        element: &Element,
        motion: &mut ElementMotion,
    ) -> Vec3 {
        let goal = mix(
            element.scatter(),
            element.target(),
            self.easing.evaluate(frame.progress),
        );
        let weight = element.attributes().weight.unwrap_or(DEFAULT_WEIGHT);
        let factor = self.lerp_factor(frame.delta, weight);
        if factor > 0.0 {
            motion.position = mix(motion.position, goal, factor);
        }
        motion.position
    }

    fn name(&self) -> &'static str {
        "weighted-lag"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ElementAttributes;

    fn element(weight: Option<f32>) -> Element {
        Element::new(
            0,
            Vec3::new(6.0, -2.0, 0.0),
            Vec3::new(0.0, 1.0, -1.0),
            0.2,
            ElementAttributes {
                weight,
                ..ElementAttributes::default()
            },
        )
    }

    #[test]
    fn zero_weight_is_floored() {
        let lag = WeightedLag::default();
        let f = lag.lerp_factor(0.001, 0.0);
        assert!(f.is_finite());
        assert_eq!(f, lag.lerp_factor(0.001, MIN_WEIGHT));
    }

    #[test]
    fn heavier_elements_move_slower() {
        let lag = WeightedLag::default();
        assert!(lag.lerp_factor(0.016, 0.2) > lag.lerp_factor(0.016, 0.9));
    }

    #[test]
    fn factor_is_clamped() {
        let lag = WeightedLag::default();
        assert_eq!(lag.lerp_factor(100.0, 0.5), 1.0);
        assert_eq!(lag.lerp_factor(0.0, 0.5), 0.0);
        assert_eq!(lag.lerp_factor(-1.0, 0.5), 0.0);
    }

    #[test]
    fn zero_delta_holds_position() {
        let lag = WeightedLag::default();
        let e = element(Some(0.5));
        let mut motion = ElementMotion {
            position: e.scatter(),
            spin: 0.0,
        };
        let frame = BlendFrame {
            progress: 1.0,
            elapsed: 0.0,
            delta: 0.0,
        };
        assert_eq!(lag.position(&frame, &e, &mut motion), e.scatter());
    }

    #[test]
    fn converges_to_target_when_assembled() {
        let lag = WeightedLag::default();
        for weight in [None, Some(0.1), Some(1.0)] {
            let e = element(weight);
            let mut motion = ElementMotion {
                position: e.scatter(),
                spin: 0.0,
            };
            let frame = BlendFrame {
                progress: 1.0,
                elapsed: 0.0,
                delta: 1.0 / 60.0,
            };
            for _ in 0..1200 {
                let _ = lag.position(&frame, &e, &mut motion);
            }
            assert!((motion.position - e.target()).length() < 1e-4);
        }
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(WeightedLag::new(0.0, 0.5, EasingFunction::Linear).is_err());
        assert!(WeightedLag::new(1.0, -0.5, EasingFunction::Linear).is_err());
        assert!(WeightedLag::new(1.0, 0.0, EasingFunction::Linear).is_ok());
    }
}
