//! Easing functions for morph progress.
//!
//! Reshape a linear progress value into a slow-start/slow-end curve so the
//! assembly does not look mechanical. All curves map `[0, 1]` onto `[0, 1]`
//! and fix both endpoints.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Easing function variants for morph curves.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Cubic ease-in-out: `4t³` below one half, `1 − (2 − 2t)³ / 2` above.
    CubicInOut,
    /// Cubic Hermite interpolation with configurable control points.
    /// Formula: c1·3t(1-t)² + c2·3(1-t)t² + t³
    CubicHermite {
        /// First inner control value.
        c1: f32,
        /// Second inner control value.
        c2: f32,
    },
}

impl EasingFunction {
    /// Default easing function: symmetric cubic in-out.
    pub const DEFAULT: Self = Self::CubicInOut;

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    /// Returns the eased value, also in [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Self::CubicInOut => ease_in_out_cubic(t),
            Self::CubicHermite { c1, c2 } => {
                let omt = 1.0 - t;
                c1 * 3.0 * t * omt * omt + c2 * 3.0 * omt * t * t + t * t * t
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Cubic ease-in-out on an already clamped `t`.
#[inline]
#[must_use]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_in_out_fixed_points() {
        let f = EasingFunction::CubicInOut;
        assert_eq!(f.evaluate(0.0), 0.0);
        assert_eq!(f.evaluate(1.0), 1.0);
        assert!((f.evaluate(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_cubic_in_out_monotonic() {
        let f = EasingFunction::CubicInOut;
        let mut prev = f.evaluate(0.0);
        for i in 1..=1000 {
            let v = f.evaluate(i as f32 / 1000.0);
            assert!(v >= prev, "not monotonic at step {i}: {v} < {prev}");
            prev = v;
        }
    }

    #[test]
    fn test_cubic_in_out_is_slow_at_ends() {
        let f = EasingFunction::CubicInOut;
        assert!(f.evaluate(0.1) < 0.1);
        assert!(f.evaluate(0.9) > 0.9);
    }

    #[test]
    fn test_linear_endpoints() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(0.0), 0.0);
        assert_eq!(linear.evaluate(0.5), 0.5);
        assert_eq!(linear.evaluate(1.0), 1.0);
    }

    #[test]
    fn test_cubic_hermite_endpoints() {
        let hermite = EasingFunction::CubicHermite { c1: 0.33, c2: 1.0 };
        assert_eq!(hermite.evaluate(0.0), 0.0);
        assert!((hermite.evaluate(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_input_clamping() {
        let f = EasingFunction::CubicInOut;
        assert_eq!(f.evaluate(-0.5), 0.0);
        assert_eq!(f.evaluate(1.5), 1.0);

        let quad_out = EasingFunction::QuadraticOut;
        assert_eq!(quad_out.evaluate(-1.0), 0.0);
        assert_eq!(quad_out.evaluate(0.5), 0.75);
    }

    #[test]
    fn test_default_is_cubic_in_out() {
        assert_eq!(EasingFunction::default(), EasingFunction::CubicInOut);
    }
}
