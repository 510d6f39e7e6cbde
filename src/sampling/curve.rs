//! Catmull-Rom strands for curve-following families.
//!
//! Pure Vec3 → Vec3 evaluation, no GPU dependencies.

use std::f32::consts::TAU;

use glam::Vec3;

use super::PointSampler;
use crate::error::{require_positive, MorphError};
use crate::util::random::RandomSource;

/// Interpolating spline through an ordered list of control points.
///
/// The parameter `t ∈ [0, 1]` is spread uniformly over spans, not by arc
/// length. End tangents come from reflected phantom points, so the curve is
/// C¹ through every control point.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveSpec {
    points: Vec<Vec3>,
}

impl CurveSpec {
    /// Validated curve. Fails with fewer than two points or any non-finite
    /// coordinate.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidCurve`] with fewer than two points and
    /// [`MorphError::InvalidVolume`] for non-finite coordinates.
    pub fn new(points: Vec<Vec3>) -> Result<Self, MorphError> {
        if points.len() < 2 {
            return Err(MorphError::InvalidCurve {
                points: points.len(),
            });
        }
        if points.iter().any(|p| !p.is_finite()) {
            return Err(MorphError::InvalidVolume(
                "curve control points must be finite".to_owned(),
            ));
        }
        Ok(Self { points })
    }

    /// Tapered helix winding up a cone, used as a garland path.
    ///
    /// `samples` control points run from the base (`y_offset − height/2`,
    /// full radius) to the tip (zero radius).
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidVolume`] for a non-positive height or
    /// radius and [`MorphError::InvalidCurve`] for fewer than two samples.
    pub fn spiral(
        height: f32,
        base_radius: f32,
        y_offset: f32,
        turns: f32,
        samples: usize,
    ) -> Result<Self, MorphError> {
        require_positive("spiral height", height)?;
        require_positive("spiral base radius", base_radius)?;
        if samples < 2 {
            return Err(MorphError::InvalidCurve { points: samples });
        }
        let bottom = y_offset - height * 0.5;
        let points = (0..samples)
            .map(|i| {
                let h = i as f32 / (samples - 1) as f32;
                let angle = h * TAU * turns;
                let r = base_radius * (1.0 - h);
                Vec3::new(angle.cos() * r, bottom + h * height, angle.sin() * r)
            })
            .collect();
        Self::new(points)
    }

    /// Control points in order.
    #[must_use]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Point on the curve at `t` (clamped to `[0, 1]`).
    #[must_use]
    pub fn sample_along(&self, t: f32) -> Vec3 {
        let n = self.points.len();
        let spans = n - 1;
        let scaled = t.clamp(0.0, 1.0) * spans as f32;
        let i = (scaled as usize).min(spans - 1);
        let local = scaled - i as f32;

        let p1 = self.points[i];
        let p2 = self.points[i + 1];
        let p0 = if i == 0 { p1 * 2.0 - p2 } else { self.points[i - 1] };
        let p3 = if i + 2 >= n {
            p2 * 2.0 - p1
        } else {
            self.points[i + 2]
        };
        catmull_rom_point(p0, p1, p2, p3, local)
    }

    /// Point near the curve: uniform `t`, then independent per-axis offsets
    /// in `[-radial_jitter, radial_jitter)`.
    pub fn sample_near<R: RandomSource + ?Sized>(
        &self,
        radial_jitter: f32,
        rng: &mut R,
    ) -> Vec3 {
        let on_curve = self.sample_along(rng.next_unit());
        on_curve
            + Vec3::new(rng.signed(), rng.signed(), rng.signed())
                * radial_jitter
    }

    /// Sampler drawing near this curve with a fixed jitter.
    #[must_use]
    pub fn halo(self, radial_jitter: f32) -> CurveHalo {
        CurveHalo {
            curve: self,
            radial_jitter,
        }
    }
}

/// A curve plus the radial jitter used when sampling around it.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveHalo {
    /// Underlying strand.
    pub curve: CurveSpec,
    /// Per-axis jitter half-width.
    pub radial_jitter: f32,
}

impl CurveHalo {
    /// Same halo with the jitter multiplied by `factor`.
    #[must_use]
    pub fn loosened(&self, factor: f32) -> Self {
        Self {
            curve: self.curve.clone(),
            radial_jitter: self.radial_jitter * factor,
        }
    }
}

impl PointSampler for CurveHalo {
    fn sample(&self, rng: &mut dyn RandomSource) -> Vec3 {
        self.curve.sample_near(self.radial_jitter, rng)
    }
}

/// Uniform Catmull-Rom segment between `p1` and `p2`.
#[inline]
fn catmull_rom_point(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::random::seeded;

    fn distance_to_line(p: Vec3, origin: Vec3, dir: Vec3) -> f32 {
        let d = dir.normalize();
        let v = p - origin;
        (v - d * v.dot(d)).length()
    }

    #[test]
    fn too_few_points_fail_fast() {
        assert!(matches!(
            CurveSpec::new(vec![Vec3::ZERO]),
            Err(MorphError::InvalidCurve { points: 1 })
        ));
        assert!(CurveSpec::new(Vec::new()).is_err());
        assert!(CurveSpec::spiral(10.0, 4.0, 0.0, 3.0, 1).is_err());
    }

    #[test]
    fn collinear_points_stay_on_line() {
        let dir = Vec3::new(1.0, 2.0, -0.5);
        let origin = Vec3::new(0.5, -1.0, 3.0);
        let curve = CurveSpec::new(vec![
            origin,
            origin + dir * 0.7,
            origin + dir * 2.5,
            origin + dir * 3.0,
        ])
        .unwrap();
        for i in 0..=200 {
            let p = curve.sample_along(i as f32 / 200.0);
            assert!(distance_to_line(p, origin, dir) < 1e-4);
        }
    }

    #[test]
    fn passes_through_control_points() {
        let points = vec![
            Vec3::ZERO,
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, 1.0, 1.0),
            Vec3::new(4.0, 4.0, -2.0),
        ];
        let curve = CurveSpec::new(points.clone()).unwrap();
        for (k, p) in points.iter().enumerate() {
            let t = k as f32 / 3.0;
            assert!((curve.sample_along(t) - *p).length() < 1e-4, "point {k}");
        }
    }

    #[test]
    fn tangent_is_continuous_across_knots() {
        let curve = CurveSpec::new(vec![
            Vec3::ZERO,
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(3.0, 1.0, 1.0),
            Vec3::new(4.0, 4.0, -2.0),
        ])
        .unwrap();
        let h = 1e-3;
        let knot = 1.0 / 3.0;
        let left = (curve.sample_along(knot) - curve.sample_along(knot - h)) / h;
        let right = (curve.sample_along(knot + h) - curve.sample_along(knot)) / h;
        // A polyline would jump by several units here.
        assert!((left - right).length() < 0.3, "{left} vs {right}");
    }

    #[test]
    fn two_point_curve_is_a_segment() {
        let curve = CurveSpec::new(vec![Vec3::ZERO, Vec3::X * 4.0]).unwrap();
        assert!((curve.sample_along(0.5) - Vec3::X * 2.0).length() < 1e-5);
        assert!((curve.sample_along(1.0) - Vec3::X * 4.0).length() < 1e-5);
        assert!((curve.sample_along(2.0) - Vec3::X * 4.0).length() < 1e-5);
    }

    #[test]
    fn near_samples_stay_within_jitter_box() {
        let curve = CurveSpec::new(vec![Vec3::ZERO, Vec3::X * 10.0]).unwrap();
        let mut rng = seeded(4);
        for _ in 0..1000 {
            let p = curve.sample_near(0.2, &mut rng);
            assert!(p.y.abs() <= 0.2 && p.z.abs() <= 0.2);
            assert!(p.x >= -0.2 && p.x <= 10.2);
        }
    }

    #[test]
    fn spiral_winds_from_base_to_tip() {
        let curve = CurveSpec::spiral(10.0, 4.0, 0.0, 2.0, 33).unwrap();
        let base = curve.points()[0];
        let tip = curve.points()[32];
        assert!((base - Vec3::new(4.0, -5.0, 0.0)).length() < 1e-4);
        assert!((tip - Vec3::new(0.0, 5.0, 0.0)).length() < 1e-4);
    }
}
