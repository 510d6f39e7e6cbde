//! Volume samplers: scatter sphere and tapered shape volume.

use std::f32::consts::TAU;

use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::PointSampler;
use crate::error::{require_non_negative, require_positive, MorphError};
use crate::util::random::RandomSource;

/// Uniform-by-volume sphere centred on the origin.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema,
)]
pub struct ScatterVolumeSpec {
    /// Sphere radius.
    pub radius: f32,
}

impl ScatterVolumeSpec {
    /// Validated sphere of the given radius.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidVolume`] unless `radius` is finite and
    /// positive.
    pub fn new(radius: f32) -> Result<Self, MorphError> {
        let spec = Self { radius };
        spec.validate()?;
        Ok(spec)
    }

    /// Check the radius is finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidVolume`] for a non-positive or
    /// non-finite radius.
    pub fn validate(self) -> Result<(), MorphError> {
        require_positive("scatter radius", self.radius)
    }

    /// Same sphere with its radius multiplied by `factor`.
    #[must_use]
    pub fn loosened(self, factor: f32) -> Self {
        Self {
            radius: self.radius * factor,
        }
    }
}

impl PointSampler for ScatterVolumeSpec {
    fn sample(&self, rng: &mut dyn RandomSource) -> Vec3 {
        sample_scatter(self.radius, rng)
    }
}

/// Random point uniformly distributed by volume inside a sphere.
///
/// The polar angle uses `acos(2v - 1)` so directions are uniform over the
/// sphere's surface, and the radius uses `cbrt(u)` to compensate for the r²
/// growth of shell volume.
pub fn sample_scatter<R: RandomSource + ?Sized>(radius: f32, rng: &mut R) -> Vec3 {
    let theta = rng.angle();
    let phi = (2.0 * rng.next_unit() - 1.0).clamp(-1.0, 1.0).acos();
    let r = radius * rng.next_unit().cbrt();
    spherical(r, theta, phi)
}

/// Uniformly distributed unit direction.
pub fn sample_direction<R: RandomSource + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.angle();
    let phi = (2.0 * rng.next_unit() - 1.0).clamp(-1.0, 1.0).acos();
    spherical(1.0, theta, phi)
}

/// Y-up spherical to cartesian.
#[inline]
fn spherical(r: f32, theta: f32, phi: f32) -> Vec3 {
    let (sin_phi, cos_phi) = phi.sin_cos();
    Vec3::new(
        r * sin_phi * theta.cos(),
        r * cos_phi,
        r * sin_phi * theta.sin(),
    )
}

/// Spiral placement around the shape's vertical axis.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema,
)]
#[serde(default)]
pub struct SpiralSweep {
    /// Full turns from bottom to top.
    pub turns: f32,
    /// Angular offset in radians.
    pub phase: f32,
    /// Half-width of the uniform angular jitter, in radians.
    pub angle_jitter: f32,
}

impl Default for SpiralSweep {
    fn default() -> Self {
        Self {
            turns: 5.0,
            phase: 0.0,
            angle_jitter: 0.3,
        }
    }
}

/// Tapered cone volume with bottom-weighted height sampling.
///
/// Heights span `y_offset ± height / 2`. At relative height `h` (0 = base,
/// 1 = tip) the cross-section radius is `base_radius · (1 − h)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema,
)]
#[serde(default)]
pub struct ShapeVolumeSpec {
    /// Vertical extent.
    pub height: f32,
    /// Cross-section radius at the base.
    pub base_radius: f32,
    /// Centre of the vertical extent.
    pub y_offset: f32,
    /// Exponent applied to the uniform height draw. 1 is uniform, above 1
    /// clusters toward the base, below 1 toward the tip.
    pub bias_exponent: f32,
    /// Optional spiral angle law replacing the uniform azimuth.
    pub spiral: Option<SpiralSweep>,
    /// Radial distance as a fraction of the taper radius, drawn uniformly
    /// from `[min, max]`. `[0.8, 1.0]` hugs the surface, `[0.5, 1.2]` fills.
    pub radial_range: [f32; 2],
    /// Per-axis surface noise as a fraction of the taper radius.
    pub surface_jitter: f32,
}

impl Default for ShapeVolumeSpec {
    fn default() -> Self {
        Self {
            height: 14.0,
            base_radius: 5.5,
            y_offset: 0.0,
            bias_exponent: 1.0,
            spiral: None,
            radial_range: [0.5, 1.2],
            surface_jitter: 0.0,
        }
    }
}

impl ShapeVolumeSpec {
    /// Check every parameter is in range.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidVolume`] describing the first
    /// out-of-range parameter.
    pub fn validate(&self) -> Result<(), MorphError> {
        require_positive("shape height", self.height)?;
        require_positive("shape base radius", self.base_radius)?;
        require_positive("bias exponent", self.bias_exponent)?;
        require_non_negative("surface jitter", self.surface_jitter)?;
        if !self.y_offset.is_finite() {
            return Err(MorphError::InvalidVolume(format!(
                "y offset must be finite, got {}",
                self.y_offset
            )));
        }
        let [min, max] = self.radial_range;
        require_non_negative("radial range min", min)?;
        if !max.is_finite() || max < min {
            return Err(MorphError::InvalidVolume(format!(
                "radial range [{min}, {max}] is empty"
            )));
        }
        if let Some(spiral) = &self.spiral {
            if !spiral.turns.is_finite() || !spiral.phase.is_finite() {
                return Err(MorphError::InvalidVolume(
                    "spiral turns and phase must be finite".to_owned(),
                ));
            }
            require_non_negative("spiral angle jitter", spiral.angle_jitter)?;
        }
        Ok(())
    }

    /// Lowest y of the volume.
    #[inline]
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y_offset - self.height * 0.5
    }

    /// Same volume with a wider base, for looser fallback placement.
    #[must_use]
    pub fn loosened(&self, factor: f32) -> Self {
        Self {
            base_radius: self.base_radius * factor,
            ..*self
        }
    }
}

impl PointSampler for ShapeVolumeSpec {
    fn sample(&self, rng: &mut dyn RandomSource) -> Vec3 {
        sample_weighted_volume(self, rng)
    }
}

/// Random point inside a [`ShapeVolumeSpec`].
pub fn sample_weighted_volume<R: RandomSource + ?Sized>(
    spec: &ShapeVolumeSpec,
    rng: &mut R,
) -> Vec3 {
    let h = rng.next_unit().powf(spec.bias_exponent);
    let y = spec.bottom() + h * spec.height;
    let taper = spec.base_radius * (1.0 - h);

    let angle = match &spec.spiral {
        Some(spiral) => {
            h * TAU * spiral.turns
                + spiral.phase
                + rng.range(-spiral.angle_jitter, spiral.angle_jitter)
        }
        None => rng.angle(),
    };

    let [min, max] = spec.radial_range;
    let radial = taper * rng.range(min, max);
    let mut point = Vec3::new(angle.cos() * radial, y, angle.sin() * radial);

    if spec.surface_jitter > 0.0 {
        let amount = spec.surface_jitter * taper;
        point += Vec3::new(rng.signed(), rng.signed(), rng.signed()) * amount;
    }
    point
}
