//! Procedural point samplers for the two endpoint configurations.
//!
//! - [`volume`] - uniform-by-volume sphere (scatter cloud) and the tapered,
//!   bottom-weighted cone used for assembled shapes.
//! - [`curve`] - Catmull-Rom strands for garland-like families.
//! - [`placement`] - minimum-separation rejection sampling with a bounded
//!   retry budget.
//!
//! Samplers are stateless; all randomness comes from the caller's
//! [`RandomSource`].

pub mod curve;
pub mod placement;
pub mod volume;

use glam::Vec3;

pub use curve::CurveSpec;
pub use placement::{Placement, PointBatch, SeparationRule};
pub use volume::{ScatterVolumeSpec, ShapeVolumeSpec, SpiralSweep};

use crate::util::random::RandomSource;

/// Anything that can draw a 3D point from a random source.
pub trait PointSampler: Send + Sync {
    /// Draw one point. Successive calls are independent.
    fn sample(&self, rng: &mut dyn RandomSource) -> Vec3;
}

impl<F> PointSampler for F
where
    F: Fn(&mut dyn RandomSource) -> Vec3 + Send + Sync,
{
    fn sample(&self, rng: &mut dyn RandomSource) -> Vec3 {
        self(rng)
    }
}

/// Boxed sampler, as stored in family blueprints.
pub type BoxedSampler = Box<dyn PointSampler>;
