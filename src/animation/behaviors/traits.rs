//! Core trait for blend strategies.

use std::sync::Arc;

use glam::Vec3;

use super::Staggered;
use crate::registry::{Element, ElementMotion};

/// Family-wide values shared by every element during one blend pass.
///
/// Computed once per family per frame, before the per-element pass, and
/// read-only during it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendFrame {
    /// Smoothed family progress in `[0, 1]`.
    pub progress: f32,
    /// Host elapsed time in seconds.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
}

/// Maps family progress to one element's position.
///
/// Two implementations exist: [`super::Staggered`] evaluates a closed-form
/// phase-staggered blend (suitable for shader evaluation), and
/// [`super::WeightedLag`] runs a per-element first-order lag filter on the
/// host. Both land every element exactly on its target once progress is 1
/// and has been held long enough for the lag filter to settle.
pub trait BlendStrategy: Send + Sync {
    /// Base position for `element` this frame, before any idle overlay.
    ///
    /// May update `motion.position`; must not depend on any other element.
    fn position(
        &self,
        frame: &BlendFrame,
        element: &Element,
        motion: &mut ElementMotion,
    ) -> Vec3;

    /// Optional name for debugging/logging.
    fn name(&self) -> &'static str {
        "unnamed"
    }

    /// The closed-form staggered parameters, when this strategy can be
    /// evaluated on the GPU from per-family uniforms.
    fn as_staggered(&self) -> Option<&Staggered> {
        None
    }
}

/// Type alias for shared strategy references.
pub type SharedStrategy = Arc<dyn BlendStrategy>;

/// Create a shared strategy from any BlendStrategy implementation.
#[must_use]
pub fn shared<S: BlendStrategy + 'static>(strategy: S) -> SharedStrategy {
    Arc::new(strategy)
}

/// Linear interpolation that returns the endpoints exactly at `t ≤ 0`,
/// `t ≥ 1`, and for coincident endpoints.
#[inline]
#[must_use]
pub fn mix(start: Vec3, end: Vec3, t: f32) -> Vec3 {
    if t >= 1.0 || start == end {
        return end;
    }
    if t <= 0.0 {
        return start;
    }
    start + (end - start) * t
}
