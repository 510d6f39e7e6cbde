//! Element storage for one family.
//!
//! The registry is built once from a scatter batch, a target batch and an
//! attribute factory, and is never patched afterwards: endpoints, phase and
//! static attributes are immutable. The only per-frame state is the
//! [`ElementMotion`] slice, which the blend evaluator owns for writing.

mod attributes;

use glam::Vec3;

pub use attributes::{
    AttributeFactory, AttributeRules, ElementAttributes, Palette,
};

use crate::sampling::PointBatch;
use crate::util::random::RandomSource;

/// One animated element. Immutable after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    id: u32,
    scatter: Vec3,
    target: Vec3,
    phase: f32,
    attributes: ElementAttributes,
}

/// Largest phase below 1.
pub const MAX_PHASE: f32 = 0.999_999_94;

impl Element {
    /// Element with explicit endpoints and phase.
    ///
    /// The phase is clamped into `[0, 1)`; a NaN phase becomes 0.
    #[must_use]
    pub fn new(
        id: u32,
        scatter: Vec3,
        target: Vec3,
        phase: f32,
        attributes: ElementAttributes,
    ) -> Self {
        Self {
            id,
            scatter,
            target,
            phase: if phase.is_nan() {
                0.0
            } else {
                phase.clamp(0.0, MAX_PHASE)
            },
            attributes,
        }
    }

    /// Stable identifier within the family.
    #[inline]
    #[must_use]
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Position in the scattered cloud.
    #[inline]
    #[must_use]
    pub fn scatter(&self) -> Vec3 {
        self.scatter
    }

    /// Position in the assembled shape.
    #[inline]
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Desynchronising phase in `[0, 1)`.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Static visual attributes.
    #[inline]
    #[must_use]
    pub fn attributes(&self) -> &ElementAttributes {
        &self.attributes
    }
}

/// Per-frame transient state of one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementMotion {
    /// Current blended position (before the idle overlay).
    pub position: Vec3,
    /// Accumulated idle spin angle in radians.
    pub spin: f32,
}

/// Stats gathered while building a family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Scatter placements that used the fallback sampler.
    pub scatter_fallbacks: usize,
    /// Target placements that used the fallback sampler.
    pub target_fallbacks: usize,
}

/// All elements of one family plus their transient motion.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    elements: Vec<Element>,
    motion: Vec<ElementMotion>,
    report: BuildReport,
}

impl ElementRegistry {
    /// Build `count` elements.
    ///
    /// Each element draws its scatter point, then its target point, then a
    /// phase, then its attributes. The two endpoints are uncorrelated.
    /// `current` starts at the scatter point.
    pub fn build(
        count: usize,
        mut scatter: PointBatch<'_>,
        mut target: PointBatch<'_>,
        factory: &mut dyn AttributeFactory,
        rng: &mut dyn RandomSource,
    ) -> Self {
        let mut elements = Vec::with_capacity(count);
        for index in 0..count {
            let scatter_pos = scatter.draw(rng).position;
            let target_pos = target.draw(rng).position;
            let phase = rng.next_unit();
            let attributes = factory.attributes(index, rng);
            elements.push(Element::new(
                index as u32,
                scatter_pos,
                target_pos,
                phase,
                attributes,
            ));
        }
        let report = BuildReport {
            scatter_fallbacks: scatter.fallbacks(),
            target_fallbacks: target.fallbacks(),
        };
        if report.scatter_fallbacks + report.target_fallbacks > 0 {
            log::debug!(
                "placement fell back {} scatter / {} target times for {count} elements",
                report.scatter_fallbacks,
                report.target_fallbacks,
            );
        }
        Self::from_elements(elements).with_report(report)
    }

    /// Registry over pre-built elements, each starting at its scatter point.
    #[must_use]
    pub fn from_elements(elements: Vec<Element>) -> Self {
        let motion = elements
            .iter()
            .map(|e| ElementMotion {
                position: e.scatter,
                spin: 0.0,
            })
            .collect();
        Self {
            elements,
            motion,
            report: BuildReport::default(),
        }
    }

    fn with_report(mut self, report: BuildReport) -> Self {
        self.report = report;
        self
    }

    /// Place every element at the endpoint matching `assembled`.
    pub fn reset_motion(&mut self, assembled: bool) {
        for (m, e) in self.motion.iter_mut().zip(&self.elements) {
            m.position = if assembled { e.target } else { e.scatter };
            m.spin = 0.0;
        }
    }

    /// Number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the family has no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Immutable elements.
    #[inline]
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Current motion state, parallel to [`Self::elements`].
    #[inline]
    #[must_use]
    pub fn motion(&self) -> &[ElementMotion] {
        &self.motion
    }

    /// Elements alongside writable motion, for the blend pass.
    #[inline]
    pub fn split_mut(&mut self) -> (&[Element], &mut [ElementMotion]) {
        (&self.elements, &mut self.motion)
    }

    /// Placement statistics from the build.
    #[inline]
    #[must_use]
    pub fn report(&self) -> BuildReport {
        self.report
    }
}
