//! Minimum-separation placement with bounded retries.
//!
//! Each draw tries up to `max_attempts` candidates against everything the
//! batch has already accepted. When the budget runs out it draws once from a
//! looser fallback sampler and accepts unconditionally, so building N points
//! costs at most `N · max_attempts` primary draws plus N fallback draws.

use glam::Vec3;

use super::PointSampler;
use crate::error::MorphError;
use crate::util::random::RandomSource;

/// Separation constraint for one batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparationRule {
    /// Minimum distance between any two accepted points.
    pub min_distance: f32,
    /// Candidate draws before falling back.
    pub max_attempts: u32,
}

impl SeparationRule {
    /// Validated rule.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidFamily`] for a negative or non-finite
    /// distance or a zero attempt budget.
    pub fn new(min_distance: f32, max_attempts: u32) -> Result<Self, MorphError> {
        if !min_distance.is_finite() || min_distance < 0.0 {
            return Err(MorphError::InvalidFamily(format!(
                "min separation must be finite and >= 0, got {min_distance}"
            )));
        }
        if max_attempts == 0 {
            return Err(MorphError::InvalidFamily(
                "separation needs at least one attempt".to_owned(),
            ));
        }
        Ok(Self {
            min_distance,
            max_attempts,
        })
    }
}

/// One accepted point and whether it came from the fallback path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Accepted position.
    pub position: Vec3,
    /// True when the retry budget ran out and the looser sampler was used.
    pub fallback: bool,
}

/// Draw one point at least `rule.min_distance` from every point in
/// `accepted`, or fall back after `rule.max_attempts` failures.
pub fn place_with_min_separation(
    accepted: &[Vec3],
    sampler: &dyn PointSampler,
    fallback: &dyn PointSampler,
    rule: SeparationRule,
    rng: &mut dyn RandomSource,
) -> Placement {
    let min_sq = rule.min_distance * rule.min_distance;
    for _ in 0..rule.max_attempts {
        let candidate = sampler.sample(rng);
        if accepted
            .iter()
            .all(|p| p.distance_squared(candidate) >= min_sq)
        {
            return Placement {
                position: candidate,
                fallback: false,
            };
        }
    }
    Placement {
        position: fallback.sample(rng),
        fallback: true,
    }
}

struct Separation<'a> {
    rule: SeparationRule,
    fallback: &'a dyn PointSampler,
}

/// Stateful batch of draws from one sampler, optionally separated.
pub struct PointBatch<'a> {
    sampler: &'a dyn PointSampler,
    separation: Option<Separation<'a>>,
    accepted: Vec<Vec3>,
    fallbacks: usize,
}

impl<'a> PointBatch<'a> {
    /// Independent draws with no spacing constraint.
    #[must_use]
    pub fn free(sampler: &'a dyn PointSampler) -> Self {
        Self {
            sampler,
            separation: None,
            accepted: Vec::new(),
            fallbacks: 0,
        }
    }

    /// Draws kept `rule.min_distance` apart, falling back to `fallback`.
    #[must_use]
    pub fn separated(
        sampler: &'a dyn PointSampler,
        rule: SeparationRule,
        fallback: &'a dyn PointSampler,
    ) -> Self {
        Self {
            sampler,
            separation: Some(Separation { rule, fallback }),
            accepted: Vec::new(),
            fallbacks: 0,
        }
    }

    /// Draw the next point of the batch.
    pub fn draw(&mut self, rng: &mut dyn RandomSource) -> Placement {
        let Some(separation) = &self.separation else {
            return Placement {
                position: self.sampler.sample(rng),
                fallback: false,
            };
        };
        let placement = place_with_min_separation(
            &self.accepted,
            self.sampler,
            separation.fallback,
            separation.rule,
            rng,
        );
        self.accepted.push(placement.position);
        if placement.fallback {
            self.fallbacks += 1;
        }
        placement
    }

    /// Number of fallback placements so far.
    #[must_use]
    pub fn fallbacks(&self) -> usize {
        self.fallbacks
    }
}
