//! Critically damped family progress.
//!
//! Each family holds one [`FamilyState`]. Every frame the host hands it the
//! currently desired [`TargetState`] and the frame delta; progress moves
//! toward 0 or 1 with `p ← target − (target − p) · exp(−Δ/τ)`. The update
//! never overshoots, is exact under variable frame deltas, and reverses
//! smoothly when the target flips mid-transition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::MorphError;

/// Remaining distance below which progress snaps onto its target.
pub const SETTLE_EPSILON: f32 = 1e-5;

/// The two configurations a family morphs between.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TargetState {
    /// Free-floating cloud (progress 0).
    #[default]
    Scattered,
    /// Assembled shape (progress 1).
    Assembled,
}

impl TargetState {
    /// Progress value this state pulls toward.
    #[inline]
    #[must_use]
    pub fn progress(self) -> f32 {
        match self {
            Self::Scattered => 0.0,
            Self::Assembled => 1.0,
        }
    }

    /// The opposite state.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Scattered => Self::Assembled,
            Self::Assembled => Self::Scattered,
        }
    }
}

/// One damped exponential step toward `target`.
///
/// Non-positive or non-finite deltas leave `progress` unchanged; an infinite
/// delta lands exactly on the target.
#[inline]
#[must_use]
pub fn damp(progress: f32, target: f32, delta: f32, tau: f32) -> f32 {
    if delta.is_nan() || delta <= 0.0 {
        return progress;
    }
    let next = target - (target - progress) * (-delta / tau).exp();
    next.clamp(0.0, 1.0)
}

/// Smoothed progress of one family.
#[derive(Debug, Clone, PartialEq)]
pub struct FamilyState {
    progress: f32,
    target: TargetState,
    tau: f32,
}

impl FamilyState {
    /// State resting at `initial` with time constant `tau` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidFamily`] unless `tau` is finite and
    /// positive.
    pub fn new(tau: f32, initial: TargetState) -> Result<Self, MorphError> {
        if !tau.is_finite() || tau <= 0.0 {
            return Err(MorphError::InvalidFamily(format!(
                "damping time constant must be finite and > 0, got {tau}"
            )));
        }
        Ok(Self {
            progress: initial.progress(),
            target: initial,
            tau,
        })
    }

    /// Advance by `delta` seconds toward `target`. Returns the new progress.
    ///
    /// Idempotent for repeated calls with the same target and zero delta.
    pub fn update(&mut self, target: TargetState, delta: f32) -> f32 {
        if target != self.target {
            log::debug!(
                "target {:?} -> {:?} at progress {:.3}",
                self.target,
                target,
                self.progress
            );
            self.target = target;
        }
        let goal = target.progress();
        self.progress = damp(self.progress, goal, delta, self.tau);
        if (goal - self.progress).abs() < SETTLE_EPSILON {
            self.progress = goal;
        }
        self.progress
    }

    /// Current progress in `[0, 1]`.
    #[inline]
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Last requested target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> TargetState {
        self.target
    }

    /// Damping time constant in seconds.
    #[inline]
    #[must_use]
    pub fn tau(&self) -> f32 {
        self.tau
    }

    /// Whether progress has reached its target.
    #[inline]
    #[must_use]
    pub fn is_settled(&self) -> bool {
        // Exact: `update` snaps onto the target.
        self.progress == self.target.progress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E_INV: f32 = 0.367_879_44;

    #[test]
    fn zero_delta_is_idempotent() {
        let mut state = FamilyState::new(0.8, TargetState::Scattered).unwrap();
        let _ = state.update(TargetState::Assembled, 0.3);
        let before = state.progress();
        for _ in 0..100 {
            assert_eq!(state.update(TargetState::Assembled, 0.0), before);
        }
    }

    #[test]
    fn huge_delta_reaches_target_without_overshoot() {
        let mut state = FamilyState::new(0.5, TargetState::Scattered).unwrap();
        assert_eq!(state.update(TargetState::Assembled, f32::INFINITY), 1.0);
        assert_eq!(state.update(TargetState::Scattered, 1e9), 0.0);
        assert!(state.is_settled());
    }

    #[test]
    fn progress_stays_in_unit_interval() {
        let mut state = FamilyState::new(0.05, TargetState::Scattered).unwrap();
        let mut target = TargetState::Assembled;
        for i in 0..2000 {
            if i % 37 == 0 {
                target = target.toggled();
            }
            let p = state.update(target, (i % 7) as f32 * 0.13);
            assert!((0.0..=1.0).contains(&p));
        }
    }

    #[test]
    fn end_to_end_exponential_schedule() {
        let mut state = FamilyState::new(1.0, TargetState::Scattered).unwrap();
        let p = state.update(TargetState::Assembled, 1.0);
        assert!((p - (1.0 - E_INV)).abs() < 1e-5, "after 1s: {p}");
        let p = state.update(TargetState::Assembled, 2.0);
        let expected = 1.0 - (-3.0f32).exp();
        assert!((p - expected).abs() < 1e-5, "after 3s: {p}");
    }

    #[test]
    fn variable_deltas_compose() {
        let mut coarse = FamilyState::new(0.7, TargetState::Scattered).unwrap();
        let mut fine = coarse.clone();
        let _ = coarse.update(TargetState::Assembled, 0.6);
        for _ in 0..6 {
            let _ = fine.update(TargetState::Assembled, 0.1);
        }
        assert!((coarse.progress() - fine.progress()).abs() < 1e-5);
    }

    #[test]
    fn round_trip_returns_to_start() {
        let mut state = FamilyState::new(0.4, TargetState::Scattered).unwrap();
        for _ in 0..600 {
            let _ = state.update(TargetState::Assembled, 1.0 / 60.0);
        }
        for _ in 0..600 {
            let _ = state.update(TargetState::Scattered, 1.0 / 60.0);
        }
        assert!(state.progress() < 1e-4, "progress {}", state.progress());
    }

    #[test]
    fn mid_transition_reversal_is_continuous() {
        let mut state = FamilyState::new(1.0, TargetState::Scattered).unwrap();
        let up = state.update(TargetState::Assembled, 0.5);
        let down = state.update(TargetState::Scattered, 1.0 / 60.0);
        assert!(down < up);
        assert!(up - down < 0.02);
    }

    #[test]
    fn smaller_tau_is_snappier() {
        let mut light = FamilyState::new(0.3, TargetState::Scattered).unwrap();
        let mut heavy = FamilyState::new(1.5, TargetState::Scattered).unwrap();
        let l = light.update(TargetState::Assembled, 0.5);
        let h = heavy.update(TargetState::Assembled, 0.5);
        assert!(l > h);
    }

    #[test]
    fn negative_and_nan_deltas_are_ignored() {
        assert_eq!(damp(0.4, 1.0, -1.0, 1.0), 0.4);
        assert_eq!(damp(0.4, 1.0, f32::NAN, 1.0), 0.4);
    }

    #[test]
    fn invalid_tau_is_rejected() {
        assert!(FamilyState::new(0.0, TargetState::Scattered).is_err());
        assert!(FamilyState::new(-1.0, TargetState::Scattered).is_err());
        assert!(FamilyState::new(f32::NAN, TargetState::Assembled).is_err());
    }

    #[test]
    fn initial_state_sets_progress() {
        let state = FamilyState::new(1.0, TargetState::Assembled).unwrap();
        assert_eq!(state.progress(), 1.0);
        assert!(state.is_settled());
    }
}
