//! Morph choreography: progress smoothing, blend strategies, idle overlay.
//!
//! Per frame and per family, [`progress::FamilyState`] turns the desired
//! [`TargetState`] into a smoothed progress, then [`BlendEvaluator`] maps
//! that single value onto every element.

pub mod behaviors;
pub mod evaluator;
pub mod idle;
pub mod progress;

pub use behaviors::{
    shared, BlendFrame, BlendStrategy, SharedStrategy, Staggered, WeightedLag,
};
pub use evaluator::BlendEvaluator;
pub use idle::{idle_weight, IdleMotion};
pub use progress::{FamilyState, TargetState};
