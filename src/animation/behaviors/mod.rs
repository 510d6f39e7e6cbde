//! Blend strategies map family progress to per-element positions.
//!
//! Strategies are interchangeable behind [`BlendStrategy`]; a family picks
//! one at build time depending on whether its per-element work belongs on a
//! parallel numeric backend ([`Staggered`]) or on the host with individually
//! addressable transforms ([`WeightedLag`]).

mod staggered;
mod traits;
mod weighted_lag;

pub use staggered::Staggered;
pub use traits::{mix, shared, BlendFrame, BlendStrategy, SharedStrategy};
pub use weighted_lag::{WeightedLag, DEFAULT_WEIGHT, MIN_WEIGHT};
