//! Shared utilities for the morph engine.
//!
//! Easing curves, the injectable random source, and frame timing.

pub mod easing;
pub mod frame_timing;
pub mod random;
