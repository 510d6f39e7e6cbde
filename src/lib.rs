// -- Lint policy ---------------------------------------------------------
// Crate-wide lint levels live in Cargo.toml `[lints]`, including the
// per-lint allowances for sampling math. A group deny here would override
// those allowances, so only individual lints are tightened below.

// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::excessive_nesting)]

//! Procedural scatter-to-shape morphing for point and instance families.
//!
//! Morphe places thousands of small elements at two endpoints each, a
//! random point in a scattered spherical cloud and a random point in an
//! assembled shape (a tapered cone, or a halo around a smooth curve), and
//! blends between them under one exponentially damped progress value per
//! family.
//!
//! # Key entry points
//!
//! - [`scene::MorphScene`] - named families advanced once per frame
//! - [`options::Options`] - construction-time configuration with TOML
//!   presets
//! - [`sampling`] - scatter, shape and curve samplers plus rejection
//!   placement
//! - [`animation`] - damped progress, blend strategies and idle motion
//! - [`sink`] - per-frame transforms and GPU-ready Pod layouts
//!
//! # Frame flow
//!
//! Each frame the caller passes a [`scene::FrameInput`] (elapsed time,
//! delta and the requested [`animation::TargetState`]). Every family damps
//! its progress toward the target, evaluates each element's blended
//! position, layers the idle overlay on top, and submits the resulting
//! [`sink::ElementTransform`]s to a [`sink::TransformSink`].
//!
//! Randomness is injected through [`util::random::RandomSource`], so a
//! seeded scene is fully reproducible.

pub mod animation;
pub mod error;
pub mod options;
pub mod registry;
pub mod sampling;
pub mod scene;
pub mod sink;
pub mod util;

pub use error::MorphError;
pub use options::Options;
pub use scene::{FrameInput, MorphScene};
