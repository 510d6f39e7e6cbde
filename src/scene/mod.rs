//! Authoritative morph scene: named families advanced once per frame.
//!
//! Each [`Family`] owns its elements, its damped progress and its blend
//! evaluator. The scene routes one [`FrameInput`] to every family in
//! insertion order and hands each family's transforms to a
//! [`TransformSink`].

mod family;

use std::path::Path;

pub use family::Family;
use rustc_hash::FxHashMap;

use crate::animation::TargetState;
use crate::error::MorphError;
use crate::options::Options;
use crate::sink::TransformSink;
use crate::util::random::{seeded, RandomSource};

// ---------------------------------------------------------------------------
// Frame input
// ---------------------------------------------------------------------------

/// Everything a frame needs from the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInput {
    /// Seconds since the scene started, for idle motion.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Requested target for every family without an override.
    pub target: TargetState,
}

impl FrameInput {
    /// Frame with a sanitised delta: negative or non-finite becomes zero.
    #[must_use]
    pub fn new(elapsed: f32, delta: f32, target: TargetState) -> Self {
        Self {
            elapsed,
            delta: sanitize_delta(delta),
            target,
        }
    }
}

/// Negative or non-finite deltas count as zero.
fn sanitize_delta(delta: f32) -> f32 {
    if delta.is_finite() {
        delta.max(0.0)
    } else {
        0.0
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// All families of one morph, addressable by name.
#[derive(Debug, Default)]
pub struct MorphScene {
    /// Families in insertion order.
    families: Vec<Family>,
    index: FxHashMap<String, usize>,
}

impl MorphScene {
    /// Empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every family in `options` from `rng`, in declaration order.
    ///
    /// # Errors
    ///
    /// Returns the first [`MorphError`] raised while building a family,
    /// including duplicate family names.
    pub fn from_options(
        options: &Options,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, MorphError> {
        let mut scene = Self::new();
        for family_options in &options.families {
            scene.add_family(Family::build(family_options, rng)?)?;
        }
        let total: usize =
            scene.families.iter().map(|f| f.registry().len()).sum();
        log::info!(
            "Morph scene ready: {} families, {total} elements",
            scene.families.len()
        );
        Ok(scene)
    }

    /// Build from `options`, seeding from `options.seed` when present and
    /// from the thread RNG otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_options`].
    pub fn build(options: &Options) -> Result<Self, MorphError> {
        options.seed.map_or_else(
            || Self::from_options(options, &mut rand::rng()),
            |seed| Self::from_options(options, &mut seeded(seed)),
        )
    }

    /// Load a TOML preset, falling back to the default scene if the file
    /// is missing or malformed.
    ///
    /// # Errors
    ///
    /// Only fails if the scene described by a successfully loaded preset
    /// (or the default scene) is itself invalid.
    pub fn from_preset_or_default(path: &Path) -> Result<Self, MorphError> {
        let options = Options::load(path).unwrap_or_else(|e| {
            log::warn!(
                "Failed to load preset '{}': {e}; using default scene",
                path.display()
            );
            Options::default()
        });
        Self::build(&options)
    }

    /// Replace every family with a fresh build from `options`.
    ///
    /// On error the current families are left untouched.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_options`].
    pub fn rebuild(
        &mut self,
        options: &Options,
        rng: &mut dyn RandomSource,
    ) -> Result<(), MorphError> {
        *self = Self::from_options(options, rng)?;
        Ok(())
    }

    /// Append a family. Names must be unique within the scene.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidFamily`] if a family with the same name
    /// exists.
    pub fn add_family(&mut self, family: Family) -> Result<(), MorphError> {
        if self.index.contains_key(family.name()) {
            return Err(MorphError::InvalidFamily(format!(
                "duplicate family name '{}'",
                family.name()
            )));
        }
        let _ = self
            .index
            .insert(family.name().to_owned(), self.families.len());
        self.families.push(family);
        Ok(())
    }

    /// Advance every family by one frame and submit its transforms.
    pub fn advance<S: TransformSink + ?Sized>(
        &mut self,
        frame: FrameInput,
        sink: &mut S,
    ) {
        let frame = FrameInput::new(frame.elapsed, frame.delta, frame.target);
        for family in &mut self.families {
            let _ = family.advance(frame.target, frame.elapsed, frame.delta);
            sink.submit(family.name(), family.transforms());
        }
    }

    /// Pin one family to a target independently of the scene-wide request.
    /// `None` clears the override.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidFamily`] if no family is called `name`.
    pub fn set_family_target_override(
        &mut self,
        name: &str,
        target: Option<TargetState>,
    ) -> Result<(), MorphError> {
        let family = self.family_mut(name).ok_or_else(|| {
            MorphError::InvalidFamily(format!("no family named '{name}'"))
        })?;
        family.set_target_override(target);
        Ok(())
    }

    /// Family by name.
    #[must_use]
    pub fn family(&self, name: &str) -> Option<&Family> {
        self.index.get(name).map(|&i| &self.families[i])
    }

    /// Mutable family by name.
    pub fn family_mut(&mut self, name: &str) -> Option<&mut Family> {
        self.index.get(name).map(|&i| &mut self.families[i])
    }

    /// Families in insertion order.
    #[must_use]
    pub fn families(&self) -> &[Family] {
        &self.families
    }

    /// Whether every family has settled on its current target.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.families.iter().all(|f| f.state().is_settled())
    }
}
