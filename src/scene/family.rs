//! One animated family: registry, damped progress and blend evaluator.

use glam::Vec3;

use crate::animation::{
    shared, BlendEvaluator, BlendFrame, FamilyState, SharedStrategy,
    Staggered, TargetState, WeightedLag,
};
use crate::error::MorphError;
use crate::options::{FamilyOptions, ShapeOptions, StrategyOptions};
use crate::registry::{AttributeRules, ElementRegistry, Palette};
use crate::sampling::curve::CurveHalo;
use crate::sampling::{
    CurveSpec, PointBatch, PointSampler, ScatterVolumeSpec, SeparationRule,
    ShapeVolumeSpec,
};
use crate::sink::{ElementTransform, FamilyUniforms, PointVertex};
use crate::util::random::RandomSource;

/// A named group of elements sharing one shape, damping and strategy.
#[derive(Debug)]
pub struct Family {
    name: String,
    registry: ElementRegistry,
    state: FamilyState,
    evaluator: BlendEvaluator,
    target_override: Option<TargetState>,
    transforms: Vec<ElementTransform>,
}

impl Family {
    /// Family over an already built registry.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        registry: ElementRegistry,
        state: FamilyState,
        evaluator: BlendEvaluator,
    ) -> Self {
        Self {
            name: name.into(),
            transforms: Vec::with_capacity(registry.len()),
            registry,
            state,
            evaluator,
            target_override: None,
        }
    }

    /// Build a family from its options.
    ///
    /// All validation happens here; a family that builds never fails during
    /// [`Self::advance`].
    ///
    /// # Errors
    ///
    /// Returns [`MorphError`] for any invalid volume, curve, strategy,
    /// damping, separation or attribute setting.
    pub fn build(
        options: &FamilyOptions,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, MorphError> {
        if options.name.is_empty() {
            return Err(MorphError::InvalidFamily(
                "family name must not be empty".to_owned(),
            ));
        }
        let state = FamilyState::new(options.damping, options.initial_state)?;
        let strategy = build_strategy(&options.strategy)?;
        let mut rules = build_attribute_rules(options)?;

        let scatter = ScatterVolumeSpec::new(options.scatter_radius)?;
        let target = TargetShape::build(&options.shape)?;

        let registry = match &options.separation {
            Some(sep) => {
                let rule =
                    SeparationRule::new(sep.min_distance, sep.max_attempts)?;
                if !sep.fallback_scale.is_finite() || sep.fallback_scale < 1.0 {
                    return Err(MorphError::InvalidFamily(format!(
                        "fallback scale must be >= 1, got {}",
                        sep.fallback_scale
                    )));
                }
                let loose_scatter = scatter.loosened(sep.fallback_scale);
                let loose_target = target.loosened(sep.fallback_scale);
                ElementRegistry::build(
                    options.count as usize,
                    PointBatch::separated(&scatter, rule, &loose_scatter),
                    PointBatch::separated(
                        target.sampler(),
                        rule,
                        loose_target.sampler(),
                    ),
                    &mut rules,
                    rng,
                )
            }
            None => ElementRegistry::build(
                options.count as usize,
                PointBatch::free(&scatter),
                PointBatch::free(target.sampler()),
                &mut rules,
                rng,
            ),
        };

        let mut family = Self::new(
            options.name.clone(),
            registry,
            state,
            BlendEvaluator::new(strategy, options.idle),
        );
        if options.initial_state == TargetState::Assembled {
            family.registry.reset_motion(true);
        }
        log::info!(
            "Built family '{}': {} elements, {} blend, tau {:.2}s",
            family.name,
            family.registry.len(),
            family.evaluator.strategy().name(),
            options.damping,
        );
        Ok(family)
    }

    /// Advance progress toward `target` (or this family's override) and
    /// recompute every element. Returns this frame's transforms.
    ///
    /// A negative or non-finite `delta` counts as zero.
    pub fn advance(
        &mut self,
        target: TargetState,
        elapsed: f32,
        delta: f32,
    ) -> &[ElementTransform] {
        let delta = super::sanitize_delta(delta);
        let target = self.target_override.unwrap_or(target);
        let progress = self.state.update(target, delta);
        let frame = BlendFrame {
            progress,
            elapsed,
            delta,
        };
        self.evaluator
            .evaluate(&frame, &mut self.registry, &mut self.transforms);
        &self.transforms
    }

    /// Family name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current smoothed progress.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.state.progress()
    }

    /// Damped progress state.
    #[must_use]
    pub fn state(&self) -> &FamilyState {
        &self.state
    }

    /// Element storage.
    #[must_use]
    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Blend evaluator.
    #[must_use]
    pub fn evaluator(&self) -> &BlendEvaluator {
        &self.evaluator
    }

    /// Transforms computed by the last [`Self::advance`].
    #[must_use]
    pub fn transforms(&self) -> &[ElementTransform] {
        &self.transforms
    }

    /// Pin this family to a target regardless of the scene-wide request,
    /// or `None` to follow the scene again.
    pub fn set_target_override(&mut self, target: Option<TargetState>) {
        self.target_override = target;
    }

    /// Static vertices for shader-side evaluation.
    #[must_use]
    pub fn point_vertices(&self) -> Vec<PointVertex> {
        self.registry
            .elements()
            .iter()
            .map(PointVertex::from)
            .collect()
    }

    /// Per-frame uniforms for shader-side evaluation, when the family uses
    /// the staggered strategy.
    #[must_use]
    pub fn uniforms(&self, elapsed: f32) -> Option<FamilyUniforms> {
        self.evaluator.strategy().as_staggered().map(|s| {
            FamilyUniforms::staggered(s, self.state.progress(), elapsed)
        })
    }
}

fn build_strategy(
    options: &StrategyOptions,
) -> Result<SharedStrategy, MorphError> {
    Ok(match *options {
        StrategyOptions::Staggered {
            gain,
            spread,
            easing,
        } => shared(Staggered::new(gain, spread, easing)?),
        StrategyOptions::WeightedLag {
            base_rate,
            offset,
            easing,
        } => shared(WeightedLag::new(base_rate, offset, easing)?),
    })
}

fn build_attribute_rules(
    options: &FamilyOptions,
) -> Result<AttributeRules, MorphError> {
    let attrs = &options.attributes;
    let palette = Palette::new(
        attrs
            .palette
            .iter()
            .map(|e| (Vec3::from_array(e.color), e.weight)),
    )?;
    let rules = AttributeRules {
        palette,
        size: attrs.size_range,
        scale: attrs.scale_range,
        spin_speed: attrs.spin_speed_range,
        weight: attrs.weight_range,
    };
    rules.validate()?;
    Ok(rules)
}

fn check_jitter(radial_jitter: f32) -> Result<(), MorphError> {
    if radial_jitter.is_finite() && radial_jitter >= 0.0 {
        Ok(())
    } else {
        Err(MorphError::InvalidVolume(format!(
            "radial jitter must be finite and >= 0, got {radial_jitter}"
        )))
    }
}

/// Sampler for the assembled shape.
enum TargetShape {
    Volume(ShapeVolumeSpec),
    Halo(CurveHalo),
}

impl TargetShape {
    fn build(shape: &ShapeOptions) -> Result<Self, MorphError> {
        Ok(match shape {
            ShapeOptions::Volume(spec) => {
                spec.validate()?;
                Self::Volume(*spec)
            }
            ShapeOptions::Curve {
                points,
                radial_jitter,
            } => {
                check_jitter(*radial_jitter)?;
                let curve = CurveSpec::new(
                    points.iter().copied().map(Vec3::from_array).collect(),
                )?;
                Self::Halo(curve.halo(*radial_jitter))
            }
            ShapeOptions::Spiral {
                height,
                base_radius,
                y_offset,
                turns,
                samples,
                radial_jitter,
            } => {
                check_jitter(*radial_jitter)?;
                let curve = CurveSpec::spiral(
                    *height,
                    *base_radius,
                    *y_offset,
                    *turns,
                    *samples as usize,
                )?;
                Self::Halo(curve.halo(*radial_jitter))
            }
        })
    }

    /// Wider variant used once separation retries run out.
    fn loosened(&self, factor: f32) -> Self {
        match self {
            Self::Volume(spec) => Self::Volume(spec.loosened(factor)),
            Self::Halo(halo) => Self::Halo(halo.loosened(factor)),
        }
    }

    fn sampler(&self) -> &dyn PointSampler {
        match self {
            Self::Volume(spec) => spec,
            Self::Halo(halo) => halo,
        }
    }
}
