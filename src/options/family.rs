//! Per-family construction options and the default tree scene.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::animation::{IdleMotion, TargetState};
use crate::sampling::ShapeVolumeSpec;
use crate::util::easing::EasingFunction;

/// Where a family's elements sit when assembled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeOptions {
    /// Tapered cone volume.
    Volume(ShapeVolumeSpec),
    /// Halo around an explicit Catmull-Rom curve.
    Curve {
        /// Control points, at least two.
        points: Vec<[f32; 3]>,
        /// Per-axis jitter half-width around the curve.
        radial_jitter: f32,
    },
    /// Halo around a tapered helix generated from cone parameters.
    Spiral {
        /// Vertical extent.
        height: f32,
        /// Radius at the base.
        base_radius: f32,
        /// Centre of the vertical extent.
        y_offset: f32,
        /// Full turns from base to tip.
        turns: f32,
        /// Number of generated control points.
        samples: u32,
        /// Per-axis jitter half-width around the curve.
        radial_jitter: f32,
    },
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self::Volume(ShapeVolumeSpec::default())
    }
}

/// Which blend strategy a family uses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyOptions {
    /// Closed-form phase stagger (points).
    Staggered {
        /// Time multiplier `k`; must be at least `1 + spread`.
        gain: f32,
        /// Phase delay scale.
        spread: f32,
        /// Easing applied to progress.
        easing: EasingFunction,
    },
    /// Per-element first-order lag (rigid instances).
    WeightedLag {
        /// Lag rate numerator.
        base_rate: f32,
        /// Added to the weight in the denominator.
        offset: f32,
        /// Easing applied to progress.
        easing: EasingFunction,
    },
}

impl Default for StrategyOptions {
    fn default() -> Self {
        Self::Staggered {
            gain: 1.4,
            spread: 0.4,
            easing: EasingFunction::CubicInOut,
        }
    }
}

/// Minimum-separation placement for families that must not overlap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct SeparationOptions {
    /// Minimum pairwise distance.
    pub min_distance: f32,
    /// Candidate draws before falling back.
    pub max_attempts: u32,
    /// Growth factor of the looser fallback sampler.
    pub fallback_scale: f32,
}

impl Default for SeparationOptions {
    fn default() -> Self {
        Self {
            min_distance: 2.0,
            max_attempts: 30,
            fallback_scale: 1.3,
        }
    }
}

/// One palette color with its selection weight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct PaletteEntry {
    /// Linear RGB.
    pub color: [f32; 3],
    /// Relative selection weight.
    pub weight: f32,
}

/// Static attribute distribution rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct AttributeOptions {
    /// Weighted color palette.
    pub palette: Vec<PaletteEntry>,
    /// Point size range.
    pub size_range: [f32; 2],
    /// Instance scale range.
    pub scale_range: [f32; 2],
    /// Idle spin speed range, radians per second.
    pub spin_speed_range: [f32; 2],
    /// Weight range in `(0, 1]`; omitted for unweighted families.
    pub weight_range: Option<[f32; 2]>,
}

impl Default for AttributeOptions {
    fn default() -> Self {
        Self {
            palette: vec![PaletteEntry {
                color: [1.0, 1.0, 1.0],
                weight: 1.0,
            }],
            size_range: [0.5, 1.0],
            scale_range: [1.0, 1.0],
            spin_speed_range: [0.0, 0.0],
            weight_range: None,
        }
    }
}

/// Full construction-time description of one family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(default)]
pub struct FamilyOptions {
    /// Unique family name, used by sinks and lookups.
    pub name: String,
    /// Number of elements.
    pub count: u32,
    /// Assembled shape.
    pub shape: ShapeOptions,
    /// Radius of the scatter sphere.
    pub scatter_radius: f32,
    /// Damping time constant τ in seconds.
    pub damping: f32,
    /// Blend strategy.
    pub strategy: StrategyOptions,
    /// Optional non-overlap constraint applied to both endpoint batches.
    pub separation: Option<SeparationOptions>,
    /// Static attribute rules.
    pub attributes: AttributeOptions,
    /// Idle overlay.
    pub idle: IdleMotion,
    /// State the family starts in.
    pub initial_state: TargetState,
}

impl Default for FamilyOptions {
    fn default() -> Self {
        Self {
            name: "family".to_owned(),
            count: 100,
            shape: ShapeOptions::default(),
            scatter_radius: 18.0,
            damping: 0.8,
            strategy: StrategyOptions::default(),
            separation: None,
            attributes: AttributeOptions::default(),
            idle: IdleMotion::default(),
            initial_state: TargetState::Scattered,
        }
    }
}

fn palette(entries: &[([f32; 3], f32)]) -> Vec<PaletteEntry> {
    entries
        .iter()
        .map(|&(color, weight)| PaletteEntry { color, weight })
        .collect()
}

const TREE_HEIGHT: f32 = 14.0;
const TREE_RADIUS: f32 = 5.5;

/// Reference scene: a conical tree of foliage, ornaments, a garland, and
/// gift boxes at its base.
pub(super) fn tree_families() -> Vec<FamilyOptions> {
    vec![
        FamilyOptions {
            name: "foliage".to_owned(),
            count: 3000,
            shape: ShapeOptions::Volume(ShapeVolumeSpec {
                height: TREE_HEIGHT,
                base_radius: TREE_RADIUS,
                bias_exponent: 1.6,
                radial_range: [0.5, 1.2],
                ..ShapeVolumeSpec::default()
            }),
            damping: 0.9,
            attributes: AttributeOptions {
                palette: palette(&[
                    ([0.05, 0.35, 0.12], 5.0),
                    ([0.1, 0.5, 0.2], 3.0),
                    ([0.6, 0.8, 0.5], 1.0),
                ]),
                size_range: [0.08, 0.2],
                ..AttributeOptions::default()
            },
            ..FamilyOptions::default()
        },
        FamilyOptions {
            name: "ornaments".to_owned(),
            count: 300,
            shape: ShapeOptions::Volume(ShapeVolumeSpec {
                height: TREE_HEIGHT,
                base_radius: TREE_RADIUS,
                bias_exponent: 1.3,
                radial_range: [0.8, 1.0],
                ..ShapeVolumeSpec::default()
            }),
            damping: 0.5,
            strategy: StrategyOptions::Staggered {
                gain: 1.6,
                spread: 0.5,
                easing: EasingFunction::CubicInOut,
            },
            attributes: AttributeOptions {
                palette: palette(&[
                    ([0.9, 0.1, 0.1], 3.0),
                    ([1.0, 0.8, 0.2], 3.0),
                    ([0.8, 0.8, 0.9], 2.0),
                    ([0.2, 0.3, 0.9], 1.0),
                ]),
                size_range: [0.25, 0.45],
                ..AttributeOptions::default()
            },
            idle: IdleMotion {
                sparkle_intensity: 1.5,
                pulse_amplitude: 0.15,
                ..IdleMotion::default()
            },
            ..FamilyOptions::default()
        },
        FamilyOptions {
            name: "garland".to_owned(),
            count: 600,
            shape: ShapeOptions::Spiral {
                height: TREE_HEIGHT,
                base_radius: TREE_RADIUS * 1.05,
                y_offset: 0.0,
                turns: 5.0,
                samples: 64,
                radial_jitter: 0.12,
            },
            damping: 0.7,
            attributes: AttributeOptions {
                palette: palette(&[([1.0, 0.85, 0.5], 1.0)]),
                size_range: [0.1, 0.16],
                ..AttributeOptions::default()
            },
            idle: IdleMotion {
                sparkle_intensity: 0.8,
                sparkle_speed: 5.0,
                ..IdleMotion::default()
            },
            ..FamilyOptions::default()
        },
        FamilyOptions {
            name: "gifts".to_owned(),
            count: 40,
            shape: ShapeOptions::Volume(ShapeVolumeSpec {
                height: 1.0,
                base_radius: TREE_RADIUS * 1.4,
                y_offset: -TREE_HEIGHT * 0.5,
                bias_exponent: 1.0,
                radial_range: [0.55, 1.0],
                ..ShapeVolumeSpec::default()
            }),
            damping: 1.4,
            strategy: StrategyOptions::WeightedLag {
                base_rate: 2.0,
                offset: 0.5,
                easing: EasingFunction::CubicInOut,
            },
            separation: Some(SeparationOptions::default()),
            attributes: AttributeOptions {
                palette: palette(&[
                    ([0.8, 0.1, 0.15], 2.0),
                    ([0.1, 0.45, 0.2], 2.0),
                    ([0.9, 0.75, 0.3], 1.0),
                ]),
                size_range: [1.0, 1.0],
                scale_range: [0.6, 1.1],
                spin_speed_range: [0.3, 1.2],
                weight_range: Some([0.3, 1.0]),
            },
            idle: IdleMotion {
                sway_amplitude: 0.5,
                jitter_amplitude: 0.0,
                ..IdleMotion::default()
            },
            ..FamilyOptions::default()
        },
    ]
}
