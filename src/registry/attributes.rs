//! Static per-element visual attributes and the rules that draw them.

use glam::Vec3;

use crate::error::MorphError;
use crate::sampling::volume::sample_direction;
use crate::util::random::RandomSource;

/// Visual attributes fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementAttributes {
    /// Point size (points) or nominal extent (instances).
    pub size: f32,
    /// Base linear RGB color.
    pub color: Vec3,
    /// Uniform scale of the rendered instance.
    pub scale: f32,
    /// Unit axis the idle spin turns about.
    pub rotation_axis: Vec3,
    /// Idle spin rate in radians per second.
    pub spin_speed: f32,
    /// Inertia for the weighted-lag strategy, in `(0, 1]`.
    pub weight: Option<f32>,
}

impl Default for ElementAttributes {
    fn default() -> Self {
        Self {
            size: 1.0,
            color: Vec3::ONE,
            scale: 1.0,
            rotation_axis: Vec3::Y,
            spin_speed: 0.0,
            weight: None,
        }
    }
}

/// Produces the static attributes of the `index`-th element of a family.
pub trait AttributeFactory {
    /// Attributes for one element.
    fn attributes(
        &mut self,
        index: usize,
        rng: &mut dyn RandomSource,
    ) -> ElementAttributes;
}

impl<F> AttributeFactory for F
where
    F: FnMut(usize, &mut dyn RandomSource) -> ElementAttributes,
{
    fn attributes(
        &mut self,
        index: usize,
        rng: &mut dyn RandomSource,
    ) -> ElementAttributes {
        self(index, rng)
    }
}

/// Colors chosen with probability proportional to their selection weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Vec3>,
    cumulative: Vec<f32>,
}

impl Palette {
    /// Palette from `(color, selection weight)` pairs. Entries with zero
    /// weight are never picked; at least one weight must be positive.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidFamily`] if the palette is empty, a
    /// weight is negative or non-finite, or the weights sum to zero.
    pub fn new(
        entries: impl IntoIterator<Item = (Vec3, f32)>,
    ) -> Result<Self, MorphError> {
        let mut colors = Vec::new();
        let mut cumulative = Vec::new();
        let mut total = 0.0f32;
        for (color, weight) in entries {
            if !weight.is_finite() || weight < 0.0 {
                return Err(MorphError::InvalidFamily(format!(
                    "palette weight must be finite and >= 0, got {weight}"
                )));
            }
            total += weight;
            colors.push(color);
            cumulative.push(total);
        }
        if total <= 0.0 {
            return Err(MorphError::InvalidFamily(
                "palette needs at least one positively weighted color"
                    .to_owned(),
            ));
        }
        Ok(Self { colors, cumulative })
    }

    /// Single-color palette.
    #[must_use]
    pub fn solid(color: Vec3) -> Self {
        Self {
            colors: vec![color],
            cumulative: vec![1.0],
        }
    }

    /// Pick a color.
    pub fn pick<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Vec3 {
        let total = self.cumulative.last().copied().unwrap_or(0.0);
        let x = rng.next_unit() * total;
        let idx = self
            .cumulative
            .iter()
            .position(|&c| x < c)
            .unwrap_or(self.colors.len() - 1);
        self.colors[idx]
    }
}

/// Range-based attribute rules: palette plus uniform ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeRules {
    /// Base colors.
    pub palette: Palette,
    /// Point size range.
    pub size: [f32; 2],
    /// Instance scale range.
    pub scale: [f32; 2],
    /// Idle spin speed range (radians per second).
    pub spin_speed: [f32; 2],
    /// Weight range; `None` leaves elements unweighted.
    pub weight: Option<[f32; 2]>,
}

impl AttributeRules {
    /// Check ranges are ordered and weights lie in `(0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`MorphError::InvalidFamily`] for an unordered or non-finite
    /// range, or weights outside `(0, 1]`.
    pub fn validate(&self) -> Result<(), MorphError> {
        check_range("size", self.size)?;
        check_range("scale", self.scale)?;
        check_range("spin speed", self.spin_speed)?;
        if let Some(weight @ [min, max]) = self.weight {
            check_range("weight", weight)?;
            if min <= 0.0 || max > 1.0 {
                return Err(MorphError::InvalidFamily(format!(
                    "weight range [{min}, {max}] must lie in (0, 1]"
                )));
            }
        }
        Ok(())
    }
}

fn check_range(what: &str, [min, max]: [f32; 2]) -> Result<(), MorphError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(MorphError::InvalidFamily(format!(
            "{what} range [{min}, {max}] is empty or non-finite"
        )))
    }
}

impl AttributeFactory for AttributeRules {
    fn attributes(
        &mut self,
        _index: usize,
        rng: &mut dyn RandomSource,
    ) -> ElementAttributes {
        let color = self.palette.pick(rng);
        let size = rng.range(self.size[0], self.size[1]);
        let scale = rng.range(self.scale[0], self.scale[1]);
        let rotation_axis = sample_direction(rng).normalize_or(Vec3::Y);
        let spin_speed = rng.range(self.spin_speed[0], self.spin_speed[1]);
        let weight = self.weight.map(|[min, max]| rng.range(min, max));
        ElementAttributes {
            size,
            color,
            scale,
            rotation_axis,
            spin_speed,
            weight,
        }
    }
}
