//! Per-element blend pass for one family.

use glam::Quat;

use super::behaviors::{BlendFrame, SharedStrategy};
use super::idle::{idle_weight, IdleMotion};
use crate::registry::{Element, ElementMotion, ElementRegistry};
use crate::sink::ElementTransform;

/// Combines a blend strategy with the idle overlay.
///
/// Reads elements, writes only their [`ElementMotion`]. Elements are
/// independent, so the pass is a plain map (parallel with the `parallel`
/// feature).
#[derive(Clone)]
pub struct BlendEvaluator {
    strategy: SharedStrategy,
    idle: IdleMotion,
}

impl BlendEvaluator {
    /// Evaluator with the given strategy and overlay.
    #[must_use]
    pub fn new(strategy: SharedStrategy, idle: IdleMotion) -> Self {
        Self { strategy, idle }
    }

    /// The blend strategy.
    #[must_use]
    pub fn strategy(&self) -> &SharedStrategy {
        &self.strategy
    }

    /// The idle overlay parameters.
    #[must_use]
    pub fn idle(&self) -> &IdleMotion {
        &self.idle
    }

    /// Final transform of one element.
    pub fn evaluate_one(
        &self,
        frame: &BlendFrame,
        element: &Element,
        motion: &mut ElementMotion,
    ) -> ElementTransform {
        let base = self.strategy.position(frame, element, motion);
        let weight = idle_weight(frame.progress);
        let phase = element.phase();
        let attrs = element.attributes();

        let (position, rotation, scale) = if weight > 0.0 {
            (
                base + self.idle.offset(frame.elapsed, phase, weight),
                self.idle.rotation(element, motion, frame.delta, weight),
                attrs.scale * self.idle.scale(frame.elapsed, phase, weight),
            )
        } else {
            (base, Quat::IDENTITY, attrs.scale)
        };

        ElementTransform {
            id: element.id(),
            position,
            rotation,
            scale,
            size: attrs.size,
            color: self.idle.color(attrs.color, frame.elapsed, phase),
        }
    }

    /// Evaluate every element of `registry` into `out` (cleared first).
    pub fn evaluate(
        &self,
        frame: &BlendFrame,
        registry: &mut ElementRegistry,
        out: &mut Vec<ElementTransform>,
    ) {
        let (elements, motion) = registry.split_mut();
        self.evaluate_slices(frame, elements, motion, out);
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_slices(
        &self,
        frame: &BlendFrame,
        elements: &[Element],
        motion: &mut [ElementMotion],
        out: &mut Vec<ElementTransform>,
    ) {
        out.clear();
        out.extend(
            elements
                .iter()
                .zip(motion.iter_mut())
                .map(|(e, m)| self.evaluate_one(frame, e, m)),
        );
    }

    #[cfg(feature = "parallel")]
    fn evaluate_slices(
        &self,
        frame: &BlendFrame,
        elements: &[Element],
        motion: &mut [ElementMotion],
        out: &mut Vec<ElementTransform>,
    ) {
        use rayon::prelude::*;

        elements
            .par_iter()
            .zip(motion.par_iter_mut())
            .map(|(e, m)| self.evaluate_one(frame, e, m))
            .collect_into_vec(out);
    }
}

impl std::fmt::Debug for BlendEvaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlendEvaluator")
            .field("strategy", &self.strategy.name())
            .field("idle", &self.idle)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::animation::behaviors::{shared, Staggered, WeightedLag};
    use crate::registry::{ElementAttributes, ElementRegistry};

    fn registry() -> ElementRegistry {
        let elements = (0..8)
            .map(|i| {
                let f = i as f32;
                Element::new(
                    i,
                    Vec3::new(f * 3.0, -f, 10.0 - f),
                    Vec3::new(-f, f * 0.5, f),
                    f / 8.0,
                    ElementAttributes {
                        weight: Some(0.1 + f * 0.1),
                        spin_speed: 1.5,
                        scale: 1.2,
                        ..ElementAttributes::default()
                    },
                )
            })
            .collect();
        ElementRegistry::from_elements(elements)
    }

    fn frame(progress: f32, elapsed: f32) -> BlendFrame {
        BlendFrame {
            progress,
            elapsed,
            delta: 1.0 / 60.0,
        }
    }

    #[test]
    fn settled_shape_has_no_overlay() {
        let eval = BlendEvaluator::new(
            shared(Staggered::default()),
            IdleMotion {
                pulse_amplitude: 0.2,
                ..IdleMotion::default()
            },
        );
        let mut reg = registry();
        let mut out = Vec::new();
        for step in 0..5 {
            eval.evaluate(&frame(1.0, step as f32 * 0.7), &mut reg, &mut out);
            for (t, e) in out.iter().zip(reg.elements()) {
                assert_eq!(t.position, e.target());
                assert_eq!(t.rotation, Quat::IDENTITY);
                assert_eq!(t.scale, 1.2);
            }
        }
    }

    #[test]
    fn scattered_elements_keep_moving() {
        let eval = BlendEvaluator::new(
            shared(Staggered::default()),
            IdleMotion::default(),
        );
        let mut reg = registry();
        let mut a = Vec::new();
        let mut b = Vec::new();
        eval.evaluate(&frame(0.0, 1.0), &mut reg, &mut a);
        eval.evaluate(&frame(0.0, 1.5), &mut reg, &mut b);
        assert!(a.iter().zip(&b).all(|(x, y)| x.position != y.position));
    }

    #[test]
    fn strategies_converge_to_the_same_endpoints() {
        let staggered = BlendEvaluator::new(
            shared(Staggered::default()),
            IdleMotion::default(),
        );
        let lag = BlendEvaluator::new(
            shared(WeightedLag::default()),
            IdleMotion::default(),
        );
        let mut reg_a = registry();
        let mut reg_b = registry();
        let mut out_a = Vec::new();
        let mut out_b = Vec::new();
        for i in 0..1200 {
            let f = frame(1.0, i as f32 / 60.0);
            staggered.evaluate(&f, &mut reg_a, &mut out_a);
            lag.evaluate(&f, &mut reg_b, &mut out_b);
        }
        for ((a, b), e) in out_a.iter().zip(&out_b).zip(reg_a.elements()) {
            assert_eq!(a.position, e.target());
            assert!((a.position - b.position).length() < 1e-3);
        }
    }

    #[test]
    fn output_order_matches_elements() {
        let eval = BlendEvaluator::new(
            shared(WeightedLag::default()),
            IdleMotion::STILL,
        );
        let mut reg = registry();
        let mut out = vec![];
        eval.evaluate(&frame(0.3, 0.0), &mut reg, &mut out);
        let ids: Vec<u32> = out.iter().map(|t| t.id).collect();
        assert_eq!(ids, (0..8).collect::<Vec<u32>>());
    }

    #[test]
    fn coincident_endpoints_stay_put_mid_blend() {
        let p = Vec3::new(2.5, -1.25, 7.0);
        let element = Element::new(
            0,
            p,
            p,
            0.35,
            ElementAttributes {
                weight: Some(0.4),
                ..ElementAttributes::default()
            },
        );
        for strategy in [shared(Staggered::default()), shared(WeightedLag::default())] {
            let eval = BlendEvaluator::new(strategy, IdleMotion::STILL);
            let mut reg = ElementRegistry::from_elements(vec![element.clone()]);
            let mut out = Vec::new();
            for progress in [0.0, 0.17, 0.5, 0.83, 1.0] {
                eval.evaluate(&frame(progress, 1.0), &mut reg, &mut out);
                assert_eq!(out[0].position, p);
                assert_eq!(reg.motion()[0].position, p);
            }
        }
    }

    #[test]
    fn empty_family_is_a_no_op() {
        let eval = BlendEvaluator::new(
            shared(Staggered::default()),
            IdleMotion::default(),
        );
        let mut reg = ElementRegistry::default();
        let mut out = Vec::new();
        eval.evaluate(&frame(0.5, 1.0), &mut reg, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn weighted_lag_writes_current_position() {
        let eval = BlendEvaluator::new(
            shared(WeightedLag::default()),
            IdleMotion::STILL,
        );
        let mut reg = registry();
        let before: Vec<Vec3> =
            reg.motion().iter().map(|m| m.position).collect();
        let mut out = Vec::new();
        eval.evaluate(&frame(1.0, 0.0), &mut reg, &mut out);
        for ((m, b), e) in reg.motion().iter().zip(&before).zip(reg.elements()) {
            if e.scatter() != e.target() {
                assert_ne!(m.position, *b);
            }
            assert_eq!(e.scatter(), *b);
        }
    }
}
