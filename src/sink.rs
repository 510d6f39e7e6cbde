//! Output contract toward the rendering backend.
//!
//! The core hands every family's fully computed [`ElementTransform`]s to a
//! [`TransformSink`] once per frame. The `Pod` records below are ready-made
//! GPU layouts for renderers that upload flat buffers.

use glam::{Mat4, Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::behaviors::Staggered;
use crate::registry::Element;

/// Final per-frame state of one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementTransform {
    /// Stable element identifier within its family.
    pub id: u32,
    /// World position including the idle overlay.
    pub position: Vec3,
    /// Orientation.
    pub rotation: Quat,
    /// Uniform scale.
    pub scale: f32,
    /// Point size.
    pub size: f32,
    /// Linear RGB color including sparkle.
    pub color: Vec3,
}

impl ElementTransform {
    /// Model matrix for instanced drawing.
    #[inline]
    #[must_use]
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            self.rotation,
            self.position,
        )
    }

    /// Pack into the instanced-mesh layout.
    #[must_use]
    pub fn to_instance(&self) -> InstanceRaw {
        InstanceRaw {
            model: self.model_matrix().to_cols_array_2d(),
            color: self.color.extend(1.0).to_array(),
        }
    }
}

/// Per-instance data for rigid meshes.
/// Must match the WGSL `Instance` struct layout exactly.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// Column-major model matrix.
    pub model: [[f32; 4]; 4],
    /// RGBA color.
    pub color: [f32; 4],
}

/// Static per-point vertex for shader-evaluated staggered blending.
///
/// Uploaded once per build; the shader recomputes
/// `t = clamp(eased_progress · gain − phase · spread, 0, 1)` from
/// [`FamilyUniforms`] and places the point at `mix(scatter, target, t)`.
/// The easing is applied on the host, so the shader needs no easing code.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointVertex {
    /// Scatter endpoint.
    pub scatter: [f32; 3],
    /// Element phase.
    pub phase: f32,
    /// Target endpoint.
    pub target: [f32; 3],
    /// Point size.
    pub size: f32,
    /// RGBA base color.
    pub color: [f32; 4],
}

impl From<&Element> for PointVertex {
    fn from(e: &Element) -> Self {
        let attrs = e.attributes();
        Self {
            scatter: e.scatter().to_array(),
            phase: e.phase(),
            target: e.target().to_array(),
            size: attrs.size,
            color: attrs.color.extend(1.0).to_array(),
        }
    }
}

/// Family-wide values for shader-side evaluation. One value per frame,
/// passed by value; nothing in the core mutates it behind the renderer.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FamilyUniforms {
    /// Smoothed progress, for the idle weight `1 − progress`.
    pub progress: f32,
    /// Progress after the family's easing; drives the stagger.
    pub eased_progress: f32,
    /// Host elapsed seconds.
    pub elapsed: f32,
    /// Stagger gain `k`.
    pub gain: f32,
    /// Stagger spread.
    pub spread: f32,
    /// Pads the block to a 16-byte multiple.
    pub padding: [f32; 3],
}

impl FamilyUniforms {
    /// Uniforms for a staggered family at the given progress and time.
    #[must_use]
    pub fn staggered(strategy: &Staggered, progress: f32, elapsed: f32) -> Self {
        Self {
            progress,
            eased_progress: strategy.easing().evaluate(progress),
            elapsed,
            gain: strategy.gain(),
            spread: strategy.spread(),
            padding: [0.0; 3],
        }
    }
}

/// Receives each family's transforms once per frame.
pub trait TransformSink {
    /// All transforms of `family` for this frame, in element order.
    fn submit(&mut self, family: &str, transforms: &[ElementTransform]);
}

impl<F> TransformSink for F
where
    F: FnMut(&str, &[ElementTransform]),
{
    fn submit(&mut self, family: &str, transforms: &[ElementTransform]) {
        self(family, transforms);
    }
}

/// Sink that packs every family into a reusable [`InstanceRaw`] buffer.
#[derive(Debug, Default)]
pub struct BufferSink {
    families: FxHashMap<String, Vec<InstanceRaw>>,
}

impl BufferSink {
    /// Empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last submitted instances of `family`.
    #[must_use]
    pub fn instances(&self, family: &str) -> Option<&[InstanceRaw]> {
        self.families.get(family).map(Vec::as_slice)
    }

    /// Last submitted instances of `family` as raw bytes for upload.
    #[must_use]
    pub fn bytes(&self, family: &str) -> Option<&[u8]> {
        self.instances(family).map(bytemuck::cast_slice)
    }
}

impl TransformSink for BufferSink {
    fn submit(&mut self, family: &str, transforms: &[ElementTransform]) {
        let buffer = self.families.entry(family.to_owned()).or_default();
        buffer.clear();
        buffer.extend(transforms.iter().map(ElementTransform::to_instance));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ElementAttributes;

    fn transform() -> ElementTransform {
        ElementTransform {
            id: 3,
            position: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::IDENTITY,
            scale: 2.0,
            size: 0.5,
            color: Vec3::new(0.1, 0.2, 0.3),
        }
    }

    fn byte_len<T: bytemuck::Pod>() -> usize {
        bytemuck::bytes_of(&T::zeroed()).len()
    }

    #[test]
    fn gpu_layouts_are_tight() {
        assert_eq!(byte_len::<InstanceRaw>(), 80);
        assert_eq!(byte_len::<PointVertex>(), 48);
        assert_eq!(byte_len::<FamilyUniforms>(), 32);
    }

    #[test]
    fn model_matrix_carries_translation_and_scale() {
        let raw = transform().to_instance();
        assert_eq!(raw.model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(raw.model[0][0], 2.0);
        assert_eq!(raw.color, [0.1, 0.2, 0.3, 1.0]);
    }

    #[test]
    fn buffer_sink_replaces_per_frame() {
        let mut sink = BufferSink::new();
        sink.submit("gifts", &[transform(), transform()]);
        sink.submit("gifts", &[transform()]);
        assert_eq!(sink.instances("gifts").map(<[InstanceRaw]>::len), Some(1));
        assert_eq!(sink.bytes("gifts").map(<[u8]>::len), Some(80));
        assert!(sink.instances("foliage").is_none());
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        let mut sink = |family: &str, t: &[ElementTransform]| {
            seen.push((family.to_owned(), t.len()));
        };
        sink.submit("wire", &[transform()]);
        assert_eq!(seen, vec![("wire".to_owned(), 1)]);
    }

    #[test]
    fn uniforms_carry_eased_progress() {
        use crate::util::easing::EasingFunction;

        let s = Staggered::new(1.5, 0.5, EasingFunction::QuadraticOut).unwrap();
        let u = FamilyUniforms::staggered(&s, 0.25, 4.0);
        assert_eq!(u.progress, 0.25);
        assert_eq!(u.eased_progress, EasingFunction::QuadraticOut.evaluate(0.25));
        assert_ne!(u.eased_progress, u.progress);
        assert_eq!((u.gain, u.spread, u.elapsed), (1.5, 0.5, 4.0));
    }

    #[test]
    fn point_vertex_copies_static_attributes() {
        let e = Element::new(
            1,
            Vec3::X,
            Vec3::Y,
            0.25,
            ElementAttributes {
                size: 0.7,
                ..ElementAttributes::default()
            },
        );
        let v = PointVertex::from(&e);
        assert_eq!(v.scatter, [1.0, 0.0, 0.0]);
        assert_eq!(v.target, [0.0, 1.0, 0.0]);
        assert_eq!(v.phase, 0.25);
        assert_eq!(v.size, 0.7);
    }
}
