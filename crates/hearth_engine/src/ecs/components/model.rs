//! Model component: what the render backend draws for an entity

use bytemuck::{Pod, Zeroable};

use crate::assets::{GeometryHandle, MaterialHandle, MaterialKind};
use crate::ecs::component::{Component, ComponentKind};
use crate::ecs::storage::ComponentStore;
use crate::ecs::world::World;
use crate::foundation::math::Mat4;

/// Per-instance uniform block uploaded by the render backend
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct InstanceUniforms {
    /// Column-major model matrix
    pub model: [[f32; 4]; 4],
    /// RGBA tint multiplied with the material color
    pub tint: [f32; 4],
    /// Texture coordinate scale
    pub uv_scale: [f32; 2],
    /// Explicit std140 padding
    pub _padding: [f32; 2],
}

impl Default for InstanceUniforms {
    fn default() -> Self {
        Self {
            model: Mat4::identity().into(),
            tint: [1.0; 4],
            uv_scale: [1.0, 1.0],
            _padding: [0.0; 2],
        }
    }
}

impl InstanceUniforms {
    /// Copy of these uniforms with the given model matrix
    #[must_use]
    pub fn with_model(mut self, matrix: &Mat4) -> Self {
        self.model = (*matrix).into();
        self
    }

    /// Raw bytes for upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Renderable geometry + material.
///
/// Both handles are refcounted references into the scene's resource caches.
/// The component is created by the scene, which takes one reference to each
/// handle, and the scene releases them on removal. It cannot be cloned or
/// rebuilt in place, so every live component stands for exactly one pair of
/// references.
#[derive(Debug, PartialEq)]
pub struct ModelComponent {
    geometry: GeometryHandle,
    material: MaterialHandle,
    material_kind: MaterialKind,
    uniforms: InstanceUniforms,
    visible: bool,
}

impl Component for ModelComponent {
    const KIND: ComponentKind = ComponentKind::Model;

    fn store(world: &World) -> &ComponentStore<Self> {
        &world.models
    }

    fn store_mut(world: &mut World) -> &mut ComponentStore<Self> {
        &mut world.models
    }
}

impl ModelComponent {
    /// Create a visible model with default instance uniforms
    pub(crate) fn new(geometry: GeometryHandle, material: MaterialHandle, material_kind: MaterialKind) -> Self {
        Self {
            geometry,
            material,
            material_kind,
            uniforms: InstanceUniforms::default(),
            visible: true,
        }
    }

    /// Geometry resource
    pub fn geometry(&self) -> GeometryHandle {
        self.geometry
    }

    /// Material resource
    pub fn material(&self) -> MaterialHandle {
        self.material
    }

    /// Shading model of the material, cached for batching
    pub fn material_kind(&self) -> MaterialKind {
        self.material_kind
    }

    /// Per-instance uniform block
    pub fn uniforms(&self) -> &InstanceUniforms {
        &self.uniforms
    }

    /// Skipped by the render queue when false
    pub fn visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_uniforms(&mut self, uniforms: InstanceUniforms) {
        self.uniforms = uniforms;
    }
}
