//! Camera component
//!
//! Projection parameters plus the view matrix, which is recomputed from the
//! owning entity's transform whenever that transform changes.

use crate::ecs::component::{Component, ComponentKind};
use crate::ecs::components::transform::TransformComponent;
use crate::ecs::storage::ComponentStore;
use crate::ecs::world::World;
use crate::foundation::math::{utils, Mat4, Mat4Ext};

/// Perspective camera attached to an entity
#[derive(Debug, Clone, PartialEq)]
pub struct CameraComponent {
    /// Vertical field of view in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Near clipping plane distance
    pub near: f32,
    /// Far clipping plane distance
    pub far: f32,
    view: Mat4,
}

impl Component for CameraComponent {
    const KIND: ComponentKind = ComponentKind::Camera;

    fn store(world: &World) -> &ComponentStore<Self> {
        &world.cameras
    }

    fn store_mut(world: &mut World) -> &mut ComponentStore<Self> {
        &mut world.cameras
    }
}

impl Default for CameraComponent {
    fn default() -> Self {
        Self::perspective(60.0, 16.0 / 9.0, 0.1, 1000.0)
    }
}

impl CameraComponent {
    /// Create a perspective camera; `fov_degrees` is converted to radians
    pub fn perspective(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        debug_assert!(near > 0.0 && far > near, "invalid clip planes");
        Self {
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
            view: Mat4::identity(),
        }
    }

    /// Recompute the view matrix from the owner's transform
    pub fn update_view(&mut self, transform: &TransformComponent) {
        self.view = Mat4::look_at(transform.position(), transform.look_at(), transform.up());
    }

    /// Current view matrix
    pub fn view(&self) -> &Mat4 {
        &self.view
    }

    /// Projection matrix
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    /// Projection * view
    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view
    }

    /// Update aspect ratio after a viewport resize
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        if height == 0 {
            log::warn!("CameraComponent::set_aspect: zero height ignored");
            return;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.aspect = width as f32 / height as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Point3, Vec3};
    use approx::assert_relative_eq;

    #[test]
    fn view_moves_owner_to_origin() {
        let transform = TransformComponent::from_position(Vec3::new(0.0, 2.0, 5.0));
        let mut camera = CameraComponent::default();
        camera.update_view(&transform);

        let eye = camera.view().transform_point(&Point3::new(0.0, 2.0, 5.0));
        assert_relative_eq!(eye.coords, Vec3::zeros(), epsilon = 1e-5);

        // A point straight ahead lands on the view-space -Z axis
        let ahead = camera.view().transform_point(&Point3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(ahead.coords, Vec3::new(0.0, 0.0, -5.0), epsilon = 1e-5);
    }

    #[test]
    fn aspect_ignores_zero_height() {
        let mut camera = CameraComponent::default();
        camera.set_aspect(800, 400);
        assert_relative_eq!(camera.aspect, 2.0);
        camera.set_aspect(800, 0);
        assert_relative_eq!(camera.aspect, 2.0);
    }
}
