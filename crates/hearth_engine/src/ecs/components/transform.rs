//! Transform component
//!
//! Holds position, rotation and scale plus the derived forward/up vectors,
//! look-at point and the cached local matrix. Every mutator leaves the
//! component consistent: derived vectors and the matrix are recomputed before
//! it returns. Notifying dependents (camera, rigid body) is done by the
//! propagation step in `ecs::systems::transform_sync`, never here.

use serde::{Deserialize, Serialize};

use crate::ecs::component::{Component, ComponentKind};
use crate::ecs::storage::ComponentStore;
use crate::ecs::world::World;
use crate::foundation::math::{
    compose_trs, default_forward, default_up, translation_of, utils, Mat4, Quat, Vec3,
};

/// Rotations smaller than this (radians) are ignored by the direction setters
pub const DIRECTION_EPSILON: f32 = 1e-4;

/// Coordinate space for relative transform operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Space {
    /// Offset/axis expressed in the entity's own rotated frame
    #[default]
    Local,
    /// Offset/axis used as-is
    World,
}

/// ECS Transform component
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    position: Vec3,
    scale: Vec3,
    rotation: Quat,
    forward: Vec3,
    up: Vec3,
    look_at: Vec3,
    matrix: Mat4,
}

impl Component for TransformComponent {
    const KIND: ComponentKind = ComponentKind::Transform;

    fn store(world: &World) -> &ComponentStore<Self> {
        &world.transforms
    }

    fn store_mut(world: &mut World) -> &mut ComponentStore<Self> {
        &mut world.transforms
    }
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self::from_transform(Vec3::zeros(), Quat::identity(), Vec3::new(1.0, 1.0, 1.0))
    }
}

impl TransformComponent {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self::from_transform(position, Quat::identity(), Vec3::new(1.0, 1.0, 1.0))
    }

    /// Create from full transform specification
    pub fn from_transform(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        let mut transform = Self {
            position,
            scale,
            rotation,
            forward: default_forward(),
            up: default_up(),
            look_at: position + default_forward(),
            matrix: Mat4::identity(),
        };
        transform.refresh();
        transform
    }

    /// Builder pattern: Set position
    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    /// Builder pattern: Set rotation
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// Builder pattern: Set scale
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    /// World-space position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Scale factors
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Rotation quaternion
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Unit forward vector (rotated -Z)
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    /// Unit up vector (rotated +Y)
    pub fn up(&self) -> Vec3 {
        self.up
    }

    /// Point one unit ahead along `forward`
    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Cached local transform matrix (`T * R * S`)
    pub fn matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// Translation column of the cached matrix
    pub fn matrix_translation(&self) -> Vec3 {
        translation_of(&self.matrix)
    }

    /// Set the position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.refresh();
    }

    /// Set the scale factors
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.refresh();
    }

    /// Set the rotation
    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
        self.refresh();
    }

    /// Set position and rotation together (the physics write-back path)
    pub fn set_position_rotation(&mut self, position: Vec3, rotation: Quat) {
        self.position = position;
        self.rotation = rotation;
        self.refresh();
    }

    /// Move by `offset`; in `Space::Local` the offset is rotated into the entity frame
    pub fn translate(&mut self, offset: Vec3, space: Space) {
        let offset = match space {
            Space::Local => self.rotation * offset,
            Space::World => offset,
        };
        self.position += offset;
        self.refresh();
    }

    /// Apply a rotation delta.
    ///
    /// Local: `rotation = rotation * delta`. World: `rotation = delta * rotation`.
    pub fn rotate(&mut self, delta: Quat, space: Space) {
        let rotated = match space {
            Space::Local => self.rotation * delta,
            Space::World => delta * self.rotation,
        };
        self.rotation = Quat::new_normalize(rotated.into_inner());
        self.refresh();
    }

    /// Rotate by `angle` radians around `axis`
    pub fn rotate_axis_angle(&mut self, axis: Vec3, angle: f32, space: Space) {
        if axis.norm_squared() <= f32::EPSILON {
            log::warn!("TransformComponent::rotate_axis_angle: degenerate axis {axis:?}");
            return;
        }
        let delta = Quat::from_axis_angle(&nalgebra::Unit::new_normalize(axis), angle);
        self.rotate(delta, space);
    }

    /// Turn so that `forward` points along `direction`.
    ///
    /// Returns false when the required rotation is below [`DIRECTION_EPSILON`]
    /// and nothing changed.
    pub fn set_forward(&mut self, direction: Vec3) -> bool {
        let current = self.forward;
        let fallback = self.up;
        self.align(current, direction, fallback)
    }

    /// Turn to face `target`
    pub fn set_look_at(&mut self, target: Vec3) -> bool {
        self.set_forward(target - self.position)
    }

    /// Turn so that `up` points along `direction`
    pub fn set_up_vector(&mut self, direction: Vec3) -> bool {
        let current = self.up;
        let fallback = self.forward;
        self.align(current, direction, fallback)
    }

    /// Rotate (in world space) so that `current` becomes `desired`.
    ///
    /// Axis is `current x desired`; for antiparallel vectors the cross product
    /// vanishes and `fallback` (perpendicular to `current`) is used instead.
    fn align(&mut self, current: Vec3, desired: Vec3, fallback: Vec3) -> bool {
        if desired.norm_squared() <= f32::EPSILON {
            log::warn!("TransformComponent: cannot align to zero-length direction");
            return false;
        }
        let desired = desired.normalize();
        let angle = utils::angle_between(&current, &desired);
        if angle.abs() < DIRECTION_EPSILON {
            return false;
        }

        let cross = current.cross(&desired);
        let axis = if cross.norm_squared() > 1e-12 {
            cross.normalize()
        } else if fallback.norm_squared() > f32::EPSILON {
            fallback.normalize()
        } else {
            utils::any_perpendicular(&current)
        };

        let delta = Quat::from_axis_angle(&nalgebra::Unit::new_unchecked(axis), angle);
        self.rotate(delta, Space::World);
        true
    }

    fn refresh(&mut self) {
        self.forward = self.rotation * default_forward();
        self.up = self.rotation * default_up();
        self.look_at = self.position + self.forward;
        self.matrix = compose_trs(&self.position, &self.rotation, &self.scale);
    }
}
