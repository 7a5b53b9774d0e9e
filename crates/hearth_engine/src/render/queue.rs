//! Render queue
//!
//! Collects every visible model once per frame and groups the draw items by
//! material, in the order each material first appears in the model store.
//! The backend consumes batches; nothing flows back into the scene.

use crate::assets::{GeometryHandle, MaterialHandle, MaterialKind};
use crate::ecs::components::{CameraComponent, InstanceUniforms, ModelComponent, TransformComponent};
use crate::ecs::{Entity, World};
use crate::foundation::math::Mat4;

/// One model to draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawItem {
    /// Entity owning the model
    pub entity: Entity,
    /// Geometry to bind
    pub geometry: GeometryHandle,
    /// Material to bind
    pub material: MaterialHandle,
    /// Shading model of the material
    pub material_kind: MaterialKind,
    /// Instance uniforms with the current world matrix
    pub uniforms: InstanceUniforms,
}

/// Draw items sharing one material
#[derive(Debug, Clone, PartialEq)]
pub struct RenderBatch {
    /// Shared material
    pub material: MaterialHandle,
    /// Items in model-store order
    pub items: Vec<DrawItem>,
}

/// Batched draw list for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderQueue {
    batches: Vec<RenderBatch>,
}

impl RenderQueue {
    /// Collect visible models from `world`
    pub fn collect(world: &World) -> Self {
        let mut queue = Self::default();
        for (entity, model) in world.query::<ModelComponent>() {
            if !model.visible() {
                continue;
            }
            let Some(transform) = world.get::<TransformComponent>(entity) else {
                log::warn!("RenderQueue::collect: entity {entity} has a model but no transform");
                continue;
            };
            queue.push(DrawItem {
                entity,
                geometry: model.geometry(),
                material: model.material(),
                material_kind: model.material_kind(),
                uniforms: model.uniforms().with_model(transform.matrix()),
            });
        }
        queue
    }

    fn push(&mut self, item: DrawItem) {
        match self.batches.iter_mut().find(|b| b.material == item.material) {
            Some(batch) => batch.items.push(item),
            None => self.batches.push(RenderBatch {
                material: item.material,
                items: vec![item],
            }),
        }
    }

    /// Batches in submission order
    pub fn batches(&self) -> &[RenderBatch] {
        &self.batches
    }

    /// Total number of draw items
    pub fn len(&self) -> usize {
        self.batches.iter().map(|b| b.items.len()).sum()
    }

    /// Whether nothing is visible
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Iterate every draw item
    pub fn items(&self) -> impl Iterator<Item = &DrawItem> {
        self.batches.iter().flat_map(|b| b.items.iter())
    }
}

/// View-projection of the first camera in the camera store
pub fn active_camera(world: &World) -> Option<(Entity, Mat4)> {
    world
        .query::<CameraComponent>()
        .next()
        .map(|(entity, camera)| (entity, camera.view_projection()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::{HandleMap, TypedHandle};
    use crate::foundation::math::Vec3;

    fn handles() -> (GeometryHandle, MaterialHandle, MaterialHandle) {
        let mut keys: HandleMap<()> = HandleMap::new();
        (
            TypedHandle::new(keys.insert(())),
            TypedHandle::new(keys.insert(())),
            TypedHandle::new(keys.insert(())),
        )
    }

    #[test]
    fn batches_group_by_material_in_first_seen_order() {
        let (geometry, brick, glass) = handles();
        let mut world = World::new();
        let a = world.create_entity("a");
        let b = world.create_entity("b");
        let c = world.create_entity("c");
        world.attach_component(a, ModelComponent::new(geometry, brick, MaterialKind::Phong)).unwrap();
        world.attach_component(b, ModelComponent::new(geometry, glass, MaterialKind::Pbr)).unwrap();
        world.attach_component(c, ModelComponent::new(geometry, brick, MaterialKind::Phong)).unwrap();

        let queue = RenderQueue::collect(&world);
        assert_eq!(queue.len(), 3);
        let batches = queue.batches();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].material, brick);
        assert_eq!(
            batches[0].items.iter().map(|i| i.entity).collect::<Vec<_>>(),
            vec![a, c]
        );
        assert_eq!(batches[1].items[0].material_kind, MaterialKind::Pbr);
    }

    #[test]
    fn hidden_models_are_skipped_and_matrices_follow_transforms() {
        let (geometry, material, _) = handles();
        let mut world = World::new();
        let shown = world.create_entity_with(
            "shown",
            TransformComponent::from_position(Vec3::new(1.0, 2.0, 3.0)),
        );
        let hidden = world.create_entity("hidden");
        world.attach_component(shown, ModelComponent::new(geometry, material, MaterialKind::Unlit)).unwrap();
        world
            .attach_component(hidden, ModelComponent::new(geometry, material, MaterialKind::Unlit))
            .unwrap();
        world.set_model_visible(hidden, false);

        let queue = RenderQueue::collect(&world);
        let items: Vec<_> = queue.items().collect();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].uniforms.model[3], [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn active_camera_is_the_first_one() {
        let mut world = World::new();
        assert!(active_camera(&world).is_none());
        let first = world.create_entity("main");
        let second = world.create_entity("minimap");
        world.attach(first, CameraComponent::default()).unwrap();
        world.attach(second, CameraComponent::default()).unwrap();
        let (entity, view_projection) = active_camera(&world).unwrap();
        assert_eq!(entity, first);
        assert_eq!(view_projection, CameraComponent::default().view_projection());
    }
}
