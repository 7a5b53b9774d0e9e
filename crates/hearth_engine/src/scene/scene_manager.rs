//! # Scene Manager
//!
//! Owns the ECS world, the physics bridge, the resource caches and the script
//! host, and is the only place entities are torn down.
//!
//! Removal is two-phase: [`Scene::remove`] only marks an entity, and
//! [`Scene::update`] tears every marked entity down once per frame. Mutations
//! requested by scripts or collision handlers go through the
//! [`CommandQueue`] and are applied after the callback loop finishes.
//!
//! Component teardown follows [`ComponentKind::TEARDOWN_ORDER`]: the rigid
//! body leaves the physics world before the transform its motion state reads
//! is invalidated, and model teardown returns its geometry and material
//! references to the caches.

use super::commands::{CommandQueue, SceneCommand};
use super::SceneError;
use crate::assets::{GeometryHandle, MaterialHandle, ResourceError, Resources};
use crate::config::SceneConfig;
use crate::ecs::components::{
    CameraComponent, LightComponent, ModelComponent, RigidBodyComponent, RigidBodyDesc, Space,
    TransformComponent,
};
use crate::ecs::systems::{update_transform, SyncOrigin, WorldMotionState};
use crate::ecs::{ComponentKind, EcsError, Entity, World};
use crate::foundation::math::{isometry, Iso3, Mat4, Quat, Vec3};
use crate::physics::{BodyHandle, CollisionEvent, PhysicsBridge, ShapeDesc};
use crate::render::{self, HeadlessDevice, RenderDevice, RenderQueue};
use crate::scripting::{NullScriptHost, ScriptHost};

/// Snapshot of store sizes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneStats {
    /// Live entities
    pub entity_count: usize,
    /// Attached cameras
    pub camera_count: usize,
    /// Attached models
    pub model_count: usize,
    /// Attached lights
    pub light_count: usize,
    /// Attached rigid bodies
    pub rigid_body_count: usize,
    /// Entities waiting for the next flush
    pub pending_removals: usize,
}

/// What happened during one [`Scene::tick`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Collision events delivered this frame, two per contact point
    pub collisions: Vec<CollisionEvent>,
    /// Entities torn down by the end-of-frame flush
    pub removed: usize,
}

/// A world of entities together with the subsystems their components use
pub struct Scene {
    config: SceneConfig,
    world: World,
    physics: PhysicsBridge,
    resources: Resources,
    scripts: Box<dyn ScriptHost>,
    commands: CommandQueue,
    pending: Vec<Entity>,
}

impl Scene {
    /// Scene with a headless render device and no scripts
    pub fn new(config: SceneConfig) -> Self {
        Self::with_device(config, Box::new(HeadlessDevice::new()))
    }

    /// Scene uploading through `device`
    pub fn with_device(config: SceneConfig, device: Box<dyn RenderDevice>) -> Self {
        log::info!("creating scene with asset root {}", config.asset_root);
        Self {
            physics: PhysicsBridge::new(&config.physics),
            resources: Resources::new(config.asset_root.clone(), device),
            world: World::new(),
            scripts: Box::new(NullScriptHost),
            commands: CommandQueue::new(),
            pending: Vec::new(),
            config,
        }
    }

    /// Install a script host; live entities are registered with it
    pub fn set_script_host(&mut self, mut host: Box<dyn ScriptHost>) {
        for entity in self.world.entities() {
            host.register(entity, self.world.name(entity).unwrap_or_default());
        }
        self.scripts = host;
    }

    /// Configuration the scene was built from
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Read access to entities and components
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable world access for side-effect-free edits (names, tags, camera
    /// and light parameters, model visibility)
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Physics bridge
    pub fn physics(&self) -> &PhysicsBridge {
        &self.physics
    }

    /// Resource caches
    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    /// Mutable resource caches, for loading resources ahead of attaching them
    pub fn resources_mut(&mut self) -> &mut Resources {
        &mut self.resources
    }

    /// Queue for mutations to apply at the next command flush
    pub fn commands_mut(&mut self) -> &mut CommandQueue {
        &mut self.commands
    }

    /// Store sizes and pending removals
    pub fn stats(&self) -> SceneStats {
        SceneStats {
            entity_count: self.world.entity_count(),
            camera_count: self.world.query::<CameraComponent>().count(),
            model_count: self.world.query::<ModelComponent>().count(),
            light_count: self.world.query::<LightComponent>().count(),
            rigid_body_count: self.world.query::<RigidBodyComponent>().count(),
            pending_removals: self.pending.len(),
        }
    }

    // ---- entities ----

    /// Create an entity at the origin
    pub fn create_entity(&mut self, name: &str) -> Entity {
        self.create_entity_at(name, TransformComponent::identity())
    }

    /// Create an entity with the given transform and register it with the script host
    pub fn create_entity_at(&mut self, name: &str, transform: TransformComponent) -> Entity {
        let entity = self.world.create_entity_with(name, transform);
        self.scripts.register(entity, name);
        log::debug!("scene: created entity {entity} '{name}'");
        entity
    }

    /// Mark an entity for removal at the next [`Scene::update`].
    ///
    /// Returns `false` for a dead handle or an entity that is already marked.
    pub fn remove(&mut self, entity: Entity) -> bool {
        if !self.world.is_alive(entity) {
            log::warn!("Scene::remove: invalid entity {entity}");
            return false;
        }
        if self.pending.contains(&entity) {
            log::warn!("Scene::remove: entity {entity} is already marked for removal");
            return false;
        }
        self.pending.push(entity);
        log::debug!("scene: entity {entity} marked for removal");
        true
    }

    /// Mark the first entity named `name` for removal
    pub fn remove_by_name(&mut self, name: &str) -> bool {
        match self.world.find_by_name(name) {
            Some(entity) => self.remove(entity),
            None => {
                log::warn!("Scene::remove_by_name: no entity named '{name}'");
                false
            }
        }
    }

    /// Whether the entity is waiting for the next flush
    pub fn is_pending_removal(&self, entity: Entity) -> bool {
        self.pending.contains(&entity)
    }

    /// Tear down every entity marked for removal; returns how many were removed
    pub fn update(&mut self) -> usize {
        let pending = std::mem::take(&mut self.pending);
        let removed = pending.into_iter().filter(|&entity| self.destroy(entity)).count();
        if removed > 0 {
            log::debug!("scene: flushed {removed} entities");
        }
        removed
    }

    /// Remove every entity now
    pub fn clear(&mut self) -> usize {
        let entities: Vec<_> = self.world.entities().collect();
        for entity in entities {
            if !self.pending.contains(&entity) {
                self.pending.push(entity);
            }
        }
        self.update()
    }

    fn destroy(&mut self, entity: Entity) -> bool {
        if !self.world.is_alive(entity) {
            log::warn!("Scene::update: entity {entity} vanished before its flush");
            return false;
        }
        for kind in ComponentKind::TEARDOWN_ORDER {
            if kind != ComponentKind::Transform && self.world.has(entity, kind) {
                self.teardown_component(entity, kind);
            }
        }
        self.scripts.unregister(entity);
        self.world.destroy_entity(entity)
    }

    fn teardown_component(&mut self, entity: Entity, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::RigidBody => {
                if let Some(body) = self.body_of(entity) {
                    if let Err(e) = self.physics.remove_body(body) {
                        log::warn!("teardown of entity {entity}: {e}");
                    }
                }
            }
            ComponentKind::Model => {
                if let Some(model) = self.world.get::<ModelComponent>(entity) {
                    let (geometry, material) = (model.geometry(), model.material());
                    self.release_model_refs(geometry, material);
                }
            }
            ComponentKind::Transform | ComponentKind::Camera | ComponentKind::Light => {}
        }
        self.world.detach(entity, kind)
    }

    fn release_model_refs(&mut self, geometry: GeometryHandle, material: MaterialHandle) {
        if let Err(e) = self.resources.release_geometry(geometry) {
            log::warn!("releasing geometry {geometry:?}: {e}");
        }
        if let Err(e) = self.resources.release_material(material) {
            log::warn!("releasing material {material:?}: {e}");
        }
    }

    // ---- components ----

    fn check_can_attach(&self, entity: Entity, kind: ComponentKind) -> Result<(), SceneError> {
        if !self.world.is_alive(entity) {
            log::warn!("attach {kind}: invalid entity {entity}");
            return Err(EcsError::InvalidEntity(entity).into());
        }
        if self.world.has(entity, kind) {
            log::warn!("attach {kind}: entity {entity} already has one");
            return Err(EcsError::AlreadyAttached { entity, kind }.into());
        }
        Ok(())
    }

    /// Attach a camera; its view is computed from the entity's transform
    pub fn attach_camera(&mut self, entity: Entity, mut camera: CameraComponent) -> Result<u32, SceneError> {
        self.check_can_attach(entity, ComponentKind::Camera)?;
        if let Some(transform) = self.world.get::<TransformComponent>(entity) {
            camera.update_view(transform);
        }
        Ok(self.world.attach(entity, camera)?)
    }

    /// Attach a light
    pub fn attach_light(&mut self, entity: Entity, light: LightComponent) -> Result<u32, SceneError> {
        Ok(self.world.attach(entity, light)?)
    }

    /// Load geometry and material files and attach them as a model
    pub fn attach_model(&mut self, entity: Entity, geometry: &str, material: &str) -> Result<u32, SceneError> {
        self.check_can_attach(entity, ComponentKind::Model)?;
        let geometry = self.resources.load_geometry(geometry)?;
        let material = match self.resources.load_material(material) {
            Ok(material) => material,
            Err(e) => {
                if let Err(release) = self.resources.release_geometry(geometry) {
                    log::warn!("releasing geometry after failed material load: {release}");
                }
                return Err(e.into());
            }
        };
        self.attach_model_handles(entity, geometry, material)
    }

    /// Attach a model from handles the caller already holds.
    ///
    /// One reference to each handle moves into the component; on failure both
    /// references are released.
    pub fn attach_model_handles(
        &mut self,
        entity: Entity,
        geometry: GeometryHandle,
        material: MaterialHandle,
    ) -> Result<u32, SceneError> {
        let kind = self.resources.material(material).map(|m| m.kind);
        let outcome = match kind {
            Some(kind) if self.resources.geometries().get(geometry).is_some() => self
                .world
                .attach_component(entity, ModelComponent::new(geometry, material, kind))
                .map_err(SceneError::from),
            _ => {
                log::error!("attach model: stale geometry or material handle for entity {entity}");
                Err(ResourceError::InvalidHandle.into())
            }
        };
        if outcome.is_err() {
            self.release_model_refs(geometry, material);
        }
        outcome
    }

    /// Create a physics body for the entity at its current pose.
    ///
    /// A missing shape falls back to the default unit box; an invalid shape
    /// is rejected.
    pub fn attach_rigid_body(&mut self, entity: Entity, desc: RigidBodyDesc) -> Result<BodyHandle, SceneError> {
        self.check_can_attach(entity, ComponentKind::RigidBody)?;
        let shape = desc.shape.clone().unwrap_or_else(|| {
            log::debug!("entity {entity}: no shape given, using the default box");
            ShapeDesc::default_box()
        });
        let key = self.physics.create_shape(shape.clone())?;
        let pose = self
            .world
            .get::<TransformComponent>(entity)
            .map_or_else(Iso3::identity, |t| isometry(&t.position(), &t.rotation()));
        let body = self.physics.create_body(entity, Some(key), &pose, &desc);
        self.physics.release_shape(key);
        let body = body?;

        if let Err(e) = self.world.attach_component(entity, RigidBodyComponent::new(body, shape, &desc)) {
            if let Err(remove) = self.physics.remove_body(body) {
                log::warn!("rolling back body of entity {entity}: {remove}");
            }
            return Err(e.into());
        }
        Ok(body)
    }

    /// Tear down and detach one component.
    ///
    /// The transform cannot be removed on its own. Not safe to call for
    /// entities the physics step is iterating; queue a
    /// [`SceneCommand::RemoveComponent`] from callbacks instead.
    pub fn remove_component(&mut self, entity: Entity, kind: ComponentKind) -> Result<(), SceneError> {
        if !self.world.is_alive(entity) {
            log::warn!("Scene::remove_component: invalid entity {entity}");
            return Err(EcsError::InvalidEntity(entity).into());
        }
        if kind == ComponentKind::Transform {
            log::warn!("Scene::remove_component: entity {entity} must keep its transform");
            return Err(SceneError::TransformRequired(entity));
        }
        if !self.world.has(entity, kind) {
            log::warn!("Scene::remove_component: entity {entity} has no {kind} component");
            return Err(EcsError::NotAttached { entity, kind }.into());
        }
        self.teardown_component(entity, kind);
        Ok(())
    }

    // ---- transforms ----

    /// Transform of an entity
    pub fn transform(&self, entity: Entity) -> Option<&TransformComponent> {
        self.world.get::<TransformComponent>(entity)
    }

    /// Edit a transform and propagate to the camera and physics body
    pub fn edit_transform<R>(
        &mut self,
        entity: Entity,
        edit: impl FnOnce(&mut TransformComponent) -> R,
    ) -> Option<R> {
        update_transform(&mut self.world, entity, SyncOrigin::Gameplay(&mut self.physics), edit)
    }

    /// Set the position
    pub fn set_position(&mut self, entity: Entity, position: Vec3) -> bool {
        self.edit_transform(entity, |t| t.set_position(position)).is_some()
    }

    /// Set the rotation
    pub fn set_rotation(&mut self, entity: Entity, rotation: Quat) -> bool {
        self.edit_transform(entity, |t| t.set_rotation(rotation)).is_some()
    }

    /// Set the scale
    pub fn set_scale(&mut self, entity: Entity, scale: Vec3) -> bool {
        self.edit_transform(entity, |t| t.set_scale(scale)).is_some()
    }

    /// Move by `offset` in the given space
    pub fn translate(&mut self, entity: Entity, offset: Vec3, space: Space) -> bool {
        self.edit_transform(entity, |t| t.translate(offset, space)).is_some()
    }

    /// Rotate by `delta` in the given space
    pub fn rotate(&mut self, entity: Entity, delta: Quat, space: Space) -> bool {
        self.edit_transform(entity, |t| t.rotate(delta, space)).is_some()
    }

    /// Turn to face `direction`; `false` if nothing changed
    pub fn set_forward(&mut self, entity: Entity, direction: Vec3) -> bool {
        self.edit_transform(entity, |t| t.set_forward(direction)).unwrap_or(false)
    }

    /// Turn to face `target`; `false` if nothing changed
    pub fn set_look_at(&mut self, entity: Entity, target: Vec3) -> bool {
        self.edit_transform(entity, |t| t.set_look_at(target)).unwrap_or(false)
    }

    /// Rotate the up vector onto `direction`; `false` if nothing changed
    pub fn set_up_vector(&mut self, entity: Entity, direction: Vec3) -> bool {
        self.edit_transform(entity, |t| t.set_up_vector(direction)).unwrap_or(false)
    }

    // ---- physics ----

    /// Physics body of an entity
    pub fn body_of(&self, entity: Entity) -> Option<BodyHandle> {
        self.world.get::<RigidBodyComponent>(entity).map(RigidBodyComponent::body)
    }

    fn require_body(&self, entity: Entity, what: &str) -> Option<BodyHandle> {
        let body = self.body_of(entity);
        if body.is_none() {
            log::warn!("{what}: entity {entity} has no rigid body");
        }
        body
    }

    /// Force applied during the next step
    pub fn apply_force(&mut self, entity: Entity, force: Vec3) -> bool {
        let Some(body) = self.require_body(entity, "apply_force") else {
            return false;
        };
        self.physics.apply_force(body, force);
        true
    }

    /// Instantaneous impulse
    pub fn apply_impulse(&mut self, entity: Entity, impulse: Vec3) -> bool {
        let Some(body) = self.require_body(entity, "apply_impulse") else {
            return false;
        };
        self.physics.apply_impulse(body, impulse);
        true
    }

    /// Overwrite the linear velocity
    pub fn set_linear_velocity(&mut self, entity: Entity, velocity: Vec3) -> bool {
        let Some(body) = self.require_body(entity, "set_linear_velocity") else {
            return false;
        };
        self.physics.set_linear_velocity(body, velocity);
        true
    }

    /// Linear velocity of the entity's body
    pub fn linear_velocity(&self, entity: Entity) -> Option<Vec3> {
        self.physics.linear_velocity(self.body_of(entity)?)
    }

    /// Change gravity for every body
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.physics.set_gravity(gravity);
    }

    /// Step the simulation, deliver collisions to the script host and apply
    /// the commands the handlers queued
    pub fn step_physics(&mut self, dt: f32) -> Vec<CollisionEvent> {
        let events = {
            let mut motion = WorldMotionState::new(&mut self.world);
            self.physics.step(dt, &mut motion)
        };
        for event in &events {
            self.scripts.on_collision(&self.world, event, &mut self.commands);
        }
        self.apply_commands();
        events
    }

    // ---- frame ----

    /// One frame: scripts, physics with collision delivery, then the removal flush
    pub fn tick(&mut self, dt: f32) -> TickReport {
        self.scripts.update(&self.world, dt, &mut self.commands);
        self.apply_commands();
        let collisions = self.step_physics(dt);
        let removed = self.update();
        TickReport { collisions, removed }
    }

    /// Apply every queued command in order
    pub fn apply_commands(&mut self) {
        for command in self.commands.take() {
            self.apply(command);
        }
    }

    fn apply(&mut self, command: SceneCommand) {
        let failure = match command {
            SceneCommand::Spawn { name, transform } => {
                self.create_entity_at(&name, transform);
                None
            }
            SceneCommand::Remove(entity) => {
                self.remove(entity);
                None
            }
            SceneCommand::RemoveByName(name) => {
                self.remove_by_name(&name);
                None
            }
            SceneCommand::AttachCamera(entity, camera) => self.attach_camera(entity, camera).err(),
            SceneCommand::AttachLight(entity, light) => self.attach_light(entity, light).err(),
            SceneCommand::AttachModel { entity, geometry, material } => {
                self.attach_model(entity, &geometry, &material).err()
            }
            SceneCommand::AttachRigidBody(entity, desc) => self.attach_rigid_body(entity, desc).err(),
            SceneCommand::RemoveComponent(entity, kind) => self.remove_component(entity, kind).err(),
            SceneCommand::SetPosition(entity, position) => {
                self.set_position(entity, position);
                None
            }
            SceneCommand::SetRotation(entity, rotation) => {
                self.set_rotation(entity, rotation);
                None
            }
            SceneCommand::SetScale(entity, scale) => {
                self.set_scale(entity, scale);
                None
            }
            SceneCommand::Translate(entity, offset, space) => {
                self.translate(entity, offset, space);
                None
            }
            SceneCommand::Rotate(entity, delta, space) => {
                self.rotate(entity, delta, space);
                None
            }
            SceneCommand::ApplyForce(entity, force) => {
                self.apply_force(entity, force);
                None
            }
            SceneCommand::ApplyImpulse(entity, impulse) => {
                self.apply_impulse(entity, impulse);
                None
            }
            SceneCommand::SetLinearVelocity(entity, velocity) => {
                self.set_linear_velocity(entity, velocity);
                None
            }
        };
        if let Some(e) = failure {
            log::warn!("deferred command failed: {e}");
        }
    }

    // ---- rendering ----

    /// Visible models batched by material
    pub fn render_queue(&self) -> RenderQueue {
        RenderQueue::collect(&self.world)
    }

    /// Entity and view-projection matrix of the active camera
    pub fn active_camera(&self) -> Option<(Entity, Mat4)> {
        render::active_camera(&self.world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;

    fn scene() -> Scene {
        Scene::new(SceneConfig::default().with_physics(PhysicsConfig {
            gravity: [0.0, 0.0, 0.0],
            ..PhysicsConfig::default()
        }))
    }

    #[test]
    fn every_entity_has_a_transform() {
        let mut scene = scene();
        let entity = scene.create_entity("Box");
        assert!(scene.transform(entity).is_some());
        assert!(matches!(
            scene.remove_component(entity, ComponentKind::Transform),
            Err(SceneError::TransformRequired(_))
        ));
    }

    #[test]
    fn removal_is_deferred_until_update() {
        let mut scene = scene();
        let entity = scene.create_entity("Box");
        assert!(scene.remove(entity));
        assert!(scene.world().is_alive(entity));
        assert!(scene.is_pending_removal(entity));
        assert_eq!(scene.stats().pending_removals, 1);

        assert_eq!(scene.update(), 1);
        assert!(!scene.world().is_alive(entity));
        assert!(!scene.remove(entity));
    }

    #[test]
    fn remove_by_name_marks_the_named_entity() {
        let mut scene = scene();
        let pickup = scene.create_entity("Pickup");
        assert!(scene.remove_by_name("Pickup"));
        assert!(!scene.remove_by_name("Nobody"));
        scene.update();
        assert!(!scene.world().is_alive(pickup));
    }

    #[test]
    fn missing_shape_becomes_default_box() {
        let mut scene = scene();
        let entity = scene.create_entity("Crate");
        let desc = RigidBodyDesc {
            shape: None,
            ..RigidBodyDesc::default()
        };
        scene.attach_rigid_body(entity, desc).unwrap();
        let body = scene.world().get::<RigidBodyComponent>(entity).unwrap();
        assert_eq!(body.shape(), &ShapeDesc::default_box());
    }

    #[test]
    fn invalid_shape_is_rejected() {
        let mut scene = scene();
        let entity = scene.create_entity("Crate");
        let desc = RigidBodyDesc::dynamic(ShapeDesc::Sphere { radius: -1.0 }, 1.0);
        assert!(matches!(scene.attach_rigid_body(entity, desc), Err(SceneError::Physics(_))));
        assert!(!scene.world().has(entity, ComponentKind::RigidBody));
        assert_eq!(scene.physics().body_count(), 0);
        assert!(scene.physics().shapes().is_empty());
    }

    #[test]
    fn second_rigid_body_is_refused() {
        let mut scene = scene();
        let entity = scene.create_entity("Crate");
        scene.attach_rigid_body(entity, RigidBodyDesc::default()).unwrap();
        assert!(matches!(
            scene.attach_rigid_body(entity, RigidBodyDesc::default()),
            Err(SceneError::Ecs(EcsError::AlreadyAttached { .. }))
        ));
        assert_eq!(scene.physics().body_count(), 1);
    }

    #[test]
    fn removing_a_body_component_removes_the_body() {
        let mut scene = scene();
        let entity = scene.create_entity("Crate");
        let body = scene.attach_rigid_body(entity, RigidBodyDesc::default()).unwrap();
        scene.remove_component(entity, ComponentKind::RigidBody).unwrap();
        assert!(!scene.physics().contains(body));
        assert!(scene.physics().shapes().is_empty());
        assert!(scene.remove_component(entity, ComponentKind::RigidBody).is_err());
    }

    #[test]
    fn queued_commands_apply_in_order() {
        let mut scene = scene();
        let entity = scene.create_entity("Box");
        scene.commands_mut().translate(entity, Vec3::new(1.0, 0.0, 0.0), Space::World);
        scene
            .commands_mut()
            .push(SceneCommand::AttachLight(entity, LightComponent::default()));
        scene.commands_mut().remove(entity);
        scene.apply_commands();

        assert_eq!(scene.transform(entity).unwrap().position(), Vec3::new(1.0, 0.0, 0.0));
        assert!(scene.world().has(entity, ComponentKind::Light));
        assert!(scene.is_pending_removal(entity));
    }

    #[test]
    fn camera_view_tracks_transform_edits() {
        let mut scene = scene();
        let entity = scene.create_entity("Camera");
        scene.attach_camera(entity, CameraComponent::default()).unwrap();
        scene.set_position(entity, Vec3::new(0.0, 0.0, 10.0));
        let (active, _) = scene.active_camera().unwrap();
        assert_eq!(active, entity);
        let view = *scene.world().get::<CameraComponent>(entity).unwrap().view();
        let eye = view.transform_point(&Point3::new(0.0, 0.0, 10.0));
        assert_relative_eq!(eye.coords, Vec3::zeros(), epsilon = 1e-5);
    }

    #[test]
    fn clear_tears_down_everything() {
        let mut scene = scene();
        for name in ["a", "b", "c"] {
            let entity = scene.create_entity(name);
            scene.attach_rigid_body(entity, RigidBodyDesc::default()).unwrap();
        }
        assert_eq!(scene.clear(), 3);
        assert_eq!(scene.stats(), SceneStats::default());
        assert_eq!(scene.physics().body_count(), 0);
        scene.world().validate().unwrap();
    }
}
