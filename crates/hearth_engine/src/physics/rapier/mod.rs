//! [`DynamicsWorld`] backed by rapier
//!
//! Each engine body is one rapier rigid body with a single attached collider.
//! The body's `user_data` packs the engine body key (high 64 bits) and the
//! owning entity (low 64 bits), so contact pairs map straight back to owners.
//!
//! Stepping follows the fixed-step accumulator model: elapsed time
//! accumulates, whole fixed steps are taken up to the clamp and the rest is
//! dropped.

mod conversions;

use rapier3d::dynamics::{
    CCDSolver, CoefficientCombineRule, ImpulseJointSet, IntegrationParameters, IslandManager,
    MultibodyJointSet, RigidBodyBuilder, RigidBodyHandle, RigidBodySet,
};
use rapier3d::geometry::{Collider, ColliderBuilder, ColliderSet, DefaultBroadPhase, NarrowPhase};
use rapier3d::na;
use rapier3d::pipeline::PhysicsPipeline;
use slotmap::{Key, KeyData, SlotMap};

use self::conversions::{from_rapier_iso, from_rapier_point, from_rapier_vec, to_rapier_iso, to_rapier_vec};
use super::dynamics::{
    BodyDesc, BodyHandle, ContactManifold, ContactPoint, DynamicsWorld, MotionStateSync, RemovedBody,
};
use super::shape::{ShapeDesc, ShapeKey};
use crate::ecs::Entity;
use crate::foundation::math::{Iso3, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Fixed,
    Kinematic,
    Dynamic,
}

#[derive(Debug, Clone)]
struct BodyEntry {
    handle: RigidBodyHandle,
    owner: Entity,
    shape_key: ShapeKey,
    kind: BodyKind,
    inv_mass: f32,
    local_inertia: Vec3,
}

fn pack_user_data(body: BodyHandle, owner: Entity) -> u128 {
    let entity = (u64::from(owner.generation()) << 32) | u64::from(owner.index());
    (u128::from(body.data().as_ffi()) << 64) | u128::from(entity)
}

#[allow(clippy::cast_possible_truncation)]
fn unpack_user_data(data: u128) -> (BodyHandle, Entity) {
    let body = BodyHandle::from(KeyData::from_ffi((data >> 64) as u64));
    let entity = data as u64;
    (body, Entity::new(entity as u32, (entity >> 32) as u32))
}

fn collider_for(shape: &ShapeDesc) -> ColliderBuilder {
    match shape {
        ShapeDesc::Box { half_extents } => ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z),
        ShapeDesc::Sphere { radius } => ColliderBuilder::ball(*radius),
        ShapeDesc::Capsule { radius, height } => ColliderBuilder::capsule_y(height * 0.5, *radius),
        ShapeDesc::Plane { normal, constant } => {
            let normal = normal.normalize();
            ColliderBuilder::halfspace(na::Unit::new_normalize(to_rapier_vec(&normal)))
                .translation(to_rapier_vec(&(normal * *constant)))
        }
    }
}

/// Rigid-body world running on rapier's physics pipeline
pub struct RapierDynamicsWorld {
    entries: SlotMap<BodyHandle, BodyEntry>,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    gravity: Vec3,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    local_time: f32,
    manifolds: Vec<ContactManifold>,
}

impl Default for RapierDynamicsWorld {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, -9.81, 0.0))
    }
}

impl RapierDynamicsWorld {
    /// Create an empty world
    pub fn new(gravity: Vec3) -> Self {
        Self {
            entries: SlotMap::with_key(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            gravity,
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            local_time: 0.0,
            manifolds: Vec::new(),
        }
    }

    fn rigid_body(&self, body: BodyHandle) -> Option<&rapier3d::dynamics::RigidBody> {
        self.entries.get(body).and_then(|entry| self.bodies.get(entry.handle))
    }

    fn rigid_body_mut(&mut self, body: BodyHandle) -> Option<&mut rapier3d::dynamics::RigidBody> {
        let handle = self.entries.get(body)?.handle;
        self.bodies.get_mut(handle)
    }

    fn sync_kinematic(&mut self, motion: &dyn MotionStateSync) {
        for entry in self.entries.values() {
            if entry.kind != BodyKind::Kinematic {
                continue;
            }
            let Some(transform) = motion.get_world_transform(entry.owner) else {
                continue;
            };
            if let Some(rb) = self.bodies.get_mut(entry.handle) {
                rb.set_next_kinematic_position(to_rapier_iso(&transform));
            }
        }
    }

    fn run_pipeline(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        let gravity = to_rapier_vec(&self.gravity);
        self.pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    fn owner_of_collider(&self, collider: &Collider) -> Option<(BodyHandle, Entity)> {
        let parent = collider.parent()?;
        let rb = self.bodies.get(parent)?;
        Some(unpack_user_data(rb.user_data))
    }

    fn collect_manifolds(&self) -> Vec<ContactManifold> {
        let mut manifolds = Vec::new();
        for pair in self.narrow_phase.contact_pairs() {
            if !pair.has_any_active_contact {
                continue;
            }
            let (Some(c1), Some(c2)) = (self.colliders.get(pair.collider1), self.colliders.get(pair.collider2)) else {
                continue;
            };
            let (Some((body_a, owner_a)), Some((body_b, owner_b))) =
                (self.owner_of_collider(c1), self.owner_of_collider(c2))
            else {
                continue;
            };

            let mut points = Vec::new();
            for manifold in &pair.manifolds {
                // local_n1 points out of collider 1 towards collider 2
                let normal_on_b = -c1.position().rotation.transform_vector(&manifold.local_n1);
                for contact in &manifold.points {
                    points.push(ContactPoint {
                        position_on_a: from_rapier_point(&c1.position().transform_point(&contact.local_p1)),
                        position_on_b: from_rapier_point(&c2.position().transform_point(&contact.local_p2)),
                        normal_on_b: from_rapier_vec(&normal_on_b),
                        distance: contact.dist,
                    });
                }
            }
            if !points.is_empty() {
                manifolds.push(ContactManifold {
                    body_a,
                    body_b,
                    owner_a,
                    owner_b,
                    points,
                });
            }
        }
        manifolds
    }

    fn write_back(&mut self, motion: &mut dyn MotionStateSync) {
        for entry in self.entries.values() {
            if entry.kind != BodyKind::Dynamic {
                continue;
            }
            if let Some(rb) = self.bodies.get(entry.handle) {
                if !rb.is_sleeping() {
                    motion.set_world_transform(entry.owner, &from_rapier_iso(rb.position()));
                }
            }
        }
    }
}

impl DynamicsWorld for RapierDynamicsWorld {
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle {
        let kind = if desc.is_kinematic {
            BodyKind::Kinematic
        } else if desc.mass > 0.0 {
            BodyKind::Dynamic
        } else {
            BodyKind::Fixed
        };
        let key = self.entries.insert(BodyEntry {
            handle: RigidBodyHandle::invalid(),
            owner: desc.owner,
            shape_key: desc.shape_key,
            kind,
            inv_mass: if kind == BodyKind::Dynamic { 1.0 / desc.mass } else { 0.0 },
            local_inertia: desc.local_inertia,
        });

        let builder = match kind {
            BodyKind::Fixed => RigidBodyBuilder::fixed(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_position_based(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
        };
        let rb = builder
            .position(to_rapier_iso(&desc.transform))
            .user_data(pack_user_data(key, desc.owner))
            .build();
        let handle = self.bodies.insert(rb);

        let mut collider = collider_for(&desc.shape)
            .friction(desc.friction)
            .restitution(desc.restitution)
            .friction_combine_rule(CoefficientCombineRule::Multiply)
            .restitution_combine_rule(CoefficientCombineRule::Multiply);
        if kind == BodyKind::Dynamic {
            collider = collider.mass(desc.mass);
        }
        self.colliders
            .insert_with_parent(collider.build(), handle, &mut self.bodies);

        if let Some(entry) = self.entries.get_mut(key) {
            entry.handle = handle;
        }
        key
    }

    fn remove_body(&mut self, body: BodyHandle) -> Option<RemovedBody> {
        let entry = self.entries.remove(body)?;
        self.bodies.remove(
            entry.handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
        self.manifolds.retain(|m| m.body_a != body && m.body_b != body);
        Some(RemovedBody {
            owner: entry.owner,
            shape_key: entry.shape_key,
        })
    }

    fn contains(&self, body: BodyHandle) -> bool {
        self.entries.contains_key(body)
    }

    fn body_count(&self) -> usize {
        self.entries.len()
    }

    fn owner(&self, body: BodyHandle) -> Option<Entity> {
        self.rigid_body(body).map(|rb| unpack_user_data(rb.user_data).1)
    }

    fn world_transform(&self, body: BodyHandle) -> Option<Iso3> {
        self.rigid_body(body).map(|rb| from_rapier_iso(rb.position()))
    }

    fn set_world_transform(&mut self, body: BodyHandle, transform: &Iso3) {
        let kinematic = self.entries.get(body).is_some_and(|e| e.kind == BodyKind::Kinematic);
        if let Some(rb) = self.rigid_body_mut(body) {
            let pose = to_rapier_iso(transform);
            rb.set_position(pose, true);
            if kinematic {
                rb.set_next_kinematic_position(pose);
            }
        }
    }

    fn local_inertia(&self, body: BodyHandle) -> Option<Vec3> {
        self.entries.get(body).map(|entry| entry.local_inertia)
    }

    fn activate(&mut self, body: BodyHandle) {
        if let Some(rb) = self.rigid_body_mut(body) {
            rb.wake_up(true);
        }
    }

    fn is_active(&self, body: BodyHandle) -> bool {
        self.rigid_body(body).is_some_and(|rb| !rb.is_sleeping())
    }

    fn apply_central_force(&mut self, body: BodyHandle, force: Vec3) {
        if let Some(rb) = self.rigid_body_mut(body) {
            rb.add_force(to_rapier_vec(&force), true);
        }
    }

    fn apply_central_impulse(&mut self, body: BodyHandle, impulse: Vec3) {
        let Some(inv_mass) = self.entries.get(body).map(|entry| entry.inv_mass) else {
            return;
        };
        if inv_mass == 0.0 {
            return;
        }
        if let Some(rb) = self.rigid_body_mut(body) {
            let velocity = rb.linvel() + to_rapier_vec(&impulse) * inv_mass;
            rb.set_linvel(velocity, true);
        }
    }

    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec3> {
        self.rigid_body(body).map(|rb| from_rapier_vec(rb.linvel()))
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3) {
        if let Some(rb) = self.rigid_body_mut(body) {
            rb.set_linvel(to_rapier_vec(&velocity), true);
        }
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: Vec3) {
        if let Some(rb) = self.rigid_body_mut(body) {
            rb.set_angvel(to_rapier_vec(&velocity), true);
        }
    }

    fn gravity(&self) -> Vec3 {
        self.gravity
    }

    fn set_gravity(&mut self, gravity: Vec3) {
        self.gravity = gravity;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn step_simulation(
        &mut self,
        dt: f32,
        max_sub_steps: u32,
        fixed_time_step: f32,
        motion: &mut dyn MotionStateSync,
    ) -> u32 {
        let (steps, step_dt) = if max_sub_steps == 0 || fixed_time_step <= 0.0 {
            (u32::from(dt > 0.0), dt)
        } else {
            self.local_time += dt;
            let mut steps = 0;
            if self.local_time >= fixed_time_step {
                steps = (self.local_time / fixed_time_step) as u32;
                self.local_time -= steps as f32 * fixed_time_step;
            }
            if steps > max_sub_steps {
                log::trace!("dropping {} physics sub-steps", steps - max_sub_steps);
                self.local_time = 0.0;
                steps = max_sub_steps;
            }
            (steps, fixed_time_step)
        };

        for _ in 0..steps {
            self.sync_kinematic(motion);
            self.run_pipeline(step_dt);
        }
        if steps > 0 {
            for (_, rb) in self.bodies.iter_mut() {
                rb.reset_forces(false);
            }
            self.manifolds = self.collect_manifolds();
            self.write_back(motion);
        }
        steps
    }

    fn manifolds(&self) -> &[ContactManifold] {
        &self.manifolds
    }
}
