use crate::actor::{BodyCommand, BodyKind, Pose};
use crate::catalog::{ColliderShape, PhysicsProfile};
use crate::vortex;
use bevy_ecs::prelude::*;
use glam::{Quat, Vec3};
use rapier3d::na::{Isometry3, Quaternion, Translation3, UnitQuaternion};
use rapier3d::pipeline::{ActiveEvents, EventHandler};
use rapier3d::prelude::{
    CCDSolver, Collider, ColliderBuilder, ColliderHandle, ColliderSet, CollisionEvent, ContactPair, DefaultBroadPhase,
    ImpulseJointHandle, ImpulseJointSet, IntegrationParameters, IslandManager, MultibodyJointSet, NarrowPhase,
    PhysicsPipeline, Point, Real, RigidBody, RigidBodyBuilder, RigidBodyHandle, RigidBodySet, RigidBodyType,
    SphericalJointBuilder, Vector,
};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Resource, Clone, Copy, Debug)]
pub struct PhysicsParams {
    pub gravity: Vec3,
    /// Longest frame the simulation will integrate; slower frames run in slow motion.
    pub max_frame_dt: f32,
    pub precision_dt: f32,
    pub max_substeps: u32,
    /// Half size of the walled arena around the origin.
    pub arena_half_extent: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            max_frame_dt: 1.0 / 30.0,
            precision_dt: 1.0 / 120.0,
            max_substeps: 8,
            arena_half_extent: 50.0,
        }
    }
}

struct ContactForceCollector {
    force_events: Mutex<Vec<(ColliderHandle, ColliderHandle, f32)>>,
}

impl ContactForceCollector {
    fn new() -> Self {
        Self { force_events: Mutex::new(Vec::new()) }
    }

    fn drain(&self) -> Vec<(ColliderHandle, ColliderHandle, f32)> {
        if let Ok(mut events) = self.force_events.lock() {
            std::mem::take(&mut *events)
        } else {
            Vec::new()
        }
    }
}

impl EventHandler for ContactForceCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        contact_pair: &ContactPair,
        total_force_magnitude: Real,
    ) {
        if let Ok(mut events) = self.force_events.lock() {
            events.push((contact_pair.collider1, contact_pair.collider2, total_force_magnitude));
        }
    }
}

#[derive(Resource)]
pub struct RapierState {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    collider_entities: HashMap<ColliderHandle, Entity>,
    event_collector: ContactForceCollector,
    boundary_entity: Entity,
    params: PhysicsParams,
}

impl RapierState {
    pub fn new(params: &PhysicsParams, boundary_entity: Entity) -> Self {
        let mut state = Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vec_to_rapier(params.gravity),
            integration_parameters: IntegrationParameters::default(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            collider_entities: HashMap::new(),
            event_collector: ContactForceCollector::new(),
            boundary_entity,
            params: *params,
        };
        state.init_arena();
        state
    }

    /// Ground slab with its top face at y = 0 plus four walls.
    fn init_arena(&mut self) {
        let half = self.params.arena_half_extent;
        self.insert_static_collider(Vec3::new(0.0, -0.5, 0.0), Vec3::new(half, 0.5, half), 1.0, 0.2);
        let wall_height = 20.0;
        let walls = [
            (Vec3::new(0.0, wall_height * 0.5, -half), Vec3::new(half, wall_height, 1.0)),
            (Vec3::new(0.0, wall_height * 0.5, half), Vec3::new(half, wall_height, 1.0)),
            (Vec3::new(-half, wall_height * 0.5, 0.0), Vec3::new(1.0, wall_height, half)),
            (Vec3::new(half, wall_height * 0.5, 0.0), Vec3::new(1.0, wall_height, half)),
        ];
        for (center, half_extents) in walls {
            self.insert_static_collider(center, half_extents, 0.5, 0.2);
        }
    }

    fn insert_static_collider(&mut self, center: Vec3, half: Vec3, friction: f32, restitution: f32) {
        let body = RigidBodyBuilder::fixed().translation(vec_to_rapier(center)).build();
        let body_handle = self.bodies.insert(body);
        let collider =
            ColliderBuilder::cuboid(half.x, half.y, half.z).friction(friction).restitution(restitution).build();
        let handle = self.colliders.insert_with_parent(collider, body_handle, &mut self.bodies);
        self.collider_entities.insert(handle, self.boundary_entity);
    }

    pub fn spawn_body(&mut self, kind: BodyKind, pose: Pose) -> RigidBodyHandle {
        let body = RigidBodyBuilder::new(body_type(kind)).position(pose_to_isometry(pose)).build();
        self.bodies.insert(body)
    }

    /// Attaches one collider to `body`. `report_forces` turns on contact force events for stress warnings.
    pub fn attach_collider(
        &mut self,
        body: RigidBodyHandle,
        shape: ColliderShape,
        material: PhysicsProfile,
        entity: Entity,
        report_forces: bool,
    ) -> ColliderHandle {
        let builder = match shape {
            ColliderShape::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderShape::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
            ColliderShape::Cylinder { half_height, radius } => ColliderBuilder::cylinder(half_height, radius),
        };
        let mut builder =
            builder.density(material.density).friction(material.friction).restitution(material.restitution);
        if report_forces {
            builder = builder.active_events(ActiveEvents::CONTACT_FORCE_EVENTS).contact_force_event_threshold(0.0);
        }
        let handle = self.colliders.insert_with_parent(builder.build(), body, &mut self.bodies);
        self.collider_entities.insert(handle, entity);
        handle
    }

    pub fn detach_colliders(&mut self, body: RigidBodyHandle) {
        let collider_handles: Vec<ColliderHandle> =
            self.bodies.get(body).map(|body| body.colliders().to_vec()).unwrap_or_default();
        for collider in collider_handles {
            self.collider_entities.remove(&collider);
            let _ = self.colliders.remove(collider, &mut self.island_manager, &mut self.bodies, true);
        }
    }

    pub fn spawn_cloth_node(
        &mut self,
        position: Vec3,
        half_extents: Vec3,
        profile: PhysicsProfile,
        damping: f32,
        kind: BodyKind,
        entity: Entity,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::new(body_type(kind))
            .translation(vec_to_rapier(position))
            .linear_damping(damping)
            .angular_damping(damping)
            .build();
        let handle = self.bodies.insert(body);
        self.attach_collider(handle, ColliderShape::Cuboid { half_extents }, profile, entity, false);
        handle
    }

    /// Projectiles start disabled and parked; [`Self::launch_projectile`] brings them to life.
    pub fn spawn_projectile(
        &mut self,
        parked_at: Vec3,
        radius: f32,
        profile: PhysicsProfile,
        damping: f32,
        entity: Entity,
    ) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(vec_to_rapier(parked_at))
            .linear_damping(damping)
            .ccd_enabled(true)
            .enabled(false)
            .build();
        let handle = self.bodies.insert(body);
        self.attach_collider(handle, ColliderShape::Ball { radius }, profile, entity, false);
        handle
    }

    pub fn launch_projectile(&mut self, handle: RigidBodyHandle, origin: Vec3, velocity: Vec3) -> bool {
        match self.bodies.get_mut(handle) {
            Some(body) => {
                body.set_enabled(true);
                body.set_translation(vec_to_rapier(origin), true);
                body.set_angvel(Vector::zeros(), true);
                body.set_linvel(vec_to_rapier(velocity), true);
                body.wake_up(true);
                true
            }
            None => false,
        }
    }

    pub fn park_projectile(&mut self, handle: RigidBodyHandle, parked_at: Vec3) {
        if let Some(body) = self.bodies.get_mut(handle) {
            body.set_translation(vec_to_rapier(parked_at), false);
            body.set_linvel(Vector::zeros(), false);
            body.set_angvel(Vector::zeros(), false);
            body.set_enabled(false);
        }
    }

    pub fn add_spherical_joint(
        &mut self,
        a: RigidBodyHandle,
        b: RigidBodyHandle,
        anchor_a: Vec3,
        anchor_b: Vec3,
    ) -> ImpulseJointHandle {
        let joint = SphericalJointBuilder::new()
            .local_anchor1(Point::new(anchor_a.x, anchor_a.y, anchor_a.z))
            .local_anchor2(Point::new(anchor_b.x, anchor_b.y, anchor_b.z))
            .build();
        self.impulse_joints.insert(a, b, joint, true)
    }

    /// Removes the body, its colliders and every joint attached to it.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        let collider_handles: Vec<ColliderHandle> =
            self.bodies.get(handle).map(|body| body.colliders().to_vec()).unwrap_or_default();
        for collider in collider_handles {
            self.collider_entities.remove(&collider);
        }
        let _ = self.bodies.remove(
            handle,
            &mut self.island_manager,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    pub fn apply_command(&mut self, handle: RigidBodyHandle, command: &BodyCommand) {
        let Some(body) = self.bodies.get_mut(handle) else {
            return;
        };
        match *command {
            BodyCommand::SetKind(kind) => body.set_body_type(body_type(kind), true),
            BodyCommand::Wake => body.wake_up(true),
            BodyCommand::Teleport { translation, rotation } => {
                body.set_translation(vec_to_rapier(translation), false);
                body.set_rotation(quat_to_rapier(rotation), false);
                body.set_linvel(Vector::zeros(), false);
                body.set_angvel(Vector::zeros(), false);
            }
            BodyCommand::QueueKinematic { translation, rotation } => {
                body.set_next_kinematic_translation(vec_to_rapier(translation));
                body.set_next_kinematic_rotation(quat_to_rapier(rotation));
            }
        }
    }

    pub fn set_body_kind(&mut self, handle: RigidBodyHandle, kind: BodyKind) {
        self.apply_command(handle, &BodyCommand::SetKind(kind));
    }

    pub fn body_pose(&self, handle: RigidBodyHandle) -> Option<Pose> {
        self.bodies.get(handle).map(|body| {
            Pose::new(vec_from_rapier(body.translation()), quat_from_rapier(body.rotation()), Vec3::ONE)
        })
    }

    pub fn body_kind(&self, handle: RigidBodyHandle) -> Option<BodyKind> {
        self.bodies.get(handle).map(|body| match body.body_type() {
            RigidBodyType::Dynamic => BodyKind::Dynamic,
            RigidBodyType::Fixed => BodyKind::Fixed,
            RigidBodyType::KinematicPositionBased | RigidBodyType::KinematicVelocityBased => BodyKind::Kinematic,
        })
    }

    pub fn body_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.bodies.get(handle).map(|body| vec_from_rapier(body.linvel()))
    }

    /// Pushes every awake-able dynamic body with the vortex field for one step of `dt`.
    pub fn apply_vortex(&mut self, strength: f32, dt: f32) -> usize {
        let mut pushed = 0;
        for (_, body) in self.bodies.iter_mut() {
            if !body.is_dynamic() || !body.is_enabled() {
                continue;
            }
            let position = vec_from_rapier(body.translation());
            let impulse = vortex::vortex_impulse(position, strength, body.mass(), dt);
            if impulse != Vec3::ZERO {
                body.apply_impulse(vec_to_rapier(impulse), true);
                pushed += 1;
            }
        }
        pushed
    }

    pub fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        let hooks = ();
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &hooks,
            &self.event_collector,
        );
    }

    /// Advances one rendered frame. Precision mode splits the frame into fixed sub-steps.
    /// Returns how many pipeline steps ran.
    pub fn step_frame(&mut self, dt: f32, precision: bool) -> u32 {
        let dt = dt.min(self.params.max_frame_dt);
        if dt <= 0.0 {
            return 0;
        }
        if !precision {
            self.step(dt);
            return 1;
        }
        let ratio = dt / self.params.precision_dt.max(f32::EPSILON);
        let substeps = ((ratio - 1e-3).ceil() as u32).clamp(1, self.params.max_substeps.max(1));
        let sub_dt = dt / substeps as f32;
        for _ in 0..substeps {
            self.step(sub_dt);
        }
        substeps
    }

    pub fn drain_contact_forces(&mut self) -> Vec<(Entity, Entity, f32)> {
        self.event_collector
            .drain()
            .into_iter()
            .filter_map(|(a, b, magnitude)| {
                let entity_a = self.collider_entities.get(&a)?;
                let entity_b = self.collider_entities.get(&b)?;
                Some((*entity_a, *entity_b, magnitude))
            })
            .collect()
    }

    pub fn boundary_entity(&self) -> Entity {
        self.boundary_entity
    }

    pub fn params(&self) -> PhysicsParams {
        self.params
    }

    pub fn body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.bodies.get(handle)
    }

    pub fn body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.bodies.get_mut(handle)
    }

    pub fn collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.colliders.get(handle)
    }

    pub fn colliders_of(&self, handle: RigidBodyHandle) -> Vec<ColliderHandle> {
        self.bodies.get(handle).map(|body| body.colliders().to_vec()).unwrap_or_default()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn joint_count(&self) -> usize {
        self.impulse_joints.len()
    }
}

fn body_type(kind: BodyKind) -> RigidBodyType {
    match kind {
        BodyKind::Fixed => RigidBodyType::Fixed,
        BodyKind::Dynamic => RigidBodyType::Dynamic,
        BodyKind::Kinematic => RigidBodyType::KinematicPositionBased,
    }
}

fn vec_to_rapier(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

fn vec_from_rapier(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn quat_to_rapier(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

fn quat_from_rapier(q: &UnitQuaternion<Real>) -> Quat {
    Quat::from_xyzw(q.i, q.j, q.k, q.w).normalize()
}

fn pose_to_isometry(pose: Pose) -> Isometry3<Real> {
    Isometry3::from_parts(Translation3::from(vec_to_rapier(pose.translation)), quat_to_rapier(pose.rotation))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> RapierState {
        let mut world = World::new();
        let boundary = world.spawn_empty().id();
        RapierState::new(&PhysicsParams::default(), boundary)
    }

    #[test]
    fn dynamic_body_falls_and_lands_on_ground() {
        let mut rapier = state();
        let mut world = World::new();
        let entity = world.spawn_empty().id();
        let pose = Pose::new(Vec3::new(0.0, 5.0, 0.0), Quat::IDENTITY, Vec3::ONE);
        let body = rapier.spawn_body(BodyKind::Dynamic, pose);
        let profile = PhysicsProfile { density: 1.0, friction: 0.5, restitution: 0.0 };
        rapier.attach_collider(body, ColliderShape::Cuboid { half_extents: Vec3::splat(0.5) }, profile, entity, false);
        for _ in 0..240 {
            rapier.step(1.0 / 60.0);
        }
        let landed = rapier.body_pose(body).expect("body exists").translation;
        assert!(landed.y < 5.0 && landed.y > 0.3, "cube should rest on the ground, got {landed:?}");
    }

    #[test]
    fn teleport_clears_velocity() {
        let mut rapier = state();
        let body = rapier.spawn_body(BodyKind::Dynamic, Pose::IDENTITY);
        if let Some(rb) = rapier.body_mut(body) {
            rb.set_linvel(Vector::new(3.0, 0.0, 0.0), true);
        }
        rapier.apply_command(
            body,
            &BodyCommand::Teleport { translation: Vec3::new(1.0, 2.0, 3.0), rotation: Quat::IDENTITY },
        );
        assert_eq!(rapier.body_velocity(body), Some(Vec3::ZERO));
        assert_eq!(rapier.body_pose(body).map(|pose| pose.translation), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn precision_mode_substeps() {
        let mut rapier = state();
        assert_eq!(rapier.step_frame(1.0 / 60.0, false), 1);
        assert_eq!(rapier.step_frame(1.0 / 60.0, true), 2);
        assert_eq!(rapier.step_frame(1.0, true), 4, "frame dt is clamped to 1/30 s first");
        assert_eq!(rapier.step_frame(0.0, true), 0);
    }

    #[test]
    fn kind_round_trips_through_rapier() {
        let mut rapier = state();
        let body = rapier.spawn_body(BodyKind::Fixed, Pose::IDENTITY);
        rapier.set_body_kind(body, BodyKind::Kinematic);
        assert_eq!(rapier.body_kind(body), Some(BodyKind::Kinematic));
        rapier.remove_body(body);
        assert_eq!(rapier.body_kind(body), None);
    }
}
