use super::physics::{PhysicsParams, RapierState};
use super::systems::*;
use super::types::*;
use crate::actor::{ActorContext, ActorSync, BodyKind, Pose, StoreWrite};
use crate::bulk::InstanceBatch;
use crate::catalog::{mesh_asset, physics_asset, BulkMaterial, PhysicsProfile};
use crate::engine::EngineSnapshot;
use crate::events::{EventBus, SandboxEvent};
use crate::scene::{SceneObject, SceneObjectId};
use bevy_ecs::prelude::{Entity, Schedule, World};
use bevy_ecs::schedule::{ExecutorKind, IntoSystemConfigs};
use glam::Vec3;
use rapier3d::prelude::RigidBodyHandle;
use std::collections::HashMap;

// ---------- World container ----------
pub struct EcsWorld {
    pub world: World,
    schedule: Schedule,
    actors: HashMap<SceneObjectId, Entity>,
    pub(super) bulk: Vec<Entity>,
    pub(super) cloth: Vec<Entity>,
    pub(super) cloth_joints: usize,
    pub(super) projectiles: Vec<Entity>,
}

impl Default for EcsWorld {
    fn default() -> Self {
        Self::new(&PhysicsParams::default())
    }
}

impl EcsWorld {
    pub fn new(params: &PhysicsParams) -> Self {
        let mut world = World::new();
        world.insert_resource(TimeDelta(0.0));
        world.insert_resource(EngineSnapshot::default());
        world.insert_resource(*params);
        let boundary_entity = world.spawn_empty().id();
        world.insert_resource(RapierState::new(params, boundary_entity));
        world.insert_resource(EventBus::default());
        world.insert_resource(FrameStats::default());
        world.insert_resource(InstanceBatch::new(BulkMaterial::default()));

        let mut schedule = Schedule::default();
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);
        schedule.add_systems(
            (
                sys_actor_pre_step,
                sys_cloth_body_kinds,
                sys_apply_vortex,
                sys_step_rapier,
                sys_actor_post_step,
                sys_sync_bulk_poses,
            )
                .chain(),
        );

        Self {
            world,
            schedule,
            actors: HashMap::new(),
            bulk: Vec::new(),
            cloth: Vec::new(),
            cloth_joints: 0,
            projectiles: Vec::new(),
        }
    }

    pub fn set_snapshot(&mut self, snapshot: EngineSnapshot) {
        *self.world.resource_mut::<EngineSnapshot>() = snapshot;
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        *self.world.resource::<EngineSnapshot>()
    }

    /// Runs one frame: pre-step actor sync, vortex, physics step, post-step sync.
    pub fn run_frame(&mut self, dt: f32) {
        self.world.resource_mut::<TimeDelta>().0 = dt.max(0.0);
        self.schedule.run(&mut self.world);
    }

    pub fn frame_stats(&self) -> FrameStats {
        *self.world.resource::<FrameStats>()
    }

    pub fn rapier(&self) -> &RapierState {
        self.world.resource::<RapierState>()
    }

    pub fn rapier_mut(&mut self) -> bevy_ecs::world::Mut<'_, RapierState> {
        self.world.resource_mut::<RapierState>()
    }

    pub fn instance_batch(&self) -> &InstanceBatch {
        self.world.resource::<InstanceBatch>()
    }

    pub(super) fn emit(&mut self, event: SandboxEvent) {
        self.world.resource_mut::<EventBus>().push(event);
    }

    pub fn drain_events(&mut self) -> Vec<SandboxEvent> {
        self.world.resource_mut::<EventBus>().drain()
    }

    // ---------- Actors ----------

    /// Mirrors `object` into the world, spawning its actor on first sight.
    /// Returns how a transform change was taken, or `None` when the transform did not change.
    pub fn sync_actor(&mut self, object: &SceneObject) -> Option<StoreWrite> {
        let Some(entity) = self.actors.get(&object.id).copied() else {
            self.spawn_actor(object);
            return None;
        };
        let (Some(previous), Some(body)) =
            (self.world.get::<ActorData>(entity).cloned(), self.world.get::<RapierBody>(entity).copied())
        else {
            return None;
        };
        let next = actor_data(object);

        if previous.physics_id != next.physics_id
            || previous.asset_id != next.asset_id
            || previous.has_physics != next.has_physics
        {
            let mut rapier = self.rapier_mut();
            rapier.detach_colliders(body.handle);
            attach_actor_collider(&mut rapier, body.handle, &next, entity);
        }

        let outcome = if previous.stored != next.stored {
            let stored = next.stored.pose();
            let written = self.world.get_mut::<ActorSync>(entity).map(|mut sync| sync.store_written(stored));
            if written == Some(StoreWrite::Deferred) {
                eprintln!("[actor] '{}' edited while simulating; applying on next pause", object.name);
                self.emit(SandboxEvent::EditDeferred { id: object.id });
            }
            written
        } else {
            None
        };

        if let Some(mut data) = self.world.get_mut::<ActorData>(entity) {
            *data = next;
        }
        outcome
    }

    fn spawn_actor(&mut self, object: &SceneObject) -> Entity {
        let data = actor_data(object);
        let stored = data.stored.pose();
        let snapshot = self.snapshot();
        let ctx = ActorContext::from_snapshot(&snapshot, object.id, data.has_physics);
        let sync = ActorSync::new(stored, &ctx);
        let kind = sync.kind();
        let entity = self.world.spawn(SceneObjectTag { id: object.id }).id();
        let handle = {
            let mut rapier = self.rapier_mut();
            let handle = rapier.spawn_body(kind, stored);
            attach_actor_collider(&mut rapier, handle, &data, entity);
            handle
        };
        self.world.entity_mut(entity).insert((RapierBody { handle }, data, sync, VisualPose(stored)));
        self.actors.insert(object.id, entity);
        self.emit(SandboxEvent::ActorSpawned { id: object.id, entity });
        entity
    }

    pub fn remove_actor(&mut self, id: SceneObjectId) -> bool {
        let Some(entity) = self.actors.remove(&id) else {
            return false;
        };
        if let Some(body) = self.world.get::<RapierBody>(entity).copied() {
            self.rapier_mut().remove_body(body.handle);
        }
        self.world.despawn(entity);
        self.emit(SandboxEvent::ActorDespawned { id, entity });
        true
    }

    pub fn clear_actors(&mut self) {
        let ids: Vec<SceneObjectId> = self.actors.keys().copied().collect();
        for id in ids {
            self.remove_actor(id);
        }
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn actor_entity(&self, id: SceneObjectId) -> Option<Entity> {
        self.actors.get(&id).copied()
    }

    pub fn actor_for_entity(&self, entity: Entity) -> Option<SceneObjectId> {
        self.world.get::<SceneObjectTag>(entity).map(|tag| tag.id)
    }

    pub fn actor_sync(&self, id: SceneObjectId) -> Option<&ActorSync> {
        self.world.get::<ActorSync>(self.actor_entity(id)?)
    }

    pub fn actor_data(&self, id: SceneObjectId) -> Option<&ActorData> {
        self.world.get::<ActorData>(self.actor_entity(id)?)
    }

    pub fn actor_body(&self, id: SceneObjectId) -> Option<RapierBody> {
        self.world.get::<RapierBody>(self.actor_entity(id)?).copied()
    }

    /// Body kind as the physics engine currently has it.
    pub fn actor_kind(&self, id: SceneObjectId) -> Option<BodyKind> {
        self.rapier().body_kind(self.actor_body(id)?.handle)
    }

    /// Live body pose, scale taken from the store.
    pub fn actor_pose(&self, id: SceneObjectId) -> Option<Pose> {
        let scale = self.actor_data(id)?.stored.scale;
        self.rapier().body_pose(self.actor_body(id)?.handle).map(|pose| pose.with_scale(scale))
    }

    pub fn visual_pose(&self, id: SceneObjectId) -> Option<Pose> {
        self.world.get::<VisualPose>(self.actor_entity(id)?).map(|visual| visual.0)
    }

    /// Runs the pre-step reconciliation for one actor outside the frame, so selection changes
    /// take effect before the next step.
    pub fn refresh_actor(&mut self, id: SceneObjectId) -> bool {
        let Some(entity) = self.actor_entity(id) else {
            return false;
        };
        let (Some(data), Some(body)) =
            (self.world.get::<ActorData>(entity).cloned(), self.world.get::<RapierBody>(entity).copied())
        else {
            return false;
        };
        let snapshot = self.snapshot();
        let ctx = ActorContext::from_snapshot(&snapshot, id, data.has_physics);
        let stored = data.stored.pose();
        let live = self.rapier().body_pose(body.handle).map(|pose| pose.with_scale(stored.scale)).unwrap_or(stored);
        let Some(commands) = self.world.get_mut::<ActorSync>(entity).map(|mut sync| sync.pre_step(&ctx, stored, live))
        else {
            return false;
        };
        let mut rapier = self.rapier_mut();
        for command in &commands {
            rapier.apply_command(body.handle, command);
        }
        true
    }

    pub fn begin_drag(&mut self, id: SceneObjectId) -> bool {
        let Some(entity) = self.actor_entity(id) else {
            return false;
        };
        let Some(body) = self.world.get::<RapierBody>(entity).copied() else {
            return false;
        };
        let commands = self.world.get_mut::<ActorSync>(entity).and_then(|mut sync| sync.begin_drag());
        match commands {
            Some(commands) => {
                let mut rapier = self.rapier_mut();
                for command in &commands {
                    rapier.apply_command(body.handle, command);
                }
                true
            }
            None => false,
        }
    }

    pub fn drag_to(&mut self, id: SceneObjectId, pose: Pose) -> bool {
        let Some(entity) = self.actor_entity(id) else {
            return false;
        };
        let moved = self.world.get_mut::<ActorSync>(entity).map(|mut sync| sync.drag_to(pose)).unwrap_or(false);
        if moved {
            if let Some(mut visual) = self.world.get_mut::<VisualPose>(entity) {
                visual.0 = pose;
            }
        }
        moved
    }

    /// Ends the drag and returns the transform the store must commit.
    pub fn end_drag(&mut self, id: SceneObjectId) -> Option<StoredTransform> {
        let entity = self.actor_entity(id)?;
        let body = self.world.get::<RapierBody>(entity).copied()?;
        let has_physics = self.world.get::<ActorData>(entity)?.has_physics;
        let (pose, commands) = self.world.get_mut::<ActorSync>(entity)?.end_drag(has_physics)?;
        {
            let mut rapier = self.rapier_mut();
            for command in &commands {
                rapier.apply_command(body.handle, command);
            }
        }
        let stored = StoredTransform::from_pose(pose);
        if let Some(mut data) = self.world.get_mut::<ActorData>(entity) {
            data.stored = stored;
        }
        Some(stored)
    }

    pub fn dragging_actor(&self) -> Option<SceneObjectId> {
        self.actors
            .iter()
            .find(|(_, entity)| self.world.get::<ActorSync>(**entity).is_some_and(ActorSync::is_dragging))
            .map(|(id, _)| *id)
    }

    /// Nearest actor whose bounding sphere the ray crosses.
    pub fn pick(&self, origin: Vec3, dir: Vec3) -> Option<SceneObjectId> {
        let dir = dir.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        let candidates = self.actors.iter().filter_map(|(id, entity)| {
            let data = self.world.get::<ActorData>(*entity)?;
            let visual = self.world.get::<VisualPose>(*entity)?;
            let radius = data.pick_radius() * visual.0.scale.abs().max_element().max(0.01);
            Some((*id, visual.0.translation, radius))
        });
        pick_nearest(origin, dir, candidates)
    }
}

fn actor_data(object: &SceneObject) -> ActorData {
    let shape = mesh_asset(&object.asset_id).map(|mesh| mesh.shape);
    let has_physics = shape.is_some() && object.physics_id.as_deref().and_then(physics_asset).is_some();
    ActorData {
        stored: StoredTransform::of(object),
        asset_id: object.asset_id.clone(),
        material_id: object.material_id.clone(),
        physics_id: object.physics_id.clone(),
        shape,
        has_physics,
    }
}

fn attach_actor_collider(rapier: &mut RapierState, body: RigidBodyHandle, data: &ActorData, entity: Entity) {
    if !data.has_physics {
        return;
    }
    let (Some(shape), Some(physics)) = (data.shape, data.physics_id.as_deref().and_then(physics_asset)) else {
        return;
    };
    let profile =
        PhysicsProfile { density: physics.density, friction: physics.friction, restitution: physics.restitution };
    rapier.attach_collider(body, shape.collider(), profile, entity, true);
}
