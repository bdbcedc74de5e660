use super::TimeDelta;
use crate::bulk::InstanceBatch;
use crate::ecs::physics::RapierState;
use crate::ecs::types::*;
use crate::engine::EngineSnapshot;
use crate::events::{EventBus, SandboxEvent};
use bevy_ecs::prelude::*;
use bevy_ecs::system::{Res, ResMut};
use glam::Mat4;

pub fn sys_apply_vortex(
    snapshot: Res<EngineSnapshot>,
    mut rapier: ResMut<RapierState>,
    mut stats: ResMut<FrameStats>,
    dt: Res<TimeDelta>,
) {
    stats.vortex_bodies = 0;
    if snapshot.paused || !snapshot.vortex_enabled || dt.0 <= 0.0 {
        return;
    }
    stats.vortex_bodies = rapier.apply_vortex(snapshot.vortex_strength, dt.0);
}

pub fn sys_step_rapier(
    snapshot: Res<EngineSnapshot>,
    mut rapier: ResMut<RapierState>,
    mut events: ResMut<EventBus>,
    mut stats: ResMut<FrameStats>,
    dt: Res<TimeDelta>,
) {
    stats.substeps = 0;
    if snapshot.running() && dt.0 > 0.0 {
        stats.substeps = rapier.step_frame(dt.0, snapshot.precision_step);
    }
    let forces = rapier.drain_contact_forces();
    stats.contact_forces = forces.len();
    for (a, b, force) in forces {
        events.push(SandboxEvent::contact_force(a, b, force));
    }
}

pub fn sys_sync_bulk_poses(
    snapshot: Res<EngineSnapshot>,
    rapier: Res<RapierState>,
    mut batch: ResMut<InstanceBatch>,
    query: Query<(&RapierBody, &BulkInstance)>,
) {
    if snapshot.paused {
        return;
    }
    for (body, instance) in &query {
        if let Some(pose) = rapier.body_pose(body.handle) {
            batch.set_model(
                instance.index,
                Mat4::from_scale_rotation_translation(instance.scale, pose.rotation, pose.translation),
            );
        }
    }
}
