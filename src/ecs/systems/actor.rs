use crate::actor::{ActorContext, ActorSync, BodyKind};
use crate::ecs::physics::RapierState;
use crate::ecs::types::*;
use crate::engine::{EngineMode, EngineSnapshot};
use bevy_ecs::prelude::*;
use bevy_ecs::system::{Res, ResMut};

/// Writes gizmo and anchor poses into the bodies before the physics step.
pub fn sys_actor_pre_step(
    snapshot: Res<EngineSnapshot>,
    mut rapier: ResMut<RapierState>,
    mut query: Query<(&SceneObjectTag, &RapierBody, &ActorData, &mut ActorSync)>,
) {
    for (tag, body, data, mut sync) in &mut query {
        let ctx = ActorContext::from_snapshot(&snapshot, tag.id, data.has_physics);
        let stored = data.stored.pose();
        let live = rapier.body_pose(body.handle).map(|pose| pose.with_scale(stored.scale)).unwrap_or(stored);
        for command in sync.pre_step(&ctx, stored, live) {
            rapier.apply_command(body.handle, &command);
        }
    }
}

/// Reads the stepped bodies back into gizmos and visual poses.
pub fn sys_actor_post_step(
    snapshot: Res<EngineSnapshot>,
    rapier: Res<RapierState>,
    mut query: Query<(&SceneObjectTag, &RapierBody, &ActorData, &mut ActorSync, &mut VisualPose)>,
) {
    for (tag, body, data, mut sync, mut visual) in &mut query {
        let ctx = ActorContext::from_snapshot(&snapshot, tag.id, data.has_physics);
        let stored = data.stored.pose();
        let live = rapier.body_pose(body.handle).map(|pose| pose.with_scale(stored.scale)).unwrap_or(stored);
        sync.post_step(&ctx, live);
        visual.0 = sync.visual_pose(live, stored.scale);
    }
}

pub fn cloth_node_kind(mode: EngineMode, anchor: bool) -> BodyKind {
    if anchor || mode == EngineMode::Editor {
        BodyKind::Fixed
    } else {
        BodyKind::Dynamic
    }
}

pub fn sys_cloth_body_kinds(
    snapshot: Res<EngineSnapshot>,
    mut rapier: ResMut<RapierState>,
    query: Query<(&RapierBody, &ClothNode)>,
) {
    for (body, node) in &query {
        let desired = cloth_node_kind(snapshot.mode, node.anchor);
        if rapier.body_kind(body.handle) != Some(desired) {
            rapier.set_body_kind(body.handle, desired);
        }
    }
}
