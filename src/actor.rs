//! Per-object reconciliation between the stored transform, the gizmo target and the rigid body.
//!
//! `ActorSync` never touches the physics engine. Every transition yields [`BodyCommand`]s
//! which the ECS systems apply to the body handle owned by the same entity.

use crate::engine::{EngineMode, EngineSnapshot, TransformTool};
use crate::gizmo::GizmoTarget;
use crate::scene::{SceneObject, SceneObjectId};
use bevy_ecs::prelude::Component;
use glam::{EulerRot, Mat4, Quat, Vec3};
use smallvec::{smallvec, SmallVec};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Pose {
    pub const IDENTITY: Pose = Pose { translation: Vec3::ZERO, rotation: Quat::IDENTITY, scale: Vec3::ONE };

    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self { translation, rotation, scale }
    }

    pub fn from_euler(translation: Vec3, euler: Vec3, scale: Vec3) -> Self {
        Self { translation, rotation: Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z), scale }
    }

    pub fn from_object(object: &SceneObject) -> Self {
        Self::from_euler(object.position, object.rotation, object.scale)
    }

    pub fn euler(&self) -> Vec3 {
        let (x, y, z) = self.rotation.to_euler(EulerRot::XYZ);
        Vec3::new(x, y, z)
    }

    pub fn with_scale(self, scale: Vec3) -> Self {
        Self { scale, ..self }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    Fixed,
    Dynamic,
    Kinematic,
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BodyKind::Fixed => "fixed",
            BodyKind::Dynamic => "dynamic",
            BodyKind::Kinematic => "kinematic",
        })
    }
}

pub fn derive_body_kind(dragging: bool, paused: bool, has_physics: bool) -> BodyKind {
    if dragging || paused {
        BodyKind::Kinematic
    } else if has_physics {
        BodyKind::Dynamic
    } else {
        BodyKind::Fixed
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyCommand {
    SetKind(BodyKind),
    Wake,
    /// Instant placement with velocities cleared. Used whenever no step will consume a queued pose.
    Teleport { translation: Vec3, rotation: Quat },
    /// Pose the next physics step moves a kinematic body to.
    QueueKinematic { translation: Vec3, rotation: Quat },
}

impl BodyCommand {
    fn teleport(pose: Pose) -> Self {
        BodyCommand::Teleport { translation: pose.translation, rotation: pose.rotation }
    }

    fn queue(pose: Pose) -> Self {
        BodyCommand::QueueKinematic { translation: pose.translation, rotation: pose.rotation }
    }
}

pub type BodyCommands = SmallVec<[BodyCommand; 4]>;

/// Everything an actor needs to know about the current frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorContext {
    pub mode: EngineMode,
    pub paused: bool,
    pub selected: bool,
    pub has_physics: bool,
    pub tool: TransformTool,
}

impl ActorContext {
    pub fn from_snapshot(snapshot: &EngineSnapshot, id: SceneObjectId, has_physics: bool) -> Self {
        Self {
            mode: snapshot.mode,
            paused: snapshot.paused,
            selected: snapshot.selected == Some(id),
            has_physics,
            tool: snapshot.tool,
        }
    }
}

/// Outcome of writing new store data into an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreWrite {
    /// Paused: the body is pinned to the new transform on the next frame.
    Applied,
    /// Running: physics keeps authority until the simulation pauses or the object is re-selected.
    Deferred,
    /// Dragging: the gizmo is authoritative and drag end overwrites the store.
    Ignored,
}

#[derive(Component, Debug, Clone)]
pub struct ActorSync {
    kind: BodyKind,
    dragging: bool,
    gizmo: Option<GizmoTarget>,
    /// Pose a paused body is pinned to.
    anchor: Pose,
    mode: EngineMode,
    paused: bool,
    deferred_edit: bool,
}

impl ActorSync {
    pub fn new(stored: Pose, ctx: &ActorContext) -> Self {
        Self {
            kind: derive_body_kind(false, ctx.paused, ctx.has_physics),
            dragging: false,
            gizmo: None,
            anchor: stored,
            mode: ctx.mode,
            paused: ctx.paused,
            deferred_edit: false,
        }
    }

    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn gizmo(&self) -> Option<&GizmoTarget> {
        self.gizmo.as_ref()
    }

    pub fn anchor(&self) -> Pose {
        self.anchor
    }

    pub fn has_deferred_edit(&self) -> bool {
        self.deferred_edit
    }

    pub fn store_written(&mut self, stored: Pose) -> StoreWrite {
        if self.dragging {
            return StoreWrite::Ignored;
        }
        if self.paused {
            self.anchor = stored;
            if let Some(gizmo) = self.gizmo.as_mut() {
                gizmo.pose = stored;
            }
            StoreWrite::Applied
        } else {
            self.deferred_edit = true;
            if let Some(gizmo) = self.gizmo.as_mut() {
                gizmo.pose.scale = stored.scale;
            }
            StoreWrite::Deferred
        }
    }

    /// Grabbing the gizmo. Wakes the body before overriding it, a sleeping body ignores pose writes.
    pub fn begin_drag(&mut self) -> Option<BodyCommands> {
        if self.dragging || self.gizmo.is_none() {
            return None;
        }
        self.dragging = true;
        self.kind = BodyKind::Kinematic;
        Some(smallvec![BodyCommand::Wake, BodyCommand::SetKind(BodyKind::Kinematic)])
    }

    pub fn drag_to(&mut self, pose: Pose) -> bool {
        if !self.dragging {
            return false;
        }
        match self.gizmo.as_mut() {
            Some(gizmo) => {
                gizmo.pose = pose;
                true
            }
            None => false,
        }
    }

    /// Releasing the gizmo. Returns the pose to commit to the store and the body commands
    /// restoring the non-drag body kind.
    pub fn end_drag(&mut self, has_physics: bool) -> Option<(Pose, BodyCommands)> {
        if !self.dragging {
            return None;
        }
        self.dragging = false;
        let pose = self.gizmo.map(|gizmo| gizmo.pose).unwrap_or(self.anchor);
        self.anchor = pose;
        self.deferred_edit = false;
        let desired = derive_body_kind(false, self.paused, has_physics);
        let mut commands: BodyCommands = smallvec![BodyCommand::teleport(pose)];
        if desired != self.kind {
            commands.push(BodyCommand::SetKind(desired));
            self.kind = desired;
        }
        commands.push(BodyCommand::Wake);
        Some((pose, commands))
    }

    /// Runs before the physics step. `live` is the body's pose as of the previous step.
    pub fn pre_step(&mut self, ctx: &ActorContext, stored: Pose, live: Pose) -> BodyCommands {
        let mut commands = BodyCommands::new();

        if ctx.mode != self.mode {
            self.mode = ctx.mode;
            self.anchor = stored;
            self.deferred_edit = false;
            if !ctx.paused {
                commands.push(BodyCommand::teleport(stored));
            }
        } else if ctx.paused && !self.paused {
            if self.deferred_edit {
                self.anchor = stored;
                self.deferred_edit = false;
            } else {
                self.anchor = live.with_scale(stored.scale);
            }
        }

        let wants_gizmo = ctx.selected && ctx.mode != EngineMode::Play;
        match (wants_gizmo, self.gizmo.is_some()) {
            (true, false) => {
                let base = if ctx.paused {
                    self.anchor
                } else if self.deferred_edit {
                    self.deferred_edit = false;
                    self.anchor = stored;
                    commands.push(BodyCommand::teleport(stored));
                    commands.push(BodyCommand::Wake);
                    stored
                } else {
                    live
                };
                self.gizmo = Some(GizmoTarget::new(base.with_scale(stored.scale), ctx.tool));
            }
            (false, true) => {
                self.gizmo = None;
                self.dragging = false;
            }
            _ => {}
        }
        if let Some(gizmo) = self.gizmo.as_mut() {
            gizmo.tool = ctx.tool;
        }

        let desired = derive_body_kind(self.dragging, ctx.paused, ctx.has_physics);
        if desired != self.kind {
            commands.push(BodyCommand::SetKind(desired));
            if desired == BodyKind::Dynamic {
                commands.push(BodyCommand::Wake);
            }
            self.kind = desired;
        }

        if self.dragging {
            if let Some(gizmo) = self.gizmo {
                commands.push(if ctx.paused {
                    BodyCommand::teleport(gizmo.pose)
                } else {
                    BodyCommand::queue(gizmo.pose)
                });
            }
        } else if ctx.paused {
            commands.push(BodyCommand::teleport(self.anchor));
        }

        self.paused = ctx.paused;
        commands
    }

    /// Runs after the physics step so the gizmo tracks the simulated body.
    pub fn post_step(&mut self, ctx: &ActorContext, live: Pose) {
        if self.dragging {
            return;
        }
        let source = if ctx.paused { self.anchor } else { live };
        if let Some(gizmo) = self.gizmo.as_mut() {
            gizmo.follow(source);
        }
    }

    /// Pose to draw this frame.
    pub fn visual_pose(&self, live: Pose, stored_scale: Vec3) -> Pose {
        match self.gizmo {
            Some(gizmo) if self.dragging => gizmo.pose,
            _ => live.with_scale(stored_scale),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(mode: EngineMode, paused: bool, selected: bool) -> ActorContext {
        ActorContext { mode, paused, selected, has_physics: true, tool: TransformTool::Translate }
    }

    fn at(y: f32) -> Pose {
        Pose::new(Vec3::new(0.0, y, 0.0), Quat::IDENTITY, Vec3::ONE)
    }

    #[test]
    fn derived_kind_prefers_drag_then_pause() {
        assert_eq!(derive_body_kind(true, false, false), BodyKind::Kinematic);
        assert_eq!(derive_body_kind(false, true, true), BodyKind::Kinematic);
        assert_eq!(derive_body_kind(false, false, true), BodyKind::Dynamic);
        assert_eq!(derive_body_kind(false, false, false), BodyKind::Fixed);
    }

    #[test]
    fn paused_actor_pins_body_to_anchor_every_frame() {
        let editor = ctx(EngineMode::Editor, true, false);
        let mut sync = ActorSync::new(at(5.0), &editor);
        for _ in 0..3 {
            let commands = sync.pre_step(&editor, at(5.0), at(4.0));
            assert_eq!(commands.as_slice(), &[BodyCommand::teleport(at(5.0))]);
        }
        assert_eq!(sync.kind(), BodyKind::Kinematic);
    }

    #[test]
    fn unpausing_switches_to_dynamic_and_wakes() {
        let editor = ctx(EngineMode::Editor, true, false);
        let mut sync = ActorSync::new(at(5.0), &editor);
        let running = ctx(EngineMode::Simulate, false, false);
        let commands = sync.pre_step(&running, at(5.0), at(5.0));
        assert!(commands.contains(&BodyCommand::SetKind(BodyKind::Dynamic)));
        assert!(commands.contains(&BodyCommand::Wake));
        assert_eq!(sync.kind(), BodyKind::Dynamic);
    }

    #[test]
    fn drag_requires_gizmo_and_restores_kind() {
        let running = ctx(EngineMode::Simulate, false, false);
        let mut sync = ActorSync::new(at(1.0), &running);
        assert!(sync.begin_drag().is_none(), "no gizmo without selection");

        let selected = ctx(EngineMode::Simulate, false, true);
        sync.pre_step(&selected, at(1.0), at(1.0));
        assert!(sync.gizmo().is_some());

        let start = sync.begin_drag().expect("drag starts");
        assert_eq!(start.as_slice(), &[BodyCommand::Wake, BodyCommand::SetKind(BodyKind::Kinematic)]);
        assert!(sync.drag_to(at(3.0)));
        let frame = sync.pre_step(&selected, at(1.0), at(1.0));
        assert_eq!(frame.as_slice(), &[BodyCommand::queue(at(3.0))]);

        let (commit, end) = sync.end_drag(true).expect("drag ends");
        assert_eq!(commit, at(3.0));
        assert!(end.contains(&BodyCommand::SetKind(BodyKind::Dynamic)));
        assert_eq!(end.last(), Some(&BodyCommand::Wake));
        assert_eq!(sync.kind(), BodyKind::Dynamic);
    }

    #[test]
    fn running_edits_are_deferred_until_pause() {
        let running = ctx(EngineMode::Simulate, false, false);
        let mut sync = ActorSync::new(at(1.0), &running);
        sync.pre_step(&running, at(1.0), at(1.0));
        assert_eq!(sync.store_written(at(8.0)), StoreWrite::Deferred);
        assert!(sync.has_deferred_edit());

        let paused = ctx(EngineMode::Simulate, true, false);
        let commands = sync.pre_step(&paused, at(8.0), at(0.5));
        assert_eq!(commands.last(), Some(&BodyCommand::teleport(at(8.0))));
        assert!(!sync.has_deferred_edit());
    }

    #[test]
    fn pausing_freezes_body_where_it_is() {
        let running = ctx(EngineMode::Simulate, false, false);
        let mut sync = ActorSync::new(at(5.0), &running);
        sync.pre_step(&running, at(5.0), at(5.0));
        let paused = ctx(EngineMode::Simulate, true, false);
        let commands = sync.pre_step(&paused, at(5.0), at(2.5));
        assert_eq!(commands.last(), Some(&BodyCommand::teleport(at(2.5))));
    }

    #[test]
    fn gizmo_follows_live_body_while_running() {
        let selected = ctx(EngineMode::Simulate, false, true);
        let mut sync = ActorSync::new(at(5.0), &selected);
        sync.pre_step(&selected, at(5.0), at(5.0));
        sync.post_step(&selected, at(3.0));
        assert_eq!(sync.gizmo().map(|g| g.pose.translation), Some(Vec3::new(0.0, 3.0, 0.0)));
    }

    #[test]
    fn play_mode_has_no_gizmo() {
        let play = ctx(EngineMode::Play, false, true);
        let mut sync = ActorSync::new(at(0.0), &play);
        sync.pre_step(&play, at(0.0), at(0.0));
        assert!(sync.gizmo().is_none());
    }
}
