use super::{ActionResult, Editor};
use crate::engine::{EngineMode, TransformTool};
use crate::gizmo;
use crate::gizmo::{
    GizmoInteraction, GIZMO_ROTATE_INNER_RADIUS_PX, GIZMO_ROTATE_OUTER_RADIUS_PX, GIZMO_SCALE_OUTER_RADIUS_PX,
    GIZMO_TRANSLATE_RADIUS_PX,
};
use crate::scene::SceneObjectPatch;
use glam::{Quat, Vec2, Vec3};

impl Editor {
    /// Starts a gizmo drag when the pointer lands on the selected object's handle; otherwise picks.
    /// In Play the pointer fires projectiles instead.
    pub(super) fn pointer_down(&mut self, screen: Vec2) -> ActionResult {
        if self.state.mode == EngineMode::Play {
            return self.shoot(screen);
        }
        let Some((ray_origin, ray_dir)) = self.camera.screen_ray(screen, self.viewport) else {
            return ActionResult::Ignored;
        };
        if self.begin_gizmo_interaction(screen, ray_origin, ray_dir) {
            return ActionResult::Applied;
        }
        let picked = self.ecs.pick(ray_origin, ray_dir);
        self.select(picked)
    }

    fn begin_gizmo_interaction(&mut self, screen: Vec2, ray_origin: Vec3, ray_dir: Vec3) -> bool {
        let Some(id) = self.state.selected else {
            return false;
        };
        let Some(target) = self.ecs.actor_sync(id).and_then(|sync| sync.gizmo().copied()) else {
            return false;
        };
        let center_world = target.pose.translation;
        let Some(center_viewport) = self.camera.project_point(center_world, self.viewport) else {
            return false;
        };
        let plane_normal = self.camera.forward();
        if plane_normal.length_squared() <= f32::EPSILON {
            return false;
        }
        let Some(hit) = gizmo::intersect_ray_plane(ray_origin, ray_dir, center_world, plane_normal) else {
            return false;
        };
        let dist = screen.distance(center_viewport);
        let start_vec = hit - center_world;
        let interaction = match target.tool {
            TransformTool::Translate if dist <= GIZMO_TRANSLATE_RADIUS_PX => GizmoInteraction::Translate {
                offset: center_world - hit,
                plane_origin: center_world,
                plane_normal,
            },
            TransformTool::Rotate
                if (GIZMO_ROTATE_INNER_RADIUS_PX..=GIZMO_ROTATE_OUTER_RADIUS_PX).contains(&dist)
                    && start_vec.length_squared() > f32::EPSILON =>
            {
                GizmoInteraction::Rotate { axis: plane_normal, start_rotation: target.pose.rotation, start_vector: start_vec }
            }
            TransformTool::Scale if dist <= GIZMO_SCALE_OUTER_RADIUS_PX && start_vec.length() > f32::EPSILON => {
                GizmoInteraction::Scale {
                    start_scale: target.pose.scale,
                    start_distance: start_vec.length(),
                    plane_origin: center_world,
                    plane_normal,
                }
            }
            _ => return false,
        };
        if !self.ecs.begin_drag(id) {
            return false;
        }
        self.gizmo_drag = Some((id, interaction));
        true
    }

    pub(super) fn pointer_move(&mut self, screen: Vec2, snap: bool) -> ActionResult {
        let Some((id, interaction)) = self.gizmo_drag else {
            return ActionResult::Ignored;
        };
        let Some(mut pose) = self.ecs.actor_sync(id).and_then(|sync| sync.gizmo()).map(|target| target.pose) else {
            self.gizmo_drag = None;
            return ActionResult::Ignored;
        };
        let Some((ray_origin, ray_dir)) = self.camera.screen_ray(screen, self.viewport) else {
            return ActionResult::Ignored;
        };
        match interaction {
            GizmoInteraction::Translate { offset, plane_origin, plane_normal } => {
                let Some(hit) = gizmo::intersect_ray_plane(ray_origin, ray_dir, plane_origin, plane_normal) else {
                    return ActionResult::Ignored;
                };
                let translation = hit + offset;
                pose.translation = if snap { gizmo::snap_translation(translation) } else { translation };
            }
            GizmoInteraction::Rotate { axis, start_rotation, start_vector } => {
                let center = pose.translation;
                let Some(hit) = gizmo::intersect_ray_plane(ray_origin, ray_dir, center, axis) else {
                    return ActionResult::Ignored;
                };
                let mut delta = gizmo::signed_angle_about(axis, start_vector, hit - center);
                if snap {
                    delta = gizmo::snap_angle(delta);
                }
                pose.rotation = (Quat::from_axis_angle(axis.normalize_or_zero(), delta) * start_rotation).normalize();
            }
            GizmoInteraction::Scale { start_scale, start_distance, plane_origin, plane_normal } => {
                let Some(hit) = gizmo::intersect_ray_plane(ray_origin, ray_dir, plane_origin, plane_normal) else {
                    return ActionResult::Ignored;
                };
                let ratio = gizmo::apply_scale_ratio((hit - plane_origin).length() / start_distance, snap);
                pose.scale = start_scale * ratio;
            }
        }
        ActionResult::from_bool(self.ecs.drag_to(id, pose))
    }

    pub(super) fn pointer_up(&mut self) -> ActionResult {
        if self.gizmo_drag.is_none() {
            return ActionResult::Ignored;
        }
        self.finish_drag();
        ActionResult::Applied
    }

    /// Ends any drag in progress and commits the dragged transform to the store.
    pub(super) fn finish_drag(&mut self) {
        let Some((id, _)) = self.gizmo_drag.take() else {
            return;
        };
        let Some(stored) = self.ecs.end_drag(id) else {
            return;
        };
        let patch = SceneObjectPatch::transform(stored.position, stored.rotation, stored.scale);
        if self.store.update(id, &patch) {
            self.sync_object(id);
        }
    }
}
