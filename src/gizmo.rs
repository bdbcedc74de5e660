use crate::actor::Pose;
use crate::engine::TransformTool;
use glam::{Quat, Vec3};

pub(crate) const GIZMO_TRANSLATE_RADIUS_PX: f32 = 18.0;
pub(crate) const GIZMO_SCALE_OUTER_RADIUS_PX: f32 = 32.0;
pub(crate) const GIZMO_ROTATE_INNER_RADIUS_PX: f32 = 38.0;
pub(crate) const GIZMO_ROTATE_OUTER_RADIUS_PX: f32 = 52.0;
pub(crate) const SCALE_MIN_RATIO: f32 = 0.05;
pub(crate) const SCALE_MAX_RATIO: f32 = 20.0;
pub(crate) const SCALE_SNAP_STEP: f32 = 0.1;
pub(crate) const TRANSLATE_SNAP_STEP: f32 = 0.05;
pub(crate) const ROTATE_SNAP_STEP_RADIANS: f32 = 15.0 * std::f32::consts::PI / 180.0;

/// Transform the user manipulates directly. Decoupled from the physics body until drag end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoTarget {
    pub pose: Pose,
    pub tool: TransformTool,
}

impl GizmoTarget {
    pub fn new(pose: Pose, tool: TransformTool) -> Self {
        Self { pose, tool }
    }

    /// Follows a body pose while keeping the editor-only scale.
    pub fn follow(&mut self, live: Pose) {
        self.pose.translation = live.translation;
        self.pose.rotation = live.rotation;
    }
}

/// In-flight pointer drag on the gizmo handles of the selected object.
#[derive(Clone, Copy, PartialEq, Debug)]
pub(crate) enum GizmoInteraction {
    Translate {
        offset: Vec3,
        plane_origin: Vec3,
        plane_normal: Vec3,
    },
    Rotate {
        axis: Vec3,
        start_rotation: Quat,
        start_vector: Vec3,
    },
    Scale {
        start_scale: Vec3,
        start_distance: f32,
        plane_origin: Vec3,
        plane_normal: Vec3,
    },
}

pub(crate) fn apply_scale_ratio(ratio: f32, snap: bool) -> f32 {
    let clamped = ratio.clamp(SCALE_MIN_RATIO, SCALE_MAX_RATIO);
    if snap {
        let snapped = (clamped / SCALE_SNAP_STEP).round() * SCALE_SNAP_STEP;
        snapped.clamp(SCALE_MIN_RATIO, SCALE_MAX_RATIO)
    } else {
        clamped
    }
}

pub(crate) fn snap_translation(translation: Vec3) -> Vec3 {
    (translation / TRANSLATE_SNAP_STEP).round() * TRANSLATE_SNAP_STEP
}

pub(crate) fn snap_angle(radians: f32) -> f32 {
    (radians / ROTATE_SNAP_STEP_RADIANS).round() * ROTATE_SNAP_STEP_RADIANS
}

pub(crate) fn intersect_ray_plane(origin: Vec3, dir: Vec3, plane_origin: Vec3, plane_normal: Vec3) -> Option<Vec3> {
    let denom = plane_normal.dot(dir);
    if denom.abs() < 1e-4 {
        return None;
    }
    let t = (plane_origin - origin).dot(plane_normal) / denom;
    if t < 0.0 {
        return None;
    }
    Some(origin + dir * t)
}

/// Signed angle from `from` to `to` around `axis`; both vectors are projected onto the plane first.
pub(crate) fn signed_angle_about(axis: Vec3, from: Vec3, to: Vec3) -> f32 {
    let axis = axis.normalize_or_zero();
    let a = (from - axis * from.dot(axis)).normalize_or_zero();
    let b = (to - axis * to.dot(axis)).normalize_or_zero();
    if a == Vec3::ZERO || b == Vec3::ZERO {
        return 0.0;
    }
    a.cross(b).dot(axis).atan2(a.dot(b))
}
