use crate::actor::Pose;
use crate::catalog::ShapeType;
use crate::scene::{SceneObject, SceneObjectId};
use bevy_ecs::prelude::*;
use glam::Vec3;
use rapier3d::prelude::RigidBodyHandle;

#[derive(Component, Clone, Copy, Debug)]
pub struct SceneObjectTag {
    pub id: SceneObjectId,
}

#[derive(Component, Clone, Copy, Debug)]
pub struct RapierBody {
    pub handle: RigidBodyHandle,
}

/// The store's transform as last written, kept in the store's own Euler form.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StoredTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl StoredTransform {
    pub fn of(object: &SceneObject) -> Self {
        Self { position: object.position, rotation: object.rotation, scale: object.scale }
    }

    pub fn from_pose(pose: Pose) -> Self {
        Self { position: pose.translation, rotation: pose.euler(), scale: pose.scale }
    }

    pub fn pose(&self) -> Pose {
        Pose::from_euler(self.position, self.rotation, self.scale)
    }
}

#[derive(Component, Clone, Debug)]
pub struct ActorData {
    pub stored: StoredTransform,
    pub asset_id: String,
    pub material_id: String,
    pub physics_id: Option<String>,
    /// `None` for lights.
    pub shape: Option<ShapeType>,
    /// A mesh with a resolvable physics profile; only those carry a collider.
    pub has_physics: bool,
}

impl ActorData {
    /// Picking radius before scaling.
    pub fn pick_radius(&self) -> f32 {
        self.shape.map(ShapeType::bounding_radius).unwrap_or(0.3)
    }
}

/// Where the object is drawn this frame.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct VisualPose(pub Pose);

#[derive(Component, Clone, Copy, Debug)]
pub struct BulkInstance {
    pub index: usize,
    pub scale: Vec3,
}

#[derive(Component, Clone, Copy, Debug)]
pub struct ClothNode {
    pub row: usize,
    pub col: usize,
    pub anchor: bool,
}

#[derive(Component, Clone, Copy, Debug)]
pub struct Projectile {
    pub slot: usize,
}

/// Per-frame counters written by the physics systems.
#[derive(Resource, Clone, Copy, Debug, Default)]
pub struct FrameStats {
    pub substeps: u32,
    pub vortex_bodies: usize,
    pub contact_forces: usize,
}
