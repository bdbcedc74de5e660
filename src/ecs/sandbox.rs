//! Bulk debris, cloth net and projectile pool owned by the ECS world.

use super::systems::cloth_node_kind;
use super::types::*;
use super::world::EcsWorld;
use crate::actor::{BodyKind, Pose};
use crate::bulk::{BulkConfig, BulkPlan, InstanceBatch};
use crate::catalog::{BulkMaterial, ColliderShape, PhysicsProfile};
use crate::cloth::{ClothConfig, ClothLayout};
use crate::engine::EngineMode;
use crate::events::SandboxEvent;
use crate::shooter::{ShooterConfig, Shot, PARKED_POSITION};
use bevy_ecs::prelude::Entity;
use glam::{Quat, Vec3};
use rapier3d::prelude::RigidBodyHandle;

impl EcsWorld {
    /// Replaces every debris instance with a fresh seeded layout.
    pub fn rebuild_bulk(&mut self, count: usize, material: BulkMaterial, config: &BulkConfig) -> usize {
        self.clear_bulk();
        let plan = BulkPlan::build(count, material, config);
        for (index, pose) in plan.poses.iter().enumerate() {
            let entity = self.world.spawn(BulkInstance { index, scale: pose.scale }).id();
            let handle = {
                let mut rapier = self.rapier_mut();
                let body_pose = Pose::new(pose.translation, pose.rotation, Vec3::ONE);
                let handle = rapier.spawn_body(BodyKind::Dynamic, body_pose);
                rapier.attach_collider(
                    handle,
                    ColliderShape::Ball { radius: pose.collider_radius() },
                    plan.profile.physics,
                    entity,
                    false,
                );
                handle
            };
            self.world.entity_mut(entity).insert(RapierBody { handle });
            self.bulk.push(entity);
        }
        *self.world.resource_mut::<InstanceBatch>() = plan.batch();
        self.emit(SandboxEvent::BulkRebuilt { count: plan.len(), material });
        plan.len()
    }

    pub fn clear_bulk(&mut self) {
        let entities = std::mem::take(&mut self.bulk);
        self.despawn_bodies(entities);
        let material = self.world.resource::<InstanceBatch>().material();
        *self.world.resource_mut::<InstanceBatch>() = InstanceBatch::new(material);
    }

    pub fn bulk_count(&self) -> usize {
        self.bulk.len()
    }

    pub fn bulk_bodies(&self) -> Vec<RigidBodyHandle> {
        self.bodies_of(&self.bulk)
    }

    /// Builds the cloth net with node kinds matching `mode`.
    pub fn build_cloth(&mut self, config: &ClothConfig, mode: EngineMode) -> usize {
        self.clear_cloth();
        let layout = ClothLayout::new(config);
        let half_extents = Vec3::from_array(config.node_half_extents);
        let profile = PhysicsProfile { density: config.density, friction: 0.5, restitution: 0.0 };
        let mut handles = Vec::with_capacity(layout.nodes().len());
        for node in layout.nodes() {
            let entity = self.world.spawn(ClothNode { row: node.row, col: node.col, anchor: node.anchor }).id();
            let handle = self.rapier_mut().spawn_cloth_node(
                node.position,
                half_extents,
                profile,
                config.damping,
                cloth_node_kind(mode, node.anchor),
                entity,
            );
            self.world.entity_mut(entity).insert(RapierBody { handle });
            self.cloth.push(entity);
            handles.push(handle);
        }
        {
            let mut rapier = self.rapier_mut();
            for joint in layout.joints() {
                rapier.add_spherical_joint(handles[joint.a], handles[joint.b], joint.anchor_a, joint.anchor_b);
            }
        }
        self.cloth_joints = layout.joints().len();
        let nodes = self.cloth.len();
        self.emit(SandboxEvent::ClothRebuilt { nodes, joints: self.cloth_joints });
        nodes
    }

    pub fn clear_cloth(&mut self) {
        let entities = std::mem::take(&mut self.cloth);
        self.despawn_bodies(entities);
        self.cloth_joints = 0;
    }

    pub fn cloth_node_count(&self) -> usize {
        self.cloth.len()
    }

    pub fn cloth_joint_count(&self) -> usize {
        self.cloth_joints
    }

    /// Body handle of the cloth node at `(row, col)`.
    pub fn cloth_body(&self, row: usize, col: usize) -> Option<RigidBodyHandle> {
        self.cloth.iter().find_map(|entity| {
            let node = self.world.get::<ClothNode>(*entity)?;
            if node.row == row && node.col == col {
                self.world.get::<RapierBody>(*entity).map(|body| body.handle)
            } else {
                None
            }
        })
    }

    /// Creates the parked projectile pool once; later calls keep the existing bodies.
    pub fn ensure_projectiles(&mut self, config: &ShooterConfig) {
        if !self.projectiles.is_empty() {
            return;
        }
        let profile = PhysicsProfile { density: config.density, friction: 0.5, restitution: config.restitution };
        for slot in 0..config.pool_size.max(1) {
            let entity = self.world.spawn(Projectile { slot }).id();
            let handle = self.rapier_mut().spawn_projectile(
                PARKED_POSITION,
                config.radius,
                profile,
                config.linear_damping,
                entity,
            );
            let parked = Pose::new(PARKED_POSITION, Quat::IDENTITY, Vec3::ONE);
            self.world.entity_mut(entity).insert((RapierBody { handle }, VisualPose(parked)));
            self.projectiles.push(entity);
        }
    }

    pub fn launch(&mut self, shot: &Shot) -> bool {
        let Some(entity) = self.projectiles.get(shot.slot).copied() else {
            return false;
        };
        let Some(body) = self.world.get::<RapierBody>(entity).copied() else {
            return false;
        };
        let launched = self.rapier_mut().launch_projectile(body.handle, shot.origin, shot.velocity);
        if launched {
            self.emit(SandboxEvent::ProjectileFired { slot: shot.slot });
        }
        launched
    }

    /// Disables every projectile and moves it back under the arena.
    pub fn park_projectiles(&mut self) {
        let handles = self.bodies_of(&self.projectiles);
        let mut rapier = self.rapier_mut();
        for handle in handles {
            rapier.park_projectile(handle, PARKED_POSITION);
        }
    }

    pub fn projectile_count(&self) -> usize {
        self.projectiles.len()
    }

    pub fn projectile_body(&self, slot: usize) -> Option<RigidBodyHandle> {
        let entity = self.projectiles.get(slot)?;
        self.world.get::<RapierBody>(*entity).map(|body| body.handle)
    }

    fn bodies_of(&self, entities: &[Entity]) -> Vec<RigidBodyHandle> {
        entities.iter().filter_map(|entity| self.world.get::<RapierBody>(*entity).map(|body| body.handle)).collect()
    }

    fn despawn_bodies(&mut self, entities: Vec<Entity>) {
        for entity in entities {
            if let Some(body) = self.world.get::<RapierBody>(entity).copied() {
                self.rapier_mut().remove_body(body.handle);
            }
            self.world.despawn(entity);
        }
    }
}
