use crate::catalog::BulkMaterial;
use crate::scene::SceneObjectId;
use bevy_ecs::prelude::{Entity, Resource};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum SandboxEvent {
    ActorSpawned { id: SceneObjectId, entity: Entity },
    ActorDespawned { id: SceneObjectId, entity: Entity },
    /// A store edit landed while physics owned the body; it applies on the next pause or re-select.
    EditDeferred { id: SceneObjectId },
    ContactForce { a: Entity, b: Entity, force: f32 },
    BulkRebuilt { count: usize, material: BulkMaterial },
    ClothRebuilt { nodes: usize, joints: usize },
    ProjectileFired { slot: usize },
}

impl SandboxEvent {
    pub fn contact_force(a: Entity, b: Entity, force: f32) -> Self {
        let (a, b) = if a.index() <= b.index() { (a, b) } else { (b, a) };
        SandboxEvent::ContactForce { a, b, force }
    }
}

impl fmt::Display for SandboxEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SandboxEvent::ActorSpawned { id, entity } => {
                write!(f, "ActorSpawned id={id} entity={}", entity.index())
            }
            SandboxEvent::ActorDespawned { id, entity } => {
                write!(f, "ActorDespawned id={id} entity={}", entity.index())
            }
            SandboxEvent::EditDeferred { id } => write!(f, "EditDeferred id={id}"),
            SandboxEvent::ContactForce { a, b, force } => {
                write!(f, "ContactForce a={} b={} force={:.3}", a.index(), b.index(), force)
            }
            SandboxEvent::BulkRebuilt { count, material } => {
                write!(f, "BulkRebuilt count={count} material={material}")
            }
            SandboxEvent::ClothRebuilt { nodes, joints } => {
                write!(f, "ClothRebuilt nodes={nodes} joints={joints}")
            }
            SandboxEvent::ProjectileFired { slot } => write!(f, "ProjectileFired slot={slot}"),
        }
    }
}

#[derive(Default, Resource)]
pub struct EventBus {
    events: Vec<SandboxEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: SandboxEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<SandboxEvent> {
        self.events.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_force_orders_entities() {
        let a = Entity::from_raw(7);
        let b = Entity::from_raw(3);
        match SandboxEvent::contact_force(a, b, 1.5) {
            SandboxEvent::ContactForce { a: first, b: second, .. } => {
                assert_eq!(first.index(), 3);
                assert_eq!(second.index(), 7);
            }
            other => panic!("unexpected event {other}"),
        }
    }

    #[test]
    fn drain_empties_bus() {
        let mut bus = EventBus::default();
        bus.push(SandboxEvent::ProjectileFired { slot: 2 });
        assert_eq!(bus.len(), 1);
        assert_eq!(bus.drain().len(), 1);
        assert!(bus.is_empty());
    }
}
