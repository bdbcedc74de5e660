pub mod physics;
mod sandbox;
pub mod systems;
pub mod types;
pub mod world;

pub use physics::{PhysicsParams, RapierState};
pub use types::*;
pub use world::EcsWorld;
