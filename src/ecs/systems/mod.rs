use bevy_ecs::prelude::Resource;

mod actor;
mod physics;
mod picking;

pub use actor::*;
pub use physics::*;
pub use picking::*;

#[derive(Resource, Clone, Copy)]
pub struct TimeDelta(pub f32);
