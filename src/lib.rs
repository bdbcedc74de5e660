pub mod actor;
pub mod app;
pub mod bulk;
pub mod camera3d;
pub mod catalog;
pub mod cli;
pub mod cloth;
pub mod config;
pub mod ecs;
pub mod engine;
pub mod events;
pub mod gizmo;
pub mod scene;
pub mod shooter;
pub mod time;
pub mod vortex;
pub mod warnings;

pub use app::{run, run_with_overrides, ActionResult, Editor, EditorAction};
