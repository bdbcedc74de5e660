//! Editor controller: owns the scene store, engine state and the physics world, and routes
//! every mutation through [`Editor::dispatch`].

mod actions;
mod asset_browser;
mod gizmo_interaction;
mod inspector;
mod outliner;
mod runner;

pub use actions::{ActionResult, EditorAction};
pub use asset_browser::{AssetBrowserSection, AssetBrowserView, AssetTile};
pub use inspector::{InspectorEdit, InspectorView, LightSection, MaterialSection, PhysicsSection};
pub use outliner::{OutlinerRow, OutlinerView};
pub use runner::{run, run_with_overrides, RunSummary};

use crate::actor::{Pose, StoreWrite};
use crate::bulk::InstanceBatch;
use crate::camera3d::{Camera3D, OrbitCamera, Viewport};
use crate::catalog::BulkMaterial;
use crate::config::AppConfig;
use crate::ecs::{EcsWorld, FrameStats};
use crate::engine::{EngineMode, EngineSnapshot, EngineState, SimulationConfig};
use crate::events::SandboxEvent;
use crate::gizmo::GizmoInteraction;
use crate::scene::{SceneObject, SceneObjectId, SceneStore};
use crate::shooter::ProjectilePool;
use crate::time::FrameClock;
use crate::warnings::{classify_stress, SimulationWarning, WarningQueue};
use std::collections::HashMap;
use std::fmt;

pub struct Editor {
    config: AppConfig,
    store: SceneStore,
    state: EngineState,
    sim: SimulationConfig,
    warnings: WarningQueue,
    ecs: EcsWorld,
    camera: Camera3D,
    orbit: OrbitCamera,
    viewport: Viewport,
    clock: FrameClock,
    projectiles: ProjectilePool,
    gizmo_drag: Option<(SceneObjectId, GizmoInteraction)>,
    /// Earliest time each object may raise another stress warning.
    stress_cooldowns: HashMap<SceneObjectId, f64>,
    built_bulk: Option<(usize, BulkMaterial)>,
}

/// Bottom status bar contents.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusBar {
    pub mode: EngineMode,
    pub paused: bool,
    pub bulk_instances: usize,
    pub actors: usize,
    pub warnings: Vec<SimulationWarning>,
}

impl fmt::Display for StatusBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | instances: {} | actors: {}", self.mode, self.bulk_instances, self.actors)?;
        if self.paused && self.mode.simulates() {
            f.write_str(" | paused")?;
        }
        if !self.warnings.is_empty() {
            write!(f, " | warnings: {}", self.warnings.len())?;
        }
        Ok(())
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl Editor {
    pub fn new(config: AppConfig) -> Self {
        let mut ecs = EcsWorld::new(&config.physics.params());
        let camera = config.camera.camera();
        let orbit = OrbitCamera::from_camera(&camera);
        let mut sim = config.simulation.clone();
        sim.bulk_count = sim.bulk_count.min(SimulationConfig::MAX_BULK_COUNT);
        ecs.ensure_projectiles(&config.shooter);
        let mut editor = Self {
            store: SceneStore::new(),
            state: EngineState::default(),
            warnings: WarningQueue::from_config(&config.warnings),
            camera,
            orbit,
            viewport: config.camera.viewport(),
            clock: FrameClock::default(),
            projectiles: ProjectilePool::new(&config.shooter),
            gizmo_drag: None,
            stress_cooldowns: HashMap::new(),
            built_bulk: None,
            sim,
            ecs,
            config,
        };
        editor.sync_snapshot();
        editor.ensure_bulk();
        if editor.sim.cloth_enabled {
            editor.ecs.build_cloth(&editor.config.cloth, editor.state.mode);
        }
        editor
    }

    /// Advances one frame: physics (when running), then stress warnings and expiry.
    pub fn frame(&mut self, dt: f32) -> FrameStats {
        let dt = self.clock.advance(dt);
        self.sync_snapshot();
        self.ecs.run_frame(dt);
        let events = self.ecs.drain_events();
        self.collect_stress_warnings(&events);
        self.warnings.expire(self.clock.elapsed());
        self.ecs.frame_stats()
    }

    pub fn status(&self) -> StatusBar {
        StatusBar {
            mode: self.state.mode,
            paused: self.snapshot().paused,
            bulk_instances: self.ecs.bulk_count(),
            actors: self.store.len(),
            warnings: self.warnings.iter().cloned().collect(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn object(&self, id: SceneObjectId) -> Option<&SceneObject> {
        self.store.get(id)
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn mode(&self) -> EngineMode {
        self.state.mode
    }

    pub fn selected(&self) -> Option<SceneObjectId> {
        self.state.selected
    }

    pub fn simulation(&self) -> &SimulationConfig {
        &self.sim
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot::capture(&self.state, &self.sim, self.clock.elapsed())
    }

    pub fn warnings(&self) -> &WarningQueue {
        &self.warnings
    }

    pub fn ecs(&self) -> &EcsWorld {
        &self.ecs
    }

    pub fn camera(&self) -> &Camera3D {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn elapsed(&self) -> f64 {
        self.clock.elapsed()
    }

    pub fn projectiles(&self) -> &ProjectilePool {
        &self.projectiles
    }

    pub fn instance_batch(&self) -> &InstanceBatch {
        self.ecs.instance_batch()
    }

    /// Pose the object is drawn with this frame.
    pub fn object_pose(&self, id: SceneObjectId) -> Option<Pose> {
        self.ecs.visual_pose(id)
    }

    pub fn is_dragging(&self) -> bool {
        self.gizmo_drag.is_some()
    }

    fn sync_snapshot(&mut self) {
        let snapshot = self.snapshot();
        self.ecs.set_snapshot(snapshot);
    }

    /// Pushes the stored object into the physics world.
    fn sync_object(&mut self, id: SceneObjectId) -> Option<StoreWrite> {
        let object = self.store.get(id)?.clone();
        self.ecs.sync_actor(&object)
    }

    /// Reconciles every actor with the current snapshot without stepping.
    fn refresh_actors(&mut self) {
        self.sync_snapshot();
        for id in self.store.ids() {
            self.ecs.refresh_actor(id);
        }
    }

    /// Rebuilds the debris layer when its count or material no longer matches the settings.
    fn ensure_bulk(&mut self) {
        let wanted = (self.sim.bulk_count, self.sim.bulk_material);
        if self.built_bulk == Some(wanted) {
            return;
        }
        self.ecs.rebuild_bulk(wanted.0, wanted.1, &self.config.bulk);
        self.built_bulk = Some(wanted);
    }

    fn collect_stress_warnings(&mut self, events: &[SandboxEvent]) {
        let now = self.clock.elapsed();
        let lifetime = self.warnings.lifetime();
        let paused = self.snapshot().paused;
        for event in events {
            let SandboxEvent::ContactForce { a, b, force } = event else {
                continue;
            };
            if paused {
                continue;
            }
            for entity in [*a, *b] {
                let Some(id) = self.ecs.actor_for_entity(entity) else {
                    continue;
                };
                if self.ecs.actor_sync(id).is_some_and(|sync| sync.is_dragging()) {
                    continue;
                }
                if self.stress_cooldowns.get(&id).is_some_and(|until| now < *until) {
                    continue;
                }
                let Some(object) = self.store.get(id) else {
                    continue;
                };
                if let Some((kind, message)) = classify_stress(&object.material_id, *force, &self.config.warnings) {
                    self.warnings.push(kind, message, now);
                    self.stress_cooldowns.insert(id, now + lifetime);
                }
            }
        }
    }
}
