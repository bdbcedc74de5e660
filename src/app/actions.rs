use super::Editor;
use crate::actor::StoreWrite;
use crate::camera3d::Viewport;
use crate::catalog::{find_asset, Asset, BulkMaterial};
use crate::engine::{EngineMode, SimulationConfig, TransformTool};
use crate::scene::{SceneObjectId, SceneObjectPatch};
use glam::{Vec2, Vec3};

/// Every user-driven mutation of the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    SpawnAsset { asset_id: String, position: Vec3 },
    StartAssetDrag { asset_id: String },
    CancelAssetDrag,
    /// Drops the asset being dragged at a viewport position.
    DropAsset { screen: Vec2 },
    UpdateObject { id: SceneObjectId, patch: SceneObjectPatch },
    DeleteObject { id: SceneObjectId },
    ClearScene,
    Select { id: Option<SceneObjectId> },
    /// Asset browser click on a material or physics asset: assigns it to the selection.
    AssignAsset { asset_id: String },
    SetMode { mode: EngineMode },
    SetTransformTool { tool: TransformTool },
    KeyShortcut { key: char },
    PointerDown { screen: Vec2 },
    PointerMove { screen: Vec2, snap: bool },
    PointerUp,
    Shoot { screen: Vec2 },
    SetBulkCount { count: usize },
    SetBulkMaterial { material: BulkMaterial },
    SetClothEnabled { enabled: bool },
    SetPaused { paused: bool },
    TogglePause,
    SetVortex { enabled: bool, strength: f32 },
    SetPrecisionStep { enabled: bool },
    DismissWarning { id: u64 },
    OrbitCamera { delta: Vec2 },
    ZoomCamera { factor: f32 },
    ResizeViewport { viewport: Viewport },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionResult {
    Applied,
    Spawned(SceneObjectId),
    /// Taken by the store; the body picks it up when the simulation next pauses.
    Deferred,
    Ignored,
}

impl ActionResult {
    pub fn is_ignored(self) -> bool {
        self == ActionResult::Ignored
    }

    pub(super) fn from_bool(applied: bool) -> Self {
        if applied {
            ActionResult::Applied
        } else {
            ActionResult::Ignored
        }
    }
}

impl Editor {
    pub fn dispatch(&mut self, action: EditorAction) -> ActionResult {
        match action {
            EditorAction::SpawnAsset { asset_id, position } => self.spawn_asset(&asset_id, position),
            EditorAction::StartAssetDrag { asset_id } => {
                if !self.state.mode.shows_sidebars() {
                    return ActionResult::Ignored;
                }
                let asset = find_asset(&asset_id).filter(Asset::is_placeable);
                self.state.dragged_asset = asset.map(|asset| asset.id());
                ActionResult::from_bool(asset.is_some())
            }
            EditorAction::CancelAssetDrag => ActionResult::from_bool(self.state.dragged_asset.take().is_some()),
            EditorAction::DropAsset { screen } => self.drop_asset(screen),
            EditorAction::UpdateObject { id, patch } => self.update_object(id, &patch),
            EditorAction::DeleteObject { id } => self.delete_object(id),
            EditorAction::ClearScene => self.clear_scene(),
            EditorAction::Select { id } => self.select(id),
            EditorAction::AssignAsset { asset_id } => self.assign_asset(&asset_id),
            EditorAction::SetMode { mode } => self.set_mode(mode),
            EditorAction::SetTransformTool { tool } => self.set_tool(tool),
            EditorAction::KeyShortcut { key } => match TransformTool::from_shortcut(key) {
                Some(tool) => self.set_tool(tool),
                None => ActionResult::Ignored,
            },
            EditorAction::PointerDown { screen } => self.pointer_down(screen),
            EditorAction::PointerMove { screen, snap } => self.pointer_move(screen, snap),
            EditorAction::PointerUp => self.pointer_up(),
            EditorAction::Shoot { screen } => self.shoot(screen),
            EditorAction::SetBulkCount { count } => {
                self.sim.bulk_count = count.min(SimulationConfig::MAX_BULK_COUNT);
                self.ensure_bulk();
                ActionResult::Applied
            }
            EditorAction::SetBulkMaterial { material } => {
                self.sim.bulk_material = material;
                self.ensure_bulk();
                ActionResult::Applied
            }
            EditorAction::SetClothEnabled { enabled } => self.set_cloth_enabled(enabled),
            EditorAction::SetPaused { paused } => self.set_paused(paused),
            EditorAction::TogglePause => self.set_paused(!self.sim.paused),
            EditorAction::SetVortex { enabled, strength } => {
                self.sim.vortex_enabled = enabled;
                if strength.is_finite() {
                    self.sim.vortex_strength = strength;
                }
                self.sync_snapshot();
                ActionResult::Applied
            }
            EditorAction::SetPrecisionStep { enabled } => {
                self.sim.precision_step = enabled;
                self.sync_snapshot();
                ActionResult::Applied
            }
            EditorAction::DismissWarning { id } => ActionResult::from_bool(self.warnings.dismiss(id)),
            EditorAction::OrbitCamera { delta } => {
                if self.is_dragging() {
                    return ActionResult::Ignored;
                }
                self.orbit.orbit(delta);
                self.orbit.apply_to(&mut self.camera);
                ActionResult::Applied
            }
            EditorAction::ZoomCamera { factor } => {
                if !factor.is_finite() || factor <= 0.0 {
                    return ActionResult::Ignored;
                }
                self.orbit.zoom(factor);
                self.orbit.apply_to(&mut self.camera);
                ActionResult::Applied
            }
            EditorAction::ResizeViewport { viewport } => {
                self.viewport = viewport;
                ActionResult::Applied
            }
        }
    }

    fn spawn_asset(&mut self, asset_id: &str, position: Vec3) -> ActionResult {
        if !self.state.mode.shows_sidebars() {
            return ActionResult::Ignored;
        }
        let Some(asset) = find_asset(asset_id).filter(Asset::is_placeable) else {
            eprintln!("[sandbox] asset '{asset_id}' cannot be placed");
            return ActionResult::Ignored;
        };
        let id = self.store.spawn(&asset, position);
        self.sync_object(id);
        self.select(Some(id));
        ActionResult::Spawned(id)
    }

    fn drop_asset(&mut self, screen: Vec2) -> ActionResult {
        let Some(asset_id) = self.state.dragged_asset.take() else {
            return ActionResult::Ignored;
        };
        match self.camera.ground_drop_point(screen, self.viewport) {
            Some(position) => self.spawn_asset(asset_id, position),
            None => ActionResult::Ignored,
        }
    }

    fn update_object(&mut self, id: SceneObjectId, patch: &SceneObjectPatch) -> ActionResult {
        if patch.is_empty() || !self.store.update(id, patch) {
            return ActionResult::Ignored;
        }
        match self.sync_object(id) {
            Some(StoreWrite::Deferred) => ActionResult::Deferred,
            Some(StoreWrite::Applied) => {
                self.ecs.refresh_actor(id);
                ActionResult::Applied
            }
            Some(StoreWrite::Ignored) | None => ActionResult::Applied,
        }
    }

    fn delete_object(&mut self, id: SceneObjectId) -> ActionResult {
        if !self.store.contains(id) {
            return ActionResult::Ignored;
        }
        self.finish_drag();
        self.store.delete(id);
        self.ecs.remove_actor(id);
        self.stress_cooldowns.remove(&id);
        self.state.selected = None;
        self.refresh_actors();
        ActionResult::Applied
    }

    fn clear_scene(&mut self) -> ActionResult {
        self.gizmo_drag = None;
        self.store.clear();
        self.ecs.clear_actors();
        self.state.selected = None;
        self.warnings.clear();
        self.stress_cooldowns.clear();
        self.sync_snapshot();
        ActionResult::Applied
    }

    pub(super) fn select(&mut self, id: Option<SceneObjectId>) -> ActionResult {
        if let Some(id) = id {
            if self.state.mode == EngineMode::Play || !self.store.contains(id) {
                return ActionResult::Ignored;
            }
        }
        if self.state.selected == id {
            return ActionResult::Applied;
        }
        self.finish_drag();
        let previous = self.state.selected;
        self.state.selected = id;
        self.sync_snapshot();
        for id in [previous, id].into_iter().flatten() {
            self.ecs.refresh_actor(id);
        }
        ActionResult::Applied
    }

    fn assign_asset(&mut self, asset_id: &str) -> ActionResult {
        let Some(selected) = self.state.selected else {
            return ActionResult::Ignored;
        };
        let patch = match find_asset(asset_id) {
            Some(Asset::Material(material)) => {
                SceneObjectPatch { material_id: Some(material.id.to_string()), ..Default::default() }
            }
            Some(Asset::Physics(physics)) => {
                SceneObjectPatch { physics_id: Some(Some(physics.id.to_string())), ..Default::default() }
            }
            _ => return ActionResult::Ignored,
        };
        self.update_object(selected, &patch)
    }

    fn set_mode(&mut self, mode: EngineMode) -> ActionResult {
        if mode == self.state.mode {
            return ActionResult::Ignored;
        }
        self.finish_drag();
        let leaving_play = self.state.mode == EngineMode::Play;
        self.state.set_mode(mode);
        self.state.dragged_asset = None;
        if leaving_play {
            self.ecs.park_projectiles();
            self.projectiles.reset();
        }
        self.refresh_actors();
        if mode == EngineMode::Editor && self.sim.cloth_enabled {
            self.ecs.build_cloth(&self.config.cloth, mode);
        }
        ActionResult::Applied
    }

    fn set_tool(&mut self, tool: TransformTool) -> ActionResult {
        self.state.transform_tool = tool;
        self.sync_snapshot();
        if let Some(id) = self.state.selected {
            self.ecs.refresh_actor(id);
        }
        ActionResult::Applied
    }

    fn set_cloth_enabled(&mut self, enabled: bool) -> ActionResult {
        if enabled == self.sim.cloth_enabled {
            return ActionResult::Ignored;
        }
        self.sim.cloth_enabled = enabled;
        if enabled {
            self.ecs.build_cloth(&self.config.cloth, self.state.mode);
        } else {
            self.ecs.clear_cloth();
        }
        ActionResult::Applied
    }

    fn set_paused(&mut self, paused: bool) -> ActionResult {
        if paused == self.sim.paused {
            return ActionResult::Ignored;
        }
        self.sim.paused = paused;
        self.refresh_actors();
        ActionResult::Applied
    }

    pub(super) fn shoot(&mut self, screen: Vec2) -> ActionResult {
        if self.state.mode != EngineMode::Play {
            return ActionResult::Ignored;
        }
        let Some((origin, direction)) = self.camera.screen_ray(screen, self.viewport) else {
            return ActionResult::Ignored;
        };
        let Some(shot) = self.projectiles.fire(origin, direction) else {
            return ActionResult::Ignored;
        };
        ActionResult::from_bool(self.ecs.launch(&shot))
    }
}
