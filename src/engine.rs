use crate::catalog::BulkMaterial;
use crate::scene::SceneObjectId;
use bevy_ecs::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    #[default]
    Editor,
    Simulate,
    Play,
}

impl EngineMode {
    pub fn label(self) -> &'static str {
        match self {
            EngineMode::Editor => "EDITOR",
            EngineMode::Simulate => "SIMULATE",
            EngineMode::Play => "PLAY",
        }
    }

    /// Editor mode never integrates physics regardless of the pause flag.
    pub fn simulates(self) -> bool {
        !matches!(self, EngineMode::Editor)
    }

    /// Outliner, inspector and asset browser are hidden in Play.
    pub fn shows_sidebars(self) -> bool {
        !matches!(self, EngineMode::Play)
    }
}

impl fmt::Display for EngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransformTool {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl TransformTool {
    /// W / E / R, case-insensitive.
    pub fn from_shortcut(key: char) -> Option<Self> {
        match key.to_ascii_lowercase() {
            'w' => Some(TransformTool::Translate),
            'e' => Some(TransformTool::Rotate),
            'r' => Some(TransformTool::Scale),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransformTool::Translate => "Move (W)",
            TransformTool::Rotate => "Rotate (E)",
            TransformTool::Scale => "Scale (R)",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineState {
    pub mode: EngineMode,
    pub transform_tool: TransformTool,
    pub selected: Option<SceneObjectId>,
    pub dragged_asset: Option<&'static str>,
}

impl EngineState {
    pub fn set_mode(&mut self, mode: EngineMode) {
        self.mode = mode;
        self.selected = None;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "SimulationConfig::default_bulk_count")]
    pub bulk_count: usize,
    #[serde(default)]
    pub bulk_material: BulkMaterial,
    #[serde(default = "SimulationConfig::default_cloth_enabled")]
    pub cloth_enabled: bool,
    #[serde(default)]
    pub paused: bool,
    #[serde(default)]
    pub vortex_enabled: bool,
    #[serde(default = "SimulationConfig::default_vortex_strength")]
    pub vortex_strength: f32,
    #[serde(default)]
    pub precision_step: bool,
}

impl SimulationConfig {
    pub const MAX_BULK_COUNT: usize = 2_000;

    const fn default_bulk_count() -> usize {
        500
    }

    const fn default_cloth_enabled() -> bool {
        true
    }

    const fn default_vortex_strength() -> f32 {
        12.0
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            bulk_count: Self::default_bulk_count(),
            bulk_material: BulkMaterial::default(),
            cloth_enabled: Self::default_cloth_enabled(),
            paused: false,
            vortex_enabled: false,
            vortex_strength: Self::default_vortex_strength(),
            precision_step: false,
        }
    }
}

/// Read-only view of engine state handed to every system for one frame.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct EngineSnapshot {
    pub mode: EngineMode,
    pub tool: TransformTool,
    pub selected: Option<SceneObjectId>,
    /// `true` when bodies must not advance: Editor mode or the pause flag.
    pub paused: bool,
    pub vortex_enabled: bool,
    pub vortex_strength: f32,
    pub precision_step: bool,
    pub elapsed: f64,
}

impl EngineSnapshot {
    pub fn capture(state: &EngineState, sim: &SimulationConfig, elapsed: f64) -> Self {
        Self {
            mode: state.mode,
            tool: state.transform_tool,
            selected: state.selected,
            paused: !state.mode.simulates() || sim.paused,
            vortex_enabled: sim.vortex_enabled,
            vortex_strength: sim.vortex_strength,
            precision_step: sim.precision_step,
            elapsed,
        }
    }

    pub fn running(&self) -> bool {
        !self.paused
    }
}

impl Default for EngineSnapshot {
    fn default() -> Self {
        Self::capture(&EngineState::default(), &SimulationConfig::default(), 0.0)
    }
}
