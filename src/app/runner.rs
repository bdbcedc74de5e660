use super::{Editor, EditorAction, StatusBar};
use crate::cli::CliOverrides;
use crate::config::AppConfig;
use crate::engine::EngineMode;
use crate::time::Time;
use anyhow::Result;
use glam::{Vec2, Vec3};
use std::fmt;

const FRAME_DT: f32 = 1.0 / 60.0;

/// Assets dropped before the run, with their drop point as a fraction of the viewport.
const DEMO_DROPS: [(&str, [f32; 2]); 4] =
    [("m_cube", [0.5, 0.6]), ("m_sphere", [0.4, 0.7]), ("m_rock", [0.6, 0.7]), ("l_point", [0.5, 0.8])];

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub frames: u32,
    pub simulated_secs: f64,
    pub wall_secs: f32,
    pub status: StatusBar,
    pub actors: Vec<(String, Vec3)>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} frames ({:.2}s simulated, {:.3}s wall)",
            self.frames, self.simulated_secs, self.wall_secs
        )?;
        writeln!(f, "{}", self.status)?;
        for (name, position) in &self.actors {
            writeln!(f, "  {name:<16} ({:>7.2}, {:>7.2}, {:>7.2})", position.x, position.y, position.z)?;
        }
        for warning in &self.status.warnings {
            writeln!(f, "  [{}] {}", warning.kind, warning.message)?;
        }
        Ok(())
    }
}

pub fn run() -> Result<RunSummary> {
    run_with_overrides(CliOverrides::parse_from_env()?)
}

/// Headless session: drops a few assets, switches to Simulate and steps at 60 Hz.
pub fn run_with_overrides(cli: CliOverrides) -> Result<RunSummary> {
    let frames = cli.frames();
    let config_path = cli.config_path();
    let overrides = cli.into_config_overrides();
    let mut config = AppConfig::load_or_default(&config_path);
    if !overrides.is_empty() {
        eprintln!("[cli] overriding {}", overrides.applied_fields().join(", "));
        config.apply_overrides(&overrides);
    }

    let mut editor = Editor::new(config);
    let viewport = editor.viewport();
    for (asset_id, [fx, fy]) in DEMO_DROPS {
        editor.dispatch(EditorAction::StartAssetDrag { asset_id: asset_id.to_string() });
        let screen = Vec2::new(viewport.width as f32 * fx, viewport.height as f32 * fy);
        if editor.dispatch(EditorAction::DropAsset { screen }).is_ignored() {
            eprintln!("[sandbox] drop of '{asset_id}' missed the ground plane");
        }
    }
    editor.dispatch(EditorAction::Select { id: None });
    editor.dispatch(EditorAction::SetMode { mode: EngineMode::Simulate });

    let mut wall = Time::new();
    for _ in 0..frames {
        editor.frame(FRAME_DT);
    }
    wall.tick();

    let actors = editor
        .store()
        .iter()
        .map(|object| {
            let position = editor.object_pose(object.id).map(|pose| pose.translation).unwrap_or(object.position);
            (object.name.clone(), position)
        })
        .collect();
    Ok(RunSummary {
        frames,
        simulated_secs: editor.elapsed(),
        wall_secs: wall.elapsed_seconds(),
        status: editor.status(),
        actors,
    })
}
