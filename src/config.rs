use crate::bulk::BulkConfig;
use crate::camera3d::CameraConfig;
use crate::catalog::BulkMaterial;
use crate::cloth::ClothConfig;
use crate::ecs::PhysicsParams;
use crate::engine::SimulationConfig;
use crate::shooter::ShooterConfig;
use crate::warnings::WarningConfig;
use anyhow::{Context, Result};
use glam::Vec3;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/vortex_lab.json";

#[derive(Debug, Clone, Deserialize)]
pub struct PhysicsConfig {
    #[serde(default = "PhysicsConfig::default_gravity")]
    pub gravity: [f32; 3],
    #[serde(default = "PhysicsConfig::default_max_frame_dt")]
    pub max_frame_dt: f32,
    #[serde(default = "PhysicsConfig::default_precision_dt")]
    pub precision_dt: f32,
    #[serde(default = "PhysicsConfig::default_max_substeps")]
    pub max_substeps: u32,
    #[serde(default = "PhysicsConfig::default_arena_half_extent")]
    pub arena_half_extent: f32,
}

impl PhysicsConfig {
    const fn default_gravity() -> [f32; 3] {
        [0.0, -9.81, 0.0]
    }

    fn default_max_frame_dt() -> f32 {
        1.0 / 30.0
    }

    fn default_precision_dt() -> f32 {
        1.0 / 120.0
    }

    const fn default_max_substeps() -> u32 {
        8
    }

    const fn default_arena_half_extent() -> f32 {
        50.0
    }

    /// Engine parameters with nonsensical values replaced by their defaults.
    pub fn params(&self) -> PhysicsParams {
        let positive_or = |value: f32, fallback: f32| if value.is_finite() && value > 0.0 { value } else { fallback };
        PhysicsParams {
            gravity: Vec3::from_array(self.gravity),
            max_frame_dt: positive_or(self.max_frame_dt, Self::default_max_frame_dt()),
            precision_dt: positive_or(self.precision_dt, Self::default_precision_dt()),
            max_substeps: self.max_substeps.max(1),
            arena_half_extent: positive_or(self.arena_half_extent, Self::default_arena_half_extent()),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Self::default_gravity(),
            max_frame_dt: Self::default_max_frame_dt(),
            precision_dt: Self::default_precision_dt(),
            max_substeps: Self::default_max_substeps(),
            arena_half_extent: Self::default_arena_half_extent(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub bulk: BulkConfig,
    #[serde(default)]
    pub cloth: ClothConfig,
    #[serde(default)]
    pub shooter: ShooterConfig,
    #[serde(default)]
    pub warnings: WarningConfig,
    #[serde(default)]
    pub camera: CameraConfig,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppConfigOverrides {
    pub bulk_count: Option<usize>,
    pub bulk_material: Option<BulkMaterial>,
    pub paused: Option<bool>,
    pub seed: Option<u64>,
}

impl AppConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).with_context(|| format!("Failed to read config file {}", path.display()))?;
        let cfg = serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(cfg)
    }

    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(err) => {
                eprintln!("[config] {err:?}. Falling back to defaults.");
                Self::default()
            }
        }
    }

    pub fn apply_overrides(&mut self, overrides: &AppConfigOverrides) {
        if let Some(count) = overrides.bulk_count {
            self.simulation.bulk_count = count.min(SimulationConfig::MAX_BULK_COUNT);
        }
        if let Some(material) = overrides.bulk_material {
            self.simulation.bulk_material = material;
        }
        if let Some(paused) = overrides.paused {
            self.simulation.paused = paused;
        }
        if let Some(seed) = overrides.seed {
            self.bulk.seed = seed;
        }
    }
}

impl AppConfigOverrides {
    pub fn is_empty(&self) -> bool {
        self.bulk_count.is_none() && self.bulk_material.is_none() && self.paused.is_none() && self.seed.is_none()
    }

    pub fn applied_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.bulk_count.is_some() {
            fields.push("bulk_count");
        }
        if self.bulk_material.is_some() {
            fields.push("bulk_material");
        }
        if self.paused.is_some() {
            fields.push("paused");
        }
        if self.seed.is_some() {
            fields.push("seed");
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_field_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{ "simulation": {{ "bulk_count": 120, "bulk_material": "ice" }}, "cloth": {{ "rows": 4 }} }}"#
        )
        .expect("write config");
        let cfg = AppConfig::load(file.path()).expect("config parses");
        assert_eq!(cfg.simulation.bulk_count, 120);
        assert_eq!(cfg.simulation.bulk_material, BulkMaterial::Ice);
        assert!(cfg.simulation.cloth_enabled);
        assert_eq!(cfg.cloth.rows, 4);
        assert_eq!(cfg.cloth.cols, 8);
        assert_eq!(cfg.shooter.pool_size, 24);
        assert_eq!(cfg.warnings.capacity, 3);
        assert_eq!(cfg.camera.position, [20.0, 15.0, 20.0]);
        assert_eq!(cfg.physics.params().gravity, Vec3::new(0.0, -9.81, 0.0));
    }

    #[test]
    fn missing_or_broken_file_falls_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("nope.json");
        assert!(AppConfig::load(&missing).is_err());
        assert_eq!(AppConfig::load_or_default(&missing).simulation.bulk_count, 500);

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").expect("write broken config");
        let err = AppConfig::load(&broken).expect_err("parse failure");
        assert!(format!("{err:#}").contains("Failed to parse config file"));
    }

    #[test]
    fn overrides_patch_simulation_and_seed() {
        let mut cfg = AppConfig::default();
        let overrides = AppConfigOverrides {
            bulk_count: Some(5_000),
            bulk_material: Some(BulkMaterial::Gold),
            paused: Some(true),
            seed: Some(7),
        };
        cfg.apply_overrides(&overrides);
        assert_eq!(cfg.simulation.bulk_count, SimulationConfig::MAX_BULK_COUNT);
        assert_eq!(cfg.simulation.bulk_material, BulkMaterial::Gold);
        assert!(cfg.simulation.paused);
        assert_eq!(cfg.bulk.seed, 7);
        assert_eq!(overrides.applied_fields(), vec!["bulk_count", "bulk_material", "paused", "seed"]);
        assert!(AppConfigOverrides::default().is_empty());
    }

    #[test]
    fn physics_params_reject_non_positive_steps() {
        let cfg = PhysicsConfig { max_frame_dt: 0.0, precision_dt: -1.0, max_substeps: 0, ..PhysicsConfig::default() };
        let params = cfg.params();
        assert!((params.max_frame_dt - 1.0 / 30.0).abs() < 1e-6);
        assert!((params.precision_dt - 1.0 / 120.0).abs() < 1e-6);
        assert_eq!(params.max_substeps, 1);
    }
}
