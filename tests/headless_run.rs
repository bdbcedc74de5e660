use std::fs;
use tempfile::tempdir;
use vortex_lab::cli::CliOverrides;
use vortex_lab::engine::EngineMode;
use vortex_lab::run_with_overrides;

#[test]
fn headless_session_drops_demo_assets_and_simulates() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("lab.json");
    fs::write(&path, r#"{ "simulation": { "cloth_enabled": false, "bulk_count": 200 } }"#).expect("write config");
    let path = path.to_string_lossy().into_owned();

    let cli = CliOverrides::parse(["vortex_lab", "--config", &path, "--frames", "30", "--bulk-count", "12"])
        .expect("valid flags");
    let summary = run_with_overrides(cli).expect("run succeeds");

    assert_eq!(summary.frames, 30);
    assert!((summary.simulated_secs - 0.5).abs() < 1e-3);
    assert_eq!(summary.status.mode, EngineMode::Simulate);
    assert_eq!(summary.status.bulk_instances, 12, "cli override wins over the file");
    assert_eq!(summary.actors.len(), 4);
    assert!(summary.actors.iter().any(|(name, _)| name.starts_with("Cube_")));
    let printed = summary.to_string();
    assert!(printed.starts_with("30 frames"));
    assert!(printed.contains("instances: 12"));
}

#[test]
fn missing_config_file_falls_back_to_defaults() {
    let dir = tempdir().expect("temp dir");
    let path = dir.path().join("absent.json").to_string_lossy().into_owned();
    let cli = CliOverrides::parse(["vortex_lab", "--config", &path, "--frames", "1", "--bulk-count", "0"])
        .expect("valid flags");
    let summary = run_with_overrides(cli).expect("run succeeds");
    assert_eq!(summary.frames, 1);
    assert_eq!(summary.status.bulk_instances, 0);
}
