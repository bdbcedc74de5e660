use glam::{Vec2, Vec3};
use vortex_lab::camera3d::{Viewport, DROP_HEIGHT};
use vortex_lab::config::AppConfig;
use vortex_lab::engine::EngineMode;
use vortex_lab::{ActionResult, Editor, EditorAction};

fn quiet_editor() -> Editor {
    let mut config = AppConfig::default();
    config.simulation.bulk_count = 0;
    config.simulation.cloth_enabled = false;
    Editor::new(config)
}

fn viewport_center(editor: &Editor) -> Vec2 {
    let viewport = editor.viewport();
    Vec2::new(viewport.width as f32 / 2.0, viewport.height as f32 / 2.0)
}

#[test]
fn drop_at_viewport_center_lands_on_camera_target() {
    let mut editor = quiet_editor();
    assert_eq!(editor.dispatch(EditorAction::StartAssetDrag { asset_id: "m_torus".into() }), ActionResult::Applied);
    let result = editor.dispatch(EditorAction::DropAsset { screen: viewport_center(&editor) });
    let ActionResult::Spawned(id) = result else {
        panic!("drop should spawn, got {result:?}");
    };
    let object = editor.object(id).expect("dropped object");
    assert!(object.position.distance(Vec3::new(0.0, DROP_HEIGHT, 0.0)) < 1e-3, "got {:?}", object.position);
    assert_eq!(object.asset_id, "m_torus");
    assert_eq!(editor.selected(), Some(id));
    assert!(editor.state().dragged_asset.is_none());
}

#[test]
fn drop_above_horizon_or_without_drag_is_ignored() {
    let mut editor = quiet_editor();
    assert!(editor.dispatch(EditorAction::DropAsset { screen: viewport_center(&editor) }).is_ignored());

    editor.dispatch(EditorAction::StartAssetDrag { asset_id: "m_sphere".into() });
    let sky = Vec2::new(editor.viewport().width as f32 / 2.0, 1.0);
    assert!(editor.dispatch(EditorAction::DropAsset { screen: sky }).is_ignored());
    assert!(editor.state().dragged_asset.is_none(), "a missed drop still ends the drag");
    assert!(editor.store().is_empty());
}

#[test]
fn only_meshes_and_lights_can_be_dragged() {
    let mut editor = quiet_editor();
    assert!(editor.dispatch(EditorAction::StartAssetDrag { asset_id: "mat_gold".into() }).is_ignored());
    assert!(editor.dispatch(EditorAction::StartAssetDrag { asset_id: "phys_heavy".into() }).is_ignored());
    assert!(editor.dispatch(EditorAction::StartAssetDrag { asset_id: "nope".into() }).is_ignored());
    assert_eq!(editor.dispatch(EditorAction::StartAssetDrag { asset_id: "l_spot".into() }), ActionResult::Applied);
    assert_eq!(editor.dispatch(EditorAction::CancelAssetDrag), ActionResult::Applied);
    assert!(editor.dispatch(EditorAction::CancelAssetDrag).is_ignored());
}

#[test]
fn drag_is_rejected_in_play_and_dropped_on_mode_change() {
    let mut editor = quiet_editor();
    editor.dispatch(EditorAction::StartAssetDrag { asset_id: "m_cube".into() });
    editor.dispatch(EditorAction::SetMode { mode: EngineMode::Play });
    assert!(editor.state().dragged_asset.is_none());
    assert!(editor.dispatch(EditorAction::StartAssetDrag { asset_id: "m_cube".into() }).is_ignored());
    assert!(editor.dispatch(EditorAction::DropAsset { screen: viewport_center(&editor) }).is_ignored());
}

#[test]
fn resized_viewport_moves_the_drop_point() {
    let mut editor = quiet_editor();
    editor.dispatch(EditorAction::ResizeViewport { viewport: Viewport::new(800, 800) });
    editor.dispatch(EditorAction::StartAssetDrag { asset_id: "m_rock".into() });
    let ActionResult::Spawned(id) = editor.dispatch(EditorAction::DropAsset { screen: Vec2::new(400.0, 400.0) })
    else {
        panic!("drop at the new center should spawn");
    };
    let position = editor.object(id).expect("rock").position;
    assert!(position.distance(Vec3::new(0.0, DROP_HEIGHT, 0.0)) < 1e-3);
}

#[test]
fn materials_assign_to_the_selection() {
    let mut editor = quiet_editor();
    assert!(editor.dispatch(EditorAction::AssignAsset { asset_id: "mat_gold".into() }).is_ignored());
    let ActionResult::Spawned(id) =
        editor.dispatch(EditorAction::SpawnAsset { asset_id: "m_cube".into(), position: Vec3::ZERO })
    else {
        panic!("cube should spawn");
    };
    assert_eq!(editor.dispatch(EditorAction::AssignAsset { asset_id: "mat_gold".into() }), ActionResult::Applied);
    assert_eq!(editor.dispatch(EditorAction::AssignAsset { asset_id: "phys_bouncy".into() }), ActionResult::Applied);
    assert!(editor.dispatch(EditorAction::AssignAsset { asset_id: "m_sphere".into() }).is_ignored());
    let object = editor.object(id).expect("cube");
    assert_eq!(object.material_id, "mat_gold");
    assert_eq!(object.physics_id.as_deref(), Some("phys_bouncy"));
}
