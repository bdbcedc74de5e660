use glam::{Vec2, Vec3};
use vortex_lab::actor::BodyKind;
use vortex_lab::config::AppConfig;
use vortex_lab::engine::EngineMode;
use vortex_lab::scene::{SceneObjectId, SceneObjectPatch};
use vortex_lab::shooter::PARKED_POSITION;
use vortex_lab::{ActionResult, Editor, EditorAction};

const DT: f32 = 1.0 / 60.0;

fn quiet_editor() -> Editor {
    let mut config = AppConfig::default();
    config.simulation.bulk_count = 0;
    config.simulation.cloth_enabled = false;
    Editor::new(config)
}

fn spawn(editor: &mut Editor, asset_id: &str, position: Vec3) -> SceneObjectId {
    match editor.dispatch(EditorAction::SpawnAsset { asset_id: asset_id.into(), position }) {
        ActionResult::Spawned(id) => id,
        other => panic!("expected {asset_id} to spawn, got {other:?}"),
    }
}

fn height(editor: &Editor, id: SceneObjectId) -> f32 {
    editor.ecs().actor_pose(id).expect("body pose").translation.y
}

fn run(editor: &mut Editor, frames: usize) {
    for _ in 0..frames {
        editor.frame(DT);
    }
}

#[test]
fn editor_mode_holds_bodies_in_place() {
    let mut editor = quiet_editor();
    let id = spawn(&mut editor, "m_cube", Vec3::new(0.0, 5.0, 0.0));
    run(&mut editor, 60);
    assert!((height(&editor, id) - 5.0).abs() < 1e-4);
    assert_eq!(editor.ecs().actor_kind(id), Some(BodyKind::Kinematic));
}

#[test]
fn simulate_drops_and_editor_restores_stored_pose() {
    let mut editor = quiet_editor();
    let id = spawn(&mut editor, "m_cube", Vec3::new(0.0, 5.0, 0.0));
    assert_eq!(editor.dispatch(EditorAction::SetMode { mode: EngineMode::Simulate }), ActionResult::Applied);
    assert_eq!(editor.ecs().actor_kind(id), Some(BodyKind::Dynamic));
    run(&mut editor, 30);
    assert!(height(&editor, id) < 4.5, "cube should be falling, y = {}", height(&editor, id));
    assert_eq!(editor.object(id).map(|object| object.position.y), Some(5.0), "physics never writes the store");

    editor.dispatch(EditorAction::SetMode { mode: EngineMode::Editor });
    assert_eq!(editor.ecs().actor_kind(id), Some(BodyKind::Kinematic));
    assert!((height(&editor, id) - 5.0).abs() < 1e-4, "back to the stored pose");
    assert_eq!(editor.dispatch(EditorAction::SetMode { mode: EngineMode::Editor }), ActionResult::Ignored);
}

#[test]
fn lights_stay_fixed_while_simulating() {
    let mut editor = quiet_editor();
    let id = spawn(&mut editor, "l_point", Vec3::new(1.0, 4.0, 0.0));
    editor.dispatch(EditorAction::SetMode { mode: EngineMode::Simulate });
    run(&mut editor, 30);
    assert_eq!(editor.ecs().actor_kind(id), Some(BodyKind::Fixed));
    assert!((height(&editor, id) - 4.0).abs() < 1e-4);
}

#[test]
fn pause_freezes_and_resume_continues() {
    let mut editor = quiet_editor();
    let id = spawn(&mut editor, "m_sphere", Vec3::new(0.0, 8.0, 0.0));
    editor.dispatch(EditorAction::SetMode { mode: EngineMode::Simulate });
    run(&mut editor, 20);

    assert_eq!(editor.dispatch(EditorAction::SetPaused { paused: true }), ActionResult::Applied);
    assert_eq!(editor.dispatch(EditorAction::SetPaused { paused: true }), ActionResult::Ignored);
    assert!(editor.status().paused);
    let frozen = height(&editor, id);
    run(&mut editor, 30);
    assert!((height(&editor, id) - frozen).abs() < 1e-4, "paused body must not move");
    assert_eq!(editor.ecs().actor_kind(id), Some(BodyKind::Kinematic));

    assert_eq!(editor.dispatch(EditorAction::TogglePause), ActionResult::Applied);
    run(&mut editor, 20);
    assert!(height(&editor, id) < frozen, "resumed body falls from where it froze");
}

#[test]
fn running_edit_is_deferred_until_pause() {
    let mut editor = quiet_editor();
    let id = spawn(&mut editor, "m_cube", Vec3::new(0.0, 0.5, 0.0));
    editor.dispatch(EditorAction::SetMode { mode: EngineMode::Simulate });
    run(&mut editor, 10);

    let target = Vec3::new(4.0, 6.0, -2.0);
    let result = editor.dispatch(EditorAction::UpdateObject { id, patch: SceneObjectPatch::position(target) });
    assert_eq!(result, ActionResult::Deferred);
    assert_eq!(editor.object(id).map(|object| object.position), Some(target), "store takes the edit at once");
    assert!(editor.ecs().actor_sync(id).is_some_and(|sync| sync.has_deferred_edit()));
    run(&mut editor, 2);
    assert!(editor.ecs().actor_pose(id).expect("body pose").translation.distance(target) > 1.0);

    editor.dispatch(EditorAction::SetPaused { paused: true });
    let pose = editor.ecs().actor_pose(id).expect("body pose");
    assert!(pose.translation.distance(target) < 1e-4, "pause applies the deferred edit");
    assert!(editor.ecs().actor_sync(id).is_some_and(|sync| !sync.has_deferred_edit()));

    let nudged = target + Vec3::X;
    let result = editor.dispatch(EditorAction::UpdateObject { id, patch: SceneObjectPatch::position(nudged) });
    assert_eq!(result, ActionResult::Applied);
    run(&mut editor, 1);
    assert!(editor.ecs().actor_pose(id).expect("body pose").translation.distance(nudged) < 1e-4);
}

#[test]
fn shooting_only_in_play_and_parked_on_exit() {
    let mut editor = quiet_editor();
    let center = Vec2::new(editor.viewport().width as f32 / 2.0, editor.viewport().height as f32 / 2.0);
    assert!(editor.dispatch(EditorAction::Shoot { screen: center }).is_ignored());

    editor.dispatch(EditorAction::SetMode { mode: EngineMode::Play });
    assert_eq!(editor.dispatch(EditorAction::Shoot { screen: center }), ActionResult::Applied);
    assert_eq!(editor.dispatch(EditorAction::PointerDown { screen: center }), ActionResult::Applied);
    assert_eq!(editor.projectiles().active_count(), 2);
    run(&mut editor, 5);
    let handle = editor.ecs().projectile_body(0).expect("projectile body");
    let flying = editor.ecs().rapier().body_pose(handle).expect("pose").translation;
    assert!(flying.distance(PARKED_POSITION) > 10.0, "fired projectile left the parking spot");

    editor.dispatch(EditorAction::SetMode { mode: EngineMode::Simulate });
    assert_eq!(editor.projectiles().active_count(), 0);
    let body = editor.ecs().rapier().body(handle).expect("projectile body");
    assert!(!body.is_enabled());
    assert!(editor.ecs().rapier().body_pose(handle).expect("pose").translation.distance(PARKED_POSITION) < 1e-4);
}

#[test]
fn play_hides_selection_and_asset_tools() {
    let mut editor = quiet_editor();
    let id = spawn(&mut editor, "m_cube", Vec3::new(0.0, 0.5, 0.0));
    assert!(editor.ecs().actor_sync(id).and_then(|sync| sync.gizmo()).is_some());

    editor.dispatch(EditorAction::SetMode { mode: EngineMode::Play });
    assert_eq!(editor.selected(), None);
    assert!(editor.ecs().actor_sync(id).and_then(|sync| sync.gizmo()).is_none());
    assert!(editor.dispatch(EditorAction::Select { id: Some(id) }).is_ignored());
    assert!(editor.dispatch(EditorAction::StartAssetDrag { asset_id: "m_cube".into() }).is_ignored());
    assert!(editor
        .dispatch(EditorAction::SpawnAsset { asset_id: "m_cube".into(), position: Vec3::ZERO })
        .is_ignored());
    assert!(editor.asset_browser("").is_none());
}
