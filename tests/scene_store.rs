use glam::Vec3;
use vortex_lab::catalog::{find_asset, DEFAULT_MATERIAL_ID, DEFAULT_PHYSICS_ID};
use vortex_lab::config::AppConfig;
use vortex_lab::engine::EngineMode;
use vortex_lab::scene::{SceneObject, SceneObjectId, SceneObjectPatch, SceneStore};
use vortex_lab::{ActionResult, Editor, EditorAction};

fn quiet_editor() -> Editor {
    let mut config = AppConfig::default();
    config.simulation.bulk_count = 0;
    config.simulation.cloth_enabled = false;
    Editor::new(config)
}

fn spawn(editor: &mut Editor, asset_id: &str, position: Vec3) -> SceneObjectId {
    match editor.dispatch(EditorAction::SpawnAsset { asset_id: asset_id.to_string(), position }) {
        ActionResult::Spawned(id) => id,
        other => panic!("expected {asset_id} to spawn, got {other:?}"),
    }
}

#[test]
fn spawned_objects_take_catalog_defaults() {
    let mut store = SceneStore::new();
    let cube = find_asset("m_cube").expect("cube asset");
    let light = find_asset("l_point").expect("point light asset");
    let cube_id = store.spawn(&cube, Vec3::new(1.0, 0.5, 2.0));
    let light_id = store.spawn(&light, Vec3::ZERO);

    let object = store.get(cube_id).expect("cube stored");
    assert_eq!(object.name, "Cube_0");
    assert_eq!(object.material_id, DEFAULT_MATERIAL_ID);
    assert_eq!(object.physics_id.as_deref(), Some(DEFAULT_PHYSICS_ID));
    assert_eq!(object.rotation, Vec3::ZERO);
    assert_eq!(object.scale, Vec3::ONE);
    assert!(object.intensity.is_none());

    let light = store.get(light_id).expect("light stored");
    assert_eq!(light.name, "Point Light_1");
    assert!(light.physics_id.is_none());
    assert_eq!(light.intensity, Some(10.0));
}

#[test]
fn updates_merge_and_ignore_unknown_ids() {
    let mut store = SceneStore::new();
    let id = store.spawn(&find_asset("m_sphere").expect("sphere asset"), Vec3::ZERO);
    let patch = SceneObjectPatch { name: Some("Ball".into()), ..SceneObjectPatch::position(Vec3::Y) };
    assert!(store.update(id, &patch));
    let object = store.get(id).expect("sphere stored");
    assert_eq!(object.name, "Ball");
    assert_eq!(object.position, Vec3::Y);
    assert_eq!(object.scale, Vec3::ONE, "untouched fields survive");

    let before: Vec<SceneObject> = store.iter().cloned().collect();
    assert!(!store.update(SceneObjectId::new(), &patch));
    assert!(!store.delete(SceneObjectId::new()));
    let after: Vec<SceneObject> = store.iter().cloned().collect();
    assert_eq!(before, after);
}

#[test]
fn insert_refuses_duplicates() {
    let mut store = SceneStore::new();
    let object = SceneObject::from_asset(&find_asset("m_rock").expect("rock asset"), Vec3::ZERO, 0);
    assert!(store.insert(object.clone()));
    assert!(!store.insert(object));
    assert_eq!(store.len(), 1);
}

#[test]
fn editor_clear_resets_store_selection_and_actors() {
    let mut editor = quiet_editor();
    spawn(&mut editor, "m_cube", Vec3::new(0.0, 0.5, 0.0));
    spawn(&mut editor, "l_spot", Vec3::new(2.0, 3.0, 0.0));
    assert_eq!(editor.ecs().actor_count(), 2);
    assert!(editor.selected().is_some());

    assert_eq!(editor.dispatch(EditorAction::ClearScene), ActionResult::Applied);
    assert!(editor.store().is_empty());
    assert_eq!(editor.ecs().actor_count(), 0);
    assert_eq!(editor.selected(), None);
    assert!(editor.warnings().is_empty());
}

#[test]
fn deleting_removes_the_body() {
    let mut editor = quiet_editor();
    let id = spawn(&mut editor, "m_cylinder", Vec3::new(0.0, 0.5, 0.0));
    let bodies_before = editor.ecs().rapier().body_count();
    assert_eq!(editor.dispatch(EditorAction::DeleteObject { id }), ActionResult::Applied);
    assert!(editor.ecs().actor_entity(id).is_none());
    assert_eq!(editor.ecs().rapier().body_count(), bodies_before - 1);
}

#[test]
fn lights_get_a_body_without_collider() {
    let mut editor = quiet_editor();
    let light = spawn(&mut editor, "l_dir", Vec3::new(0.0, 8.0, 0.0));
    let cube = spawn(&mut editor, "m_cube", Vec3::new(0.0, 0.5, 0.0));
    let rapier = editor.ecs().rapier();
    let light_body = editor.ecs().actor_body(light).expect("light body");
    let cube_body = editor.ecs().actor_body(cube).expect("cube body");
    assert!(rapier.colliders_of(light_body.handle).is_empty());
    assert_eq!(rapier.colliders_of(cube_body.handle).len(), 1);
}

#[test]
fn non_finite_transform_edits_never_reach_the_body() {
    let mut editor = quiet_editor();
    let id = spawn(&mut editor, "m_cube", Vec3::new(0.0, 0.5, 0.0));
    let patch = SceneObjectPatch {
        scale: Some(Vec3::new(f32::NAN, 1.0, 1.0)),
        ..SceneObjectPatch::position(Vec3::new(f32::NAN, 1.0, 0.0))
    };
    assert_eq!(editor.dispatch(EditorAction::UpdateObject { id, patch }), ActionResult::Applied);
    let object = editor.object(id).expect("cube stored");
    assert_eq!(object.position, Vec3::new(0.0, 1.0, 0.0));
    assert_eq!(object.scale, Vec3::ONE);

    editor.dispatch(EditorAction::SetMode { mode: EngineMode::Simulate });
    for _ in 0..30 {
        editor.frame(1.0 / 60.0);
    }
    let pose = editor.ecs().actor_pose(id).expect("body pose");
    assert!(pose.translation.is_finite(), "body pose stays finite, got {:?}", pose.translation);
    assert!(pose.rotation.is_finite());
}
