use super::{ActionResult, Editor, EditorAction};
use crate::catalog::{
    light_asset, material_asset_or_default, physics_asset, MaterialAsset, PhysicsAsset, Rgb, PHYSICS_ASSETS,
};
use crate::scene::{SceneObjectId, SceneObjectPatch};
use glam::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct LightSection {
    pub intensity: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialSection {
    pub material: &'static MaterialAsset,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsSection {
    /// `None` when physics is disabled; the section then offers `options`.
    pub current: Option<&'static PhysicsAsset>,
    pub options: &'static [PhysicsAsset],
}

/// Inspector panel for the selected object. Lights get a light section; everything else gets
/// material and physics sections.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectorView {
    pub id: SceneObjectId,
    pub name: String,
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
    pub light: Option<LightSection>,
    pub material: Option<MaterialSection>,
    pub physics: Option<PhysicsSection>,
}

/// A single field edit in the inspector.
#[derive(Debug, Clone, PartialEq)]
pub enum InspectorEdit {
    Name(String),
    Position(Vec3),
    Rotation(Vec3),
    Scale(Vec3),
    Intensity(f32),
    Color(Rgb),
    EnablePhysics(String),
    DisablePhysics,
}

impl InspectorEdit {
    pub fn into_patch(self) -> SceneObjectPatch {
        let mut patch = SceneObjectPatch::default();
        match self {
            InspectorEdit::Name(name) => patch.name = Some(name),
            InspectorEdit::Position(position) => patch.position = Some(position),
            InspectorEdit::Rotation(rotation) => patch.rotation = Some(rotation),
            InspectorEdit::Scale(scale) => patch.scale = Some(scale),
            InspectorEdit::Intensity(intensity) => patch.intensity = Some(intensity),
            InspectorEdit::Color(color) => patch.color = Some(color),
            InspectorEdit::EnablePhysics(physics_id) => patch.physics_id = Some(Some(physics_id)),
            InspectorEdit::DisablePhysics => patch.physics_id = Some(None),
        }
        patch
    }
}

impl Editor {
    pub fn inspector(&self) -> Option<InspectorView> {
        let object = self.store.get(self.state.selected?)?;
        let light = light_asset(&object.asset_id).map(|asset| LightSection {
            intensity: object.intensity.unwrap_or(0.0),
            color: object.color.unwrap_or_else(|| Rgb::hex_or(asset.color, Rgb::WHITE)),
        });
        let (material, physics) = if light.is_some() {
            (None, None)
        } else {
            (
                Some(MaterialSection { material: material_asset_or_default(&object.material_id) }),
                Some(PhysicsSection {
                    current: object.physics_id.as_deref().and_then(physics_asset),
                    options: &PHYSICS_ASSETS,
                }),
            )
        };
        Some(InspectorView {
            id: object.id,
            name: object.name.clone(),
            position: object.position,
            rotation: object.rotation,
            scale: object.scale,
            light,
            material,
            physics,
        })
    }

    /// Applies an inspector edit to the selected object.
    pub fn edit_selected(&mut self, edit: InspectorEdit) -> ActionResult {
        let Some(id) = self.state.selected else {
            return ActionResult::Ignored;
        };
        if let InspectorEdit::EnablePhysics(physics_id) = &edit {
            if physics_asset(physics_id).is_none() {
                return ActionResult::Ignored;
            }
        }
        self.dispatch(EditorAction::UpdateObject { id, patch: edit.into_patch() })
    }
}
