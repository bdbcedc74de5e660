use crate::catalog::{Asset, Rgb, DEFAULT_MATERIAL_ID, DEFAULT_PHYSICS_ID};
use glam::Vec3;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SceneObjectId(Uuid);

impl SceneObjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SceneObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SceneObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub id: SceneObjectId,
    pub name: String,
    /// Mesh or light asset.
    pub asset_id: String,
    pub material_id: String,
    pub physics_id: Option<String>,
    pub position: Vec3,
    /// Euler angles in radians, XYZ order.
    pub rotation: Vec3,
    pub scale: Vec3,
    pub intensity: Option<f32>,
    pub color: Option<Rgb>,
}

impl SceneObject {
    /// Builds the object a spawn of `asset` produces. `ordinal` feeds the display name.
    pub fn from_asset(asset: &Asset, position: Vec3, ordinal: usize) -> Self {
        let material_id = match asset {
            Asset::Material(material) => material.id.to_string(),
            _ => DEFAULT_MATERIAL_ID.to_string(),
        };
        let physics_id = match asset {
            Asset::Mesh(_) => Some(DEFAULT_PHYSICS_ID.to_string()),
            _ => None,
        };
        let (intensity, color) = match asset {
            Asset::Light(light) => (Some(light.intensity), Some(Rgb::hex_or(light.color, Rgb::WHITE))),
            _ => (None, None),
        };
        Self {
            id: SceneObjectId::new(),
            name: format!("{}_{}", asset.name(), ordinal),
            asset_id: asset.id().to_string(),
            material_id,
            physics_id,
            position: finite_or(position, 0.0),
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            intensity,
            color,
        }
    }

    pub fn apply(&mut self, patch: &SceneObjectPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(material_id) = &patch.material_id {
            self.material_id = material_id.clone();
        }
        if let Some(physics_id) = &patch.physics_id {
            self.physics_id = physics_id.clone();
        }
        if let Some(position) = patch.position {
            self.position = finite_or(position, 0.0);
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = finite_or(rotation, 0.0);
        }
        if let Some(scale) = patch.scale {
            self.scale = finite_or(scale, 1.0);
        }
        if let Some(intensity) = patch.intensity {
            self.intensity = Some(if intensity.is_finite() { intensity } else { 0.0 });
        }
        if let Some(color) = patch.color {
            self.color = Some(color);
        }
    }
}

/// Non-finite components become `fallback`; the physics engine never sees NaN or infinity.
fn finite_or(value: Vec3, fallback: f32) -> Vec3 {
    Vec3::from_array(value.to_array().map(|component| if component.is_finite() { component } else { fallback }))
}

/// Partial update merged into a [`SceneObject`]. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneObjectPatch {
    pub name: Option<String>,
    pub material_id: Option<String>,
    pub physics_id: Option<Option<String>>,
    pub position: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub scale: Option<Vec3>,
    pub intensity: Option<f32>,
    pub color: Option<Rgb>,
}

impl SceneObjectPatch {
    pub fn transform(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self { position: Some(position), rotation: Some(rotation), scale: Some(scale), ..Default::default() }
    }

    pub fn position(position: Vec3) -> Self {
        Self { position: Some(position), ..Default::default() }
    }

    pub fn touches_transform(&self) -> bool {
        self.position.is_some() || self.rotation.is_some() || self.scale.is_some()
    }

    pub fn touches_body(&self) -> bool {
        self.material_id.is_some() || self.physics_id.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Ordered list of placed objects. Ids are unique; lookups on unknown ids are no-ops.
#[derive(Debug, Default)]
pub struct SceneStore {
    objects: Vec<SceneObject>,
}

impl SceneStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, asset: &Asset, position: Vec3) -> SceneObjectId {
        let object = SceneObject::from_asset(asset, position, self.objects.len());
        let id = object.id;
        self.objects.push(object);
        id
    }

    /// Inserts a prepared object. Returns `false` and leaves the store unchanged on a duplicate id.
    pub fn insert(&mut self, object: SceneObject) -> bool {
        if self.contains(object.id) {
            return false;
        }
        self.objects.push(object);
        true
    }

    pub fn update(&mut self, id: SceneObjectId, patch: &SceneObjectPatch) -> bool {
        match self.objects.iter_mut().find(|object| object.id == id) {
            Some(object) => {
                object.apply(patch);
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: SceneObjectId) -> bool {
        let before = self.objects.len();
        self.objects.retain(|object| object.id != id);
        self.objects.len() != before
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn get(&self, id: SceneObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn contains(&self, id: SceneObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    pub fn ids(&self) -> Vec<SceneObjectId> {
        self.objects.iter().map(|object| object.id).collect()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}
