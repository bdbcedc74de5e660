use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MATERIAL_ID: &str = "mat_default";
pub const DEFAULT_PHYSICS_ID: &str = "phys_wood";
pub const VOID_MATERIAL_ID: &str = "mat_void";
pub const MAGMA_MATERIAL_ID: &str = "mat_magma";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` / `rrggbb`. Anything else yields `None`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        let (r, g, b) = (channel(0..2)?, channel(2..4)?, channel(4..6)?);
        Some(Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0))
    }

    pub fn hex_or(hex: &str, fallback: Rgb) -> Self {
        Self::from_hex(hex).unwrap_or(fallback)
    }

    pub fn to_hex(self) -> String {
        let byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", byte(self.r), byte(self.g), byte(self.b))
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_hsl(self) -> Hsl {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let l = (max + min) * 0.5;
        if (max - min).abs() <= f32::EPSILON {
            return Hsl { h: 0.0, s: 0.0, l };
        }
        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == self.r {
            (self.g - self.b) / d + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / d + 2.0
        } else {
            (self.r - self.g) / d + 4.0
        };
        Hsl { h: h / 6.0, s, l }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Hue, saturation and lightness, each in `[0, 1]`. Hue wraps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(1.0);
        if self.s <= f32::EPSILON {
            return Rgb::new(self.l, self.l, self.l);
        }
        let q = if self.l < 0.5 { self.l * (1.0 + self.s) } else { self.l + self.s - self.l * self.s };
        let p = 2.0 * self.l - q;
        Rgb::new(hue_to_channel(p, q, h + 1.0 / 3.0), hue_to_channel(p, q, h), hue_to_channel(p, q, h - 1.0 / 3.0))
    }
}

fn hue_to_channel(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Mesh,
    Material,
    Physics,
    Light,
}

impl AssetKind {
    pub const ALL: [AssetKind; 4] = [AssetKind::Mesh, AssetKind::Material, AssetKind::Physics, AssetKind::Light];

    pub fn label(self) -> &'static str {
        match self {
            AssetKind::Mesh => "Meshes",
            AssetKind::Material => "Materials",
            AssetKind::Physics => "Physics",
            AssetKind::Light => "Lights",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeType {
    Cube,
    Sphere,
    Rock,
    Torus,
    Cylinder,
}

/// Collision primitive used for a placed mesh. Scale never reaches the collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
    Cylinder { half_height: f32, radius: f32 },
}

impl ShapeType {
    pub fn collider(self) -> ColliderShape {
        match self {
            ShapeType::Sphere => ColliderShape::Ball { radius: 0.6 },
            ShapeType::Cube => ColliderShape::Cuboid { half_extents: Vec3::splat(0.5) },
            ShapeType::Cylinder => ColliderShape::Cylinder { half_height: 0.5, radius: 0.5 },
            ShapeType::Rock => ColliderShape::Ball { radius: 0.7 },
            ShapeType::Torus => ColliderShape::Ball { radius: 0.5 },
        }
    }

    /// Radius of a sphere enclosing the unscaled visual mesh, used for picking.
    pub fn bounding_radius(self) -> f32 {
        match self {
            ShapeType::Cube => 0.87,
            ShapeType::Sphere => 0.6,
            ShapeType::Rock => 0.7,
            ShapeType::Torus => 0.7,
            ShapeType::Cylinder => 0.71,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightType {
    Point,
    Spot,
    Directional,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MeshAsset {
    pub id: &'static str,
    pub name: &'static str,
    pub shape: ShapeType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialAsset {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: Option<&'static str>,
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub transparent: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsAsset {
    pub id: &'static str,
    pub name: &'static str,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LightAsset {
    pub id: &'static str,
    pub name: &'static str,
    pub light_type: LightType,
    pub color: &'static str,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Asset {
    Mesh(&'static MeshAsset),
    Material(&'static MaterialAsset),
    Physics(&'static PhysicsAsset),
    Light(&'static LightAsset),
}

impl Asset {
    pub fn id(&self) -> &'static str {
        match self {
            Asset::Mesh(a) => a.id,
            Asset::Material(a) => a.id,
            Asset::Physics(a) => a.id,
            Asset::Light(a) => a.id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Asset::Mesh(a) => a.name,
            Asset::Material(a) => a.name,
            Asset::Physics(a) => a.name,
            Asset::Light(a) => a.name,
        }
    }

    pub fn kind(&self) -> AssetKind {
        match self {
            Asset::Mesh(_) => AssetKind::Mesh,
            Asset::Material(_) => AssetKind::Material,
            Asset::Physics(_) => AssetKind::Physics,
            Asset::Light(_) => AssetKind::Light,
        }
    }

    /// Only meshes and lights can be dropped into the viewport.
    pub fn is_placeable(&self) -> bool {
        matches!(self, Asset::Mesh(_) | Asset::Light(_))
    }
}

const fn material(
    id: &'static str,
    name: &'static str,
    color: &'static str,
    roughness: f32,
    metalness: f32,
) -> MaterialAsset {
    MaterialAsset {
        id,
        name,
        color,
        roughness,
        metalness,
        emissive: None,
        emissive_intensity: 0.0,
        opacity: 1.0,
        transparent: false,
    }
}

pub static MESH_ASSETS: [MeshAsset; 5] = [
    MeshAsset { id: "m_cube", name: "Cube", shape: ShapeType::Cube },
    MeshAsset { id: "m_sphere", name: "Sphere", shape: ShapeType::Sphere },
    MeshAsset { id: "m_rock", name: "Rough Rock", shape: ShapeType::Rock },
    MeshAsset { id: "m_torus", name: "Torus", shape: ShapeType::Torus },
    MeshAsset { id: "m_cylinder", name: "Cylinder", shape: ShapeType::Cylinder },
];

pub static LIGHT_ASSETS: [LightAsset; 3] = [
    LightAsset { id: "l_point", name: "Point Light", light_type: LightType::Point, color: "#ffffff", intensity: 10.0 },
    LightAsset { id: "l_spot", name: "Spot Light", light_type: LightType::Spot, color: "#ffffff", intensity: 20.0 },
    LightAsset {
        id: "l_dir",
        name: "Directional",
        light_type: LightType::Directional,
        color: "#ffffff",
        intensity: 1.0,
    },
];

pub static MATERIAL_ASSETS: [MaterialAsset; 7] = [
    material(DEFAULT_MATERIAL_ID, "Standard Grey", "#888888", 0.5, 0.1),
    material("mat_gold", "Polished Gold", "#ffcc00", 0.1, 1.0),
    MaterialAsset { opacity: 0.6, transparent: true, ..material("mat_ice", "Clear Ice", "#aaddff", 0.05, 0.1) },
    MaterialAsset {
        emissive: Some("#ff2200"),
        emissive_intensity: 2.0,
        ..material(MAGMA_MATERIAL_ID, "Glow Magma", "#ff4400", 0.9, 0.0)
    },
    material("mat_obsidian", "Obsidian", "#111111", 0.2, 0.8),
    material("mat_rubber", "Red Rubber", "#ff0055", 0.8, 0.0),
    MaterialAsset { opacity: 0.8, transparent: true, ..material(VOID_MATERIAL_ID, "Void Matter", "#000000", 0.0, 0.0) },
];

pub static PHYSICS_ASSETS: [PhysicsAsset; 4] = [
    PhysicsAsset { id: "phys_heavy", name: "High Mass", density: 10.0, friction: 0.8, restitution: 0.1 },
    PhysicsAsset { id: "phys_bouncy", name: "Super Bouncy", density: 1.0, friction: 0.2, restitution: 0.95 },
    PhysicsAsset { id: "phys_ice", name: "No Friction", density: 1.0, friction: 0.01, restitution: 0.05 },
    PhysicsAsset { id: DEFAULT_PHYSICS_ID, name: "Standard Wood", density: 0.7, friction: 0.6, restitution: 0.3 },
];

pub fn all_assets() -> impl Iterator<Item = Asset> {
    MESH_ASSETS
        .iter()
        .map(Asset::Mesh)
        .chain(MATERIAL_ASSETS.iter().map(Asset::Material))
        .chain(PHYSICS_ASSETS.iter().map(Asset::Physics))
        .chain(LIGHT_ASSETS.iter().map(Asset::Light))
}

pub fn assets_of_kind(kind: AssetKind) -> impl Iterator<Item = Asset> {
    all_assets().filter(move |asset| asset.kind() == kind)
}

pub fn find_asset(id: &str) -> Option<Asset> {
    all_assets().find(|asset| asset.id() == id)
}

pub fn mesh_asset(id: &str) -> Option<&'static MeshAsset> {
    MESH_ASSETS.iter().find(|asset| asset.id == id)
}

pub fn light_asset(id: &str) -> Option<&'static LightAsset> {
    LIGHT_ASSETS.iter().find(|asset| asset.id == id)
}

pub fn physics_asset(id: &str) -> Option<&'static PhysicsAsset> {
    PHYSICS_ASSETS.iter().find(|asset| asset.id == id)
}

pub fn material_asset_or_default(id: &str) -> &'static MaterialAsset {
    MATERIAL_ASSETS.iter().find(|asset| asset.id == id).unwrap_or(&MATERIAL_ASSETS[0])
}

/// How a placed object is drawn. Derived once per object from its asset type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visual {
    Mesh { shape: ShapeType, material: &'static MaterialAsset },
    Light { light: &'static LightAsset, color: Rgb, intensity: f32 },
}

pub fn resolve_visual(asset_id: &str, material_id: &str, color: Option<Rgb>, intensity: Option<f32>) -> Visual {
    if let Some(light) = light_asset(asset_id) {
        return Visual::Light {
            light,
            color: color.unwrap_or_else(|| Rgb::hex_or(light.color, Rgb::WHITE)),
            intensity: intensity.unwrap_or(light.intensity),
        };
    }
    let shape = mesh_asset(asset_id).map(|mesh| mesh.shape).unwrap_or(ShapeType::Cube);
    Visual::Mesh { shape, material: material_asset_or_default(material_id) }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualProfile {
    pub color: &'static str,
    pub roughness: f32,
    pub metalness: f32,
    pub emissive: Option<&'static str>,
    pub emissive_intensity: f32,
    pub opacity: f32,
    pub color_variance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsProfile {
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulkMaterialProfile {
    pub visual: VisualProfile,
    pub physics: PhysicsProfile,
}

/// Material used by the instanced debris layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkMaterial {
    #[default]
    Default,
    Gold,
    Ice,
    Magma,
    Obsidian,
    Rubber,
    Void,
    Wood,
    Heavy,
    Bouncy,
    Rock,
    Metal,
}

const fn visual(color: &'static str, roughness: f32, metalness: f32, color_variance: f32) -> VisualProfile {
    VisualProfile { color, roughness, metalness, emissive: None, emissive_intensity: 0.0, opacity: 1.0, color_variance }
}

const fn physics(density: f32, friction: f32, restitution: f32) -> PhysicsProfile {
    PhysicsProfile { density, friction, restitution }
}

impl BulkMaterial {
    pub const ALL: [BulkMaterial; 12] = [
        BulkMaterial::Default,
        BulkMaterial::Gold,
        BulkMaterial::Ice,
        BulkMaterial::Magma,
        BulkMaterial::Obsidian,
        BulkMaterial::Rubber,
        BulkMaterial::Void,
        BulkMaterial::Wood,
        BulkMaterial::Heavy,
        BulkMaterial::Bouncy,
        BulkMaterial::Rock,
        BulkMaterial::Metal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BulkMaterial::Default => "default",
            BulkMaterial::Gold => "gold",
            BulkMaterial::Ice => "ice",
            BulkMaterial::Magma => "magma",
            BulkMaterial::Obsidian => "obsidian",
            BulkMaterial::Rubber => "rubber",
            BulkMaterial::Void => "void",
            BulkMaterial::Wood => "wood",
            BulkMaterial::Heavy => "heavy",
            BulkMaterial::Bouncy => "bouncy",
            BulkMaterial::Rock => "rock",
            BulkMaterial::Metal => "metal",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let lowered = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|material| material.name() == lowered)
    }

    /// Unknown names resolve to the default material.
    pub fn from_name(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            eprintln!("[catalog] unknown bulk material '{name}', using default");
            BulkMaterial::Default
        })
    }

    pub fn profile(self) -> BulkMaterialProfile {
        let (visual, physics) = match self {
            BulkMaterial::Default => (visual("#888888", 0.5, 0.1, 0.1), physics(1.0, 0.5, 0.5)),
            BulkMaterial::Gold => (visual("#ffcc00", 0.1, 1.0, 0.05), physics(19.3, 0.2, 0.1)),
            BulkMaterial::Ice => {
                (VisualProfile { opacity: 0.6, ..visual("#aaddff", 0.05, 0.1, 0.1) }, physics(0.9, 0.01, 0.05))
            }
            BulkMaterial::Magma => (
                VisualProfile {
                    emissive: Some("#ff2200"),
                    emissive_intensity: 2.0,
                    ..visual("#ff4400", 0.9, 0.0, 0.2)
                },
                physics(3.0, 0.8, 0.1),
            ),
            BulkMaterial::Obsidian => (visual("#111111", 0.2, 0.8, 0.05), physics(2.6, 0.4, 0.1)),
            BulkMaterial::Rubber => (visual("#ff0055", 0.8, 0.0, 0.1), physics(1.1, 0.9, 0.8)),
            BulkMaterial::Void => {
                (VisualProfile { opacity: 0.8, ..visual("#000000", 0.0, 0.0, 0.0) }, physics(100.0, 1.0, 0.0))
            }
            BulkMaterial::Wood => (visual("#8b4513", 0.8, 0.0, 0.15), physics(0.7, 0.6, 0.3)),
            BulkMaterial::Heavy => (visual("#444444", 0.5, 0.5, 0.1), physics(10.0, 0.8, 0.1)),
            BulkMaterial::Bouncy => (visual("#00ff00", 0.5, 0.1, 0.1), physics(1.0, 0.2, 0.95)),
            BulkMaterial::Rock => (visual("#6f6358", 0.9, 0.0, 0.15), physics(2.5, 0.7, 0.2)),
            BulkMaterial::Metal => (visual("#9aa4ad", 0.3, 0.9, 0.05), physics(7.8, 0.4, 0.15)),
        };
        BulkMaterialProfile { visual, physics }
    }
}

impl fmt::Display for BulkMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_ids_are_unique() {
        let ids: Vec<&str> = all_assets().map(|asset| asset.id()).collect();
        for (index, id) in ids.iter().enumerate() {
            assert!(!ids[index + 1..].contains(id), "duplicate asset id {id}");
        }
    }

    #[test]
    fn unknown_material_falls_back_to_default() {
        assert_eq!(material_asset_or_default("mat_missing").id, DEFAULT_MATERIAL_ID);
        assert_eq!(BulkMaterial::from_name("plasma"), BulkMaterial::Default);
        assert_eq!(BulkMaterial::from_name(" Rock "), BulkMaterial::Rock);
    }

    #[test]
    fn hex_and_hsl_conversions_agree() {
        let color = Rgb::from_hex("#ff4400").expect("valid hex");
        assert_eq!(color.to_hex(), "#ff4400");
        let back = color.to_hsl().to_rgb();
        assert!((back.r - color.r).abs() < 1e-4);
        assert!((back.g - color.g).abs() < 1e-4);
        assert!((back.b - color.b).abs() < 1e-4);
        assert!(Rgb::from_hex("#12345").is_none());
    }

    #[test]
    fn light_visual_prefers_object_overrides() {
        let visual = resolve_visual("l_point", DEFAULT_MATERIAL_ID, Some(Rgb::BLACK), None);
        match visual {
            Visual::Light { color, intensity, .. } => {
                assert_eq!(color, Rgb::BLACK);
                assert_eq!(intensity, 10.0);
            }
            Visual::Mesh { .. } => panic!("light asset resolved to a mesh"),
        }
    }
}
