//! Instanced debris: seeded pose generation, per-instance color variation and the GPU batch layout.

use crate::catalog::{BulkMaterial, BulkMaterialProfile, Hsl, Rgb};
use bevy_ecs::prelude::Resource;
use bytemuck::{Pod, Zeroable};
use glam::{EulerRot, Mat4, Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::f32::consts::PI;

#[derive(Debug, Clone, Deserialize)]
pub struct BulkConfig {
    #[serde(default = "BulkConfig::default_volume_min")]
    pub volume_min: [f32; 3],
    #[serde(default = "BulkConfig::default_volume_max")]
    pub volume_max: [f32; 3],
    #[serde(default = "BulkConfig::default_scale_min")]
    pub scale_min: f32,
    #[serde(default = "BulkConfig::default_scale_max")]
    pub scale_max: f32,
    #[serde(default = "BulkConfig::default_seed")]
    pub seed: u64,
}

impl BulkConfig {
    const fn default_volume_min() -> [f32; 3] {
        [-20.0, 10.0, -20.0]
    }

    const fn default_volume_max() -> [f32; 3] {
        [20.0, 50.0, 20.0]
    }

    const fn default_scale_min() -> f32 {
        0.4
    }

    const fn default_scale_max() -> f32 {
        1.2
    }

    const fn default_seed() -> u64 {
        0x5eed_1e55
    }

    pub fn volume(&self) -> (Vec3, Vec3) {
        let a = Vec3::from_array(self.volume_min);
        let b = Vec3::from_array(self.volume_max);
        (a.min(b), a.max(b))
    }

    pub fn scale_range(&self) -> (f32, f32) {
        let lo = self.scale_min.min(self.scale_max).max(0.01);
        (lo, self.scale_max.max(lo))
    }
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            volume_min: Self::default_volume_min(),
            volume_max: Self::default_volume_max(),
            scale_min: Self::default_scale_min(),
            scale_max: Self::default_scale_max(),
            seed: Self::default_seed(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstancePose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl InstancePose {
    /// Ball collider enclosing the unit debris mesh after scaling.
    pub fn collider_radius(&self) -> f32 {
        self.scale.max_element()
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

fn sample_range(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

pub fn generate_poses(count: usize, config: &BulkConfig, rng: &mut impl Rng) -> Vec<InstancePose> {
    let (min, max) = config.volume();
    let (scale_lo, scale_hi) = config.scale_range();
    (0..count)
        .map(|_| {
            let translation = Vec3::new(
                sample_range(rng, min.x, max.x),
                sample_range(rng, min.y, max.y),
                sample_range(rng, min.z, max.z),
            );
            let rotation = Quat::from_euler(
                EulerRot::XYZ,
                rng.gen_range(0.0..PI),
                rng.gen_range(0.0..PI),
                rng.gen_range(0.0..PI),
            );
            let scale = Vec3::new(
                sample_range(rng, scale_lo, scale_hi),
                sample_range(rng, scale_lo, scale_hi),
                sample_range(rng, scale_lo, scale_hi),
            );
            InstancePose { translation, rotation, scale }
        })
        .collect()
}

/// Jitters `base` in HSL space: hue by `variance / 4`, saturation and lightness by `variance / 2`.
pub fn vary_color(base: Rgb, variance: f32, rng: &mut impl Rng) -> Rgb {
    let hsl = base.to_hsl();
    let h = hsl.h + (rng.gen::<f32>() - 0.5) * variance * 0.5;
    let s = hsl.s + (rng.gen::<f32>() - 0.5) * variance;
    let l = hsl.l + (rng.gen::<f32>() - 0.5) * variance;
    Hsl { h, s: s.clamp(0.0, 1.0), l: l.clamp(0.0, 1.0) }.to_rgb()
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

impl InstanceData {
    pub fn new(model: Mat4, color: Rgb, opacity: f32) -> Self {
        let [r, g, b] = color.to_array();
        Self { model: model.to_cols_array_2d(), color: [r, g, b, opacity] }
    }

    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.model[3][0], self.model[3][1], self.model[3][2])
    }
}

/// All debris instances of one material, drawn with a single instanced call.
#[derive(Resource, Debug, Clone)]
pub struct InstanceBatch {
    material: BulkMaterial,
    instances: Vec<InstanceData>,
}

impl InstanceBatch {
    pub fn new(material: BulkMaterial) -> Self {
        Self { material, instances: Vec::new() }
    }

    pub fn material(&self) -> BulkMaterial {
        self.material
    }

    pub fn instances(&self) -> &[InstanceData] {
        &self.instances
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn push(&mut self, data: InstanceData) {
        self.instances.push(data);
    }

    pub fn set_model(&mut self, index: usize, model: Mat4) -> bool {
        match self.instances.get_mut(index) {
            Some(instance) => {
                instance.model = model.to_cols_array_2d();
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }
}

/// Everything needed to (re)build the debris layer for one count / material pair.
#[derive(Debug, Clone)]
pub struct BulkPlan {
    pub material: BulkMaterial,
    pub profile: BulkMaterialProfile,
    pub poses: Vec<InstancePose>,
    pub colors: Vec<Rgb>,
}

impl BulkPlan {
    pub fn build(count: usize, material: BulkMaterial, config: &BulkConfig) -> Self {
        let profile = material.profile();
        let mut rng = StdRng::seed_from_u64(config.seed);
        let poses = generate_poses(count, config, &mut rng);
        let base = Rgb::hex_or(profile.visual.color, Rgb::WHITE);
        let colors = (0..count).map(|_| vary_color(base, profile.visual.color_variance, &mut rng)).collect();
        Self { material, profile, poses, colors }
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn batch(&self) -> InstanceBatch {
        let mut batch = InstanceBatch::new(self.material);
        for (pose, color) in self.poses.iter().zip(&self.colors) {
            batch.push(InstanceData::new(pose.matrix(), *color, self.profile.visual.opacity));
        }
        batch
    }
}
