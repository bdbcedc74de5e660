use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
use serde::Deserialize;

const DEFAULT_UP: Vec3 = Vec3::Y;

/// Height at which viewport drops place new objects.
pub const DROP_HEIGHT: f32 = 0.5;

/// Viewport size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0 {
            self.width as f32 / self.height as f32
        } else {
            1.0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "CameraConfig::default_position")]
    pub position: [f32; 3],
    #[serde(default)]
    pub target: [f32; 3],
    #[serde(default = "CameraConfig::default_fov_degrees")]
    pub fov_degrees: f32,
    #[serde(default = "CameraConfig::default_viewport")]
    pub viewport: [u32; 2],
}

impl CameraConfig {
    const fn default_position() -> [f32; 3] {
        [20.0, 15.0, 20.0]
    }

    const fn default_fov_degrees() -> f32 {
        50.0
    }

    const fn default_viewport() -> [u32; 2] {
        [1280, 720]
    }

    pub fn camera(&self) -> Camera3D {
        Camera3D::new(
            Vec3::from_array(self.position),
            Vec3::from_array(self.target),
            self.fov_degrees.to_radians(),
            0.1,
            1000.0,
        )
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport[0], self.viewport[1])
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Self::default_position(),
            target: [0.0; 3],
            fov_degrees: Self::default_fov_degrees(),
            viewport: Self::default_viewport(),
        }
    }
}

/// Perspective camera looking at a target point.
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_radians: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera3D {
    pub fn new(position: Vec3, target: Vec3, fov_y_radians: f32, near: f32, far: f32) -> Self {
        Self { position, target, up: DEFAULT_UP, fov_y_radians, near, far }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_y_radians, aspect.max(0.0001), self.near, self.far)
    }

    pub fn view_projection(&self, viewport: Viewport) -> Mat4 {
        self.projection_matrix(viewport.aspect()) * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    /// Generates a world-space ray originating from the camera through a screen-space position.
    pub fn screen_ray(&self, screen: Vec2, viewport: Viewport) -> Option<(Vec3, Vec3)> {
        if viewport.is_empty() {
            return None;
        }
        let ndc_x = (2.0 * screen.x / viewport.width as f32) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen.y / viewport.height as f32);
        let clip = Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let inv_view_proj = self.view_projection(viewport).inverse();
        let world = inv_view_proj * clip;
        if world.w.abs() < f32::EPSILON {
            return None;
        }
        let world_pos = (world.truncate() / world.w) - self.position;
        let dir = world_pos.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        Some((self.position, dir))
    }

    pub fn project_point(&self, point: Vec3, viewport: Viewport) -> Option<Vec2> {
        if viewport.is_empty() {
            return None;
        }
        let clip = self.view_projection(viewport) * point.extend(1.0);
        if clip.w.abs() < f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        let x = (ndc.x + 1.0) * 0.5 * viewport.width as f32;
        let y = (1.0 - ndc.y) * 0.5 * viewport.height as f32;
        Some(Vec2::new(x, y))
    }

    /// Where a drop at `screen` lands: the ray's hit on the y = 0 ground, lifted to [`DROP_HEIGHT`].
    pub fn ground_drop_point(&self, screen: Vec2, viewport: Viewport) -> Option<Vec3> {
        let (origin, dir) = self.screen_ray(screen, viewport)?;
        if dir.y.abs() <= f32::EPSILON {
            return None;
        }
        let t = -origin.y / dir.y;
        if t <= 0.0 {
            return None;
        }
        let hit = origin + dir * t;
        Some(Vec3::new(hit.x, DROP_HEIGHT, hit.z))
    }
}

/// Orbit-style controller storing yaw/pitch around a target.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub radius: f32,
    pub yaw_radians: f32,
    pub pitch_radians: f32,
}

impl OrbitCamera {
    pub fn new(target: Vec3, radius: f32) -> Self {
        Self { target, radius: radius.max(0.01), yaw_radians: 0.0, pitch_radians: 0.0 }
    }

    /// Orbit state that reproduces `camera`'s current position.
    pub fn from_camera(camera: &Camera3D) -> Self {
        let offset = camera.position - camera.target;
        let radius = offset.length().max(0.01);
        let yaw_radians = offset.x.atan2(offset.z);
        let pitch_radians = -(offset.y / radius).clamp(-1.0, 1.0).asin();
        Self { target: camera.target, radius, yaw_radians, pitch_radians }
    }

    pub fn apply_to(&self, camera: &mut Camera3D) {
        let rotation = Quat::from_euler(glam::EulerRot::YXZ, self.yaw_radians, self.pitch_radians, 0.0);
        camera.position = self.target + rotation * Vec3::new(0.0, 0.0, self.radius);
        camera.target = self.target;
    }

    pub fn orbit(&mut self, delta: Vec2) {
        self.yaw_radians += delta.x;
        self.pitch_radians = (self.pitch_radians + delta.y)
            .clamp(-std::f32::consts::FRAC_PI_2 + 0.01, std::f32::consts::FRAC_PI_2 - 0.01);
    }

    pub fn zoom(&mut self, factor: f32) {
        self.radius = (self.radius * factor).clamp(0.1, 10_000.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera3d_view_projection_is_finite() {
        let camera = CameraConfig::default().camera();
        let vp = camera.view_projection(Viewport::new(1280, 720));
        assert!(!vp.to_cols_array().iter().any(|v| v.is_nan() || v.is_infinite()));
    }

    #[test]
    fn center_ray_hits_target_on_ground() {
        let camera = CameraConfig::default().camera();
        let viewport = Viewport::new(1280, 720);
        let drop = camera.ground_drop_point(viewport.center(), viewport).expect("center ray hits ground");
        assert!(drop.x.abs() < 1e-2 && drop.z.abs() < 1e-2, "got {drop:?}");
        assert_eq!(drop.y, DROP_HEIGHT);
    }

    #[test]
    fn ray_above_horizon_misses_ground() {
        let camera = CameraConfig::default().camera();
        let viewport = Viewport::new(1280, 720);
        assert!(camera.ground_drop_point(Vec2::new(640.0, 0.0), viewport).is_none());
        assert!(camera.screen_ray(Vec2::ZERO, Viewport::new(0, 0)).is_none());
    }

    #[test]
    fn projected_point_round_trips_through_screen_ray() {
        let camera = CameraConfig::default().camera();
        let viewport = Viewport::new(800, 600);
        let point = Vec3::new(2.0, 1.0, -3.0);
        let screen = camera.project_point(point, viewport).expect("visible");
        let (origin, dir) = camera.screen_ray(screen, viewport).expect("ray");
        let closest = origin + dir * (point - origin).dot(dir);
        assert!(closest.distance(point) < 1e-2);
    }

    #[test]
    fn orbit_round_trips_camera_position() {
        let mut camera = CameraConfig::default().camera();
        let original = camera.position;
        OrbitCamera::from_camera(&camera).apply_to(&mut camera);
        assert!(camera.position.distance(original) < 1e-3, "got {:?}", camera.position);
    }
}
