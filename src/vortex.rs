use glam::Vec3;

/// Swirl radius under which the field fades out, keeping the core from exploding.
const CORE_RADIUS: f32 = 1.0;
const INWARD_PULL: f32 = 0.35;
const LIFT: f32 = 0.25;
/// Bodies further than this from the axis are left alone.
pub const FIELD_RADIUS: f32 = 40.0;

/// Force at `position` from a vortex spinning around the world Y axis.
pub fn vortex_force(position: Vec3, strength: f32) -> Vec3 {
    let radial = Vec3::new(position.x, 0.0, position.z);
    let distance = radial.length();
    if strength == 0.0 || distance <= f32::EPSILON || distance > FIELD_RADIUS {
        return Vec3::ZERO;
    }
    let outward = radial / distance;
    let tangent = Vec3::Y.cross(outward);
    let falloff = (distance / CORE_RADIUS).min(1.0) * (1.0 - distance / FIELD_RADIUS);
    (tangent - outward * INWARD_PULL + Vec3::Y * LIFT) * strength * falloff
}

/// Impulse for one step of `dt` seconds applied to a body of `mass`.
pub fn vortex_impulse(position: Vec3, strength: f32, mass: f32, dt: f32) -> Vec3 {
    vortex_force(position, strength) * mass * dt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_swirls_pulls_and_lifts() {
        let force = vortex_force(Vec3::new(5.0, 2.0, 0.0), 10.0);
        assert!(force.z < 0.0, "swirl at +x points toward -z");
        assert!(force.x < 0.0, "inward pull");
        assert!(force.y > 0.0, "lift");
    }

    #[test]
    fn axis_and_far_field_are_quiet() {
        assert_eq!(vortex_force(Vec3::new(0.0, 3.0, 0.0), 10.0), Vec3::ZERO);
        assert_eq!(vortex_force(Vec3::new(100.0, 0.0, 0.0), 10.0), Vec3::ZERO);
        assert_eq!(vortex_force(Vec3::new(5.0, 0.0, 0.0), 0.0), Vec3::ZERO);
    }
}
