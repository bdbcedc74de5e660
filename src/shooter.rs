use glam::Vec3;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ShooterConfig {
    #[serde(default = "ShooterConfig::default_pool_size")]
    pub pool_size: usize,
    #[serde(default = "ShooterConfig::default_muzzle_speed")]
    pub muzzle_speed: f32,
    #[serde(default = "ShooterConfig::default_radius")]
    pub radius: f32,
    #[serde(default = "ShooterConfig::default_density")]
    pub density: f32,
    #[serde(default = "ShooterConfig::default_restitution")]
    pub restitution: f32,
    #[serde(default = "ShooterConfig::default_linear_damping")]
    pub linear_damping: f32,
}

impl ShooterConfig {
    const fn default_pool_size() -> usize {
        24
    }

    const fn default_muzzle_speed() -> f32 {
        90.0
    }

    const fn default_radius() -> f32 {
        0.35
    }

    const fn default_density() -> f32 {
        4.0
    }

    const fn default_restitution() -> f32 {
        0.6
    }

    const fn default_linear_damping() -> f32 {
        0.1
    }
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self {
            pool_size: Self::default_pool_size(),
            muzzle_speed: Self::default_muzzle_speed(),
            radius: Self::default_radius(),
            density: Self::default_density(),
            restitution: Self::default_restitution(),
            linear_damping: Self::default_linear_damping(),
        }
    }
}

/// Where idle projectiles are parked, far below the arena.
pub const PARKED_POSITION: Vec3 = Vec3::new(0.0, -100.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    pub slot: usize,
    pub origin: Vec3,
    pub velocity: Vec3,
}

/// Fixed ring of projectile slots; firing reuses the oldest one.
#[derive(Debug, Clone)]
pub struct ProjectilePool {
    active: Vec<bool>,
    next: usize,
    muzzle_speed: f32,
}

impl ProjectilePool {
    pub fn new(config: &ShooterConfig) -> Self {
        Self { active: vec![false; config.pool_size.max(1)], next: 0, muzzle_speed: config.muzzle_speed }
    }

    pub fn fire(&mut self, origin: Vec3, direction: Vec3) -> Option<Shot> {
        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }
        let slot = self.next;
        self.active[slot] = true;
        self.next = (self.next + 1) % self.active.len();
        Some(Shot { slot, origin, velocity: direction * self.muzzle_speed })
    }

    pub fn reset(&mut self) {
        self.active.iter_mut().for_each(|slot| *slot = false);
        self.next = 0;
    }

    pub fn capacity(&self) -> usize {
        self.active.len()
    }

    pub fn active_count(&self) -> usize {
        self.active.iter().filter(|active| **active).count()
    }

    pub fn is_active(&self, slot: usize) -> bool {
        self.active.get(slot).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_wraps_around() {
        let config = ShooterConfig { pool_size: 3, ..Default::default() };
        let mut pool = ProjectilePool::new(&config);
        let slots: Vec<usize> =
            (0..5).filter_map(|_| pool.fire(Vec3::ZERO, Vec3::X)).map(|shot| shot.slot).collect();
        assert_eq!(slots, [0, 1, 2, 0, 1]);
        assert_eq!(pool.active_count(), 3);
    }

    #[test]
    fn shot_velocity_uses_muzzle_speed() {
        let mut pool = ProjectilePool::new(&ShooterConfig::default());
        let shot = pool.fire(Vec3::ONE, Vec3::new(0.0, 0.0, -2.0)).expect("shot");
        assert_eq!(shot.velocity, Vec3::new(0.0, 0.0, -90.0));
        assert!(pool.fire(Vec3::ONE, Vec3::ZERO).is_none());
    }
}
