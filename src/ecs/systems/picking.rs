use glam::Vec3;

pub fn ray_sphere_intersection(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrt_d = discriminant.sqrt();
    let mut t = -b - sqrt_d;
    if t < 0.0 {
        t = -b + sqrt_d;
    }
    if t < 0.0 {
        return None;
    }
    Some(t)
}

/// Closest candidate hit by the ray. Candidates are `(key, center, radius)`; `dir` must be normalized.
pub fn pick_nearest<K: Copy>(origin: Vec3, dir: Vec3, candidates: impl IntoIterator<Item = (K, Vec3, f32)>) -> Option<K> {
    if !origin.is_finite() || !dir.is_finite() {
        return None;
    }
    candidates
        .into_iter()
        .filter_map(|(key, center, radius)| ray_sphere_intersection(origin, dir, center, radius).map(|t| (key, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| key)
}
