use glam::Vec3;

/// World-space up. Positions are capsule-bottom anchored with +Z up.
pub const UP: Vec3 = Vec3::Z;

/// Drop the vertical component of `v`.
#[inline]
pub fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, 0.0)
}

/// Remove the component of `v` along `dir`. `dir` is expected to be unit length.
#[inline]
pub fn remove_component_in_dir(v: Vec3, dir: Vec3) -> Vec3 {
    v - dir * v.dot(dir)
}

/// Projects `v` onto the plane orthogonal to `up`.
#[inline]
pub fn remove_up_component(v: Vec3, up: Vec3) -> Vec3 {
    v - up * v.dot(up)
}

/// Bounding sphere, used for debug visualisation of the capsule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }
}
