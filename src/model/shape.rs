use glam::Vec3;

use crate::config::CapsuleConfig;
use crate::error::CollisionError;
use crate::utils::BoundingSphere;

/// Which collision volume the character is using.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShapeMode {
    #[default]
    Standing,
    Sitting,
}

/// Upright capsule whose local origin is the bottom of the lower hemisphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapsuleShape {
    pub radius: f32,
    pub cylinder_height: f32,
}

impl CapsuleShape {
    pub fn new(radius: f32, cylinder_height: f32) -> Result<Self, CollisionError> {
        if !(radius > 0.0) || !(cylinder_height >= 0.0) {
            return Err(CollisionError::InvalidShape);
        }
        Ok(Self { radius, cylinder_height })
    }

    pub fn total_height(&self) -> f32 {
        self.cylinder_height + 2.0 * self.radius
    }

    /// Capsule center relative to its bottom.
    pub fn center_offset(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, 0.5 * self.cylinder_height + self.radius)
    }

    /// Local bounding box corners relative to the capsule bottom.
    pub fn local_bounds(&self) -> (Vec3, Vec3) {
        (
            Vec3::new(-self.radius, -self.radius, 0.0),
            Vec3::new(self.radius, self.radius, self.total_height()),
        )
    }

    /// Three spheres along the axis (bottom, middle, top) for debug drawing.
    pub fn debug_spheres(&self, bottom: Vec3) -> [BoundingSphere; 3] {
        let r = self.radius;
        [
            BoundingSphere::new(bottom + Vec3::new(0.0, 0.0, r), r),
            BoundingSphere::new(bottom + Vec3::new(0.0, 0.0, r + 0.5 * self.cylinder_height), r),
            BoundingSphere::new(bottom + Vec3::new(0.0, 0.0, r + self.cylinder_height), r),
        ]
    }
}

/// The precomputed collision volumes, built once at init.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeSet {
    standing: CapsuleShape,
    sitting: Option<CapsuleShape>,
}

impl ShapeSet {
    pub fn from_config(config: &CapsuleConfig) -> Result<Self, CollisionError> {
        let standing = CapsuleShape::new(config.radius, config.standing_cylinder_height)?;
        let sitting = config
            .sitting_cylinder_height
            .map(|h| CapsuleShape::new(config.radius, h))
            .transpose()?;
        Ok(Self { standing, sitting })
    }

    pub fn get(&self, mode: ShapeMode) -> Option<&CapsuleShape> {
        match mode {
            ShapeMode::Standing => Some(&self.standing),
            ShapeMode::Sitting => self.sitting.as_ref(),
        }
    }

    pub fn standing(&self) -> &CapsuleShape {
        &self.standing
    }
}
