//! Axis-aligned box.

use glam::Vec3;

/// Axis-aligned box.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AaBox {
    /// Box minimum corner position.
    pub min: Vec3,
    /// Box maximum corner position. Assumed to be `>= min` on all axes.
    pub max: Vec3,
}

/// First time of impact of a box moving along a displacement.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SweepHit {
    /// Fraction of the displacement travelled before touching, in `[0, 1)`.
    pub toi: f32,
    /// Axis of the face that was hit.
    pub axis: usize,
    /// Outward normal of the face that was hit.
    pub normal: Vec3,
}

impl AaBox {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box with the given minimum corner and extent.
    pub fn from_extent(min: Vec3, ext: Vec3) -> Self {
        Self { min, max: min + ext }
    }

    /// Translate self by `v`.
    pub fn translate(mut self, v: Vec3) -> Self {
        self.min += v;
        self.max += v;
        self
    }

    /// Move the minimum corner backwards and the maximum corner forwards on all axes by `amount`.
    pub fn expand(mut self, amount: f32) -> Self {
        self.min -= Vec3::splat(amount);
        self.max += Vec3::splat(amount);
        self
    }

    /// Smallest box containing both self and `rhs`.
    pub fn union(self, rhs: AaBox) -> Self {
        Self {
            min: self.min.min(rhs.min),
            max: self.max.max(rhs.max),
        }
    }

    /// Does self intersect with `rhs`? Touching faces don't count.
    pub fn intersects(self, rhs: AaBox) -> bool {
        for i in 0..3 {
            if self.min[i] >= rhs.max[i] || self.max[i] <= rhs.min[i] {
                return false;
            }
        }
        true
    }

    /// Do the projections onto the horizontal plane overlap?
    pub fn overlaps_horizontally(self, rhs: AaBox) -> bool {
        for i in 0..2 {
            if self.min[i] >= rhs.max[i] || self.max[i] <= rhs.min[i] {
                return false;
            }
        }
        true
    }

    /// Penetration depth and outward push direction (for self) along the shallowest axis, if
    /// self and `rhs` overlap.
    pub fn penetration(self, rhs: AaBox) -> Option<(f32, Vec3)> {
        if !self.intersects(rhs) {
            return None;
        }
        let mut best: Option<(f32, Vec3)> = None;
        for i in 0..3 {
            let push_pos = rhs.max[i] - self.min[i];
            let push_neg = self.max[i] - rhs.min[i];
            let (depth, sign) = if push_pos <= push_neg { (push_pos, 1.0) } else { (push_neg, -1.0) };
            if best.map_or(true, |(d, _)| depth < d) {
                let mut dir = Vec3::ZERO;
                dir[i] = sign;
                best = Some((depth, dir));
            }
        }
        best
    }

    /// Swept test of self moving by `delta` against the stationary `rhs`.
    ///
    /// Returns `None` when there is no contact during the motion or when the boxes already
    /// overlap at the start.
    pub fn sweep(self, delta: Vec3, rhs: AaBox) -> Option<SweepHit> {
        let mut t_entry = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut entry_axis = None;

        for i in 0..3 {
            let (entry, exit) = if delta[i] > 0.0 {
                (
                    (rhs.min[i] - self.max[i]) / delta[i],
                    (rhs.max[i] - self.min[i]) / delta[i],
                )
            } else if delta[i] < 0.0 {
                (
                    (rhs.max[i] - self.min[i]) / delta[i],
                    (rhs.min[i] - self.max[i]) / delta[i],
                )
            } else {
                if self.max[i] <= rhs.min[i] || self.min[i] >= rhs.max[i] {
                    return None;
                }
                (f32::NEG_INFINITY, f32::INFINITY)
            };

            if entry > t_entry {
                t_entry = entry;
                entry_axis = Some(i);
            }
            t_exit = t_exit.min(exit);
        }

        let axis = entry_axis?;
        if t_entry > t_exit || t_entry >= 1.0 || t_entry < 0.0 {
            return None;
        }

        let mut normal = Vec3::ZERO;
        normal[axis] = -delta[axis].signum();
        Some(SweepHit { toi: t_entry, axis, normal })
    }
}
