use crate::ray::Ray;
use crate::vec3::Vec3;

/// Slack added around every bounding box so hits exactly on a primitive's
/// surface are never culled by its own box.
pub const MARGIN: f64 = 0.1;

/// Axis-aligned bounding box.
///
/// Invariant: `min <= max` componentwise.
#[derive(Clone, Copy, Debug)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        debug_assert!(min.x <= max.x && min.y <= max.y && min.z <= max.z);
        Self { min, max }
    }

    /// Box surrounding both operands.
    pub fn union(self, other: Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    /// Box grown by `margin` on every side.
    pub fn expand(self, margin: f64) -> Aabb {
        Aabb::new(
            self.min - Vec3::splat(margin),
            self.max + Vec3::splat(margin),
        )
    }

    pub fn centroid(self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Three-axis slab test, from tavianator.com.
    ///
    /// Uses the ray's precomputed reciprocal direction, so a zero direction
    /// component turns into ±inf entry/exit distances and axis-aligned rays
    /// are classified correctly; the min/max folding absorbs the NaN that a
    /// ray origin exactly on a slab plane produces.
    pub fn hit(&self, ray: &Ray) -> bool {
        let tx1 = (self.min.x - ray.origin.x) * ray.inv_direction.x;
        let tx2 = (self.max.x - ray.origin.x) * ray.inv_direction.x;
        let mut t_min = tx1.min(tx2);
        let mut t_max = tx1.max(tx2);

        let ty1 = (self.min.y - ray.origin.y) * ray.inv_direction.y;
        let ty2 = (self.max.y - ray.origin.y) * ray.inv_direction.y;
        t_min = t_min.max(ty1.min(ty2));
        t_max = t_max.min(ty1.max(ty2));

        let tz1 = (self.min.z - ray.origin.z) * ray.inv_direction.z;
        let tz2 = (self.max.z - ray.origin.z) * ray.inv_direction.z;
        t_min = t_min.max(tz1.min(tz2));
        t_max = t_max.min(tz1.max(tz2));

        t_max >= t_min.max(0.0)
    }
}
