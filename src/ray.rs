use crate::error::GeometryError;
use crate::light::PointLight;
use crate::vec3::Vec3;

/// Distance along a ray below which hits are rejected, so a bounced ray
/// cannot re-hit the surface it just left.
pub const INITIAL_OFFSET: f64 = 1e-4;

/// Sentinel for "no hit found yet".
pub const NO_HIT: f64 = 1e20;

/// A ray with its traversal state.
///
/// `nearest_hit` is the one piece of mutable state in the whole intersection
/// engine: every successful primitive test shrinks it, and later tests only
/// accept strictly nearer hits. Each ray is owned by a single call stack, so
/// the field needs no synchronization.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
    /// Componentwise reciprocal of `direction` for the slab test; zero
    /// components map to ±inf.
    pub inv_direction: Vec3,
    /// Hits below this distance are self-intersections at the origin.
    pub min_offset: f64,
    /// Closest accepted hit distance so far.
    pub nearest_hit: f64,
}

impl Ray {
    /// A ray from `origin` along `direction`, with no hit bound yet.
    /// Fails when the direction cannot be normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Result<Self, GeometryError> {
        Self::bounded(origin, direction, NO_HIT)
    }

    /// A ray that only accepts hits nearer than `nearest_hit`.
    pub fn bounded(origin: Vec3, direction: Vec3, nearest_hit: f64) -> Result<Self, GeometryError> {
        let direction = direction.normalized()?;
        let inv_direction = Vec3::new(1.0 / direction.x, 1.0 / direction.y, 1.0 / direction.z);
        Ok(Self {
            origin,
            direction,
            inv_direction,
            min_offset: INITIAL_OFFSET,
            nearest_hit,
        })
    }

    /// Shadow feeler from a surface point toward a light. The hit bound is
    /// preloaded with the light distance so occluders beyond the light do
    /// not count.
    pub fn shadow(point: Vec3, light: &PointLight) -> Result<Self, GeometryError> {
        let to_light = light.position - point;
        Self::bounded(point, to_light, to_light.length())
    }

    pub fn point_at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Point of the nearest hit recorded so far.
    pub fn hit_point(&self) -> Vec3 {
        self.point_at(self.nearest_hit)
    }

    /// Spawn the reflection of this ray about `normal` at `point`.
    ///
    /// `None` when the surface faces away from the ray (direction · normal
    /// ≥ 0), which callers treat as "nothing to reflect".
    pub fn reflect(&self, point: Vec3, normal: Vec3) -> Option<Ray> {
        let d_dot_n = self.direction.dot(normal);
        if d_dot_n >= 0.0 {
            return None;
        }
        Ray::new(point, self.direction + normal * (-2.0 * d_dot_n)).ok()
    }
}
