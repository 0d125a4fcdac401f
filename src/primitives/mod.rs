//! Scene primitives, all dispatched through [`Surface`].

mod aabb;
mod sphere;
mod triangle;

pub use aabb::{Aabb, MARGIN};
pub use sphere::{CheckeredSphere, Sphere};
pub use triangle::Triangle;

use crate::ray::Ray;
use crate::vec3::{Color, Vec3};
use enum_dispatch::enum_dispatch;

/// Handle tying a primitive to the logical object it belongs to, e.g. all
/// triangles of one mesh. Compared by equality; display names live with the
/// driver, not here.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GroupId(pub u32);

/// The capability set every primitive exposes to the tracer and the BVH.
#[enum_dispatch]
pub trait Surface {
    /// Test `ray` against the primitive, shrinking `ray.nearest_hit` when a
    /// nearer hit is found. Returns whether this primitive produced the hit.
    fn intersect(&self, ray: &mut Ray) -> bool;

    /// Outward surface normal at `point` (a point on the surface).
    fn normal_at(&self, point: Vec3) -> Vec3;

    /// Surface color at `point`.
    fn color_at(&self, point: Vec3) -> Color;

    /// Fraction of incoming light mirrored, in `[0, 1]`.
    fn reflectiveness(&self) -> f64;

    /// Phong specular exponent.
    fn shininess(&self) -> f64;

    /// Logical-object membership for silhouette detection.
    fn group(&self) -> Option<GroupId>;

    /// Axis-aligned extents, used to place the primitive in a hierarchy.
    fn bounds(&self) -> Aabb;
}

/// Closed set of primitive shapes. The tracer and BVH depend only on
/// [`Surface`], never on the concrete variant.
#[enum_dispatch(Surface)]
#[derive(Clone, Debug)]
pub enum Primitive {
    Triangle,
    Sphere,
    CheckeredSphere,
}

impl Primitive {
    /// Whether two hit primitives belong to the same logical object.
    /// Ungrouped primitives only match themselves.
    pub fn same_entity(&self, other: &Primitive) -> bool {
        match (self.group(), other.group()) {
            (Some(a), Some(b)) => a == b,
            _ => std::ptr::eq(self, other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sphere(group: Option<GroupId>) -> Primitive {
        Sphere::new(Vec3::ZERO, 1.0, Color::splat(255.0), 0.0, 8.0, group).into()
    }

    #[test]
    fn same_entity_compares_groups() {
        let a = sphere(Some(GroupId(1)));
        let b = sphere(Some(GroupId(1)));
        let c = sphere(Some(GroupId(2)));
        assert!(a.same_entity(&b));
        assert!(!a.same_entity(&c));
    }

    #[test]
    fn ungrouped_primitives_only_match_themselves() {
        let a = sphere(None);
        let b = sphere(None);
        assert!(a.same_entity(&a));
        assert!(!a.same_entity(&b));
    }
}
