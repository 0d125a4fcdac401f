//! Bounding volume hierarchy over scene primitives.
//!
//! Built once at scene-build time by recursive median split (Shirley &
//! Marschner style, split axis cycling x→y→z with depth), then read-only:
//! traversal never mutates the tree, so independent rays can walk it from
//! any number of threads.

use crate::error::GeometryError;
use crate::primitives::{Aabb, Primitive, Surface, MARGIN};
use crate::ray::Ray;
use crate::vec3::Vec3;
use std::cmp::Ordering;

/// Split axis, cycling with tree depth.
#[derive(Clone, Copy, Debug)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn next(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::Z,
            Axis::Z => Axis::X,
        }
    }
}

trait GetAxis {
    fn axis(&self, axis: Axis) -> f64;
}

impl GetAxis for Vec3 {
    fn axis(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// A node of the hierarchy: its padded bounds plus either one primitive or
/// two children.
#[derive(Debug)]
pub struct BoundingBox {
    bounds: Aabb,
    node: Node,
    count: usize,
}

#[derive(Debug)]
enum Node {
    Leaf(Primitive),
    Internal {
        left: Box<BoundingBox>,
        right: Box<BoundingBox>,
    },
}

impl BoundingBox {
    /// Build a hierarchy over `primitives`.
    ///
    /// Deterministic for a given input order: the sort is stable, so
    /// primitives with equal centroids keep their relative order.
    pub fn new(primitives: Vec<Primitive>) -> Result<Self, GeometryError> {
        Self::build(primitives, Axis::X)
    }

    fn build(mut primitives: Vec<Primitive>, axis: Axis) -> Result<Self, GeometryError> {
        let bounds = primitives
            .iter()
            .map(|p| p.bounds())
            .reduce(Aabb::union)
            .ok_or(GeometryError::EmptyHierarchy)?
            .expand(MARGIN);

        if primitives.len() == 1 {
            let primitive = primitives.remove(0);
            return Ok(Self {
                bounds,
                node: Node::Leaf(primitive),
                count: 1,
            });
        }

        primitives.sort_by(|p, q| {
            let pc = p.bounds().centroid().axis(axis);
            let qc = q.bounds().centroid().axis(axis);
            pc.partial_cmp(&qc).unwrap_or(Ordering::Equal)
        });

        let right_half = primitives.split_off(primitives.len() / 2);
        let left = Box::new(Self::build(primitives, axis.next())?);
        let right = Box::new(Self::build(right_half, axis.next())?);
        let count = left.count + right.count;

        Ok(Self {
            bounds,
            node: Node::Internal { left, right },
            count,
        })
    }

    /// Number of primitives in this subtree.
    pub fn object_count(&self) -> usize {
        self.count
    }

    /// Depth of the deepest leaf, counted in nodes.
    pub fn depth(&self) -> usize {
        match &self.node {
            Node::Leaf(_) => 1,
            Node::Internal { left, right } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Nearest primitive hit by `ray`, if any.
    ///
    /// Both children are always visited once the box test passes. The right
    /// child runs against the bound the left already tightened, so when both
    /// report a hit the right one is never farther and wins.
    pub fn intersect<'a>(&'a self, ray: &mut Ray) -> Option<&'a Primitive> {
        if !self.bounds.hit(ray) {
            return None;
        }
        match &self.node {
            Node::Leaf(primitive) => {
                if primitive.intersect(ray) {
                    Some(primitive)
                } else {
                    None
                }
            }
            Node::Internal { left, right } => {
                let left_hit = left.intersect(ray);
                let right_hit = right.intersect(ray);
                right_hit.or(left_hit)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{GroupId, Triangle};
    use crate::vec3::Color;
    use rand::Rng;
    use rand::SeedableRng;
    use crate::DefaultRng;

    fn random_point(rng: &mut DefaultRng, extent: f64) -> Vec3 {
        Vec3::new(
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
            rng.gen_range(-extent..extent),
        )
    }

    /// `n` well-formed random triangles, each in its own group so hits can
    /// be identified.
    fn random_triangles(rng: &mut DefaultRng, n: usize) -> Vec<Primitive> {
        let mut triangles = Vec::with_capacity(n);
        while triangles.len() < n {
            let a = random_point(rng, 100.0);
            let tri = Triangle::new(
                a,
                a + random_point(rng, 10.0),
                a + random_point(rng, 10.0),
                Color::splat(255.0),
                0.0,
                8.0,
                Some(GroupId(triangles.len() as u32)),
            );
            if let Ok(tri) = tri {
                triangles.push(tri.into());
            }
        }
        triangles
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(
            BoundingBox::new(Vec::new()).unwrap_err(),
            GeometryError::EmptyHierarchy
        );
    }

    #[test]
    fn counts_and_depth_are_logarithmic() {
        let mut rng = DefaultRng::seed_from_u64(7);
        let tree = BoundingBox::new(random_triangles(&mut rng, 128)).unwrap();
        assert_eq!(tree.object_count(), 128);
        // Median splits halve exactly, so 128 leaves sit 8 nodes deep.
        assert_eq!(tree.depth(), 8);
    }

    #[test]
    fn traversal_matches_brute_force_scan() {
        for &n in &[1usize, 2, 17, 200] {
            let mut rng = DefaultRng::seed_from_u64(n as u64);
            let triangles = random_triangles(&mut rng, n);
            let tree = BoundingBox::new(triangles.clone()).unwrap();

            for _ in 0..200 {
                let origin = random_point(&mut rng, 200.0);
                let target = random_point(&mut rng, 100.0);
                let Ok(prototype) = Ray::new(origin, target - origin) else {
                    continue;
                };

                let mut flat_ray = prototype;
                let mut flat_hit = None;
                for primitive in &triangles {
                    if primitive.intersect(&mut flat_ray) {
                        flat_hit = Some(primitive);
                    }
                }

                let mut tree_ray = prototype;
                let tree_hit = tree.intersect(&mut tree_ray);

                assert_eq!(
                    tree_hit.and_then(|p| p.group()),
                    flat_hit.and_then(|p| p.group()),
                    "hit identity diverged for n={n}"
                );
                if flat_hit.is_some() {
                    assert!(
                        (tree_ray.nearest_hit - flat_ray.nearest_hit).abs() < 1e-9,
                        "hit distance diverged for n={n}"
                    );
                }
            }
        }
    }
}
