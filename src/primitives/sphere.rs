use super::{Aabb, GroupId, Surface};
use crate::ray::Ray;
use crate::vec3::{Color, Vec3};

/// Discriminants closer to zero than this count as a tangent graze.
const TANGENT_EPSILON: f64 = 1e-7;

#[derive(Clone, Debug)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
    pub color: Color,
    pub reflectiveness: f64,
    pub shininess: f64,
    pub group: Option<GroupId>,
}

impl Sphere {
    pub fn new(
        center: Vec3,
        radius: f64,
        color: Color,
        reflectiveness: f64,
        shininess: f64,
        group: Option<GroupId>,
    ) -> Self {
        debug_assert!(radius > 0.0);
        Self {
            center,
            radius,
            color,
            reflectiveness,
            shininess,
            group,
        }
    }
}

impl Surface for Sphere {
    /// Ray-sphere intersection per Shirley & Marschner pp. 76-77: solve
    /// |d|²t² + 2d·(e−c)t + |e−c|²−r² = 0 and take the nearest root inside
    /// the ray's accepted interval.
    fn intersect(&self, ray: &mut Ray) -> bool {
        let e_min_c = ray.origin - self.center;
        let a = ray.direction.dot(ray.direction);
        let b = ray.direction.dot(e_min_c);
        let discriminant = b * b - a * (e_min_c.dot(e_min_c) - self.radius * self.radius);

        if discriminant < 0.0 {
            return false;
        }

        if discriminant < TANGENT_EPSILON {
            // Tangent graze: one double root.
            let t = -b / a;
            if t < ray.nearest_hit {
                ray.nearest_hit = t;
                return true;
            }
            return false;
        }

        let sqrt_disc = discriminant.sqrt();
        for t in [(-b - sqrt_disc) / a, (-b + sqrt_disc) / a] {
            if ray.min_offset < t && t < ray.nearest_hit {
                ray.nearest_hit = t;
                return true;
            }
        }
        false
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        (point - self.center) / self.radius
    }

    fn color_at(&self, _point: Vec3) -> Color {
        self.color
    }

    fn reflectiveness(&self) -> f64 {
        self.reflectiveness
    }

    fn shininess(&self) -> f64 {
        self.shininess
    }

    fn group(&self) -> Option<GroupId> {
        self.group
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(
            self.center - Vec3::splat(self.radius),
            self.center + Vec3::splat(self.radius),
        )
    }
}

/// A sphere with a procedural checkerboard projected onto its surface.
///
/// With an enormous radius it stands in for an infinite checkered ground
/// plane, which is its only real job.
#[derive(Clone, Debug)]
pub struct CheckeredSphere {
    pub sphere: Sphere,
}

impl CheckeredSphere {
    pub fn new(sphere: Sphere) -> Self {
        Self { sphere }
    }
}

impl Surface for CheckeredSphere {
    fn intersect(&self, ray: &mut Ray) -> bool {
        self.sphere.intersect(ray)
    }

    fn normal_at(&self, point: Vec3) -> Vec3 {
        self.sphere.normal_at(point)
    }

    /// Checker parity of the hit point's x and z cells, after scaling the
    /// radius down so one cell is roughly a tenth of the scene unit.
    fn color_at(&self, point: Vec3) -> Color {
        let cell = self.sphere.radius / 9999.0;
        let cx = (point.x / cell * 10.0).trunc() as i64;
        let cz = (point.z / cell * 10.0).trunc() as i64;
        if cx.rem_euclid(2) == cz.rem_euclid(2) {
            self.sphere.color
        } else {
            Color::splat(255.0) - self.sphere.color
        }
    }

    fn reflectiveness(&self) -> f64 {
        self.sphere.reflectiveness
    }

    fn shininess(&self) -> f64 {
        self.sphere.shininess
    }

    fn group(&self) -> Option<GroupId> {
        self.sphere.group
    }

    fn bounds(&self) -> Aabb {
        self.sphere.bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ray::NO_HIT;

    fn test_sphere(center: Vec3, radius: f64) -> Sphere {
        Sphere::new(center, radius, Color::splat(255.0), 0.0, 8.0, None)
    }

    #[test]
    fn ray_through_center_hits_front_surface() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, 10.0), 3.0);
        let mut ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(sphere.intersect(&mut ray));
        // Nearest hit is distance-to-center minus the radius.
        assert!((ray.nearest_hit - 7.0).abs() < 1e-9);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, 10.0), 3.0);
        let mut ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0)).unwrap();
        assert!(!sphere.intersect(&mut ray));
        assert_eq!(ray.nearest_hit, NO_HIT);
    }

    #[test]
    fn origin_inside_sphere_takes_the_far_root() {
        let sphere = test_sphere(Vec3::ZERO, 5.0);
        let mut ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(sphere.intersect(&mut ray));
        assert!((ray.nearest_hit - 6.0).abs() < 1e-9);
    }

    #[test]
    fn farther_sphere_cannot_displace_a_nearer_hit() {
        let near = test_sphere(Vec3::new(0.0, 0.0, 10.0), 3.0);
        let far = test_sphere(Vec3::new(0.0, 0.0, 30.0), 3.0);
        let mut ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert!(near.intersect(&mut ray));
        assert!(!far.intersect(&mut ray));
        assert!((ray.nearest_hit - 7.0).abs() < 1e-9);
    }

    #[test]
    fn normal_points_out_of_the_surface() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, 10.0), 2.0);
        let n = sphere.normal_at(Vec3::new(0.0, 0.0, 8.0));
        assert!((n - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn checker_cells_alternate_along_x() {
        let checkered = CheckeredSphere::new(Sphere::new(
            Vec3::ZERO,
            9999.0,
            Color::splat(255.0),
            0.0,
            8.0,
            None,
        ));
        // cell = 1.0, so cells are 0.1 wide along the surface.
        let a = checkered.color_at(Vec3::new(0.05, 0.0, 0.05));
        let b = checkered.color_at(Vec3::new(0.15, 0.0, 0.05));
        assert_eq!(a, Color::splat(255.0));
        assert_eq!(b, Color::ZERO);
    }

    #[test]
    fn checker_parity_is_stable_across_negative_coordinates() {
        let checkered = CheckeredSphere::new(Sphere::new(
            Vec3::ZERO,
            9999.0,
            Color::splat(255.0),
            0.0,
            8.0,
            None,
        ));
        let a = checkered.color_at(Vec3::new(-0.15, 0.0, 0.05));
        let b = checkered.color_at(Vec3::new(-0.25, 0.0, 0.05));
        assert_ne!(a, b);
    }
}
