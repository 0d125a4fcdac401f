use super::{Aabb, GroupId, Surface};
use crate::error::GeometryError;
use crate::ray::Ray;
use crate::vec3::{Color, Vec3};

/// A triangle with a precomputed outward normal.
///
/// The coordinate system is left-handed with +z away from the camera, so
/// front faces wind clockwise and the normal comes from (B−A)×(C−A).
#[derive(Clone, Debug)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
    normal: Vec3,
    pub color: Color,
    pub reflectiveness: f64,
    pub shininess: f64,
    pub group: Option<GroupId>,
}

impl Triangle {
    /// Build a triangle, deriving the normal from the winding. Fails when
    /// the vertices are duplicated or collinear.
    pub fn new(
        a: Vec3,
        b: Vec3,
        c: Vec3,
        color: Color,
        reflectiveness: f64,
        shininess: f64,
        group: Option<GroupId>,
    ) -> Result<Self, GeometryError> {
        let normal = (b - a)
            .cross(c - a)
            .and_then(Vec3::normalized)
            .map_err(|_| GeometryError::MalformedTriangle(a, b, c))?;
        Ok(Self {
            a,
            b,
            c,
            normal,
            color,
            reflectiveness,
            shininess,
            group,
        })
    }

    /// Same, but trust a normal supplied by the model file.
    #[allow(clippy::too_many_arguments)]
    pub fn with_normal(
        a: Vec3,
        b: Vec3,
        c: Vec3,
        normal: Vec3,
        color: Color,
        reflectiveness: f64,
        shininess: f64,
        group: Option<GroupId>,
    ) -> Result<Self, GeometryError> {
        let normal = normal
            .normalized()
            .map_err(|_| GeometryError::MalformedTriangle(a, b, c))?;
        Ok(Self {
            a,
            b,
            c,
            normal,
            color,
            reflectiveness,
            shininess,
            group,
        })
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }
}

impl Surface for Triangle {
    /// Ray-triangle intersection per Shirley & Marschner pp. 77-81:
    /// Cramer's rule over the barycentric linear system, with each solved
    /// coordinate short-circuiting rejection before the next is computed.
    fn intersect(&self, ray: &mut Ray) -> bool {
        // Precheck: normal pointed away from the ray origin means back face.
        if self.normal.dot(ray.direction) > 0.0 {
            return false;
        }

        let (a, b, c) = (
            self.a.x - self.b.x,
            self.a.y - self.b.y,
            self.a.z - self.b.z,
        );
        let (d, e, f) = (
            self.a.x - self.c.x,
            self.a.y - self.c.y,
            self.a.z - self.c.z,
        );
        let (g, h, i) = (ray.direction.x, ray.direction.y, ray.direction.z);
        let (j, k, l) = (
            self.a.x - ray.origin.x,
            self.a.y - ray.origin.y,
            self.a.z - ray.origin.z,
        );

        let ei_hf = e * i - h * f;
        let gf_di = g * f - d * i;
        let dh_eg = d * h - e * g;
        let ak_jb = a * k - j * b;
        let jc_al = j * c - a * l;
        let bl_kc = b * l - k * c;

        let m = a * ei_hf + b * gf_di + c * dh_eg;
        if m == 0.0 {
            // Ray parallel to the triangle plane.
            return false;
        }

        let t = -(f * ak_jb + e * jc_al + d * bl_kc) / m;
        if t < ray.min_offset || t > ray.nearest_hit {
            return false;
        }

        let gamma = (i * ak_jb + h * jc_al + g * bl_kc) / m;
        if !(0.0..=1.0).contains(&gamma) {
            return false;
        }

        let beta = (j * ei_hf + k * gf_di + l * dh_eg) / m;
        if !(0.0..=1.0).contains(&beta) {
            return false;
        }

        let alpha = 1.0 - beta - gamma;
        if !(0.0..=1.0).contains(&alpha) {
            return false;
        }

        ray.nearest_hit = t;
        true
    }

    fn normal_at(&self, _point: Vec3) -> Vec3 {
        self.normal
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
            self.a.min(self.b).min(self.c),
            self.a.max(self.b).max(self.c),
        )
    }
}
