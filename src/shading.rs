//! Ambient + diffuse + Phong specular shading with hard shadows, plus the
//! optional cel-shading quantizer.

use crate::primitives::{Primitive, Surface};
use crate::ray::Ray;
use crate::scene::Scene;
use crate::vec3::{Color, Vec3};
use log::debug;

/// Shade `point` on `object` against every light in the scene.
///
/// Each light gets a shadow feeler over the whole scene (the shaded object
/// included; the ray's origin offset is what prevents false self-shadowing).
/// Occluded lights contribute nothing; when every light is occluded the
/// point gets half the ambient term. With no lights at all the surface color
/// passes through unlit.
pub fn shade(
    point: Vec3,
    object: &Primitive,
    scene: &Scene,
    incoming: &Ray,
    ambient_intensity: f64,
    cel_shaded: bool,
) -> Color {
    let base = object.color_at(point);

    if scene.lights.is_empty() {
        debug!("no lights configured, shading {point} unlit");
        return base;
    }

    let ambient = base * ambient_intensity;
    let normal = object.normal_at(point);

    let mut diffuse = Color::ZERO;
    let mut specular = Color::ZERO;
    let mut lit = false;

    for light in &scene.lights {
        let Ok(mut shadow) = Ray::shadow(point, light) else {
            // The light sits exactly on the surface point.
            continue;
        };
        if scene.occluded(&mut shadow) {
            continue;
        }
        lit = true;

        let l = shadow.direction;
        diffuse += base * (light.intensity * l.dot(normal).max(0.0));

        // Light bounced about the normal versus the eye direction,
        // Shirley & Marschner p. 238.
        let r = normal * (2.0 * l.dot(normal)) - l;
        let e = -incoming.direction;
        specular += light.color * (light.intensity * e.dot(r).max(0.0).powf(object.shininess()));
    }

    if !lit {
        return ambient / 2.0;
    }

    let total = ambient + diffuse + specular;
    if cel_shaded {
        quantize(total, base)
    } else {
        total.clamp(0.0, 255.0)
    }
}

/// Collapse a continuous shading result into five flat bands of the base
/// color, keyed on the magnitude of the total relative to full white.
fn quantize(total: Color, base: Color) -> Color {
    let magnitude = total.length();
    let full_white = Color::splat(255.0).length();
    if magnitude > full_white {
        Color::splat(255.0)
    } else if magnitude > 0.4 * full_white {
        base * 0.8
    } else if magnitude > 0.2 * full_white {
        base * 0.5
    } else if magnitude > 0.05 * full_white {
        base * 0.3
    } else {
        Color::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::light::PointLight;
    use crate::primitives::Sphere;

    const EPS: f64 = 1e-9;

    fn white_sphere() -> Primitive {
        Sphere::new(Vec3::new(0.0, 0.0, 10.0), 2.0, Color::splat(255.0), 0.0, 8.0, None).into()
    }

    fn incoming_ray() -> Ray {
        Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 1.0)).unwrap()
    }

    // Front pole of the sphere, facing the origin.
    const POINT: Vec3 = Vec3::new(0.0, 0.0, 8.0);

    #[test]
    fn no_lights_returns_the_unlit_base_color() {
        let object = white_sphere();
        let scene = Scene::new();
        let color = shade(POINT, &object, &scene, &incoming_ray(), 0.1, false);
        assert_eq!(color, Color::splat(255.0));
    }

    #[test]
    fn lit_point_accumulates_ambient_diffuse_and_specular() {
        let object = white_sphere();
        let mut scene = Scene::new();
        // Straight back toward the camera: l == n == e, so l·n = 1 and the
        // reflected light lines up with the eye exactly.
        scene.push_light(PointLight::new(
            Vec3::new(0.0, 0.0, -10.0),
            Color::splat(255.0),
            0.5,
        ));

        let color = shade(POINT, &object, &scene, &incoming_ray(), 0.1, false);
        // ambient 25.5 + diffuse 127.5 + specular 127.5, clamped at 255.
        assert!((color.x - 255.0).abs() < EPS);
        assert_eq!(color, Color::splat(255.0));
    }

    #[test]
    fn fully_occluded_point_gets_half_ambient() {
        let object = white_sphere();
        let mut scene = Scene::new();
        scene.push_light(PointLight::new(
            Vec3::new(0.0, 0.0, -10.0),
            Color::splat(255.0),
            1.0,
        ));
        // Blocker between the shaded point and the light.
        scene.push(Primitive::from(Sphere::new(
            Vec3::new(0.0, 0.0, 4.0),
            1.0,
            Color::splat(255.0),
            0.0,
            8.0,
            None,
        )));

        let color = shade(POINT, &object, &scene, &incoming_ray(), 0.1, false);
        let expected = Color::splat(255.0) * 0.1 / 2.0;
        assert!((color - expected).length() < EPS);
    }

    #[test]
    fn visible_lights_still_count_when_another_is_occluded() {
        let object = white_sphere();
        let mut scene = Scene::new();
        // This one is blocked...
        scene.push_light(PointLight::new(
            Vec3::new(0.0, 0.0, -10.0),
            Color::splat(255.0),
            1.0,
        ));
        scene.push(Primitive::from(Sphere::new(
            Vec3::new(0.0, 0.0, 4.0),
            1.0,
            Color::splat(255.0),
            0.0,
            8.0,
            None,
        )));
        // ...this one reaches the point from the front-left, clear of both
        // spheres.
        scene.push_light(PointLight::new(
            Vec3::new(100.0, 0.0, 0.0),
            Color::splat(255.0),
            0.2,
        ));

        let color = shade(POINT, &object, &scene, &incoming_ray(), 0.1, false);
        let half_ambient = Color::splat(255.0) * 0.1 / 2.0;
        assert!(
            color.length() > half_ambient.length(),
            "a visible light must contribute more than the shadow fallback"
        );
    }

    #[test]
    fn cel_bands_quantize_at_their_boundaries() {
        let base = Color::new(200.0, 100.0, 50.0);
        let band = |fraction: f64, eps: f64| Color::splat(fraction * 255.0 + eps);

        assert_eq!(quantize(band(1.0, 0.1), base), Color::splat(255.0));
        assert_eq!(quantize(band(1.0, -0.1), base), base * 0.8);
        assert_eq!(quantize(band(0.4, 0.1), base), base * 0.8);
        assert_eq!(quantize(band(0.4, -0.1), base), base * 0.5);
        assert_eq!(quantize(band(0.2, 0.1), base), base * 0.5);
        assert_eq!(quantize(band(0.2, -0.1), base), base * 0.3);
        assert_eq!(quantize(band(0.05, 0.1), base), base * 0.3);
        assert_eq!(quantize(band(0.05, -0.1), base), Color::ZERO);
    }
}
