//! The recursive tracer: silhouette-preserving multisampling, reflection
//! bounces, and per-pixel color assembly.

use crate::camera::Camera;
use crate::primitives::{Primitive, Surface};
use crate::ray::Ray;
use crate::scene::Scene;
use crate::shading::shade;
use crate::vec3::{Color, Vec3};
use crate::DefaultRng;
use rand::Rng;
use serde::Deserialize;
use smallvec::SmallVec;

/// Fixed sub-pixel offsets of the 2x2 sample grid.
const SAMPLE_OFFSETS: [(f64, f64); 4] = [(0.25, 0.25), (-0.25, 0.25), (0.25, -0.25), (-0.25, -0.25)];

/// Color rays jitter within this radius for dithering. Silhouette rays keep
/// the fixed offsets; jittering them makes the outlines dotty.
const JITTER: f64 = 0.2;

/// Magnifier on the silhouette offsets; larger means thicker outlines.
const SILHOUETTE_THICKNESS: f64 = 4.0;

/// Multisampling stops paying for itself past this bounce depth.
const MAX_SAMPLED_BOUNCES: u32 = 3;

/// Hit distances beyond this are leftovers of the no-hit sentinel rather
/// than real geometry.
const FAR_LIMIT: f64 = 1e18;

/// Render-wide settings handed in by the driver.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// Reflection recursion limit.
    pub max_bounces: u32,
    /// Color for rays that leave the scene, channels in `[0, 255]`.
    pub background: Color,
    /// Multi-sample silhouette anti-aliasing.
    pub silhouette: bool,
    /// Quantize shading into flat cel bands.
    pub cel_shaded: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_bounces: 1,
            background: Color::ZERO,
            silhouette: false,
            cel_shaded: false,
        }
    }
}

/// Where a batch of sample rays is anchored.
enum Anchor {
    /// Primary rays: from the eye through a point on the image plane.
    Eye { origin: Vec3, look_at: Vec3 },
    /// Bounce rays: fanned out around an existing reflection ray.
    Given(Ray),
}

/// Trace the pixel at `(x, y)` and clamp the result to byte channels.
///
/// Pure with respect to the scene: all mutable state lives in the rays and
/// the rng, both owned by this call.
pub fn render_pixel(
    scene: &Scene,
    camera: &Camera,
    x: u32,
    y: u32,
    options: &RenderOptions,
    rng: &mut DefaultRng,
) -> [u8; 3] {
    let anchor = Anchor::Eye {
        origin: camera.eye,
        look_at: camera.look_at(x, y),
    };
    let color = trace(scene, anchor, 0, options, rng).clamp(0.0, 255.0);
    [color.x as u8, color.y as u8, color.z as u8]
}

/// Recursive Whitted trace of one sample batch.
///
/// Terminates because the bounce count strictly increases toward
/// `options.max_bounces`; the sampled fan also collapses to a single ray
/// past `MAX_SAMPLED_BOUNCES`, so recursion never widens the call tree.
fn trace(
    scene: &Scene,
    anchor: Anchor,
    bounces: u32,
    options: &RenderOptions,
    rng: &mut DefaultRng,
) -> Color {
    let multiple = options.silhouette && bounces <= MAX_SAMPLED_BOUNCES;
    let (mut color_rays, mut silhouette_rays) = sample_rays(&anchor, multiple, rng);

    // What each silhouette ray lands on, over the full scene.
    let hits: SmallVec<[Option<&Primitive>; 4]> = silhouette_rays
        .iter_mut()
        .map(|ray| scene.intersect(ray))
        .collect();

    if hits.iter().all(Option::is_none) {
        return options.background;
    }

    let Some(object) = hits[0] else {
        // First sample missed while another hit: an edge against background.
        return Color::ZERO;
    };
    if multiple
        && hits
            .iter()
            .any(|hit| hit.map_or(true, |h| !h.same_entity(object)))
    {
        // Samples disagree on what they hit: an object edge. Solid outline
        // pixels instead of blended colors are the anti-aliasing here.
        return Color::ZERO;
    }

    // Every sample agreed, so the color rays only need tightening against
    // the primitives the silhouette pass already found.
    for ray in &mut color_rays {
        for hit in hits.iter().flatten() {
            hit.intersect(ray);
        }
    }

    let ambient_intensity = options.background.length() / Color::splat(255.0).length() + 0.1;

    let mut sum = Color::ZERO;
    for ray in &color_rays {
        let reflected = if ray.nearest_hit < FAR_LIMIT {
            let point = ray.hit_point();
            ray.reflect(point, object.normal_at(point))
        } else {
            None
        };

        // No reflection means the surface faces away from the ray. Its
        // orientation is the same for every sample of this object, so the
        // whole pixel is background.
        let Some(reflected) = reflected else {
            return options.background;
        };

        let shaded = shade(
            reflected.origin,
            object,
            scene,
            ray,
            ambient_intensity,
            options.cel_shaded,
        );

        if object.reflectiveness() == 0.0 || bounces + 1 > options.max_bounces {
            return shaded;
        }

        let bounced = trace(scene, Anchor::Given(reflected), bounces + 1, options, rng);
        sum += shaded * (1.0 - object.reflectiveness()) + bounced * object.reflectiveness();
    }

    sum / color_rays.len() as f64
}

/// Build the color and silhouette sample fans for one trace call.
///
/// In single-ray mode both fans hold the same lone ray. In multisample mode
/// each fixed offset yields a deterministic silhouette ray and a jittered
/// color ray; offsets on a bounce anchor shrink by 500 because they perturb
/// a direction that is already unit length.
fn sample_rays(
    anchor: &Anchor,
    multiple: bool,
    rng: &mut DefaultRng,
) -> (SmallVec<[Ray; 4]>, SmallVec<[Ray; 4]>) {
    let mut color_rays = SmallVec::new();
    let mut silhouette_rays = SmallVec::new();

    if !multiple {
        let ray = match anchor {
            Anchor::Eye { origin, look_at } => Ray::new(*origin, *look_at - *origin).ok(),
            Anchor::Given(ray) => Some(*ray),
        };
        if let Some(ray) = ray {
            color_rays.push(ray);
            silhouette_rays.push(ray);
        }
        return (color_rays, silhouette_rays);
    }

    for (dx, dy) in SAMPLE_OFFSETS {
        let fixed = Vec3::new(dx, dy, 0.0);
        let jittered = fixed
            + Vec3::new(
                rng.gen_range(-JITTER..=JITTER),
                rng.gen_range(-JITTER..=JITTER),
                0.0,
            );

        let (color, silhouette) = match anchor {
            Anchor::Eye { origin, look_at } => (
                Ray::new(*origin, *look_at + jittered - *origin),
                Ray::new(
                    *origin,
                    *look_at + fixed * SILHOUETTE_THICKNESS - *origin,
                ),
            ),
            Anchor::Given(ray) => (
                Ray::new(ray.origin, ray.direction + jittered / 500.0),
                Ray::new(
                    ray.origin,
                    ray.direction + fixed * (SILHOUETTE_THICKNESS / 500.0),
                ),
            ),
        };
        if let (Ok(color), Ok(silhouette)) = (color, silhouette) {
            color_rays.push(color);
            silhouette_rays.push(silhouette);
        }
    }

    (color_rays, silhouette_rays)
}
