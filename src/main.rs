mod loader;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::SeedableRng;
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use toonray::{
    render_pixel, BoundingBox, Camera, CheckeredSphere, Color, DefaultRng, GroupId, PointLight,
    Primitive, RenderOptions, Scene, Sphere, Vec3,
};

const COLOR_CHANNELS: u32 = 3;
const VIEWING_ANGLE_DEG: f64 = 30.0;

// Group handles for the demo scene.
const GROUND: GroupId = GroupId(0);
const CUBE: GroupId = GroupId(1);
const MODEL: GroupId = GroupId(2);
const SPHERES: u32 = 3;

#[derive(Parser)]
#[command(name = "toonray")]
#[command(about = "Whitted ray tracer with silhouette outlines and cel shading")]
struct Args {
    /// Square image size in pixels
    #[arg(long, default_value_t = 512)]
    size: u32,

    /// Maximum reflection bounces
    #[arg(long, default_value_t = 5)]
    depth: u32,

    /// Disable silhouette anti-aliasing
    #[arg(long)]
    no_silhouette: bool,

    /// Disable cel shading
    #[arg(long)]
    no_cel: bool,

    /// Triangulated OBJ model to drop into the scene, behind a BVH
    #[arg(long)]
    model: Option<PathBuf>,

    /// TOML file of render settings, replacing the flag-derived ones
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output image path
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,
}

fn render_options(args: &Args) -> Result<RenderOptions> {
    if let Some(path) = &args.config {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        return toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()));
    }
    Ok(RenderOptions {
        max_bounces: args.depth,
        background: Color::splat(30.0),
        silhouette: !args.no_silhouette,
        cel_shaded: !args.no_cel,
    })
}

/// The demo scene: a checkered ground sphere, four colored spheres around
/// the origin, a reflective cube behind a BVH, one white light, and
/// optionally a loaded model.
fn build_scene(size: f64, model: Option<&PathBuf>) -> Result<Scene> {
    let mut scene = Scene::new();
    let (up, back) = (
        VIEWING_ANGLE_DEG.to_radians().sin(),
        VIEWING_ANGLE_DEG.to_radians().cos(),
    );

    // Enormous checkered sphere standing in for an infinite ground plane.
    let scale = size / 5.0;
    let big = 9999.0 * size;
    scene.push(Primitive::from(CheckeredSphere::new(Sphere::new(
        Vec3::new(0.0, -back * big - scale, up * big),
        big,
        Color::splat(255.0),
        0.4,
        32.0,
        Some(GROUND),
    ))));

    // Four shiny spheres around the origin, tilted with the view.
    let positions = [
        (1.25, up, back),
        (-0.75, up, back),
        (-1.0, -up, -back),
        (1.0, -up, -back),
    ];
    let colors = [
        Color::new(0.0, 0.0, 255.0),
        Color::new(255.0, 255.0, 100.0),
        Color::new(200.0, 0.0, 0.0),
        Color::new(0.0, 200.0, 0.0),
    ];
    for (k, ((i, j, l), color)) in positions.into_iter().zip(colors).enumerate() {
        scene.push(Primitive::from(Sphere::new(
            Vec3::new(scale * i, scale * j, scale * l),
            scale / 1.1,
            color,
            0.4,
            8.0,
            Some(GroupId(SPHERES + k as u32)),
        )));
    }

    // A reflective cube up and to the left, spatially indexed.
    let build_start = Instant::now();
    let cube = loader::cube(
        size / 4.0,
        Vec3::new(-size / 3.0, size / 3.0, size / 2.0),
        0.5,
        CUBE,
    )?;
    let tree = BoundingBox::new(cube)?;
    info!(
        "cube hierarchy: {} primitives, {} levels, built in {:.2?}",
        tree.object_count(),
        tree.depth(),
        build_start.elapsed()
    );
    scene.push(tree);

    if let Some(path) = model {
        let build_start = Instant::now();
        let triangles = loader::load_obj(
            path,
            size / 35.0,
            Vec3::new(0.0, -1.2 * size / 3.0, 0.0),
            Color::new(67.0, 158.0, 78.0) * 1.2,
            0.0,
            MODEL,
        )?;
        let tree = BoundingBox::new(triangles)?;
        info!(
            "model hierarchy: {} primitives, {} levels, built in {:.2?}",
            tree.object_count(),
            tree.depth(),
            build_start.elapsed()
        );
        scene.push(tree);
    }

    scene.push_light(PointLight::new(
        Vec3::new(size, size, -1.5 * size),
        Color::splat(255.0),
        1.0,
    ));

    Ok(scene)
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let options = render_options(&args)?;
    let (width, height) = (args.size, args.size);

    let start = Instant::now();
    let scene = build_scene(args.size as f64, args.model.as_ref())?;
    let camera = Camera::facing(width, height);
    info!(
        "scene ready: {} primitives, {} lights, {:.2?}",
        scene.object_count(),
        scene.lights.len(),
        start.elapsed()
    );

    let start = Instant::now();
    let mut buffer = vec![0u8; (width * height * COLOR_CHANNELS) as usize];
    buffer
        .par_chunks_mut((width * COLOR_CHANNELS) as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let mut rng = DefaultRng::from_entropy();
            row.chunks_mut(COLOR_CHANNELS as usize)
                .enumerate()
                .for_each(|(x, pixel)| {
                    let rgb = render_pixel(&scene, &camera, x as u32, y as u32, &options, &mut rng);
                    pixel.copy_from_slice(&rgb);
                });
        });
    info!(
        "rendered {width}x{height} (depth {}, silhouette {}, cel {}) in {:.2?}",
        options.max_bounces,
        options.silhouette,
        options.cel_shaded,
        start.elapsed()
    );

    image::save_buffer(
        &args.output,
        &buffer,
        width,
        height,
        image::ColorType::Rgb8,
    )
    .with_context(|| format!("writing {}", args.output.display()))?;
    info!("wrote {}", args.output.display());

    Ok(())
}
