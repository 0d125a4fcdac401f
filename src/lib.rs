//! Whitted-style ray tracer with silhouette outlines and cel shading.
//!
//! The scene is a flat list of primitives and bounding volume hierarchies
//! plus point lights; rendering casts one multisampled ray batch per pixel,
//! resolves nearest hits through the hierarchy, shades with
//! ambient/diffuse/specular terms and hard shadows, and recurses into
//! reflections up to a configured bounce depth.

pub mod bvh;
pub mod camera;
pub mod error;
pub mod light;
pub mod primitives;
pub mod ray;
pub mod scene;
pub mod shading;
pub mod tracer;
pub mod vec3;

pub use bvh::BoundingBox;
pub use camera::Camera;
pub use error::GeometryError;
pub use light::PointLight;
pub use primitives::{Aabb, CheckeredSphere, GroupId, Primitive, Sphere, Surface, Triangle};
pub use ray::Ray;
pub use scene::{Scene, SceneEntry};
pub use shading::shade;
pub use tracer::{render_pixel, RenderOptions};
pub use vec3::{Color, Vec3};

/// The rng threaded through all sampling code.
pub type DefaultRng = rand_xoshiro::Xoshiro256Plus;
