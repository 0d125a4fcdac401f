use crate::bvh::BoundingBox;
use crate::light::PointLight;
use crate::primitives::{Primitive, Surface};
use crate::ray::Ray;

/// One top-level scene entry: a free primitive or a prebuilt hierarchy.
#[derive(Debug)]
pub enum SceneEntry {
    Primitive(Primitive),
    Hierarchy(BoundingBox),
}

impl From<Primitive> for SceneEntry {
    fn from(primitive: Primitive) -> Self {
        SceneEntry::Primitive(primitive)
    }
}

impl From<BoundingBox> for SceneEntry {
    fn from(tree: BoundingBox) -> Self {
        SceneEntry::Hierarchy(tree)
    }
}

/// Everything the tracer reads: ordered top-level entries plus lights.
///
/// Never mutated while rendering, so worker threads share it by reference.
#[derive(Debug, Default)]
pub struct Scene {
    pub entries: Vec<SceneEntry>,
    pub lights: Vec<PointLight>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: impl Into<SceneEntry>) {
        self.entries.push(entry.into());
    }

    pub fn push_light(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    /// Total primitives across flat entries and hierarchies.
    pub fn object_count(&self) -> usize {
        self.entries
            .iter()
            .map(|entry| match entry {
                SceneEntry::Primitive(_) => 1,
                SceneEntry::Hierarchy(tree) => tree.object_count(),
            })
            .sum()
    }

    /// Nearest primitive hit by `ray` over every entry.
    ///
    /// The ray's shrinking hit bound does the arbitration: whichever entry
    /// updated it last holds the closest hit found anywhere.
    pub fn intersect<'a>(&'a self, ray: &mut Ray) -> Option<&'a Primitive> {
        let mut hit = None;
        for entry in &self.entries {
            match entry {
                SceneEntry::Primitive(primitive) => {
                    if primitive.intersect(ray) {
                        hit = Some(primitive);
                    }
                }
                SceneEntry::Hierarchy(tree) => {
                    if let Some(primitive) = tree.intersect(ray) {
                        hit = Some(primitive);
                    }
                }
            }
        }
        hit
    }

    /// Whether anything blocks `ray` inside its current hit bound. Used for
    /// shadow feelers, where the first occluder settles the question.
    pub fn occluded(&self, ray: &mut Ray) -> bool {
        self.entries.iter().any(|entry| match entry {
            SceneEntry::Primitive(primitive) => primitive.intersect(ray),
            SceneEntry::Hierarchy(tree) => tree.intersect(ray).is_some(),
        })
    }
}
