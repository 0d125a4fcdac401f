use crate::vec3::{Color, Vec3};
use serde::{Deserialize, Serialize};

/// A point light. Immutable and scene-global.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f64,
}

impl PointLight {
    pub fn new(position: Vec3, color: Color, intensity: f64) -> Self {
        Self {
            position,
            color,
            intensity,
        }
    }
}
