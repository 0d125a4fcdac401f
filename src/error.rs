use crate::vec3::Vec3;
use thiserror::Error;

/// Errors raised while validating scene geometry.
///
/// Everything here means the input scene is malformed; construction fails
/// fast so a bad model is rejected before any pixel is traced.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum GeometryError {
    /// Normalization or cross product of a zero-length vector.
    #[error("cannot take the direction of a zero-length vector")]
    DegenerateVector,

    /// Triangle with duplicate or collinear vertices; it has no normal.
    #[error("malformed triangle with vertices {0}, {1}, {2}")]
    MalformedTriangle(Vec3, Vec3, Vec3),

    /// A bounding volume hierarchy needs at least one primitive.
    #[error("cannot build a bounding volume hierarchy over zero primitives")]
    EmptyHierarchy,
}
