use crate::error::GeometryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// Colors ride in `Vec3`s with channels in `[0, 255]`.
pub type Color = Vec3;

/// A 3-dimensional vector of `f64` components.
///
/// All operations are pure; every operator yields a new value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// All three components set to `v`.
    pub const fn splat(v: f64) -> Self {
        Self::new(v, v, v)
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product. Degenerate for zero-length operands, which indicate
    /// malformed scene data (e.g. duplicate triangle vertices).
    pub fn cross(self, other: Vec3) -> Result<Vec3, GeometryError> {
        if self.length() == 0.0 || other.length() == 0.0 {
            return Err(GeometryError::DegenerateVector);
        }
        Ok(Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        ))
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction. The zero vector has no direction,
    /// so normalizing it is an error rather than a silent fallback.
    pub fn normalized(self) -> Result<Vec3, GeometryError> {
        let magnitude = self.length();
        if magnitude == 0.0 {
            return Err(GeometryError::DegenerateVector);
        }
        Ok(self / magnitude)
    }

    /// Componentwise minimum.
    pub fn min(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.x.min(other.x),
            self.y.min(other.y),
            self.z.min(other.z),
        )
    }

    /// Componentwise maximum.
    pub fn max(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.x.max(other.x),
            self.y.max(other.y),
            self.z.max(other.z),
        )
    }

    /// Clamp every component into `[lo, hi]`.
    pub fn clamp(self, lo: f64, hi: f64) -> Vec3 {
        Vec3::new(
            self.x.clamp(lo, hi),
            self.y.clamp(lo, hi),
            self.z.clamp(lo, hi),
        )
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{:.3}, {:.3}, {:.3}>", self.x, self.y, self.z)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, other: Vec3) {
        *self = *self + other;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;

    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, scalar: f64) -> Vec3 {
        Vec3::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

impl Div<f64> for Vec3 {
    type Output = Vec3;

    fn div(self, scalar: f64) -> Vec3 {
        Vec3::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl Div<Vec3> for Vec3 {
    type Output = Vec3;

    fn div(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x / other.x, self.y / other.y, self.z / other.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_sub_round_trip() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 8.0, 10.0);
        assert_eq!(a + b - b, a);
        assert_eq!(a + b, Vec3::new(5.0, 10.0, 13.0));
    }

    #[test]
    fn scalar_and_componentwise_division() {
        assert_eq!(Vec3::new(2.0, 4.0, 8.0) / 2.0, Vec3::new(1.0, 2.0, 4.0));
        assert_eq!(
            Vec3::new(2.0, 4.0, 8.0) / Vec3::new(2.0, 4.0, 2.0),
            Vec3::new(1.0, 1.0, 4.0)
        );
    }

    #[test]
    fn normalized_has_unit_length() {
        for v in [
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(-5.0, 0.25, 1e6),
            Vec3::new(0.0, 0.0, 1e-8),
        ] {
            let n = v.normalized().unwrap();
            assert!((n.length() - 1.0).abs() < 1e-9, "|{n}| != 1");
        }
    }

    #[test]
    fn normalized_zero_vector_is_degenerate() {
        assert_eq!(
            Vec3::ZERO.normalized().unwrap_err(),
            GeometryError::DegenerateVector
        );
    }

    #[test]
    fn cross_is_orthogonal() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-4.0, 1.0, 0.5);
        let c = a.cross(b).unwrap();
        assert!(c.dot(a).abs() < 1e-12);
        assert!(c.dot(b).abs() < 1e-12);
    }

    #[test]
    fn cross_with_zero_vector_is_degenerate() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        assert!(a.cross(Vec3::ZERO).is_err());
        assert!(Vec3::ZERO.cross(a).is_err());
    }
}
