//! Vector and matrix math: 2D/3D value types and 4x4 transforms.
//!
//! All types are `Copy` and every operation returns a new value. The
//! horizontal plane is x/z; y is up and is ignored by collision and
//! pathfinding.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// Tolerance used for float comparisons across the crate.
pub const EPSILON: f32 = 1e-5;

/// Point or direction on the horizontal plane (`x`, `y` = world x, world z).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn distance(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len)
        } else {
            Self::ZERO
        }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Component-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }

    /// Lift onto the horizontal plane of 3D space at height `y`.
    pub fn to_vector3(self, y: f32) -> Vector3 {
        Vector3::new(self.x, y, self.y)
    }
}

impl Add for Vector2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for Vector2 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

impl Neg for Vector2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// 3D vector
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0, z: 1.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(&self, other: &Self) -> f32 {
        (*self - *other).length()
    }

    /// Distance on the x/z plane only.
    pub fn horizontal_distance(&self, other: &Self) -> f32 {
        self.horizontal().distance(&other.horizontal())
    }

    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len)
        } else {
            Self::ZERO
        }
    }

    pub fn dot(&self, other: &Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Component-wise product.
    pub fn scale_by(&self, other: &Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Rotate around the y axis by `angle` radians (right-handed).
    pub fn rotate_y(&self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(
            self.x * cos + self.z * sin,
            self.y,
            -self.x * sin + self.z * cos,
        )
    }

    /// Project onto the x/z plane.
    pub fn horizontal(&self) -> Vector2 {
        Vector2::new(self.x, self.z)
    }

    pub fn approx_eq(&self, other: &Self, tolerance: f32) -> bool {
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.z - other.z).abs() <= tolerance
    }
}

impl Add for Vector3 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Vector3 {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;
    fn mul(self, scalar: f32) -> Self {
        Self::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Neg for Vector3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// Column-major 4x4 matrix, laid out the way GPU uniforms expect it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub cols: [[f32; 4]; 4],
}

impl Mat4 {
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    pub fn translation(offset: Vector3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[3] = [offset.x, offset.y, offset.z, 1.0];
        m
    }

    pub fn scale(factors: Vector3) -> Self {
        let mut m = Self::IDENTITY;
        m.cols[0][0] = factors.x;
        m.cols[1][1] = factors.y;
        m.cols[2][2] = factors.z;
        m
    }

    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::IDENTITY;
        m.cols[1] = [0.0, c, s, 0.0];
        m.cols[2] = [0.0, -s, c, 0.0];
        m
    }

    /// Rotation about y; agrees with [`Vector3::rotate_y`].
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::IDENTITY;
        m.cols[0] = [c, 0.0, -s, 0.0];
        m.cols[2] = [s, 0.0, c, 0.0];
        m
    }

    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Self::IDENTITY;
        m.cols[0] = [c, s, 0.0, 0.0];
        m.cols[1] = [-s, c, 0.0, 0.0];
        m
    }

    pub fn multiply(&self, other: &Self) -> Self {
        let mut out = [[0.0f32; 4]; 4];
        for (c, col) in out.iter_mut().enumerate() {
            for (r, cell) in col.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.cols[k][r] * other.cols[c][k]).sum();
            }
        }
        Self { cols: out }
    }

    /// Transform a point (w = 1).
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        let v = [p.x, p.y, p.z, 1.0];
        let mut out = [0.0f32; 4];
        for (r, cell) in out.iter_mut().enumerate() {
            *cell = (0..4).map(|k| self.cols[k][r] * v[k]).sum();
        }
        if out[3].abs() > EPSILON && (out[3] - 1.0).abs() > EPSILON {
            Vector3::new(out[0] / out[3], out[1] / out[3], out[2] / out[3])
        } else {
            Vector3::new(out[0], out[1], out[2])
        }
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Mat4 {
    type Output = Self;
    fn mul(self, other: Self) -> Self {
        self.multiply(&other)
    }
}

/// Normalize an angle in degrees to `[-180, 180]`.
pub fn normalize_degrees(angle: f32) -> f32 {
    let mut a = angle % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a < -180.0 {
        a += 360.0;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_vector3_operations() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert_eq!(sum, Vector3::new(5.0, 7.0, 9.0));
        assert_eq!((b - a).x, 3.0);
        assert_eq!((a * 2.0).y, 4.0);
        assert_eq!((-a).z, -3.0);
    }

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(Vector3::ZERO.normalize(), Vector3::ZERO);
        assert_eq!(Vector2::ZERO.normalize(), Vector2::ZERO);
        let n = Vector3::new(3.0, 4.0, 0.0).normalize();
        assert!((n.length() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_rotate_y_quarter_turn() {
        let v = Vector3::new(0.0, 0.0, -1.0).rotate_y(FRAC_PI_2);
        assert!(v.approx_eq(&Vector3::new(-1.0, 0.0, 0.0), 1e-5), "{v:?}");
    }

    #[test]
    fn test_matrix_rotation_matches_vector_rotation() {
        let p = Vector3::new(1.0, 2.0, 3.0);
        let angle = 0.7;
        let by_matrix = Mat4::rotation_y(angle).transform_point(p);
        let by_vector = p.rotate_y(angle);
        assert!(by_matrix.approx_eq(&by_vector, 1e-5));
    }

    #[test]
    fn test_translate_then_scale_order() {
        let m = Mat4::translation(Vector3::new(10.0, 0.0, 0.0))
            * Mat4::scale(Vector3::new(2.0, 2.0, 2.0));
        let p = m.transform_point(Vector3::new(1.0, 1.0, 1.0));
        assert!(p.approx_eq(&Vector3::new(12.0, 2.0, 2.0), 1e-5));
    }

    #[test]
    fn test_identity_multiply() {
        let m = Mat4::rotation_x(0.3) * Mat4::rotation_z(1.1);
        assert_eq!(m * Mat4::IDENTITY, m);
        assert_eq!(Mat4::IDENTITY * m, m);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(190.0), -170.0);
        assert_eq!(normalize_degrees(-190.0), 170.0);
        assert_eq!(normalize_degrees(540.0), 180.0);
        assert_eq!(normalize_degrees(45.0), 45.0);
    }
}
