//! Entity transforms.

use serde::{Deserialize, Serialize};

use crate::math::{Mat4, Vector3};

/// Position, Euler rotation (radians) and scale of one entity.
///
/// Only `rotation.y` (yaw) changes during play; the other axes are fixed
/// when the entity is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vector3,
    pub rotation: Vector3,
    pub scale: Vector3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::ZERO,
            rotation: Vector3::ZERO,
            scale: Vector3::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: Vector3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.rotation.y = yaw;
        self
    }

    pub fn with_scale(mut self, scale: Vector3) -> Self {
        self.scale = scale;
        self
    }

    pub fn yaw(&self) -> f32 {
        self.rotation.y
    }

    /// Model matrix: translate · yaw · pitch · roll · scale.
    pub fn matrix(&self) -> Mat4 {
        Mat4::translation(self.position)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_x(self.rotation.x)
            * Mat4::rotation_z(self.rotation.z)
            * Mat4::scale(self.scale)
    }

    /// View matrix for a camera sitting at this transform.
    ///
    /// Inverse of the yaw + translation part; pitch, roll and scale are
    /// ignored for cameras.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::rotation_y(-self.rotation.y) * Mat4::translation(-self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_model_matrix_places_origin_at_position() {
        let t = Transform::at(Vector3::new(150.0, 0.0, 250.0)).with_yaw(FRAC_PI_2);
        let p = t.matrix().transform_point(Vector3::ZERO);
        assert!(p.approx_eq(&t.position, 1e-4));
    }

    #[test]
    fn test_view_matrix_inverts_model() {
        let t = Transform::at(Vector3::new(10.0, 0.0, -30.0)).with_yaw(0.4);
        let world = t.matrix().transform_point(Vector3::new(1.0, 2.0, 3.0));
        let back = t.view_matrix().transform_point(world);
        assert!(back.approx_eq(&Vector3::new(1.0, 2.0, 3.0), 1e-4), "{back:?}");
    }
}
