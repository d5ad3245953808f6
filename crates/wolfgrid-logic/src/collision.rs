//! Cuboid bounding boxes on the horizontal plane.
//!
//! A [`BoundingBox`] is a read-only view built from an entity's
//! [`Transform`] and its local-space [`LocalExtent`]. Only the x/z footprint
//! matters; y is ignored by every query.
//!
//! Rotation support is limited to right angles: when the yaw is an odd
//! multiple of 90° the x and z half extents swap. Any other yaw is treated
//! as unrotated, so walls and doors must be placed axis-aligned or turned by
//! 90°.

use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use crate::math::Vector3;
use crate::transform::Transform;

/// Yaw tolerance (radians) for treating a rotation as a right angle.
const QUARTER_TURN_TOLERANCE: f32 = 1e-3;

/// Local-space min/max of an entity's vertex data.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalExtent {
    pub min: Vector3,
    pub max: Vector3,
}

impl LocalExtent {
    /// No geometry yet; yields a degenerate box.
    pub const EMPTY: Self = Self {
        min: Vector3::ZERO,
        max: Vector3::ZERO,
    };

    /// Extent of a flat `[x, y, z, x, y, z, ...]` vertex buffer.
    ///
    /// An empty buffer gives [`LocalExtent::EMPTY`]; a trailing partial
    /// vertex is ignored.
    pub fn from_vertices(vertices: &[f32]) -> Self {
        let mut chunks = vertices.chunks_exact(3);
        let Some(first) = chunks.next() else {
            return Self::EMPTY;
        };
        let first = Vector3::new(first[0], first[1], first[2]);
        chunks.fold(Self { min: first, max: first }, |acc, v| Self {
            min: Vector3::new(acc.min.x.min(v[0]), acc.min.y.min(v[1]), acc.min.z.min(v[2])),
            max: Vector3::new(acc.max.x.max(v[0]), acc.max.y.max(v[1]), acc.max.z.max(v[2])),
        })
    }

    /// Origin-centred box with the given edge lengths.
    pub fn cuboid(width: f32, height: f32, depth: f32) -> Self {
        let half = Vector3::new(width / 2.0, height / 2.0, depth / 2.0);
        Self { min: -half, max: half }
    }

    /// Flat quad in the x/y plane (sprites, door panels), zero depth.
    pub fn plane(width: f32, height: f32) -> Self {
        Self::cuboid(width, height, 0.0)
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    pub fn is_empty(&self) -> bool {
        self.size() == Vector3::ZERO
    }
}

/// World-space cuboid for one entity, evaluated at its current transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    center: Vector3,
    half_size: Vector3,
    yaw: f32,
}

impl BoundingBox {
    pub fn new(transform: &Transform, extent: &LocalExtent) -> Self {
        Self {
            center: transform.position,
            half_size: extent.size().scale_by(&transform.scale) * 0.5,
            yaw: transform.yaw(),
        }
    }

    /// Zero-sized box at `center`.
    pub fn degenerate(center: Vector3) -> Self {
        Self {
            center,
            half_size: Vector3::ZERO,
            yaw: 0.0,
        }
    }

    pub fn center(&self) -> Vector3 {
        self.center
    }

    /// Half the local extent times scale, ignoring rotation.
    pub fn half_size(&self) -> Vector3 {
        self.half_size
    }

    /// Whether the yaw is an odd multiple of 90°.
    pub fn is_quarter_turned(&self) -> bool {
        let quarters = self.yaw / FRAC_PI_2;
        let nearest = quarters.round();
        (quarters - nearest).abs() < QUARTER_TURN_TOLERANCE && (nearest as i64) % 2 != 0
    }

    /// Half extents with x/z swapped for quarter-turned boxes.
    pub fn half_size_rotated(&self) -> Vector3 {
        if self.is_quarter_turned() {
            Vector3::new(self.half_size.z, self.half_size.y, self.half_size.x)
        } else {
            self.half_size
        }
    }

    /// A box with no horizontal footprint. Callers skip these as obstacles.
    pub fn is_degenerate(&self) -> bool {
        let h = self.half_size;
        !(h.x > 0.0 || h.z > 0.0) || !h.x.is_finite() || !h.z.is_finite()
    }

    pub fn min(&self) -> Vector3 {
        self.center - self.half_size_rotated()
    }

    pub fn max(&self) -> Vector3 {
        self.center + self.half_size_rotated()
    }

    /// Whether `point` lies inside the footprint (edges inclusive, y ignored).
    pub fn is_colliding(&self, point: Vector3) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.z >= min.z && point.z <= max.z
    }

    /// Which faces `point` lies beyond: each of x/z is -1, 0 or 1.
    ///
    /// 0 means the point is within the box's extent on that axis; ±1 means
    /// it is outside on the negative/positive side. y is always 0.
    pub fn point_side(&self, point: Vector3) -> Vector3 {
        let (min, max) = (self.min(), self.max());
        let side = |p: f32, lo: f32, hi: f32| {
            if p < lo {
                -1.0
            } else if p > hi {
                1.0
            } else {
                0.0
            }
        };
        Vector3::new(side(point.x, min.x, max.x), 0.0, side(point.z, min.z, max.z))
    }

    /// Footprint corner on the side of `point` (ties pick the negative side).
    pub fn nearest_corner(&self, point: Vector3) -> Vector3 {
        let (min, max) = (self.min(), self.max());
        let to_center = self.center - point;
        Vector3::new(
            if to_center.x >= 0.0 { min.x } else { max.x },
            self.center.y,
            if to_center.z >= 0.0 { min.z } else { max.z },
        )
    }

    /// Closest footprint point to `point` (the point itself when inside).
    pub fn nearest_point(&self, point: Vector3) -> Vector3 {
        let (min, max) = (self.min(), self.max());
        Vector3::new(point.x.clamp(min.x, max.x), point.y, point.z.clamp(min.z, max.z))
    }

    /// Footprint overlap test against another box (edges inclusive).
    pub fn overlaps(&self, other: &Self) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x <= b_max.x && a_max.x >= b_min.x && a_min.z <= b_max.z && a_max.z >= b_min.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::f32::consts::PI;

    fn wall_at(x: f32, z: f32) -> BoundingBox {
        BoundingBox::new(
            &Transform::at(Vector3::new(x, 0.0, z)),
            &LocalExtent::cuboid(100.0, 100.0, 100.0),
        )
    }

    fn panel(yaw: f32) -> BoundingBox {
        // 100 wide, 10 deep
        BoundingBox::new(
            &Transform::at(Vector3::ZERO).with_yaw(yaw),
            &LocalExtent::cuboid(100.0, 100.0, 10.0),
        )
    }

    #[test]
    fn test_extent_from_vertices() {
        let extent = LocalExtent::from_vertices(&[-1.0, 0.0, 2.0, 3.0, 5.0, -4.0, 0.0, 1.0, 0.0]);
        assert_eq!(extent.min, Vector3::new(-1.0, 0.0, -4.0));
        assert_eq!(extent.max, Vector3::new(3.0, 5.0, 2.0));
        assert_eq!(LocalExtent::from_vertices(&[]), LocalExtent::EMPTY);
    }

    #[test]
    fn test_half_size_applies_scale() {
        let b = BoundingBox::new(
            &Transform::at(Vector3::ZERO).with_scale(Vector3::new(2.0, 1.0, 0.5)),
            &LocalExtent::cuboid(10.0, 10.0, 10.0),
        );
        assert_eq!(b.half_size(), Vector3::new(10.0, 5.0, 2.5));
    }

    #[rstest]
    #[case(0.0, false)]
    #[case(FRAC_PI_2, true)]
    #[case(PI, false)]
    #[case(3.0 * FRAC_PI_2, true)]
    #[case(-FRAC_PI_2, true)]
    #[case(0.3, false)]
    fn test_quarter_turn_detection(#[case] yaw: f32, #[case] turned: bool) {
        assert_eq!(panel(yaw).is_quarter_turned(), turned);
    }

    #[test]
    fn test_half_size_rotated_swaps_x_and_z() {
        let turned = panel(FRAC_PI_2).half_size_rotated();
        assert!((turned.x - 5.0).abs() < 1e-5);
        assert!((turned.z - 50.0).abs() < 1e-5);
        assert_eq!(panel(PI).half_size_rotated(), panel(0.0).half_size());
    }

    #[test]
    fn test_points_inside_collide() {
        let wall = wall_at(0.0, 0.0);
        for p in [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(49.9, 0.0, -49.9),
            Vector3::new(-20.0, 500.0, 10.0), // y ignored
            Vector3::new(50.0, 0.0, 0.0),     // edge inclusive
        ] {
            assert!(wall.is_colliding(p), "{p:?}");
            assert_eq!(wall.point_side(p), Vector3::ZERO);
        }
    }

    #[rstest]
    #[case(Vector3::new(60.0, 0.0, 0.0), Vector3::new(1.0, 0.0, 0.0))]
    #[case(Vector3::new(-60.0, 0.0, 10.0), Vector3::new(-1.0, 0.0, 0.0))]
    #[case(Vector3::new(0.0, 0.0, 51.0), Vector3::new(0.0, 0.0, 1.0))]
    #[case(Vector3::new(-49.0, 0.0, -70.0), Vector3::new(0.0, 0.0, -1.0))]
    fn test_outside_on_one_axis(#[case] point: Vector3, #[case] side: Vector3) {
        let wall = wall_at(0.0, 0.0);
        assert!(!wall.is_colliding(point));
        assert_eq!(wall.point_side(point), side);
    }

    #[test]
    fn test_point_side_diagonal_reports_both_axes() {
        let wall = wall_at(0.0, 0.0);
        assert_eq!(wall.point_side(Vector3::new(70.0, 0.0, -70.0)), Vector3::new(1.0, 0.0, -1.0));
    }

    #[test]
    fn test_rotated_panel_collision() {
        let upright = panel(0.0);
        let turned = panel(FRAC_PI_2);
        let p = Vector3::new(0.0, 0.0, 30.0);
        assert!(!upright.is_colliding(p));
        assert!(turned.is_colliding(p));
    }

    #[test]
    fn test_nearest_corner() {
        let wall = wall_at(100.0, 100.0);
        let corner = wall.nearest_corner(Vector3::new(0.0, 0.0, 300.0));
        assert_eq!(corner, Vector3::new(50.0, 0.0, 150.0));
        let corner = wall.nearest_corner(Vector3::new(400.0, 0.0, -10.0));
        assert_eq!(corner, Vector3::new(150.0, 0.0, 50.0));
    }

    #[test]
    fn test_nearest_point_clamps() {
        let wall = wall_at(0.0, 0.0);
        let p = wall.nearest_point(Vector3::new(80.0, 3.0, 10.0));
        assert_eq!(p, Vector3::new(50.0, 3.0, 10.0));
    }

    #[test]
    fn test_degenerate_box_is_safe() {
        let b = BoundingBox::new(&Transform::default(), &LocalExtent::EMPTY);
        assert!(b.is_degenerate());
        assert!(!b.is_colliding(Vector3::new(1.0, 0.0, 0.0)));
        assert_eq!(b.min(), b.max());
        assert!(BoundingBox::degenerate(Vector3::ZERO).is_degenerate());
        assert!(!wall_at(0.0, 0.0).is_degenerate());
    }

    #[test]
    fn test_overlaps() {
        assert!(wall_at(0.0, 0.0).overlaps(&wall_at(100.0, 0.0)));
        assert!(!wall_at(0.0, 0.0).overlaps(&wall_at(101.0, 0.0)));
    }
}
