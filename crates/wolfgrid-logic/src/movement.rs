//! Camera movement: per-axis collision blocking against cuboid obstacles.
//!
//! Algorithm: "block then move"
//! 1. `check_collisions`: for every obstacle, probe the camera position and
//!    a point `collision_radius` ahead toward the obstacle's centre. If either
//!    is inside, record the face normal the camera presses against as a
//!    blocked direction.
//! 2. `move_by`: rotate the input into world space, then zero every axis of
//!    the delta that heads into a blocked face. The other axis still moves,
//!    which gives wall sliding for free.
//!
//! Collision is resolved per axis, not swept. A step larger than an
//! obstacle's depth can tunnel through it; frame deltas are assumed small
//! relative to the 100-unit grid.

use serde::{Deserialize, Serialize};

use crate::collision::BoundingBox;
use crate::config::GameConfig;
use crate::math::{normalize_degrees, Vector3};
use crate::transform::Transform;

/// Abstract per-frame input, already decoupled from any keyboard layout.
///
/// `direction` is in the view frame: `z = +1` walks forward and `x = +1`
/// strafes left. `rotation` is a yaw rate multiplier (usually -1, 0 or 1).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputState {
    pub direction: Vector3,
    pub rotation: f32,
    pub interacting: bool,
    pub shooting: bool,
}

impl InputState {
    pub fn forward() -> Self {
        Self {
            direction: Vector3::new(0.0, 0.0, 1.0),
            ..Default::default()
        }
    }
}

/// First-person camera with collision-aware movement.
#[derive(Debug, Clone)]
pub struct CameraController {
    pub transform: Transform,
    pub speed: f32,
    pub rotation_speed: f32,
    pub collision_radius: f32,
    blocked: Vec<Vector3>,
}

impl CameraController {
    pub fn new(position: Vector3, speed: f32, rotation_speed: f32, collision_radius: f32) -> Self {
        Self {
            transform: Transform::at(position),
            speed,
            rotation_speed,
            collision_radius,
            blocked: Vec::new(),
        }
    }

    pub fn from_config(position: Vector3, config: &GameConfig) -> Self {
        Self::new(
            position,
            config.camera_speed,
            config.rotation_speed,
            config.collision_radius,
        )
    }

    pub fn position(&self) -> Vector3 {
        self.transform.position
    }

    pub fn yaw(&self) -> f32 {
        self.transform.yaw()
    }

    /// Blocked directions from the last `check_collisions`.
    pub fn blocked_directions(&self) -> &[Vector3] {
        &self.blocked
    }

    /// Unit vector the camera looks along (yaw 0 faces -z).
    pub fn facing(&self) -> Vector3 {
        let yaw = self.yaw();
        Vector3::new(yaw.sin(), 0.0, -yaw.cos())
    }

    /// Recompute blocked directions against `obstacles`.
    ///
    /// Degenerate boxes (entities without geometry yet) are skipped.
    pub fn check_collisions<'a, I>(&mut self, obstacles: I)
    where
        I: IntoIterator<Item = &'a BoundingBox>,
    {
        self.blocked.clear();
        let position = self.position();

        for obstacle in obstacles {
            if obstacle.is_degenerate() {
                continue;
            }
            let toward = (obstacle.center() - position).normalize();
            let probe = position + toward * self.collision_radius;
            if !obstacle.is_colliding(probe) && !obstacle.is_colliding(position) {
                continue;
            }

            let side = blocked_side(obstacle, position);
            if side != Vector3::ZERO && !self.blocked.contains(&side) {
                self.blocked.push(side);
            }
        }
    }

    /// Override the blocked set (tests and scripted scenes).
    pub fn set_blocked_directions(&mut self, blocked: Vec<Vector3>) {
        self.blocked = blocked;
    }

    /// Displacement `move_by` would apply, after blocking.
    pub fn movement_delta(&self, direction: Vector3, dt: f32) -> Vector3 {
        let mut delta = (-direction * self.speed * dt).rotate_y(-self.yaw());
        delta.y = 0.0;

        for b in &self.blocked {
            if opposes(b.x, delta.x) {
                delta.x = 0.0;
            }
            if opposes(b.z, delta.z) {
                delta.z = 0.0;
            }
        }
        delta
    }

    /// Move along the view-frame `direction`, respecting blocked directions.
    pub fn move_by(&mut self, direction: Vector3, dt: f32) -> Vector3 {
        let delta = self.movement_delta(direction, dt);
        self.transform.position += delta;
        delta
    }

    pub fn rotate(&mut self, rotation: f32, dt: f32) {
        self.transform.rotation.y += rotation * self.rotation_speed * dt;
    }

    /// Signed horizontal angle in degrees from the facing vector to `target`.
    ///
    /// Positive means the target is clockwise (to the right, seen from
    /// above with -z forward). Range `[-180, 180]`.
    pub fn angle_to(&self, target: Vector3) -> f32 {
        let facing = self.facing();
        let to_target = target - self.position();
        if to_target.horizontal().length() == 0.0 {
            return 0.0;
        }
        let facing_angle = facing.x.atan2(-facing.z);
        let target_angle = to_target.x.atan2(-to_target.z);
        normalize_degrees((target_angle - facing_angle).to_degrees())
    }
}

/// Face normal the camera presses against.
///
/// Uses `point_side` from the camera position. Beyond a corner only the axis
/// the camera is further outside on counts; the other one only brushes an
/// edge. When the camera is already inside the box, falls back to the
/// dominant axis away from the centre.
fn blocked_side(obstacle: &BoundingBox, position: Vector3) -> Vector3 {
    let side = obstacle.point_side(position);
    if side.x != 0.0 && side.z != 0.0 {
        let edge = obstacle.nearest_point(position);
        let out_x = (position.x - edge.x).abs();
        let out_z = (position.z - edge.z).abs();
        if out_x > out_z {
            return Vector3::new(side.x, 0.0, 0.0);
        }
        if out_z > out_x {
            return Vector3::new(0.0, 0.0, side.z);
        }
    }
    if side != Vector3::ZERO {
        return side;
    }
    let away = position - obstacle.center();
    if away.x.abs() >= away.z.abs() && away.x != 0.0 {
        Vector3::new(away.x.signum(), 0.0, 0.0)
    } else if away.z != 0.0 {
        Vector3::new(0.0, 0.0, away.z.signum())
    } else {
        Vector3::ZERO
    }
}

/// Whether a delta component heads into a face whose normal component is `normal`.
fn opposes(normal: f32, delta: f32) -> bool {
    normal != 0.0 && delta != 0.0 && normal.signum() == -delta.signum()
}
