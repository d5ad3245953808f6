//! Static level geometry: walls, doors, decorations.

use serde::{Deserialize, Serialize};
use wolfgrid_logic::collision::{BoundingBox, LocalExtent};
use wolfgrid_logic::level::WallKind;
use wolfgrid_logic::math::{Vector2, Vector3};
use wolfgrid_logic::transform::Transform;

/// Placement and local geometry shared by every visible entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub transform: Transform,
    pub extent: LocalExtent,
}

impl Shape {
    pub fn new(transform: Transform, extent: LocalExtent) -> Self {
        Self { transform, extent }
    }

    pub fn position(&self) -> Vector3 {
        self.transform.position
    }

    /// Position on the x/z plane.
    pub fn ground_position(&self) -> Vector2 {
        self.transform.position.horizontal()
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(&self.transform, &self.extent)
    }
}

/// Grid cell an entity was spawned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn as_tuple(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

/// Marker: the camera collides with this entity's shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle;

/// Marker: the player can toggle this entity by interacting with it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interactable;

/// Marker: non-colliding scenery such as lamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wall {
    pub kind: WallKind,
    /// Grid offset to an adjacent door; the renderer uses a door-frame texture.
    pub toward_door: Option<[i32; 2]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DoorState {
    Closed,
    Opening,
    Open,
    Closing,
}

/// A sliding door.
///
/// `progress` runs from 0 (closed, panel on its home cell) to 1 (open, panel
/// slid one full cell along `slide_axis`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Door {
    pub state: DoorState,
    pub progress: f32,
    /// Seconds left before an open door tries to close.
    pub open_timer: f32,
    /// Panel position when closed.
    pub home: Vector3,
    /// Unit direction the panel slides when opening.
    pub slide_axis: Vector3,
}

impl Door {
    pub fn new(home: Vector3, yaw: f32) -> Self {
        Self {
            state: DoorState::Closed,
            progress: 0.0,
            open_timer: 0.0,
            home,
            slide_axis: Vector3::new(yaw.cos(), 0.0, yaw.sin()),
        }
    }

    /// Player or enemy used the door. Returns whether anything changed.
    ///
    /// An open door is not closed directly: its timer is expired so the door
    /// system closes it next tick, unless someone stands in the doorway.
    pub fn toggle(&mut self) -> bool {
        match self.state {
            DoorState::Closed | DoorState::Closing => {
                self.state = DoorState::Opening;
                true
            }
            DoorState::Open => {
                self.open_timer = 0.0;
                true
            }
            DoorState::Opening => false,
        }
    }

    /// Whether the doorway can be passed and seen through.
    pub fn is_passable(&self) -> bool {
        self.state == DoorState::Open
    }

    /// Current panel position for `progress`.
    pub fn panel_position(&self, cell_size: f32) -> Vector3 {
        self.home + self.slide_axis * (self.progress * cell_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_door_toggle_transitions() {
        let mut door = Door::new(Vector3::new(150.0, 0.0, 150.0), 0.0);
        assert!(door.toggle());
        assert_eq!(door.state, DoorState::Opening);
        assert!(!door.toggle());

        door.state = DoorState::Open;
        door.open_timer = 3.0;
        assert!(door.toggle());
        assert_eq!(door.state, DoorState::Open);
        assert_eq!(door.open_timer, 0.0);

        door.state = DoorState::Closing;
        assert!(door.toggle());
        assert_eq!(door.state, DoorState::Opening);
    }

    #[test]
    fn test_door_slides_along_axis() {
        let mut door = Door::new(Vector3::new(150.0, 0.0, 150.0), 0.0);
        door.progress = 0.5;
        let pos = door.panel_position(100.0);
        assert!((pos.x - 200.0).abs() < 0.01);
        assert!((pos.z - 150.0).abs() < 0.01);

        let mut door = Door::new(Vector3::new(150.0, 0.0, 150.0), std::f32::consts::FRAC_PI_2);
        door.progress = 1.0;
        let pos = door.panel_position(100.0);
        assert!((pos.x - 150.0).abs() < 0.01);
        assert!((pos.z - 250.0).abs() < 0.01);
    }

    #[test]
    fn test_shape_bounding_box_follows_transform() {
        let shape = Shape::new(
            Transform::at(Vector3::new(50.0, 0.0, 50.0)),
            LocalExtent::cuboid(100.0, 100.0, 100.0),
        );
        let bb = shape.bounding_box();
        assert!(bb.is_colliding(Vector3::new(0.0, 0.0, 100.0)));
        assert!(!bb.is_colliding(Vector3::new(101.0, 0.0, 50.0)));
        assert_eq!(shape.ground_position(), Vector2::new(50.0, 50.0));
    }
}
