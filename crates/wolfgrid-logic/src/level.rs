//! Grid level model: parses a level description into typed fields.
//!
//! A level is a `width × height` grid. Each recognised field sits on one
//! cell; the grid `y` coordinate maps to world `z`. World positions are cell
//! centres: `grid * cell_size + cell_size / 2`.
//!
//! Loading runs one preprocessing pass: walls orthogonally next to a door get
//! a `wall_direction` pointing at that door, so the renderer can pick the
//! door-frame texture. After that the level is immutable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::constants::field_values as tags;
use crate::math::{Vector2, Vector3};

/// Why a level description was rejected. Loading aborts on any of these.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("malformed level JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level grid must be non-empty, got {width}x{height}")]
    EmptyGrid { width: u32, height: u32 },
    #[error("level has no player start")]
    MissingPlayer,
    #[error("level has {0} player starts, expected exactly one")]
    MultiplePlayers(usize),
    #[error("field `{value}` at ({x}, {y}) lies outside the grid")]
    OutOfBounds { value: String, x: i32, y: i32 },
    #[error("more than one field at ({x}, {y})")]
    DuplicateField { x: i32, y: i32 },
}

/// One entry of the raw `fields` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawField {
    pub x: i32,
    pub y: i32,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
}

/// The declarative level description, as fetched from disk or network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDescription {
    pub width: u32,
    pub height: u32,
    pub fields: Vec<RawField>,
}

/// Wall texture variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WallKind {
    Grey,
    Blue,
    Brown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    Ammo,
    DogFood,
    Food,
    Health,
    Machinegun,
    Chaingun,
    Cross,
    Chalice,
    Chest,
    Crown,
    Powerup,
}

/// Typed field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Wall(WallKind),
    Door,
    Player,
    Enemy,
    Pickup(PickupKind),
    Lamp,
}

impl FieldKind {
    /// Parse a `value` tag. Unknown tags return `None` and are dropped by the loader.
    pub fn parse(value: &str) -> Option<Self> {
        let kind = match value {
            tags::WALL => Self::Wall(WallKind::Grey),
            tags::BLUE_WALL => Self::Wall(WallKind::Blue),
            tags::BROWN_WALL => Self::Wall(WallKind::Brown),
            tags::DOOR => Self::Door,
            tags::PLAYER => Self::Player,
            tags::ENEMY => Self::Enemy,
            tags::AMMO => Self::Pickup(PickupKind::Ammo),
            tags::DOG_FOOD => Self::Pickup(PickupKind::DogFood),
            tags::FOOD => Self::Pickup(PickupKind::Food),
            tags::HEALTH => Self::Pickup(PickupKind::Health),
            tags::MACHINEGUN => Self::Pickup(PickupKind::Machinegun),
            tags::CHAINGUN => Self::Pickup(PickupKind::Chaingun),
            tags::CROSS => Self::Pickup(PickupKind::Cross),
            tags::CHALICE => Self::Pickup(PickupKind::Chalice),
            tags::CHEST => Self::Pickup(PickupKind::Chest),
            tags::CROWN => Self::Pickup(PickupKind::Crown),
            tags::POWERUP => Self::Pickup(PickupKind::Powerup),
            tags::LAMP => Self::Lamp,
            _ => return None,
        };
        Some(kind)
    }

    /// The tag this kind was parsed from.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Wall(WallKind::Grey) => tags::WALL,
            Self::Wall(WallKind::Blue) => tags::BLUE_WALL,
            Self::Wall(WallKind::Brown) => tags::BROWN_WALL,
            Self::Door => tags::DOOR,
            Self::Player => tags::PLAYER,
            Self::Enemy => tags::ENEMY,
            Self::Pickup(PickupKind::Ammo) => tags::AMMO,
            Self::Pickup(PickupKind::DogFood) => tags::DOG_FOOD,
            Self::Pickup(PickupKind::Food) => tags::FOOD,
            Self::Pickup(PickupKind::Health) => tags::HEALTH,
            Self::Pickup(PickupKind::Machinegun) => tags::MACHINEGUN,
            Self::Pickup(PickupKind::Chaingun) => tags::CHAINGUN,
            Self::Pickup(PickupKind::Cross) => tags::CROSS,
            Self::Pickup(PickupKind::Chalice) => tags::CHALICE,
            Self::Pickup(PickupKind::Chest) => tags::CHEST,
            Self::Pickup(PickupKind::Crown) => tags::CROWN,
            Self::Pickup(PickupKind::Powerup) => tags::POWERUP,
            Self::Lamp => tags::LAMP,
        }
    }

    /// Whether the pathfinder may route through a cell holding this field.
    ///
    /// Doors are always walkable; walls never are. Everything else is on the
    /// non-colliding allowlist.
    pub fn is_walkable(&self) -> bool {
        !matches!(self, Self::Wall(_))
    }

    /// Walls and doors block camera movement.
    pub fn is_obstacle(&self) -> bool {
        matches!(self, Self::Wall(_) | Self::Door)
    }
}

/// A typed field on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridField {
    pub x: i32,
    pub y: i32,
    pub kind: FieldKind,
    /// Placement rotation in degrees, if the description gave one.
    pub rotation: Option<f32>,
    /// For walls next to a door: grid offset from this wall to the door.
    pub wall_direction: Option<[i32; 2]>,
}

impl GridField {
    pub fn cell(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Cell centre in world space (y = 0).
    pub fn world_position(&self, cell_size: f32) -> Vector3 {
        Vector3::new(
            self.x as f32 * cell_size + cell_size / 2.0,
            0.0,
            self.y as f32 * cell_size + cell_size / 2.0,
        )
    }

    pub fn is_near_door(&self) -> bool {
        self.wall_direction.is_some()
    }
}

/// A loaded, validated level.
#[derive(Debug, Clone)]
pub struct Level {
    width: u32,
    height: u32,
    fields: Vec<GridField>,
    by_cell: HashMap<(i32, i32), usize>,
    player: usize,
}

impl Level {
    /// Parse and validate a JSON level description.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let description: LevelDescription = serde_json::from_str(json)?;
        Self::from_description(description)
    }

    /// Validate a description, drop unknown fields and derive door adjacency.
    pub fn from_description(description: LevelDescription) -> Result<Self, LevelError> {
        let LevelDescription {
            width,
            height,
            fields: raw_fields,
        } = description;

        if width == 0 || height == 0 {
            return Err(LevelError::EmptyGrid { width, height });
        }

        let mut fields = Vec::with_capacity(raw_fields.len());
        let mut by_cell = HashMap::with_capacity(raw_fields.len());
        let mut dropped = 0usize;

        for raw in raw_fields {
            let Some(kind) = FieldKind::parse(&raw.value) else {
                log::debug!(
                    "ignoring unrecognised field `{}` at ({}, {})",
                    raw.value,
                    raw.x,
                    raw.y
                );
                dropped += 1;
                continue;
            };
            if raw.x < 0 || raw.y < 0 || raw.x >= width as i32 || raw.y >= height as i32 {
                return Err(LevelError::OutOfBounds {
                    value: raw.value,
                    x: raw.x,
                    y: raw.y,
                });
            }
            if by_cell.insert((raw.x, raw.y), fields.len()).is_some() {
                return Err(LevelError::DuplicateField { x: raw.x, y: raw.y });
            }
            fields.push(GridField {
                x: raw.x,
                y: raw.y,
                kind,
                rotation: raw.rotation,
                wall_direction: None,
            });
        }

        let players: Vec<usize> = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.kind == FieldKind::Player)
            .map(|(idx, _)| idx)
            .collect();
        let player = match players.as_slice() {
            [] => return Err(LevelError::MissingPlayer),
            [idx] => *idx,
            many => return Err(LevelError::MultiplePlayers(many.len())),
        };

        let mut level = Self {
            width,
            height,
            fields,
            by_cell,
            player,
        };
        level.derive_door_adjacency();

        log::info!(
            "loaded {}x{} level: {} walls, {} doors, {} enemies, {} pickups ({} fields ignored)",
            level.width,
            level.height,
            level.walls().count(),
            level.doors().count(),
            level.enemies().count(),
            level.pickups().count(),
            dropped
        );
        Ok(level)
    }

    /// Tag every wall orthogonally adjacent to a door (first of N, E, S, W).
    fn derive_door_adjacency(&mut self) {
        const NEIGHBOURS: [[i32; 2]; 4] = [[0, -1], [1, 0], [0, 1], [-1, 0]];

        let directions: Vec<(usize, [i32; 2])> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| matches!(f.kind, FieldKind::Wall(_)))
            .filter_map(|(idx, wall)| {
                NEIGHBOURS
                    .iter()
                    .find(|[dx, dy]| {
                        self.field_at(wall.x + dx, wall.y + dy)
                            .is_some_and(|n| n.kind == FieldKind::Door)
                    })
                    .map(|dir| (idx, *dir))
            })
            .collect();

        for (idx, dir) in directions {
            self.fields[idx].wall_direction = Some(dir);
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// All recognised fields, in description order.
    pub fn fields(&self) -> &[GridField] {
        &self.fields
    }

    pub fn field_at(&self, x: i32, y: i32) -> Option<&GridField> {
        self.by_cell.get(&(x, y)).map(|&idx| &self.fields[idx])
    }

    pub fn walls(&self) -> impl Iterator<Item = &GridField> {
        self.fields.iter().filter(|f| matches!(f.kind, FieldKind::Wall(_)))
    }

    pub fn doors(&self) -> impl Iterator<Item = &GridField> {
        self.of_kind(FieldKind::Door)
    }

    pub fn enemies(&self) -> impl Iterator<Item = &GridField> {
        self.of_kind(FieldKind::Enemy)
    }

    pub fn pickups(&self) -> impl Iterator<Item = &GridField> {
        self.fields.iter().filter(|f| matches!(f.kind, FieldKind::Pickup(_)))
    }

    pub fn decorations(&self) -> impl Iterator<Item = &GridField> {
        self.of_kind(FieldKind::Lamp)
    }

    /// The single player start; validated at load.
    pub fn player(&self) -> &GridField {
        &self.fields[self.player]
    }

    fn of_kind(&self, kind: FieldKind) -> impl Iterator<Item = &GridField> {
        self.fields.iter().filter(move |f| f.kind == kind)
    }

    /// Yaw (radians) a door should be placed with.
    ///
    /// Uses the field's rotation when given. Otherwise a door with walls
    /// to its north and south faces along x (90°), else along z (0°).
    pub fn door_yaw(&self, door: &GridField) -> f32 {
        if let Some(degrees) = door.rotation {
            return degrees.to_radians();
        }
        let is_wall = |x: i32, y: i32| {
            self.field_at(x, y)
                .is_some_and(|f| matches!(f.kind, FieldKind::Wall(_)))
        };
        if is_wall(door.x, door.y - 1) && is_wall(door.x, door.y + 1) {
            std::f32::consts::FRAC_PI_2
        } else {
            0.0
        }
    }
}

/// Grid cell containing a horizontal world position.
pub fn cell_of(position: Vector2, cell_size: f32) -> (i32, i32) {
    (
        (position.x / cell_size).floor() as i32,
        (position.y / cell_size).floor() as i32,
    )
}

/// Centre of a grid cell on the horizontal plane.
pub fn cell_center(cell: (i32, i32), cell_size: f32) -> Vector2 {
    Vector2::new(
        cell.0 as f32 * cell_size + cell_size / 2.0,
        cell.1 as f32 * cell_size + cell_size / 2.0,
    )
}
