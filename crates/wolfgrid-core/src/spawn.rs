//! Level spawning - turns a validated `Level` into ECS entities.

use hecs::{Entity, World};
use wolfgrid_logic::collision::LocalExtent;
use wolfgrid_logic::config::GameConfig;
use wolfgrid_logic::level::{FieldKind, GridField, Level};
use wolfgrid_logic::math::Vector3;
use wolfgrid_logic::transform::Transform;

use crate::components::{
    Decoration, Door, Enemy, GridCell, Interactable, Obstacle, Pickup, Shape, Wall,
};

/// Door panels are a tenth of a cell thick.
const DOOR_DEPTH_RATIO: f32 = 0.1;
/// Enemies and items occupy half a cell.
const SPRITE_RATIO: f32 = 0.5;

/// Entities created for a level, grouped by category.
#[derive(Debug, Clone, Default)]
pub struct LevelLayout {
    pub walls: Vec<Entity>,
    pub doors: Vec<Entity>,
    pub enemies: Vec<Entity>,
    pub pickups: Vec<Entity>,
    pub decorations: Vec<Entity>,
    /// Camera start position (cell centre of the player field).
    pub player_start: Vector3,
    /// Camera start yaw in radians.
    pub player_yaw: f32,
}

fn cell(field: &GridField) -> GridCell {
    GridCell::new(field.x, field.y)
}

/// Spawn every field of `level` into `world`.
pub fn spawn_level(world: &mut World, level: &Level, config: &GameConfig) -> LevelLayout {
    let cs = config.cell_size;
    let sprite = LocalExtent::cuboid(cs * SPRITE_RATIO, cs, cs * SPRITE_RATIO);
    let mut layout = LevelLayout::default();

    for field in level.fields() {
        let position = field.world_position(cs);
        match field.kind {
            FieldKind::Wall(kind) => {
                let shape = Shape::new(
                    Transform::at(position),
                    LocalExtent::cuboid(cs, cs, cs),
                );
                let wall = Wall {
                    kind,
                    toward_door: field.wall_direction,
                };
                layout
                    .walls
                    .push(world.spawn((shape, Obstacle, wall, cell(field))));
            }
            FieldKind::Door => {
                let yaw = level.door_yaw(field);
                let shape = Shape::new(
                    Transform::at(position).with_yaw(yaw),
                    LocalExtent::cuboid(cs, cs, cs * DOOR_DEPTH_RATIO),
                );
                let door = Door::new(position, yaw);
                layout.doors.push(world.spawn((
                    shape,
                    Obstacle,
                    door,
                    Interactable,
                    cell(field),
                )));
            }
            FieldKind::Enemy => {
                let yaw = field.rotation.unwrap_or(0.0).to_radians();
                let shape = Shape::new(Transform::at(position).with_yaw(yaw), sprite);
                let enemy = Enemy::new(config.enemy_hp, config.enemy_fire_cooldown);
                layout.enemies.push(world.spawn((shape, Obstacle, enemy)));
            }
            FieldKind::Pickup(kind) => {
                let shape = Shape::new(Transform::at(position), sprite);
                layout
                    .pickups
                    .push(world.spawn((shape, Pickup::new(kind), cell(field))));
            }
            FieldKind::Lamp => {
                let shape = Shape::new(Transform::at(position), sprite);
                layout
                    .decorations
                    .push(world.spawn((shape, Decoration, cell(field))));
            }
            FieldKind::Player => {
                layout.player_start = position;
                layout.player_yaw = field.rotation.unwrap_or(0.0).to_radians();
            }
        }
    }

    log::info!(
        "spawned {} walls, {} doors, {} enemies, {} pickups, {} decorations",
        layout.walls.len(),
        layout.doors.len(),
        layout.enemies.len(),
        layout.pickups.len(),
        layout.decorations.len()
    );
    layout
}
