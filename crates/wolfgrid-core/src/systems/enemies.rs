//! Enemy AI - chase the player along A* paths, open doors, shoot on sight.

use std::collections::HashMap;

use hecs::{Entity, World};
use rand::Rng;
use wolfgrid_logic::collision::{BoundingBox, LocalExtent};
use wolfgrid_logic::config::GameConfig;
use wolfgrid_logic::level::cell_of;
use wolfgrid_logic::math::{Vector2, Vector3};
use wolfgrid_logic::pathfinding::Pathfinder;
use wolfgrid_logic::transform::Transform;

use super::sight::{has_line_of_sight, sight_blockers};
use crate::components::{Door, DoorState, Enemy, EnemyState, GridCell, Obstacle, Shape};
use crate::events::GameEvent;

/// Advance every enemy by `delta_seconds`. Returns the damage dealt to the
/// player this tick.
///
/// Walking enemies re-plan every tick; an empty path means hold position.
/// A closed door on the next waypoint is opened and the enemy waits for it.
/// Enemies never step into the player's footprint (a square of side
/// `2 * collision_radius` around the camera).
pub fn enemy_system(
    world: &mut World,
    pathfinder: &mut Pathfinder,
    player_position: Vector3,
    config: &GameConfig,
    delta_seconds: f32,
    rng: &mut impl Rng,
    events: &mut Vec<GameEvent>,
) -> u32 {
    let cs = config.cell_size;
    let player = player_position.horizontal();
    let player_cell = cell_of(player, cs);
    let footprint = player_footprint(player_position, config.collision_radius);
    let blockers = sight_blockers(world, cs);
    let doors: HashMap<(i32, i32), (Entity, bool)> = world
        .query::<(&Door, &GridCell)>()
        .iter()
        .map(|(entity, (door, cell))| (cell.as_tuple(), (entity, door.is_passable())))
        .collect();

    let mut door_requests: Vec<Entity> = Vec::new();
    let mut died: Vec<Entity> = Vec::new();
    let mut damage = 0u32;

    for (entity, (enemy, shape)) in world.query_mut::<(&mut Enemy, &mut Shape)>() {
        enemy.cooldown = (enemy.cooldown - delta_seconds).max(0.0);
        match enemy.state {
            EnemyState::Dead => continue,
            EnemyState::Dying => {
                enemy.state_timer -= delta_seconds;
                if enemy.state_timer <= 0.0 {
                    enemy.state = EnemyState::Dead;
                    died.push(entity);
                }
                continue;
            }
            EnemyState::Hit | EnemyState::Shooting => {
                enemy.state_timer -= delta_seconds;
                if enemy.state_timer <= 0.0 {
                    enemy.state = EnemyState::Walking;
                }
                continue;
            }
            EnemyState::Walking => {}
        }

        let position = shape.ground_position();
        let cell = cell_of(position, cs);
        let distance = (cell.0 - player_cell.0)
            .abs()
            .max((cell.1 - player_cell.1).abs());

        if enemy.cooldown <= 0.0
            && distance <= config.enemy_sight_range as i32
            && has_line_of_sight(&blockers, position, player, cs, config.enemy_sight_range)
        {
            let hit = rng.gen::<f64>() < config.enemy_hit_chance;
            if hit {
                damage += config.enemy_damage;
            }
            enemy.state = EnemyState::Shooting;
            enemy.state_timer = config.enemy_shoot_duration;
            enemy.cooldown = config.enemy_fire_cooldown;
            enemy.path.clear();
            shape.transform.rotation.y = yaw_toward(position, player);
            events.push(GameEvent::EnemyFired { enemy: entity, hit });
            continue;
        }

        enemy.path = pathfinder.get_path(position, player);
        let Some(&next) = enemy.path.first() else {
            continue;
        };
        if let Some(&(door, passable)) = doors.get(&cell_of(next, cs)) {
            if !passable {
                if !door_requests.contains(&door) {
                    door_requests.push(door);
                }
                continue;
            }
        }

        // The last waypoint lies on the player; aim for the near corner of
        // the footprint instead and stop before touching it.
        let target = if footprint.is_colliding(next.to_vector3(0.0)) {
            footprint.nearest_corner(shape.position()).horizontal()
        } else {
            next
        };
        let moved = step_toward(position, target, config.enemy_speed * delta_seconds);
        let mut ahead = *shape;
        ahead.transform.position.x = moved.x;
        ahead.transform.position.z = moved.y;
        if ahead.bounding_box().overlaps(&footprint) {
            shape.transform.rotation.y = yaw_toward(position, player);
            continue;
        }
        ahead.transform.rotation.y = yaw_toward(position, target);
        *shape = ahead;
    }

    for door in door_requests {
        let Ok(mut panel) = world.get::<&mut Door>(door) else {
            continue;
        };
        if panel.state != DoorState::Opening && panel.toggle() {
            log::debug!("enemy opened door {:?}", door);
            events.push(GameEvent::DoorToggled {
                door,
                state: panel.state,
            });
        }
    }
    for entity in died {
        // Corpses stay for the renderer but no longer block the camera.
        let _ = world.remove_one::<Obstacle>(entity);
    }
    damage
}

/// Square the camera occupies for enemy spacing.
fn player_footprint(player_position: Vector3, collision_radius: f32) -> BoundingBox {
    let side = 2.0 * collision_radius;
    BoundingBox::new(
        &Transform::at(player_position),
        &LocalExtent::cuboid(side, side, side),
    )
}

/// Move at most `max_step` from `from` toward `to`, snapping on arrival.
fn step_toward(from: Vector2, to: Vector2, max_step: f32) -> Vector2 {
    let offset = to - from;
    let distance = offset.length();
    if distance <= max_step || distance == 0.0 {
        to
    } else {
        from + offset * (max_step / distance)
    }
}

/// Yaw (yaw 0 faces -z) that looks from `from` toward `to`.
fn yaw_toward(from: Vector2, to: Vector2) -> f32 {
    let d = to - from;
    d.x.atan2(-d.y)
}
