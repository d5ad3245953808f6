//! Player systems - camera movement, door interaction, shooting.

use hecs::World;
use wolfgrid_logic::collision::BoundingBox;
use wolfgrid_logic::config::GameConfig;
use wolfgrid_logic::constants::ENEMY_KILL_POINTS;
use wolfgrid_logic::level::cell_of;
use wolfgrid_logic::movement::{CameraController, InputState};
use wolfgrid_logic::raycast::GridRaycaster;

use super::sight::{enemy_targets, first_on_ray, sight_blockers, RayTarget, SightTarget};
use crate::components::{Door, Enemy, GridCell, Obstacle, PlayerStatus, Shape};
use crate::events::GameEvent;

/// Bounding boxes of everything the camera collides with.
pub fn obstacle_boxes(world: &World) -> Vec<BoundingBox> {
    world
        .query::<(&Shape, &Obstacle)>()
        .iter()
        .map(|(_, (shape, _))| shape.bounding_box())
        .collect()
}

/// Rotate, block against obstacles, then move.
pub fn player_movement_system(
    world: &World,
    camera: &mut CameraController,
    input: &InputState,
    delta_seconds: f32,
) {
    camera.rotate(input.rotation, delta_seconds);
    let obstacles = obstacle_boxes(world);
    camera.check_collisions(obstacles.iter());
    camera.move_by(input.direction, delta_seconds);
}

fn ray_from_camera(camera: &CameraController, cell_size: f32) -> GridRaycaster {
    GridRaycaster::from_direction(
        camera.position().horizontal(),
        camera.facing().horizontal(),
        cell_size,
    )
}

/// Toggle the door the camera faces, if it is within `interact_range` cells.
pub fn interact_system(
    world: &mut World,
    camera: &CameraController,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) {
    let cs = config.cell_size;
    // Doors in any state can be toggled, so list them all, not just blockers.
    let mut targets: Vec<RayTarget> = sight_blockers(world, cs)
        .into_iter()
        .filter(|(target, _)| *target == SightTarget::Wall)
        .collect();
    targets.extend(
        world
            .query::<(&Door, &GridCell)>()
            .iter()
            .map(|(entity, (door, _))| (SightTarget::Door(entity), door.home.horizontal())),
    );

    let mut ray = ray_from_camera(camera, cs).with_limit(config.interact_range.max(1));
    let Some(SightTarget::Door(entity)) = first_on_ray(&mut ray, &targets) else {
        return;
    };

    let camera_cell = cell_of(camera.position().horizontal(), cs);
    let Ok(mut door) = world.get::<&mut Door>(entity) else {
        return;
    };
    let door_cell = cell_of(door.home.horizontal(), cs);
    let reach = (door_cell.0 - camera_cell.0)
        .abs()
        .max((door_cell.1 - camera_cell.1).abs());
    if reach > config.interact_range as i32 {
        return;
    }
    if door.toggle() {
        log::debug!("player toggled door {:?} -> {:?}", entity, door.state);
        events.push(GameEvent::DoorToggled {
            door: entity,
            state: door.state,
        });
    }
}

/// Fire one round along the camera's facing.
///
/// The first live enemy in a cell before any wall or closed door takes
/// `player_damage`. Does nothing without ammo.
pub fn shooting_system(
    world: &mut World,
    camera: &CameraController,
    status: &mut PlayerStatus,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) {
    if status.ammo == 0 {
        log::debug!("shot attempted with no ammo");
        return;
    }
    status.ammo -= 1;

    let cs = config.cell_size;
    // Enemies first: an enemy standing in an open doorway is hit, not the door.
    let mut targets = enemy_targets(world, cs);
    targets.extend(sight_blockers(world, cs));

    let mut ray = ray_from_camera(camera, cs).with_limit(config.raycast_limit);
    let hit = match first_on_ray(&mut ray, &targets) {
        Some(SightTarget::Enemy(entity)) => Some(entity),
        _ => None,
    };
    events.push(GameEvent::ShotFired {
        hit,
        ammo_left: status.ammo,
    });

    let Some(entity) = hit else {
        return;
    };
    let Ok(mut enemy) = world.get::<&mut Enemy>(entity) else {
        return;
    };
    let killed = enemy.take_damage(
        config.player_damage,
        config.hit_duration,
        config.dying_duration,
    );
    if killed {
        status.add_score(ENEMY_KILL_POINTS);
        log::debug!("enemy {:?} killed", entity);
        events.push(GameEvent::EnemyKilled(entity));
    } else {
        events.push(GameEvent::EnemyHit {
            enemy: entity,
            hp: enemy.hp,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{DoorState, EnemyState, Wall};
    use wolfgrid_logic::collision::LocalExtent;
    use wolfgrid_logic::level::WallKind;
    use wolfgrid_logic::math::Vector3;
    use wolfgrid_logic::transform::Transform;

    fn spawn_wall(world: &mut World, x: i32, y: i32) {
        let pos = Vector3::new(x as f32 * 100.0 + 50.0, 0.0, y as f32 * 100.0 + 50.0);
        world.spawn((
            Shape::new(Transform::at(pos), LocalExtent::cuboid(100.0, 100.0, 100.0)),
            Obstacle,
            Wall {
                kind: WallKind::Grey,
                toward_door: None,
            },
            GridCell::new(x, y),
        ));
    }

    fn spawn_door(world: &mut World, x: i32, y: i32) -> hecs::Entity {
        let pos = Vector3::new(x as f32 * 100.0 + 50.0, 0.0, y as f32 * 100.0 + 50.0);
        world.spawn((
            Shape::new(Transform::at(pos), LocalExtent::cuboid(100.0, 100.0, 10.0)),
            Obstacle,
            Door::new(pos, 0.0),
            GridCell::new(x, y),
        ))
    }

    fn spawn_enemy(world: &mut World, x: i32, y: i32) -> hecs::Entity {
        let pos = Vector3::new(x as f32 * 100.0 + 50.0, 0.0, y as f32 * 100.0 + 50.0);
        world.spawn((
            Shape::new(Transform::at(pos), LocalExtent::cuboid(50.0, 100.0, 50.0)),
            Obstacle,
            Enemy::new(25, 0.0),
        ))
    }

    /// Camera at the centre of `(x, y)` facing -z.
    fn camera_at(x: i32, y: i32) -> CameraController {
        let pos = Vector3::new(x as f32 * 100.0 + 50.0, 0.0, y as f32 * 100.0 + 50.0);
        CameraController::from_config(pos, &GameConfig::default())
    }

    #[test]
    fn test_interact_opens_adjacent_door() {
        let mut world = World::new();
        let door = spawn_door(&mut world, 2, 1);
        let camera = camera_at(2, 2);
        let mut events = Vec::new();

        interact_system(&mut world, &camera, &GameConfig::default(), &mut events);

        assert_eq!(world.get::<&Door>(door).unwrap().state, DoorState::Opening);
        assert_eq!(
            events,
            vec![GameEvent::DoorToggled {
                door,
                state: DoorState::Opening
            }]
        );
    }

    #[test]
    fn test_interact_ignores_distant_door() {
        let mut world = World::new();
        let door = spawn_door(&mut world, 2, 0);
        let camera = camera_at(2, 3);
        let mut events = Vec::new();

        interact_system(&mut world, &camera, &GameConfig::default(), &mut events);

        assert_eq!(world.get::<&Door>(door).unwrap().state, DoorState::Closed);
        assert!(events.is_empty());
    }

    #[test]
    fn test_shot_hits_enemy_in_line() {
        let mut world = World::new();
        let enemy = spawn_enemy(&mut world, 1, 0);
        let camera = camera_at(1, 4);
        let mut status = PlayerStatus::default();
        let mut events = Vec::new();

        shooting_system(&mut world, &camera, &mut status, &GameConfig::default(), &mut events);

        assert_eq!(status.ammo, 7);
        let hit = world.get::<&Enemy>(enemy).unwrap();
        assert_eq!(hit.state, EnemyState::Hit);
        assert_eq!(hit.hp, 15);
        assert_eq!(events[0], GameEvent::ShotFired { hit: Some(enemy), ammo_left: 7 });
    }

    #[test]
    fn test_wall_stops_bullet() {
        let mut world = World::new();
        let enemy = spawn_enemy(&mut world, 1, 0);
        spawn_wall(&mut world, 1, 2);
        let camera = camera_at(1, 4);
        let mut status = PlayerStatus::default();
        let mut events = Vec::new();

        shooting_system(&mut world, &camera, &mut status, &GameConfig::default(), &mut events);

        assert_eq!(world.get::<&Enemy>(enemy).unwrap().hp, 25);
        assert_eq!(events, vec![GameEvent::ShotFired { hit: None, ammo_left: 7 }]);
    }

    #[test]
    fn test_closed_door_stops_bullet() {
        let mut world = World::new();
        let enemy = spawn_enemy(&mut world, 1, 0);
        spawn_door(&mut world, 1, 2);
        let camera = camera_at(1, 4);
        let mut status = PlayerStatus::default();
        let mut events = Vec::new();

        shooting_system(&mut world, &camera, &mut status, &GameConfig::default(), &mut events);
        assert_eq!(world.get::<&Enemy>(enemy).unwrap().hp, 25);
    }

    #[test]
    fn test_no_ammo_no_shot() {
        let mut world = World::new();
        spawn_enemy(&mut world, 1, 0);
        let camera = camera_at(1, 4);
        let mut status = PlayerStatus {
            ammo: 0,
            ..Default::default()
        };
        let mut events = Vec::new();

        shooting_system(&mut world, &camera, &mut status, &GameConfig::default(), &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_movement_blocked_by_wall() {
        let mut world = World::new();
        spawn_wall(&mut world, 1, 0);
        let mut camera = camera_at(1, 1);
        for _ in 0..120 {
            player_movement_system(&world, &mut camera, &InputState::forward(), 1.0 / 60.0);
        }
        // Stops a collision radius short of the wall face at z = 100.
        assert!(camera.position().z >= 118.0);
        assert!(camera.position().z <= 121.0);
    }
}
