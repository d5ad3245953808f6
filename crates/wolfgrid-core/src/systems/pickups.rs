//! Pickup system - collect items the camera walks over.

use hecs::{Entity, World};
use wolfgrid_logic::config::GameConfig;
use wolfgrid_logic::level::PickupKind;
use wolfgrid_logic::math::Vector3;

use crate::components::{Pickup, PlayerStatus, Shape};
use crate::events::GameEvent;

/// Collect every pickup within `pickup_radius` of the camera.
///
/// Refused pickups (health at full, ammo at max) stay in the world.
pub fn pickup_system(
    world: &mut World,
    camera_position: Vector3,
    status: &mut PlayerStatus,
    config: &GameConfig,
    events: &mut Vec<GameEvent>,
) {
    let in_reach: Vec<(Entity, PickupKind)> = world
        .query::<(&Shape, &Pickup)>()
        .iter()
        .filter(|(_, (shape, _))| {
            shape.position().horizontal_distance(&camera_position) <= config.pickup_radius
        })
        .map(|(entity, (_, pickup))| (entity, pickup.kind))
        .collect();

    for (entity, kind) in in_reach {
        if !status.apply_pickup(kind) {
            continue;
        }
        if world.despawn(entity).is_ok() {
            log::debug!("collected {:?}", kind);
            events.push(GameEvent::PickupCollected {
                pickup: entity,
                kind,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wolfgrid_logic::collision::LocalExtent;
    use wolfgrid_logic::transform::Transform;

    fn spawn_pickup(world: &mut World, kind: PickupKind, x: f32, z: f32) -> Entity {
        world.spawn((
            Shape::new(
                Transform::at(Vector3::new(x, 0.0, z)),
                LocalExtent::cuboid(50.0, 100.0, 50.0),
            ),
            Pickup::new(kind),
        ))
    }

    #[test]
    fn test_collects_within_radius_only() {
        let mut world = World::new();
        let near = spawn_pickup(&mut world, PickupKind::Chalice, 150.0, 170.0);
        let far = spawn_pickup(&mut world, PickupKind::Chest, 150.0, 350.0);
        let mut status = PlayerStatus::default();
        let mut events = Vec::new();

        pickup_system(
            &mut world,
            Vector3::new(150.0, 0.0, 150.0),
            &mut status,
            &GameConfig::default(),
            &mut events,
        );

        assert!(!world.contains(near));
        assert!(world.contains(far));
        assert_eq!(status.score, 500);
        assert_eq!(
            events,
            vec![GameEvent::PickupCollected {
                pickup: near,
                kind: PickupKind::Chalice
            }]
        );
    }

    #[test]
    fn test_full_health_leaves_first_aid() {
        let mut world = World::new();
        let kit = spawn_pickup(&mut world, PickupKind::Health, 150.0, 150.0);
        let mut status = PlayerStatus::default();
        let mut events = Vec::new();
        let camera = Vector3::new(150.0, 0.0, 150.0);

        pickup_system(&mut world, camera, &mut status, &GameConfig::default(), &mut events);
        assert!(world.contains(kit));
        assert!(events.is_empty());

        status.damage(50);
        pickup_system(&mut world, camera, &mut status, &GameConfig::default(), &mut events);
        assert!(!world.contains(kit));
        assert_eq!(status.health, 75);
    }
}
