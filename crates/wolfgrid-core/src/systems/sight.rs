//! Ray targets shared by the player's gun, door interaction and enemy sight.

use hecs::{Entity, World};
use wolfgrid_logic::level::{cell_center, cell_of};
use wolfgrid_logic::math::Vector2;
use wolfgrid_logic::raycast::GridRaycaster;

use crate::components::{Door, Enemy, GridCell, Shape, Wall};

/// What a ray stopped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SightTarget {
    Wall,
    Door(Entity),
    Enemy(Entity),
    Player,
}

/// A target and the cell centre it occupies.
pub type RayTarget = (SightTarget, Vector2);

/// Walls plus every door that is not fully open.
pub fn sight_blockers(world: &World, cell_size: f32) -> Vec<RayTarget> {
    let mut targets: Vec<RayTarget> = world
        .query::<(&Wall, &GridCell)>()
        .iter()
        .map(|(_, (_, cell))| (SightTarget::Wall, cell_center(cell.as_tuple(), cell_size)))
        .collect();
    targets.extend(
        world
            .query::<(&Door, &GridCell)>()
            .iter()
            .filter(|(_, (door, _))| !door.is_passable())
            .map(|(entity, (_, cell))| {
                (SightTarget::Door(entity), cell_center(cell.as_tuple(), cell_size))
            }),
    );
    targets
}

/// Live enemies, snapped to the centre of the cell they stand in.
pub fn enemy_targets(world: &World, cell_size: f32) -> Vec<RayTarget> {
    world
        .query::<(&Enemy, &Shape)>()
        .iter()
        .filter(|(_, (enemy, _))| enemy.is_alive())
        .map(|(entity, (_, shape))| {
            let cell = cell_of(shape.ground_position(), cell_size);
            (SightTarget::Enemy(entity), cell_center(cell, cell_size))
        })
        .collect()
}

/// First target the ray reaches within `2 * ray.limit()` cells.
pub fn first_on_ray(ray: &mut GridRaycaster, targets: &[RayTarget]) -> Option<SightTarget> {
    ray.next_shape(targets, |(_, position)| *position)
        .map(|(target, _)| *target)
}

/// Whether a ray from `from` reaches the cell of `to` before any blocker.
pub fn has_line_of_sight(
    blockers: &[RayTarget],
    from: Vector2,
    to: Vector2,
    cell_size: f32,
    limit: u32,
) -> bool {
    let mut targets = Vec::with_capacity(blockers.len() + 1);
    targets.push((SightTarget::Player, cell_center(cell_of(to, cell_size), cell_size)));
    targets.extend_from_slice(blockers);

    let mut ray = GridRaycaster::from_to(from, to, cell_size).with_limit(limit);
    first_on_ray(&mut ray, &targets) == Some(SightTarget::Player)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall(x: i32, y: i32) -> RayTarget {
        (SightTarget::Wall, cell_center((x, y), 100.0))
    }

    #[test]
    fn test_clear_line_of_sight() {
        let blockers = vec![wall(2, 0), wall(0, 2)];
        assert!(has_line_of_sight(
            &blockers,
            Vector2::new(150.0, 150.0),
            Vector2::new(450.0, 150.0),
            100.0,
            10
        ));
    }

    #[test]
    fn test_wall_blocks_line_of_sight() {
        let blockers = vec![wall(3, 1)];
        assert!(!has_line_of_sight(
            &blockers,
            Vector2::new(150.0, 150.0),
            Vector2::new(550.0, 150.0),
            100.0,
            10
        ));
    }

    #[test]
    fn test_line_of_sight_respects_limit() {
        assert!(!has_line_of_sight(
            &[],
            Vector2::new(50.0, 50.0),
            Vector2::new(50.0, 1050.0),
            100.0,
            3
        ));
    }

    #[test]
    fn test_same_cell_is_visible() {
        assert!(has_line_of_sight(
            &[wall(1, 0)],
            Vector2::new(20.0, 20.0),
            Vector2::new(80.0, 70.0),
            100.0,
            1
        ));
    }
}
