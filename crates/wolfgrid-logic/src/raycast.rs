//! Grid raycasting.
//!
//! [`GridRaycaster`] walks the cells a ray passes through, in order, and
//! yields each cell's centre. It never terminates by itself for a non-zero
//! direction, so callers bound it with `take` or use
//! [`GridRaycaster::next_shape`], which stops after `2 * limit` cells.

use crate::constants::raycast::{CORNER_TOLERANCE, MATCH_TOLERANCE, NUDGE};
use crate::level::{cell_center, cell_of};
use crate::math::Vector2;

/// Default step bound used by [`GridRaycaster::next_shape`].
pub const DEFAULT_LIMIT: u32 = 100;

#[derive(Debug, Clone)]
pub struct GridRaycaster {
    point: Vector2,
    direction: Vector2,
    cell: (i32, i32),
    cell_size: f32,
    limit: u32,
    started: bool,
}

impl GridRaycaster {
    /// Ray from `origin` along `direction` (any length; zero stops after the origin cell).
    pub fn from_direction(origin: Vector2, direction: Vector2, cell_size: f32) -> Self {
        Self {
            point: origin,
            direction: direction.normalize(),
            cell: cell_of(origin, cell_size),
            cell_size,
            limit: DEFAULT_LIMIT,
            started: false,
        }
    }

    /// Ray from `origin` through `target`.
    pub fn from_to(origin: Vector2, target: Vector2, cell_size: f32) -> Self {
        Self::from_direction(origin, target - origin, cell_size)
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Cell the ray is currently in.
    pub fn cell(&self) -> (i32, i32) {
        self.cell
    }

    fn is_stalled(&self) -> bool {
        self.direction.x == 0.0 && self.direction.y == 0.0
    }

    /// Ray distance from `from` to the next grid line on one axis.
    fn distance_to_line(&self, from: f32, dir: f32, cell: i32) -> f32 {
        if dir > 0.0 {
            ((cell + 1) as f32 * self.cell_size - from) / dir
        } else if dir < 0.0 {
            (cell as f32 * self.cell_size - from) / dir
        } else {
            f32::INFINITY
        }
    }

    /// Walk at most `2 * limit` cells and return the first shape whose
    /// horizontal position sits on a visited cell centre.
    pub fn next_shape<'s, T, F>(&mut self, shapes: &'s [T], position_of: F) -> Option<&'s T>
    where
        F: Fn(&T) -> Vector2,
    {
        let tolerance = MATCH_TOLERANCE * self.cell_size;
        let steps = self.limit as usize * 2;
        for center in self.by_ref().take(steps) {
            let hit = shapes.iter().find(|shape| {
                let pos = position_of(shape);
                (pos.x - center.x).abs() <= tolerance && (pos.y - center.y).abs() <= tolerance
            });
            if hit.is_some() {
                return hit;
            }
        }
        None
    }
}

impl Iterator for GridRaycaster {
    type Item = Vector2;

    fn next(&mut self) -> Option<Vector2> {
        if !self.started {
            self.started = true;
            return Some(cell_center(self.cell, self.cell_size));
        }
        if self.is_stalled() {
            return None;
        }

        let nudged = self.point + self.direction * (NUDGE * self.cell_size);
        let to_x = self.distance_to_line(nudged.x, self.direction.x, self.cell.0);
        let to_z = self.distance_to_line(nudged.y, self.direction.y, self.cell.1);

        let step_x = self.direction.x.signum() as i32;
        let step_z = self.direction.y.signum() as i32;
        if (to_x - to_z).abs() <= CORNER_TOLERANCE * self.cell_size {
            self.cell.0 += step_x;
            self.cell.1 += step_z;
        } else if to_x < to_z {
            self.cell.0 += step_x;
        } else {
            self.cell.1 += step_z;
        }
        self.point = nudged + self.direction * to_x.min(to_z);

        Some(cell_center(self.cell, self.cell_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f32, y: f32) -> Vector2 {
        Vector2::new(x, y)
    }

    fn cells(ray: GridRaycaster, n: usize) -> Vec<(i32, i32)> {
        ray.take(n).map(|c| cell_of(c, 100.0)).collect()
    }

    #[test]
    fn test_first_item_is_origin_cell() {
        let mut ray = GridRaycaster::from_direction(v(130.0, 270.0), v(1.0, 0.0), 100.0);
        assert_eq!(ray.next(), Some(v(150.0, 250.0)));
    }

    #[test]
    fn test_axis_aligned_steps() {
        let ray = GridRaycaster::from_direction(v(50.0, 50.0), v(1.0, 0.0), 100.0);
        assert_eq!(cells(ray, 4), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);

        let ray = GridRaycaster::from_direction(v(50.0, 50.0), v(0.0, -1.0), 100.0);
        assert_eq!(cells(ray, 3), vec![(0, 0), (0, -1), (0, -2)]);
    }

    #[test]
    fn test_exact_diagonal_steps_through_corner() {
        let ray = GridRaycaster::from_direction(v(50.0, 50.0), v(1.0, 1.0), 100.0);
        assert_eq!(cells(ray, 4), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
    }

    #[test]
    fn test_shallow_angle_visits_every_crossed_cell() {
        // Slope 1/4 from the middle of (0, 0): crosses into z = 1 inside x = 2.
        let ray = GridRaycaster::from_to(v(50.0, 50.0), v(450.0, 150.0), 100.0);
        assert_eq!(cells(ray, 5), vec![(0, 0), (1, 0), (2, 0), (2, 1), (3, 1)]);
    }

    #[test]
    fn test_zero_direction_yields_only_origin() {
        let ray = GridRaycaster::from_direction(v(50.0, 50.0), Vector2::ZERO, 100.0);
        assert_eq!(ray.collect::<Vec<_>>(), vec![v(50.0, 50.0)]);
        let ray = GridRaycaster::from_to(v(10.0, 10.0), v(10.0, 10.0), 100.0);
        assert_eq!(ray.count(), 1);
    }

    #[test]
    fn test_restart_reproduces_sequence() {
        let a: Vec<Vector2> = GridRaycaster::from_direction(v(37.0, 81.0), v(0.3, -0.7), 100.0)
            .take(20)
            .collect();
        let b: Vec<Vector2> = GridRaycaster::from_direction(v(37.0, 81.0), v(0.3, -0.7), 100.0)
            .take(20)
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_consecutive_cells_are_adjacent() {
        let ray = GridRaycaster::from_direction(v(12.0, 88.0), v(-0.6, 0.45), 100.0);
        let visited = cells(ray, 30);
        for pair in visited.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!((a.0 - b.0).abs() <= 1 && (a.1 - b.1).abs() <= 1);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_next_shape_finds_first_on_ray() {
        let shapes = vec![v(450.0, 50.0), v(250.0, 50.0), v(250.0, 150.0)];
        let mut ray = GridRaycaster::from_direction(v(50.0, 50.0), v(1.0, 0.0), 100.0);
        let hit = ray.next_shape(&shapes, |p| *p);
        assert_eq!(hit, Some(&v(250.0, 50.0)));
    }

    #[test]
    fn test_next_shape_is_bounded() {
        let shapes = vec![v(50.0, 50_050.0)];
        let mut ray =
            GridRaycaster::from_direction(v(50.0, 50.0), v(0.0, 1.0), 100.0).with_limit(10);
        assert_eq!(ray.next_shape(&shapes, |p| *p), None);
        // 20 cells consumed, not 500.
        assert_eq!(ray.cell(), (0, 19));
    }

    #[test]
    fn test_next_shape_zero_direction_checks_origin_only() {
        let shapes = vec![v(50.0, 50.0)];
        let mut ray = GridRaycaster::from_direction(v(60.0, 40.0), Vector2::ZERO, 100.0);
        assert!(ray.next_shape(&shapes, |p| *p).is_some());
        let mut ray = GridRaycaster::from_direction(v(60.0, 40.0), Vector2::ZERO, 100.0);
        assert!(ray.next_shape(&[v(150.0, 50.0)], |p| *p).is_none());
    }
}
