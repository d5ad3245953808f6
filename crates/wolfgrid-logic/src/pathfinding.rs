//! A* pathfinding on a subdivided level grid.
//!
//! Each level cell is split into `subdivisions × subdivisions` sub-cells so
//! enemies can walk around partial obstructions and line up with doors. The
//! search is classic integer A*:
//!
//! - 8 neighbours, orthogonal cost 10, diagonal cost 14
//! - heuristic `(|dx| + |dy|) * 10`
//! - unordered open list; the first node with the lowest `f` wins ties
//! - a closed set of expanded cells
//!
//! Nodes are pooled per level load and keyed by sub-cell, so repeated
//! per-tick queries don't re-allocate. Search state on a pooled node is
//! reset lazily the first time a new search touches it.
//!
//! Every query is bounded by `max_expansions`; exhausting it is treated like
//! an unreachable goal.

use std::collections::{HashMap, HashSet};

use crate::config::GameConfig;
use crate::constants::path_costs;
use crate::level::Level;
use crate::math::Vector2;

/// Sub-grid cell coordinates.
pub type SubCell = (i32, i32);

const NEIGHBOURS: [(i32, i32); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// One step of a found path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    /// Sub-cell centre in world x/z.
    pub position: Vector2,
    pub cell: SubCell,
    /// Accumulated path cost from the start (g).
    pub cost: u32,
}

/// Pooled search node.
#[derive(Debug, Clone)]
struct PathField {
    cell: SubCell,
    walkable: bool,
    parent: Option<usize>,
    g: u32,
    h: u32,
    /// Search that last reset this node.
    search: u64,
}

impl PathField {
    fn f(&self) -> u32 {
        self.g + self.h
    }
}

/// Grid A* pathfinder. Call [`Pathfinder::prepare_level`] once per level load.
#[derive(Debug, Clone)]
pub struct Pathfinder {
    subdivisions: i32,
    cell_size: f32,
    max_expansions: u32,
    /// Grid size in level cells.
    width: i32,
    height: i32,
    /// Level cells holding a colliding field.
    solid_cells: HashSet<(i32, i32)>,
    pool: Vec<PathField>,
    by_cell: HashMap<SubCell, usize>,
    search: u64,
    prepared: bool,
}

impl Pathfinder {
    pub fn new(subdivisions: u32, cell_size: f32, max_expansions: u32) -> Self {
        Self {
            subdivisions: subdivisions.max(1) as i32,
            cell_size,
            max_expansions,
            width: 0,
            height: 0,
            solid_cells: HashSet::new(),
            pool: Vec::new(),
            by_cell: HashMap::new(),
            search: 0,
            prepared: false,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.subdivisions, config.cell_size, config.max_expansions)
    }

    /// Rebuild walkability for a freshly loaded level and clear the node pool.
    pub fn prepare_level(&mut self, level: &Level) {
        self.width = level.width() as i32;
        self.height = level.height() as i32;
        self.solid_cells = level
            .fields()
            .iter()
            .filter(|f| !f.kind.is_walkable())
            .map(|f| f.cell())
            .collect();
        self.pool.clear();
        self.by_cell.clear();
        self.search = 0;
        self.prepared = true;
    }

    pub fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Number of pooled nodes created since the last `prepare_level`.
    pub fn pooled_nodes(&self) -> usize {
        self.pool.len()
    }

    pub fn sub_cell_size(&self) -> f32 {
        self.cell_size / self.subdivisions as f32
    }

    /// Sub-cell containing a world x/z position.
    pub fn sub_cell_of(&self, position: Vector2) -> SubCell {
        let size = self.sub_cell_size();
        (
            (position.x / size).floor() as i32,
            (position.y / size).floor() as i32,
        )
    }

    /// World x/z centre of a sub-cell.
    pub fn sub_cell_center(&self, cell: SubCell) -> Vector2 {
        let size = self.sub_cell_size();
        Vector2::new(
            (cell.0 as f32 + 0.5) * size,
            (cell.1 as f32 + 0.5) * size,
        )
    }

    /// Whether the sub-cell is inside the level and not in a colliding cell.
    pub fn is_walkable(&self, cell: SubCell) -> bool {
        let level_cell = (
            cell.0.div_euclid(self.subdivisions),
            cell.1.div_euclid(self.subdivisions),
        );
        let in_bounds = level_cell.0 >= 0
            && level_cell.1 >= 0
            && level_cell.0 < self.width
            && level_cell.1 < self.height;
        in_bounds && !self.solid_cells.contains(&level_cell)
    }

    /// Path from `from` to `to` (world x/z) as sub-cell centres.
    ///
    /// Excludes the start cell, ends at the goal cell. Empty when the goal is
    /// the start, unwalkable, out of bounds or unreachable.
    pub fn get_path(&mut self, from: Vector2, to: Vector2) -> Vec<Vector2> {
        self.get_waypoints(from, to)
            .into_iter()
            .map(|w| w.position)
            .collect()
    }

    /// Same as [`Pathfinder::get_path`] with the cell and cost of each step.
    pub fn get_waypoints(&mut self, from: Vector2, to: Vector2) -> Vec<Waypoint> {
        if !self.prepared {
            log::warn!("get_path called before prepare_level");
            return Vec::new();
        }
        let start = self.sub_cell_of(from);
        let goal = self.sub_cell_of(to);
        self.find(start, goal)
    }

    /// A* between two sub-cells.
    pub fn find(&mut self, start: SubCell, goal: SubCell) -> Vec<Waypoint> {
        if start == goal || !self.is_walkable(goal) {
            return Vec::new();
        }
        if !self.start_in_bounds(start) {
            return Vec::new();
        }

        self.search += 1;
        let start_idx = self.node(start);
        self.pool[start_idx].g = 0;
        self.pool[start_idx].h = heuristic(start, goal);

        let mut open: Vec<usize> = vec![start_idx];
        let mut closed: HashSet<SubCell> = HashSet::new();
        let mut expansions = 0u32;

        while let Some((open_pos, current)) = open
            .iter()
            .copied()
            .enumerate()
            .min_by_key(|&(_, idx)| self.pool[idx].f())
        {
            open.remove(open_pos);
            let current_cell = self.pool[current].cell;
            if current_cell == goal {
                return self.reconstruct(current);
            }
            closed.insert(current_cell);

            expansions += 1;
            if expansions > self.max_expansions {
                log::debug!(
                    "path {:?} -> {:?} abandoned after {} expansions",
                    start,
                    goal,
                    self.max_expansions
                );
                return Vec::new();
            }

            let current_g = self.pool[current].g;
            for (dx, dy) in NEIGHBOURS {
                let cell = (current_cell.0 + dx, current_cell.1 + dy);
                if closed.contains(&cell) {
                    continue;
                }
                let neighbour = self.node(cell);
                if !self.pool[neighbour].walkable {
                    continue;
                }
                let step = if dx != 0 && dy != 0 {
                    path_costs::DIAGONAL
                } else {
                    path_costs::ORTHOGONAL
                };
                let tentative = current_g + step;
                let queued = open.contains(&neighbour);
                if !queued || tentative < self.pool[neighbour].g {
                    let node = &mut self.pool[neighbour];
                    node.parent = Some(current);
                    node.g = tentative;
                    node.h = heuristic(cell, goal);
                    if !queued {
                        open.push(neighbour);
                    }
                }
            }
        }

        Vec::new()
    }

    /// A start cell may sit on a non-walkable field (e.g. an enemy nudged
    /// into a wall edge) but must be on the map.
    fn start_in_bounds(&self, cell: SubCell) -> bool {
        let max_x = self.width * self.subdivisions;
        let max_y = self.height * self.subdivisions;
        cell.0 >= 0 && cell.1 >= 0 && cell.0 < max_x && cell.1 < max_y
    }

    /// Pooled node for `cell`, reset for the current search.
    fn node(&mut self, cell: SubCell) -> usize {
        let idx = match self.by_cell.get(&cell) {
            Some(&idx) => idx,
            None => {
                let idx = self.pool.len();
                let walkable = self.is_walkable(cell);
                self.pool.push(PathField {
                    cell,
                    walkable,
                    parent: None,
                    g: 0,
                    h: 0,
                    search: 0,
                });
                self.by_cell.insert(cell, idx);
                idx
            }
        };
        let node = &mut self.pool[idx];
        if node.search != self.search {
            node.search = self.search;
            node.parent = None;
            node.g = 0;
            node.h = 0;
        }
        idx
    }

    fn reconstruct(&self, goal: usize) -> Vec<Waypoint> {
        let mut path = Vec::new();
        let mut idx = goal;
        while let Some(parent) = self.pool[idx].parent {
            let node = &self.pool[idx];
            path.push(Waypoint {
                position: self.sub_cell_center(node.cell),
                cell: node.cell,
                cost: node.g,
            });
            idx = parent;
        }
        path.reverse();
        path
    }
}

fn heuristic(from: SubCell, to: SubCell) -> u32 {
    ((from.0 - to.0).unsigned_abs() + (from.1 - to.1).unsigned_abs()) * path_costs::HEURISTIC
}
