//! Game constants: field value tags, pathfinding costs, raycast tolerances.
//!
//! Tuneables live in [`crate::config::GameConfig`]; these values are fixed.

/// Field `value` strings as they appear in level descriptions.
pub mod field_values {
    pub const WALL: &str = "wall";
    pub const BLUE_WALL: &str = "blueWall";
    pub const BROWN_WALL: &str = "brownWall";
    pub const DOOR: &str = "door";
    pub const PLAYER: &str = "player";
    pub const ENEMY: &str = "enemy";
    pub const AMMO: &str = "ammo";
    pub const DOG_FOOD: &str = "dogFood";
    pub const FOOD: &str = "food";
    pub const HEALTH: &str = "health";
    pub const MACHINEGUN: &str = "machinegun";
    pub const CHAINGUN: &str = "chaingun";
    pub const CROSS: &str = "cross";
    pub const CHALICE: &str = "chalice";
    pub const CHEST: &str = "chest";
    pub const CROWN: &str = "crown";
    pub const POWERUP: &str = "powerup";
    pub const LAMP: &str = "lamp";
}

/// Integer A* weights (ratio ≈ √2).
pub mod path_costs {
    pub const ORTHOGONAL: u32 = 10;
    pub const DIAGONAL: u32 = 14;
    /// Manhattan heuristic multiplier, consistent with `ORTHOGONAL`.
    pub const HEURISTIC: u32 = 10;
}

pub mod raycast {
    /// Nudge applied along the ray before each step, as a fraction of the cell size.
    pub const NUDGE: f32 = 1e-4;
    /// Crossing distances closer than this (fraction of cell size) count as a corner hit.
    pub const CORNER_TOLERANCE: f32 = 1e-4;
    /// Shape/cell centre match tolerance, as a fraction of the cell size.
    pub const MATCH_TOLERANCE: f32 = 1e-2;
}

/// Pickup effect amounts.
pub mod pickups {
    pub const AMMO_CLIP: u32 = 8;
    pub const WEAPON_AMMO: u32 = 6;
    pub const DOG_FOOD_HEALTH: u32 = 4;
    pub const FOOD_HEALTH: u32 = 10;
    pub const FIRST_AID_HEALTH: u32 = 25;
    pub const POWERUP_AMMO: u32 = 25;
    pub const CROSS_POINTS: u32 = 100;
    pub const CHALICE_POINTS: u32 = 500;
    pub const CHEST_POINTS: u32 = 1000;
    pub const CROWN_POINTS: u32 = 5000;
    pub const MAX_HEALTH: u32 = 100;
    pub const MAX_AMMO: u32 = 99;
}

/// Player starting status.
pub mod player {
    pub const START_HEALTH: u32 = 100;
    pub const START_AMMO: u32 = 8;
    pub const START_LIVES: u32 = 3;
}

/// Score awarded for a kill.
pub const ENEMY_KILL_POINTS: u32 = 100;
