//! Tuneable game configuration.
//!
//! Every field has a default so a partial JSON document only overrides what
//! it names:
//!
//! ```
//! use wolfgrid_logic::config::GameConfig;
//!
//! let config = GameConfig::from_json(r#"{ "camera_speed": 250.0 }"#).unwrap();
//! assert_eq!(config.camera_speed, 250.0);
//! assert_eq!(config.subdivisions, 3);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from parsing a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// World, movement, AI and interaction tuneables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World units per grid cell edge.
    pub cell_size: f32,
    /// Pathfinding sub-cells per grid cell edge.
    pub subdivisions: u32,
    /// Camera movement speed (units per second).
    pub camera_speed: f32,
    /// Camera yaw speed (radians per second).
    pub rotation_speed: f32,
    /// Distance the camera keeps from obstacles.
    pub collision_radius: f32,
    /// Raycaster step bound; `next_shape` walks at most `2 * raycast_limit` cells.
    pub raycast_limit: u32,
    /// A* expansion budget per `get_path` call.
    pub max_expansions: u32,
    /// How many cells ahead the player can open doors.
    pub interact_range: u32,
    /// Enemy walking speed (units per second).
    pub enemy_speed: f32,
    pub enemy_hp: i32,
    /// Maximum distance (in cells) at which an enemy will shoot.
    pub enemy_sight_range: u32,
    /// Probability in `[0, 1]` that an enemy shot hits.
    pub enemy_hit_chance: f64,
    pub enemy_damage: u32,
    /// Seconds between enemy shots.
    pub enemy_fire_cooldown: f32,
    /// Seconds an enemy stays in the shooting pose after firing.
    pub enemy_shoot_duration: f32,
    /// Damage dealt per player shot.
    pub player_damage: i32,
    /// Door slide progress per second (1.0 = one full slide per second).
    pub door_speed: f32,
    /// Seconds a door stays open before trying to close.
    pub door_open_time: f32,
    /// Distance at which the camera collects a pickup.
    pub pickup_radius: f32,
    /// Seconds an enemy stays in the hit state.
    pub hit_duration: f32,
    /// Seconds an enemy spends dying before it is dead.
    pub dying_duration: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            cell_size: 100.0,
            subdivisions: 3,
            camera_speed: 100.0,
            rotation_speed: std::f32::consts::PI,
            collision_radius: 20.0,
            raycast_limit: 100,
            max_expansions: 4096,
            interact_range: 1,
            enemy_speed: 60.0,
            enemy_hp: 25,
            enemy_sight_range: 8,
            enemy_hit_chance: 0.5,
            enemy_damage: 8,
            enemy_fire_cooldown: 1.5,
            enemy_shoot_duration: 0.4,
            player_damage: 10,
            door_speed: 1.0,
            door_open_time: 5.0,
            pickup_radius: 40.0,
            hit_duration: 0.3,
            dying_duration: 1.0,
        }
    }
}

impl GameConfig {
    /// Parse a (possibly partial) JSON config and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cell_size > 0.0) {
            return Err(ConfigError::Invalid {
                field: "cell_size",
                reason: format!("must be positive, got {}", self.cell_size),
            });
        }
        if self.subdivisions == 0 {
            return Err(ConfigError::Invalid {
                field: "subdivisions",
                reason: "must be at least 1".into(),
            });
        }
        if !(0.0..=1.0).contains(&self.enemy_hit_chance) {
            return Err(ConfigError::Invalid {
                field: "enemy_hit_chance",
                reason: format!("must be within [0, 1], got {}", self.enemy_hit_chance),
            });
        }
        Ok(())
    }

    /// World units per pathfinding sub-cell edge.
    pub fn sub_cell_size(&self) -> f32 {
        self.cell_size / self.subdivisions as f32
    }
}
