//! Game engine - main entry point for running a level

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use wolfgrid_logic::collision::BoundingBox;
use wolfgrid_logic::config::GameConfig;
use wolfgrid_logic::constants::player;
use wolfgrid_logic::level::{cell_of, GridField, Level, LevelError};
use wolfgrid_logic::movement::{CameraController, InputState};
use wolfgrid_logic::pathfinding::Pathfinder;
use wolfgrid_logic::transform::Transform;

use crate::components::*;
use crate::events::GameEvent;
use crate::spawn::{spawn_level, LevelLayout};
use crate::systems::*;

/// Why a level could not be loaded. The previous level stays active.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error("failed to read level file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Main game engine
pub struct GameEngine {
    /// ECS world containing every level entity
    pub world: World,
    config: GameConfig,
    camera: CameraController,
    pathfinder: Pathfinder,
    level: Option<Level>,
    layout: Option<LevelLayout>,
    status: PlayerStatus,
    events: Vec<GameEvent>,
    /// Last tick's input, for edge-triggered actions
    previous_input: InputState,
    rng: StdRng,
    /// Seconds of game time since the level loaded
    elapsed: f64,
    game_over: bool,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

impl GameEngine {
    /// Create an engine with no level loaded
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an engine whose enemy hit rolls are reproducible
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Self {
        Self {
            world: World::new(),
            camera: CameraController::from_config(Default::default(), &config),
            pathfinder: Pathfinder::from_config(&config),
            config,
            level: None,
            layout: None,
            status: PlayerStatus::default(),
            events: Vec::new(),
            previous_input: InputState::default(),
            rng,
            elapsed: 0.0,
            game_over: false,
        }
    }

    /// Parse, validate and load a JSON level description
    pub fn load_level_str(&mut self, json: &str) -> Result<(), EngineError> {
        let level = Level::from_json(json)?;
        self.load_level(level);
        Ok(())
    }

    /// Read a level description from disk and load it
    pub fn load_level_file(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_level_str(&json)
    }

    /// Replace the current level with a fresh world built from `level`
    pub fn load_level(&mut self, level: Level) {
        let mut world = World::new();
        let layout = spawn_level(&mut world, &level, &self.config);
        let mut camera = CameraController::from_config(layout.player_start, &self.config);
        camera.transform.rotation.y = layout.player_yaw;
        self.pathfinder.prepare_level(&level);

        self.world = world;
        self.camera = camera;
        self.layout = Some(layout);
        self.level = Some(level);
        self.status = PlayerStatus::default();
        self.events.clear();
        self.previous_input = InputState::default();
        self.elapsed = 0.0;
        self.game_over = false;
    }

    pub fn is_loaded(&self) -> bool {
        self.level.is_some()
    }

    /// Advance the game by `delta_seconds` with this tick's input
    pub fn update(&mut self, delta_seconds: f32, input: &InputState) {
        if !self.is_loaded() {
            log::warn!("update called before a level was loaded");
            return;
        }
        if self.game_over {
            return;
        }
        self.elapsed += delta_seconds as f64;

        // Player: move, then edge-triggered actions
        player_movement_system(&self.world, &mut self.camera, input, delta_seconds);
        if input.interacting && !self.previous_input.interacting {
            interact_system(&mut self.world, &self.camera, &self.config, &mut self.events);
        }
        if input.shooting && !self.previous_input.shooting {
            shooting_system(
                &mut self.world,
                &self.camera,
                &mut self.status,
                &self.config,
                &mut self.events,
            );
        }
        self.previous_input = *input;

        let occupied = self.occupied_cells();
        door_system(
            &mut self.world,
            &occupied,
            &self.config,
            delta_seconds,
            &mut self.events,
        );

        let damage = enemy_system(
            &mut self.world,
            &mut self.pathfinder,
            self.camera.position(),
            &self.config,
            delta_seconds,
            &mut self.rng,
            &mut self.events,
        );
        if damage > 0 {
            self.damage_player(damage);
        }

        pickup_system(
            &mut self.world,
            self.camera.position(),
            &mut self.status,
            &self.config,
            &mut self.events,
        );
    }

    fn damage_player(&mut self, amount: u32) {
        let taken = self.status.damage(amount);
        self.events.push(GameEvent::PlayerDamaged {
            amount: taken,
            health: self.status.health,
        });
        if self.status.is_dead() {
            self.lose_life();
        }
    }

    fn lose_life(&mut self) {
        self.status.lives = self.status.lives.saturating_sub(1);
        self.events.push(GameEvent::PlayerDied {
            lives_left: self.status.lives,
        });
        if self.status.lives == 0 {
            log::info!("game over after {:.1}s, score {}", self.elapsed, self.status.score);
            self.game_over = true;
            self.events.push(GameEvent::GameOver);
            return;
        }

        // Respawn at the level start with a fresh pistol.
        if let Some(layout) = &self.layout {
            self.camera.transform.position = layout.player_start;
            self.camera.transform.rotation.y = layout.player_yaw;
        }
        self.status.health = player::START_HEALTH;
        self.status.ammo = player::START_AMMO;
        self.status.weapon = Weapon::Pistol;
    }

    /// Cells holding the player or a live enemy
    fn occupied_cells(&self) -> HashSet<(i32, i32)> {
        let cs = self.config.cell_size;
        let mut cells: HashSet<(i32, i32)> = self
            .world
            .query::<(&Enemy, &Shape)>()
            .iter()
            .filter(|(_, (enemy, _))| enemy.is_alive())
            .map(|(_, (_, shape))| cell_of(shape.ground_position(), cs))
            .collect();
        cells.insert(cell_of(self.camera.position().horizontal(), cs));
        cells
    }

    /// Take every event queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    /// Mutable camera access for scripted scenes and tests
    pub fn camera_mut(&mut self) -> &mut CameraController {
        &mut self.camera
    }

    pub fn camera_transform(&self) -> &Transform {
        &self.camera.transform
    }

    /// Bounding boxes of walls, doors and live enemies
    pub fn colliding_cuboids(&self) -> Vec<BoundingBox> {
        obstacle_boxes(&self.world)
    }

    /// Entities the player can toggle (doors)
    pub fn interactables(&self) -> Vec<Entity> {
        self.world
            .query::<&Interactable>()
            .iter()
            .map(|(entity, _)| entity)
            .collect()
    }

    /// Typed fields of the loaded level; empty before a load
    pub fn grid_fields(&self) -> &[GridField] {
        self.level.as_ref().map(|l| l.fields()).unwrap_or(&[])
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn layout(&self) -> Option<&LevelLayout> {
        self.layout.as_ref()
    }

    pub fn player_status(&self) -> &PlayerStatus {
        &self.status
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    /// Seconds of game time since the level loaded
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn wall_count(&self) -> usize {
        self.world.query::<&Wall>().iter().count()
    }

    pub fn door_count(&self) -> usize {
        self.world.query::<&Door>().iter().count()
    }

    /// Enemies that are not dying or dead
    pub fn enemy_count(&self) -> usize {
        self.world
            .query::<&Enemy>()
            .iter()
            .filter(|(_, enemy)| enemy.is_alive())
            .count()
    }

    pub fn pickup_count(&self) -> usize {
        self.world.query::<&Pickup>().iter().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wolfgrid_logic::math::Vector3;

    const ROOM: &str = r#"{"width":5,"height":4,"fields":[
        {"x":0,"y":0,"value":"wall"},{"x":1,"y":0,"value":"wall"},{"x":2,"y":0,"value":"door"},
        {"x":3,"y":0,"value":"wall"},{"x":4,"y":0,"value":"wall"},
        {"x":2,"y":1,"value":"player"},
        {"x":2,"y":2,"value":"ammo"},
        {"x":4,"y":3,"value":"lamp"}
    ]}"#;

    fn loaded() -> GameEngine {
        let mut engine = GameEngine::with_seed(GameConfig::default(), 42);
        engine.load_level_str(ROOM).unwrap();
        engine
    }

    #[test]
    fn test_engine_creation() {
        let engine = GameEngine::default();
        assert!(!engine.is_loaded());
        assert!(engine.grid_fields().is_empty());
        assert_eq!(engine.elapsed(), 0.0);
    }

    #[test]
    fn test_update_before_load_is_noop() {
        let mut engine = GameEngine::default();
        engine.update(1.0, &InputState::forward());
        assert_eq!(engine.elapsed(), 0.0);
        assert_eq!(engine.camera_transform().position, Vector3::ZERO);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_load_level_counts() {
        let engine = loaded();
        assert_eq!(engine.wall_count(), 4);
        assert_eq!(engine.door_count(), 1);
        assert_eq!(engine.pickup_count(), 1);
        assert_eq!(engine.enemy_count(), 0);
        assert_eq!(engine.interactables().len(), 1);
        assert_eq!(engine.colliding_cuboids().len(), 5);
        assert_eq!(engine.grid_fields().len(), 8);
        assert_eq!(
            engine.camera_transform().position,
            Vector3::new(250.0, 0.0, 150.0)
        );
    }

    #[test]
    fn test_failed_load_keeps_previous_level() {
        let mut engine = loaded();
        let err = engine
            .load_level_str(r#"{"width":3,"height":3,"fields":[]}"#)
            .unwrap_err();
        assert!(matches!(err, EngineError::Level(LevelError::MissingPlayer)));
        assert_eq!(engine.wall_count(), 4);
        assert!(engine.is_loaded());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let mut engine = GameEngine::default();
        let err = engine
            .load_level_file("/nonexistent/wolfgrid/level.json")
            .unwrap_err();
        assert!(matches!(err, EngineError::Io { .. }));
        assert!(!engine.is_loaded());
    }

    #[test]
    fn test_walk_back_collects_ammo() {
        let mut engine = loaded();
        let backward = InputState {
            direction: Vector3::new(0.0, 0.0, -1.0),
            ..Default::default()
        };
        for _ in 0..60 {
            engine.update(1.0 / 60.0, &backward);
        }
        assert_eq!(engine.pickup_count(), 0);
        assert_eq!(engine.player_status().ammo, 16);
        let events = engine.drain_events();
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::PickupCollected { .. })));
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_interact_is_edge_triggered() {
        let mut engine = loaded();
        let hold = InputState {
            interacting: true,
            ..Default::default()
        };
        for _ in 0..10 {
            engine.update(0.01, &hold);
        }
        let toggles = engine
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::DoorToggled { .. }))
            .count();
        assert_eq!(toggles, 1);
    }

    #[test]
    fn test_shoot_is_edge_triggered() {
        let mut engine = loaded();
        let fire = InputState {
            shooting: true,
            ..Default::default()
        };
        engine.update(0.01, &fire);
        engine.update(0.01, &fire);
        engine.update(0.01, &InputState::default());
        engine.update(0.01, &fire);
        assert_eq!(engine.player_status().ammo, player::START_AMMO - 2);
    }
}
