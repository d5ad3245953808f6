//! Wolfgrid Core - maze shooter game engine
//!
//! An ECS-based runtime for a grid maze shooter: a first-person camera walks
//! a level of walls and sliding doors, enemies chase it along A* paths and
//! shoot on sight, and items are collected by walking over them.
//!
//! # Architecture
//!
//! The game uses an Entity Component System (ECS) architecture via `hecs`:
//! - **Entities**: Walls, doors, enemies, pickups, decorations
//! - **Components**: Pure data attached to entities (Shape, Door, Enemy, etc.)
//! - **Systems**: Logic that queries and updates components once per tick
//!
//! The player is not an entity: the engine owns the camera controller and
//! the player's status directly.
//!
//! # Example
//!
//! ```rust,no_run
//! use wolfgrid_core::prelude::*;
//! use wolfgrid_logic::movement::InputState;
//!
//! let mut engine = GameEngine::default();
//! engine.load_level_file("data/levels/level1.json").unwrap();
//!
//! loop {
//!     engine.update(1.0 / 60.0, &InputState::forward()); // 60 FPS
//!     for event in engine.drain_events() {
//!         println!("{event:?}");
//!     }
//! }
//! ```

pub mod components;
pub mod engine;
pub mod events;
pub mod spawn;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{EngineError, GameEngine};
    pub use crate::events::GameEvent;
}
