//! Component definitions for the ECS world.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems.

mod actors;
mod items;
mod world;

pub use actors::*;
pub use items::*;
pub use world::*;
