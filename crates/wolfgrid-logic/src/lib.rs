//! Pure game logic for Wolfgrid.
//!
//! Everything here works on plain data: no ECS, no renderer, no clock. The
//! ECS driver in `wolfgrid-core` owns the world and calls into these modules
//! once per tick.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`collision`] | Local extents, oriented bounding boxes, side/corner queries |
//! | [`config`] | Game tuneables with JSON overrides and validation |
//! | [`constants`] | Field value tags, path costs, raycast tolerances, pickup amounts |
//! | [`level`] | Level description parsing, validation, door adjacency |
//! | [`math`] | `Vector2`, `Vector3`, `Mat4` |
//! | [`movement`] | First-person camera controller with wall sliding |
//! | [`pathfinding`] | Sub-grid A* with pooled nodes and an expansion budget |
//! | [`raycast`] | Cell-by-cell grid ray stepping and shape lookup |
//! | [`transform`] | Position/rotation/scale and model/view matrices |

pub mod collision;
pub mod config;
pub mod constants;
pub mod level;
pub mod math;
pub mod movement;
pub mod pathfinding;
pub mod raycast;
pub mod transform;
