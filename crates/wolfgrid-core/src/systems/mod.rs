//! Systems - logic that operates on components

mod doors;
mod enemies;
mod pickups;
mod player;
mod sight;

pub use doors::*;
pub use enemies::*;
pub use pickups::*;
pub use player::*;
pub use sight::*;
