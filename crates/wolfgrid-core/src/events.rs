//! Gameplay events emitted during `GameEngine::update`.
//!
//! The engine queues these in order of occurrence; the presentation layer
//! drains them once per frame for sounds, HUD flashes and score popups.

use hecs::Entity;
use wolfgrid_logic::level::PickupKind;

use crate::components::DoorState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A door was toggled by the player or an enemy.
    DoorToggled { door: Entity, state: DoorState },
    DoorOpened(Entity),
    DoorClosed(Entity),
    /// The player fired; `hit` is the enemy struck, if any.
    ShotFired { hit: Option<Entity>, ammo_left: u32 },
    EnemyHit { enemy: Entity, hp: i32 },
    EnemyKilled(Entity),
    /// An enemy fired at the player.
    EnemyFired { enemy: Entity, hit: bool },
    PlayerDamaged { amount: u32, health: u32 },
    PlayerDied { lives_left: u32 },
    GameOver,
    PickupCollected { pickup: Entity, kind: PickupKind },
}
