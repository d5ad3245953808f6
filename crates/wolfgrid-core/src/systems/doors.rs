//! Door system - advances sliding doors through their state machine.
//!
//! `Closed -> Opening -> Open -> Closing -> Closed`. An open door waits
//! `door_open_time` seconds, then closes unless someone stands in its cell.

use std::collections::HashSet;

use hecs::World;
use wolfgrid_logic::config::GameConfig;

use crate::components::{Door, DoorState, GridCell, Shape};
use crate::events::GameEvent;

/// Advance every door by `delta_seconds`.
///
/// `occupied` holds the grid cells of the player and live enemies; a door
/// whose cell is occupied re-arms its timer instead of closing.
pub fn door_system(
    world: &mut World,
    occupied: &HashSet<(i32, i32)>,
    config: &GameConfig,
    delta_seconds: f32,
    events: &mut Vec<GameEvent>,
) {
    let step = config.door_speed * delta_seconds;

    for (entity, (door, shape, cell)) in world.query_mut::<(&mut Door, &mut Shape, &GridCell)>() {
        match door.state {
            DoorState::Closed => continue,
            DoorState::Opening => {
                door.progress += step;
                if door.progress >= 1.0 {
                    door.progress = 1.0;
                    door.state = DoorState::Open;
                    door.open_timer = config.door_open_time;
                    log::debug!("door {:?} at {:?} open", entity, cell.as_tuple());
                    events.push(GameEvent::DoorOpened(entity));
                }
            }
            DoorState::Open => {
                door.open_timer -= delta_seconds;
                if door.open_timer <= 0.0 {
                    if occupied.contains(&cell.as_tuple()) {
                        door.open_timer = config.door_open_time;
                    } else {
                        door.state = DoorState::Closing;
                    }
                }
            }
            DoorState::Closing => {
                door.progress -= step;
                if door.progress <= 0.0 {
                    door.progress = 0.0;
                    door.state = DoorState::Closed;
                    log::debug!("door {:?} at {:?} closed", entity, cell.as_tuple());
                    events.push(GameEvent::DoorClosed(entity));
                }
            }
        }
        shape.transform.position = door.panel_position(config.cell_size);
    }
}
