//! Collectable items.

use serde::{Deserialize, Serialize};
use wolfgrid_logic::level::PickupKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pickup {
    pub kind: PickupKind,
}

impl Pickup {
    pub fn new(kind: PickupKind) -> Self {
        Self { kind }
    }
}
