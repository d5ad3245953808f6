//! Enemies and the player's vital statistics.

use serde::{Deserialize, Serialize};
use wolfgrid_logic::constants::{pickups, player};
use wolfgrid_logic::level::PickupKind;
use wolfgrid_logic::math::Vector2;

/// Abstract animation/behaviour state, read by the renderer to pick frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    Walking,
    Shooting,
    Hit,
    Dying,
    Dead,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub hp: i32,
    pub state: EnemyState,
    /// Seconds left in a timed state (Shooting, Hit, Dying).
    pub state_timer: f32,
    /// Waypoints from the last path query, world x/z.
    pub path: Vec<Vector2>,
    /// Seconds until the enemy may fire again.
    pub cooldown: f32,
}

impl Enemy {
    pub fn new(hp: i32, cooldown: f32) -> Self {
        Self {
            hp,
            state: EnemyState::Walking,
            state_timer: 0.0,
            path: Vec::new(),
            cooldown,
        }
    }

    /// Alive enemies can be shot and block the camera.
    pub fn is_alive(&self) -> bool {
        !matches!(self.state, EnemyState::Dying | EnemyState::Dead)
    }

    /// Apply player damage. Returns true if this hit killed the enemy.
    pub fn take_damage(&mut self, damage: i32, hit_duration: f32, dying_duration: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.hp -= damage;
        self.path.clear();
        if self.hp <= 0 {
            self.state = EnemyState::Dying;
            self.state_timer = dying_duration;
            true
        } else {
            self.state = EnemyState::Hit;
            self.state_timer = hit_duration;
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weapon {
    Pistol,
    Machinegun,
    Chaingun,
}

/// Player health, ammo and score. Lives on the engine, not in the world.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatus {
    pub health: u32,
    pub ammo: u32,
    pub score: u32,
    pub lives: u32,
    pub weapon: Weapon,
}

impl Default for PlayerStatus {
    fn default() -> Self {
        Self {
            health: player::START_HEALTH,
            ammo: player::START_AMMO,
            score: 0,
            lives: player::START_LIVES,
            weapon: Weapon::Pistol,
        }
    }
}

impl PlayerStatus {
    pub fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Subtract health, saturating at zero. Returns the damage actually taken.
    pub fn damage(&mut self, amount: u32) -> u32 {
        let taken = amount.min(self.health);
        self.health -= taken;
        taken
    }

    fn heal(&mut self, amount: u32) -> bool {
        if self.health >= pickups::MAX_HEALTH {
            return false;
        }
        self.health = (self.health + amount).min(pickups::MAX_HEALTH);
        true
    }

    fn add_ammo(&mut self, amount: u32) -> bool {
        if self.ammo >= pickups::MAX_AMMO {
            return false;
        }
        self.ammo = (self.ammo + amount).min(pickups::MAX_AMMO);
        true
    }

    fn take_weapon(&mut self, weapon: Weapon) -> bool {
        self.weapon = self.weapon.max(weapon);
        self.ammo = (self.ammo + pickups::WEAPON_AMMO).min(pickups::MAX_AMMO);
        true
    }

    /// Apply a pickup's effect. Returns false if the pickup is refused and
    /// should stay in the world (full health, full ammo).
    pub fn apply_pickup(&mut self, kind: PickupKind) -> bool {
        match kind {
            PickupKind::Ammo => self.add_ammo(pickups::AMMO_CLIP),
            PickupKind::DogFood => self.heal(pickups::DOG_FOOD_HEALTH),
            PickupKind::Food => self.heal(pickups::FOOD_HEALTH),
            PickupKind::Health => self.heal(pickups::FIRST_AID_HEALTH),
            PickupKind::Machinegun => self.take_weapon(Weapon::Machinegun),
            PickupKind::Chaingun => self.take_weapon(Weapon::Chaingun),
            PickupKind::Cross => self.add_score(pickups::CROSS_POINTS),
            PickupKind::Chalice => self.add_score(pickups::CHALICE_POINTS),
            PickupKind::Chest => self.add_score(pickups::CHEST_POINTS),
            PickupKind::Crown => self.add_score(pickups::CROWN_POINTS),
            PickupKind::Powerup => {
                self.health = pickups::MAX_HEALTH;
                self.ammo = (self.ammo + pickups::POWERUP_AMMO).min(pickups::MAX_AMMO);
                self.lives += 1;
                true
            }
        }
    }

    pub fn add_score(&mut self, points: u32) -> bool {
        self.score = self.score.saturating_add(points);
        true
    }
}
