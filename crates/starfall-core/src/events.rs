//! Side-effect events emitted by the simulation for sound and visuals.
//!
//! Fire-and-forget: the simulation never reads them back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Ships and projectiles are identified by their entity bits.
pub type EntityId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CombatEvent {
    /// A gun fired a volley.
    ShootSound { ship: EntityId, gun: String, pos: Vec2 },
    /// A gun started reloading.
    ReloadSound { ship: EntityId, gun: String },
    /// Muzzle light for guns configured with a light on shot.
    GunFlash { ship: EntityId, slot: u8, pos: Vec2 },
    /// Gun sprite attached to a mount.
    GunAttached {
        ship: EntityId,
        slot: u8,
        gun: String,
        /// Sprite length in world units.
        tex_len: f32,
        under_ship: bool,
    },
    GunDetached { ship: EntityId, slot: u8, gun: String },
    ProjectileHit {
        projectile: String,
        target: Option<EntityId>,
        pos: Vec2,
        damage: f32,
    },
    ProjectileGone { projectile: String, reason: ProjectileEnd },
    /// A ship inside the star's hot radius took burn damage.
    SunBurn { ship: EntityId, damage: f32 },
    /// A ship sunk into a planet and was lifted back above the ground.
    ShipRecovered { ship: EntityId, pos: Vec2 },
    ShipDestroyed { ship: EntityId, pos: Vec2 },
    AbilityUsed {
        ship: EntityId,
        ability: AbilityKind,
        pos: Vec2,
    },
}
