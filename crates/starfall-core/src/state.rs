//! Simulation snapshot: the complete visible state handed to the frontend
//! after each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{CombatEvent, EntityId};
use crate::types::{Faction, SimTime};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    /// Player SloMo factor applied to the time step.
    pub time_factor: f32,
    pub ships: Vec<ShipView>,
    pub projectiles: Vec<ProjectileView>,
    pub events: Vec<CombatEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipView {
    pub id: EntityId,
    pub hull: String,
    pub faction: Option<Faction>,
    pub pos: Vec2,
    pub spd: Vec2,
    pub angle: f32,
    pub life: f32,
    pub shield_life: f32,
    pub mounts: Vec<MountView>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MountView {
    pub gun: Option<String>,
    pub ammo: u32,
    pub reload_await: f32,
    /// Aim relative to the hull, degrees.
    pub rel_angle: f32,
    pub detected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub projectile: String,
    pub faction: Option<Faction>,
    pub pos: Vec2,
    pub spd: Vec2,
    pub angle: f32,
}
