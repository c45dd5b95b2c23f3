//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Damage category. See `Durability::receive_damage` for how armor and
/// shields treat each kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DamageType {
    Energy,
    #[default]
    Bullet,
    Explosion,
    Fire,
    Crash,
}

/// Hull size class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HullType {
    #[default]
    Std,
    Big,
    /// Stationary platform: keeps its mount aim between ticks and is never
    /// pulled out of the ground.
    Station,
}

/// Who flies a ship.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PilotKind {
    Player,
    #[default]
    Ai,
}

/// Rotation request from the AI. `Left` increases the hull angle
/// (counter-clockwise), `Right` decreases it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnDirection {
    Left,
    Right,
}

/// Motion strategy a projectile uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileBodyKind {
    /// Physically simulated ball with a rigid body.
    Ball,
    /// Kinematic point stepped by ray casts.
    Point,
}

/// Kind of ship ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AbilityKind {
    KnockBack,
    SloMo,
}

/// Why a projectile left the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileEnd {
    Impact,
    Expired,
    LeftArea,
}

/// Game phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    Active,
    Paused,
}
