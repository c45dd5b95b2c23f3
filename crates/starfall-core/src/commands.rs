//! Player commands sent from the frontend to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::enums::TurnDirection;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    // --- Ship control ---
    /// Hold or release the gun triggers.
    SetTriggers { primary: bool, secondary: bool },
    /// Turn the hull, or stop turning with `None`.
    Turn { direction: Option<TurnDirection> },
    /// Use the ship ability once.
    UseAbility,

    // --- Simulation control ---
    /// Set time scale (1.0 = normal, 2.0 = double).
    SetTimeScale { scale: f32 },
    Pause,
    Resume,
}
