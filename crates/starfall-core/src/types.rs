//! Fundamental simulation types.

use serde::{Deserialize, Serialize};

/// Opaque faction identity. A missing faction is `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Faction(pub u16);

impl Faction {
    /// The player's faction.
    pub const LAANI: Faction = Faction(0);
    /// Pirates and hostile drones.
    pub const EHAR: Faction = Faction(1);
}

/// Two factions are enemies iff both are present and different.
pub fn are_enemies(f1: Option<Faction>, f2: Option<Faction>) -> bool {
    matches!((f1, f2), (Some(a), Some(b)) if a != b)
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds, after time scaling.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `ts` simulated seconds.
    pub fn advance(&mut self, ts: f32) {
        self.tick += 1;
        self.elapsed_secs += ts as f64;
    }
}
