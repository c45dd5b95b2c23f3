//! Aiming and fire decisions for STARFALL.
//!
//! Implements the ballistic intercept solver shared by auto-rotating gun
//! mounts and the AI shooter, and the shooter's trigger and turn decision.
//! No ECS dependency; everything operates on plain data.

pub mod intercept;
pub mod shooter;

pub use starfall_core as core;
