//! Combat simulation for STARFALL.
//!
//! Owns the hecs ECS world and a physics world, runs the combat systems at
//! a fixed tick rate, and produces `CombatSnapshot`s for the frontend.

pub mod abilities;
pub mod components;
pub mod engine;
pub mod error;
pub mod gun;
pub mod mount;
pub mod physics;
pub mod projectile;
pub mod systems;
pub mod targeting;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use error::CombatError;
pub use starfall_core as core;
