//! Core types and definitions for the STARFALL combat simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! math helpers, configs, items, components, commands, snapshots, events,
//! constants and the effectiveness estimator. It has no dependency on the
//! ECS or the physics backend.

pub mod catalog;
pub mod commands;
pub mod components;
pub mod config;
pub mod constants;
pub mod effectiveness;
pub mod enums;
pub mod error;
pub mod events;
pub mod items;
pub mod math;
pub mod planet;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
