//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are free functions over `&mut World` and the physics world. They
//! own no state; removals and spawns are queued for the sweep in `cleanup`.

pub mod abilities;
pub mod cleanup;
pub mod gravity;
pub mod movement;
pub mod pilots;
pub mod projectiles;
pub mod snapshot;
pub mod weapons;
