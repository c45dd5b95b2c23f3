//! Errors raised by invalid runtime assignments.

use thiserror::Error;

use starfall_core::error::ConfigError;

#[derive(Debug, Error)]
pub enum CombatError {
    #[error("gun `{gun}` ({gun_kind}) does not fit a {mount_kind} mount")]
    IncompatibleMount {
        gun: String,
        gun_kind: &'static str,
        mount_kind: &'static str,
    },

    #[error("hull has no gun slot {slot}")]
    NoSuchSlot { slot: u8 },

    #[error("unknown ship config `{0}`")]
    UnknownShip(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Entity(#[from] hecs::NoSuchEntity),
}
