//! Configuration consistency errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown {kind} `{code}`")]
    UnknownReference { kind: &'static str, code: String },

    #[error("`{code}`: {field} {reason}")]
    InvalidValue {
        code: String,
        field: &'static str,
        reason: &'static str,
    },

    #[error("all item options in a loadout group must be of the same type: {items}")]
    MixedItemTypes { items: String },

    #[error("all gun options in a loadout group must have equal fixed param: {items}")]
    MixedFixedGuns { items: String },
}

impl ConfigError {
    pub(crate) fn invalid(code: &str, field: &'static str, reason: &'static str) -> Self {
        ConfigError::InvalidValue {
            code: code.to_string(),
            field,
            reason,
        }
    }
}
