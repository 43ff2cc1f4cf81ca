//! Propagator configuration.

use serde::Deserialize;
use thiserror::Error;

use copyloc_records::SaveOptions;

pub const ENV_RESAVE_ENABLE_SOURCING: &str = "COPYLOC_RESAVE_ENABLE_SOURCING";
pub const ENV_RESAVE_IGNORE_MANDATORY: &str = "COPYLOC_RESAVE_IGNORE_MANDATORY";
pub const ENV_GUARD_REENTRANCY: &str = "COPYLOC_GUARD_REENTRANCY";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: expected a boolean, got '{value}'")]
    InvalidBool { var: &'static str, value: String },
}

/// Runtime settings for [`crate::LocationPropagator`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PropagatorConfig {
    /// Options for the backfill resave in after-submit.
    pub resave: SaveOptions,
    /// Skip nested after-submit runs triggered by our own resave.
    pub guard_reentrancy: bool,
}

impl Default for PropagatorConfig {
    fn default() -> Self {
        Self {
            resave: SaveOptions {
                enable_sourcing: true,
                ignore_mandatory_fields: true,
            },
            guard_reentrancy: true,
        }
    }
}

impl PropagatorConfig {
    /// Read overrides from the process environment. Unset variables keep
    /// their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(v) = read_bool(&lookup, ENV_RESAVE_ENABLE_SOURCING)? {
            config.resave.enable_sourcing = v;
        }
        if let Some(v) = read_bool(&lookup, ENV_RESAVE_IGNORE_MANDATORY)? {
            config.resave.ignore_mandatory_fields = v;
        }
        if let Some(v) = read_bool(&lookup, ENV_GUARD_REENTRANCY)? {
            config.guard_reentrancy = v;
        }
        Ok(config)
    }
}

fn read_bool(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(Some(true)),
        "false" | "0" | "no" => Ok(Some(false)),
        _ => Err(ConfigError::InvalidBool { var, value: raw }),
    }
}
