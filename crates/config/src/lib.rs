//! Configuration management
//!
//! Settings are layered, lowest priority first:
//! 1. serde defaults baked into the structs
//! 2. `config/default.yaml`
//! 3. `config/{env}.yaml` when `TELASSIST_ENV` names an environment
//! 4. `TELASSIST__*` environment variables (`__` separates nesting)

pub mod settings;

pub use settings::{
    load_settings, CatalogSettings, LlmSettings, MatcherSettings, RuntimeEnvironment,
    ServerConfig, Settings, VoiceSettings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
