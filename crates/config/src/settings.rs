//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub llm: LlmSettings,

    #[serde(default)]
    pub matcher: MatcherSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub voice: VoiceSettings,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty means same-origin only.
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Directory served under `/static` (generated audio lives in a
    /// `generated_audio` subdirectory).
    #[serde(default = "default_static_dir")]
    pub static_dir: String,

    /// Directory for temporary audio uploads.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_static_dir() -> String {
    "static".to_string()
}
fn default_uploads_dir() -> String {
    "temp_uploads".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            static_dir: default_static_dir(),
            uploads_dir: default_uploads_dir(),
        }
    }
}

/// Generative backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    /// Timeout for structured (classification/extraction) calls.
    #[serde(default = "default_structured_timeout")]
    pub structured_timeout_secs: u64,

    /// Timeout for free-text generation.
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout_secs: u64,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
}

fn default_llm_endpoint() -> String {
    "http://localhost:11434".to_string()
}
fn default_llm_model() -> String {
    "llama3".to_string()
}
fn default_structured_timeout() -> u64 {
    15
}
fn default_generation_timeout() -> u64 {
    30
}
fn default_temperature() -> f32 {
    0.3
}
fn default_top_p() -> f32 {
    0.8
}
fn default_max_tokens() -> usize {
    500
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            structured_timeout_secs: default_structured_timeout(),
            generation_timeout_secs: default_generation_timeout(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Matcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherSettings {
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum relevance score for a candidate to be returned.
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

fn default_top_k() -> usize {
    3
}
fn default_min_score() -> f32 {
    0.3
}

impl Default for MatcherSettings {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_score: default_min_score(),
        }
    }
}

/// Catalog source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default = "default_catalog_path")]
    pub path: String,
}

fn default_catalog_path() -> String {
    "data/procedures.json".to_string()
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
        }
    }
}

/// Voice input/output collaborator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceSettings {
    /// Enable the transcription/synthesis collaborators. When false
    /// the service is text-only.
    #[serde(default)]
    pub enabled: bool,

    /// Speech-to-text HTTP endpoint.
    #[serde(default = "default_transcription_endpoint")]
    pub transcription_endpoint: String,

    /// Text-to-speech HTTP endpoint.
    #[serde(default = "default_synthesis_endpoint")]
    pub synthesis_endpoint: String,

    /// Default language for synthesized replies.
    #[serde(default = "default_voice_lang")]
    pub lang: String,
}

fn default_transcription_endpoint() -> String {
    "http://localhost:9000".to_string()
}
fn default_synthesis_endpoint() -> String {
    "http://localhost:9100".to_string()
}
fn default_voice_lang() -> String {
    "fr".to_string()
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            transcription_endpoint: default_transcription_endpoint(),
            synthesis_endpoint: default_synthesis_endpoint(),
            lang: default_voice_lang(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.matcher.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                field: "matcher.top_k".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.matcher.min_score) {
            return Err(ConfigError::InvalidValue {
                field: "matcher.min_score".to_string(),
                message: format!("must be between 0.0 and 1.0, got {}", self.matcher.min_score),
            });
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".to_string(),
                message: format!("must be between 0.0 and 2.0, got {}", self.llm.temperature),
            });
        }
        if self.llm.structured_timeout_secs == 0 || self.llm.generation_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.timeouts".to_string(),
                message: "timeouts must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

/// Load settings from files and environment.
///
/// Priority: env vars > `config/{env}.yaml` > `config/default.yaml` >
/// struct defaults. Missing files are fine; invalid ones are not.
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    if Path::new("config/default.yaml").exists() {
        builder = builder.add_source(File::with_name("config/default"));
    }

    if let Some(env) = env {
        let env_file = format!("config/{}", env);
        if Path::new(&format!("{}.yaml", env_file)).exists() {
            builder = builder.add_source(File::with_name(&env_file));
        } else {
            tracing::warn!(env, "No config file for environment, skipping layer");
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("TELASSIST")
            .separator("__")
            .try_parsing(true),
    );

    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.server.port, 8000);
        assert_eq!(settings.matcher.top_k, 3);
        assert!(!settings.voice.enabled);
    }

    #[test]
    fn test_invalid_min_score_rejected() {
        let mut settings = Settings::default();
        settings.matcher.min_score = 1.5;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut settings = Settings::default();
        settings.matcher.top_k = 0;
        assert!(settings.validate().is_err());
    }
}
