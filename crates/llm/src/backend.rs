//! Ollama backend

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use telassist_config::LlmSettings;

use crate::LlmError;

/// How a generation call will be consumed, which decides its timeout
/// and sampling temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationProfile {
    /// Classification/extraction calls that must come back as strict
    /// JSON. Short timeout, cold sampling.
    Structured,
    /// Free-text phrasing for the user. Longer timeout.
    Conversational,
}

/// Backend configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub model: String,
    pub endpoint: String,
    pub structured_timeout: Duration,
    pub generation_timeout: Duration,
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "llama3".to_string(),
            endpoint: "http://localhost:11434".to_string(),
            structured_timeout: Duration::from_secs(15),
            generation_timeout: Duration::from_secs(30),
            temperature: 0.3,
            top_p: 0.8,
            max_tokens: 500,
        }
    }
}

impl From<&LlmSettings> for LlmConfig {
    fn from(settings: &LlmSettings) -> Self {
        Self {
            model: settings.model.clone(),
            endpoint: settings.endpoint.clone(),
            structured_timeout: Duration::from_secs(settings.structured_timeout_secs),
            generation_timeout: Duration::from_secs(settings.generation_timeout_secs),
            temperature: settings.temperature,
            top_p: settings.top_p,
            max_tokens: settings.max_tokens,
        }
    }
}

/// Blocking-per-request Ollama client. Calls are single-shot: a failed
/// attempt is reported, not retried.
#[derive(Clone)]
pub struct OllamaBackend {
    client: Client,
    config: LlmConfig,
}

impl OllamaBackend {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api{}", self.config.endpoint, path)
    }

    fn timeout_for(&self, profile: GenerationProfile) -> Duration {
        match profile {
            GenerationProfile::Structured => self.config.structured_timeout,
            GenerationProfile::Conversational => self.config.generation_timeout,
        }
    }

    /// Generate text for `prompt` under `system`.
    pub async fn generate(
        &self,
        prompt: &str,
        system: &str,
        profile: GenerationProfile,
    ) -> Result<String, LlmError> {
        let request = OllamaGenerateRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            system: system.to_string(),
            stream: false,
            options: OllamaOptions {
                temperature: Some(match profile {
                    // Colder sampling for calls that must parse.
                    GenerationProfile::Structured => self.config.temperature.min(0.1),
                    GenerationProfile::Conversational => self.config.temperature,
                }),
                top_p: Some(self.config.top_p),
                num_predict: Some(self.config.max_tokens as i32),
            },
        };

        let response = self
            .client
            .post(self.api_url("/generate"))
            .timeout(self.timeout_for(profile))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error = response.text().await.unwrap_or_default();
            if status.is_server_error() {
                return Err(LlmError::Network(format!("Server error {}: {}", status, error)));
            }
            return Err(LlmError::Api(error));
        }

        let body: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(body.response)
    }

    /// Check whether the backend answers at all.
    pub async fn is_available(&self) -> bool {
        self.client
            .get(format!("{}/api/tags", self.config.endpoint))
            .timeout(Duration::from_secs(2))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    pub fn model_name(&self) -> &str {
        &self.config.model
    }
}

// Ollama API types
#[derive(Debug, Serialize)]
struct OllamaGenerateRequest {
    model: String,
    prompt: String,
    system: String,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    #[serde(default)]
    response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_settings() {
        let settings = LlmSettings::default();
        let config = LlmConfig::from(&settings);
        assert_eq!(config.structured_timeout, Duration::from_secs(15));
        assert_eq!(config.generation_timeout, Duration::from_secs(30));
        assert_eq!(config.model, "llama3");
    }

    #[test]
    fn test_timeout_selection() {
        let backend = OllamaBackend::new(LlmConfig::default()).unwrap();
        assert_eq!(
            backend.timeout_for(GenerationProfile::Structured),
            Duration::from_secs(15)
        );
        assert_eq!(
            backend.timeout_for(GenerationProfile::Conversational),
            Duration::from_secs(30)
        );
    }
}
