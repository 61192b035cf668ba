//! Generative-text backend integration
//!
//! `OllamaBackend` speaks the Ollama `/api/generate` protocol and
//! reports failures as `LlmError`. `OllamaGateway` wraps it behind the
//! `LlmGateway` contract, collapsing every failure into the fixed
//! degraded-reply sentinel so dialogue code never sees a hard error.

pub mod backend;
pub mod gateway;

pub use backend::{GenerationProfile, LlmConfig, OllamaBackend};
pub use gateway::OllamaGateway;

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        LlmError::Network(err.to_string())
    }
}

impl From<LlmError> for telassist_core::Error {
    fn from(err: LlmError) -> Self {
        telassist_core::Error::Llm(err.to_string())
    }
}
