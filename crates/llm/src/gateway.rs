//! `LlmGateway` adapter over the Ollama backend
//!
//! The dialogue core requires that gateway calls never raise; any
//! transport or decode failure becomes the fixed degraded-reply
//! sentinel, which callers detect with `is_gateway_error`.

use async_trait::async_trait;

use telassist_core::{LlmGateway, GATEWAY_ERROR_REPLY};

use crate::backend::{GenerationProfile, OllamaBackend};

pub struct OllamaGateway {
    backend: OllamaBackend,
}

impl OllamaGateway {
    pub fn new(backend: OllamaBackend) -> Self {
        Self { backend }
    }

    async fn call(&self, prompt: &str, system: &str, profile: GenerationProfile) -> String {
        match self.backend.generate(prompt, system, profile).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    model = self.backend.model_name(),
                    ?profile,
                    error = %e,
                    "LLM call failed, returning degraded reply"
                );
                GATEWAY_ERROR_REPLY.to_string()
            }
        }
    }
}

#[async_trait]
impl LlmGateway for OllamaGateway {
    async fn generate(&self, prompt: &str, system: &str) -> String {
        self.call(prompt, system, GenerationProfile::Conversational).await
    }

    async fn generate_structured(&self, prompt: &str, system: &str) -> String {
        self.call(prompt, system, GenerationProfile::Structured).await
    }
}
