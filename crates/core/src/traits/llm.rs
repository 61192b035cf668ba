//! Language-model gateway contract

use async_trait::async_trait;

/// Fixed reply returned by the gateway when the backend cannot be
/// reached or returns garbage. Callers inspect replies with
/// [`is_gateway_error`] instead of handling transport errors.
pub const GATEWAY_ERROR_REPLY: &str =
    "Erreur de connexion avec l'assistant. Veuillez réessayer dans un instant.";

/// True when a gateway reply is the degraded-output sentinel rather
/// than real model output.
pub fn is_gateway_error(text: &str) -> bool {
    text.contains("Erreur de connexion avec l'assistant")
}

/// Narrow synchronous request/response abstraction over the external
/// generative-text backend.
///
/// Both methods return plain text and never raise: any transport or
/// decode failure collapses into [`GATEWAY_ERROR_REPLY`], so dialogue
/// code degrades locally instead of propagating hard errors. Calls are
/// single-shot; there is no retry.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Free-text generation (longer timeout).
    async fn generate(&self, prompt: &str, system: &str) -> String;

    /// Generation expected to come back in a strictly parseable form
    /// (tagged JSON). Uses a shorter timeout and colder sampling.
    async fn generate_structured(&self, prompt: &str, system: &str) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_reply_is_detectable() {
        assert!(is_gateway_error(GATEWAY_ERROR_REPLY));
        assert!(!is_gateway_error("Quelle est votre adresse complète ?"));
    }
}
