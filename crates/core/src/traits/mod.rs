//! Collaborator contracts
//!
//! The dialogue core depends on these traits, never on concrete
//! implementations, so every external collaborator can be swapped or
//! stubbed in tests:
//!
//! ```text
//! LlmGateway        - generative text backend (never fails outright)
//! SessionStore      - per-user conversation history
//! Transcriber       - audio path -> transcript, best-effort
//! SpeechSynthesizer - text -> audio file, best-effort
//! ```

mod llm;
mod session;
mod speech;

pub use llm::{is_gateway_error, LlmGateway, GATEWAY_ERROR_REPLY};
pub use session::SessionStore;
pub use speech::{SpeechSynthesizer, Transcriber};
