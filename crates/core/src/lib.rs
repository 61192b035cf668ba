//! Core types and collaborator contracts for the procedure assistant
//!
//! This crate provides the foundational pieces shared by every other crate:
//! - The `AgentResponse` wire contract and query types
//! - Conversation turns and roles
//! - Error types
//! - Traits for pluggable collaborators (LLM gateway, transcription,
//!   speech synthesis, session storage)

pub mod conversation;
pub mod error;
pub mod response;
pub mod traits;

pub use conversation::{Turn, TurnRole};
pub use error::{Error, Result};
pub use response::{AgentResponse, UserQuery};

pub use traits::{
    // LLM
    LlmGateway, GATEWAY_ERROR_REPLY, is_gateway_error,
    // Sessions
    SessionStore,
    // Voice collaborators
    SpeechSynthesizer, Transcriber,
};
