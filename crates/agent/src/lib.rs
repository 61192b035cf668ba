//! Dialogue engine and session orchestrator
//!
//! The engine drives the per-turn resolution of (candidate procedures,
//! session history, new input) to either a clarification question, a
//! slot-filling question, or a final structured response. The
//! orchestrator composes matcher lookup, engine invocation, and
//! best-effort voice input/output around one request.

pub mod engine;
pub mod json;
pub mod orchestrator;
pub mod prompts;
pub mod questions;
pub mod session;

pub use engine::{DialogueEngine, IntentResolution, UNKNOWN_INTENT};
pub use orchestrator::SessionOrchestrator;
pub use session::InMemorySessionStore;
