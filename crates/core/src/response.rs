//! Wire types shared with API callers
//!
//! `AgentResponse` keeps the field names of the existing callers
//! (`response_text`, `todo_list`, ...), so the JSON shape is stable.

use serde::{Deserialize, Serialize};

/// An inbound query: literal text, or nothing when an audio file
/// is supplied and must be transcribed first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserQuery {
    #[serde(default)]
    pub text: Option<String>,
    pub user_id: String,
}

/// The sole response shape for every text/audio query.
///
/// `missing_context` carries slot names while collecting context, and
/// candidate procedure names when asking the user to disambiguate. The
/// engine keeps these apart internally; the overload only exists here,
/// on the wire, for caller compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResponse {
    pub response_text: String,
    #[serde(default)]
    pub todo_list: Vec<String>,
    #[serde(default)]
    pub missing_context: Vec<String>,
    pub is_complete: bool,
    #[serde(default)]
    pub next_question: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_response_url: Option<String>,
}

impl AgentResponse {
    /// A terminal-for-turn prompt with no slot or candidate state.
    pub fn prompt(text: impl Into<String>, next_question: impl Into<String>) -> Self {
        Self {
            response_text: text.into(),
            todo_list: Vec::new(),
            missing_context: Vec::new(),
            is_complete: false,
            next_question: Some(next_question.into()),
            audio_response_url: None,
        }
    }

    /// An incomplete response asking for one more piece of context.
    pub fn question(text: impl Into<String>, missing: Vec<String>) -> Self {
        let text = text.into();
        Self {
            next_question: Some(text.clone()),
            response_text: text,
            todo_list: Vec::new(),
            missing_context: missing,
            is_complete: false,
            audio_response_url: None,
        }
    }

    /// The final, completed response for a procedure.
    pub fn complete(text: impl Into<String>, todo_list: Vec<String>) -> Self {
        Self {
            response_text: text.into(),
            todo_list,
            missing_context: Vec::new(),
            is_complete: true,
            next_question: None,
            audio_response_url: None,
        }
    }
}
