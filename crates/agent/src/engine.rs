//! Dialogue engine
//!
//! Drives one turn of the conversation: resolve the intent among the
//! matcher's candidates, extract slot values over the whole session,
//! then either ask the single next question or emit the final
//! structured response and reset the session.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Deserialize;
use tokio::sync::Mutex;

use telassist_catalog::Procedure;
use telassist_core::{
    is_gateway_error, AgentResponse, LlmGateway, SessionStore, Turn,
};

use crate::json;
use crate::prompts;
use crate::questions;

/// Sentinel intent when no procedure applies.
pub const UNKNOWN_INTENT: &str = "unknown";

/// A rendered fallback question shorter than this is treated as model
/// garbage and replaced with the raw template.
const MIN_NATURAL_QUESTION_CHARS: usize = 10;

/// Fixed reply when the matcher returns no candidates.
const NO_MATCH_REPLY: &str = "Désolé, je n'ai pas trouvé de procédure correspondant à votre \
demande. Pouvez-vous reformuler ou préciser ce que vous souhaitez faire ?";
const NO_MATCH_QUESTION: &str = "Que souhaitez-vous faire exactement ?";

/// Outcome of intent resolution for one turn.
#[derive(Debug, Clone)]
pub struct IntentResolution {
    pub procedure: String,
    pub confidence: f32,
    pub detected_language: String,
}

#[derive(Debug, Deserialize)]
struct IntentReply {
    intent: Option<String>,
    confidence: Option<f32>,
    detected_language: Option<String>,
}

/// Per-user dialogue state machine.
pub struct DialogueEngine {
    gateway: Arc<dyn LlmGateway>,
    sessions: Arc<dyn SessionStore>,
    /// Serializes overlapping turns for one user id so concurrent
    /// requests cannot interleave history updates. Entries are never
    /// evicted; one small slot per distinct user id for the process
    /// lifetime, same policy as the in-memory session store.
    turn_gates: DashMap<String, Arc<Mutex<()>>>,
}

impl DialogueEngine {
    pub fn new(gateway: Arc<dyn LlmGateway>, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            gateway,
            sessions,
            turn_gates: DashMap::new(),
        }
    }

    /// Resolve the user's intent among the matcher's candidates.
    ///
    /// Never fails: an unparseable or absent gateway reply falls back
    /// to the top-ranked candidate with a low fixed confidence.
    pub async fn resolve_intent(
        &self,
        input: &str,
        candidates: &[Arc<Procedure>],
    ) -> IntentResolution {
        if candidates.is_empty() {
            return IntentResolution {
                procedure: UNKNOWN_INTENT.to_string(),
                confidence: 0.0,
                detected_language: UNKNOWN_INTENT.to_string(),
            };
        }

        let raw = self
            .gateway
            .generate_structured(&prompts::intent_prompt(input, candidates), prompts::INTENT_SYSTEM)
            .await;

        let reply: Option<IntentReply> = json::parse_first_object(&raw);
        match reply {
            Some(IntentReply {
                intent: Some(intent),
                confidence: Some(confidence),
                detected_language,
            }) => IntentResolution {
                procedure: intent,
                confidence,
                detected_language: detected_language
                    .unwrap_or_else(|| UNKNOWN_INTENT.to_string()),
            },
            _ => {
                tracing::debug!("Unparseable intent reply, falling back to top candidate");
                IntentResolution {
                    procedure: candidates[0].name.clone(),
                    confidence: 0.3,
                    detected_language: UNKNOWN_INTENT.to_string(),
                }
            }
        }
    }

    /// Extract slot values for `procedure` and either ask the next
    /// question or produce the final response.
    ///
    /// Slot state is recomputed from scratch every turn from
    /// `(procedure, history, input)`; nothing incremental is kept.
    pub async fn collect_context(
        &self,
        procedure: &Procedure,
        input: &str,
        history: &[Turn],
    ) -> AgentResponse {
        let required = procedure.required_context();
        if required.is_empty() {
            return self.build_final_response(procedure, &BTreeMap::new());
        }

        let collected = self.extract_slots(procedure, &required, input, history).await;

        let missing: Vec<String> = required
            .iter()
            .filter(|slot| !collected.contains_key(**slot))
            .map(|slot| slot.to_string())
            .collect();

        if missing.is_empty() {
            return self.build_final_response(procedure, &collected);
        }

        let next_question = self.question_for(&missing[0], procedure).await;
        tracing::debug!(
            procedure = %procedure.name,
            missing = missing.len(),
            "Context incomplete, asking next question"
        );
        AgentResponse::question(next_question, missing)
    }

    /// One joint gateway call extracting every required slot. A parse
    /// failure degrades to "nothing extracted", never to an error.
    async fn extract_slots(
        &self,
        procedure: &Procedure,
        required: &[&str],
        input: &str,
        history: &[Turn],
    ) -> BTreeMap<String, String> {
        let raw = self
            .gateway
            .generate_structured(
                &prompts::extraction_prompt(procedure, required, input, history),
                prompts::EXTRACTION_SYSTEM,
            )
            .await;

        let parsed: Option<serde_json::Map<String, serde_json::Value>> =
            json::parse_first_object(&raw);

        let mut collected = BTreeMap::new();
        if let Some(object) = parsed {
            for slot in required {
                if let Some(value) = object.get(*slot).and_then(|v| v.as_str()) {
                    if !value.trim().is_empty() {
                        collected.insert(slot.to_string(), value.trim().to_string());
                    }
                }
            }
        } else {
            tracing::debug!(procedure = %procedure.name, "Unparseable extraction reply");
        }
        collected
    }

    /// Pick the next question for a missing slot: fixed template when
    /// one matches, otherwise a gateway-rendered fallback that is
    /// discarded if it looks broken.
    async fn question_for(&self, slot: &str, procedure: &Procedure) -> String {
        if let Some(template) = questions::template_for(slot) {
            return template.to_string();
        }

        let raw_fallback = questions::fallback_question(&procedure.name, slot);
        let rendered = self
            .gateway
            .generate(&prompts::question_prompt(&raw_fallback), prompts::QUESTION_SYSTEM)
            .await;
        let rendered = rendered.trim();

        if rendered.chars().count() < MIN_NATURAL_QUESTION_CHARS || is_gateway_error(rendered) {
            raw_fallback
        } else {
            rendered.to_string()
        }
    }

    /// Assemble the final structured response for a completed
    /// procedure: confirmed information, resolved documents, and the
    /// remarks verbatim.
    pub fn build_final_response(
        &self,
        procedure: &Procedure,
        collected: &BTreeMap<String, String>,
    ) -> AgentResponse {
        let client_type = collected
            .iter()
            .find(|(key, _)| key.to_lowercase().contains("client"))
            .map(|(_, value)| value.as_str());
        let todo_list = procedure.documents_required.resolve(client_type);

        let mut parts = vec![format!(
            "Parfait ! Pour votre demande de '{}', voici ce dont vous avez besoin :",
            procedure.name
        )];

        if !collected.is_empty() {
            parts.push("\n📋 Informations confirmées :".to_string());
            // Catalog slot order, not map order.
            for slot in procedure.required_context() {
                if let Some(value) = collected.get(slot) {
                    parts.push(format!("• {} : {}", slot, value));
                }
            }
        }

        if !todo_list.is_empty() {
            parts.push("\n📄 Documents requis :".to_string());
            for doc in &todo_list {
                parts.push(format!("• {}", doc));
            }
        }

        if !procedure.remarks.is_empty() {
            parts.push("\n⚠️ Remarques importantes :".to_string());
            for remark in &procedure.remarks {
                parts.push(format!("• {}", remark));
            }
        }

        AgentResponse::complete(parts.join("\n"), todo_list)
    }

    /// Drive one full turn for `user_id`.
    ///
    /// Appends the raw input before branching, appends the emitted
    /// response before returning, and clears the session's history if
    /// and only if a procedure completed — the sole state-clearing
    /// transition in the engine.
    pub async fn generate_response(
        &self,
        input: &str,
        candidates: &[Arc<Procedure>],
        user_id: &str,
    ) -> AgentResponse {
        let gate = self
            .turn_gates
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _turn = gate.lock().await;

        // History as it stood before this turn; the extraction prompt
        // appends the current input itself.
        let history = self.sessions.history(user_id).await;
        self.sessions.append(user_id, Turn::user(input)).await;

        if candidates.is_empty() {
            let response = AgentResponse::prompt(NO_MATCH_REPLY, NO_MATCH_QUESTION);
            self.sessions
                .append(user_id, Turn::assistant(&response.response_text))
                .await;
            return response;
        }

        let resolution = self.resolve_intent(input, candidates).await;
        tracing::info!(
            user_id,
            intent = %resolution.procedure,
            confidence = resolution.confidence,
            language = %resolution.detected_language,
            "Intent resolved"
        );

        let target = candidates
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(&resolution.procedure));

        let target = match target {
            Some(procedure) => procedure.clone(),
            None if candidates.len() > 1 => {
                // Ambiguous: ask the user to pick among the top candidates.
                let names: Vec<String> = candidates
                    .iter()
                    .take(3)
                    .map(|p| p.name.clone())
                    .collect();
                let clarification = format!(
                    "Je vois plusieurs procédures possibles. Laquelle vous intéresse ?\n{}",
                    names
                        .iter()
                        .map(|n| format!("• {}", n))
                        .collect::<Vec<_>>()
                        .join("\n")
                );
                let response = AgentResponse::question(clarification, names);
                self.sessions
                    .append(user_id, Turn::assistant(&response.response_text))
                    .await;
                return response;
            }
            // Single candidate without a clear match: proceed with it.
            None => candidates[0].clone(),
        };

        let response = self.collect_context(&target, input, &history).await;
        self.sessions
            .append(user_id, Turn::assistant(&response.response_text))
            .await;

        if response.is_complete {
            self.sessions.clear(user_id).await;
        }

        response
    }
}
