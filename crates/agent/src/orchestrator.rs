//! Session orchestrator
//!
//! Composes one request end to end: voice input (best-effort), matcher
//! lookup, dialogue engine turn, and voice output (best-effort). Only
//! the text path is authoritative; a dead transcriber or synthesizer
//! degrades the response, it never fails it.

use std::path::Path;
use std::sync::Arc;

use telassist_catalog::ProcedureMatcher;
use telassist_core::{AgentResponse, SpeechSynthesizer, Transcriber};

use crate::engine::DialogueEngine;

const EMPTY_INPUT_REPLY: &str =
    "Je n'ai reçu aucun message. Comment puis-je vous aider ?";
const EMPTY_INPUT_QUESTION: &str = "Que souhaitez-vous faire ?";

const TRANSCRIPTION_FAILED_REPLY: &str = "Désolé, je n'ai pas pu comprendre l'audio. \
Pouvez-vous répéter ou taper votre demande ?";
const TRANSCRIPTION_FAILED_QUESTION: &str = "Pouvez-vous reformuler votre demande ?";

pub struct SessionOrchestrator {
    engine: Arc<DialogueEngine>,
    matcher: Arc<dyn ProcedureMatcher>,
    transcriber: Option<Arc<dyn Transcriber>>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    top_k: usize,
    voice_lang: String,
}

impl SessionOrchestrator {
    pub fn new(
        engine: Arc<DialogueEngine>,
        matcher: Arc<dyn ProcedureMatcher>,
        top_k: usize,
    ) -> Self {
        Self {
            engine,
            matcher,
            transcriber: None,
            synthesizer: None,
            top_k,
            voice_lang: "fr".to_string(),
        }
    }

    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    pub fn with_synthesizer(
        mut self,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        lang: impl Into<String>,
    ) -> Self {
        self.synthesizer = Some(synthesizer);
        self.voice_lang = lang.into();
        self
    }

    /// One text turn: candidate lookup then engine dispatch. Blank
    /// input short-circuits before touching the session.
    pub async fn handle_text(&self, user_id: &str, text: &str) -> AgentResponse {
        let text = text.trim();
        if text.is_empty() {
            return AgentResponse::prompt(EMPTY_INPUT_REPLY, EMPTY_INPUT_QUESTION);
        }

        let candidates = self.matcher.search(text, self.top_k).await;
        tracing::debug!(user_id, candidates = candidates.len(), "Matcher lookup done");

        self.engine.generate_response(text, &candidates, user_id).await
    }

    /// One audio turn: transcribe, then run the text path. A failed
    /// transcription yields a retry prompt, not an error.
    pub async fn handle_audio(&self, user_id: &str, audio_path: &Path) -> AgentResponse {
        let transcript = match &self.transcriber {
            Some(transcriber) => transcriber.transcribe(audio_path).await,
            None => {
                tracing::warn!("Audio query received but no transcriber configured");
                None
            }
        };

        match transcript {
            Some(text) if !text.trim().is_empty() => {
                tracing::info!(user_id, "Audio transcribed: {}", text.trim());
                self.handle_text(user_id, &text).await
            }
            _ => AgentResponse::prompt(TRANSCRIPTION_FAILED_REPLY, TRANSCRIPTION_FAILED_QUESTION),
        }
    }

    /// Attach a synthesized audio rendition of the response text,
    /// when a synthesizer is configured. The response is returned
    /// unchanged on any synthesis failure.
    pub async fn attach_voice(&self, user_id: &str, mut response: AgentResponse) -> AgentResponse {
        let Some(synthesizer) = &self.synthesizer else {
            return response;
        };

        let short_id = uuid::Uuid::new_v4().simple().to_string();
        let prefix = format!("response_{}_{}", user_id, &short_id[..8]);
        match synthesizer
            .synthesize(&response.response_text, &prefix, &self.voice_lang)
            .await
        {
            Some(rel_path) => {
                response.audio_response_url =
                    Some(format!("/static/{}", rel_path.to_string_lossy()));
            }
            None => {
                tracing::warn!(user_id, "Speech synthesis failed, returning text only");
            }
        }
        response
    }
}
