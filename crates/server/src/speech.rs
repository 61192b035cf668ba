//! HTTP voice collaborators
//!
//! Thin clients over external speech services. Both are best-effort
//! per the core contracts: every failure is logged and collapses to
//! `None`, leaving the text path intact.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use telassist_core::{SpeechSynthesizer, Transcriber};

const SPEECH_TIMEOUT: Duration = Duration::from_secs(30);

/// Subdirectory of the static root where synthesized replies land.
const AUDIO_SUBDIR: &str = "generated_audio";

#[derive(Debug, Deserialize)]
struct TranscriptionReply {
    text: String,
}

/// Speech-to-text over an HTTP service accepting a multipart upload
/// on `/transcribe` and answering `{"text": "..."}`.
pub struct HttpTranscriber {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpTranscriber {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    async fn request(&self, audio_path: &Path) -> Result<String, String> {
        let bytes = tokio::fs::read(audio_path)
            .await
            .map_err(|e| format!("read upload: {e}"))?;
        let filename = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav")
            .to_string();

        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename);
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/transcribe", self.endpoint))
            .multipart(form)
            .timeout(SPEECH_TIMEOUT)
            .send()
            .await
            .map_err(|e| format!("request: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("status {}", response.status()));
        }

        let reply: TranscriptionReply = response
            .json()
            .await
            .map_err(|e| format!("decode: {e}"))?;
        Ok(reply.text)
    }
}

#[async_trait]
impl Transcriber for HttpTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Option<String> {
        match self.request(audio_path).await {
            Ok(text) if !text.trim().is_empty() => Some(text),
            Ok(_) => {
                tracing::warn!(path = %audio_path.display(), "Empty transcript");
                None
            }
            Err(e) => {
                tracing::warn!(path = %audio_path.display(), error = %e, "Transcription failed");
                None
            }
        }
    }
}

/// Text-to-speech over an HTTP service accepting
/// `{"text": ..., "lang": ...}` on `/synthesize` and answering raw
/// audio bytes. Output files land under the static root so the
/// `/static` route can serve them.
pub struct HttpSynthesizer {
    client: reqwest::Client,
    endpoint: String,
    static_root: PathBuf,
}

impl HttpSynthesizer {
    pub fn new(endpoint: impl Into<String>, static_root: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            static_root: static_root.into(),
        }
    }

    async fn request(&self, text: &str, lang: &str) -> Result<Vec<u8>, String> {
        let response = self
            .client
            .post(format!("{}/synthesize", self.endpoint))
            .json(&serde_json::json!({ "text": text, "lang": lang }))
            .timeout(SPEECH_TIMEOUT)
            .send()
            .await
            .map_err(|e| format!("request: {e}"))?;

        if !response.status().is_success() {
            return Err(format!("status {}", response.status()));
        }

        let bytes = response.bytes().await.map_err(|e| format!("body: {e}"))?;
        if bytes.is_empty() {
            return Err("empty audio body".to_string());
        }
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSynthesizer {
    async fn synthesize(&self, text: &str, filename_prefix: &str, lang: &str) -> Option<PathBuf> {
        let audio = match self.request(text, lang).await {
            Ok(audio) => audio,
            Err(e) => {
                tracing::warn!(error = %e, "Speech synthesis failed");
                return None;
            }
        };

        let rel_path = PathBuf::from(AUDIO_SUBDIR).join(format!("{filename_prefix}_{lang}.mp3"));
        let full_path = self.static_root.join(&rel_path);

        if let Some(parent) = full_path.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                tracing::warn!(error = %e, "Failed to create audio output directory");
                return None;
            }
        }

        match tokio::fs::write(&full_path, &audio).await {
            Ok(()) => Some(rel_path),
            Err(e) => {
                tracing::warn!(path = %full_path.display(), error = %e, "Failed to write audio");
                None
            }
        }
    }
}
