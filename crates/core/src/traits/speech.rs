//! Voice collaborator contracts
//!
//! Both collaborators are best-effort: failures are logged by the
//! implementation and surface as `None`, never as errors that unwind
//! the primary text response path.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Speech-to-text collaborator.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio file at `audio_path`. `None` on any
    /// failure (missing file, backend down, empty transcript).
    async fn transcribe(&self, audio_path: &Path) -> Option<String>;
}

/// Text-to-speech collaborator.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` into an audio file named after
    /// `filename_prefix`, returning the path relative to the static
    /// file root. `None` on any failure.
    async fn synthesize(&self, text: &str, filename_prefix: &str, lang: &str) -> Option<PathBuf>;
}
