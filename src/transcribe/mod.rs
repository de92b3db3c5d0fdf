// Transcription boundary
//
// The speech engine is an external process; the trait keeps it swappable and
// mockable. whisper.rs wraps the OpenAI Whisper CLI, which writes its result
// as JSON into an output directory.

pub mod whisper;

use async_trait::async_trait;
use std::path::Path;

pub use whisper::*;

use crate::config::TranscriberConfig;
use crate::error::Result;
use crate::transcript::Transcript;

/// Speech-to-text boundary around the external inference engine.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a normalized audio file into an ordered segment sequence.
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<Transcript>;
}

/// Factory for creating transcriber instances
pub struct TranscriberFactory;

impl TranscriberFactory {
    /// Create the default transcriber implementation (whisper CLI)
    pub fn create_transcriber(config: TranscriberConfig) -> Box<dyn Transcriber> {
        Box::new(whisper::WhisperCliTranscriber::new(config))
    }
}
