// Translation boundary
//
// Each segment is translated as an independent unit of work against an
// Ollama-style HTTP endpoint. The trait keeps the backend swappable; tests
// substitute an identity translator.

pub mod ollama;

use async_trait::async_trait;

pub use ollama::*;

use crate::config::TranslateConfig;
use crate::error::Result;
use crate::lang::Language;
use crate::transcript::Transcript;

/// Machine-translation boundary.
///
/// Implementations replace every segment's text with its translation and must
/// preserve segment order and count exactly. Any unrecoverable per-segment
/// failure aborts the whole stage; a partially translated subtitle file is
/// worse than no file.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate_transcript(
        &self,
        transcript: &mut Transcript,
        source_language: &str,
        target: &Language,
    ) -> Result<()>;
}

/// Factory for creating translator instances
pub struct TranslatorFactory;

impl TranslatorFactory {
    /// Create the default translator implementation (Ollama-backed)
    pub fn create_translator(config: TranslateConfig) -> Box<dyn Translator> {
        Box::new(ollama::OllamaTranslator::new(config))
    }
}
