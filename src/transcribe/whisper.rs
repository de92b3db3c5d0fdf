use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, info};

use super::Transcriber;
use crate::config::TranscriberConfig;
use crate::error::{LingosubError, Result};
use crate::transcript::{Segment, Transcript};

/// Whisper CLI JSON output format (unknown fields ignored)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperOutput {
    pub text: String,
    pub segments: Vec<WhisperSegment>,
    pub language: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Convert the engine-specific output into the pipeline's transcript model,
/// preserving segment order.
pub fn parse_whisper_json(json: &str, fallback_language: &str) -> Result<Transcript> {
    let output: WhisperOutput = serde_json::from_str(json)
        .map_err(|e| LingosubError::Transcription(format!("Failed to parse whisper JSON: {}", e)))?;

    let segments: Vec<Segment> = output
        .segments
        .into_iter()
        .map(|seg| Segment::new(seg.start, seg.end, seg.text.trim()))
        .collect();

    let language = output
        .language
        .unwrap_or_else(|| fallback_language.to_string());

    Ok(Transcript::new(segments, language))
}

/// Transcriber backed by the OpenAI Whisper command-line tool.
///
/// The first invocation may download the model artifact, so the run is
/// bounded by a generous configurable timeout rather than left to block
/// indefinitely.
pub struct WhisperCliTranscriber {
    config: TranscriberConfig,
}

impl WhisperCliTranscriber {
    pub fn new(config: TranscriberConfig) -> Self {
        Self { config }
    }

    async fn run_whisper(&self, audio_path: &Path, language: &str) -> Result<Transcript> {
        let temp_dir = tempfile::tempdir().map_err(|e| {
            LingosubError::Transcription(format!("Failed to create temp directory: {}", e))
        })?;
        let output_dir = temp_dir.path();

        let mut cmd = Command::new(&self.config.binary_path);
        cmd.arg(audio_path)
            .arg("--model")
            .arg(&self.config.model)
            .arg("--task")
            .arg("transcribe")
            .arg("--language")
            .arg(language)
            .arg("--output_dir")
            .arg(output_dir)
            .arg("--output_format")
            .arg("json");
        // If the timeout below fires, dropping the output future must take
        // the engine process down with it.
        cmd.kill_on_drop(true);

        debug!("Executing whisper command: {:?}", cmd);

        let deadline = Duration::from_secs(self.config.timeout_secs);
        let output = timeout(deadline, cmd.output())
            .await
            .map_err(|_| {
                LingosubError::Transcription(format!(
                    "Whisper did not finish within {} seconds",
                    self.config.timeout_secs
                ))
            })?
            .map_err(|e| {
                LingosubError::Transcription(format!("Failed to execute whisper: {}", e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LingosubError::Transcription(format!(
                "Whisper failed: {}",
                stderr
            )));
        }

        let audio_stem = audio_path
            .file_stem()
            .ok_or_else(|| LingosubError::Transcription("Invalid audio filename".to_string()))?;
        let json_file = output_dir.join(format!("{}.json", audio_stem.to_string_lossy()));

        let json_content = std::fs::read_to_string(&json_file).map_err(|e| {
            LingosubError::Transcription(format!("Failed to read whisper output: {}", e))
        })?;

        parse_whisper_json(&json_content, language)
    }
}

#[async_trait]
impl Transcriber for WhisperCliTranscriber {
    async fn transcribe(&self, audio_path: &Path, language: &str) -> Result<Transcript> {
        info!(
            "Transcribing {} (model: {}, language: {})",
            audio_path.display(),
            self.config.model,
            language
        );

        let transcript = self.run_whisper(audio_path, language).await?;

        info!(
            "Transcription completed: {} segments",
            transcript.len()
        );
        Ok(transcript)
    }
}
