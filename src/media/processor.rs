use async_trait::async_trait;
use std::path::Path;
use std::process::Command;
use tracing::info;

use super::{MediaCommandBuilder, MediaExtractor};
use crate::config::MediaConfig;
use crate::error::{LingosubError, Result};

/// FFmpeg-backed audio extractor.
pub struct FfmpegExtractor {
    config: MediaConfig,
    command_builder: MediaCommandBuilder,
}

impl FfmpegExtractor {
    pub fn new(config: MediaConfig) -> Self {
        let command_builder = MediaCommandBuilder::new(&config.binary_path);

        Self {
            config,
            command_builder,
        }
    }
}

#[async_trait]
impl MediaExtractor for FfmpegExtractor {
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()> {
        info!(
            "Extracting audio from {} to {}",
            video_path.display(),
            audio_path.display()
        );

        let command = self.command_builder.extract_audio(video_path, audio_path);
        command.execute().await?;

        info!("Audio extraction completed");
        Ok(())
    }

    fn check_availability(&self) -> Result<()> {
        let output = Command::new(&self.config.binary_path)
            .arg("-version")
            .output()
            .map_err(|e| LingosubError::Media(format!("Transcoder not found: {}", e)))?;

        if output.status.success() {
            info!("Transcoder is available");
            Ok(())
        } else {
            Err(LingosubError::Media(
                "Transcoder version check failed".to_string(),
            ))
        }
    }
}
