use std::path::Path;
use tokio::process::Command;
use tracing::debug;

use crate::error::{LingosubError, Result};

/// One transcoder invocation, built up argument by argument.
#[derive(Debug, Clone)]
pub struct MediaCommand {
    pub binary_path: String,
    pub args: Vec<String>,
    pub description: String,
}

impl MediaCommand {
    pub fn new<S1: Into<String>, S2: Into<String>>(binary_path: S1, description: S2) -> Self {
        Self {
            binary_path: binary_path.into(),
            args: Vec::new(),
            description: description.into(),
        }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn input<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg("-i").arg(path.as_ref().to_string_lossy().to_string())
    }

    pub fn output<P: AsRef<Path>>(self, path: P) -> Self {
        self.arg(path.as_ref().to_string_lossy().to_string())
    }

    /// Force overwrite of the output file
    pub fn overwrite(self) -> Self {
        self.arg("-y")
    }

    /// Drop the video stream
    pub fn no_video(self) -> Self {
        self.arg("-vn")
    }

    pub fn audio_codec<S: Into<String>>(self, codec: S) -> Self {
        self.arg("-acodec").arg(codec)
    }

    pub fn audio_sample_rate(self, rate: u32) -> Self {
        self.arg("-ar").arg(rate.to_string())
    }

    pub fn audio_channels(self, channels: u32) -> Self {
        self.arg("-ac").arg(channels.to_string())
    }

    /// Run the command to completion, failing on a non-zero exit.
    pub async fn execute(&self) -> Result<()> {
        debug!("Executing transcoder command: {} {:?}", self.binary_path, self.args);

        let output = Command::new(&self.binary_path)
            .args(&self.args)
            .output()
            .await
            .map_err(|e| LingosubError::Media(format!("Failed to execute transcoder: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LingosubError::Media(format!(
                "{} failed: {}",
                self.description, stderr
            )));
        }

        Ok(())
    }
}

/// Builder for the transcoder operations the pipeline needs.
pub struct MediaCommandBuilder {
    binary_path: String,
}

impl MediaCommandBuilder {
    pub fn new<S: Into<String>>(binary_path: S) -> Self {
        Self {
            binary_path: binary_path.into(),
        }
    }

    /// Audio extraction: mono, 16kHz, 16-bit signed PCM, as the speech
    /// engine expects.
    pub fn extract_audio<P: AsRef<Path>>(&self, video_path: P, audio_path: P) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Audio extraction")
            .input(video_path)
            .no_video()
            .audio_codec("pcm_s16le")
            .audio_sample_rate(16000)
            .audio_channels(1)
            .overwrite()
            .output(audio_path)
    }

    pub fn version_check(&self) -> MediaCommand {
        MediaCommand::new(&self.binary_path, "Version check").arg("-version")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn extract_audio_builds_the_normalized_pcm_invocation() {
        let builder = MediaCommandBuilder::new("ffmpeg");
        let cmd = builder.extract_audio(
            PathBuf::from("movie.mp4").as_path(),
            PathBuf::from("movie_audio.wav").as_path(),
        );

        assert_eq!(cmd.binary_path, "ffmpeg");
        assert_eq!(
            cmd.args,
            vec![
                "-i",
                "movie.mp4",
                "-vn",
                "-acodec",
                "pcm_s16le",
                "-ar",
                "16000",
                "-ac",
                "1",
                "-y",
                "movie_audio.wav",
            ]
        );
    }

    #[test]
    fn version_check_only_asks_for_the_version() {
        let cmd = MediaCommandBuilder::new("ffmpeg").version_check();
        assert_eq!(cmd.args, vec!["-version"]);
    }

    #[tokio::test]
    async fn missing_binary_surfaces_as_media_error() {
        let cmd = MediaCommand::new("/nonexistent/transcoder", "Audio extraction");
        let err = cmd.execute().await.unwrap_err();
        assert!(matches!(err, LingosubError::Media(_)));
    }
}
