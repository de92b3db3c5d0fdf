use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{LingosubError, Result};

fn default_transcribe_timeout() -> u64 {
    1800
}

fn default_retry_backoff_ms() -> u64 {
    500
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub media: MediaConfig,
    pub transcriber: TranscriberConfig,
    pub translate: TranslateConfig,
    pub terms: TermsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Path to the ffmpeg binary
    pub binary_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Path to the whisper binary
    pub binary_path: String,
    /// Whisper model name
    pub model: String,
    /// Source language of the spoken audio
    pub source_language: String,
    /// Upper bound for one transcription run, in seconds. Generous because
    /// the first run may download the model artifact.
    #[serde(default = "default_transcribe_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Translation backend endpoint URL
    pub endpoint: String,
    /// LLM model to use for translation
    pub model: String,
    /// Maximum retries per segment for transient failures
    pub max_retries: u32,
    /// Base delay between retries, in milliseconds (grows linearly per attempt)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermsConfig {
    /// Directory searched for profanity_map_<lang>.txt files
    pub map_dir: PathBuf,
}

/// Explicit logging configuration handed to the subscriber setup, instead of
/// a process-wide verbosity toggle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable debug-level logging
    pub verbose: bool,
    /// Directory for the rolling log file
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            media: MediaConfig {
                binary_path: "ffmpeg".to_string(),
            },
            transcriber: TranscriberConfig {
                binary_path: "whisper".to_string(),
                model: "base".to_string(),
                source_language: "en".to_string(),
                timeout_secs: default_transcribe_timeout(),
            },
            translate: TranslateConfig {
                endpoint: "http://localhost:11434".to_string(),
                model: "llama3.2:3b".to_string(),
                max_retries: 3,
                retry_backoff_ms: default_retry_backoff_ms(),
            },
            terms: TermsConfig {
                map_dir: PathBuf::from("."),
            },
            logging: LoggingConfig {
                verbose: false,
                log_dir: PathBuf::from(".lingosub/log"),
            },
        }
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LingosubError::Config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| LingosubError::Config(format!("Failed to parse config file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = Config::default();
        let mut file = tempfile::NamedTempFile::new().unwrap();

        let serialized = toml::to_string_pretty(&config).unwrap();
        file.write_all(serialized.as_bytes()).unwrap();

        let loaded = Config::from_file(file.path()).unwrap();
        assert_eq!(loaded.media.binary_path, "ffmpeg");
        assert_eq!(loaded.transcriber.source_language, "en");
        assert_eq!(loaded.translate.max_retries, 3);
        assert_eq!(loaded.terms.map_dir, PathBuf::from("."));
    }

    #[test]
    fn partial_sections_use_serde_defaults_for_new_fields() {
        let toml_text = r#"
            [media]
            binary_path = "ffmpeg"

            [transcriber]
            binary_path = "whisper"
            model = "base"
            source_language = "en"

            [translate]
            endpoint = "http://localhost:11434"
            model = "llama3.2:3b"
            max_retries = 5

            [terms]
            map_dir = "/etc/lingosub/terms"

            [logging]
            verbose = true
            log_dir = "/tmp/lingosub"
        "#;

        let config: Config = toml::from_str(toml_text).unwrap();
        assert_eq!(config.transcriber.timeout_secs, 1800);
        assert_eq!(config.translate.retry_backoff_ms, 500);
        assert_eq!(config.translate.max_retries, 5);
        assert!(config.logging.verbose);
    }

    #[test]
    fn unreadable_config_path_is_a_config_error() {
        let err = Config::from_file("/nonexistent/lingosub.toml").unwrap_err();
        assert!(matches!(err, LingosubError::Config(_)));
    }
}
