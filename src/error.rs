use thiserror::Error;

#[derive(Error, Debug)]
pub enum LingosubError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Subtitle serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),
}

pub type Result<T> = std::result::Result<T, LingosubError>;
