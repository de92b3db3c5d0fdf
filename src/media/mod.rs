// Media extraction boundary
//
// The pipeline only needs one transcoder capability: turning an arbitrary
// video container into the normalized mono 16kHz PCM waveform the speech
// engine expects. The trait keeps that boundary mockable; commands.rs holds
// the argument building so the exact ffmpeg invocation stays testable.

pub mod commands;
pub mod processor;

use async_trait::async_trait;
use std::path::Path;

pub use commands::*;
pub use processor::*;

use crate::config::MediaConfig;
use crate::error::Result;

/// Audio extraction boundary around the external transcoder.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    /// Produce a mono 16kHz 16-bit PCM file covering the source's audio track.
    async fn extract_audio(&self, video_path: &Path, audio_path: &Path) -> Result<()>;

    /// Check that the transcoder binary is present and runnable.
    fn check_availability(&self) -> Result<()>;
}

/// Factory for creating media extractor instances
pub struct MediaExtractorFactory;

impl MediaExtractorFactory {
    /// Create the default extractor implementation (ffmpeg-based)
    pub fn create_extractor(config: MediaConfig) -> Box<dyn MediaExtractor> {
        Box::new(processor::FfmpegExtractor::new(config))
    }
}
