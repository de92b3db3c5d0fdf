use std::path::Path;
use tokio::fs;
use tracing::info;

use crate::error::{LingosubError, Result};
use crate::transcript::Transcript;

/// Render a transcript as an SRT file.
///
/// Records are numbered 1..N in sequence order; the ordinal exists only here.
/// Empty text is written as an empty line rather than skipped, so downstream
/// renderers keep their timing continuity. Fails only on I/O, never on
/// content.
pub async fn write_srt<P: AsRef<Path>>(transcript: &Transcript, output_path: P) -> Result<()> {
    let output_path = output_path.as_ref();
    info!("Writing subtitles to {}", output_path.display());

    let srt_content = render_srt(transcript);

    fs::write(output_path, srt_content).await.map_err(|e| {
        LingosubError::Serialization(format!(
            "Failed to write subtitle file '{}': {}",
            output_path.display(),
            e
        ))
    })?;

    info!("Subtitle file written: {} records", transcript.len());
    Ok(())
}

/// Render the SRT record sequence as a string.
pub fn render_srt(transcript: &Transcript) -> String {
    let mut content = String::new();

    for (index, segment) in transcript.segments.iter().enumerate() {
        let start_time = format_srt_time(segment.start);
        let end_time = format_srt_time(segment.end);

        content.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
            start_time,
            end_time,
            segment.text.trim()
        ));
    }

    content
}

/// Format seconds as SRT time (HH:MM:SS,mmm).
///
/// Milliseconds are truncated, not rounded, and hours are not wrapped at 24.
pub fn format_srt_time(seconds: f64) -> String {
    let total_milliseconds = (seconds * 1000.0) as u64;
    let hours = total_milliseconds / 3_600_000;
    let minutes = (total_milliseconds % 3_600_000) / 60_000;
    let secs = (total_milliseconds % 60_000) / 1_000;
    let millis = total_milliseconds % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
}
