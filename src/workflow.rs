use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::config::Config;
use crate::error::{LingosubError, Result};
use crate::filter::{TermFilter, TermMap};
use crate::lang::Language;
use crate::media::{MediaExtractor, MediaExtractorFactory};
use crate::subtitle::write_srt;
use crate::transcribe::{Transcriber, TranscriberFactory};
use crate::transcript::Transcript;
use crate::translate::{Translator, TranslatorFactory};

/// The five sequential pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    ExtractAudio,
    Transcribe,
    Translate,
    Remediate,
    Serialize,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ExtractAudio => "extract-audio",
            Stage::Transcribe => "transcribe",
            Stage::Translate => "translate",
            Stage::Remediate => "remediate",
            Stage::Serialize => "serialize",
        };
        write!(f, "{}", name)
    }
}

/// Pipeline state machine. The transcript travels with the state so a stage
/// can only run once its input exists.
enum PipelineState {
    ExtractAudio,
    Transcribe,
    Translate(Transcript),
    Remediate(Transcript),
    Serialize(Transcript),
    Done,
}

/// Intermediate and output file paths derived from the input media path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub audio: PathBuf,
    pub subtitle: PathBuf,
}

impl OutputPaths {
    /// Derive deterministic sibling paths: `<stem>_audio.wav` and
    /// `<stem>_translated_clean.srt` next to the input file.
    pub fn derive(video_path: &Path) -> Result<Self> {
        let stem = video_path
            .file_stem()
            .ok_or_else(|| LingosubError::Config("Invalid video filename".to_string()))?
            .to_string_lossy()
            .into_owned();

        Ok(Self {
            audio: video_path.with_file_name(format!("{}_audio.wav", stem)),
            subtitle: video_path.with_file_name(format!("{}_translated_clean.srt", stem)),
        })
    }
}

/// Pipeline orchestrator: sole caller of the extractor, transcriber,
/// translator, term filter, and serializer.
pub struct Workflow {
    config: Config,
    media: Box<dyn MediaExtractor>,
    transcriber: Box<dyn Transcriber>,
    translator: Box<dyn Translator>,
}

impl Workflow {
    pub fn new(config: Config) -> Result<Self> {
        let media = MediaExtractorFactory::create_extractor(config.media.clone());
        let transcriber = TranscriberFactory::create_transcriber(config.transcriber.clone());
        let translator = TranslatorFactory::create_translator(config.translate.clone());

        media.check_availability()?;

        Ok(Self {
            config,
            media,
            transcriber,
            translator,
        })
    }

    /// Construct with explicit collaborators; the seam tests use to
    /// substitute stubs for the external services.
    pub fn with_components(
        config: Config,
        media: Box<dyn MediaExtractor>,
        transcriber: Box<dyn Transcriber>,
        translator: Box<dyn Translator>,
    ) -> Self {
        Self {
            config,
            media,
            transcriber,
            translator,
        }
    }

    /// Run the full pipeline for one video and one target language.
    ///
    /// Any stage failure aborts the remaining stages and deletes the derived
    /// intermediate and output files; there is no resume across stage
    /// boundaries. Returns the subtitle file path on success.
    pub async fn run(&self, video_path: &Path, target: &Language) -> Result<PathBuf> {
        if !video_path.exists() {
            return Err(LingosubError::FileNotFound(
                video_path.display().to_string(),
            ));
        }

        let paths = OutputPaths::derive(video_path)?;
        info!(
            "Processing {} -> {} (target language: {} ({}))",
            video_path.display(),
            paths.subtitle.display(),
            target.name,
            target.code
        );

        // Configuration read, not a pipeline stage: the term map is loaded
        // before the first stage runs.
        let term_map = TermMap::load(&self.config.terms.map_dir, &target.code)?;
        let filter = TermFilter::compile(&term_map)?;

        let source_language = self.config.transcriber.source_language.clone();
        let mut state = PipelineState::ExtractAudio;

        loop {
            state = match state {
                PipelineState::ExtractAudio => {
                    info!("Stage: {}", Stage::ExtractAudio);
                    self.media
                        .extract_audio(video_path, &paths.audio)
                        .await
                        .map_err(|e| self.abort(Stage::ExtractAudio, e, &paths))?;
                    PipelineState::Transcribe
                }
                PipelineState::Transcribe => {
                    info!("Stage: {}", Stage::Transcribe);
                    let transcript = self
                        .transcriber
                        .transcribe(&paths.audio, &source_language)
                        .await
                        .map_err(|e| self.abort(Stage::Transcribe, e, &paths))?;
                    PipelineState::Translate(transcript)
                }
                PipelineState::Translate(mut transcript) => {
                    info!("Stage: {}", Stage::Translate);
                    self.translator
                        .translate_transcript(&mut transcript, &source_language, target)
                        .await
                        .map_err(|e| self.abort(Stage::Translate, e, &paths))?;
                    PipelineState::Remediate(transcript)
                }
                PipelineState::Remediate(mut transcript) => {
                    info!("Stage: {}", Stage::Remediate);
                    filter.sanitize(&mut transcript);
                    PipelineState::Serialize(transcript)
                }
                PipelineState::Serialize(transcript) => {
                    info!("Stage: {}", Stage::Serialize);
                    write_srt(&transcript, &paths.subtitle)
                        .await
                        .map_err(|e| self.abort(Stage::Serialize, e, &paths))?;
                    PipelineState::Done
                }
                PipelineState::Done => break,
            };
        }

        info!(
            "Pipeline completed, subtitle file: {}",
            paths.subtitle.display()
        );
        Ok(paths.subtitle)
    }

    /// Log the failing stage and remove the files this run may have left
    /// behind, so a later run never sees stale artifacts.
    fn abort(&self, stage: Stage, err: LingosubError, paths: &OutputPaths) -> LingosubError {
        error!("{} stage failed: {}", stage, err);

        remove_if_exists(&paths.audio);
        // The subtitle path only belongs to this run once the serialize
        // stage has started writing it; an earlier failure must not destroy
        // a complete file left by a previous successful run.
        if stage == Stage::Serialize {
            remove_if_exists(&paths.subtitle);
        }

        err
    }
}

fn remove_if_exists(path: &Path) {
    if path.exists() {
        if let Err(e) = std::fs::remove_file(path) {
            error!("Failed to remove partial output {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_paths_are_siblings_of_the_input() {
        let paths = OutputPaths::derive(Path::new("/media/films/movie.mp4")).unwrap();
        assert_eq!(paths.audio, PathBuf::from("/media/films/movie_audio.wav"));
        assert_eq!(
            paths.subtitle,
            PathBuf::from("/media/films/movie_translated_clean.srt")
        );
    }

    #[test]
    fn output_paths_ignore_the_original_extension() {
        let paths = OutputPaths::derive(Path::new("clip.mkv")).unwrap();
        assert_eq!(paths.audio, PathBuf::from("clip_audio.wav"));
        assert_eq!(paths.subtitle, PathBuf::from("clip_translated_clean.srt"));
    }

    #[test]
    fn stage_names_identify_the_failing_stage() {
        assert_eq!(Stage::ExtractAudio.to_string(), "extract-audio");
        assert_eq!(Stage::Serialize.to_string(), "serialize");
    }
}
