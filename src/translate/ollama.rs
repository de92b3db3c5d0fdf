use async_trait::async_trait;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::Translator;
use crate::config::TranslateConfig;
use crate::error::{LingosubError, Result};
use crate::lang::{Language, LanguageTable};
use crate::transcript::Transcript;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub response: String,
    pub done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationResult {
    pub text: String,
}

/// A failed translation attempt, tagged with whether a retry can help.
#[derive(Debug)]
struct AttemptFailure {
    message: String,
    transient: bool,
}

impl AttemptFailure {
    fn transient(message: String) -> Self {
        Self {
            message,
            transient: true,
        }
    }

    fn fatal(message: String) -> Self {
        Self {
            message,
            transient: false,
        }
    }
}

/// Translator backed by an Ollama-style generate endpoint.
pub struct OllamaTranslator {
    client: Client,
    config: TranslateConfig,
    languages: LanguageTable,
}

impl OllamaTranslator {
    pub fn new(config: TranslateConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .unwrap_or_default();

        Self {
            client,
            config,
            languages: LanguageTable::builtin(),
        }
    }

    fn language_name(&self, code: &str) -> String {
        self.languages
            .find_by_code(code)
            .map(|l| l.name.clone())
            .unwrap_or_else(|| code.to_string())
    }

    fn build_prompt(&self, text: &str, source_name: &str, target: &Language) -> String {
        format!(
            "You are a professional translator.\n\
             \n\
             CRITICAL: You must translate the text from {} to {} ONLY. \
             Do not translate to any other language.\n\
             The target language is: {} (language code: {})\n\
             \n\
             Return ONLY the translation in JSON format as {{\"text\":\"your {} translation here\"}}.\n\
             Do not include any explanations, alternatives, or text in other languages.\n\
             \n\
             Text to translate: \"{}\"\n",
            source_name, target.name, target.name, target.code, target.name, text
        )
    }

    /// One request against the backend; classifies failures for the retry loop.
    async fn request_translation(
        &self,
        prompt: String,
    ) -> std::result::Result<String, AttemptFailure> {
        let request = TranslationRequest {
            model: self.config.model.clone(),
            prompt,
            stream: false,
            format: "json".to_string(),
        };

        let url = format!("{}/api/generate", self.config.endpoint);
        debug!("Sending translation request to: {}", url);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AttemptFailure::transient(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = format!("Backend API error {}: {}", status, error_text);
            // Rate limits and server-side hiccups are worth a retry; anything
            // else (bad request, unknown model) will not fix itself.
            if status.as_u16() == 429 || status.is_server_error() {
                return Err(AttemptFailure::transient(message));
            }
            return Err(AttemptFailure::fatal(message));
        }

        let translation_response: TranslationResponse = response
            .json()
            .await
            .map_err(|e| AttemptFailure::fatal(format!("Failed to parse response: {}", e)))?;

        let translation = extract_translation(&translation_response.response);
        if translation.is_empty() {
            return Err(AttemptFailure::fatal(
                "Empty translation received".to_string(),
            ));
        }

        Ok(translation)
    }

    async fn translate_text(&self, text: &str, source_name: &str, target: &Language) -> Result<String> {
        let mut attempt: u32 = 0;

        loop {
            let prompt = self.build_prompt(text, source_name, target);
            match self.request_translation(prompt).await {
                Ok(translation) => return Ok(translation),
                Err(failure) if failure.transient && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay =
                        Duration::from_millis(self.config.retry_backoff_ms * u64::from(attempt));
                    warn!(
                        "Transient translation failure (attempt {}/{}): {}; retrying in {:?}",
                        attempt, self.config.max_retries, failure.message, delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(failure) => {
                    return Err(LingosubError::Translation(failure.message));
                }
            }
        }
    }
}

#[async_trait]
impl Translator for OllamaTranslator {
    async fn translate_transcript(
        &self,
        transcript: &mut Transcript,
        source_language: &str,
        target: &Language,
    ) -> Result<()> {
        info!(
            "Translating {} segments from {} to {} ({})",
            transcript.len(),
            source_language,
            target.name,
            target.code
        );

        check_backend_availability(&self.config.endpoint, &self.config.model).await?;

        let source_name = self.language_name(source_language);

        let progress = ProgressBar::new(transcript.len() as u64);
        progress.set_style(
            ProgressStyle::with_template(
                "Translating [{bar:40}] {pos}/{len} segments",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        for segment in transcript.segments.iter_mut() {
            debug!("Source: {}", segment.text);
            let translation = self
                .translate_text(&segment.text, &source_name, target)
                .await?;
            debug!("Target: {}", translation);
            segment.text = translation;
            progress.inc(1);
        }

        progress.finish_and_clear();
        info!("Translation completed");
        Ok(())
    }
}

/// Pull the translated text out of the backend's raw response. The backend is
/// asked for `{"text": ...}` JSON; malformed responses degrade to the first
/// substantial line.
pub fn extract_translation(raw: &str) -> String {
    let raw = raw.trim();

    if let Ok(result) = serde_json::from_str::<TranslationResult>(raw) {
        return result.text.trim().to_string();
    }

    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty()
            || trimmed.starts_with("Translation:")
            || trimmed.starts_with("- ")
            || trimmed.starts_with("* ")
        {
            continue;
        }
        return trimmed.to_string();
    }

    String::new()
}

/// Check that the backend is reachable and the model is loaded.
pub async fn check_backend_availability(endpoint: &str, model: &str) -> Result<()> {
    let client = Client::new();
    let url = format!("{}/api/show", endpoint);

    let request = json!({ "name": model });

    let response = client
        .post(&url)
        .json(&request)
        .send()
        .await
        .map_err(|e| {
            LingosubError::Translation(format!("Failed to connect to translation backend: {}", e))
        })?;

    if response.status().is_success() {
        info!("Translation model '{}' is available", model);
        Ok(())
    } else {
        Err(LingosubError::Translation(format!(
            "Translation model '{}' not found. Please pull the model first: ollama pull {}",
            model, model
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_response_yields_the_inner_text() {
        assert_eq!(
            extract_translation(r#"{"text": "  bonjour le monde "}"#),
            "bonjour le monde"
        );
    }

    #[test]
    fn non_json_response_falls_back_to_first_substantial_line() {
        let raw = "\nTranslation:\nbonjour le monde\nalternative text";
        assert_eq!(extract_translation(raw), "bonjour le monde");
    }

    #[test]
    fn empty_response_yields_empty_string() {
        assert_eq!(extract_translation("   \n  "), "");
    }

    #[test]
    fn prompt_names_the_target_language_and_code() {
        let translator = OllamaTranslator::new(TranslateConfig {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2:3b".to_string(),
            max_retries: 0,
            retry_backoff_ms: 1,
        });
        let target = Language::new("sq", "Albanian");
        let prompt = translator.build_prompt("hello", "English", &target);

        assert!(prompt.contains("from English to Albanian"));
        assert!(prompt.contains("language code: sq"));
        assert!(prompt.contains("Text to translate: \"hello\""));
    }

    #[tokio::test]
    async fn unreachable_backend_aborts_after_bounded_retries() {
        // Port 9 (discard) refuses connections immediately in practice.
        let translator = OllamaTranslator::new(TranslateConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            model: "llama3.2:3b".to_string(),
            max_retries: 1,
            retry_backoff_ms: 1,
        });
        let target = Language::new("sq", "Albanian");
        let mut transcript = Transcript::new(
            vec![crate::transcript::Segment::new(0.0, 1.0, "hello")],
            "en",
        );

        let err = translator
            .translate_transcript(&mut transcript, "en", &target)
            .await
            .unwrap_err();
        assert!(matches!(err, LingosubError::Translation(_)));
        // The stage aborted; the original text was not replaced with garbage.
        assert_eq!(transcript.segments[0].text, "hello");
    }
}
