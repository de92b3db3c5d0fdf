use regex::{NoExpand, Regex};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{LingosubError, Result};
use crate::transcript::Transcript;

/// Language-specific source-term to replacement mapping, in file line order.
///
/// Pairs apply in this order; if two sources could claim the same span, the
/// earlier pair wins. Term lists should be curated to avoid overlapping
/// targets, since no stronger resolution is attempted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermMap {
    pairs: Vec<(String, String)>,
}

impl TermMap {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    /// Path of the mapping file for a target language code.
    pub fn path_for(map_dir: &Path, lang_code: &str) -> PathBuf {
        map_dir.join(format!("profanity_map_{}.txt", lang_code))
    }

    /// Load the mapping for a language. An absent file is not an error; it
    /// degrades to an empty mapping. Malformed lines are skipped with a
    /// warning, blank lines and `#` comments are ignored.
    pub fn load(map_dir: &Path, lang_code: &str) -> Result<Self> {
        let path = Self::path_for(map_dir, lang_code);

        if !path.exists() {
            info!(
                "No term mapping file '{}' for language '{}'; remediation will be a no-op",
                path.display(),
                lang_code
            );
            return Ok(Self::default());
        }

        info!("Reading term mapping from '{}'", path.display());
        let content = std::fs::read_to_string(&path).map_err(|e| {
            LingosubError::Config(format!(
                "Failed to read term mapping '{}': {}",
                path.display(),
                e
            ))
        })?;

        let mut pairs = Vec::new();
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once(':') {
                Some((source, replacement)) => {
                    pairs.push((source.trim().to_string(), replacement.trim().to_string()));
                }
                None => {
                    warn!("Skipping invalid line in term mapping file: {}", line);
                }
            }
        }

        Ok(Self { pairs })
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Case-insensitive whole-word matcher for one source term.
///
/// Kept as its own abstraction so the matching semantics stay unit-testable
/// independent of the pipeline. Uses Unicode word boundaries, so a term never
/// matches as a substring of a larger word in any script.
#[derive(Debug, Clone)]
pub struct WordBoundaryMatcher {
    pattern: Regex,
}

impl WordBoundaryMatcher {
    pub fn new(term: &str) -> Result<Self> {
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(term))).map_err(|e| {
            LingosubError::Config(format!("Invalid term '{}' in mapping: {}", term, e))
        })?;
        Ok(Self { pattern })
    }

    /// Replace every whole-word occurrence. The replacement is inserted
    /// literally, so `$` in replacement text carries no special meaning.
    pub fn replace_all(&self, text: &str, replacement: &str) -> String {
        self.pattern
            .replace_all(text, NoExpand(replacement))
            .into_owned()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

/// Compiled term filter applied to every segment of a transcript.
pub struct TermFilter {
    rules: Vec<(WordBoundaryMatcher, String)>,
}

impl TermFilter {
    pub fn compile(map: &TermMap) -> Result<Self> {
        let mut rules = Vec::with_capacity(map.pairs().len());
        for (source, replacement) in map.pairs() {
            rules.push((WordBoundaryMatcher::new(source)?, replacement.clone()));
        }
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rewrite one piece of text, applying the rules in mapping order.
    pub fn clean_text(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (matcher, replacement) in &self.rules {
            result = matcher.replace_all(&result, replacement);
        }
        result
    }

    /// Rewrite every segment in place. Segment order, count, and timings are
    /// untouched. An empty filter is an identity transform, never an error.
    pub fn sanitize(&self, transcript: &mut Transcript) {
        if self.is_empty() {
            info!("No term mapping provided; skipping remediation");
            return;
        }

        info!("Rewriting disallowed terms in {} segments", transcript.len());
        for segment in transcript.segments.iter_mut() {
            segment.text = self.clean_text(&segment.text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::Segment;
    use std::fs;

    fn filter_of(pairs: &[(&str, &str)]) -> TermFilter {
        let map = TermMap::new(
            pairs
                .iter()
                .map(|(s, r)| (s.to_string(), r.to_string()))
                .collect(),
        );
        TermFilter::compile(&map).unwrap()
    }

    #[test]
    fn whole_words_are_replaced_case_insensitively() {
        let filter = filter_of(&[("damn", "darn")]);
        assert_eq!(filter.clean_text("Damn it, damn!"), "darn it, darn!");
    }

    #[test]
    fn substrings_of_larger_words_are_never_matched() {
        let filter = filter_of(&[("ass", "donkey")]);
        assert_eq!(filter.clean_text("the class passes"), "the class passes");
        assert_eq!(filter.clean_text("an ass, classy"), "an donkey, classy");
    }

    #[test]
    fn unicode_word_boundaries_are_honored() {
        let filter = filter_of(&[("merde", "zut")]);
        assert_eq!(filter.clean_text("Merde alors!"), "zut alors!");

        // A term embedded in a longer word of non-ASCII word characters is
        // not a whole-word occurrence.
        let filter = filter_of(&[("über", "super")]);
        assert_eq!(filter.clean_text("über allem"), "super allem");
        assert_eq!(filter.clean_text("darüber hinaus"), "darüber hinaus");
    }

    #[test]
    fn replacement_text_is_inserted_literally() {
        let filter = filter_of(&[("damn", "$0!")]);
        assert_eq!(filter.clean_text("damn"), "$0!");
    }

    #[test]
    fn rules_apply_in_mapping_order() {
        let filter = filter_of(&[("hell", "heck"), ("hello", "greetings")]);
        // The earlier rule cannot claim "hello": word boundaries protect it,
        // and the later rule then rewrites it.
        assert_eq!(filter.clean_text("hell hello"), "heck greetings");
    }

    #[test]
    fn non_overlapping_map_is_idempotent() {
        let filter = filter_of(&[("damn", "darn"), ("hell", "heck")]);
        let once = filter.clean_text("damn this hell");
        let twice = filter.clean_text(&once);
        assert_eq!(once, "darn this heck");
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_filter_is_the_identity_transform() {
        let filter = filter_of(&[]);
        let mut transcript =
            Transcript::new(vec![Segment::new(0.0, 1.0, "damn it all")], "sq");
        let before = transcript.clone();

        filter.sanitize(&mut transcript);
        assert_eq!(transcript, before);
    }

    #[test]
    fn sanitize_preserves_order_count_and_timings() {
        let filter = filter_of(&[("damn", "darn")]);
        let mut transcript = Transcript::new(
            vec![
                Segment::new(0.0, 1.5, "hello world"),
                Segment::new(1.5, 3.0, "damn it"),
            ],
            "en",
        );

        filter.sanitize(&mut transcript);

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.segments[0].text, "hello world");
        assert_eq!(transcript.segments[1].text, "darn it");
        assert_eq!(transcript.segments[1].start, 1.5);
        assert_eq!(transcript.segments[1].end, 3.0);
    }

    #[test]
    fn absent_mapping_file_degrades_to_empty_map() {
        let dir = tempfile::tempdir().unwrap();
        let map = TermMap::load(dir.path(), "sq").unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn mapping_file_parsing_skips_comments_blanks_and_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = TermMap::path_for(dir.path(), "sq");
        fs::write(
            &path,
            "# curated for Albanian\n\ndamn:darn\nmalformed line\nhell : heck\n",
        )
        .unwrap();

        let map = TermMap::load(dir.path(), "sq").unwrap();
        assert_eq!(
            map.pairs(),
            &[
                ("damn".to_string(), "darn".to_string()),
                ("hell".to_string(), "heck".to_string()),
            ]
        );
    }
}
