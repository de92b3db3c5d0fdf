use std::io::{BufRead, Write};

use crate::error::{LingosubError, Result};

/// A validated translation target produced by the selection prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub code: String,
    pub name: String,
}

impl Language {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Immutable table of known translation targets, built once at startup.
#[derive(Debug, Clone)]
pub struct LanguageTable {
    entries: Vec<Language>,
}

// (code, display name) pairs for the languages the translation backend is
// prompted in. Kept alphabetical by display name for the selection listing.
const KNOWN_LANGUAGES: &[(&str, &str)] = &[
    ("sq", "Albanian"),
    ("am", "Amharic"),
    ("ar", "Arabic"),
    ("hy", "Armenian"),
    ("as", "Assamese"),
    ("az", "Azerbaijani"),
    ("eu", "Basque"),
    ("be", "Belarusian"),
    ("bn", "Bengali"),
    ("bg", "Bulgarian"),
    ("my", "Burmese"),
    ("ca", "Catalan"),
    ("zh", "Chinese"),
    ("hr", "Croatian"),
    ("cs", "Czech"),
    ("da", "Danish"),
    ("nl", "Dutch"),
    ("en", "English"),
    ("et", "Estonian"),
    ("fi", "Finnish"),
    ("fr", "French"),
    ("gl", "Galician"),
    ("ka", "Georgian"),
    ("de", "German"),
    ("gu", "Gujarati"),
    ("he", "Hebrew"),
    ("hi", "Hindi"),
    ("hu", "Hungarian"),
    ("is", "Icelandic"),
    ("ga", "Irish"),
    ("it", "Italian"),
    ("ja", "Japanese"),
    ("kn", "Kannada"),
    ("kk", "Kazakh"),
    ("km", "Khmer"),
    ("ko", "Korean"),
    ("ky", "Kyrgyz"),
    ("lo", "Lao"),
    ("lv", "Latvian"),
    ("lt", "Lithuanian"),
    ("mk", "Macedonian"),
    ("ml", "Malayalam"),
    ("mt", "Maltese"),
    ("mr", "Marathi"),
    ("ne", "Nepali"),
    ("no", "Norwegian"),
    ("or", "Odia"),
    ("pl", "Polish"),
    ("pt", "Portuguese"),
    ("pa", "Punjabi"),
    ("ru", "Russian"),
    ("si", "Sinhala"),
    ("sk", "Slovak"),
    ("sl", "Slovenian"),
    ("es", "Spanish"),
    ("sv", "Swedish"),
    ("tg", "Tajik"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("th", "Thai"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("uz", "Uzbek"),
    ("vi", "Vietnamese"),
    ("cy", "Welsh"),
];

impl LanguageTable {
    /// Build the built-in table, sorted by display name.
    pub fn builtin() -> Self {
        let mut entries: Vec<Language> = KNOWN_LANGUAGES
            .iter()
            .map(|(code, name)| Language::new(*code, *name))
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Self { entries }
    }

    pub fn entries(&self) -> &[Language] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Language> {
        self.entries.iter().find(|l| l.code == code)
    }
}

impl Default for LanguageTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Interactively select a translation target from the table.
///
/// Prints the numbered table once, then reads integer selections until one is
/// in range; out-of-range or non-integer input re-prompts. This loop is the
/// one place in the program that blocks on terminal input, which is why it
/// takes generic reader/writer handles and lives outside the pipeline.
pub fn prompt_selection<R: BufRead, W: Write>(
    table: &LanguageTable,
    mut input: R,
    mut output: W,
) -> Result<Language> {
    writeln!(output, "\nAvailable languages:")?;
    for (idx, lang) in table.entries().iter().enumerate() {
        writeln!(output, "{}. {} ({})", idx + 1, lang.name, lang.code)?;
    }

    loop {
        write!(
            output,
            "\nEnter the number for the language to translate to: "
        )?;
        output.flush()?;

        let mut line = String::new();
        let bytes = input.read_line(&mut line)?;
        if bytes == 0 {
            return Err(LingosubError::Config(
                "No language selected: input closed".to_string(),
            ));
        }

        match line.trim().parse::<usize>() {
            Ok(choice) if choice >= 1 && choice <= table.len() => {
                let selected = table.entries()[choice - 1].clone();
                writeln!(
                    output,
                    "Selected: {} ({})",
                    selected.name, selected.code
                )?;
                return Ok(selected);
            }
            Ok(_) => {
                writeln!(output, "Number out of range. Please try again.")?;
            }
            Err(_) => {
                writeln!(output, "Please enter a valid number.")?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn table_is_sorted_by_display_name() {
        let table = LanguageTable::builtin();
        let names: Vec<&str> = table.entries().iter().map(|l| l.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(table.find_by_code("sq").is_some());
    }

    #[test]
    fn valid_selection_returns_the_language() {
        let table = LanguageTable::builtin();
        let input = Cursor::new("1\n");
        let mut output = Vec::new();

        let lang = prompt_selection(&table, input, &mut output).unwrap();
        assert_eq!(lang.name, "Albanian");
        assert_eq!(lang.code, "sq");
    }

    #[test]
    fn invalid_input_reprompts_until_valid() {
        let table = LanguageTable::builtin();
        let input = Cursor::new("zero\n99999\n2\n");
        let mut output = Vec::new();

        let lang = prompt_selection(&table, input, &mut output).unwrap();
        assert_eq!(lang.name, table.entries()[1].name);

        let printed = String::from_utf8(output).unwrap();
        assert!(printed.contains("Please enter a valid number."));
        assert!(printed.contains("Number out of range."));
    }

    #[test]
    fn closed_input_is_an_error_not_a_hang() {
        let table = LanguageTable::builtin();
        let input = Cursor::new("");
        let mut output = Vec::new();

        let err = prompt_selection(&table, input, &mut output).unwrap_err();
        assert!(matches!(err, LingosubError::Config(_)));
    }
}
