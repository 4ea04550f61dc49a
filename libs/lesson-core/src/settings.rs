//! Tunable exercise parameters.

use serde::{Deserialize, Serialize};

/// A generic filler tile word, with an optional transliteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawFillerWord")]
pub struct FillerWord {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translit: Option<String>,
}

impl FillerWord {
    pub fn new(text: &str, translit: Option<&str>) -> Self {
        Self {
            text: text.to_string(),
            translit: translit.map(str::to_string),
        }
    }
}

/// Settings files may list fillers as bare strings or `{ text, translit }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawFillerWord {
    Plain(String),
    Entry {
        text: String,
        #[serde(default, alias = "transliteration")]
        translit: Option<String>,
    },
}

impl From<RawFillerWord> for FillerWord {
    fn from(raw: RawFillerWord) -> Self {
        match raw {
            RawFillerWord::Plain(text) => Self { text, translit: None },
            RawFillerWord::Entry { text, translit } => Self { text, translit },
        }
    }
}

/// Generic filler lists per tile language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FillerWords {
    /// Native-script fillers for tiles toward the base language.
    pub base: Vec<FillerWord>,
    /// Fillers for tiles toward the target language.
    pub target: Vec<FillerWord>,
}

impl Default for FillerWords {
    fn default() -> Self {
        let base = [
            ("මම", "mama"),
            ("ඔයා", "oya"),
            ("ඔහු", "ohu"),
            ("ඇය", "eya"),
            ("අපි", "api"),
            ("ඔවුන්", "owun"),
            ("ඔව්", "owu"),
            ("නෑ", "nae"),
            ("හොඳයි", "hondai"),
            ("කරුණාකර", "karunaa kara"),
            ("ස්තූතියි", "sthuthiyi"),
            ("ආයුබෝවන්", "aayubowan"),
            ("රට", "rata"),
            ("සිංහල", "sinhala"),
            ("ඉංග්‍රීසි", "inggrisi"),
            ("ද?", "da?"),
        ]
        .into_iter()
        .map(|(text, translit)| FillerWord::new(text, Some(translit)))
        .collect();

        let target = [
            "am", "is", "are", "the", "my", "me", "your", "her", "him", "our", "they", "we",
            "thank", "please", "good",
        ]
        .into_iter()
        .map(|text| FillerWord::new(text, None))
        .collect();

        Self { base, target }
    }
}

/// Exercise builder settings. Every field has a default, so a settings file
/// only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExerciseSettings {
    /// Word-bank tile floor; the builder aims for `max(min_total_tiles, answer + 2)`.
    pub min_total_tiles: usize,
    pub max_filler_tiles: usize,
    /// Presented choices per choice exercise, the correct one included.
    pub choice_count: usize,
    pub match_pair_limit: usize,
    pub statement_delay_ms: u64,
    pub choice_delay_ms: u64,
    pub fillers: FillerWords,
}

impl Default for ExerciseSettings {
    fn default() -> Self {
        Self {
            min_total_tiles: 6,
            max_filler_tiles: 4,
            choice_count: 4,
            match_pair_limit: 5,
            statement_delay_ms: 400,
            choice_delay_ms: 500,
            fillers: FillerWords::default(),
        }
    }
}

impl ExerciseSettings {
    /// Parse a JSON settings document, filling unset fields with defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Number of distractors a choice exercise needs.
    pub fn distractor_count(&self) -> usize {
        self.choice_count.saturating_sub(1).max(1)
    }
}
