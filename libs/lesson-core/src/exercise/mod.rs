//! Exercise configuration builders and sessions.
//!
//! Builders are pure: they take vocabulary, sentences or a raw JSON config
//! and return an immutable config, or a [`ConfigurationError`] when the
//! input cannot produce at least one presented item and one correct answer.
//! Randomized builders take the RNG as an argument.

pub mod choice;
pub mod dialogue;
pub mod fill_blank;
pub mod match_pairs;
pub mod session;
pub mod word_bank;

pub use choice::{
    build_translate_to_base_config, build_translate_to_target_config, prepare_choice_config,
    ChoiceConfig,
};
pub use dialogue::{build_dialogue_config, DialogueConfig, DialogueOption, DialogueTurn, FollowUp};
pub use fill_blank::{build_fill_blank_config, FillBlankConfig, SentenceFrame};
pub use match_pairs::{build_match_pairs_config, cards_match, Column, MatchPair, MatchPairsConfig, PairCard};
pub use session::{
    ChoiceSession, DialogueSession, ExerciseEvent, ExerciseSession, Feedback, MatchPairsSession,
    MatchStep, SessionState, TranscriptLine, WordBankSession,
};
pub use word_bank::{
    build_word_bank_config, check_sequence, Tile, WordBankConfig, WordBankDirection,
    WordBankOptions,
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::course::value_as_string;
use crate::error::ConfigurationError;
use crate::normalize::{normalize_text, AnswerLookup};

/// Exercise kinds, as used in routes and the `kind` tag of [`ExerciseConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseKind {
    TranslateToBase,
    TranslateToTarget,
    FillBlank,
    Dialogue,
    WordBank,
    MatchPairs,
}

impl ExerciseKind {
    /// Name used in error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TranslateToBase => "TranslateToBase",
            Self::TranslateToTarget => "TranslateToTarget",
            Self::FillBlank => "FillBlank",
            Self::Dialogue => "Dialogue",
            Self::WordBank => "WordBank",
            Self::MatchPairs => "MatchPairs",
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::TranslateToBase => "translate-to-base",
            Self::TranslateToTarget => "translate-to-target",
            Self::FillBlank => "fill-blank",
            Self::Dialogue => "dialogue",
            Self::WordBank => "word-bank",
            Self::MatchPairs => "match-pairs",
        }
    }

    /// Get a kind by its slug.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "translate-to-base" => Some(Self::TranslateToBase),
            "translate-to-target" => Some(Self::TranslateToTarget),
            "fill-blank" => Some(Self::FillBlank),
            "dialogue" => Some(Self::Dialogue),
            "word-bank" => Some(Self::WordBank),
            "match-pairs" => Some(Self::MatchPairs),
            _ => None,
        }
    }
}

/// A presented choice in a choice or fill-blank exercise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transliteration: Option<String>,
}

impl Choice {
    pub fn new(label: &str, is_correct: bool) -> Self {
        Self {
            label: label.to_string(),
            value: label.to_string(),
            is_correct,
            transliteration: None,
        }
    }

    /// Normalize an authored choice: a string or number, or an object with
    /// `label`/`value` (each falling back to the other) and `isCorrect` or
    /// `correct`. Blank choices yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(_) | Value::Number(_) => {
                let label = value_as_string(value).map(|text| normalize_text(&text))?;
                Some(Self::new(&label, false))
            }
            Value::Object(object) => {
                let label = text_field(object, "label").or_else(|| text_field(object, "value"))?;
                let value = text_field(object, "value").unwrap_or_else(|| label.clone());
                let is_correct = match object.get("isCorrect") {
                    Some(flag) => truthy(flag),
                    None => object.get("correct").is_some_and(truthy),
                };
                let transliteration =
                    text_field(object, "transliteration").or_else(|| text_field(object, "translit"));
                Some(Self {
                    label,
                    value,
                    is_correct,
                    transliteration,
                })
            }
            _ => None,
        }
    }
}

/// A fully built exercise, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ExerciseConfig {
    TranslateToBase(ChoiceConfig),
    TranslateToTarget(ChoiceConfig),
    FillBlank(FillBlankConfig),
    Dialogue(DialogueConfig),
    WordBank(WordBankConfig),
    MatchPairs(MatchPairsConfig),
}

impl ExerciseConfig {
    pub fn kind(&self) -> ExerciseKind {
        match self {
            Self::TranslateToBase(_) => ExerciseKind::TranslateToBase,
            Self::TranslateToTarget(_) => ExerciseKind::TranslateToTarget,
            Self::FillBlank(_) => ExerciseKind::FillBlank,
            Self::Dialogue(_) => ExerciseKind::Dialogue,
            Self::WordBank(_) => ExerciseKind::WordBank,
            Self::MatchPairs(_) => ExerciseKind::MatchPairs,
        }
    }

    /// Canonical answers in display form. Word banks list the ordered
    /// answer words; match pairs list each pair's target.
    pub fn answers(&self) -> Vec<String> {
        match self {
            Self::TranslateToBase(config) | Self::TranslateToTarget(config) => {
                config.answers.values()
            }
            Self::FillBlank(config) => config.answers.values(),
            Self::Dialogue(config) => config
                .turns
                .iter()
                .flat_map(|turn| match turn {
                    DialogueTurn::Choice { answers, .. } => answers.values(),
                    DialogueTurn::Statement { .. } => Vec::new(),
                })
                .collect(),
            Self::WordBank(config) => config.answer.clone(),
            Self::MatchPairs(config) => config.pairs.iter().map(|pair| pair.target.clone()).collect(),
        }
    }
}

/// A trimmed, whitespace-collapsed text field; blank or non-scalar is `None`.
pub(crate) fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(value_as_string)
        .map(|text| normalize_text(&text))
        .filter(|text| !text.is_empty())
}

/// Answers listed under `answers`, as an array or a single value.
pub(crate) fn answers_field(object: &Map<String, Value>) -> AnswerLookup {
    let mut lookup = AnswerLookup::new();
    match object.get("answers") {
        Some(Value::Array(values)) => {
            for value in values.iter().filter_map(value_as_string) {
                lookup.add(&value);
            }
        }
        Some(value) => {
            if let Some(value) = value_as_string(value) {
                lookup.add(&value);
            }
        }
        None => {}
    }
    lookup
}

pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        Value::Array(_) | Value::Object(_) => true,
    }
}

pub(crate) fn require_object<'a>(
    raw: &'a Value,
    kind: ExerciseKind,
) -> Result<&'a Map<String, Value>, ConfigurationError> {
    raw.as_object().ok_or(ConfigurationError::NotAnObject {
        exercise: kind.name(),
    })
}
