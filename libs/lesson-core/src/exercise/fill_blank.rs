//! Fill-in-the-blank sentences.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{answers_field, require_object, text_field, Choice, ExerciseKind};
use crate::error::ConfigurationError;
use crate::normalize::AnswerLookup;

/// Sentence text on either side of the blank. At least one side is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceFrame {
    pub before: String,
    pub after: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBlankConfig {
    pub prompt: String,
    pub sentence: SentenceFrame,
    pub instructions: String,
    pub blank_placeholder: String,
    pub success_message: String,
    pub error_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_message: Option<String>,
    pub choices: Vec<Choice>,
    pub answers: AnswerLookup,
}

impl FillBlankConfig {
    pub fn is_correct(&self, value: &str) -> bool {
        self.answers.has(value)
    }

    /// The sentence with `value` in the blank.
    pub fn completed_sentence(&self, value: &str) -> String {
        [self.sentence.before.as_str(), value, self.sentence.after.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Validate an authored fill-blank config.
pub fn build_fill_blank_config(raw: &Value) -> Result<FillBlankConfig, ConfigurationError> {
    let kind = ExerciseKind::FillBlank;
    let exercise = kind.name();
    let object = require_object(raw, kind)?;
    let prompt =
        text_field(object, "prompt").ok_or(ConfigurationError::MissingPrompt { exercise })?;

    let sentence = match object.get("sentence").and_then(Value::as_object) {
        Some(sentence) => SentenceFrame {
            before: text_field(sentence, "before").unwrap_or_default(),
            after: text_field(sentence, "after").unwrap_or_default(),
        },
        None => SentenceFrame::default(),
    };
    if sentence.before.is_empty() && sentence.after.is_empty() {
        return Err(ConfigurationError::MissingSentence { exercise });
    }

    let choices: Vec<Choice> = object
        .get("choices")
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Choice::from_value).collect())
        .unwrap_or_default();
    if choices.is_empty() {
        return Err(ConfigurationError::NoChoices { exercise });
    }

    let answers = answers_field(object);
    if answers.is_empty() {
        return Err(ConfigurationError::NoCorrectAnswer { exercise });
    }
    let choices = choices
        .into_iter()
        .map(|choice| Choice {
            is_correct: answers.has(&choice.value) || answers.has(&choice.label),
            ..choice
        })
        .collect();

    Ok(FillBlankConfig {
        prompt,
        sentence,
        instructions: text_field(object, "instructions")
            .unwrap_or_else(|| "Choose the word that best completes the sentence.".to_string()),
        blank_placeholder: text_field(object, "blankPlaceholder")
            .unwrap_or_else(|| "_____".to_string()),
        success_message: text_field(object, "successMessage")
            .unwrap_or_else(|| "Correct! Nice work.".to_string()),
        error_message: text_field(object, "errorMessage")
            .unwrap_or_else(|| "Not quite, try again.".to_string()),
        initial_message: text_field(object, "initialMessage"),
        choices,
        answers,
    })
}
