//! Scripted dialogues: tutor statements interleaved with learner choices.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{answers_field, require_object, text_field, truthy, ExerciseKind};
use crate::error::ConfigurationError;
use crate::normalize::AnswerLookup;
use crate::settings::ExerciseSettings;

const DEFAULT_ROLE: &str = "tutor";

/// A tutor reply shown after a wrong option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FollowUp {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueOption {
    pub label: String,
    pub value: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up: Option<FollowUp>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum DialogueTurn {
    Statement {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speaker: Option<String>,
        role: String,
        /// Milliseconds before the next turn runs.
        delay: u64,
    },
    Choice {
        options: Vec<DialogueOption>,
        answers: AnswerLookup,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        success_message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error_message: Option<String>,
        delay: u64,
    },
}

impl DialogueTurn {
    pub fn delay(&self) -> u64 {
        match self {
            Self::Statement { delay, .. } | Self::Choice { delay, .. } => *delay,
        }
    }

    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Choice { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueConfig {
    pub prompt: String,
    pub instructions: String,
    pub turn_success_message: String,
    pub turn_error_message: String,
    pub success_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_message: Option<String>,
    pub turns: Vec<DialogueTurn>,
}

fn parse_follow_up(value: Option<&Value>) -> Option<FollowUp> {
    let object = value?.as_object()?;
    Some(FollowUp {
        text: text_field(object, "text")?,
        speaker: text_field(object, "speaker"),
        role: text_field(object, "role").unwrap_or_else(|| DEFAULT_ROLE.to_string()),
    })
}

fn parse_option(value: &Value) -> Option<DialogueOption> {
    let object = value.as_object()?;
    let label = text_field(object, "label")?;
    let value = text_field(object, "value").unwrap_or_else(|| label.clone());
    let is_correct = match object.get("isCorrect") {
        Some(flag) => truthy(flag),
        None => object.get("correct").is_some_and(truthy),
    };
    Some(DialogueOption {
        label,
        value,
        is_correct,
        follow_up: parse_follow_up(object.get("followUp")),
    })
}

fn delay_field(object: &Map<String, Value>, default: u64) -> u64 {
    object.get("delay").and_then(Value::as_u64).unwrap_or(default)
}

/// `Ok(None)` drops the turn; a choice turn without a correct answer is an error.
fn parse_turn(
    value: &Value,
    settings: &ExerciseSettings,
) -> Result<Option<DialogueTurn>, ConfigurationError> {
    let Some(object) = value.as_object() else {
        return Ok(None);
    };
    let kind = text_field(object, "type").unwrap_or_default().to_lowercase();

    match kind.as_str() {
        "statement" => Ok(text_field(object, "text").map(|text| DialogueTurn::Statement {
            text,
            speaker: text_field(object, "speaker"),
            role: text_field(object, "role").unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            delay: delay_field(object, settings.statement_delay_ms),
        })),
        "choice" => {
            let options: Vec<DialogueOption> = object
                .get("options")
                .and_then(Value::as_array)
                .map(|values| values.iter().filter_map(parse_option).collect())
                .unwrap_or_default();
            if options.is_empty() {
                return Ok(None);
            }

            let mut answers = answers_field(object);
            for option in options.iter().filter(|option| option.is_correct) {
                answers.add(&option.value);
            }
            if answers.is_empty() {
                return Err(ConfigurationError::NoCorrectAnswer {
                    exercise: ExerciseKind::Dialogue.name(),
                });
            }

            Ok(Some(DialogueTurn::Choice {
                options,
                answers,
                success_message: text_field(object, "successMessage"),
                error_message: text_field(object, "errorMessage"),
                delay: delay_field(object, settings.choice_delay_ms),
            }))
        }
        _ => Ok(None),
    }
}

/// Validate an authored dialogue. Turns of unknown type are dropped.
pub fn build_dialogue_config(
    raw: &Value,
    settings: &ExerciseSettings,
) -> Result<DialogueConfig, ConfigurationError> {
    let kind = ExerciseKind::Dialogue;
    let object = require_object(raw, kind)?;
    let prompt = text_field(object, "prompt").ok_or(ConfigurationError::MissingPrompt {
        exercise: kind.name(),
    })?;

    let mut turns = Vec::new();
    for value in object.get("turns").and_then(Value::as_array).into_iter().flatten() {
        if let Some(turn) = parse_turn(value, settings)? {
            turns.push(turn);
        }
    }
    if turns.is_empty() {
        return Err(ConfigurationError::NoTurns);
    }

    Ok(DialogueConfig {
        prompt,
        instructions: text_field(object, "instructions")
            .unwrap_or_else(|| "Follow the conversation and respond.".to_string()),
        turn_success_message: text_field(object, "turnSuccessMessage")
            .unwrap_or_else(|| "Great reply!".to_string()),
        turn_error_message: text_field(object, "turnErrorMessage")
            .unwrap_or_else(|| "Try a different response.".to_string()),
        success_message: text_field(object, "successMessage")
            .unwrap_or_else(|| "Dialogue complete!".to_string()),
        initial_message: text_field(object, "initialMessage"),
        turns,
    })
}
