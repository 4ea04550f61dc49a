//! Multiple-choice translation exercises.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::{answers_field, require_object, text_field, Choice, ExerciseKind};
use crate::error::ConfigurationError;
use crate::normalize::{normalize_answer, AnswerLookup};
use crate::settings::ExerciseSettings;
use crate::types::{Side, VocabEntry};

/// A prompt with a set of choices and the accepted answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceConfig {
    pub badge: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transliteration: Option<String>,
    pub instructions: String,
    pub success_message: String,
    /// Success text without the transliteration, for learners hiding it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message_plain: Option<String>,
    pub error_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_message: Option<String>,
    pub choices: Vec<Choice>,
    pub answers: AnswerLookup,
}

impl ChoiceConfig {
    pub fn is_correct(&self, value: &str) -> bool {
        self.answers.has(value)
    }

    pub fn correct_choices(&self) -> impl Iterator<Item = &Choice> {
        self.choices.iter().filter(|choice| choice.is_correct)
    }
}

/// Collapse entries sharing a case-insensitive text on `side`. A priority
/// entry replaces an earlier non-priority one; otherwise the first wins.
/// Entries missing either side are skipped.
fn unique_entries(vocab: &[VocabEntry], side: Side) -> Vec<&VocabEntry> {
    let mut unique: Vec<&VocabEntry> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();
    for entry in vocab.iter().filter(|entry| entry.is_complete()) {
        let key = normalize_answer(entry.side(side));
        if key.is_empty() {
            continue;
        }
        match positions.get(&key) {
            Some(&index) => {
                if entry.priority && !unique[index].priority {
                    unique[index] = entry;
                }
            }
            None => {
                positions.insert(key, unique.len());
                unique.push(entry);
            }
        }
    }
    unique
}

/// The correct entry and the shuffled presentation order, correct included.
struct Draw<'a> {
    selected: &'a VocabEntry,
    presented: Vec<&'a VocabEntry>,
}

fn draw_entries<'a>(
    vocab: &'a [VocabEntry],
    choice_side: Side,
    kind: ExerciseKind,
    settings: &ExerciseSettings,
    rng: &mut impl Rng,
) -> Result<Draw<'a>, ConfigurationError> {
    let unique = unique_entries(vocab, choice_side);
    let distractor_count = settings.distractor_count();
    let required = distractor_count + 1;
    if unique.len() < required {
        return Err(ConfigurationError::InsufficientVocabulary {
            exercise: kind.name(),
            required,
            found: unique.len(),
        });
    }

    let selected_index = rng.gen_range(0..unique.len());
    let selected = unique[selected_index];
    let mut distractors: Vec<&VocabEntry> = unique
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != selected_index)
        .map(|(_, entry)| *entry)
        .collect();
    distractors.shuffle(rng);
    distractors.truncate(distractor_count);

    let mut presented = Vec::with_capacity(required);
    presented.push(selected);
    presented.extend(distractors);
    presented.shuffle(rng);
    Ok(Draw {
        selected,
        presented,
    })
}

/// Native-script prompt, choose the translation.
pub fn build_translate_to_base_config(
    vocab: &[VocabEntry],
    settings: &ExerciseSettings,
    rng: &mut impl Rng,
) -> Result<ChoiceConfig, ConfigurationError> {
    let draw = draw_entries(vocab, Side::Target, ExerciseKind::TranslateToBase, settings, rng)?;
    let selected = draw.selected;
    let prompt = selected.base.clone();
    let answer = selected.target.clone();

    let success_message = match &selected.transliteration {
        Some(translit) => format!("Correct! '{prompt}' ({translit}) means '{answer}'."),
        None => format!("Correct! '{prompt}' means '{answer}'."),
    };
    let choices = draw
        .presented
        .iter()
        .map(|entry| Choice::new(&entry.target, std::ptr::eq(*entry, selected)))
        .collect();

    Ok(ChoiceConfig {
        badge: "NEW WORD".to_string(),
        error_message: format!("Not quite. '{prompt}' = '{answer}'. Try again."),
        prompt,
        transliteration: selected.transliteration.clone(),
        instructions: "Select the English meaning that matches the Sinhala word.".to_string(),
        success_message,
        success_message_plain: None,
        initial_message: None,
        choices,
        answers: AnswerLookup::from_values([answer]),
    })
}

/// Translated prompt, choose the native-script term.
pub fn build_translate_to_target_config(
    vocab: &[VocabEntry],
    settings: &ExerciseSettings,
    rng: &mut impl Rng,
) -> Result<ChoiceConfig, ConfigurationError> {
    let draw = draw_entries(vocab, Side::Base, ExerciseKind::TranslateToTarget, settings, rng)?;
    let selected = draw.selected;
    let prompt = selected.target.clone();
    let answer = selected.base.clone();

    let plain = format!("Correct! '{prompt}' = '{answer}'.");
    let success_message = match &selected.transliteration {
        Some(translit) => format!("{plain} ({translit})."),
        None => plain.clone(),
    };
    let choices = draw
        .presented
        .iter()
        .map(|entry| Choice {
            transliteration: entry.transliteration.clone(),
            ..Choice::new(&entry.base, std::ptr::eq(*entry, selected))
        })
        .collect();

    Ok(ChoiceConfig {
        badge: "TRANSLATE".to_string(),
        error_message: format!("Not quite. '{prompt}' = '{answer}'. Try again."),
        prompt,
        transliteration: selected.transliteration.clone(),
        instructions: "Select the Sinhala translation that matches the English word.".to_string(),
        success_message,
        success_message_plain: Some(plain),
        initial_message: None,
        choices,
        answers: AnswerLookup::from_values([answer]),
    })
}

/// Validate an authored choice config.
///
/// Answers are the union of `answers` and every choice flagged correct; a
/// choice whose value or label is an accepted answer is marked correct.
pub fn prepare_choice_config(
    raw: &Value,
    kind: ExerciseKind,
) -> Result<ChoiceConfig, ConfigurationError> {
    let exercise = kind.name();
    let object = require_object(raw, kind)?;
    let prompt =
        text_field(object, "prompt").ok_or(ConfigurationError::MissingPrompt { exercise })?;

    let choices: Vec<Choice> = object
        .get("choices")
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(Choice::from_value).collect())
        .unwrap_or_default();
    if choices.is_empty() {
        return Err(ConfigurationError::NoChoices { exercise });
    }

    let mut answers = answers_field(object);
    for choice in choices.iter().filter(|choice| choice.is_correct) {
        answers.add(&choice.value);
    }
    if answers.is_empty() {
        return Err(ConfigurationError::NoCorrectAnswer { exercise });
    }

    let choices = choices
        .into_iter()
        .map(|choice| Choice {
            is_correct: choice.is_correct
                || answers.has(&choice.value)
                || answers.has(&choice.label),
            ..choice
        })
        .collect();

    let (badge, instructions) = match kind {
        ExerciseKind::TranslateToTarget => ("TRANSLATE", "Select the matching Sinhala translation."),
        _ => ("NEW WORD", "Select the matching English meaning."),
    };

    Ok(ChoiceConfig {
        badge: text_field(object, "badge").unwrap_or_else(|| badge.to_string()),
        prompt,
        transliteration: text_field(object, "transliteration"),
        instructions: text_field(object, "instructions").unwrap_or_else(|| instructions.to_string()),
        success_message: text_field(object, "successMessage")
            .unwrap_or_else(|| "Correct! Nice work.".to_string()),
        success_message_plain: text_field(object, "successMessagePlain"),
        error_message: text_field(object, "errorMessage")
            .unwrap_or_else(|| "Not quite, try again.".to_string()),
        initial_message: text_field(object, "initialMessage"),
        choices,
        answers,
    })
}
