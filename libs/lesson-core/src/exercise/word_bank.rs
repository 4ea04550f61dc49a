//! Tile-arrangement exercises.
//!
//! A word bank shows a sentence in one language and a shuffled set of tiles
//! in the other. The answer is the ordered tile sequence; checking is
//! positional, so two swapped tiles fail even though the same tiles are used.

use rand::seq::SliceRandom;
use rand::Rng;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::course::word_entry_for_token;
use crate::error::ConfigurationError;
use crate::normalize::{
    clean_latin_word, clean_native_word, normalize_latin_word, normalize_native_word,
    normalize_sentence_text,
};
use crate::parser::ids::{parse_section_number, parse_unit_number};
use crate::settings::{ExerciseSettings, FillerWord};
use crate::types::{Sentence, Unit, VocabEntry};

static NAME_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\{\s*name\s*\}|\[\s*name\s*\]").expect("valid regex"));

static NAME_BRACES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\{\s*name\s*\}").expect("valid regex"));

static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^)]*\)").expect("valid regex"));

static ALTERNATIVES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*[/;,]|\bor\b").expect("valid regex"));

static NAME_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)name").expect("valid regex"));

static POSSESSIVE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)mage").expect("valid regex"));

/// Which language the learner assembles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WordBankDirection {
    /// Translated sentence shown; native-script tiles.
    ToBase,
    /// Native sentence shown; translated tiles.
    ToTarget,
}

impl WordBankDirection {
    /// Comparison form of a tile word in this direction.
    pub fn normalize(&self, word: &str) -> String {
        match self {
            Self::ToBase => normalize_native_word(word),
            Self::ToTarget => normalize_latin_word(word),
        }
    }

    fn clean(&self, word: &str) -> String {
        match self {
            Self::ToBase => clean_native_word(word),
            Self::ToTarget => clean_latin_word(word),
        }
    }

    pub fn instructions(&self) -> &'static str {
        match self {
            Self::ToBase => "Arrange the Sinhala tiles to match the English sentence.",
            Self::ToTarget => "Arrange the English tiles to match the Sinhala sentence.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translit: Option<String>,
    pub normalized: String,
    /// Whether the tile currently sits in the answer area.
    #[serde(default)]
    pub used: bool,
}

#[derive(Debug, Clone, Default)]
pub struct WordBankOptions {
    /// Substituted for `{name}` placeholders and inserted as an extra tile.
    pub profile_name: Option<String>,
    pub settings: ExerciseSettings,
}

impl WordBankOptions {
    pub fn new(settings: ExerciseSettings) -> Self {
        Self {
            profile_name: None,
            settings,
        }
    }

    pub fn with_profile_name(mut self, name: impl Into<String>) -> Self {
        self.profile_name = Some(name.into());
        self
    }

    fn profile_name(&self) -> Option<&str> {
        self.profile_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordBankConfig {
    pub direction: WordBankDirection,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_transliteration: Option<String>,
    pub instructions: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub illustration: Option<String>,
    /// Answer and filler tiles, shuffled.
    pub tiles: Vec<Tile>,
    /// Answer words in order, display form.
    pub answer: Vec<String>,
    pub answer_normalized: Vec<String>,
    /// Ids of the answer tiles, in answer order.
    pub answer_tile_ids: Vec<String>,
    pub success_message: String,
    pub error_message: String,
}

impl WordBankConfig {
    pub fn tile(&self, id: &str) -> Option<&Tile> {
        self.tiles.iter().find(|tile| tile.id == id)
    }

    /// Check a sequence of tile ids. Unknown ids fail.
    pub fn check_tiles<S: AsRef<str>>(&self, tile_ids: &[S]) -> bool {
        let attempt: Option<Vec<&str>> = tile_ids
            .iter()
            .map(|id| self.tile(id.as_ref()).map(|tile| tile.normalized.as_str()))
            .collect();
        attempt.is_some_and(|attempt| {
            attempt.len() == self.answer_normalized.len()
                && attempt
                    .iter()
                    .zip(&self.answer_normalized)
                    .all(|(left, right)| *left == right.as_str())
        })
    }

    /// Check a sequence of typed or tile words.
    pub fn check_words<S: AsRef<str>>(&self, words: &[S]) -> bool {
        check_sequence(&self.answer_normalized, words, self.direction)
    }
}

/// Positional equality of `attempt` against already-normalized `expected`.
pub fn check_sequence<S: AsRef<str>>(
    expected: &[String],
    attempt: &[S],
    direction: WordBankDirection,
) -> bool {
    expected.len() == attempt.len()
        && expected
            .iter()
            .zip(attempt)
            .all(|(expected, word)| *expected == direction.normalize(word.as_ref()))
}

pub fn contains_name_placeholder(value: &str) -> bool {
    NAME_PLACEHOLDER.is_match(value)
}

fn sentence_has_placeholder(sentence: &Sentence) -> bool {
    contains_name_placeholder(&sentence.text) || contains_name_placeholder(&sentence.tokens.join(" "))
}

fn fill_name_placeholder(text: &str, name: Option<&str>) -> String {
    match name {
        Some(name) => NAME_BRACES.replace_all(text, NoExpand(name)).into_owned(),
        None => text.to_string(),
    }
}

/// Split a gloss like "hello (formal) / hi" into its words.
pub fn split_into_words(value: &str) -> Vec<String> {
    let without_parens = PARENTHESIZED.replace_all(value, " ");
    ALTERNATIVES
        .split(&without_parens)
        .flat_map(str::split_whitespace)
        .map(clean_latin_word)
        .filter(|word| !word.is_empty())
        .collect()
}

/// Illustration for a unit, when both its section and unit numbers are known.
pub fn unit_illustration_path(unit: &Unit) -> Option<String> {
    let section = unit
        .section_number
        .filter(|n| *n > 0)
        .or_else(|| unit.section_id.as_deref().and_then(parse_section_number))?;
    let number = unit
        .number
        .filter(|n| *n > 0)
        .or_else(|| parse_unit_number(&unit.slug))
        .or_else(|| parse_unit_number(&unit.id))?;
    Some(format!("assets/general/section{section}_unit_{number}.svg"))
}

/// Sinhala tile form. `si` wins; `wordBankSi` only stands in for a blank `si`.
fn native_form(entry: &VocabEntry) -> &str {
    if entry.base.trim().is_empty() {
        entry.word_bank_base.as_deref().unwrap_or_default()
    } else {
        &entry.base
    }
}

/// English tile form. The word-bank override wins over `en`.
fn target_form(entry: &VocabEntry) -> &str {
    entry.word_bank_target.as_deref().unwrap_or(&entry.target)
}

/// A word before it becomes a tile.
#[derive(Debug, Clone)]
struct Word {
    /// Source token, used to place a profile name.
    token: String,
    text: String,
    translit: Option<String>,
}

/// One native-script word per sentence token.
fn native_words(unit: &Unit, sentence: &Sentence) -> Result<Vec<Word>, ConfigurationError> {
    sentence
        .tokens
        .iter()
        .map(|token| {
            let entry = word_entry_for_token(unit, token);
            let text = entry
                .as_ref()
                .map(|entry| native_form(entry).to_string())
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| clean_native_word(token));
            if text.is_empty() {
                return Err(ConfigurationError::UnresolvedToken {
                    token: token.clone(),
                });
            }
            Ok(Word {
                token: token.clone(),
                text,
                translit: entry.and_then(|entry| entry.transliteration),
            })
        })
        .collect()
}

/// One English word per sentence token.
///
/// The sentence text is used when its words line up one to one with the
/// tokens; otherwise each token contributes its first gloss as a single tile.
fn target_words(unit: &Unit, sentence: &Sentence) -> Result<Vec<Word>, ConfigurationError> {
    let without_name = NAME_PLACEHOLDER.replace_all(&sentence.text, " ");
    let text = normalize_sentence_text(&without_name);
    let text_words: Vec<&str> = text.split(' ').filter(|word| !word.is_empty()).collect();
    if text_words.len() == sentence.tokens.len() {
        return Ok(text_words
            .into_iter()
            .zip(&sentence.tokens)
            .map(|(text, token)| Word {
                token: token.clone(),
                text: text.to_string(),
                translit: None,
            })
            .collect());
    }

    sentence
        .tokens
        .iter()
        .map(|token| {
            let text = word_entry_for_token(unit, token)
                .map(|entry| first_gloss(target_form(&entry)))
                .filter(|gloss| !gloss.is_empty())
                .unwrap_or_else(|| clean_latin_word(token));
            if text.is_empty() {
                return Err(ConfigurationError::UnresolvedToken {
                    token: token.clone(),
                });
            }
            Ok(Word {
                token: token.clone(),
                text,
                translit: None,
            })
        })
        .collect()
}

/// First alternative of a gloss, kept whole: "a teacher / tutor" gives "a teacher".
fn first_gloss(value: &str) -> String {
    let without_parens = PARENTHESIZED.replace_all(value, " ");
    ALTERNATIVES
        .split(&without_parens)
        .map(|part| {
            part.split_whitespace()
                .map(clean_latin_word)
                .filter(|word| !word.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .find(|gloss| !gloss.is_empty())
        .unwrap_or_default()
}

/// Insert the profile name as an extra tile after a `name`-like token, else
/// after a possessive token, else at the end.
fn insert_profile_name(
    words: &mut Vec<Word>,
    sentence: &Sentence,
    name: Option<&str>,
    direction: WordBankDirection,
) {
    let Some(name) = name else {
        return;
    };
    if !sentence_has_placeholder(sentence) || normalize_native_word(name).is_empty() {
        return;
    }
    let index = words
        .iter()
        .position(|word| NAME_TOKEN.is_match(&word.token))
        .or_else(|| words.iter().position(|word| POSSESSIVE_TOKEN.is_match(&word.token)))
        .map_or(words.len(), |index| index + 1);
    words.insert(
        index,
        Word {
            token: "__profile_name__".to_string(),
            text: name.to_string(),
            translit: Some(name.to_string()).filter(|_| direction == WordBankDirection::ToBase),
        },
    );
}

/// Candidate filler words: unit vocabulary first, then the generic list,
/// skipping answer words, duplicates and name placeholders.
fn filler_candidates(
    unit: &Unit,
    direction: WordBankDirection,
    generic: &[FillerWord],
    answer: &HashSet<String>,
) -> Vec<Word> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();
    let mut add = |word: &str, translit: Option<&str>| {
        let cleaned = direction.clean(word);
        let normalized = direction.normalize(&cleaned);
        if normalized.is_empty() || answer.contains(&normalized) || !seen.insert(normalized.clone())
        {
            return;
        }
        let text = if direction == WordBankDirection::ToTarget && normalized == "i" {
            "I".to_string()
        } else {
            cleaned
        };
        candidates.push(Word {
            token: text.clone(),
            text,
            translit: translit.map(str::to_string),
        });
    };

    for entry in &unit.vocab {
        match direction {
            WordBankDirection::ToBase => {
                let has_placeholder = [native_form(entry), entry.transliteration(), entry.target.as_str()]
                    .iter()
                    .any(|value| contains_name_placeholder(value));
                if !has_placeholder {
                    add(native_form(entry), entry.transliteration.as_deref());
                }
            }
            WordBankDirection::ToTarget => {
                let english = target_form(entry);
                let parts = split_into_words(english);
                if parts.is_empty() {
                    add(english, None);
                }
                for part in &parts {
                    add(part, None);
                }
            }
        }
    }

    for filler in generic {
        let has_placeholder = contains_name_placeholder(&filler.text)
            || filler.translit.as_deref().is_some_and(contains_name_placeholder);
        if !has_placeholder {
            let translit = match direction {
                WordBankDirection::ToBase => filler.translit.as_deref(),
                WordBankDirection::ToTarget => None,
            };
            add(&filler.text, translit);
        }
    }
    candidates
}

fn make_tile(counter: &mut usize, word: Word, direction: WordBankDirection) -> Tile {
    *counter += 1;
    Tile {
        id: format!("tile-{counter}"),
        normalized: direction.normalize(&word.text),
        text: word.text,
        translit: word.translit,
        used: false,
    }
}

/// Build a word-bank exercise for one sentence of a unit.
pub fn build_word_bank_config(
    unit: &Unit,
    sentence: &Sentence,
    direction: WordBankDirection,
    options: &WordBankOptions,
    rng: &mut impl Rng,
) -> Result<WordBankConfig, ConfigurationError> {
    let settings = &options.settings;
    let profile_name = options.profile_name();

    let mut words = match direction {
        WordBankDirection::ToBase => native_words(unit, sentence)?,
        WordBankDirection::ToTarget => target_words(unit, sentence)?,
    };
    insert_profile_name(&mut words, sentence, profile_name, direction);
    if words.is_empty() {
        return Err(ConfigurationError::EmptySentence);
    }

    let mut counter = 0;
    let answer_tiles: Vec<Tile> = words
        .into_iter()
        .map(|word| make_tile(&mut counter, word, direction))
        .collect();
    let answer: Vec<String> = answer_tiles.iter().map(|tile| tile.text.clone()).collect();
    let answer_normalized: Vec<String> =
        answer_tiles.iter().map(|tile| tile.normalized.clone()).collect();
    let answer_tile_ids: Vec<String> = answer_tiles.iter().map(|tile| tile.id.clone()).collect();

    let generic = match direction {
        WordBankDirection::ToBase => &settings.fillers.base,
        WordBankDirection::ToTarget => &settings.fillers.target,
    };
    let answer_set: HashSet<String> = answer_normalized.iter().cloned().collect();
    let candidates = filler_candidates(unit, direction, generic, &answer_set);
    let desired_total = settings.min_total_tiles.max(answer_tiles.len() + 2);
    let filler_count = settings
        .max_filler_tiles
        .min(desired_total - answer_tiles.len())
        .min(candidates.len());
    let fillers: Vec<Word> = candidates
        .choose_multiple(rng, filler_count)
        .cloned()
        .collect();

    let mut tiles = answer_tiles;
    tiles.extend(
        fillers
            .into_iter()
            .map(|word| make_tile(&mut counter, word, direction)),
    );
    tiles.shuffle(rng);

    let (prompt, prompt_transliteration, correct_text) = match direction {
        WordBankDirection::ToBase => (
            fill_name_placeholder(&sentence.text, profile_name),
            None,
            answer.join(" "),
        ),
        WordBankDirection::ToTarget => {
            let entries: Vec<Option<VocabEntry>> = sentence
                .tokens
                .iter()
                .map(|token| word_entry_for_token(unit, token))
                .collect();
            let native: Vec<&str> = sentence
                .tokens
                .iter()
                .zip(&entries)
                .map(|(token, entry)| entry.as_ref().map_or(token.as_str(), |e| e.base.as_str()))
                .collect();
            let translit = entries
                .iter()
                .map(|entry| entry.as_ref().map_or("", |e| e.transliteration()))
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string();
            let correct = match sentence.text.trim() {
                "" => answer.join(" "),
                text => fill_name_placeholder(text, profile_name),
            };
            (
                native.join(" "),
                Some(translit).filter(|t| !t.is_empty()),
                correct,
            )
        }
    };

    Ok(WordBankConfig {
        direction,
        prompt,
        prompt_transliteration,
        instructions: direction.instructions().to_string(),
        illustration: unit_illustration_path(unit),
        tiles,
        answer,
        answer_normalized,
        answer_tile_ids,
        success_message: "Correct!".to_string(),
        error_message: format!("Correct: {correct_text}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::test_support::{entry, pronouns, rng};
    use pretty_assertions::assert_eq;

    fn unit() -> Unit {
        let mut vocab = pronouns();
        vocab.push(entry("මගේ", "my", "mage"));
        vocab.push(entry("නම", "name", "nama"));
        vocab.push(entry("ආයුබෝවන්", "hello / greetings", "ayubowan"));
        let mut unit = Unit::new("unit-02".into(), "unit-02".into(), vocab, vec![]);
        unit.number = Some(2);
        unit.section_number = Some(1);
        unit
    }

    fn sentence(text: &str, tokens: &[&str]) -> Sentence {
        Sentence {
            text: text.to_string(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
            min_unit: None,
        }
    }

    fn options() -> WordBankOptions {
        WordBankOptions::default()
    }

    #[test]
    fn test_to_base_answer_follows_tokens() {
        let sentence = sentence("I am ok", &["mama", "oya", "ohu"]);
        let config =
            build_word_bank_config(&unit(), &sentence, WordBankDirection::ToBase, &options(), &mut rng(1))
                .unwrap();
        assert_eq!(config.answer, vec!["මම", "ඔයා", "ඔහු"]);
        assert_eq!(config.answer.len(), sentence.tokens.len());
        assert_eq!(config.prompt, "I am ok");
        assert_eq!(config.tiles.len(), 6);
        assert_eq!(config.illustration.as_deref(), Some("assets/general/section1_unit_2.svg"));
        assert_eq!(config.error_message, "Correct: මම ඔයා ඔහු");

        let answer_tile = config.tile(&config.answer_tile_ids[0]).unwrap();
        assert_eq!(answer_tile.translit.as_deref(), Some("mama"));
        for tile in &config.tiles {
            if !config.answer_tile_ids.contains(&tile.id) {
                assert!(!config.answer_normalized.contains(&tile.normalized));
            }
        }
    }

    #[test]
    fn test_order_sensitive_check() {
        let sentence = sentence("I you he", &["mama", "oya", "ohu"]);
        let config =
            build_word_bank_config(&unit(), &sentence, WordBankDirection::ToBase, &options(), &mut rng(5))
                .unwrap();
        let ids = config.answer_tile_ids.clone();
        assert!(config.check_tiles(&ids[..]));

        for index in 0..ids.len() - 1 {
            let mut swapped = ids.clone();
            swapped.swap(index, index + 1);
            assert!(!config.check_tiles(&swapped[..]));
        }
        assert!(!config.check_tiles(&ids[..2]));
        assert!(!config.check_tiles(&["tile-99"]));
        assert!(config.check_words(&["මම", " ඔයා,", "ඔහු"]));
    }

    #[test]
    fn test_to_target_uses_aligned_sentence_text() {
        let sentence = sentence("“Hello,” you said.", &["ayubowan", "oya", "kiwwa"]);
        let config = build_word_bank_config(
            &unit(),
            &sentence,
            WordBankDirection::ToTarget,
            &options(),
            &mut rng(3),
        )
        .unwrap();
        assert_eq!(config.answer, vec!["Hello", "you", "said"]);
        assert_eq!(config.answer.len(), sentence.tokens.len());
        assert_eq!(config.answer_normalized, vec!["hello", "you", "said"]);
        assert_eq!(config.prompt, "ආයුබෝවන් ඔයා kiwwa");
        assert_eq!(config.prompt_transliteration.as_deref(), Some("ayubowan oya kiwwa"));
        assert_eq!(config.tiles.len(), 6);
        assert_eq!(config.error_message, "Correct: “Hello,” you said.");
        assert!(config.check_words(&["HELLO", "you", "said!"]));
    }

    /// Text with more words than tokens still gives one tile per token.
    #[test]
    fn test_to_target_keeps_one_tile_per_token() {
        let mut vocab = pronouns();
        vocab.push(entry("ගුරුවරයෙක්", "a teacher / tutor", "guruwarayek"));
        let unit = Unit::new("unit-04".into(), "unit-04".into(), vocab, vec![]);
        let sentence = sentence("I am a teacher", &["mama", "guruwarayek"]);

        let config = build_word_bank_config(
            &unit,
            &sentence,
            WordBankDirection::ToTarget,
            &options(),
            &mut rng(4),
        )
        .unwrap();
        assert_eq!(config.answer, vec!["I", "a teacher"]);
        assert_eq!(config.answer.len(), sentence.tokens.len());
        assert_eq!(config.error_message, "Correct: I am a teacher");

        let ids = config.answer_tile_ids.clone();
        assert!(config.check_tiles(&ids[..]));
        assert!(!config.check_tiles(&[ids[1].clone(), ids[0].clone()]));
    }

    #[test]
    fn test_unresolvable_token_is_rejected() {
        let sentence = sentence("", &["mama", "?"]);
        for direction in [WordBankDirection::ToBase, WordBankDirection::ToTarget] {
            assert_eq!(
                build_word_bank_config(&unit(), &sentence, direction, &options(), &mut rng(0)),
                Err(ConfigurationError::UnresolvedToken { token: "?".into() })
            );
        }
    }

    #[test]
    fn test_native_tiles_prefer_si_over_word_bank_form() {
        let mut colloquial = entry("මම", "I", "mama");
        colloquial.word_bank_base = Some("මං".into());
        colloquial.word_bank_target = Some("me".into());
        let unit = Unit::new("u".into(), "u".into(), vec![colloquial.clone()], vec![]);

        let to_base = build_word_bank_config(
            &unit,
            &sentence("I", &["mama"]),
            WordBankDirection::ToBase,
            &options(),
            &mut rng(1),
        )
        .unwrap();
        assert_eq!(to_base.answer, vec!["මම"]);

        let to_target = build_word_bank_config(
            &unit,
            &sentence("", &["mama"]),
            WordBankDirection::ToTarget,
            &options(),
            &mut rng(1),
        )
        .unwrap();
        assert_eq!(to_target.answer, vec!["me"]);

        colloquial.base = String::new();
        assert_eq!(native_form(&colloquial), "මං");
    }

    #[test]
    fn test_to_target_falls_back_to_token_glosses() {
        let sentence = sentence("", &["mama", "ayubowan"]);
        let config = build_word_bank_config(
            &unit(),
            &sentence,
            WordBankDirection::ToTarget,
            &options(),
            &mut rng(3),
        )
        .unwrap();
        assert_eq!(config.answer, vec!["I", "hello"]);
        assert_eq!(config.error_message, "Correct: I hello");
    }

    #[test]
    fn test_filler_count_rules() {
        let long = sentence("", &["mama", "oya", "ohu", "eya", "mage", "nama"]);
        let config =
            build_word_bank_config(&unit(), &long, WordBankDirection::ToBase, &options(), &mut rng(8))
                .unwrap();
        // max(6, 6 + 2) - 6 = 2 fillers.
        assert_eq!(config.tiles.len(), 8);

        let short = sentence("", &["mama"]);
        let config =
            build_word_bank_config(&unit(), &short, WordBankDirection::ToBase, &options(), &mut rng(8))
                .unwrap();
        // Capped at four fillers.
        assert_eq!(config.tiles.len(), 5);
    }

    #[test]
    fn test_filler_i_is_capitalized() {
        let sentence = sentence("you", &["oya"]);
        let mut settings = ExerciseSettings::default();
        settings.fillers.target.clear();
        let small = Unit::new("u".into(), "u".into(), pronouns(), vec![]);
        let config = build_word_bank_config(
            &small,
            &sentence,
            WordBankDirection::ToTarget,
            &WordBankOptions::new(settings),
            &mut rng(0),
        )
        .unwrap();
        let texts: HashSet<&str> = config.tiles.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, HashSet::from(["you", "I", "he", "she"]));
        assert_eq!(config.illustration, None);
    }

    #[test]
    fn test_profile_name_inserted_after_name_token() {
        let sentence = sentence("My name is {name}", &["mage", "name"]);
        let options = WordBankOptions::default().with_profile_name(" Kamal ");
        let config =
            build_word_bank_config(&unit(), &sentence, WordBankDirection::ToBase, &options, &mut rng(2))
                .unwrap();
        assert_eq!(config.prompt, "My name is Kamal");
        assert_eq!(config.answer, vec!["මගේ", "නම", "Kamal"]);

        let to_target = build_word_bank_config(
            &unit(),
            &sentence,
            WordBankDirection::ToTarget,
            &options,
            &mut rng(2),
        )
        .unwrap();
        assert_eq!(to_target.answer, vec!["my", "name", "Kamal"]);
        assert_eq!(to_target.error_message, "Correct: My name is Kamal");
    }

    #[test]
    fn test_profile_name_after_possessive_or_at_end() {
        let options = WordBankOptions::default().with_profile_name("Kamal");
        let possessive = sentence("{name} is mine", &["mage", "oya"]);
        let config = build_word_bank_config(
            &unit(),
            &possessive,
            WordBankDirection::ToBase,
            &options,
            &mut rng(2),
        )
        .unwrap();
        assert_eq!(config.answer, vec!["මගේ", "Kamal", "ඔයා"]);

        let plain = sentence("Hi [name]", &["oya"]);
        let config =
            build_word_bank_config(&unit(), &plain, WordBankDirection::ToBase, &options, &mut rng(2))
                .unwrap();
        assert_eq!(config.answer, vec!["ඔයා", "Kamal"]);

        let no_placeholder = sentence("Hi", &["oya"]);
        let config = build_word_bank_config(
            &unit(),
            &no_placeholder,
            WordBankDirection::ToBase,
            &options,
            &mut rng(2),
        )
        .unwrap();
        assert_eq!(config.answer, vec!["ඔයා"]);
    }

    #[test]
    fn test_empty_sentence_is_rejected() {
        let empty = sentence("", &[]);
        for direction in [WordBankDirection::ToBase, WordBankDirection::ToTarget] {
            assert_eq!(
                build_word_bank_config(&unit(), &empty, direction, &options(), &mut rng(0)),
                Err(ConfigurationError::EmptySentence)
            );
        }
    }

    #[test]
    fn test_split_into_words() {
        assert_eq!(split_into_words("hello (formal) / hi"), vec!["hello", "hi"]);
        assert_eq!(split_into_words("yes or no; maybe"), vec!["yes", "no", "maybe"]);
        assert_eq!(split_into_words("for"), vec!["for"]);
    }
}
