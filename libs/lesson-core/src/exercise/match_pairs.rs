//! Match native-script cards with their translations.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ExerciseKind;
use crate::error::ConfigurationError;
use crate::settings::ExerciseSettings;
use crate::types::VocabEntry;

const MIN_PAIRS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Column {
    Base,
    Target,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPair {
    pub base: String,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translit: Option<String>,
}

/// One card on the board. `pair_id` indexes into [`MatchPairsConfig::pairs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairCard {
    pub pair_id: usize,
    pub column: Column,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchPairsConfig {
    pub prompt: String,
    pub instructions: String,
    pub success_message: String,
    pub error_message: String,
    pub initial_message: String,
    pub pairs: Vec<MatchPair>,
    /// Each column is shuffled independently.
    pub base_column: Vec<PairCard>,
    pub target_column: Vec<PairCard>,
}

impl MatchPairsConfig {
    pub fn card(&self, column: Column, position: usize) -> Option<&PairCard> {
        match column {
            Column::Base => self.base_column.get(position),
            Column::Target => self.target_column.get(position),
        }
    }
}

/// Two cards match iff they belong to the same pair and sit in different columns.
pub fn cards_match(first: &PairCard, second: &PairCard) -> bool {
    first.pair_id == second.pair_id && first.column != second.column
}

/// Build a board from vocabulary. More entries than the pair limit are
/// sampled down at random; fewer than two is an error.
pub fn build_match_pairs_config(
    vocab: &[VocabEntry],
    settings: &ExerciseSettings,
    rng: &mut impl Rng,
) -> Result<MatchPairsConfig, ConfigurationError> {
    let usable: Vec<&VocabEntry> = vocab.iter().filter(|entry| entry.is_complete()).collect();
    if usable.len() < MIN_PAIRS {
        return Err(ConfigurationError::InsufficientVocabulary {
            exercise: ExerciseKind::MatchPairs.name(),
            required: MIN_PAIRS,
            found: usable.len(),
        });
    }

    let limit = settings.match_pair_limit.max(MIN_PAIRS);
    let selected: Vec<&VocabEntry> = if usable.len() > limit {
        usable.choose_multiple(rng, limit).copied().collect()
    } else {
        usable
    };

    let pairs: Vec<MatchPair> = selected
        .iter()
        .map(|entry| MatchPair {
            base: entry.base.clone(),
            target: entry.target.clone(),
            translit: entry.transliteration.clone(),
        })
        .collect();

    let mut base_column: Vec<PairCard> = pairs
        .iter()
        .enumerate()
        .map(|(pair_id, pair)| PairCard {
            pair_id,
            column: Column::Base,
            label: pair.base.clone(),
            translit: pair.translit.clone(),
        })
        .collect();
    let mut target_column: Vec<PairCard> = pairs
        .iter()
        .enumerate()
        .map(|(pair_id, pair)| PairCard {
            pair_id,
            column: Column::Target,
            label: pair.target.clone(),
            translit: None,
        })
        .collect();
    base_column.shuffle(rng);
    target_column.shuffle(rng);

    Ok(MatchPairsConfig {
        prompt: "Match the pairs".to_string(),
        instructions: "Match the Sinhala words with their English meanings.".to_string(),
        success_message: "Great match!".to_string(),
        error_message: "Try again.".to_string(),
        initial_message: "Start matching to continue.".to_string(),
        pairs,
        base_column,
        target_column,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercise::test_support::{entry, pronouns, rng};
    use pretty_assertions::assert_eq;

    fn seven_words() -> Vec<VocabEntry> {
        let mut vocab = pronouns();
        vocab.push(entry("අපි", "we", "api"));
        vocab.push(entry("ඔවුන්", "they", "owun"));
        vocab.push(entry("රට", "country", "rata"));
        vocab
    }

    #[test]
    fn test_pairs_capped_at_limit() {
        let vocab = seven_words();
        for seed in 0..10 {
            let config =
                build_match_pairs_config(&vocab, &ExerciseSettings::default(), &mut rng(seed)).unwrap();
            assert_eq!(config.pairs.len(), 5);
            assert_eq!(config.base_column.len(), 5);
            assert_eq!(config.target_column.len(), 5);
            for pair in &config.pairs {
                assert!(vocab.iter().any(|e| e.base == pair.base && e.target == pair.target));
            }
        }
    }

    #[test]
    fn test_small_vocab_uses_everything() {
        let vocab = pronouns();
        let config = build_match_pairs_config(&vocab, &ExerciseSettings::default(), &mut rng(2)).unwrap();
        assert_eq!(config.pairs.len(), 4);
        assert_eq!(config.pairs[0].base, "මම");
        assert_eq!(config.pairs[0].translit.as_deref(), Some("mama"));
    }

    #[test]
    fn test_single_entry_fails() {
        let vocab = pronouns()[..1].to_vec();
        let result = build_match_pairs_config(&vocab, &ExerciseSettings::default(), &mut rng(2));
        assert!(matches!(
            result,
            Err(ConfigurationError::InsufficientVocabulary { required: 2, found: 1, .. })
        ));
    }

    #[test]
    fn test_entries_missing_a_side_are_skipped() {
        let mut vocab = pronouns()[..2].to_vec();
        vocab.push(VocabEntry {
            target: String::new(),
            ..entry("අපි", "we", "api")
        });
        let config =
            build_match_pairs_config(&vocab, &ExerciseSettings::default(), &mut rng(2)).unwrap();
        assert_eq!(config.pairs.len(), 2);
        assert!(config.base_column.iter().all(|card| card.label != "අපි"));
        assert!(config.target_column.iter().all(|card| !card.label.is_empty()));

        vocab.remove(0);
        let result = build_match_pairs_config(&vocab, &ExerciseSettings::default(), &mut rng(2));
        assert!(matches!(
            result,
            Err(ConfigurationError::InsufficientVocabulary { required: 2, found: 1, .. })
        ));
    }

    #[test]
    fn test_cards_match_rules() {
        let config =
            build_match_pairs_config(&seven_words(), &ExerciseSettings::default(), &mut rng(9)).unwrap();
        for base in &config.base_column {
            for target in &config.target_column {
                assert_eq!(cards_match(base, target), base.pair_id == target.pair_id);
            }
            for other in &config.base_column {
                assert!(!cards_match(base, other));
            }
        }
    }

    #[test]
    fn test_target_cards_have_no_transliteration() {
        let config = build_match_pairs_config(&pronouns(), &ExerciseSettings::default(), &mut rng(4)).unwrap();
        assert!(config.target_column.iter().all(|card| card.translit.is_none()));
        let first = config.card(Column::Base, 0).unwrap();
        assert_eq!(config.pairs[first.pair_id].base, first.label);
    }
}
