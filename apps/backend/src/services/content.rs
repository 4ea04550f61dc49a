//! Content service: course loading, vocabulary resolution and exercise assembly.

use std::sync::Arc;

use lesson_core::course::{filter_unlocked_sentences, resolve_active_unit, CourseLoader};
use lesson_core::exercise::{
    build_dialogue_config, build_fill_blank_config, build_match_pairs_config,
    build_translate_to_base_config, build_translate_to_target_config, build_word_bank_config,
    check_sequence, prepare_choice_config, WordBankOptions,
};
use lesson_core::{
    AnswerLookup, ContentCache, ExerciseSettings, ResourceFetcher, VocabularyResolver,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{ApiError, Result};
use crate::models::*;

/// Loader, resolver and settings shared by the handlers.
pub struct ContentService<F> {
    loader: CourseLoader<F>,
    resolver: VocabularyResolver<F>,
    settings: ExerciseSettings,
}

impl<F: ResourceFetcher> ContentService<F> {
    /// Wire a loader and resolver over one fetcher and one cache.
    pub fn new(fetcher: F, settings: ExerciseSettings) -> Self {
        let fetcher = Arc::new(fetcher);
        let cache = Arc::new(ContentCache::new());
        Self {
            loader: CourseLoader::new(fetcher.clone(), cache.clone()),
            resolver: VocabularyResolver::new(fetcher, cache),
            settings,
        }
    }

    pub fn settings(&self) -> &ExerciseSettings {
        &self.settings
    }

    pub async fn sections(&self) -> Result<Vec<Section>> {
        Ok(self.loader.load_course_hierarchy().await?)
    }

    pub async fn units(&self, section_id: Option<&str>) -> Result<Vec<Unit>> {
        let units = self.loader.load_word_bank_units().await?;
        Ok(match section_id.filter(|id| !id.is_empty()) {
            Some(id) => units
                .into_iter()
                .filter(|unit| unit.section_id.as_deref() == Some(id))
                .collect(),
            None => units,
        })
    }

    pub async fn lesson_position(&self, query: &LessonQuery) -> Result<LessonPosition> {
        Ok(self.loader.lesson_position(query).await?)
    }

    /// Resolve vocabulary and hand back the context, which may have gained a lesson path.
    pub async fn resolve_vocab(
        &self,
        context: Option<LessonContext>,
        side: Side,
    ) -> Result<(Vec<VocabEntry>, LessonContext)> {
        let mut context = context;
        let vocab = self
            .resolver
            .resolve_lesson_vocabulary_by(context.as_mut(), side)
            .await?;
        Ok((vocab, context.unwrap_or_default()))
    }

    pub async fn batch_vocab(&self, context: Option<LessonContext>, count: i64) -> Result<Vec<VocabEntry>> {
        let mut context = context;
        Ok(self
            .resolver
            .resolve_lesson_vocabulary_batch(context.as_mut(), count)
            .await?)
    }

    /// Build a fresh exercise config of `kind`.
    pub async fn build_exercise(
        &self,
        kind: ExerciseKind,
        request: ExerciseRequest,
    ) -> Result<ExerciseConfig> {
        let mut rng = match request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let config = match kind {
            ExerciseKind::TranslateToBase | ExerciseKind::TranslateToTarget => {
                let choice = match &request.config {
                    Some(raw) => prepare_choice_config(raw, kind)?,
                    None => {
                        let side = match kind {
                            ExerciseKind::TranslateToTarget => Side::Base,
                            _ => Side::Target,
                        };
                        let vocab = self.request_vocab(&request, side).await?;
                        match kind {
                            ExerciseKind::TranslateToTarget => {
                                build_translate_to_target_config(&vocab, &self.settings, &mut rng)?
                            }
                            _ => build_translate_to_base_config(&vocab, &self.settings, &mut rng)?,
                        }
                    }
                };
                match kind {
                    ExerciseKind::TranslateToTarget => ExerciseConfig::TranslateToTarget(choice),
                    _ => ExerciseConfig::TranslateToBase(choice),
                }
            }
            ExerciseKind::FillBlank => {
                ExerciseConfig::FillBlank(build_fill_blank_config(required_config(&request)?)?)
            }
            ExerciseKind::Dialogue => ExerciseConfig::Dialogue(build_dialogue_config(
                required_config(&request)?,
                &self.settings,
            )?),
            ExerciseKind::MatchPairs => {
                let vocab = self.request_vocab(&request, Side::Target).await?;
                ExerciseConfig::MatchPairs(build_match_pairs_config(&vocab, &self.settings, &mut rng)?)
            }
            ExerciseKind::WordBank => self.word_bank(&request, &mut rng).await?,
        };

        tracing::debug!(kind = kind.slug(), answers = config.answers().len(), "built exercise");
        Ok(config)
    }

    /// Vocabulary given in the request, else resolved from its lesson context.
    async fn request_vocab(&self, request: &ExerciseRequest, side: Side) -> Result<Vec<VocabEntry>> {
        if let Some(values) = &request.vocab {
            return Ok(values.iter().filter_map(VocabEntry::from_value).collect());
        }
        let mut context = request.context.clone();
        Ok(self
            .resolver
            .resolve_lesson_vocabulary_by(context.as_mut(), side)
            .await?)
    }

    async fn word_bank(&self, request: &ExerciseRequest, rng: &mut StdRng) -> Result<ExerciseConfig> {
        let units = self.loader.load_word_bank_units().await?;
        let unit = resolve_active_unit(&units, request.unit_id.as_deref())
            .ok_or_else(|| ApiError::NotFound("no units available".to_string()))?;

        let unit_number = unit.number.map(|n| n.to_string());
        let sentences = filter_unlocked_sentences(&unit.sentences, unit_number.as_deref());
        if sentences.is_empty() {
            return Err(ApiError::NotFound(format!("unit {} has no unlocked sentences", unit.id)));
        }
        let index = match request.sentence_index {
            Some(index) => index,
            None => rng.gen_range(0..sentences.len()),
        };
        let sentence = sentences.get(index).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "sentence index {index} out of range for unit {} ({} sentences)",
                unit.id,
                sentences.len()
            ))
        })?;

        let mut options = WordBankOptions::new(self.settings.clone());
        if let Some(name) = &request.profile_name {
            options = options.with_profile_name(name.clone());
        }
        let direction = request.direction.unwrap_or(WordBankDirection::ToBase);
        Ok(ExerciseConfig::WordBank(build_word_bank_config(
            unit, sentence, direction, &options, rng,
        )?))
    }
}

fn required_config(request: &ExerciseRequest) -> Result<&serde_json::Value> {
    request
        .config
        .as_ref()
        .ok_or_else(|| ApiError::BadRequest("config is required for this exercise".to_string()))
}

/// Check a submitted value against accepted answers, or a word-bank attempt
/// against the expected order.
pub fn check_answer(request: &AnswerCheckRequest) -> Result<bool> {
    if let Some(attempt) = &request.attempt {
        let direction = request.direction.unwrap_or(WordBankDirection::ToBase);
        let expected: Vec<String> = request
            .answers
            .iter()
            .map(|word| direction.normalize(word))
            .collect();
        return Ok(check_sequence(&expected, &attempt[..], direction));
    }
    let value = request
        .value
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("value or attempt is required".to_string()))?;
    Ok(AnswerLookup::from_values(&request.answers).has(value))
}
