//! Lesson content resolution and exercise assembly shared by the backend.
//!
//! Provides:
//! - Course hierarchy loading from the course map and section assets
//! - Lesson vocabulary resolution with inline, lesson-path and manifest fallbacks
//! - Exercise config builders (choices, fill-blank, word bank, match pairs, dialogue)
//! - Exercise sessions emitting `Started → Attempted* → Completed | Abandoned`
//! - Answer normalization and matching

pub mod cache;
pub mod course;
pub mod error;
pub mod exercise;
pub mod fetch;
pub mod normalize;
pub mod parser;
pub mod resolver;
pub mod settings;
pub mod types;

pub use cache::{ContentCache, ResourceCache};
pub use course::{
    filter_unlocked_sentences, lesson_counter_text, resolve_active_unit, word_entry_for_token,
    CourseLoader, LessonPosition, LessonQuery,
};
pub use error::{ConfigurationError, CoreError, LoadError, ParseError, ResolutionError, Result, SessionError};
pub use exercise::{
    build_dialogue_config, build_fill_blank_config, build_match_pairs_config,
    build_translate_to_base_config, build_translate_to_target_config, build_word_bank_config,
    prepare_choice_config, Choice, ExerciseConfig, ExerciseEvent, ExerciseKind, ExerciseSession,
    WordBankDirection, WordBankOptions,
};
pub use fetch::{ContentFetcher, DirectoryFetcher, HttpFetcher, ResourceFetcher};
pub use normalize::{normalize_answer, normalize_text, AnswerLookup};
pub use resolver::{LessonContext, VocabularyResolver};
pub use settings::{ExerciseSettings, FillerWords};
pub use types::{Section, Sentence, Side, Unit, VocabEntry};
