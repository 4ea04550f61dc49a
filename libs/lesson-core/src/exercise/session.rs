//! Exercise sessions: the mutable state of one learner working one config.
//!
//! Each session records an event stream of the form
//! `Started → Attempted* → (Completed | Abandoned)`. Submit operations
//! return the events they produced, so completion is a value the caller
//! observes rather than a callback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::dialogue::{DialogueConfig, DialogueTurn, FollowUp};
use super::match_pairs::{cards_match, Column, MatchPairsConfig, PairCard};
use super::word_bank::{Tile, WordBankConfig};
use super::{ChoiceConfig, ExerciseKind, FillBlankConfig};
use crate::error::SessionError;
use crate::normalize::AnswerLookup;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum ExerciseEvent {
    Started {
        kind: ExerciseKind,
        at: DateTime<Utc>,
    },
    Attempted {
        kind: ExerciseKind,
        value: String,
        correct: bool,
        at: DateTime<Utc>,
    },
    Completed {
        kind: ExerciseKind,
        attempts: u32,
        at: DateTime<Utc>,
    },
    Abandoned {
        kind: ExerciseKind,
        attempts: u32,
        at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Pending,
    Active,
    Completed,
    Abandoned,
}

/// Result of one checked submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub correct: bool,
    pub message: String,
    pub events: Vec<ExerciseEvent>,
}

/// Event bookkeeping shared by every session kind.
#[derive(Debug, Clone)]
struct SessionLog {
    kind: ExerciseKind,
    state: SessionState,
    attempts: u32,
    events: Vec<ExerciseEvent>,
}

impl SessionLog {
    fn new(kind: ExerciseKind) -> Self {
        Self {
            kind,
            state: SessionState::Pending,
            attempts: 0,
            events: Vec::new(),
        }
    }

    fn is_finished(&self) -> bool {
        matches!(self.state, SessionState::Completed | SessionState::Abandoned)
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.is_finished() {
            return Err(SessionError::Finished);
        }
        Ok(())
    }

    fn push(&mut self, event: ExerciseEvent, out: &mut Vec<ExerciseEvent>) {
        self.events.push(event.clone());
        out.push(event);
    }

    fn start(&mut self, now: DateTime<Utc>, out: &mut Vec<ExerciseEvent>) {
        if self.state == SessionState::Pending {
            self.state = SessionState::Active;
            self.push(ExerciseEvent::Started { kind: self.kind, at: now }, out);
        }
    }

    fn attempt(&mut self, value: &str, correct: bool, now: DateTime<Utc>) -> Vec<ExerciseEvent> {
        let mut out = Vec::new();
        self.start(now, &mut out);
        self.attempts += 1;
        let event = ExerciseEvent::Attempted {
            kind: self.kind,
            value: value.to_string(),
            correct,
            at: now,
        };
        self.push(event, &mut out);
        out
    }

    fn complete(&mut self, now: DateTime<Utc>, out: &mut Vec<ExerciseEvent>) {
        self.start(now, out);
        self.state = SessionState::Completed;
        let event = ExerciseEvent::Completed {
            kind: self.kind,
            attempts: self.attempts,
            at: now,
        };
        self.push(event, out);
    }

    fn abandon(&mut self, now: DateTime<Utc>) -> Option<ExerciseEvent> {
        if self.is_finished() {
            return None;
        }
        let mut out = Vec::new();
        self.start(now, &mut out);
        self.state = SessionState::Abandoned;
        let event = ExerciseEvent::Abandoned {
            kind: self.kind,
            attempts: self.attempts,
            at: now,
        };
        self.events.push(event.clone());
        Some(event)
    }
}

/// Common lifecycle of an exercise session.
pub trait ExerciseSession {
    fn kind(&self) -> ExerciseKind;

    fn state(&self) -> SessionState;

    /// Every event emitted so far, in order.
    fn events(&self) -> &[ExerciseEvent];

    fn attempts(&self) -> u32;

    /// Emit `Started` if the session has not started yet.
    fn start(&mut self, now: DateTime<Utc>) -> Option<ExerciseEvent>;

    /// Stop an unfinished session. Finished sessions return `None`.
    fn abandon(&mut self, now: DateTime<Utc>) -> Option<ExerciseEvent>;

    fn is_complete(&self) -> bool {
        self.state() == SessionState::Completed
    }
}

macro_rules! impl_exercise_session {
    ($session:ty) => {
        impl ExerciseSession for $session {
            fn kind(&self) -> ExerciseKind {
                self.log.kind
            }

            fn state(&self) -> SessionState {
                self.log.state
            }

            fn events(&self) -> &[ExerciseEvent] {
                &self.log.events
            }

            fn attempts(&self) -> u32 {
                self.log.attempts
            }

            fn start(&mut self, now: DateTime<Utc>) -> Option<ExerciseEvent> {
                let mut out = Vec::new();
                self.log.start(now, &mut out);
                out.pop()
            }

            fn abandon(&mut self, now: DateTime<Utc>) -> Option<ExerciseEvent> {
                self.log.abandon(now)
            }
        }
    };
}

/// A single-answer exercise: translate choices and fill-blank.
#[derive(Debug, Clone)]
pub struct ChoiceSession {
    answers: AnswerLookup,
    success_message: String,
    error_message: String,
    log: SessionLog,
}

impl ChoiceSession {
    pub fn new(config: &ChoiceConfig, kind: ExerciseKind) -> Self {
        Self {
            answers: config.answers.clone(),
            success_message: config.success_message.clone(),
            error_message: config.error_message.clone(),
            log: SessionLog::new(kind),
        }
    }

    pub fn for_fill_blank(config: &FillBlankConfig) -> Self {
        Self {
            answers: config.answers.clone(),
            success_message: config.success_message.clone(),
            error_message: config.error_message.clone(),
            log: SessionLog::new(ExerciseKind::FillBlank),
        }
    }

    /// Check a value. A correct value completes the session.
    pub fn submit(&mut self, value: &str, now: DateTime<Utc>) -> Result<Feedback, SessionError> {
        self.log.ensure_open()?;
        let correct = self.answers.has(value);
        let mut events = self.log.attempt(value, correct, now);
        if correct {
            self.log.complete(now, &mut events);
        }
        Ok(Feedback {
            correct,
            message: if correct {
                self.success_message.clone()
            } else {
                self.error_message.clone()
            },
            events,
        })
    }
}

impl_exercise_session!(ChoiceSession);

/// Tiles moving between the bank and the answer area.
#[derive(Debug, Clone)]
pub struct WordBankSession {
    config: WordBankConfig,
    /// Tile ids in the answer area, in order.
    answer: Vec<String>,
    log: SessionLog,
}

impl WordBankSession {
    pub fn new(config: WordBankConfig) -> Self {
        Self {
            config,
            answer: Vec::new(),
            log: SessionLog::new(ExerciseKind::WordBank),
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.config.tiles
    }

    pub fn answer_tiles(&self) -> Vec<&Tile> {
        self.answer
            .iter()
            .filter_map(|id| self.config.tile(id))
            .collect()
    }

    /// Move a bank tile to the end of the answer.
    pub fn place(&mut self, tile_id: &str) -> Result<(), SessionError> {
        self.log.ensure_open()?;
        let tile = self
            .config
            .tiles
            .iter_mut()
            .find(|tile| tile.id == tile_id)
            .ok_or_else(|| SessionError::UnknownTile(tile_id.to_string()))?;
        if tile.used {
            return Err(SessionError::TileInUse(tile_id.to_string()));
        }
        tile.used = true;
        self.answer.push(tile_id.to_string());
        Ok(())
    }

    /// Return the answer tile at `position` to the bank.
    pub fn remove(&mut self, position: usize) -> Result<(), SessionError> {
        self.log.ensure_open()?;
        if position >= self.answer.len() {
            return Err(SessionError::NoAnswerTile(position));
        }
        let id = self.answer.remove(position);
        if let Some(tile) = self.config.tiles.iter_mut().find(|tile| tile.id == id) {
            tile.used = false;
        }
        Ok(())
    }

    /// Check the current answer. A correct order completes the session.
    pub fn check(&mut self, now: DateTime<Utc>) -> Result<Feedback, SessionError> {
        self.log.ensure_open()?;
        let correct = self.config.check_tiles(&self.answer[..]);
        let value = self
            .answer_tiles()
            .iter()
            .map(|tile| tile.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let mut events = self.log.attempt(&value, correct, now);
        if correct {
            self.log.complete(now, &mut events);
        }
        Ok(Feedback {
            correct,
            message: if correct {
                self.config.success_message.clone()
            } else {
                self.config.error_message.clone()
            },
            events,
        })
    }
}

impl_exercise_session!(WordBankSession);

/// Outcome of tapping a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "kebab-case")]
pub enum MatchStep {
    Selected,
    Deselected,
    /// The card was already matched.
    Ignored,
    Attempted(Feedback),
}

#[derive(Debug, Clone)]
pub struct MatchPairsSession {
    config: MatchPairsConfig,
    selected: Option<(Column, usize)>,
    matched: HashSet<usize>,
    log: SessionLog,
}

impl MatchPairsSession {
    pub fn new(config: MatchPairsConfig) -> Self {
        Self {
            config,
            selected: None,
            matched: HashSet::new(),
            log: SessionLog::new(ExerciseKind::MatchPairs),
        }
    }

    pub fn is_matched(&self, pair_id: usize) -> bool {
        self.matched.contains(&pair_id)
    }

    pub fn matched_count(&self) -> usize {
        self.matched.len()
    }

    fn card(&self, column: Column, position: usize) -> Result<&PairCard, SessionError> {
        self.config
            .card(column, position)
            .ok_or(SessionError::UnknownCard {
                column: match column {
                    Column::Base => "base",
                    Column::Target => "target",
                },
                position,
            })
    }

    /// Tap the card at `position` in `column`. The second distinct tap is
    /// an attempt; matching the last pair completes the session.
    pub fn select(
        &mut self,
        column: Column,
        position: usize,
        now: DateTime<Utc>,
    ) -> Result<MatchStep, SessionError> {
        self.log.ensure_open()?;
        let card = self.card(column, position)?.clone();
        if self.matched.contains(&card.pair_id) {
            return Ok(MatchStep::Ignored);
        }

        let Some((first_column, first_position)) = self.selected else {
            self.selected = Some((column, position));
            return Ok(MatchStep::Selected);
        };
        if (first_column, first_position) == (column, position) {
            self.selected = None;
            return Ok(MatchStep::Deselected);
        }

        let first = self.card(first_column, first_position)?.clone();
        self.selected = None;
        let correct = cards_match(&first, &card);
        let value = format!("{} = {}", first.label, card.label);
        let mut events = self.log.attempt(&value, correct, now);
        if correct {
            self.matched.insert(card.pair_id);
            if self.matched.len() == self.config.pairs.len() {
                self.log.complete(now, &mut events);
            }
        }
        Ok(MatchStep::Attempted(Feedback {
            correct,
            message: if correct {
                self.config.success_message.clone()
            } else {
                self.config.error_message.clone()
            },
            events,
        }))
    }
}

impl_exercise_session!(MatchPairsSession);

/// A line of the dialogue transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptLine {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct DialogueSession {
    config: DialogueConfig,
    index: usize,
    transcript: Vec<TranscriptLine>,
    log: SessionLog,
}

impl DialogueSession {
    pub fn new(config: DialogueConfig) -> Self {
        Self {
            config,
            index: 0,
            transcript: Vec::new(),
            log: SessionLog::new(ExerciseKind::Dialogue),
        }
    }

    pub fn transcript(&self) -> &[TranscriptLine] {
        &self.transcript
    }

    pub fn current_turn(&self) -> Option<&DialogueTurn> {
        self.config.turns.get(self.index)
    }

    /// Play statements up to the next choice turn. Reaching the end of the
    /// script completes the session.
    pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Vec<ExerciseEvent>, SessionError> {
        self.log.ensure_open()?;
        let mut events = Vec::new();
        self.log.start(now, &mut events);
        while let Some(DialogueTurn::Statement {
            text,
            speaker,
            role,
            ..
        }) = self.config.turns.get(self.index)
        {
            self.transcript.push(TranscriptLine {
                role: role.clone(),
                speaker: speaker.clone(),
                text: text.clone(),
            });
            self.index += 1;
        }
        if self.index >= self.config.turns.len() {
            self.log.complete(now, &mut events);
        }
        Ok(events)
    }

    /// Reply with option `option` of the current choice turn. A correct
    /// reply advances the script; a wrong one plays the option's follow-up.
    pub fn choose(&mut self, option: usize, now: DateTime<Utc>) -> Result<Feedback, SessionError> {
        self.log.ensure_open()?;
        let Some(DialogueTurn::Choice {
            options,
            answers,
            success_message,
            error_message,
            ..
        }) = self.config.turns.get(self.index)
        else {
            return Err(SessionError::NoPendingChoice);
        };
        let picked = options
            .get(option)
            .ok_or(SessionError::UnknownOption(option))?;

        let correct = answers.has(&picked.value) || answers.has(&picked.label);
        let label = picked.label.clone();
        let follow_up: Option<FollowUp> = picked.follow_up.clone();
        let message = if correct {
            success_message
                .clone()
                .unwrap_or_else(|| self.config.turn_success_message.clone())
        } else {
            error_message
                .clone()
                .unwrap_or_else(|| self.config.turn_error_message.clone())
        };

        self.transcript.push(TranscriptLine {
            role: "user".to_string(),
            speaker: Some("You".to_string()),
            text: label.clone(),
        });
        let mut events = self.log.attempt(&label, correct, now);

        if correct {
            self.index += 1;
            events.extend(self.advance(now)?);
        } else if let Some(follow_up) = follow_up {
            self.transcript.push(TranscriptLine {
                role: follow_up.role,
                speaker: follow_up.speaker,
                text: follow_up.text,
            });
        }

        let message = if self.log.state == SessionState::Completed {
            self.config.success_message.clone()
        } else {
            message
        };
        Ok(Feedback {
            correct,
            message,
            events,
        })
    }
}

impl_exercise_session!(DialogueSession);
