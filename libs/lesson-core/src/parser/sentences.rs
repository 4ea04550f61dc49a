//! Parser for `sections/<id>/sentences.yaml`.
//!
//! # Format
//! ```text
//! section-01:
//!   - id: unit-01
//!     name: "Greetings"
//!     vocab:
//!       - ayubowan   # hello
//!       - mama
//!     sentences:
//!       - text: "I am Kamal."
//!         tokens: [mama, nama]
//!         minUnit: 2
//! ```

use super::ids::{normalize_section_id, parse_section_number, parse_unit_number};
use super::{indent_of, parse_array_literal, parse_quoted_value, strip_comment, strip_quotes};
use crate::types::Sentence;

/// Section metadata from the course map. When present it overrides whatever
/// a header line inside the file says.
#[derive(Debug, Clone, Default)]
pub struct SectionContext {
    pub section_id: Option<String>,
    pub section_number: Option<u32>,
    pub section_title: Option<String>,
}

/// A unit as written in a sentences file, before it is merged with word data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUnit {
    /// The `- id:` value exactly as written.
    pub raw_id: String,
    /// Set when the id is a plain positive integer.
    pub numeric_id: Option<u32>,
    /// Set when the id is not numeric.
    pub slug: Option<String>,
    pub name: String,
    pub number: Option<u32>,
    pub vocab_tokens: Vec<String>,
    pub sentences: Vec<Sentence>,
    pub section_key: Option<String>,
    pub section_id: Option<String>,
    pub section_number: Option<u32>,
}

/// Parse a sentences file into units. Malformed lines are skipped.
pub fn parse_section_sentences(content: &str, context: &SectionContext) -> Vec<ParsedUnit> {
    if content.trim().is_empty() {
        return Vec::new();
    }

    let mut parser = Parser::new(context);
    for line in content.lines() {
        parser.process_line(line);
    }
    parser.finalize()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockState {
    Idle,
    InVocabBlock,
    InSentencesBlock,
}

#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    Skip,
    SectionHeader(&'a str),
    UnitId(&'a str),
    Name(&'a str),
    VocabStart,
    SentencesStart,
    ListItem(&'a str),
    Tokens(&'a str),
    MinUnit(&'a str),
    Other,
}

struct Parser<'c> {
    context: &'c SectionContext,
    units: Vec<ParsedUnit>,
    current: Option<ParsedUnit>,
    state: BlockState,
    sentence_open: bool,
    section_key: Option<String>,
    section_id: Option<String>,
    section_number: Option<u32>,
}

impl<'c> Parser<'c> {
    fn new(context: &'c SectionContext) -> Self {
        let section_number = context
            .section_number
            .or_else(|| context.section_id.as_deref().and_then(parse_section_number));
        Self {
            context,
            units: Vec::new(),
            current: None,
            state: BlockState::Idle,
            sentence_open: false,
            section_key: None,
            section_id: context.section_id.clone(),
            section_number,
        }
    }

    fn classify(line: &str) -> Line<'_> {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return Line::Skip;
        }

        if indent_of(line) == 0 && !trimmed.starts_with('-') {
            if let Some(key) = trimmed.strip_suffix(':') {
                let lower = trimmed.to_lowercase();
                if !lower.starts_with("title:") && !lower.starts_with("description:") {
                    return Line::SectionHeader(key.trim());
                }
            }
        }

        if let Some(rest) = trimmed.strip_prefix("- id:") {
            Line::UnitId(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("name:") {
            Line::Name(rest.trim())
        } else if trimmed == "vocab:" {
            Line::VocabStart
        } else if trimmed == "sentences:" {
            Line::SentencesStart
        } else if let Some(rest) = trimmed.strip_prefix("- ") {
            Line::ListItem(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("tokens:") {
            Line::Tokens(rest.trim())
        } else if let Some(rest) = trimmed.strip_prefix("minUnit:") {
            Line::MinUnit(rest.trim())
        } else {
            Line::Other
        }
    }

    fn process_line(&mut self, line: &str) {
        match Self::classify(line) {
            Line::Skip | Line::Other => {}
            Line::SectionHeader(key) => self.handle_section_header(key),
            Line::UnitId(value) => self.handle_unit_id(value),
            Line::Name(value) => {
                if let Some(unit) = self.current.as_mut() {
                    unit.name = strip_quotes(value).to_string();
                }
            }
            Line::VocabStart => self.enter(BlockState::InVocabBlock),
            Line::SentencesStart => self.enter(BlockState::InSentencesBlock),
            Line::ListItem(item) => self.handle_list_item(item),
            Line::Tokens(value) => {
                if let Some(sentence) = self.open_sentence() {
                    sentence.tokens = parse_array_literal(value);
                }
            }
            Line::MinUnit(value) => {
                if let Some(sentence) = self.open_sentence() {
                    sentence.min_unit = value.parse().ok();
                }
            }
        }
    }

    fn handle_section_header(&mut self, key: &str) {
        self.flush();
        if !key.is_empty() {
            self.section_key = Some(key.to_string());
        }
        let derived_id = normalize_section_id(key);
        self.section_id = self.context.section_id.clone().or(derived_id);
        self.section_number = self
            .context
            .section_number
            .or_else(|| parse_section_number(key))
            .or_else(|| self.section_id.as_deref().and_then(parse_section_number));
        self.state = BlockState::Idle;
    }

    fn handle_unit_id(&mut self, value: &str) {
        self.flush();
        let raw_id = strip_quotes(value).to_string();
        let numeric_id = raw_id.parse::<u32>().ok().filter(|n| *n > 0);
        let slug = match numeric_id {
            Some(_) => None,
            None => Some(raw_id.clone()).filter(|id| !id.is_empty()),
        };
        let number = numeric_id.or_else(|| parse_unit_number(&raw_id));

        self.current = Some(ParsedUnit {
            raw_id,
            numeric_id,
            slug,
            number,
            section_key: self.section_key.clone(),
            section_id: self.section_id.clone(),
            section_number: self.section_number,
            ..ParsedUnit::default()
        });
        self.state = BlockState::Idle;
    }

    fn handle_list_item(&mut self, item: &str) {
        let Some(unit) = self.current.as_mut() else {
            return;
        };
        match self.state {
            BlockState::Idle => {}
            BlockState::InVocabBlock => {
                let token = strip_comment(item);
                if !token.is_empty() {
                    unit.vocab_tokens.push(token);
                }
            }
            BlockState::InSentencesBlock => {
                if let Some(text) = item.strip_prefix("text:") {
                    unit.sentences.push(Sentence {
                        text: parse_quoted_value(text),
                        tokens: Vec::new(),
                        min_unit: None,
                    });
                    self.sentence_open = true;
                }
            }
        }
    }

    fn enter(&mut self, state: BlockState) {
        if self.current.is_some() {
            self.state = state;
            self.sentence_open = false;
        }
    }

    fn open_sentence(&mut self) -> Option<&mut Sentence> {
        if self.state != BlockState::InSentencesBlock || !self.sentence_open {
            return None;
        }
        self.current.as_mut()?.sentences.last_mut()
    }

    fn flush(&mut self) {
        if let Some(unit) = self.current.take() {
            self.units.push(unit);
        }
        self.sentence_open = false;
    }

    fn finalize(mut self) -> Vec<ParsedUnit> {
        self.flush();
        self.units
    }
}
