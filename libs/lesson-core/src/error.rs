//! Error types for lesson-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Malformed or insufficient input handed to an exercise builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("{exercise} requires at least {required} distinct vocab entries, found {found}")]
    InsufficientVocabulary {
        exercise: &'static str,
        required: usize,
        found: usize,
    },

    #[error("{exercise} config requires a prompt")]
    MissingPrompt { exercise: &'static str },

    #[error("{exercise} config requires at least one choice")]
    NoChoices { exercise: &'static str },

    #[error("{exercise} config requires at least one correct answer")]
    NoCorrectAnswer { exercise: &'static str },

    #[error("{exercise} config requires sentence text")]
    MissingSentence { exercise: &'static str },

    #[error("dialogue config requires at least one turn")]
    NoTurns,

    #[error("sentence has no resolvable tokens")]
    EmptySentence,

    #[error("sentence token {token:?} has no tile form")]
    UnresolvedToken { token: String },

    #[error("{exercise} config must be a JSON object")]
    NotAnObject { exercise: &'static str },
}

/// The lesson context cannot be turned into vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("lesson context unavailable")]
    ContextUnavailable,

    #[error("lesson content at {path} is missing vocab entries")]
    VocabMissing { path: String },

    #[error("unable to resolve lesson path: {reason}")]
    PathUnresolvable { reason: String },

    #[error("unit not found: {0}")]
    UnitNotFound(String),
}

/// A single resource fetch failed. Recoverable by re-invoking the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("resource not found: {path}")]
    NotFound { path: String },

    #[error("resource {path} returned status {status}")]
    Status { path: String, status: u16 },

    #[error("failed to fetch {path}: {message}")]
    Fetch { path: String, message: String },

    #[error("timed out fetching {path} after {millis}ms")]
    Timeout { path: String, millis: u64 },

    #[error("invalid JSON in {path}: {message}")]
    Json { path: String, message: String },

    #[error("invalid resource path: {0}")]
    InvalidPath(String),
}

/// A content line could not be parsed. Parsers skip such lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: unterminated inline object")]
    UnterminatedObject { line: usize },

    #[error("line {line}: expected `key: value`, found '{value}'")]
    InvalidPair { line: usize, value: String },
}

/// An action that does not apply to the current exercise session state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("exercise session already finished")]
    Finished,

    #[error("unknown tile: {0}")]
    UnknownTile(String),

    #[error("tile {0} is already in the answer")]
    TileInUse(String),

    #[error("no answer tile at position {0}")]
    NoAnswerTile(usize),

    #[error("no {column} card at position {position}")]
    UnknownCard { column: &'static str, position: usize },

    #[error("no option {0} in the current turn")]
    UnknownOption(usize),

    #[error("dialogue is not waiting for a reply")]
    NoPendingChoice,
}

/// Any error surfaced by the lesson pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Session(#[from] SessionError),
}
