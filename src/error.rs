//! Error types for paradigm data, the quiz bank and quiz transitions.

use thiserror::Error;

/// Failures while loading paradigm/preposition data or resolving a cell path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParadigmError {
    /// A path segment names no child of the branch it was looked up in.
    #[error("unknown segment `{segment}` under `{parent}`")]
    UnknownSegment { parent: String, segment: String },

    /// The path stops on a branch instead of a cell.
    #[error("path `{0}` ends at a branch, not a cell")]
    EndsAtBranch(String),

    /// The path has segments left after reaching a declinable cell.
    #[error("path `{path}` continues past the cell at `{leaf}`")]
    PastLeaf { path: String, leaf: String },

    /// The path stops on an invariable cell without naming a case.
    #[error("path `{0}` names no case")]
    MissingCase(String),

    /// A well-formed cell that the table on screen does not show.
    #[error("cell `{0}` is not part of the displayed table")]
    NotDisplayed(String),

    /// A reveal key is not of the form `<word class>:<dotted path>`.
    #[error("malformed cell key `{0}`")]
    MalformedKey(String),

    /// Embedded or configured data failed to parse.
    #[error("invalid {source_name} data: {message}")]
    Data { source_name: String, message: String },
}

/// Quiz bank validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BankError {
    #[error("quiz bank is empty")]
    Empty,

    #[error("duplicate question id {0}")]
    DuplicateId(u32),

    #[error("question {id} has {count} options, expected 4")]
    OptionCount { id: u32, count: usize },

    #[error("question {id} repeats option `{option}`")]
    DuplicateOption { id: u32, option: String },

    #[error("question {id}: correct answer `{answer}` is not among the options")]
    CorrectNotInOptions { id: u32, answer: String },

    #[error("question {0} has empty text")]
    EmptyQuestion(u32),

    #[error("invalid quiz bank data: {0}")]
    Parse(String),
}

/// A quiz transition that was rejected. The session is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("quiz is still loading")]
    Loading,

    #[error("question already answered")]
    AlreadyAnswered,

    #[error("no answer selected")]
    NothingSelected,

    #[error("question not answered yet")]
    NotAnswered,

    #[error("`{0}` is not an option of the current question")]
    UnknownOption(String),
}

/// Anything that stops the server from building its state.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Paradigm(#[from] ParadigmError),

    #[error(transparent)]
    Bank(#[from] BankError),
}
