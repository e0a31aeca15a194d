use std::path::PathBuf;

/// Why a response could not be turned into a verdict. Recoverable: the
/// response still counts, under errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("no mapping found in response")]
    NoMapping,

    #[error("response is not valid UTF-8")]
    InvalidEncoding,

    #[error("response could not be read: {0}")]
    Unreadable(String),

    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("duplicate key {0:?}")]
    DuplicateKey(String),

    #[error("missing field {0:?}")]
    MissingField(&'static str),

    #[error("field {field:?} must be a string, found {found}")]
    WrongType {
        field: &'static str,
        found: &'static str,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("claim {target_id} has more than one response: {} and {}", first.display(), second.display())]
    DuplicateResponse {
        target_id: i64,
        first: PathBuf,
        second: PathBuf,
    },
}
