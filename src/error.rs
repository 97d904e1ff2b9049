use std::path::PathBuf;

/// Failures raised while reading or writing the durable document.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("failed to read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("corrupt document '{}': {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("lexical error at offset {offset}: {message}")]
    Lexical { message: String, offset: usize },

    #[error("parse error at offset {offset}: expected {expected}, found {found}")]
    Parse {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("schema error: {0}")]
    Schema(String),

    #[error("constraint violation on column '{column}': {reason}")]
    ConstraintViolation { column: String, reason: String },

    #[error("type error on column '{column}': {reason}")]
    Type { column: String, reason: String },

    #[error("column error: {0}")]
    Column(String),

    #[error("refusing to run {statement} without a WHERE clause")]
    Safety { statement: &'static str },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("internal: {0}")]
    Internal(String),
}

/// Coarse classification of an [Error], stable across message wording.
///
/// Adapters map these onto their own status vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Parse,
    Schema,
    ConstraintViolation,
    Type,
    Column,
    Safety,
    Persistence,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Lexical { .. } => ErrorKind::Lexical,
            Self::Parse { .. } => ErrorKind::Parse,
            Self::Schema(_) => ErrorKind::Schema,
            Self::ConstraintViolation { .. } => ErrorKind::ConstraintViolation,
            Self::Type { .. } => ErrorKind::Type,
            Self::Column(_) => ErrorKind::Column,
            Self::Safety { .. } => ErrorKind::Safety,
            Self::Persistence(_) => ErrorKind::Persistence,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

macro_rules! internal {
    ($($arg:tt)*) => {
        crate::error::Error::Internal(std::format!($($arg)*))
    };
}
pub(crate) use internal;
