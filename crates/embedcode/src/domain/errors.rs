//! Domain-specific errors.

use thiserror::Error;

/// Failure to parse a line-range specification such as `3,7-9`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeSpecError {
    #[error("'{0}' is not a line number or a start-end range")]
    Malformed(String),
    #[error("line numbers start at 1, found '{0}'")]
    NonPositive(String),
    #[error("range {start}-{end} ends before it starts")]
    Inverted { start: usize, end: usize },
    #[error("line {0} exceeds the supported maximum of {}", crate::app::range::MAX_LINE_INDEX)]
    TooLarge(String),
}

/// Why a source location could not be turned into text.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("couldn't read file '{path}'")]
    NotFound { path: String },
    #[error("couldn't read file '{path}': {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("couldn't fetch '{url}'")]
    FetchFailed {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("couldn't fetch '{url}' (status {status})")]
    Status { url: String, status: u16 },
}

/// Errors reported by a [`crate::infra::store::LocalStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no such entry")]
    NotFound,
    #[error("entry is not a file")]
    NotAFile,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Transport-level failure reported by a [`crate::infra::http::RemoteFetcher`].
#[derive(Debug, Error)]
#[error("{message}")]
pub struct FetchError {
    message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Terminal failure of a single embed request.
#[derive(Debug, Error)]
pub enum EmbedError {
    #[error("invalid source path")]
    MissingSource,
    #[error("invalid line range '{spec}': {source}")]
    InvalidSpec {
        spec: String,
        #[source]
        source: RangeSpecError,
    },
    #[error(transparent)]
    SourceUnavailable(#[from] SourceError),
    #[error("invalid embedding ({0})")]
    Malformed(String),
}
