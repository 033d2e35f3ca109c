use thiserror::Error;

/// Coarse classification of a [`ScrapeError`], used to pick skip vs abort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Parse,
    NoData,
    Io,
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Field lists <{first}> ({first_len}) and <{second}> ({second_len}) differ in length")]
    MismatchedFields {
        first: String,
        first_len: usize,
        second: String,
        second_len: usize,
    },

    #[error("Invalid extraction pattern for <{tag}>: {source}")]
    Pattern {
        tag: String,
        #[source]
        source: regex::Error,
    },

    #[error("No data: {0}")]
    NoData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ScrapeError::Transport { .. } | ScrapeError::Status { .. } => FailureKind::Transport,
            ScrapeError::MismatchedFields { .. } | ScrapeError::Pattern { .. } => FailureKind::Parse,
            ScrapeError::NoData(_) => FailureKind::NoData,
            ScrapeError::Io(_) => FailureKind::Io,
        }
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;

/// Why a single schedule row produced no event.
#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("Expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("Invalid date/time {input:?}: {source}")]
    InvalidDateTime {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}
