//! Error types for the search-race crate

use thiserror::Error;

use crate::consts::MIN_CHECKPOINTS;

/// Main error type for the search-race crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("track needs at least {} checkpoints, got {count}", MIN_CHECKPOINTS)]
    DegenerateTrack { count: usize },

    #[error("malformed {context} line '{line}': expected {expected} integers")]
    MalformedLine {
        context: &'static str,
        line: String,
        expected: usize,
    },

    #[error("unexpected end of input while reading {context}")]
    UnexpectedEof { context: &'static str },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("search frontier is empty")]
    EmptyFrontier,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
