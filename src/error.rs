//! Error types for the symbol resolution worker
//!
//! Every failure a single query can hit is one of the enums below. They are
//! caught at the protocol loop and turned into a `null` response plus a
//! diagnostic on stderr, so none of them is fatal to the process.

use std::path::PathBuf;
use thiserror::Error;

/// A request line that could not be turned into a [`Query`](crate::protocol::Query)
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Request line is not valid UTF-8: {source}")]
    InvalidUtf8 {
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Request line is empty")]
    EmptyLine,

    #[error("Request is not a valid query object: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("Field '{field}' must be a positive integer (1-indexed), got {value}")]
    NotPositive { field: &'static str, value: i64 },
}

/// Failures while building an analysis environment from an interpreter path
#[derive(Error, Debug)]
pub enum EnvironmentError {
    #[error(
        "Python interpreter '{path}' does not exist or is not a file\nSuggestion: Pass the path of the interpreter binary itself (e.g. venv/bin/python3)"
    )]
    InterpreterNotFound { path: PathBuf },

    #[error(
        "No standard library or site-packages found for interpreter '{executable}' (searched under '{prefix}')"
    )]
    NoLibraryPaths { executable: PathBuf, prefix: PathBuf },

    #[error("Failed to inspect '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Faults raised by the analysis engine while resolving a position
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Failed to read source file '{path}': {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Source file '{path}' is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },

    #[error("Position {line}:{column} is outside the source ({reason})")]
    PositionOutOfRange {
        line: u32,
        column: u32,
        reason: String,
    },

    #[error("Failed to initialize Python parser: {reason}")]
    ParserInit { reason: String },

    #[error("Parser produced no syntax tree for '{path}'")]
    ParseFailed { path: PathBuf },
}

/// Everything that can go wrong while answering one query
#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Environment resolution error: {0}")]
    Environment(#[from] EnvironmentError),

    #[error("Analysis engine error: {0}")]
    Engine(#[from] EngineError),

    /// A panic inside the resolution pipeline, caught at the loop boundary
    #[error("Resolution panicked: {0}")]
    Panic(String),
}

impl QueryError {
    /// Get a stable status code for this error type.
    ///
    /// Used as a structured field in diagnostics so log consumers can
    /// group failures without parsing messages.
    pub fn status_code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "DECODE_ERROR",
            Self::Environment(_) => "ENVIRONMENT_RESOLUTION_ERROR",
            Self::Engine(_) => "ANALYSIS_ENGINE_ERROR",
            Self::Panic(_) => "UNEXPECTED_FAULT",
        }
    }

    /// Render the error together with its chain of sources, one per line.
    ///
    /// The wrapped error is already part of the message, so the chain starts
    /// at its source.
    pub fn detail(&self) -> String {
        let mut detail = self.to_string();
        let mut source = std::error::Error::source(self).and_then(|inner| inner.source());
        while let Some(cause) = source {
            detail.push_str("\n  caused by: ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }
        detail
    }
}

/// Result type alias for environment discovery
pub type EnvironmentResult<T> = Result<T, EnvironmentError>;

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Result type alias for one query through the pipeline
pub type QueryResult<T> = Result<T, QueryError>;
