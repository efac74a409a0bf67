//! Line-delimited JSON protocol between the host and the worker.
//!
//! Each request is one JSON object on one line of stdin; each response is one
//! JSON value (a string or `null`) on one line of stdout, in request order.

mod worker;

pub use worker::{Worker, WorkerStats};

use crate::error::DecodeError;
use crate::types::Position;
use serde::Deserialize;
use std::path::PathBuf;

/// One resolution request, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub file: PathBuf,
    pub position: Position,
    /// Unsaved buffer content; replaces the file on disk for this query
    pub file_text: Option<String>,
    /// Interpreter whose environment the query resolves against
    pub python_executable: Option<PathBuf>,
}

/// Request object as it appears on the wire. Unknown keys are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireQuery {
    file: PathBuf,
    line: i64,
    column: i64,
    #[serde(default)]
    file_text: Option<String>,
    #[serde(default)]
    python_executable: Option<String>,
}

impl TryFrom<WireQuery> for Query {
    type Error = DecodeError;

    fn try_from(wire: WireQuery) -> Result<Self, Self::Error> {
        let position = Position {
            line: positive("line", wire.line)?,
            column: positive("column", wire.column)?,
        };

        Ok(Self {
            file: wire.file,
            position,
            file_text: wire.file_text,
            // an empty executable means "use the default environment"
            python_executable: wire
                .python_executable
                .filter(|exe| !exe.is_empty())
                .map(PathBuf::from),
        })
    }
}

fn positive(field: &'static str, value: i64) -> Result<u32, DecodeError> {
    u32::try_from(value)
        .ok()
        .filter(|v| *v >= 1)
        .ok_or(DecodeError::NotPositive { field, value })
}

/// Decode one raw request line (terminator already removed).
pub fn decode_line(raw: &[u8]) -> Result<Query, DecodeError> {
    let line = String::from_utf8(raw.to_vec())
        .map_err(|source| DecodeError::InvalidUtf8 { source })?;
    if line.trim().is_empty() {
        return Err(DecodeError::EmptyLine);
    }

    let wire: WireQuery =
        serde_json::from_str(&line).map_err(|source| DecodeError::InvalidJson { source })?;
    Query::try_from(wire)
}

/// Encode one response as its JSON text, without the line terminator.
pub fn encode_response(name: Option<&str>) -> String {
    // Serializing a string or null cannot fail
    serde_json::to_string(&name).unwrap_or_else(|_| "null".to_string())
}
