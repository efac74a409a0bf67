//! Exit codes for the one-shot commands, following Unix conventions.
//!
//! # Exit Code Semantics
//!
//! - `0`: Success - a name (or URL) was printed
//! - `1`: General error - unspecified failure
//! - `3`: Not found - the query ran but there is nothing to report
//! - `4`: Resolution error - the query itself failed (bad interpreter, unreadable file)
//! - `6`: Configuration error
//! - `126-255`: Reserved by shell

use crate::error::QueryError;

/// Standard exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Operation succeeded (code 0)
    Success = 0,

    /// Unspecified error occurred (code 1)
    GeneralError = 1,

    /// Nothing to report but the command ran correctly (code 3)
    NotFound = 3,

    /// The query could not be answered (code 4)
    ResolutionError = 4,

    /// Configuration error (code 6)
    ConfigError = 6,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        std::process::ExitCode::from(code as u8)
    }
}

impl ExitCode {
    /// `Success` if there is something to print, `NotFound` otherwise.
    pub fn from_option<T>(result: &Option<T>) -> Self {
        match result {
            Some(_) => ExitCode::Success,
            None => ExitCode::NotFound,
        }
    }

    /// Exit code for a one-shot query.
    pub fn from_query_result<T>(result: &Result<Option<T>, QueryError>) -> Self {
        match result {
            Ok(found) => Self::from_option(found),
            Err(QueryError::Panic(_)) => ExitCode::GeneralError,
            Err(_) => ExitCode::ResolutionError,
        }
    }

    /// Check if this exit code indicates success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Success)
    }

}
