//! Input/Output handling for the command line.
//!
//! This module provides:
//! - Consistent exit codes for the one-shot commands

pub mod exit_code;

pub use exit_code::ExitCode;
