//! Resolve a cursor position in a Python file to the fully-qualified name of
//! the symbol under it.
//!
//! The binary runs as a long-lived worker speaking line-delimited JSON on
//! stdin/stdout (see [`protocol`]); the library exposes the same pipeline for
//! embedding and tests.

pub mod config;
pub mod docs;
pub mod engine;
pub mod environment;
pub mod error;
pub mod io;
pub mod logging;
pub mod parsing;
pub mod protocol;
pub mod resolver;
pub mod types;

// Explicit exports for better API clarity
pub use config::Settings;
pub use docs::doc_url;
pub use engine::{AnalysisEngine, Candidate, PythonEngine, SourceInput};
pub use environment::{EnvironmentCache, PythonEnvironment};
pub use error::{
    DecodeError, EngineError, EngineResult, EnvironmentError, EnvironmentResult, QueryError,
    QueryResult,
};
pub use protocol::{Query, Worker, WorkerStats};
pub use resolver::{IMPLICIT_NAMESPACE, SymbolResolver, normalize};
pub use types::{EnginePosition, Position};
