//! The analysis engine seam.
//!
//! The protocol loop and the resolver only see [`AnalysisEngine`]. The
//! shipped implementation is [`PythonEngine`]; tests substitute their own.

mod python;

pub use python::PythonEngine;

use crate::error::{EngineResult, EnvironmentResult};
use crate::types::EnginePosition;
use std::path::Path;
use std::sync::Arc;

/// One possible definition for a cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Short name as written at the definition (`capitalize`, `__init__`)
    pub name: Option<String>,
    /// Dotted path within the module namespace (`builtins.str.capitalize`)
    pub full_name: Option<String>,
    /// Builtin or interpreter-injected symbol
    pub is_builtin: bool,
}

impl Candidate {
    pub fn new(name: impl Into<String>, full_name: Option<String>) -> Self {
        Self {
            name: Some(name.into()),
            full_name,
            is_builtin: false,
        }
    }

    pub fn builtin(name: impl Into<String>, full_name: Option<String>) -> Self {
        Self {
            is_builtin: true,
            ..Self::new(name, full_name)
        }
    }
}

/// The file a query is about: its path, and optionally unsaved content that
/// replaces what is on disk for this query only.
#[derive(Debug, Clone, Copy)]
pub struct SourceInput<'a> {
    pub path: &'a Path,
    pub text: Option<&'a str>,
}

/// Capability interface over a static-analysis engine.
pub trait AnalysisEngine {
    /// Environment handle a resolution runs against
    type Context;

    /// Build (or fetch) the context for an interpreter; `None` means the
    /// engine's default environment.
    fn resolve_environment(
        &self,
        executable: Option<&Path>,
    ) -> EnvironmentResult<Arc<Self::Context>>;

    /// Definitions of the symbol at `position`, in engine order.
    fn resolve_at(
        &mut self,
        context: &Self::Context,
        source: SourceInput<'_>,
        position: EnginePosition,
    ) -> EngineResult<Vec<Candidate>>;
}
