//! The resolution pipeline.
//!
//! A query flows through three stages: the environment resolver picks the
//! analysis context for the query's interpreter, the position resolver asks
//! the engine for the definition under the cursor, and the name normalizer
//! turns that definition into the string sent back to the host.

mod normalize;
mod position;

pub use normalize::{IMPLICIT_NAMESPACE, normalize};
pub use position::resolve as resolve_position;

use crate::engine::{AnalysisEngine, SourceInput};
use crate::error::QueryResult;
use crate::protocol::Query;

/// Runs decoded queries through the pipeline on one engine.
pub struct SymbolResolver<E> {
    engine: E,
}

impl<E: AnalysisEngine> SymbolResolver<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Canonical name of the symbol at the query's position, `None` when
    /// there is nothing to name.
    pub fn resolve(&mut self, query: &Query) -> QueryResult<Option<String>> {
        let context = self
            .engine
            .resolve_environment(query.python_executable.as_deref())?;

        let source = SourceInput {
            path: &query.file,
            text: query.file_text.as_deref(),
        };
        let candidate = position::resolve(&mut self.engine, &context, source, query.position)?;

        Ok(normalize(candidate.as_ref()))
    }
}
