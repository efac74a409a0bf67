use crate::engine::{AnalysisEngine, Candidate, SourceInput};
use crate::error::EngineResult;
use crate::types::Position;

/// The definition at a 1-indexed position, or `None` when the engine finds
/// nothing there.
///
/// The engine may return several candidates; the first one wins.
pub fn resolve<E: AnalysisEngine>(
    engine: &mut E,
    context: &E::Context,
    source: SourceInput<'_>,
    position: Position,
) -> EngineResult<Option<Candidate>> {
    let candidates = engine.resolve_at(context, source, position.to_engine())?;
    if candidates.len() > 1 {
        tracing::debug!(
            count = candidates.len(),
            "multiple definitions, using the first"
        );
    }
    Ok(candidates.into_iter().next())
}
