mod conflict_analysis_context;
mod minimisation;
mod resolution;

pub(crate) use conflict_analysis_context::ConflictAnalysisContext;
pub(crate) use minimisation::MinimisationMode;
pub(crate) use resolution::ConflictAnalysisResult;

use crate::basic_types::Literal;
use crate::engine::sat::calculate_lbd;

/// Conflict analysis end to end: 1-UIP resolution, optional minimization,
/// and LBD scoring of the resulting learnt clause.
pub(crate) fn analyze_conflict(
    conflicting_literals: &[Literal],
    minimisation_mode: MinimisationMode,
    context: &mut ConflictAnalysisContext,
) -> Result<(resolution::ConflictAnalysisResult, u32), ()> {
    let mut result = resolution::compute_1uip(conflicting_literals, context)?;
    minimisation::minimise(&mut result.learned_literals, minimisation_mode, context);
    let lbd = calculate_lbd(&result.learned_literals, context.assignments) as u32;
    Ok((result, lbd))
}
