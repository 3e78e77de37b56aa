//! Decision heuristics. [`Heuristic`] is the shared polymorphism
//! point (`newConstraint`, `updateReason`, `undoUntil`, `bump`,
//! `doSelect`, narrowed to what every variant actually needs); each variant
//! lives in its own module and is selected at construction time via
//! [`HeuristicKind`].

mod berkmin;
mod domain;
mod heuristic;
mod lookahead;
mod vmtf;
mod vsids;

pub(crate) use berkmin::Berkmin;
pub(crate) use domain::Domain;
pub(crate) use heuristic::Heuristic;
pub(crate) use lookahead::Lookahead;
pub(crate) use vmtf::Vmtf;
pub(crate) use vsids::Vsids;

use crate::basic_types::PropositionalVariable;
use crate::options::HeuristicOptions;

/// Selects which [`Heuristic`] implementation the search loop constructs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeuristicKind {
    Vsids,
    Vmtf,
    Berkmin,
    Domain,
    Lookahead,
}

/// Builds the heuristic named by `options.kind` over the variables already
/// present in `existing_variables` (so it reflects the problem as loaded up
/// to this point, e.g. right before `end_init`).
pub(crate) fn build_heuristic(
    options: HeuristicOptions,
    existing_variables: &[PropositionalVariable],
) -> Box<dyn Heuristic> {
    match options.kind {
        HeuristicKind::Vsids => Box::new(Vsids::new_with_decay(existing_variables, options.decay)),
        HeuristicKind::Vmtf => Box::new(Vmtf::new(existing_variables)),
        HeuristicKind::Berkmin => Box::new(Berkmin::new(existing_variables)),
        HeuristicKind::Domain => Box::new(Domain::new(existing_variables, options.decay)),
        HeuristicKind::Lookahead => Box::new(Lookahead::new(existing_variables)),
    }
}
