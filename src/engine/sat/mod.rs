mod clausal_propagator;
mod clause;
mod clause_allocator;
mod explanation_clause_manager;
mod lbd_calculator;
mod watch_list;
mod weight_constraint;

pub(crate) use clausal_propagator::ClausalPropagator;
pub(crate) use clause::Clause;
pub(crate) use clause_allocator::ClauseAllocator;
pub(crate) use explanation_clause_manager::ExplanationClauseManager;
pub(crate) use lbd_calculator::calculate_lbd;
pub(crate) use watch_list::{WatchEntry, WatchList};
pub(crate) use weight_constraint::{WeightConstraint, WeightLiteral};
