/// Identifies a registered post-propagator (the clausal propagator itself is
/// not registered this way; it is the unconditional priority-0 step). Used
/// as part of an [`super::ClauseReference`]-less antecedent when a literal
/// was forced by a post-propagator rather than by a stored clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct PropagatorId(pub(crate) u32);
