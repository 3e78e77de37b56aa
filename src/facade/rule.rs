//! Rule translation input types. [`Solver::add_rule`] compiles these into
//! completion clauses, dependency-graph entries, and (for a weight body) a
//! registered [`crate::engine::sat::WeightConstraint`].

use super::types::{Lit, VarId};

/// One `literal=weight` term, shared by weight-rule bodies and
/// [`super::Solver::add_minimize`].
#[derive(Debug, Clone, Copy)]
pub struct WeightedLiteral {
    pub literal: Lit,
    pub weight: i64,
}

/// A rule body. `Normal` is a conjunction of positive and (negated)
/// negative literals; `Weight` holds if the weighted sum of its true terms
/// meets `bound`.
#[derive(Debug, Clone)]
pub enum RuleBody {
    Normal { positive: Vec<VarId>, negative: Vec<VarId> },
    Weight { literals: Vec<WeightedLiteral>, bound: i64 },
}

/// A grounded rule: normal, choice, or disjunctive. A weight
/// rule is expressed as `Normal`/`Choice`/`Disjunctive` with a `Weight`
/// body rather than as its own variant, since the head-side semantics
/// (single head vs. a choice vs. a disjunction) is orthogonal to how the
/// body's truth is computed.
#[derive(Debug, Clone)]
pub enum Rule {
    /// `head :- body.` — body true forces head true (subject to the
    /// unfounded-set checker also finding a support for it).
    Normal { head: VarId, body: RuleBody },
    /// `{ heads } :- body.` — body true permits any subset of heads to be
    /// true; none are forced.
    Choice { heads: Vec<VarId>, body: RuleBody },
    /// `heads :- body.` (disjunctive) — body true forces at least one head
    /// true.
    Disjunctive { heads: Vec<VarId>, body: RuleBody },
}
