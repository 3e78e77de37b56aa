//! The weight/cardinality variant of a rule body's governing propagator.
//! Translates a weight-rule body (`B :- l1=w1, ..., ln=wn >= bound`)
//! into a propagator that keeps the body literal's truth in sync with
//! whether the weighted sum of its (possibly negative) literals
//! currently meets `bound`.
//!
//! Registered as a post-propagator rather than folded into the clausal
//! propagator: unlike a plain clause, a weight constraint's watched set
//! changes size as literals are assigned, and it can force many literals
//! at once (every literal whose remaining slack can't make up the
//! difference), which doesn't fit the two-watched-literal clause protocol.

use crate::basic_types::{Literal, PropagationStatusPostPropagator};
use crate::engine::propagation::{priority, PostPropagator, PropagationContext, PropagationContextMut};

/// One `literal=weight` term of a weight rule body.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WeightLiteral {
    pub(crate) literal: Literal,
    pub(crate) weight: i64,
}

/// `body` is true iff the weighted sum of true terms is
/// `>= bound`; this propagator keeps that equivalence enforced in both
/// directions so a weight-rule body behaves like any other rule body to
/// the rest of the engine (completion clauses, the dependency graph).
#[derive(Debug)]
pub(crate) struct WeightConstraint {
    body: Literal,
    terms: Vec<WeightLiteral>,
    bound: i64,
}

impl WeightConstraint {
    pub(crate) fn new(body: Literal, terms: Vec<WeightLiteral>, bound: i64) -> Self {
        WeightConstraint { body, terms, bound }
    }

    fn current_sum(&self, context: &PropagationContext) -> i64 {
        self.terms
            .iter()
            .filter(|term| context.is_true(term.literal))
            .map(|term| term.weight)
            .sum()
    }

    /// The maximum sum reachable if every currently unassigned term were
    /// assigned favorably.
    fn reachable_sum(&self, context: &PropagationContext) -> i64 {
        self.terms
            .iter()
            .filter(|term| !context.is_false(term.literal))
            .map(|term| term.weight)
            .sum()
    }

    fn propagate_body_true(&self, context: &mut PropagationContextMut) -> PropagationStatusPostPropagator {
        // Once the body is true, every term whose absence from the sum
        // would make the bound unreachable must itself be made true.
        let achieved = self.current_sum(&context.as_read_only());
        if achieved >= self.bound {
            return PropagationStatusPostPropagator::NoConflict;
        }
        let slack_without_forced = self.reachable_sum(&context.as_read_only());
        for term in self.terms.iter().filter(|t| !context.is_true(t.literal) && !context.is_false(t.literal)) {
            if slack_without_forced - term.weight.max(0) < self.bound && term.weight > 0 {
                if !context.enqueue(term.literal) {
                    return PropagationStatusPostPropagator::Conflict(self.reason_for_body_true(context));
                }
            }
        }
        PropagationStatusPostPropagator::NoConflict
    }

    fn reason_for_body_true(&self, context: &PropagationContextMut) -> Vec<Literal> {
        let mut reason: Vec<Literal> = self
            .terms
            .iter()
            .filter(|term| context.is_false(term.literal))
            .map(|term| !term.literal)
            .collect();
        reason.push(self.body);
        reason
    }
}

impl PostPropagator for WeightConstraint {
    fn name(&self) -> &str {
        "weight-body"
    }

    fn priority(&self) -> u32 {
        priority::WEIGHT_BODY
    }

    fn init(&mut self, context: &mut PropagationContextMut) -> Result<(), Vec<Literal>> {
        match self.propagate(context) {
            PropagationStatusPostPropagator::NoConflict => Ok(()),
            PropagationStatusPostPropagator::Conflict(reason) => Err(reason),
        }
    }

    fn propagate(&mut self, context: &mut PropagationContextMut) -> PropagationStatusPostPropagator {
        let read_only = context.as_read_only();
        let sum = self.current_sum(&read_only);
        let reachable = self.reachable_sum(&read_only);

        if sum >= self.bound && !context.is_true(self.body) {
            if !context.enqueue(self.body) {
                return PropagationStatusPostPropagator::Conflict(self.reason_sufficient(&read_only));
            }
        } else if reachable < self.bound && !context.is_false(self.body) {
            // The bound can no longer be met: the body must be false
            // regardless of the remaining unassigned terms.
            if !context.enqueue(!self.body) {
                return PropagationStatusPostPropagator::Conflict(self.reason_impossible(&read_only));
            }
        }

        if context.is_true(self.body) {
            return self.propagate_body_true(context);
        }
        PropagationStatusPostPropagator::NoConflict
    }

    fn reason(&self, literal: Literal, context: &PropagationContext) -> Vec<Literal> {
        if literal == self.body {
            return self.reason_sufficient(context);
        }
        if literal == !self.body {
            return self.reason_impossible(context);
        }
        // Forced by `propagate_body_true`: the body plus every other
        // falsified term justify this one.
        let mut reason: Vec<Literal> = self
            .terms
            .iter()
            .filter(|term| term.literal != literal && context.is_false(term.literal))
            .map(|term| !term.literal)
            .collect();
        reason.push(self.body);
        reason
    }

    fn undo_level(&mut self, _context: &PropagationContext) {
        // Sums are derived fresh from the trail on every call to
        // `propagate`/`current_sum`; nothing to roll back explicitly.
    }
}

impl WeightConstraint {
    fn reason_sufficient(&self, context: &PropagationContext) -> Vec<Literal> {
        self.terms.iter().filter(|term| context.is_true(term.literal)).map(|term| term.literal).collect()
    }

    fn reason_impossible(&self, context: &PropagationContext) -> Vec<Literal> {
        self.terms.iter().filter(|term| context.is_false(term.literal)).map(|term| !term.literal).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::{PropagatorId, VariableType};
    use crate::engine::assignments::AssignmentsPropositional;

    #[test]
    fn forces_body_true_once_bound_reached() {
        let mut assignments = AssignmentsPropositional::new();
        let body = Literal::new(assignments.new_variable(VariableType::Body), true);
        let a = Literal::new(assignments.new_variable(VariableType::Atom), true);
        let b = Literal::new(assignments.new_variable(VariableType::Atom), true);

        let mut constraint = WeightConstraint::new(
            body,
            vec![WeightLiteral { literal: a, weight: 2 }, WeightLiteral { literal: b, weight: 1 }],
            2,
        );

        assert!(assignments.enqueue(a, crate::engine::assignments::AssignmentReason::Decision));
        let mut context = PropagationContextMut::new(&mut assignments, PropagatorId(0));
        let status = constraint.propagate(&mut context);
        assert!(matches!(status, PropagationStatusPostPropagator::NoConflict));
        assert!(assignments.is_true(body));
    }

    #[test]
    fn forces_body_false_once_bound_unreachable() {
        let mut assignments = AssignmentsPropositional::new();
        let body = Literal::new(assignments.new_variable(VariableType::Body), true);
        let a = Literal::new(assignments.new_variable(VariableType::Atom), true);
        let b = Literal::new(assignments.new_variable(VariableType::Atom), true);

        let mut constraint = WeightConstraint::new(
            body,
            vec![WeightLiteral { literal: a, weight: 1 }, WeightLiteral { literal: b, weight: 1 }],
            2,
        );

        assert!(assignments.enqueue(!a, crate::engine::assignments::AssignmentReason::Decision));
        let mut context = PropagationContextMut::new(&mut assignments, PropagatorId(0));
        let status = constraint.propagate(&mut context);
        assert!(matches!(status, PropagationStatusPostPropagator::NoConflict));
        assert!(assignments.is_false(body));
    }

    #[test]
    fn forces_remaining_terms_once_body_is_true() {
        let mut assignments = AssignmentsPropositional::new();
        let body = Literal::new(assignments.new_variable(VariableType::Body), true);
        let a = Literal::new(assignments.new_variable(VariableType::Atom), true);
        let b = Literal::new(assignments.new_variable(VariableType::Atom), true);

        let mut constraint = WeightConstraint::new(
            body,
            vec![WeightLiteral { literal: a, weight: 1 }, WeightLiteral { literal: b, weight: 1 }],
            2,
        );

        assert!(assignments.assume(body));
        let mut context = PropagationContextMut::new(&mut assignments, PropagatorId(0));
        let status = constraint.propagate(&mut context);
        assert!(matches!(status, PropagationStatusPostPropagator::NoConflict));
        assert!(assignments.is_true(a));
        assert!(assignments.is_true(b));
    }
}
