//! The lexicographic weighted minimize constraint. Registered
//! as a post-propagator so that it can force minimize literals false ahead
//! of branching once their addition would exceed the current upper bound.

use crate::basic_types::{Literal, PropagationStatusPostPropagator};
use crate::engine::propagation::{priority, PostPropagator, PropagationContext, PropagationContextMut};
use crate::options::OptimizationMode;

/// One literal of a minimize statement: its weight and which priority
/// level of the lexicographic vector it contributes to (priority `0` is
/// the most significant level).
#[derive(Debug, Clone, Copy)]
pub(crate) struct MinimizeTerm {
    pub(crate) literal: Literal,
    pub(crate) weight: i64,
    pub(crate) priority: usize,
}

/// `bound` is `None` until the first model is committed (no
/// constraint yet); afterwards it holds the lexicographic cost vector that
/// must not be met-or-exceeded (`Optimize`) or exceeded (`EnumOpt`).
#[derive(Debug)]
pub(crate) struct MinimizeConstraint {
    terms: Vec<MinimizeTerm>,
    num_priorities: usize,
    mode: OptimizationMode,
    sums: Vec<i64>,
    bound: Option<Vec<i64>>,
}

impl MinimizeConstraint {
    pub(crate) fn new(terms: Vec<MinimizeTerm>, mode: OptimizationMode) -> Self {
        let num_priorities = terms.iter().map(|t| t.priority + 1).max().unwrap_or(0).max(1);
        MinimizeConstraint {
            terms,
            num_priorities,
            mode,
            sums: vec![0; num_priorities],
            bound: None,
        }
    }

    pub(crate) fn current_cost(&self) -> &[i64] {
        &self.sums
    }

    pub(crate) fn bound(&self) -> Option<&[i64]> {
        self.bound.as_deref()
    }

    /// Whether this constraint is the one that would have forced `literal`
    /// false, i.e. `!literal` is one of its terms. Lets a caller composing
    /// several post-propagators into one registration route `reason`
    /// lookups to the right sub-component.
    pub(crate) fn forces(&self, literal: Literal) -> bool {
        self.terms.iter().any(|term| term.literal == !literal)
    }

    /// Tightens the upper bound to the current cost once a model has been
    /// committed. Called explicitly by the enumerator/search loop, not by
    /// the propagation engine, so `sums` (last refreshed at `init` or the
    /// most recent `undo_level`) is recomputed from the current trail first
    /// — a model reached by descending without an intervening backtrack
    /// would otherwise commit a stale bound.
    pub(crate) fn commit_model(&mut self, context: &PropagationContext) {
        self.recompute(context);
        self.bound = Some(self.sums.clone());
    }

    fn recompute(&mut self, context: &PropagationContext) {
        self.sums = vec![0; self.num_priorities];
        for term in &self.terms {
            if context.is_true(term.literal) {
                self.sums[term.priority] += term.weight;
            }
        }
    }

    /// `trial` would exceed the bound if it is lexicographically >= the
    /// bound (`Optimize`, ties excluded) or > the bound (`EnumOpt`, ties
    /// allowed so multiple optimal models can be enumerated).
    fn exceeds_bound(&self, trial: &[i64]) -> bool {
        let Some(bound) = &self.bound else {
            return false;
        };
        match trial.cmp(bound) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Equal => matches!(self.mode, OptimizationMode::Optimize),
            std::cmp::Ordering::Less => false,
        }
    }
}

impl PostPropagator for MinimizeConstraint {
    fn name(&self) -> &str {
        "minimize"
    }

    fn priority(&self) -> u32 {
        priority::MINIMIZE
    }

    fn init(&mut self, context: &mut PropagationContextMut) -> Result<(), Vec<Literal>> {
        self.recompute(&context.as_read_only());
        Ok(())
    }

    fn propagate(&mut self, context: &mut PropagationContextMut) -> PropagationStatusPostPropagator {
        if matches!(self.mode, OptimizationMode::Ignore) || self.bound.is_none() {
            return PropagationStatusPostPropagator::NoConflict;
        }

        loop {
            let read_only = context.as_read_only();
            let forced = self.terms.iter().find(|term| {
                !read_only.is_assigned(term.literal) && {
                    let mut trial = self.sums.clone();
                    trial[term.priority] += term.weight;
                    self.exceeds_bound(&trial)
                }
            });
            let Some(&term) = forced else {
                return PropagationStatusPostPropagator::NoConflict;
            };
            if !context.enqueue(!term.literal) {
                return PropagationStatusPostPropagator::Conflict(vec![term.literal]);
            }
        }
    }

    fn reason(&self, literal: Literal, _context: &PropagationContext) -> Vec<Literal> {
        // The reason for forcing a minimize literal false is every other
        // currently-true term that contributed to hitting the bound at its
        // priority level.
        let Some(term) = self.terms.iter().find(|t| t.literal == !literal) else {
            return Vec::new();
        };
        self.terms
            .iter()
            .filter(|other| other.priority == term.priority && other.literal != term.literal)
            .map(|other| other.literal)
            .collect()
    }

    fn undo_level(&mut self, context: &PropagationContext) {
        self.recompute(context);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::VariableType;
    use crate::engine::assignments::AssignmentsPropositional;

    #[test]
    fn forces_literal_false_once_bound_would_be_exceeded() {
        let mut assignments = AssignmentsPropositional::new();
        let a = Literal::new(assignments.new_variable(VariableType::Atom), true);
        let b = Literal::new(assignments.new_variable(VariableType::Atom), true);

        let mut minimize = MinimizeConstraint::new(
            vec![
                MinimizeTerm { literal: a, weight: 1, priority: 0 },
                MinimizeTerm { literal: b, weight: 1, priority: 0 },
            ],
            OptimizationMode::Optimize,
        );
        minimize.bound = Some(vec![1]);

        assert!(assignments.enqueue(a, crate::engine::assignments::AssignmentReason::Decision));
        minimize.recompute(&crate::engine::propagation::PropagationContext::new(&assignments));
        assert_eq!(minimize.current_cost(), &[1]);

        let mut context = crate::engine::propagation::PropagationContextMut::new(
            &mut assignments,
            crate::basic_types::PropagatorId(0),
        );
        let status = minimize.propagate(&mut context);
        assert!(matches!(status, PropagationStatusPostPropagator::NoConflict));
        assert!(assignments.is_false(b));
    }
}
