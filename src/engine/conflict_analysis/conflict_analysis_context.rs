use crate::basic_types::{ClauseReference, Literal};
use crate::branching::Heuristic;
use crate::engine::assignments::{AssignmentReason, AssignmentsPropositional};
use crate::engine::propagation::PropagationEngine;
use crate::engine::sat::{Clause, ClauseAllocator};

/// Bundles every piece conflict analysis needs to borrow at once: the
/// trail, the clause arena, the propagation engine (to route `reason()`
/// back to whichever post-propagator forced a literal), and the heuristic
/// (to bump variable activities as literals are resolved over).
pub(crate) struct ConflictAnalysisContext<'a> {
    pub(crate) assignments: &'a mut AssignmentsPropositional,
    pub(crate) clause_allocator: &'a mut ClauseAllocator,
    pub(crate) propagation_engine: &'a PropagationEngine,
    pub(crate) heuristic: &'a mut dyn Heuristic,
}

impl<'a> ConflictAnalysisContext<'a> {
    pub(crate) fn get_decision_level(&self) -> u32 {
        self.assignments.current_decision_level()
    }

    pub(crate) fn get_num_trail_entries(&self) -> u32 {
        self.assignments.num_trail_entries()
    }

    pub(crate) fn get_trail_entry(&self, position: u32) -> Literal {
        self.assignments.get_trail_entry(position)
    }

    pub(crate) fn is_root_level_assignment(&self, literal: Literal) -> bool {
        self.assignments.is_root_assignment(literal)
    }

    pub(crate) fn get_assignment_level_for_literal(&self, literal: Literal) -> u32 {
        self.assignments
            .decision_level_of(literal)
            .expect("literal should be assigned during conflict analysis")
    }

    /// Returns the falsified literals that justify `literal` having been
    /// forced, dispatching across the clausal, binary/ternary inline, and
    /// post-propagator antecedent shapes.
    pub(crate) fn get_reason(&self, literal: Literal) -> Vec<Literal> {
        match self.assignments.reason_of(literal) {
            AssignmentReason::Decision => Vec::new(),
            AssignmentReason::Clause(clause_reference) => {
                self.get_reason_from_clause(clause_reference, literal)
            }
            AssignmentReason::Propagator(propagator_id) => {
                self.propagation_engine
                    .reason_for_propagator(propagator_id, literal, self.assignments)
            }
        }
    }

    fn get_reason_from_clause(&self, reference: ClauseReference, literal: Literal) -> Vec<Literal> {
        match reference {
            ClauseReference::Binary(a, b) => {
                let other = if a == literal { b } else { a };
                vec![other]
            }
            ClauseReference::Ternary(a, b, c) => [a, b, c]
                .into_iter()
                .filter(|&lit| lit != literal)
                .collect(),
            ClauseReference::Allocated(allocated) => {
                let clause: &Clause = self.clause_allocator.get_clause(allocated);
                clause
                    .get_literal_slice()
                    .iter()
                    .copied()
                    .filter(|&lit| lit != literal)
                    .collect()
            }
        }
    }

    pub(crate) fn bump_variable_activity(&mut self, literal: Literal) {
        self.heuristic.bump_activity(literal.get_propositional_variable());
    }

    pub(crate) fn bump_clause_activity_if_resolved_through(&mut self, literal: Literal) {
        if let AssignmentReason::Clause(ClauseReference::Allocated(allocated)) =
            self.assignments.reason_of(literal)
        {
            let clause = self.clause_allocator.get_clause_mut(allocated);
            if clause.is_learned() {
                clause.bump_activity(1.0);
            }
        }
    }

    /// Rewinds the trail to `level`, notifying the propagation engine so
    /// post-propagators observe the undo (their `undoLevel` hook).
    pub(crate) fn backtrack(&mut self, level: u32) {
        self.assignments.undo_until(level, |_| {});
    }
}
