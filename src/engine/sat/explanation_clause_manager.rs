use super::clause_allocator::ClauseAllocator;
use crate::basic_types::{AllocatedClauseReference, Literal};
use crate::solver_assert_moderate;

/// Tracks clauses materialized on the fly to back a reason (e.g. a
/// loop nogood under the `distinct` or `shared` unfounded-set reason
/// strategy) so they can be reclaimed once the decision level that
/// needed them is left.
#[derive(Debug, Default)]
pub(crate) struct ExplanationClauseManager {
    explanation_clauses: Vec<AllocatedClauseReference>,
}

impl ExplanationClauseManager {
    pub(crate) fn is_empty(&self) -> bool {
        self.explanation_clauses.is_empty()
    }

    pub(crate) fn add_explanation_clause_unchecked(
        &mut self,
        explanation_literals: Vec<Literal>,
        clause_allocator: &mut ClauseAllocator,
    ) -> AllocatedClauseReference {
        solver_assert_moderate!(explanation_literals.len() >= 2);

        let clause_reference = clause_allocator.create_clause(explanation_literals, false);
        self.explanation_clauses.push(clause_reference);

        clause_reference
    }

    // Clauses are deleted in reverse order of creation so that, should the
    // allocator ever adopt a bump-allocation scheme, the freed region is a
    // contiguous suffix rather than a scattered set of holes.
    pub(crate) fn clean_up_explanation_clauses(&mut self, clause_allocator: &mut ClauseAllocator) {
        for clause_reference in self.explanation_clauses.iter().rev() {
            clause_allocator.delete_clause(*clause_reference);
        }
        self.explanation_clauses.clear();
    }
}
