use crate::basic_types::{AllocatedClauseReference, ClauseReference, Literal};
use crate::engine::assignments::{AssignmentReason, AssignmentsPropositional};
use crate::engine::sat::{Clause, ClauseAllocator};
use crate::options::{ReductionOptions, ReductionScore};

/// the learnt-clause database, its deletion strategy and the
/// geometric/arithmetic/luby/none growth schedule for the size bound that
/// triggers reduction.
#[derive(Debug)]
pub(crate) struct LearntDb {
    learnt: Vec<AllocatedClauseReference>,
    options: ReductionOptions,
    max_learnt: f64,
    conflicts_since_reduce: u64,
}

impl LearntDb {
    pub(crate) fn new(options: ReductionOptions, num_clauses_estimate: u32) -> Self {
        LearntDb {
            learnt: Vec::new(),
            max_learnt: options.initial_bound(num_clauses_estimate),
            options,
            conflicts_since_reduce: 0,
        }
    }

    /// Allocates `literals` as a new learnt clause and registers its two
    /// watches (the asserting literal at index 0 must be one of them; the
    /// caller picks the second watch as the literal with the highest
    /// decision level, per the usual backjump-watch convention).
    pub(crate) fn add_learnt_clause(
        &mut self,
        literals: Vec<Literal>,
        lbd: u32,
        clause_allocator: &mut ClauseAllocator,
    ) -> ClauseReference {
        match literals.len() {
            1 => {
                // Handled by the caller directly via `enqueue`; a unit
                // learnt clause has no watches to register.
                ClauseReference::Binary(literals[0], literals[0])
            }
            2 => ClauseReference::Binary(literals[0], literals[1]),
            3 => ClauseReference::Ternary(literals[0], literals[1], literals[2]),
            _ => {
                let reference = clause_allocator.create_clause(literals, true);
                clause_allocator.get_clause_mut(reference).set_lbd(lbd);
                self.learnt.push(reference);
                ClauseReference::Allocated(reference)
            }
        }
    }

    pub(crate) fn num_learnt(&self) -> usize {
        self.learnt.len()
    }

    /// Approximates the learnt database's memory footprint as the total literal count
    /// across every currently allocated learnt clause.
    pub(crate) fn total_literals(&self, clause_allocator: &ClauseAllocator) -> u64 {
        self.learnt
            .iter()
            .map(|&reference| clause_allocator.get_clause(reference).len() as u64)
            .sum()
    }

    pub(crate) fn record_conflict(&mut self) {
        self.conflicts_since_reduce += 1;
    }

    /// Whether a reduction pass should run now, per the conflict-count
    /// schedule or the dynamic size bound.
    pub(crate) fn should_reduce(&self) -> bool {
        self.learnt.len() as f64 > self.max_learnt
            || self.conflicts_since_reduce >= self.options.conflicts_per_reduce
    }

    /// Deletes the worst `fraction` of non-locked learnt clauses, skipping
    /// any whose LBD is at or below `protect_lbd`. A clause is locked if it
    /// is currently the antecedent for an assigned literal.
    pub(crate) fn reduce(
        &mut self,
        assignments: &AssignmentsPropositional,
        clause_allocator: &mut ClauseAllocator,
    ) {
        self.conflicts_since_reduce = 0;
        self.grow();

        let is_locked = |reference: AllocatedClauseReference, assignments: &AssignmentsPropositional| {
            let clause = clause_allocator.get_clause(reference);
            if clause.len() == 0 {
                return false;
            }
            let candidate = clause.get_literal_slice()[0];
            assignments.is_true(candidate)
                && matches!(
                    assignments.reason_of(candidate),
                    AssignmentReason::Clause(ClauseReference::Allocated(r)) if r == reference
                )
        };

        let mut free: Vec<AllocatedClauseReference> = self
            .learnt
            .iter()
            .copied()
            .filter(|&reference| !is_locked(reference, assignments))
            .collect();

        free.sort_by(|&a, &b| self.score(a, clause_allocator).total_cmp(&self.score(b, clause_allocator)));

        let to_delete = ((free.len() as f64) * self.options.fraction_to_delete) as usize;
        let mut deleted = 0usize;
        for &reference in &free {
            if deleted >= to_delete {
                break;
            }
            let clause = clause_allocator.get_clause(reference);
            if clause.is_protected() || clause.lbd() <= self.options.protect_lbd {
                continue;
            }
            clause_allocator.delete_clause(reference);
            deleted += 1;
        }

        self.learnt
            .retain(|reference| !clause_allocator.get_clause(*reference).is_deleted());
    }

    fn score(&self, reference: AllocatedClauseReference, clause_allocator: &ClauseAllocator) -> f32 {
        let clause: &Clause = clause_allocator.get_clause(reference);
        match self.options.score {
            ReductionScore::Activity => clause.activity(),
            ReductionScore::Lbd => clause.lbd() as f32,
            ReductionScore::Mixed => clause.lbd() as f32 * 1_000.0 - clause.activity(),
        }
    }

    fn grow(&mut self) {
        self.max_learnt = self.options.grow(self.max_learnt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::{PropositionalVariable, VariableType};

    fn lit(index: u32, positive: bool) -> Literal {
        Literal::new(PropositionalVariable::new(index), positive)
    }

    #[test]
    fn unlocked_low_score_clause_is_reclaimed() {
        let mut allocator = ClauseAllocator::new();
        let mut assignments = AssignmentsPropositional::new();
        for _ in 0..8 {
            let _ = assignments.new_variable(VariableType::Atom);
        }
        let mut db = LearntDb::new(
            ReductionOptions {
                fraction_to_delete: 1.0,
                protect_lbd: 0,
                conflicts_per_reduce: 1,
                score: ReductionScore::Lbd,
                ..ReductionOptions::default()
            },
            0,
        );
        let reference = db.add_learnt_clause(
            vec![lit(1, true), lit(2, true), lit(3, true), lit(4, true)],
            4,
            &mut allocator,
        );
        assert!(matches!(reference, ClauseReference::Allocated(_)));
        assert_eq!(db.num_learnt(), 1);

        db.reduce(&assignments, &mut allocator);
        assert_eq!(db.num_learnt(), 0);
    }
}
