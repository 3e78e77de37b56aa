use super::clause::Clause;
use crate::basic_types::{AllocatedClauseReference, Literal};

/// Append-only arena for clauses of length four or more (shorter clauses are
/// represented inline, see [`crate::basic_types::ClauseReference`]). Deleted
/// slots are tracked on a free list and reused by later allocations, as
/// suggested for a future manual-memory-management scheme: the arena itself
/// never shrinks, but a slot can be handed out again without growing the
/// backing vector.
#[derive(Debug, Default)]
pub(crate) struct ClauseAllocator {
    clauses: Vec<Option<Clause>>,
    free_slots: Vec<u32>,
}

impl ClauseAllocator {
    pub(crate) fn new() -> Self {
        ClauseAllocator {
            clauses: Vec::new(),
            free_slots: Vec::new(),
        }
    }

    pub(crate) fn create_clause(
        &mut self,
        literals: Vec<Literal>,
        is_learned: bool,
    ) -> AllocatedClauseReference {
        let clause = Clause::new(literals, is_learned);
        if let Some(index) = self.free_slots.pop() {
            self.clauses[index as usize] = Some(clause);
            AllocatedClauseReference::new(index)
        } else {
            let index = self.clauses.len() as u32;
            self.clauses.push(Some(clause));
            AllocatedClauseReference::new(index)
        }
    }

    pub(crate) fn get_clause(&self, reference: AllocatedClauseReference) -> &Clause {
        self.clauses[reference.index() as usize]
            .as_ref()
            .expect("dereferencing a deleted clause reference")
    }

    pub(crate) fn get_clause_mut(&mut self, reference: AllocatedClauseReference) -> &mut Clause {
        self.clauses[reference.index() as usize]
            .as_mut()
            .expect("dereferencing a deleted clause reference")
    }

    pub(crate) fn delete_clause(&mut self, reference: AllocatedClauseReference) {
        let slot = &mut self.clauses[reference.index() as usize];
        if let Some(clause) = slot {
            clause.mark_deleted();
        }
        *slot = None;
        self.free_slots.push(reference.index());
    }

    /// Iterates over every live allocated clause, used by the learnt-clause
    /// database for score-based reduction.
    pub(crate) fn iter_allocated(
        &self,
    ) -> impl Iterator<Item = (AllocatedClauseReference, &Clause)> {
        self.clauses.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref()
                .map(|clause| (AllocatedClauseReference::new(index as u32), clause))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::PropositionalVariable;

    fn lit(index: u32, positive: bool) -> Literal {
        Literal::new(PropositionalVariable::new(index), positive)
    }

    #[test]
    fn allocate_and_reuse_slot() {
        let mut allocator = ClauseAllocator::new();
        let r1 = allocator.create_clause(vec![lit(1, true), lit(2, true), lit(3, true)], false);
        assert_eq!(allocator.get_clause(r1).len(), 3);

        allocator.delete_clause(r1);
        let r2 = allocator.create_clause(vec![lit(4, true), lit(5, true)], true);
        assert_eq!(r1.index(), r2.index());
        assert_eq!(allocator.get_clause(r2).len(), 2);
    }
}
