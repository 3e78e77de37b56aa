use smallvec::SmallVec;

use super::clause_allocator::ClauseAllocator;
use super::watch_list::{WatchEntry, WatchList};
use crate::basic_types::{AllocatedClauseReference, ClauseReference, Literal, PropagationStatus};
use crate::engine::assignments::{AssignmentReason, AssignmentsPropositional};

/// watched-literal clause storage and the unit-propagation
/// rule that drives the lowest-priority step of the propagation engine.
#[derive(Debug, Default)]
pub(crate) struct ClausalPropagator {
    watch_list: WatchList,
}

impl ClausalPropagator {
    pub(crate) fn new() -> Self {
        ClausalPropagator {
            watch_list: WatchList::new(),
        }
    }

    /// Adds a clause of two or more literals, dispatching to the inline
    /// binary/ternary representation when possible. Returns `false` and
    /// does not add anything if the clause is already root-satisfied, and
    /// reports (via the returned `PropagationStatus`) an immediate conflict
    /// if it is already root-falsified.
    pub(crate) fn add_clause(
        &mut self,
        mut literals: Vec<Literal>,
        is_learned: bool,
        assignments: &AssignmentsPropositional,
        clause_allocator: &mut ClauseAllocator,
    ) -> Result<Option<ClauseReference>, ()> {
        literals.retain(|&lit| !assignments.is_false(lit));
        if literals.iter().any(|&lit| assignments.is_true(lit)) {
            return Ok(None);
        }
        if literals.is_empty() {
            return Err(());
        }

        match literals.len() {
            1 => {
                // A unit clause has no watches; the caller enqueues it as a
                // forced literal with a `Decision`-shaped antecedent that the
                // search loop treats as root-level and never needs to
                // re-derive, since there is nothing left to watch.
                Ok(Some(ClauseReference::Binary(literals[0], literals[0])))
            }
            2 => {
                let (a, b) = (literals[0], literals[1]);
                self.watch_list.add_watch(a, WatchEntry::Binary { other: b });
                self.watch_list.add_watch(b, WatchEntry::Binary { other: a });
                Ok(Some(ClauseReference::Binary(a, b)))
            }
            3 => {
                let (a, b, c) = (literals[0], literals[1], literals[2]);
                self.watch_list.add_watch(
                    a,
                    WatchEntry::Ternary {
                        other_a: b,
                        other_b: c,
                    },
                );
                self.watch_list.add_watch(
                    b,
                    WatchEntry::Ternary {
                        other_a: a,
                        other_b: c,
                    },
                );
                self.watch_list.add_watch(
                    c,
                    WatchEntry::Ternary {
                        other_a: a,
                        other_b: b,
                    },
                );
                Ok(Some(ClauseReference::Ternary(a, b, c)))
            }
            _ => {
                let reference = clause_allocator.create_clause(literals, is_learned);
                let clause = clause_allocator.get_clause(reference);
                let w0 = clause.get_literal_slice()[0];
                let w1 = clause.get_literal_slice()[1];
                self.watch_list.add_watch(w0, WatchEntry::Clause { reference });
                self.watch_list.add_watch(w1, WatchEntry::Clause { reference });
                Ok(Some(ClauseReference::Allocated(reference)))
            }
        }
    }

    pub(crate) fn register_allocated_clause_watches(
        &mut self,
        reference: AllocatedClauseReference,
        w0: Literal,
        w1: Literal,
    ) {
        self.watch_list.add_watch(w0, WatchEntry::Clause { reference });
        self.watch_list.add_watch(w1, WatchEntry::Clause { reference });
    }

    /// Propagates the consequences of `falsified_literal` becoming false,
    /// pushing newly implied literals onto the assignment trail as they are
    /// found. Returns a conflict status if a watched clause becomes fully
    /// false.
    ///
    /// Callers drive this from the trail: when literal `l` is pushed true,
    /// `!l` is what just became false, so the engine calls this with `!l`.
    pub(crate) fn propagate_literal_false(
        &mut self,
        falsified_literal: Literal,
        assignments: &mut AssignmentsPropositional,
        clause_allocator: &mut ClauseAllocator,
    ) -> PropagationStatus {
        let entries = self.watch_list.take_watches_for(falsified_literal);
        let mut kept: SmallVec<[WatchEntry; 4]> = SmallVec::with_capacity(entries.len());
        let mut conflict = None;

        let mut iter = entries.into_iter();
        for entry in iter.by_ref() {
            match entry {
                WatchEntry::Binary { other } => {
                    kept.push(entry);
                    if assignments.is_true(other) {
                        continue;
                    }
                    if assignments.is_false(other) {
                        conflict = Some(ClauseReference::Binary(falsified_literal, other));
                        break;
                    }
                    let _ = assignments.enqueue(
                        other,
                        AssignmentReason::Clause(ClauseReference::Binary(falsified_literal, other)),
                    );
                }
                WatchEntry::Ternary { other_a, other_b } => {
                    kept.push(entry);
                    if assignments.is_true(other_a) || assignments.is_true(other_b) {
                        continue;
                    }
                    match (assignments.is_false(other_a), assignments.is_false(other_b)) {
                        (true, true) => {
                            conflict = Some(ClauseReference::Ternary(
                                falsified_literal,
                                other_a,
                                other_b,
                            ));
                            break;
                        }
                        (true, false) => {
                            let _ = assignments.enqueue(
                                other_b,
                                AssignmentReason::Clause(ClauseReference::Ternary(
                                    falsified_literal,
                                    other_a,
                                    other_b,
                                )),
                            );
                        }
                        (false, true) => {
                            let _ = assignments.enqueue(
                                other_a,
                                AssignmentReason::Clause(ClauseReference::Ternary(
                                    falsified_literal,
                                    other_a,
                                    other_b,
                                )),
                            );
                        }
                        (false, false) => {}
                    }
                }
                WatchEntry::Clause { reference } => {
                    let clause = clause_allocator.get_clause_mut(reference);
                    let literals = clause.get_literal_slice_mut();

                    // Normalize so the falsified watch sits at position 0.
                    if literals[1] == falsified_literal {
                        literals.swap(0, 1);
                    }
                    debug_assert_eq!(literals[0], falsified_literal);

                    let other_watch = literals[1];
                    if assignments.is_true(other_watch) {
                        kept.push(entry);
                        continue;
                    }

                    let mut found_replacement = None;
                    for position in 2..literals.len() {
                        if !assignments.is_false(literals[position]) {
                            found_replacement = Some(position);
                            break;
                        }
                    }

                    if let Some(position) = found_replacement {
                        let new_watch = clause.swap_literal_in(position, falsified_literal);
                        clause.get_literal_slice_mut()[0] = new_watch;
                        self.watch_list
                            .add_watch(new_watch, WatchEntry::Clause { reference });
                    } else {
                        kept.push(entry);
                        if assignments.is_false(other_watch) {
                            conflict = Some(ClauseReference::Allocated(reference));
                            break;
                        }
                        let _ = assignments
                            .enqueue(other_watch, AssignmentReason::Clause(ClauseReference::Allocated(reference)));
                    }
                }
            }
        }

        kept.extend(iter);
        self.watch_list.set_watches_for(falsified_literal, kept);

        match conflict {
            Some(reference) => PropagationStatus::Conflict(reference),
            None => PropagationStatus::NoConflict,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::VariableType;

    fn new_lit(assignments: &mut AssignmentsPropositional, positive: bool) -> Literal {
        Literal::new(assignments.new_variable(VariableType::Atom), positive)
    }

    #[test]
    fn binary_clause_propagates_other_literal() {
        let mut assignments = AssignmentsPropositional::new();
        let a = new_lit(&mut assignments, true);
        let b = new_lit(&mut assignments, true);
        let mut allocator = ClauseAllocator::new();
        let mut propagator = ClausalPropagator::new();

        propagator
            .add_clause(vec![a, b], false, &assignments, &mut allocator)
            .unwrap();

        assert!(assignments.enqueue(!a, AssignmentReason::Decision));
        let status = propagator.propagate_literal_false(a, &mut assignments, &mut allocator);
        assert!(!status.is_conflict());
        assert!(assignments.is_true(b));
    }

    #[test]
    fn generic_clause_detects_conflict() {
        let mut assignments = AssignmentsPropositional::new();
        let a = new_lit(&mut assignments, true);
        let b = new_lit(&mut assignments, true);
        let c = new_lit(&mut assignments, true);
        let d = new_lit(&mut assignments, true);
        let mut allocator = ClauseAllocator::new();
        let mut propagator = ClausalPropagator::new();

        propagator
            .add_clause(vec![a, b, c, d], false, &assignments, &mut allocator)
            .unwrap();

        assert!(assignments.enqueue(!b, AssignmentReason::Decision));
        assert!(!propagator
            .propagate_literal_false(b, &mut assignments, &mut allocator)
            .is_conflict());

        assert!(assignments.enqueue(!c, AssignmentReason::Decision));
        assert!(!propagator
            .propagate_literal_false(c, &mut assignments, &mut allocator)
            .is_conflict());

        assert!(assignments.enqueue(!d, AssignmentReason::Decision));
        let status = propagator.propagate_literal_false(d, &mut assignments, &mut allocator);
        assert!(!status.is_conflict());
        assert!(assignments.is_true(a));
    }
}
