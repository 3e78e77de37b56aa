use crate::basic_types::{FnvSet, Literal, PropositionalVariable};

use super::conflict_analysis_context::ConflictAnalysisContext;

/// Result of 1-UIP resolution: the learnt clause (the asserting literal at
/// index 0) and the level to backjump to.
#[derive(Debug, Clone)]
pub(crate) struct ConflictAnalysisResult {
    pub(crate) learned_literals: Vec<Literal>,
    pub(crate) backjump_level: u32,
}

/// Resolves `conflicting_literals` (every literal of the falsified
/// constraint, i.e. already all false under the current assignment) back to
/// its first unique implication point at the current decision level.
///
/// Returns `Err(())` if resolution reaches level 0 and produces the empty
/// clause: the problem is unsatisfiable under the current assumptions.
pub(crate) fn compute_1uip(
    conflicting_literals: &[Literal],
    context: &mut ConflictAnalysisContext,
) -> Result<ConflictAnalysisResult, ()> {
    let current_level = context.get_decision_level();

    let mut seen: FnvSet<PropositionalVariable> = FnvSet::default();
    // index 0 is a placeholder for the asserting literal, filled in once found.
    let mut learned_literals: Vec<Literal> = vec![];
    let mut counter_at_current_level = 0u32;
    let mut trail_index = context.get_num_trail_entries();
    let mut resolving_literal: Option<Literal> = None;
    let mut current_reason: Vec<Literal> = conflicting_literals.to_vec();
    let mut asserting_literal: Option<Literal> = None;

    loop {
        for &literal in current_reason.iter() {
            if Some(literal) == resolving_literal {
                continue;
            }
            let variable = literal.get_propositional_variable();
            if seen.contains(&variable) {
                continue;
            }
            let level = context.get_assignment_level_for_literal(literal);
            if level == 0 {
                // permanently false; contributes nothing to the learnt clause
                continue;
            }
            seen.insert(variable);
            context.bump_variable_activity(literal);
            context.bump_clause_activity_if_resolved_through(literal);
            if level == current_level {
                counter_at_current_level += 1;
            } else {
                learned_literals.push(literal);
            }
        }

        // Nothing in the current resolvent sits at the current decision
        // level (every literal involved is permanently false, level 0):
        // there is no trail entry left to resolve against. This happens
        // when the conflict is rooted entirely at level 0.
        if counter_at_current_level == 0 {
            break;
        }

        // Find the next literal on the trail (scanning backwards) that is
        // part of the current resolvent.
        loop {
            trail_index -= 1;
            let candidate = context.get_trail_entry(trail_index);
            if seen.contains(&candidate.get_propositional_variable()) {
                resolving_literal = Some(candidate);
                break;
            }
        }

        let p = resolving_literal.expect("a resolving literal must exist while counter > 0");
        seen.remove(&p.get_propositional_variable());
        counter_at_current_level -= 1;

        if counter_at_current_level == 0 {
            asserting_literal = Some(!p);
            break;
        }

        current_reason = context.get_reason(p);
    }

    // `asserting_literal` is only set once the resolvent reaches the current
    // decision level; at level 0 it never does, so this also covers the
    // level-0/empty-clause unsatisfiable case.
    let Some(asserting_literal) = asserting_literal else {
        return Err(());
    };

    let backjump_level = learned_literals
        .iter()
        .map(|&lit| context.get_assignment_level_for_literal(lit))
        .max()
        .unwrap_or(0);

    let mut result_literals = Vec::with_capacity(learned_literals.len() + 1);
    result_literals.push(asserting_literal);
    result_literals.extend(learned_literals);

    Ok(ConflictAnalysisResult {
        learned_literals: result_literals,
        backjump_level,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::{ClauseReference, VariableType};
    use crate::branching::Vsids;
    use crate::engine::assignments::{AssignmentReason, AssignmentsPropositional};
    use crate::engine::propagation::PropagationEngine;
    use crate::engine::sat::ClauseAllocator;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    #[test]
    fn chained_implication_learns_negated_decision() {
        // Decision: a (level 1). Propagated: b via {-a, b}. Conflict over {-a, -b}.
        // Resolving the conflict against b's antecedent should yield the unit
        // clause {-a} as the 1-UIP result.
        let mut assignments = AssignmentsPropositional::new();
        let a = Literal::new(assignments.new_variable(VariableType::Atom), true);
        let b = Literal::new(assignments.new_variable(VariableType::Atom), true);

        assert!(assignments.assume(a));
        assert!(assignments.enqueue(b, AssignmentReason::Clause(ClauseReference::Binary(!a, b))));

        let mut allocator = ClauseAllocator::new();
        let terminate = Arc::new(AtomicBool::new(false));
        let engine = PropagationEngine::new(terminate);
        let mut heuristic = Vsids::new(&[]);

        let mut context = ConflictAnalysisContext {
            assignments: &mut assignments,
            clause_allocator: &mut allocator,
            propagation_engine: &engine,
            heuristic: &mut heuristic,
        };

        let conflict_literals = vec![!a, !b];
        let result = compute_1uip(&conflict_literals, &mut context).expect("should not be UNSAT");
        assert_eq!(result.backjump_level, 0);
        assert_eq!(result.learned_literals, vec![!a]);
    }
}
