use crate::basic_types::{FnvSet, Literal, PropositionalVariable};

use super::conflict_analysis_context::ConflictAnalysisContext;

/// Clause minimization strategy selectable via [`crate::options::SolverOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MinimisationMode {
    /// Drop a literal only if every literal of its antecedent is either
    /// already in the learnt clause or assigned at level 0 (one hop).
    Local,
    /// Like `Local`, but follows antecedents transitively, memoizing
    /// already-decided literals to avoid exponential blowup on shared
    /// ancestors.
    Recursive,
    Off,
}

/// Drops literals from `learned_literals[1..]` (the asserting literal at
/// index 0 is never removed) that are redundant given the rest of the
/// clause, under `mode`.
pub(crate) fn minimise(
    learned_literals: &mut Vec<Literal>,
    mode: MinimisationMode,
    context: &ConflictAnalysisContext,
) {
    if mode == MinimisationMode::Off || learned_literals.len() <= 1 {
        return;
    }

    let clause_variables: FnvSet<PropositionalVariable> = learned_literals
        .iter()
        .map(|lit| lit.get_propositional_variable())
        .collect();

    let mut memo: FnvSet<PropositionalVariable> = FnvSet::default(); // known-redundant
    let mut poison: FnvSet<PropositionalVariable> = FnvSet::default(); // known not-redundant

    let mut keep = vec![true; learned_literals.len()];
    for (index, &literal) in learned_literals.iter().enumerate().skip(1) {
        let redundant = match mode {
            MinimisationMode::Local => {
                is_locally_redundant(literal, &clause_variables, context)
            }
            MinimisationMode::Recursive => is_recursively_redundant(
                literal,
                &clause_variables,
                context,
                &mut memo,
                &mut poison,
                &mut Vec::new(),
            ),
            MinimisationMode::Off => false,
        };
        keep[index] = !redundant;
    }

    let mut iter = keep.into_iter();
    learned_literals.retain(|_| iter.next().unwrap_or(true));
}

fn is_locally_redundant(
    literal: Literal,
    clause_variables: &FnvSet<PropositionalVariable>,
    context: &ConflictAnalysisContext,
) -> bool {
    if context.is_root_level_assignment(literal) {
        return true;
    }
    let reason = context.get_reason(literal);
    if reason.is_empty() {
        // a decision literal has no antecedent and can never be dropped
        return false;
    }
    reason.iter().all(|&ancestor| {
        context.is_root_level_assignment(ancestor)
            || clause_variables.contains(&ancestor.get_propositional_variable())
    })
}

fn is_recursively_redundant(
    literal: Literal,
    clause_variables: &FnvSet<PropositionalVariable>,
    context: &ConflictAnalysisContext,
    memo: &mut FnvSet<PropositionalVariable>,
    poison: &mut FnvSet<PropositionalVariable>,
    stack: &mut Vec<PropositionalVariable>,
) -> bool {
    let variable = literal.get_propositional_variable();
    if memo.contains(&variable) {
        return true;
    }
    if poison.contains(&variable) || stack.contains(&variable) {
        return false;
    }
    if context.is_root_level_assignment(literal) {
        memo.insert(variable);
        return true;
    }

    let reason = context.get_reason(literal);
    if reason.is_empty() {
        poison.insert(variable);
        return false;
    }

    stack.push(variable);
    let all_redundant = reason.iter().all(|&ancestor| {
        clause_variables.contains(&ancestor.get_propositional_variable())
            || is_recursively_redundant(ancestor, clause_variables, context, memo, poison, stack)
    });
    stack.pop();

    if all_redundant {
        memo.insert(variable);
    } else {
        poison.insert(variable);
    }
    all_redundant
}
