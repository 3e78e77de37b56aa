use crate::basic_types::{Literal, PropositionalVariable};
use crate::engine::assignments::AssignmentsPropositional;

use super::heuristic::Heuristic;

/// Lookahead variant: a circular candidate list with
/// per-level splice/restore, from which the caller test-propagates each
/// candidate literal (test-propagation itself happens in the lookahead
/// post-propagator registered at [`crate::engine::propagation::priority::LOOKAHEAD`];
/// this type only owns candidate-list bookkeeping and the resulting score
/// comparison, picking the candidate that maximizes `(max, min)`
/// lexicographically).
#[derive(Debug)]
pub(crate) struct Lookahead {
    candidates: Vec<PropositionalVariable>,
    /// `splice_points[level]` is the index into `candidates` at which that
    /// level's restore point begins, so a later `on_backtrack` can splice
    /// candidates that failed-literal detection removed back in.
    splice_points: Vec<usize>,
    scores: Vec<(PropositionalVariable, u32, u32)>,
}

impl Lookahead {
    pub(crate) fn new(existing_variables: &[PropositionalVariable]) -> Self {
        Lookahead {
            candidates: existing_variables.to_vec(),
            splice_points: vec![existing_variables.len()],
            scores: Vec::new(),
        }
    }

    /// Records the result of test-propagating both polarities of
    /// `variable`: `(max, min)` number of implications, compared
    /// lexicographically per ("pick the one maximizing (max, min)").
    pub(crate) fn record_score(&mut self, variable: PropositionalVariable, implied_a: u32, implied_b: u32) {
        let (max, min) = if implied_a >= implied_b {
            (implied_a, implied_b)
        } else {
            (implied_b, implied_a)
        };
        self.scores.push((variable, max, min));
    }

    /// Removes a variable that failed-literal detection (or assignment)
    /// has resolved, so it is no longer offered as a candidate until
    /// `on_backtrack` restores it.
    pub(crate) fn splice_out(&mut self, variable: PropositionalVariable) {
        if let Some(position) = self.candidates.iter().position(|&v| v == variable) {
            let _ = self.candidates.remove(position);
        }
    }
}

impl Heuristic for Lookahead {
    fn on_new_variable(&mut self, variable: PropositionalVariable) {
        self.candidates.push(variable);
        if let Some(last) = self.splice_points.last_mut() {
            *last += 1;
        }
    }

    fn bump_activity(&mut self, _variable: PropositionalVariable) {}

    fn on_conflict(&mut self) {
        self.scores.clear();
    }

    fn on_backtrack(&mut self, _assignments: &AssignmentsPropositional, new_level: u32) {
        self.splice_points.truncate(new_level as usize + 1);
    }

    fn next_decision(&mut self, assignments: &AssignmentsPropositional) -> Option<Literal> {
        let best = self
            .scores
            .iter()
            .filter(|(variable, _, _)| !assignments.truth_value(*variable).is_assigned())
            .max_by_key(|(_, max, min)| (*max, *min))
            .map(|&(variable, _, _)| variable)
            .or_else(|| {
                self.candidates
                    .iter()
                    .copied()
                    .find(|&variable| !assignments.truth_value(variable).is_assigned())
            })?;
        Some(Literal::new(best, assignments.preferred_polarity(best)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::VariableType;

    #[test]
    fn picks_highest_max_min_score() {
        let mut assignments = AssignmentsPropositional::new();
        let a = assignments.new_variable(VariableType::Atom);
        let b = assignments.new_variable(VariableType::Atom);
        let mut lookahead = Lookahead::new(&[a, b]);

        lookahead.record_score(a, 3, 1);
        lookahead.record_score(b, 4, 2);

        let decision = lookahead.next_decision(&assignments).unwrap();
        assert_eq!(decision.get_propositional_variable(), b);
    }
}
