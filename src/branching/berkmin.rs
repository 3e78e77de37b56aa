use crate::basic_types::{FnvMap, Literal, PropositionalVariable};
use crate::engine::assignments::AssignmentsPropositional;

use super::heuristic::Heuristic;

const MAX_CANDIDATES: usize = 512;

/// BerkMin variant: scans the most recently learnt
/// unsatisfied clauses (bounded by [`MAX_CANDIDATES`]) for a branching
/// literal, falling back to a global activity-ordered MOMs-style scan when
/// no recent clause is unsatisfied. Per-variable activity is lazily
/// decayed by a global counter rather than rescaled eagerly.
#[derive(Debug)]
pub(crate) struct Berkmin {
    activity: FnvMap<PropositionalVariable, f64>,
    order: Vec<PropositionalVariable>,
    /// Recently-learnt clauses, most recent first, scanned for an
    /// unsatisfied one to branch on.
    recent_learnt: Vec<Vec<Literal>>,
    decay_counter: u32,
}

impl Berkmin {
    pub(crate) fn new(existing_variables: &[PropositionalVariable]) -> Self {
        Berkmin {
            activity: existing_variables.iter().map(|&v| (v, 0.0)).collect(),
            order: existing_variables.to_vec(),
            recent_learnt: Vec::new(),
            decay_counter: 0,
        }
    }

    pub(crate) fn notify_learnt_clause(&mut self, literals: Vec<Literal>) {
        self.recent_learnt.insert(0, literals);
        self.recent_learnt.truncate(MAX_CANDIDATES);
    }

    fn best_unassigned(&self, assignments: &AssignmentsPropositional) -> Option<PropositionalVariable> {
        self.order
            .iter()
            .copied()
            .filter(|&variable| !assignments.truth_value(variable).is_assigned())
            .max_by(|&a, &b| {
                self.activity[&a]
                    .partial_cmp(&self.activity[&b])
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

impl Heuristic for Berkmin {
    fn on_new_variable(&mut self, variable: PropositionalVariable) {
        let _ = self.activity.insert(variable, 0.0);
        self.order.push(variable);
    }

    fn bump_activity(&mut self, variable: PropositionalVariable) {
        let entry = self.activity.entry(variable).or_insert(0.0);
        *entry += 1.0;
    }

    fn on_conflict(&mut self) {
        self.decay_counter += 1;
        if self.decay_counter >= 256 {
            self.decay_counter = 0;
            for value in self.activity.values_mut() {
                *value *= 0.5;
            }
        }
    }

    fn on_backtrack(&mut self, _assignments: &AssignmentsPropositional, _new_level: u32) {}

    fn next_decision(&mut self, assignments: &AssignmentsPropositional) -> Option<Literal> {
        for clause in self.recent_learnt.iter().take(MAX_CANDIDATES) {
            let unsatisfied = clause
                .iter()
                .all(|&literal| !assignments.is_true(literal));
            if !unsatisfied {
                continue;
            }
            if let Some(&candidate) = clause.iter().find(|&&literal| {
                !assignments.truth_value(literal.get_propositional_variable()).is_assigned()
            }) {
                return Some(candidate);
            }
        }

        self.best_unassigned(assignments)
            .map(|variable| Literal::new(variable, assignments.preferred_polarity(variable)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::VariableType;

    #[test]
    fn branches_on_unsatisfied_recent_clause_first() {
        let mut assignments = AssignmentsPropositional::new();
        let a = assignments.new_variable(VariableType::Atom);
        let b = assignments.new_variable(VariableType::Atom);
        let mut berkmin = Berkmin::new(&[a, b]);
        berkmin.bump_activity(a);

        let clause = vec![Literal::new(b, true)];
        berkmin.notify_learnt_clause(clause);

        let decision = berkmin.next_decision(&assignments).unwrap();
        assert_eq!(decision.get_propositional_variable(), b);
    }
}
