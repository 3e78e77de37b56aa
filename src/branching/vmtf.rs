use crate::basic_types::{Literal, PropositionalVariable};
use crate::engine::assignments::AssignmentsPropositional;

use super::heuristic::Heuristic;

const MOVE_TO_FRONT_BUDGET: usize = 8;

/// VMTF variant: a move-to-front list of variables. Conflict
/// resolution moves up to [`MOVE_TO_FRONT_BUDGET`] resolved-over literals to
/// the front; decisions pick the first free variable walking from the front.
#[derive(Debug)]
pub(crate) struct Vmtf {
    order: Vec<PropositionalVariable>,
    /// Variables bumped since the last conflict, most recent last; moved to
    /// the front (reversed, so the most recent ends up frontmost) once the
    /// conflict's analysis completes.
    pending: Vec<PropositionalVariable>,
}

impl Vmtf {
    pub(crate) fn new(existing_variables: &[PropositionalVariable]) -> Self {
        Vmtf {
            order: existing_variables.to_vec(),
            pending: Vec::new(),
        }
    }
}

impl Heuristic for Vmtf {
    fn on_new_variable(&mut self, variable: PropositionalVariable) {
        self.order.insert(0, variable);
    }

    fn bump_activity(&mut self, variable: PropositionalVariable) {
        if self.pending.len() < MOVE_TO_FRONT_BUDGET && !self.pending.contains(&variable) {
            self.pending.push(variable);
        }
    }

    fn on_conflict(&mut self) {
        for variable in self.pending.drain(..).rev() {
            if let Some(position) = self.order.iter().position(|&v| v == variable) {
                let removed = self.order.remove(position);
                self.order.insert(0, removed);
            }
        }
    }

    fn on_backtrack(&mut self, _assignments: &AssignmentsPropositional, _new_level: u32) {}

    fn next_decision(&mut self, assignments: &AssignmentsPropositional) -> Option<Literal> {
        self.order
            .iter()
            .find(|&&variable| !assignments.truth_value(variable).is_assigned())
            .map(|&variable| Literal::new(variable, assignments.preferred_polarity(variable)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::VariableType;

    #[test]
    fn bumped_variable_moves_to_front_after_conflict() {
        let mut assignments = AssignmentsPropositional::new();
        let a = assignments.new_variable(VariableType::Atom);
        let b = assignments.new_variable(VariableType::Atom);
        let mut vmtf = Vmtf::new(&[a, b]);

        vmtf.bump_activity(b);
        vmtf.on_conflict();

        let decision = vmtf.next_decision(&assignments).unwrap();
        assert_eq!(decision.get_propositional_variable(), b);
    }
}
