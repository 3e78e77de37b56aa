use std::collections::BinaryHeap;

use crate::basic_types::{FnvMap, Literal, PropositionalVariable};
use crate::engine::assignments::AssignmentsPropositional;

use super::heuristic::Heuristic;

const DEFAULT_INCREMENT: f64 = 1.0;
const RESCALE_THRESHOLD: f64 = 1e100;

#[derive(Debug, Clone, Copy, PartialEq)]
struct HeapEntry {
    activity: f64,
    variable: PropositionalVariable,
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.activity
            .partial_cmp(&other.activity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| self.variable.cmp(&other.variable))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// VSIDS variant: an indexed priority queue keyed on
/// exponentially-decaying activity, bumped on resolution and decayed on
/// conflict via an increment factor. Stale heap entries (whose
/// activity no longer matches the live value) are discarded lazily when
/// popped, the usual trick to avoid an explicit decrease-key operation.
#[derive(Debug)]
pub(crate) struct Vsids {
    activity: FnvMap<PropositionalVariable, f64>,
    heap: BinaryHeap<HeapEntry>,
    increment: f64,
    decay: f64,
}

impl Vsids {
    pub(crate) fn new(existing_variables: &[PropositionalVariable]) -> Self {
        Self::new_with_decay(existing_variables, 0.95)
    }

    pub(crate) fn new_with_decay(existing_variables: &[PropositionalVariable], decay: f64) -> Self {
        let mut vsids = Vsids {
            activity: FnvMap::default(),
            heap: BinaryHeap::new(),
            increment: DEFAULT_INCREMENT,
            decay,
        };
        for &variable in existing_variables {
            vsids.on_new_variable(variable);
        }
        vsids
    }

    fn rescale_if_needed(&mut self) {
        if self.increment < RESCALE_THRESHOLD {
            return;
        }
        for value in self.activity.values_mut() {
            *value /= RESCALE_THRESHOLD;
        }
        self.increment /= RESCALE_THRESHOLD;
        self.heap = self
            .activity
            .iter()
            .map(|(&variable, &activity)| HeapEntry { activity, variable })
            .collect();
    }
}

impl Heuristic for Vsids {
    fn on_new_variable(&mut self, variable: PropositionalVariable) {
        let _ = self.activity.insert(variable, 0.0);
        self.heap.push(HeapEntry {
            activity: 0.0,
            variable,
        });
    }

    fn bump_activity(&mut self, variable: PropositionalVariable) {
        let entry = self.activity.entry(variable).or_insert(0.0);
        *entry += self.increment;
        let activity = *entry;
        self.heap.push(HeapEntry { activity, variable });
        if activity > RESCALE_THRESHOLD {
            self.rescale_if_needed();
        }
    }

    fn on_conflict(&mut self) {
        self.increment /= self.decay;
    }

    fn on_backtrack(&mut self, _assignments: &AssignmentsPropositional, _new_level: u32) {}

    fn next_decision(&mut self, assignments: &AssignmentsPropositional) -> Option<Literal> {
        while let Some(top) = self.heap.pop() {
            if assignments.truth_value(top.variable).is_assigned() {
                continue;
            }
            let live_activity = self.activity.get(&top.variable).copied().unwrap_or(0.0);
            if (live_activity - top.activity).abs() > f64::EPSILON {
                // stale entry superseded by a later bump; the live entry is
                // (or will be) on the heap too
                continue;
            }
            let polarity = assignments.preferred_polarity(top.variable);
            return Some(Literal::new(top.variable, polarity));
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::VariableType;

    #[test]
    fn picks_most_bumped_unassigned_variable() {
        let mut assignments = AssignmentsPropositional::new();
        let a = assignments.new_variable(VariableType::Atom);
        let b = assignments.new_variable(VariableType::Atom);
        let mut vsids = Vsids::new(&[a, b]);

        vsids.bump_activity(b);
        vsids.bump_activity(b);
        vsids.bump_activity(a);

        let decision = vsids.next_decision(&assignments).expect("a variable is free");
        assert_eq!(decision.get_propositional_variable(), b);
    }

    #[test]
    fn skips_assigned_variables() {
        let mut assignments = AssignmentsPropositional::new();
        let a = assignments.new_variable(VariableType::Atom);
        let b = assignments.new_variable(VariableType::Atom);
        let mut vsids = Vsids::new(&[a, b]);
        vsids.bump_activity(a);

        assert!(assignments.assume(Literal::new(a, true)));
        let decision = vsids.next_decision(&assignments).expect("b is still free");
        assert_eq!(decision.get_propositional_variable(), b);
    }
}
