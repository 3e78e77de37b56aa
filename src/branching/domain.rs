use crate::basic_types::{FnvMap, Literal, PropositionalVariable};
use crate::engine::assignments::AssignmentsPropositional;

use super::heuristic::Heuristic;
use super::vsids::Vsids;

/// A `heuristic` directive's modification to a specific literal: an
/// activity-factor multiplier and/or a forced sign preference, applied on
/// top of the base VSIDS ordering.
#[derive(Debug, Clone, Copy)]
struct DomainModifier {
    literal: Literal,
    factor: f64,
    sign: Option<bool>,
}

/// Domain variant: VSIDS extended with level/factor/sign
/// modifiers attached to specific literals by external "heuristic"
/// directives. Modifications stack per decision level and are undone on
/// backtrack.
#[derive(Debug)]
pub(crate) struct Domain {
    base: Vsids,
    /// `modifiers_by_level[d]` holds every modifier installed while the
    /// solver was at decision level `d`, so `on_backtrack` can roll them
    /// back precisely.
    modifiers_by_level: Vec<Vec<DomainModifier>>,
    active_sign: FnvMap<PropositionalVariable, bool>,
    active_factor: FnvMap<PropositionalVariable, f64>,
}

impl Domain {
    pub(crate) fn new(existing_variables: &[PropositionalVariable], decay: f64) -> Self {
        Domain {
            base: Vsids::new_with_decay(existing_variables, decay),
            modifiers_by_level: vec![Vec::new()],
            active_sign: FnvMap::default(),
            active_factor: FnvMap::default(),
        }
    }

    /// Installs a heuristic directive at the current decision level
    /// (called by the grounder-facing `addRule`-adjacent API, out of scope
    /// here, but exercised directly in tests).
    #[cfg_attr(not(test), allow(unused))]
    pub(crate) fn install_modifier(&mut self, current_level: u32, modifier: DomainModifier) {
        while self.modifiers_by_level.len() <= current_level as usize {
            self.modifiers_by_level.push(Vec::new());
        }
        let variable = modifier.literal.get_propositional_variable();
        if let Some(sign) = modifier.sign {
            let _ = self.active_sign.insert(variable, sign == modifier.literal.is_positive());
        }
        let _ = self.active_factor.insert(variable, modifier.factor);
        self.modifiers_by_level[current_level as usize].push(modifier);
    }
}

impl Heuristic for Domain {
    fn on_new_variable(&mut self, variable: PropositionalVariable) {
        self.base.on_new_variable(variable);
    }

    fn bump_activity(&mut self, variable: PropositionalVariable) {
        let factor = self.active_factor.get(&variable).copied().unwrap_or(1.0);
        for _ in 0..(factor.max(1.0) as u32) {
            self.base.bump_activity(variable);
        }
    }

    fn on_conflict(&mut self) {
        self.base.on_conflict();
    }

    fn on_backtrack(&mut self, assignments: &AssignmentsPropositional, new_level: u32) {
        while self.modifiers_by_level.len() > (new_level as usize + 1) {
            if let Some(undone) = self.modifiers_by_level.pop() {
                for modifier in undone {
                    let variable = modifier.literal.get_propositional_variable();
                    let _ = self.active_sign.remove(&variable);
                    let _ = self.active_factor.remove(&variable);
                }
            }
        }
        self.base.on_backtrack(assignments, new_level);
    }

    fn next_decision(&mut self, assignments: &AssignmentsPropositional) -> Option<Literal> {
        let decision = self.base.next_decision(assignments)?;
        let variable = decision.get_propositional_variable();
        match self.active_sign.get(&variable) {
            Some(&preferred_positive) => Some(Literal::new(variable, preferred_positive)),
            None => Some(decision),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::VariableType;

    #[test]
    fn sign_modifier_overrides_base_decision_polarity() {
        let mut assignments = AssignmentsPropositional::new();
        let a = assignments.new_variable(VariableType::Atom);
        let mut domain = Domain::new(&[a], 0.95);

        domain.install_modifier(
            0,
            DomainModifier {
                literal: Literal::new(a, false),
                factor: 1.0,
                sign: Some(true),
            },
        );

        let decision = domain.next_decision(&assignments).unwrap();
        assert!(decision.is_negative());
    }

    #[test]
    fn modifier_is_undone_on_backtrack_below_its_level() {
        let mut assignments = AssignmentsPropositional::new();
        let a = assignments.new_variable(VariableType::Atom);
        let mut domain = Domain::new(&[a], 0.95);
        assert!(assignments.assume(Literal::new(a, true)));
        assert_eq!(assignments.current_decision_level(), 1);

        domain.install_modifier(
            1,
            DomainModifier {
                literal: Literal::new(a, false),
                factor: 1.0,
                sign: Some(true),
            },
        );
        assignments.undo_until(0, |_| {});
        domain.on_backtrack(&assignments, 0);

        assert!(domain.active_sign.is_empty());
    }
}
