use crate::basic_types::{
    ClauseReference, Literal, PreferredValue, PropagatorId, PropositionalVariable, TruthValue,
    VariableInfo, VariableType,
};
use crate::solver_assert_moderate;
use crate::solver_assert_simple;

/// What forced a literal onto the trail: a decision opens a new level and
/// has no antecedent; everything else was propagated by some constraint.
#[derive(Debug, Clone, Copy)]
pub(crate) enum AssignmentReason {
    Decision,
    Clause(ClauseReference),
    Propagator(PropagatorId),
}

#[derive(Debug, Clone, Copy)]
struct AssignmentInfo {
    truth_value: TruthValue,
    decision_level: u32,
    reason: AssignmentReason,
    trail_position: u32,
}

impl AssignmentInfo {
    fn unassigned() -> Self {
        AssignmentInfo {
            truth_value: TruthValue::Unassigned,
            decision_level: 0,
            reason: AssignmentReason::Decision,
            trail_position: 0,
        }
    }
}

/// the three-valued trail plus per-variable decision-level and
/// antecedent bookkeeping. Level 0 is the root level; assignments made there
/// are permanent for the lifetime of the (incremental) solver instance.
#[derive(Debug)]
pub(crate) struct AssignmentsPropositional {
    info: Vec<AssignmentInfo>,
    variable_info: Vec<VariableInfo>,
    trail: Vec<Literal>,
    /// `level_start[d]` is the trail index at which decision level `d` began.
    level_start: Vec<u32>,
    /// Last-assigned polarity per variable, replayed as the default decision
    /// polarity (phase saving) unless a user preference overrides it.
    saved_phase: Vec<bool>,
}

impl AssignmentsPropositional {
    pub(crate) fn new() -> Self {
        AssignmentsPropositional {
            info: vec![AssignmentInfo::unassigned()],
            variable_info: vec![VariableInfo::new(VariableType::AtomAndBody)],
            trail: Vec::new(),
            level_start: vec![0],
            saved_phase: vec![false],
        }
    }

    pub(crate) fn num_variables(&self) -> u32 {
        self.info.len() as u32 - 1
    }

    pub(crate) fn new_variable(&mut self, var_type: VariableType) -> PropositionalVariable {
        let index = self.info.len() as u32;
        self.info.push(AssignmentInfo::unassigned());
        self.variable_info.push(VariableInfo::new(var_type));
        self.saved_phase.push(false);
        PropositionalVariable::new(index)
    }

    pub(crate) fn variable_info(&self, variable: PropositionalVariable) -> &VariableInfo {
        &self.variable_info[variable.index() as usize]
    }

    pub(crate) fn variable_info_mut(&mut self, variable: PropositionalVariable) -> &mut VariableInfo {
        &mut self.variable_info[variable.index() as usize]
    }

    pub(crate) fn current_decision_level(&self) -> u32 {
        self.level_start.len() as u32 - 1
    }

    pub(crate) fn num_trail_entries(&self) -> u32 {
        self.trail.len() as u32
    }

    pub(crate) fn trail(&self) -> &[Literal] {
        &self.trail
    }

    pub(crate) fn get_trail_entry(&self, position: u32) -> Literal {
        self.trail[position as usize]
    }

    fn info_of(&self, literal: Literal) -> &AssignmentInfo {
        &self.info[literal.get_propositional_variable().index() as usize]
    }

    pub(crate) fn is_true(&self, literal: Literal) -> bool {
        let info = self.info_of(literal);
        match info.truth_value {
            TruthValue::Unassigned => false,
            TruthValue::True => literal.is_positive(),
            TruthValue::False => literal.is_negative(),
        }
    }

    pub(crate) fn is_false(&self, literal: Literal) -> bool {
        let info = self.info_of(literal);
        match info.truth_value {
            TruthValue::Unassigned => false,
            TruthValue::True => literal.is_negative(),
            TruthValue::False => literal.is_positive(),
        }
    }

    pub(crate) fn is_assigned(&self, literal: Literal) -> bool {
        self.info_of(literal).truth_value.is_assigned()
    }

    pub(crate) fn truth_value(&self, variable: PropositionalVariable) -> TruthValue {
        self.info[variable.index() as usize].truth_value
    }

    pub(crate) fn decision_level_of(&self, literal: Literal) -> Option<u32> {
        let info = self.info_of(literal);
        info.truth_value.is_assigned().then_some(info.decision_level)
    }

    pub(crate) fn trail_position_of(&self, literal: Literal) -> Option<u32> {
        let info = self.info_of(literal);
        info.truth_value.is_assigned().then_some(info.trail_position)
    }

    pub(crate) fn reason_of(&self, literal: Literal) -> AssignmentReason {
        self.info_of(literal).reason
    }

    pub(crate) fn is_decision(&self, literal: Literal) -> bool {
        matches!(self.reason_of(literal), AssignmentReason::Decision)
    }

    /// Opens a new decision level and forces `literal` true at it. Returns
    /// `false` if `literal` is already false (a root-incompatible decision).
    pub(crate) fn assume(&mut self, literal: Literal) -> bool {
        self.level_start.push(self.trail.len() as u32);
        self.enqueue(literal, AssignmentReason::Decision)
    }

    /// Forces `literal` true at the current decision level with the given
    /// antecedent. Returns `false` if `literal` is already false (conflict).
    pub(crate) fn enqueue(&mut self, literal: Literal, reason: AssignmentReason) -> bool {
        if self.is_false(literal) {
            return false;
        }
        if self.is_true(literal) {
            return true;
        }

        let variable = literal.get_propositional_variable();
        let decision_level = self.current_decision_level();
        let trail_position = self.trail.len() as u32;
        self.info[variable.index() as usize] = AssignmentInfo {
            truth_value: if literal.is_positive() {
                TruthValue::True
            } else {
                TruthValue::False
            },
            decision_level,
            reason,
            trail_position,
        };
        self.trail.push(literal);
        true
    }

    /// Rewinds the trail to the end of decision level `level`, restoring
    /// each unassigned variable's saved phase and invoking `on_undo` for
    /// every literal that is rewound (most-recent first), so constraints can
    /// react (e.g. watch-list reinsertion, post-propagator `undoLevel`).
    pub(crate) fn undo_until(&mut self, level: u32, mut on_undo: impl FnMut(Literal)) {
        solver_assert_simple!(level <= self.current_decision_level());
        if level == self.current_decision_level() {
            return;
        }
        let new_trail_len = self.level_start[(level + 1) as usize] as usize;
        while self.trail.len() > new_trail_len {
            let literal = self.trail.pop().expect("trail should not be empty here");
            let variable = literal.get_propositional_variable();
            self.saved_phase[variable.index() as usize] = literal.is_positive();
            self.info[variable.index() as usize] = AssignmentInfo::unassigned();
            on_undo(literal);
        }
        self.level_start.truncate((level + 1) as usize);
        solver_assert_moderate!(self.current_decision_level() == level);
    }

    pub(crate) fn preferred_polarity(&self, variable: PropositionalVariable) -> bool {
        let info = &self.variable_info[variable.index() as usize];
        match info.preferred_value {
            PreferredValue::User(b) => b,
            PreferredValue::Saved(b) => b,
            PreferredValue::Default => self.saved_phase[variable.index() as usize],
        }
    }

    pub(crate) fn is_root_assignment(&self, literal: Literal) -> bool {
        self.decision_level_of(literal) == Some(0)
    }

    pub(crate) fn num_variables_with_decision(&self) -> u32 {
        self.level_start.len() as u32 - 1
    }
}

impl Default for AssignmentsPropositional {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(assignments: &mut AssignmentsPropositional, positive: bool) -> Literal {
        let var = assignments.new_variable(VariableType::Atom);
        Literal::new(var, positive)
    }

    #[test]
    fn enqueue_and_query() {
        let mut assignments = AssignmentsPropositional::new();
        let a = lit(&mut assignments, true);
        assert!(assignments.enqueue(a, AssignmentReason::Decision));
        assert!(assignments.is_true(a));
        assert!(assignments.is_false(!a));
    }

    #[test]
    fn conflicting_enqueue_fails() {
        let mut assignments = AssignmentsPropositional::new();
        let a = lit(&mut assignments, true);
        assert!(assignments.enqueue(a, AssignmentReason::Decision));
        assert!(!assignments.enqueue(!a, AssignmentReason::Decision));
    }

    #[test]
    fn undo_until_clears_trail_and_restores_phase() {
        let mut assignments = AssignmentsPropositional::new();
        let a = lit(&mut assignments, true);
        let b = lit(&mut assignments, true);
        assert!(assignments.assume(a));
        assert!(assignments.assume(b));
        assert_eq!(assignments.current_decision_level(), 2);

        let mut undone = Vec::new();
        assignments.undo_until(0, |l| undone.push(l));

        assert_eq!(assignments.current_decision_level(), 0);
        assert!(!assignments.is_assigned(a));
        assert!(!assignments.is_assigned(b));
        assert_eq!(undone, vec![b, a]);
        assert!(assignments.preferred_polarity(a.get_propositional_variable()));
    }

    #[test]
    fn root_level_assignment_is_permanent_marker() {
        let mut assignments = AssignmentsPropositional::new();
        let a = lit(&mut assignments, true);
        assert!(assignments.enqueue(a, AssignmentReason::Decision));
        assert!(assignments.is_root_assignment(a));
    }
}
