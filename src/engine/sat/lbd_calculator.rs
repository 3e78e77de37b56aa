use crate::basic_types::{FnvSet, Literal};
use crate::engine::assignments::AssignmentsPropositional;

/// Literal Block Distance: the number of distinct decision levels among a
/// clause's literals at the moment it is learnt. A clause that is unit
/// after learning has LBD 1.
pub(crate) fn calculate_lbd(clause: &[Literal], assignments: &AssignmentsPropositional) -> usize {
    let mut levels: FnvSet<u32> = FnvSet::default();
    for &literal in clause {
        if let Some(level) = assignments.decision_level_of(literal) {
            let _ = levels.insert(level);
        }
    }
    levels.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::VariableType;
    use crate::engine::assignments::AssignmentReason;

    #[test]
    fn counts_distinct_levels_only() {
        let mut assignments = AssignmentsPropositional::new();
        let a = Literal::new(assignments.new_variable(VariableType::Atom), true);
        let b = Literal::new(assignments.new_variable(VariableType::Atom), true);
        let c = Literal::new(assignments.new_variable(VariableType::Atom), true);

        assert!(assignments.assume(a));
        assert!(assignments.enqueue(b, AssignmentReason::Decision));
        assert!(assignments.assume(c));

        let lbd = calculate_lbd(&[a, b, c], &assignments);
        assert_eq!(lbd, 2);
    }

    #[test]
    fn unassigned_literals_do_not_count() {
        let mut assignments = AssignmentsPropositional::new();
        let a = Literal::new(assignments.new_variable(VariableType::Atom), true);
        let b = Literal::new(assignments.new_variable(VariableType::Atom), true);
        assert!(assignments.assume(a));
        assert_eq!(calculate_lbd(&[a, b], &assignments), 1);
    }
}
