use crate::basic_types::{Literal, PropositionalVariable};
use crate::engine::assignments::AssignmentsPropositional;

/// Shared polymorphism point narrowed to what every variant
/// (BerkMin/VMTF/VSIDS/Domain/lookahead) actually needs to share.
pub(crate) trait Heuristic {
    fn on_new_variable(&mut self, variable: PropositionalVariable);

    /// Called for each variable resolved over during conflict analysis.
    fn bump_activity(&mut self, variable: PropositionalVariable);

    /// Called once per conflict, after all bumps for that conflict.
    fn on_conflict(&mut self);

    /// Called when a decision level is rewound, so heuristics that track
    /// per-level modifiers (e.g. `Domain`) can restore prior state.
    fn on_backtrack(&mut self, assignments: &AssignmentsPropositional, new_level: u32);

    /// Picks the next decision literal, or `None` if every variable is
    /// already assigned (a model has been found).
    fn next_decision(&mut self, assignments: &AssignmentsPropositional) -> Option<Literal>;
}
