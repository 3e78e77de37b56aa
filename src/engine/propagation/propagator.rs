use crate::basic_types::{Literal, PropagationStatusPostPropagator};

use super::propagation_context::{PropagationContext, PropagationContextMut};

/// The post-propagator contract: every collaborator that sits above
/// the clausal propagator in priority order (unfounded-set checking,
/// lookahead, theory reasoning, enumeration, minimize) implements this.
pub(crate) trait PostPropagator {
    fn name(&self) -> &str;

    /// Constant priority used to order post-propagators; lower runs first.
    /// Unit propagation itself is priority 0 and is not a `PostPropagator`.
    fn priority(&self) -> u32;

    /// Called once after `end_init`. May immediately detect a conflict if
    /// the static structure of the problem is already unsatisfiable.
    fn init(&mut self, context: &mut PropagationContextMut) -> Result<(), Vec<Literal>>;

    /// Runs to a local fixpoint given the current trail; pushes any forced
    /// literals through `context` before returning.
    fn propagate(&mut self, context: &mut PropagationContextMut) -> PropagationStatusPostPropagator;

    /// Returns the falsified literals that justify a literal this
    /// propagator previously forced.
    fn reason(&self, literal: Literal, context: &PropagationContext) -> Vec<Literal>;

    /// Called when a decision level this propagator registered interest in
    /// is being rewound.
    fn undo_level(&mut self, context: &PropagationContext);

    /// Final consistency check run once unit propagation and every
    /// post-propagator has reached a fixpoint with no pending work; a
    /// candidate model is only accepted once every post-propagator returns
    /// `NoConflict` here without being given the chance to push further
    /// literals (e.g. the non-HCF minimality check).
    fn is_model(&mut self, context: &mut PropagationContextMut) -> PropagationStatusPostPropagator {
        self.propagate(context)
    }
}

/// Priority constants fixing the total post-propagator order: unit
/// propagation (not a `PostPropagator`) is implicitly `0`; everything else
/// is ordered relative to these bands.
pub(crate) mod priority {
    /// Weight-rule body constraints resolve before anything that depends
    /// on the body literal's truth (the unfounded-set checker reads body
    /// literals as supports), so they run below `THEORY`.
    pub(crate) const WEIGHT_BODY: u32 = 50;
    pub(crate) const THEORY: u32 = 100;
    pub(crate) const UNFOUNDED_SET: u32 = 200;
    pub(crate) const MINIMIZE: u32 = 250;
    pub(crate) const ENUMERATION: u32 = 300;
    pub(crate) const LOOKAHEAD: u32 = 1_000;
}
