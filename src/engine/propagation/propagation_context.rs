use crate::basic_types::{Literal, PropagatorId};
use crate::engine::assignments::{AssignmentReason, AssignmentsPropositional};

/// Read-only view handed to a post-propagator's `reason`/`undo_level` hooks.
pub(crate) struct PropagationContext<'a> {
    pub(crate) assignments: &'a AssignmentsPropositional,
}

impl<'a> PropagationContext<'a> {
    pub(crate) fn new(assignments: &'a AssignmentsPropositional) -> Self {
        PropagationContext { assignments }
    }

    pub(crate) fn is_true(&self, literal: Literal) -> bool {
        self.assignments.is_true(literal)
    }

    pub(crate) fn is_false(&self, literal: Literal) -> bool {
        self.assignments.is_false(literal)
    }

    pub(crate) fn is_assigned(&self, literal: Literal) -> bool {
        self.assignments.is_assigned(literal)
    }
}

/// Read-write view handed to a post-propagator's `init`/`propagate` hooks.
/// `enqueue` stamps the forced literal with this propagator's id so that the
/// engine can later route `reason(lit)` back to it.
pub(crate) struct PropagationContextMut<'a> {
    pub(crate) assignments: &'a mut AssignmentsPropositional,
    propagator_id: PropagatorId,
}

impl<'a> PropagationContextMut<'a> {
    pub(crate) fn new(assignments: &'a mut AssignmentsPropositional, propagator_id: PropagatorId) -> Self {
        PropagationContextMut {
            assignments,
            propagator_id,
        }
    }

    pub(crate) fn is_true(&self, literal: Literal) -> bool {
        self.assignments.is_true(literal)
    }

    pub(crate) fn is_false(&self, literal: Literal) -> bool {
        self.assignments.is_false(literal)
    }

    /// Forces `literal` true with this propagator as antecedent. Returns
    /// `false` if `literal` was already false (conflict).
    pub(crate) fn enqueue(&mut self, literal: Literal) -> bool {
        self.assignments
            .enqueue(literal, AssignmentReason::Propagator(self.propagator_id))
    }

    pub(crate) fn as_read_only(&self) -> PropagationContext {
        PropagationContext {
            assignments: self.assignments,
        }
    }
}
