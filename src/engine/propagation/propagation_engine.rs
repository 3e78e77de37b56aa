use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::propagation_context::{PropagationContext, PropagationContextMut};
use super::propagator::PostPropagator;
use crate::basic_types::{Literal, PropagatorId};
use crate::engine::assignments::{AssignmentReason, AssignmentsPropositional};
use crate::engine::sat::{ClauseAllocator, ClausalPropagator};

/// Outcome of a call to [`PropagationEngine::propagate`].
#[derive(Debug)]
pub(crate) enum EngineConflict {
    /// A watched clause is fully falsified; see the clausal propagator.
    Clausal(crate::basic_types::ClauseReference),
    /// A post-propagator reported a falsified conjunction directly.
    PostPropagator(Vec<Literal>),
    /// The cooperative termination flag was observed at a suspension point.
    Terminated,
}

/// drives unit propagation to a fixpoint, then invokes
/// post-propagators in ascending priority order, re-entering unit
/// propagation whenever one of them makes an assignment.
pub(crate) struct PropagationEngine {
    clausal_propagator: ClausalPropagator,
    post_propagators: Vec<Box<dyn PostPropagator>>,
    propagated_trail_index: u32,
    terminate: Arc<AtomicBool>,
}

impl PropagationEngine {
    pub(crate) fn new(terminate: Arc<AtomicBool>) -> Self {
        PropagationEngine {
            clausal_propagator: ClausalPropagator::new(),
            post_propagators: Vec::new(),
            propagated_trail_index: 0,
            terminate,
        }
    }

    pub(crate) fn clausal_propagator(&mut self) -> &mut ClausalPropagator {
        &mut self.clausal_propagator
    }

    /// Registers a post-propagator, returning the id it will be referenced
    /// by in antecedents. Post-propagators must be registered before
    /// `end_init`; the engine keeps them sorted by priority.
    pub(crate) fn register_post_propagator(
        &mut self,
        post_propagator: Box<dyn PostPropagator>,
    ) -> PropagatorId {
        let id = PropagatorId(self.post_propagators.len() as u32);
        self.post_propagators.push(post_propagator);
        self.post_propagators
            .sort_by_key(|propagator| propagator.priority());
        id
    }

    pub(crate) fn init_post_propagators(
        &mut self,
        assignments: &mut AssignmentsPropositional,
    ) -> Result<(), Vec<Literal>> {
        for (index, post_propagator) in self.post_propagators.iter_mut().enumerate() {
            let mut context = PropagationContextMut::new(assignments, PropagatorId(index as u32));
            post_propagator.init(&mut context)?;
        }
        Ok(())
    }

    pub(crate) fn notify_backtrack(&mut self, assignments: &AssignmentsPropositional) {
        self.propagated_trail_index = self.propagated_trail_index.min(assignments.num_trail_entries());
        let context = PropagationContext::new(assignments);
        for post_propagator in self.post_propagators.iter_mut() {
            post_propagator.undo_level(&context);
        }
    }

    pub(crate) fn reason_for_propagator(
        &self,
        propagator_id: PropagatorId,
        literal: Literal,
        assignments: &AssignmentsPropositional,
    ) -> Vec<Literal> {
        let context = PropagationContext::new(assignments);
        self.post_propagators[propagator_id.0 as usize].reason(literal, &context)
    }

    fn drain_unit_propagation(
        &mut self,
        assignments: &mut AssignmentsPropositional,
        clause_allocator: &mut ClauseAllocator,
    ) -> Option<EngineConflict> {
        while self.propagated_trail_index < assignments.num_trail_entries() {
            let literal = assignments.get_trail_entry(self.propagated_trail_index);
            self.propagated_trail_index += 1;

            let status = self.clausal_propagator.propagate_literal_false(
                !literal,
                assignments,
                clause_allocator,
            );
            if status.is_conflict() {
                let crate::basic_types::PropagationStatus::Conflict(reference) = status else {
                    unreachable!()
                };
                return Some(EngineConflict::Clausal(reference));
            }
        }
        None
    }

    /// Runs propagation to a full fixpoint: see Suspension points are
    /// only between queue-drains and between post-propagators.
    pub(crate) fn propagate(
        &mut self,
        assignments: &mut AssignmentsPropositional,
        clause_allocator: &mut ClauseAllocator,
    ) -> Option<EngineConflict> {
        loop {
            if let Some(conflict) = self.drain_unit_propagation(assignments, clause_allocator) {
                return Some(conflict);
            }

            if self.terminate.load(Ordering::Relaxed) {
                return Some(EngineConflict::Terminated);
            }

            let mut made_progress = false;
            for index in 0..self.post_propagators.len() {
                let before = assignments.num_trail_entries();
                let conflict = {
                    let mut context = PropagationContextMut::new(assignments, PropagatorId(index as u32));
                    self.post_propagators[index].propagate(&mut context)
                };
                if let crate::basic_types::PropagationStatusPostPropagator::Conflict(literals) = conflict {
                    return Some(EngineConflict::PostPropagator(literals));
                }
                if assignments.num_trail_entries() > before {
                    made_progress = true;
                    break;
                }
            }

            if !made_progress {
                return None;
            }
        }
    }

    /// Checks that every post-propagator accepts the current trail as a
    /// model; called once unit propagation and the fixpoint loop above both
    /// settle with no pending work.
    pub(crate) fn is_model(
        &mut self,
        assignments: &mut AssignmentsPropositional,
    ) -> Option<EngineConflict> {
        for index in 0..self.post_propagators.len() {
            let mut context = PropagationContextMut::new(assignments, PropagatorId(index as u32));
            if let crate::basic_types::PropagationStatusPostPropagator::Conflict(literals) =
                self.post_propagators[index].is_model(&mut context)
            {
                return Some(EngineConflict::PostPropagator(literals));
            }
        }
        None
    }
}
