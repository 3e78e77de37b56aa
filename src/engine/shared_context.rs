use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::basic_types::{ClauseReference, ConstraintOperationError, Literal, PropagatorId, VariableType};
use crate::engine::assignments::AssignmentsPropositional;
use crate::engine::propagation::{PostPropagator, PropagationEngine};
use crate::engine::sat::ClauseAllocator;

/// Owns the problem once it is loaded — variables, the static
/// clause database, the symbol table, and the frozen/unfrozen lifecycle
/// that bounds structural mutation. The learnt-clause database and the
/// decision heuristic are owned by [`crate::engine::Search`] instead,
/// since they are search-time rather than problem-time state.
#[derive(Debug)]
pub(crate) struct SharedContext {
    pub(crate) assignments: AssignmentsPropositional,
    pub(crate) clause_allocator: ClauseAllocator,
    pub(crate) engine: PropagationEngine,
    pub(crate) symbol_table: crate::engine::SymbolTable,
    frozen: bool,
    terminate: Arc<AtomicBool>,
}

impl SharedContext {
    pub(crate) fn new() -> Self {
        let terminate = Arc::new(AtomicBool::new(false));
        SharedContext {
            assignments: AssignmentsPropositional::new(),
            clause_allocator: ClauseAllocator::new(),
            engine: PropagationEngine::new(Arc::clone(&terminate)),
            symbol_table: crate::engine::SymbolTable::new(),
            frozen: false,
            terminate,
        }
    }

    pub(crate) fn terminate_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.terminate)
    }

    /// Requests cooperative termination: observed at the next
    /// propagation suspension point, not immediately.
    pub(crate) fn request_terminate(&self) {
        self.terminate.store(true, Ordering::Relaxed);
    }

    pub(crate) fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Marker call preceding a batch of `addVar`/`addClause`/`addRule`
    /// calls; exists so the facade's incremental lifecycle has a symmetric
    /// "start...end" pair even though this implementation needs no extra
    /// bookkeeping at the start of a batch.
    pub(crate) fn start_add_constraints(&mut self) -> Result<(), ConstraintOperationError> {
        if self.frozen {
            return Err(ConstraintOperationError::MutationAfterEndInit);
        }
        Ok(())
    }

    pub(crate) fn add_var(&mut self, var_type: VariableType) -> crate::basic_types::PropositionalVariable {
        self.assignments.new_variable(var_type)
    }

    /// Adds a clause to the static database, returning `Ok(true)` if it was
    /// added, `Ok(false)` if it was already satisfied at the root level (and
    /// so was discarded), or `Err` if it is already root-falsified (the
    /// problem is unsatisfiable).
    pub(crate) fn add_clause(&mut self, literals: Vec<Literal>) -> Result<bool, ConstraintOperationError> {
        if self.frozen {
            return Err(ConstraintOperationError::MutationAfterEndInit);
        }
        match self.engine.clausal_propagator().add_clause(
            literals,
            false,
            &self.assignments,
            &mut self.clause_allocator,
        ) {
            Ok(Some(ClauseReference::Binary(a, b))) if a == b => {
                if !self
                    .assignments
                    .enqueue(a, crate::engine::assignments::AssignmentReason::Decision)
                {
                    return Err(ConstraintOperationError::RootLevelConflict);
                }
                Ok(true)
            }
            Ok(Some(_)) => Ok(true),
            Ok(None) => Ok(false),
            Err(()) => Err(ConstraintOperationError::RootLevelConflict),
        }
    }

    pub(crate) fn register_post_propagator(
        &mut self,
        post_propagator: Box<dyn PostPropagator>,
    ) -> PropagatorId {
        self.engine.register_post_propagator(post_propagator)
    }

    /// Finalizes the problem: runs root-level unit propagation plus every
    /// post-propagator's `init` hook. After this, structural changes
    /// require [`SharedContext::unfreeze`].
    pub(crate) fn end_init(&mut self) -> Result<(), ConstraintOperationError> {
        if let Some(_conflict) = self
            .engine
            .propagate(&mut self.assignments, &mut self.clause_allocator)
        {
            return Err(ConstraintOperationError::RootLevelConflict);
        }
        if self
            .engine
            .init_post_propagators(&mut self.assignments)
            .is_err()
        {
            return Err(ConstraintOperationError::RootLevelConflict);
        }
        self.frozen = true;
        Ok(())
    }

    /// Reopens the problem for structural change (an incremental step,
    ///), requiring the solver to be at the root decision level.
    pub(crate) fn unfreeze(&mut self) -> Result<(), ConstraintOperationError> {
        if !self.frozen {
            return Err(ConstraintOperationError::UnfreezeBeforeFreeze);
        }
        self.frozen = false;
        Ok(())
    }
}

impl Default for SharedContext {
    fn default() -> Self {
        Self::new()
    }
}
