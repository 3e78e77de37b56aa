//! model enumeration. Drives what happens after the search
//! loop accepts a model — stop, block it and look for another, or just set
//! a cheaper backtrack floor — and folds in the minimize constraint's bound
//! tightening so both concerns live behind a single registered
//! post-propagator.

use crate::basic_types::{FnvSet, Literal, PropagationStatusPostPropagator, PropositionalVariable};
use crate::engine::propagation::{priority, PostPropagator, PropagationContext, PropagationContextMut};
use crate::engine::search::{ModelAction, SearchObserver};
use crate::engine::SharedContext;
use crate::minimize::MinimizeConstraint;
use crate::options::{EnumerationMode, EnumerationOptions, OptimizationMode};

/// Owns the enumeration strategy plus (optionally) the
/// minimize constraint that co-operates with it; both are registered as a
/// single post-propagator so bound tightening and model blocking stay
/// ordered with respect to each other.
#[derive(Debug)]
pub(crate) struct Enumerator {
    options: EnumerationOptions,
    minimize: Option<MinimizeConstraint>,
    projection: Vec<PropositionalVariable>,
    /// Learnt once a model is recorded: the negation of that model's
    /// projected literals, checked like a generic clause on every call.
    blocking_clauses: Vec<Vec<Literal>>,
    models_found: u64,
    /// The decision level assumptions occupy; backtracking never goes below
    /// this so a fresh `solve` call with different assumptions is free to
    /// rebuild the branch from the assumptions down.
    assumption_level: u32,
    /// Literals true in at least one committed model (brave consequences).
    brave: FnvSet<Literal>,
    /// Literals true in every committed model so far (cautious
    /// consequences); `None` until the first model narrows it.
    cautious: Option<FnvSet<Literal>>,
}

impl Enumerator {
    pub(crate) fn new(options: EnumerationOptions, minimize: Option<MinimizeConstraint>) -> Self {
        let projection = options
            .projection
            .iter()
            .map(|&index| PropositionalVariable::new(index))
            .collect();
        Enumerator {
            options,
            minimize,
            projection,
            blocking_clauses: Vec::new(),
            models_found: 0,
            assumption_level: 0,
            brave: FnvSet::default(),
            cautious: None,
        }
    }

    pub(crate) fn set_assumption_level(&mut self, level: u32) {
        self.assumption_level = level;
    }

    pub(crate) fn models_found(&self) -> u64 {
        self.models_found
    }

    /// The lexicographic cost vector of the most recently committed model,
    /// if a minimize statement is active.
    pub(crate) fn current_cost(&self) -> Option<&[i64]> {
        self.minimize.as_ref().map(MinimizeConstraint::current_cost)
    }

    pub(crate) fn brave_consequences(&self) -> Vec<Literal> {
        self.brave.iter().copied().collect()
    }

    pub(crate) fn cautious_consequences(&self) -> Vec<Literal> {
        self.cautious
            .as_ref()
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    fn optimizing(&self) -> bool {
        self.minimize.is_some() && !matches!(self.options.optimization_mode, OptimizationMode::Ignore)
    }

    fn model_limit_reached(&self) -> bool {
        self.options
            .model_limit
            .map_or(false, |limit| self.models_found >= limit)
    }

    fn candidate_variables(&self, context: &SharedContext) -> Vec<PropositionalVariable> {
        if !self.projection.is_empty() {
            return self.projection.clone();
        }
        (1..=context.assignments.num_variables())
            .map(PropositionalVariable::new)
            .collect()
    }

    /// The model's truth assignment restricted to the projecting (or, with
    /// no projection, every) variable.
    fn model_literals(&self, context: &SharedContext) -> Vec<Literal> {
        self.candidate_variables(context)
            .into_iter()
            .filter(|&variable| context.assignments.truth_value(variable).is_assigned())
            .map(|variable| Literal::new(variable, context.assignments.is_true(Literal::new(variable, true))))
            .collect()
    }

    fn block_current_model(&mut self, context: &SharedContext) {
        let blocking = self.model_literals(context).iter().map(|&literal| !literal).collect();
        self.blocking_clauses.push(blocking);
    }

    fn update_brave(&mut self, context: &SharedContext) {
        self.brave.extend(self.model_literals(context));
    }

    fn update_cautious(&mut self, context: &SharedContext) {
        let current: FnvSet<Literal> = self.model_literals(context).into_iter().collect();
        self.cautious = Some(match self.cautious.take() {
            Some(previous) => previous.intersection(&current).copied().collect(),
            None => current,
        });
    }

    /// The highest decision above the assumption level whose branching
    /// variable is one of the projecting variables (or, with no
    /// projection, the highest decision at all). Literals at or below
    /// `assumption_level` were pushed by `solve`'s own assumptions and must
    /// never be the ones flipped here.
    fn highest_projecting_decision(&self, context: &SharedContext) -> Option<Literal> {
        let projecting: FnvSet<PropositionalVariable> = self.projection.iter().copied().collect();
        context.assignments.trail().iter().rev().copied().find(|&literal| {
            context.assignments.is_decision(literal)
                && context
                    .assignments
                    .decision_level_of(literal)
                    .map_or(false, |level| level > self.assumption_level)
                && (self.projection.is_empty() || projecting.contains(&literal.get_propositional_variable()))
        })
    }

    /// Rewinds past the highest projecting decision and re-asserts it with
    /// the opposite polarity, without adding a persistent blocking clause.
    /// Falls back to `Record`-style blocking if no projecting decision
    /// remains on the trail (every projecting variable was propagated, not
    /// branched on, so there is no branch left to flip).
    fn apply_backtrack_floor(&mut self, context: &mut SharedContext) -> ModelAction {
        match self.highest_projecting_decision(context) {
            Some(decision_literal) => {
                let level = context
                    .assignments
                    .decision_level_of(decision_literal)
                    .expect("a trail literal is always assigned");
                context.assignments.undo_until(level - 1, |_| {});
                context.engine.notify_backtrack(&context.assignments);
                context.assignments.assume(!decision_literal);
                ModelAction::ContinueAfterBacktrackTo(context.assignments.current_decision_level())
            }
            None => {
                self.block_current_model(context);
                ModelAction::ContinueAfterBacktrackTo(self.assumption_level)
            }
        }
    }

    fn propagate_blocking(&mut self, context: &mut PropagationContextMut) -> PropagationStatusPostPropagator {
        for clause in &self.blocking_clauses {
            let mut unassigned_literal = None;
            let mut satisfied = false;
            for &literal in clause {
                if context.is_true(literal) {
                    satisfied = true;
                    break;
                }
                if !context.is_false(literal) {
                    if unassigned_literal.is_some() {
                        unassigned_literal = None;
                        break;
                    }
                    unassigned_literal = Some(literal);
                }
            }
            if satisfied {
                continue;
            }
            match unassigned_literal {
                Some(literal) => {
                    if !context.enqueue(literal) {
                        let reason = clause.iter().filter(|&&other| other != literal).map(|&other| !other).collect();
                        return PropagationStatusPostPropagator::Conflict(reason);
                    }
                }
                None if clause.iter().all(|&literal| context.is_false(literal)) => {
                    let reason = clause.iter().map(|&literal| !literal).collect();
                    return PropagationStatusPostPropagator::Conflict(reason);
                }
                None => {}
            }
        }
        PropagationStatusPostPropagator::NoConflict
    }
}

impl SearchObserver for Enumerator {
    fn on_model(&mut self, context: &mut SharedContext) -> ModelAction {
        if let Some(minimize) = &mut self.minimize {
            minimize.commit_model(&PropagationContext::new(&context.assignments));
        }
        self.models_found += 1;

        match self.options.mode {
            EnumerationMode::Null => {
                if self.optimizing() {
                    self.block_current_model(context);
                    ModelAction::ContinueAfterBacktrackTo(self.assumption_level)
                } else {
                    ModelAction::Stop
                }
            }
            EnumerationMode::Record => {
                if !self.optimizing() && self.model_limit_reached() {
                    ModelAction::Stop
                } else {
                    self.block_current_model(context);
                    ModelAction::ContinueAfterBacktrackTo(self.assumption_level)
                }
            }
            EnumerationMode::Backtrack => {
                if !self.optimizing() && self.model_limit_reached() {
                    ModelAction::Stop
                } else {
                    self.apply_backtrack_floor(context)
                }
            }
            EnumerationMode::Brave => {
                self.update_brave(context);
                if !self.optimizing() && self.model_limit_reached() {
                    ModelAction::Stop
                } else {
                    self.block_current_model(context);
                    ModelAction::ContinueAfterBacktrackTo(self.assumption_level)
                }
            }
            EnumerationMode::Cautious => {
                self.update_cautious(context);
                if !self.optimizing() && self.model_limit_reached() {
                    ModelAction::Stop
                } else {
                    self.block_current_model(context);
                    ModelAction::ContinueAfterBacktrackTo(self.assumption_level)
                }
            }
        }
    }
}

impl PostPropagator for Enumerator {
    fn name(&self) -> &str {
        "enumeration"
    }

    fn priority(&self) -> u32 {
        priority::ENUMERATION
    }

    fn init(&mut self, context: &mut PropagationContextMut) -> Result<(), Vec<Literal>> {
        if let Some(minimize) = &mut self.minimize {
            minimize.init(context)?;
        }
        match self.propagate_blocking(context) {
            PropagationStatusPostPropagator::NoConflict => Ok(()),
            PropagationStatusPostPropagator::Conflict(reason) => Err(reason),
        }
    }

    fn propagate(&mut self, context: &mut PropagationContextMut) -> PropagationStatusPostPropagator {
        if let Some(minimize) = &mut self.minimize {
            if let PropagationStatusPostPropagator::Conflict(reason) = minimize.propagate(context) {
                return PropagationStatusPostPropagator::Conflict(reason);
            }
        }
        self.propagate_blocking(context)
    }

    fn reason(&self, literal: Literal, context: &PropagationContext) -> Vec<Literal> {
        if let Some(minimize) = &self.minimize {
            if minimize.forces(literal) {
                return minimize.reason(literal, context);
            }
        }
        self.blocking_clauses
            .iter()
            .find(|clause| clause.contains(&literal))
            .map(|clause| clause.iter().filter(|&&other| other != literal).map(|&other| !other).collect())
            .unwrap_or_default()
    }

    fn undo_level(&mut self, context: &PropagationContext) {
        if let Some(minimize) = &mut self.minimize {
            minimize.undo_level(context);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::{PropagatorId, VariableType};

    fn assume_all(context: &mut SharedContext, literals: &[Literal]) {
        for &literal in literals {
            assert!(context.assignments.assume(literal));
        }
    }

    #[test]
    fn record_mode_blocks_the_exact_model_it_saw() {
        let mut context = SharedContext::new();
        let a = Literal::new(context.assignments.new_variable(VariableType::Atom), true);
        let b = Literal::new(context.assignments.new_variable(VariableType::Atom), true);

        let options = EnumerationOptions {
            mode: EnumerationMode::Record,
            optimization_mode: OptimizationMode::Ignore,
            projection: Vec::new(),
            model_limit: None,
        };
        let mut enumerator = Enumerator::new(options, None);

        assume_all(&mut context, &[a, b]);
        let action = enumerator.on_model(&mut context);
        assert!(matches!(action, ModelAction::ContinueAfterBacktrackTo(0)));

        context.assignments.undo_until(0, |_| {});
        assume_all(&mut context, &[a, b]);
        let mut propagation_context = crate::engine::propagation::PropagationContextMut::new(
            &mut context.assignments,
            PropagatorId(0),
        );
        let status = enumerator.propagate(&mut propagation_context);
        assert!(matches!(status, PropagationStatusPostPropagator::Conflict(_)));
    }

    #[test]
    fn null_mode_without_optimization_stops_after_first_model() {
        let mut context = SharedContext::new();
        let a = Literal::new(context.assignments.new_variable(VariableType::Atom), true);
        let options = EnumerationOptions::default();
        let mut enumerator = Enumerator::new(options, None);

        assume_all(&mut context, &[a]);
        let action = enumerator.on_model(&mut context);
        assert!(matches!(action, ModelAction::Stop));
        assert_eq!(enumerator.models_found(), 1);
    }

    #[test]
    fn brave_consequences_accumulate_across_models() {
        let mut context = SharedContext::new();
        let a = Literal::new(context.assignments.new_variable(VariableType::Atom), true);
        let b = Literal::new(context.assignments.new_variable(VariableType::Atom), true);

        let options = EnumerationOptions {
            mode: EnumerationMode::Brave,
            optimization_mode: OptimizationMode::Ignore,
            projection: Vec::new(),
            model_limit: None,
        };
        let mut enumerator = Enumerator::new(options, None);

        assume_all(&mut context, &[a, !b]);
        enumerator.on_model(&mut context);
        context.assignments.undo_until(0, |_| {});

        assume_all(&mut context, &[!a, b]);
        enumerator.on_model(&mut context);

        let brave = enumerator.brave_consequences();
        assert!(brave.contains(&a));
        assert!(brave.contains(&b));
    }
}
