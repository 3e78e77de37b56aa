//! The CDCL search loop. Drives decide → propagate → analyze →
//! backjump → (reduce/restart) to either a model or a proof of
//! unsatisfiability, threading propagation, conflict analysis, the
//! decision heuristic and the learnt-clause database against a
//! [`SharedContext`].

use std::collections::VecDeque;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::basic_types::{ClauseReference, Literal, PropositionalVariable};
use crate::branching::{build_heuristic, Heuristic};
use crate::diagnostics::{Event, Logger, Subsystem};
use crate::engine::assignments::AssignmentReason;
use crate::engine::conflict_analysis::{analyze_conflict, ConflictAnalysisContext};
use crate::engine::propagation::EngineConflict;
use crate::engine::{LearntDb, SharedContext};
use crate::options::{RestartSchedule, SolverOptions};

/// Resource ceilings for a single bounded call to [`Search::solve`]. `None`
/// means unbounded. `memory_literals` approximates the learnt database's
/// soft memory ceiling by the total literal count currently held by
/// allocated learnt clauses.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SearchLimits {
    pub(crate) conflicts: Option<u64>,
    pub(crate) memory_literals: Option<u64>,
}

/// Outcome of a bounded call to [`Search::solve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchOutcome {
    Satisfiable,
    Unsatisfiable,
    /// The cooperative termination flag was observed mid-search.
    Interrupted,
    /// The conflict budget passed to `solve` was used up before a model or
    /// a proof of unsatisfiability was reached.
    ConflictLimitReached,
    /// The learnt database's approximate memory footprint exceeded the
    /// configured ceiling.
    MemoryLimitReached,
}

/// What an enumerator wants done after a model is accepted:
/// either stop search entirely, or it has already asserted whatever
/// blocking constraint/bound tightening it needs directly against the
/// shared context, and search should simply backtrack to `level` and
/// resume propagating.
pub(crate) enum ModelAction {
    Stop,
    ContinueAfterBacktrackTo(u32),
}

/// Callback invoked by [`Search::solve`] every time a full, post-propagator
/// accepted model is found. Implemented by [`crate::enumerate`]'s
/// enumerators; kept here rather than imported from there to avoid a
/// dependency cycle (search owns the loop, enumerate owns policy).
pub(crate) trait SearchObserver {
    fn on_model(&mut self, context: &mut SharedContext) -> ModelAction;
}

/// Turns every conflict-count-based restart policy into the same
/// `should_restart`/`notify_restart` shape so the search loop does not need
/// to know which one is active.
#[derive(Debug)]
struct RestartScheduler {
    schedule: RestartSchedule,
    conflicts_since_restart: u64,
    luby_index: u64,
    geometric_bound: u64,
    fast_window: VecDeque<u32>,
    slow_window: VecDeque<u32>,
}

impl RestartScheduler {
    fn new(schedule: RestartSchedule) -> Self {
        let geometric_bound = match schedule {
            RestartSchedule::Geometric { base, .. } => base.max(1),
            _ => 0,
        };
        RestartScheduler {
            schedule,
            conflicts_since_restart: 0,
            luby_index: 0,
            geometric_bound,
            fast_window: VecDeque::new(),
            slow_window: VecDeque::new(),
        }
    }

    fn record_conflict(&mut self, lbd: u32) {
        self.conflicts_since_restart += 1;
        if let RestartSchedule::DynamicLbd { fast_window, slow_window, .. } = self.schedule {
            push_bounded(&mut self.fast_window, lbd, fast_window);
            push_bounded(&mut self.slow_window, lbd, slow_window);
        }
    }

    fn should_restart(&self) -> bool {
        match self.schedule {
            RestartSchedule::Geometric { .. } => self.conflicts_since_restart >= self.geometric_bound,
            RestartSchedule::Luby { unit } => {
                self.conflicts_since_restart >= unit * luby_units(self.luby_index)
            }
            RestartSchedule::DynamicLbd { fast_window, slow_window, k } => {
                self.fast_window.len() >= fast_window
                    && self.slow_window.len() >= slow_window
                    && mean(&self.fast_window) > k * mean(&self.slow_window)
            }
        }
    }

    fn notify_restart(&mut self) {
        self.conflicts_since_restart = 0;
        match self.schedule {
            RestartSchedule::Geometric { factor, .. } => {
                self.geometric_bound = ((self.geometric_bound as f64) * factor).max(1.0) as u64;
            }
            RestartSchedule::Luby { .. } => {
                self.luby_index += 1;
            }
            RestartSchedule::DynamicLbd { .. } => {
                self.fast_window.clear();
            }
        }
    }
}

fn push_bounded(window: &mut VecDeque<u32>, value: u32, cap: usize) {
    window.push_back(value);
    if window.len() > cap {
        window.pop_front();
    }
}

fn mean(window: &VecDeque<u32>) -> f64 {
    window.iter().copied().map(f64::from).sum::<f64>() / window.len() as f64
}

/// MiniSat-style iterative Luby sequence, 0-indexed: `1,1,2,1,1,2,4,...`.
fn luby_units(mut index: u64) -> u64 {
    let mut size = 1u64;
    let mut seq = 0u32;
    while size < index + 1 {
        seq += 1;
        size = 2 * size + 1;
    }
    while size - 1 != index {
        size = (size - 1) / 2;
        seq -= 1;
        index %= size;
    }
    1u64 << seq
}

enum ConflictResolution {
    BackedJump,
    Unsatisfiable,
    UnsatisfiableUnderAssumptions(Vec<Literal>),
}

/// Owns every piece of search-time (as opposed to
/// problem-time, owned by [`SharedContext`]) state: the decision heuristic,
/// the learnt-clause database, the restart schedule and the RNG used for
/// randomized decisions.
pub(crate) struct Search {
    heuristic: Box<dyn Heuristic>,
    learnt_db: LearntDb,
    restart: RestartScheduler,
    rng: SmallRng,
    options: SolverOptions,
    decisions_made: u32,
    last_unsat_core: Vec<Literal>,
    conflicts_total: u64,
    logger: Logger,
}

impl Search {
    pub(crate) fn new(options: SolverOptions, existing_variables: &[PropositionalVariable]) -> Self {
        Search::with_logger(options, existing_variables, Logger::default())
    }

    pub(crate) fn with_logger(
        options: SolverOptions,
        existing_variables: &[PropositionalVariable],
        logger: Logger,
    ) -> Self {
        let heuristic = build_heuristic(options.heuristic, existing_variables);
        let restart = RestartScheduler::new(options.restart);
        let learnt_db = LearntDb::new(options.reduction, existing_variables.len() as u32);
        Search {
            heuristic,
            learnt_db,
            restart,
            rng: SmallRng::seed_from_u64(options.random_seed),
            options,
            decisions_made: 0,
            last_unsat_core: Vec::new(),
            conflicts_total: 0,
            logger,
        }
    }

    pub(crate) fn heuristic_mut(&mut self) -> &mut dyn Heuristic {
        self.heuristic.as_mut()
    }

    /// The (non-minimal) subset of `assumptions` that contributed to the
    /// most recent `Unsatisfiable` result reached while assumptions were
    /// still on the trail; empty if the problem is unsatisfiable outright.
    pub(crate) fn last_unsat_core(&self) -> &[Literal] {
        &self.last_unsat_core
    }

    /// Runs search under `assumptions` until a model is found (reported
    /// through `observer`, which may ask for more search to continue
    /// enumerating), the problem is proven unsatisfiable, or termination is
    /// requested.
    pub(crate) fn solve(
        &mut self,
        context: &mut SharedContext,
        assumptions: &[Literal],
        observer: &mut dyn SearchObserver,
        limits: SearchLimits,
    ) -> SearchOutcome {
        self.last_unsat_core.clear();
        let assumption_level = assumptions.len() as u32;

        for &assumption in assumptions {
            if context.assignments.is_false(assumption) {
                self.last_unsat_core = vec![assumption];
                return SearchOutcome::Unsatisfiable;
            }
            if !context.assignments.is_true(assumption) {
                context.assignments.assume(assumption);
            }
        }

        loop {
            let conflict = context
                .engine
                .propagate(&mut context.assignments, &mut context.clause_allocator);

            if let Some(conflict) = conflict {
                if matches!(conflict, EngineConflict::Terminated) {
                    return SearchOutcome::Interrupted;
                }
                if let Some(limit) = limits.conflicts {
                    if self.conflicts_total >= limit {
                        self.logger.report(
                            Event::Warning(format!("conflict limit of {limit} reached")),
                            Subsystem::Solve,
                        );
                        return SearchOutcome::ConflictLimitReached;
                    }
                }
                match self.handle_conflict(context, conflict, assumption_level) {
                    ConflictResolution::BackedJump => continue,
                    ConflictResolution::Unsatisfiable => return SearchOutcome::Unsatisfiable,
                    ConflictResolution::UnsatisfiableUnderAssumptions(core) => {
                        self.last_unsat_core = core;
                        return SearchOutcome::Unsatisfiable;
                    }
                }
            }

            if let Some(limit) = limits.memory_literals {
                if self.learnt_db.total_literals(&context.clause_allocator) > limit {
                    self.logger.report(
                        Event::Warning(format!("learnt-db memory limit of {limit} literals reached")),
                        Subsystem::Solve,
                    );
                    return SearchOutcome::MemoryLimitReached;
                }
            }

            if self.learnt_db.should_reduce() {
                let before = self.learnt_db.num_learnt();
                self.learnt_db.reduce(&context.assignments, &mut context.clause_allocator);
                let kept = self.learnt_db.num_learnt();
                self.logger.report(
                    Event::Reduction { deleted: before.saturating_sub(kept), kept },
                    Subsystem::Solve,
                );
            }

            if self.restart.should_restart() && context.assignments.current_decision_level() > assumption_level {
                self.logger.report(
                    Event::Restart {
                        conflicts_since_last: self.restart.conflicts_since_restart,
                        decision_level_before: context.assignments.current_decision_level(),
                    },
                    Subsystem::Solve,
                );
                self.restart.notify_restart();
                self.backtrack_to(context, assumption_level);
                continue;
            }

            if let Some(conflict) = context.engine.is_model(&mut context.assignments) {
                match self.handle_conflict(context, conflict, assumption_level) {
                    ConflictResolution::BackedJump => continue,
                    ConflictResolution::Unsatisfiable => return SearchOutcome::Unsatisfiable,
                    ConflictResolution::UnsatisfiableUnderAssumptions(core) => {
                        self.last_unsat_core = core;
                        return SearchOutcome::Unsatisfiable;
                    }
                }
            }

            let Some(decision) = self.pick_decision(context) else {
                match observer.on_model(context) {
                    ModelAction::Stop => return SearchOutcome::Satisfiable,
                    ModelAction::ContinueAfterBacktrackTo(level) => {
                        self.backtrack_to(context, level);
                        continue;
                    }
                }
            };

            context.assignments.assume(decision);
            self.decisions_made += 1;
        }
    }

    fn backtrack_to(&mut self, context: &mut SharedContext, level: u32) {
        context.assignments.undo_until(level, |_| {});
        context.engine.notify_backtrack(&context.assignments);
        self.heuristic.on_backtrack(&context.assignments, level);
    }

    fn handle_conflict(
        &mut self,
        context: &mut SharedContext,
        conflict: EngineConflict,
        assumption_level: u32,
    ) -> ConflictResolution {
        let conflicting_literals = match &conflict {
            EngineConflict::PostPropagator(literals) => literals.clone(),
            EngineConflict::Clausal(reference) => match *reference {
                ClauseReference::Binary(a, b) => vec![a, b],
                ClauseReference::Ternary(a, b, c) => vec![a, b, c],
                ClauseReference::Allocated(allocated) => context
                    .clause_allocator
                    .get_clause(allocated)
                    .get_literal_slice()
                    .to_vec(),
            },
            EngineConflict::Terminated => unreachable!("callers filter this case out first"),
        };

        self.learnt_db.record_conflict();
        self.conflicts_total += 1;

        let SharedContext {
            ref mut assignments,
            ref mut clause_allocator,
            ref engine,
            ..
        } = *context;
        let mut analysis_context = ConflictAnalysisContext {
            assignments,
            clause_allocator,
            propagation_engine: engine,
            heuristic: self.heuristic.as_mut(),
        };

        let Ok((result, lbd)) =
            analyze_conflict(&conflicting_literals, self.options.minimisation_mode, &mut analysis_context)
        else {
            return ConflictResolution::Unsatisfiable;
        };

        self.heuristic.on_conflict();
        self.restart.record_conflict(lbd);

        if result.backjump_level < assumption_level {
            let core = result.learned_literals.iter().map(|&literal| !literal).collect();
            return ConflictResolution::UnsatisfiableUnderAssumptions(core);
        }

        self.backtrack_to(context, result.backjump_level);

        let asserting_literal = result.learned_literals[0];
        if result.learned_literals.len() == 1 {
            if !context.assignments.enqueue(asserting_literal, AssignmentReason::Decision) {
                return ConflictResolution::Unsatisfiable;
            }
            return ConflictResolution::BackedJump;
        }

        let clause_reference = self.register_learnt_clause(context, result.learned_literals, lbd);
        if !context
            .assignments
            .enqueue(asserting_literal, AssignmentReason::Clause(clause_reference))
        {
            return ConflictResolution::Unsatisfiable;
        }
        ConflictResolution::BackedJump
    }

    fn register_learnt_clause(
        &mut self,
        context: &mut SharedContext,
        literals: Vec<Literal>,
        lbd: u32,
    ) -> ClauseReference {
        match literals.len() {
            2 | 3 => context
                .engine
                .clausal_propagator()
                .add_clause(literals, true, &context.assignments, &mut context.clause_allocator)
                .ok()
                .flatten()
                .expect("a freshly derived learnt clause is never already satisfied or falsified"),
            _ => {
                let reference = self.learnt_db.add_learnt_clause(literals, lbd, &mut context.clause_allocator);
                if let ClauseReference::Allocated(allocated) = reference {
                    let (w0, w1) = {
                        let clause = context.clause_allocator.get_clause(allocated);
                        (clause.get_literal_slice()[0], clause.get_literal_slice()[1])
                    };
                    context
                        .engine
                        .clausal_propagator()
                        .register_allocated_clause_watches(allocated, w0, w1);
                }
                reference
            }
        }
    }

    fn pick_decision(&mut self, context: &SharedContext) -> Option<Literal> {
        if self.decisions_made < self.options.random_initial_descents {
            if let Some(variable) = self.random_unassigned_variable(context) {
                return Some(Literal::new(variable, self.rng.gen_bool(0.5)));
            }
        } else if self.options.heuristic.random_decision_probability > 0.0
            && self.rng.gen_bool(self.options.heuristic.random_decision_probability)
        {
            if let Some(variable) = self.random_unassigned_variable(context) {
                let polarity = context.assignments.preferred_polarity(variable);
                return Some(Literal::new(variable, polarity));
            }
        }
        self.heuristic.next_decision(&context.assignments)
    }

    fn random_unassigned_variable(&mut self, context: &SharedContext) -> Option<PropositionalVariable> {
        let unassigned: Vec<PropositionalVariable> = (1..=context.assignments.num_variables())
            .map(PropositionalVariable::new)
            .filter(|&variable| !context.assignments.truth_value(variable).is_assigned())
            .collect();
        if unassigned.is_empty() {
            return None;
        }
        Some(unassigned[self.rng.gen_range(0..unassigned.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::VariableType;

    struct StopAtFirstModel;

    impl SearchObserver for StopAtFirstModel {
        fn on_model(&mut self, _context: &mut SharedContext) -> ModelAction {
            ModelAction::Stop
        }
    }

    #[test]
    fn solves_simple_satisfiable_clause() {
        let mut context = SharedContext::new();
        context.start_add_constraints().unwrap();
        let a = Literal::new(context.add_var(VariableType::Atom), true);
        let b = Literal::new(context.add_var(VariableType::Atom), true);
        context.add_clause(vec![a, b]).unwrap();
        context.end_init().unwrap();

        let mut search = Search::new(
            SolverOptions::default(),
            &[a, b].map(|literal| literal.get_propositional_variable()),
        );
        let mut observer = StopAtFirstModel;
        let outcome = search.solve(&mut context, &[], &mut observer, SearchLimits::default());
        assert_eq!(outcome, SearchOutcome::Satisfiable);
        assert!(context.assignments.is_true(a) || context.assignments.is_true(b));
    }

    #[test]
    fn detects_unsatisfiable_formula_via_conflict_analysis() {
        // (a|b) & (a|!b) & (!a|b) & (!a|!b) excludes all four valuations.
        let mut context = SharedContext::new();
        context.start_add_constraints().unwrap();
        let a = Literal::new(context.add_var(VariableType::Atom), true);
        let b = Literal::new(context.add_var(VariableType::Atom), true);
        context.add_clause(vec![a, b]).unwrap();
        context.add_clause(vec![a, !b]).unwrap();
        context.add_clause(vec![!a, b]).unwrap();
        context.add_clause(vec![!a, !b]).unwrap();
        context.end_init().unwrap();

        let mut search = Search::new(
            SolverOptions::default(),
            &[a, b].map(|literal| literal.get_propositional_variable()),
        );
        let mut observer = StopAtFirstModel;
        let outcome = search.solve(&mut context, &[], &mut observer, SearchLimits::default());
        assert_eq!(outcome, SearchOutcome::Unsatisfiable);
    }

    #[test]
    fn luby_sequence_matches_known_prefix() {
        let expected = [1, 1, 2, 1, 1, 2, 4, 1, 1, 2, 1, 1, 2, 4, 8];
        for (index, &value) in expected.iter().enumerate() {
            assert_eq!(luby_units(index as u64), value);
        }
    }
}
