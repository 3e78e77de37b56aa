//! The incremental facade. The only module in this crate whose types are
//! `pub` rather than `pub(crate)` — everything else (literals, clauses, the
//! dependency graph, the search loop) is an implementation detail reached
//! only through [`Solver`].
//!
//! Drives the lifecycle `start(config) -> add*()/addRule -> prepare ->
//! solve -> (update_program -> add*() -> prepare -> solve)*`. A step's
//! learnt knowledge can be scoped to that step's [`Solver::step_literal`];
//! `update_program` retires the previous one at the root level so anything
//! guarded by it becomes permanently false rather than silently vanishing.

mod model;
mod rule;
mod types;

pub use model::Model;
pub use rule::{Rule, RuleBody, WeightedLiteral};
pub use types::{AtomKind, Lit, VarId};

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use once_cell::sync::OnceCell;

use crate::basic_types::{
    ConstraintOperationError, FnvMap, Literal, PropagationStatusPostPropagator, PropositionalVariable,
    UnknownReason, VariableType,
};
use crate::diagnostics::{Logger, Verbosity};
use crate::engine::propagation::{PostPropagator, PropagationContext, PropagationContextMut};
use crate::engine::search::{ModelAction, SearchLimits, SearchObserver, SearchOutcome};
use crate::engine::sat::{WeightConstraint, WeightLiteral};
use crate::engine::{Search, SharedContext};
use crate::enumerate::Enumerator;
use crate::minimize::MinimizeTerm;
use crate::options::SolverOptions;
use crate::unfounded::{AtomId, Body, GraphBuilder, UnfoundedSetChecker};

static ENV_LOGGER_INSTALLED: OnceCell<()> = OnceCell::new();

/// Configuration accepted by [`Solver::new`]. `options` composes the
/// per-subsystem option structs; the granular sub-structs stay
/// crate-private; `enumeration` is the one most callers need to tune and
/// is `pub` on [`SolverOptions`] itself.
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    pub options: SolverOptions,
    /// Lowest [`Verbosity`] that gets reported through [`Logger`].
    pub log_verbosity: Verbosity,
    /// Installs `env_logger` as the global logger the first time any
    /// [`Solver`] is constructed with this set. Left `false` by default so
    /// embedding a [`Solver`] in a host application never steals its logger.
    pub install_env_logger: bool,
}

/// Resource ceiling for a single [`Solver::solve`]/[`Solver::enumerate_next`]
/// call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveLimit {
    pub conflicts: Option<u64>,
    pub memory_literals: Option<u64>,
}

impl From<SolveLimit> for SearchLimits {
    fn from(limit: SolveLimit) -> Self {
        SearchLimits { conflicts: limit.conflicts, memory_literals: limit.memory_literals }
    }
}

/// Result of a `solve`/`enumerate_next` call.
#[derive(Debug, Clone)]
pub enum SolveOutcome {
    Satisfiable(Model),
    Unsatisfiable,
    Unknown(UnknownReason),
}

impl SolveOutcome {
    pub fn is_satisfiable(&self) -> bool {
        matches!(self, SolveOutcome::Satisfiable(_))
    }
}

/// Thin [`PostPropagator`] wrapper sharing ownership of the [`Enumerator`]
/// with [`EnumeratorObserver`]; `PropagationEngine` owns this one as a
/// `Box<dyn PostPropagator>`. Both borrow the same `RefCell` only while the
/// search loop is suspended between post-propagator calls, so the dynamic
/// borrow check this trades static aliasing rules for never actually
/// contends in practice.
struct EnumeratorPostPropagator(Rc<RefCell<Enumerator>>);

impl PostPropagator for EnumeratorPostPropagator {
    fn name(&self) -> &str {
        "enumeration"
    }

    fn priority(&self) -> u32 {
        crate::engine::propagation::priority::ENUMERATION
    }

    fn init(&mut self, context: &mut PropagationContextMut) -> Result<(), Vec<Literal>> {
        self.0.borrow_mut().init(context)
    }

    fn propagate(&mut self, context: &mut PropagationContextMut) -> PropagationStatusPostPropagator {
        self.0.borrow_mut().propagate(context)
    }

    fn reason(&self, literal: Literal, context: &PropagationContext) -> Vec<Literal> {
        self.0.borrow().reason(literal, context)
    }

    fn undo_level(&mut self, context: &PropagationContext) {
        self.0.borrow_mut().undo_level(context)
    }
}

/// Thin [`SearchObserver`] wrapper around the same [`Enumerator`], handed to
/// [`Search::solve`]. Tracks whether the last model the enumerator accepted
/// asked for more search (`continues`), so [`Solver::enumerate_next`] knows
/// whether calling `Search::solve` again could possibly find another model
/// rather than just replaying the one already on the trail.
struct EnumeratorObserver {
    enumerator: Rc<RefCell<Enumerator>>,
    continues: Rc<Cell<bool>>,
}

impl SearchObserver for EnumeratorObserver {
    fn on_model(&mut self, context: &mut SharedContext) -> ModelAction {
        let action = self.enumerator.borrow_mut().on_model(context);
        self.continues.set(matches!(action, ModelAction::ContinueAfterBacktrackTo(_)));
        action
    }
}

/// Owns the whole solving lifecycle for one (possibly
/// incremental) program: problem state ([`SharedContext`]), search-time
/// state ([`Search`]), model enumeration ([`Enumerator`], shared with its
/// two adapters), the positive body-atom dependency graph under
/// construction ([`GraphBuilder`]) and the accumulated minimize terms.
pub struct Solver {
    context: SharedContext,
    search: Search,
    enumerator: Rc<RefCell<Enumerator>>,
    enumerator_registered: bool,
    continues: Rc<Cell<bool>>,
    dependency_builder: Option<GraphBuilder>,
    atom_ids: FnvMap<PropositionalVariable, AtomId>,
    minimize_terms: Vec<MinimizeTerm>,
    options: SolverOptions,
    step_literal: Option<Literal>,
    current_assumptions: Vec<Literal>,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        if config.install_env_logger {
            ENV_LOGGER_INSTALLED.get_or_init(|| {
                let _ = env_logger::try_init();
            });
        }

        let logger = Logger::new(Box::new(crate::diagnostics::LogEventHandler), config.log_verbosity);
        let context = SharedContext::new();
        let search = Search::with_logger(config.options.clone(), &[], logger);

        Solver {
            context,
            search,
            enumerator: Rc::new(RefCell::new(Enumerator::new(
                config.options.enumeration.clone(),
                None,
            ))),
            enumerator_registered: false,
            continues: Rc::new(Cell::new(false)),
            dependency_builder: Some(GraphBuilder::new()),
            atom_ids: FnvMap::default(),
            minimize_terms: Vec::new(),
            options: config.options,
            step_literal: None,
            current_assumptions: Vec::new(),
        }
    }

    /// Cooperative termination flag, settable from a signal handler via
    /// [`Solver::install_signal_termination`] or by a host calling
    /// [`Solver::terminate`] directly from another thread.
    pub fn terminate(&self) {
        self.context.request_terminate();
    }

    /// Installs a Unix signal handler that sets the termination flag,
    /// backed by a signal-safe atomic. `signal` is a raw signal number,
    /// e.g. `signal_hook::consts::SIGINT`.
    pub fn install_signal_termination(&self, signal: i32) -> std::io::Result<()> {
        signal_hook::flag::register(signal, self.context.terminate_flag())?;
        Ok(())
    }

    fn atom_literal(&self, var: VarId) -> Literal {
        Literal::new(PropositionalVariable::new(var.0), true)
    }

    fn to_internal(&self, lit: Lit) -> Literal {
        let variable = PropositionalVariable::new(lit.var().0);
        Literal::new(variable, lit.is_positive())
    }

    fn ensure_atom_id(&mut self, variable: PropositionalVariable) -> AtomId {
        if let Some(&id) = self.atom_ids.get(&variable) {
            return id;
        }
        let literal = Literal::new(variable, true);
        let builder = self
            .dependency_builder
            .as_mut()
            .expect("add_rule is rejected once prepare() has consumed the dependency graph");
        let id = builder.add_atom(literal);
        self.atom_ids.insert(variable, id);
        id
    }

    /// Declares a fresh propositional variable (an atom, a rule body, or
    /// both), returning the public handle the caller uses to reference it
    /// in subsequent `add_clause`/`add_rule`/`add_minimize` calls.
    pub fn add_var(&mut self, kind: AtomKind) -> Result<VarId, ConstraintOperationError> {
        if self.context.is_frozen() {
            return Err(ConstraintOperationError::MutationAfterEndInit);
        }
        let var_type = match kind {
            AtomKind::Atom => VariableType::Atom,
            AtomKind::Body => VariableType::Body,
            AtomKind::AtomAndBody => VariableType::AtomAndBody,
        };
        let variable = self.new_var(var_type);
        Ok(VarId(variable.index()))
    }

    /// The single path by which a new [`PropositionalVariable`] comes into
    /// existence: adds it to [`SharedContext`] and registers it with the
    /// active decision heuristic in the same step, so every variable the
    /// search loop can ever branch on is one the heuristic actually knows
    /// about.
    fn new_var(&mut self, var_type: VariableType) -> PropositionalVariable {
        let variable = self.context.add_var(var_type);
        self.search.heuristic_mut().on_new_variable(variable);
        variable
    }

    /// Adds a clause directly to the static database, bypassing rule
    /// translation. Returns `Ok(false)` if the clause was already
    /// satisfied at the root level and so was discarded.
    pub fn add_clause(&mut self, literals: Vec<Lit>) -> Result<bool, ConstraintOperationError> {
        let literals = literals.into_iter().map(|lit| self.to_internal(lit)).collect();
        self.context.add_clause(literals)
    }

    /// Translates a rule into completion clauses (and, for a weight body, a
    /// registered [`WeightConstraint`] post-propagator) plus dependency-graph
    /// entries for the unfounded-set checker. Normal and
    /// disjunctive rules get a sufficiency clause `body -> heads`; choice
    /// rules get none, since a choice head may be freely assigned true or
    /// false whenever its body holds. The necessity direction ("a true head
    /// needs a supporting body") is never encoded as a clause here — it is
    /// enforced uniformly for every rule kind by the unfounded-set checker
    /// built at [`Solver::prepare`] time.
    pub fn add_rule(&mut self, rule: Rule) -> Result<(), ConstraintOperationError> {
        if self.context.is_frozen() {
            return Err(ConstraintOperationError::MutationAfterEndInit);
        }
        if self.dependency_builder.is_none() {
            return Err(ConstraintOperationError::MutationAfterEndInit);
        }

        let (heads, body, needs_sufficiency) = match rule {
            Rule::Normal { head, body } => (vec![head], body, true),
            Rule::Choice { heads, body } => (heads, body, false),
            Rule::Disjunctive { heads, body } => (heads, body, true),
        };

        let head_ids: Vec<AtomId> = heads.iter().map(|&v| self.ensure_atom_id(PropositionalVariable::new(v.0))).collect();
        let (body_literal, positive_preds, extra_literals) = self.compile_body(body)?;

        if needs_sufficiency && !heads.is_empty() {
            let mut clause = vec![!body_literal];
            clause.extend(heads.iter().map(|&head| self.atom_literal(head)));
            self.context.add_clause(clause)?;
        }

        let builder = self.dependency_builder.as_mut().expect("checked above");
        builder.add_body(Body { literal: body_literal, positive_preds, extra_literals, heads: head_ids });
        Ok(())
    }

    /// Compiles a rule body to its governing literal plus the dependency
    /// edges the unfounded-set checker needs, returning `(body_literal,
    /// positive_preds, extra_literals)`.
    fn compile_body(
        &mut self,
        body: RuleBody,
    ) -> Result<(Literal, Vec<AtomId>, Vec<Literal>), ConstraintOperationError> {
        match body {
            RuleBody::Normal { positive, negative } => {
                if positive.len() == 1 && negative.is_empty() {
                    let variable = PropositionalVariable::new(positive[0].0);
                    let literal = self.atom_literal(positive[0]);
                    let atom_id = self.ensure_atom_id(variable);
                    return Ok((literal, vec![atom_id], Vec::new()));
                }

                let body_var = self.new_var(VariableType::Body);
                let body_literal = Literal::new(body_var, true);

                let positive_literals: Vec<Literal> = positive.iter().map(|&v| self.atom_literal(v)).collect();
                let negative_literals: Vec<Literal> =
                    negative.iter().map(|&v| !self.atom_literal(v)).collect();

                for &conjunct in positive_literals.iter().chain(negative_literals.iter()) {
                    self.context.add_clause(vec![!body_literal, conjunct])?;
                }
                let mut sufficiency = vec![body_literal];
                sufficiency.extend(positive_literals.iter().map(|&l| !l));
                sufficiency.extend(negative_literals.iter().map(|&l| !l));
                self.context.add_clause(sufficiency)?;

                let positive_preds =
                    positive.iter().map(|&v| self.ensure_atom_id(PropositionalVariable::new(v.0))).collect();
                Ok((body_literal, positive_preds, negative_literals))
            }
            RuleBody::Weight { literals, bound } => {
                let body_var = self.new_var(VariableType::Body);
                let body_literal = Literal::new(body_var, true);

                let mut positive_preds = Vec::new();
                let mut extra_literals = Vec::new();
                let mut terms = Vec::with_capacity(literals.len());
                for wl in &literals {
                    let literal = self.to_internal(wl.literal);
                    terms.push(WeightLiteral { literal, weight: wl.weight });
                    if wl.weight > 0 && literal.is_positive() {
                        positive_preds.push(self.ensure_atom_id(literal.get_propositional_variable()));
                    } else {
                        extra_literals.push(literal);
                    }
                }

                let constraint = WeightConstraint::new(body_literal, terms, bound);
                self.context.register_post_propagator(Box::new(constraint));
                Ok((body_literal, positive_preds, extra_literals))
            }
        }
    }

    /// Accumulates one priority level's worth of minimize literals, folded
    /// into the [`crate::minimize::MinimizeConstraint`] built at `prepare`
    /// time.
    pub fn add_minimize(&mut self, literals: Vec<WeightedLiteral>, priority: usize) -> Result<(), ConstraintOperationError> {
        if self.context.is_frozen() {
            return Err(ConstraintOperationError::MutationAfterEndInit);
        }
        self.minimize_terms.extend(literals.into_iter().map(|wl| MinimizeTerm {
            literal: self.to_internal(wl.literal),
            weight: wl.weight,
            priority,
        }));
        Ok(())
    }

    /// Marks `var` as exempt from elimination and (optionally) sets its
    /// preferred decision polarity. A frozen atom stays controllable across
    /// an incremental `update_program` step.
    pub fn freeze(&mut self, var: VarId, default_value: Option<bool>) {
        let variable = PropositionalVariable::new(var.0);
        let info = self.context.assignments.variable_info_mut(variable);
        info.frozen = true;
        if let Some(value) = default_value {
            info.preferred_value = crate::basic_types::PreferredValue::User(value);
        }
    }

    /// Clears the frozen flag set by [`Solver::freeze`]; a no-op on an atom
    /// that was never frozen.
    pub fn unfreeze_atom(&mut self, var: VarId) {
        let variable = PropositionalVariable::new(var.0);
        self.context.assignments.variable_info_mut(variable).frozen = false;
    }

    /// A literal over the current step's scope marker. Clauses/rules a
    /// caller wants retracted on the next [`Solver::update_program`] can
    /// include `!step_literal()` in their own literal lists; this facade
    /// does not inject it automatically, since most clauses are meant to
    /// persist for the program's whole lifetime.
    pub fn step_literal(&self) -> Option<Lit> {
        self.step_literal.map(|literal| Lit::from_internal(literal))
    }

    /// Reopens the problem for a new incremental step: unfreezes
    /// structural mutation and retires the previous step literal by forcing
    /// it false at the root level, so anything guarded by it is now
    /// permanently disabled. A fresh step literal is then minted.
    pub fn update_program(&mut self) -> Result<(), ConstraintOperationError> {
        self.context.unfreeze()?;
        if let Some(previous) = self.step_literal.take() {
            self.context.add_clause(vec![!previous])?;
        }
        let step_var = self.new_var(VariableType::AtomAndBody);
        self.step_literal = Some(Literal::new(step_var, true));
        Ok(())
    }

    /// Finalizes the current step: builds and registers the unfounded-set
    /// checker from the accumulated rules (first call only — the
    /// dependency graph is not rebuilt across incremental steps, so
    /// `add_rule` must not be called again after this), registers the
    /// enumerator (and its minimize constraint, if any), then runs
    /// `end_init` (root propagation plus every post-propagator's `init`).
    pub fn prepare(&mut self) -> Result<(), ConstraintOperationError> {
        if !self.enumerator_registered {
            let minimize = if self.minimize_terms.is_empty() {
                None
            } else {
                Some(crate::minimize::MinimizeConstraint::new(
                    std::mem::take(&mut self.minimize_terms),
                    self.options.enumeration.optimization_mode,
                ))
            };
            self.enumerator = Rc::new(RefCell::new(Enumerator::new(self.options.enumeration.clone(), minimize)));
            self.context
                .register_post_propagator(Box::new(EnumeratorPostPropagator(Rc::clone(&self.enumerator))));
            self.enumerator_registered = true;
        }

        if let Some(builder) = self.dependency_builder.take() {
            let graph = builder.build();
            if graph.num_atoms() > 0 {
                let checker = UnfoundedSetChecker::new(graph, self.options.unfounded_set.reason_strategy);
                self.context.register_post_propagator(Box::new(checker));
            }
        }

        self.context.end_init()?;
        Ok(())
    }

    fn run_once(&mut self, limits: SearchLimits) -> SolveOutcome {
        let assumption_level = self.current_assumptions.len() as u32;
        self.enumerator.borrow_mut().set_assumption_level(assumption_level);

        let mut observer = EnumeratorObserver {
            enumerator: Rc::clone(&self.enumerator),
            continues: Rc::clone(&self.continues),
        };
        let outcome = self.search.solve(&mut self.context, &self.current_assumptions, &mut observer, limits);

        let result = match outcome {
            SearchOutcome::Satisfiable => SolveOutcome::Satisfiable(self.build_model()),
            SearchOutcome::Unsatisfiable => SolveOutcome::Unsatisfiable,
            SearchOutcome::Interrupted => SolveOutcome::Unknown(UnknownReason::Interrupted),
            SearchOutcome::ConflictLimitReached => SolveOutcome::Unknown(UnknownReason::ConflictLimitReached),
            SearchOutcome::MemoryLimitReached => SolveOutcome::Unknown(UnknownReason::MemoryLimitReached),
        };
        if !result.is_satisfiable() {
            self.continues.set(false);
        }
        result
    }

    fn build_model(&self) -> Model {
        let mut assignment = FnvMap::default();
        for index in 1..=self.context.assignments.num_variables() {
            let variable = PropositionalVariable::new(index);
            let value = self.context.assignments.truth_value(variable);
            if value.is_assigned() {
                assignment.insert(index, self.context.assignments.is_true(Literal::new(variable, true)));
            }
        }
        let cost = self.enumerator.borrow().current_cost().map(<[i64]>::to_vec);
        Model::new(assignment, cost)
    }

    /// Runs search under `assumptions` until a model is found, the problem
    /// is proven unsatisfiable (under those assumptions), or `limit` is
    /// exhausted. Errors if called before a successful [`Solver::prepare`].
    pub fn solve(
        &mut self,
        assumptions: &[Lit],
        limit: SolveLimit,
    ) -> Result<SolveOutcome, ConstraintOperationError> {
        if !self.context.is_frozen() {
            return Err(ConstraintOperationError::SolveBeforeEndInit);
        }
        self.current_assumptions = assumptions.iter().map(|&lit| self.to_internal(lit)).collect();
        self.continues.set(true);
        Ok(self.run_once(limit.into()))
    }

    /// Resumes search for another model after a prior `solve`/
    /// `enumerate_next` call returned `Satisfiable` and the enumerator's
    /// mode wants to keep going. Returns
    /// `false` immediately, without re-entering search, once enumeration is
    /// known to be exhausted (model limit reached, `Null` mode already
    /// stopped, or the prior call was not itself satisfiable).
    pub fn enumerate_next(&mut self, limit: SolveLimit) -> bool {
        if !self.context.is_frozen() || !self.continues.get() {
            return false;
        }
        matches!(self.run_once(limit.into()), SolveOutcome::Satisfiable(_))
    }

    /// The (non-minimal) subset of the last call's assumptions that caused
    /// unsatisfiability. Empty if the problem is unsatisfiable outright,
    /// independent of assumptions.
    pub fn get_core(&self) -> Vec<Lit> {
        self.search.last_unsat_core().iter().map(|&literal| Lit::from_internal(literal)).collect()
    }

    /// Every literal true in at least one model committed so far (brave
    /// consequences); only populated under [`crate::options::EnumerationMode::Brave`].
    pub fn brave_consequences(&self) -> Vec<Lit> {
        self.enumerator.borrow().brave_consequences().into_iter().map(Lit::from_internal).collect()
    }

    /// Every literal true in every model committed so far (cautious
    /// consequences); only populated under
    /// [`crate::options::EnumerationMode::Cautious`].
    pub fn cautious_consequences(&self) -> Vec<Lit> {
        self.enumerator.borrow().cautious_consequences().into_iter().map(Lit::from_internal).collect()
    }

    pub fn models_found(&self) -> u64 {
        self.enumerator.borrow().models_found()
    }
}

impl Default for Solver {
    fn default() -> Self {
        Solver::new(SolverConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solves_a_normal_rule_program() {
        // p :- q.  q.  => p and q both true, no choice involved.
        let mut solver = Solver::default();
        let p = solver.add_var(AtomKind::Atom).unwrap();
        let q = solver.add_var(AtomKind::Atom).unwrap();
        solver
            .add_rule(Rule::Normal {
                head: p,
                body: RuleBody::Normal { positive: vec![q], negative: vec![] },
            })
            .unwrap();
        solver
            .add_rule(Rule::Normal { head: q, body: RuleBody::Normal { positive: vec![], negative: vec![] } })
            .unwrap();
        solver.prepare().unwrap();

        let outcome = solver.solve(&[], SolveLimit::default()).unwrap();
        let SolveOutcome::Satisfiable(model) = outcome else {
            panic!("expected a model, got {outcome:?}");
        };
        assert_eq!(model.value(p), Some(true));
        assert_eq!(model.value(q), Some(true));
    }

    #[test]
    fn mutually_supporting_atoms_with_no_fact_are_unsatisfiable_as_true() {
        // a :- b.  b :- a.  Neither has a fact to found on, so the only
        // answer set is the empty one.
        let mut solver = Solver::default();
        let a = solver.add_var(AtomKind::Atom).unwrap();
        let b = solver.add_var(AtomKind::Atom).unwrap();
        solver
            .add_rule(Rule::Normal { head: a, body: RuleBody::Normal { positive: vec![b], negative: vec![] } })
            .unwrap();
        solver
            .add_rule(Rule::Normal { head: b, body: RuleBody::Normal { positive: vec![a], negative: vec![] } })
            .unwrap();
        solver.prepare().unwrap();

        let outcome = solver.solve(&[], SolveLimit::default()).unwrap();
        let SolveOutcome::Satisfiable(model) = outcome else {
            panic!("expected a model, got {outcome:?}");
        };
        assert_eq!(model.value(a), Some(false));
        assert_eq!(model.value(b), Some(false));
    }

    #[test]
    fn choice_rule_allows_either_valuation() {
        let mut solver = Solver::default();
        let a = solver.add_var(AtomKind::Atom).unwrap();
        solver
            .add_rule(Rule::Choice {
                heads: vec![a],
                body: RuleBody::Normal { positive: vec![], negative: vec![] },
            })
            .unwrap();
        solver.prepare().unwrap();

        let outcome = solver.solve(&[], SolveLimit::default()).unwrap();
        assert!(outcome.is_satisfiable());
    }

    #[test]
    fn record_mode_enumerates_every_model_of_a_choice_atom() {
        let mut solver = Solver::new(SolverConfig {
            options: SolverOptions {
                enumeration: crate::options::EnumerationOptions {
                    mode: crate::options::EnumerationMode::Record,
                    optimization_mode: crate::options::OptimizationMode::Ignore,
                    projection: Vec::new(),
                    model_limit: None,
                },
                ..SolverOptions::default()
            },
            ..SolverConfig::default()
        });
        let a = solver.add_var(AtomKind::Atom).unwrap();
        solver
            .add_rule(Rule::Choice {
                heads: vec![a],
                body: RuleBody::Normal { positive: vec![], negative: vec![] },
            })
            .unwrap();
        solver.prepare().unwrap();

        let first = solver.solve(&[], SolveLimit::default()).unwrap();
        assert!(first.is_satisfiable());
        let second = solver.enumerate_next(SolveLimit::default());
        assert!(second);
        let third = solver.enumerate_next(SolveLimit::default());
        assert!(!third);
        assert_eq!(solver.models_found(), 2);
    }

    #[test]
    fn get_core_reports_conflicting_assumption() {
        let mut solver = Solver::default();
        let a = solver.add_var(AtomKind::Atom).unwrap();
        solver.add_clause(vec![!Lit::from_var(a)]).unwrap();
        solver.prepare().unwrap();

        let outcome = solver.solve(&[Lit::from_var(a)], SolveLimit::default()).unwrap();
        assert!(matches!(outcome, SolveOutcome::Unsatisfiable));
        assert!(!solver.get_core().is_empty());
    }
}
