//! Per-subsystem option structs, one sub-struct per schedule or strategy
//! rather than one flat bag of fields.

use crate::branching::HeuristicKind;
use crate::engine::conflict_analysis::MinimisationMode;

/// Restart schedule selectable for the search loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum RestartSchedule {
    /// Fixed conflict count, multiplied by `factor` after every restart.
    Geometric { base: u64, factor: f64 },
    /// The Luby sequence scaled by `unit` conflicts.
    Luby { unit: u64 },
    /// Fast/slow moving-average LBD comparison: restart when
    /// `fast > k * slow` once the fast window has filled.
    DynamicLbd { fast_window: usize, slow_window: usize, k: f64 },
}

impl Default for RestartSchedule {
    fn default() -> Self {
        RestartSchedule::Luby { unit: 100 }
    }
}

/// Which metric [`crate::engine::learnt_db::LearntDb::reduce`] sorts
/// "free" (non-locked) learnt clauses by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReductionScore {
    Activity,
    Lbd,
    /// LBD first, activity as the tiebreaker.
    Mixed,
}

/// The schedule that grows [`ReductionOptions`]'s size bound after each
/// reduction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum GrowthSchedule {
    None,
    Arithmetic { step: f64 },
    Geometric { factor: f64 },
    Luby { unit: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ReductionOptions {
    pub(crate) fraction_to_delete: f64,
    pub(crate) protect_lbd: u32,
    pub(crate) conflicts_per_reduce: u64,
    pub(crate) score: ReductionScore,
    pub(crate) growth: GrowthSchedule,
    pub(crate) f_max_multiplier: f64,
}

impl ReductionOptions {
    pub(crate) fn initial_bound(&self, num_clauses_estimate: u32) -> f64 {
        (num_clauses_estimate as f64 / 3.0).max(2_000.0)
    }

    pub(crate) fn grow(&self, current: f64) -> f64 {
        let grown = match self.growth {
            GrowthSchedule::None => current,
            GrowthSchedule::Arithmetic { step } => current + step,
            GrowthSchedule::Geometric { factor } => current * factor,
            GrowthSchedule::Luby { unit } => current + unit,
        };
        grown.min(current * self.f_max_multiplier.max(1.0) + current)
    }
}

impl Default for ReductionOptions {
    fn default() -> Self {
        ReductionOptions {
            fraction_to_delete: 0.5,
            protect_lbd: 3,
            conflicts_per_reduce: 2_000,
            score: ReductionScore::Lbd,
            growth: GrowthSchedule::Geometric { factor: 1.1 },
            f_max_multiplier: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct HeuristicOptions {
    pub(crate) kind: HeuristicKind,
    pub(crate) decay: f64,
    pub(crate) random_decision_probability: f64,
}

impl Default for HeuristicOptions {
    fn default() -> Self {
        HeuristicOptions {
            kind: HeuristicKind::Vsids,
            decay: 0.95,
            random_decision_probability: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnfoundedReasonStrategy {
    Common,
    Distinct,
    Shared,
    Only,
    No,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct UnfoundedSetOptions {
    pub(crate) reason_strategy: UnfoundedReasonStrategy,
    /// Throttles expensive non-HCF minimality re-checks: a check is only
    /// run if at least this many conflicts have passed since the last one.
    pub(crate) minimality_check_conflicts: u64,
}

impl Default for UnfoundedSetOptions {
    fn default() -> Self {
        UnfoundedSetOptions {
            reason_strategy: UnfoundedReasonStrategy::Common,
            minimality_check_conflicts: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationMode {
    /// Strictly tighten the bound on every committed model.
    Optimize,
    /// Allow committing models whose cost equals the current bound, used
    /// while enumerating all optimal models.
    EnumOpt,
    /// No bound tightening; minimize statements are ignored.
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumerationMode {
    /// Accept the first model or prove UNSAT.
    Null,
    /// Block every committed model with a learnt clause over the
    /// projection literals.
    Record,
    /// Set a backtrack-level floor instead of learning a blocking clause.
    Backtrack,
    Brave,
    Cautious,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumerationOptions {
    pub mode: EnumerationMode,
    pub optimization_mode: OptimizationMode,
    /// Variables to project models onto; empty means "no projection".
    pub projection: Vec<u32>,
    /// `None` enumerates every model; `Some(n)` stops after `n`.
    pub model_limit: Option<u64>,
}

impl Default for EnumerationOptions {
    fn default() -> Self {
        EnumerationOptions {
            mode: EnumerationMode::Null,
            optimization_mode: OptimizationMode::Ignore,
            projection: Vec::new(),
            model_limit: Some(1),
        }
    }
}

/// Aggregate option bag threaded from the facade down into the search loop.
#[derive(Debug, Clone)]
pub struct SolverOptions {
    pub(crate) restart: RestartSchedule,
    pub(crate) reduction: ReductionOptions,
    pub(crate) heuristic: HeuristicOptions,
    pub(crate) minimisation_mode: MinimisationMode,
    pub(crate) unfounded_set: UnfoundedSetOptions,
    pub enumeration: EnumerationOptions,
    /// Number of initial decisions to make at random before the heuristic
    /// takes over.
    pub(crate) random_initial_descents: u32,
    pub(crate) random_seed: u64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            restart: RestartSchedule::default(),
            reduction: ReductionOptions::default(),
            heuristic: HeuristicOptions::default(),
            minimisation_mode: MinimisationMode::Recursive,
            unfounded_set: UnfoundedSetOptions::default(),
            enumeration: EnumerationOptions::default(),
            random_initial_descents: 0,
            random_seed: 0,
        }
    }
}
