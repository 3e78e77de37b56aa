use thiserror::Error;

use super::variable::PropositionalVariable;

/// Logic errors as described in the error-handling design: illegal API
/// ordering or malformed references. These always surface at the facade
/// boundary and are never recovered from internally.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstraintOperationError {
    #[error("solve() was called before end_init()")]
    SolveBeforeEndInit,

    #[error("a structural change (addVar/addClause/addRule) was attempted after end_init() without first calling unfreeze()")]
    MutationAfterEndInit,

    #[error("variable {0} is out of bounds for this problem")]
    VariableOutOfBounds(PropositionalVariable),

    #[error("symbol {0:?} was already registered in the output table")]
    DuplicateSymbol(String),

    #[error("attempted to unfreeze a problem that was never frozen")]
    UnfreezeBeforeFreeze,

    #[error("an empty clause was derived at the root level: the problem is unsatisfiable")]
    RootLevelConflict,
}

/// The outcome of a `solve` call that did not produce a definite SAT/UNSAT
/// answer. These are values, not errors: the solver's internal state
/// remains valid and solving can be resumed with adjusted limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownReason {
    Interrupted,
    ConflictLimitReached,
    MemoryLimitReached,
}
