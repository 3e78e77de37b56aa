use std::fmt::{Display, Formatter};

/// Type flags attached to a [`PropositionalVariable`], mirroring the
/// atom/body/both distinction a grounder assigns to program variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum VariableType {
    Atom,
    Body,
    AtomAndBody,
}

/// Identifier in `[1, num_vars]`; `0` is reserved as a sentinel and is never
/// handed out by [`super::variable_store::VariableStore::new_variable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct PropositionalVariable {
    index: u32,
}

impl PropositionalVariable {
    pub(crate) const SENTINEL: PropositionalVariable = PropositionalVariable { index: 0 };

    pub(crate) fn new(index: u32) -> Self {
        PropositionalVariable { index }
    }

    pub(crate) fn index(&self) -> u32 {
        self.index
    }
}

impl Display for PropositionalVariable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.index)
    }
}

/// The value assigned to a variable plus its preferred polarity for decision
/// making. `user` overrides `saved` (phase saving) which overrides `default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PreferredValue {
    User(bool),
    Saved(bool),
    Default,
}

impl PreferredValue {
    pub(crate) fn as_bool(&self, default_polarity: bool) -> bool {
        match *self {
            PreferredValue::User(b) | PreferredValue::Saved(b) => b,
            PreferredValue::Default => default_polarity,
        }
    }
}

/// Per-variable bookkeeping that is not part of the trail: type flags,
/// elimination/freezing status, and heuristic-relevant metadata.
#[derive(Debug, Clone)]
pub(crate) struct VariableInfo {
    pub(crate) var_type: VariableType,
    /// Variables with no possible antecedent (pure choice points) are
    /// skipped by heuristics that privilege implied literals.
    pub(crate) no_antecedent: bool,
    pub(crate) frozen: bool,
    pub(crate) eliminated: bool,
    pub(crate) preferred_value: PreferredValue,
}

impl VariableInfo {
    pub(crate) fn new(var_type: VariableType) -> Self {
        VariableInfo {
            var_type,
            no_antecedent: false,
            frozen: false,
            eliminated: false,
            preferred_value: PreferredValue::Default,
        }
    }
}
