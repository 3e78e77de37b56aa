use crate::basic_types::{FnvMap, Literal, PropositionalVariable};

/// One entry of the output table: the textual atom name the grounder
/// assigned and the literal whose truth under a model means the atom
/// should be reported.
#[derive(Debug, Clone)]
pub(crate) struct OutputAtom {
    pub(crate) name: String,
    pub(crate) condition: Literal,
}

/// symbol/output table: maps propositional variables to the
/// names the (out-of-scope) grounder/I-O layer associates with them, for
/// use in model printing and in `getCore`/event reporting. Never consulted
/// by propagation itself.
#[derive(Debug, Default)]
pub(crate) struct SymbolTable {
    by_variable: FnvMap<PropositionalVariable, String>,
    by_name: FnvMap<String, PropositionalVariable>,
    outputs: Vec<OutputAtom>,
    /// Inert passthrough for lparse's "keep facts" rewriting flag (open
    /// question): an output-formatting choice with no effect on the
    /// core, surfaced here only so the I/O layer can read it back.
    pub(crate) keep_facts: bool,
}

impl SymbolTable {
    pub(crate) fn new() -> Self {
        SymbolTable::default()
    }

    pub(crate) fn name_of(&self, variable: PropositionalVariable) -> Option<&str> {
        self.by_variable.get(&variable).map(String::as_str)
    }

    pub(crate) fn variable_named(&self, name: &str) -> Option<PropositionalVariable> {
        self.by_name.get(name).copied()
    }

    /// Registers `name` for `variable`. Returns the previously registered
    /// variable, if any, so the caller can surface
    /// [`crate::basic_types::ConstraintOperationError::DuplicateSymbol`].
    pub(crate) fn add_symbol(
        &mut self,
        variable: PropositionalVariable,
        name: String,
    ) -> Option<PropositionalVariable> {
        let previous = self.by_name.insert(name.clone(), variable);
        let _ = self.by_variable.insert(variable, name);
        previous
    }

    pub(crate) fn add_output(&mut self, name: String, condition: Literal) {
        self.outputs.push(OutputAtom { name, condition });
    }

    pub(crate) fn outputs(&self) -> &[OutputAtom] {
        &self.outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::VariableType;
    use crate::engine::assignments::AssignmentsPropositional;

    #[test]
    fn round_trips_name_lookup() {
        let mut assignments = AssignmentsPropositional::new();
        let variable = assignments.new_variable(VariableType::Atom);
        let mut table = SymbolTable::new();
        assert!(table
            .add_symbol(variable, "p(1)".to_owned())
            .is_none());
        assert_eq!(table.name_of(variable), Some("p(1)"));
        assert_eq!(table.variable_named("p(1)"), Some(variable));
    }

    #[test]
    fn duplicate_symbol_reports_previous_owner() {
        let mut assignments = AssignmentsPropositional::new();
        let a = assignments.new_variable(VariableType::Atom);
        let b = assignments.new_variable(VariableType::Atom);
        let mut table = SymbolTable::new();
        assert!(table.add_symbol(a, "p".to_owned()).is_none());
        assert_eq!(table.add_symbol(b, "p".to_owned()), Some(a));
    }
}
