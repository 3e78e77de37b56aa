//! the unfounded-set checker. Maintains per-atom source
//! pointers into the positive body-atom dependency graph (PBADG) and
//! forces unfounded atoms false, the mechanism that gives non-tight ASP
//! programs their well-founded-semantics answer sets.

mod dependency_graph;

pub(crate) use dependency_graph::{AtomId, Body, BodyId, GraphBuilder};

use std::collections::VecDeque;

use crate::basic_types::{FnvSet, Literal, PropagationStatusPostPropagator};
use crate::engine::propagation::{priority, PostPropagator, PropagationContext, PropagationContextMut};
use crate::options::UnfoundedReasonStrategy;

/// Built once from a finalized [`GraphBuilder`]; the graph
/// itself is static for the lifetime of a non-incremental program.
#[derive(Debug)]
pub(crate) struct UnfoundedSetChecker {
    graph: dependency_graph::DependencyGraph,
    /// `source[atom]` is the body currently justifying that atom, if any.
    source: Vec<Option<BodyId>>,
    has_source: Vec<bool>,
    reason_strategy: UnfoundedReasonStrategy,
    todo: VecDeque<AtomId>,
    in_todo: FnvSet<AtomId>,
}

impl UnfoundedSetChecker {
    pub(crate) fn new(
        graph: dependency_graph::DependencyGraph,
        reason_strategy: UnfoundedReasonStrategy,
    ) -> Self {
        let num_atoms = graph.num_atoms();
        UnfoundedSetChecker {
            graph,
            source: vec![None; num_atoms],
            has_source: vec![false; num_atoms],
            reason_strategy,
            todo: VecDeque::new(),
            in_todo: FnvSet::default(),
        }
    }

    fn body_is_valid_source(&self, body: BodyId, context: &PropagationContext) -> bool {
        let body_node = self.graph.body(body);
        if context.is_false(body_node.literal) {
            return false;
        }
        body_node
            .positive_preds
            .iter()
            .all(|&pred| !context.is_false(self.graph.atom(pred).literal))
            && body_node
                .extra_literals
                .iter()
                .all(|&literal| !context.is_false(literal))
    }

    /// Tries to (re-)establish a source for every atom, giving priority to
    /// an external body (one outside the atom's own SCC, which can never
    /// itself depend on the atom) before considering an internal one whose
    /// SCC-predecessors are all already sourced.
    fn find_sources(&mut self, atoms: &[AtomId], context: &PropagationContext) -> Vec<AtomId> {
        let mut resolved: FnvSet<AtomId> = FnvSet::default();
        let mut changed = true;
        while changed {
            changed = false;
            for &atom in atoms {
                if self.has_source[atom.0 as usize] || resolved.contains(&atom) {
                    continue;
                }
                let atom_scc = self.graph.atom(atom).scc;
                let candidate = self.graph.atom(atom).supporting_bodies.iter().find(|&&body| {
                    if !self.body_is_valid_source(body, context) {
                        return false;
                    }
                    let body_node = self.graph.body(body);
                    if self.graph.body_scc(body) != atom_scc {
                        return true;
                    }
                    body_node.positive_preds.iter().all(|&pred| {
                        self.graph.atom(pred).scc != atom_scc
                            || self.has_source[pred.0 as usize]
                            || resolved.contains(&pred)
                    })
                });
                if let Some(&body) = candidate {
                    self.source[atom.0 as usize] = Some(body);
                    self.has_source[atom.0 as usize] = true;
                    resolved.insert(atom);
                    changed = true;
                }
            }
        }
        atoms
            .iter()
            .copied()
            .filter(|atom| !self.has_source[atom.0 as usize])
            .collect()
    }

    /// Justifying literals for forcing `atom` false: every body supporting
    /// it that is currently false (a loose but sound approximation of "the
    /// external bodies of U").
    fn reason_for_unfounded(&self, atom: AtomId, context: &PropagationContext) -> Vec<Literal> {
        if matches!(self.reason_strategy, UnfoundedReasonStrategy::No) {
            // `No` trades a valid explanation for speed: callers using this
            // strategy must be configured to treat the forced literal as an
            // unjustified root-level fact rather than drive further conflict
            // analysis from it.
            return Vec::new();
        }
        self.graph
            .atom(atom)
            .supporting_bodies
            .iter()
            .map(|&body| self.graph.body(body).literal)
            .filter(|&literal| context.is_false(literal))
            .map(|literal| !literal)
            .collect()
    }

    fn enqueue_invalidated(&mut self, atom: AtomId) {
        if self.in_todo.insert(atom) {
            self.todo.push_back(atom);
        }
    }
}

impl PostPropagator for UnfoundedSetChecker {
    fn name(&self) -> &str {
        "unfounded-set"
    }

    fn priority(&self) -> u32 {
        priority::UNFOUNDED_SET
    }

    fn init(&mut self, context: &mut PropagationContextMut) -> Result<(), Vec<Literal>> {
        let all_atoms: Vec<AtomId> = (0..self.graph.num_atoms() as u32).map(AtomId).collect();
        let unfounded = self.find_sources(&all_atoms, &context.as_read_only());
        if unfounded.is_empty() {
            return Ok(());
        }
        for atom in unfounded {
            let reason = self.reason_for_unfounded(atom, &context.as_read_only());
            let literal = self.graph.atom(atom).literal;
            if context.is_true(literal) {
                return Err(reason);
            }
            let _ = context.enqueue(!literal);
        }
        Ok(())
    }

    fn propagate(&mut self, context: &mut PropagationContextMut) -> PropagationStatusPostPropagator {
        // Re-scan every body whose positive predecessors or own literal
        // might have changed since the last call; a from-scratch scan is
        // simple and correct, trading away the performance of a
        // watch-driven incremental source search.
        let read_only = context.as_read_only();
        for body in self.graph.body_ids() {
            if !self.body_is_valid_source(body, &read_only) {
                for &atom in &self.graph.body(body).heads {
                    if self.source[atom.0 as usize] == Some(body) {
                        self.has_source[atom.0 as usize] = false;
                        self.enqueue_invalidated(atom);
                    }
                }
            }
        }

        if self.todo.is_empty() {
            return PropagationStatusPostPropagator::NoConflict;
        }

        let affected: Vec<AtomId> = self.todo.drain(..).collect();
        self.in_todo.clear();
        let unfounded = self.find_sources(&affected, &context.as_read_only());

        for atom in unfounded {
            let literal = self.graph.atom(atom).literal;
            if context.is_true(literal) {
                let reason = self.reason_for_unfounded(atom, &context.as_read_only());
                return PropagationStatusPostPropagator::Conflict(reason);
            }
            if !context.is_false(literal) && !context.enqueue(!literal) {
                let reason = self.reason_for_unfounded(atom, &context.as_read_only());
                return PropagationStatusPostPropagator::Conflict(reason);
            }
        }
        PropagationStatusPostPropagator::NoConflict
    }

    fn reason(&self, literal: Literal, context: &PropagationContext) -> Vec<Literal> {
        let atom = self
            .graph
            .atom_ids()
            .find(|&atom| self.graph.atom(atom).literal == !literal)
            .expect("reason() called for a literal this propagator did not force");
        self.reason_for_unfounded(atom, context)
    }

    fn undo_level(&mut self, _context: &PropagationContext) {
        // Sources are re-derived from scratch on the next `propagate` call
        // (see its doc comment), so nothing needs to be rewound here beyond
        // clearing the stale todo queue.
        self.todo.clear();
        self.in_todo.clear();
        for flag in &mut self.has_source {
            *flag = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::VariableType;
    use crate::engine::assignments::AssignmentsPropositional;
    use crate::engine::propagation::PropagationContextMut;

    #[test]
    fn mutually_dependent_atoms_with_no_external_support_are_unfounded() {
        // a :- b.  b :- a.  Neither has an external support, so both must
        // be forced false.
        let mut assignments = AssignmentsPropositional::new();
        let a = Literal::new(assignments.new_variable(VariableType::Atom), true);
        let b = Literal::new(assignments.new_variable(VariableType::Atom), true);
        let body_a = Literal::new(assignments.new_variable(VariableType::Body), true); // "b" as a body
        let body_b = Literal::new(assignments.new_variable(VariableType::Body), true); // "a" as a body

        let mut builder = GraphBuilder::new();
        let atom_a = builder.add_atom(a);
        let atom_b = builder.add_atom(b);
        let node_body_a = builder.add_body(Body {
            literal: body_a,
            positive_preds: vec![atom_b],
            extra_literals: vec![],
            heads: vec![atom_a],
        });
        let node_body_b = builder.add_body(Body {
            literal: body_b,
            positive_preds: vec![atom_a],
            extra_literals: vec![],
            heads: vec![atom_b],
        });
        let _ = (node_body_a, node_body_b);
        let graph = builder.build();

        let mut checker = UnfoundedSetChecker::new(graph, UnfoundedReasonStrategy::Common);
        let mut context = PropagationContextMut::new(&mut assignments, crate::basic_types::PropagatorId(0));
        checker.init(&mut context).expect("not a root conflict");

        assert!(assignments.is_false(a));
        assert!(assignments.is_false(b));
    }
}
