//! The positive body-atom dependency graph (PBADG) and its SCC
//! decomposition, built once from a finalized [`GraphBuilder`] and then
//! owned by an [`super::UnfoundedSetChecker`].

use crate::basic_types::Literal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct AtomId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct BodyId(pub(crate) u32);

/// A normal-rule body: true once every positive predecessor and every
/// extra (non-positive-dependency) literal is not false. `heads` lists the
/// atoms this body supports.
#[derive(Debug, Clone)]
pub(crate) struct Body {
    pub(crate) literal: Literal,
    pub(crate) positive_preds: Vec<AtomId>,
    pub(crate) extra_literals: Vec<Literal>,
    pub(crate) heads: Vec<AtomId>,
}

#[derive(Debug)]
pub(crate) struct AtomNode {
    pub(crate) literal: Literal,
    pub(crate) supporting_bodies: Vec<BodyId>,
    pub(crate) scc: u32,
}

#[derive(Debug)]
pub(crate) struct BodyNode {
    pub(crate) literal: Literal,
    pub(crate) positive_preds: Vec<AtomId>,
    pub(crate) extra_literals: Vec<Literal>,
    pub(crate) heads: Vec<AtomId>,
    pub(crate) scc: u32,
}

#[derive(Debug)]
pub(crate) struct DependencyGraph {
    atoms: Vec<AtomNode>,
    bodies: Vec<BodyNode>,
}

impl DependencyGraph {
    pub(crate) fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub(crate) fn atom(&self, id: AtomId) -> &AtomNode {
        &self.atoms[id.0 as usize]
    }

    pub(crate) fn body(&self, id: BodyId) -> &BodyNode {
        &self.bodies[id.0 as usize]
    }

    pub(crate) fn body_scc(&self, id: BodyId) -> u32 {
        self.bodies[id.0 as usize].scc
    }

    pub(crate) fn atom_ids(&self) -> impl Iterator<Item = AtomId> + '_ {
        (0..self.atoms.len() as u32).map(AtomId)
    }

    pub(crate) fn body_ids(&self) -> impl Iterator<Item = BodyId> + '_ {
        (0..self.bodies.len() as u32).map(BodyId)
    }
}

/// Incrementally collects atoms and bodies (as a grounder would while
/// translating rules) and computes the final dependency graph's SCCs on
/// [`GraphBuilder::build`].
#[derive(Debug, Default)]
pub(crate) struct GraphBuilder {
    atom_literals: Vec<Literal>,
    bodies: Vec<Body>,
}

impl GraphBuilder {
    pub(crate) fn new() -> Self {
        GraphBuilder::default()
    }

    pub(crate) fn add_atom(&mut self, literal: Literal) -> AtomId {
        self.atom_literals.push(literal);
        AtomId(self.atom_literals.len() as u32 - 1)
    }

    pub(crate) fn add_body(&mut self, body: Body) -> BodyId {
        self.bodies.push(body);
        BodyId(self.bodies.len() as u32 - 1)
    }

    pub(crate) fn build(self) -> DependencyGraph {
        let num_atoms = self.atom_literals.len();
        let num_bodies = self.bodies.len();

        // Node `i < num_atoms` is atom `i`; node `num_atoms + j` is body `j`.
        let node_count = num_atoms + num_bodies;
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        for (body_index, body) in self.bodies.iter().enumerate() {
            let body_node = num_atoms + body_index;
            for &pred in &body.positive_preds {
                adjacency[pred.0 as usize].push(body_node);
            }
            for &head in &body.heads {
                adjacency[body_node].push(head.0 as usize);
            }
        }

        let scc_of = tarjan_scc(&adjacency);

        let mut supporting_bodies = vec![Vec::new(); num_atoms];
        for (body_index, body) in self.bodies.iter().enumerate() {
            for &head in &body.heads {
                supporting_bodies[head.0 as usize].push(BodyId(body_index as u32));
            }
        }

        let atoms = self
            .atom_literals
            .into_iter()
            .enumerate()
            .map(|(index, literal)| AtomNode {
                literal,
                supporting_bodies: std::mem::take(&mut supporting_bodies[index]),
                scc: scc_of[index],
            })
            .collect();

        let bodies = self
            .bodies
            .into_iter()
            .enumerate()
            .map(|(index, body)| BodyNode {
                literal: body.literal,
                positive_preds: body.positive_preds,
                extra_literals: body.extra_literals,
                heads: body.heads,
                scc: scc_of[num_atoms + index],
            })
            .collect();

        DependencyGraph { atoms, bodies }
    }
}

/// Iterative (stack-based) Tarjan SCC over the combined atom/body node
/// space, returning each node's component index. Avoided recursion since
/// dependency graphs from grounded programs can be deep chains.
fn tarjan_scc(adjacency: &[Vec<usize>]) -> Vec<u32> {
    let n = adjacency.len();
    let mut index_of: Vec<Option<u32>> = vec![None; n];
    let mut low_link = vec![0u32; n];
    let mut on_stack = vec![false; n];
    let mut stack = Vec::new();
    let mut scc_of = vec![u32::MAX; n];
    let mut next_index = 0u32;
    let mut next_scc = 0u32;

    for start in 0..n {
        if index_of[start].is_some() {
            continue;
        }
        // Explicit call stack of `(node, next child index to visit)`,
        // standing in for the recursive DFS frame.
        let mut call_stack: Vec<(usize, usize)> = vec![(start, 0)];
        index_of[start] = Some(next_index);
        low_link[start] = next_index;
        next_index += 1;
        stack.push(start);
        on_stack[start] = true;

        while let Some(&mut (v, ref mut child_idx)) = call_stack.last_mut() {
            if *child_idx < adjacency[v].len() {
                let w = adjacency[v][*child_idx];
                *child_idx += 1;
                if index_of[w].is_none() {
                    index_of[w] = Some(next_index);
                    low_link[w] = next_index;
                    next_index += 1;
                    stack.push(w);
                    on_stack[w] = true;
                    call_stack.push((w, 0));
                } else if on_stack[w] {
                    low_link[v] = low_link[v].min(index_of[w].unwrap());
                }
            } else {
                call_stack.pop();
                if low_link[v] == index_of[v].unwrap() {
                    let scc = next_scc;
                    next_scc += 1;
                    loop {
                        let w = stack.pop().expect("root's own SCC must be on the stack");
                        on_stack[w] = false;
                        scc_of[w] = scc;
                        if w == v {
                            break;
                        }
                    }
                }
                if let Some(&mut (parent, _)) = call_stack.last_mut() {
                    low_link[parent] = low_link[parent].min(low_link[v]);
                }
            }
        }
    }

    scc_of
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic_types::VariableType;
    use crate::engine::assignments::AssignmentsPropositional;

    #[test]
    fn cyclic_atoms_share_an_scc() {
        let mut assignments = AssignmentsPropositional::new();
        let a = Literal::new(assignments.new_variable(VariableType::Atom), true);
        let b = Literal::new(assignments.new_variable(VariableType::Atom), true);
        let body_a = Literal::new(assignments.new_variable(VariableType::Body), true);
        let body_b = Literal::new(assignments.new_variable(VariableType::Body), true);

        let mut builder = GraphBuilder::new();
        let atom_a = builder.add_atom(a);
        let atom_b = builder.add_atom(b);
        builder.add_body(Body {
            literal: body_a,
            positive_preds: vec![atom_b],
            extra_literals: vec![],
            heads: vec![atom_a],
        });
        builder.add_body(Body {
            literal: body_b,
            positive_preds: vec![atom_a],
            extra_literals: vec![],
            heads: vec![atom_b],
        });
        let graph = builder.build();

        assert_eq!(graph.atom(atom_a).scc, graph.atom(atom_b).scc);
    }

    #[test]
    fn acyclic_atoms_get_distinct_sccs() {
        let mut assignments = AssignmentsPropositional::new();
        let a = Literal::new(assignments.new_variable(VariableType::Atom), true);
        let b = Literal::new(assignments.new_variable(VariableType::Atom), true);
        let body_b = Literal::new(assignments.new_variable(VariableType::Body), true);

        let mut builder = GraphBuilder::new();
        let atom_a = builder.add_atom(a);
        let atom_b = builder.add_atom(b);
        builder.add_body(Body {
            literal: body_b,
            positive_preds: vec![atom_a],
            extra_literals: vec![],
            heads: vec![atom_b],
        });
        let graph = builder.build();

        assert_ne!(graph.atom(atom_a).scc, graph.atom(atom_b).scc);
    }
}
