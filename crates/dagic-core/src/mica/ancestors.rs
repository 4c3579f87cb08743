use std::collections::HashSet;

use crate::graph::{Dag, NodeIndex};

/// All ancestors of `node`, including `node` itself.
pub fn ancestors(dag: &Dag, node: NodeIndex) -> HashSet<NodeIndex> {
    let mut seen = HashSet::from([node]);
    let mut stack = vec![node];

    while let Some(current) = stack.pop() {
        for &parent in dag.parents(current) {
            if seen.insert(parent) {
                stack.push(parent);
            }
        }
    }

    seen
}

/// Ancestors shared by `a` and `b`, each set including its own node.
pub fn common_ancestors(dag: &Dag, a: NodeIndex, b: NodeIndex) -> HashSet<NodeIndex> {
    let of_a = ancestors(dag, a);
    let of_b = ancestors(dag, b);
    of_a.intersection(&of_b).copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Term;

    #[test]
    fn test_ancestors_through_multiple_parents() {
        let mut dag = Dag::new();
        for id in ["r", "a", "b", "c"] {
            dag.add_term(Term::new(id, "")).unwrap();
        }
        dag.add_edge("r", "a").unwrap();
        dag.add_edge("r", "b").unwrap();
        dag.add_edge("a", "c").unwrap();
        dag.add_edge("b", "c").unwrap();

        assert_eq!(ancestors(&dag, 3), HashSet::from([0, 1, 2, 3]));
        assert_eq!(ancestors(&dag, 0), HashSet::from([0]));
        assert_eq!(common_ancestors(&dag, 1, 3), HashSet::from([0, 1]));
    }
}
