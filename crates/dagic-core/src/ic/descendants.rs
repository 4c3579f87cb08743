//! Distinct-descendant counting.

use std::collections::HashSet;

use crate::graph::{Dag, GraphError, NodeIndex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Open,
    Done,
}

/// Post-order DFS that memoizes each finished node's descendant set.
///
/// A node's set is the union over its children of the child plus the
/// child's own set. Running several passes on one instance (one per root)
/// reuses the sets already finished.
pub(crate) struct DescendantPass {
    state: Vec<Visit>,
    sets: Vec<HashSet<NodeIndex>>,
}

impl DescendantPass {
    pub(crate) fn new(dag: &Dag) -> Self {
        Self {
            state: vec![Visit::New; dag.len()],
            sets: vec![HashSet::new(); dag.len()],
        }
    }

    /// Finishes every node reachable from `start`.
    pub(crate) fn run(&mut self, dag: &Dag, start: NodeIndex) -> Result<(), GraphError> {
        if self.state[start] == Visit::Done {
            return Ok(());
        }

        // (node, position of the next child to visit)
        let mut stack: Vec<(NodeIndex, usize)> = vec![(start, 0)];
        self.state[start] = Visit::Open;

        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            let children = dag.children(node);
            if frame.1 < children.len() {
                let child = children[frame.1];
                frame.1 += 1;
                match self.state[child] {
                    Visit::Done => {}
                    Visit::Open => return Err(GraphError::Cycle(dag.term(child).id.clone())),
                    Visit::New => {
                        self.state[child] = Visit::Open;
                        stack.push((child, 0));
                    }
                }
                continue;
            }

            let mut set = HashSet::new();
            for &child in children {
                set.insert(child);
                set.extend(self.sets[child].iter().copied());
            }
            self.sets[node] = set;
            self.state[node] = Visit::Done;
            stack.pop();
        }

        Ok(())
    }

    /// Writes `ndes` onto every finished node.
    pub(crate) fn annotate(&self, dag: &mut Dag) {
        for (idx, set) in self.sets.iter().enumerate() {
            if self.state[idx] == Visit::Done {
                dag.term_mut(idx).ndes = Some(set.len());
            }
        }
    }

    pub(crate) fn is_done(&self, idx: NodeIndex) -> bool {
        self.state[idx] == Visit::Done
    }
}

/// Counts distinct descendants of every node reachable from `start` and
/// stores them as `ndes`. Returns the count for `start` itself.
pub fn count_descendants(dag: &mut Dag, start: NodeIndex) -> Result<usize, GraphError> {
    let mut pass = DescendantPass::new(dag);
    pass.run(dag, start)?;
    pass.annotate(dag);
    Ok(pass.sets[start].len())
}

/// The distinct descendants of a single node, without annotating the graph.
pub fn descendants(dag: &Dag, node: NodeIndex) -> Result<HashSet<NodeIndex>, GraphError> {
    let mut seen = HashSet::new();
    let mut stack: Vec<NodeIndex> = dag.children(node).to_vec();

    while let Some(current) = stack.pop() {
        if current == node {
            return Err(GraphError::Cycle(dag.term(node).id.clone()));
        }
        if seen.insert(current) {
            stack.extend(dag.children(current).iter().copied());
        }
    }

    Ok(seen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Term;

    fn dag_from(ids: &[&str], edges: &[(&str, &str)]) -> Dag {
        let mut dag = Dag::new();
        for id in ids {
            dag.add_term(Term::new(*id, "")).unwrap();
        }
        for (p, c) in edges {
            dag.add_edge(p, c).unwrap();
        }
        dag
    }

    #[test]
    fn test_leaf_has_zero_descendants() {
        let mut dag = dag_from(&["r", "x"], &[("r", "x")]);
        count_descendants(&mut dag, 0).unwrap();
        assert_eq!(dag.term(1).ndes, Some(0));
        assert_eq!(dag.term(0).ndes, Some(1));
    }

    #[test]
    fn test_shared_descendant_counted_once() {
        // r -> a, r -> b, a -> c, b -> c, c -> d
        let mut dag = dag_from(
            &["r", "a", "b", "c", "d"],
            &[("r", "a"), ("r", "b"), ("a", "c"), ("b", "c"), ("c", "d")],
        );
        assert_eq!(count_descendants(&mut dag, 0).unwrap(), 4);
        assert_eq!(dag.get("a").unwrap().ndes, Some(2));
        assert_eq!(dag.get("c").unwrap().ndes, Some(1));
    }

    #[test]
    fn test_cycle_is_reported() {
        let mut dag = dag_from(&["r", "a", "b"], &[("r", "a"), ("a", "b"), ("b", "a")]);
        assert!(matches!(count_descendants(&mut dag, 0), Err(GraphError::Cycle(_))));
        assert!(matches!(descendants(&dag, 1), Err(GraphError::Cycle(_))));
    }

    fn chain(n: usize) -> Dag {
        let mut dag = Dag::new();
        for i in 0..n {
            dag.add_term(Term::new(format!("t{i}"), "")).unwrap();
        }
        for i in 1..n {
            dag.add_edge_by_index(i - 1, i).unwrap();
        }
        dag
    }

    #[test]
    fn test_deep_chain_does_not_overflow() {
        let dag = chain(200_000);
        assert_eq!(descendants(&dag, 0).unwrap().len(), 199_999);

        let mut dag = chain(3_000);
        assert_eq!(count_descendants(&mut dag, 0).unwrap(), 2_999);
        assert_eq!(dag.term(2_999).ndes, Some(0));
        assert_eq!(dag.term(1_000).ndes, Some(1_999));
    }
}
