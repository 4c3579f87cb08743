//! Most-informative common ancestor (MICA) search.
//!
//! The MICA of two terms is the shared ancestor with the highest
//! information content. Its IC is the similarity score of the pair.

mod ancestors;
mod error;

pub use ancestors::{ancestors, common_ancestors};
pub use error::MicaError;

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, error};

use crate::graph::{Dag, NodeIndex};

/// A resolved MICA and its information content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MicaResult {
    pub node: NodeIndex,
    pub ic: f64,
}

/// MICA lookups against a graph with computed information content.
pub struct MicaFinder<'a> {
    dag: &'a Dag,
    root: NodeIndex,
}

impl<'a> MicaFinder<'a> {
    /// Creates a finder rooted at the graph's root.
    pub fn new(dag: &'a Dag) -> Result<Self, MicaError> {
        let root = dag.root()?;
        if let Some((_, term)) = dag.iter().find(|(_, t)| t.ic.is_none()) {
            return Err(MicaError::MissingIc(term.id.clone()));
        }
        Ok(Self { dag, root })
    }

    pub fn dag(&self) -> &'a Dag {
        self.dag
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Finds the MICA of `a` and `b`, searching down from the root.
    pub fn find(&self, a: NodeIndex, b: NodeIndex) -> Result<MicaResult, MicaError> {
        if a == b {
            return self.result(a);
        }

        let anc_a = ancestors(self.dag, a);
        let anc_b = ancestors(self.dag, b);

        // Siblings with a single shared parent resolve without a search,
        // unless one term subsumes the other.
        if !anc_a.contains(&b) && !anc_b.contains(&a) {
            let parents_a: HashSet<NodeIndex> = self.dag.parents(a).iter().copied().collect();
            let mut shared = self
                .dag
                .parents(b)
                .iter()
                .copied()
                .filter(|p| parents_a.contains(p));
            if let (Some(only), None) = (shared.next(), shared.next()) {
                return self.result(only);
            }
        }

        self.search(a, b, self.root, &anc_a, &anc_b)
    }

    /// Finds the MICA of `a` and `b`, searching down from `from`.
    ///
    /// `from` must itself be a common ancestor of both terms.
    pub fn find_from(&self, a: NodeIndex, b: NodeIndex, from: NodeIndex) -> Result<MicaResult, MicaError> {
        if a == b {
            return self.result(a);
        }

        let anc_a = ancestors(self.dag, a);
        let anc_b = ancestors(self.dag, b);
        self.search(a, b, from, &anc_a, &anc_b)
    }

    /// Finds the MICA of two terms given by id.
    pub fn find_by_id(&self, a: &str, b: &str) -> Result<MicaResult, MicaError> {
        let a = self.dag.require(a)?;
        let b = self.dag.require(b)?;
        self.find(a, b)
    }

    /// Walks down from `from` through nodes that are ancestors of both
    /// terms, keeping the best candidate. Each node is examined once.
    fn search(
        &self,
        a: NodeIndex,
        b: NodeIndex,
        from: NodeIndex,
        anc_a: &HashSet<NodeIndex>,
        anc_b: &HashSet<NodeIndex>,
    ) -> Result<MicaResult, MicaError> {
        if !anc_a.contains(&from) || !anc_b.contains(&from) {
            let err = MicaError::NotCommonAncestor {
                from: self.dag.term(from).id.clone(),
                a: self.dag.term(a).id.clone(),
                b: self.dag.term(b).id.clone(),
            };
            error!("{err}");
            return Err(err);
        }

        let mut best = self.result(from)?;
        let mut visited = HashSet::from([from]);
        let mut stack = vec![from];
        let mut examined = 0usize;

        while let Some(node) = stack.pop() {
            examined += 1;
            for &child in self.dag.children(node) {
                if anc_a.contains(&child) && anc_b.contains(&child) && visited.insert(child) {
                    let candidate = self.result(child)?;
                    if self.is_better(&candidate, &best) {
                        best = candidate;
                    }
                    stack.push(child);
                }
            }
        }

        debug!(
            a = %self.dag.term(a).id,
            b = %self.dag.term(b).id,
            mica = %self.dag.term(best.node).id,
            examined,
            "Resolved MICA"
        );
        Ok(best)
    }

    /// Higher IC wins; equal IC falls back to the smaller id so the
    /// result does not depend on traversal order.
    fn is_better(&self, candidate: &MicaResult, best: &MicaResult) -> bool {
        if candidate.ic != best.ic {
            return candidate.ic > best.ic;
        }
        self.dag.term(candidate.node).id < self.dag.term(best.node).id
    }

    fn result(&self, node: NodeIndex) -> Result<MicaResult, MicaError> {
        let term = self.dag.term(node);
        let ic = term.ic.ok_or_else(|| MicaError::MissingIc(term.id.clone()))?;
        Ok(MicaResult { node, ic })
    }
}
