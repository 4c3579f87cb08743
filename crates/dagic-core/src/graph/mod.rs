//! Ontology DAG model.
//!
//! A [`Dag`] holds terms in insertion order and addresses them by a dense
//! [`NodeIndex`]. Edges point from parent to child ("is-a"), and both
//! directions are kept so ancestor and descendant walks are equally cheap.

mod error;

pub use error::GraphError;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Dense index of a term inside a [`Dag`].
pub type NodeIndex = usize;

/// A single ontology term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Stable identifier (e.g. `DOID:4`).
    pub id: String,
    /// Human-readable label.
    #[serde(default)]
    pub name: String,
    /// Number of distinct descendants, once computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ndes: Option<usize>,
    /// Information content, once computed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ic: Option<f64>,
}

impl Term {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ndes: None,
            ic: None,
        }
    }
}

/// Directed acyclic graph of ontology terms.
#[derive(Debug, Clone, Default)]
pub struct Dag {
    terms: Vec<Term>,
    children: Vec<Vec<NodeIndex>>,
    parents: Vec<Vec<NodeIndex>>,
    index: HashMap<String, NodeIndex>,
    preferred_root: Option<NodeIndex>,
}

impl Dag {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a term and returns its index.
    pub fn add_term(&mut self, term: Term) -> Result<NodeIndex, GraphError> {
        if self.index.contains_key(&term.id) {
            return Err(GraphError::DuplicateNode(term.id));
        }

        let idx = self.terms.len();
        self.index.insert(term.id.clone(), idx);
        self.terms.push(term);
        self.children.push(Vec::new());
        self.parents.push(Vec::new());
        Ok(idx)
    }

    /// Adds a parent → child edge by term id.
    pub fn add_edge(&mut self, parent: &str, child: &str) -> Result<(), GraphError> {
        let p = self.require(parent)?;
        let c = self.require(child)?;
        self.add_edge_by_index(p, c)
    }

    /// Adds a parent → child edge by index. Duplicate edges are ignored.
    pub fn add_edge_by_index(&mut self, parent: NodeIndex, child: NodeIndex) -> Result<(), GraphError> {
        if parent == child {
            return Err(GraphError::SelfLoop(self.terms[parent].id.clone()));
        }
        if self.children[parent].contains(&child) {
            return Ok(());
        }

        self.children[parent].push(child);
        self.parents[child].push(parent);
        Ok(())
    }

    /// Number of terms.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Number of parent → child edges.
    pub fn edge_count(&self) -> usize {
        self.children.iter().map(Vec::len).sum()
    }

    pub fn term(&self, idx: NodeIndex) -> &Term {
        &self.terms[idx]
    }

    pub fn term_mut(&mut self, idx: NodeIndex) -> &mut Term {
        &mut self.terms[idx]
    }

    /// Looks up a term index by id.
    pub fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    /// Looks up a term index by id, failing if it is absent.
    pub fn require(&self, id: &str) -> Result<NodeIndex, GraphError> {
        self.index_of(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
    }

    /// Looks up a term by id.
    pub fn get(&self, id: &str) -> Option<&Term> {
        self.index_of(id).map(|idx| &self.terms[idx])
    }

    pub fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.children[idx]
    }

    pub fn parents(&self, idx: NodeIndex) -> &[NodeIndex] {
        &self.parents[idx]
    }

    /// Iterates over all terms with their indices, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Term)> {
        self.terms.iter().enumerate()
    }

    /// Iterates over all parent → child edges as index pairs.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.children
            .iter()
            .enumerate()
            .flat_map(|(p, cs)| cs.iter().map(move |&c| (p, c)))
    }

    /// All terms without parents, in insertion order.
    pub fn roots(&self) -> Vec<NodeIndex> {
        (0..self.terms.len())
            .filter(|&idx| self.parents[idx].is_empty())
            .collect()
    }

    /// Pins the root used by [`Dag::root`], overriding automatic detection.
    pub fn set_root(&mut self, id: &str) -> Result<(), GraphError> {
        self.preferred_root = Some(self.require(id)?);
        Ok(())
    }

    /// The root used for information content and MICA searches.
    ///
    /// With several parentless terms the first one wins and a warning is
    /// logged, unless a root was pinned with [`Dag::set_root`].
    pub fn root(&self) -> Result<NodeIndex, GraphError> {
        if let Some(root) = self.preferred_root {
            return Ok(root);
        }
        if self.is_empty() {
            return Err(GraphError::Empty);
        }

        let roots = self.roots();
        match roots.len() {
            0 => Err(GraphError::NoRoot),
            1 => Ok(roots[0]),
            n => {
                warn!(
                    count = n,
                    root = %self.terms[roots[0]].id,
                    "Graph has multiple roots; using the first"
                );
                Ok(roots[0])
            }
        }
    }

    /// True when every term carries an information content value.
    pub fn has_information_content(&self) -> bool {
        !self.terms.is_empty() && self.terms.iter().all(|t| t.ic.is_some())
    }

    /// Clears computed `ndes` and `ic` values.
    pub fn clear_information_content(&mut self) {
        for term in &mut self.terms {
            term.ndes = None;
            term.ic = None;
        }
    }
}
