//! Structural information content.
//!
//! Scores every term from its distinct-descendant count relative to the
//! root's: `ic = |-log10(min((ndes + 1) / ndes_root, 1))|`. Generic terms
//! near the root score close to zero, leaves score highest.

mod descendants;

pub use descendants::{count_descendants, descendants};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::graph::{Dag, GraphError};
use descendants::DescendantPass;

/// Information content of a term with `ndes` descendants, against a root
/// with `root_ndes` descendants.
///
/// A root without descendants (single-term graph) yields 0 for every term.
pub fn information_content(ndes: usize, root_ndes: usize) -> f64 {
    if root_ndes == 0 {
        return 0.0;
    }
    let ratio = ((ndes as f64 + 1.0) / root_ndes as f64).min(1.0);
    (-ratio.log10()).abs()
}

/// Outcome of a compute pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IcSummary {
    pub root: String,
    pub root_ndes: usize,
    pub nodes: usize,
    pub edges: usize,
    pub min_ic: f64,
    pub max_ic: f64,
}

/// Computes `ndes` and `ic` for every term, in place.
pub fn compute_information_content(dag: &mut Dag) -> Result<IcSummary, GraphError> {
    let root = dag.root()?;

    let mut pass = DescendantPass::new(dag);
    pass.run(dag, root)?;
    for other in dag.roots() {
        if !pass.is_done(other) {
            debug!(root = %dag.term(other).id, "Counting descendants of secondary root");
            pass.run(dag, other)?;
        }
    }

    // Any term still unfinished is only reachable through a cycle.
    if let Some(idx) = (0..dag.len()).find(|&idx| !pass.is_done(idx)) {
        return Err(GraphError::Cycle(dag.term(idx).id.clone()));
    }
    pass.annotate(dag);

    let root_ndes = dag.term(root).ndes.unwrap_or(0);
    if root_ndes == 0 {
        warn!(root = %dag.term(root).id, "Root has no descendants; information content is 0 everywhere");
    }

    let mut min_ic = f64::INFINITY;
    let mut max_ic = 0.0_f64;
    for idx in 0..dag.len() {
        let term = dag.term_mut(idx);
        let ic = information_content(term.ndes.unwrap_or(0), root_ndes);
        term.ic = Some(ic);
        min_ic = min_ic.min(ic);
        max_ic = max_ic.max(ic);
    }

    let summary = IcSummary {
        root: dag.term(root).id.clone(),
        root_ndes,
        nodes: dag.len(),
        edges: dag.edge_count(),
        min_ic,
        max_ic,
    };
    info!(
        root = %summary.root,
        root_ndes,
        nodes = summary.nodes,
        max_ic,
        "Computed information content"
    );

    Ok(summary)
}
