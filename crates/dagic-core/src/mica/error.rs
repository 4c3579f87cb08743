use thiserror::Error;

use crate::graph::GraphError;

/// Errors raised by MICA lookups.
#[derive(Debug, Error)]
pub enum MicaError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("Information content not computed for node: {0}")]
    MissingIc(String),

    #[error("{from} is not a common ancestor of {a} and {b}")]
    NotCommonAncestor { from: String, a: String, b: String },
}
