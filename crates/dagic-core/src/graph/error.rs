use thiserror::Error;

/// Errors raised while building or traversing an ontology graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Graph has no nodes")]
    Empty,

    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Self-loop on node: {0}")]
    SelfLoop(String),

    #[error("Cycle detected through node: {0}")]
    Cycle(String),

    #[error("Graph has no root node (every node has a parent)")]
    NoRoot,
}
