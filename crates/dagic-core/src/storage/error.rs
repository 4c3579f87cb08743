use std::path::PathBuf;
use thiserror::Error;

use crate::graph::GraphError;

/// Errors that can occur while reading or writing graph files.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GraphML error: {0}")]
    Xml(String),

    #[error("Unknown graph format: {0}")]
    UnknownFormat(String),

    #[error("Invalid value {value:?} for attribute {key} on node {node}")]
    InvalidAttribute {
        node: String,
        key: String,
        value: String,
    },

    #[error("Invalid graph: {0}")]
    Graph(#[from] GraphError),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
