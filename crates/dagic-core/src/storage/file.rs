use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::graph::Dag;

use super::error::StorageError;
use super::Format;

/// A graph file on disk.
///
/// The format is taken from the file extension unless set explicitly:
/// ```text
/// doid.json       # node-link JSON
/// doid.graphml    # GraphML
/// doid.xml        # GraphML
/// ```
pub struct GraphFile {
    path: PathBuf,
    format: Option<Format>,
}

impl GraphFile {
    /// Creates a handle whose format is inferred from the extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            format: None,
        }
    }

    /// Creates a handle with an explicit format.
    pub fn with_format(path: impl Into<PathBuf>, format: Format) -> Self {
        Self {
            path: path.into(),
            format: Some(format),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolves the format from the explicit setting or the extension.
    pub fn format(&self) -> Result<Format, StorageError> {
        self.format
            .or_else(|| Format::from_path(&self.path))
            .ok_or_else(|| StorageError::UnknownFormat(self.path.display().to_string()))
    }

    /// Reads and parses the graph.
    pub fn load(&self) -> Result<Dag, StorageError> {
        let handler = self.format()?.handler();
        let content = fs::read_to_string(&self.path).map_err(|e| StorageError::io(&self.path, e))?;
        let dag = handler.parse(&content)?;

        info!(
            path = %self.path.display(),
            format = handler.name(),
            nodes = dag.len(),
            edges = dag.edge_count(),
            "Loaded graph"
        );
        Ok(dag)
    }

    /// Renders and writes the graph, creating parent directories as needed.
    pub fn save(&self, dag: &Dag) -> Result<(), StorageError> {
        let handler = self.format()?.handler();
        let content = handler.render(dag)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
            }
        }
        fs::write(&self.path, content).map_err(|e| StorageError::io(&self.path, e))?;

        debug!(path = %self.path.display(), format = handler.name(), "Saved graph");
        Ok(())
    }
}
