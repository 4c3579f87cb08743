mod error;
mod file;
mod graphml;
mod json;

pub use error::StorageError;
pub use file::GraphFile;
pub use graphml::GraphMlFormat;
pub use json::JsonFormat;

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::graph::Dag;

/// Trait for graph serialization formats.
///
/// Implementations turn file content into a [`Dag`] and back. Computed
/// `ndes`/`ic` values travel with the terms so a computed graph can be
/// reloaded without another pass.
pub trait GraphFormat {
    /// Short format name used in logs and configuration.
    fn name(&self) -> &'static str;

    /// Parses file content into a graph.
    fn parse(&self, content: &str) -> Result<Dag, StorageError>;

    /// Renders a graph as file content.
    fn render(&self, dag: &Dag) -> Result<String, StorageError>;
}

/// Supported on-disk graph formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Node-link JSON.
    Json,
    /// GraphML XML.
    GraphMl,
}

impl Format {
    /// Infers the format from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "graphml" | "xml" => Some(Format::GraphMl),
            _ => None,
        }
    }

    /// Returns the implementation for this format.
    pub fn handler(&self) -> Box<dyn GraphFormat> {
        match self {
            Format::Json => Box::new(JsonFormat),
            Format::GraphMl => Box::new(GraphMlFormat),
        }
    }
}

impl FromStr for Format {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "graphml" | "xml" => Ok(Format::GraphMl),
            other => Err(StorageError::UnknownFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Json => f.write_str("json"),
            Format::GraphMl => f.write_str("graphml"),
        }
    }
}
