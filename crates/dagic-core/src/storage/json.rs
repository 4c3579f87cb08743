use serde::{Deserialize, Serialize};

use crate::graph::{Dag, Term};

use super::error::StorageError;
use super::GraphFormat;

/// Node-link JSON.
///
/// ```text
/// {
///   "nodes": [{"id": "DOID:4", "name": "disease", "ndes": 11, "ic": 0.0}],
///   "edges": [{"source": "DOID:4", "target": "DOID:7"}]
/// }
/// ```
///
/// `source` is the parent and `target` the child. A `links` array is
/// accepted in place of `edges`.
pub struct JsonFormat;

#[derive(Debug, Serialize, Deserialize)]
struct NodeLink {
    nodes: Vec<Term>,
    #[serde(default, alias = "links")]
    edges: Vec<Link>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Link {
    source: String,
    target: String,
}

impl GraphFormat for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn parse(&self, content: &str) -> Result<Dag, StorageError> {
        let doc: NodeLink = serde_json::from_str(content)?;

        let mut dag = Dag::new();
        for term in doc.nodes {
            dag.add_term(term)?;
        }
        for link in &doc.edges {
            dag.add_edge(&link.source, &link.target)?;
        }

        Ok(dag)
    }

    fn render(&self, dag: &Dag) -> Result<String, StorageError> {
        let doc = NodeLink {
            nodes: dag.iter().map(|(_, t)| t.clone()).collect(),
            edges: dag
                .edges()
                .map(|(p, c)| Link {
                    source: dag.term(p).id.clone(),
                    target: dag.term(c).id.clone(),
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&doc)?)
    }
}
