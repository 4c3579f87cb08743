use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::graph::{Dag, GraphError, Term};

use super::error::StorageError;
use super::GraphFormat;

const GRAPHML_NS: &str = "http://graphml.graphdrawing.org/xmlns";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// GraphML, as written by igraph and most graph toolkits.
///
/// Term fields are read from `<data>` elements whose `<key>` declares
/// `attr.name` as `id`, `name` (or `label`), `ndes` or `ic`. A node without
/// an `id` attribute uses its element id. `<node>` and `<edge>` elements may
/// be interleaved.
///
/// Leading and trailing whitespace in `<data>` text is trimmed on read, so
/// padded names do not survive a GraphML round trip.
pub struct GraphMlFormat;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename = "graphml")]
struct GraphMlDoc {
    #[serde(rename = "@xmlns", default, skip_serializing_if = "Option::is_none")]
    xmlns: Option<String>,
    #[serde(rename = "key", default)]
    keys: Vec<KeyDecl>,
    graph: GraphElem,
}

#[derive(Debug, Serialize, Deserialize)]
struct KeyDecl {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "@for", default, skip_serializing_if = "Option::is_none")]
    domain: Option<String>,
    #[serde(rename = "@attr.name", default, skip_serializing_if = "Option::is_none")]
    attr_name: Option<String>,
    #[serde(rename = "@attr.type", default, skip_serializing_if = "Option::is_none")]
    attr_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GraphElem {
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(rename = "@edgedefault", default, skip_serializing_if = "Option::is_none")]
    edgedefault: Option<String>,
    #[serde(rename = "node", default)]
    nodes: Vec<NodeElem>,
    #[serde(rename = "edge", default)]
    edges: Vec<EdgeElem>,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeElem {
    #[serde(rename = "@id")]
    id: String,
    #[serde(rename = "data", default)]
    data: Vec<DataElem>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EdgeElem {
    #[serde(rename = "@source")]
    source: String,
    #[serde(rename = "@target")]
    target: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct DataElem {
    #[serde(rename = "@key")]
    key: String,
    #[serde(rename = "$text", default)]
    value: String,
}

/// Term field a GraphML key maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Name,
    Ndes,
    Ic,
}

impl Field {
    fn from_attr(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Field::Id),
            "name" | "label" => Some(Field::Name),
            "ndes" => Some(Field::Ndes),
            "ic" => Some(Field::Ic),
            _ => None,
        }
    }
}

fn invalid(node: &str, key: &str, value: &str) -> StorageError {
    StorageError::InvalidAttribute {
        node: node.to_string(),
        key: key.to_string(),
        value: value.to_string(),
    }
}

/// Descendant counts written as doubles by some tools ("12.0") are accepted
/// when integral.
fn parse_count(node: &str, key: &str, value: &str) -> Result<usize, StorageError> {
    let value = value.trim();
    if let Ok(n) = value.parse::<usize>() {
        return Ok(n);
    }
    match value.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as usize),
        _ => Err(invalid(node, key, value)),
    }
}

fn term_from_node(node: &NodeElem, fields: &HashMap<&str, Field>) -> Result<Term, StorageError> {
    let mut term = Term::new(node.id.clone(), "");

    for data in &node.data {
        let Some(field) = fields.get(data.key.as_str()) else {
            continue;
        };
        match field {
            Field::Id => term.id = data.value.trim().to_string(),
            Field::Name => term.name = data.value.clone(),
            Field::Ndes => term.ndes = Some(parse_count(&node.id, &data.key, &data.value)?),
            Field::Ic => {
                let ic = data
                    .value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| invalid(&node.id, &data.key, &data.value))?;
                term.ic = Some(ic);
            }
        }
    }

    Ok(term)
}

impl GraphFormat for GraphMlFormat {
    fn name(&self) -> &'static str {
        "graphml"
    }

    fn parse(&self, content: &str) -> Result<Dag, StorageError> {
        let doc: GraphMlDoc =
            quick_xml::de::from_str(content).map_err(|e| StorageError::Xml(e.to_string()))?;

        let fields: HashMap<&str, Field> = doc
            .keys
            .iter()
            .filter(|k| matches!(k.domain.as_deref(), None | Some("node") | Some("all")))
            .filter_map(|k| {
                let field = Field::from_attr(k.attr_name.as_deref().unwrap_or(&k.id))?;
                Some((k.id.as_str(), field))
            })
            .collect();

        let mut dag = Dag::new();
        // Element ids differ from term ids when an `id` attribute is present.
        let mut element_to_index = HashMap::with_capacity(doc.graph.nodes.len());
        for node in &doc.graph.nodes {
            let idx = dag.add_term(term_from_node(node, &fields)?)?;
            element_to_index.insert(node.id.as_str(), idx);
        }

        for edge in &doc.graph.edges {
            let lookup = |id: &str| {
                element_to_index
                    .get(id)
                    .copied()
                    .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))
            };
            let parent = lookup(&edge.source)?;
            let child = lookup(&edge.target)?;
            dag.add_edge_by_index(parent, child)?;
        }

        Ok(dag)
    }

    fn render(&self, dag: &Dag) -> Result<String, StorageError> {
        let key = |id: &str, name: &str, ty: &str| KeyDecl {
            id: id.to_string(),
            domain: Some("node".to_string()),
            attr_name: Some(name.to_string()),
            attr_type: Some(ty.to_string()),
        };

        let nodes = dag
            .iter()
            .map(|(idx, term)| {
                let mut data = vec![
                    DataElem {
                        key: "v_id".to_string(),
                        value: term.id.clone(),
                    },
                    DataElem {
                        key: "v_name".to_string(),
                        value: term.name.clone(),
                    },
                ];
                if let Some(ndes) = term.ndes {
                    data.push(DataElem {
                        key: "v_ndes".to_string(),
                        value: ndes.to_string(),
                    });
                }
                if let Some(ic) = term.ic {
                    data.push(DataElem {
                        key: "v_ic".to_string(),
                        value: format!("{ic:?}"),
                    });
                }
                NodeElem {
                    id: format!("n{idx}"),
                    data,
                }
            })
            .collect();

        let edges = dag
            .edges()
            .map(|(p, c)| EdgeElem {
                source: format!("n{p}"),
                target: format!("n{c}"),
            })
            .collect();

        let doc = GraphMlDoc {
            xmlns: Some(GRAPHML_NS.to_string()),
            keys: vec![
                key("v_id", "id", "string"),
                key("v_name", "name", "string"),
                key("v_ndes", "ndes", "long"),
                key("v_ic", "ic", "double"),
            ],
            graph: GraphElem {
                id: Some("G".to_string()),
                edgedefault: Some("directed".to_string()),
                nodes,
                edges,
            },
        };

        let mut body = String::new();
        let mut ser = quick_xml::se::Serializer::new(&mut body);
        ser.indent(' ', 2);
        doc.serialize(ser)
            .map_err(|e| StorageError::Xml(e.to_string()))?;

        Ok(format!("{XML_DECL}\n{body}\n"))
    }
}
