//! Portable graph document (JSON) and Graphviz DOT rendering.

use crate::error::{GraphError, Result};
use crate::types::{CodeGraph, EdgeCategory, EdgeTarget, EntityKind, GraphEdge, GraphNode};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt::Write as _;

/// Owned form of the portable document `{ nodes, edges, files }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphDocument {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// File nodes, repeated in full
    pub files: Vec<GraphNode>,
}

#[derive(Serialize)]
struct DocumentView<'a> {
    nodes: &'a [GraphNode],
    edges: &'a [GraphEdge],
    files: Vec<&'a GraphNode>,
}

impl Serialize for CodeGraph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        DocumentView {
            nodes: &self.nodes,
            edges: &self.edges,
            files: self.files().collect(),
        }
        .serialize(serializer)
    }
}

impl CodeGraph {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    #[must_use]
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            files: self.files().cloned().collect(),
        }
    }

    /// Reload a JSON document and check it
    pub fn from_json(json: &str) -> Result<Self> {
        let document: GraphDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Rebuild a graph from a document; the `files` array must repeat the
    /// File nodes of `nodes` in order
    pub fn from_document(document: GraphDocument) -> Result<Self> {
        let mut graph = Self::new();
        for node in document.nodes {
            graph.add_node(node);
        }
        for edge in document.edges {
            graph.add_edge(edge);
        }

        let listed: Vec<&GraphNode> = document.files.iter().collect();
        let derived: Vec<&GraphNode> = graph.files().collect();
        if listed != derived {
            return Err(GraphError::InvariantViolation(
                "files array does not match File nodes".to_string(),
            ));
        }

        graph.validate()?;
        Ok(graph)
    }
}

/// DOT rendering options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotOptions {
    pub graph_name: String,
    /// Graphviz `rankdir`: `LR`, `TB`, ...
    pub rankdir: String,
    /// Render unresolved targets as dashed placeholder nodes
    pub show_unresolved: bool,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self {
            graph_name: "code_graph".to_string(),
            rankdir: "LR".to_string(),
            show_unresolved: true,
        }
    }
}

const UNRESOLVED_COLOR: &str = "#999999";

const fn node_style(kind: EntityKind) -> (&'static str, &'static str) {
    match kind {
        EntityKind::File => ("folder", "#dae8fc"),
        EntityKind::Function => ("box", "#d5e8d4"),
        EntityKind::Class => ("component", "#ffe6cc"),
        EntityKind::Variable => ("ellipse", "#fff2cc"),
        EntityKind::Import => ("note", "#e1d5e7"),
    }
}

const fn edge_style(category: EdgeCategory) -> (&'static str, &'static str) {
    match category {
        EdgeCategory::Structural => ("solid", "#555555"),
        EdgeCategory::Dependency => ("dashed", "#0055aa"),
        EdgeCategory::ControlFlow => ("bold", "#006600"),
        EdgeCategory::Dataflow => ("dotted", "#aa6600"),
        EdgeCategory::Inheritance => ("solid", "#880088"),
    }
}

impl CodeGraph {
    /// Render as a Graphviz digraph with default options
    #[must_use]
    pub fn to_dot(&self) -> String {
        self.to_dot_with(&DotOptions::default())
    }

    #[must_use]
    pub fn to_dot_with(&self, options: &DotOptions) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "digraph {} {{", sanitize_id(&options.graph_name));
        let _ = writeln!(out, "    rankdir={};", sanitize_id(&options.rankdir));
        out.push_str("    node [fontsize=10, style=filled];\n");
        out.push_str("    edge [fontsize=9];\n\n");

        for node in &self.nodes {
            let (shape, fill) = node_style(node.kind());
            let _ = writeln!(
                out,
                "    n{} [label=\"{}\", shape={shape}, fillcolor=\"{fill}\"];",
                node.id(),
                escape(&node.label())
            );
        }

        // Placeholder per distinct unresolved name, in order of first use
        let mut placeholders: HashMap<&str, usize> = HashMap::new();
        if options.show_unresolved {
            for edge in &self.edges {
                if let EdgeTarget::Unresolved(name) = &edge.to {
                    let next = placeholders.len();
                    if let std::collections::hash_map::Entry::Vacant(slot) =
                        placeholders.entry(name.as_str())
                    {
                        slot.insert(next);
                        let _ = writeln!(
                            out,
                            "    u{next} [label=\"{}\", shape=box, style=dashed, color=\"{UNRESOLVED_COLOR}\"];",
                            escape(name)
                        );
                    }
                }
            }
        }
        out.push('\n');

        for edge in &self.edges {
            let target = match &edge.to {
                EdgeTarget::Resolved(id) => format!("n{id}"),
                EdgeTarget::Unresolved(name) => match placeholders.get(name.as_str()) {
                    Some(index) => format!("u{index}"),
                    None => continue,
                },
            };

            let (style, color) = if edge.is_unresolved() {
                ("dashed", UNRESOLVED_COLOR)
            } else {
                edge_style(edge.category())
            };
            let arrowhead = if edge.category() == EdgeCategory::Inheritance {
                ", arrowhead=empty"
            } else {
                ""
            };

            let _ = writeln!(
                out,
                "    n{} -> {target} [label=\"{}\", style={style}, color=\"{color}\"{arrowhead}];",
                edge.from,
                edge.kind.as_str()
            );
        }

        out.push_str("}\n");
        out
    }
}

fn escape(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(c),
        }
    }
    out
}

fn sanitize_id(raw: &str) -> String {
    let id: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    // DOT ids may not start with a digit
    match id.chars().next() {
        None => "_".to_string(),
        Some(first) if first.is_ascii_digit() => format!("_{id}"),
        Some(_) => id,
    }
}
