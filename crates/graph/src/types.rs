use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identifier of a graph node, unique across one built graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of entity a [`GraphNode`] describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    File,
    Function,
    Class,
    Variable,
    Import,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub id: NodeId,
    pub path: String,
    pub language: String,
    pub lines: usize,
    pub bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionNode {
    pub id: NodeId,
    /// Declared name, or `"anonymous"`
    pub name: String,
    pub params: Vec<String>,
    pub start_line: usize,
    pub end_line: usize,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassNode {
    pub id: NodeId,
    /// Declared name, or `"AnonymousClass"`
    pub name: String,
    /// Base class name as written; never bound to a node
    pub extends: Option<String>,
    pub start_line: usize,
    pub end_line: usize,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableNode {
    pub id: NodeId,
    pub name: String,
    pub line: usize,
    pub file: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportNode {
    pub id: NodeId,
    /// Module specifier without quotes; `None` when it could not be read
    pub source: Option<String>,
    /// Local names bound by the import
    pub specifiers: Vec<String>,
    pub line: usize,
    pub file: String,
}

/// Node in code graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GraphNode {
    File(FileNode),
    Function(FunctionNode),
    Class(ClassNode),
    Variable(VariableNode),
    Import(ImportNode),
}

impl GraphNode {
    #[must_use]
    pub const fn id(&self) -> NodeId {
        match self {
            Self::File(n) => n.id,
            Self::Function(n) => n.id,
            Self::Class(n) => n.id,
            Self::Variable(n) => n.id,
            Self::Import(n) => n.id,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::File(_) => EntityKind::File,
            Self::Function(_) => EntityKind::Function,
            Self::Class(_) => EntityKind::Class,
            Self::Variable(_) => EntityKind::Variable,
            Self::Import(_) => EntityKind::Import,
        }
    }

    /// Path of the file this node belongs to (a file belongs to itself)
    #[must_use]
    pub fn file_path(&self) -> &str {
        match self {
            Self::File(n) => &n.path,
            Self::Function(n) => &n.file,
            Self::Class(n) => &n.file,
            Self::Variable(n) => &n.file,
            Self::Import(n) => &n.file,
        }
    }

    /// Human readable label
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::File(n) => n.path.clone(),
            Self::Function(n) => format!("{}({})", n.name, n.params.join(", ")),
            Self::Class(n) => n.name.clone(),
            Self::Variable(n) => n.name.clone(),
            Self::Import(n) => format!("import {}", n.source.as_deref().unwrap_or("?")),
        }
    }

    #[must_use]
    pub const fn as_function(&self) -> Option<&FunctionNode> {
        match self {
            Self::Function(n) => Some(n),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_file(&self) -> Option<&FileNode> {
        match self {
            Self::File(n) => Some(n),
            _ => None,
        }
    }
}

/// Type of relationship between nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EdgeKind {
    /// File contains a declared entity
    Contains,

    /// File imports another known file
    ImportsFrom,

    /// Function calls a function (or an unresolved name)
    Calls,

    /// Function reads or writes a variable
    Uses,

    /// Function or class declares a variable
    Defines,

    /// Class extends a named base
    Extends,
}

impl EdgeKind {
    #[must_use]
    pub const fn category(self) -> EdgeCategory {
        match self {
            Self::Contains => EdgeCategory::Structural,
            Self::ImportsFrom => EdgeCategory::Dependency,
            Self::Calls => EdgeCategory::ControlFlow,
            Self::Uses | Self::Defines => EdgeCategory::Dataflow,
            Self::Extends => EdgeCategory::Inheritance,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contains => "CONTAINS",
            Self::ImportsFrom => "IMPORTS_FROM",
            Self::Calls => "CALLS",
            Self::Uses => "USES",
            Self::Defines => "DEFINES",
            Self::Extends => "EXTENDS",
        }
    }
}

/// Coarse grouping of edge kinds, used for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeCategory {
    Structural,
    Dependency,
    ControlFlow,
    Dataflow,
    Inheritance,
}

/// Target of an edge: a known node, or a name nothing could be bound to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EdgeTarget {
    Resolved(NodeId),
    Unresolved(String),
}

impl EdgeTarget {
    #[must_use]
    pub const fn node(&self) -> Option<NodeId> {
        match self {
            Self::Resolved(id) => Some(*id),
            Self::Unresolved(_) => None,
        }
    }

    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::Unresolved(_))
    }
}

/// Edge in code graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "EdgeRecord", try_from = "EdgeRecord")]
pub struct GraphEdge {
    pub from: NodeId,
    pub to: EdgeTarget,
    pub kind: EdgeKind,
    /// Call or reference site
    pub line: Option<usize>,
    /// Import source, only on IMPORTS_FROM
    pub module: Option<String>,
}

impl GraphEdge {
    #[must_use]
    pub const fn new(from: NodeId, to: EdgeTarget, kind: EdgeKind) -> Self {
        Self {
            from,
            to,
            kind,
            line: None,
            module: None,
        }
    }

    #[must_use]
    pub const fn resolved(from: NodeId, to: NodeId, kind: EdgeKind) -> Self {
        Self::new(from, EdgeTarget::Resolved(to), kind)
    }

    #[must_use]
    pub const fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    #[must_use]
    pub const fn category(&self) -> EdgeCategory {
        self.kind.category()
    }

    #[must_use]
    pub const fn is_unresolved(&self) -> bool {
        self.to.is_unresolved()
    }
}

/// Portable shape of an edge: the `unresolved` flag and `edgeType` are
/// derived from the in-memory representation.
#[derive(Serialize, Deserialize)]
struct EdgeRecord {
    from: NodeId,
    to: EdgeTarget,
    #[serde(rename = "type")]
    kind: EdgeKind,
    #[serde(rename = "edgeType")]
    edge_type: EdgeCategory,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    unresolved: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    module: Option<String>,
}

impl From<GraphEdge> for EdgeRecord {
    fn from(edge: GraphEdge) -> Self {
        Self {
            from: edge.from,
            unresolved: edge.to.is_unresolved(),
            to: edge.to,
            kind: edge.kind,
            edge_type: edge.kind.category(),
            line: edge.line,
            module: edge.module,
        }
    }
}

impl TryFrom<EdgeRecord> for GraphEdge {
    type Error = String;

    fn try_from(record: EdgeRecord) -> Result<Self, Self::Error> {
        if record.edge_type != record.kind.category() {
            return Err(format!(
                "edgeType {:?} does not match {} edge",
                record.edge_type,
                record.kind.as_str()
            ));
        }
        if record.unresolved != record.to.is_unresolved() {
            return Err(format!(
                "unresolved flag disagrees with target of {} edge from {}",
                record.kind.as_str(),
                record.from
            ));
        }
        Ok(Self {
            from: record.from,
            to: record.to,
            kind: record.kind,
            line: record.line,
            module: record.module,
        })
    }
}

/// Code graph: nodes and edges in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeGraph {
    pub(crate) nodes: Vec<GraphNode>,
    pub(crate) edges: Vec<GraphEdge>,
    /// Ids of File nodes, in node order
    pub(crate) files: Vec<NodeId>,
    /// NodeId -> position in `nodes`
    pub(crate) node_index: HashMap<NodeId, usize>,
}

impl CodeGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add node to graph
    pub fn add_node(&mut self, node: GraphNode) -> NodeId {
        let id = node.id();
        if node.kind() == EntityKind::File {
            self.files.push(id);
        }
        self.node_index.entry(id).or_insert(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Add edge between nodes
    pub fn add_edge(&mut self, edge: GraphEdge) {
        self.edges.push(edge);
    }

    /// Get node data
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.node_index.get(&id).map(|&pos| &self.nodes[pos])
    }

    /// All nodes, in discovery order
    #[must_use]
    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// All edges, in discovery order
    #[must_use]
    pub fn edges(&self) -> &[GraphEdge] {
        &self.edges
    }

    /// File nodes, in discovery order
    pub fn files(&self) -> impl Iterator<Item = &GraphNode> {
        self.files.iter().filter_map(|id| self.node(*id))
    }

    /// Get node count
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get edge count
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}
