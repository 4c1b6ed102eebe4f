use crate::types::{
    CodeGraph, EdgeKind, EdgeTarget, EntityKind, FileNode, FunctionNode, GraphEdge, GraphNode,
    NodeId,
};
use petgraph::algo::{astar, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Node and edge counts of a built graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub nodes: usize,
    pub edges: usize,
    pub files: usize,
    pub functions: usize,
    pub classes: usize,
    pub variables: usize,
    pub imports: usize,
    pub unresolved_edges: usize,
}

/// Resolved edges of one kind as a petgraph graph
struct Projection {
    graph: DiGraph<NodeId, ()>,
    index: HashMap<NodeId, NodeIndex>,
}

impl Projection {
    fn of_kind(code: &CodeGraph, kind: EdgeKind) -> Self {
        let mut projection = Self {
            graph: DiGraph::new(),
            index: HashMap::new(),
        };
        for edge in code.edges_of_kind(kind) {
            if let Some(to) = edge.to.node() {
                let a = projection.intern(edge.from);
                let b = projection.intern(to);
                projection.graph.add_edge(a, b, ());
            }
        }
        projection
    }

    fn intern(&mut self, id: NodeId) -> NodeIndex {
        *self
            .index
            .entry(id)
            .or_insert_with(|| self.graph.add_node(id))
    }
}

impl CodeGraph {
    /// File node registered under `path`
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&FileNode> {
        self.files()
            .filter_map(GraphNode::as_file)
            .find(|f| f.path == path)
    }

    /// Functions declared in `path`, in declaration order
    #[must_use]
    pub fn functions_in_file(&self, path: &str) -> Vec<&FunctionNode> {
        self.nodes
            .iter()
            .filter_map(GraphNode::as_function)
            .filter(|f| f.file == path)
            .collect()
    }

    /// Functions that `function` calls. Unresolved targets, and targets
    /// missing from the graph, are left out.
    #[must_use]
    pub fn calls_from(&self, function: NodeId) -> Vec<&FunctionNode> {
        self.edges_of_kind(EdgeKind::Calls)
            .filter(|e| e.from == function)
            .filter_map(|e| e.to.node())
            .filter_map(|id| self.node(id))
            .filter_map(GraphNode::as_function)
            .collect()
    }

    /// Callee names of `function` that could not be bound
    #[must_use]
    pub fn unresolved_calls_from(&self, function: NodeId) -> Vec<String> {
        self.edges_of_kind(EdgeKind::Calls)
            .filter(|e| e.from == function)
            .filter_map(|e| match &e.to {
                EdgeTarget::Unresolved(name) => Some(name.clone()),
                EdgeTarget::Resolved(_) => None,
            })
            .collect()
    }

    /// Functions with a resolved call to `function`
    #[must_use]
    pub fn callers_of(&self, function: NodeId) -> Vec<&FunctionNode> {
        self.edges_of_kind(EdgeKind::Calls)
            .filter(|e| e.to.node() == Some(function))
            .filter_map(|e| self.node(e.from))
            .filter_map(GraphNode::as_function)
            .collect()
    }

    /// Files that `path` imports (IMPORTS_FROM targets)
    #[must_use]
    pub fn dependencies_of(&self, path: &str) -> Vec<&FileNode> {
        let Some(file) = self.file(path) else {
            return Vec::new();
        };
        self.edges_of_kind(EdgeKind::ImportsFrom)
            .filter(|e| e.from == file.id)
            .filter_map(|e| e.to.node())
            .filter_map(|id| self.node(id).and_then(GraphNode::as_file))
            .collect()
    }

    pub fn edges_of_kind(&self, kind: EdgeKind) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    #[must_use]
    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats {
            nodes: self.node_count(),
            edges: self.edge_count(),
            unresolved_edges: self.edges.iter().filter(|e| e.is_unresolved()).count(),
            ..GraphStats::default()
        };
        for node in &self.nodes {
            match node.kind() {
                EntityKind::File => stats.files += 1,
                EntityKind::Function => stats.functions += 1,
                EntityKind::Class => stats.classes += 1,
                EntityKind::Variable => stats.variables += 1,
                EntityKind::Import => stats.imports += 1,
            }
        }
        stats
    }

    /// Shortest chain of resolved calls from one function to another
    #[must_use]
    pub fn call_path(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        if from == to {
            return self.node(from).map(|_| vec![from]);
        }
        let projection = Projection::of_kind(self, EdgeKind::Calls);
        let start = *projection.index.get(&from)?;
        let goal = *projection.index.get(&to)?;

        let (_cost, path) = astar(&projection.graph, start, |n| n == goal, |_| 1, |_| 0)?;
        Some(path.into_iter().map(|idx| projection.graph[idx]).collect())
    }

    /// Groups of files that import each other, as sorted paths
    #[must_use]
    pub fn import_cycles(&self) -> Vec<Vec<String>> {
        let projection = Projection::of_kind(self, EdgeKind::ImportsFrom);

        let mut cycles: Vec<Vec<String>> = tarjan_scc(&projection.graph)
            .into_iter()
            .filter(|component| {
                component.len() > 1
                    || projection
                        .graph
                        .find_edge(component[0], component[0])
                        .is_some()
            })
            .map(|component| {
                let mut paths: Vec<String> = component
                    .into_iter()
                    .filter_map(|idx| self.node(projection.graph[idx]))
                    .map(|node| node.file_path().to_string())
                    .collect();
                paths.sort();
                paths
            })
            .collect();
        cycles.sort();
        cycles
    }
}
