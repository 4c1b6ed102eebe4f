use crate::error::{GraphError, Result};
use crate::types::{CodeGraph, EdgeKind, EntityKind, GraphNode, NodeId};
use std::collections::{HashMap, HashSet};

impl CodeGraph {
    /// Check the structural guarantees of a built or reloaded graph:
    ///
    /// - node ids are unique
    /// - `files` lists exactly the File nodes, in node order
    /// - every non-File node has exactly one CONTAINS edge, from its own file
    /// - resolved edge endpoints exist
    /// - resolved CALLS go from a function to a function of the same file
    pub fn validate(&self) -> Result<()> {
        let mut ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !ids.insert(node.id()) {
                return Err(violation(format!("duplicate node id {}", node.id())));
            }
        }

        let file_nodes: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|n| n.kind() == EntityKind::File)
            .map(GraphNode::id)
            .collect();
        if file_nodes != self.files {
            return Err(violation("file list does not match File nodes".to_string()));
        }

        for edge in &self.edges {
            if self.node(edge.from).is_none() {
                return Err(violation(format!(
                    "{} edge from unknown node {}",
                    edge.kind.as_str(),
                    edge.from
                )));
            }
            if let Some(to) = edge.to.node() {
                if self.node(to).is_none() {
                    return Err(violation(format!(
                        "{} edge to unknown node {to}",
                        edge.kind.as_str()
                    )));
                }
            }
        }

        self.check_containment()?;
        self.check_calls()
    }

    fn check_containment(&self) -> Result<()> {
        let mut owners: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        for edge in self.edges_of_kind(EdgeKind::Contains) {
            if let Some(to) = edge.to.node() {
                owners.entry(to).or_default().push(edge.from);
            }
        }

        let mut file_ids: HashMap<&str, NodeId> = HashMap::with_capacity(self.files.len());
        for node in &self.nodes {
            if let GraphNode::File(file) = node {
                file_ids.entry(file.path.as_str()).or_insert(file.id);
            }
        }

        for node in &self.nodes {
            if node.kind() == EntityKind::File {
                continue;
            }
            let expected = file_ids.get(node.file_path()).copied();
            match owners.get(&node.id()).map(Vec::as_slice) {
                Some([owner]) if Some(*owner) == expected => {}
                Some([_]) => {
                    return Err(violation(format!(
                        "node {} is contained by a file other than {}",
                        node.id(),
                        node.file_path()
                    )));
                }
                Some(many) if many.len() > 1 => {
                    return Err(violation(format!(
                        "node {} has {} CONTAINS edges",
                        node.id(),
                        many.len()
                    )));
                }
                _ => {
                    return Err(violation(format!("node {} has no owning file", node.id())));
                }
            }
        }
        Ok(())
    }

    fn check_calls(&self) -> Result<()> {
        for edge in self.edges_of_kind(EdgeKind::Calls) {
            let Some(to) = edge.to.node() else {
                continue;
            };
            let (Some(GraphNode::Function(caller)), Some(GraphNode::Function(callee))) =
                (self.node(edge.from), self.node(to))
            else {
                return Err(violation(format!(
                    "CALLS edge {} -> {to} does not join two functions",
                    edge.from
                )));
            };
            if caller.file != callee.file {
                return Err(violation(format!(
                    "CALLS edge {} -> {to} crosses files",
                    edge.from
                )));
            }
        }
        Ok(())
    }
}

fn violation(message: String) -> GraphError {
    GraphError::InvariantViolation(message)
}
