//! Tests for CodeGraph queries

use codegraph::{
    CodeGraph, EdgeKind, EdgeTarget, FileNode, FunctionNode, GraphEdge, GraphNode, GraphStats,
    NodeId,
};
use pretty_assertions::assert_eq;

fn make_file(id: u64, path: &str) -> GraphNode {
    GraphNode::File(FileNode {
        id: NodeId(id),
        path: path.to_string(),
        language: "javascript".to_string(),
        lines: 10,
        bytes: 100,
    })
}

fn make_function(id: u64, name: &str, file: &str) -> GraphNode {
    GraphNode::Function(FunctionNode {
        id: NodeId(id),
        name: name.to_string(),
        params: Vec::new(),
        start_line: 1,
        end_line: 10,
        file: file.to_string(),
    })
}

fn make_edge(from: u64, to: u64, kind: EdgeKind) -> GraphEdge {
    GraphEdge::resolved(NodeId(from), NodeId(to), kind)
}

/// main.js: main -> helper -> util, main -> log (unresolved)
/// lib.js imports main.js
fn sample_graph() -> CodeGraph {
    let mut graph = CodeGraph::new();
    graph.add_node(make_file(0, "main.js"));
    graph.add_node(make_function(1, "main", "main.js"));
    graph.add_node(make_function(2, "helper", "main.js"));
    graph.add_node(make_function(3, "util", "main.js"));
    graph.add_node(make_file(4, "lib.js"));

    for id in 1..=3 {
        graph.add_edge(make_edge(0, id, EdgeKind::Contains));
    }
    graph.add_edge(make_edge(1, 2, EdgeKind::Calls));
    graph.add_edge(make_edge(2, 3, EdgeKind::Calls));
    graph.add_edge(GraphEdge::new(
        NodeId(1),
        EdgeTarget::Unresolved("log".to_string()),
        EdgeKind::Calls,
    ));
    graph.add_edge(make_edge(4, 0, EdgeKind::ImportsFrom).with_module("./main.js"));
    graph
}

#[test]
fn test_node_and_edge_count() {
    let graph = sample_graph();
    assert_eq!(graph.node_count(), 5);
    assert_eq!(graph.edge_count(), 7);
    assert!(graph.validate().is_ok());
}

#[test]
fn test_functions_in_file() {
    let graph = sample_graph();

    let names: Vec<_> = graph
        .functions_in_file("main.js")
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["main", "helper", "util"]);
    assert!(graph.functions_in_file("lib.js").is_empty());
    assert!(graph.functions_in_file("missing.js").is_empty());
}

#[test]
fn test_calls_from_skips_unresolved() {
    let graph = sample_graph();

    assert_eq!(
        graph.calls_from(NodeId(1)).iter().map(|f| f.id).collect::<Vec<_>>(),
        vec![NodeId(2)]
    );
    assert_eq!(graph.unresolved_calls_from(NodeId(1)), vec!["log".to_string()]);
    assert!(graph.calls_from(NodeId(3)).is_empty());
}

#[test]
fn test_calls_from_drops_missing_targets() {
    let mut graph = sample_graph();
    graph.add_edge(make_edge(1, 99, EdgeKind::Calls));

    let names: Vec<_> = graph
        .calls_from(NodeId(1))
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(names, vec!["helper"]);
}

#[test]
fn test_callers_of() {
    let graph = sample_graph();

    assert_eq!(
        graph.callers_of(NodeId(3)).iter().map(|f| f.id).collect::<Vec<_>>(),
        vec![NodeId(2)]
    );
    assert!(graph.callers_of(NodeId(1)).is_empty());
}

#[test]
fn test_dependencies_of() {
    let graph = sample_graph();

    let deps: Vec<_> = graph
        .dependencies_of("lib.js")
        .iter()
        .map(|f| f.id)
        .collect();
    assert_eq!(deps, vec![NodeId(0)]);
    assert!(graph.dependencies_of("main.js").is_empty());
}

#[test]
fn test_file_lookup() {
    let graph = sample_graph();

    assert_eq!(graph.file("lib.js").map(|f| f.id), Some(NodeId(4)));
    assert!(graph.file("helper").is_none());
}

#[test]
fn test_call_path() {
    let graph = sample_graph();

    assert_eq!(
        graph.call_path(NodeId(1), NodeId(3)),
        Some(vec![NodeId(1), NodeId(2), NodeId(3)])
    );
    assert_eq!(graph.call_path(NodeId(3), NodeId(1)), None);
    assert_eq!(graph.call_path(NodeId(2), NodeId(2)), Some(vec![NodeId(2)]));
}

#[test]
fn test_call_path_prefers_shortest() {
    let mut graph = sample_graph();
    graph.add_edge(make_edge(1, 3, EdgeKind::Calls));

    assert_eq!(
        graph.call_path(NodeId(1), NodeId(3)),
        Some(vec![NodeId(1), NodeId(3)])
    );
}

#[test]
fn test_import_cycles() {
    let mut graph = sample_graph();
    assert!(graph.import_cycles().is_empty());

    graph.add_edge(make_edge(0, 4, EdgeKind::ImportsFrom).with_module("./lib.js"));
    assert_eq!(
        graph.import_cycles(),
        vec![vec!["lib.js".to_string(), "main.js".to_string()]]
    );
}

#[test]
fn test_stats() {
    let graph = sample_graph();

    assert_eq!(
        graph.stats(),
        GraphStats {
            nodes: 5,
            edges: 7,
            files: 2,
            functions: 3,
            classes: 0,
            variables: 0,
            imports: 0,
            unresolved_edges: 1,
        }
    );
}
