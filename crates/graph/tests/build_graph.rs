//! End-to-end builds from hand-built syntax trees

mod common;

use codegraph::{
    EdgeKind, EdgeTarget, EntityKind, GraphBuilder, GraphBuilderConfig, GraphNode, NodeId,
    ResolutionMode,
};
use codegraph_syntax::ParsedFile;
use common::*;
use pretty_assertions::assert_eq;

fn build(files: Vec<ParsedFile>) -> codegraph::CodeGraph {
    GraphBuilder::default().build(files).unwrap()
}

fn sequential() -> GraphBuilder {
    GraphBuilder::new(GraphBuilderConfig::default().with_resolution(ResolutionMode::Sequential))
}

fn variable_id(graph: &codegraph::CodeGraph, name: &str, line: usize) -> NodeId {
    graph
        .nodes()
        .iter()
        .find_map(|n| match n {
            GraphNode::Variable(v) if v.name == name && v.line == line => Some(v.id),
            _ => None,
        })
        .unwrap_or_else(|| panic!("variable {name} at line {line}"))
}

fn uses(graph: &codegraph::CodeGraph) -> Vec<(NodeId, NodeId, Option<usize>)> {
    graph
        .edges_of_kind(EdgeKind::Uses)
        .map(|e| (e.from, e.to.node().unwrap(), e.line))
        .collect()
}

#[test]
fn test_build_is_deterministic() {
    let files = || {
        vec![
            source(
                "/proj/a.js",
                vec![
                    import("./b.js", &["helper"], 1),
                    declare("let", "total", 2, None),
                    function("add", &["n"], (3, 5), vec![assign("total", ident("n", 4), 4)]),
                ],
            ),
            source(
                "/proj/b.js",
                vec![function("helper", &[], (1, 3), vec![call("missing", 2)])],
            ),
        ]
    };

    assert_eq!(build(files()), build(files()));
}

#[test]
fn test_failed_parse_is_skipped() {
    let files = vec![
        source("a.js", vec![function("a", &[], (1, 1), vec![])]),
        ParsedFile::failed("b.js", "javascript", "Unexpected token"),
        source("c.js", vec![function("c", &[], (1, 1), vec![])]),
    ];

    let (graph, report) = GraphBuilder::default().build_with_report(files).unwrap();

    let paths: Vec<_> = graph.files().map(GraphNode::file_path).collect();
    assert_eq!(paths, vec!["a.js", "c.js"]);
    assert_eq!(report.files_built, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].path, "b.js");
}

#[test]
fn test_missing_tree_is_skipped() {
    let mut broken = source("b.js", vec![]);
    broken.ast = None;

    let (graph, report) = GraphBuilder::default()
        .build_with_report(vec![source("a.js", vec![]), broken])
        .unwrap();

    assert_eq!(graph.files().count(), 1);
    assert_eq!(report.skipped[0].path, "b.js");
}

#[test]
fn test_duplicate_path_keeps_first() {
    let files = vec![
        source("a.js", vec![function("first", &[], (1, 1), vec![])]),
        source("a.js", vec![function("second", &[], (1, 1), vec![])]),
    ];

    let (graph, report) = GraphBuilder::default().build_with_report(files).unwrap();

    let names: Vec<_> = graph.functions_in_file("a.js").iter().map(|f| f.name.clone()).collect();
    assert_eq!(names, vec!["first"]);
    assert_eq!(report.skipped[0].reason, "duplicate path");
}

#[test]
fn test_file_node_comes_first() {
    let graph = build(vec![source(
        "src/app.ts",
        vec![function("main", &["argv"], (1, 4), vec![])],
    )]);

    let GraphNode::File(file) = &graph.nodes()[0] else {
        panic!("first node is not a file");
    };
    assert_eq!(file.id, NodeId(0));
    assert_eq!(file.language, "typescript");
    assert_eq!(file.lines, 4);

    let main = graph.functions_in_file("src/app.ts")[0];
    assert_eq!(main.id, NodeId(1));
    assert_eq!(main.params, vec!["argv".to_string()]);
    assert_eq!((main.start_line, main.end_line), (1, 4));
}

#[test]
fn test_every_entity_is_contained_once() {
    let graph = build(vec![source(
        "a.js",
        vec![
            import("./b.js", &["b"], 1),
            class("Shape", None, (2, 3)),
            declare("const", "x", 4, None),
            function("f", &[], (5, 7), vec![declare("let", "y", 6, None)]),
        ],
    )]);

    let file = graph.file("a.js").unwrap().id;
    for node in graph.nodes() {
        if node.kind() == EntityKind::File {
            continue;
        }
        let owners: Vec<_> = graph
            .edges_of_kind(EdgeKind::Contains)
            .filter(|e| e.to == EdgeTarget::Resolved(node.id()))
            .map(|e| e.from)
            .collect();
        assert_eq!(owners, vec![file], "containment of {}", node.label());
    }
    assert_eq!(graph.stats().variables, 2);
}

#[test]
fn test_call_resolves_within_file() {
    let graph = build(vec![source(
        "a.js",
        vec![
            function("foo", &[], (1, 1), vec![]),
            function("bar", &[], (2, 4), vec![call("foo", 3)]),
        ],
    )]);

    let foo = graph.functions_in_file("a.js")[0].id;
    let bar = graph.functions_in_file("a.js")[1].id;
    let calls: Vec<_> = graph.edges_of_kind(EdgeKind::Calls).collect();

    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].from, bar);
    assert_eq!(calls[0].to, EdgeTarget::Resolved(foo));
    assert_eq!(calls[0].line, Some(3));
    assert_eq!(
        graph.callers_of(foo).iter().map(|f| f.id).collect::<Vec<_>>(),
        vec![bar]
    );
}

#[test]
fn test_unknown_callee_is_unresolved() {
    let graph = build(vec![source(
        "a.js",
        vec![function("bar", &[], (1, 3), vec![call("foo", 2)])],
    )]);

    let bar = graph.functions_in_file("a.js")[0].id;
    assert!(graph.calls_from(bar).is_empty());
    assert_eq!(graph.unresolved_calls_from(bar), vec!["foo".to_string()]);

    let json = serde_json::to_value(graph.edges_of_kind(EdgeKind::Calls).next().unwrap()).unwrap();
    assert_eq!(json["to"], "foo");
    assert_eq!(json["unresolved"], true);
}

#[test]
fn test_calls_do_not_cross_files() {
    let graph = build(vec![
        source("a.js", vec![function("foo", &[], (1, 1), vec![])]),
        source("b.js", vec![function("bar", &[], (1, 3), vec![call("foo", 2)])]),
    ]);

    let bar = graph.functions_in_file("b.js")[0].id;
    assert_eq!(graph.unresolved_calls_from(bar), vec!["foo".to_string()]);
}

#[test]
fn test_member_calls_keep_raw_text() {
    let graph = build(vec![source(
        "a.js",
        vec![
            function("save", &[], (1, 1), vec![]),
            function("run", &[], (2, 4), vec![method_call("this", "save", 3)]),
        ],
    )]);

    let run = graph.functions_in_file("a.js")[1].id;
    assert_eq!(graph.unresolved_calls_from(run), vec!["this.save".to_string()]);
}

#[test]
fn test_nested_function_owns_its_calls() {
    let inner = function("inner", &[], (2, 4), vec![call("helper", 3)]);
    let outer = function("outer", &[], (1, 6), vec![inner, call("inner", 5)]);
    let graph = build(vec![source("a.js", vec![outer])]);

    let outer = graph.functions_in_file("a.js")[0].id;
    let inner = graph.functions_in_file("a.js")[1].id;
    assert_eq!(
        graph.calls_from(outer).iter().map(|f| f.id).collect::<Vec<_>>(),
        vec![inner]
    );
    assert!(graph.unresolved_calls_from(outer).is_empty());
    assert_eq!(graph.unresolved_calls_from(inner), vec!["helper".to_string()]);
}

#[test]
fn test_anonymous_sentinels() {
    let unnamed_class = codegraph_syntax::SyntaxNode::new("class_declaration")
        .with_lines(4, 5)
        .with_child(token("class"))
        .with_child(codegraph_syntax::SyntaxNode::new("class_body"));
    let graph = build(vec![source(
        "a.js",
        vec![
            anonymous_function((1, 1)),
            function("caller", &[], (2, 3), vec![call("anonymous", 2)]),
            unnamed_class,
        ],
    )]);

    let names: Vec<_> = graph.nodes().iter().skip(1).map(|n| n.label()).collect();
    assert_eq!(names, vec!["anonymous()", "caller()", "AnonymousClass"]);

    // sentinel names are never bound
    let caller = graph.functions_in_file("a.js")[1].id;
    assert_eq!(graph.unresolved_calls_from(caller), vec!["anonymous".to_string()]);
}

#[test]
fn test_class_extends_is_unresolved() {
    let graph = build(vec![source(
        "a.js",
        vec![class("Base", None, (1, 1)), class("Derived", Some("Base"), (2, 3))],
    )]);

    let extends: Vec<_> = graph.edges_of_kind(EdgeKind::Extends).collect();
    assert_eq!(extends.len(), 1);
    assert_eq!(extends[0].to, EdgeTarget::Unresolved("Base".to_string()));
    assert_eq!(extends[0].line, Some(2));

    let GraphNode::Class(derived) = graph.node(extends[0].from).unwrap() else {
        panic!("EXTENDS from a non-class");
    };
    assert_eq!(derived.extends.as_deref(), Some("Base"));
}

#[test]
fn test_defines_from_enclosing_function() {
    let graph = build(vec![source(
        "a.js",
        vec![
            declare("const", "config", 1, None),
            function("load", &[], (2, 5), vec![block(3, vec![declare("let", "data", 4, None)])]),
        ],
    )]);

    let load = graph.functions_in_file("a.js")[0].id;
    let data = variable_id(&graph, "data", 4);
    let defines: Vec<_> = graph
        .edges_of_kind(EdgeKind::Defines)
        .map(|e| (e.from, e.to.clone(), e.line))
        .collect();

    // module-level declarations have no definer
    assert_eq!(defines, vec![(load, EdgeTarget::Resolved(data), Some(4))]);
}

#[test]
fn test_import_links_exact_path_only() {
    let graph = build(vec![
        source("/proj/a.ts", vec![import("./b", &["b"], 1)]),
        source("/proj/a/b.ts", vec![]),
    ]);

    assert_eq!(graph.edges_of_kind(EdgeKind::ImportsFrom).count(), 0);
    let GraphNode::Import(import) = &graph.nodes()[1] else {
        panic!("expected import node");
    };
    assert_eq!(import.source.as_deref(), Some("./b"));
    assert_eq!(import.specifiers, vec!["b".to_string()]);
}

#[test]
fn test_import_links_relative_file() {
    let graph = build(vec![
        source("/proj/src/main.ts", vec![import("../lib/util.ts", &["util"], 3)]),
        source("/proj/lib/util.ts", vec![]),
        source("/proj/src/other.ts", vec![import("react", &["React"], 1)]),
    ]);

    let links: Vec<_> = graph.edges_of_kind(EdgeKind::ImportsFrom).collect();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].from, graph.file("/proj/src/main.ts").unwrap().id);
    assert_eq!(
        links[0].to,
        EdgeTarget::Resolved(graph.file("/proj/lib/util.ts").unwrap().id)
    );
    assert_eq!(links[0].module.as_deref(), Some("../lib/util.ts"));
    assert_eq!(links[0].line, Some(3));

    let deps: Vec<_> = graph
        .dependencies_of("/proj/src/main.ts")
        .iter()
        .map(|f| f.path.as_str())
        .collect();
    assert_eq!(deps, vec!["/proj/lib/util.ts"]);
    assert!(graph.dependencies_of("/proj/src/other.ts").is_empty());
}

#[test]
fn test_sequential_mode_only_links_earlier_files() {
    let files = || {
        vec![
            source("/p/a.js", vec![import("./b.js", &["b"], 1)]),
            source("/p/b.js", vec![import("./a.js", &["a"], 1)]),
        ]
    };

    let deferred = build(files());
    assert_eq!(deferred.edges_of_kind(EdgeKind::ImportsFrom).count(), 2);
    assert_eq!(
        deferred.import_cycles(),
        vec![vec!["/p/a.js".to_string(), "/p/b.js".to_string()]]
    );

    let single_pass = sequential().build(files()).unwrap();
    let links: Vec<_> = single_pass.edges_of_kind(EdgeKind::ImportsFrom).collect();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].module.as_deref(), Some("./a.js"));
    assert!(single_pass.import_cycles().is_empty());
}

#[test]
fn test_import_linking_can_be_disabled() {
    let graph = GraphBuilder::new(GraphBuilderConfig::default().with_import_linking(false))
        .build(vec![
            source("/p/a.js", vec![import("./b.js", &["b"], 1)]),
            source("/p/b.js", vec![]),
        ])
        .unwrap();

    assert_eq!(graph.edges_of_kind(EdgeKind::ImportsFrom).count(), 0);
    assert_eq!(graph.stats().imports, 1);
}

#[test]
fn test_uses_module_variable() {
    // let count = 0;
    // function inc(step) { count = step; return count; }
    let graph = build(vec![source(
        "a.js",
        vec![
            declare("let", "count", 1, Some(codegraph_syntax::SyntaxNode::new("number").with_text("0"))),
            function(
                "inc",
                &["step"],
                (2, 5),
                vec![assign("count", ident("step", 3), 3), ret(ident("count", 4), 4)],
            ),
        ],
    )]);

    let inc = graph.functions_in_file("a.js")[0].id;
    let count = variable_id(&graph, "count", 1);
    assert_eq!(uses(&graph), vec![(inc, count, Some(3)), (inc, count, Some(4))]);
}

#[test]
fn test_uses_prefer_innermost_binding() {
    // const x = 1;
    // function f() { const x = 2; return x; }
    // function g(x) { return x; }
    let graph = build(vec![source(
        "a.js",
        vec![
            declare("const", "x", 1, None),
            function("f", &[], (2, 5), vec![declare("const", "x", 3, None), ret(ident("x", 4), 4)]),
            function("g", &["x"], (6, 8), vec![ret(ident("x", 7), 7)]),
        ],
    )]);

    let f = graph.functions_in_file("a.js")[0].id;
    let inner = variable_id(&graph, "x", 3);
    assert_eq!(uses(&graph), vec![(f, inner, Some(4))]);
}

#[test]
fn test_block_const_stays_in_block() {
    // const x = 1;
    // function f() { use(x); { const x = 2; } return x; }
    let graph = build(vec![source(
        "a.js",
        vec![
            declare("const", "x", 1, None),
            function(
                "f",
                &[],
                (2, 6),
                vec![
                    call_statement_with_arg("use", "x", 3),
                    block(4, vec![declare("const", "x", 4, None)]),
                    ret(ident("x", 5), 5),
                ],
            ),
        ],
    )]);

    let f = graph.functions_in_file("a.js")[0].id;
    let outer = variable_id(&graph, "x", 1);
    assert_eq!(uses(&graph), vec![(f, outer, Some(3)), (f, outer, Some(5))]);
}

#[test]
fn test_function_sees_later_module_const() {
    // function area(r) { use(PI); }
    // const PI = 3.14;
    let graph = build(vec![source(
        "a.js",
        vec![
            function("area", &["r"], (1, 3), vec![call_statement_with_arg("use", "PI", 2)]),
            declare("const", "PI", 4, None),
        ],
    )]);

    let area = graph.functions_in_file("a.js")[0].id;
    let pi = variable_id(&graph, "PI", 4);
    assert_eq!(uses(&graph), vec![(area, pi, Some(2))]);
}

#[test]
fn test_block_const_shadows_whole_block() {
    // const x = 1;
    // function f() { { use(x); const x = 2; } }
    let graph = build(vec![source(
        "a.js",
        vec![
            declare("const", "x", 1, None),
            function(
                "f",
                &[],
                (2, 6),
                vec![block(
                    3,
                    vec![
                        call_statement_with_arg("use", "x", 4),
                        declare("const", "x", 5, None),
                    ],
                )],
            ),
        ],
    )]);

    let f = graph.functions_in_file("a.js")[0].id;
    let inner = variable_id(&graph, "x", 5);
    assert_eq!(uses(&graph), vec![(f, inner, Some(4))]);
}

#[test]
fn test_var_is_hoisted() {
    // function f() { read(v); { var v = 1; } }
    let graph = build(vec![source(
        "a.js",
        vec![function(
            "f",
            &[],
            (1, 4),
            vec![
                call_statement_with_arg("read", "v", 2),
                block(3, vec![declare("var", "v", 3, None)]),
            ],
        )],
    )]);

    let f = graph.functions_in_file("a.js")[0].id;
    let v = variable_id(&graph, "v", 3);
    assert_eq!(uses(&graph), vec![(f, v, Some(2))]);
}

#[test]
fn test_variable_uses_can_be_disabled() {
    let graph = GraphBuilder::new(GraphBuilderConfig::default().with_variable_uses(false))
        .build(vec![source(
            "a.js",
            vec![
                declare("let", "count", 1, None),
                function("inc", &[], (2, 3), vec![ret(ident("count", 2), 2)]),
            ],
        )])
        .unwrap();

    assert_eq!(graph.edges_of_kind(EdgeKind::Uses).count(), 0);
}

fn call_statement_with_arg(name: &str, arg: &str, line: usize) -> codegraph_syntax::SyntaxNode {
    codegraph_syntax::SyntaxNode::new("expression_statement")
        .with_child(call_expr(name, line, vec![ident(arg, line)]))
}
