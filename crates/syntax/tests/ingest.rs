//! Tests for normalizing external parser output

use codegraph_syntax::{ingest, IngestError, NodeKind, ParsedFile, SourceParser};
use pretty_assertions::assert_eq;

const BATCH: &str = r#"[
    {
        "path": "/proj/a.js",
        "language": "javascript",
        "success": true,
        "error": null,
        "ast": {
            "node_type": "program",
            "start_line": 1, "start_col": 0, "end_line": 2, "end_col": 0,
            "start_byte": 0, "end_byte": 18, "is_named": true,
            "children": [
                {
                    "node_type": "expression_statement",
                    "text": "foo();",
                    "start_line": 1, "start_col": 0, "end_line": 1, "end_col": 6,
                    "start_byte": 0, "end_byte": 6, "is_named": true,
                    "children": []
                }
            ]
        },
        "metadata": { "lines": 2, "bytes": 18 }
    },
    {
        "path": "/proj/b.js",
        "language": "javascript",
        "success": false,
        "error": "Unexpected end of input",
        "ast": null,
        "metadata": { "lines": 0, "bytes": 0 }
    }
]"#;

#[test]
fn test_batch_from_parser_json() {
    let batch = ParsedFile::batch_from_json(BATCH).unwrap();
    assert_eq!(batch.len(), 2);

    let results: Vec<_> = batch.into_iter().map(ingest).collect();

    let first = results[0].as_ref().unwrap();
    assert_eq!(first.path, "/proj/a.js");
    assert_eq!(first.lines, 2);
    assert_eq!(first.root.children.len(), 1);

    assert_eq!(
        results[1].as_ref().unwrap_err(),
        &IngestError::ParseFailed {
            path: "/proj/b.js".to_string(),
            reason: "Unexpected end of input".to_string(),
        }
    );
}

#[test]
fn test_malformed_json_is_reported() {
    let err = ParsedFile::batch_from_json("{ not json").unwrap_err();
    assert!(matches!(err, IngestError::InvalidJson(_)));
}

#[test]
fn test_tree_sitter_output_ingests() {
    let mut parser = SourceParser::for_path("src/app.ts").unwrap();
    let parsed = parser.parse(
        "src/app.ts",
        "import { x } from './util';\nclass A extends B {}\n",
    );
    let source = ingest(parsed).unwrap();

    assert_eq!(source.language, "typescript");
    assert_eq!(source.lines, 2);

    let import = source
        .root
        .child_of_kind(NodeKind::ImportStatement)
        .expect("import statement");
    let string = import.child_of_kind(NodeKind::String).expect("source string");
    assert_eq!(string.source_text(), Some("'./util'"));

    assert!(source
        .root
        .child_of_kind(NodeKind::ClassDeclaration)
        .and_then(|class| class.child_of_kind(NodeKind::ClassHeritage))
        .is_some());
}

/// A batch whose first tree nests `depth` parenthesized expressions
fn deep_batch(depth: usize) -> String {
    let open = r#"{"node_type":"parenthesized_expression","start_line":1,"end_line":1,"children":["#;
    let leaf = r#"{"node_type":"identifier","text":"a","start_line":1,"end_line":1}"#;
    let tree = format!("{}{leaf}{}", open.repeat(depth), "]}".repeat(depth));
    format!(
        r#"[
            {{ "path": "/proj/deep.js", "language": "javascript", "success": true, "ast": {tree} }},
            {{ "path": "/proj/next.js", "language": "javascript", "success": true,
               "ast": {{ "node_type": "program", "start_line": 1, "end_line": 3 }} }}
        ]"#
    )
}

#[test]
fn test_deep_trees_are_accepted() {
    let batch = ParsedFile::batch_from_json(&deep_batch(5_000)).unwrap();
    assert_eq!(batch.len(), 2);

    let mut results = batch.into_iter().map(ingest);
    let deep = results.next().unwrap().unwrap();
    let mut depth = 0;
    let mut node = &deep.root;
    while let Some(child) = node.children.first() {
        depth += 1;
        node = child;
    }
    assert_eq!(depth, 5_000);
    assert_eq!(node.source_text(), Some("a"));

    assert_eq!(results.next().unwrap().unwrap().lines, 3);
}

#[test]
fn test_trailing_garbage_is_rejected() {
    let err = ParsedFile::batch_from_json("[] []").unwrap_err();
    assert!(matches!(err, IngestError::InvalidJson(_)));
}
