//! Hand-built syntax trees shaped like tree-sitter-javascript output

#![allow(dead_code)]

use codegraph_syntax::{ParsedFile, SyntaxNode};

pub fn ident(name: &str, line: usize) -> SyntaxNode {
    SyntaxNode::new("identifier")
        .with_text(name)
        .with_lines(line, line)
}

pub fn token(kind: &str) -> SyntaxNode {
    SyntaxNode::new(kind).with_text(kind).unnamed()
}

/// Parsed file; the language tag is left for ingest to infer from the path
pub fn source(path: &str, body: Vec<SyntaxNode>) -> ParsedFile {
    let end = body.iter().map(|n| n.end_line).max().unwrap_or(1);
    ParsedFile::parsed(
        path,
        "",
        SyntaxNode::new("program").with_lines(1, end).with_children(body),
    )
}

pub fn function(name: &str, params: &[&str], lines: (usize, usize), body: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::new("function_declaration")
        .with_text(format!("function {name}(...) {{ ... }}"))
        .with_lines(lines.0, lines.1)
        .with_child(token("function"))
        .with_child(ident(name, lines.0))
        .with_child(
            SyntaxNode::new("formal_parameters")
                .with_children(params.iter().map(|p| ident(p, lines.0))),
        )
        .with_child(
            SyntaxNode::new("statement_block")
                .with_lines(lines.0, lines.1)
                .with_children(body),
        )
}

pub fn anonymous_function(lines: (usize, usize)) -> SyntaxNode {
    SyntaxNode::new("function_declaration")
        .with_lines(lines.0, lines.1)
        .with_child(token("function"))
        .with_child(SyntaxNode::new("formal_parameters"))
        .with_child(SyntaxNode::new("statement_block"))
}

/// `name();` as a statement
pub fn call(name: &str, line: usize) -> SyntaxNode {
    SyntaxNode::new("expression_statement")
        .with_lines(line, line)
        .with_child(call_expr(name, line, vec![]))
}

pub fn call_expr(name: &str, line: usize, args: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::new("call_expression")
        .with_text(format!("{name}(...)"))
        .with_lines(line, line)
        .with_child(ident(name, line))
        .with_child(SyntaxNode::new("arguments").with_children(args))
}

/// `this.name();`
pub fn method_call(object: &str, name: &str, line: usize) -> SyntaxNode {
    SyntaxNode::new("expression_statement").with_child(
        SyntaxNode::new("call_expression")
            .with_lines(line, line)
            .with_child(
                SyntaxNode::new("member_expression")
                    .with_text(format!("{object}.{name}"))
                    .with_child(SyntaxNode::new(object).with_text(object))
                    .with_child(SyntaxNode::new("property_identifier").with_text(name)),
            )
            .with_child(SyntaxNode::new("arguments")),
    )
}

/// `keyword name = init;` (`const`/`let` give a lexical declaration)
pub fn declare(keyword: &str, name: &str, line: usize, init: Option<SyntaxNode>) -> SyntaxNode {
    let kind = if keyword == "var" {
        "variable_declaration"
    } else {
        "lexical_declaration"
    };
    let mut declarator = SyntaxNode::new("variable_declarator")
        .with_lines(line, line)
        .with_child(ident(name, line));
    if let Some(init) = init {
        declarator = declarator.with_child(token("=")).with_child(init);
    }
    SyntaxNode::new(kind)
        .with_lines(line, line)
        .with_child(token(keyword))
        .with_child(declarator)
}

/// `return expr;`
pub fn ret(expr: SyntaxNode, line: usize) -> SyntaxNode {
    SyntaxNode::new("return_statement")
        .with_lines(line, line)
        .with_child(token("return"))
        .with_child(expr)
}

/// `left = right;`
pub fn assign(left: &str, right: SyntaxNode, line: usize) -> SyntaxNode {
    SyntaxNode::new("expression_statement").with_child(
        SyntaxNode::new("assignment_expression")
            .with_lines(line, line)
            .with_child(ident(left, line))
            .with_child(token("="))
            .with_child(right),
    )
}

pub fn block(line: usize, body: Vec<SyntaxNode>) -> SyntaxNode {
    SyntaxNode::new("statement_block")
        .with_lines(line, line)
        .with_children(body)
}

pub fn class(name: &str, extends: Option<&str>, lines: (usize, usize)) -> SyntaxNode {
    let mut node = SyntaxNode::new("class_declaration")
        .with_lines(lines.0, lines.1)
        .with_child(token("class"))
        .with_child(ident(name, lines.0));
    if let Some(base) = extends {
        node = node.with_child(
            SyntaxNode::new("class_heritage")
                .with_text(format!("extends {base}"))
                .with_child(token("extends"))
                .with_child(ident(base, lines.0)),
        );
    }
    node.with_child(SyntaxNode::new("class_body").with_lines(lines.0, lines.1))
}

/// `import { a, b } from 'source';`
pub fn import(source: &str, names: &[&str], line: usize) -> SyntaxNode {
    SyntaxNode::new("import_statement")
        .with_lines(line, line)
        .with_child(token("import"))
        .with_child(
            SyntaxNode::new("import_clause").with_child(
                SyntaxNode::new("named_imports").with_children(names.iter().map(|n| {
                    SyntaxNode::new("import_specifier").with_child(ident(n, line))
                })),
            ),
        )
        .with_child(token("from"))
        .with_child(
            SyntaxNode::new("string")
                .with_text(format!("'{source}'"))
                .with_child(token("'"))
                .with_child(SyntaxNode::new("string_fragment").with_text(source))
                .with_child(token("'")),
        )
}
