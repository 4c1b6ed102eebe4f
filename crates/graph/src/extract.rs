//! Readers for the pieces of declarations the walker and resolver need.
//!
//! Each reader falls back instead of failing: a construct without an
//! identifiable name still yields a value.

use codegraph_syntax::{NodeKind, SyntaxNode};

pub(crate) const ANONYMOUS_FUNCTION: &str = "anonymous";
pub(crate) const ANONYMOUS_CLASS: &str = "AnonymousClass";
pub(crate) const ANONYMOUS_VARIABLE: &str = "anonymous";

/// Text of a node, empty when the parser attached none
pub(crate) fn text(node: &SyntaxNode) -> &str {
    node.source_text().unwrap_or_default()
}

/// Name of a function declaration: first named `identifier` child
pub(crate) fn function_name(func: &SyntaxNode) -> Option<&SyntaxNode> {
    func.named_children()
        .find(|c| c.is(NodeKind::Identifier) && c.source_text().is_some())
}

/// Name of a class declaration (`identifier` in JS, `type_identifier` in TS)
pub(crate) fn class_name(class: &SyntaxNode) -> Option<&SyntaxNode> {
    class
        .child_of_kinds(&[NodeKind::Identifier, NodeKind::TypeIdentifier])
        .filter(|c| c.source_text().is_some())
}

/// Parameter identifiers from the parameter list child
pub(crate) fn parameters(func: &SyntaxNode) -> Vec<&SyntaxNode> {
    if let Some(list) = func.child_of_kind(NodeKind::FormalParameters) {
        return list.named_children().flat_map(binding_identifiers).collect();
    }
    // `x => ...` has a bare identifier instead of a list
    if func.is(NodeKind::ArrowFunction) {
        if let Some(first) = func.named_children().next() {
            if first.is(NodeKind::Identifier) {
                return vec![first];
            }
        }
    }
    Vec::new()
}

/// Name of the extended type in a `class_heritage` child, as written
pub(crate) fn heritage_name(class: &SyntaxNode) -> Option<String> {
    let heritage = class.child_of_kind(NodeKind::ClassHeritage)?;
    let target = heritage
        .children
        .iter()
        .find_map(|child| {
            child.find_preorder(|n| {
                matches!(
                    n.kind(),
                    NodeKind::Identifier | NodeKind::TypeIdentifier | NodeKind::MemberExpression
                )
            })
        })
        .and_then(SyntaxNode::source_text);

    match target {
        Some(name) => Some(name.to_string()),
        None => heritage
            .source_text()
            .map(|t| t.trim().trim_start_matches("extends").trim().to_string())
            .filter(|t| !t.is_empty()),
    }
}

/// Identifiers bound by a variable or lexical declaration.
///
/// Declarator names come first; destructuring patterns contribute every
/// name they bind. Without declarators, direct identifier children are used.
pub(crate) fn declared_identifiers(decl: &SyntaxNode) -> Vec<&SyntaxNode> {
    let from_declarators: Vec<&SyntaxNode> = decl
        .children
        .iter()
        .filter(|c| c.is(NodeKind::VariableDeclarator))
        .filter_map(|declarator| declarator.named_children().next())
        .flat_map(binding_identifiers)
        .collect();

    if !from_declarators.is_empty() {
        return from_declarators;
    }

    decl.children
        .iter()
        .filter(|c| c.is(NodeKind::Identifier))
        .collect()
}

/// Identifiers bound by a pattern (plain name, destructuring, defaults, rest)
pub(crate) fn binding_identifiers(pattern: &SyntaxNode) -> Vec<&SyntaxNode> {
    let mut out = Vec::new();
    collect_bindings(pattern, &mut out);
    out
}

fn collect_bindings<'a>(node: &'a SyntaxNode, out: &mut Vec<&'a SyntaxNode>) {
    if node.kind().is_binding_identifier() {
        if node.source_text().is_some() {
            out.push(node);
        }
        return;
    }

    match node.node_type.as_str() {
        "object_pattern" | "array_pattern" => {
            for child in node.named_children() {
                collect_bindings(child, out);
            }
        }
        // `{ key: value }`: only the value side binds
        "pair_pattern" => {
            if let Some(value) = node.named_children().last() {
                collect_bindings(value, out);
            }
        }
        // `a = 1`, `{ a = 1 }`, `...rest`: only the left side binds
        "assignment_pattern" | "object_assignment_pattern" | "rest_pattern" => {
            if let Some(left) = node.named_children().next() {
                collect_bindings(left, out);
            }
        }
        // TS parameters wrap the pattern with modifiers and type annotations
        "required_parameter" | "optional_parameter" => {
            if let Some(pattern) = node.named_children().find(|c| {
                c.kind().is_binding_identifier() || c.node_type.ends_with("_pattern")
            }) {
                collect_bindings(pattern, out);
            }
        }
        _ => {}
    }
}

/// Module source of an import statement, without quotes
pub(crate) fn import_source(import: &SyntaxNode) -> Option<String> {
    let literal = import.child_of_kind(NodeKind::String)?;

    if let Some(fragment) = literal.child_of_kind(NodeKind::StringFragment) {
        return fragment.source_text().map(str::to_string);
    }

    literal
        .source_text()
        .map(|raw| raw.trim_matches(|c| matches!(c, '"' | '\'' | '`')).to_string())
}

/// Identifiers an import binds locally: default, namespace alias and named
/// specifiers (the alias when renamed)
pub(crate) fn import_bindings(import: &SyntaxNode) -> Vec<&SyntaxNode> {
    let Some(clause) = import.child_of_kind(NodeKind::ImportClause) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for part in clause.named_children() {
        match part.kind() {
            NodeKind::Identifier => out.push(part),
            NodeKind::NamespaceImport => {
                out.extend(part.child_of_kind(NodeKind::Identifier));
            }
            NodeKind::NamedImports => {
                for spec in part.named_children() {
                    if spec.is(NodeKind::ImportSpecifier) {
                        out.extend(
                            spec.named_children()
                                .filter(|c| c.is(NodeKind::Identifier))
                                .last(),
                        );
                    }
                }
            }
            _ => {}
        }
    }
    out.retain(|n| n.source_text().is_some());
    out
}

/// Callee of a call expression: a bare identifier's text, or a member
/// expression's raw text. Other callee shapes are not named.
pub(crate) fn callee(call: &SyntaxNode) -> Option<&str> {
    let first = call.children.first()?;
    match first.kind() {
        NodeKind::Identifier | NodeKind::MemberExpression => {
            first.source_text().filter(|t| !t.is_empty())
        }
        _ => None,
    }
}
