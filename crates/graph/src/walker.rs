use crate::extract::{self, ANONYMOUS_CLASS, ANONYMOUS_FUNCTION, ANONYMOUS_VARIABLE};
use crate::identity::{DeclarationKind, IdentityAllocator};
use crate::types::{
    ClassNode, CodeGraph, EdgeKind, EdgeTarget, FileNode, FunctionNode, GraphEdge, GraphNode,
    ImportNode, NodeId, VariableNode,
};
use codegraph_syntax::{NodeKind, SourceFile, SyntaxNode};
use std::collections::HashMap;

/// Remaining stack below which a recursive tree pass moves to a fresh segment
const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

/// Run one step of a recursive syntax tree pass, growing the stack on demand
pub(crate) fn with_stack<R>(step: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, step)
}

/// Syntax nodes mapped to the graph nodes created for them.
///
/// Keyed by node address: the syntax trees are borrowed, unmoved, for the
/// whole build.
#[derive(Debug, Default)]
pub(crate) struct SiteMap(HashMap<usize, NodeId>);

impl SiteMap {
    fn key(node: &SyntaxNode) -> usize {
        std::ptr::from_ref(node) as usize
    }

    fn insert(&mut self, node: &SyntaxNode, id: NodeId) {
        self.0.insert(Self::key(node), id);
    }

    pub(crate) fn get(&self, node: &SyntaxNode) -> Option<NodeId> {
        self.0.get(&Self::key(node)).copied()
    }
}

/// Function declaration waiting for call and usage resolution
pub(crate) struct FunctionSite<'a> {
    pub id: NodeId,
    pub node: &'a SyntaxNode,
}

/// Import statement waiting for linking
pub(crate) struct ImportSite {
    pub id: NodeId,
    pub source: Option<String>,
    pub line: usize,
}

/// Result of the structural pass over one file
pub(crate) struct WalkedFile<'a> {
    pub file_id: NodeId,
    pub path: &'a str,
    pub root: &'a SyntaxNode,
    pub functions: Vec<FunctionSite<'a>>,
    pub imports: Vec<ImportSite>,
    /// Function declaration nodes and variable name identifiers
    pub sites: SiteMap,
}

/// Ancestor frame on the walker's scope stack
struct Frame {
    /// Function or Class node opened by this syntax node, if any
    container: Option<NodeId>,
}

/// Structural pass: emits entity nodes and CONTAINS / DEFINES / EXTENDS edges,
/// and registers declarations for later reference resolution.
pub(crate) struct StructuralWalker<'g> {
    graph: &'g mut CodeGraph,
    ids: &'g mut IdentityAllocator,
}

impl<'g> StructuralWalker<'g> {
    pub(crate) fn new(graph: &'g mut CodeGraph, ids: &'g mut IdentityAllocator) -> Self {
        Self { graph, ids }
    }

    pub(crate) fn walk<'a>(&mut self, file: &'a SourceFile) -> WalkedFile<'a> {
        let file_id = self.ids.next_id();
        self.graph.add_node(GraphNode::File(FileNode {
            id: file_id,
            path: file.path.clone(),
            language: file.language.clone(),
            lines: file.lines,
            bytes: file.bytes,
        }));

        let mut out = WalkedFile {
            file_id,
            path: &file.path,
            root: &file.root,
            functions: Vec::new(),
            imports: Vec::new(),
            sites: SiteMap::default(),
        };

        let mut frames = vec![Frame { container: None }];
        for child in &file.root.children {
            self.visit(child, &mut frames, &mut out);
        }

        log::debug!(
            "Walked {}: {} functions, {} imports",
            file.path,
            out.functions.len(),
            out.imports.len()
        );
        out
    }

    fn visit<'a>(&mut self, node: &'a SyntaxNode, frames: &mut Vec<Frame>, out: &mut WalkedFile<'a>) {
        let container = match node.kind() {
            NodeKind::ImportStatement => {
                self.on_import(node, out);
                None
            }
            NodeKind::FunctionDeclaration | NodeKind::GeneratorFunctionDeclaration => {
                Some(self.on_function(node, out))
            }
            NodeKind::ClassDeclaration => Some(self.on_class(node, out)),
            kind if kind.is_variable_declaration() => {
                self.on_variables(node, frames, out);
                None
            }
            _ => None,
        };

        frames.push(Frame { container });
        for child in &node.children {
            with_stack(|| self.visit(child, frames, out));
        }
        frames.pop();
    }

    fn on_import(&mut self, node: &SyntaxNode, out: &mut WalkedFile<'_>) {
        let id = self.ids.next_id();
        let source = extract::import_source(node);
        let specifiers = extract::import_bindings(node)
            .into_iter()
            .map(|n| extract::text(n).to_string())
            .collect();

        self.graph.add_node(GraphNode::Import(ImportNode {
            id,
            source: source.clone(),
            specifiers,
            line: node.start_line,
            file: out.path.to_string(),
        }));
        self.contain(out.file_id, id);

        out.imports.push(ImportSite {
            id,
            source,
            line: node.start_line,
        });
    }

    fn on_function<'a>(&mut self, node: &'a SyntaxNode, out: &mut WalkedFile<'a>) -> NodeId {
        let id = self.ids.next_id();
        let name = extract::function_name(node).map(extract::text);
        let params = extract::parameters(node)
            .into_iter()
            .map(|n| extract::text(n).to_string())
            .collect();

        self.graph.add_node(GraphNode::Function(FunctionNode {
            id,
            name: name.unwrap_or(ANONYMOUS_FUNCTION).to_string(),
            params,
            start_line: node.start_line,
            end_line: node.end_line,
            file: out.path.to_string(),
        }));
        self.contain(out.file_id, id);

        if let Some(name) = name {
            self.ids
                .record_declaration(out.path, name, id, DeclarationKind::Function);
        }

        out.sites.insert(node, id);
        out.functions.push(FunctionSite { id, node });
        id
    }

    fn on_class(&mut self, node: &SyntaxNode, out: &WalkedFile<'_>) -> NodeId {
        let id = self.ids.next_id();
        let name = extract::class_name(node).map(extract::text);
        let extends = extract::heritage_name(node);

        self.graph.add_node(GraphNode::Class(ClassNode {
            id,
            name: name.unwrap_or(ANONYMOUS_CLASS).to_string(),
            extends: extends.clone(),
            start_line: node.start_line,
            end_line: node.end_line,
            file: out.path.to_string(),
        }));
        self.contain(out.file_id, id);

        if let Some(name) = name {
            self.ids
                .record_declaration(out.path, name, id, DeclarationKind::Class);
        }

        if let Some(base) = extends {
            self.graph.add_edge(
                GraphEdge::new(id, EdgeTarget::Unresolved(base), EdgeKind::Extends)
                    .at_line(node.start_line),
            );
        }
        id
    }

    fn on_variables<'a>(&mut self, node: &'a SyntaxNode, frames: &[Frame], out: &mut WalkedFile<'a>) {
        let definer = frames.iter().rev().find_map(|f| f.container);
        let names = extract::declared_identifiers(node);

        if names.is_empty() {
            self.add_variable(ANONYMOUS_VARIABLE, node.start_line, definer, out);
            return;
        }

        for ident in names {
            let id = self.add_variable(extract::text(ident), node.start_line, definer, out);
            out.sites.insert(ident, id);
        }
    }

    fn add_variable(
        &mut self,
        name: &str,
        line: usize,
        definer: Option<NodeId>,
        out: &WalkedFile<'_>,
    ) -> NodeId {
        let id = self.ids.next_id();
        self.graph.add_node(GraphNode::Variable(VariableNode {
            id,
            name: name.to_string(),
            line,
            file: out.path.to_string(),
        }));
        self.contain(out.file_id, id);

        if let Some(container) = definer {
            self.graph
                .add_edge(GraphEdge::resolved(container, id, EdgeKind::Defines).at_line(line));
        }
        id
    }

    fn contain(&mut self, file_id: NodeId, id: NodeId) {
        self.graph
            .add_edge(GraphEdge::resolved(file_id, id, EdgeKind::Contains));
    }
}
