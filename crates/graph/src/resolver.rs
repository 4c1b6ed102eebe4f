use crate::config::ResolutionMode;
use crate::extract;
use crate::identity::{DeclarationKind, IdentityAllocator};
use crate::scope;
use crate::types::{CodeGraph, EdgeKind, EdgeTarget, GraphEdge, NodeId};
use crate::walker::{FunctionSite, WalkedFile};
use codegraph_syntax::{NodeKind, SyntaxNode};

/// Binds call sites and variable reads of walked files to graph nodes
pub(crate) struct ReferenceResolver<'g> {
    graph: &'g mut CodeGraph,
    ids: &'g IdentityAllocator,
    mode: ResolutionMode,
}

impl<'g> ReferenceResolver<'g> {
    pub(crate) fn new(
        graph: &'g mut CodeGraph,
        ids: &'g IdentityAllocator,
        mode: ResolutionMode,
    ) -> Self {
        Self { graph, ids, mode }
    }

    /// Emit one CALLS edge per call site of every declared function
    pub(crate) fn resolve_calls(&mut self, file: &WalkedFile<'_>) -> usize {
        let mut emitted = 0;
        for function in &file.functions {
            for call in call_sites(function) {
                let Some(callee) = extract::callee(call) else {
                    continue;
                };
                let target = match self.lookup_function(file.path, callee, function.id) {
                    Some(id) => EdgeTarget::Resolved(id),
                    None => EdgeTarget::Unresolved(callee.to_string()),
                };
                self.graph.add_edge(
                    GraphEdge::new(function.id, target, EdgeKind::Calls).at_line(call.start_line),
                );
                emitted += 1;
            }
        }
        emitted
    }

    /// Emit USES edges from declared functions to the variables they read
    pub(crate) fn resolve_uses(&mut self, file: &WalkedFile<'_>) -> usize {
        let uses = scope::collect_variable_uses(file.root, &file.sites);
        let emitted = uses.len();
        for usage in uses {
            self.graph.add_edge(
                GraphEdge::resolved(usage.function, usage.variable, EdgeKind::Uses)
                    .at_line(usage.line),
            );
        }
        emitted
    }

    fn lookup_function(&self, file: &str, name: &str, caller: NodeId) -> Option<NodeId> {
        let declaration = match self.mode {
            ResolutionMode::Deferred => self.ids.lookup_declaration(file, name),
            // The caller's own declaration is already registered when its
            // body is reached in a single pass
            ResolutionMode::Sequential => {
                self.ids
                    .lookup_declaration_before(file, name, NodeId(caller.0 + 1))
            }
        }?;

        (declaration.kind == DeclarationKind::Function).then_some(declaration.id)
    }
}

/// Call expressions in a function body, pre-order, excluding nested function
/// declarations
fn call_sites<'a>(function: &FunctionSite<'a>) -> Vec<&'a SyntaxNode> {
    let mut calls = Vec::new();
    let mut stack: Vec<&SyntaxNode> = function.node.children.iter().rev().collect();

    while let Some(node) = stack.pop() {
        match node.kind() {
            NodeKind::FunctionDeclaration | NodeKind::GeneratorFunctionDeclaration => continue,
            NodeKind::CallExpression => calls.push(node),
            _ => {}
        }
        stack.extend(node.children.iter().rev());
    }
    calls
}
