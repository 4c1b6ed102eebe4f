//! Scope-chain resolution of identifier reads to variable declarations.
//!
//! Rules:
//! - `program` opens the module scope; function-like nodes open a function
//!   scope; blocks, loops, `catch` and class bodies open a block scope.
//! - `var` declarations, function declarations, parameters and imports are
//!   bound when their scope is entered (hoisting).
//! - `let`/`const` and classes shadow for their whole block: they are bound
//!   on block entry too, so a closure declared before a module-level `const`
//!   still sees it, and a read ahead of a block's own `const x` refers to that
//!   `x` rather than an outer one.
//! - Lookup walks from the innermost scope outward; the first binding wins.

use crate::extract;
use crate::types::NodeId;
use crate::walker::{with_stack, SiteMap};
use codegraph_syntax::{NodeKind, SyntaxNode};
use std::collections::{HashMap, HashSet};

/// What a name is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Binding {
    /// Declared variable with a graph node
    Variable(NodeId),
    Parameter,
    Function,
    Class,
    Import,
    /// Bound, but without a graph node (e.g. `for (const k of ...)`)
    Local,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Module,
    Function,
    Block,
}

struct Scope {
    kind: ScopeKind,
    bindings: HashMap<String, Binding>,
}

/// Stack of lexical scopes, innermost last
#[derive(Default)]
pub(crate) struct ScopeChain {
    scopes: Vec<Scope>,
}

impl ScopeChain {
    fn push(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope {
            kind,
            bindings: HashMap::new(),
        });
    }

    fn pop(&mut self) {
        self.scopes.pop();
    }

    /// Bind in the innermost scope
    fn bind(&mut self, name: &str, binding: Binding) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(name.to_string(), binding);
        }
    }

    /// Bind in the nearest function or module scope
    fn bind_hoisted(&mut self, name: &str, binding: Binding) {
        if let Some(scope) = self
            .scopes
            .iter_mut()
            .rev()
            .find(|s| s.kind != ScopeKind::Block)
        {
            scope.bindings.insert(name.to_string(), binding);
        }
    }

    pub(crate) fn resolve(&self, name: &str) -> Option<Binding> {
        self.scopes
            .iter()
            .rev()
            .find_map(|s| s.bindings.get(name).copied())
    }
}

/// A read of a variable inside a declared function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct VariableUse {
    pub function: NodeId,
    pub variable: NodeId,
    pub line: usize,
}

/// Collect variable reads for every declared function of one file
pub(crate) fn collect_variable_uses(root: &SyntaxNode, sites: &SiteMap) -> Vec<VariableUse> {
    let mut pass = UsagePass {
        sites,
        chain: ScopeChain::default(),
        declared: HashSet::new(),
        uses: Vec::new(),
    };

    pass.chain.push(ScopeKind::Module);
    pass.hoist_imports(root);
    pass.bind_block_declarations(root);
    pass.hoist_vars(root);
    for child in &root.children {
        pass.visit(child, root, None);
    }
    pass.chain.pop();

    pass.uses
}

struct UsagePass<'s> {
    sites: &'s SiteMap,
    chain: ScopeChain,
    /// Addresses of identifiers that declare rather than read
    declared: HashSet<usize>,
    uses: Vec<VariableUse>,
}

impl UsagePass<'_> {
    fn visit(&mut self, node: &SyntaxNode, parent: &SyntaxNode, owner: Option<NodeId>) {
        let kind = node.kind();

        if kind.is_function_like() {
            self.enter_function(node, owner);
            return;
        }

        if kind.is_reference_identifier() {
            self.record_use(node, parent, owner);
            return;
        }

        match kind {
            // Declarations outside a statement list (`switch` cases) bind here
            NodeKind::LexicalDeclaration => self.bind_lexical(node),
            NodeKind::ClassDeclaration => self.bind_class(node),
            _ => {}
        }

        if kind.is_block_like() {
            self.chain.push(ScopeKind::Block);
            self.bind_block_header(node);
            self.bind_block_declarations(node);
            self.visit_children(node, owner);
            self.chain.pop();
        } else {
            self.visit_children(node, owner);
        }
    }

    fn visit_children(&mut self, node: &SyntaxNode, owner: Option<NodeId>) {
        for child in &node.children {
            with_stack(|| self.visit(child, node, owner));
        }
    }

    fn enter_function(&mut self, node: &SyntaxNode, owner: Option<NodeId>) {
        // Declared functions own their reads; nested expressions inherit
        let owner = self.sites.get(node).or(owner);

        self.chain.push(ScopeKind::Function);

        // A named function expression can refer to itself
        if node.is(NodeKind::FunctionExpression) {
            if let Some(name) = extract::function_name(node) {
                self.declare(name);
                self.chain.bind(extract::text(name), Binding::Function);
            }
        }

        for param in extract::parameters(node) {
            self.declare(param);
            self.chain.bind(extract::text(param), Binding::Parameter);
        }
        self.hoist_vars(node);

        self.visit_children(node, owner);
        self.chain.pop();
    }

    fn record_use(&mut self, node: &SyntaxNode, parent: &SyntaxNode, owner: Option<NodeId>) {
        let Some(function) = owner else {
            return;
        };
        if self.declared.contains(&address(node)) || is_label(parent) {
            return;
        }
        let Some(name) = node.source_text() else {
            return;
        };

        if let Some(Binding::Variable(variable)) = self.chain.resolve(name) {
            self.uses.push(VariableUse {
                function,
                variable,
                line: node.start_line,
            });
        }
    }

    fn bind_lexical(&mut self, decl: &SyntaxNode) {
        for ident in extract::declared_identifiers(decl) {
            self.declare(ident);
            let binding = self.sites.get(ident).map_or(Binding::Local, Binding::Variable);
            self.chain.bind(extract::text(ident), binding);
        }
    }

    fn bind_class(&mut self, class: &SyntaxNode) {
        if let Some(name) = extract::class_name(class) {
            self.declare(name);
            self.chain.bind(extract::text(name), Binding::Class);
        }
    }

    /// Bindings introduced by a block's header: `catch (e)`, `for (const k of ...)`
    fn bind_block_header(&mut self, node: &SyntaxNode) {
        let pattern = match node.kind() {
            NodeKind::CatchClause => node
                .named_children()
                .find(|c| !c.is(NodeKind::StatementBlock)),
            NodeKind::ForInStatement => {
                let declares = node
                    .children
                    .iter()
                    .any(|c| !c.is_named && matches!(c.node_type.as_str(), "var" | "let" | "const"));
                if declares {
                    node.named_children().next()
                } else {
                    None
                }
            }
            _ => None,
        };

        if let Some(pattern) = pattern {
            for ident in extract::binding_identifiers(pattern) {
                self.declare(ident);
                self.chain.bind(extract::text(ident), Binding::Local);
            }
        }
    }

    /// Function, class and `let`/`const` declarations are visible throughout
    /// their enclosing block
    fn bind_block_declarations(&mut self, block: &SyntaxNode) {
        for stmt in statements(block) {
            match stmt.kind() {
                NodeKind::FunctionDeclaration | NodeKind::GeneratorFunctionDeclaration => {
                    if let Some(name) = extract::function_name(stmt) {
                        self.declare(name);
                        self.chain.bind(extract::text(name), Binding::Function);
                    }
                }
                NodeKind::ClassDeclaration => self.bind_class(stmt),
                NodeKind::LexicalDeclaration => self.bind_lexical(stmt),
                _ => {}
            }
        }
    }

    /// `var` declarations anywhere in the scope body, not crossing into
    /// nested functions
    fn hoist_vars(&mut self, scope_node: &SyntaxNode) {
        let mut stack: Vec<&SyntaxNode> = scope_node.children.iter().rev().collect();
        while let Some(node) = stack.pop() {
            let kind = node.kind();
            if kind.is_function_like() {
                continue;
            }
            if kind == NodeKind::VariableDeclaration {
                for ident in extract::declared_identifiers(node) {
                    self.declare(ident);
                    let binding = self.sites.get(ident).map_or(Binding::Local, Binding::Variable);
                    self.chain.bind_hoisted(extract::text(ident), binding);
                }
            }
            stack.extend(node.children.iter().rev());
        }
    }

    fn hoist_imports(&mut self, root: &SyntaxNode) {
        for stmt in &root.children {
            if stmt.is(NodeKind::ImportStatement) {
                for ident in extract::import_bindings(stmt) {
                    self.declare(ident);
                    self.chain.bind(extract::text(ident), Binding::Import);
                }
            }
        }
    }

    fn declare(&mut self, ident: &SyntaxNode) {
        self.declared.insert(address(ident));
    }
}

fn address(node: &SyntaxNode) -> usize {
    std::ptr::from_ref(node) as usize
}

/// Direct statements of a block, looking through `export` wrappers
fn statements(block: &SyntaxNode) -> impl Iterator<Item = &SyntaxNode> {
    block.children.iter().flat_map(|stmt| {
        if stmt.node_type == "export_statement" {
            stmt.children.iter().collect::<Vec<_>>()
        } else {
            vec![stmt]
        }
    })
}

fn is_label(parent: &SyntaxNode) -> bool {
    matches!(
        parent.node_type.as_str(),
        "labeled_statement" | "break_statement" | "continue_statement"
    )
}
