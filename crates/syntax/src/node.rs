use crate::kind::NodeKind;
use serde::{Deserialize, Serialize};

/// One node of a concrete syntax tree, as produced by the external parser.
///
/// Lines are 1-based, columns and byte offsets 0-based. The tree is never
/// mutated once ingested; the `with_*` methods exist so adapters and tests can
/// assemble trees without spelling out every position field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxNode {
    pub node_type: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub start_line: usize,
    #[serde(default)]
    pub start_col: usize,
    #[serde(default)]
    pub end_line: usize,
    #[serde(default)]
    pub end_col: usize,
    #[serde(default)]
    pub start_byte: usize,
    #[serde(default)]
    pub end_byte: usize,
    #[serde(default = "named_by_default")]
    pub is_named: bool,
    #[serde(default)]
    pub children: Vec<SyntaxNode>,
}

const fn named_by_default() -> bool {
    true
}

impl SyntaxNode {
    /// Create a named node of the given kind with zeroed positions
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: node_type.into(),
            text: None,
            start_line: 0,
            start_col: 0,
            end_line: 0,
            end_col: 0,
            start_byte: 0,
            end_byte: 0,
            is_named: true,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    #[must_use]
    pub const fn with_lines(mut self, start: usize, end: usize) -> Self {
        self.start_line = start;
        self.end_line = end;
        self
    }

    #[must_use]
    pub const fn with_cols(mut self, start: usize, end: usize) -> Self {
        self.start_col = start;
        self.end_col = end;
        self
    }

    #[must_use]
    pub const fn with_bytes(mut self, start: usize, end: usize) -> Self {
        self.start_byte = start;
        self.end_byte = end;
        self
    }

    /// Mark as an anonymous token (punctuation, keywords)
    #[must_use]
    pub const fn unnamed(mut self) -> Self {
        self.is_named = false;
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Classified kind of this node. Anonymous tokens (keywords such as
    /// `function` or `class`) are always [`NodeKind::Other`].
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        if self.is_named {
            NodeKind::from_type(&self.node_type)
        } else {
            NodeKind::Other
        }
    }

    #[must_use]
    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind() == kind
    }

    /// Raw source snippet, if the parser attached one
    #[must_use]
    pub fn source_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn named_children(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter(|c| c.is_named)
    }

    /// First direct child of the given kind
    #[must_use]
    pub fn child_of_kind(&self, kind: NodeKind) -> Option<&Self> {
        self.children.iter().find(|c| c.kind() == kind)
    }

    /// First named direct child matching any of the given kinds
    #[must_use]
    pub fn child_of_kinds(&self, kinds: &[NodeKind]) -> Option<&Self> {
        self.named_children().find(|c| kinds.contains(&c.kind()))
    }

    /// First node (self included) in pre-order satisfying the predicate
    pub fn find_preorder(&self, mut pred: impl FnMut(&Self) -> bool) -> Option<&Self> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if pred(node) {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }
}

// Children are freed iteratively; trees can be arbitrarily deep.
impl Drop for SyntaxNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
