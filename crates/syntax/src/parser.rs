use crate::error::{IngestError, Result};
use crate::ingest::{FileMetadata, ParsedFile};
use crate::kind::NodeKind;
use crate::language::Language;
use crate::node::SyntaxNode;
use tree_sitter::{Node, Parser};

/// Thin adapter over a tree-sitter parser producing [`ParsedFile`] values.
///
/// The graph builder never parses by itself; this exists for callers that
/// hold source text instead of pre-parsed trees.
pub struct SourceParser {
    language: Language,
    parser: Parser,
}

impl SourceParser {
    pub fn new(language: Language) -> Result<Self> {
        let mut parser = Parser::new();
        let ts_lang = language.tree_sitter_language()?;

        parser
            .set_language(&ts_lang)
            .map_err(|e| IngestError::Parser(format!("Failed to set language: {e}")))?;

        Ok(Self { language, parser })
    }

    /// Parser for the language implied by the file extension
    pub fn for_path(path: &str) -> Result<Self> {
        Self::new(Language::from_path(path))
    }

    /// Parse one file. Never fails: problems are reported in-band through
    /// `success=false` like any external parser would.
    pub fn parse(&mut self, path: &str, source: &str) -> ParsedFile {
        let Some(tree) = self.parser.parse(source, None) else {
            return ParsedFile::failed(path, self.language.as_str(), "parser returned no tree");
        };

        let root = tree.root_node();
        if root.has_error() {
            log::debug!("{path}: syntax errors present, keeping partial tree");
        }

        let ast = convert(root, source.as_bytes());
        ParsedFile {
            path: path.to_string(),
            language: self.language.as_str().to_string(),
            success: true,
            error: None,
            ast: Some(ast),
            metadata: FileMetadata {
                lines: source.lines().count(),
                bytes: source.len(),
            },
        }
    }
}

/// Longest snippet kept on an inner node. Leaves always keep their text.
const MAX_SNIPPET_BYTES: usize = 256;

struct Frame<'tree> {
    node: Node<'tree>,
    next_child: usize,
    out: SyntaxNode,
}

impl<'tree> Frame<'tree> {
    fn new(node: Node<'tree>, source: &[u8]) -> Self {
        Self {
            node,
            next_child: 0,
            out: shallow(node, source),
        }
    }
}

/// Convert a tree-sitter node and its subtree into an owned [`SyntaxNode`].
///
/// Iterative; generated sources nest deeper than the thread stack allows.
fn convert(root: Node, source: &[u8]) -> SyntaxNode {
    let mut stack = vec![Frame::new(root, source)];

    loop {
        let Some(top) = stack.last_mut() else {
            return shallow(root, source);
        };

        if top.next_child < top.node.child_count() {
            let child = top.node.child(top.next_child);
            top.next_child += 1;
            if let Some(child) = child {
                stack.push(Frame::new(child, source));
            }
            continue;
        }

        let Some(done) = stack.pop() else {
            return shallow(root, source);
        };
        match stack.last_mut() {
            Some(parent) => parent.out.children.push(done.out),
            None => return done.out,
        }
    }
}

/// One node without its children
fn shallow(node: Node, source: &[u8]) -> SyntaxNode {
    let start = node.start_position();
    let end = node.end_position();

    let mut out = SyntaxNode::new(node.kind())
        .with_lines(start.row + 1, end.row + 1)
        .with_cols(start.column, end.column)
        .with_bytes(node.start_byte(), node.end_byte());
    if !node.is_named() {
        out = out.unnamed();
    }

    if keeps_text(node) {
        if let Ok(text) = node.utf8_text(source) {
            out.text = Some(text.to_string());
        }
    }
    out
}

/// Leaves carry their text. Inner nodes only when read as a whole (member
/// callees, string literals, heritage clauses) and short.
fn keeps_text(node: Node) -> bool {
    if node.child_count() == 0 {
        return true;
    }
    matches!(
        NodeKind::from_type(node.kind()),
        NodeKind::MemberExpression | NodeKind::String | NodeKind::ClassHeritage
    ) && node.byte_range().len() <= MAX_SNIPPET_BYTES
}
