//! # Code Graph Syntax
//!
//! Input side of the code graph: the concrete syntax trees handed over by an
//! external tree-sitter style parser, normalized into one shape the graph
//! builder can walk.
//!
//! ## Pipeline
//!
//! ```text
//! Parser output (JSON or tree_sitter::Tree)
//!     │
//!     ├──> ParsedFile { path, language, success, ast, metadata }
//!     │
//!     └──> ingest()
//!            ├─ success=false      -> IngestError::ParseFailed
//!            ├─ ast missing        -> IngestError::MissingTree
//!            └─ otherwise          -> SourceFile { path, language, root, lines, bytes }
//! ```
//!
//! ## Example
//!
//! ```
//! use codegraph_syntax::{ingest, ParsedFile, SyntaxNode};
//!
//! let parsed = ParsedFile::parsed(
//!     "src/app.js",
//!     "javascript",
//!     SyntaxNode::new("program").with_lines(1, 4),
//! );
//! let source = ingest(parsed).unwrap();
//! assert_eq!(source.lines, 4);
//! ```

mod error;
mod ingest;
mod kind;
mod language;
mod node;
mod parser;

pub use error::{IngestError, Result};
pub use ingest::{ingest, FileMetadata, ParsedFile, SourceFile};
pub use kind::NodeKind;
pub use language::Language;
pub use node::SyntaxNode;
pub use parser::SourceParser;
