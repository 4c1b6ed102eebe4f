//! # Code Graph
//!
//! Typed graph of code entities and their relationships, derived from
//! per-file syntax trees.
//!
//! ## Features
//!
//! - **Structure** - files contain functions, classes, variables and imports
//! - **Call graph** - function to function calls, bound within a file
//! - **Data flow** - which function declares and reads which variable
//! - **Dependencies** - relative imports linked to the files they name
//!
//! ## Architecture
//!
//! ```text
//! ParsedFile[]
//!     │
//!     ├──> Ingest (codegraph-syntax)
//!     │      └─ skip failed parses, normalize metadata
//!     │
//!     ├──> Structural Walker
//!     │      ├─ File / Function / Class / Variable / Import nodes
//!     │      ├─ CONTAINS, DEFINES, EXTENDS edges
//!     │      └─ Register declarations (file, name) -> id
//!     │
//!     ├──> Reference Resolver
//!     │      ├─ CALLS via the declaration table
//!     │      └─ USES via per-file scope chains
//!     │
//!     ├──> Import Linker
//!     │      └─ IMPORTS_FROM for exact relative path matches
//!     │
//!     └──> CodeGraph
//!            ├─ Queries (petgraph for paths and cycles)
//!            └─ Export (JSON document, Graphviz DOT)
//! ```
//!
//! ## Example
//!
//! ```
//! use codegraph::GraphBuilder;
//! use codegraph_syntax::{ParsedFile, SyntaxNode};
//!
//! let foo = SyntaxNode::new("function_declaration")
//!     .with_lines(1, 1)
//!     .with_child(SyntaxNode::new("identifier").with_text("foo"))
//!     .with_child(SyntaxNode::new("formal_parameters"))
//!     .with_child(SyntaxNode::new("statement_block"));
//! let file = ParsedFile::parsed(
//!     "src/app.js",
//!     "javascript",
//!     SyntaxNode::new("program").with_lines(1, 1).with_child(foo),
//! );
//!
//! let graph = GraphBuilder::default().build(vec![file]).unwrap();
//! assert_eq!(graph.functions_in_file("src/app.js")[0].name, "foo");
//! ```

mod builder;
mod config;
mod error;
mod export;
mod extract;
mod graph;
mod identity;
mod linker;
mod resolver;
mod scope;
mod types;
mod validate;
mod walker;

pub use builder::{BuildReport, GraphBuilder, SkippedFile};
pub use config::{GraphBuilderConfig, ResolutionMode};
pub use error::{GraphError, Result};
pub use export::{DotOptions, GraphDocument};
pub use graph::GraphStats;
pub use identity::{Declaration, DeclarationKind, IdentityAllocator};
pub use linker::{normalize_path, resolve_import_path};
pub use types::{
    ClassNode, CodeGraph, EdgeCategory, EdgeKind, EdgeTarget, EntityKind, FileNode, FunctionNode,
    GraphEdge, GraphNode, ImportNode, NodeId, VariableNode,
};
