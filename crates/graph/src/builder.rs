use crate::config::GraphBuilderConfig;
use crate::error::Result;
use crate::identity::IdentityAllocator;
use crate::linker::ImportLinker;
use crate::resolver::ReferenceResolver;
use crate::types::CodeGraph;
use crate::walker::{StructuralWalker, WalkedFile};
use codegraph_syntax::{ingest, ParsedFile, SourceFile};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// File left out of the graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: String,
    pub reason: String,
}

/// Outcome of one build besides the graph itself
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub files_built: usize,
    pub skipped: Vec<SkippedFile>,
}

/// Build code graph from parsed files
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    config: GraphBuilderConfig,
}

impl GraphBuilder {
    #[must_use]
    pub const fn new(config: GraphBuilderConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &GraphBuilderConfig {
        &self.config
    }

    /// Build graph from a batch of parsed files
    pub fn build(&self, files: impl IntoIterator<Item = ParsedFile>) -> Result<CodeGraph> {
        self.build_with_report(files).map(|(graph, _)| graph)
    }

    /// Build graph and report which files were skipped
    pub fn build_with_report(
        &self,
        files: impl IntoIterator<Item = ParsedFile>,
    ) -> Result<(CodeGraph, BuildReport)> {
        let mut report = BuildReport::default();
        let sources = Self::ingest_all(files, &mut report);

        let mut graph = CodeGraph::new();
        let mut ids = IdentityAllocator::new();

        // Phase 1: nodes, containment and declarations for every file
        let walked: Vec<WalkedFile<'_>> = {
            let mut walker = StructuralWalker::new(&mut graph, &mut ids);
            sources.iter().map(|source| walker.walk(source)).collect()
        };
        report.files_built = walked.len();

        // Phase 2: calls and variable uses
        {
            let mut resolver = ReferenceResolver::new(&mut graph, &ids, self.config.resolution);
            let mut calls = 0;
            let mut uses = 0;
            for file in &walked {
                calls += resolver.resolve_calls(file);
                if self.config.resolve_variable_uses {
                    uses += resolver.resolve_uses(file);
                }
            }
            log::debug!("Resolved {calls} call sites, {uses} variable uses");
        }

        // Phase 3: imports
        if self.config.link_imports {
            let linker = ImportLinker::new(&walked, self.config.resolution);
            let linked: usize = walked.iter().map(|file| linker.link(&mut graph, file)).sum();
            log::debug!("Linked {linked} imports");
        }

        if self.config.validate {
            graph.validate()?;
        }

        log::info!(
            "Built code graph: {} nodes, {} edges ({} files, {} skipped)",
            graph.node_count(),
            graph.edge_count(),
            report.files_built,
            report.skipped.len()
        );

        Ok((graph, report))
    }

    fn ingest_all(
        files: impl IntoIterator<Item = ParsedFile>,
        report: &mut BuildReport,
    ) -> Vec<SourceFile> {
        let mut seen = HashSet::new();
        let mut sources = Vec::new();

        for parsed in files {
            let path = parsed.path.clone();
            let reason = match ingest(parsed) {
                Ok(source) if seen.insert(source.path.clone()) => {
                    sources.push(source);
                    continue;
                }
                Ok(_) => "duplicate path".to_string(),
                Err(err) => err.to_string(),
            };
            log::warn!("Skipping {path}: {reason}");
            report.skipped.push(SkippedFile { path, reason });
        }
        sources
    }
}
