use crate::config::ResolutionMode;
use crate::types::{CodeGraph, EdgeKind, GraphEdge, NodeId};
use crate::walker::WalkedFile;
use std::collections::HashMap;

/// Links relative imports to the files they name.
///
/// Only exact path matches link: no extension guessing and no `index` file
/// fallback.
pub(crate) struct ImportLinker {
    files: HashMap<String, NodeId>,
    mode: ResolutionMode,
}

impl ImportLinker {
    pub(crate) fn new<'a>(
        walked: impl IntoIterator<Item = &'a WalkedFile<'a>>,
        mode: ResolutionMode,
    ) -> Self {
        let mut files = HashMap::new();
        for file in walked {
            files
                .entry(normalize_path(file.path))
                .or_insert(file.file_id);
        }
        Self { files, mode }
    }

    /// Emit IMPORTS_FROM edges for one file's imports
    pub(crate) fn link(&self, graph: &mut CodeGraph, file: &WalkedFile<'_>) -> usize {
        let mut linked = 0;
        for import in &file.imports {
            let Some(source) = import.source.as_deref() else {
                continue;
            };
            let Some(target) = self.target(file.path, source) else {
                continue;
            };
            if self.mode == ResolutionMode::Sequential && target >= import.id {
                continue;
            }

            graph.add_edge(
                GraphEdge::resolved(file.file_id, target, EdgeKind::ImportsFrom)
                    .at_line(import.line)
                    .with_module(source),
            );
            linked += 1;
        }
        linked
    }

    fn target(&self, importer: &str, source: &str) -> Option<NodeId> {
        let path = resolve_import_path(importer, source)?;
        self.files.get(&path).copied()
    }
}

/// Path a relative import points at, or `None` for package imports
pub fn resolve_import_path(importer: &str, source: &str) -> Option<String> {
    if !source.starts_with('.') {
        return None;
    }
    let importer = importer.replace('\\', "/");
    let dir = importer.rsplit_once('/').map_or("", |(dir, _)| dir);
    let joined = if dir.is_empty() && !importer.starts_with('/') {
        source.to_string()
    } else {
        format!("{dir}/{source}")
    };
    Some(normalize_path(&joined))
}

/// Lexical normalization: forward slashes, `.` and `..` folded.
/// `..` above the root of an absolute path is dropped.
pub fn normalize_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{joined}")
    } else {
        joined
    }
}
