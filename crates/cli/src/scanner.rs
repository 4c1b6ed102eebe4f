use codegraph_syntax::Language;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

const MAX_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;

/// Finds source files the tree-sitter adapter can parse
pub struct FileScanner {
    root: PathBuf,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Scan the root (.gitignore aware), in sorted path order
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true);
        builder.filter_entry(|entry| !Self::is_vendored(entry.path()));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    if !entry.file_type().is_some_and(|t| t.is_file()) {
                        continue;
                    }

                    let path = entry.path();
                    if let Ok(meta) = entry.metadata() {
                        if meta.len() > MAX_FILE_SIZE_BYTES {
                            log::debug!(
                                "Skipping large file {} ({} bytes > {})",
                                path.display(),
                                meta.len(),
                                MAX_FILE_SIZE_BYTES
                            );
                            continue;
                        }
                    }

                    if Language::from_path(path).supports_ast() {
                        files.push(path.to_path_buf());
                    }
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        files.sort();
        log::info!("Found {} source files", files.len());
        files
    }

    /// Graph path of a scanned file: relative to the root, forward slashes
    pub fn graph_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }

    fn is_vendored(path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| matches!(name, "node_modules" | "dist" | "build" | "target"))
    }
}
