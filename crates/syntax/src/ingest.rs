use crate::error::{IngestError, Result};
use crate::language::Language;
use crate::node::SyntaxNode;
use serde::{Deserialize, Serialize};

/// Size metadata reported by the parser
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    #[serde(default)]
    pub lines: usize,
    #[serde(default)]
    pub bytes: usize,
}

/// Per-file parse result, exactly as the external parser reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFile {
    pub path: String,
    #[serde(default)]
    pub language: String,
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ast: Option<SyntaxNode>,
    #[serde(default)]
    pub metadata: FileMetadata,
}

impl ParsedFile {
    /// Successful parse with metadata derived from the tree
    pub fn parsed(path: impl Into<String>, language: impl Into<String>, ast: SyntaxNode) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
            success: true,
            error: None,
            ast: Some(ast),
            metadata: FileMetadata::default(),
        }
    }

    /// Failed parse carrying the parser's error message
    pub fn failed(
        path: impl Into<String>,
        language: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            language: language.into(),
            success: false,
            error: Some(error.into()),
            ast: None,
            metadata: FileMetadata::default(),
        }
    }

    #[must_use]
    pub const fn with_metadata(mut self, lines: usize, bytes: usize) -> Self {
        self.metadata = FileMetadata { lines, bytes };
        self
    }

    /// Decode a JSON array of parse results. Tree depth is unbounded.
    pub fn batch_from_json(json: &str) -> Result<Vec<Self>> {
        let invalid = |e: serde_json::Error| IngestError::InvalidJson(e.to_string());

        let mut de = serde_json::Deserializer::from_str(json);
        de.disable_recursion_limit();
        let batch = Vec::<Self>::deserialize(serde_stacker::Deserializer::new(&mut de))
            .map_err(invalid)?;
        de.end().map_err(invalid)?;
        Ok(batch)
    }
}

/// A successfully parsed file, normalized for the graph builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: String,
    /// Language tag as reported (or inferred from the extension)
    pub language: String,
    pub root: SyntaxNode,
    pub lines: usize,
    pub bytes: usize,
}

/// Normalize one parse result.
///
/// Failed parses and successful results without a tree are rejected; the
/// caller decides whether that aborts anything (the graph builder only skips
/// the file).
pub fn ingest(parsed: ParsedFile) -> Result<SourceFile> {
    let ParsedFile {
        path,
        language,
        success,
        error,
        ast,
        metadata,
    } = parsed;

    if !success {
        return Err(IngestError::ParseFailed {
            path,
            reason: error.unwrap_or_else(|| "parser reported failure".to_string()),
        });
    }

    let Some(root) = ast else {
        return Err(IngestError::MissingTree { path });
    };

    let language = if language.trim().is_empty() {
        Language::from_path(&path).as_str().to_string()
    } else {
        language
    };

    let (lines, bytes) = if metadata.lines == 0 && metadata.bytes == 0 {
        (root.end_line, root.end_byte)
    } else {
        (metadata.lines, metadata.bytes)
    };

    Ok(SourceFile {
        path,
        language,
        root,
        lines,
        bytes,
    })
}
