use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IngestError {
    #[error("Parse failed for {path}: {reason}")]
    ParseFailed { path: String, reason: String },

    #[error("No syntax tree for {path}")]
    MissingTree { path: String },

    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Parser error: {0}")]
    Parser(String),

    #[error("Invalid parser output: {0}")]
    InvalidJson(String),
}

impl IngestError {
    /// Path of the file the error belongs to, when there is one
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::ParseFailed { path, .. } | Self::MissingTree { path } => Some(path),
            Self::UnsupportedLanguage(_) | Self::Parser(_) | Self::InvalidJson(_) => None,
        }
    }
}
