use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    /// The graph breaks one of its structural guarantees. Raised for
    /// allocator or builder bugs, never for unresolved references.
    #[error("Graph invariant violated: {0}")]
    InvariantViolation(String),

    #[error("Invalid builder config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
