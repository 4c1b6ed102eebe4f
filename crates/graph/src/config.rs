use crate::error::Result;
use serde::{Deserialize, Serialize};

/// When calls and imports are bound to their targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionMode {
    /// Walk every file first, then resolve against the complete tables
    #[default]
    Deferred,

    /// Resolve as if in a single pass: only declarations and files seen
    /// before the reference can be targets
    Sequential,
}

/// Graph builder configuration
///
/// ```toml
/// resolution = "sequential"
/// resolve_variable_uses = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphBuilderConfig {
    pub resolution: ResolutionMode,

    /// Emit USES edges from functions to the variables they reference
    pub resolve_variable_uses: bool,

    /// Emit IMPORTS_FROM edges for relative imports of known files
    pub link_imports: bool,

    /// Check structural invariants before handing out the graph
    pub validate: bool,
}

impl Default for GraphBuilderConfig {
    fn default() -> Self {
        Self {
            resolution: ResolutionMode::Deferred,
            resolve_variable_uses: true,
            link_imports: true,
            validate: true,
        }
    }
}

impl GraphBuilderConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    #[must_use]
    pub const fn with_resolution(mut self, resolution: ResolutionMode) -> Self {
        self.resolution = resolution;
        self
    }

    #[must_use]
    pub const fn with_variable_uses(mut self, enabled: bool) -> Self {
        self.resolve_variable_uses = enabled;
        self
    }

    #[must_use]
    pub const fn with_import_linking(mut self, enabled: bool) -> Self {
        self.link_imports = enabled;
        self
    }
}
