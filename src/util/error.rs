//! Error types for look assignment.

use thiserror::Error;

/// Main error type for look-assignment operations.
#[derive(Error, Debug)]
pub enum Error {
    /// More than one shader was requested for forced assignment
    #[error("Only a single shader can be force assigned, got {count}")]
    ConflictingAssignmentMode { count: usize },

    /// Empty shader batch
    #[error("No shaders selected for assignment")]
    NoShadersSelected,

    /// A recorded object name matched nothing in the pool.
    ///
    /// Never returned by the engine, only handed to report sinks.
    #[error("Shader {shader}: recorded object '{target}' not found in scene")]
    UnresolvedTarget { shader: String, target: String },

    /// A recorded object name contains the target list separator
    #[error("Object name '{name}' contains the target separator and will not survive a round trip")]
    AmbiguousSeparator { name: String },

    /// Shader not found by name
    #[error("Shader not found: {0}")]
    ShaderNotFound(String),

    /// Invalid document structure
    #[error("Invalid document structure: {0}")]
    InvalidStructure(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid structure error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidStructure(msg.into())
    }

    /// Whether this is a user-facing warning rather than a hard failure.
    ///
    /// Validation and data-quality problems are surfaced to the artist and
    /// leave the scene untouched; everything else aborts the command.
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Self::ConflictingAssignmentMode { .. }
                | Self::NoShadersSelected
                | Self::UnresolvedTarget { .. }
                | Self::AmbiguousSeparator { .. }
                | Self::ShaderNotFound(_)
        )
    }
}

/// Result type alias for look-assignment operations.
pub type Result<T> = std::result::Result<T, Error>;
