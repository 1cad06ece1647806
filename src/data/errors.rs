use std::path::PathBuf;
use thiserror::Error;

/// Error types for ingestion, rendering and cache operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Source missing: {source_name} ({path})")]
    SourceMissing { source_name: String, path: PathBuf },

    #[error("Render error in {category}: {message}")]
    Render { category: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for data operations
pub type DataResult<T> = Result<T, DataError>;

impl DataError {
    /// Create a render error for a narrative category
    pub fn render_error<S: Into<String>>(category: S, message: S) -> Self {
        DataError::Render {
            category: category.into(),
            message: message.into(),
        }
    }

    /// Create a missing-source error
    pub fn source_missing<S: Into<String>, P: Into<PathBuf>>(source_name: S, path: P) -> Self {
        DataError::SourceMissing {
            source_name: source_name.into(),
            path: path.into(),
        }
    }
}
