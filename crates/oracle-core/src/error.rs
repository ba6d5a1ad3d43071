//! Error types for catalog loading and querying

use thiserror::Error;

/// Errors raised while loading the catalog or parsing a query
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A record in the data source breaks a catalog invariant
    /// (duplicate key, missing field, bad enumeration, step numbering).
    #[error("data integrity error in {record}: {reason}")]
    DataIntegrity { record: String, reason: String },

    /// A query parameter could not be accepted
    #[error("invalid query: {0}")]
    Validation(String),

    /// YAML parsing error
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configured data source could not be read
    #[error("cannot read data source {path}: {source}")]
    Source {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    /// Build a data integrity error for a record
    pub fn integrity(record: impl Into<String>, reason: impl Into<String>) -> Self {
        CatalogError::DataIntegrity {
            record: record.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error is a data integrity violation
    pub fn is_integrity(&self) -> bool {
        matches!(self, CatalogError::DataIntegrity { .. })
    }
}
