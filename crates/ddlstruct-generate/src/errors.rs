use thiserror::Error;

use crate::config::ConfigError;
use crate::merge::MergeError;

/// Errors emitted by the struct generator.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("invalid schema: {0}")]
    Schema(#[from] ddlstruct_core::Error),
    #[error("column {table}.{column} references {target}, which is not part of the loaded tables")]
    MissingRelationshipTarget {
        table: String,
        column: String,
        target: String,
    },
    #[error("tables {first} and {second} both generate type {type_name} in the same file")]
    DuplicateType {
        type_name: String,
        first: String,
        second: String,
    },
    #[error("malformed existing file: {0}")]
    MalformedExistingFile(#[from] MergeError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
