use thiserror::Error;

/// Core error type shared across ddlstruct crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The requested table does not exist in the source.
    #[error("table {schema}.{table} was not found")]
    SchemaNotFound { schema: String, table: String },
    /// The introspection backend failed to answer a query.
    #[error("introspection failed: {0}")]
    Introspection(String),
    /// A schema snapshot could not be read or violates model invariants.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

impl Error {
    pub fn not_found(schema: &str, table: &str) -> Self {
        Self::SchemaNotFound {
            schema: schema.to_string(),
            table: table.to_string(),
        }
    }
}

/// Convenience alias for results returned by ddlstruct crates.
pub type Result<T> = std::result::Result<T, Error>;
