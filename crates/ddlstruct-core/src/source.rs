use async_trait::async_trait;

use crate::error::Result;
use crate::schema::Table;

/// Capability implemented by every introspection backend.
///
/// The generator only depends on this trait, never on a concrete vendor.
#[async_trait]
pub trait SchemaSource: Send + Sync {
    /// Returns the engine identifier (e.g. `postgres`).
    fn engine(&self) -> &str;

    /// Load a single table, or [`crate::Error::SchemaNotFound`] when absent.
    async fn get_table(&self, schema: &str, name: &str) -> Result<Table>;

    /// Load every table of a schema, ordered by name.
    async fn get_tables(&self, schema: &str) -> Result<Vec<Table>>;
}
