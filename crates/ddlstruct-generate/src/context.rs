use ddlstruct_core::Table;

use crate::config::{GeneratorConfig, ResolvedTableConfig};
use crate::naming;

/// Read-only view over the configuration and the complete table set.
///
/// Relationship resolution needs every table at once, so the set is fully
/// loaded before any table is rendered and never mutated afterwards.
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    config: &'a GeneratorConfig,
    tables: &'a [Table],
}

impl<'a> GenerationContext<'a> {
    pub fn new(config: &'a GeneratorConfig, tables: &'a [Table]) -> Self {
        Self { config, tables }
    }

    pub fn config(&self) -> &'a GeneratorConfig {
        self.config
    }

    pub fn tables(&self) -> &'a [Table] {
        self.tables
    }

    pub fn table_config(&self, table: &Table) -> ResolvedTableConfig {
        self.config.resolve(table)
    }

    pub fn find_table(&self, schema: &str, name: &str) -> Option<&'a Table> {
        self.tables.iter().find(|table| table.is(schema, name))
    }

    /// Generated struct name of `table`, including its configured suffix.
    pub fn type_name(&self, table: &Table) -> String {
        naming::type_name(&table.name, &self.table_config(table).suffix)
    }
}
