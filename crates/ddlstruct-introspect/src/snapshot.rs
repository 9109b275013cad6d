//! JSON schema snapshots.
//!
//! A snapshot is the offline form of a table set: it can be produced once
//! from a live database and fed to the generator any number of times.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use ddlstruct_core::{
    Column, ColumnExtras, DataType, Error, MariadbColumn, PostgresColumn, Result, SNAPSHOT_VERSION,
    SchemaSource, Table, validate_tables,
};

use crate::{mariadb, postgres};

/// Serialized table set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(default = "default_version")]
    pub snapshot_version: String,
    /// Engine the snapshot was taken from (`postgres`, `mariadb`, ...).
    pub engine: String,
    pub tables: Vec<SnapshotTable>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotTable {
    pub name: String,
    #[serde(default)]
    pub schema: String,
    pub columns: Vec<SnapshotColumn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotColumn {
    #[serde(flatten)]
    pub column: Column,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<VendorColumn>,
}

/// Serializable form of the vendor extras attached to a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "engine", rename_all = "snake_case")]
pub enum VendorColumn {
    Postgres(PostgresColumn),
    Mariadb(MariadbColumn),
}

impl VendorColumn {
    fn from_extras(extras: &dyn ColumnExtras) -> Option<Self> {
        let info = extras.specific_info();
        if let Some(postgres) = info.downcast_ref::<PostgresColumn>() {
            return Some(Self::Postgres(postgres.clone()));
        }
        info.downcast_ref::<MariadbColumn>()
            .map(|mariadb| Self::Mariadb(mariadb.clone()))
    }

    fn into_extras(self) -> Arc<dyn ColumnExtras> {
        match self {
            Self::Postgres(postgres) => Arc::new(postgres),
            Self::Mariadb(mariadb) => Arc::new(mariadb),
        }
    }
}

fn default_version() -> String {
    SNAPSHOT_VERSION.to_string()
}

impl SchemaSnapshot {
    pub fn from_tables(engine: &str, tables: &[Table]) -> Self {
        let tables = tables
            .iter()
            .map(|table| SnapshotTable {
                name: table.name.clone(),
                schema: table.schema.clone(),
                columns: table
                    .columns
                    .iter()
                    .map(|column| SnapshotColumn {
                        column: column.clone(),
                        vendor: column
                            .extras
                            .as_deref()
                            .and_then(|extras| VendorColumn::from_extras(extras)),
                    })
                    .collect(),
            })
            .collect();

        Self {
            snapshot_version: default_version(),
            engine: engine.to_string(),
            tables,
        }
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|err| Error::InvalidSnapshot(err.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|err| Error::Other(err.to_string()))
    }

    /// Turn the snapshot back into validated model tables.
    ///
    /// Columns without a generic type are mapped from their native type with
    /// the snapshot engine's vendor mapping.
    pub fn into_tables(self) -> Result<Vec<Table>> {
        let engine = self.engine;
        let tables: Vec<Table> = self
            .tables
            .into_iter()
            .map(|table| Table {
                name: table.name,
                schema: table.schema,
                columns: table
                    .columns
                    .into_iter()
                    .map(|entry| normalize_column(&engine, entry))
                    .collect(),
            })
            .collect();

        validate_tables(&tables)?;
        Ok(tables)
    }
}

fn normalize_column(engine: &str, entry: SnapshotColumn) -> Column {
    let SnapshotColumn { mut column, vendor } = entry;

    if column.data_type == DataType::Unknown && !column.internal_type.is_empty() {
        column.data_type = match engine {
            "postgres" => postgres::data_type_for(&column.internal_type),
            "mariadb" | "mysql" => mariadb::data_type_for(&column.internal_type),
            _ => DataType::Unknown,
        };
    }
    column.foreign_key = !column.foreign_key_column.column.is_empty();
    column.extras = vendor.map(VendorColumn::into_extras);
    column
}

/// Schema source answering from an in-memory snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    engine: String,
    tables: Vec<Table>,
}

impl SnapshotSource {
    pub fn new(engine: impl Into<String>, tables: Vec<Table>) -> Self {
        Self {
            engine: engine.into(),
            tables,
        }
    }

    pub fn from_snapshot(snapshot: SchemaSnapshot) -> Result<Self> {
        let engine = snapshot.engine.clone();
        Ok(Self::new(engine, snapshot.into_tables()?))
    }

    /// Read a snapshot file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::InvalidSnapshot(format!("failed to read {}: {err}", path.display()))
        })?;
        let source = Self::from_snapshot(SchemaSnapshot::from_json(&content)?)?;
        debug!(
            path = %path.display(),
            engine = %source.engine,
            tables = source.tables.len(),
            "snapshot loaded"
        );
        Ok(source)
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }
}

#[async_trait]
impl SchemaSource for SnapshotSource {
    fn engine(&self) -> &str {
        &self.engine
    }

    async fn get_table(&self, schema: &str, name: &str) -> Result<Table> {
        self.tables
            .iter()
            .find(|table| table.is(schema, name))
            .cloned()
            .ok_or_else(|| Error::not_found(schema, name))
    }

    async fn get_tables(&self, schema: &str) -> Result<Vec<Table>> {
        let mut tables: Vec<Table> = self
            .tables
            .iter()
            .filter(|table| table.schema == schema)
            .cloned()
            .collect();
        tables.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(tables)
    }
}
