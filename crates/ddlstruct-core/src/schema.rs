use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::extras::ColumnExtras;

/// Generic data type a vendor column type is mapped onto.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum DataType {
    String,
    Integer,
    Double,
    Date,
    Geo,
    #[default]
    Unknown,
}

/// Target of a foreign key. Empty `name`/`column` means "no reference".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ForeignColumn {
    /// Name of the referenced table.
    pub name: String,
    /// Schema the referenced table belongs to.
    #[serde(default)]
    pub schema: String,
    /// Name of the referenced column.
    pub column: String,
}

impl ForeignColumn {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.column.is_empty()
    }
}

/// A logical table, read-only once produced by a [`crate::SchemaSource`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub schema: String,
    /// Columns in ordinal position order.
    pub columns: Vec<Column>,
}

impl Table {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            columns: Vec::new(),
        }
    }

    /// `schema.table`, or only `table` when the schema is empty.
    pub fn qualified_name(&self) -> String {
        if self.schema.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.schema, self.name)
        }
    }

    pub fn is(&self, schema: &str, name: &str) -> bool {
        self.schema == schema && self.name == name
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// Column metadata for a table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    /// Unique name within the table.
    pub name: String,
    #[serde(default)]
    pub data_type: DataType,
    /// Vendor-native type name including length, informational only.
    #[serde(default)]
    pub internal_type: String,
    #[serde(default)]
    pub primary_key: bool,
    /// True iff `foreign_key_column.column` is non-empty.
    #[serde(default)]
    pub foreign_key: bool,
    #[serde(default, skip_serializing_if = "ForeignColumn::is_empty")]
    pub foreign_key_column: ForeignColumn,
    #[serde(default)]
    pub can_be_null: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Backend specific facts. Rebuilt by the backend, never serialized.
    #[serde(skip)]
    #[schemars(skip)]
    pub extras: Option<Arc<dyn ColumnExtras>>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            ..Self::default()
        }
    }

    /// Builder-style helper that points this column at `schema.table.column`.
    pub fn with_reference(mut self, schema: &str, table: &str, column: &str) -> Self {
        self.foreign_key_column = ForeignColumn {
            name: table.to_string(),
            schema: schema.to_string(),
            column: column.to_string(),
        };
        self.foreign_key = !column.is_empty();
        self
    }

    /// Whether this column carries a foreign key to `schema.table`.
    pub fn references(&self, schema: &str, table: &str) -> bool {
        self.foreign_key
            && self.foreign_key_column.schema == schema
            && self.foreign_key_column.name == table
    }

    /// Comment split into one entry per line; empty when there is no comment.
    pub fn comment_lines(&self) -> Vec<&str> {
        match self.comment.as_deref() {
            Some(comment) if !comment.is_empty() => comment.split('\n').collect(),
            _ => Vec::new(),
        }
    }
}
