use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ddlstruct_core::Table;

/// What happened to a table's struct in its target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableOutcome {
    /// The file did not exist (or was empty) and was synthesized.
    Created,
    /// An existing struct block was replaced in place.
    Patched,
    /// The struct was appended to an existing file.
    Appended,
    /// The file already contained exactly this output.
    Unchanged,
    /// Nothing was written for this table.
    Failed,
}

/// Summary of a generated table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableReport {
    pub schema: String,
    pub table: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub outcome: TableOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Structured generation issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationIssue {
    pub level: String,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl GenerationIssue {
    fn warning(table: &Table, column: Option<&str>, code: &str, message: String) -> Self {
        Self {
            level: "warning".to_string(),
            code: code.to_string(),
            message,
            schema: Some(table.schema.clone()),
            table: Some(table.name.clone()),
            column: column.map(str::to_string),
        }
    }

    pub fn missing_relationship_target(table: &Table, column: &str, target: &str) -> Self {
        Self::warning(
            table,
            Some(column),
            "missing_relationship_target",
            format!("referenced table {target} is not loaded, kept the scalar type"),
        )
    }

    pub fn duplicate_field(table: &Table, field: &str) -> Self {
        Self::warning(
            table,
            None,
            "duplicate_field",
            format!("field {field} is emitted more than once"),
        )
    }

    pub fn formatter_failed(table: &Table, message: String) -> Self {
        Self::warning(table, None, "formatter_failed", message)
    }
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub tables: Vec<TableReport>,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<GenerationIssue>,
}

impl GenerationReport {
    pub fn new(run_id: String) -> Self {
        Self {
            run_id,
            started_at: Utc::now(),
            tables: Vec::new(),
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn record_warning(&mut self, issue: GenerationIssue) {
        *self.warnings_by_code.entry(issue.code.clone()).or_insert(0) += 1;
        self.warnings.push(issue);
    }

    /// Record a table that could not be loaded from the source.
    pub fn record_missing(&mut self, schema: &str, table: &str, error: String) {
        self.tables.push(TableReport {
            schema: schema.to_string(),
            table: table.to_string(),
            path: None,
            outcome: TableOutcome::Failed,
            error: Some(error),
        });
    }

    pub fn has_failures(&self) -> bool {
        self.tables
            .iter()
            .any(|table| table.outcome == TableOutcome::Failed)
    }

    pub fn count(&self, outcome: TableOutcome) -> usize {
        self.tables
            .iter()
            .filter(|table| table.outcome == outcome)
            .count()
    }
}
