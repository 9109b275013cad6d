//! Generator configuration.
//!
//! Global options plus per-table overrides keyed by `schema.table` (priority)
//! or `table` (fallback), loaded from TOML.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ddlstruct_core::Table;

use crate::naming;

/// Suffix value that forces an empty suffix, overriding the global default.
pub const EMPTY_SUFFIX: &str = "<empty>";
/// Entry of `include_referenced` that includes every foreign key column.
pub const INCLUDE_ALL: &str = "*";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// What to do when a configured 1:1 target table is not loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipPolicy {
    /// Log a warning and fall back to the scalar mapping.
    #[default]
    Lenient,
    /// Fail the table.
    Strict,
}

/// Global generator options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory every file without an explicit path is written to.
    pub output_root: PathBuf,
    /// Go package name used for new files.
    pub namespace: String,
    /// Suffix appended to every generated type name.
    pub suffix: String,
    pub relationship_policy: RelationshipPolicy,
    /// Command run on every written file, the path is appended as last argument.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<Vec<String>>,
    /// Per-table overrides keyed by `schema.table` or `table`.
    pub tables: BTreeMap<String, TableConfig>,
}

/// Options for a specific table. Unset fields fall back to the global ones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Go file to write this table's struct to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Use [`EMPTY_SUFFIX`] to disable the global suffix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    /// Foreign key columns rendered as a reference to the target struct (1:1).
    /// A single `*` includes all of them.
    pub include_referenced: Vec<String>,
    /// Add a slice field per table pointing at this one (1:n).
    pub include_pointed: bool,
}

/// Which foreign key columns are rendered as 1:1 references.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ReferenceInclusion {
    #[default]
    Nothing,
    All,
    Columns(Vec<String>),
}

impl ReferenceInclusion {
    pub fn from_entries(entries: &[String]) -> Self {
        if entries.is_empty() {
            Self::Nothing
        } else if entries.iter().any(|entry| entry == INCLUDE_ALL) {
            Self::All
        } else {
            Self::Columns(entries.to_vec())
        }
    }

    /// Matches the raw column name or its Go field name.
    pub fn includes(&self, column_name: &str) -> bool {
        match self {
            Self::Nothing => false,
            Self::All => true,
            Self::Columns(entries) => {
                let field_name = naming::field_name(column_name);
                entries
                    .iter()
                    .any(|entry| entry == column_name || *entry == field_name)
            }
        }
    }
}

/// Table configuration with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTableConfig {
    pub path: PathBuf,
    pub namespace: String,
    pub suffix: String,
    pub include_referenced: ReferenceInclusion,
    pub include_pointed: bool,
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self
            .formatter
            .as_ref()
            .is_some_and(|argv| argv.first().is_none_or(|program| program.is_empty()))
        {
            return Err(ConfigError::Invalid(
                "formatter must name a program".to_string(),
            ));
        }
        Ok(())
    }

    /// The table-specific override, if any.
    pub fn find_table_config(&self, table: &Table) -> Option<&TableConfig> {
        self.tables
            .get(&format!("{}.{}", table.schema, table.name))
            .or_else(|| self.tables.get(&table.name))
    }

    pub fn resolve(&self, table: &Table) -> ResolvedTableConfig {
        let specific = self.find_table_config(table).cloned().unwrap_or_default();

        let path = specific.path.unwrap_or_else(|| {
            self.output_root
                .join(format!("{}.go", naming::file_name(&table.name)))
        });
        let namespace = specific
            .namespace
            .filter(|namespace| !namespace.is_empty())
            .unwrap_or_else(|| self.namespace.clone());
        let suffix = match specific.suffix.as_deref() {
            Some(EMPTY_SUFFIX) => String::new(),
            Some(suffix) if !suffix.is_empty() => suffix.to_string(),
            _ => self.suffix.clone(),
        };

        ResolvedTableConfig {
            path,
            namespace,
            suffix,
            include_referenced: ReferenceInclusion::from_entries(&specific.include_referenced),
            include_pointed: specific.include_pointed,
        }
    }
}
