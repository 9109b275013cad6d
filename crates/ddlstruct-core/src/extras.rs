//! Vendor specific column facts.
//!
//! Backends attach one [`ColumnExtras`] implementation to every column they
//! produce. Generation code only talks to the trait and checks for known
//! capabilities through [`auto_increment`], which never fails.

use std::any::Any;
use std::fmt::Debug;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::schema::Column;

/// Additional column information specific to one database system.
pub trait ColumnExtras: Debug + Send + Sync {
    /// Short descriptive label of the backend that produced the column.
    fn extra_info(&self) -> &str;

    /// The concrete backend object, for callers that inspect known capabilities.
    fn specific_info(&self) -> &dyn Any;
}

/// Column facts reported by PostgreSQL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PostgresColumn {
    /// `ALWAYS` / `BY DEFAULT` for identity columns.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,
    /// Whether the default value draws from a sequence (`serial` columns).
    #[serde(default)]
    pub sequence_default: bool,
    #[serde(default)]
    pub udt_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_max_length: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_precision: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_scale: Option<i32>,
}

impl PostgresColumn {
    pub fn is_auto_increment(&self) -> bool {
        self.identity.is_some() || self.sequence_default
    }
}

impl ColumnExtras for PostgresColumn {
    fn extra_info(&self) -> &str {
        "PostgreSQL"
    }

    fn specific_info(&self) -> &dyn Any {
        self
    }
}

/// Internal MariaDB column key (`COLUMN_KEY` of `information_schema.columns`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum MariadbKeyType {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "PRI")]
    Primary,
    #[serde(rename = "UNI")]
    Unique,
    #[serde(rename = "MUL")]
    MultipleIndex,
}

/// Column facts reported by MariaDB.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MariadbColumn {
    #[serde(default)]
    pub auto_increment: bool,
    /// Character length or numeric precision.
    #[serde(default)]
    pub data_type_length: i64,
    #[serde(default)]
    pub key_type: MariadbKeyType,
}

impl ColumnExtras for MariadbColumn {
    fn extra_info(&self) -> &str {
        "MariaDB"
    }

    fn specific_info(&self) -> &dyn Any {
        self
    }
}

/// Whether the backend flagged the column as auto-incrementing.
///
/// Unknown backends and columns without extras report `false`.
pub fn auto_increment(column: &Column) -> bool {
    let Some(extras) = column.extras.as_deref() else {
        return false;
    };
    let info = extras.specific_info();

    if let Some(mariadb) = info.downcast_ref::<MariadbColumn>() {
        return mariadb.auto_increment;
    }
    if let Some(postgres) = info.downcast_ref::<PostgresColumn>() {
        return postgres.is_auto_increment();
    }
    false
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::schema::DataType;

    #[derive(Debug)]
    struct OtherVendor;

    impl ColumnExtras for OtherVendor {
        fn extra_info(&self) -> &str {
            "Other"
        }

        fn specific_info(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn reads_mariadb_auto_increment() {
        let mut column = Column::new("id", DataType::Integer);
        column.extras = Some(Arc::new(MariadbColumn {
            auto_increment: true,
            ..MariadbColumn::default()
        }));
        assert!(auto_increment(&column));
    }

    #[test]
    fn reads_postgres_identity() {
        let mut column = Column::new("id", DataType::Integer);
        column.extras = Some(Arc::new(PostgresColumn {
            identity: Some("ALWAYS".to_string()),
            ..PostgresColumn::default()
        }));
        assert!(auto_increment(&column));
        assert_eq!(column.extras.as_deref().map(|e| e.extra_info()), Some("PostgreSQL"));
    }

    #[test]
    fn unknown_vendor_defaults_to_absent() {
        let mut column = Column::new("id", DataType::Integer);
        assert!(!auto_increment(&column));

        column.extras = Some(Arc::new(OtherVendor));
        assert!(!auto_increment(&column));
    }
}
