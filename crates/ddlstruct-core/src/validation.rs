use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::Table;

/// Validate internal consistency of a loaded table set.
///
/// This checks:
/// - duplicate tables and columns
/// - the foreign key flag agrees with the referenced column
pub fn validate_tables(tables: &[Table]) -> Result<()> {
    let mut seen = BTreeSet::new();

    for table in tables {
        if !seen.insert((table.schema.as_str(), table.name.as_str())) {
            return Err(Error::InvalidSnapshot(format!(
                "duplicate table name: {}",
                table.qualified_name()
            )));
        }

        let mut columns = BTreeSet::new();
        for column in &table.columns {
            if !columns.insert(column.name.as_str()) {
                return Err(Error::InvalidSnapshot(format!(
                    "duplicate column name: {}.{}",
                    table.qualified_name(),
                    column.name
                )));
            }

            if column.foreign_key == column.foreign_key_column.column.is_empty() {
                return Err(Error::InvalidSnapshot(format!(
                    "foreign key flag of {}.{} disagrees with its referenced column",
                    table.qualified_name(),
                    column.name
                )));
            }
        }
    }

    Ok(())
}
