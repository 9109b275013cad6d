//! Column to Go field type mapping.

use tracing::warn;

use ddlstruct_core::{Column, DataType, Table};

use crate::config::{RelationshipPolicy, ResolvedTableConfig};
use crate::context::GenerationContext;
use crate::errors::GenerationError;
use crate::model::GenerationIssue;

/// Import required by the nullable wrapper types.
pub const SQL_PACKAGE: &str = "database/sql";
/// Import required by `time.Time`.
pub const TIME_PACKAGE: &str = "time";
/// Open type used for unmapped columns and the metadata field.
pub const ANY_TYPE: &str = "any";

/// Go type of a generated field and the import it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    pub name: String,
    pub dependency: Option<&'static str>,
}

impl FieldType {
    fn plain(name: &str) -> Self {
        Self {
            name: name.to_string(),
            dependency: None,
        }
    }

    fn with_dependency(name: &str, dependency: &'static str) -> Self {
        Self {
            name: name.to_string(),
            dependency: Some(dependency),
        }
    }

    /// Pointer to another generated struct.
    pub fn reference(type_name: &str) -> Self {
        Self {
            name: format!("*{type_name}"),
            dependency: None,
        }
    }
}

/// Type for a column that is not rendered as a relationship.
pub fn scalar_type(data_type: DataType, can_be_null: bool) -> FieldType {
    match (data_type, can_be_null) {
        (DataType::String, true) => FieldType::with_dependency("sql.NullString", SQL_PACKAGE),
        (DataType::Integer, true) => FieldType::with_dependency("sql.NullInt64", SQL_PACKAGE),
        (DataType::Double, true) => FieldType::with_dependency("sql.NullFloat64", SQL_PACKAGE),
        (DataType::Date, true) => FieldType::with_dependency("sql.NullTime", SQL_PACKAGE),
        (DataType::String, false) => FieldType::plain("string"),
        (DataType::Integer, false) => FieldType::plain("int"),
        (DataType::Double, false) => FieldType::plain("float64"),
        (DataType::Date, false) => FieldType::with_dependency("time.Time", TIME_PACKAGE),
        (DataType::Geo | DataType::Unknown, _) => FieldType::plain(ANY_TYPE),
    }
}

/// Resolve the Go type of `column` within `table`.
///
/// Foreign keys opted into 1:1 inclusion become a pointer to the referenced
/// struct. A missing target is recorded in `issues` and falls back to the
/// scalar mapping, unless the strict policy is configured.
pub fn map_field(
    ctx: &GenerationContext<'_>,
    table: &Table,
    column: &Column,
    table_config: &ResolvedTableConfig,
    issues: &mut Vec<GenerationIssue>,
) -> Result<FieldType, GenerationError> {
    if let Some(reference) = one_to_one(ctx, table, column, table_config, issues)? {
        return Ok(reference);
    }
    Ok(scalar_type(column.data_type, column.can_be_null))
}

fn one_to_one(
    ctx: &GenerationContext<'_>,
    table: &Table,
    column: &Column,
    table_config: &ResolvedTableConfig,
    issues: &mut Vec<GenerationIssue>,
) -> Result<Option<FieldType>, GenerationError> {
    if !column.foreign_key || !table_config.include_referenced.includes(&column.name) {
        return Ok(None);
    }

    let target = &column.foreign_key_column;
    if let Some(referenced) = ctx.find_table(&target.schema, &target.name) {
        return Ok(Some(FieldType::reference(&ctx.type_name(referenced))));
    }

    let target_name = format!("{}.{}", target.schema, target.name);
    match ctx.config().relationship_policy {
        RelationshipPolicy::Strict => Err(GenerationError::MissingRelationshipTarget {
            table: table.qualified_name(),
            column: column.name.clone(),
            target: target_name,
        }),
        RelationshipPolicy::Lenient => {
            warn!(
                event = "missing_relationship_target",
                table = %table.qualified_name(),
                column = %column.name,
                target = %target_name,
                "found no loaded table for foreign key reference"
            );
            issues.push(GenerationIssue::missing_relationship_target(
                table,
                &column.name,
                &target_name,
            ));
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeneratorConfig, TableConfig};

    fn tables() -> Vec<Table> {
        let mut details = Table::new("here_is_me", "my_table_name");
        details.columns = vec![
            Column::new("id", DataType::Integer),
            Column::new("user_id", DataType::Integer).with_reference(
                "here_is_me",
                "user_reference",
                "id",
            ),
        ];
        let mut users = Table::new("here_is_me", "user_reference");
        users.columns = vec![Column::new("id", DataType::Integer)];
        vec![details, users]
    }

    fn config(include_referenced: &[&str]) -> GeneratorConfig {
        let mut config = GeneratorConfig {
            namespace: "olaf".to_string(),
            suffix: "Tab".to_string(),
            ..GeneratorConfig::default()
        };
        config.tables.insert(
            "my_table_name".to_string(),
            TableConfig {
                include_referenced: include_referenced.iter().map(|s| s.to_string()).collect(),
                ..TableConfig::default()
            },
        );
        config
    }

    fn map(config: &GeneratorConfig, tables: &[Table]) -> Result<FieldType, GenerationError> {
        let ctx = GenerationContext::new(config, tables);
        let table = &tables[0];
        let mut issues = Vec::new();
        map_field(&ctx, table, &table.columns[1], &ctx.table_config(table), &mut issues)
    }

    #[test]
    fn nullable_wrappers_only_for_nullable_columns() {
        for data_type in [
            DataType::String,
            DataType::Integer,
            DataType::Double,
            DataType::Date,
            DataType::Geo,
            DataType::Unknown,
        ] {
            let mapped = scalar_type(data_type, false);
            assert!(!mapped.name.starts_with("sql.Null"), "{data_type:?} -> {}", mapped.name);
            assert_ne!(mapped.dependency, Some(SQL_PACKAGE));
        }
        assert_eq!(scalar_type(DataType::String, true).name, "sql.NullString");
        assert_eq!(scalar_type(DataType::Integer, true).name, "sql.NullInt64");
        assert_eq!(scalar_type(DataType::Double, true).name, "sql.NullFloat64");
        assert_eq!(scalar_type(DataType::Date, true).name, "sql.NullTime");
        assert_eq!(scalar_type(DataType::Geo, true).name, ANY_TYPE);
    }

    #[test]
    fn wildcard_inclusion_references_target_struct() {
        let tables = tables();
        let mapped = map(&config(&["*"]), &tables).expect("mapped");
        assert_eq!(mapped, FieldType::reference("UserReferenceTab"));
        assert_eq!(mapped.name, "*UserReferenceTab");
    }

    #[test]
    fn named_inclusion_matches_field_name() {
        let tables = tables();
        let mapped = map(&config(&["UserId"]), &tables).expect("mapped");
        assert_eq!(mapped.name, "*UserReferenceTab");
    }

    #[test]
    fn non_matching_inclusion_keeps_scalar() {
        let tables = tables();
        assert_eq!(map(&config(&["some_random"]), &tables).expect("mapped").name, "int");
        assert_eq!(map(&config(&[]), &tables).expect("mapped").name, "int");
    }

    #[test]
    fn missing_target_falls_back_or_fails_by_policy() {
        let mut tables = tables();
        tables.truncate(1);

        let mut config = config(&["*"]);
        let ctx = GenerationContext::new(&config, &tables);
        let table = &tables[0];
        let mut issues = Vec::new();
        let mapped = map_field(&ctx, table, &table.columns[1], &ctx.table_config(table), &mut issues)
            .expect("lenient fallback");
        assert_eq!(mapped.name, "int");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "missing_relationship_target");

        config.relationship_policy = RelationshipPolicy::Strict;
        let err = map(&config, &tables).unwrap_err();
        assert!(matches!(err, GenerationError::MissingRelationshipTarget { .. }));
    }
}
