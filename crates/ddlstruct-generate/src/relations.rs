//! Incoming (1:n) relationship discovery.

use ddlstruct_core::Table;

use crate::config::ResolvedTableConfig;
use crate::context::GenerationContext;
use crate::naming;
use crate::tags::ColumnTag;

/// Collection field pointing from a referenced table back at a referencing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationField {
    /// Field name, derived from the referencing table.
    pub field_name: String,
    /// Generated type name of the referencing table.
    pub type_name: String,
    /// `schema.table.column` of the referencing foreign key, schema optional.
    /// The 1:n constant key is scoped to this referencing column, not to the owning table.
    pub reference: String,
}

impl RelationField {
    pub fn go_type(&self) -> String {
        format!("[]*{}", self.type_name)
    }

    pub fn tag(&self) -> ColumnTag {
        ColumnTag::pointed(self.reference.clone())
    }
}

/// Every foreign key in the loaded set pointing at `target`.
///
/// Empty unless `include_pointed` is enabled for `target`. Fields come in
/// table-then-column scan order, one per matching column, so a table
/// referencing `target` twice yields two fields with the same name.
pub fn incoming_references(
    ctx: &GenerationContext<'_>,
    target: &Table,
    target_config: &ResolvedTableConfig,
) -> Vec<RelationField> {
    if !target_config.include_pointed {
        return Vec::new();
    }

    let mut fields = Vec::new();
    for table in ctx.tables() {
        for column in &table.columns {
            if !column.references(&target.schema, &target.name) {
                continue;
            }
            fields.push(RelationField {
                field_name: naming::field_name(&table.name),
                type_name: ctx.type_name(table),
                reference: qualified(&table.schema, &table.name, &column.name),
            });
        }
    }
    fields
}

/// `schema.table.column`, dropping the schema when it is empty.
pub fn qualified(schema: &str, table: &str, column: &str) -> String {
    if schema.is_empty() {
        format!("{table}.{column}")
    } else {
        format!("{schema}.{table}.{column}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GeneratorConfig, TableConfig};
    use ddlstruct_core::{Column, DataType};

    fn workout_tables() -> Vec<Table> {
        let mut details = Table::new("here_is_me", "workout_details");
        details.columns = vec![
            Column::new("id", DataType::Integer),
            Column::new("workout_id", DataType::Integer).with_reference(
                "here_is_me",
                "workout",
                "id",
            ),
        ];
        let mut sets = Table::new("here_is_me", "workout_sets");
        sets.columns = vec![
            Column::new("first_workout", DataType::Integer).with_reference(
                "here_is_me",
                "workout",
                "id",
            ),
            Column::new("second_workout", DataType::Integer).with_reference(
                "here_is_me",
                "workout",
                "id",
            ),
        ];
        let mut workout = Table::new("here_is_me", "workout");
        workout.columns = vec![Column::new("id", DataType::Integer)];
        vec![details, sets, workout]
    }

    fn config(include_pointed: bool) -> GeneratorConfig {
        let mut config = GeneratorConfig {
            suffix: "Tab".to_string(),
            ..GeneratorConfig::default()
        };
        config.tables.insert(
            "workout".to_string(),
            TableConfig {
                include_pointed,
                ..TableConfig::default()
            },
        );
        config
    }

    #[test]
    fn emits_one_field_per_matching_column_in_scan_order() {
        let tables = workout_tables();
        let config = config(true);
        let ctx = GenerationContext::new(&config, &tables);
        let target = &tables[2];

        let fields = incoming_references(&ctx, target, &ctx.table_config(target));
        let references: Vec<_> = fields.iter().map(|f| f.reference.as_str()).collect();
        assert_eq!(
            references,
            vec![
                "here_is_me.workout_details.workout_id",
                "here_is_me.workout_sets.first_workout",
                "here_is_me.workout_sets.second_workout",
            ]
        );
        assert_eq!(fields[0].field_name, "WorkoutDetails");
        assert_eq!(fields[0].go_type(), "[]*WorkoutDetailsTab");
        assert_eq!(
            fields[0].tag().to_string(),
            "PointedForeignKey:here_is_me.workout_details.workout_id"
        );
    }

    #[test]
    fn disabled_inclusion_yields_nothing() {
        let tables = workout_tables();
        let config = config(false);
        let ctx = GenerationContext::new(&config, &tables);
        let target = &tables[2];

        assert!(incoming_references(&ctx, target, &ctx.table_config(target)).is_empty());
    }

    #[test]
    fn schema_must_match() {
        let mut tables = workout_tables();
        tables[2].schema = "elsewhere".to_string();
        let config = config(true);
        let ctx = GenerationContext::new(&config, &tables);
        let target = &tables[2];

        assert!(incoming_references(&ctx, target, &ctx.table_config(target)).is_empty());
    }
}
