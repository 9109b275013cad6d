//! Go source rendering of a single table.

use std::collections::{BTreeSet, HashSet};
use std::fmt::Write as _;

use tracing::warn;

use ddlstruct_core::Table;

use crate::context::GenerationContext;
use crate::errors::GenerationError;
use crate::mapper::{ANY_TYPE, map_field};
use crate::model::GenerationIssue;
use crate::naming;
use crate::relations::{incoming_references, qualified};
use crate::tags::{COLUMN_TAG_ID, ColumnTag, METADATA_FIELD_NAME, METADATA_TAG_ID, MetadataTag};

/// Generated text of one table plus the imports it needs.
#[derive(Debug, Clone)]
pub struct RenderedBlock {
    pub type_name: String,
    /// `type X struct { ... }` ending with the closing brace line.
    pub declaration: String,
    /// Commented `const ( ... )` block ending with the closing paren line.
    pub constants: String,
    pub dependencies: BTreeSet<String>,
    /// Non-fatal problems found while rendering.
    pub issues: Vec<GenerationIssue>,
}

impl RenderedBlock {
    /// Declaration immediately followed by its constants.
    pub fn text(&self) -> String {
        format!("{}{}", self.declaration, self.constants)
    }
}

struct Field {
    name: String,
    constant_key: String,
}

pub fn render_block(
    ctx: &GenerationContext<'_>,
    table: &Table,
) -> Result<RenderedBlock, GenerationError> {
    let table_config = ctx.table_config(table);
    let type_name = ctx.type_name(table);
    let mut dependencies = BTreeSet::new();
    let mut issues = Vec::new();
    let mut fields = Vec::with_capacity(table.columns.len());

    let mut declaration = format!("type {type_name} struct {{\n");
    for column in &table.columns {
        let field_type = map_field(ctx, table, column, &table_config, &mut issues)?;
        if let Some(dependency) = field_type.dependency {
            dependencies.insert(dependency.to_string());
        }

        let name = naming::field_name(&column.name);
        for line in column.comment_lines() {
            push_line(&mut declaration, &format!("// {line}"));
        }
        push_line(
            &mut declaration,
            &format!(
                "{name} {} `json:\"{}\" {COLUMN_TAG_ID}:\"{}\"`",
                field_type.name,
                naming::json_name(&column.name),
                ColumnTag::from_column(column),
            ),
        );
        fields.push(Field {
            constant_key: format!(
                "{name}|{}",
                qualified(&table.schema, &table.name, &column.name)
            ),
            name,
        });
    }

    for relation in incoming_references(ctx, table, &table_config) {
        push_line(
            &mut declaration,
            &format!(
                "{} {} `{COLUMN_TAG_ID}:\"{}\"`",
                relation.field_name,
                relation.go_type(),
                relation.tag(),
            ),
        );
        fields.push(Field {
            constant_key: format!("{}|#{}", relation.field_name, relation.reference),
            name: relation.field_name,
        });
    }

    push_line(
        &mut declaration,
        &format!(
            "{METADATA_FIELD_NAME} {ANY_TYPE} `json:\"-\" {METADATA_TAG_ID}:\"{}\"`",
            MetadataTag::new(&table.schema, &table.name),
        ),
    );
    declaration.push_str("}\n");

    let mut seen = HashSet::new();
    let mut constants = format!("// {type_name}\nconst (\n");
    for field in &fields {
        if !seen.insert(field.name.as_str()) {
            warn!(
                event = "duplicate_field",
                table = %table.qualified_name(),
                field = %field.name,
                "generated struct contains a duplicate field"
            );
            issues.push(GenerationIssue::duplicate_field(table, &field.name));
        }
        push_line(
            &mut constants,
            &format!(
                "{type_name}_{} string = \"{}\"",
                field.name, field.constant_key
            ),
        );
    }
    constants.push_str(")\n");

    Ok(RenderedBlock {
        type_name,
        declaration,
        constants,
        dependencies,
        issues,
    })
}

fn push_line(buffer: &mut String, line: &str) {
    let _ = writeln!(buffer, "\t{line}");
}
