use std::sync::Arc;

use ddlstruct_core::{Column, DataType, ForeignColumn, PostgresColumn};
use tracing::warn;

use crate::options::IntrospectOptions;

use super::queries::{RawColumn, RawForeignKey};

/// Map a PostgreSQL type (udt name or formatted type) onto a [`DataType`].
pub fn data_type_for(internal_type: &str) -> DataType {
    let lowered = internal_type.to_lowercase();
    let base = lowered.split('(').next().unwrap_or_default().trim();

    match base {
        "varchar" | "character varying" | "text" | "char" | "character" | "bpchar" | "citext"
        | "name" | "uuid" => DataType::String,
        "int2" | "int4" | "int8" | "smallint" | "integer" | "bigint" | "serial" | "bigserial"
        | "smallserial" => DataType::Integer,
        "numeric" | "decimal" | "float4" | "float8" | "real" | "double precision" | "money" => {
            DataType::Double
        }
        "date" | "timestamp" | "timestamptz" | "timestamp without time zone"
        | "timestamp with time zone" => DataType::Date,
        "point" | "geometry" | "geography" => DataType::Geo,
        _ => {
            warn!(
                event = "unknown_vendor_type",
                engine = "postgres",
                internal_type = %internal_type,
                "received unknown data type for column"
            );
            DataType::Unknown
        }
    }
}

pub fn map_columns(
    raw: Vec<RawColumn>,
    primary_keys: &[String],
    foreign_keys: &[RawForeignKey],
    opts: &IntrospectOptions,
) -> Vec<Column> {
    raw.into_iter()
        .map(|col| {
            let foreign_key_column = foreign_keys
                .iter()
                .find(|fk| fk.column == col.name)
                .map(|fk| ForeignColumn {
                    name: fk.referenced_table.clone(),
                    schema: fk.referenced_schema.clone(),
                    column: fk.referenced_column.clone(),
                })
                .unwrap_or_default();
            let sequence_default = col
                .default
                .as_deref()
                .is_some_and(|value| value.starts_with("nextval("));
            let extras = PostgresColumn {
                identity: col.identity_generation,
                sequence_default,
                udt_name: col.udt_name.clone(),
                character_max_length: col.character_max_length,
                numeric_precision: col.numeric_precision,
                numeric_scale: col.numeric_scale,
            };

            Column {
                data_type: data_type_for(&col.udt_name),
                internal_type: col.data_type,
                primary_key: primary_keys.iter().any(|pk| pk == &col.name),
                foreign_key: !foreign_key_column.column.is_empty(),
                foreign_key_column,
                can_be_null: col.is_nullable,
                default_value: col.default,
                comment: if opts.include_comments {
                    col.comment.filter(|comment| !comment.is_empty())
                } else {
                    None
                },
                extras: Some(Arc::new(extras)),
                name: col.name,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, udt_name: &str) -> RawColumn {
        RawColumn {
            name: name.to_string(),
            data_type: udt_name.to_string(),
            udt_name: udt_name.to_string(),
            is_nullable: false,
            default: None,
            identity_generation: None,
            character_max_length: None,
            numeric_precision: None,
            numeric_scale: None,
            comment: None,
        }
    }

    #[test]
    fn maps_common_types() {
        assert_eq!(data_type_for("varchar"), DataType::String);
        assert_eq!(data_type_for("int8"), DataType::Integer);
        assert_eq!(data_type_for("numeric(10,2)"), DataType::Double);
        assert_eq!(data_type_for("timestamptz"), DataType::Date);
        assert_eq!(data_type_for("point"), DataType::Geo);
        assert_eq!(data_type_for("jsonb"), DataType::Unknown);
    }

    #[test]
    fn maps_keys_and_serial_defaults() {
        let mut id = raw("id", "int4");
        id.default = Some("nextval('orders_id_seq'::regclass)".to_string());
        let user_id = raw("user_id", "int4");
        let fks = vec![RawForeignKey {
            column: "user_id".to_string(),
            referenced_schema: "app".to_string(),
            referenced_table: "users".to_string(),
            referenced_column: "id".to_string(),
        }];

        let columns = map_columns(
            vec![id, user_id],
            &["id".to_string()],
            &fks,
            &IntrospectOptions::default(),
        );

        assert!(columns[0].primary_key);
        assert!(ddlstruct_core::auto_increment(&columns[0]));
        assert!(!columns[0].foreign_key);
        assert!(columns[1].references("app", "users"));
        assert_eq!(columns[1].foreign_key_column.column, "id");
    }
}
