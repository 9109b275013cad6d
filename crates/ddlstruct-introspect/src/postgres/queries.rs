use sqlx::{PgPool, Row};

use ddlstruct_core::{Error, Result};

fn db_error(err: sqlx::Error) -> Error {
    Error::Introspection(err.to_string())
}

pub async fn list_tables(pool: &PgPool, schema: &str, include_views: bool) -> Result<Vec<String>> {
    let rows = sqlx::query(
        r#"
        select table_name::text as name
        from information_schema.tables
        where table_schema = $1
          and (table_type = 'BASE TABLE' or ($2 and table_type = 'VIEW'))
        order by table_name
        "#,
    )
    .bind(schema)
    .bind(include_views)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    rows.iter()
        .map(|row| row.try_get::<String, _>("name").map_err(db_error))
        .collect()
}

pub struct RawColumn {
    pub name: String,
    pub data_type: String,
    pub udt_name: String,
    pub is_nullable: bool,
    pub default: Option<String>,
    pub identity_generation: Option<String>,
    pub character_max_length: Option<i32>,
    pub numeric_precision: Option<i32>,
    pub numeric_scale: Option<i32>,
    pub comment: Option<String>,
}

pub async fn list_columns(pool: &PgPool, schema: &str, table: &str) -> Result<Vec<RawColumn>> {
    let rows = sqlx::query(
        r#"
        select
          c.column_name::text as name,
          c.data_type::text as data_type,
          c.udt_name::text as udt_name,
          (c.is_nullable = 'YES') as is_nullable,
          c.column_default::text as column_default,
          case when c.is_identity = 'YES' then c.identity_generation::text end as identity_generation,
          c.character_maximum_length::int4 as character_max_length,
          c.numeric_precision::int4 as numeric_precision,
          c.numeric_scale::int4 as numeric_scale,
          pg_catalog.col_description(
            format('%I.%I', c.table_schema, c.table_name)::regclass::oid,
            c.ordinal_position::int
          ) as comment
        from information_schema.columns c
        where c.table_schema = $1
          and c.table_name = $2
        order by c.ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    rows.iter()
        .map(|row| {
            Ok(RawColumn {
                name: row.try_get("name").map_err(db_error)?,
                data_type: row.try_get("data_type").map_err(db_error)?,
                udt_name: row.try_get("udt_name").map_err(db_error)?,
                is_nullable: row.try_get("is_nullable").map_err(db_error)?,
                default: row.try_get("column_default").map_err(db_error)?,
                identity_generation: row.try_get("identity_generation").map_err(db_error)?,
                character_max_length: row.try_get("character_max_length").map_err(db_error)?,
                numeric_precision: row.try_get("numeric_precision").map_err(db_error)?,
                numeric_scale: row.try_get("numeric_scale").map_err(db_error)?,
                comment: row.try_get("comment").map_err(db_error)?,
            })
        })
        .collect()
}

pub async fn primary_key_columns(pool: &PgPool, schema: &str, table: &str) -> Result<Vec<String>> {
    let rows = sqlx::query(
        r#"
        select kcu.column_name::text as name
        from information_schema.table_constraints tc
        join information_schema.key_column_usage kcu
          on kcu.constraint_name = tc.constraint_name
         and kcu.table_schema = tc.table_schema
         and kcu.table_name = tc.table_name
        where tc.constraint_type = 'PRIMARY KEY'
          and tc.table_schema = $1
          and tc.table_name = $2
        order by kcu.ordinal_position
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    rows.iter()
        .map(|row| row.try_get::<String, _>("name").map_err(db_error))
        .collect()
}

pub struct RawForeignKey {
    pub column: String,
    pub referenced_schema: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

pub async fn list_foreign_keys(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<RawForeignKey>> {
    let rows = sqlx::query(
        r#"
        select
          a.attname::text as column_name,
          rn.nspname::text as referenced_schema,
          rc.relname::text as referenced_table,
          ra.attname::text as referenced_column
        from pg_constraint con
        join pg_class c on c.oid = con.conrelid
        join pg_namespace n on n.oid = c.relnamespace
        join pg_class rc on rc.oid = con.confrelid
        join pg_namespace rn on rn.oid = rc.relnamespace
        join lateral unnest(con.conkey, con.confkey) as k(attnum, refnum) on true
        join pg_attribute a on a.attrelid = con.conrelid and a.attnum = k.attnum
        join pg_attribute ra on ra.attrelid = con.confrelid and ra.attnum = k.refnum
        where con.contype = 'f'
          and n.nspname = $1
          and c.relname = $2
        order by con.conname, a.attnum
        "#,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(db_error)?;

    rows.iter()
        .map(|row| {
            Ok(RawForeignKey {
                column: row.try_get("column_name").map_err(db_error)?,
                referenced_schema: row.try_get("referenced_schema").map_err(db_error)?,
                referenced_table: row.try_get("referenced_table").map_err(db_error)?,
                referenced_column: row.try_get("referenced_column").map_err(db_error)?,
            })
        })
        .collect()
}
