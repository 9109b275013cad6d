use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use ddlstruct_core::{Error, Result, SchemaSource, Table};

use crate::options::IntrospectOptions;

mod mapper;
mod queries;

pub use mapper::data_type_for;

/// Schema source backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PostgresSource {
    pool: PgPool,
    options: IntrospectOptions,
}

impl PostgresSource {
    /// Create a new source using a pre-configured pool.
    pub fn new(pool: PgPool) -> Self {
        Self::with_options(pool, IntrospectOptions::default())
    }

    pub fn with_options(pool: PgPool, options: IntrospectOptions) -> Self {
        Self { pool, options }
    }
}

#[async_trait]
impl SchemaSource for PostgresSource {
    fn engine(&self) -> &str {
        "postgres"
    }

    async fn get_table(&self, schema: &str, name: &str) -> Result<Table> {
        introspect_table(&self.pool, schema, name, &self.options).await
    }

    async fn get_tables(&self, schema: &str) -> Result<Vec<Table>> {
        let names = queries::list_tables(&self.pool, schema, self.options.include_views).await?;

        let mut tables = Vec::with_capacity(names.len());
        for name in names {
            let table = introspect_table(&self.pool, schema, &name, &self.options)
                .await
                .map_err(|err| {
                    Error::Introspection(format!("failed to get data for {schema}.{name}: {err}"))
                })?;
            tables.push(table);
        }
        Ok(tables)
    }
}

/// Introspect one table according to the provided options.
pub async fn introspect_table(
    pool: &PgPool,
    schema: &str,
    name: &str,
    opts: &IntrospectOptions,
) -> Result<Table> {
    let raw_columns = queries::list_columns(pool, schema, name).await?;
    if raw_columns.is_empty() {
        return Err(Error::not_found(schema, name));
    }

    let primary_keys = queries::primary_key_columns(pool, schema, name).await?;
    let foreign_keys = queries::list_foreign_keys(pool, schema, name).await?;

    debug!(
        schema = %schema,
        table = %name,
        columns = raw_columns.len(),
        foreign_keys = foreign_keys.len(),
        "table introspected"
    );

    Ok(Table {
        name: name.to_string(),
        schema: schema.to_string(),
        columns: mapper::map_columns(raw_columns, &primary_keys, &foreign_keys, opts),
    })
}
