mod logging;
mod redaction;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use ddlstruct_core::{Error as CoreError, SchemaSource, Table};
use ddlstruct_generate::output::write_bytes_atomic;
use ddlstruct_generate::{
    GenerationEngine, GenerationError, GenerationReport, GeneratorConfig, RelationshipPolicy,
    write_report,
};
use ddlstruct_generate::config::ConfigError;
use ddlstruct_introspect::{IntrospectOptions, PostgresSource, SchemaSnapshot, SnapshotSource};
use logging::init_logging;
use redaction::redact_connection_string;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

#[derive(Debug, Error)]
enum CliError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("unsupported engine: {0}")]
    UnsupportedEngine(String),
    #[error("{0} table(s) failed")]
    TablesFailed(usize),
}

#[derive(Parser, Debug)]
#[command(name = "ddlstruct", version, about = "Generate Go structs from database schemas")]
struct Cli {
    /// Append JSON logs to this file.
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate or update Go structs.
    Generate(GenerateArgs),
    /// Write the schema of a live database to a JSON snapshot.
    Snapshot(SnapshotArgs),
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Database connection string.
    #[arg(long, value_name = "CONNECTION_STRING", required_unless_present = "snapshot")]
    conn: Option<String>,
    /// JSON snapshot to read instead of a live database.
    #[arg(long, value_name = "PATH", conflicts_with = "conn")]
    snapshot: Option<PathBuf>,
    /// Schema name(s) to load.
    #[arg(long, value_name = "SCHEMA", required = true)]
    schema: Vec<String>,
    /// Skip views.
    #[arg(long, default_value_t = false)]
    no_views: bool,
    /// Skip table and column comments.
    #[arg(long, default_value_t = false)]
    no_comments: bool,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Generator configuration (TOML).
    #[arg(long, value_name = "PATH")]
    config: PathBuf,
    #[command(flatten)]
    source: SourceArgs,
    /// Only generate these tables (`table` or `schema.table`).
    #[arg(long, value_name = "TABLE")]
    table: Vec<String>,
    /// Fail tables whose 1:1 reference target is not loaded.
    #[arg(long, default_value_t = false)]
    strict: bool,
    /// Write the run report as JSON.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Snapshot output path.
    #[arg(long, value_name = "PATH")]
    out: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    match cli.command {
        Command::Generate(args) => run_generate(args).await,
        Command::Snapshot(args) => run_snapshot(args).await,
    }
}

async fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let timer = Instant::now();
    let mut config = GeneratorConfig::load(&args.config)?;
    if args.strict {
        config.relationship_policy = RelationshipPolicy::Strict;
    }
    tracing::info!(
        event = "config_loaded",
        path = %args.config.display(),
        tables = config.tables.len()
    );

    let source = open_source(&args.source).await?;
    let tables = load_tables(source.as_ref(), &args.source.schema).await?;

    let selectors: Vec<TableSelector> = args.table.iter().map(|raw| TableSelector::parse(raw)).collect();
    let engine = GenerationEngine::new(config);
    let mut report = engine.run_selected(&tables, |table| {
        selectors.is_empty() || selectors.iter().any(|selector| selector.matches(table))
    })?;
    record_missing_tables(&mut report, &selectors, &tables, &args.source.schema);

    if let Some(path) = &args.report {
        write_report(&report, path)?;
        tracing::info!(event = "report_written", path = %path.display());
    }

    let failed = report
        .tables
        .iter()
        .filter(|table| table.error.is_some())
        .count();
    tracing::info!(
        event = "run_finished",
        run_id = %report.run_id,
        tables = report.tables.len(),
        failed,
        warnings = report.warnings.len(),
        duration_ms = timer.elapsed().as_millis() as u64
    );

    if report.has_failures() {
        return Err(CliError::TablesFailed(failed));
    }
    Ok(())
}

async fn run_snapshot(args: SnapshotArgs) -> Result<(), CliError> {
    let source = open_source(&args.source).await?;
    let tables = load_tables(source.as_ref(), &args.source.schema).await?;

    let snapshot = SchemaSnapshot::from_tables(source.engine(), &tables);
    write_bytes_atomic(&args.out, snapshot.to_json_pretty()?.as_bytes())?;
    tracing::info!(
        event = "snapshot_written",
        path = %args.out.display(),
        tables = tables.len()
    );
    Ok(())
}

async fn open_source(args: &SourceArgs) -> Result<Box<dyn SchemaSource>, CliError> {
    if let Some(path) = &args.snapshot {
        let source = SnapshotSource::load(path)?;
        tracing::info!(event = "snapshot_loaded", path = %path.display());
        return Ok(Box::new(source));
    }

    let conn = args.conn.as_deref().unwrap_or_default();
    let engine = detect_engine(conn)?;
    tracing::info!(
        event = "connecting",
        engine,
        connection = %redact_connection_string(conn)
    );

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(10))
        .connect(conn)
        .await?;
    let options = IntrospectOptions {
        include_views: !args.no_views,
        include_comments: !args.no_comments,
    };
    Ok(Box::new(PostgresSource::with_options(pool, options)))
}

/// Load every table of `schemas` before anything is rendered.
async fn load_tables(source: &dyn SchemaSource, schemas: &[String]) -> Result<Vec<Table>, CliError> {
    let mut tables = Vec::new();
    for schema in schemas {
        let loaded = source.get_tables(schema).await?;
        tracing::info!(event = "schema_loaded", schema = %schema, tables = loaded.len());
        tables.extend(loaded);
    }
    Ok(tables)
}

fn record_missing_tables(
    report: &mut GenerationReport,
    selectors: &[TableSelector],
    tables: &[Table],
    schemas: &[String],
) {
    for selector in selectors {
        if tables.iter().any(|table| selector.matches(table)) {
            continue;
        }
        let schema = selector
            .schema
            .clone()
            .or_else(|| schemas.first().cloned())
            .unwrap_or_default();
        let err = CoreError::not_found(&schema, &selector.table);
        tracing::warn!(event = "table_not_found", schema = %schema, table = %selector.table);
        report.record_missing(&schema, &selector.table, err.to_string());
    }
}

/// `--table` value: `table` matches in every schema, `schema.table` in one.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TableSelector {
    schema: Option<String>,
    table: String,
}

impl TableSelector {
    fn parse(raw: &str) -> Self {
        match raw.split_once('.') {
            Some((schema, table)) => Self {
                schema: Some(schema.to_string()),
                table: table.to_string(),
            },
            None => Self {
                schema: None,
                table: raw.to_string(),
            },
        }
    }

    fn matches(&self, table: &Table) -> bool {
        table.name == self.table
            && self
                .schema
                .as_deref()
                .is_none_or(|schema| schema == table.schema)
    }
}

fn detect_engine(conn: &str) -> Result<&'static str, CliError> {
    if conn.starts_with("postgres://") || conn.starts_with("postgresql://") {
        Ok("postgres")
    } else {
        Err(CliError::UnsupportedEngine(redact_connection_string(conn)))
    }
}
