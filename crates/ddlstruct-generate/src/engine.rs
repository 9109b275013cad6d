use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use ddlstruct_core::{Table, validate_tables};

use crate::config::GeneratorConfig;
use crate::context::GenerationContext;
use crate::errors::GenerationError;
use crate::merge::{MergeOutcome, merge};
use crate::model::{GenerationIssue, GenerationReport, TableOutcome, TableReport};
use crate::output::{read_existing, run_formatter, write_bytes_atomic};
use crate::render::render_block;

/// Entry point for generating Go structs from a loaded table set.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    config: GeneratorConfig,
}

/// Tables sharing one output file.
struct FileGroup<'a> {
    path: PathBuf,
    tables: Vec<&'a Table>,
}

/// In-memory result of merging every table of a group.
struct MergedGroup {
    original: String,
    text: String,
    outcomes: Vec<TableOutcome>,
    issues: Vec<GenerationIssue>,
}

impl GenerationEngine {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate every table of `tables`.
    pub fn run(&self, tables: &[Table]) -> Result<GenerationReport, GenerationError> {
        self.run_selected(tables, |_| true)
    }

    /// Generate the tables accepted by `select`.
    ///
    /// The full `tables` set is still used to resolve relationships. Failures
    /// are reported per table; only an invalid configuration or table set
    /// aborts the run.
    pub fn run_selected<F>(
        &self,
        tables: &[Table],
        select: F,
    ) -> Result<GenerationReport, GenerationError>
    where
        F: Fn(&Table) -> bool,
    {
        let start = Instant::now();
        self.config.validate()?;
        validate_tables(tables)?;

        let ctx = GenerationContext::new(&self.config, tables);
        let groups = group_by_path(&ctx, tables.iter().filter(|table| select(*table)));
        let mut report = GenerationReport::new(uuid::Uuid::new_v4().to_string());

        info!(
            run_id = %report.run_id,
            tables = tables.len(),
            files = groups.len(),
            "generation started"
        );

        for group in &groups {
            self.write_group(&ctx, group, &mut report);
        }

        info!(
            run_id = %report.run_id,
            created = report.count(TableOutcome::Created),
            patched = report.count(TableOutcome::Patched),
            appended = report.count(TableOutcome::Appended),
            unchanged = report.count(TableOutcome::Unchanged),
            failed = report.count(TableOutcome::Failed),
            duration_ms = start.elapsed().as_millis() as u64,
            "generation completed"
        );

        Ok(report)
    }

    fn write_group(
        &self,
        ctx: &GenerationContext<'_>,
        group: &FileGroup<'_>,
        report: &mut GenerationReport,
    ) {
        let merged = merge_group(ctx, group).and_then(|merged| {
            if merged.text != merged.original {
                write_bytes_atomic(&group.path, merged.text.as_bytes())?;
            }
            Ok(merged)
        });

        let merged = match merged {
            Ok(merged) => merged,
            Err(err) => {
                warn!(
                    path = %group.path.display(),
                    tables = group.tables.len(),
                    error = %err,
                    "file left untouched"
                );
                for table in &group.tables {
                    report.tables.push(TableReport {
                        schema: table.schema.clone(),
                        table: table.name.clone(),
                        path: Some(group.path.clone()),
                        outcome: TableOutcome::Failed,
                        error: Some(err.to_string()),
                    });
                }
                return;
            }
        };

        for issue in merged.issues {
            report.record_warning(issue);
        }
        for (table, outcome) in group.tables.iter().zip(&merged.outcomes) {
            info!(
                schema = %table.schema,
                table = %table.name,
                path = %group.path.display(),
                outcome = ?outcome,
                "table generated"
            );
            report.tables.push(TableReport {
                schema: table.schema.clone(),
                table: table.name.clone(),
                path: Some(group.path.clone()),
                outcome: *outcome,
                error: None,
            });
        }

        if merged.text == merged.original {
            return;
        }
        if let Some(argv) = &self.config.formatter {
            if let Err(err) = run_formatter(argv, &group.path) {
                warn!(path = %group.path.display(), error = %err, "formatter failed");
                if let Some(table) = group.tables.first() {
                    report.record_warning(GenerationIssue::formatter_failed(
                        table,
                        err.to_string(),
                    ));
                }
            }
        }
    }
}

/// Write `report` as pretty JSON.
pub fn write_report(report: &GenerationReport, path: &Path) -> Result<(), GenerationError> {
    let data = serde_json::to_vec_pretty(report)?;
    write_bytes_atomic(path, &data)?;
    Ok(())
}

fn group_by_path<'a>(
    ctx: &GenerationContext<'_>,
    tables: impl Iterator<Item = &'a Table>,
) -> Vec<FileGroup<'a>> {
    let mut groups: Vec<FileGroup<'a>> = Vec::new();
    let mut index: HashMap<PathBuf, usize> = HashMap::new();

    for table in tables {
        let path = ctx.table_config(table).path;
        match index.get(&path) {
            Some(&position) => groups[position].tables.push(table),
            None => {
                index.insert(path.clone(), groups.len());
                groups.push(FileGroup {
                    path,
                    tables: vec![table],
                });
            }
        }
    }

    groups
}

fn merge_group(
    ctx: &GenerationContext<'_>,
    group: &FileGroup<'_>,
) -> Result<MergedGroup, GenerationError> {
    let original = read_existing(&group.path)?;
    let mut text = original.clone();
    let mut outcomes = Vec::with_capacity(group.tables.len());
    let mut issues = Vec::new();
    let mut type_owners: HashMap<String, String> = HashMap::new();

    for table in &group.tables {
        let block = render_block(ctx, table)?;
        if let Some(first) =
            type_owners.insert(block.type_name.clone(), table.qualified_name())
        {
            return Err(GenerationError::DuplicateType {
                type_name: block.type_name,
                first,
                second: table.qualified_name(),
            });
        }
        let namespace = ctx.table_config(table).namespace;
        let merged = merge(&text, &namespace, &block)?;
        let outcome = if merged.text == text {
            TableOutcome::Unchanged
        } else {
            match merged.outcome {
                MergeOutcome::Created => TableOutcome::Created,
                MergeOutcome::Patched => TableOutcome::Patched,
                MergeOutcome::Appended => TableOutcome::Appended,
            }
        };
        debug!(table = %table.qualified_name(), outcome = ?outcome, "merged table block");

        text = merged.text;
        outcomes.push(outcome);
        issues.extend(block.issues);
    }

    Ok(MergedGroup {
        original,
        text,
        outcomes,
        issues,
    })
}
