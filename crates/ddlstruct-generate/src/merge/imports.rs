//! Import clause detection and rewriting.
//!
//! Only the leading lines of a file are scanned. Files are handled as a line
//! vector produced by `split('\n')`, so joining with `'\n'` restores the
//! original text exactly.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use super::MergeError;

/// Number of leading lines searched for an existing import clause.
pub const IMPORT_LOOKAHEAD: usize = 6;

/// Import entries keyed by path. Values are the entry as written, alias
/// included (`sq "github.com/Masterminds/squirrel"`, `_ "github.com/lib/pq"`).
pub type ImportEntries = BTreeMap<String, String>;

/// Entries for plain imports of `dependencies`.
pub fn plain_entries(dependencies: &BTreeSet<String>) -> ImportEntries {
    dependencies
        .iter()
        .map(|path| (path.clone(), format!("\"{path}\"")))
        .collect()
}

/// Render an import clause sorted by path, one line per entry.
pub fn render_imports(entries: &ImportEntries) -> Vec<String> {
    match entries.len() {
        0 => Vec::new(),
        1 => entries
            .values()
            .map(|entry| format!("import {entry}"))
            .collect(),
        _ => {
            let mut lines = Vec::with_capacity(entries.len() + 2);
            lines.push("import (".to_string());
            lines.extend(entries.values().map(|entry| format!("\t{entry}")));
            lines.push(")".to_string());
            lines
        }
    }
}

/// Existing import clause: the line range it spans and its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportClause {
    pub lines: Range<usize>,
    pub entries: ImportEntries,
}

/// Locate the import clause within the lookahead window.
pub fn find_imports(lines: &[String]) -> Result<Option<ImportClause>, MergeError> {
    let window = lines.len().min(IMPORT_LOOKAHEAD);
    let Some(start) = (0..window).find(|&index| is_import_line(&lines[index])) else {
        return Ok(None);
    };

    let rest = lines[start].trim()["import".len()..].trim();
    if rest == "(" {
        return parse_bracketed(lines, start).map(Some);
    }

    let specs: Vec<&str> = match rest.strip_prefix('(').and_then(|inner| inner.strip_suffix(')')) {
        Some(inner) => inner.split(';').filter(|spec| !spec.trim().is_empty()).collect(),
        None => vec![rest],
    };
    let mut entries = ImportEntries::new();
    for spec in specs {
        let (path, entry) = parse_spec(spec).ok_or_else(|| malformed(start, &lines[start]))?;
        entries.insert(path, entry);
    }
    if entries.is_empty() {
        return Err(malformed(start, &lines[start]));
    }
    Ok(Some(ImportClause {
        lines: start..start + 1,
        entries,
    }))
}

fn parse_bracketed(lines: &[String], start: usize) -> Result<ImportClause, MergeError> {
    let mut entries = ImportEntries::new();
    for (index, line) in lines.iter().enumerate().skip(start + 1) {
        let trimmed = line.trim();
        if trimmed == ")" {
            return Ok(ImportClause {
                lines: start..index + 1,
                entries,
            });
        }
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        let (path, entry) = parse_spec(trimmed).ok_or_else(|| malformed(index, line))?;
        entries.insert(path, entry);
    }
    Err(MergeError::UnterminatedImport { line: start + 1 })
}

/// Split `[alias] "path"` into the path and the normalized entry text.
///
/// Anything after the closing quote (a trailing comment) is dropped.
fn parse_spec(spec: &str) -> Option<(String, String)> {
    let spec = spec.trim();
    let open = spec.find('"')?;
    let close = open + 1 + spec[open + 1..].find('"')?;
    let path = &spec[open + 1..close];
    let alias = spec[..open].trim();

    if alias.split_whitespace().count() > 1 {
        return None;
    }
    let entry = if alias.is_empty() {
        format!("\"{path}\"")
    } else {
        format!("{alias} \"{path}\"")
    };
    Some((path.to_string(), entry))
}

/// Merge `dependencies` into the import clause of `lines`.
///
/// Existing entries win over new plain ones, so aliases survive. Nothing
/// changes when there is nothing to import.
pub fn merge_imports(
    lines: &mut Vec<String>,
    dependencies: &BTreeSet<String>,
) -> Result<(), MergeError> {
    if dependencies.is_empty() {
        return Ok(());
    }

    match find_imports(lines)? {
        Some(clause) => {
            let mut entries = clause.entries;
            for (path, entry) in plain_entries(dependencies) {
                entries.entry(path).or_insert(entry);
            }
            lines.splice(clause.lines, render_imports(&entries));
        }
        None => insert_clause(lines, render_imports(&plain_entries(dependencies))),
    }
    Ok(())
}

/// Put `clause` into the first blank line of the lookahead window, or right
/// after the first line when there is none.
fn insert_clause(lines: &mut Vec<String>, clause: Vec<String>) {
    if lines.len() <= 1 {
        lines.push(String::new());
        lines.extend(clause);
        return;
    }

    let mut replacement = Vec::with_capacity(clause.len() + 2);
    replacement.push(String::new());
    replacement.extend(clause);
    replacement.push(String::new());

    let window = lines.len().min(IMPORT_LOOKAHEAD);
    match (1..window).find(|&index| lines[index].trim().is_empty()) {
        Some(blank) => {
            lines.splice(blank..blank + 1, replacement);
        }
        None => {
            lines.splice(1..1, replacement);
        }
    }
}

fn is_import_line(line: &str) -> bool {
    line.trim_start()
        .strip_prefix("import")
        .is_some_and(|rest| rest.is_empty() || rest.starts_with([' ', '\t', '(', '"']))
}

fn malformed(index: usize, line: &str) -> MergeError {
    MergeError::MalformedImport {
        line: index + 1,
        content: line.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.split('\n').map(str::to_string).collect()
    }

    fn set(entries: &[&str]) -> BTreeSet<String> {
        entries.iter().map(|entry| entry.to_string()).collect()
    }

    fn merged(text: &str, dependencies: &[&str]) -> Result<String, MergeError> {
        let mut lines = lines(text);
        merge_imports(&mut lines, &set(dependencies))?;
        Ok(lines.join("\n"))
    }

    #[test]
    fn renders_single_and_bracketed_clauses() {
        assert!(render_imports(&plain_entries(&set(&[]))).is_empty());
        assert_eq!(
            render_imports(&plain_entries(&set(&["time"]))),
            vec!["import \"time\""]
        );
        assert_eq!(
            render_imports(&plain_entries(&set(&["time", "database/sql"]))),
            vec!["import (", "\t\"database/sql\"", "\t\"time\"", ")"]
        );
    }

    #[test]
    fn parses_aliased_and_blank_specs() {
        assert_eq!(
            parse_spec("\"a/b\""),
            Some(("a/b".to_string(), "\"a/b\"".to_string()))
        );
        assert_eq!(
            parse_spec("sq  \"github.com/Masterminds/squirrel\" // builder"),
            Some((
                "github.com/Masterminds/squirrel".to_string(),
                "sq \"github.com/Masterminds/squirrel\"".to_string()
            ))
        );
        assert_eq!(
            parse_spec("_ \"github.com/lib/pq\""),
            Some(("github.com/lib/pq".to_string(), "_ \"github.com/lib/pq\"".to_string()))
        );
        assert!(parse_spec("\"unterminated").is_none());
        assert!(parse_spec("nothing").is_none());
        assert!(parse_spec("two words \"x\"").is_none());
    }

    #[test]
    fn keeps_aliased_and_blank_imports() {
        let text = concat!(
            "package olaf\n\n",
            "import (\n",
            "\t_ \"github.com/lib/pq\"\n",
            "\tsq \"github.com/Masterminds/squirrel\"\n",
            ")\n\n",
            "var q = sq.Select(\"*\")\n",
        );
        assert_eq!(
            merged(text, &["database/sql"]).expect("merged"),
            concat!(
                "package olaf\n\n",
                "import (\n",
                "\t\"database/sql\"\n",
                "\tsq \"github.com/Masterminds/squirrel\"\n",
                "\t_ \"github.com/lib/pq\"\n",
                ")\n\n",
                "var q = sq.Select(\"*\")\n",
            )
        );
    }

    #[test]
    fn keeps_alias_of_single_line_import_already_present() {
        let text = "package olaf\n\nimport dbsql \"database/sql\"\n\nvar _ dbsql.NullString\n";
        assert_eq!(merged(text, &["database/sql"]).expect("merged"), text);
        assert_eq!(
            merged(text, &["time"]).expect("merged"),
            "package olaf\n\nimport (\n\tdbsql \"database/sql\"\n\t\"time\"\n)\n\nvar _ dbsql.NullString\n"
        );
    }

    #[test]
    fn widens_single_line_clause() {
        let text = "\npackage olaf\n\nimport \"time\"\n\ntype SomeRandom struct {\n}";
        assert_eq!(
            merged(text, &["database/sql"]).expect("merged"),
            "\npackage olaf\n\nimport (\n\t\"database/sql\"\n\t\"time\"\n)\n\ntype SomeRandom struct {\n}"
        );
    }

    #[test]
    fn unions_bracketed_clause_and_sorts() {
        let text = "package olaf\n\nimport (\n\t\"time\"\n\n\t// comment\n\t\"database/sql\"\n)\n\nvar x = 1\n";
        assert_eq!(
            merged(text, &["database/sql", "fmt"]).expect("merged"),
            "package olaf\n\nimport (\n\t\"database/sql\"\n\t\"fmt\"\n\t\"time\"\n)\n\nvar x = 1\n"
        );
    }

    #[test]
    fn existing_identical_clause_is_kept() {
        let text = "package olaf\n\nimport \"database/sql\"\n\ntype A struct{}\n";
        assert_eq!(merged(text, &["database/sql"]).expect("merged"), text);
    }

    #[test]
    fn inserts_clause_into_first_blank_line() {
        let text = "package olaf\n\ntype A struct{}\n";
        assert_eq!(
            merged(text, &["time"]).expect("merged"),
            "package olaf\n\nimport \"time\"\n\ntype A struct{}\n"
        );
    }

    #[test]
    fn inserts_clause_after_single_line() {
        assert_eq!(
            merged("package olaf", &["time"]).expect("merged"),
            "package olaf\n\nimport \"time\""
        );
    }

    #[test]
    fn inserts_clause_after_first_line_without_blank() {
        assert_eq!(
            merged("package olaf\ntype A struct{}", &["time"]).expect("merged"),
            "package olaf\n\nimport \"time\"\n\ntype A struct{}"
        );
    }

    #[test]
    fn blank_line_outside_lookahead_is_not_used() {
        let text = "package olaf\n// 1\n// 2\n// 3\n// 4\n// 5\ntype A struct {\n\n}";
        assert_eq!(
            merged(text, &["time"]).expect("merged"),
            "package olaf\n\nimport \"time\"\n\n// 1\n// 2\n// 3\n// 4\n// 5\ntype A struct {\n\n}"
        );
    }

    #[test]
    fn clause_outside_lookahead_is_ignored() {
        let text = "package olaf\n// 1\n// 2\n// 3\n// 4\n// 5\nimport \"fmt\"";
        let clause = find_imports(&lines(text)).expect("scanned");
        assert!(clause.is_none());
    }

    #[test]
    fn skips_when_nothing_to_import() {
        let text = "package olaf\n\nimport (\n\tnot valid\n)\n";
        assert_eq!(merged(text, &[]).expect("untouched"), text);
    }

    #[test]
    fn rejects_malformed_entries() {
        let text = "package olaf\n\nimport (\n\t\"time\"\n\tnot valid\n)\n";
        let err = merged(text, &["fmt"]).unwrap_err();
        assert_eq!(
            err,
            MergeError::MalformedImport {
                line: 5,
                content: "not valid".to_string(),
            }
        );

        let err = merged("package olaf\nimport fmt\n", &["time"]).unwrap_err();
        assert!(matches!(err, MergeError::MalformedImport { line: 2, .. }));
    }

    #[test]
    fn rejects_unterminated_clause() {
        let err = merged("package olaf\n\nimport (\n\t\"time\"\n", &["fmt"]).unwrap_err();
        assert_eq!(err, MergeError::UnterminatedImport { line: 3 });
    }
}
