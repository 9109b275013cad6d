//! Non-destructive merge of generated blocks into Go files.
//!
//! Existing files are patched by text surgery: the import clause in the
//! leading lines is widened, then the table's generated block is replaced in
//! place or appended. Everything else is preserved byte for byte.

pub mod block;
pub mod imports;

use std::collections::BTreeSet;

use thiserror::Error;

use crate::render::RenderedBlock;

pub use block::{Placement, block_pattern, splice_block};
pub use imports::{
    IMPORT_LOOKAHEAD, ImportEntries, find_imports, merge_imports, plain_entries, render_imports,
};

/// Structural problems found in an existing file.
#[derive(Debug, Error, PartialEq)]
pub enum MergeError {
    #[error("line {line}: not a valid import statement: {content}")]
    MalformedImport { line: usize, content: String },
    #[error("line {line}: import clause is never closed")]
    UnterminatedImport { line: usize },
    #[error("type {type_name} is declared, but not as a generated block")]
    UnmatchedDeclaration { type_name: String },
    #[error("invalid block pattern: {0}")]
    Pattern(#[from] regex::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Created,
    Patched,
    Appended,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedFile {
    pub text: String,
    pub outcome: MergeOutcome,
}

/// Full file content for a single block.
pub fn synthesize(namespace: &str, block: &RenderedBlock) -> String {
    synthesize_text(namespace, &block.text(), &block.dependencies)
}

pub fn synthesize_text(namespace: &str, block: &str, dependencies: &BTreeSet<String>) -> String {
    let imports = render_imports(&plain_entries(dependencies));
    if imports.is_empty() {
        format!("package {namespace}\n\n{block}")
    } else {
        format!("package {namespace}\n\n{}\n\n{block}", imports.join("\n"))
    }
}

/// Merge `block` into `existing`, synthesizing a file when there is no content.
pub fn merge(
    existing: &str,
    namespace: &str,
    block: &RenderedBlock,
) -> Result<MergedFile, MergeError> {
    if existing.trim().is_empty() {
        return Ok(MergedFile {
            text: synthesize(namespace, block),
            outcome: MergeOutcome::Created,
        });
    }
    patch(existing, &block.type_name, &block.text(), &block.dependencies)
}

/// Patch non-empty `existing` text with `block_text` of `type_name`.
pub fn patch(
    existing: &str,
    type_name: &str,
    block_text: &str,
    dependencies: &BTreeSet<String>,
) -> Result<MergedFile, MergeError> {
    let mut lines: Vec<String> = existing.split('\n').map(str::to_string).collect();
    merge_imports(&mut lines, dependencies)?;
    let with_imports = lines.join("\n");

    let (text, placement) = splice_block(&with_imports, type_name, block_text)?;
    let outcome = match placement {
        Placement::Replaced => MergeOutcome::Patched,
        Placement::Appended => MergeOutcome::Appended,
    };
    Ok(MergedFile { text, outcome })
}
