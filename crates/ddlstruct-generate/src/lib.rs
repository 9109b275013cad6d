//! Go struct generation for ddlstruct.
//!
//! This crate turns a loaded table set into Go struct declarations and merges
//! them into existing source files without touching hand-written code.

pub mod config;
pub mod context;
pub mod engine;
pub mod errors;
pub mod mapper;
pub mod merge;
pub mod model;
pub mod naming;
pub mod output;
pub mod relations;
pub mod render;
pub mod tags;

pub use config::{GeneratorConfig, RelationshipPolicy, ResolvedTableConfig, TableConfig};
pub use context::GenerationContext;
pub use engine::{GenerationEngine, write_report};
pub use errors::GenerationError;
pub use merge::{MergeError, MergeOutcome, MergedFile, merge};
pub use model::{GenerationIssue, GenerationReport, TableOutcome, TableReport};
pub use render::{RenderedBlock, render_block};
pub use tags::{ColumnTag, MetadataTag};
