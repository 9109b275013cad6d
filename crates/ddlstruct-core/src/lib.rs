//! Core contracts for ddlstruct.
//!
//! This crate defines the vendor-neutral schema model consumed by the struct
//! generator, the capability every introspection backend implements, and the
//! error type shared across the workspace.

pub mod error;
pub mod extras;
pub mod schema;
pub mod source;
pub mod validation;

pub use error::{Error, Result};
pub use extras::{ColumnExtras, MariadbColumn, MariadbKeyType, PostgresColumn, auto_increment};
pub use schema::{Column, DataType, ForeignColumn, Table};
pub use source::SchemaSource;
pub use validation::validate_tables;

/// Current contract version for snapshot artifacts.
pub const SNAPSHOT_VERSION: &str = "0.1";
