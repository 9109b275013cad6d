//! Introspection collaborators producing the ddlstruct schema model.

pub mod mariadb;
pub mod options;
pub mod postgres;
pub mod snapshot;

pub use options::IntrospectOptions;
pub use postgres::PostgresSource;
pub use snapshot::{SchemaSnapshot, SnapshotSource, VendorColumn};

pub use ddlstruct_core::{SchemaSource, Table};
