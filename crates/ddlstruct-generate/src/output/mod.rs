pub mod file;

pub use file::{FormatterError, read_existing, run_formatter, write_bytes_atomic};
