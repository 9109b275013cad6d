//! Struct tag annotations embedded in generated code.
//!
//! Tags are single-line, comma separated lists of `Key:value` pairs and bare
//! flags. Values must not contain a comma.

use std::fmt;

use tracing::warn;

use ddlstruct_core::{Column, auto_increment};

/// Struct tag key of [`ColumnTag`].
pub const COLUMN_TAG_ID: &str = "dbColumn";
/// Struct tag key of [`MetadataTag`].
pub const METADATA_TAG_ID: &str = "dbMetadata";
/// Reserved field hosting the [`MetadataTag`] of every generated struct.
pub const METADATA_FIELD_NAME: &str = "DbMetadata_";

/// Column information stored in the `dbColumn` struct tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnTag {
    /// Name of the column in the database.
    pub name: String,
    pub is_primary_key: bool,
    /// `schema.table.column` this column points to, schema optional.
    pub foreign_key_reference: String,
    /// `schema.table.column` pointing at this table (1:n fields only).
    pub pointed_key_reference: String,
    pub auto_increment: bool,
}

impl ColumnTag {
    pub fn from_column(column: &Column) -> Self {
        let foreign_key_reference = if column.foreign_key {
            let target = &column.foreign_key_column;
            if target.schema.is_empty() {
                format!("{}.{}", target.name, target.column)
            } else {
                format!("{}.{}.{}", target.schema, target.name, target.column)
            }
        } else {
            String::new()
        };

        Self {
            name: column.name.clone(),
            is_primary_key: column.primary_key,
            foreign_key_reference,
            pointed_key_reference: String::new(),
            auto_increment: auto_increment(column),
        }
    }

    pub fn pointed(reference: impl Into<String>) -> Self {
        Self {
            pointed_key_reference: reference.into(),
            ..Self::default()
        }
    }

    /// Parse a tag produced by the [`fmt::Display`] implementation.
    ///
    /// Unknown keys and keys without a value are logged and ignored.
    pub fn parse(tag: &str) -> Self {
        let mut parsed = Self::default();

        for token in tag.split(',').filter(|token| !token.is_empty()) {
            match split_token(token, "column") {
                Token::Flag("AutoIncrement") => parsed.auto_increment = true,
                Token::Flag("PrimaryKey") => parsed.is_primary_key = true,
                Token::Pair("Column", value) => parsed.name = value.to_string(),
                Token::Pair("ForeignKey", value) => parsed.foreign_key_reference = value.to_string(),
                Token::Pair("PointedForeignKey", value) => {
                    parsed.pointed_key_reference = value.to_string()
                }
                Token::Flag(flag) => warn!(flag = %flag, "unknown flag in column tag"),
                Token::Pair(key, _) => warn!(key = %key, "unknown key in column tag"),
                Token::Skip => {}
            }
        }

        parsed
    }
}

impl fmt::Display for ColumnTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tokens = Vec::new();
        if !self.name.is_empty() {
            tokens.push(format!("Column:{}", self.name));
        }
        if self.auto_increment {
            tokens.push("AutoIncrement".to_string());
        }
        if self.is_primary_key {
            tokens.push("PrimaryKey".to_string());
        }
        if !self.foreign_key_reference.is_empty() {
            tokens.push(format!("ForeignKey:{}", self.foreign_key_reference));
        }
        if !self.pointed_key_reference.is_empty() {
            tokens.push(format!("PointedForeignKey:{}", self.pointed_key_reference));
        }
        f.write_str(&tokens.join(","))
    }
}

/// Table information stored on the reserved metadata field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataTag {
    pub schema: String,
    pub table: String,
}

impl MetadataTag {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }

    pub fn parse(tag: &str) -> Self {
        let mut parsed = Self::default();

        for token in tag.split(',').filter(|token| !token.is_empty()) {
            match split_token(token, "metadata") {
                Token::Pair("Schema", value) => parsed.schema = value.to_string(),
                Token::Pair("Table", value) => parsed.table = value.to_string(),
                Token::Flag(flag) => warn!(flag = %flag, "unknown flag in metadata tag"),
                Token::Pair(key, _) => warn!(key = %key, "unknown key in metadata tag"),
                Token::Skip => {}
            }
        }

        parsed
    }
}

impl fmt::Display for MetadataTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schema:{},Table:{}", self.schema, self.table)
    }
}

enum Token<'a> {
    Flag(&'a str),
    Pair(&'a str, &'a str),
    Skip,
}

fn split_token<'a>(token: &'a str, kind: &str) -> Token<'a> {
    match token.split_once(':') {
        None => Token::Flag(token),
        Some((key, "")) => {
            warn!(key = %key, tag = kind, "no value specified in tag");
            Token::Skip
        }
        Some((key, value)) => Token::Pair(key, value),
    }
}
