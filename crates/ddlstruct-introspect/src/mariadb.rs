//! MariaDB vendor type mapping.
//!
//! There is no live MariaDB backend; snapshots exported from MariaDB are
//! normalised through [`data_type_for`].

use ddlstruct_core::DataType;
use tracing::warn;

/// Map a MariaDB `DATA_TYPE` onto a [`DataType`].
pub fn data_type_for(internal_type: &str) -> DataType {
    let lowered = internal_type.to_lowercase();
    let base = lowered.split('(').next().unwrap_or_default().trim();

    match base {
        "varchar" | "text" | "tinytext" | "mediumtext" | "longtext" | "char" => DataType::String,
        "int" | "tinyint" | "smallint" | "mediumint" | "bigint" => DataType::Integer,
        "decimal" | "number" | "float" | "double" => DataType::Double,
        "datetime" | "date" | "timestamp" => DataType::Date,
        "point" => DataType::Geo,
        _ => {
            warn!(
                event = "unknown_vendor_type",
                engine = "mariadb",
                internal_type = %internal_type,
                "received unknown data type for column"
            );
            DataType::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_native_types() {
        assert_eq!(data_type_for("VARCHAR"), DataType::String);
        assert_eq!(data_type_for("bigint(20)"), DataType::Integer);
        assert_eq!(data_type_for("decimal"), DataType::Double);
        assert_eq!(data_type_for("datetime"), DataType::Date);
        assert_eq!(data_type_for("point"), DataType::Geo);
        assert_eq!(data_type_for("blob"), DataType::Unknown);
    }
}
