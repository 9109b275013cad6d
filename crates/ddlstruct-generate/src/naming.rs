//! Go identifier derivation from database names.

/// Go field (or struct) name for a database name: `user_id` -> `UserId`.
pub fn field_name(db_name: &str) -> String {
    db_name
        .to_lowercase()
        .split('_')
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// JSON key for a database name: `user_id` -> `userId`.
pub fn json_name(db_name: &str) -> String {
    let field = field_name(db_name);
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Go files are all lowercased.
pub fn file_name(table_name: &str) -> String {
    table_name.to_lowercase()
}

pub fn type_name(table_name: &str, suffix: &str) -> String {
    format!("{}{suffix}", field_name(table_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_field_names() {
        assert_eq!(field_name("user_id"), "UserId");
        assert_eq!(field_name("USER__ID_"), "UserId");
        assert_eq!(field_name("_leading"), "Leading");
        assert_eq!(field_name("id"), "Id");
        assert_eq!(field_name(""), "");
    }

    #[test]
    fn derives_json_names() {
        assert_eq!(json_name("with_under"), "withUnder");
        assert_eq!(json_name("ID"), "id");
        assert_eq!(json_name("__"), "");
    }

    #[test]
    fn derives_type_names() {
        assert_eq!(type_name("my_table_name", "Tab"), "MyTableNameTab");
        assert_eq!(file_name("My_Table"), "my_table");
    }
}
