use ddlstruct_core::{Column, DataType, Table};

#[test]
fn serializes_table_deterministically() {
    let mut table = Table::new("app", "orders");
    let mut id = Column::new("id", DataType::Integer);
    id.primary_key = true;
    id.internal_type = "int4".to_string();
    table.columns = vec![
        id,
        Column::new("user_id", DataType::Integer).with_reference("app", "users", "id"),
    ];

    let json = serde_json::to_string_pretty(&table).expect("serialize table");
    let expected = r#"{
  "name": "orders",
  "schema": "app",
  "columns": [
    {
      "name": "id",
      "data_type": "Integer",
      "internal_type": "int4",
      "primary_key": true,
      "foreign_key": false,
      "can_be_null": false
    },
    {
      "name": "user_id",
      "data_type": "Integer",
      "internal_type": "",
      "primary_key": false,
      "foreign_key": true,
      "foreign_key_column": {
        "name": "users",
        "schema": "app",
        "column": "id"
      },
      "can_be_null": false
    }
  ]
}"#;
    assert_eq!(json, expected);
}

#[test]
fn deserializes_with_defaults() {
    let table: Table = serde_json::from_str(
        r#"{"name": "users", "columns": [{"name": "email", "data_type": "String", "can_be_null": true}]}"#,
    )
    .expect("parse table");

    assert_eq!(table.schema, "");
    let email = table.column("email").expect("email column");
    assert_eq!(email.data_type, DataType::String);
    assert!(email.can_be_null);
    assert!(!email.foreign_key);
    assert!(email.extras.is_none());
}
