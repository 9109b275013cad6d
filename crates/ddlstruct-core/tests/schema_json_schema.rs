use ddlstruct_core::Table;
use schemars::schema_for;

#[test]
fn json_schema_describes_snapshot_tables() {
    let generated = schema_for!(Table);
    let json = serde_json::to_value(&generated).expect("serialize generated schema");

    let properties = json["properties"].as_object().expect("table properties");
    assert!(properties.contains_key("name"));
    assert!(properties.contains_key("schema"));
    assert!(properties.contains_key("columns"));

    let column = &json["definitions"]["Column"]["properties"];
    assert!(column.get("data_type").is_some());
    assert!(column.get("foreign_key_column").is_some());
    assert!(
        column.get("extras").is_none(),
        "vendor extras are rebuilt by backends and must not be part of the schema"
    );
}
