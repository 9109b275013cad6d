use ddlstruct_core::{Column, DataType, Table};
use ddlstruct_generate::{GenerationContext, GeneratorConfig, merge, render_block};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut users = Table::new("app", "users");
    let mut id = Column::new("id", DataType::Integer);
    id.primary_key = true;
    let mut email = Column::new("email", DataType::String);
    email.can_be_null = true;
    email.comment = Some("Login address".to_string());
    users.columns = vec![id, email];

    let config = GeneratorConfig {
        namespace: "models".to_string(),
        ..GeneratorConfig::default()
    };
    let tables = vec![users];
    let ctx = GenerationContext::new(&config, &tables);

    let block = render_block(&ctx, &tables[0])?;
    let file = merge("", &config.namespace, &block)?;
    print!("{}", file.text);
    Ok(())
}
