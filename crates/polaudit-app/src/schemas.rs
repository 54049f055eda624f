use polaudit_domain::SchemaRegistry;

/// Each policy type followed by its attributes in declaration order.
pub fn format_schemas(registry: &SchemaRegistry) -> String {
    let mut out = String::new();
    for (policy_type, schema) in registry.iter() {
        out.push_str(policy_type);
        out.push('\n');
        for (name, kind) in schema.iter() {
            out.push_str(&format!("  {name}: {kind}\n"));
        }
    }
    out
}
