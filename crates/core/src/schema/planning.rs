//! Pure functions for describing a table schema (Functional Core).

use super::{KeySchemaElement, KeyType, TableSchema};

/// Pure function: Format a schema as the lines of a create-table plan.
pub fn format_schema(schema: &TableSchema) -> Vec<String> {
    let mut lines = vec![format!("+ Create table: {}", schema.table_name)];
    push_keys(&mut lines, "  ", &schema.key_schema);

    for index in &schema.secondary_indexes {
        lines.push(format!("  + GSI: {} (projection: ALL)", index.name));
        push_keys(&mut lines, "    ", &index.key_schema);
    }

    let attributes: Vec<&str> = schema
        .attribute_definitions
        .iter()
        .map(|definition| definition.attribute_name.as_str())
        .collect();
    lines.push(format!("  Attributes: {} (S)", attributes.join(", ")));
    lines.push("  Billing: PAY_PER_REQUEST".to_string());
    lines
}

fn push_keys(lines: &mut Vec<String>, indent: &str, key_schema: &[KeySchemaElement]) {
    for element in key_schema {
        let label = match element.key_type {
            KeyType::Hash => "Partition key",
            KeyType::Range => "Sort key",
        };
        lines.push(format!("{indent}{label}: {} (S)", element.attribute_name));
    }
}
