//! JSON flattening and rendering for ad-hoc response inspection

use serde_json::Value;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::error::Result;

/// Flatten a JSON document into ordered (path, value) leaf pairs.
///
/// Object children get `parent.child` keys (bare key at the root), array
/// elements get `parent[i]` keys with ascending indices. Scalars terminate
/// the descent; null renders as the literal text `null` and strings render
/// without quotes. Empty objects and arrays contribute no leaves. Pair
/// order follows document traversal order.
pub fn flatten(document: &Value) -> Vec<(String, String)> {
    let mut leaves = Vec::new();
    flatten_into(document, "", &mut leaves);
    leaves
}

fn flatten_into(node: &Value, path: &str, leaves: &mut Vec<(String, String)>) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{path}.{key}")
                };
                flatten_into(child, &child_path, leaves);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                flatten_into(child, &format!("{path}[{index}]"), leaves);
            }
        }
        Value::Null => leaves.push((path.to_string(), "null".to_string())),
        Value::String(text) => leaves.push((path.to_string(), text.clone())),
        other => leaves.push((path.to_string(), other.to_string())),
    }
}

/// Render a document as a one-row table: one column per leaf path, one data
/// row of values.
///
/// This is a single-record pretty-printer; heterogeneous arrays produce
/// wide tables by design.
pub fn render_flat_table(document: &Value) -> String {
    let leaves = flatten(document);
    if leaves.is_empty() {
        return "No fields to display.".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(leaves.iter().map(|(path, _)| path.as_str()));
    builder.push_record(leaves.iter().map(|(_, value)| value.as_str()));

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// Render a document with stable indentation.
pub fn render_indented(document: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}
