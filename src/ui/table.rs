//! ui::table
//!
//! Multi-section table rendering.
//!
//! A payload renders as a titled section: the scalar keys of an object
//! become a sorted header row with the values beneath, and every nested
//! list or object becomes its own indented sub-section. Lists of objects
//! share one header built from the union of their scalar keys, so
//! elements missing a key render an empty cell.

use serde_json::Value;

const COLUMN_SEPARATOR: &str = "|";
const INDENT: &str = "  ";

/// Render a payload as a table.
pub fn format_table(title: &str, payload: &Value) -> String {
    let mut out = String::new();
    build_section(&mut out, title, payload, 0);
    if out.ends_with('\n') {
        out.pop();
    }
    out
}

fn build_section(out: &mut String, title: &str, value: &Value, indent: usize) {
    match value {
        Value::Object(map) => {
            push_title(out, title, indent);
            let (scalars, nested) = split_keys(map);
            if scalars.len() == 1 {
                // A single scalar pair reads better as key|value.
                let key = scalars[0];
                push_row(out, &[key.to_string(), cell(&map[key])], indent);
            } else if !scalars.is_empty() {
                push_row(out, &scalars.iter().map(|k| k.to_string()).collect::<Vec<_>>(), indent);
                push_row(
                    out,
                    &scalars.iter().map(|k| cell(&map[k.as_str()])).collect::<Vec<_>>(),
                    indent,
                );
            }
            for key in nested {
                build_section(out, key, &map[key.as_str()], indent + 1);
            }
        }
        Value::Array(items) => {
            if items.iter().all(|i| i.is_object()) && !items.is_empty() {
                push_title(out, title, indent);
                let headers = union_scalar_keys(items);
                push_row(out, &headers, indent);
                for item in items {
                    let Some(object) = item.as_object() else {
                        continue;
                    };
                    let row: Vec<String> = headers
                        .iter()
                        .map(|h| object.get(h).map(cell).unwrap_or_default())
                        .collect();
                    push_row(out, &row, indent);
                    for (key, value) in object {
                        if value.is_object() || value.is_array() {
                            build_section(out, key, value, indent + 1);
                        }
                    }
                }
            } else {
                push_title(out, title, indent);
                for item in items {
                    push_row(out, &[cell(item)], indent);
                }
            }
        }
        scalar => {
            push_title(out, title, indent);
            push_row(out, &[cell(scalar)], indent);
        }
    }
}

/// Scalar keys (sorted) and nested keys (sorted) of an object.
fn split_keys(map: &serde_json::Map<String, Value>) -> (Vec<&String>, Vec<&String>) {
    let mut scalars = Vec::new();
    let mut nested = Vec::new();
    for (key, value) in map {
        if value.is_object() || value.is_array() {
            nested.push(key);
        } else {
            scalars.push(key);
        }
    }
    scalars.sort();
    nested.sort();
    (scalars, nested)
}

/// Union of scalar keys across a list of objects, sorted.
fn union_scalar_keys(items: &[Value]) -> Vec<String> {
    let mut keys = std::collections::BTreeSet::new();
    for item in items {
        if let Some(object) = item.as_object() {
            for (key, value) in object {
                if !value.is_object() && !value.is_array() {
                    keys.insert(key.clone());
                }
            }
        }
    }
    keys.into_iter().collect()
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn push_title(out: &mut String, title: &str, indent: usize) {
    if !title.is_empty() {
        out.push_str(&INDENT.repeat(indent));
        out.push_str(title);
        out.push('\n');
    }
}

fn push_row(out: &mut String, cells: &[String], indent: usize) {
    out.push_str(&INDENT.repeat(indent));
    out.push_str(&cells.join(COLUMN_SEPARATOR));
    out.push('\n');
}
