//! ui::text
//!
//! Flat text rendering: tab-delimited rows, scalar-first, nested values
//! labeled with their uppercased key path. Keys print in sorted order so
//! output is stable across runs.

use serde_json::Value;

/// Render a payload as text lines.
pub fn format_text(payload: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, None, payload);
    // Drop the trailing newline for symmetric printing.
    if out.ends_with('\n') {
        out.pop();
    }
    out
}

fn write_value(out: &mut String, label: Option<&str>, value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(label) = label {
                out.push_str(&label.to_ascii_uppercase());
                out.push('\n');
            }
            let mut scalars = Vec::new();
            let mut nested = Vec::new();
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            for key in keys {
                match &map[key.as_str()] {
                    v @ (Value::Array(_) | Value::Object(_)) => nested.push((key, v)),
                    v => scalars.push((key, v)),
                }
            }
            if !scalars.is_empty() {
                let row: Vec<String> = scalars.iter().map(|(_, v)| scalar_text(v)).collect();
                out.push_str(&row.join("\t"));
                out.push('\n');
            }
            for (key, value) in nested {
                write_value(out, Some(key), value);
            }
        }
        Value::Array(items) => {
            for item in items {
                write_value(out, label, item);
            }
        }
        scalar => {
            out.push_str(&scalar_text(scalar));
            out.push('\n');
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "None".to_string(),
        other => other.to_string(),
    }
}
