//! Canonical, key-order-independent JSON serialization.
//!
//! Object keys are emitted in lexicographic order at every depth, arrays keep
//! their element order, and scalars use standard JSON encoding. Two values
//! that differ only in key insertion order serialize to identical bytes,
//! which is what makes cache keys stable.

use serde_json::Value;

/// Serialize `value` canonically.
pub fn stable_stringify(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                // Value's Display escapes strings exactly like serde_json does.
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                write_value(out, &map[key]);
            }
            out.push('}');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}
