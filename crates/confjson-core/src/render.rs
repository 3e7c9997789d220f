//! Human-readable dump of a value tree, for start-up diagnostics.
//!
//! ```text
//! Primary :
//!   particle : "e-"
//!   energy : 10
//!   position : [0,0,-50]
//! Run :
//!   Seed : 123456789
//! ```
//!
//! Objects nest by two spaces and keep their stored key order; every other
//! value is printed as compact JSON on the key's line.

use crate::types::Value;

/// Render `value` as an indented tree. A non-object root prints as one JSON line.
pub fn render_tree(value: &Value) -> String {
    let mut out = String::new();
    match value {
        Value::Object(pairs) => render_object(pairs, 0, &mut out),
        other => {
            out.push_str(&compact(other));
            out.push('\n');
        }
    }
    out
}

fn render_object(pairs: &[(String, Value)], depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for (key, value) in pairs {
        out.push_str(&indent);
        out.push_str(key);
        match value {
            Value::Object(children) => {
                out.push_str(" :\n");
                render_object(children, depth + 1, out);
            }
            other => {
                out.push_str(" : ");
                out.push_str(&compact(other));
                out.push('\n');
            }
        }
    }
}

fn compact(value: &Value) -> String {
    serde_json::Value::from(value).to_string()
}
