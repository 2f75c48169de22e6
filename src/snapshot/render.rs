//! Canonical text form of snapshots
//!
//! Each scalar kind has one rendering, chosen so that two values render the
//! same exactly when they are equal:
//!
//! | kind                   | rendering                                   |
//! |------------------------|---------------------------------------------|
//! | `text`                 | debug-escaped string literal, `"a\"b"`      |
//! | `boolean`              | `true` / `false`                            |
//! | `data`                 | lowercase hex of every byte, `<00ff>`       |
//! | `unsigned` / `signed`  | base-10 digits                              |
//! | `float32` / `float64`  | shortest repr that reparses to the same bits|
//! | `date`                 | RFC 3339 in UTC, `2024-01-02T03:04:05Z`     |

use chrono::SecondsFormat;

use super::Snapshot;
use crate::document::Value;

/// Render a scalar value. Containers and unrecognized nodes have no
/// rendering and yield `None`.
pub fn render_scalar(value: &Value) -> Option<String> {
    let rendered = match value {
        Value::Text(s) => format!("{:?}", s),
        Value::Boolean(b) => b.to_string(),
        Value::Data(bytes) => format!("<{}>", hex::encode(bytes)),
        Value::Unsigned(n) => n.to_string(),
        Value::Signed(n) => n.to_string(),
        Value::Float32(f) => format!("{:?}", f),
        Value::Float64(f) => format!("{:?}", f),
        Value::Date(at) => at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        Value::Dictionary(_) | Value::Array(_) | Value::Unrecognized { .. } => return None,
    };
    Some(rendered)
}

/// Render a snapshot as one `<path> : <type> = <value>` line per entry,
/// sorted ascending by the rendered path.
///
/// The output only depends on the set of entries, not the order the
/// flattener produced them in.
pub fn render(snapshot: &Snapshot) -> String {
    let mut lines: Vec<(String, String)> = snapshot
        .entries()
        .iter()
        .map(|entry| (entry.path.to_string(), entry.to_string()))
        .collect();
    lines.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out = String::new();
    for (_, line) in lines {
        out.push_str(&line);
        out.push('\n');
    }
    out
}
