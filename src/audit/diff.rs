//! Field-level diffs for audit update entries

use serde_json::{Map, Value};

/// Describe the top-level fields that differ between two snapshots
///
/// Returns `None` when nothing changed. Non-object values are compared as a
/// whole.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(b), Value::Object(a)) => object_changes(b, a),
        _ if before != after => vec![format!(
            "{} -> {}",
            format_value(before),
            format_value(after)
        )],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn object_changes(before: &Map<String, Value>, after: &Map<String, Value>) -> Vec<String> {
    let mut changes: Vec<String> = before
        .iter()
        .filter_map(|(key, old)| match after.get(key) {
            Some(new) if new == old => None,
            Some(new) => Some(format!("{}: {} -> {}", key, format_value(old), format_value(new))),
            None => Some(format!("{}: {} -> (removed)", key, format_value(old))),
        })
        .collect();

    changes.extend(
        after
            .iter()
            .filter(|(key, _)| !before.contains_key(*key))
            .map(|(key, new)| format!("{}: (added) -> {}", key, format_value(new))),
    );

    changes
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::String(s) if s.chars().count() > 50 => {
            let head: String = s.chars().take(47).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_changes() {
        let value = json!({"amount": 1000, "note": "lunch"});
        assert_eq!(generate_diff(&value, &value), None);
    }

    #[test]
    fn test_changed_field() {
        let before = json!({"amount": 1000, "note": "lunch"});
        let after = json!({"amount": 1500, "note": "lunch"});
        assert_eq!(
            generate_diff(&before, &after),
            Some("amount: 1000 -> 1500".to_string())
        );
    }

    #[test]
    fn test_note_cleared_and_added() {
        let before = json!({"note": "lunch"});
        let after = json!({"note": null, "currency_id": 2});
        let diff = generate_diff(&before, &after).unwrap();
        assert!(diff.contains("note: \"lunch\" -> null"));
        assert!(diff.contains("currency_id: (added) -> 2"));
    }

    #[test]
    fn test_long_string_truncated() {
        let long = "x".repeat(80);
        let diff = generate_diff(&json!({"note": ""}), &json!({ "note": long })).unwrap();
        assert!(diff.ends_with("...\""));
    }

    #[test]
    fn test_scalar_values() {
        assert_eq!(
            generate_diff(&json!(true), &json!(false)),
            Some("true -> false".to_string())
        );
    }
}
