pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Render a JSON scalar for tabular output. Nested values fall back to
/// compact JSON.
pub(crate) fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Flatten an object into dotted field/value pairs so nested structures
/// like `range` and `multiples` read naturally in tables and CSV.
pub(crate) fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, val, rows);
            }
        }
        Value::Array(items) if items.iter().all(|i| !i.is_object()) => {
            rows.push((prefix.to_string(), scalar(value)));
        }
        Value::Array(_) => {
            // Arrays of objects are rendered as their own tables elsewhere.
        }
        other => rows.push((prefix.to_string(), scalar(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_objects_into_dotted_keys() {
        let value = json!({
            "strategy": "standard",
            "result": {
                "final_valuation": "17860000",
                "range": { "min": "14288000", "max": "21432000" }
            }
        });

        let mut rows = Vec::new();
        flatten("", &value, &mut rows);

        assert!(rows.contains(&("strategy".to_string(), "standard".to_string())));
        assert!(rows.contains(&("result.range.min".to_string(), "14288000".to_string())));
        assert!(rows.contains(&("result.range.max".to_string(), "21432000".to_string())));
    }

    #[test]
    fn test_flatten_skips_object_arrays() {
        let value = json!({
            "scenarios": [{ "id": "base", "valuation": "2000000" }],
            "count": 1
        });

        let mut rows = Vec::new();
        flatten("", &value, &mut rows);

        assert_eq!(rows, vec![("count".to_string(), "1".to_string())]);
    }

    #[test]
    fn test_scalar_rendering() {
        assert_eq!(scalar(&json!("7.27")), "7.27");
        assert_eq!(scalar(&json!(42)), "42");
        assert_eq!(scalar(&json!(null)), "null");
        assert_eq!(scalar(&json!([1, 2])), "[1,2]");
    }
}
