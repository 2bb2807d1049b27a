use serde_json::Value;

use crate::output::scalar;

/// Print just the key answer value from the output.
///
/// Heuristic: the point valuation first, then the resolved band, then the
/// tax outcome, falling back to the first field.
pub fn print_minimal(value: &Value) {
    let root = value.as_object();

    // Valuation result
    if let Some(result) = root.and_then(|m| m.get("result")).and_then(Value::as_object) {
        for key in ["final_valuation", "net_return"] {
            if let Some(val) = result.get(key) {
                if !val.is_null() {
                    println!("{}", scalar(val));
                    return;
                }
            }
        }
    }

    // Resolved multiple band
    if let Some(band) = root.and_then(|m| m.get("band")) {
        match band.as_object() {
            Some(b) => {
                let low = b.get("low").map(scalar).unwrap_or_default();
                let high = b.get("high").map(scalar).unwrap_or_default();
                println!("{low}-{high}");
            }
            None => println!("null"),
        }
        return;
    }

    // Scenario list: print the base scenario valuation
    if let Some(Value::Array(scenarios)) = root.and_then(|m| m.get("scenarios")) {
        if let Some(base) = scenarios
            .iter()
            .find(|s| s.get("id").and_then(Value::as_str) == Some("base"))
        {
            if let Some(val) = base.get("valuation") {
                println!("{}", scalar(val));
                return;
            }
        }
    }

    // Fall back to the first field
    if let Some(map) = root {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar(val));
            return;
        }
    }

    println!("{}", scalar(value));
}
