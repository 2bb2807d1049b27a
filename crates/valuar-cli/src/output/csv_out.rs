use serde_json::Value;
use std::io;

use crate::output::{flatten, scalar};

/// Write output as CSV to stdout. Scenario arrays become row-per-scenario
/// CSV; everything else becomes flattened field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            if let Some(Value::Array(scenarios)) = map.get("scenarios") {
                write_objects(&mut wtr, scenarios);
            } else {
                let mut rows: Vec<(String, String)> = Vec::new();
                flatten("", value, &mut rows);
                let _ = wtr.write_record(["field", "value"]);
                for (field, val) in rows {
                    let _ = wtr.write_record([field.as_str(), val.as_str()]);
                }
            }
        }
        Value::Array(items) => write_objects(&mut wtr, items),
        other => {
            let _ = wtr.write_record([scalar(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_objects(wtr: &mut csv::Writer<io::StdoutLock<'_>>, items: &[Value]) {
    if items.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = items.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in items {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(scalar).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in items {
            let _ = wtr.write_record([scalar(item)]);
        }
    }
}
