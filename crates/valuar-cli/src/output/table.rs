use serde_json::Value;
use tabled::{builder::Builder, Table};

use crate::output::{flatten, scalar};

/// Format output as tables: scalar and nested fields become a field/value
/// table, arrays of objects (scenarios) become their own table below it.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            let mut rows: Vec<(String, String)> = Vec::new();
            let mut object_arrays: Vec<(&str, &[Value])> = Vec::new();

            for (key, val) in map {
                match val {
                    Value::Array(items)
                        if !items.is_empty() && items.iter().all(|i| i.is_object()) =>
                    {
                        object_arrays.push((key.as_str(), items));
                    }
                    other => flatten(key, other, &mut rows),
                }
            }

            if !rows.is_empty() {
                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (field, value) in &rows {
                    builder.push_record([field.as_str(), value.as_str()]);
                }
                println!("{}", Table::from(builder));
            }

            for (name, items) in object_arrays {
                println!("\n{name}:");
                print_objects(items);
            }
        }
        Value::Array(items) => print_objects(items),
        other => println!("{}", scalar(other)),
    }
}

fn print_objects(items: &[Value]) {
    if items.is_empty() {
        println!("(empty)");
        return;
    }

    let Some(Value::Object(first)) = items.first() else {
        for item in items {
            println!("{}", scalar(item));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(&headers);

    for item in items {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(scalar).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }

    println!("{}", Table::from(builder));
}
