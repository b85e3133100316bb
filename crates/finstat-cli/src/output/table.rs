use serde_json::Value;
use tabled::{builder::Builder, Table};

const RESULT_COLUMNS: [&str; 6] = ["id", "name", "type", "currentValue", "rating", "status"];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    if let Some(results) = crate::output::results_array(value) {
        print_results_table(results);
        return;
    }

    match value {
        Value::Object(_) => print_flat_object(value),
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

/// One row per analysis result, fixed headline columns.
fn print_results_table(results: &[Value]) {
    if results.is_empty() {
        println!("(empty)");
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(RESULT_COLUMNS);
    for result in results {
        if let Value::Object(map) = result {
            let row: Vec<String> = RESULT_COLUMNS
                .iter()
                .map(|c| map.get(*c).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    let table = Table::from(builder);
    println!("{}", table);
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        let table = Table::from(builder);
        println!("{}", table);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }
        let table = Table::from(builder);
        println!("{}", table);
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
