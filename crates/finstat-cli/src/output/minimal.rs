use serde_json::Value;

/// Print one line per analysis result: id, value, rating.
///
/// Falls back to the first field for non-result payloads.
pub fn print_minimal(value: &Value) {
    if let Some(results) = crate::output::results_array(value) {
        for result in results {
            if let Value::Object(map) = result {
                println!(
                    "{}\t{}\t{}",
                    map.get("id").map(format_minimal).unwrap_or_default(),
                    map.get("currentValue").map(format_minimal).unwrap_or_default(),
                    map.get("rating").map(format_minimal).unwrap_or_default(),
                );
            }
        }
        return;
    }

    if let Value::Object(map) = value {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(value));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
