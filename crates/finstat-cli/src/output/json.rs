use serde_json::Value;

/// Write the analysis report to stdout as pretty-printed JSON. Serialization
/// failures go to stderr instead of aborting the process.
pub fn print_json(report: &Value) {
    match serde_json::to_string_pretty(report) {
        Ok(rendered) => println!("{}", rendered),
        Err(e) => eprintln!("failed to render report: {}", e),
    }
}
