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

/// Pull the results array out of an analysis envelope, if present.
pub(crate) fn results_array(value: &Value) -> Option<&Vec<Value>> {
    value
        .as_object()
        .and_then(|m| m.get("results"))
        .and_then(|r| r.as_array())
}
