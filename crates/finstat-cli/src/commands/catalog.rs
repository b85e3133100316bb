use serde_json::{json, Value};

use finstat_core::analyzer::{registry, Analyzer};

/// List the enabled domains with their metric identifiers.
pub fn run_domains() -> Result<Value, Box<dyn std::error::Error>> {
    let domains: Vec<Value> = registry()
        .iter()
        .map(|a| {
            json!({
                "domain": a.domain(),
                "category": a.category,
                "metrics": a.metrics.iter().map(|m| m.id).collect::<Vec<_>>(),
            })
        })
        .collect();

    Ok(json!({ "domains": domains }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_every_registered_domain() {
        let value = run_domains().unwrap();
        let domains = value["domains"].as_array().unwrap();
        assert_eq!(domains.len(), registry().len());
        assert!(domains
            .iter()
            .any(|d| d["domain"] == "liquidity" && d["metrics"].as_array().unwrap().len() == 5));
    }
}
