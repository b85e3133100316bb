use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use finstat_core::analyzer::{registry, Analyzer, DomainAnalyzer};
use finstat_core::types::{BenchmarkData, Company, FinancialStatement, MarketData};

use crate::input;

/// One analysis request: statement history plus optional company, market,
/// and benchmark context. The same shape the engine's producers emit.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub statements: Vec<FinancialStatement>,
    #[serde(default)]
    pub company: Company,
    #[serde(default)]
    pub market: Option<MarketData>,
    #[serde(default)]
    pub benchmark: Option<BenchmarkData>,
}

/// Arguments for the analyze command
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a JSON or YAML request file (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Restrict to named domains (repeatable, e.g. --domain liquidity)
    #[arg(long = "domain")]
    pub domains: Vec<String>,

    /// Override the market share price from the request
    #[arg(long)]
    pub stock_price: Option<Decimal>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut request: AnalysisRequest = if let Some(ref path) = args.input {
        input::file::read_request(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("provide --input or pipe a request on stdin".into());
    };

    if let Some(price) = args.stock_price {
        match request.market.as_mut() {
            Some(market) => market.stock_price = price,
            None => {
                request.market = Some(MarketData {
                    stock_price: price,
                    ..Default::default()
                });
            }
        }
    }

    let analyzers = selected_analyzers(&args.domains)?;

    let results: Vec<_> = analyzers
        .iter()
        .flat_map(|a| {
            a.analyze(
                &request.statements,
                &request.company,
                request.market.as_ref(),
                request.benchmark.as_ref(),
            )
        })
        .collect();

    build_report(&request.company.name, &results)
}

/// Report envelope: company name, generation timestamp, and the result list.
fn build_report<T: serde::Serialize>(
    company: &str,
    results: &[T],
) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::json!({
        "company": company,
        "generatedAt": chrono::Utc::now().to_rfc3339(),
        "results": serde_json::to_value(results)?,
    }))
}

fn selected_analyzers(
    domains: &[String],
) -> Result<Vec<&'static DomainAnalyzer>, Box<dyn std::error::Error>> {
    let all = registry();
    if domains.is_empty() {
        return Ok(all);
    }

    let mut selected = Vec::new();
    for name in domains {
        let found = all.iter().find(|a| a.domain() == name.as_str());
        match found {
            Some(a) => selected.push(*a),
            None => {
                let known: Vec<&str> = all.iter().map(|a| a.domain()).collect();
                return Err(format!(
                    "unknown domain '{}' (available: {})",
                    name,
                    known.join(", ")
                )
                .into());
            }
        }
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_filter_rejects_unknown_names() {
        let err = selected_analyzers(&["liquidity".into(), "astrology".into()]).unwrap_err();
        assert!(err.to_string().contains("astrology"));
        assert!(err.to_string().contains("liquidity"));
    }

    #[test]
    fn empty_filter_selects_everything() {
        let all = selected_analyzers(&[]).unwrap();
        assert_eq!(all.len(), registry().len());
    }

    #[test]
    fn report_envelope_carries_rfc3339_timestamp() {
        let report = build_report::<serde_json::Value>("شركة الاختبار", &[]).unwrap();
        let map = report.as_object().unwrap();
        assert_eq!(map["company"], "شركة الاختبار");
        assert!(map["results"].as_array().unwrap().is_empty());

        let stamp = map["generatedAt"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }

    #[test]
    fn request_parses_with_minimal_fields() {
        let request: AnalysisRequest = serde_json::from_str(
            r#"{"statements": [{"year": 2024, "incomeStatement": {"revenue": 100}, "balanceSheet": {"totalAssets": 80}}]}"#,
        )
        .unwrap();
        assert_eq!(request.statements.len(), 1);
        assert!(request.market.is_none());
        assert!(request.benchmark.is_none());
    }
}
