use finstat_core::result::AnalysisResult;
use finstat_core::types::{Company, FinancialStatement};
use finstat_core::{analyze_all, registry};
use rust_decimal_macros::dec;
use serde_json::Value;

// ===========================================================================
// JSON contract for analysis results
// ===========================================================================

fn single_statement() -> Vec<FinancialStatement> {
    let mut s = FinancialStatement::default();
    s.year = 2024;
    s.income_statement.revenue = dec!(500_000);
    s.income_statement.cost_of_goods_sold = dec!(300_000);
    s.income_statement.operating_income = dec!(80_000);
    s.income_statement.net_income = dec!(40_000);
    s.income_statement.interest_expense = dec!(8_000);
    s.balance_sheet.total_assets = dec!(600_000);
    s.balance_sheet.current_assets = dec!(200_000);
    s.balance_sheet.current_liabilities = dec!(100_000);
    s.balance_sheet.cash = dec!(40_000);
    s.balance_sheet.inventory = dec!(50_000);
    s.balance_sheet.accounts_receivable = dec!(45_000);
    s.balance_sheet.accounts_payable = dec!(30_000);
    s.balance_sheet.fixed_assets = dec!(350_000);
    s.balance_sheet.total_liabilities = dec!(250_000);
    s.balance_sheet.shareholders_equity = dec!(350_000);
    vec![s]
}

#[test]
fn result_keys_are_camel_case_with_type_rename() {
    let results = analyze_all(&single_statement(), &Company::default(), None, None);
    let current_ratio = results.iter().find(|r| r.id == "current-ratio").unwrap();

    let value = serde_json::to_value(current_ratio).unwrap();
    let map = value.as_object().unwrap();

    assert!(map.contains_key("currentValue"));
    assert!(map.contains_key("type"));
    assert!(!map.contains_key("kind"));
    assert!(!map.contains_key("current_value"));
    assert_eq!(map["category"], "liquidity");
    assert_eq!(map["status"], "completed");
}

#[test]
fn ratings_and_statuses_serialize_lowercase() {
    let results = analyze_all(&single_statement(), &Company::default(), None, None);
    let value = serde_json::to_value(&results).unwrap();

    for result in value.as_array().unwrap() {
        let rating = result["rating"].as_str().unwrap();
        assert!(
            matches!(rating, "poor" | "average" | "good" | "excellent"),
            "unexpected rating {}",
            rating
        );
        let status = result["status"].as_str().unwrap();
        assert!(matches!(status, "completed" | "error"));
    }
}

#[test]
fn absent_benchmark_blocks_are_omitted_not_null() {
    let results = analyze_all(&single_statement(), &Company::default(), None, None);
    let current_ratio = results.iter().find(|r| r.id == "current-ratio").unwrap();

    let value = serde_json::to_value(current_ratio).unwrap();
    let map = value.as_object().unwrap();
    assert!(!map.contains_key("industryBenchmark"));
    assert!(!map.contains_key("benchmarkComparison"));
}

#[test]
fn values_serialize_as_json_numbers() {
    let results = analyze_all(&single_statement(), &Company::default(), None, None);
    let current_ratio = results.iter().find(|r| r.id == "current-ratio").unwrap();

    let value = serde_json::to_value(current_ratio).unwrap();
    assert!(value["currentValue"].is_number());
    for (_, v) in value["calculation"]["variables"].as_object().unwrap() {
        assert!(v.is_number());
    }
}

#[test]
fn results_deserialize_back_into_the_result_type() {
    let results = analyze_all(&single_statement(), &Company::default(), None, None);
    let json = serde_json::to_string(&results).unwrap();
    let back: Vec<AnalysisResult> = serde_json::from_str(&json).unwrap();

    // Float transport may round the last digits of long quotients, so
    // compare everything except the Decimal payloads exactly.
    assert_eq!(results.len(), back.len());
    for (a, b) in results.iter().zip(&back) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.rating, b.rating);
        assert_eq!(a.status, b.status);
        assert_eq!(a.interpretation, b.interpretation);
        assert!((a.current_value - b.current_value).abs() < dec!(0.000001));
    }
}

#[test]
fn batch_error_serializes_with_error_category() {
    let results = analyze_all(&[], &Company::default(), None, None);
    assert_eq!(results.len(), registry().len());

    let value = serde_json::to_value(&results).unwrap();
    let first = &value.as_array().unwrap()[0];
    assert_eq!(first["id"], "liquidity-error");
    assert_eq!(first["category"], "error");
    assert_eq!(first["type"], "error");
    assert_eq!(first["status"], "error");
    assert_eq!(first["rating"], "poor");
    assert_eq!(first["currentValue"], Value::from(0.0));
}
