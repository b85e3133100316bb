use finstat_core::result::{Rating, Status};
use finstat_core::types::{
    BenchmarkData, BenchmarkEntry, CashFlowStatement, Company, Competitor, FinancialStatement,
    MarketData,
};
use finstat_core::{analyze_all, registry};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Full pipeline tests across every enabled domain
// ===========================================================================

fn statement(year: i32, scale: Decimal) -> FinancialStatement {
    let mut s = FinancialStatement::default();
    s.year = year;
    s.income_statement.revenue = dec!(800_000) * scale;
    s.income_statement.cost_of_goods_sold = dec!(480_000) * scale;
    s.income_statement.operating_expenses = dec!(200_000) * scale;
    s.income_statement.operating_income = dec!(120_000) * scale;
    s.income_statement.net_income = dec!(60_000) * scale;
    s.income_statement.interest_expense = dec!(10_000) * scale;
    s.income_statement.depreciation = dec!(20_000) * scale;
    s.income_statement.amortization = dec!(5_000) * scale;

    s.balance_sheet.total_assets = dec!(900_000) * scale;
    s.balance_sheet.current_assets = dec!(300_000) * scale;
    s.balance_sheet.current_liabilities = dec!(150_000) * scale;
    s.balance_sheet.cash = dec!(50_000) * scale;
    s.balance_sheet.marketable_securities = dec!(20_000) * scale;
    s.balance_sheet.inventory = dec!(80_000) * scale;
    s.balance_sheet.accounts_receivable = dec!(60_000) * scale;
    s.balance_sheet.accounts_payable = dec!(40_000) * scale;
    s.balance_sheet.fixed_assets = dec!(500_000) * scale;
    s.balance_sheet.long_term_debt = dec!(150_000) * scale;
    s.balance_sheet.total_liabilities = dec!(300_000) * scale;
    s.balance_sheet.shareholders_equity = dec!(600_000) * scale;
    s.balance_sheet.shares_outstanding = dec!(100_000);
    s.balance_sheet.retained_earnings = dec!(200_000) * scale;

    s.cash_flow_statement = Some(CashFlowStatement {
        operating_cash_flow: dec!(90_000) * scale,
        free_cash_flow: dec!(50_000) * scale,
        ..Default::default()
    });
    s
}

fn history() -> Vec<FinancialStatement> {
    vec![
        statement(2022, Decimal::ONE),
        statement(2023, dec!(1.12)),
        statement(2024, dec!(1.25)),
    ]
}

fn market() -> MarketData {
    MarketData {
        stock_price: dec!(12),
        ..Default::default()
    }
}

#[test]
fn analyze_all_emits_every_metric_once() {
    let m = market();
    let results = analyze_all(&history(), &Company::default(), Some(&m), None);

    let expected: usize = registry().iter().map(|a| a.metrics.len()).sum();
    assert_eq!(results.len(), expected);

    let mut ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), expected, "metric ids must be unique");
}

#[test]
fn results_arrive_in_registry_order() {
    let m = market();
    let results = analyze_all(&history(), &Company::default(), Some(&m), None);

    let mut offset = 0;
    for analyzer in registry() {
        for spec in analyzer.metrics {
            assert_eq!(results[offset].id, spec.id);
            assert_eq!(results[offset].category, analyzer.category);
            offset += 1;
        }
    }
}

#[test]
fn healthy_history_completes_every_row() {
    let m = market();
    let results = analyze_all(&history(), &Company::default(), Some(&m), None);
    for r in &results {
        assert_eq!(r.status, Status::Completed, "{} should complete", r.id);
        assert!(!r.interpretation.is_empty(), "{} needs interpretation", r.id);
        assert!(!r.calculation.formula.is_empty());
    }
}

#[test]
fn analysis_is_deterministic() {
    let m = market();
    let first = analyze_all(&history(), &Company::default(), Some(&m), None);
    let second = analyze_all(&history(), &Company::default(), Some(&m), None);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

// ===========================================================================
// Degraded input: one bad row never takes down the batch
// ===========================================================================

#[test]
fn zero_interest_errors_coverage_row_only() {
    let mut statements = history();
    if let Some(last) = statements.last_mut() {
        last.income_statement.interest_expense = Decimal::ZERO;
    }
    let results = analyze_all(&statements, &Company::default(), None, None);

    let coverage = results.iter().find(|r| r.id == "interest-coverage").unwrap();
    assert_eq!(coverage.status, Status::Error);
    assert_eq!(coverage.rating, Rating::Poor);

    let completed = results
        .iter()
        .filter(|r| r.category == "leverage" && r.status == Status::Completed)
        .count();
    assert!(completed >= 4, "remaining leverage rows should complete");
}

fn domain_metric_ids(domain: &str) -> Vec<&'static str> {
    registry()
        .iter()
        .find(|a| a.domain == domain)
        .unwrap()
        .metrics
        .iter()
        .map(|m| m.id)
        .collect()
}

#[test]
fn missing_market_data_degrades_market_rows_only() {
    let results = analyze_all(&history(), &Company::default(), None, None);

    for id in domain_metric_ids("market") {
        let r = results.iter().find(|r| r.id == id).unwrap();
        assert_eq!(r.status, Status::Error, "{} requires market data", id);
    }
    let liquidity_ok = results
        .iter()
        .filter(|r| r.category == "liquidity" && r.status == Status::Completed)
        .count();
    assert_eq!(liquidity_ok, 5);
}

#[test]
fn empty_history_yields_one_batch_error_per_domain() {
    let results = analyze_all(&[], &Company::default(), None, None);
    let expected_ids = [
        "liquidity-error",
        "profitability-error",
        "leverage-error",
        "activity-error",
        "growth-error",
        "market-error",
        "risk-error",
        "structural-error",
        "stability-error",
        "performance-error",
        "comprehensive-error",
        "ultimate-error",
    ];
    assert_eq!(results.len(), expected_ids.len());
    for (result, id) in results.iter().zip(expected_ids) {
        assert_eq!(result.id, id);
        assert_eq!(result.status, Status::Error);
        assert_eq!(result.interpretation, "خطأ في حساب التحليل");
        assert_eq!(
            result.recommendations,
            vec!["مراجعة البيانات المدخلة".to_string()]
        );
    }
}

#[test]
fn single_period_degrades_history_metrics_only() {
    let m = market();
    let statements = vec![statement(2024, Decimal::ONE)];
    let results = analyze_all(&statements, &Company::default(), Some(&m), None);

    for id in domain_metric_ids("growth") {
        let r = results.iter().find(|r| r.id == id).unwrap();
        assert_eq!(r.status, Status::Error, "{} needs two periods", id);
    }
    let trend = results.iter().find(|r| r.id == "trend-analysis").unwrap();
    assert_eq!(trend.status, Status::Error);

    let vertical = results.iter().find(|r| r.id == "vertical-analysis").unwrap();
    assert_eq!(vertical.status, Status::Completed);
}

// ===========================================================================
// Benchmark comparison
// ===========================================================================

fn benchmark_with_current_ratio() -> BenchmarkData {
    let mut data = BenchmarkData::new();
    data.insert(
        "currentRatio".to_string(),
        BenchmarkEntry {
            average: dec!(1.5),
            percentile: None,
            competitors: vec![
                Competitor {
                    name: "منافس أ".to_string(),
                    value: dec!(1.2),
                },
                Competitor {
                    name: "منافس ب".to_string(),
                    value: dec!(2.4),
                },
            ],
        },
    );
    data
}

#[test]
fn benchmark_entry_attaches_comparison_blocks() {
    let benchmark = benchmark_with_current_ratio();
    let results = analyze_all(&history(), &Company::default(), None, Some(&benchmark));

    let current_ratio = results.iter().find(|r| r.id == "current-ratio").unwrap();
    // CA 375k / CL 187.5k = 2.0
    assert_eq!(current_ratio.current_value, dec!(2));

    let industry = current_ratio.industry_benchmark.as_ref().unwrap();
    assert_eq!(industry.value, dec!(1.5));
    assert_eq!(industry.source, "معايير الصناعة");
    assert_eq!(industry.period, "السنة الحالية");

    let comparison = current_ratio.benchmark_comparison.as_ref().unwrap();
    assert_eq!(comparison.industry_average, dec!(1.5));
    assert_eq!(comparison.industry_gap, dec!(0.5));
    assert_eq!(comparison.position, "أعلى من متوسط الصناعة");
    // Outperforms one of two competitors.
    assert_eq!(comparison.percentile, dec!(50));
    assert_eq!(comparison.best_in_class, Some(dec!(2.4)));
    // Trails the leading competitor by 0.4.
    assert_eq!(comparison.best_in_class_gap, Some(dec!(0.4)));

    let quick_ratio = results.iter().find(|r| r.id == "quick-ratio").unwrap();
    assert!(quick_ratio.benchmark_comparison.is_none());
}
