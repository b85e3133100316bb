//! Analyzer boundary: the one generic, table-driven analyzer plus the
//! registry of enabled domains.

use std::panic::{self, AssertUnwindSafe};

use crate::metric::{self, MetricContext, MetricSpec};
use crate::result::AnalysisResult;
use crate::types::{BenchmarkData, Company, FinancialStatement, MarketData, BALANCE_EPSILON};

/// A batch of related metrics. Implementations never panic outward and
/// never return an empty batch: expected failures degrade individual rows,
/// while an unexpected panic collapses the batch to its single domain
/// error result.
pub trait Analyzer: Sync {
    fn domain(&self) -> &'static str;

    fn analyze(
        &self,
        statements: &[FinancialStatement],
        company: &Company,
        market: Option<&MarketData>,
        benchmark: Option<&BenchmarkData>,
    ) -> Vec<AnalysisResult>;
}

/// The single analyzer implementation. Concrete domains are static metric
/// tables, not separate types.
#[derive(Debug)]
pub struct DomainAnalyzer {
    pub domain: &'static str,
    pub category: &'static str,
    pub error_id: &'static str,
    pub error_name: &'static str,
    pub metrics: &'static [MetricSpec],
}

impl Analyzer for DomainAnalyzer {
    fn domain(&self) -> &'static str {
        self.domain
    }

    fn analyze(
        &self,
        statements: &[FinancialStatement],
        company: &Company,
        market: Option<&MarketData>,
        benchmark: Option<&BenchmarkData>,
    ) -> Vec<AnalysisResult> {
        if statements.is_empty() {
            tracing::warn!(domain = self.domain, "no statement history supplied");
            return vec![AnalysisResult::error(self.error_id, self.error_name)];
        }

        let ctx = MetricContext {
            statements,
            company,
            market,
            benchmark,
        };

        // Expected failures are MetricError values the evaluator folds into
        // per-row error results. A panic means the batch itself cannot be
        // trusted: discard any partial rows and return the domain error.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.metrics
                .iter()
                .map(|spec| metric::evaluate(spec, self.category, &ctx))
                .collect::<Vec<_>>()
        }));
        match outcome {
            Ok(results) => results,
            Err(_) => {
                tracing::error!(domain = self.domain, "analysis panicked");
                vec![AnalysisResult::error(self.error_id, self.error_name)]
            }
        }
    }
}

/// Enabled analyzers, in fixed declaration order.
pub fn registry() -> Vec<&'static DomainAnalyzer> {
    #[allow(unused_mut)]
    let mut analyzers: Vec<&'static DomainAnalyzer> = Vec::new();
    #[cfg(feature = "liquidity")]
    analyzers.push(&crate::metrics::liquidity::LIQUIDITY);
    #[cfg(feature = "profitability")]
    analyzers.push(&crate::metrics::profitability::PROFITABILITY);
    #[cfg(feature = "leverage")]
    analyzers.push(&crate::metrics::leverage::LEVERAGE);
    #[cfg(feature = "activity")]
    analyzers.push(&crate::metrics::activity::ACTIVITY);
    #[cfg(feature = "growth")]
    analyzers.push(&crate::metrics::growth::GROWTH);
    #[cfg(feature = "market")]
    analyzers.push(&crate::metrics::market::MARKET);
    #[cfg(feature = "risk")]
    analyzers.push(&crate::metrics::risk::RISK);
    #[cfg(feature = "structure")]
    analyzers.push(&crate::metrics::structure::STRUCTURE);
    #[cfg(feature = "stability")]
    analyzers.push(&crate::metrics::stability::STABILITY);
    #[cfg(feature = "stability")]
    analyzers.push(&crate::metrics::stability::PERFORMANCE);
    #[cfg(feature = "composite")]
    analyzers.push(&crate::metrics::composite::COMPREHENSIVE);
    #[cfg(feature = "composite")]
    analyzers.push(&crate::metrics::composite::ULTIMATE);
    analyzers
}

/// Run every enabled analyzer and concatenate the batches in registry order.
pub fn analyze_all(
    statements: &[FinancialStatement],
    company: &Company,
    market: Option<&MarketData>,
    benchmark: Option<&BenchmarkData>,
) -> Vec<AnalysisResult> {
    for statement in statements {
        let gap = statement.balance_gap();
        if gap > BALANCE_EPSILON {
            tracing::warn!(year = statement.year, gap = %gap, "balance sheet identity gap");
        }
    }

    registry()
        .iter()
        .flat_map(|a| a.analyze(statements, company, market, benchmark))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetricResult;
    use crate::metric::RawMetric;
    use crate::rating::RatingScale;
    use crate::result::Status;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn unit_value(_: &MetricContext<'_>) -> MetricResult<RawMetric> {
        Ok(RawMetric {
            value: dec!(1),
            variables: vec![],
        })
    }

    fn exploding(_: &MetricContext<'_>) -> MetricResult<RawMetric> {
        panic!("arithmetic overflow");
    }

    const PLAIN_SCALE: RatingScale = RatingScale::AtLeast {
        excellent: dec!(3),
        good: dec!(2),
        average: dec!(1),
    };

    const fn row(id: &'static str, compute: metric::ComputeFn) -> MetricSpec {
        MetricSpec {
            id,
            name: "صف تجريبي",
            kind: "ratio",
            formula: "x",
            benchmark_key: id,
            min_periods: 1,
            guards: &[],
            compute,
            scale: PLAIN_SCALE,
            insights: &[],
            recommendations: &[],
            interpretation: "قيمة {value}",
            interpret: None,
        }
    }

    static STEADY: DomainAnalyzer = DomainAnalyzer {
        domain: "demo",
        category: "demo",
        error_id: "demo-error",
        error_name: "خطأ في التحليل التجريبي",
        metrics: &[row("first", unit_value), row("second", unit_value)],
    };

    static UNSTABLE: DomainAnalyzer = DomainAnalyzer {
        domain: "demo",
        category: "demo",
        error_id: "demo-error",
        error_name: "خطأ في التحليل التجريبي",
        metrics: &[row("first", unit_value), row("second", exploding)],
    };

    #[test]
    fn steady_rows_all_complete() {
        let s = crate::types::FinancialStatement::default();
        let results = STEADY.analyze(&[s], &Company::default(), None, None);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.status == Status::Completed));
    }

    #[test]
    fn a_panicking_row_fails_the_whole_batch() {
        let s = crate::types::FinancialStatement::default();
        let results = UNSTABLE.analyze(&[s], &Company::default(), None, None);

        // No partial results survive an unexpected panic.
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "demo-error");
        assert_eq!(results[0].name, "خطأ في التحليل التجريبي");
        assert_eq!(results[0].category, "error");
        assert_eq!(results[0].status, Status::Error);
    }
}
