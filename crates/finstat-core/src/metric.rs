//! Declarative metric tables and the single generic evaluator that turns a
//! table row plus statement history into an `AnalysisResult`.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::benchmark;
use crate::error::{MetricError, MetricResult};
use crate::fields::Field;
use crate::insight::{self, Rule};
use crate::rating::RatingScale;
use crate::result::{AnalysisResult, Calculation, Status};
use crate::types::{
    BenchmarkData, Company, FinancialStatement, MarketData, DEFAULT_SHARES_OUTSTANDING,
};

// ---------------------------------------------------------------------------
// Evaluation context
// ---------------------------------------------------------------------------

/// Borrowed view of everything a metric may read. Statements are ordered
/// oldest first and guaranteed non-empty by the analyzer.
pub struct MetricContext<'a> {
    pub statements: &'a [FinancialStatement],
    pub company: &'a Company,
    pub market: Option<&'a MarketData>,
    pub benchmark: Option<&'a BenchmarkData>,
}

impl<'a> MetricContext<'a> {
    pub fn latest(&self) -> &'a FinancialStatement {
        &self.statements[self.statements.len() - 1]
    }

    pub fn previous(&self) -> MetricResult<&'a FinancialStatement> {
        if self.statements.len() < 2 {
            return Err(MetricError::InsufficientHistory(
                "two periods required".to_string(),
            ));
        }
        Ok(&self.statements[self.statements.len() - 2])
    }

    /// Extract one line across the full history, oldest first.
    pub fn series(&self, line: fn(&FinancialStatement) -> Decimal) -> Vec<Decimal> {
        self.statements.iter().map(line).collect()
    }

    pub fn market(&self) -> MetricResult<&'a MarketData> {
        self.market
            .ok_or_else(|| MetricError::MissingMarketData("market data required".to_string()))
    }

    /// Positive share price, erroring when market data is absent or the
    /// price is zero.
    pub fn stock_price(&self) -> MetricResult<Decimal> {
        let price = self.market()?.stock_price;
        if price.is_zero() {
            return Err(MetricError::MissingMarketData("stock price".to_string()));
        }
        Ok(price)
    }

    /// Share count from the latest balance sheet, with the documented
    /// fallback when none is reported.
    pub fn shares_outstanding(&self) -> Decimal {
        let shares = self.latest().balance_sheet.shares_outstanding;
        if shares.is_zero() {
            DEFAULT_SHARES_OUTSTANDING
        } else {
            shares
        }
    }
}

// ---------------------------------------------------------------------------
// Metric table row
// ---------------------------------------------------------------------------

/// Transient calculator output before packaging.
pub struct RawMetric {
    pub value: Decimal,
    pub variables: Vec<(&'static str, Decimal)>,
}

pub type ComputeFn = fn(&MetricContext<'_>) -> MetricResult<RawMetric>;

/// One row of a domain's metric table. Rows are static data; the evaluator
/// is the only code path that runs them.
#[derive(Debug)]
pub struct MetricSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: &'static str,
    pub formula: &'static str,
    /// Key into the benchmark map, normally the metric id.
    pub benchmark_key: &'static str,
    pub min_periods: usize,
    /// Statement lines that must be non-zero on the latest period.
    pub guards: &'static [Field],
    pub compute: ComputeFn,
    pub scale: RatingScale,
    pub insights: &'static [Rule],
    pub recommendations: &'static [Rule],
    /// Template with `{value}` and `{variable label}` placeholders.
    pub interpretation: &'static str,
    /// Value-dependent interpretation override (Altman zones).
    pub interpret: Option<fn(Decimal) -> String>,
}

/// Division guard for denominators derived inside compute functions.
pub fn guard_nonzero(value: Decimal, context: &str) -> MetricResult<Decimal> {
    if value.is_zero() {
        return Err(MetricError::ZeroDenominator {
            context: context.to_string(),
        });
    }
    Ok(value)
}

pub fn format_value(value: Decimal) -> String {
    format!("{:.2}", value)
}

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// Evaluate one table row. Never fails: every error folds into the
/// standardized error result for this metric.
pub fn evaluate(spec: &MetricSpec, category: &str, ctx: &MetricContext<'_>) -> AnalysisResult {
    if ctx.statements.len() < spec.min_periods {
        tracing::debug!(
            metric = spec.id,
            required = spec.min_periods,
            available = ctx.statements.len(),
            "insufficient history"
        );
        return AnalysisResult::error(spec.id, spec.name);
    }

    let latest = ctx.latest();
    for field in spec.guards {
        if field.value(latest).is_zero() {
            tracing::debug!(metric = spec.id, field = field.label(), "zero guard field");
            return AnalysisResult::error(spec.id, spec.name);
        }
    }

    let raw = match (spec.compute)(ctx) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!(metric = spec.id, error = %e, "metric computation failed");
            return AnalysisResult::error(spec.id, spec.name);
        }
    };

    let rating = spec.scale.rate(raw.value);
    let interpretation = match spec.interpret {
        Some(f) => f(raw.value),
        None => render(spec.interpretation, raw.value, &raw.variables),
    };

    let entry = ctx.benchmark.and_then(|b| b.get(spec.benchmark_key));

    AnalysisResult {
        id: spec.id.to_string(),
        name: spec.name.to_string(),
        category: category.to_string(),
        kind: spec.kind.to_string(),
        current_value: raw.value,
        rating,
        interpretation,
        calculation: Calculation {
            formula: spec.formula.to_string(),
            variables: raw
                .variables
                .iter()
                .map(|(k, v)| (k.to_string(), *v))
                .collect::<BTreeMap<_, _>>(),
        },
        insights: insight::apply(spec.insights, raw.value),
        recommendations: insight::apply(spec.recommendations, raw.value),
        industry_benchmark: entry.map(benchmark::industry_benchmark),
        benchmark_comparison: entry.map(|e| benchmark::compare(raw.value, e)),
        status: Status::Completed,
    }
}

/// Substitute `{value}` and `{variable label}` placeholders, both rendered
/// to two decimal places.
fn render(template: &str, value: Decimal, variables: &[(&'static str, Decimal)]) -> String {
    let mut out = template.replace("{value}", &format_value(value));
    for (label, v) in variables {
        let placeholder = format!("{{{}}}", label);
        if out.contains(&placeholder) {
            out = out.replace(&placeholder, &format_value(*v));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn guard_nonzero_flags_context() {
        let err = guard_nonzero(Decimal::ZERO, "رأس المال المستثمر").unwrap_err();
        assert_eq!(
            err,
            MetricError::ZeroDenominator {
                context: "رأس المال المستثمر".to_string()
            }
        );
        assert_eq!(guard_nonzero(dec!(5), "x").unwrap(), dec!(5));
    }

    #[test]
    fn render_substitutes_value_and_variables() {
        let s = render(
            "النسبة {value} أي كل {أيام} يوم",
            dec!(6.5),
            &[("أيام", dec!(56.1538))],
        );
        assert_eq!(s, "النسبة 6.50 أي كل 56.15 يوم");
    }

    #[test]
    fn shares_fall_back_to_documented_default() {
        let statements = vec![FinancialStatement::default()];
        let company = Company::default();
        let ctx = MetricContext {
            statements: &statements,
            company: &company,
            market: None,
            benchmark: None,
        };
        assert_eq!(ctx.shares_outstanding(), dec!(1_000_000));
        assert!(ctx.stock_price().is_err());
        assert!(ctx.previous().is_err());
    }
}
