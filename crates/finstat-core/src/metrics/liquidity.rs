//! Liquidity ratios: short-term solvency of the latest period.

use rust_decimal_macros::dec;

use crate::analyzer::DomainAnalyzer;
use crate::error::MetricResult;
use crate::fields::Field;
use crate::insight::{Condition, Rule};
use crate::metric::{MetricContext, MetricSpec, RawMetric};
use crate::rating::RatingScale;

pub static LIQUIDITY: DomainAnalyzer = DomainAnalyzer {
    domain: "liquidity",
    category: "liquidity",
    error_id: "liquidity-error",
    error_name: "خطأ في تحليل السيولة",
    metrics: &[
        MetricSpec {
            id: "current-ratio",
            name: "النسبة الجارية",
            kind: "ratio",
            formula: "الأصول المتداولة ÷ الالتزامات المتداولة",
            benchmark_key: "currentRatio",
            min_periods: 1,
            guards: &[Field::CurrentLiabilities],
            compute: current_ratio,
            scale: RatingScale::AtLeast {
                excellent: dec!(2.5),
                good: dec!(1.5),
                average: dec!(1.0),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(2)),
                    text: "سيولة ممتازة تدل على قدرة عالية على الوفاء بالالتزامات قصيرة الأجل",
                },
                Rule {
                    when: Condition::LessThan(dec!(1)),
                    text: "سيولة ضعيفة قد تشير لمشاكل في الوفاء بالالتزامات",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(3)),
                    text: "سيولة عالية جداً قد تشير لاستثمارات زائدة في الأصول المتداولة",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(1.5)),
                    text: "تحسين السيولة من خلال زيادة الأصول المتداولة أو تقليل الالتزامات",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(2.5)),
                    text: "مراجعة كفاءة استخدام الأصول المتداولة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات النسبة الجارية عبر الزمن",
                },
            ],
            interpretation: "النسبة الجارية {value} تعني أن الشركة تملك {value} ريال من الأصول المتداولة لكل ريال من الالتزامات المتداولة",
            interpret: None,
        },
        MetricSpec {
            id: "quick-ratio",
            name: "النسبة السريعة",
            kind: "ratio",
            formula: "(الأصول المتداولة - المخزون) ÷ الالتزامات المتداولة",
            benchmark_key: "quickRatio",
            min_periods: 1,
            guards: &[Field::CurrentLiabilities],
            compute: quick_ratio,
            scale: RatingScale::AtLeast {
                excellent: dec!(1.5),
                good: dec!(1.0),
                average: dec!(0.5),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(1.5)),
                    text: "سيولة سريعة ممتازة تدل على قدرة عالية على الوفاء بالالتزامات",
                },
                Rule {
                    when: Condition::LessThan(dec!(0.5)),
                    text: "سيولة سريعة ضعيفة قد تشير لمشاكل في الوفاء بالالتزامات",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(2)),
                    text: "سيولة سريعة عالية جداً قد تشير لاستثمارات زائدة",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(1)),
                    text: "تحسين السيولة السريعة من خلال زيادة الأصول السريعة",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(1.8)),
                    text: "مراجعة كفاءة استخدام الأصول السريعة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات النسبة السريعة عبر الزمن",
                },
            ],
            interpretation: "النسبة السريعة {value} تعني أن الشركة تملك {value} ريال من الأصول السريعة لكل ريال من الالتزامات المتداولة",
            interpret: None,
        },
        MetricSpec {
            id: "cash-ratio",
            name: "نسبة النقد",
            kind: "ratio",
            formula: "(النقدية + الأوراق المالية قصيرة الأجل) ÷ الالتزامات المتداولة",
            benchmark_key: "cashRatio",
            min_periods: 1,
            guards: &[Field::CurrentLiabilities],
            compute: cash_ratio,
            scale: RatingScale::AtLeast {
                excellent: dec!(0.3),
                good: dec!(0.2),
                average: dec!(0.1),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(0.3)),
                    text: "سيولة نقدية ممتازة تدل على قدرة عالية على الوفاء بالالتزامات",
                },
                Rule {
                    when: Condition::LessThan(dec!(0.1)),
                    text: "سيولة نقدية ضعيفة قد تشير لمشاكل في الوفاء بالالتزامات",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(0.5)),
                    text: "سيولة نقدية عالية جداً قد تشير لاستثمارات زائدة",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(0.2)),
                    text: "تحسين السيولة النقدية من خلال زيادة النقدية والأوراق المالية",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(0.4)),
                    text: "مراجعة كفاءة استخدام النقدية والأوراق المالية",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات نسبة النقد عبر الزمن",
                },
            ],
            interpretation: "نسبة النقد {value} تعني أن الشركة تملك {value} ريال من النقدية والأوراق المالية لكل ريال من الالتزامات المتداولة",
            interpret: None,
        },
        MetricSpec {
            id: "operating-cash-flow-ratio",
            name: "نسبة التدفقات النقدية التشغيلية",
            kind: "ratio",
            formula: "التدفق النقدي التشغيلي ÷ الالتزامات المتداولة",
            benchmark_key: "operatingCashFlowRatio",
            min_periods: 1,
            guards: &[Field::CurrentLiabilities],
            compute: operating_cash_flow_ratio,
            scale: RatingScale::AtLeast {
                excellent: dec!(0.5),
                good: dec!(0.3),
                average: dec!(0.1),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(0.5)),
                    text: "تدفق نقدي تشغيلي ممتاز يدل على قدرة عالية على توليد النقدية",
                },
                Rule {
                    when: Condition::LessThan(dec!(0.2)),
                    text: "تدفق نقدي تشغيلي ضعيف قد يشير لمشاكل في العمليات",
                },
                Rule {
                    when: Condition::LessThan(dec!(0)),
                    text: "تدفق نقدي تشغيلي سلبي يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(0.3)),
                    text: "تحسين التدفق النقدي التشغيلي من خلال تحسين العمليات",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(0.8)),
                    text: "مراجعة كفاءة استخدام التدفق النقدي التشغيلي",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات نسبة التدفق النقدي التشغيلي عبر الزمن",
                },
            ],
            interpretation: "نسبة التدفق النقدي التشغيلي {value} تعني أن الشركة تولد {value} ريال من التدفق النقدي التشغيلي لكل ريال من الالتزامات المتداولة",
            interpret: None,
        },
        MetricSpec {
            id: "working-capital-ratio",
            name: "نسبة رأس المال العامل",
            kind: "ratio",
            formula: "(الأصول المتداولة - الالتزامات المتداولة) ÷ إجمالي الأصول",
            benchmark_key: "workingCapitalRatio",
            min_periods: 1,
            guards: &[Field::TotalAssets],
            compute: working_capital_ratio,
            scale: RatingScale::AtLeast {
                excellent: dec!(0.2),
                good: dec!(0.15),
                average: dec!(0.1),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(0.2)),
                    text: "رأس مال عامل ممتاز يدل على قوة مالية جيدة",
                },
                Rule {
                    when: Condition::LessThan(dec!(0.1)),
                    text: "رأس مال عامل ضعيف قد يشير لمشاكل في السيولة",
                },
                Rule {
                    when: Condition::LessThan(dec!(0)),
                    text: "رأس مال عامل سلبي يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(0.15)),
                    text: "تحسين رأس المال العامل من خلال زيادة الأصول المتداولة أو تقليل الالتزامات",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(0.3)),
                    text: "مراجعة كفاءة استخدام رأس المال العامل",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات نسبة رأس المال العامل عبر الزمن",
                },
            ],
            interpretation: "نسبة رأس المال العامل {value} تعني أن رأس المال العامل يمثل {value} من كل ريال من إجمالي الأصول",
            interpret: None,
        },
    ],
};

fn current_ratio(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let b = &ctx.latest().balance_sheet;
    Ok(RawMetric {
        value: b.current_assets / b.current_liabilities,
        variables: vec![
            ("الأصول المتداولة", b.current_assets),
            ("الالتزامات المتداولة", b.current_liabilities),
        ],
    })
}

fn quick_ratio(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let b = &ctx.latest().balance_sheet;
    let quick_assets = b.current_assets - b.inventory;
    Ok(RawMetric {
        value: quick_assets / b.current_liabilities,
        variables: vec![
            ("الأصول المتداولة", b.current_assets),
            ("المخزون", b.inventory),
            ("الأصول السريعة", quick_assets),
            ("الالتزامات المتداولة", b.current_liabilities),
        ],
    })
}

fn cash_ratio(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let b = &ctx.latest().balance_sheet;
    let cash_and_equivalents = b.cash + b.marketable_securities;
    Ok(RawMetric {
        value: cash_and_equivalents / b.current_liabilities,
        variables: vec![
            ("النقدية", b.cash),
            ("الأوراق المالية قصيرة الأجل", b.marketable_securities),
            ("النقدية والأوراق المالية", cash_and_equivalents),
            ("الالتزامات المتداولة", b.current_liabilities),
        ],
    })
}

fn operating_cash_flow_ratio(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let statement = ctx.latest();
    let ocf = statement.operating_cash_flow();
    let cl = statement.balance_sheet.current_liabilities;
    Ok(RawMetric {
        value: ocf / cl,
        variables: vec![
            ("التدفق النقدي التشغيلي", ocf),
            ("الالتزامات المتداولة", cl),
        ],
    })
}

fn working_capital_ratio(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let b = &ctx.latest().balance_sheet;
    let working_capital = b.working_capital();
    Ok(RawMetric {
        value: working_capital / b.total_assets,
        variables: vec![
            ("الأصول المتداولة", b.current_assets),
            ("الالتزامات المتداولة", b.current_liabilities),
            ("رأس المال العامل", working_capital),
            ("إجمالي الأصول", b.total_assets),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::result::{Rating, Status};
    use crate::types::{CashFlowStatement, Company, FinancialStatement};
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn sample_statement() -> FinancialStatement {
        let mut s = FinancialStatement::default();
        s.year = 2023;
        s.balance_sheet.current_assets = dec!(200);
        s.balance_sheet.current_liabilities = dec!(100);
        s.balance_sheet.inventory = dec!(50);
        s.balance_sheet.cash = dec!(20);
        s.balance_sheet.marketable_securities = dec!(10);
        s.balance_sheet.total_assets = dec!(500);
        s.cash_flow_statement = Some(CashFlowStatement {
            operating_cash_flow: dec!(40),
            ..Default::default()
        });
        s
    }

    #[test]
    fn current_ratio_of_two_rates_good() {
        let statements = vec![sample_statement()];
        let results = LIQUIDITY.analyze(&statements, &Company::default(), None, None);
        assert_eq!(results.len(), 5);

        let cr = &results[0];
        assert_eq!(cr.id, "current-ratio");
        assert_eq!(cr.current_value, dec!(2));
        assert_eq!(cr.rating, Rating::Good);
        assert_eq!(cr.status, Status::Completed);
        assert_eq!(cr.calculation.variables["الأصول المتداولة"], dec!(200));
        assert_eq!(
            cr.recommendations,
            vec!["مراقبة اتجاهات النسبة الجارية عبر الزمن".to_string()]
        );
    }

    #[test]
    fn quick_and_cash_ratios() {
        let statements = vec![sample_statement()];
        let results = LIQUIDITY.analyze(&statements, &Company::default(), None, None);

        let quick = &results[1];
        assert_eq!(quick.current_value, dec!(1.5));
        assert_eq!(quick.rating, Rating::Excellent);

        let cash = &results[2];
        assert_eq!(cash.current_value, dec!(0.3));
        assert_eq!(cash.rating, Rating::Excellent);
        // 0.3 is not strictly above 0.3, so no insight fires
        assert!(cash.insights.is_empty());
    }

    #[test]
    fn zero_current_liabilities_degrades_to_error_results() {
        let mut s = sample_statement();
        s.balance_sheet.current_liabilities = Decimal::ZERO;
        let results = LIQUIDITY.analyze(&[s], &Company::default(), None, None);

        let cr = &results[0];
        assert_eq!(cr.status, Status::Error);
        assert_eq!(cr.category, "error");
        assert_eq!(cr.current_value, Decimal::ZERO);
        assert_eq!(cr.interpretation, "خطأ في حساب التحليل");

        // working-capital-ratio guards total assets, not current liabilities
        let wc = &results[4];
        assert_eq!(wc.status, Status::Completed);
        assert_eq!(wc.current_value, dec!(0.4));
    }

    #[test]
    fn missing_cash_flow_statement_scores_zero() {
        let mut s = sample_statement();
        s.cash_flow_statement = None;
        let results = LIQUIDITY.analyze(&[s], &Company::default(), None, None);

        let ocf = &results[3];
        assert_eq!(ocf.status, Status::Completed);
        assert_eq!(ocf.current_value, Decimal::ZERO);
        assert_eq!(ocf.rating, Rating::Poor);
    }

    #[test]
    fn empty_history_yields_single_batch_error() {
        let results = LIQUIDITY.analyze(&[], &Company::default(), None, None);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "liquidity-error");
        assert_eq!(results[0].name, "خطأ في تحليل السيولة");
        assert_eq!(results[0].status, Status::Error);
    }
}
