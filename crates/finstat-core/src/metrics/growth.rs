//! Year-over-year growth rates. Every row needs at least two periods and a
//! non-zero prior value; each also reports the compound annual growth rate
//! over the full history as an audit variable.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::analyzer::DomainAnalyzer;
use crate::error::MetricResult;
use crate::insight::{Condition, Rule};
use crate::metric::{guard_nonzero, MetricContext, MetricSpec, RawMetric};
use crate::rating::RatingScale;
use crate::stats;
use crate::types::FinancialStatement;

const GROWTH_SCALE: RatingScale = RatingScale::AtLeast {
    excellent: dec!(20),
    good: dec!(10),
    average: dec!(5),
};

pub static GROWTH: DomainAnalyzer = DomainAnalyzer {
    domain: "growth",
    category: "growth",
    error_id: "growth-error",
    error_name: "خطأ في تحليل النمو",
    metrics: &[
        MetricSpec {
            id: "revenue-growth",
            name: "معدل نمو الإيرادات",
            kind: "percentage",
            formula: "((الإيرادات الحالية - الإيرادات السابقة) ÷ الإيرادات السابقة) × 100",
            benchmark_key: "revenueGrowth",
            min_periods: 2,
            guards: &[],
            compute: revenue_growth,
            scale: GROWTH_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(20)),
                    text: "نمو ممتاز في الإيرادات يدل على توسع قوي في الأعمال",
                },
                Rule {
                    when: Condition::LessThan(dec!(5)),
                    text: "نمو بطيء في الإيرادات قد يشير لمشاكل في السوق أو المنافسة",
                },
                Rule {
                    when: Condition::LessThan(dec!(0)),
                    text: "تراجع في الإيرادات يتطلب مراجعة فورية للاستراتيجية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(10)),
                    text: "تحسين استراتيجية المبيعات والتسويق لزيادة النمو",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(30)),
                    text: "التأكد من استدامة النمو العالي ومراقبة الجودة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات نمو الإيرادات عبر الزمن",
                },
            ],
            interpretation: "معدل نمو الإيرادات {value}% يعكس نمو الإيرادات من {الإيرادات السابقة} إلى {الإيرادات الحالية}",
            interpret: None,
        },
        MetricSpec {
            id: "profit-growth",
            name: "معدل نمو الأرباح",
            kind: "percentage",
            formula: "((الأرباح الحالية - الأرباح السابقة) ÷ الأرباح السابقة) × 100",
            benchmark_key: "profitGrowth",
            min_periods: 2,
            guards: &[],
            compute: profit_growth,
            scale: GROWTH_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(25)),
                    text: "نمو ممتاز في الأرباح يدل على كفاءة عالية في العمليات",
                },
                Rule {
                    when: Condition::LessThan(dec!(10)),
                    text: "نمو بطيء في الأرباح قد يشير لمشاكل في الكفاءة",
                },
                Rule {
                    when: Condition::LessThan(dec!(0)),
                    text: "تراجع في الأرباح يتطلب مراجعة فورية للعمليات",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(15)),
                    text: "تحسين كفاءة العمليات وتقليل التكاليف لزيادة النمو",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(40)),
                    text: "التأكد من استدامة النمو العالي ومراقبة الجودة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات نمو الأرباح عبر الزمن",
                },
            ],
            interpretation: "معدل نمو الأرباح {value}% يعكس نمو الأرباح من {الأرباح السابقة} إلى {الأرباح الحالية}",
            interpret: None,
        },
        MetricSpec {
            id: "asset-growth",
            name: "معدل نمو الأصول",
            kind: "percentage",
            formula: "((الأصول الحالية - الأصول السابقة) ÷ الأصول السابقة) × 100",
            benchmark_key: "assetGrowth",
            min_periods: 2,
            guards: &[],
            compute: asset_growth,
            scale: GROWTH_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(15)),
                    text: "نمو ممتاز في الأصول يدل على توسع قوي في الاستثمارات",
                },
                Rule {
                    when: Condition::LessThan(dec!(5)),
                    text: "نمو بطيء في الأصول قد يشير لمشاكل في الاستثمار",
                },
                Rule {
                    when: Condition::LessThan(dec!(0)),
                    text: "تراجع في الأصول يتطلب مراجعة فورية للاستراتيجية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(8)),
                    text: "تحسين استراتيجية الاستثمار لزيادة نمو الأصول",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(25)),
                    text: "التأكد من استدامة النمو العالي ومراقبة الكفاءة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات نمو الأصول عبر الزمن",
                },
            ],
            interpretation: "معدل نمو الأصول {value}% يعكس نمو الأصول من {الأصول السابقة} إلى {الأصول الحالية}",
            interpret: None,
        },
        MetricSpec {
            id: "equity-growth",
            name: "معدل نمو حقوق الملكية",
            kind: "percentage",
            formula: "((حقوق الملكية الحالية - حقوق الملكية السابقة) ÷ حقوق الملكية السابقة) × 100",
            benchmark_key: "equityGrowth",
            min_periods: 2,
            guards: &[],
            compute: equity_growth,
            scale: GROWTH_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(20)),
                    text: "نمو ممتاز في حقوق الملكية يدل على قوة مالية جيدة",
                },
                Rule {
                    when: Condition::LessThan(dec!(8)),
                    text: "نمو بطيء في حقوق الملكية قد يشير لمشاكل في الربحية",
                },
                Rule {
                    when: Condition::LessThan(dec!(0)),
                    text: "تراجع في حقوق الملكية يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(12)),
                    text: "تحسين الربحية وتقليل التوزيعات لزيادة نمو حقوق الملكية",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(30)),
                    text: "التأكد من استدامة النمو العالي ومراقبة الكفاءة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات نمو حقوق الملكية عبر الزمن",
                },
            ],
            interpretation: "معدل نمو حقوق الملكية {value}% يعكس نمو حقوق الملكية من {حقوق الملكية السابقة} إلى {حقوق الملكية الحالية}",
            interpret: None,
        },
        MetricSpec {
            id: "cash-flow-growth",
            name: "معدل نمو التدفق النقدي",
            kind: "percentage",
            formula: "((التدفق النقدي الحالي - التدفق النقدي السابق) ÷ التدفق النقدي السابق) × 100",
            benchmark_key: "cashFlowGrowth",
            min_periods: 2,
            guards: &[],
            compute: cash_flow_growth,
            scale: GROWTH_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(25)),
                    text: "نمو ممتاز في التدفق النقدي يدل على كفاءة عالية في العمليات",
                },
                Rule {
                    when: Condition::LessThan(dec!(10)),
                    text: "نمو بطيء في التدفق النقدي قد يشير لمشاكل في العمليات",
                },
                Rule {
                    when: Condition::LessThan(dec!(0)),
                    text: "تراجع في التدفق النقدي يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(15)),
                    text: "تحسين كفاءة العمليات وتقليل التكاليف لزيادة النمو",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(40)),
                    text: "التأكد من استدامة النمو العالي ومراقبة الجودة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات نمو التدفق النقدي عبر الزمن",
                },
            ],
            interpretation: "معدل نمو التدفق النقدي {value}% يعكس نمو التدفق النقدي من {التدفق النقدي السابق} إلى {التدفق النقدي الحالي}",
            interpret: None,
        },
    ],
};

struct GrowthLabels {
    current: &'static str,
    previous: &'static str,
}

/// Shared growth computation: YoY change on one line plus the compound
/// rate over the whole history.
fn growth_metric(
    ctx: &MetricContext<'_>,
    line: fn(&FinancialStatement) -> Decimal,
    labels: GrowthLabels,
) -> MetricResult<RawMetric> {
    let current = line(ctx.latest());
    let previous = guard_nonzero(line(ctx.previous()?), labels.previous)?;
    let growth_rate = stats::percentage_change(previous, current);
    let years = Decimal::from(ctx.statements.len() - 1);
    let cagr = stats::cagr(line(&ctx.statements[0]), current, years);
    Ok(RawMetric {
        value: growth_rate,
        variables: vec![
            (labels.current, current),
            (labels.previous, previous),
            ("معدل النمو السنوي", growth_rate),
            ("معدل النمو المركب", cagr),
        ],
    })
}

fn revenue_growth(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    growth_metric(
        ctx,
        |s| s.income_statement.revenue,
        GrowthLabels {
            current: "الإيرادات الحالية",
            previous: "الإيرادات السابقة",
        },
    )
}

fn profit_growth(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    growth_metric(
        ctx,
        |s| s.income_statement.net_income,
        GrowthLabels {
            current: "الأرباح الحالية",
            previous: "الأرباح السابقة",
        },
    )
}

fn asset_growth(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    growth_metric(
        ctx,
        |s| s.balance_sheet.total_assets,
        GrowthLabels {
            current: "الأصول الحالية",
            previous: "الأصول السابقة",
        },
    )
}

fn equity_growth(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    growth_metric(
        ctx,
        |s| s.balance_sheet.shareholders_equity,
        GrowthLabels {
            current: "حقوق الملكية الحالية",
            previous: "حقوق الملكية السابقة",
        },
    )
}

fn cash_flow_growth(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    growth_metric(
        ctx,
        FinancialStatement::operating_cash_flow,
        GrowthLabels {
            current: "التدفق النقدي الحالي",
            previous: "التدفق النقدي السابق",
        },
    )
}
