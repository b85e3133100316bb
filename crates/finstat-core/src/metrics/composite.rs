//! Composite scores: the comprehensive tier blends one domain's headline
//! ratios into a 0-100 score from the latest period; the ultimate tier adds
//! trend and stability sub-factors computed from the full history. Short
//! histories fall back to the neutral 0.5 sub-factor.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::analyzer::DomainAnalyzer;
use crate::error::MetricResult;
use crate::fields::Field;
use crate::insight::{Condition, Rule};
use crate::metric::{guard_nonzero, MetricContext, MetricSpec, RawMetric};
use crate::rating::RatingScale;
use crate::score::{clamp_score, clamp_unit};
use crate::stats;
use crate::types::FinancialStatement;

const PERCENT: Decimal = dec!(100);
const NOPAT_TAX_RATE: Decimal = dec!(0.25);
const UNLEVERED_COVERAGE: Decimal = dec!(10);
const NEUTRAL_FACTOR: Decimal = dec!(0.5);

const COMPOSITE_SCALE: RatingScale = RatingScale::AtLeast {
    excellent: dec!(80),
    good: dec!(60),
    average: dec!(40),
};

pub static COMPREHENSIVE: DomainAnalyzer = DomainAnalyzer {
    domain: "comprehensive",
    category: "comprehensive",
    error_id: "comprehensive-error",
    error_name: "خطأ في التحليل الشامل",
    metrics: &[
        MetricSpec {
            id: "comprehensive-profitability",
            name: "التحليل الشامل للربحية",
            kind: "score",
            formula: "(هامش صافي الربح ÷ 2) + (الهامش التشغيلي ÷ 2) + (الهامش الإجمالي ÷ 4) + (العائد على الأصول × 2) + (العائد على حقوق الملكية ÷ 2)",
            benchmark_key: "comprehensiveProfitability",
            min_periods: 1,
            guards: &[Field::Revenue, Field::TotalAssets, Field::ShareholdersEquity],
            compute: comprehensive_profitability,
            scale: COMPOSITE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "ربحية شاملة ممتازة تدل على قوة مالية جيدة",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "ربحية شاملة ضعيفة قد تشير لمشاكل في الربحية",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "ربحية شاملة ضعيفة جداً تتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الربحية الشاملة من خلال زيادة جميع مؤشرات الربحية",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الربحية الشاملة الممتازة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الربحية الشاملة عبر الزمن",
                },
            ],
            interpretation: "التحليل الشامل للربحية {value}% يعكس قوة الربحية الشاملة للشركة من خلال جميع مؤشرات الربحية",
            interpret: None,
        },
        MetricSpec {
            id: "comprehensive-liquidity",
            name: "التحليل الشامل للسيولة",
            kind: "score",
            formula: "(النسبة الجارية × 20) + (النسبة السريعة × 20) + (نسبة النقد × 20) + (تغطية التدفق النقدي × 20)",
            benchmark_key: "comprehensiveLiquidity",
            min_periods: 1,
            guards: &[Field::CurrentLiabilities],
            compute: comprehensive_liquidity,
            scale: COMPOSITE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "سيولة شاملة ممتازة تدل على قوة مالية جيدة",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "سيولة شاملة ضعيفة قد تشير لمشاكل في السيولة",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "سيولة شاملة ضعيفة جداً تتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين السيولة الشاملة من خلال زيادة جميع مؤشرات السيولة",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على السيولة الشاملة الممتازة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات السيولة الشاملة عبر الزمن",
                },
            ],
            interpretation: "التحليل الشامل للسيولة {value}% يعكس قوة السيولة الشاملة للشركة من خلال جميع مؤشرات السيولة",
            interpret: None,
        },
        MetricSpec {
            id: "comprehensive-leverage",
            name: "التحليل الشامل للرفع المالي",
            kind: "score",
            formula: "((100 - نسبة الدين إلى الأصول) ÷ 2) + ((1 ÷ (1 + نسبة الدين إلى حقوق الملكية)) × 50) + (نسبة حقوق الملكية إلى الأصول ÷ 2) + (تغطية الفوائد × 50)",
            benchmark_key: "comprehensiveLeverage",
            min_periods: 1,
            guards: &[Field::TotalAssets, Field::ShareholdersEquity],
            compute: comprehensive_leverage,
            scale: COMPOSITE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "رفع مالي شامل ممتاز يدل على قوة مالية جيدة",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "رفع مالي شامل ضعيف قد يشير لمخاطر مالية",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "رفع مالي شامل ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الرفع المالي الشامل من خلال تحسين جميع مؤشرات الرفع المالي",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الرفع المالي الشامل الممتاز",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الرفع المالي الشامل عبر الزمن",
                },
            ],
            interpretation: "التحليل الشامل للرفع المالي {value}% يعكس قوة الرفع المالي الشامل للشركة من خلال جميع مؤشرات الرفع المالي",
            interpret: None,
        },
        MetricSpec {
            id: "comprehensive-efficiency",
            name: "التحليل الشامل للكفاءة",
            kind: "score",
            formula: "(دوران الأصول الإجمالية × 30) + (دوران الأصول الثابتة × 20) + (دوران المخزون × 25) + (دوران الذمم المدينة × 25)",
            benchmark_key: "comprehensiveEfficiency",
            min_periods: 1,
            guards: &[Field::Revenue, Field::TotalAssets],
            compute: comprehensive_efficiency,
            scale: COMPOSITE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "كفاءة شاملة ممتازة تدل على كفاءة عالية في العمليات",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "كفاءة شاملة ضعيفة قد تشير لمشاكل في الكفاءة",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "كفاءة شاملة ضعيفة جداً تتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الكفاءة الشاملة من خلال تحسين جميع مؤشرات الكفاءة",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الكفاءة الشاملة الممتازة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الكفاءة الشاملة عبر الزمن",
                },
            ],
            interpretation: "التحليل الشامل للكفاءة {value}% يعكس كفاءة العمليات الشاملة للشركة من خلال جميع مؤشرات الكفاءة",
            interpret: None,
        },
        MetricSpec {
            id: "comprehensive-growth",
            name: "التحليل الشامل للنمو",
            kind: "score",
            formula: "(نمو الإيرادات ÷ 2) + (نمو الأرباح ÷ 2) + (نمو الأصول ÷ 2) + (استقرار النمو ÷ 2)",
            benchmark_key: "comprehensiveGrowth",
            min_periods: 2,
            guards: &[],
            compute: comprehensive_growth,
            scale: COMPOSITE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "نمو شامل ممتاز يدل على نمو قوي ومستدام",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "نمو شامل ضعيف قد يشير لمشاكل في النمو",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "نمو شامل ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين النمو الشامل من خلال تحقيق نمو متوازن في جميع المؤشرات",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على النمو الشامل الممتاز",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات النمو الشامل عبر الزمن",
                },
            ],
            interpretation: "التحليل الشامل للنمو {value}% يعكس قوة النمو الشامل للشركة من خلال جميع مؤشرات النمو",
            interpret: None,
        },
    ],
};

pub static ULTIMATE: DomainAnalyzer = DomainAnalyzer {
    domain: "ultimate",
    category: "ultimate",
    error_id: "ultimate-error",
    error_name: "خطأ في التحليل النهائي",
    metrics: &[
        MetricSpec {
            id: "ultimate-profitability",
            name: "التحليل النهائي للربحية",
            kind: "ultimate-score",
            formula: "(هامش صافي الربح ÷ 2) + (الهامش التشغيلي ÷ 2) + (الهامش الإجمالي ÷ 4) + (العائد على الأصول × 2) + (العائد على حقوق الملكية ÷ 2) + (العائد على رأس المال المستثمر × 2) + (هامش EBITDA ÷ 2) + (اتجاه الربحية × 100) + (استقرار الربحية × 100)",
            benchmark_key: "ultimateProfitability",
            min_periods: 1,
            guards: &[Field::Revenue, Field::TotalAssets, Field::ShareholdersEquity],
            compute: ultimate_profitability,
            scale: COMPOSITE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "ربحية نهائية ممتازة تدل على قوة مالية جيدة",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "ربحية نهائية ضعيفة قد تشير لمشاكل في الربحية",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "ربحية نهائية ضعيفة جداً تتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الربحية النهائية من خلال زيادة جميع مؤشرات الربحية",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الربحية النهائية الممتازة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الربحية النهائية عبر الزمن",
                },
            ],
            interpretation: "التحليل النهائي للربحية {value}% يعكس قوة الربحية النهائية للشركة من خلال جميع مؤشرات الربحية المتقدمة",
            interpret: None,
        },
        MetricSpec {
            id: "ultimate-liquidity",
            name: "التحليل النهائي للسيولة",
            kind: "ultimate-score",
            formula: "(النسبة الجارية × 20) + (النسبة السريعة × 20) + (نسبة النقد × 20) + (تغطية التدفق النقدي × 20) + (نسبة السيولة المطلقة × 20) + (نسبة رأس المال العامل × 20) + (اتجاه السيولة × 100) + (استقرار السيولة × 100)",
            benchmark_key: "ultimateLiquidity",
            min_periods: 1,
            guards: &[Field::CurrentLiabilities],
            compute: ultimate_liquidity,
            scale: COMPOSITE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "سيولة نهائية ممتازة تدل على قوة مالية جيدة",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "سيولة نهائية ضعيفة قد تشير لمشاكل في السيولة",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "سيولة نهائية ضعيفة جداً تتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين السيولة النهائية من خلال زيادة جميع مؤشرات السيولة",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على السيولة النهائية الممتازة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات السيولة النهائية عبر الزمن",
                },
            ],
            interpretation: "التحليل النهائي للسيولة {value}% يعكس قوة السيولة النهائية للشركة من خلال جميع مؤشرات السيولة المتقدمة",
            interpret: None,
        },
        MetricSpec {
            id: "ultimate-leverage",
            name: "التحليل النهائي للرفع المالي",
            kind: "ultimate-score",
            formula: "((100 - نسبة الدين إلى الأصول) ÷ 2) + ((1 ÷ (1 + نسبة الدين إلى حقوق الملكية)) × 50) + (نسبة حقوق الملكية إلى الأصول ÷ 2) + (تغطية الفوائد × 50) + (تغطية خدمة الدين × 50) + (الرفع المالي × 50) + (اتجاه الرفع المالي × 100) + (استقرار الرفع المالي × 100)",
            benchmark_key: "ultimateLeverage",
            min_periods: 1,
            guards: &[Field::TotalAssets, Field::ShareholdersEquity],
            compute: ultimate_leverage,
            scale: COMPOSITE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "رفع مالي نهائي ممتاز يدل على قوة مالية جيدة",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "رفع مالي نهائي ضعيف قد يشير لمخاطر مالية",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "رفع مالي نهائي ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الرفع المالي النهائي من خلال تحسين جميع مؤشرات الرفع المالي",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الرفع المالي النهائي الممتاز",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الرفع المالي النهائي عبر الزمن",
                },
            ],
            interpretation: "التحليل النهائي للرفع المالي {value}% يعكس قوة الرفع المالي النهائي للشركة من خلال جميع مؤشرات الرفع المالي المتقدمة",
            interpret: None,
        },
        MetricSpec {
            id: "ultimate-efficiency",
            name: "التحليل النهائي للكفاءة",
            kind: "ultimate-score",
            formula: "(دوران الأصول الإجمالية × 30) + (دوران الأصول الثابتة × 20) + (دوران المخزون × 25) + (دوران الذمم المدينة × 25) + (دوران الذمم الدائنة × 25) + (دوران رأس المال العامل × 25) + (اتجاه الكفاءة × 100) + (استقرار الكفاءة × 100)",
            benchmark_key: "ultimateEfficiency",
            min_periods: 1,
            guards: &[Field::Revenue, Field::TotalAssets],
            compute: ultimate_efficiency,
            scale: COMPOSITE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "كفاءة نهائية ممتازة تدل على كفاءة عالية في العمليات",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "كفاءة نهائية ضعيفة قد تشير لمشاكل في الكفاءة",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "كفاءة نهائية ضعيفة جداً تتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الكفاءة النهائية من خلال تحسين جميع مؤشرات الكفاءة",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الكفاءة النهائية الممتازة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الكفاءة النهائية عبر الزمن",
                },
            ],
            interpretation: "التحليل النهائي للكفاءة {value}% يعكس كفاءة العمليات النهائية للشركة من خلال جميع مؤشرات الكفاءة المتقدمة",
            interpret: None,
        },
        MetricSpec {
            id: "ultimate-growth",
            name: "التحليل النهائي للنمو",
            kind: "ultimate-score",
            formula: "(نمو الإيرادات ÷ 2) + (نمو الأرباح ÷ 2) + (نمو الأصول ÷ 2) + (نمو حقوق الملكية ÷ 2) + (استقرار النمو × 100) + (استدامة النمو × 100) + (اتجاه النمو × 100) + (تسارع النمو × 100)",
            benchmark_key: "ultimateGrowth",
            min_periods: 2,
            guards: &[],
            compute: ultimate_growth,
            scale: COMPOSITE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "نمو نهائي ممتاز يدل على نمو قوي ومستدام",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "نمو نهائي ضعيف قد يشير لمشاكل في النمو",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "نمو نهائي ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين النمو النهائي من خلال تحقيق نمو متوازن في جميع المؤشرات",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على النمو النهائي الممتاز",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات النمو النهائي عبر الزمن",
                },
            ],
            interpretation: "التحليل النهائي للنمو {value}% يعكس قوة النمو النهائي للشركة من خلال جميع مؤشرات النمو المتقدمة",
            interpret: None,
        },
    ],
};

// ---------------------------------------------------------------------------
// Shared pieces
// ---------------------------------------------------------------------------

fn interest_coverage(s: &FinancialStatement) -> Decimal {
    if s.income_statement.interest_expense > Decimal::ZERO {
        s.income_statement.operating_income / s.income_statement.interest_expense
    } else {
        UNLEVERED_COVERAGE
    }
}

/// Trend and stability sub-factors over a ratio history. Trend centers at
/// the neutral 0.5 shifted by the first-to-last change; stability decays
/// with the dispersion of period-over-period changes.
fn sub_factors(series: &[Decimal]) -> (Decimal, Decimal) {
    if series.len() < 3 {
        return (NEUTRAL_FACTOR, NEUTRAL_FACTOR);
    }
    let trend = clamp_unit(NEUTRAL_FACTOR + series[series.len() - 1] - series[0]);
    let diffs: Vec<Decimal> = series.windows(2).map(|w| w[1] - w[0]).collect();
    let stability = clamp_unit(Decimal::ONE / (Decimal::ONE + stats::stddev(&diffs)));
    (trend, stability)
}

/// One line as a ratio of another across the history, skipping periods with
/// a zero denominator.
fn ratio_series(
    ctx: &MetricContext<'_>,
    numerator: fn(&FinancialStatement) -> Decimal,
    denominator: fn(&FinancialStatement) -> Decimal,
) -> Vec<Decimal> {
    ctx.statements
        .iter()
        .filter_map(|s| {
            let d = denominator(s);
            if d.is_zero() {
                None
            } else {
                Some(numerator(s) / d)
            }
        })
        .collect()
}

/// Period-over-period revenue growth fractions, skipping zero priors.
fn revenue_growth_rates(ctx: &MetricContext<'_>) -> Vec<Decimal> {
    ctx.statements
        .windows(2)
        .filter_map(|w| {
            let previous = w[0].income_statement.revenue;
            if previous > Decimal::ZERO {
                Some((w[1].income_statement.revenue - previous) / previous)
            } else {
                None
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Comprehensive tier
// ---------------------------------------------------------------------------

fn comprehensive_profitability(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let revenue = s.income_statement.revenue;

    let net_margin = s.income_statement.net_income / revenue * PERCENT;
    let operating_margin = s.income_statement.operating_income / revenue * PERCENT;
    let gross_margin = s.income_statement.gross_profit() / revenue * PERCENT;
    let roa = s.income_statement.net_income / s.balance_sheet.total_assets * PERCENT;
    let roe = s.income_statement.net_income / s.balance_sheet.shareholders_equity * PERCENT;

    let score = clamp_score(
        net_margin / dec!(2)
            + operating_margin / dec!(2)
            + gross_margin / dec!(4)
            + roa * dec!(2)
            + roe / dec!(2),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("هامش صافي الربح", net_margin),
            ("الهامش التشغيلي", operating_margin),
            ("الهامش الإجمالي", gross_margin),
            ("العائد على الأصول", roa),
            ("العائد على حقوق الملكية", roe),
            ("مؤشر التحليل الشامل للربحية", score),
        ],
    })
}

fn comprehensive_liquidity(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let cl = s.balance_sheet.current_liabilities;

    let current_ratio = s.balance_sheet.current_assets / cl;
    let quick_ratio = (s.balance_sheet.current_assets - s.balance_sheet.inventory) / cl;
    let cash_ratio = s.balance_sheet.cash / cl;
    let cash_flow_coverage = s.operating_cash_flow() / cl;

    let score = clamp_score(
        current_ratio * dec!(20)
            + quick_ratio * dec!(20)
            + cash_ratio * dec!(20)
            + cash_flow_coverage * dec!(20),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("النسبة الجارية", current_ratio),
            ("النسبة السريعة", quick_ratio),
            ("نسبة النقد", cash_ratio),
            ("تغطية التدفق النقدي", cash_flow_coverage),
            ("مؤشر التحليل الشامل للسيولة", score),
        ],
    })
}

fn comprehensive_leverage(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let total_debt = s.balance_sheet.total_debt();
    let total_assets = s.balance_sheet.total_assets;
    let equity = s.balance_sheet.shareholders_equity;

    let debt_to_assets = total_debt / total_assets * PERCENT;
    let debt_to_equity = total_debt / equity;
    let equity_to_assets = equity / total_assets * PERCENT;
    let coverage_factor = (interest_coverage(s) / dec!(5)).min(Decimal::ONE);

    let score = clamp_score(
        (PERCENT - debt_to_assets) / dec!(2)
            + Decimal::ONE / (Decimal::ONE + debt_to_equity) * dec!(50)
            + equity_to_assets / dec!(2)
            + coverage_factor * dec!(50),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("نسبة الدين إلى الأصول", debt_to_assets),
            ("نسبة الدين إلى حقوق الملكية", debt_to_equity),
            ("نسبة حقوق الملكية إلى الأصول", equity_to_assets),
            ("تغطية الفوائد", coverage_factor),
            ("مؤشر التحليل الشامل للرفع المالي", score),
        ],
    })
}

fn comprehensive_efficiency(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let revenue = s.income_statement.revenue;

    let total_asset_turnover = revenue / s.balance_sheet.total_assets;
    let fixed_asset_turnover = safe_ratio(revenue, s.balance_sheet.fixed_assets);
    let inventory_turnover = safe_ratio(
        s.income_statement.cost_of_goods_sold,
        s.balance_sheet.inventory,
    );
    let receivables_turnover = safe_ratio(revenue, s.balance_sheet.accounts_receivable);

    let score = clamp_score(
        total_asset_turnover * dec!(30)
            + fixed_asset_turnover * dec!(20)
            + inventory_turnover * dec!(25)
            + receivables_turnover * dec!(25),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("دوران الأصول الإجمالية", total_asset_turnover),
            ("دوران الأصول الثابتة", fixed_asset_turnover),
            ("دوران المخزون", inventory_turnover),
            ("دوران الذمم المدينة", receivables_turnover),
            ("مؤشر التحليل الشامل للكفاءة", score),
        ],
    })
}

fn comprehensive_growth(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let current = ctx.latest();
    let previous = ctx.previous()?;
    let prev_revenue = guard_nonzero(previous.income_statement.revenue, "الإيرادات السابقة")?;
    let prev_income = guard_nonzero(previous.income_statement.net_income, "صافي الربح السابق")?;
    let prev_assets = guard_nonzero(previous.balance_sheet.total_assets, "الأصول السابقة")?;

    let revenue_growth =
        (current.income_statement.revenue - prev_revenue) / prev_revenue * PERCENT;
    let profit_growth =
        (current.income_statement.net_income - prev_income) / prev_income * PERCENT;
    let asset_growth = (current.balance_sheet.total_assets - prev_assets) / prev_assets * PERCENT;
    let growth_stability = (revenue_growth.abs() / dec!(20)).min(Decimal::ONE) * PERCENT;

    let score = clamp_score(
        revenue_growth.abs() / dec!(2)
            + profit_growth.abs() / dec!(2)
            + asset_growth.abs() / dec!(2)
            + growth_stability / dec!(2),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("نمو الإيرادات", revenue_growth),
            ("نمو الأرباح", profit_growth),
            ("نمو الأصول", asset_growth),
            ("استقرار النمو", growth_stability),
            ("مؤشر التحليل الشامل للنمو", score),
        ],
    })
}

fn safe_ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator > Decimal::ZERO {
        numerator / denominator
    } else {
        Decimal::ZERO
    }
}

// ---------------------------------------------------------------------------
// Ultimate tier
// ---------------------------------------------------------------------------

fn ultimate_profitability(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let revenue = s.income_statement.revenue;

    let net_margin = s.income_statement.net_income / revenue * PERCENT;
    let operating_margin = s.income_statement.operating_income / revenue * PERCENT;
    let gross_margin = s.income_statement.gross_profit() / revenue * PERCENT;
    let roa = s.income_statement.net_income / s.balance_sheet.total_assets * PERCENT;
    let roe = s.income_statement.net_income / s.balance_sheet.shareholders_equity * PERCENT;
    let roic = {
        let invested = s.balance_sheet.total_debt() + s.balance_sheet.shareholders_equity;
        if invested.is_zero() {
            Decimal::ZERO
        } else {
            let nopat = s.income_statement.net_income
                + s.income_statement.interest_expense * (Decimal::ONE - NOPAT_TAX_RATE);
            nopat / invested * PERCENT
        }
    };
    let ebitda_margin = s.income_statement.ebitda() / revenue * PERCENT;

    let margins = ratio_series(
        ctx,
        |s| s.income_statement.net_income,
        |s| s.income_statement.revenue,
    );
    let (trend, stability) = sub_factors(&margins);

    let score = clamp_score(
        net_margin / dec!(2)
            + operating_margin / dec!(2)
            + gross_margin / dec!(4)
            + roa * dec!(2)
            + roe / dec!(2)
            + roic * dec!(2)
            + ebitda_margin / dec!(2)
            + trend * PERCENT
            + stability * PERCENT,
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("هامش صافي الربح", net_margin),
            ("الهامش التشغيلي", operating_margin),
            ("الهامش الإجمالي", gross_margin),
            ("العائد على الأصول", roa),
            ("العائد على حقوق الملكية", roe),
            ("العائد على رأس المال المستثمر", roic),
            ("هامش EBITDA", ebitda_margin),
            ("اتجاه الربحية", trend),
            ("استقرار الربحية", stability),
            ("مؤشر التحليل النهائي للربحية", score),
        ],
    })
}

fn ultimate_liquidity(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let cl = s.balance_sheet.current_liabilities;

    let current_ratio = s.balance_sheet.current_assets / cl;
    let quick_ratio = (s.balance_sheet.current_assets - s.balance_sheet.inventory) / cl;
    let cash_ratio = s.balance_sheet.cash / cl;
    let cash_flow_coverage = s.operating_cash_flow() / cl;
    let absolute_liquidity =
        (s.balance_sheet.cash + s.balance_sheet.marketable_securities) / cl;
    let working_capital_ratio = safe_ratio(
        s.balance_sheet.working_capital(),
        s.balance_sheet.current_assets,
    );

    let ratios = ratio_series(
        ctx,
        |s| s.balance_sheet.current_assets,
        |s| s.balance_sheet.current_liabilities,
    );
    let (trend, stability) = sub_factors(&ratios);

    let score = clamp_score(
        current_ratio * dec!(20)
            + quick_ratio * dec!(20)
            + cash_ratio * dec!(20)
            + cash_flow_coverage * dec!(20)
            + absolute_liquidity * dec!(20)
            + working_capital_ratio * dec!(20)
            + trend * PERCENT
            + stability * PERCENT,
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("النسبة الجارية", current_ratio),
            ("النسبة السريعة", quick_ratio),
            ("نسبة النقد", cash_ratio),
            ("تغطية التدفق النقدي", cash_flow_coverage),
            ("نسبة السيولة المطلقة", absolute_liquidity),
            ("نسبة رأس المال العامل", working_capital_ratio),
            ("اتجاه السيولة", trend),
            ("استقرار السيولة", stability),
            ("مؤشر التحليل النهائي للسيولة", score),
        ],
    })
}

fn ultimate_leverage(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let total_debt = s.balance_sheet.total_debt();
    let total_assets = s.balance_sheet.total_assets;
    let equity = s.balance_sheet.shareholders_equity;

    let debt_to_assets = total_debt / total_assets * PERCENT;
    let debt_to_equity = total_debt / equity;
    let equity_to_assets = equity / total_assets * PERCENT;
    let coverage_factor = (interest_coverage(s) / dec!(5)).min(Decimal::ONE);
    let debt_service = if total_debt > Decimal::ZERO {
        s.operating_cash_flow() / total_debt
    } else {
        Decimal::ONE
    };
    let service_factor = (debt_service / dec!(2)).min(Decimal::ONE);
    let leverage_factor = (total_assets / equity / dec!(3)).min(Decimal::ONE);

    let ratios = ratio_series(
        ctx,
        |s| s.balance_sheet.total_debt(),
        |s| s.balance_sheet.total_assets,
    );
    let (trend, stability) = sub_factors(&ratios);

    let score = clamp_score(
        (PERCENT - debt_to_assets) / dec!(2)
            + Decimal::ONE / (Decimal::ONE + debt_to_equity) * dec!(50)
            + equity_to_assets / dec!(2)
            + coverage_factor * dec!(50)
            + service_factor * dec!(50)
            + leverage_factor * dec!(50)
            + trend * PERCENT
            + stability * PERCENT,
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("نسبة الدين إلى الأصول", debt_to_assets),
            ("نسبة الدين إلى حقوق الملكية", debt_to_equity),
            ("نسبة حقوق الملكية إلى الأصول", equity_to_assets),
            ("تغطية الفوائد", coverage_factor),
            ("تغطية خدمة الدين", service_factor),
            ("الرفع المالي", leverage_factor),
            ("اتجاه الرفع المالي", trend),
            ("استقرار الرفع المالي", stability),
            ("مؤشر التحليل النهائي للرفع المالي", score),
        ],
    })
}

fn ultimate_efficiency(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let revenue = s.income_statement.revenue;

    let total_asset_turnover = revenue / s.balance_sheet.total_assets;
    let fixed_asset_turnover = safe_ratio(revenue, s.balance_sheet.fixed_assets);
    let inventory_turnover = safe_ratio(
        s.income_statement.cost_of_goods_sold,
        s.balance_sheet.inventory,
    );
    let receivables_turnover = safe_ratio(revenue, s.balance_sheet.accounts_receivable);
    let payables_turnover = safe_ratio(
        s.income_statement.cost_of_goods_sold,
        s.balance_sheet.accounts_payable,
    );
    let working_capital = s.balance_sheet.working_capital();
    let working_capital_turnover = if working_capital.is_zero() {
        Decimal::ZERO
    } else {
        revenue / working_capital
    };

    let turnovers = ratio_series(
        ctx,
        |s| s.income_statement.revenue,
        |s| s.balance_sheet.total_assets,
    );
    let (trend, stability) = sub_factors(&turnovers);

    let score = clamp_score(
        total_asset_turnover * dec!(30)
            + fixed_asset_turnover * dec!(20)
            + inventory_turnover * dec!(25)
            + receivables_turnover * dec!(25)
            + payables_turnover * dec!(25)
            + working_capital_turnover * dec!(25)
            + trend * PERCENT
            + stability * PERCENT,
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("دوران الأصول الإجمالية", total_asset_turnover),
            ("دوران الأصول الثابتة", fixed_asset_turnover),
            ("دوران المخزون", inventory_turnover),
            ("دوران الذمم المدينة", receivables_turnover),
            ("دوران الذمم الدائنة", payables_turnover),
            ("دوران رأس المال العامل", working_capital_turnover),
            ("اتجاه الكفاءة", trend),
            ("استقرار الكفاءة", stability),
            ("مؤشر التحليل النهائي للكفاءة", score),
        ],
    })
}

fn ultimate_growth(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let current = ctx.latest();
    let previous = ctx.previous()?;
    let prev_revenue = guard_nonzero(previous.income_statement.revenue, "الإيرادات السابقة")?;
    let prev_income = guard_nonzero(previous.income_statement.net_income, "صافي الربح السابق")?;
    let prev_assets = guard_nonzero(previous.balance_sheet.total_assets, "الأصول السابقة")?;
    let prev_equity = guard_nonzero(
        previous.balance_sheet.shareholders_equity,
        "حقوق الملكية السابقة",
    )?;

    let revenue_growth =
        (current.income_statement.revenue - prev_revenue) / prev_revenue * PERCENT;
    let profit_growth =
        (current.income_statement.net_income - prev_income) / prev_income * PERCENT;
    let asset_growth = (current.balance_sheet.total_assets - prev_assets) / prev_assets * PERCENT;
    let equity_growth =
        (current.balance_sheet.shareholders_equity - prev_equity) / prev_equity * PERCENT;

    let rates = revenue_growth_rates(ctx);
    let stability = if ctx.statements.len() < 3 || rates.is_empty() {
        NEUTRAL_FACTOR
    } else {
        clamp_unit(Decimal::ONE / (Decimal::ONE + stats::stddev(&rates)))
    };
    let sustainability = {
        let roe = |s: &FinancialStatement| {
            let equity = s.balance_sheet.shareholders_equity;
            let base = if equity.is_zero() { Decimal::ONE } else { equity };
            s.income_statement.net_income / base
        };
        clamp_unit(NEUTRAL_FACTOR + roe(current) - roe(previous))
    };
    let trend = if rates.len() < 2 {
        NEUTRAL_FACTOR
    } else {
        clamp_unit(NEUTRAL_FACTOR + rates[rates.len() - 1] - rates[0])
    };
    let acceleration = if rates.len() < 2 {
        NEUTRAL_FACTOR
    } else {
        clamp_unit(NEUTRAL_FACTOR + rates[rates.len() - 1] - rates[rates.len() - 2])
    };

    let score = clamp_score(
        revenue_growth.abs() / dec!(2)
            + profit_growth.abs() / dec!(2)
            + asset_growth.abs() / dec!(2)
            + equity_growth.abs() / dec!(2)
            + stability * PERCENT
            + sustainability * PERCENT
            + trend * PERCENT
            + acceleration * PERCENT,
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("نمو الإيرادات", revenue_growth),
            ("نمو الأرباح", profit_growth),
            ("نمو الأصول", asset_growth),
            ("نمو حقوق الملكية", equity_growth),
            ("استقرار النمو", stability),
            ("استدامة النمو", sustainability),
            ("اتجاه النمو", trend),
            ("تسارع النمو", acceleration),
            ("مؤشر التحليل النهائي للنمو", score),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::result::{Rating, Status};
    use crate::types::{CashFlowStatement, Company};
    use pretty_assertions::assert_eq;

    fn statement(scale: Decimal) -> FinancialStatement {
        let mut s = FinancialStatement::default();
        s.income_statement.revenue = dec!(1000) * scale;
        s.income_statement.cost_of_goods_sold = dec!(600) * scale;
        s.income_statement.operating_income = dec!(200) * scale;
        s.income_statement.net_income = dec!(100) * scale;
        s.balance_sheet.total_assets = dec!(1000) * scale;
        s.balance_sheet.current_assets = dec!(200) * scale;
        s.balance_sheet.current_liabilities = dec!(100) * scale;
        s.balance_sheet.cash = dec!(30) * scale;
        s.balance_sheet.inventory = dec!(50) * scale;
        s.balance_sheet.shareholders_equity = dec!(500) * scale;
        s.cash_flow_statement = Some(CashFlowStatement {
            operating_cash_flow: dec!(40) * scale,
            ..Default::default()
        });
        s
    }

    #[test]
    fn comprehensive_profitability_blends_margins() {
        let results = COMPREHENSIVE.analyze(&[statement(Decimal::ONE)], &Company::default(), None, None);
        let p = &results[0];
        assert_eq!(p.id, "comprehensive-profitability");
        assert_eq!(p.category, "comprehensive");
        // 10/2 + 20/2 + 40/4 + 10*2 + 20/2 = 55
        assert_eq!(p.current_value, dec!(55));
        assert_eq!(p.rating, Rating::Average);
    }

    #[test]
    fn comprehensive_liquidity_sums_weighted_ratios() {
        let results = COMPREHENSIVE.analyze(&[statement(Decimal::ONE)], &Company::default(), None, None);
        let l = &results[1];
        // (2 + 1.5 + 0.3 + 0.4) * 20 = 84
        assert_eq!(l.current_value, dec!(84));
        assert_eq!(l.rating, Rating::Excellent);
    }

    #[test]
    fn comprehensive_growth_guards_prior_period() {
        let mut previous = statement(Decimal::ONE);
        previous.income_statement.net_income = Decimal::ZERO;
        let history = vec![previous, statement(dec!(1.2))];
        let results = COMPREHENSIVE.analyze(&history, &Company::default(), None, None);
        let g = results.iter().find(|r| r.id == "comprehensive-growth").unwrap();
        assert_eq!(g.status, Status::Error);
    }

    #[test]
    fn ultimate_growth_neutral_factors_with_two_periods() {
        let history = vec![statement(Decimal::ONE), statement(dec!(1.2))];
        let results = ULTIMATE.analyze(&history, &Company::default(), None, None);
        let g = results.iter().find(|r| r.id == "ultimate-growth").unwrap();
        assert_eq!(g.status, Status::Completed);
        assert_eq!(g.category, "ultimate");
        assert_eq!(g.calculation.variables["استقرار النمو"], dec!(0.5));
        assert_eq!(g.calculation.variables["اتجاه النمو"], dec!(0.5));
        assert_eq!(g.calculation.variables["نمو الإيرادات"], dec!(20));
        // Sub-factor contributions alone exceed the cap.
        assert_eq!(g.current_value, dec!(100));
    }

    #[test]
    fn ultimate_growth_trend_from_three_periods() {
        // Growth rates: 20% then 50%, so trend and acceleration shift up.
        let history = vec![
            statement(Decimal::ONE),
            statement(dec!(1.2)),
            statement(dec!(1.8)),
        ];
        let results = ULTIMATE.analyze(&history, &Company::default(), None, None);
        let g = results.iter().find(|r| r.id == "ultimate-growth").unwrap();
        assert_eq!(g.calculation.variables["اتجاه النمو"], dec!(0.8));
        assert_eq!(g.calculation.variables["تسارع النمو"], dec!(0.8));
    }

    #[test]
    fn ultimate_profitability_includes_roic_and_ebitda() {
        let results = ULTIMATE.analyze(&[statement(Decimal::ONE)], &Company::default(), None, None);
        let p = &results[0];
        assert_eq!(p.status, Status::Completed);
        let vars = &p.calculation.variables;
        // NOPAT = 100, invested capital = 100 + 500 = 600.
        assert!((vars["العائد على رأس المال المستثمر"] - dec!(16.6667)).abs() < dec!(0.001));
        assert_eq!(vars["هامش EBITDA"], dec!(20));
        assert_eq!(vars["اتجاه الربحية"], dec!(0.5));
    }

    #[test]
    fn batch_errors_keep_original_identifiers() {
        let comprehensive = COMPREHENSIVE.analyze(&[], &Company::default(), None, None);
        assert_eq!(comprehensive.len(), 1);
        assert_eq!(comprehensive[0].id, "comprehensive-error");
        let ultimate = ULTIMATE.analyze(&[], &Company::default(), None, None);
        assert_eq!(ultimate[0].id, "ultimate-error");
    }

    #[test]
    fn zero_equity_errors_profitability_rows_only() {
        let mut s = statement(Decimal::ONE);
        s.balance_sheet.shareholders_equity = Decimal::ZERO;
        let results = COMPREHENSIVE.analyze(&[s], &Company::default(), None, None);
        assert_eq!(results[0].status, Status::Error);
        assert_eq!(results[1].status, Status::Completed);
    }
}
