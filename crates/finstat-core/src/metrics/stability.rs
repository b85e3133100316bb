//! Stability and performance indices: two families of 0-100 scores built
//! from the same statement, weighting solvency, efficiency, returns, and
//! cash strength differently. Stability factors stay in unit terms before
//! weighting; performance factors are taken as percentages.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::analyzer::DomainAnalyzer;
use crate::error::MetricResult;
use crate::fields::Field;
use crate::insight::{Condition, Rule};
use crate::metric::{guard_nonzero, MetricContext, MetricSpec, RawMetric};
use crate::rating::RatingScale;
use crate::score::clamp_score;

const PERCENT: Decimal = dec!(100);

// Coverage proxy when a company carries no interest expense.
const UNLEVERED_COVERAGE: Decimal = dec!(10);

const SCORE_SCALE: RatingScale = RatingScale::AtLeast {
    excellent: dec!(80),
    good: dec!(60),
    average: dec!(40),
};

// ---------------------------------------------------------------------------
// Stability indices
// ---------------------------------------------------------------------------

pub static STABILITY: DomainAnalyzer = DomainAnalyzer {
    domain: "stability",
    category: "stability",
    error_id: "stability-error",
    error_name: "خطأ في تحليل الاستقرار",
    metrics: &[
        MetricSpec {
            id: "financial-stability",
            name: "نسبة الاستقرار المالي",
            kind: "score",
            formula: "(نسبة حقوق الملكية × 40%) + (نسبة الأصول غير الممولة بالديون × 30%) + (نسبة تغطية الفوائد × 30%)",
            benchmark_key: "financialStability",
            min_periods: 1,
            guards: &[Field::TotalAssets],
            compute: financial_stability,
            scale: SCORE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "استقرار مالي ممتاز يدل على قوة مالية جيدة",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "استقرار مالي ضعيف قد يشير لمخاطر مالية",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "استقرار مالي ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الاستقرار المالي من خلال زيادة حقوق الملكية وتقليل الديون",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الاستقرار المالي العالي",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الاستقرار المالي عبر الزمن",
                },
            ],
            interpretation: "نسبة الاستقرار المالي {value}% تعكس قوة الوضع المالي للشركة وقدرتها على الوفاء بالتزاماتها",
            interpret: None,
        },
        MetricSpec {
            id: "operational-stability",
            name: "نسبة الاستقرار التشغيلي",
            kind: "score",
            formula: "(الهامش التشغيلي × 40%) + (دوران الأصول × 30%) + (كفاءة المصروفات × 30%)",
            benchmark_key: "operationalStability",
            min_periods: 1,
            guards: &[Field::Revenue, Field::TotalAssets],
            compute: operational_stability,
            scale: SCORE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "استقرار تشغيلي ممتاز يدل على كفاءة عالية في العمليات",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "استقرار تشغيلي ضعيف قد يشير لمشاكل في العمليات",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "استقرار تشغيلي ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الاستقرار التشغيلي من خلال تحسين الكفاءة وتقليل التكاليف",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الاستقرار التشغيلي العالي",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الاستقرار التشغيلي عبر الزمن",
                },
            ],
            interpretation: "نسبة الاستقرار التشغيلي {value}% تعكس كفاءة العمليات التشغيلية للشركة",
            interpret: None,
        },
        MetricSpec {
            id: "investment-stability",
            name: "نسبة الاستقرار الاستثماري",
            kind: "score",
            formula: "(العائد على الأصول × 40%) + (العائد على حقوق الملكية × 30%) + (نسبة الاحتجاز × 30%)",
            benchmark_key: "investmentStability",
            min_periods: 1,
            guards: &[Field::TotalAssets, Field::ShareholdersEquity],
            compute: investment_stability,
            scale: SCORE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "استقرار استثماري ممتاز يدل على جودة عالية في الاستثمارات",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "استقرار استثماري ضعيف قد يشير لمشاكل في الاستثمارات",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "استقرار استثماري ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الاستقرار الاستثماري من خلال تحسين العائدات",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الاستقرار الاستثماري العالي",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الاستقرار الاستثماري عبر الزمن",
                },
            ],
            interpretation: "نسبة الاستقرار الاستثماري {value}% تعكس جودة الاستثمارات والعائد المتوقع",
            interpret: None,
        },
        MetricSpec {
            id: "cash-stability",
            name: "نسبة الاستقرار النقدي",
            kind: "score",
            formula: "(استقرار التدفق النقدي × 50%) + (نسبة النقدية × 50%)",
            benchmark_key: "cashStability",
            min_periods: 1,
            guards: &[Field::TotalAssets],
            compute: cash_stability,
            scale: SCORE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "استقرار نقدي ممتاز يدل على قوة مالية جيدة",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "استقرار نقدي ضعيف قد يشير لمشاكل في السيولة",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "استقرار نقدي ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الاستقرار النقدي من خلال زيادة التدفق النقدي والنقدية",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الاستقرار النقدي العالي",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الاستقرار النقدي عبر الزمن",
                },
            ],
            interpretation: "نسبة الاستقرار النقدي {value}% تعكس قوة الوضع النقدي للشركة",
            interpret: None,
        },
        MetricSpec {
            id: "credit-stability",
            name: "نسبة الاستقرار الائتماني",
            kind: "score",
            formula: "(نسبة الأصول غير الممولة بالديون × 60%) + (جودة الائتمان × 40%)",
            benchmark_key: "creditStability",
            min_periods: 1,
            guards: &[Field::TotalAssets],
            compute: credit_stability,
            scale: SCORE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "استقرار ائتماني ممتاز يدل على جودة عالية في الائتمان",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "استقرار ائتماني ضعيف قد يشير لمخاطر ائتمانية",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "استقرار ائتماني ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الاستقرار الائتماني من خلال تقليل الديون وتحسين التدفق النقدي",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الاستقرار الائتماني العالي",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الاستقرار الائتماني عبر الزمن",
                },
            ],
            interpretation: "نسبة الاستقرار الائتماني {value}% تعكس جودة الائتمان وقدرة الشركة على الوفاء بالتزاماتها",
            interpret: None,
        },
    ],
};

// ---------------------------------------------------------------------------
// Performance indices
// ---------------------------------------------------------------------------

pub static PERFORMANCE: DomainAnalyzer = DomainAnalyzer {
    domain: "performance",
    category: "performance",
    error_id: "performance-error",
    error_name: "خطأ في تحليل الأداء",
    metrics: &[
        MetricSpec {
            id: "financial-performance",
            name: "مؤشر الأداء المالي",
            kind: "score",
            formula: "(هامش صافي الربح ÷ 2) + (العائد على الأصول × 2) + (العائد على حقوق الملكية ÷ 2) + (دوران الأصول × 20)",
            benchmark_key: "financialPerformance",
            min_periods: 1,
            guards: &[Field::Revenue, Field::TotalAssets, Field::ShareholdersEquity],
            compute: financial_performance,
            scale: SCORE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "أداء مالي ممتاز يدل على قوة مالية جيدة",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "أداء مالي ضعيف قد يشير لمشاكل في الربحية",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "أداء مالي ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الأداء المالي من خلال زيادة الربحية والعائدات",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الأداء المالي الممتاز",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الأداء المالي عبر الزمن",
                },
            ],
            interpretation: "مؤشر الأداء المالي {value}% يعكس قوة الأداء المالي للشركة من خلال الربحية والعائدات",
            interpret: None,
        },
        MetricSpec {
            id: "operational-performance",
            name: "مؤشر الأداء التشغيلي",
            kind: "score",
            formula: "(الهامش التشغيلي ÷ 2) + (كفاءة المصروفات ÷ 2) + (دوران الأصول × 20)",
            benchmark_key: "operationalPerformance",
            min_periods: 1,
            guards: &[Field::Revenue, Field::TotalAssets],
            compute: operational_performance,
            scale: SCORE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "أداء تشغيلي ممتاز يدل على كفاءة عالية في العمليات",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "أداء تشغيلي ضعيف قد يشير لمشاكل في الكفاءة",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "أداء تشغيلي ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الأداء التشغيلي من خلال تحسين الكفاءة وتقليل التكاليف",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الأداء التشغيلي الممتاز",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الأداء التشغيلي عبر الزمن",
                },
            ],
            interpretation: "مؤشر الأداء التشغيلي {value}% يعكس كفاءة العمليات التشغيلية للشركة",
            interpret: None,
        },
        MetricSpec {
            id: "investment-performance",
            name: "مؤشر الأداء الاستثماري",
            kind: "score",
            formula: "(العائد على الأصول × 2) + (العائد على حقوق الملكية ÷ 2) + (نسبة الاحتجاز ÷ 2) + (كفاءة الاستثمار × 2)",
            benchmark_key: "investmentPerformance",
            min_periods: 1,
            guards: &[Field::TotalAssets, Field::ShareholdersEquity],
            compute: investment_performance,
            scale: SCORE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "أداء استثماري ممتاز يدل على جودة عالية في الاستثمارات",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "أداء استثماري ضعيف قد يشير لمشاكل في الاستثمارات",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "أداء استثماري ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الأداء الاستثماري من خلال تحسين العائدات",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الأداء الاستثماري الممتاز",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الأداء الاستثماري عبر الزمن",
                },
            ],
            interpretation: "مؤشر الأداء الاستثماري {value}% يعكس جودة الاستثمارات والعائد المتوقع",
            interpret: None,
        },
        MetricSpec {
            id: "cash-performance",
            name: "مؤشر الأداء النقدي",
            kind: "score",
            formula: "(استقرار التدفق النقدي × 0.5) + (نسبة النقدية × 0.5) + (كفاءة النقدية × 0.5)",
            benchmark_key: "cashPerformance",
            min_periods: 1,
            guards: &[Field::TotalAssets],
            compute: cash_performance,
            scale: SCORE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "أداء نقدي ممتاز يدل على قوة مالية جيدة",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "أداء نقدي ضعيف قد يشير لمشاكل في السيولة",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "أداء نقدي ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الأداء النقدي من خلال زيادة التدفق النقدي والنقدية",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الأداء النقدي الممتاز",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الأداء النقدي عبر الزمن",
                },
            ],
            interpretation: "مؤشر الأداء النقدي {value}% يعكس قوة الوضع النقدي للشركة",
            interpret: None,
        },
        MetricSpec {
            id: "credit-performance",
            name: "مؤشر الأداء الائتماني",
            kind: "score",
            formula: "(كفاءة الديون × 0.6) + (جودة الائتمان × 0.4)",
            benchmark_key: "creditPerformance",
            min_periods: 1,
            guards: &[Field::TotalAssets],
            compute: credit_performance,
            scale: SCORE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "أداء ائتماني ممتاز يدل على جودة عالية في الائتمان",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "أداء ائتماني ضعيف قد يشير لمخاطر ائتمانية",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "أداء ائتماني ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الأداء الائتماني من خلال تقليل الديون وتحسين التدفق النقدي",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الأداء الائتماني الممتاز",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الأداء الائتماني عبر الزمن",
                },
            ],
            interpretation: "مؤشر الأداء الائتماني {value}% يعكس جودة الائتمان وقدرة الشركة على الوفاء بالتزاماتها",
            interpret: None,
        },
        MetricSpec {
            id: "market-performance",
            name: "مؤشر الأداء السوقي",
            kind: "score",
            formula: "(كفاءة السوق × 0.5) + (استقرار السوق × 0.5)",
            benchmark_key: "marketPerformance",
            min_periods: 1,
            guards: &[],
            compute: market_performance,
            scale: SCORE_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "أداء سوقي ممتاز يدل على قوة في السوق",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "أداء سوقي ضعيف قد يشير لمشاكل في التقييم",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "أداء سوقي ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الأداء السوقي من خلال تحسين التقييم",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الأداء السوقي الممتاز",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات الأداء السوقي عبر الزمن",
                },
            ],
            interpretation: "مؤشر الأداء السوقي {value}% يعكس أداء السهم في السوق وقيمته",
            interpret: None,
        },
    ],
};

// ---------------------------------------------------------------------------
// Shared factors
// ---------------------------------------------------------------------------

fn interest_coverage(s: &crate::types::FinancialStatement) -> Decimal {
    if s.income_statement.interest_expense > Decimal::ZERO {
        s.income_statement.operating_income / s.income_statement.interest_expense
    } else {
        UNLEVERED_COVERAGE
    }
}

fn cash_flow_coverage(s: &crate::types::FinancialStatement) -> Decimal {
    if s.balance_sheet.current_liabilities > Decimal::ZERO {
        s.operating_cash_flow() / s.balance_sheet.current_liabilities
    } else {
        Decimal::ONE
    }
}

// ---------------------------------------------------------------------------
// Stability computes
// ---------------------------------------------------------------------------

fn financial_stability(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let total_assets = s.balance_sheet.total_assets;

    let equity_ratio = s.balance_sheet.shareholders_equity / total_assets;
    let unlevered_assets = Decimal::ONE - s.balance_sheet.total_debt() / total_assets;
    let coverage_factor = (interest_coverage(s) / dec!(5)).min(Decimal::ONE);

    let score = clamp_score(
        equity_ratio * dec!(40) + unlevered_assets * dec!(30) + coverage_factor * dec!(30),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("نسبة حقوق الملكية", equity_ratio),
            ("نسبة الأصول غير الممولة بالديون", unlevered_assets),
            ("نسبة تغطية الفوائد", coverage_factor),
            ("مؤشر الاستقرار المالي", score),
        ],
    })
}

fn operational_stability(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let revenue = s.income_statement.revenue;

    let operating_margin = s.income_statement.operating_income / revenue;
    let asset_turnover = revenue / s.balance_sheet.total_assets;
    let expense_efficiency = Decimal::ONE - s.income_statement.operating_expenses / revenue;

    let score = clamp_score(
        operating_margin * dec!(40)
            + (asset_turnover / dec!(2)).min(Decimal::ONE) * dec!(30)
            + expense_efficiency * dec!(30),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("الهامش التشغيلي", operating_margin),
            ("دوران الأصول", asset_turnover),
            ("كفاءة المصروفات", expense_efficiency),
            ("مؤشر الاستقرار التشغيلي", score),
        ],
    })
}

fn investment_stability(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let net_income = s.income_statement.net_income;

    let roa = net_income / s.balance_sheet.total_assets;
    let roe = net_income / s.balance_sheet.shareholders_equity;
    let retention = s.balance_sheet.retained_earnings / s.balance_sheet.shareholders_equity;

    let score = clamp_score(
        (roa * dec!(20)).min(Decimal::ONE) * dec!(40)
            + (roe * dec!(10)).min(Decimal::ONE) * dec!(30)
            + retention * dec!(30),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("العائد على الأصول", roa),
            ("العائد على حقوق الملكية", roe),
            ("نسبة الاحتجاز", retention),
            ("مؤشر الاستقرار الاستثماري", score),
        ],
    })
}

fn cash_stability(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();

    let flow_stability = (cash_flow_coverage(s) / dec!(2)).min(Decimal::ONE);
    let cash_ratio = s.balance_sheet.cash / s.balance_sheet.total_assets;

    let score = clamp_score(flow_stability * dec!(50) + cash_ratio * dec!(50));
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("استقرار التدفق النقدي", flow_stability),
            ("نسبة النقدية", cash_ratio),
            ("مؤشر الاستقرار النقدي", score),
        ],
    })
}

fn credit_stability(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();

    let unlevered_assets =
        Decimal::ONE - s.balance_sheet.total_debt() / s.balance_sheet.total_assets;
    let credit_quality = (interest_coverage(s) / dec!(5)).min(Decimal::ONE);

    let score = clamp_score(unlevered_assets * dec!(60) + credit_quality * dec!(40));
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("نسبة الأصول غير الممولة بالديون", unlevered_assets),
            ("جودة الائتمان", credit_quality),
            ("مؤشر الاستقرار الائتماني", score),
        ],
    })
}

// ---------------------------------------------------------------------------
// Performance computes
// ---------------------------------------------------------------------------

fn financial_performance(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let revenue = s.income_statement.revenue;
    let net_income = s.income_statement.net_income;

    let net_margin = net_income / revenue * PERCENT;
    let roa = net_income / s.balance_sheet.total_assets * PERCENT;
    let roe = net_income / s.balance_sheet.shareholders_equity * PERCENT;
    let asset_turnover = revenue / s.balance_sheet.total_assets;

    let score = clamp_score(
        net_margin / dec!(2) + roa * dec!(2) + roe / dec!(2) + asset_turnover * dec!(20),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("هامش صافي الربح", net_margin),
            ("العائد على الأصول", roa),
            ("العائد على حقوق الملكية", roe),
            ("دوران الأصول", asset_turnover),
            ("مؤشر الأداء المالي", score),
        ],
    })
}

fn operational_performance(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let revenue = s.income_statement.revenue;

    let operating_margin = s.income_statement.operating_income / revenue * PERCENT;
    let expense_efficiency = PERCENT - s.income_statement.operating_expenses / revenue * PERCENT;
    let asset_turnover = revenue / s.balance_sheet.total_assets;

    let score = clamp_score(
        operating_margin / dec!(2) + expense_efficiency / dec!(2) + asset_turnover * dec!(20),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("الهامش التشغيلي", operating_margin),
            ("كفاءة المصروفات", expense_efficiency),
            ("دوران الأصول", asset_turnover),
            ("مؤشر الأداء التشغيلي", score),
        ],
    })
}

fn investment_performance(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let net_income = s.income_statement.net_income;

    let roa = net_income / s.balance_sheet.total_assets * PERCENT;
    let roe = net_income / s.balance_sheet.shareholders_equity * PERCENT;
    let retention =
        s.balance_sheet.retained_earnings / s.balance_sheet.shareholders_equity * PERCENT;
    let investment_efficiency = (roa + roe) / dec!(2);

    let score = clamp_score(
        roa * dec!(2) + roe / dec!(2) + retention / dec!(2) + investment_efficiency * dec!(2),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("العائد على الأصول", roa),
            ("العائد على حقوق الملكية", roe),
            ("نسبة الاحتجاز", retention),
            ("كفاءة الاستثمار", investment_efficiency),
            ("مؤشر الأداء الاستثماري", score),
        ],
    })
}

fn cash_performance(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();

    let flow_stability = (cash_flow_coverage(s) / dec!(2)).min(Decimal::ONE) * PERCENT;
    let cash_ratio = s.balance_sheet.cash / s.balance_sheet.total_assets * PERCENT;
    let cash_efficiency = (flow_stability + cash_ratio) / dec!(2);

    let score = clamp_score(
        flow_stability * dec!(0.5) + cash_ratio * dec!(0.5) + cash_efficiency * dec!(0.5),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("استقرار التدفق النقدي", flow_stability),
            ("نسبة النقدية", cash_ratio),
            ("كفاءة النقدية", cash_efficiency),
            ("مؤشر الأداء النقدي", score),
        ],
    })
}

fn credit_performance(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();

    let debt_efficiency =
        PERCENT - s.balance_sheet.total_debt() / s.balance_sheet.total_assets * PERCENT;
    let credit_quality = (interest_coverage(s) / dec!(5)).min(Decimal::ONE) * PERCENT;

    let score = clamp_score(debt_efficiency * dec!(0.6) + credit_quality * dec!(0.4));
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("كفاءة الديون", debt_efficiency),
            ("جودة الائتمان", credit_quality),
            ("مؤشر الأداء الائتماني", score),
        ],
    })
}

fn market_performance(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let price = ctx.stock_price()?;
    let shares = ctx.shares_outstanding();
    let eps = guard_nonzero(s.income_statement.net_income / shares, "ربحية السهم")?;
    let book_value_per_share = guard_nonzero(
        s.balance_sheet.shareholders_equity / shares,
        "القيمة الدفترية للسهم",
    )?;

    let market_efficiency = (price / eps / dec!(20)).min(Decimal::ONE) * PERCENT;
    let market_steadiness = (price / book_value_per_share / dec!(3)).min(Decimal::ONE) * PERCENT;

    let score = clamp_score(market_efficiency * dec!(0.5) + market_steadiness * dec!(0.5));
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("كفاءة السوق", market_efficiency),
            ("استقرار السوق", market_steadiness),
            ("مؤشر الأداء السوقي", score),
        ],
    })
}
