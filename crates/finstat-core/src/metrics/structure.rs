//! Structural analysis: common-size composition, year-over-year change, and
//! historical trend slopes, each folded into a 0-100 score. The horizontal
//! score is computed from actual history rather than placeholders.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::analyzer::DomainAnalyzer;
use crate::error::MetricResult;
use crate::fields::Field;
use crate::insight::{Condition, Rule};
use crate::metric::{MetricContext, MetricSpec, RawMetric};
use crate::rating::RatingScale;
use crate::score::clamp_score;
use crate::stats;
use crate::types::FinancialStatement;

const PERCENT: Decimal = dec!(100);

const STRUCTURAL_SCALE: RatingScale = RatingScale::AtLeast {
    excellent: dec!(80),
    good: dec!(60),
    average: dec!(40),
};

pub static STRUCTURE: DomainAnalyzer = DomainAnalyzer {
    domain: "structure",
    category: "structural",
    error_id: "structural-error",
    error_name: "خطأ في التحليل الهيكلي",
    metrics: &[
        MetricSpec {
            id: "vertical-analysis",
            name: "التحليل الرأسي",
            kind: "score",
            formula: "نسب البنود من إجمالي القائمة المالية",
            benchmark_key: "verticalAnalysis",
            min_periods: 1,
            guards: &[Field::Revenue, Field::TotalAssets],
            compute: vertical_analysis,
            scale: STRUCTURAL_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "هيكل مالي ممتاز يدل على توازن جيد في القوائم المالية",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "هيكل مالي ضعيف قد يشير لمشاكل في التكوين",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "هيكل مالي ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الهيكل المالي من خلال إعادة توزيع البنود",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الهيكل المالي الممتاز",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات التحليل الرأسي عبر الزمن",
                },
            ],
            interpretation: "التحليل الرأسي {value}% يُظهر هيكل القوائم المالية ونسب كل بند من إجمالي القائمة",
            interpret: None,
        },
        MetricSpec {
            id: "horizontal-analysis",
            name: "التحليل الأفقي",
            kind: "score",
            formula: "نسب التغير في البنود المالية عبر الزمن",
            benchmark_key: "horizontalAnalysis",
            min_periods: 2,
            guards: &[Field::Revenue, Field::TotalAssets],
            compute: horizontal_analysis,
            scale: STRUCTURAL_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "تحليل أفقي ممتاز يدل على نمو متوازن في البنود المالية",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "تحليل أفقي ضعيف قد يشير لمشاكل في النمو",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "تحليل أفقي ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين التحليل الأفقي من خلال تحقيق نمو متوازن",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على التحليل الأفقي الممتاز",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات التحليل الأفقي عبر الزمن",
                },
            ],
            interpretation: "التحليل الأفقي {value}% يُظهر التغيرات في البنود المالية عبر الزمن",
            interpret: None,
        },
        MetricSpec {
            id: "trend-analysis",
            name: "تحليل الاتجاه",
            kind: "score",
            formula: "حساب ميل الاتجاه للبيانات التاريخية",
            benchmark_key: "trendAnalysis",
            min_periods: 3,
            guards: &[],
            compute: trend_analysis,
            scale: STRUCTURAL_SCALE,
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "اتجاه ممتاز يدل على نمو قوي ومستدام",
                },
                Rule {
                    when: Condition::LessThan(dec!(50)),
                    text: "اتجاه ضعيف قد يشير لمشاكل في النمو",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "اتجاه ضعيف جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(60)),
                    text: "تحسين الاتجاه من خلال تحقيق نمو مستدام",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(90)),
                    text: "الحفاظ على الاتجاه الممتاز",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات النمو عبر الزمن",
                },
            ],
            interpretation: "تحليل الاتجاه {value}% يُظهر اتجاه النمو في الإيرادات ({اتجاه الإيرادات}%) والأرباح ({اتجاه الأرباح}%) والأصول ({اتجاه الأصول}%)",
            interpret: None,
        },
    ],
};

fn vertical_analysis(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let revenue = s.income_statement.revenue;
    let total_assets = s.balance_sheet.total_assets;

    let cogs_ratio = s.income_statement.cost_of_goods_sold / revenue * PERCENT;
    let gross_profit_ratio = s.income_statement.gross_profit() / revenue * PERCENT;
    let operating_expenses_ratio = s.income_statement.operating_expenses / revenue * PERCENT;
    let operating_income_ratio = s.income_statement.operating_income / revenue * PERCENT;
    let net_income_ratio = s.income_statement.net_income / revenue * PERCENT;

    let current_assets_ratio = s.balance_sheet.current_assets / total_assets * PERCENT;
    let fixed_assets_ratio = s.balance_sheet.fixed_assets / total_assets * PERCENT;
    let current_liabilities_ratio = s.balance_sheet.current_liabilities / total_assets * PERCENT;
    let long_term_debt_ratio = s.balance_sheet.long_term_debt / total_assets * PERCENT;
    let equity_ratio = s.balance_sheet.shareholders_equity / total_assets * PERCENT;

    let score = clamp_score(
        gross_profit_ratio / dec!(10)
            + operating_income_ratio / dec!(5)
            + net_income_ratio / dec!(2)
            + equity_ratio / dec!(2)
            + current_assets_ratio / dec!(5),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("نسبة تكلفة البضاعة المباعة", cogs_ratio),
            ("نسبة الربح الإجمالي", gross_profit_ratio),
            ("نسبة المصروفات التشغيلية", operating_expenses_ratio),
            ("نسبة الربح التشغيلي", operating_income_ratio),
            ("نسبة صافي الربح", net_income_ratio),
            ("نسبة الأصول المتداولة", current_assets_ratio),
            ("نسبة الأصول الثابتة", fixed_assets_ratio),
            ("نسبة الالتزامات المتداولة", current_liabilities_ratio),
            ("نسبة الديون طويلة الأجل", long_term_debt_ratio),
            ("نسبة حقوق الملكية", equity_ratio),
        ],
    })
}

fn horizontal_analysis(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let current = ctx.latest();
    let previous = ctx.previous()?;

    let revenue_growth = stats::percentage_change(
        previous.income_statement.revenue,
        current.income_statement.revenue,
    );
    let asset_growth = stats::percentage_change(
        previous.balance_sheet.total_assets,
        current.balance_sheet.total_assets,
    );
    let profit_growth = stats::percentage_change(
        previous.income_statement.net_income,
        current.income_statement.net_income,
    );
    let equity_growth = stats::percentage_change(
        previous.balance_sheet.shareholders_equity,
        current.balance_sheet.shareholders_equity,
    );

    let score = clamp_score(
        revenue_growth.abs() / dec!(2)
            + asset_growth.abs() / dec!(2)
            + profit_growth.abs() / dec!(2)
            + equity_growth.abs() / dec!(2),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("نمو الإيرادات", revenue_growth),
            ("نمو الأصول", asset_growth),
            ("نمو الأرباح", profit_growth),
            ("نمو حقوق الملكية", equity_growth),
        ],
    })
}

fn trend_analysis(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let revenues = ctx.series(|s: &FinancialStatement| s.income_statement.revenue);
    let profits = ctx.series(|s: &FinancialStatement| s.income_statement.net_income);
    let assets = ctx.series(|s: &FinancialStatement| s.balance_sheet.total_assets);

    let revenue_trend = stats::trend(&revenues).slope;
    let profit_trend = stats::trend(&profits).slope;
    let assets_trend = stats::trend(&assets).slope;

    let score = clamp_score(
        revenue_trend.abs() * dec!(10)
            + profit_trend.abs() * dec!(10)
            + assets_trend.abs() * dec!(10),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("اتجاه الإيرادات", revenue_trend),
            ("اتجاه الأرباح", profit_trend),
            ("اتجاه الأصول", assets_trend),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::result::{Rating, Status};
    use crate::types::Company;
    use pretty_assertions::assert_eq;

    fn statement(revenue: Decimal, net_income: Decimal, assets: Decimal) -> FinancialStatement {
        let mut s = FinancialStatement::default();
        s.income_statement.revenue = revenue;
        s.income_statement.cost_of_goods_sold = revenue * dec!(0.6);
        s.income_statement.operating_income = revenue * dec!(0.2);
        s.income_statement.net_income = net_income;
        s.balance_sheet.total_assets = assets;
        s.balance_sheet.current_assets = assets * dec!(0.3);
        s.balance_sheet.shareholders_equity = assets * dec!(0.5);
        s
    }

    #[test]
    fn vertical_analysis_scores_common_size() {
        let s = statement(dec!(1_000_000), dec!(100_000), dec!(1_000_000));
        let results = STRUCTURE.analyze(&[s], &Company::default(), None, None);
        let v = &results[0];
        assert_eq!(v.id, "vertical-analysis");
        // 40/10 + 20/5 + 10/2 + 50/2 + 30/5 = 44
        assert_eq!(v.current_value, dec!(44));
        assert_eq!(v.rating, Rating::Average);
        assert_eq!(v.calculation.variables["نسبة الربح الإجمالي"], dec!(40));
        assert_eq!(v.calculation.variables.len(), 10);
    }

    #[test]
    fn horizontal_analysis_needs_two_periods() {
        let s = statement(dec!(1_000_000), dec!(100_000), dec!(1_000_000));
        let results = STRUCTURE.analyze(&[s], &Company::default(), None, None);
        assert_eq!(results[1].id, "horizontal-analysis");
        assert_eq!(results[1].status, Status::Error);
        assert_eq!(results[2].id, "trend-analysis");
        assert_eq!(results[2].status, Status::Error);
    }

    #[test]
    fn horizontal_analysis_uses_real_growth() {
        let history = vec![
            statement(dec!(100), dec!(10), dec!(1000)),
            statement(dec!(120), dec!(12), dec!(1100)),
        ];
        let results = STRUCTURE.analyze(&history, &Company::default(), None, None);
        let h = &results[1];
        assert_eq!(h.status, Status::Completed);
        assert_eq!(h.calculation.variables["نمو الإيرادات"], dec!(20));
        assert_eq!(h.calculation.variables["نمو الأصول"], dec!(10));
        // (20 + 10 + 20 + 10) / 2 = 30
        assert_eq!(h.current_value, dec!(30));
        assert_eq!(h.rating, Rating::Poor);
    }

    #[test]
    fn trend_analysis_reports_slopes() {
        let history = vec![
            statement(dec!(100), dec!(10), dec!(1000)),
            statement(dec!(200), dec!(20), dec!(1000)),
            statement(dec!(300), dec!(30), dec!(1000)),
        ];
        let results = STRUCTURE.analyze(&history, &Company::default(), None, None);
        let t = &results[2];
        assert_eq!(t.status, Status::Completed);
        assert_eq!(t.calculation.variables["اتجاه الإيرادات"], dec!(100));
        assert_eq!(t.calculation.variables["اتجاه الأصول"], Decimal::ZERO);
        assert_eq!(t.current_value, dec!(100));
        assert!(t.interpretation.contains("100.00"));
    }
}
