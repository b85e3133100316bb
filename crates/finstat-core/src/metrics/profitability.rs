//! Profitability margins and returns, expressed as percentages.

use rust_decimal_macros::dec;

use crate::analyzer::DomainAnalyzer;
use crate::error::MetricResult;
use crate::fields::Field;
use crate::insight::{Condition, Rule};
use crate::metric::{guard_nonzero, MetricContext, MetricSpec, RawMetric};
use crate::rating::RatingScale;
use rust_decimal::Decimal;

/// Default tax rate applied when deriving NOPAT from net income.
const NOPAT_TAX_RATE: Decimal = dec!(0.25);

const PERCENT: Decimal = dec!(100);

pub static PROFITABILITY: DomainAnalyzer = DomainAnalyzer {
    domain: "profitability",
    category: "profitability",
    error_id: "profitability-error",
    error_name: "خطأ في تحليل الربحية",
    metrics: &[
        MetricSpec {
            id: "gross-profit-margin",
            name: "هامش الربح الإجمالي",
            kind: "percentage",
            formula: "(الربح الإجمالي ÷ الإيرادات) × 100",
            benchmark_key: "grossProfitMargin",
            min_periods: 1,
            guards: &[Field::Revenue],
            compute: gross_profit_margin,
            scale: RatingScale::AtLeast {
                excellent: dec!(50),
                good: dec!(35),
                average: dec!(20),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(50)),
                    text: "هامش ربح إجمالي ممتاز يدل على قوة التسعير أو كفاءة التكلفة",
                },
                Rule {
                    when: Condition::LessThan(dec!(20)),
                    text: "هامش ربح إجمالي منخفض قد يشير لمشاكل في التسعير أو ارتفاع التكاليف",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(70)),
                    text: "هامش ربح إجمالي عالي جداً قد يشير لاحتكار أو ميزة تنافسية قوية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(25)),
                    text: "مراجعة استراتيجية التسعير وتحسين كفاءة الإنتاج",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(60)),
                    text: "التأكد من استدامة الميزة التنافسية ومراقبة المنافسين",
                },
                Rule {
                    when: Condition::Always,
                    text: "مقارنة الهامش مع متوسط الصناعة والمنافسين",
                },
            ],
            interpretation: "هامش الربح الإجمالي {value}% يعني أن الشركة تحتفظ بـ {value}% من كل ريال مبيعات كربح إجمالي",
            interpret: None,
        },
        MetricSpec {
            id: "operating-profit-margin",
            name: "هامش الربح التشغيلي",
            kind: "percentage",
            formula: "(الربح التشغيلي ÷ الإيرادات) × 100",
            benchmark_key: "operatingProfitMargin",
            min_periods: 1,
            guards: &[Field::Revenue],
            compute: operating_profit_margin,
            scale: RatingScale::AtLeast {
                excellent: dec!(20),
                good: dec!(12),
                average: dec!(6),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(15)),
                    text: "كفاءة تشغيلية ممتازة تدل على إدارة جيدة للعمليات",
                },
                Rule {
                    when: Condition::LessThan(dec!(5)),
                    text: "كفاءة تشغيلية منخفضة تحتاج تحسين في إدارة التكاليف",
                },
                Rule {
                    when: Condition::LessThan(dec!(0)),
                    text: "خسائر تشغيلية تتطلب مراجعة فورية للعمليات",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(8)),
                    text: "تحسين كفاءة العمليات وتقليل المصروفات التشغيلية",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(25)),
                    text: "التأكد من استدامة الكفاءة التشغيلية العالية",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة الاتجاهات في الهامش التشغيلي عبر الزمن",
                },
            ],
            interpretation: "هامش الربح التشغيلي {value}% يعكس كفاءة العمليات التشغيلية للشركة",
            interpret: None,
        },
        MetricSpec {
            id: "net-profit-margin",
            name: "هامش صافي الربح",
            kind: "percentage",
            formula: "(صافي الربح ÷ الإيرادات) × 100",
            benchmark_key: "netProfitMargin",
            min_periods: 1,
            guards: &[Field::Revenue],
            compute: net_profit_margin,
            scale: RatingScale::AtLeast {
                excellent: dec!(15),
                good: dec!(8),
                average: dec!(3),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(10)),
                    text: "ربحية ممتازة تدل على إدارة مالية قوية",
                },
                Rule {
                    when: Condition::LessThan(dec!(3)),
                    text: "ربحية منخفضة تحتاج تحسين في جميع جوانب العمليات",
                },
                Rule {
                    when: Condition::LessThan(dec!(0)),
                    text: "خسائر صافية تتطلب تدخل فوري",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(5)),
                    text: "تحسين الربحية من خلال زيادة الإيرادات وتقليل التكاليف",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(20)),
                    text: "التأكد من استدامة الربحية العالية",
                },
                Rule {
                    when: Condition::Always,
                    text: "مقارنة الهامش مع المنافسين ومتوسط الصناعة",
                },
            ],
            interpretation: "هامش صافي الربح {value}% يُظهر النسبة المئوية من الإيرادات التي تبقى كربح صافي بعد جميع التكاليف والضرائب",
            interpret: None,
        },
        MetricSpec {
            id: "return-on-assets",
            name: "العائد على الأصول (ROA)",
            kind: "percentage",
            formula: "(صافي الربح ÷ إجمالي الأصول) × 100",
            benchmark_key: "roa",
            min_periods: 1,
            guards: &[Field::TotalAssets],
            compute: return_on_assets,
            scale: RatingScale::AtLeast {
                excellent: dec!(15),
                good: dec!(10),
                average: dec!(5),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(15)),
                    text: "كفاءة ممتازة في استخدام الأصول",
                },
                Rule {
                    when: Condition::LessThan(dec!(5)),
                    text: "كفاءة منخفضة في استخدام الأصول تحتاج تحسين",
                },
                Rule {
                    when: Condition::LessThan(dec!(0)),
                    text: "خسائر في استخدام الأصول",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(8)),
                    text: "تحسين كفاءة استخدام الأصول أو تقليل الأصول غير المستخدمة",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(20)),
                    text: "التأكد من استدامة الكفاءة العالية",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات ROA عبر الزمن",
                },
            ],
            interpretation: "العائد على الأصول {value}% يُظهر كفاءة الشركة في استخدام أصولها لتوليد الأرباح",
            interpret: None,
        },
        MetricSpec {
            id: "return-on-equity",
            name: "العائد على حقوق الملكية (ROE)",
            kind: "percentage",
            formula: "(صافي الربح ÷ حقوق الملكية) × 100",
            benchmark_key: "roe",
            min_periods: 1,
            guards: &[Field::ShareholdersEquity],
            compute: return_on_equity,
            scale: RatingScale::AtLeast {
                excellent: dec!(20),
                good: dec!(15),
                average: dec!(10),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(20)),
                    text: "عائد ممتاز للمساهمين يدل على إدارة مالية قوية",
                },
                Rule {
                    when: Condition::LessThan(dec!(10)),
                    text: "عائد منخفض للمساهمين قد يؤثر على جاذبية الاستثمار",
                },
                Rule {
                    when: Condition::LessThan(dec!(0)),
                    text: "خسائر للمساهمين",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(12)),
                    text: "تحسين الربحية أو تقليل حقوق الملكية من خلال إعادة شراء الأسهم",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(30)),
                    text: "التأكد من استدامة العائد العالي",
                },
                Rule {
                    when: Condition::Always,
                    text: "مقارنة ROE مع متوسط الصناعة والمنافسين",
                },
            ],
            interpretation: "العائد على حقوق الملكية {value}% يُظهر العائد الذي يحققه المساهمون على استثماراتهم",
            interpret: None,
        },
        MetricSpec {
            id: "return-on-invested-capital",
            name: "العائد على رأس المال المستثمر (ROIC)",
            kind: "percentage",
            formula: "(NOPAT ÷ رأس المال المستثمر) × 100",
            benchmark_key: "roic",
            min_periods: 1,
            guards: &[],
            compute: return_on_invested_capital,
            scale: RatingScale::AtLeast {
                excellent: dec!(15),
                good: dec!(10),
                average: dec!(6),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(15)),
                    text: "كفاءة ممتازة في استخدام رأس المال المستثمر",
                },
                Rule {
                    when: Condition::LessThan(dec!(8)),
                    text: "كفاءة منخفضة في استخدام رأس المال المستثمر",
                },
                Rule {
                    when: Condition::LessThan(dec!(0)),
                    text: "خسائر في استخدام رأس المال المستثمر",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(10)),
                    text: "تحسين كفاءة استخدام رأس المال المستثمر",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(25)),
                    text: "التأكد من استدامة الكفاءة العالية",
                },
                Rule {
                    when: Condition::Always,
                    text: "مقارنة ROIC مع تكلفة رأس المال",
                },
            ],
            interpretation: "العائد على رأس المال المستثمر {value}% يُظهر كفاءة الشركة في استخدام رأس المال المستثمر لتوليد الأرباح",
            interpret: None,
        },
    ],
};

fn gross_profit_margin(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let i = &ctx.latest().income_statement;
    let gross_profit = i.revenue - i.cost_of_goods_sold;
    Ok(RawMetric {
        value: gross_profit / i.revenue * PERCENT,
        variables: vec![
            ("الربح الإجمالي", gross_profit),
            ("الإيرادات", i.revenue),
            ("تكلفة البضاعة المباعة", i.cost_of_goods_sold),
        ],
    })
}

fn operating_profit_margin(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let i = &ctx.latest().income_statement;
    Ok(RawMetric {
        value: i.operating_income / i.revenue * PERCENT,
        variables: vec![
            ("الربح التشغيلي", i.operating_income),
            ("الإيرادات", i.revenue),
        ],
    })
}

fn net_profit_margin(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let i = &ctx.latest().income_statement;
    Ok(RawMetric {
        value: i.net_income / i.revenue * PERCENT,
        variables: vec![("صافي الربح", i.net_income), ("الإيرادات", i.revenue)],
    })
}

fn return_on_assets(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    Ok(RawMetric {
        value: s.income_statement.net_income / s.balance_sheet.total_assets * PERCENT,
        variables: vec![
            ("صافي الربح", s.income_statement.net_income),
            ("إجمالي الأصول", s.balance_sheet.total_assets),
        ],
    })
}

fn return_on_equity(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    Ok(RawMetric {
        value: s.income_statement.net_income / s.balance_sheet.shareholders_equity * PERCENT,
        variables: vec![
            ("صافي الربح", s.income_statement.net_income),
            ("حقوق الملكية", s.balance_sheet.shareholders_equity),
        ],
    })
}

fn return_on_invested_capital(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let total_debt = s.balance_sheet.total_debt();
    let invested_capital =
        guard_nonzero(total_debt + s.balance_sheet.shareholders_equity, "رأس المال المستثمر")?;
    let nopat = s.income_statement.net_income
        + s.income_statement.interest_expense * (Decimal::ONE - NOPAT_TAX_RATE);
    Ok(RawMetric {
        value: nopat / invested_capital * PERCENT,
        variables: vec![
            ("NOPAT", nopat),
            ("رأس المال المستثمر", invested_capital),
            ("إجمالي الديون", total_debt),
            ("حقوق الملكية", s.balance_sheet.shareholders_equity),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::result::{Rating, Status};
    use crate::types::{Company, FinancialStatement};
    use pretty_assertions::assert_eq;

    fn sample_statement() -> FinancialStatement {
        let mut s = FinancialStatement::default();
        s.income_statement.revenue = dec!(1000);
        s.income_statement.cost_of_goods_sold = dec!(600);
        s.income_statement.operating_income = dec!(150);
        s.income_statement.net_income = dec!(90);
        s.income_statement.interest_expense = dec!(20);
        s.balance_sheet.total_assets = dec!(800);
        s.balance_sheet.current_liabilities = dec!(150);
        s.balance_sheet.long_term_debt = dec!(250);
        s.balance_sheet.shareholders_equity = dec!(400);
        s
    }

    #[test]
    fn margins_are_percentages() {
        let statements = vec![sample_statement()];
        let results = PROFITABILITY.analyze(&statements, &Company::default(), None, None);
        assert_eq!(results.len(), 6);

        assert_eq!(results[0].current_value, dec!(40)); // gross
        assert_eq!(results[0].rating, Rating::Good);
        assert_eq!(results[1].current_value, dec!(15)); // operating
        assert_eq!(results[2].current_value, dec!(9)); // net
        assert_eq!(results[2].rating, Rating::Good);
    }

    #[test]
    fn roa_and_roe() {
        let statements = vec![sample_statement()];
        let results = PROFITABILITY.analyze(&statements, &Company::default(), None, None);

        let roa = &results[3];
        assert_eq!(roa.current_value, dec!(11.25));
        assert_eq!(roa.rating, Rating::Good);

        let roe = &results[4];
        assert_eq!(roe.current_value, dec!(22.5));
        assert_eq!(roe.rating, Rating::Excellent);
    }

    #[test]
    fn roic_applies_default_tax_shield() {
        let statements = vec![sample_statement()];
        let results = PROFITABILITY.analyze(&statements, &Company::default(), None, None);

        let roic = &results[5];
        // NOPAT = 90 + 20 * 0.75 = 105, capital = 150 + 250 + 400 = 800
        assert_eq!(roic.current_value, dec!(13.125));
        assert_eq!(roic.rating, Rating::Good);
        assert_eq!(roic.calculation.variables["NOPAT"], dec!(105));
        assert_eq!(roic.calculation.variables["رأس المال المستثمر"], dec!(800));
    }

    #[test]
    fn zero_revenue_errors_the_margin_rows_only() {
        let mut s = sample_statement();
        s.income_statement.revenue = Decimal::ZERO;
        let results = PROFITABILITY.analyze(&[s], &Company::default(), None, None);

        for r in &results[0..3] {
            assert_eq!(r.status, Status::Error, "{} should error", r.id);
        }
        assert_eq!(results[3].status, Status::Completed);
        assert_eq!(results[4].status, Status::Completed);
        assert_eq!(results[5].status, Status::Completed);
    }

    #[test]
    fn zero_invested_capital_errors_roic() {
        let mut s = FinancialStatement::default();
        s.income_statement.revenue = dec!(100);
        let results = PROFITABILITY.analyze(&[s], &Company::default(), None, None);
        let roic = &results[5];
        assert_eq!(roic.status, Status::Error);
        assert_eq!(roic.name, "العائد على رأس المال المستثمر (ROIC)");
    }
}
