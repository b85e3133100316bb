//! Leverage ratios: capital structure and debt service capacity.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::analyzer::DomainAnalyzer;
use crate::error::MetricResult;
use crate::fields::Field;
use crate::insight::{Condition, Rule};
use crate::metric::{guard_nonzero, MetricContext, MetricSpec, RawMetric};
use crate::rating::RatingScale;

/// Principal repayment proxy: 10% of current liabilities per year.
const PRINCIPAL_PROXY_RATE: Decimal = dec!(0.1);

const PERCENT: Decimal = dec!(100);

pub static LEVERAGE: DomainAnalyzer = DomainAnalyzer {
    domain: "leverage",
    category: "leverage",
    error_id: "leverage-error",
    error_name: "خطأ في تحليل الرفع المالي",
    metrics: &[
        MetricSpec {
            id: "debt-to-assets",
            name: "نسبة الدين إلى إجمالي الأصول",
            kind: "percentage",
            formula: "(إجمالي الديون ÷ إجمالي الأصول) × 100",
            benchmark_key: "debtToAssets",
            min_periods: 1,
            guards: &[Field::TotalAssets],
            compute: debt_to_assets,
            scale: RatingScale::AtMost {
                excellent: dec!(30),
                good: dec!(50),
                average: dec!(70),
            },
            insights: &[
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "مستوى ديون منخفض يدل على قوة مالية جيدة",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(60)),
                    text: "مستوى ديون عالي قد يشير لمخاطر مالية",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "مستوى ديون عالي جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::GreaterThan(dec!(50)),
                    text: "تقليل مستوى الديون أو زيادة الأصول",
                },
                Rule {
                    when: Condition::LessThan(dec!(20)),
                    text: "النظر في الاستفادة من الرافعة المالية للنمو",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات نسبة الدين إلى الأصول عبر الزمن",
                },
            ],
            interpretation: "نسبة الدين إلى إجمالي الأصول {value}% تعني أن {value}% من الأصول ممولة بالديون",
            interpret: None,
        },
        MetricSpec {
            id: "debt-to-equity",
            name: "نسبة الدين إلى حقوق الملكية",
            kind: "ratio",
            formula: "إجمالي الديون ÷ حقوق الملكية",
            benchmark_key: "debtToEquity",
            min_periods: 1,
            guards: &[Field::ShareholdersEquity],
            compute: debt_to_equity,
            scale: RatingScale::AtMost {
                excellent: dec!(0.5),
                good: dec!(1),
                average: dec!(2),
            },
            insights: &[
                Rule {
                    when: Condition::LessThan(dec!(0.5)),
                    text: "مستوى ديون منخفض يدل على قوة مالية جيدة",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(2)),
                    text: "مستوى ديون عالي قد يشير لمخاطر مالية",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(3)),
                    text: "مستوى ديون عالي جداً يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::GreaterThan(dec!(1.5)),
                    text: "تقليل مستوى الديون أو زيادة حقوق الملكية",
                },
                Rule {
                    when: Condition::LessThan(dec!(0.3)),
                    text: "النظر في الاستفادة من الرافعة المالية للنمو",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات نسبة الدين إلى حقوق الملكية عبر الزمن",
                },
            ],
            interpretation: "نسبة الدين إلى حقوق الملكية {value} تعني أن كل ريال من حقوق الملكية يقابله {value} ريال من الديون",
            interpret: None,
        },
        MetricSpec {
            id: "interest-coverage",
            name: "نسبة تغطية الفوائد",
            kind: "ratio",
            formula: "الأرباح التشغيلية ÷ مصروفات الفوائد",
            benchmark_key: "interestCoverage",
            min_periods: 1,
            guards: &[Field::InterestExpense],
            compute: interest_coverage,
            scale: RatingScale::AtLeast {
                excellent: dec!(5),
                good: dec!(2.5),
                average: dec!(1.5),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(5)),
                    text: "قدرة ممتازة على تغطية مصروفات الفوائد",
                },
                Rule {
                    when: Condition::LessThan(dec!(2.5)),
                    text: "قدرة محدودة على تغطية مصروفات الفوائد",
                },
                Rule {
                    when: Condition::LessThan(dec!(1)),
                    text: "عدم القدرة على تغطية مصروفات الفوائد",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(3)),
                    text: "تحسين الأرباح التشغيلية أو تقليل مصروفات الفوائد",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(10)),
                    text: "النظر في الاستفادة من الرافعة المالية",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات نسبة تغطية الفوائد عبر الزمن",
                },
            ],
            interpretation: "نسبة تغطية الفوائد {value} تعني أن الشركة تستطيع تغطية مصروفات الفوائد {value} مرة من الأرباح التشغيلية",
            interpret: None,
        },
        MetricSpec {
            id: "debt-service-coverage",
            name: "نسبة تغطية خدمة الدين",
            kind: "ratio",
            formula: "الأرباح التشغيلية ÷ خدمة الدين الإجمالية",
            benchmark_key: "debtServiceCoverage",
            min_periods: 1,
            guards: &[],
            compute: debt_service_coverage,
            scale: RatingScale::AtLeast {
                excellent: dec!(2.5),
                good: dec!(1.5),
                average: dec!(1.2),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(2.5)),
                    text: "قدرة ممتازة على تغطية خدمة الدين",
                },
                Rule {
                    when: Condition::LessThan(dec!(1.5)),
                    text: "قدرة محدودة على تغطية خدمة الدين",
                },
                Rule {
                    when: Condition::LessThan(dec!(1)),
                    text: "عدم القدرة على تغطية خدمة الدين",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(2)),
                    text: "تحسين الأرباح التشغيلية أو إعادة هيكلة الديون",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(5)),
                    text: "النظر في الاستفادة من الرافعة المالية",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات نسبة تغطية خدمة الدين عبر الزمن",
                },
            ],
            interpretation: "نسبة تغطية خدمة الدين {value} تعني أن الشركة تستطيع تغطية خدمة الدين {value} مرة من الأرباح التشغيلية",
            interpret: None,
        },
        MetricSpec {
            id: "equity-to-assets",
            name: "نسبة حقوق الملكية إلى الأصول",
            kind: "percentage",
            formula: "(حقوق الملكية ÷ إجمالي الأصول) × 100",
            benchmark_key: "equityToAssets",
            min_periods: 1,
            guards: &[Field::TotalAssets],
            compute: equity_to_assets,
            scale: RatingScale::AtLeast {
                excellent: dec!(50),
                good: dec!(40),
                average: dec!(30),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(50)),
                    text: "قوة مالية ممتازة مع اعتماد منخفض على الديون",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "اعتماد عالي على الديون قد يشير لمخاطر مالية",
                },
                Rule {
                    when: Condition::LessThan(dec!(20)),
                    text: "اعتماد عالي جداً على الديون يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(40)),
                    text: "زيادة حقوق الملكية أو تقليل الأصول",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(70)),
                    text: "النظر في الاستفادة من الرافعة المالية",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات نسبة حقوق الملكية إلى الأصول عبر الزمن",
                },
            ],
            interpretation: "نسبة حقوق الملكية إلى الأصول {value}% تعني أن {value}% من الأصول ممولة بحقوق الملكية",
            interpret: None,
        },
        MetricSpec {
            id: "debt-to-capital",
            name: "نسبة الدين إلى رأس المال",
            kind: "percentage",
            formula: "(إجمالي الديون ÷ إجمالي رأس المال) × 100",
            benchmark_key: "debtToCapital",
            min_periods: 1,
            guards: &[],
            compute: debt_to_capital,
            scale: RatingScale::AtMost {
                excellent: dec!(40),
                good: dec!(60),
                average: dec!(80),
            },
            insights: &[
                Rule {
                    when: Condition::LessThan(dec!(40)),
                    text: "هيكل رأس مال متوازن مع اعتماد معتدل على الديون",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(60)),
                    text: "اعتماد عالي على الديون قد يشير لمخاطر مالية",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "اعتماد عالي جداً على الديون يتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::GreaterThan(dec!(50)),
                    text: "إعادة هيكلة رأس المال لتقليل الاعتماد على الديون",
                },
                Rule {
                    when: Condition::LessThan(dec!(30)),
                    text: "النظر في الاستفادة من الرافعة المالية للنمو",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات نسبة الدين إلى رأس المال عبر الزمن",
                },
            ],
            interpretation: "نسبة الدين إلى رأس المال {value}% تعني أن {value}% من رأس المال ممول بالديون",
            interpret: None,
        },
    ],
};

fn debt_to_assets(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let b = &ctx.latest().balance_sheet;
    let total_debt = b.total_debt();
    Ok(RawMetric {
        value: total_debt / b.total_assets * PERCENT,
        variables: vec![
            ("إجمالي الديون", total_debt),
            ("إجمالي الأصول", b.total_assets),
            ("الديون قصيرة الأجل", b.current_liabilities),
            ("الديون طويلة الأجل", b.long_term_debt),
        ],
    })
}

fn debt_to_equity(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let b = &ctx.latest().balance_sheet;
    let total_debt = b.total_debt();
    Ok(RawMetric {
        value: total_debt / b.shareholders_equity,
        variables: vec![
            ("إجمالي الديون", total_debt),
            ("حقوق الملكية", b.shareholders_equity),
            ("الديون قصيرة الأجل", b.current_liabilities),
            ("الديون طويلة الأجل", b.long_term_debt),
        ],
    })
}

fn interest_coverage(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let i = &ctx.latest().income_statement;
    Ok(RawMetric {
        value: i.operating_income / i.interest_expense,
        variables: vec![
            ("الأرباح التشغيلية", i.operating_income),
            ("مصروفات الفوائد", i.interest_expense),
        ],
    })
}

fn debt_service_coverage(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let interest = s.income_statement.interest_expense;
    let principal = s.balance_sheet.current_liabilities * PRINCIPAL_PROXY_RATE;
    let total_service = guard_nonzero(interest + principal, "خدمة الدين الإجمالية")?;
    Ok(RawMetric {
        value: s.income_statement.operating_income / total_service,
        variables: vec![
            ("الأرباح التشغيلية", s.income_statement.operating_income),
            ("مصروفات الفوائد", interest),
            ("أقساط الدين", principal),
            ("خدمة الدين الإجمالية", total_service),
        ],
    })
}

fn equity_to_assets(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let b = &ctx.latest().balance_sheet;
    Ok(RawMetric {
        value: b.shareholders_equity / b.total_assets * PERCENT,
        variables: vec![
            ("حقوق الملكية", b.shareholders_equity),
            ("إجمالي الأصول", b.total_assets),
        ],
    })
}

fn debt_to_capital(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let b = &ctx.latest().balance_sheet;
    let total_debt = b.total_debt();
    let total_capital = guard_nonzero(total_debt + b.shareholders_equity, "إجمالي رأس المال")?;
    Ok(RawMetric {
        value: total_debt / total_capital * PERCENT,
        variables: vec![
            ("إجمالي الديون", total_debt),
            ("حقوق الملكية", b.shareholders_equity),
            ("إجمالي رأس المال", total_capital),
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
        s.income_statement.operating_income = dec!(200);
        s.income_statement.interest_expense = dec!(40);
        s.balance_sheet.total_assets = dec!(1000);
        s.balance_sheet.current_liabilities = dec!(200);
        s.balance_sheet.long_term_debt = dec!(300);
        s.balance_sheet.shareholders_equity = dec!(500);
        s
    }

    #[test]
    fn lower_is_better_scales_apply() {
        let statements = vec![sample_statement()];
        let results = LEVERAGE.analyze(&statements, &Company::default(), None, None);
        assert_eq!(results.len(), 6);

        let dta = &results[0];
        assert_eq!(dta.current_value, dec!(50)); // (200+300)/1000
        assert_eq!(dta.rating, Rating::Good);

        let dte = &results[1];
        assert_eq!(dte.current_value, dec!(1));
        assert_eq!(dte.rating, Rating::Good);

        let dtc = &results[5];
        assert_eq!(dtc.current_value, dec!(50));
        assert_eq!(dtc.rating, Rating::Good);
    }

    #[test]
    fn coverage_ratios() {
        let statements = vec![sample_statement()];
        let results = LEVERAGE.analyze(&statements, &Company::default(), None, None);

        let ic = &results[2];
        assert_eq!(ic.current_value, dec!(5));
        assert_eq!(ic.rating, Rating::Excellent);

        // service = 40 + 200 * 0.1 = 60
        let dsc = &results[3];
        assert_eq!(dsc.current_value, dec!(200) / dec!(60));
        assert_eq!(dsc.rating, Rating::Excellent);
        assert_eq!(dsc.calculation.variables["أقساط الدين"], dec!(20));
    }

    #[test]
    fn zero_interest_expense_errors_interest_coverage() {
        let mut s = sample_statement();
        s.income_statement.interest_expense = Decimal::ZERO;
        let results = LEVERAGE.analyze(&[s], &Company::default(), None, None);

        let ic = &results[2];
        assert_eq!(ic.status, Status::Error);
        assert_eq!(ic.name, "نسبة تغطية الفوائد");
        // debt service still has the principal proxy
        assert_eq!(results[3].status, Status::Completed);
    }

    #[test]
    fn unlevered_company_errors_capital_rows() {
        let mut s = FinancialStatement::default();
        s.balance_sheet.total_assets = dec!(100);
        let results = LEVERAGE.analyze(&[s], &Company::default(), None, None);

        assert_eq!(results[0].status, Status::Completed); // 0% debt to assets
        assert_eq!(results[0].rating, Rating::Excellent);
        assert_eq!(results[1].status, Status::Error); // no equity
        assert_eq!(results[3].status, Status::Error); // no debt service
        assert_eq!(results[5].status, Status::Error); // no capital
    }
}
