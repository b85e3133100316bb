//! Activity (turnover) ratios. Turnover rows also report the implied day
//! counts (365 / turnover) as audit variables.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::analyzer::DomainAnalyzer;
use crate::error::MetricResult;
use crate::fields::Field;
use crate::insight::{Condition, Rule};
use crate::metric::{MetricContext, MetricSpec, RawMetric};
use crate::rating::RatingScale;

const DAYS_PER_YEAR: Decimal = dec!(365);

pub static ACTIVITY: DomainAnalyzer = DomainAnalyzer {
    domain: "activity",
    category: "activity",
    error_id: "activity-error",
    error_name: "خطأ في تحليل النشاط",
    metrics: &[
        MetricSpec {
            id: "inventory-turnover",
            name: "معدل دوران المخزون",
            kind: "ratio",
            formula: "تكلفة البضاعة المباعة ÷ متوسط المخزون",
            benchmark_key: "inventoryTurnover",
            min_periods: 1,
            guards: &[Field::Inventory],
            compute: inventory_turnover,
            scale: RatingScale::AtLeast {
                excellent: dec!(6),
                good: dec!(4),
                average: dec!(2),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(6)),
                    text: "دوران ممتاز للمخزون يدل على كفاءة عالية في إدارة المخزون",
                },
                Rule {
                    when: Condition::LessThan(dec!(2)),
                    text: "دوران بطيء للمخزون قد يشير لمشاكل في المبيعات أو إدارة المخزون",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(12)),
                    text: "دوران سريع جداً قد يشير لنقص في المخزون",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(3)),
                    text: "تحسين إدارة المخزون وتقليل المخزون الراكد",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(10)),
                    text: "التأكد من توفر المخزون الكافي لتلبية الطلب",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات دوران المخزون عبر الزمن",
                },
            ],
            interpretation: "معدل دوران المخزون {value} يعني أن المخزون يتم بيعه {value} مرة في السنة، أي كل {أيام المخزون} يوم",
            interpret: None,
        },
        MetricSpec {
            id: "receivables-turnover",
            name: "معدل دوران الذمم المدينة",
            kind: "ratio",
            formula: "الإيرادات ÷ متوسط الذمم المدينة",
            benchmark_key: "receivablesTurnover",
            min_periods: 1,
            guards: &[Field::AccountsReceivable],
            compute: receivables_turnover,
            scale: RatingScale::AtLeast {
                excellent: dec!(8),
                good: dec!(6),
                average: dec!(4),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(8)),
                    text: "دوران ممتاز للذمم المدينة يدل على كفاءة عالية في التحصيل",
                },
                Rule {
                    when: Condition::LessThan(dec!(4)),
                    text: "دوران بطيء للذمم المدينة قد يشير لمشاكل في التحصيل",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(15)),
                    text: "دوران سريع جداً قد يشير لسياسة ائتمان صارمة",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(5)),
                    text: "تحسين سياسات التحصيل وتقليل فترة التحصيل",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(12)),
                    text: "مراجعة سياسة الائتمان للتأكد من عدم فقدان العملاء",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات دوران الذمم المدينة عبر الزمن",
                },
            ],
            interpretation: "معدل دوران الذمم المدينة {value} يعني أن الذمم المدينة يتم تحصيلها {value} مرة في السنة، أي كل {أيام التحصيل} يوم",
            interpret: None,
        },
        MetricSpec {
            id: "payables-turnover",
            name: "معدل دوران الذمم الدائنة",
            kind: "ratio",
            formula: "تكلفة البضاعة المباعة ÷ متوسط الذمم الدائنة",
            benchmark_key: "payablesTurnover",
            min_periods: 1,
            guards: &[Field::AccountsPayable],
            compute: payables_turnover,
            scale: RatingScale::AtLeast {
                excellent: dec!(6),
                good: dec!(4),
                average: dec!(3),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(6)),
                    text: "دوران ممتاز للذمم الدائنة يدل على كفاءة عالية في إدارة المدفوعات",
                },
                Rule {
                    when: Condition::LessThan(dec!(3)),
                    text: "دوران بطيء للذمم الدائنة قد يشير لمشاكل في السيولة",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(12)),
                    text: "دوران سريع جداً قد يشير لسياسة دفع صارمة",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(4)),
                    text: "تحسين إدارة المدفوعات وتقليل فترة السداد",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(10)),
                    text: "مراجعة سياسة الدفع للتأكد من عدم فقدان الموردين",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات دوران الذمم الدائنة عبر الزمن",
                },
            ],
            interpretation: "معدل دوران الذمم الدائنة {value} يعني أن الذمم الدائنة يتم سدادها {value} مرة في السنة، أي كل {أيام السداد} يوم",
            interpret: None,
        },
        MetricSpec {
            id: "fixed-asset-turnover",
            name: "معدل دوران الأصول الثابتة",
            kind: "ratio",
            formula: "الإيرادات ÷ الأصول الثابتة",
            benchmark_key: "fixedAssetTurnover",
            min_periods: 1,
            guards: &[Field::FixedAssets],
            compute: fixed_asset_turnover,
            scale: RatingScale::AtLeast {
                excellent: dec!(2),
                good: dec!(1.5),
                average: dec!(1),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(2)),
                    text: "كفاءة ممتازة في استخدام الأصول الثابتة",
                },
                Rule {
                    when: Condition::LessThan(dec!(1)),
                    text: "كفاءة منخفضة في استخدام الأصول الثابتة",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(5)),
                    text: "كفاءة عالية جداً قد تشير لاستثمارات قليلة",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(1.5)),
                    text: "تحسين كفاءة استخدام الأصول الثابتة أو تقليل الاستثمارات",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(4)),
                    text: "مراجعة الاستثمارات في الأصول الثابتة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات دوران الأصول الثابتة عبر الزمن",
                },
            ],
            interpretation: "معدل دوران الأصول الثابتة {value} يعني أن كل ريال من الأصول الثابتة يولد {value} ريال من الإيرادات",
            interpret: None,
        },
        MetricSpec {
            id: "total-asset-turnover",
            name: "معدل دوران إجمالي الأصول",
            kind: "ratio",
            formula: "الإيرادات ÷ إجمالي الأصول",
            benchmark_key: "totalAssetTurnover",
            min_periods: 1,
            guards: &[Field::TotalAssets],
            compute: total_asset_turnover,
            scale: RatingScale::AtLeast {
                excellent: dec!(1.5),
                good: dec!(1.2),
                average: dec!(0.8),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(1.5)),
                    text: "كفاءة ممتازة في استخدام الأصول",
                },
                Rule {
                    when: Condition::LessThan(dec!(0.8)),
                    text: "كفاءة منخفضة في استخدام الأصول",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(3)),
                    text: "كفاءة عالية جداً قد تشير لاستثمارات قليلة",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(1)),
                    text: "تحسين كفاءة استخدام الأصول أو تقليل الاستثمارات",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(2.5)),
                    text: "مراجعة الاستثمارات في الأصول",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات دوران الأصول عبر الزمن",
                },
            ],
            interpretation: "معدل دوران إجمالي الأصول {value} يعني أن كل ريال من الأصول يولد {value} ريال من الإيرادات",
            interpret: None,
        },
    ],
};

fn inventory_turnover(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let turnover = s.income_statement.cost_of_goods_sold / s.balance_sheet.inventory;
    let days = if turnover.is_zero() { Decimal::ZERO } else { DAYS_PER_YEAR / turnover };
    Ok(RawMetric {
        value: turnover,
        variables: vec![
            ("تكلفة البضاعة المباعة", s.income_statement.cost_of_goods_sold),
            ("متوسط المخزون", s.balance_sheet.inventory),
            ("أيام المخزون", days),
        ],
    })
}

fn receivables_turnover(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let turnover = s.income_statement.revenue / s.balance_sheet.accounts_receivable;
    let days = if turnover.is_zero() { Decimal::ZERO } else { DAYS_PER_YEAR / turnover };
    Ok(RawMetric {
        value: turnover,
        variables: vec![
            ("الإيرادات", s.income_statement.revenue),
            ("متوسط الذمم المدينة", s.balance_sheet.accounts_receivable),
            ("أيام التحصيل", days),
        ],
    })
}

fn payables_turnover(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let turnover = s.income_statement.cost_of_goods_sold / s.balance_sheet.accounts_payable;
    let days = if turnover.is_zero() { Decimal::ZERO } else { DAYS_PER_YEAR / turnover };
    Ok(RawMetric {
        value: turnover,
        variables: vec![
            ("تكلفة البضاعة المباعة", s.income_statement.cost_of_goods_sold),
            ("متوسط الذمم الدائنة", s.balance_sheet.accounts_payable),
            ("أيام السداد", days),
        ],
    })
}

fn fixed_asset_turnover(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    Ok(RawMetric {
        value: s.income_statement.revenue / s.balance_sheet.fixed_assets,
        variables: vec![
            ("الإيرادات", s.income_statement.revenue),
            ("الأصول الثابتة", s.balance_sheet.fixed_assets),
        ],
    })
}

fn total_asset_turnover(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    Ok(RawMetric {
        value: s.income_statement.revenue / s.balance_sheet.total_assets,
        variables: vec![
            ("الإيرادات", s.income_statement.revenue),
            ("إجمالي الأصول", s.balance_sheet.total_assets),
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
        s.income_statement.revenue = dec!(1200);
        s.income_statement.cost_of_goods_sold = dec!(730);
        s.balance_sheet.inventory = dec!(100);
        s.balance_sheet.accounts_receivable = dec!(150);
        s.balance_sheet.accounts_payable = dec!(146);
        s.balance_sheet.fixed_assets = dec!(600);
        s.balance_sheet.total_assets = dec!(1000);
        s
    }

    #[test]
    fn turnovers_and_day_counts() {
        let statements = vec![sample_statement()];
        let results = ACTIVITY.analyze(&statements, &Company::default(), None, None);
        assert_eq!(results.len(), 5);

        let inv = &results[0];
        assert_eq!(inv.current_value, dec!(7.3));
        assert_eq!(inv.rating, Rating::Excellent);
        assert_eq!(inv.calculation.variables["أيام المخزون"], dec!(50));

        let pay = &results[2];
        assert_eq!(pay.current_value, dec!(5));
        assert_eq!(pay.rating, Rating::Good);
        assert_eq!(pay.calculation.variables["أيام السداد"], dec!(73));
    }

    #[test]
    fn asset_turnovers() {
        let statements = vec![sample_statement()];
        let results = ACTIVITY.analyze(&statements, &Company::default(), None, None);

        assert_eq!(results[3].current_value, dec!(2));
        assert_eq!(results[3].rating, Rating::Excellent);
        assert_eq!(results[4].current_value, dec!(1.2));
        assert_eq!(results[4].rating, Rating::Good);
    }

    #[test]
    fn zero_inventory_errors_only_that_row() {
        let mut s = sample_statement();
        s.balance_sheet.inventory = Decimal::ZERO;
        let results = ACTIVITY.analyze(&[s], &Company::default(), None, None);
        assert_eq!(results[0].status, Status::Error);
        for r in &results[1..] {
            assert_eq!(r.status, Status::Completed, "{} should complete", r.id);
        }
    }
}
