//! Risk metrics: the Altman Z-Score bankruptcy predictor plus four composite
//! risk scores on a 0-100 scale where higher means riskier. Risk scores are
//! rated with a lower-is-better scale.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::analyzer::DomainAnalyzer;
use crate::error::MetricResult;
use crate::fields::Field;
use crate::insight::{Condition, Rule};
use crate::metric::{guard_nonzero, MetricContext, MetricSpec, RawMetric};
use crate::rating::RatingScale;
use crate::score::clamp_score;

// Coverage proxy when a company carries no interest expense.
const UNLEVERED_COVERAGE: Decimal = dec!(10);

const RISK_SCALE: RatingScale = RatingScale::AtMost {
    excellent: dec!(20),
    good: dec!(40),
    average: dec!(60),
};

pub static RISK: DomainAnalyzer = DomainAnalyzer {
    domain: "risk",
    category: "risk",
    error_id: "risk-error",
    error_name: "خطأ في تحليل المخاطر",
    metrics: &[
        MetricSpec {
            id: "altman-z-score",
            name: "نموذج Z-Score للتنبؤ بالإفلاس",
            kind: "ratio",
            formula: "1.2*WC/TA + 1.4*RE/TA + 3.3*EBIT/TA + 0.6*MVE/TL + 1.0*S/TA",
            benchmark_key: "altmanZScore",
            min_periods: 1,
            guards: &[Field::TotalAssets],
            compute: altman_z_score,
            scale: RatingScale::Above {
                excellent: dec!(3),
                good: dec!(2.7),
                average: dec!(1.8),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(3)),
                    text: "منطقة الأمان - خطر إفلاس منخفض جداً",
                },
                Rule {
                    when: Condition::LessThan(dec!(1.8)),
                    text: "منطقة الخطر - احتمالية إفلاس عالية",
                },
                Rule {
                    when: Condition::Between(dec!(1.8), dec!(3)),
                    text: "المنطقة الرمادية - مراقبة مطلوبة",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::LessThan(dec!(2.5)),
                    text: "تحسين السيولة والربحية",
                },
                Rule {
                    when: Condition::LessThan(dec!(2.5)),
                    text: "تقليل المديونية",
                },
                Rule {
                    when: Condition::LessThan(dec!(2.5)),
                    text: "تعزيز رأس المال العامل",
                },
            ],
            interpretation: "",
            interpret: Some(interpret_z_score),
        },
        MetricSpec {
            id: "financial-risk",
            name: "تحليل المخاطر المالية",
            kind: "risk-score",
            formula: "(نسبة الدين إلى الأصول ÷ 2) + (نسبة الدين إلى حقوق الملكية × 10) + (نقص تغطية الفوائد × 10) + (الرفع المالي الزائد × 20)",
            benchmark_key: "financialRisk",
            min_periods: 1,
            guards: &[Field::TotalAssets, Field::ShareholdersEquity],
            compute: financial_risk,
            scale: RISK_SCALE,
            insights: &[
                Rule {
                    when: Condition::LessThan(dec!(20)),
                    text: "مخاطر مالية منخفضة تدل على قوة مالية جيدة",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(50)),
                    text: "مخاطر مالية عالية قد تشير لمشاكل في الرفع المالي",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "مخاطر مالية عالية جداً تتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::GreaterThan(dec!(40)),
                    text: "تقليل المخاطر المالية من خلال تقليل الديون وتحسين التدفق النقدي",
                },
                Rule {
                    when: Condition::LessThan(dec!(10)),
                    text: "النظر في الاستفادة من الرافعة المالية للنمو",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات المخاطر المالية عبر الزمن",
                },
            ],
            interpretation: "مؤشر المخاطر المالية {value}% يعكس مستوى المخاطر المالية للشركة - كلما زاد الرقم زادت المخاطر",
            interpret: None,
        },
        MetricSpec {
            id: "operational-risk",
            name: "تحليل المخاطر التشغيلية",
            kind: "risk-score",
            formula: "(نقص الهامش التشغيلي × 2) + (زيادة المصروفات × 0.5) + (نقص دوران الأصول × 50) + (نقص الكفاءة التشغيلية × 10)",
            benchmark_key: "operationalRisk",
            min_periods: 1,
            guards: &[Field::Revenue, Field::TotalAssets],
            compute: operational_risk,
            scale: RISK_SCALE,
            insights: &[
                Rule {
                    when: Condition::LessThan(dec!(20)),
                    text: "مخاطر تشغيلية منخفضة تدل على كفاءة عالية في العمليات",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(50)),
                    text: "مخاطر تشغيلية عالية قد تشير لمشاكل في الكفاءة",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "مخاطر تشغيلية عالية جداً تتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::GreaterThan(dec!(40)),
                    text: "تقليل المخاطر التشغيلية من خلال تحسين الكفاءة وتقليل التكاليف",
                },
                Rule {
                    when: Condition::LessThan(dec!(10)),
                    text: "الحفاظ على الكفاءة التشغيلية العالية",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات المخاطر التشغيلية عبر الزمن",
                },
            ],
            interpretation: "مؤشر المخاطر التشغيلية {value}% يعكس مستوى المخاطر التشغيلية للشركة - كلما زاد الرقم زادت المخاطر",
            interpret: None,
        },
        MetricSpec {
            id: "market-risk",
            name: "تحليل المخاطر السوقية",
            kind: "risk-score",
            formula: "(زيادة P/E × 2) + (زيادة P/B × 10) + (زيادة P/S × 5) + (التقلب السوقي × 20)",
            benchmark_key: "marketRisk",
            min_periods: 1,
            guards: &[Field::Revenue, Field::TotalAssets],
            compute: market_risk,
            scale: RISK_SCALE,
            insights: &[
                Rule {
                    when: Condition::LessThan(dec!(20)),
                    text: "مخاطر سوقية منخفضة تدل على استقرار في السوق",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(50)),
                    text: "مخاطر سوقية عالية قد تشير لمشاكل في التقييم",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "مخاطر سوقية عالية جداً تتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::GreaterThan(dec!(40)),
                    text: "تقليل المخاطر السوقية من خلال تحسين التقييم",
                },
                Rule {
                    when: Condition::LessThan(dec!(10)),
                    text: "الحفاظ على الاستقرار السوقي",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات المخاطر السوقية عبر الزمن",
                },
            ],
            interpretation: "مؤشر المخاطر السوقية {value}% يعكس مستوى المخاطر السوقية للشركة - كلما زاد الرقم زادت المخاطر",
            interpret: None,
        },
        MetricSpec {
            id: "credit-risk",
            name: "تحليل المخاطر الائتمانية",
            kind: "risk-score",
            formula: "(نسبة الدين إلى الأصول ÷ 2) + (نقص تغطية الفوائد × 10) + (نقص تغطية التدفق النقدي × 50) + (نقص جودة الائتمان × 20)",
            benchmark_key: "creditRisk",
            min_periods: 1,
            guards: &[Field::TotalAssets],
            compute: credit_risk,
            scale: RISK_SCALE,
            insights: &[
                Rule {
                    when: Condition::LessThan(dec!(20)),
                    text: "مخاطر ائتمانية منخفضة تدل على جودة عالية في الائتمان",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(50)),
                    text: "مخاطر ائتمانية عالية قد تشير لمشاكل في الائتمان",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(80)),
                    text: "مخاطر ائتمانية عالية جداً تتطلب مراجعة فورية",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::GreaterThan(dec!(40)),
                    text: "تقليل المخاطر الائتمانية من خلال تحسين التدفق النقدي وتقليل الديون",
                },
                Rule {
                    when: Condition::LessThan(dec!(10)),
                    text: "الحفاظ على جودة الائتمان العالية",
                },
                Rule {
                    when: Condition::Always,
                    text: "مراقبة اتجاهات المخاطر الائتمانية عبر الزمن",
                },
            ],
            interpretation: "مؤشر المخاطر الائتمانية {value}% يعكس مستوى المخاطر الائتمانية للشركة - كلما زاد الرقم زادت المخاطر",
            interpret: None,
        },
    ],
};

fn interpret_z_score(z: Decimal) -> String {
    if z > dec!(3) {
        format!("Z-Score {z:.2} يشير إلى احتمالية إفلاس منخفضة جداً وقوة مالية ممتازة")
    } else if z > dec!(1.8) {
        format!("Z-Score {z:.2} في المنطقة الرمادية - يتطلب مراقبة ومتابعة دقيقة")
    } else {
        format!("Z-Score {z:.2} يشير إلى احتمالية إفلاس عالية خلال السنتين القادمتين")
    }
}

fn altman_z_score(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let total_assets = s.balance_sheet.total_assets;
    let total_liabilities = guard_nonzero(s.balance_sheet.total_liabilities, "إجمالي الالتزامات")?;

    let x1 = s.balance_sheet.working_capital() / total_assets;
    let x2 = s.balance_sheet.retained_earnings / total_assets;
    let x3 = s.income_statement.operating_income / total_assets;
    let x4 = s.balance_sheet.shareholders_equity / total_liabilities;
    let x5 = s.income_statement.revenue / total_assets;

    let z = dec!(1.2) * x1 + dec!(1.4) * x2 + dec!(3.3) * x3 + dec!(0.6) * x4 + dec!(1.0) * x5;
    Ok(RawMetric {
        value: z,
        variables: vec![
            ("رأس المال العامل/الأصول", x1),
            ("الأرباح المحتجزة/الأصول", x2),
            ("EBIT/الأصول", x3),
            ("القيمة السوقية/الالتزامات", x4),
            ("المبيعات/الأصول", x5),
            ("Z-Score", z),
        ],
    })
}

fn financial_risk(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let total_debt = s.balance_sheet.total_debt();
    let total_assets = s.balance_sheet.total_assets;
    let equity = s.balance_sheet.shareholders_equity;

    let debt_to_assets = total_debt / total_assets * dec!(100);
    let debt_to_equity = total_debt / equity;
    let interest_coverage = if s.income_statement.interest_expense > Decimal::ZERO {
        s.income_statement.operating_income / s.income_statement.interest_expense
    } else {
        UNLEVERED_COVERAGE
    };
    let financial_leverage = total_assets / equity;

    let score = clamp_score(
        debt_to_assets / dec!(2)
            + debt_to_equity * dec!(10)
            + (dec!(5) - interest_coverage).max(Decimal::ZERO) * dec!(10)
            + (financial_leverage - dec!(2)).max(Decimal::ZERO) * dec!(20),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("نسبة الدين إلى الأصول", debt_to_assets),
            ("نسبة الدين إلى حقوق الملكية", debt_to_equity),
            ("تغطية الفوائد", interest_coverage),
            ("الرفع المالي", financial_leverage),
            ("مؤشر المخاطر المالية", score),
        ],
    })
}

fn operational_risk(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let revenue = s.income_statement.revenue;

    let operating_margin = s.income_statement.operating_income / revenue * dec!(100);
    let expense_ratio = s.income_statement.operating_expenses / revenue * dec!(100);
    let asset_turnover = revenue / s.balance_sheet.total_assets;
    let operational_efficiency = operating_margin / dec!(10);

    let score = clamp_score(
        (dec!(20) - operating_margin).max(Decimal::ZERO) * dec!(2)
            + (expense_ratio - dec!(80)).max(Decimal::ZERO) * dec!(0.5)
            + (Decimal::ONE - asset_turnover).max(Decimal::ZERO) * dec!(50)
            + (dec!(5) - operational_efficiency).max(Decimal::ZERO) * dec!(10),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("الهامش التشغيلي", operating_margin),
            ("نسبة المصروفات", expense_ratio),
            ("دوران الأصول", asset_turnover),
            ("الكفاءة التشغيلية", operational_efficiency),
            ("مؤشر المخاطر التشغيلية", score),
        ],
    })
}

fn market_risk(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let price = ctx.stock_price()?;
    let shares = ctx.shares_outstanding();
    let eps = guard_nonzero(s.income_statement.net_income / shares, "ربحية السهم")?;
    let book_value_per_share = guard_nonzero(
        s.balance_sheet.shareholders_equity / shares,
        "القيمة الدفترية للسهم",
    )?;

    let pe = price / eps;
    let pb = price / book_value_per_share;
    let ps = price * shares / s.income_statement.revenue;
    let volatility = ctx.market()?.volatility();

    let score = clamp_score(
        (pe - dec!(20)).max(Decimal::ZERO) * dec!(2)
            + (pb - dec!(3)).max(Decimal::ZERO) * dec!(10)
            + (ps - dec!(5)).max(Decimal::ZERO) * dec!(5)
            + volatility * dec!(20),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("نسبة P/E", pe),
            ("نسبة P/B", pb),
            ("نسبة P/S", ps),
            ("التقلب السوقي", volatility),
            ("مؤشر المخاطر السوقية", score),
        ],
    })
}

fn credit_risk(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let s = ctx.latest();
    let total_debt = s.balance_sheet.total_debt();

    let debt_to_assets = total_debt / s.balance_sheet.total_assets * dec!(100);
    let interest_coverage = if s.income_statement.interest_expense > Decimal::ZERO {
        s.income_statement.operating_income / s.income_statement.interest_expense
    } else {
        UNLEVERED_COVERAGE
    };
    let cash_flow_coverage = if total_debt > Decimal::ZERO {
        s.operating_cash_flow() / total_debt
    } else {
        Decimal::ONE
    };
    let credit_quality = (interest_coverage / dec!(5)).min(Decimal::ONE);

    let score = clamp_score(
        debt_to_assets / dec!(2)
            + (dec!(5) - interest_coverage).max(Decimal::ZERO) * dec!(10)
            + (dec!(0.5) - cash_flow_coverage).max(Decimal::ZERO) * dec!(50)
            + (Decimal::ONE - credit_quality).max(Decimal::ZERO) * dec!(20),
    );
    Ok(RawMetric {
        value: score,
        variables: vec![
            ("نسبة الدين إلى الأصول", debt_to_assets),
            ("تغطية الفوائد", interest_coverage),
            ("تغطية التدفق النقدي", cash_flow_coverage),
            ("جودة الائتمان", credit_quality),
            ("مؤشر المخاطر الائتمانية", score),
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::Analyzer;
    use crate::result::{Rating, Status};
    use crate::types::{CashFlowStatement, Company, FinancialStatement, MarketData};
    use pretty_assertions::assert_eq;

    fn healthy_statement() -> FinancialStatement {
        let mut s = FinancialStatement::default();
        s.income_statement.revenue = dec!(1_000_000);
        s.income_statement.operating_income = dec!(250_000);
        s.income_statement.operating_expenses = dec!(350_000);
        s.income_statement.net_income = dec!(180_000);
        s.income_statement.interest_expense = dec!(20_000);
        s.balance_sheet.total_assets = dec!(1_000_000);
        s.balance_sheet.current_assets = dec!(400_000);
        s.balance_sheet.current_liabilities = dec!(150_000);
        s.balance_sheet.long_term_debt = dec!(100_000);
        s.balance_sheet.total_liabilities = dec!(300_000);
        s.balance_sheet.shareholders_equity = dec!(700_000);
        s.balance_sheet.retained_earnings = dec!(300_000);
        s.cash_flow_statement = Some(CashFlowStatement {
            operating_cash_flow: dec!(220_000),
            ..Default::default()
        });
        s
    }

    #[test]
    fn altman_z_score_safe_zone() {
        let results = RISK.analyze(&[healthy_statement()], &Company::default(), None, None);
        let z = &results[0];
        assert_eq!(z.id, "altman-z-score");
        // 1.2*0.25 + 1.4*0.3 + 3.3*0.25 + 0.6*(700/300) + 1.0*1 = 3.945
        assert!((z.current_value - dec!(3.945)).abs() < dec!(0.0001));
        assert_eq!(z.rating, Rating::Excellent);
        assert!(z.interpretation.contains("احتمالية إفلاس منخفضة جداً"));
        assert_eq!(
            z.insights,
            vec!["منطقة الأمان - خطر إفلاس منخفض جداً".to_string()]
        );
        assert!(z.recommendations.is_empty());
    }

    #[test]
    fn altman_distress_zone_recommends_deleveraging() {
        let mut s = healthy_statement();
        s.income_statement.operating_income = dec!(-100_000);
        s.income_statement.revenue = dec!(200_000);
        s.balance_sheet.retained_earnings = dec!(-200_000);
        s.balance_sheet.current_liabilities = dec!(500_000);
        s.balance_sheet.total_liabilities = dec!(900_000);
        s.balance_sheet.shareholders_equity = dec!(100_000);
        let results = RISK.analyze(&[s], &Company::default(), None, None);
        let z = &results[0];
        assert_eq!(z.rating, Rating::Poor);
        assert!(z.interpretation.contains("احتمالية إفلاس عالية"));
        assert_eq!(z.recommendations.len(), 3);
    }

    #[test]
    fn financial_risk_score_low_for_solid_balance_sheet() {
        let results = RISK.analyze(&[healthy_statement()], &Company::default(), None, None);
        let fr = &results[1];
        assert_eq!(fr.id, "financial-risk");
        assert_eq!(fr.status, Status::Completed);
        // D/A 25%, D/E 0.357..., coverage 12.5, leverage 1.428...
        assert_eq!(fr.rating, Rating::Excellent);
        assert!(fr.current_value < dec!(20));
    }

    #[test]
    fn market_risk_requires_market_data() {
        let results = RISK.analyze(&[healthy_statement()], &Company::default(), None, None);
        let mr = results.iter().find(|r| r.id == "market-risk").unwrap();
        assert_eq!(mr.status, Status::Error);
    }

    #[test]
    fn market_risk_uses_default_volatility() {
        let market = MarketData {
            stock_price: dec!(10),
            ..Default::default()
        };
        let mut s = healthy_statement();
        s.balance_sheet.shares_outstanding = dec!(100_000);
        let results = RISK.analyze(&[s], &Company::default(), Some(&market), None);
        let mr = results.iter().find(|r| r.id == "market-risk").unwrap();
        assert_eq!(mr.status, Status::Completed);
        assert_eq!(mr.calculation.variables["التقلب السوقي"], dec!(0.2));
    }

    #[test]
    fn risk_scores_are_clamped() {
        let mut s = healthy_statement();
        s.income_statement.operating_income = dec!(-500_000);
        s.income_statement.interest_expense = dec!(100_000);
        s.balance_sheet.current_liabilities = dec!(900_000);
        s.balance_sheet.long_term_debt = dec!(800_000);
        s.balance_sheet.shareholders_equity = dec!(50_000);
        let results = RISK.analyze(&[s], &Company::default(), None, None);
        let fr = results.iter().find(|r| r.id == "financial-risk").unwrap();
        assert_eq!(fr.current_value, dec!(100));
        assert_eq!(fr.rating, Rating::Poor);
    }

    #[test]
    fn credit_risk_unlevered_defaults() {
        let mut s = healthy_statement();
        s.income_statement.interest_expense = Decimal::ZERO;
        s.balance_sheet.current_liabilities = Decimal::ZERO;
        s.balance_sheet.long_term_debt = Decimal::ZERO;
        let results = RISK.analyze(&[s], &Company::default(), None, None);
        let cr = results.iter().find(|r| r.id == "credit-risk").unwrap();
        assert_eq!(cr.status, Status::Completed);
        assert_eq!(cr.current_value, Decimal::ZERO);
    }
}
