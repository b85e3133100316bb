//! Market multiples. These require market data with a non-zero share price;
//! per-share figures fall back to the documented default share count when
//! the balance sheet reports none. Rated on inclusive value bands since both
//! very low and very high multiples are unhealthy.

use rust_decimal_macros::dec;

use crate::analyzer::DomainAnalyzer;
use crate::error::MetricResult;
use crate::insight::{Condition, Rule};
use crate::metric::{guard_nonzero, MetricContext, MetricSpec, RawMetric};
use crate::rating::RatingScale;

pub static MARKET: DomainAnalyzer = DomainAnalyzer {
    domain: "market",
    category: "market",
    error_id: "market-error",
    error_name: "خطأ في التحليل السوقي",
    metrics: &[
        MetricSpec {
            id: "pe-ratio",
            name: "نسبة السعر إلى الأرباح (P/E)",
            kind: "ratio",
            formula: "سعر السهم ÷ ربحية السهم",
            benchmark_key: "peRatio",
            min_periods: 1,
            guards: &[],
            compute: pe_ratio,
            scale: RatingScale::Within {
                excellent: (dec!(12), dec!(20)),
                good: (dec!(8), dec!(25)),
                average: (dec!(5), dec!(35)),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(25)),
                    text: "تقييم مرتفع قد يشير للنمو المتوقع أو إفراط في التقييم",
                },
                Rule {
                    when: Condition::LessThan(dec!(10)),
                    text: "تقييم منخفض قد يشير لفرصة استثمارية أو مشاكل في الأداء",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(50)),
                    text: "تقييم عالي جداً يتطلب دراسة دقيقة للمخاطر",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::GreaterThan(dec!(30)),
                    text: "دراسة مبررات التقييم العالي ومقارنته بالنمو المتوقع",
                },
                Rule {
                    when: Condition::LessThan(dec!(8)),
                    text: "البحث في أسباب التقييم المنخفض والفرص المحتملة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مقارنة P/E مع متوسط الصناعة والسوق",
                },
            ],
            interpretation: "نسبة P/E {value} تعني أن المستثمرين يدفعون {value} ريال لكل ريال أرباح",
            interpret: None,
        },
        MetricSpec {
            id: "price-to-book",
            name: "نسبة السعر إلى القيمة الدفترية (P/B)",
            kind: "ratio",
            formula: "سعر السهم ÷ القيمة الدفترية للسهم",
            benchmark_key: "priceToBook",
            min_periods: 1,
            guards: &[],
            compute: price_to_book,
            scale: RatingScale::Within {
                excellent: (dec!(1), dec!(2)),
                good: (dec!(0.8), dec!(3)),
                average: (dec!(0.5), dec!(4)),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(3)),
                    text: "تقييم مرتفع قد يشير لأصول غير ملموسة أو نمو متوقع",
                },
                Rule {
                    when: Condition::LessThan(dec!(1)),
                    text: "تقييم منخفض قد يشير لفرصة استثمارية أو مشاكل في الأداء",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(5)),
                    text: "تقييم عالي جداً يتطلب دراسة دقيقة للمخاطر",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::GreaterThan(dec!(4)),
                    text: "دراسة مبررات التقييم العالي ومقارنته بالنمو المتوقع",
                },
                Rule {
                    when: Condition::LessThan(dec!(0.8)),
                    text: "البحث في أسباب التقييم المنخفض والفرص المحتملة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مقارنة P/B مع متوسط الصناعة والسوق",
                },
            ],
            interpretation: "نسبة P/B {value} تعني أن السهم يتداول بـ {value} مرة القيمة الدفترية",
            interpret: None,
        },
        MetricSpec {
            id: "price-to-sales",
            name: "نسبة السعر إلى المبيعات (P/S)",
            kind: "ratio",
            formula: "سعر السهم ÷ (المبيعات ÷ عدد الأسهم)",
            benchmark_key: "priceToSales",
            min_periods: 1,
            guards: &[],
            compute: price_to_sales,
            scale: RatingScale::Within {
                excellent: (dec!(1), dec!(3)),
                good: (dec!(0.5), dec!(5)),
                average: (dec!(0.3), dec!(8)),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(5)),
                    text: "تقييم مرتفع قد يشير لنمو متوقع أو ميزة تنافسية",
                },
                Rule {
                    when: Condition::LessThan(dec!(1)),
                    text: "تقييم منخفض قد يشير لفرصة استثمارية أو مشاكل في الأداء",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(10)),
                    text: "تقييم عالي جداً يتطلب دراسة دقيقة للمخاطر",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::GreaterThan(dec!(8)),
                    text: "دراسة مبررات التقييم العالي ومقارنته بالنمو المتوقع",
                },
                Rule {
                    when: Condition::LessThan(dec!(0.5)),
                    text: "البحث في أسباب التقييم المنخفض والفرص المحتملة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مقارنة P/S مع متوسط الصناعة والسوق",
                },
            ],
            interpretation: "نسبة P/S {value} تعني أن السهم يتداول بـ {value} مرة المبيعات لكل سهم",
            interpret: None,
        },
        MetricSpec {
            id: "price-to-cash-flow",
            name: "نسبة السعر إلى التدفق النقدي (P/CF)",
            kind: "ratio",
            formula: "سعر السهم ÷ (التدفق النقدي التشغيلي ÷ عدد الأسهم)",
            benchmark_key: "priceToCashFlow",
            min_periods: 1,
            guards: &[],
            compute: price_to_cash_flow,
            scale: RatingScale::Within {
                excellent: (dec!(8), dec!(15)),
                good: (dec!(5), dec!(20)),
                average: (dec!(3), dec!(25)),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(15)),
                    text: "تقييم مرتفع قد يشير لنمو متوقع أو جودة عالية",
                },
                Rule {
                    when: Condition::LessThan(dec!(5)),
                    text: "تقييم منخفض قد يشير لفرصة استثمارية أو مشاكل في الأداء",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(25)),
                    text: "تقييم عالي جداً يتطلب دراسة دقيقة للمخاطر",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::GreaterThan(dec!(20)),
                    text: "دراسة مبررات التقييم العالي ومقارنته بالنمو المتوقع",
                },
                Rule {
                    when: Condition::LessThan(dec!(3)),
                    text: "البحث في أسباب التقييم المنخفض والفرص المحتملة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مقارنة P/CF مع متوسط الصناعة والسوق",
                },
            ],
            interpretation: "نسبة P/CF {value} تعني أن السهم يتداول بـ {value} مرة التدفق النقدي لكل سهم",
            interpret: None,
        },
        MetricSpec {
            id: "price-to-ebit",
            name: "نسبة السعر إلى الأرباح قبل الفوائد والضرائب (P/EBIT)",
            kind: "ratio",
            formula: "سعر السهم ÷ (الأرباح قبل الفوائد والضرائب ÷ عدد الأسهم)",
            benchmark_key: "priceToEBIT",
            min_periods: 1,
            guards: &[],
            compute: price_to_ebit,
            scale: RatingScale::Within {
                excellent: (dec!(10), dec!(20)),
                good: (dec!(8), dec!(25)),
                average: (dec!(5), dec!(30)),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(20)),
                    text: "تقييم مرتفع قد يشير لنمو متوقع أو كفاءة عالية",
                },
                Rule {
                    when: Condition::LessThan(dec!(8)),
                    text: "تقييم منخفض قد يشير لفرصة استثمارية أو مشاكل في الأداء",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(35)),
                    text: "تقييم عالي جداً يتطلب دراسة دقيقة للمخاطر",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::GreaterThan(dec!(30)),
                    text: "دراسة مبررات التقييم العالي ومقارنته بالنمو المتوقع",
                },
                Rule {
                    when: Condition::LessThan(dec!(5)),
                    text: "البحث في أسباب التقييم المنخفض والفرص المحتملة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مقارنة P/EBIT مع متوسط الصناعة والسوق",
                },
            ],
            interpretation: "نسبة P/EBIT {value} تعني أن السهم يتداول بـ {value} مرة الأرباح قبل الفوائد والضرائب لكل سهم",
            interpret: None,
        },
        MetricSpec {
            id: "price-to-ebitda",
            name: "نسبة السعر إلى الأرباح قبل الفوائد والضرائب والإهلاك (P/EBITDA)",
            kind: "ratio",
            formula: "سعر السهم ÷ (الأرباح قبل الفوائد والضرائب والإهلاك ÷ عدد الأسهم)",
            benchmark_key: "priceToEBITDA",
            min_periods: 1,
            guards: &[],
            compute: price_to_ebitda,
            scale: RatingScale::Within {
                excellent: (dec!(8), dec!(15)),
                good: (dec!(6), dec!(20)),
                average: (dec!(4), dec!(25)),
            },
            insights: &[
                Rule {
                    when: Condition::GreaterThan(dec!(15)),
                    text: "تقييم مرتفع قد يشير لنمو متوقع أو كفاءة عالية",
                },
                Rule {
                    when: Condition::LessThan(dec!(6)),
                    text: "تقييم منخفض قد يشير لفرصة استثمارية أو مشاكل في الأداء",
                },
                Rule {
                    when: Condition::GreaterThan(dec!(25)),
                    text: "تقييم عالي جداً يتطلب دراسة دقيقة للمخاطر",
                },
            ],
            recommendations: &[
                Rule {
                    when: Condition::GreaterThan(dec!(20)),
                    text: "دراسة مبررات التقييم العالي ومقارنته بالنمو المتوقع",
                },
                Rule {
                    when: Condition::LessThan(dec!(4)),
                    text: "البحث في أسباب التقييم المنخفض والفرص المحتملة",
                },
                Rule {
                    when: Condition::Always,
                    text: "مقارنة P/EBITDA مع متوسط الصناعة والسوق",
                },
            ],
            interpretation: "نسبة P/EBITDA {value} تعني أن السهم يتداول بـ {value} مرة الأرباح قبل الفوائد والضرائب والإهلاك لكل سهم",
            interpret: None,
        },
    ],
};

fn pe_ratio(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let price = ctx.stock_price()?;
    let eps = guard_nonzero(
        ctx.latest().income_statement.net_income / ctx.shares_outstanding(),
        "ربحية السهم",
    )?;
    Ok(RawMetric {
        value: price / eps,
        variables: vec![("سعر السهم", price), ("ربحية السهم", eps)],
    })
}

fn price_to_book(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let price = ctx.stock_price()?;
    let book_value_per_share = guard_nonzero(
        ctx.latest().balance_sheet.shareholders_equity / ctx.shares_outstanding(),
        "القيمة الدفترية للسهم",
    )?;
    Ok(RawMetric {
        value: price / book_value_per_share,
        variables: vec![
            ("سعر السهم", price),
            ("القيمة الدفترية للسهم", book_value_per_share),
        ],
    })
}

fn price_to_sales(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let price = ctx.stock_price()?;
    let shares = ctx.shares_outstanding();
    let sales_per_share = guard_nonzero(
        ctx.latest().income_statement.revenue / shares,
        "المبيعات لكل سهم",
    )?;
    Ok(RawMetric {
        value: price / sales_per_share,
        variables: vec![
            ("سعر السهم", price),
            ("المبيعات", ctx.latest().income_statement.revenue),
            ("عدد الأسهم", shares),
            ("المبيعات لكل سهم", sales_per_share),
        ],
    })
}

fn price_to_cash_flow(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let price = ctx.stock_price()?;
    let shares = ctx.shares_outstanding();
    let ocf = ctx.latest().operating_cash_flow();
    let cash_flow_per_share = guard_nonzero(ocf / shares, "التدفق النقدي لكل سهم")?;
    Ok(RawMetric {
        value: price / cash_flow_per_share,
        variables: vec![
            ("سعر السهم", price),
            ("التدفق النقدي التشغيلي", ocf),
            ("عدد الأسهم", shares),
            ("التدفق النقدي لكل سهم", cash_flow_per_share),
        ],
    })
}

fn price_to_ebit(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let price = ctx.stock_price()?;
    let shares = ctx.shares_outstanding();
    let ebit = ctx.latest().income_statement.operating_income;
    let ebit_per_share = guard_nonzero(ebit / shares, "الأرباح قبل الفوائد والضرائب لكل سهم")?;
    Ok(RawMetric {
        value: price / ebit_per_share,
        variables: vec![
            ("سعر السهم", price),
            ("الأرباح قبل الفوائد والضرائب", ebit),
            ("عدد الأسهم", shares),
            ("الأرباح قبل الفوائد والضرائب لكل سهم", ebit_per_share),
        ],
    })
}

fn price_to_ebitda(ctx: &MetricContext<'_>) -> MetricResult<RawMetric> {
    let price = ctx.stock_price()?;
    let shares = ctx.shares_outstanding();
    let ebitda = ctx.latest().income_statement.ebitda();
    let ebitda_per_share =
        guard_nonzero(ebitda / shares, "الأرباح قبل الفوائد والضرائب والإهلاك لكل سهم")?;
    Ok(RawMetric {
        value: price / ebitda_per_share,
        variables: vec![
            ("سعر السهم", price),
            ("الأرباح قبل الفوائد والضرائب والإهلاك", ebitda),
            ("عدد الأسهم", shares),
            (
                "الأرباح قبل الفوائد والضرائب والإهلاك لكل سهم",
                ebitda_per_share,
            ),
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
    use rust_decimal::Decimal;

    fn sample_statement() -> FinancialStatement {
        let mut s = FinancialStatement::default();
        s.income_statement.revenue = dec!(5_000_000);
        s.income_statement.net_income = dec!(1_000_000);
        s.income_statement.operating_income = dec!(1_500_000);
        s.income_statement.depreciation = dec!(300_000);
        s.income_statement.amortization = dec!(200_000);
        s.balance_sheet.shareholders_equity = dec!(4_000_000);
        s.balance_sheet.shares_outstanding = dec!(500_000);
        s.cash_flow_statement = Some(CashFlowStatement {
            operating_cash_flow: dec!(1_250_000),
            ..Default::default()
        });
        s
    }

    fn market() -> MarketData {
        MarketData {
            stock_price: dec!(30),
            ..Default::default()
        }
    }

    #[test]
    fn pe_ratio_uses_eps() {
        let statements = vec![sample_statement()];
        let m = market();
        let results = MARKET.analyze(&statements, &Company::default(), Some(&m), None);
        assert_eq!(results.len(), 6);

        // EPS = 1_000_000 / 500_000 = 2, P/E = 15
        let pe = &results[0];
        assert_eq!(pe.current_value, dec!(15));
        assert_eq!(pe.rating, Rating::Excellent);
        assert_eq!(pe.calculation.variables["ربحية السهم"], dec!(2));
    }

    #[test]
    fn band_scales_punish_extremes() {
        let mut s = sample_statement();
        s.income_statement.net_income = dec!(150_000); // EPS 0.3, P/E 100
        let m = market();
        let results = MARKET.analyze(&[s], &Company::default(), Some(&m), None);
        assert_eq!(results[0].rating, Rating::Poor);
        assert!(results[0]
            .insights
            .contains(&"تقييم عالي جداً يتطلب دراسة دقيقة للمخاطر".to_string()));
    }

    #[test]
    fn missing_market_data_errors_every_row() {
        let statements = vec![sample_statement()];
        let results = MARKET.analyze(&statements, &Company::default(), None, None);
        for r in &results {
            assert_eq!(r.status, Status::Error, "{} should error", r.id);
        }
    }

    #[test]
    fn default_share_count_applies_when_unreported() {
        let mut s = sample_statement();
        s.balance_sheet.shares_outstanding = Decimal::ZERO;
        let m = market();
        let results = MARKET.analyze(&[s], &Company::default(), Some(&m), None);
        // EPS = 1_000_000 / 1_000_000 = 1, P/E = 30
        assert_eq!(results[0].current_value, dec!(30));
    }

    #[test]
    fn zero_earnings_errors_pe_only() {
        let mut s = sample_statement();
        s.income_statement.net_income = Decimal::ZERO;
        let m = market();
        let results = MARKET.analyze(&[s], &Company::default(), Some(&m), None);
        assert_eq!(results[0].status, Status::Error);
        assert_eq!(results[1].status, Status::Completed);
    }
}
