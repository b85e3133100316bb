use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Monetary amount (statement line items, market caps)
pub type Money = Decimal;

/// A rate or percentage, expressed as a decimal (0.05 = 5%)
pub type Rate = Decimal;

/// A ratio or multiple (2.0x leverage, 1.8 current ratio)
pub type Multiple = Decimal;

/// Balance-sheet identity tolerance. Gaps above this are logged, never rejected.
pub const BALANCE_EPSILON: Decimal = dec!(0.01);

/// Fallback risk-free rate when market data omits one (3%).
pub const DEFAULT_RISK_FREE_RATE: Rate = dec!(0.03);

/// Fallback annualized volatility when market data omits one.
pub const DEFAULT_VOLATILITY: Rate = dec!(0.2);

/// Fallback share count when the balance sheet reports none.
pub const DEFAULT_SHARES_OUTSTANDING: Decimal = dec!(1_000_000);

// ---------------------------------------------------------------------------
// Financial statements
// ---------------------------------------------------------------------------

/// One fiscal period of reported figures. Missing lines deserialize to zero;
/// downstream guards treat zero denominators as unanswerable, not as panics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialStatement {
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub income_statement: IncomeStatement,
    #[serde(default)]
    pub balance_sheet: BalanceSheet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_flow_statement: Option<CashFlowStatement>,
}

impl FinancialStatement {
    /// Absolute gap between total assets and liabilities plus equity.
    pub fn balance_gap(&self) -> Money {
        let b = &self.balance_sheet;
        (b.total_assets - (b.total_liabilities + b.shareholders_equity)).abs()
    }

    /// Operating cash flow, zero when no cash-flow statement was supplied.
    pub fn operating_cash_flow(&self) -> Money {
        self.cash_flow_statement
            .as_ref()
            .map(|c| c.operating_cash_flow)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IncomeStatement {
    pub revenue: Money,
    pub cost_of_goods_sold: Money,
    pub gross_profit: Money,
    pub operating_income: Money,
    pub operating_expenses: Money,
    pub net_income: Money,
    pub interest_expense: Money,
    pub depreciation: Money,
    pub amortization: Money,
    pub research_and_development_expenses: Money,
    pub tax_rate: Rate,
}

impl IncomeStatement {
    /// Reported gross profit, recomputed from revenue and COGS when absent.
    pub fn gross_profit(&self) -> Money {
        if self.gross_profit.is_zero() {
            self.revenue - self.cost_of_goods_sold
        } else {
            self.gross_profit
        }
    }

    /// EBITDA proxy: operating income plus depreciation and amortization.
    pub fn ebitda(&self) -> Money {
        self.operating_income + self.depreciation + self.amortization
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceSheet {
    pub total_assets: Money,
    pub current_assets: Money,
    pub current_liabilities: Money,
    pub cash: Money,
    pub marketable_securities: Money,
    pub inventory: Money,
    pub accounts_receivable: Money,
    pub accounts_payable: Money,
    pub fixed_assets: Money,
    pub long_term_debt: Money,
    pub short_term_debt: Money,
    pub total_liabilities: Money,
    pub shareholders_equity: Money,
    pub shares_outstanding: Decimal,
    pub retained_earnings: Money,
}

impl BalanceSheet {
    /// Total interest-bearing debt proxy: current liabilities plus long-term debt.
    pub fn total_debt(&self) -> Money {
        self.current_liabilities + self.long_term_debt
    }

    pub fn working_capital(&self) -> Money {
        self.current_assets - self.current_liabilities
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CashFlowStatement {
    pub operating_cash_flow: Money,
    pub free_cash_flow: Money,
    pub debt_repayment: Money,
    pub dividends_paid: Money,
}

// ---------------------------------------------------------------------------
// Company / market / benchmark context
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub name: String,
    #[serde(default)]
    pub revenue: Money,
    #[serde(default)]
    pub assets: Money,
    #[serde(default)]
    pub margin: Rate,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    #[serde(default)]
    pub stock_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_free_rate: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_risk_premium: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volatility: Option<Rate>,
}

impl MarketData {
    pub fn risk_free_rate(&self) -> Rate {
        self.risk_free_rate.unwrap_or(DEFAULT_RISK_FREE_RATE)
    }

    pub fn volatility(&self) -> Rate {
        self.volatility.unwrap_or(DEFAULT_VOLATILITY)
    }
}

/// Industry benchmark figures keyed by metric id.
pub type BenchmarkData = BTreeMap<String, BenchmarkEntry>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkEntry {
    pub average: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub competitors: Vec<Competitor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Competitor {
    pub name: String,
    pub value: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn statement_lines_default_to_zero() {
        let s: FinancialStatement = serde_json::from_str(
            r#"{"year":2023,"incomeStatement":{"revenue":1000.0},"balanceSheet":{"totalAssets":500.0}}"#,
        )
        .unwrap();
        assert_eq!(s.income_statement.revenue, dec!(1000));
        assert_eq!(s.income_statement.net_income, Decimal::ZERO);
        assert_eq!(s.balance_sheet.inventory, Decimal::ZERO);
        assert!(s.cash_flow_statement.is_none());
        assert_eq!(s.operating_cash_flow(), Decimal::ZERO);
    }

    #[test]
    fn balance_gap_measures_identity_breach() {
        let mut s = FinancialStatement::default();
        s.balance_sheet.total_assets = dec!(1000);
        s.balance_sheet.total_liabilities = dec!(600);
        s.balance_sheet.shareholders_equity = dec!(390);
        assert_eq!(s.balance_gap(), dec!(10));
    }

    #[test]
    fn gross_profit_falls_back_to_revenue_minus_cogs() {
        let mut i = IncomeStatement::default();
        i.revenue = dec!(1000);
        i.cost_of_goods_sold = dec!(400);
        assert_eq!(i.gross_profit(), dec!(600));
        i.gross_profit = dec!(550);
        assert_eq!(i.gross_profit(), dec!(550));
    }

    #[test]
    fn market_defaults_apply() {
        let m = MarketData::default();
        assert_eq!(m.risk_free_rate(), dec!(0.03));
        assert_eq!(m.volatility(), dec!(0.2));
    }
}
