use rust_decimal::Decimal;

use crate::types::FinancialStatement;

/// Addressable statement lines, used by metric tables to declare their
/// denominator guards declaratively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Revenue,
    CostOfGoodsSold,
    OperatingIncome,
    OperatingExpenses,
    NetIncome,
    InterestExpense,
    TotalAssets,
    CurrentAssets,
    CurrentLiabilities,
    Cash,
    MarketableSecurities,
    Inventory,
    AccountsReceivable,
    AccountsPayable,
    FixedAssets,
    LongTermDebt,
    TotalLiabilities,
    ShareholdersEquity,
    SharesOutstanding,
    RetainedEarnings,
    OperatingCashFlow,
}

impl Field {
    pub fn value(self, s: &FinancialStatement) -> Decimal {
        let i = &s.income_statement;
        let b = &s.balance_sheet;
        match self {
            Field::Revenue => i.revenue,
            Field::CostOfGoodsSold => i.cost_of_goods_sold,
            Field::OperatingIncome => i.operating_income,
            Field::OperatingExpenses => i.operating_expenses,
            Field::NetIncome => i.net_income,
            Field::InterestExpense => i.interest_expense,
            Field::TotalAssets => b.total_assets,
            Field::CurrentAssets => b.current_assets,
            Field::CurrentLiabilities => b.current_liabilities,
            Field::Cash => b.cash,
            Field::MarketableSecurities => b.marketable_securities,
            Field::Inventory => b.inventory,
            Field::AccountsReceivable => b.accounts_receivable,
            Field::AccountsPayable => b.accounts_payable,
            Field::FixedAssets => b.fixed_assets,
            Field::LongTermDebt => b.long_term_debt,
            Field::TotalLiabilities => b.total_liabilities,
            Field::ShareholdersEquity => b.shareholders_equity,
            Field::SharesOutstanding => b.shares_outstanding,
            Field::RetainedEarnings => b.retained_earnings,
            Field::OperatingCashFlow => s.operating_cash_flow(),
        }
    }

    /// Display label used in error contexts and audit variables.
    pub fn label(self) -> &'static str {
        match self {
            Field::Revenue => "الإيرادات",
            Field::CostOfGoodsSold => "تكلفة البضاعة المباعة",
            Field::OperatingIncome => "الربح التشغيلي",
            Field::OperatingExpenses => "المصروفات التشغيلية",
            Field::NetIncome => "صافي الربح",
            Field::InterestExpense => "مصروفات الفوائد",
            Field::TotalAssets => "إجمالي الأصول",
            Field::CurrentAssets => "الأصول المتداولة",
            Field::CurrentLiabilities => "الالتزامات المتداولة",
            Field::Cash => "النقدية",
            Field::MarketableSecurities => "الأوراق المالية",
            Field::Inventory => "المخزون",
            Field::AccountsReceivable => "الذمم المدينة",
            Field::AccountsPayable => "الذمم الدائنة",
            Field::FixedAssets => "الأصول الثابتة",
            Field::LongTermDebt => "الديون طويلة الأجل",
            Field::TotalLiabilities => "إجمالي الالتزامات",
            Field::ShareholdersEquity => "حقوق الملكية",
            Field::SharesOutstanding => "عدد الأسهم",
            Field::RetainedEarnings => "الأرباح المحتجزة",
            Field::OperatingCashFlow => "التدفق النقدي التشغيلي",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn field_reads_the_right_line() {
        let mut s = FinancialStatement::default();
        s.income_statement.revenue = dec!(1000);
        s.balance_sheet.inventory = dec!(75);
        assert_eq!(Field::Revenue.value(&s), dec!(1000));
        assert_eq!(Field::Inventory.value(&s), dec!(75));
        assert_eq!(Field::OperatingCashFlow.value(&s), Decimal::ZERO);
    }
}
