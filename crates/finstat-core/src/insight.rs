//! Rule-driven insight and recommendation text. Each metric row declares an
//! ordered rule list; every rule whose condition matches the metric value
//! contributes its text, in declaration order.

use rust_decimal::Decimal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    GreaterThan(Decimal),
    AtLeast(Decimal),
    LessThan(Decimal),
    /// Inclusive on both ends.
    Between(Decimal, Decimal),
    Always,
}

impl Condition {
    pub fn matches(&self, value: Decimal) -> bool {
        match *self {
            Condition::GreaterThan(t) => value > t,
            Condition::AtLeast(t) => value >= t,
            Condition::LessThan(t) => value < t,
            Condition::Between(lo, hi) => value >= lo && value <= hi,
            Condition::Always => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub when: Condition,
    pub text: &'static str,
}

pub fn apply(rules: &[Rule], value: Decimal) -> Vec<String> {
    rules
        .iter()
        .filter(|r| r.when.matches(value))
        .map(|r| r.text.to_string())
        .collect()
}
