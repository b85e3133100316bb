//! Score arithmetic for the composite 0-100 indices.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const MAX_SCORE: Decimal = dec!(100);

/// Clamp a composite score into [0, 100].
pub fn clamp_score(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(MAX_SCORE)
}

/// Clamp a sub-factor into [0, 1].
pub fn clamp_unit(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO).min(Decimal::ONE)
}

/// Weighted sum of (value, weight) terms.
pub fn weighted(terms: &[(Decimal, Decimal)]) -> Decimal {
    terms.iter().map(|(v, w)| *v * *w).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn clamping_bounds_scores() {
        assert_eq!(clamp_score(dec!(150)), dec!(100));
        assert_eq!(clamp_score(dec!(-20)), Decimal::ZERO);
        assert_eq!(clamp_score(dec!(64.2)), dec!(64.2));
        assert_eq!(clamp_unit(dec!(1.7)), Decimal::ONE);
        assert_eq!(clamp_unit(dec!(-0.3)), Decimal::ZERO);
    }

    #[test]
    fn weighted_sums_terms() {
        let s = weighted(&[(dec!(10), dec!(2)), (dec!(5), dec!(0.5))]);
        assert_eq!(s, dec!(22.5));
    }
}
