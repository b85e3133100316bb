//! Small statistics toolkit shared by the growth, structure, and composite
//! metric tables. Every function is total: degenerate inputs (empty series,
//! mismatched lengths, zero denominators) return zero rather than erroring,
//! matching how the metrics treat unanswerable sub-factors.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

/// Slope threshold below which a fitted trend counts as flat.
const FLAT_SLOPE: Decimal = dec!(0.1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

/// Least-squares fit over a series indexed 0..n.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trend {
    pub slope: Decimal,
    pub r_squared: Decimal,
    pub direction: TrendDirection,
}

pub fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().sum::<Decimal>() / Decimal::from(values.len())
}

pub fn median(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let mut sorted = values.to_vec();
    sorted.sort();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / dec!(2)
    } else {
        sorted[mid]
    }
}

/// Population variance.
pub fn variance(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let m = mean(values);
    let sum_sq: Decimal = values.iter().map(|v| (*v - m) * (*v - m)).sum();
    sum_sq / Decimal::from(values.len())
}

pub fn stddev(values: &[Decimal]) -> Decimal {
    variance(values).sqrt().unwrap_or(Decimal::ZERO)
}

/// Sample covariance. Length mismatch or fewer than two points yields zero.
pub fn covariance(xs: &[Decimal], ys: &[Decimal]) -> Decimal {
    if xs.len() != ys.len() || xs.len() < 2 {
        return Decimal::ZERO;
    }
    let mx = mean(xs);
    let my = mean(ys);
    let sum: Decimal = xs
        .iter()
        .zip(ys.iter())
        .map(|(x, y)| (*x - mx) * (*y - my))
        .sum();
    sum / Decimal::from(xs.len() - 1)
}

/// Pearson correlation. Degenerate inputs (mismatched lengths, fewer than two
/// points, constant series) yield zero.
pub fn correlation(xs: &[Decimal], ys: &[Decimal]) -> Decimal {
    if xs.len() != ys.len() || xs.len() < 2 {
        return Decimal::ZERO;
    }
    let n = Decimal::from(xs.len());
    let sum_x: Decimal = xs.iter().sum();
    let sum_y: Decimal = ys.iter().sum();
    let sum_xy: Decimal = xs.iter().zip(ys.iter()).map(|(x, y)| *x * *y).sum();
    let sum_x2: Decimal = xs.iter().map(|x| *x * *x).sum();
    let sum_y2: Decimal = ys.iter().map(|y| *y * *y).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denom_sq = (n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y);
    match denom_sq.sqrt() {
        Some(denominator) if !denominator.is_zero() => numerator / denominator,
        _ => Decimal::ZERO,
    }
}

/// Percent change from `old` to `new`. A zero base reports 100 for any
/// increase and 0 otherwise.
pub fn percentage_change(old: Decimal, new: Decimal) -> Decimal {
    if old.is_zero() {
        return if new > Decimal::ZERO { dec!(100) } else { Decimal::ZERO };
    }
    (new - old) / old.abs() * dec!(100)
}

/// Compound annual growth rate as a fraction (0.1 = 10%/yr). Zero when the
/// starting value or the horizon is zero, or when the ratio is non-positive.
pub fn cagr(begin: Decimal, end: Decimal, years: Decimal) -> Decimal {
    if begin.is_zero() || years.is_zero() {
        return Decimal::ZERO;
    }
    let ratio = end / begin;
    if ratio <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if ratio == Decimal::ONE {
        return Decimal::ZERO;
    }
    ratio.powd(Decimal::ONE / years) - Decimal::ONE
}

/// Ordinary least-squares fit of `values` against period index 0..n.
pub fn trend(values: &[Decimal]) -> Trend {
    if values.len() < 2 {
        return Trend {
            slope: Decimal::ZERO,
            r_squared: Decimal::ZERO,
            direction: TrendDirection::Stable,
        };
    }
    let xs: Vec<Decimal> = (0..values.len()).map(Decimal::from).collect();
    let n = Decimal::from(values.len());
    let sum_x: Decimal = xs.iter().sum();
    let sum_y: Decimal = values.iter().sum();
    let sum_xy: Decimal = xs.iter().zip(values.iter()).map(|(x, y)| *x * *y).sum();
    let sum_x2: Decimal = xs.iter().map(|x| *x * *x).sum();

    let denominator = n * sum_x2 - sum_x * sum_x;
    let slope = if denominator.is_zero() {
        Decimal::ZERO
    } else {
        (n * sum_xy - sum_x * sum_y) / denominator
    };

    let r = correlation(&xs, values);
    let direction = if slope > FLAT_SLOPE {
        TrendDirection::Increasing
    } else if slope < -FLAT_SLOPE {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Stable
    };

    Trend {
        slope,
        r_squared: r * r,
        direction,
    }
}

/// Volatility of a series: standard deviation of period-over-period changes.
/// Periods following a zero value are skipped since their change is undefined.
pub fn volatility(values: &[Decimal]) -> Decimal {
    let changes: Vec<Decimal> = values
        .windows(2)
        .filter(|w| !w[0].is_zero())
        .map(|w| (w[1] - w[0]) / w[0])
        .collect();
    stddev(&changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn mean_and_median() {
        let v = [dec!(1), dec!(2), dec!(3), dec!(10)];
        assert_eq!(mean(&v), dec!(4));
        assert_eq!(median(&v), dec!(2.5));
        assert_eq!(median(&[dec!(5), dec!(1), dec!(3)]), dec!(3));
        assert_eq!(mean(&[]), Decimal::ZERO);
    }

    #[test]
    fn variance_is_population() {
        let v = [dec!(2), dec!(4), dec!(4), dec!(4), dec!(5), dec!(5), dec!(7), dec!(9)];
        assert_eq!(variance(&v), dec!(4));
        assert_eq!(stddev(&v), dec!(2));
    }

    #[test]
    fn correlation_of_perfect_line_is_one() {
        let xs = [dec!(1), dec!(2), dec!(3), dec!(4)];
        let ys = [dec!(2), dec!(4), dec!(6), dec!(8)];
        let r = correlation(&xs, &ys);
        assert!((r - Decimal::ONE).abs() < dec!(0.0001), "r = {}", r);
    }

    #[test]
    fn correlation_degenerate_inputs_are_zero() {
        assert_eq!(correlation(&[dec!(1)], &[dec!(2)]), Decimal::ZERO);
        assert_eq!(correlation(&[dec!(1), dec!(2)], &[dec!(1)]), Decimal::ZERO);
        assert_eq!(
            correlation(&[dec!(3), dec!(3), dec!(3)], &[dec!(1), dec!(2), dec!(3)]),
            Decimal::ZERO
        );
    }

    #[test]
    fn percentage_change_handles_zero_base() {
        assert_eq!(percentage_change(dec!(100), dec!(120)), dec!(20));
        assert_eq!(percentage_change(dec!(0), dec!(50)), dec!(100));
        assert_eq!(percentage_change(dec!(0), dec!(0)), Decimal::ZERO);
        assert_eq!(percentage_change(dec!(0), dec!(-10)), Decimal::ZERO);
        assert_eq!(percentage_change(dec!(200), dec!(150)), dec!(-25));
    }

    #[test]
    fn cagr_edge_cases() {
        assert_eq!(cagr(Decimal::ZERO, dec!(100), dec!(3)), Decimal::ZERO);
        assert_eq!(cagr(dec!(100), dec!(100), dec!(3)), Decimal::ZERO);
        assert_eq!(cagr(dec!(100), dec!(0), dec!(3)), Decimal::ZERO);
        let g = cagr(dec!(100), dec!(121), dec!(2));
        assert!((g - dec!(0.1)).abs() < dec!(0.001), "cagr = {}", g);
    }

    #[test]
    fn trend_detects_direction() {
        let up = trend(&[dec!(10), dec!(20), dec!(30), dec!(40)]);
        assert_eq!(up.slope, dec!(10));
        assert_eq!(up.direction, TrendDirection::Increasing);
        assert!((up.r_squared - Decimal::ONE).abs() < dec!(0.0001));

        let flat = trend(&[dec!(5), dec!(5.05), dec!(5.1)]);
        assert_eq!(flat.direction, TrendDirection::Stable);

        let down = trend(&[dec!(40), dec!(30), dec!(20)]);
        assert_eq!(down.direction, TrendDirection::Decreasing);
    }

    #[test]
    fn volatility_skips_zero_priors() {
        assert_eq!(volatility(&[dec!(100), dec!(100), dec!(100)]), Decimal::ZERO);
        // zero prior is skipped, leaving a single change of 0.1 (stddev 0)
        assert_eq!(volatility(&[dec!(0), dec!(100), dec!(110)]), Decimal::ZERO);
        let v = volatility(&[dec!(100), dec!(110), dec!(99)]);
        assert!(v > Decimal::ZERO);
    }
}
