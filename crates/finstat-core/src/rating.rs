use rust_decimal::Decimal;

use crate::result::Rating;

/// Threshold table mapping a metric value to its tier. Declared per metric
/// row; thresholds are checked best tier first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RatingScale {
    /// Higher is better, inclusive thresholds (value >= excellent, ...).
    AtLeast {
        excellent: Decimal,
        good: Decimal,
        average: Decimal,
    },
    /// Higher is better, strict thresholds (value > excellent, ...).
    Above {
        excellent: Decimal,
        good: Decimal,
        average: Decimal,
    },
    /// Lower is better, inclusive thresholds (value <= excellent, ...).
    AtMost {
        excellent: Decimal,
        good: Decimal,
        average: Decimal,
    },
    /// Inclusive value bands, widest last. Used for the market multiples
    /// where both very low and very high readings are unhealthy.
    Within {
        excellent: (Decimal, Decimal),
        good: (Decimal, Decimal),
        average: (Decimal, Decimal),
    },
}

impl RatingScale {
    pub fn rate(&self, value: Decimal) -> Rating {
        match *self {
            RatingScale::AtLeast {
                excellent,
                good,
                average,
            } => {
                if value >= excellent {
                    Rating::Excellent
                } else if value >= good {
                    Rating::Good
                } else if value >= average {
                    Rating::Average
                } else {
                    Rating::Poor
                }
            }
            RatingScale::Above {
                excellent,
                good,
                average,
            } => {
                if value > excellent {
                    Rating::Excellent
                } else if value > good {
                    Rating::Good
                } else if value > average {
                    Rating::Average
                } else {
                    Rating::Poor
                }
            }
            RatingScale::AtMost {
                excellent,
                good,
                average,
            } => {
                if value <= excellent {
                    Rating::Excellent
                } else if value <= good {
                    Rating::Good
                } else if value <= average {
                    Rating::Average
                } else {
                    Rating::Poor
                }
            }
            RatingScale::Within {
                excellent,
                good,
                average,
            } => {
                let within = |(lo, hi): (Decimal, Decimal)| value >= lo && value <= hi;
                if within(excellent) {
                    Rating::Excellent
                } else if within(good) {
                    Rating::Good
                } else if within(average) {
                    Rating::Average
                } else {
                    Rating::Poor
                }
            }
        }
    }
}
