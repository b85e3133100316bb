//! Benchmark comparison. Benchmarks are optional context: a missing key
//! simply omits the comparison blocks, it is never an error.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::result::{BenchmarkComparison, IndustryBenchmark};
use crate::stats;
use crate::types::BenchmarkEntry;

const DEFAULT_PERCENTILE: Decimal = dec!(50);

/// Legacy single-figure benchmark block.
pub fn industry_benchmark(entry: &BenchmarkEntry) -> IndustryBenchmark {
    IndustryBenchmark {
        value: entry.average,
        source: "معايير الصناعة".to_string(),
        period: "السنة الحالية".to_string(),
        percentile: entry.percentile.unwrap_or(DEFAULT_PERCENTILE),
    }
}

/// Full comparison of a metric value against an industry entry. Peer and
/// best-in-class figures are present only when competitor data exists.
/// Percentile is derived from the share of competitors outperformed when
/// competitors are listed, otherwise taken from the entry. The best-in-class
/// gap measures how far the company trails the leading competitor.
pub fn compare(value: Decimal, entry: &BenchmarkEntry) -> BenchmarkComparison {
    let position = if value >= entry.average {
        "أعلى من متوسط الصناعة"
    } else {
        "أقل من متوسط الصناعة"
    };

    let competitor_values: Vec<Decimal> = entry.competitors.iter().map(|c| c.value).collect();

    let percentile = if competitor_values.is_empty() {
        entry.percentile.unwrap_or(DEFAULT_PERCENTILE)
    } else {
        let outperformed = competitor_values.iter().filter(|v| value > **v).count();
        Decimal::from(outperformed) / Decimal::from(competitor_values.len()) * dec!(100)
    };

    let peer_average = (!competitor_values.is_empty()).then(|| stats::mean(&competitor_values));
    let best_in_class = competitor_values.iter().copied().max();

    BenchmarkComparison {
        industry_average: entry.average,
        industry_gap: value - entry.average,
        position: position.to_string(),
        percentile,
        peer_average,
        peer_gap: peer_average.map(|p| value - p),
        best_in_class,
        best_in_class_gap: best_in_class.map(|b| b - value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Competitor;
    use pretty_assertions::assert_eq;

    fn entry_with_competitors() -> BenchmarkEntry {
        BenchmarkEntry {
            average: dec!(1.8),
            percentile: None,
            competitors: vec![
                Competitor {
                    name: "شركة أ".to_string(),
                    value: dec!(1.5),
                },
                Competitor {
                    name: "شركة ب".to_string(),
                    value: dec!(2.1),
                },
                Competitor {
                    name: "شركة ج".to_string(),
                    value: dec!(1.9),
                },
            ],
        }
    }

    #[test]
    fn percentile_counts_outperformed_competitors() {
        let cmp = compare(dec!(2.0), &entry_with_competitors());
        assert_eq!(cmp.industry_average, dec!(1.8));
        assert_eq!(cmp.industry_gap, dec!(0.2));
        assert_eq!(cmp.position, "أعلى من متوسط الصناعة");
        // beats 1.5 and 1.9 out of three
        assert!((cmp.percentile - dec!(66.67)).abs() < dec!(0.01));
        assert_eq!(cmp.best_in_class, Some(dec!(2.1)));
        // trails the leader by 0.1
        assert_eq!(cmp.best_in_class_gap, Some(dec!(0.1)));
    }

    #[test]
    fn no_competitors_falls_back_to_entry_percentile() {
        let entry = BenchmarkEntry {
            average: dec!(2.5),
            percentile: Some(dec!(75)),
            competitors: vec![],
        };
        let cmp = compare(dec!(2.0), &entry);
        assert_eq!(cmp.percentile, dec!(75));
        assert_eq!(cmp.position, "أقل من متوسط الصناعة");
        assert_eq!(cmp.peer_average, None);
        assert_eq!(cmp.best_in_class, None);
    }

    #[test]
    fn legacy_block_defaults_percentile() {
        let b = industry_benchmark(&BenchmarkEntry {
            average: dec!(1.5),
            percentile: None,
            competitors: vec![],
        });
        assert_eq!(b.value, dec!(1.5));
        assert_eq!(b.source, "معايير الصناعة");
        assert_eq!(b.period, "السنة الحالية");
        assert_eq!(b.percentile, dec!(50));
    }
}
