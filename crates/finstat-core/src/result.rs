use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Rating / status
// ---------------------------------------------------------------------------

/// Qualitative tier assigned to every metric. Ordered worst to best so that
/// derived `Ord` matches intuition (`Poor < Average < Good < Excellent`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Poor,
    Average,
    Good,
    Excellent,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rating::Poor => "poor",
            Rating::Average => "average",
            Rating::Good => "good",
            Rating::Excellent => "excellent",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Completed,
    Error,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Completed => write!(f, "completed"),
            Status::Error => write!(f, "error"),
        }
    }
}

// ---------------------------------------------------------------------------
// Result envelope
// ---------------------------------------------------------------------------

/// Audit trail of a computation: the formula text plus every intermediate
/// variable, keyed by its display label. `BTreeMap` keeps serialization
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Calculation {
    pub formula: String,
    pub variables: BTreeMap<String, Decimal>,
}

/// Legacy single-figure benchmark block kept for report compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndustryBenchmark {
    pub value: Decimal,
    pub source: String,
    pub period: String,
    pub percentile: Decimal,
}

/// Full peer comparison derived from a `BenchmarkEntry`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkComparison {
    pub industry_average: Decimal,
    pub industry_gap: Decimal,
    /// Qualitative position relative to the industry average.
    pub position: String,
    pub percentile: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_average: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_gap: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_in_class: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_in_class_gap: Option<Decimal>,
}

/// The single output shape of the engine: one fully-packaged metric.
/// Constructed once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub current_value: Decimal,
    pub rating: Rating,
    pub interpretation: String,
    pub calculation: Calculation,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry_benchmark: Option<IndustryBenchmark>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_comparison: Option<BenchmarkComparison>,
    pub status: Status,
}

impl AnalysisResult {
    /// Standardized error result. Every failure path, metric-level or
    /// batch-level, produces exactly this shape.
    pub fn error(id: &str, name: &str) -> Self {
        AnalysisResult {
            id: id.to_string(),
            name: name.to_string(),
            category: "error".to_string(),
            kind: "error".to_string(),
            current_value: Decimal::ZERO,
            rating: Rating::Poor,
            interpretation: "خطأ في حساب التحليل".to_string(),
            calculation: Calculation {
                formula: "غير متاح".to_string(),
                variables: BTreeMap::new(),
            },
            insights: vec!["خطأ في حساب التحليل".to_string()],
            recommendations: vec!["مراجعة البيانات المدخلة".to_string()],
            industry_benchmark: None,
            benchmark_comparison: None,
            status: Status::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rating_order_is_worst_to_best() {
        assert!(Rating::Poor < Rating::Average);
        assert!(Rating::Average < Rating::Good);
        assert!(Rating::Good < Rating::Excellent);
    }

    #[test]
    fn error_result_shape_is_fixed() {
        let r = AnalysisResult::error("current-ratio", "النسبة الجارية");
        assert_eq!(r.id, "current-ratio");
        assert_eq!(r.name, "النسبة الجارية");
        assert_eq!(r.category, "error");
        assert_eq!(r.kind, "error");
        assert_eq!(r.current_value, Decimal::ZERO);
        assert_eq!(r.rating, Rating::Poor);
        assert_eq!(r.interpretation, "خطأ في حساب التحليل");
        assert_eq!(r.calculation.formula, "غير متاح");
        assert!(r.calculation.variables.is_empty());
        assert_eq!(r.insights, vec!["خطأ في حساب التحليل".to_string()]);
        assert_eq!(r.recommendations, vec!["مراجعة البيانات المدخلة".to_string()]);
        assert_eq!(r.status, Status::Error);
    }

    #[test]
    fn rating_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Rating::Excellent).unwrap(), "\"excellent\"");
        assert_eq!(serde_json::to_string(&Status::Completed).unwrap(), "\"completed\"");
    }
}
