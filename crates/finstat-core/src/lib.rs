//! Financial statement analysis engine.
//!
//! Feeds multi-year statement histories through table-driven metric
//! analyzers and packages every metric as an [`AnalysisResult`]: value,
//! rating tier, Arabic interpretation, insights, recommendations, and an
//! optional industry benchmark comparison. All arithmetic uses
//! [`rust_decimal::Decimal`]; values serialize as JSON numbers.

pub mod analyzer;
pub mod benchmark;
pub mod error;
pub mod fields;
pub mod insight;
pub mod metric;
pub mod rating;
pub mod result;
pub mod score;
pub mod stats;
pub mod types;

pub mod metrics;

pub use analyzer::{analyze_all, registry, Analyzer, DomainAnalyzer};
pub use error::{MetricError, MetricResult};
pub use result::{
    AnalysisResult, BenchmarkComparison, Calculation, IndustryBenchmark, Rating, Status,
};
pub use types::*;
