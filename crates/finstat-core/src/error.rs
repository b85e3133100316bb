use thiserror::Error;

/// Errors produced while evaluating a single metric.
///
/// These never escape the analyzer boundary: the evaluator folds them into
/// the standardized error `AnalysisResult` so a batch always returns a full
/// set of results.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricError {
    #[error("division by zero: {context}")]
    ZeroDenominator { context: String },

    #[error("insufficient history: {0}")]
    InsufficientHistory(String),

    #[error("missing market data: {0}")]
    MissingMarketData(String),

    #[error("invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },
}

pub type MetricResult<T> = Result<T, MetricError>;
