//! Error types for FRA Core
//!
//! Provides the caller-facing taxonomy:
//! - Invalid queries, rejected before any work starts
//! - Pipeline failures, fanned out verbatim to every waiter of a key
//! - Caller cancellation
//!
//! plus configuration loading errors.

use fra_engine::StageError;
use fra_model::QueryError;

/// Outcome error of an analysis request
///
/// `Clone` so a single failure can be delivered to every waiter.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// Malformed coordinates or non-positive radius
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    /// A pipeline stage failed, or the pipeline task died
    #[error("pipeline failure in {stage}: {message}")]
    PipelineFailure {
        /// Failing stage name, `task` when the pipeline task itself died
        stage: String,
        /// Failure reason
        message: String,
    },

    /// The key was cancelled while this caller was waiting
    #[error("analysis cancelled by caller")]
    CancelledByCaller,
}

impl AnalysisError {
    /// Create pipeline failure
    #[inline]
    pub fn pipeline(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::PipelineFailure {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Check if a fresh `analyze` call may succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::PipelineFailure { .. })
    }

    /// Check if error came from cancellation
    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::CancelledByCaller)
    }
}

impl From<StageError> for AnalysisError {
    fn from(error: StageError) -> Self {
        Self::PipelineFailure {
            stage: error.stage.to_string(),
            message: error.message,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid config value: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use fra_engine::Stage;

    #[test]
    fn analysis_error_display() {
        let err = AnalysisError::InvalidQuery(QueryError::NonPositiveRadius(0.0));
        assert!(err.to_string().contains("invalid query"));

        let err = AnalysisError::pipeline("detection", "sensor offline");
        assert_eq!(err.to_string(), "pipeline failure in detection: sensor offline");
    }

    #[test]
    fn stage_error_converts() {
        let err: AnalysisError = StageError::new(Stage::Detection, "imagery unavailable").into();
        assert_eq!(err, AnalysisError::pipeline("detection", "imagery unavailable"));
    }

    #[test]
    fn analysis_error_is_retryable() {
        assert!(AnalysisError::pipeline("risk", "x").is_retryable());
        assert!(!AnalysisError::CancelledByCaller.is_retryable());
        assert!(!AnalysisError::InvalidQuery(QueryError::NonFiniteCoordinate).is_retryable());
    }

    #[test]
    fn analysis_error_is_cancelled() {
        assert!(AnalysisError::CancelledByCaller.is_cancelled());
        assert!(!AnalysisError::pipeline("risk", "x").is_cancelled());
    }
}
