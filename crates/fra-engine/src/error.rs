//! Error types for FRA Engine

use std::fmt;

/// Pipeline stage that produced an error
///
/// Synthesis, rule evaluation and aggregation are infallible; only
/// detection rejects its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Stage {
    /// Land-asset detection
    Detection,
}

impl Stage {
    /// Stage name for diagnostics
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Detection => "detection",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure inside one pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{stage} stage failed: {message}")]
pub struct StageError {
    /// Failing stage
    pub stage: Stage,
    /// Human-readable reason
    pub message: String,
}

impl StageError {
    /// Create new stage error
    #[inline]
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}
