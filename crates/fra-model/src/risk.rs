//! Three-axis risk rating
//!
//! `overall` is always the maximum of the three axes under
//! `Low < Medium < High`; it is computed on construction and recomputed
//! on deserialization, never taken from input.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Risk level, totally ordered `Low < Medium < High`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// No action needed
    Low,
    /// Review recommended
    Medium,
    /// Review required
    High,
}

impl RiskLevel {
    /// Wire name
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Environmental, legal and social risk with their maximum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RiskAxes")]
pub struct RiskAssessment {
    environmental_risk: RiskLevel,
    legal_risk: RiskLevel,
    social_risk: RiskLevel,
    overall_risk: RiskLevel,
}

impl RiskAssessment {
    /// Build from the three axes; overall is their maximum
    #[must_use]
    pub fn new(environmental: RiskLevel, legal: RiskLevel, social: RiskLevel) -> Self {
        Self {
            environmental_risk: environmental,
            legal_risk: legal,
            social_risk: social,
            overall_risk: environmental.max(legal).max(social),
        }
    }

    /// Environmental axis
    #[inline]
    #[must_use]
    pub fn environmental(&self) -> RiskLevel {
        self.environmental_risk
    }

    /// Legal axis
    #[inline]
    #[must_use]
    pub fn legal(&self) -> RiskLevel {
        self.legal_risk
    }

    /// Social axis
    #[inline]
    #[must_use]
    pub fn social(&self) -> RiskLevel {
        self.social_risk
    }

    /// Maximum of the three axes
    #[inline]
    #[must_use]
    pub fn overall(&self) -> RiskLevel {
        self.overall_risk
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RiskAxes {
    environmental_risk: RiskLevel,
    legal_risk: RiskLevel,
    social_risk: RiskLevel,
}

impl From<RiskAxes> for RiskAssessment {
    fn from(axes: RiskAxes) -> Self {
        Self::new(axes.environmental_risk, axes.legal_risk, axes.social_risk)
    }
}
