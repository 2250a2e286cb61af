//! Decision types for limit checks and feature gates

use crate::core::tiers::Tier;
use serde::Serialize;

/// Outcome of a monthly-limit check.
///
/// Serialized verbatim into 402 response bodies, so field names are wire
/// names.
#[derive(Debug, Clone, Serialize)]
pub struct LimitDecision {
    /// Whether the requested quantity fits under the ceiling
    pub allowed: bool,
    /// True when the tier has no ceiling for this metric
    pub unlimited: bool,
    /// Usage already accumulated in the current billing period
    pub current_usage: i64,
    /// The tier ceiling (`-1` = unbounded)
    pub limit: i64,
    /// Quota left after admitting the request (only on bounded allows)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<i64>,
    /// Denial reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Tier that would lift the ceiling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_suggestion: Option<Tier>,
}

impl LimitDecision {
    pub(super) fn unlimited(current_usage: i64) -> Self {
        Self {
            allowed: true,
            unlimited: true,
            current_usage,
            limit: crate::core::tiers::UNLIMITED,
            remaining: None,
            reason: None,
            upgrade_suggestion: None,
        }
    }

    pub(super) fn allowed(current_usage: i64, limit: i64, remaining: i64) -> Self {
        Self {
            allowed: true,
            unlimited: false,
            current_usage,
            limit,
            remaining: Some(remaining),
            reason: None,
            upgrade_suggestion: None,
        }
    }

    pub(super) fn denied(
        current_usage: i64,
        limit: i64,
        reason: String,
        upgrade_suggestion: Option<Tier>,
    ) -> Self {
        Self {
            allowed: false,
            unlimited: false,
            current_usage,
            limit,
            remaining: None,
            reason: Some(reason),
            upgrade_suggestion,
        }
    }
}

/// Outcome of a feature gate check.
#[derive(Debug, Clone, Serialize)]
pub struct FeatureDecision {
    /// Whether the resolved tier grants the feature
    pub allowed: bool,
    /// Lowest tier that grants the feature, when denied
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upgrade_suggestion: Option<Tier>,
}
