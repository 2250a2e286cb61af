//! Engine-wide configuration models

use super::rate_limit::RateLimitConfig;
use serde::{Deserialize, Serialize};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Hard-limit enforcement policy
    #[serde(default)]
    pub enforcement: EnforcementConfig,
    /// Request-rate throttling
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Usage warning thresholds
    #[serde(default)]
    pub warnings: WarningConfig,
}

/// Behavior of the limit check when current usage cannot be determined.
///
/// This is a deliberate policy decision, not an implementation detail:
/// fail-open risks billing leakage past paid ceilings, fail-closed risks
/// blocking paying customers during storage incidents. Feature-display reads
/// always fail open regardless of this setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Allow the request and log the gap (matches the platform's historical
    /// behavior)
    #[default]
    Open,
    /// Deny the request until usage can be read again
    Closed,
}

/// Enforcement configuration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct EnforcementConfig {
    /// Policy applied when the monthly-limit check cannot read usage
    #[serde(default)]
    pub limit_failure_policy: FailurePolicy,
}

fn default_thresholds() -> Vec<f64> {
    vec![0.80, 0.95]
}

/// Usage warning configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarningConfig {
    /// Warning thresholds as fractions of the limit, ascending
    #[serde(default = "default_thresholds")]
    pub thresholds: Vec<f64>,
}

impl Default for WarningConfig {
    fn default() -> Self {
        Self {
            thresholds: default_thresholds(),
        }
    }
}
