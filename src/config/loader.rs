//! Configuration loading utilities
//!
//! YAML file loading plus environment-variable overrides for the engine
//! configuration.

use super::models::{EngineConfig, FailurePolicy};
use crate::utils::error::{EngineError, Result};
use std::env;
use std::path::Path;
use tracing::debug;

impl EngineConfig {
    /// Load configuration from a YAML file, then apply environment
    /// overrides.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading engine configuration");
        let raw = tokio::fs::read_to_string(path).await?;
        let mut config: EngineConfig = serde_yaml::from_str(&raw)?;
        config.apply_env()?;
        Ok(config)
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Apply `METERING_*` environment variables on top of this
    /// configuration.
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(enabled) = env::var("METERING_RATE_LIMIT_ENABLED") {
            self.rate_limit.enabled = enabled.parse().map_err(|e| {
                EngineError::Config(format!("invalid METERING_RATE_LIMIT_ENABLED: {e}"))
            })?;
        }
        if let Ok(policy) = env::var("METERING_LIMIT_FAILURE_POLICY") {
            self.enforcement.limit_failure_policy = match policy.as_str() {
                "open" => FailurePolicy::Open,
                "closed" => FailurePolicy::Closed,
                other => {
                    return Err(EngineError::Config(format!(
                        "invalid METERING_LIMIT_FAILURE_POLICY: {other}"
                    )))
                }
            };
        }
        if let Ok(thresholds) = env::var("METERING_WARNING_THRESHOLDS") {
            let parsed: std::result::Result<Vec<f64>, _> =
                thresholds.split(',').map(|t| t.trim().parse()).collect();
            let mut parsed = parsed.map_err(|e| {
                EngineError::Config(format!("invalid METERING_WARNING_THRESHOLDS: {e}"))
            })?;
            parsed.sort_by(|a, b| a.total_cmp(b));
            self.warnings.thresholds = parsed;
        }
        self.validate()
    }

    /// Validate cross-field constraints.
    pub fn validate(&self) -> Result<()> {
        for threshold in &self.warnings.thresholds {
            if !(0.0..=1.0).contains(threshold) {
                return Err(EngineError::Config(format!(
                    "warning threshold {threshold} outside (0, 1]"
                )));
            }
        }
        Ok(())
    }
}
