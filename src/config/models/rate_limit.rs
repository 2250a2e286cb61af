//! Rate limiting configuration

use crate::core::rate_limiter::RateWindowKind;
use crate::core::tiers::Tier;
use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Per-tier overrides of the built-in window ceilings
    #[serde(default)]
    pub overrides: Vec<RateOverride>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            overrides: Vec::new(),
        }
    }
}

impl RateLimitConfig {
    /// Ceiling for a tier and window class, with overrides applied.
    pub fn effective_limit(&self, tier: Tier, kind: RateWindowKind) -> i64 {
        self.overrides
            .iter()
            .find(|o| o.tier == tier && o.window == kind)
            .map(|o| o.limit)
            .unwrap_or_else(|| tier.rate_rule(kind).limit)
    }

    /// Merge rate limit configurations; `other` wins where it differs from
    /// defaults.
    pub fn merge(mut self, other: Self) -> Self {
        self.enabled = other.enabled;
        if !other.overrides.is_empty() {
            self.overrides = other.overrides;
        }
        self
    }
}

/// Override of one built-in rate rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateOverride {
    /// Tier the override applies to
    pub tier: Tier,
    /// Window class the override applies to
    pub window: RateWindowKind,
    /// New ceiling (`-1` = unbounded)
    pub limit: i64,
}
