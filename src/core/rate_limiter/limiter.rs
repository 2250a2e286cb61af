//! Core rate limiter implementation

use super::types::{epoch_secs_after, RateLimitResult, RateWindowKind};
use crate::config::models::rate_limit::RateLimitConfig;
use crate::core::tiers::{Tier, UNLIMITED};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;

/// Sliding-window rate limiter keyed by `(tenant, window class)`.
pub struct RateLimiter {
    /// Rate limit configuration (enable flag and per-tier overrides)
    config: RateLimitConfig,
    /// Admitted-request timestamps per key
    entries: Arc<RwLock<HashMap<(String, RateWindowKind), Vec<Instant>>>>,
    /// Window override used by tests; production windows come from the class
    window_override: Option<Duration>,
}

impl RateLimiter {
    /// Create a new rate limiter.
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            entries: Arc::new(RwLock::new(HashMap::new())),
            window_override: None,
        }
    }

    /// Create a rate limiter with a fixed window for every class.
    pub fn with_window(config: RateLimitConfig, window: Duration) -> Self {
        Self {
            config,
            entries: Arc::new(RwLock::new(HashMap::new())),
            window_override: Some(window),
        }
    }

    fn window_for(&self, kind: RateWindowKind) -> Duration {
        self.window_override.unwrap_or_else(|| kind.window())
    }

    /// Atomically check and, if allowed, record a request.
    ///
    /// Check and append happen under a single lock acquisition, so there is
    /// no check-then-record race between concurrent requests.
    pub async fn check_and_record(
        &self,
        tenant_id: &str,
        tier: Tier,
        kind: RateWindowKind,
    ) -> RateLimitResult {
        self.check_impl(tenant_id, tier, kind, true).await
    }

    /// Check without recording (read-only preview).
    pub async fn check(
        &self,
        tenant_id: &str,
        tier: Tier,
        kind: RateWindowKind,
    ) -> RateLimitResult {
        self.check_impl(tenant_id, tier, kind, false).await
    }

    async fn check_impl(
        &self,
        tenant_id: &str,
        tier: Tier,
        kind: RateWindowKind,
        record: bool,
    ) -> RateLimitResult {
        let limit = self.config.effective_limit(tier, kind);
        if !self.config.enabled || limit == UNLIMITED {
            return RateLimitResult::bypass(limit);
        }

        let window = self.window_for(kind);
        let now = Instant::now();
        let window_start = now.checked_sub(window).unwrap_or(now);

        let mut entries = self.entries.write().await;
        let timestamps = entries
            .entry((tenant_id.to_string(), kind))
            .or_default();

        // Prune entries that have left the trailing window
        timestamps.retain(|&t| t > window_start);

        let current_count = timestamps.len() as u32;
        let allowed = i64::from(current_count) < limit;
        let remaining = limit - i64::from(current_count);

        // Time until the oldest admitted request leaves the window
        let reset_after_secs = if let Some(&oldest) = timestamps.first() {
            window.saturating_sub(now.duration_since(oldest)).as_secs()
        } else {
            window.as_secs()
        };

        let retry_after_secs = if !allowed {
            debug!(
                tenant = tenant_id,
                window = ?kind,
                current_count,
                limit,
                "rate limit exceeded"
            );
            Some(reset_after_secs.max(1))
        } else {
            if record {
                timestamps.push(now);
            }
            None
        };

        RateLimitResult {
            allowed,
            unlimited: false,
            limit,
            current_count,
            remaining: if record && allowed {
                remaining - 1
            } else {
                remaining
            },
            reset_after_secs,
            reset_at_epoch_secs: epoch_secs_after(reset_after_secs),
            retry_after_secs,
        }
    }

    /// Drop all entries whose every timestamp has expired.
    ///
    /// The check path already prunes lazily per key; this reclaims memory for
    /// tenants that went quiet.
    pub async fn cleanup(&self) {
        let now = Instant::now();
        let override_window = self.window_override;
        let mut entries = self.entries.write().await;
        entries.retain(|(_, kind), timestamps| {
            let window = override_window.unwrap_or_else(|| kind.window());
            let window_start = now.checked_sub(window).unwrap_or(now);
            timestamps.retain(|&t| t > window_start);
            !timestamps.is_empty()
        });
    }
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            entries: self.entries.clone(),
            window_override: self.window_override,
        }
    }
}
