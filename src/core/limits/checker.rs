//! Monthly limit checker

use super::types::LimitDecision;
use crate::config::models::FailurePolicy;
use crate::core::entitlement::{EntitlementResolver, TierSnapshot};
use crate::core::tiers::{Metric, UNLIMITED};
use crate::utils::error::Result;
use tracing::{error, warn};

/// Checks requested quantities against the tier's per-period ceilings.
#[derive(Clone)]
pub struct LimitChecker {
    resolver: EntitlementResolver,
    policy: FailurePolicy,
}

impl LimitChecker {
    /// Create a checker with the given usage-unavailable policy.
    pub fn new(resolver: EntitlementResolver, policy: FailurePolicy) -> Self {
        Self { resolver, policy }
    }

    /// Check whether `quantity` more units of `metric` fit under the
    /// tenant's ceiling.
    pub async fn check_limit(
        &self,
        tenant_id: &str,
        metric: Metric,
        quantity: i64,
    ) -> LimitDecision {
        let snapshot = self.resolver.resolve(tenant_id).await;
        self.decide(tenant_id, snapshot.as_ref(), metric, quantity)
    }

    /// String-facing variant: parses the action name first. Unknown actions
    /// are an error, never a silent allow.
    pub async fn check_action(
        &self,
        tenant_id: &str,
        action: &str,
        quantity: i64,
    ) -> Result<LimitDecision> {
        let metric = Metric::parse_action(action)?;
        Ok(self.check_limit(tenant_id, metric, quantity).await)
    }

    /// Decide against an already-resolved snapshot.
    ///
    /// `None` means usage could not be determined; the configured
    /// [`FailurePolicy`] then picks between admitting with a logged gap and
    /// denying until storage recovers.
    pub fn decide(
        &self,
        tenant_id: &str,
        snapshot: Option<&TierSnapshot>,
        metric: Metric,
        quantity: i64,
    ) -> LimitDecision {
        if quantity <= 0 {
            // Non-positive increments could mask limit evasion
            error!(tenant = tenant_id, %metric, quantity, "rejecting non-positive quantity");
            return LimitDecision::denied(
                0,
                0,
                format!("invalid quantity {quantity}: must be positive"),
                None,
            );
        }

        let Some(snapshot) = snapshot else {
            return match self.policy {
                FailurePolicy::Open => {
                    warn!(
                        tenant = tenant_id,
                        %metric,
                        "usage unavailable, admitting per fail-open policy"
                    );
                    LimitDecision {
                        allowed: true,
                        unlimited: false,
                        current_usage: 0,
                        limit: 0,
                        remaining: None,
                        reason: Some("usage unavailable".to_string()),
                        upgrade_suggestion: None,
                    }
                }
                FailurePolicy::Closed => {
                    warn!(
                        tenant = tenant_id,
                        %metric,
                        "usage unavailable, denying per fail-closed policy"
                    );
                    LimitDecision::denied(0, 0, "usage unavailable".to_string(), None)
                }
            };
        };

        let limit = snapshot.limits.get(metric);
        let current = snapshot.usage.get(metric);

        if limit == UNLIMITED {
            return LimitDecision::unlimited(current);
        }

        let new_total = current + quantity;
        if new_total <= limit {
            LimitDecision::allowed(current, limit, limit - new_total)
        } else {
            LimitDecision::denied(
                current,
                limit,
                format!(
                    "{metric} limit exceeded: {current}/{limit} used, requested {quantity}"
                ),
                snapshot.tier.next_up(),
            )
        }
    }
}
