//! Entitlement resolver implementation

use super::types::{
    BillingPeriod, SubscriptionStatus, TenantSubscription, TierSnapshot, UsageTotals,
};
use crate::core::tiers::{Metric, Tier};
use crate::storage::{StorageLayer, SubscriptionStore, UsageStore};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

const ALL_METRICS: [Metric; 5] = [
    Metric::Leads,
    Metric::ApiCalls,
    Metric::StorageGb,
    Metric::Seats,
    Metric::Integrations,
];

/// Resolves a tenant to its tier and current-period usage.
#[derive(Clone)]
pub struct EntitlementResolver {
    subscriptions: Arc<dyn SubscriptionStore>,
    usage: Arc<dyn UsageStore>,
}

impl EntitlementResolver {
    /// Create a resolver over the given storage layer.
    pub fn new(storage: &StorageLayer) -> Self {
        Self {
            subscriptions: storage.subscriptions.clone(),
            usage: storage.usage.clone(),
        }
    }

    /// Resolve the tenant's entitlement snapshot.
    ///
    /// A tenant without an active subscription resolves to Basic with zero
    /// historical usage and the current calendar month as its period, so
    /// resolution itself never blocks a request. Storage read failures
    /// return `None`; callers treat absence as "deny feature access, do not
    /// crash the request path".
    pub async fn resolve(&self, tenant_id: &str) -> Option<TierSnapshot> {
        let subscription = match self.subscriptions.subscription(tenant_id).await {
            Ok(row) => row,
            Err(e) => {
                warn!(tenant = tenant_id, error = %e, "subscription lookup failed");
                return None;
            }
        };

        match subscription {
            Some(sub) if sub.status == SubscriptionStatus::Active => {
                let usage = match self.aggregate_usage(tenant_id, &sub).await {
                    Ok(totals) => totals,
                    Err(e) => {
                        warn!(tenant = tenant_id, error = %e, "usage aggregation failed");
                        return None;
                    }
                };
                Some(self.snapshot(tenant_id, sub.tier, sub.status, usage, sub.period))
            }
            other => {
                // No subscription, or one that is inactive/past due: Basic
                // entitlements, zero usage
                let status = other
                    .map(|s| s.status)
                    .unwrap_or(SubscriptionStatus::Inactive);
                debug!(tenant = tenant_id, "no active subscription, resolving as basic");
                Some(self.snapshot(
                    tenant_id,
                    Tier::Basic,
                    status,
                    UsageTotals::default(),
                    BillingPeriod::current_month(Utc::now()),
                ))
            }
        }
    }

    async fn aggregate_usage(
        &self,
        tenant_id: &str,
        sub: &TenantSubscription,
    ) -> crate::utils::error::Result<UsageTotals> {
        let from = sub.period.start.date_naive();
        let to = sub.period.end.date_naive();

        let mut totals = UsageTotals::default();
        for metric in ALL_METRICS {
            let rows = self.usage.daily_usage(tenant_id, metric, from, to).await?;
            let sum: i64 = rows.iter().map(|r| r.quantity).sum();
            totals.set(metric, sum);
        }
        Ok(totals)
    }

    fn snapshot(
        &self,
        tenant_id: &str,
        tier: Tier,
        status: SubscriptionStatus,
        usage: UsageTotals,
        period: BillingPeriod,
    ) -> TierSnapshot {
        TierSnapshot {
            tenant_id: tenant_id.to_string(),
            tier,
            status,
            limits: tier.limits(),
            features: tier.features(),
            support_level: tier.support_level(),
            price_minor_units: tier.price_minor_units(),
            usage,
            period,
        }
    }
}
