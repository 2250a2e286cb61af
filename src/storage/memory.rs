//! In-memory storage backend
//!
//! Backs all three storage traits with process-local maps. Used by the test
//! suite and by single-process deployments; state does not survive restarts
//! and is not shared across instances.

use super::{SubscriptionStore, UsageStore, WarningSink};
use crate::core::entitlement::{DailyUsage, TenantSubscription};
use crate::core::tiers::Metric;
use crate::core::warnings::WarningEvent;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use parking_lot::Mutex;

/// Process-local implementation of every storage trait.
#[derive(Default)]
pub struct InMemoryStore {
    subscriptions: DashMap<String, TenantSubscription>,
    counters: DashMap<(String, Metric, NaiveDate), i64>,
    events: Mutex<Vec<WarningEvent>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a tenant's subscription row.
    pub fn put_subscription(&self, subscription: TenantSubscription) {
        self.subscriptions
            .insert(subscription.tenant_id.clone(), subscription);
    }

    /// Snapshot of all emitted warning events.
    pub fn warning_events(&self) -> Vec<WarningEvent> {
        self.events.lock().clone()
    }

    /// Raw counter value, if present.
    pub fn counter(&self, tenant_id: &str, metric: Metric, date: NaiveDate) -> Option<i64> {
        self.counters
            .get(&(tenant_id.to_string(), metric, date))
            .map(|v| *v)
    }
}

#[async_trait]
impl SubscriptionStore for InMemoryStore {
    async fn subscription(&self, tenant_id: &str) -> Result<Option<TenantSubscription>> {
        Ok(self.subscriptions.get(tenant_id).map(|s| s.clone()))
    }
}

#[async_trait]
impl UsageStore for InMemoryStore {
    async fn daily_usage(
        &self,
        tenant_id: &str,
        metric: Metric,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyUsage>> {
        let mut rows: Vec<DailyUsage> = self
            .counters
            .iter()
            .filter(|entry| {
                let (tenant, m, date) = entry.key();
                tenant == tenant_id && *m == metric && *date >= from && *date < to
            })
            .map(|entry| DailyUsage {
                date: entry.key().2,
                quantity: *entry.value(),
            })
            .collect();
        rows.sort_by_key(|r| r.date);
        Ok(rows)
    }

    async fn upsert_add(
        &self,
        tenant_id: &str,
        metric: Metric,
        date: NaiveDate,
        delta: i64,
    ) -> Result<i64> {
        // The entry holds the shard write lock, so the add is atomic
        let mut entry = self
            .counters
            .entry((tenant_id.to_string(), metric, date))
            .or_insert(0);
        *entry += delta;
        Ok(*entry)
    }
}

#[async_trait]
impl WarningSink for InMemoryStore {
    async fn append(&self, event: WarningEvent) -> Result<()> {
        self.events.lock().push(event);
        Ok(())
    }
}
