//! Storage layer for the metering engine
//!
//! Abstract interfaces over the platform's subscription and counter stores,
//! plus the notification event sink. The engine never touches persistence
//! directly; all usage writes go through [`UsageStore::upsert_add`], which
//! must be a single logically atomic increment.

/// In-memory storage backend
pub mod memory;

use crate::core::entitlement::{DailyUsage, TenantSubscription};
use crate::core::tiers::Metric;
use crate::core::warnings::WarningEvent;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

/// Read access to tenant subscription rows.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// The tenant's subscription, or `None` when the tenant has never
    /// subscribed.
    async fn subscription(&self, tenant_id: &str) -> Result<Option<TenantSubscription>>;
}

/// Read/upsert access to daily usage counters.
#[async_trait]
pub trait UsageStore: Send + Sync {
    /// Daily counter rows for `tenant_id`/`metric` with `from <= date < to`.
    async fn daily_usage(
        &self,
        tenant_id: &str,
        metric: Metric,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyUsage>>;

    /// Atomically add `delta` to the `(tenant, metric, date)` counter,
    /// creating it at `delta` when absent. Returns the new quantity.
    ///
    /// Two concurrent calls for the same key must both be reflected: a SQL
    /// backend uses `ON CONFLICT ... DO UPDATE SET quantity = quantity + ?`,
    /// the in-memory backend a sharded-map entry lock. Plain read-modify-write
    /// is not an acceptable implementation.
    async fn upsert_add(
        &self,
        tenant_id: &str,
        metric: Metric,
        date: NaiveDate,
        delta: i64,
    ) -> Result<i64>;
}

/// Append-only sink for warning events. Fire-and-forget.
#[async_trait]
pub trait WarningSink: Send + Sync {
    /// Append an event record.
    async fn append(&self, event: WarningEvent) -> Result<()>;
}

/// Bundle of storage backends injected into the engine.
#[derive(Clone)]
pub struct StorageLayer {
    /// Subscription rows (read)
    pub subscriptions: Arc<dyn SubscriptionStore>,
    /// Daily usage counters (read/upsert)
    pub usage: Arc<dyn UsageStore>,
    /// Warning event sink (append)
    pub warnings: Arc<dyn WarningSink>,
}

impl StorageLayer {
    /// Storage layer backed entirely by one in-memory store.
    ///
    /// Suitable for tests and single-process deployments; a multi-instance
    /// deployment swaps in shared-store implementations without changing
    /// call sites.
    pub fn in_memory() -> (Self, Arc<memory::InMemoryStore>) {
        let store = Arc::new(memory::InMemoryStore::new());
        (
            Self {
                subscriptions: store.clone(),
                usage: store.clone(),
                warnings: store.clone(),
            },
            store,
        )
    }
}
