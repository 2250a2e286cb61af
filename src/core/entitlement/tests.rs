//! Tests for entitlement resolution

use super::*;
use crate::core::tiers::{Metric, Tier};
use crate::storage::{StorageLayer, SubscriptionStore, UsageStore, WarningSink};
use crate::utils::error::{EngineError, Result};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;

fn active_subscription(tenant: &str, tier: Tier) -> TenantSubscription {
    let now = Utc::now();
    TenantSubscription {
        tenant_id: tenant.to_string(),
        tier,
        status: SubscriptionStatus::Active,
        period: BillingPeriod {
            start: now - Duration::days(10),
            end: now + Duration::days(20),
        },
    }
}

/// Storage double whose every read fails.
struct FailingStore;

#[async_trait]
impl SubscriptionStore for FailingStore {
    async fn subscription(&self, _tenant_id: &str) -> Result<Option<TenantSubscription>> {
        Err(EngineError::Storage("connection refused".into()))
    }
}

#[async_trait]
impl UsageStore for FailingStore {
    async fn daily_usage(
        &self,
        _tenant_id: &str,
        _metric: Metric,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<DailyUsage>> {
        Err(EngineError::Storage("connection refused".into()))
    }

    async fn upsert_add(
        &self,
        _tenant_id: &str,
        _metric: Metric,
        _date: NaiveDate,
        _delta: i64,
    ) -> Result<i64> {
        Err(EngineError::Storage("connection refused".into()))
    }
}

#[async_trait]
impl WarningSink for FailingStore {
    async fn append(&self, _event: crate::core::warnings::WarningEvent) -> Result<()> {
        Err(EngineError::Storage("connection refused".into()))
    }
}

fn failing_layer() -> StorageLayer {
    let store = Arc::new(FailingStore);
    StorageLayer {
        subscriptions: store.clone(),
        usage: store.clone(),
        warnings: store,
    }
}

#[tokio::test]
async fn test_resolves_active_subscription_with_usage() {
    let (layer, store) = StorageLayer::in_memory();
    store.put_subscription(active_subscription("w-1", Tier::Professional));

    let today = Utc::now().date_naive();
    store.upsert_add("w-1", Metric::Leads, today, 7).await.unwrap();
    store
        .upsert_add("w-1", Metric::Leads, today - Duration::days(3), 5)
        .await
        .unwrap();
    store.upsert_add("w-1", Metric::ApiCalls, today, 42).await.unwrap();

    let resolver = EntitlementResolver::new(&layer);
    let snapshot = resolver.resolve("w-1").await.expect("should resolve");

    assert_eq!(snapshot.tier, Tier::Professional);
    assert_eq!(snapshot.usage.leads, 12);
    assert_eq!(snapshot.usage.api_calls, 42);
    assert_eq!(snapshot.limits.monthly_leads, 500);
    assert!(snapshot.features.phone_support);
}

#[tokio::test]
async fn test_usage_outside_period_is_excluded() {
    let (layer, store) = StorageLayer::in_memory();
    store.put_subscription(active_subscription("w-1", Tier::Basic));

    let today = Utc::now().date_naive();
    store.upsert_add("w-1", Metric::Leads, today, 3).await.unwrap();
    // Previous period, must not count
    store
        .upsert_add("w-1", Metric::Leads, today - Duration::days(40), 90)
        .await
        .unwrap();

    let resolver = EntitlementResolver::new(&layer);
    let snapshot = resolver.resolve("w-1").await.unwrap();
    assert_eq!(snapshot.usage.leads, 3);
}

#[tokio::test]
async fn test_unknown_tenant_falls_back_to_basic() {
    let (layer, _store) = StorageLayer::in_memory();
    let resolver = EntitlementResolver::new(&layer);

    let snapshot = resolver.resolve("nobody").await.expect("fallback, not None");
    assert_eq!(snapshot.tier, Tier::Basic);
    assert_eq!(snapshot.status, SubscriptionStatus::Inactive);
    assert_eq!(snapshot.usage, UsageTotals::default());
    assert!(snapshot.period.start < snapshot.period.end);
}

#[tokio::test]
async fn test_past_due_subscription_resolves_as_basic() {
    let (layer, store) = StorageLayer::in_memory();
    let mut sub = active_subscription("w-1", Tier::Enterprise);
    sub.status = SubscriptionStatus::PastDue;
    store.put_subscription(sub);

    let resolver = EntitlementResolver::new(&layer);
    let snapshot = resolver.resolve("w-1").await.unwrap();
    assert_eq!(snapshot.tier, Tier::Basic);
    assert_eq!(snapshot.status, SubscriptionStatus::PastDue);
}

#[tokio::test]
async fn test_storage_failure_resolves_to_none() {
    let resolver = EntitlementResolver::new(&failing_layer());
    assert!(resolver.resolve("w-1").await.is_none());
}

#[test]
fn test_billing_period_contains_half_open() {
    let period = BillingPeriod {
        start: "2026-08-01T00:00:00Z".parse().unwrap(),
        end: "2026-09-01T00:00:00Z".parse().unwrap(),
    };
    assert!(period.contains(NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()));
    assert!(period.contains(NaiveDate::from_ymd_opt(2026, 8, 31).unwrap()));
    assert!(!period.contains(NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()));
    assert!(!period.contains(NaiveDate::from_ymd_opt(2026, 7, 31).unwrap()));
}

#[test]
fn test_current_month_period() {
    let now = "2026-12-15T10:30:00Z".parse().unwrap();
    let period = BillingPeriod::current_month(now);
    assert_eq!(period.start.date_naive(), NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
    assert_eq!(period.end.date_naive(), NaiveDate::from_ymd_opt(2027, 1, 1).unwrap());
}
