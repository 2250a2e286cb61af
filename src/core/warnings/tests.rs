//! Tests for warning emission

use super::*;
use crate::config::models::WarningConfig;
use crate::core::entitlement::{
    BillingPeriod, EntitlementResolver, SubscriptionStatus, TenantSubscription,
};
use crate::core::tiers::{Metric, Tier};
use crate::storage::memory::InMemoryStore;
use crate::storage::{StorageLayer, UsageStore};
use chrono::{Duration, Utc};
use std::sync::Arc;

async fn setup(tier: Tier) -> (WarningEmitter, Arc<InMemoryStore>) {
    let (layer, store) = StorageLayer::in_memory();
    let now = Utc::now();
    store.put_subscription(TenantSubscription {
        tenant_id: "w-1".to_string(),
        tier,
        status: SubscriptionStatus::Active,
        period: BillingPeriod {
            start: now - Duration::days(5),
            end: now + Duration::days(25),
        },
    });
    let emitter = WarningEmitter::new(
        EntitlementResolver::new(&layer),
        layer.warnings.clone(),
        &WarningConfig::default(),
    );
    (emitter, store)
}

async fn add_leads(store: &InMemoryStore, quantity: i64) {
    store
        .upsert_add("w-1", Metric::Leads, Utc::now().date_naive(), quantity)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_no_warning_below_threshold() {
    let (emitter, store) = setup(Tier::Basic).await;
    add_leads(&store, 79).await; // 79/100
    emitter.evaluate("w-1", Metric::Leads).await;
    assert!(store.warning_events().is_empty());
}

#[tokio::test]
async fn test_warning_fires_once_per_threshold() {
    let (emitter, store) = setup(Tier::Basic).await;

    add_leads(&store, 80).await; // 80/100
    emitter.evaluate("w-1", Metric::Leads).await;
    // Repeated evaluations above the threshold must not re-emit
    emitter.evaluate("w-1", Metric::Leads).await;
    emitter.evaluate("w-1", Metric::Leads).await;

    let events = store.warning_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].threshold, 0.80);
    assert_eq!(events[0].quantity, 80);
    assert_eq!(events[0].limit, 100);
    assert!(events[0].message.contains("80%"));
}

#[tokio::test]
async fn test_second_threshold_fires_later() {
    let (emitter, store) = setup(Tier::Basic).await;

    add_leads(&store, 85).await;
    emitter.evaluate("w-1", Metric::Leads).await;
    add_leads(&store, 10).await; // 95/100
    emitter.evaluate("w-1", Metric::Leads).await;
    emitter.evaluate("w-1", Metric::Leads).await;

    let thresholds: Vec<f64> = store.warning_events().iter().map(|e| e.threshold).collect();
    assert_eq!(thresholds, vec![0.80, 0.95]);
}

#[tokio::test]
async fn test_jump_past_both_thresholds_emits_both() {
    let (emitter, store) = setup(Tier::Basic).await;
    add_leads(&store, 99).await;
    emitter.evaluate("w-1", Metric::Leads).await;

    let thresholds: Vec<f64> = store.warning_events().iter().map(|e| e.threshold).collect();
    assert_eq!(thresholds, vec![0.80, 0.95]);
}

#[tokio::test]
async fn test_unlimited_tier_never_warns() {
    let (emitter, store) = setup(Tier::Enterprise).await;
    add_leads(&store, 1_000_000).await;
    emitter.evaluate("w-1", Metric::Leads).await;
    assert!(store.warning_events().is_empty());
}

#[tokio::test]
async fn test_new_period_resets_crossing_state() {
    let (emitter, store) = setup(Tier::Basic).await;

    add_leads(&store, 90).await;
    emitter.evaluate("w-1", Metric::Leads).await;
    assert_eq!(store.warning_events().len(), 1);

    // Roll the subscription into a fresh period; old counters fall outside
    let now = Utc::now();
    store.put_subscription(TenantSubscription {
        tenant_id: "w-1".to_string(),
        tier: Tier::Basic,
        status: SubscriptionStatus::Active,
        period: BillingPeriod {
            start: now + Duration::days(1),
            end: now + Duration::days(31),
        },
    });
    store
        .upsert_add("w-1", Metric::Leads, (now + Duration::days(2)).date_naive(), 80)
        .await
        .unwrap();
    emitter.evaluate("w-1", Metric::Leads).await;

    assert_eq!(store.warning_events().len(), 2);
}

#[tokio::test]
async fn test_metrics_tracked_independently() {
    let (emitter, store) = setup(Tier::Basic).await;
    add_leads(&store, 80).await;
    store
        .upsert_add("w-1", Metric::ApiCalls, Utc::now().date_naive(), 800)
        .await
        .unwrap();

    emitter.evaluate("w-1", Metric::Leads).await;
    emitter.evaluate("w-1", Metric::ApiCalls).await;

    let events = store.warning_events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().any(|e| e.metric == Metric::Leads));
    assert!(events.iter().any(|e| e.metric == Metric::ApiCalls));
}
