//! Tests for the rate limiter

use super::limiter::RateLimiter;
use super::types::RateWindowKind;
use crate::config::models::rate_limit::{RateLimitConfig, RateOverride};
use crate::core::tiers::Tier;
use std::time::Duration;

fn config() -> RateLimitConfig {
    RateLimitConfig::default()
}

fn disabled_config() -> RateLimitConfig {
    RateLimitConfig {
        enabled: false,
        ..RateLimitConfig::default()
    }
}

#[tokio::test]
async fn test_disabled_limiter_allows_everything() {
    let limiter = RateLimiter::new(disabled_config());
    for _ in 0..100 {
        let result = limiter
            .check_and_record("w-1", Tier::Basic, RateWindowKind::ApiCallsPerMinute)
            .await;
        assert!(result.allowed);
        assert!(result.unlimited);
    }
}

#[tokio::test]
async fn test_allows_within_limit() {
    let limiter = RateLimiter::new(config());
    // Basic tier: 60 API calls per minute
    for i in 0..60 {
        let result = limiter
            .check_and_record("w-1", Tier::Basic, RateWindowKind::ApiCallsPerMinute)
            .await;
        assert!(result.allowed, "request {i} should be allowed");
    }
}

#[tokio::test]
async fn test_denies_over_limit_with_retry_after() {
    let limiter = RateLimiter::new(config());
    for _ in 0..60 {
        let result = limiter
            .check_and_record("w-1", Tier::Basic, RateWindowKind::ApiCallsPerMinute)
            .await;
        assert!(result.allowed);
    }

    // Call 61 within the minute is denied
    let result = limiter
        .check_and_record("w-1", Tier::Basic, RateWindowKind::ApiCallsPerMinute)
        .await;
    assert!(!result.allowed);
    assert!(result.retry_after_secs.unwrap_or(0) > 0);
    assert_eq!(result.remaining, 0);
}

#[tokio::test]
async fn test_tenants_are_independent() {
    let limiter = RateLimiter::new(config());
    for _ in 0..10 {
        limiter
            .check_and_record("w-1", Tier::Basic, RateWindowKind::LeadsPerHour)
            .await;
    }
    let denied = limiter
        .check_and_record("w-1", Tier::Basic, RateWindowKind::LeadsPerHour)
        .await;
    assert!(!denied.allowed);

    let other = limiter
        .check_and_record("w-2", Tier::Basic, RateWindowKind::LeadsPerHour)
        .await;
    assert!(other.allowed);
}

#[tokio::test]
async fn test_window_classes_are_independent() {
    let limiter = RateLimiter::new(config());
    for _ in 0..10 {
        limiter
            .check_and_record("w-1", Tier::Basic, RateWindowKind::LeadsPerHour)
            .await;
    }
    assert!(
        !limiter
            .check_and_record("w-1", Tier::Basic, RateWindowKind::LeadsPerHour)
            .await
            .allowed
    );
    assert!(
        limiter
            .check_and_record("w-1", Tier::Basic, RateWindowKind::ApiCallsPerMinute)
            .await
            .allowed
    );
}

#[tokio::test]
async fn test_unlimited_window_bypasses() {
    let limiter = RateLimiter::new(config());
    // Enterprise leads/hour has no ceiling
    for _ in 0..200 {
        let result = limiter
            .check_and_record("w-ent", Tier::Enterprise, RateWindowKind::LeadsPerHour)
            .await;
        assert!(result.allowed);
        assert!(result.unlimited);
    }
}

#[tokio::test]
async fn test_window_slides() {
    let mut cfg = config();
    cfg.overrides.push(RateOverride {
        tier: Tier::Basic,
        window: RateWindowKind::ApiCallsPerMinute,
        limit: 3,
    });
    let limiter = RateLimiter::with_window(cfg, Duration::from_millis(50));

    for _ in 0..3 {
        assert!(
            limiter
                .check_and_record("w-1", Tier::Basic, RateWindowKind::ApiCallsPerMinute)
                .await
                .allowed
        );
    }
    assert!(
        !limiter
            .check_and_record("w-1", Tier::Basic, RateWindowKind::ApiCallsPerMinute)
            .await
            .allowed
    );

    // After the window passes the next request is admitted again
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(
        limiter
            .check_and_record("w-1", Tier::Basic, RateWindowKind::ApiCallsPerMinute)
            .await
            .allowed
    );
}

#[tokio::test]
async fn test_reset_epoch_matches_relative_reset() {
    let limiter = RateLimiter::new(config());
    let before = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    let result = limiter
        .check_and_record("w-1", Tier::Basic, RateWindowKind::ApiCallsPerMinute)
        .await;
    let after = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();

    // Epoch reset is the wall-clock projection of the relative reset
    assert!(result.reset_at_epoch_secs >= before + result.reset_after_secs);
    assert!(result.reset_at_epoch_secs <= after + result.reset_after_secs + 1);
}

#[tokio::test]
async fn test_check_does_not_record() {
    let limiter = RateLimiter::new(config());
    for _ in 0..100 {
        let result = limiter
            .check("w-1", Tier::Basic, RateWindowKind::LeadsPerHour)
            .await;
        assert!(result.allowed);
        assert_eq!(result.current_count, 0);
    }
}

#[tokio::test]
async fn test_cleanup_reclaims_quiet_tenants() {
    let limiter = RateLimiter::with_window(config(), Duration::from_millis(20));
    limiter
        .check_and_record("w-1", Tier::Basic, RateWindowKind::ApiCallsPerMinute)
        .await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    limiter.cleanup().await;

    let result = limiter
        .check("w-1", Tier::Basic, RateWindowKind::ApiCallsPerMinute)
        .await;
    assert_eq!(result.current_count, 0);
    assert_eq!(result.remaining, 60);
}
