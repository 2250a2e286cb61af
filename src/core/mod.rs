//! Core engine components
//!
//! Contains the entitlement, metering and throttling logic, and the
//! [`MeteringEngine`] facade that runs the composite admission flow.

pub mod concurrency;
pub mod entitlement;
pub mod limits;
pub mod pricing;
pub mod rate_limiter;
pub mod tiers;
pub mod usage;
pub mod warnings;

use crate::config::EngineConfig;
use crate::core::concurrency::{ConcurrencyCapper, SlotGuard};
use crate::core::entitlement::{EntitlementResolver, TierSnapshot};
use crate::core::limits::{FeatureDecision, FeatureGate, LimitChecker, LimitDecision};
use crate::core::rate_limiter::{RateLimitResult, RateLimiter};
use crate::core::tiers::{Metric, Tier};
use crate::core::usage::UsageRecorder;
use crate::core::warnings::WarningEmitter;
use crate::storage::StorageLayer;
use crate::utils::error::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// Rejection of a metered request, with the metadata callers need to build
/// an actionable response (429 with retry timing, 402 with upgrade data).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// Tenant is at its concurrency ceiling
    Concurrency {
        /// The tier's ceiling
        limit: i64,
        /// In-flight requests at check time
        current: i64,
    },
    /// Tenant exceeded its request rate for the window
    RateLimited(RateLimitResult),
    /// Tenant would exceed its monthly ceiling
    LimitExceeded(LimitDecision),
}

impl Rejection {
    /// Seconds the caller should wait before retrying, when known.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            Rejection::Concurrency { .. } => Some(1),
            Rejection::RateLimited(result) => result.retry_after_secs,
            Rejection::LimitExceeded(_) => None,
        }
    }

    /// Suggested upgrade target, when the denial is tier-related.
    pub fn upgrade_suggestion(&self) -> Option<Tier> {
        match self {
            Rejection::LimitExceeded(decision) => decision.upgrade_suggestion,
            _ => None,
        }
    }

    /// HTTP status the caller should map this rejection to.
    pub fn http_status(&self) -> u16 {
        match self {
            Rejection::Concurrency { .. } | Rejection::RateLimited(_) => 429,
            Rejection::LimitExceeded(_) => 402,
        }
    }
}

/// An admitted metered request.
///
/// Holds the concurrency slot; dropping the admission (with or without
/// completing it) releases the slot.
#[derive(Debug)]
pub struct Admission {
    tenant_id: String,
    metric: Metric,
    _slot: SlotGuard,
}

impl Admission {
    /// Tenant the admission belongs to.
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Metric the admission was made for.
    pub fn metric(&self) -> Metric {
        self.metric
    }
}

/// Facade orchestrating all engine components.
///
/// Invoked synchronously within each inbound request; holds the process-wide
/// rate-limit and concurrency state, injected into request handlers rather
/// than reached through globals.
#[derive(Clone)]
pub struct MeteringEngine {
    resolver: EntitlementResolver,
    checker: LimitChecker,
    gate: FeatureGate,
    recorder: UsageRecorder,
    rate_limiter: RateLimiter,
    capper: ConcurrencyCapper,
}

impl MeteringEngine {
    /// Create an engine over the given storage layer.
    pub fn new(config: EngineConfig, storage: StorageLayer) -> Self {
        info!(
            policy = ?config.enforcement.limit_failure_policy,
            rate_limiting = config.rate_limit.enabled,
            "initializing metering engine"
        );
        let resolver = EntitlementResolver::new(&storage);
        let emitter = Arc::new(WarningEmitter::new(
            resolver.clone(),
            storage.warnings.clone(),
            &config.warnings,
        ));
        Self {
            checker: LimitChecker::new(resolver.clone(), config.enforcement.limit_failure_policy),
            gate: FeatureGate::new(resolver.clone()),
            recorder: UsageRecorder::new(storage.usage.clone(), emitter),
            rate_limiter: RateLimiter::new(config.rate_limit),
            capper: ConcurrencyCapper::new(),
            resolver,
        }
    }

    /// Resolve a tenant's entitlement snapshot.
    pub async fn resolve(&self, tenant_id: &str) -> Option<TierSnapshot> {
        self.resolver.resolve(tenant_id).await
    }

    /// Check a metered quantity against the monthly ceiling.
    pub async fn check_limit(
        &self,
        tenant_id: &str,
        metric: Metric,
        quantity: i64,
    ) -> LimitDecision {
        self.checker.check_limit(tenant_id, metric, quantity).await
    }

    /// String-facing limit check; unknown actions are an error.
    pub async fn check_action(
        &self,
        tenant_id: &str,
        action: &str,
        quantity: i64,
    ) -> Result<LimitDecision> {
        self.checker.check_action(tenant_id, action, quantity).await
    }

    /// Check whether the tenant's tier grants a feature.
    pub async fn check_feature(&self, tenant_id: &str, feature: &str) -> FeatureDecision {
        self.gate.check_feature(tenant_id, feature).await
    }

    /// Record usage outside the admission flow (fail-open).
    pub async fn record_usage(&self, tenant_id: &str, metric: Metric, quantity: i64) -> bool {
        self.recorder.record(tenant_id, metric, quantity).await
    }

    /// Current in-flight request count for a tenant.
    pub fn in_flight(&self, tenant_id: &str) -> i64 {
        self.capper.in_flight(tenant_id)
    }

    /// Admit a metered request without a monthly-limit pre-check.
    pub async fn admit(
        &self,
        tenant_id: &str,
        metric: Metric,
    ) -> std::result::Result<Admission, Rejection> {
        self.admit_inner(tenant_id, metric, None).await
    }

    /// Admit a metered request, pre-checking `quantity` against the monthly
    /// ceiling (used for actions like lead creation that must not start at
    /// all once the quota is gone).
    pub async fn admit_with_precheck(
        &self,
        tenant_id: &str,
        metric: Metric,
        quantity: i64,
    ) -> std::result::Result<Admission, Rejection> {
        self.admit_inner(tenant_id, metric, Some(quantity)).await
    }

    /// Composite admission flow: concurrency, then rate, then (optionally)
    /// the monthly limit. A rejection at any stage releases the slot already
    /// held via guard drop.
    async fn admit_inner(
        &self,
        tenant_id: &str,
        metric: Metric,
        precheck: Option<i64>,
    ) -> std::result::Result<Admission, Rejection> {
        let snapshot = self.resolver.resolve(tenant_id).await;
        let tier = snapshot.as_ref().map(|s| s.tier).unwrap_or_default();

        let slot = self
            .capper
            .acquire(tenant_id, tier)
            .map_err(|cap| Rejection::Concurrency {
                limit: cap.limit,
                current: cap.current,
            })?;

        if let Some(kind) = metric.window_kind() {
            let rate = self.rate_limiter.check_and_record(tenant_id, tier, kind).await;
            if !rate.allowed {
                // Slot released by guard drop
                return Err(Rejection::RateLimited(rate));
            }
        }

        if let Some(quantity) = precheck {
            let decision = self
                .checker
                .decide(tenant_id, snapshot.as_ref(), metric, quantity);
            if !decision.allowed {
                return Err(Rejection::LimitExceeded(decision));
            }
        }

        Ok(Admission {
            tenant_id: tenant_id.to_string(),
            metric,
            _slot: slot,
        })
    }

    /// Complete an admitted request: record its usage (fail-open) and
    /// release the slot.
    ///
    /// Returns whether the usage write succeeded. Callers that abandon a
    /// request may simply drop the [`Admission`] instead; the slot is
    /// released either way.
    pub async fn complete(&self, admission: Admission, quantity: i64) -> bool {
        let recorded = self
            .recorder
            .record(&admission.tenant_id, admission.metric, quantity)
            .await;
        drop(admission);
        recorded
    }
}
