//! Rate limiter types and data structures

use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Window class a tier rate rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateWindowKind {
    /// Chat/API calls per minute
    ApiCallsPerMinute,
    /// Lead submissions per hour
    LeadsPerHour,
}

impl RateWindowKind {
    /// Duration of the trailing window.
    pub fn window(&self) -> Duration {
        match self {
            RateWindowKind::ApiCallsPerMinute => Duration::from_secs(60),
            RateWindowKind::LeadsPerHour => Duration::from_secs(3_600),
        }
    }
}

/// Outcome of a rate check.
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitResult {
    /// Whether the request is admitted
    pub allowed: bool,
    /// True when the tier has no rate ceiling for this window class
    pub unlimited: bool,
    /// Maximum admitted requests per window (`-1` = unbounded)
    pub limit: i64,
    /// Admitted requests currently inside the window
    pub current_count: u32,
    /// Requests left in the window
    pub remaining: i64,
    /// Seconds until the oldest request leaves the window
    pub reset_after_secs: u64,
    /// Unix timestamp at which the window resets, for `X-RateLimit-Reset`
    pub reset_at_epoch_secs: u64,
    /// Seconds to wait before retrying (only set on denial)
    pub retry_after_secs: Option<u64>,
}

impl RateLimitResult {
    /// Result used when no window applies (unlimited tier or limiter
    /// disabled).
    pub(super) fn bypass(limit: i64) -> Self {
        Self {
            allowed: true,
            unlimited: true,
            limit,
            current_count: 0,
            remaining: limit,
            reset_after_secs: 0,
            reset_at_epoch_secs: epoch_secs_after(0),
            retry_after_secs: None,
        }
    }
}

/// Unix timestamp `secs` seconds from now.
pub(super) fn epoch_secs_after(secs: u64) -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        + secs
}
