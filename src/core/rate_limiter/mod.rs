//! Request-rate limiting
//!
//! Sliding-window throttling per tenant and window class, independent of the
//! monthly ceilings. State is process-local and advisory: it protects against
//! abusive bursts, not billing accuracy, and resets on restart (degrading to
//! "allow", never corrupting billing).

mod limiter;
#[cfg(test)]
mod tests;
mod types;

pub use limiter::RateLimiter;
pub use types::{RateLimitResult, RateWindowKind};
