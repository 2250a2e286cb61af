//! Usage warning emission
//!
//! Watches the usage/limit ratio after each record and appends a notification
//! event when a warning threshold is crossed. Crossing state is tracked
//! explicitly per tenant, metric and billing period, so each threshold fires
//! at most once per period. Emission is best-effort and never fails the
//! calling request.

mod emitter;
#[cfg(test)]
mod tests;
mod types;

pub use emitter::WarningEmitter;
pub use types::WarningEvent;
