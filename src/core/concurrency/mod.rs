//! In-flight request capping
//!
//! Bounds simultaneous metered requests per tenant. Slots are released
//! through an RAII guard, so every admitted request gives its slot back on
//! every exit path, including errors and cancellation. State is process-local
//! and transient.

mod capper;

pub use capper::{CapExceeded, ConcurrencyCapper, SlotGuard};
