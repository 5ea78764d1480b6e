//! Domain model for shared shopping lists.
//!
//! # Responsibility
//! - Define identifiers and read models shared by repository and service layers.
//! - Hold the pure decision logic (departure planning, share-code shape) so it
//!   can be tested without storage.
//!
//! # Invariants
//! - A list's roster is never empty while the list exists.
//! - `Roster::owner_id` always names one of the roster's members.

pub mod departure;
pub mod share_code;
pub mod shoplist;

use std::time::{SystemTime, UNIX_EPOCH};

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Falls back to `0` when the system clock reports a time before the epoch.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
