// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for session timestamps.

use chrono::Utc;

/// Current time as epoch milliseconds, the unit used for session expiry.
pub fn now_epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Expiry timestamp `max_age_secs` from now, as epoch milliseconds.
pub fn expiry_from_now(max_age_secs: i64) -> i64 {
    now_epoch_millis() + max_age_secs * 1000
}
