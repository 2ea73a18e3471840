//! Time utilities with a clock abstraction for testability.
//!
//! All timestamps in the relay are Unix milliseconds in UTC; wire-facing
//! timestamps are rendered as RFC 3339 with millisecond precision.

use chrono::{SecondsFormat, TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get the current Unix timestamp in UTC (milliseconds)
    fn now_utc_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc_millis(&self) -> i64 {
        get_utc_timestamp()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_utc_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get the current Unix timestamp in UTC (milliseconds)
pub fn get_utc_timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert a Unix timestamp (milliseconds) to RFC 3339 format in UTC
///
/// Out-of-range values fall back to the Unix epoch.
pub fn millis_to_rfc3339(timestamp_millis: i64) -> String {
    let dt = Utc
        .timestamp_millis_opt(timestamp_millis)
        .single()
        .unwrap_or_default();
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}
