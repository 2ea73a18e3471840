//! Shared utilities for the Charla chat relay.
//!
//! Logging setup and time helpers used by both the server crate and its
//! binaries.

pub mod logger;
pub mod time;
