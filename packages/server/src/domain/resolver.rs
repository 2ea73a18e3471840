//! Best-effort reverse hostname lookup port.

use async_trait::async_trait;

/// Resolves a client address to a hostname for the informational
/// `host_info` event. Implementations must be non-blocking; failures are
/// reported as `None` and the caller falls back to the raw address.
#[async_trait]
pub trait HostnameResolver: Send + Sync {
    async fn reverse_lookup(&self, ip: &str) -> Option<String>;
}
