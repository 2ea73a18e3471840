//! Reverse-DNS `HostnameResolver` backed by hickory-resolver.

use std::net::IpAddr;

use async_trait::async_trait;
use hickory_resolver::TokioResolver;

use crate::domain::HostnameResolver;

/// Resolver using the system DNS configuration.
///
/// Construction never fails: when the system configuration cannot be read,
/// lookups are disabled and every query degrades to `None`, which callers
/// translate into the raw-address fallback.
pub struct DnsHostnameResolver {
    resolver: Option<TokioResolver>,
}

impl DnsHostnameResolver {
    pub fn from_system_conf() -> Self {
        let resolver = match TokioResolver::builder_tokio() {
            Ok(builder) => Some(builder.build()),
            Err(e) => {
                tracing::warn!(
                    "Failed to load system resolver configuration, hostname lookup disabled: {}",
                    e
                );
                None
            }
        };
        Self { resolver }
    }

    #[cfg(test)]
    fn disabled() -> Self {
        Self { resolver: None }
    }
}

#[async_trait]
impl HostnameResolver for DnsHostnameResolver {
    async fn reverse_lookup(&self, ip: &str) -> Option<String> {
        let resolver = self.resolver.as_ref()?;
        let addr: IpAddr = match ip.parse() {
            Ok(addr) => addr,
            Err(_) => {
                tracing::debug!("'{}' is not a resolvable address, skipping lookup", ip);
                return None;
            }
        };
        match resolver.reverse_lookup(addr).await {
            Ok(lookup) => lookup
                .iter()
                .next()
                .map(|ptr| ptr.to_string().trim_end_matches('.').to_string()),
            Err(e) => {
                tracing::debug!("Reverse lookup for '{}' failed: {}", ip, e);
                None
            }
        }
    }
}
