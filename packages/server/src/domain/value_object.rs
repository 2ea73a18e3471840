//! Value objects for the chat relay domain.

use std::fmt;

/// Network identity of a connected client.
///
/// Derived from the first hop of the `x-forwarded-for` chain when present,
/// otherwise from the raw peer address. The IPv6-mapped-IPv4 prefix
/// (`::ffff:`) is stripped so the same client is recognized on both stacks.
/// This is the key for the one-session-per-identity rule; it is not an
/// authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientIp(String);

impl ClientIp {
    pub fn new(ip: String) -> Self {
        Self(strip_mapped_prefix(&ip))
    }

    /// Derive the identity from the forwarded-for header and peer address.
    pub fn from_parts(forwarded_for: Option<&str>, peer: &str) -> Self {
        let raw = forwarded_for
            .and_then(|chain| chain.split(',').next())
            .map(str::trim)
            .filter(|hop| !hop.is_empty())
            .unwrap_or(peer);
        Self(strip_mapped_prefix(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientIp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn strip_mapped_prefix(addr: &str) -> String {
    addr.trim().trim_start_matches("::ffff:").to_string()
}

/// Opaque identifier of one live session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    /// Generate a fresh random session id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short, human-typeable room identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomCode(String);

impl RoomCode {
    /// Wrap a client-supplied code. Lookup failures surface as
    /// `RoomNotFound`, so no format validation happens here.
    pub fn new(code: String) -> Self {
        Self(code)
    }

    /// Generate a code from three random bytes, hex-encoded and upper-cased.
    pub fn generate() -> Self {
        let bytes: [u8; 3] = rand::random();
        Self(hex::encode_upper(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Client-supplied display name.
///
/// Display-only data: not validated, not unique within a room, and never
/// used for identity decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    pub fn new(name: String) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
