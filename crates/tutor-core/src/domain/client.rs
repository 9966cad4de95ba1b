//! Client identifiers and blacklist entries.

use std::net::{IpAddr, SocketAddr};

use crate::error::DomainError;

/// Identifier used when the pipeline cannot resolve a client address.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Turns a resolved remote address into the key used by the registries.
///
/// A trailing port is dropped when the value is a socket address, so
/// `203.0.113.5:51234` and `203.0.113.5` share quota. Anything else is kept
/// verbatim; the registries treat it as an opaque string.
///
/// IPv4-mapped IPv6 addresses (dual-stack listeners) are reduced to their
/// IPv4 form, so `::ffff:203.0.113.5` is the same client as `203.0.113.5`.
pub fn client_id(raw: Option<&str>) -> String {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return UNKNOWN_CLIENT.to_string(),
    };

    if let Ok(socket) = raw.parse::<SocketAddr>() {
        return socket.ip().to_canonical().to_string();
    }
    if let Ok(ip) = raw.parse::<IpAddr>() {
        return ip.to_canonical().to_string();
    }
    raw.to_string()
}

/// Validates an entry submitted for the blacklist.
///
/// Only surrounding whitespace is removed. Malformed CIDR text is still a
/// valid literal entry.
pub fn blacklist_entry(raw: &str) -> Result<String, DomainError> {
    let entry = raw.trim();
    if entry.is_empty() {
        return Err(DomainError::Validation(
            "Blacklist entry must not be empty".to_string(),
        ));
    }
    Ok(entry.to_string())
}
