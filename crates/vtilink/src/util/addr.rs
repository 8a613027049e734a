//! Address parsing utilities.

use std::net::Ipv4Addr;

/// Error type for address parsing.
#[derive(Debug, thiserror::Error)]
pub enum AddrError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("IPv6 address not supported: {0}")]
    Ipv6NotSupported(String),
}

pub type Result<T> = std::result::Result<T, AddrError>;

/// Parse a tunnel endpoint. Only IPv4 endpoints are accepted.
pub fn parse_ipv4(s: &str) -> Result<Ipv4Addr> {
    let s = s.trim();
    if let Ok(addr) = s.parse::<Ipv4Addr>() {
        return Ok(addr);
    }
    if s.parse::<std::net::Ipv6Addr>().is_ok() {
        return Err(AddrError::Ipv6NotSupported(s.to_string()));
    }
    Err(AddrError::InvalidAddress(s.to_string()))
}
