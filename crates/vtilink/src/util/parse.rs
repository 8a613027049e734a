//! Argument parsing utilities.

use std::net::Ipv4Addr;

/// Error type for parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    #[error("number out of range: {0}")]
    OutOfRange(String),
}

pub type Result<T> = std::result::Result<T, ParseError>;

/// Parse a u32 from string.
///
/// Accepts decimal, `0x` hex and leading-zero octal.
pub fn get_u32(s: &str) -> Result<u32> {
    parse_int(s)
}

/// Parse a tunnel key.
///
/// A dotted-quad key is taken as its four octets in network order, so
/// `0.0.0.5` and `5` are the same key. This is how iproute2 reads keys; the
/// address is not byte-swapped a second time, so on little-endian hosts
/// `1.2.3.4` goes on the wire as `01 02 03 04`, not `04 03 02 01` as the old
/// cfgvti C tool sent it.
pub fn parse_key(s: &str) -> Result<u32> {
    let s = s.trim();
    if s.contains('.') {
        return s
            .parse::<Ipv4Addr>()
            .map(u32::from)
            .map_err(|_| ParseError::InvalidNumber(s.to_string()));
    }
    get_u32(s)
}

/// Generic integer parsing with hex and octal support.
fn parse_int<T: TryFrom<u64>>(s: &str) -> Result<T>
where
    <T as TryFrom<u64>>::Error: std::fmt::Display,
{
    let s = s.trim();

    let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X"))
    {
        (hex, 16)
    } else if s.len() > 1 && s.starts_with('0') {
        (&s[1..], 8)
    } else {
        (s, 10)
    };

    // from_str_radix takes a leading sign, a key never has one
    if digits.starts_with(['+', '-']) {
        return Err(ParseError::InvalidNumber(s.to_string()));
    }

    let val = u64::from_str_radix(digits, radix)
        .map_err(|e| ParseError::InvalidNumber(format!("{}: {}", s, e)))?;
    T::try_from(val).map_err(|e| ParseError::OutOfRange(format!("{}: {}", s, e)))
}
