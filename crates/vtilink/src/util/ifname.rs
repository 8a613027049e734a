//! Interface name limits.

/// Maximum interface name length (including null terminator).
pub const IFNAMSIZ: usize = 16;

/// Whether `name` fits in an `IFLA_IFNAME` attribute with its terminator.
pub fn fits(name: &str) -> bool {
    name.len() < IFNAMSIZ
}
