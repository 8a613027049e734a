//! Shared utilities for vtilink.

pub mod addr;
pub mod ifname;
pub mod parse;

pub use addr::parse_ipv4;
pub use parse::{get_u32, parse_key};
