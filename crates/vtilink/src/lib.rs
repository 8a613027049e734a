//! Create VTI (virtual tunnel interface) links over rtnetlink.
//!
//! This crate builds a single `RTM_NEWLINK` request describing a VTI
//! interface, sends it on a `NETLINK_ROUTE` socket and waits for the kernel
//! to acknowledge or reject it.
//!
//! # Example
//!
//! ```ignore
//! use std::net::Ipv4Addr;
//! use vtilink::netlink::{Connection, VtiLink};
//!
//! fn main() -> vtilink::Result<()> {
//!     let mut conn = Connection::new()?;
//!     let vti = VtiLink::new(
//!         "vti0",
//!         Ipv4Addr::new(10, 0, 0, 1),
//!         Ipv4Addr::new(10, 0, 0, 2),
//!         5,
//!     );
//!     conn.add_link(&vti)?;
//!     Ok(())
//! }
//! ```

pub mod netlink;
pub mod util;

pub use netlink::{Connection, Error, Result};
