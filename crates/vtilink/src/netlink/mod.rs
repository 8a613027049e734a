//! Blocking rtnetlink implementation for creating VTI links.
//!
//! Requests are assembled with a bounded [`MessageBuilder`], sent over a
//! [`NetlinkSocket`] and confirmed by [`Connection`], which waits for the
//! kernel acknowledgement matching the request's sequence number.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::net::Ipv4Addr;
//! use vtilink::netlink::Connection;
//! use vtilink::netlink::link::VtiLink;
//!
//! let mut conn = Connection::new()?;
//! conn.add_link(&VtiLink::new(
//!     "vti0",
//!     Ipv4Addr::new(192, 0, 2, 1),
//!     Ipv4Addr::new(198, 51, 100, 1),
//!     42,
//! ))?;
//! ```

pub mod attr;
mod builder;
pub mod connection;
mod error;
#[cfg(test)]
mod fixtures;
pub mod link;
pub mod message;
pub mod socket;
pub mod types;

pub use attr::{AttrIter, NlAttr};
pub use builder::{DEFAULT_MAX_LEN, MessageBuilder, NestToken};
pub use connection::Connection;
pub use error::{Error, Result};
pub use link::{LinkConfig, VtiLink, build_vti_create};
pub use message::{MessageIter, NLMSG_HDRLEN, NlMsgHdr, NlMsgType};
pub use socket::{Datagram, NetlinkSocket, Transport};
