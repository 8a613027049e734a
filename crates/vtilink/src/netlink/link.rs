//! Link creation builders.
//!
//! # Supported Link Types
//!
//! - [`VtiLink`] - Virtual Tunnel Interface (IPv4 IPsec)
//!
//! # Example
//!
//! ```ignore
//! use std::net::Ipv4Addr;
//! use vtilink::netlink::Connection;
//! use vtilink::netlink::link::VtiLink;
//!
//! let mut conn = Connection::new()?;
//! let vti = VtiLink::new(
//!     "vti0",
//!     Ipv4Addr::new(10, 0, 0, 1),
//!     Ipv4Addr::new(10, 0, 0, 2),
//!     5,
//! );
//! conn.add_link(&vti)?;
//! ```

use std::net::Ipv4Addr;

use super::builder::MessageBuilder;
use super::connection::Connection;
use super::error::{Error, Result};
use super::message::{NLM_F_CREATE, NLM_F_EXCL, NLM_F_REQUEST, NlMsgType};
use super::socket::Transport;
use super::types::link::{IfInfoMsg, IflaAttr, IflaInfo, IflaVti};
use crate::util::ifname::{self, IFNAMSIZ};

/// Trait for link configurations that can be added to the system.
pub trait LinkConfig {
    /// Get the name of this interface.
    fn name(&self) -> &str;

    /// Get the kind string for this link type (e.g., "vti").
    fn kind(&self) -> &str;

    /// Build the netlink message for creating this link.
    fn build(&self) -> Result<MessageBuilder>;
}

// ============================================================================
// VTI Link (Virtual Tunnel Interface)
// ============================================================================

/// Configuration for a VTI (Virtual Tunnel Interface) for IPv4.
///
/// VTI interfaces are used with IPsec to create route-based VPNs.
/// Traffic routed through the VTI is automatically encrypted/decrypted.
/// The key marks both directions of the tunnel, so it is sent as both the
/// input and the output key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VtiLink {
    name: String,
    local: Ipv4Addr,
    remote: Ipv4Addr,
    key: u32,
}

impl VtiLink {
    /// Create a new VTI interface configuration.
    pub fn new(name: impl Into<String>, local: Ipv4Addr, remote: Ipv4Addr, key: u32) -> Self {
        Self {
            name: name.into(),
            local,
            remote,
            key,
        }
    }

    /// Local (source) address.
    pub fn local(&self) -> Ipv4Addr {
        self.local
    }

    /// Remote (destination) address.
    pub fn remote(&self) -> Ipv4Addr {
        self.remote
    }

    /// Tunnel key.
    pub fn key(&self) -> u32 {
        self.key
    }
}

impl LinkConfig for VtiLink {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> &str {
        "vti"
    }

    fn build(&self) -> Result<MessageBuilder> {
        let mut builder = create_link_message(&self.name)?;

        // IFLA_LINKINFO
        let linkinfo = builder.nest_start(IflaAttr::Linkinfo as u16)?;
        builder.append_attr_string(IflaInfo::Kind as u16, self.kind())?;

        // IFLA_INFO_DATA
        let data = builder.nest_start(IflaInfo::Data as u16)?;
        builder.append_attr_u32_be(IflaVti::Ikey as u16, self.key)?;
        builder.append_attr_u32_be(IflaVti::Okey as u16, self.key)?;
        builder.append_attr(IflaVti::Local as u16, &self.local.octets())?;
        builder.append_attr(IflaVti::Remote as u16, &self.remote.octets())?;

        builder.nest_end(data)?;
        builder.nest_end(linkinfo)?;

        Ok(builder)
    }
}

/// Build the RTM_NEWLINK request creating a VTI interface.
pub fn build_vti_create(
    name: &str,
    local: Ipv4Addr,
    remote: Ipv4Addr,
    key: u32,
) -> Result<MessageBuilder> {
    VtiLink::new(name, local, remote, key).build()
}

/// Create the base RTM_NEWLINK message with ifinfomsg header and name.
fn create_link_message(name: &str) -> Result<MessageBuilder> {
    if !ifname::fits(name) {
        return Err(Error::NameTooLong {
            name: name.to_string(),
            max: IFNAMSIZ - 1,
        });
    }

    let mut builder = MessageBuilder::new(
        NlMsgType::RTM_NEWLINK,
        NLM_F_REQUEST | NLM_F_CREATE | NLM_F_EXCL,
    );

    builder.append(&IfInfoMsg::new())?;
    builder.append_attr_str(IflaAttr::Ifname as u16, name)?;

    Ok(builder)
}

impl<T: Transport> Connection<T> {
    /// Create a new link and wait for the kernel to acknowledge it.
    pub fn add_link<L: LinkConfig>(&mut self, config: &L) -> Result<()> {
        let builder = config.build()?;
        tracing::debug!(name = config.name(), kind = config.kind(), "adding link");
        self.request_ack(builder)
            .map_err(|e| e.with_context(format!("creating {} link {}", config.kind(), config.name())))
    }
}
