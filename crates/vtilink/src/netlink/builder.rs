//! Message builder for constructing netlink messages.
//!
//! The builder is append-only and bounded. Every append is checked against
//! the bound first and leaves the message untouched when it would not fit.
//! Nested attributes are written as zero-length markers whose length is
//! patched when the nest is closed; nests must be closed innermost first.

use zerocopy::{Immutable, IntoBytes};

use super::attr::{NLA_F_NESTED, NLA_HDRLEN, NlAttr, nla_align};
use super::error::{Error, Result};
use super::message::{NLMSG_HDRLEN, NlMsgHdr, nlmsg_align};

/// Default message bound: a header, a 16-byte family header and 1 KiB of
/// attributes.
pub const DEFAULT_MAX_LEN: usize = NLMSG_HDRLEN + 16 + 1024;

/// Token returned when starting a nested attribute.
/// Used to finalize the nested attribute length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a nested attribute must be closed with nest_end"]
pub struct NestToken {
    /// Offset of the nested attribute header in the buffer.
    offset: usize,
}

/// Builder for constructing netlink messages.
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    buf: Vec<u8>,
    max_len: usize,
    /// Offsets of currently open nests, innermost last.
    nests: Vec<usize>,
}

impl MessageBuilder {
    /// Create a new message builder with the given type and flags.
    pub fn new(msg_type: u16, flags: u16) -> Self {
        Self::with_header(NlMsgHdr::new(msg_type, flags))
    }

    /// Create a builder from an existing header.
    pub fn with_header(header: NlMsgHdr) -> Self {
        let mut buf = vec![0u8; NLMSG_HDRLEN];
        buf[..std::mem::size_of::<NlMsgHdr>()].copy_from_slice(header.as_bytes());
        Self {
            buf,
            max_len: DEFAULT_MAX_LEN,
            nests: Vec::new(),
        }
    }

    /// Set the maximum message length in bytes.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    /// Get the current message length.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Check if the message is empty (header only).
    pub fn is_empty(&self) -> bool {
        self.buf.len() == NLMSG_HDRLEN
    }

    fn reserve(&self, aligned_len: usize) -> Result<()> {
        let needed = nlmsg_align(self.buf.len()) + aligned_len;
        if needed > self.max_len {
            return Err(Error::Overflow {
                needed,
                max: self.max_len,
            });
        }
        Ok(())
    }

    /// Append raw bytes to the message (with alignment padding).
    pub fn append_bytes(&mut self, data: &[u8]) -> Result<()> {
        let aligned = nlmsg_align(data.len());
        self.reserve(aligned)?;
        self.buf.extend_from_slice(data);
        self.buf.resize(nlmsg_align(self.buf.len()), 0);
        Ok(())
    }

    /// Append a fixed-size family header (ifinfomsg and friends).
    pub fn append<T: IntoBytes + Immutable>(&mut self, data: &T) -> Result<()> {
        self.append_bytes(data.as_bytes())
    }

    /// Append an attribute with the given type and data.
    ///
    /// On overflow the message is left exactly as it was.
    pub fn append_attr(&mut self, attr_type: u16, data: &[u8]) -> Result<()> {
        let attr_len = NLA_HDRLEN + data.len();
        if attr_len > u16::MAX as usize {
            return Err(Error::Overflow {
                needed: attr_len,
                max: u16::MAX as usize,
            });
        }
        self.reserve(nla_align(attr_len))?;
        let attr = NlAttr::new(attr_type, data.len());
        self.buf.extend_from_slice(attr.as_bytes());
        self.buf.extend_from_slice(data);
        let aligned = nla_align(self.buf.len());
        self.buf.resize(aligned, 0);
        Ok(())
    }

    /// Append an empty (flag) attribute with no payload.
    pub fn append_attr_empty(&mut self, attr_type: u16) -> Result<()> {
        self.append_attr(attr_type, &[])
    }

    /// Append a u32 attribute (native endian).
    pub fn append_attr_u32(&mut self, attr_type: u16, value: u32) -> Result<()> {
        self.append_attr(attr_type, &value.to_ne_bytes())
    }

    /// Append a u32 attribute (big endian / network order).
    pub fn append_attr_u32_be(&mut self, attr_type: u16, value: u32) -> Result<()> {
        self.append_attr(attr_type, &value.to_be_bytes())
    }

    /// Append a null-terminated string attribute.
    pub fn append_attr_str(&mut self, attr_type: u16, value: &str) -> Result<()> {
        let mut data = Vec::with_capacity(value.len() + 1);
        data.extend_from_slice(value.as_bytes());
        data.push(0);
        self.append_attr(attr_type, &data)
    }

    /// Append a string attribute without null terminator.
    pub fn append_attr_string(&mut self, attr_type: u16, value: &str) -> Result<()> {
        self.append_attr(attr_type, value.as_bytes())
    }

    /// Start a nested attribute. Returns a token to finalize it.
    pub fn nest_start(&mut self, attr_type: u16) -> Result<NestToken> {
        let offset = self.buf.len();
        self.append_attr_empty(attr_type | NLA_F_NESTED)?;
        self.nests.push(offset);
        Ok(NestToken { offset })
    }

    /// End a nested attribute started with `nest_start`.
    ///
    /// Only the innermost open nest can be closed; its length becomes the
    /// span from its header to the current end of the message.
    pub fn nest_end(&mut self, token: NestToken) -> Result<()> {
        match self.nests.last() {
            Some(&offset) if offset == token.offset => {}
            Some(&offset) => {
                return Err(Error::NestOrder(format!(
                    "closing nest at {} while nest at {} is still open",
                    token.offset, offset
                )));
            }
            None => {
                return Err(Error::NestOrder(format!(
                    "no open nest at {}",
                    token.offset
                )));
            }
        }

        let len = self.buf.len() - token.offset;
        let len = u16::try_from(len).map_err(|_| Error::Overflow {
            needed: len,
            max: u16::MAX as usize,
        })?;
        self.buf[token.offset..token.offset + 2].copy_from_slice(&len.to_ne_bytes());
        self.nests.pop();
        Ok(())
    }

    /// Run `f` inside a nested attribute and close it afterwards.
    pub fn nested<F>(&mut self, attr_type: u16, f: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let token = self.nest_start(attr_type)?;
        f(self)?;
        self.nest_end(token)
    }

    /// Add flags to the message header.
    pub fn add_flags(&mut self, flags: u16) {
        let current = u16::from_ne_bytes([self.buf[6], self.buf[7]]);
        self.buf[6..8].copy_from_slice(&(current | flags).to_ne_bytes());
    }

    /// Set the sequence number.
    pub fn set_seq(&mut self, seq: u32) {
        self.buf[8..12].copy_from_slice(&seq.to_ne_bytes());
    }

    /// Set the port ID.
    pub fn set_pid(&mut self, pid: u32) {
        self.buf[12..16].copy_from_slice(&pid.to_ne_bytes());
    }

    /// Finalize and return the message bytes.
    ///
    /// Fails if a nested attribute is still open.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        if !self.nests.is_empty() {
            return Err(Error::NestOrder(format!(
                "{} nested attribute(s) left open",
                self.nests.len()
            )));
        }
        let len = self.buf.len() as u32;
        self.buf[0..4].copy_from_slice(&len.to_ne_bytes());
        Ok(self.buf)
    }

    /// Get the current buffer for inspection.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}
