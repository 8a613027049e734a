//! Netlink connection with request/ACK handling.
//!
//! A request is sent once with a fresh random sequence number and
//! `NLM_F_ACK`. Replies are then read until an `NLMSG_ERROR` for that
//! sequence number arrives: status 0 is success, anything else is the
//! kernel's error. Messages addressed to other exchanges on the socket are
//! skipped. There is no timeout.

use std::io;

use tracing::{debug, warn};

use super::builder::MessageBuilder;
use super::error::{Error, Result};
use super::message::{MessageIter, NLM_F_ACK, NlMsgError};
use super::socket::{Datagram, NetlinkSocket, SOCKADDR_NL_LEN, Transport};

/// Size of the buffer each reply datagram is read into.
pub const RECV_BUF_SIZE: usize = 16384;

/// Netlink connection owning one transport.
///
/// Dropping the connection closes the socket.
pub struct Connection<T: Transport = NetlinkSocket> {
    transport: T,
}

impl Connection<NetlinkSocket> {
    /// Open a routing netlink connection.
    pub fn new() -> Result<Self> {
        Ok(Self {
            transport: NetlinkSocket::new()?,
        })
    }
}

impl<T: Transport> Connection<T> {
    /// Create a connection over an existing transport.
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Get the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Consume the connection, returning the transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Send a request and wait for its ACK.
    pub fn request_ack(&mut self, builder: MessageBuilder) -> Result<()> {
        self.request_ack_with_seq(builder, rand::random())
    }

    pub(crate) fn request_ack_with_seq(
        &mut self,
        mut builder: MessageBuilder,
        seq: u32,
    ) -> Result<()> {
        let pid = self.transport.port_id();
        builder.set_seq(seq);
        builder.set_pid(pid);
        builder.add_flags(NLM_F_ACK);

        let msg = builder.finish()?;
        debug!(seq, pid, len = msg.len(), "sending request");
        self.transport.send(&msg)?;

        self.wait_ack(seq, pid)
    }

    fn wait_ack(&mut self, seq: u32, pid: u32) -> Result<()> {
        let mut buf = vec![0u8; RECV_BUF_SIZE];

        loop {
            let dgram = match self.transport.recv(&mut buf) {
                Ok(dgram) => dgram,
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
                    ) =>
                {
                    continue;
                }
                Err(e) => return Err(Error::Io(e)),
            };

            if dgram.len == 0 {
                return Err(Error::UnexpectedEof);
            }
            if dgram.addr_len != SOCKADDR_NL_LEN {
                return Err(Error::SenderAddress(dgram.addr_len));
            }

            let data = &buf[..dgram.len.min(buf.len())];
            debug!(len = data.len(), truncated = dgram.truncated, "received datagram");

            if scan_reply(data, &dgram, seq, pid)? {
                debug!(seq, "request acknowledged");
                return Ok(());
            }
        }
    }
}

/// Scan one reply datagram.
///
/// Returns `Ok(true)` on the ACK for `seq`, `Ok(false)` when the datagram
/// held nothing conclusive and the next one must be read.
fn scan_reply(data: &[u8], dgram: &Datagram, seq: u32, pid: u32) -> Result<bool> {
    let mut messages = MessageIter::new(data);

    for result in messages.by_ref() {
        let (header, payload) = match result {
            Ok(msg) => msg,
            Err(Error::MalformedMessage(_)) if dgram.truncated => {
                return Err(Error::TruncatedReply);
            }
            Err(e) => return Err(e),
        };

        if dgram.sender_port != 0 || header.nlmsg_pid != pid || header.nlmsg_seq != seq {
            debug!(
                sender = dgram.sender_port,
                pid = header.nlmsg_pid,
                seq = header.nlmsg_seq,
                "skipping message for another exchange"
            );
            continue;
        }

        if header.is_error() {
            let err = NlMsgError::from_bytes(payload)?;
            if err.is_ack() {
                return Ok(true);
            }
            let error = Error::from_errno(err.error);
            return Err(match err.ext_ack_message(header.nlmsg_flags, payload) {
                Some(text) => error.with_ext_ack(&text),
                None => error,
            });
        }

        warn!(msg_type = header.nlmsg_type, "unexpected reply");
    }

    if dgram.truncated {
        warn!("message truncated, reading again");
        return Ok(false);
    }

    match messages.remaining() {
        0 => Ok(false),
        remnant => Err(Error::Remnant(remnant)),
    }
}
