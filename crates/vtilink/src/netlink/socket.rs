//! Low-level blocking netlink socket operations.

use std::io;
use std::os::unix::io::{AsRawFd, RawFd};

use netlink_sys::{Socket, SocketAddr, protocols};

use super::error::Result;

/// Size of `struct sockaddr_nl`, the only sender address a kernel reply may carry.
pub const SOCKADDR_NL_LEN: usize = std::mem::size_of::<libc::sockaddr_nl>();

/// One datagram read from a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Datagram {
    /// Number of bytes written into the receive buffer.
    pub len: usize,
    /// Port id of the sender (0 for the kernel).
    pub sender_port: u32,
    /// Length of the sender address returned by the transport.
    pub addr_len: usize,
    /// The datagram did not fit in the receive buffer.
    pub truncated: bool,
}

/// A datagram transport carrying netlink messages.
///
/// [`NetlinkSocket`] is the real implementation; the request/ACK exchange in
/// [`Connection`](super::Connection) only depends on this trait.
pub trait Transport {
    /// Local port id that replies are addressed to.
    fn port_id(&self) -> u32;

    /// Send one complete message.
    fn send(&mut self, msg: &[u8]) -> io::Result<()>;

    /// Block until one datagram is read into `buf`.
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<Datagram>;
}

/// Blocking NETLINK_ROUTE socket.
///
/// The descriptor is closed when the socket is dropped.
pub struct NetlinkSocket {
    socket: Socket,
    /// Local port ID (assigned by kernel).
    pid: u32,
}

impl NetlinkSocket {
    /// Open and bind a routing netlink socket.
    pub fn new() -> Result<Self> {
        let mut socket = Socket::new(protocols::NETLINK_ROUTE)?;

        // Bind to get a port ID
        let mut addr = SocketAddr::new(0, 0);
        socket.bind(&addr)?;
        socket.get_address(&mut addr)?;
        let pid = addr.port_number();

        // Enable extended ACK for better error messages
        socket.set_ext_ack(true).ok(); // Ignore if not supported

        tracing::debug!(pid, "opened rtnetlink socket");
        Ok(Self { socket, pid })
    }
}

impl Transport for NetlinkSocket {
    fn port_id(&self) -> u32 {
        self.pid
    }

    fn send(&mut self, msg: &[u8]) -> io::Result<()> {
        let kernel = SocketAddr::new(0, 0);
        let sent = self.socket.send_to(msg, &kernel, 0)?;
        if sent != msg.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short send: {} of {} bytes", sent, msg.len()),
            ));
        }
        Ok(())
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<Datagram> {
        // SAFETY: sockaddr_nl and msghdr are plain C structs for which all-zero
        // is a valid value.
        let mut addr: libc::sockaddr_nl = unsafe { std::mem::zeroed() };
        let mut msg: libc::msghdr = unsafe { std::mem::zeroed() };
        let mut iov = libc::iovec {
            iov_base: buf.as_mut_ptr().cast(),
            iov_len: buf.len(),
        };
        msg.msg_name = (&mut addr as *mut libc::sockaddr_nl).cast();
        msg.msg_namelen = SOCKADDR_NL_LEN as libc::socklen_t;
        msg.msg_iov = &mut iov;
        msg.msg_iovlen = 1;

        // SAFETY: msg points at live, correctly sized buffers for the
        // duration of the call.
        let n = unsafe { libc::recvmsg(self.socket.as_raw_fd(), &mut msg, 0) };
        if n < 0 {
            return Err(io::Error::last_os_error());
        }

        Ok(Datagram {
            len: n as usize,
            sender_port: addr.nl_pid,
            addr_len: msg.msg_namelen as usize,
            truncated: msg.msg_flags & libc::MSG_TRUNC != 0,
        })
    }
}

impl AsRawFd for NetlinkSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.socket.as_raw_fd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sockaddr_nl_len() {
        // family (u16) + pad (u16) + pid (u32) + groups (u32)
        assert_eq!(SOCKADDR_NL_LEN, 12);
    }
}
