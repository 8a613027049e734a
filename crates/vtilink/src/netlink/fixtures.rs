//! Netlink reply fixtures and a scripted transport for testing.
//!
//! Replies are built byte by byte in native endianness, the way the kernel
//! writes them, so the receive loop can be exercised without a socket.

use std::collections::VecDeque;
use std::io;

use super::attr::{NLA_HDRLEN, nla_align};
use super::message::{
    NLM_F_ACK_TLVS, NLM_F_CAPPED, NLMSG_HDRLEN, NLMSGERR_ATTR_MSG, NlMsgType, nlmsg_align,
};
use super::socket::{Datagram, SOCKADDR_NL_LEN, Transport};

/// A single netlink message with the given type, sequence, port and payload.
pub fn message(msg_type: u16, flags: u16, seq: u32, pid: u32, payload: &[u8]) -> Vec<u8> {
    let len = NLMSG_HDRLEN + payload.len();
    let mut buf = Vec::with_capacity(nlmsg_align(len));
    buf.extend_from_slice(&(len as u32).to_ne_bytes());
    buf.extend_from_slice(&msg_type.to_ne_bytes());
    buf.extend_from_slice(&flags.to_ne_bytes());
    buf.extend_from_slice(&seq.to_ne_bytes());
    buf.extend_from_slice(&pid.to_ne_bytes());
    buf.extend_from_slice(payload);
    buf.resize(nlmsg_align(len), 0);
    buf
}

/// nlmsgerr payload: status followed by a copy of an RTM_NEWLINK request header.
fn nlmsgerr(error: i32, seq: u32, pid: u32) -> Vec<u8> {
    let mut payload = Vec::with_capacity(20);
    payload.extend_from_slice(&error.to_ne_bytes());
    payload.extend_from_slice(&64u32.to_ne_bytes());
    payload.extend_from_slice(&NlMsgType::RTM_NEWLINK.to_ne_bytes());
    payload.extend_from_slice(&0x605u16.to_ne_bytes());
    payload.extend_from_slice(&seq.to_ne_bytes());
    payload.extend_from_slice(&pid.to_ne_bytes());
    payload
}

/// NLMSG_ERROR reply with the given status (0 is an ACK). Capped, no TLVs.
pub fn ack(seq: u32, pid: u32, error: i32) -> Vec<u8> {
    message(NlMsgType::ERROR, NLM_F_CAPPED, seq, pid, &nlmsgerr(error, seq, pid))
}

/// NLMSG_ERROR reply carrying an extended ACK text message.
pub fn error_with_ext_ack(seq: u32, pid: u32, error: i32, text: &str) -> Vec<u8> {
    let mut payload = nlmsgerr(error, seq, pid);
    let attr_len = NLA_HDRLEN + text.len() + 1;
    payload.extend_from_slice(&(attr_len as u16).to_ne_bytes());
    payload.extend_from_slice(&NLMSGERR_ATTR_MSG.to_ne_bytes());
    payload.extend_from_slice(text.as_bytes());
    payload.push(0);
    payload.resize(payload.len() + nla_align(attr_len) - attr_len, 0);
    message(
        NlMsgType::ERROR,
        NLM_F_CAPPED | NLM_F_ACK_TLVS,
        seq,
        pid,
        &payload,
    )
}

/// What the scripted transport does on the next `recv`.
#[derive(Debug)]
pub enum Step {
    /// Deliver these bytes from the kernel.
    Reply(Vec<u8>),
    /// Deliver these bytes with the truncation flag set.
    Truncated(Vec<u8>),
    /// Deliver these bytes with a custom sender.
    From {
        data: Vec<u8>,
        sender_port: u32,
        addr_len: usize,
    },
    /// ACK the last request sent, echoing its sequence number.
    AckLastRequest,
    /// Answer the last request sent with this status.
    RejectLastRequest(i32),
    /// Fail with this OS error.
    Fail(i32),
}

/// In-memory transport replaying a script of receive steps.
pub struct ScriptedTransport {
    pub pid: u32,
    pub sent: Vec<Vec<u8>>,
    pub steps: VecDeque<Step>,
    pub fail_send: Option<i32>,
}

impl ScriptedTransport {
    pub fn new(pid: u32, steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            pid,
            sent: Vec::new(),
            steps: steps.into_iter().collect(),
            fail_send: None,
        }
    }

    /// Number of script steps not consumed yet.
    pub fn pending(&self) -> usize {
        self.steps.len()
    }

    fn last_seq(&self) -> u32 {
        let last = self.sent.last().expect("no request sent");
        u32::from_ne_bytes(last[8..12].try_into().unwrap())
    }

    fn deliver(buf: &mut [u8], data: &[u8], sender_port: u32, addr_len: usize) -> Datagram {
        let len = data.len().min(buf.len());
        buf[..len].copy_from_slice(&data[..len]);
        Datagram {
            len,
            sender_port,
            addr_len,
            truncated: data.len() > buf.len(),
        }
    }
}

impl Transport for ScriptedTransport {
    fn port_id(&self) -> u32 {
        self.pid
    }

    fn send(&mut self, msg: &[u8]) -> io::Result<()> {
        if let Some(errno) = self.fail_send {
            return Err(io::Error::from_raw_os_error(errno));
        }
        self.sent.push(msg.to_vec());
        Ok(())
    }

    fn recv(&mut self, buf: &mut [u8]) -> io::Result<Datagram> {
        match self.steps.pop_front() {
            Some(Step::Reply(data)) => Ok(Self::deliver(buf, &data, 0, SOCKADDR_NL_LEN)),
            Some(Step::Truncated(data)) => {
                let mut dgram = Self::deliver(buf, &data, 0, SOCKADDR_NL_LEN);
                dgram.truncated = true;
                Ok(dgram)
            }
            Some(Step::From {
                data,
                sender_port,
                addr_len,
            }) => Ok(Self::deliver(buf, &data, sender_port, addr_len)),
            Some(Step::AckLastRequest) => {
                let data = ack(self.last_seq(), self.pid, 0);
                Ok(Self::deliver(buf, &data, 0, SOCKADDR_NL_LEN))
            }
            Some(Step::RejectLastRequest(error)) => {
                let data = ack(self.last_seq(), self.pid, error);
                Ok(Self::deliver(buf, &data, 0, SOCKADDR_NL_LEN))
            }
            Some(Step::Fail(errno)) => Err(io::Error::from_raw_os_error(errno)),
            None => panic!("receive loop read past the end of the script"),
        }
    }
}
