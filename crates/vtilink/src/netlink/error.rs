//! Error types for netlink operations.

use std::io;

/// Result type for netlink operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building or exchanging a netlink request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error from socket operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Kernel returned an error code.
    #[error("kernel error: {message} (errno {errno})")]
    Kernel {
        /// The errno value from the kernel.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// Kernel error with operation context.
    #[error("{operation}: {message} (errno {errno})")]
    KernelWithContext {
        /// The operation that failed.
        operation: String,
        /// The errno value from the kernel.
        errno: i32,
        /// Human-readable error message.
        message: String,
    },

    /// Appending would grow the message past its bound.
    #[error("message exceeded bound of {max} bytes (needed {needed})")]
    Overflow {
        /// Aligned length the message would have had.
        needed: usize,
        /// Maximum message length.
        max: usize,
    },

    /// Interface name does not fit in IFNAMSIZ.
    #[error("interface name too long: {name} (max {max} chars)")]
    NameTooLong {
        /// The rejected name.
        name: String,
        /// Maximum number of characters.
        max: usize,
    },

    /// A nested attribute was closed out of order, or left open.
    #[error("nested attribute order violated: {0}")]
    NestOrder(String),

    /// A structure in the reply was shorter than its fixed size.
    #[error("message truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Expected message length.
        expected: usize,
        /// Actual bytes received.
        actual: usize,
    },

    /// A message in the reply had an impossible length.
    #[error("malformed message: len={0}")]
    MalformedMessage(usize),

    /// The reply datagram was cut short by the transport.
    #[error("truncated reply datagram")]
    TruncatedReply,

    /// Bytes left over after the last complete message.
    #[error("remnant of size {0} in reply")]
    Remnant(usize),

    /// The sender address had an unexpected size.
    #[error("sender address length == {0}")]
    SenderAddress(usize),

    /// The socket returned end of stream.
    #[error("EOF on netlink")]
    UnexpectedEof,
}

impl Error {
    /// Create a kernel error from an errno value.
    pub fn from_errno(errno: i32) -> Self {
        let message = io::Error::from_raw_os_error(-errno).to_string();
        Self::Kernel {
            errno: -errno,
            message,
        }
    }

    /// Add context to this error.
    ///
    /// Wraps kernel errors with operation context. Other errors are returned unchanged.
    pub fn with_context(self, operation: impl Into<String>) -> Self {
        match self {
            Self::Kernel { errno, message } => Self::KernelWithContext {
                operation: operation.into(),
                errno,
                message,
            },
            other => other,
        }
    }

    /// Append the kernel's extended ACK text to a kernel error.
    pub(crate) fn with_ext_ack(self, ext: &str) -> Self {
        match self {
            Self::Kernel { errno, message } => Self::Kernel {
                errno,
                message: format!("{message}: {ext}"),
            },
            other => other,
        }
    }

    /// Check if this is a "not found" error (ENOENT, ENODEV).
    pub fn is_not_found(&self) -> bool {
        matches!(self.errno(), Some(libc::ENOENT | libc::ENODEV))
    }

    /// Check if this is a permission error (EPERM, EACCES).
    pub fn is_permission_denied(&self) -> bool {
        matches!(self.errno(), Some(libc::EPERM | libc::EACCES))
    }

    /// Check if this is an "already exists" error (EEXIST).
    pub fn is_already_exists(&self) -> bool {
        self.errno() == Some(libc::EEXIST)
    }

    /// Check if the reply could not be trusted (framing errors).
    pub fn is_protocol_violation(&self) -> bool {
        matches!(
            self,
            Self::Truncated { .. }
                | Self::MalformedMessage(_)
                | Self::TruncatedReply
                | Self::Remnant(_)
                | Self::SenderAddress(_)
                | Self::UnexpectedEof
        )
    }

    /// Get the errno value if this is a kernel error.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Kernel { errno, .. } | Self::KernelWithContext { errno, .. } => Some(*errno),
            _ => None,
        }
    }
}
