//! The transport-primitive boundary.
//!
//! The engine never performs network I/O itself: it drives an external
//! transfer primitive (an OS- or library-provided HTTP engine) through the
//! traits defined here. A [`Transport`] hands out configured transfer
//! handles; a [`Transfer`] runs one request to completion and reports the
//! raw wire result; a [`Session`] drives several transfers jointly from one
//! polling loop.
//!
//! Handles and sessions are engine-private resources. Ownership rules do the
//! cleanup: dropping a handle or session releases its transport resources on
//! every exit path, including while an error propagates.

use std::time::Duration;

use crate::error::ClientError;

/// Configuration for one transfer, produced by the option mapper.
///
/// `buffer_response` and `include_header_block` are always set by the
/// engine: the primitive must hand the complete wire result back as one
/// header-block + body buffer and must never stream, print, or auto-follow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOptions {
    /// Request method, verbatim.
    pub method: String,
    /// Target URL, verbatim.
    pub url: String,
    /// Wire-format header lines (`name: value`), in insertion order.
    pub header_lines: Vec<String>,
    /// Request body; `None` for bodyless methods.
    pub body: Option<Vec<u8>>,
    /// Return the transfer result instead of streaming it.
    pub buffer_response: bool,
    /// Prepend the header block to the returned buffer.
    pub include_header_block: bool,
    /// Caller-supplied primitive options, passed through untouched.
    pub overrides: Vec<(String, String)>,
}

/// Raw result of one completed transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    /// Response status code; `0` is the sentinel for "metadata unavailable".
    pub status_code: u16,
    /// Total transfer time.
    pub elapsed: Duration,
    /// Length of the header block at the front of `buffer`.
    pub header_len: usize,
    /// Header block and body, concatenated.
    pub buffer: Vec<u8>,
}

/// A transfer failed at the transport level (connect, DNS, TLS, timeout).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferFault {
    /// Primitive-specific error code.
    pub code: i32,
    /// Human-readable failure description.
    pub message: String,
}

impl TransferFault {
    /// Create a transfer fault.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// The polling primitive itself reported a non-recoverable status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionFault {
    /// Primitive-specific status code.
    pub code: i32,
    /// Primitive-provided status description.
    pub message: String,
}

impl SessionFault {
    /// Create a session fault.
    #[must_use]
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl From<SessionFault> for ClientError {
    fn from(fault: SessionFault) -> Self {
        Self::Session {
            code: fault.code,
            message: fault.message,
        }
    }
}

/// Progress reported by [`Session::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Spurious non-terminal status: more work is available immediately,
    /// poll again without waiting.
    Again,
    /// Number of transfers still in flight; `Running(0)` means all done.
    Running(usize),
}

/// Identifies one registered transfer within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(pub usize);

/// Factory for transfer handles and sessions.
pub trait Transport {
    /// One configured transfer.
    type Handle: Transfer;
    /// Joint progress driver for several transfers.
    type Session: Session<Handle = Self::Handle>;

    /// Create a handle configured for one transfer.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Handle`] when the primitive cannot create or
    /// configure the handle.
    fn prepare(&mut self, options: TransferOptions) -> Result<Self::Handle, ClientError>;

    /// Open a session for driving several transfers jointly.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Handle`] when the primitive cannot create the
    /// session.
    fn open_session(&mut self) -> Result<Self::Session, ClientError>;
}

/// One configured, in-progress-or-completed transfer.
pub trait Transfer {
    /// Run the transfer to completion, blocking the calling thread.
    ///
    /// # Errors
    ///
    /// Returns a [`TransferFault`] on transport-level failure.
    fn perform(&mut self) -> Result<(), TransferFault>;

    /// Result of the completed transfer.
    ///
    /// On the multiplexed path this is where a per-transfer transport
    /// failure surfaces.
    ///
    /// # Errors
    ///
    /// Returns the [`TransferFault`] recorded for a failed transfer.
    fn report(&mut self) -> Result<TransferReport, TransferFault>;
}

/// Drives a set of registered transfers from one polling loop.
///
/// The session owns every handle registered with [`add`](Session::add) until
/// it is taken back with [`remove`](Session::remove); dropping the session
/// releases any handles still registered.
pub trait Session {
    /// The handle type this session drives.
    type Handle: Transfer;

    /// Register a configured transfer; the session owns it until `remove`.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionFault`] when the primitive rejects the handle.
    fn add(&mut self, handle: Self::Handle) -> Result<SlotId, SessionFault>;

    /// Advance all registered transfers without blocking.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionFault`] on a fatal multiplexing status.
    fn advance(&mut self) -> Result<Progress, SessionFault>;

    /// Block until at least one transfer is ready or `timeout` elapses.
    ///
    /// Returns the number of ready transfers; `0` means the wait yielded no
    /// readiness signal and the caller should pause before re-polling.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionFault`] on a fatal multiplexing status.
    fn wait(&mut self, timeout: Duration) -> Result<usize, SessionFault>;

    /// Take a completed transfer back out of the session.
    ///
    /// # Errors
    ///
    /// Returns a [`SessionFault`] when `slot` is unknown to this session.
    fn remove(&mut self, slot: SlotId) -> Result<Self::Handle, SessionFault>;
}
