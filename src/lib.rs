//! Wiremux: blocking HTTP request-execution engine with multiplexed
//! transfers and full-jitter retry.
//!
//! # Overview
//!
//! Wiremux drives abstract HTTP requests through an external transport
//! primitive (a curl-like transfer engine consumed behind the
//! [`transport`] traits), reassembles structured responses from the raw
//! wire bytes, and optionally replays failed network attempts with
//! exponential backoff.
//!
//! # Core Guarantees
//!
//! - **Ownership-driven cleanup**: every transfer handle and session
//!   belongs to exactly one execution call and is released on every exit
//!   path, success or error
//! - **Key preservation**: a multiplexed call returns responses keyed
//!   identically to its input, or one error for the whole group
//! - **Order-preserving headers**: header insertion order and duplicate
//!   names survive the trip to the wire and back
//! - **Bounded retries**: the decorator invokes its inner executor at most
//!   `max_attempts` times and only replays transport-level failures
//! - **Deterministic testing**: scripted in-memory transport and seedable
//!   jitter make every engine path reproducible
//!
//! # Module Structure
//!
//! - [`message`]: Request/response types, keys, and composite forms
//! - [`error`]: Error taxonomy ([`ClientError`] and friends)
//! - [`config`]: Engine and retry configuration
//! - [`transport`]: The transport-primitive boundary (traits)
//! - [`options`]: Request-to-transfer-options mapping
//! - [`reassembly`]: Raw-buffer-to-response reconstruction
//! - [`client`]: Single and multiplexed execution
//! - [`retry`]: Full-jitter backoff decorator
//! - [`lab`]: Deterministic scripted transport for tests
//! - [`util`]: Internal utilities (deterministic RNG)
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use wiremux::lab::{ScriptedTransport, TransferScript};
//! use wiremux::{Client, Method, Request, SendRequest};
//!
//! let wire = b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhello".to_vec();
//! let transport = ScriptedTransport::new(vec![TransferScript::Deliver {
//!     status_code: 200,
//!     elapsed: Duration::from_millis(5),
//!     header_len: wire.len() - 5,
//!     buffer: wire,
//! }]);
//!
//! let mut client = Client::new(transport);
//! let request = Request::new(Method::Get, "https://example.test/");
//! let response = client.send_request(&request)?;
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body, b"hello");
//! # Ok::<(), wiremux::ClientError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod client;
pub mod config;
pub mod error;
pub mod lab;
pub mod message;
pub mod options;
pub mod reassembly;
pub mod retry;
pub mod transport;
pub mod util;

// Re-exports for convenient access to core types
pub use client::{Client, SendRequest};
pub use config::{ClientConfig, RetryConfig};
pub use error::{ClientError, ConfigError, NetworkError, RequestError};
pub use message::{
    Inbound, Method, MultiRequest, MultiResponse, Outbound, Request, RequestKey, Response,
};
pub use reassembly::REQUEST_TIME_HEADER;
pub use retry::RetryClient;
pub use transport::{
    Progress, Session, SlotId, Transfer, TransferFault, TransferOptions, TransferReport,
    Transport,
};
