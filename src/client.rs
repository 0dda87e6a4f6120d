//! Request execution.
//!
//! [`Client`] runs abstract requests against a [`Transport`]: one at a time
//! through [`execute`](Client::execute), or a keyed group concurrently
//! through [`execute_multi`](Client::execute_multi). Both paths block the
//! calling thread; I/O parallelism inside a group belongs to the transport
//! primitive.
//!
//! Every transfer handle and session is created inside one execution call
//! and owned by it exclusively, so teardown is ordinary ownership: handles
//! drop on every exit path, success or error, and nothing is shared across
//! calls.

use std::thread;

use crate::config::ClientConfig;
use crate::error::{ClientError, NetworkError};
use crate::message::{Inbound, MultiRequest, MultiResponse, Outbound, Request, Response};
use crate::options::transfer_options;
use crate::reassembly::reassemble;
use crate::transport::{Progress, Session, Transfer, Transport};

/// The executor seam: anything that can run one request to completion.
///
/// [`Client`] implements this for real transports;
/// [`RetryClient`](crate::retry::RetryClient) wraps any implementation to
/// replay failed network attempts.
pub trait SendRequest {
    /// Execute one request, blocking until a response or error.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] describing the failure; only
    /// [`ClientError::Network`] is retryable.
    fn send_request(&mut self, request: &Request) -> Result<Response, ClientError>;
}

/// Drive-loop state for the multiplexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DriveState {
    /// Ask the session to advance all transfers without blocking.
    Advancing,
    /// Block on a bounded readiness wait before re-polling.
    Waiting,
}

/// HTTP request-execution engine over a transport primitive.
#[derive(Debug)]
pub struct Client<T: Transport> {
    transport: T,
    config: ClientConfig,
}

impl<T: Transport> Client<T> {
    /// Create a client with default configuration.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    /// Create a client with custom configuration.
    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Execute a payload, branching on its shape.
    ///
    /// # Errors
    ///
    /// Propagates the error of the underlying execution path.
    pub fn dispatch(&mut self, outbound: &Outbound) -> Result<Inbound, ClientError> {
        match outbound {
            Outbound::Single(request) => self.execute(request).map(Inbound::Single),
            Outbound::Multi(multi) => self.execute_multi(multi).map(Inbound::Multi),
        }
    }

    /// Run one request to completion. Exactly one network transfer per call.
    ///
    /// # Errors
    ///
    /// [`ClientError::Handle`] when the transfer cannot be set up,
    /// [`ClientError::Network`] on transport-level failure, and
    /// [`ClientError::MissingStatusCode`] when the completed transfer
    /// carries no usable metadata.
    pub fn execute(&mut self, request: &Request) -> Result<Response, ClientError> {
        let options = transfer_options(request, &self.config.transport_overrides);
        let mut handle = self.transport.prepare(options)?;

        tracing::debug!(method = %request.method, uri = %request.uri, "transfer started");

        if let Err(fault) = handle.perform() {
            return Err(NetworkError::new(request.clone(), fault.message, fault.code).into());
        }

        let report = handle
            .report()
            .map_err(|fault| NetworkError::new(request.clone(), fault.message, fault.code))?;
        let response = reassemble(report)?;

        tracing::debug!(status = response.status, "transfer completed");
        Ok(response)
    }

    /// Run a keyed group of requests concurrently.
    ///
    /// The returned [`MultiResponse`] carries exactly the input's key set.
    /// A transport-level failure on any one key aborts the whole group with
    /// [`ClientError::Network`]; no partial result is returned.
    ///
    /// # Errors
    ///
    /// [`ClientError::Handle`] on setup failure, [`ClientError::Session`]
    /// when the polling primitive reports a fatal status, and
    /// [`ClientError::Network`] when any transfer fails.
    pub fn execute_multi(&mut self, multi: &MultiRequest) -> Result<MultiResponse, ClientError> {
        let mut session = self.transport.open_session()?;

        let mut slots = Vec::with_capacity(multi.len());
        for (key, request) in multi.iter() {
            let options = transfer_options(request, &self.config.transport_overrides);
            let handle = self.transport.prepare(options)?;
            let slot = session.add(handle).map_err(ClientError::from)?;
            slots.push((key.clone(), slot));
        }

        tracing::debug!(transfers = multi.len(), "session started");
        self.drive(&mut session)?;

        let mut entries = Vec::with_capacity(slots.len());
        for ((key, slot), (_, request)) in slots.into_iter().zip(multi.iter()) {
            let mut handle = session.remove(slot).map_err(ClientError::from)?;
            match handle.report() {
                Ok(report) => entries.push((key, reassemble(report)?)),
                Err(fault) => {
                    tracing::warn!(key = %key, code = fault.code, "aborting group: transfer failed");
                    return Err(
                        NetworkError::new(request.clone(), fault.message, fault.code).into()
                    );
                }
            }
        }

        tracing::debug!(transfers = entries.len(), "session completed");
        Ok(MultiResponse::new(entries))
    }

    /// Drive all registered transfers to completion.
    ///
    /// Transitions: `Advancing` stays on a spurious retry-immediately
    /// status, moves to `Waiting` while transfers remain in flight, and
    /// finishes when none do; `Waiting` falls back to a short sleep when
    /// the readiness wait reports nothing ready, then re-polls.
    fn drive(&self, session: &mut T::Session) -> Result<(), ClientError> {
        let mut state = DriveState::Advancing;
        loop {
            match state {
                DriveState::Advancing => match session.advance().map_err(ClientError::from)? {
                    Progress::Again => {}
                    Progress::Running(0) => return Ok(()),
                    Progress::Running(in_flight) => {
                        tracing::trace!(in_flight, "transfers in flight");
                        state = DriveState::Waiting;
                    }
                },
                DriveState::Waiting => {
                    let ready = session
                        .wait(self.config.wait_timeout)
                        .map_err(ClientError::from)?;
                    if ready == 0 {
                        // No readiness signal; pause to avoid a hot spin.
                        thread::sleep(self.config.poll_sleep);
                    }
                    state = DriveState::Advancing;
                }
            }
        }
    }
}

impl<T: Transport> SendRequest for Client<T> {
    fn send_request(&mut self, request: &Request) -> Result<Response, ClientError> {
        self.execute(request)
    }
}
