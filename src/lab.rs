//! Deterministic in-memory transport for testing.
//!
//! [`ScriptedTransport`] replays a fixed script instead of touching the
//! network: each prepared transfer consumes the next [`TransferScript`],
//! and the session's drive-loop behavior (spurious retry-immediately
//! statuses, empty readiness waits, fatal multiplexing statuses) is fully
//! configurable. Handle teardown is observable through a shared release
//! counter, so tests can assert the engine's cleanup guarantees.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::ClientError;
use crate::transport::{
    Progress, Session, SessionFault, SlotId, Transfer, TransferFault, TransferOptions,
    TransferReport, Transport,
};

/// Scripted outcome for one transfer.
#[derive(Debug, Clone)]
pub enum TransferScript {
    /// The transfer completes and yields this raw wire result.
    Deliver {
        /// Response status code.
        status_code: u16,
        /// Reported transfer time.
        elapsed: Duration,
        /// Header-block length at the front of `buffer`.
        header_len: usize,
        /// Header block and body, concatenated.
        buffer: Vec<u8>,
    },
    /// The transfer fails at the transport level.
    Fail {
        /// Primitive-specific error code.
        code: i32,
        /// Failure description.
        message: String,
    },
}

/// Shared counter of released (dropped) transfer handles.
#[derive(Debug, Clone)]
pub struct ReleaseCounter(Arc<AtomicUsize>);

impl ReleaseCounter {
    /// Number of handles released so far.
    #[must_use]
    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Shared log of the options every prepared transfer was configured with.
#[derive(Debug, Clone)]
pub struct OptionsLog(Arc<Mutex<Vec<TransferOptions>>>);

impl OptionsLog {
    /// Drain and return the recorded option sets, in preparation order.
    #[must_use]
    pub fn take(&self) -> Vec<TransferOptions> {
        std::mem::take(&mut *self.0.lock().expect("options log poisoned"))
    }
}

/// Transport that replays a fixed per-transfer script.
#[derive(Debug)]
pub struct ScriptedTransport {
    scripts: VecDeque<TransferScript>,
    releases: Arc<AtomicUsize>,
    options: Arc<Mutex<Vec<TransferOptions>>>,
    advance_plan: Vec<Progress>,
    wait_plan: Vec<usize>,
    fatal: Option<SessionFault>,
}

impl ScriptedTransport {
    /// Create a transport whose prepared transfers consume `scripts` in
    /// order.
    #[must_use]
    pub fn new(scripts: Vec<TransferScript>) -> Self {
        Self {
            scripts: scripts.into(),
            releases: Arc::new(AtomicUsize::new(0)),
            options: Arc::new(Mutex::new(Vec::new())),
            advance_plan: Vec::new(),
            wait_plan: Vec::new(),
            fatal: None,
        }
    }

    /// Replace the session's advance responses; once exhausted the session
    /// reports all transfers complete.
    #[must_use]
    pub fn with_advance_plan(mut self, plan: Vec<Progress>) -> Self {
        self.advance_plan = plan;
        self
    }

    /// Replace the session's wait responses; once exhausted every wait
    /// reports one ready transfer.
    #[must_use]
    pub fn with_wait_plan(mut self, plan: Vec<usize>) -> Self {
        self.wait_plan = plan;
        self
    }

    /// Make the session's first advance fail with a fatal status.
    #[must_use]
    pub fn with_fatal_session(mut self, code: i32, message: impl Into<String>) -> Self {
        self.fatal = Some(SessionFault::new(code, message));
        self
    }

    /// Counter incremented every time a handle is released.
    #[must_use]
    pub fn release_counter(&self) -> ReleaseCounter {
        ReleaseCounter(Arc::clone(&self.releases))
    }

    /// Log of every prepared transfer's options.
    #[must_use]
    pub fn options_log(&self) -> OptionsLog {
        OptionsLog(Arc::clone(&self.options))
    }
}

impl Transport for ScriptedTransport {
    type Handle = ScriptedHandle;
    type Session = ScriptedSession;

    fn prepare(&mut self, options: TransferOptions) -> Result<Self::Handle, ClientError> {
        self.options
            .lock()
            .expect("options log poisoned")
            .push(options);
        let script = self
            .scripts
            .pop_front()
            .ok_or_else(|| ClientError::Handle("transfer script exhausted".into()))?;
        Ok(ScriptedHandle {
            script,
            releases: Arc::clone(&self.releases),
        })
    }

    fn open_session(&mut self) -> Result<Self::Session, ClientError> {
        Ok(ScriptedSession {
            handles: Vec::new(),
            advance_plan: std::mem::take(&mut self.advance_plan).into(),
            wait_plan: std::mem::take(&mut self.wait_plan).into(),
            fatal: self.fatal.take(),
        })
    }
}

/// Handle whose outcome was fixed at preparation time.
#[derive(Debug)]
pub struct ScriptedHandle {
    script: TransferScript,
    releases: Arc<AtomicUsize>,
}

impl Transfer for ScriptedHandle {
    fn perform(&mut self) -> Result<(), TransferFault> {
        match &self.script {
            TransferScript::Deliver { .. } => Ok(()),
            TransferScript::Fail { code, message } => {
                Err(TransferFault::new(*code, message.clone()))
            }
        }
    }

    fn report(&mut self) -> Result<TransferReport, TransferFault> {
        match &self.script {
            TransferScript::Deliver {
                status_code,
                elapsed,
                header_len,
                buffer,
            } => Ok(TransferReport {
                status_code: *status_code,
                elapsed: *elapsed,
                header_len: *header_len,
                buffer: buffer.clone(),
            }),
            TransferScript::Fail { code, message } => {
                Err(TransferFault::new(*code, message.clone()))
            }
        }
    }
}

impl Drop for ScriptedHandle {
    fn drop(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Session that follows its configured advance and wait plans.
#[derive(Debug)]
pub struct ScriptedSession {
    handles: Vec<Option<ScriptedHandle>>,
    advance_plan: VecDeque<Progress>,
    wait_plan: VecDeque<usize>,
    fatal: Option<SessionFault>,
}

impl Session for ScriptedSession {
    type Handle = ScriptedHandle;

    fn add(&mut self, handle: Self::Handle) -> Result<SlotId, SessionFault> {
        self.handles.push(Some(handle));
        Ok(SlotId(self.handles.len() - 1))
    }

    fn advance(&mut self) -> Result<Progress, SessionFault> {
        if let Some(fault) = self.fatal.take() {
            return Err(fault);
        }
        Ok(self.advance_plan.pop_front().unwrap_or(Progress::Running(0)))
    }

    fn wait(&mut self, _timeout: Duration) -> Result<usize, SessionFault> {
        Ok(self.wait_plan.pop_front().unwrap_or(1))
    }

    fn remove(&mut self, slot: SlotId) -> Result<Self::Handle, SessionFault> {
        self.handles
            .get_mut(slot.0)
            .and_then(Option::take)
            .ok_or_else(|| SessionFault::new(-1, format!("unknown slot {}", slot.0)))
    }
}
