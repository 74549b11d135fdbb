//! Run state shared between the run loop, components and the signal bridge.
//!
//! Everything in here is plain atomics so a [`StopHandle`] can be used from any
//! thread without taking a lock.
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU8, Ordering};

use crate::kernel::registry::ServiceRegistry;

/// Lifecycle state of an [`Application`](crate::kernel::Application).
///
/// Transitions only move forward: `NotRunning -> Running -> Stopping -> CleanedUp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum RunState {
    NotRunning = 0,
    Running = 1,
    Stopping = 2,
    CleanedUp = 3,
}

impl RunState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => RunState::NotRunning,
            1 => RunState::Running,
            2 => RunState::Stopping,
            _ => RunState::CleanedUp,
        }
    }
}

const EXIT_CODE_UNSET: i64 = i64::MIN;

#[derive(Debug)]
struct ControlBlock {
    state: AtomicU8,
    /// Holds [`EXIT_CODE_UNSET`] until the first `exit` call.
    exit_code: AtomicI64,
    cleanup_started: AtomicBool,
}

/// Cloneable handle used to request a stop.
///
/// `stop` and `exit` are idempotent and only perform atomic stores.
#[derive(Clone)]
pub struct StopHandle {
    inner: Arc<ControlBlock>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(ControlBlock {
                state: AtomicU8::new(RunState::NotRunning as u8),
                exit_code: AtomicI64::new(EXIT_CODE_UNSET),
                cleanup_started: AtomicBool::new(false),
            }),
        }
    }

    /// Request the run loop to stop after the current iteration.
    pub fn stop(&self) {
        self.advance_to(RunState::Stopping);
    }

    /// Request a stop and set the process exit code. The first code recorded wins.
    pub fn exit(&self, code: i32) {
        // Recording the code and claiming the slot is a single step, so a
        // reader never sees a claimed but unwritten code.
        let _ = self.inner.exit_code.compare_exchange(
            EXIT_CODE_UNSET,
            i64::from(code),
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
        self.stop();
    }

    pub fn is_stopping(&self) -> bool {
        self.state() >= RunState::Stopping
    }

    pub fn state(&self) -> RunState {
        RunState::from_u8(self.inner.state.load(Ordering::SeqCst))
    }

    /// Exit code requested so far, `0` when nothing was requested.
    pub fn exit_code(&self) -> i32 {
        match self.inner.exit_code.load(Ordering::SeqCst) {
            EXIT_CODE_UNSET => 0,
            // Only values widened from an i32 are ever stored.
            code => code as i32,
        }
    }

    /// Move `NotRunning -> Running`. Returns false when the state was already past
    /// `NotRunning`.
    pub(crate) fn start(&self) -> bool {
        self.inner
            .state
            .compare_exchange(
                RunState::NotRunning as u8,
                RunState::Running as u8,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
    }

    /// Claim the one-shot cleanup. Only the first caller gets `true`.
    pub(crate) fn begin_cleanup(&self) -> bool {
        !self.inner.cleanup_started.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn cleanup_started(&self) -> bool {
        self.inner.cleanup_started.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_cleaned_up(&self) {
        self.advance_to(RunState::CleanedUp);
    }

    fn advance_to(&self, target: RunState) {
        // fetch_max keeps transitions one-directional.
        self.inner.state.fetch_max(target as u8, Ordering::SeqCst);
    }
}

impl Default for StopHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StopHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopHandle")
            .field("state", &self.state())
            .field("exit_code", &self.exit_code())
            .finish()
    }
}

/// Handed to every component lifecycle call.
#[derive(Debug, Clone)]
pub struct AppContext {
    services: Arc<ServiceRegistry>,
    stop: StopHandle,
}

impl AppContext {
    pub fn new(services: Arc<ServiceRegistry>, stop: StopHandle) -> Self {
        Self { services, stop }
    }

    pub fn services(&self) -> &ServiceRegistry {
        &self.services
    }

    pub fn shared_services(&self) -> Arc<ServiceRegistry> {
        self.services.clone()
    }

    pub fn stop_handle(&self) -> &StopHandle {
        &self.stop
    }

    /// Shorthand for `stop_handle().stop()`.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Shorthand for `stop_handle().exit(code)`.
    pub fn exit(&self, code: i32) {
        self.stop.exit(code);
    }
}
