//! Bridges OS termination signals into a [`StopHandle`].
//!
//! The listener lives on its own thread with a current-thread tokio runtime.
//! When a signal arrives it records the signal number as the exit code and
//! requests a stop. It never touches components; cleanup stays on the run-loop
//! thread. Any further signal received before the listener is shut down
//! escalates, by default to `std::process::exit` with the signal number.
//!
//! tokio never restores the default disposition of a signal it has handled.
//! Once a listener has been shut down, further signals are received by nobody
//! and the process keeps running.
//!
//! ## Unix
//! SIGINT, SIGTERM and SIGQUIT are handled.
//!
//! ## Windows
//! Only Ctrl-C is handled and reported as SIGINT (2).
use std::io;
use std::thread::{self, JoinHandle};

use tokio::sync::oneshot;

use crate::kernel::context::StopHandle;

pub const SIGINT: i32 = 2;
pub const SIGQUIT: i32 = 3;
pub const SIGTERM: i32 = 15;

/// Human readable name for the signal numbers this module reports.
pub fn signal_name(signal: i32) -> &'static str {
    match signal {
        SIGINT => "SIGINT",
        SIGQUIT => "SIGQUIT",
        SIGTERM => "SIGTERM",
        _ => "UNKNOWN_SIGNAL",
    }
}

#[cfg(unix)]
struct TerminationSignals {
    sigint: tokio::signal::unix::Signal,
    sigterm: tokio::signal::unix::Signal,
    sigquit: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl TerminationSignals {
    /// Must be called inside a runtime context.
    fn install() -> io::Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
            sigquit: signal(SignalKind::quit())?,
        })
    }

    async fn recv(&mut self) -> Option<i32> {
        tokio::select! {
            r = self.sigint.recv()  => r.map(|_| SIGINT),
            r = self.sigterm.recv() => r.map(|_| SIGTERM),
            r = self.sigquit.recv() => r.map(|_| SIGQUIT),
        }
    }
}

#[cfg(windows)]
struct TerminationSignals {
    ctrl_c: tokio::signal::windows::CtrlC,
}

#[cfg(windows)]
impl TerminationSignals {
    fn install() -> io::Result<Self> {
        Ok(Self {
            ctrl_c: tokio::signal::windows::ctrl_c()?,
        })
    }

    async fn recv(&mut self) -> Option<i32> {
        self.ctrl_c.recv().await.map(|_| SIGINT)
    }
}

fn terminate(signum: i32) {
    log::warn!("{} received again, terminating immediately", signal_name(signum));
    std::process::exit(signum);
}

/// Running signal listener. Dropping it cancels the listener.
#[derive(Debug)]
pub struct SignalListener {
    cancel: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl SignalListener {
    /// Install the handlers and start listening on a background thread.
    ///
    /// Handlers are installed before this returns, so a signal delivered right
    /// afterwards is not lost. A repeated signal exits the process with the
    /// signal number.
    pub fn spawn(stop: StopHandle) -> io::Result<Self> {
        Self::spawn_with(stop, terminate)
    }

    /// Like [`spawn`](Self::spawn), with `escalate` called for every signal
    /// after the first.
    pub fn spawn_with<F>(stop: StopHandle, escalate: F) -> io::Result<Self>
    where
        F: Fn(i32) + Send + 'static,
    {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let mut signals = {
            let _guard = runtime.enter();
            TerminationSignals::install()?
        };
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();

        let thread = thread::Builder::new()
            .name("cradle-signals".to_string())
            .spawn(move || {
                runtime.block_on(async move {
                    let first = tokio::select! {
                        received = signals.recv() => received,
                        _ = &mut cancel_rx => {
                            log::trace!("Signal listener cancelled");
                            return;
                        }
                    };
                    let Some(signum) = first else {
                        log::warn!("Signal stream closed");
                        return;
                    };
                    log::info!("Signal received: {}, signal: {}", signal_name(signum), signum);
                    stop.exit(signum);

                    loop {
                        tokio::select! {
                            received = signals.recv() => match received {
                                Some(again) => escalate(again),
                                None => return,
                            },
                            _ = &mut cancel_rx => return,
                        }
                    }
                });
            })?;

        log::debug!("Signal handlers installed");
        Ok(Self {
            cancel: Some(cancel_tx),
            thread: Some(thread),
        })
    }

    /// Stop listening and join the listener thread.
    pub fn shutdown(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::warn!("Signal listener thread panicked");
            }
        }
    }
}

impl Drop for SignalListener {
    fn drop(&mut self) {
        self.shutdown();
    }
}
