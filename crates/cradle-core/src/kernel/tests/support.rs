//! Shared test components for the kernel tests.
use std::sync::{Arc, Mutex};

use crate::kernel::component::{Component, Shutdownable};
use crate::kernel::context::AppContext;
use crate::kernel::error::{Error, Result};

/// Thread-safe call journal shared between a test and its components.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.entries().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownMode {
    Unsupported,
    Succeed,
    Fail(&'static str),
    Panic,
}

/// Component that records every lifecycle call.
pub struct Recorder {
    name: String,
    journal: Journal,
    ready_after: u32,
    init_calls: u32,
    fail_init: bool,
    fail_process: bool,
    panic_process: bool,
    shutdown: ShutdownMode,
}

impl Recorder {
    pub fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: journal.clone(),
            ready_after: 0,
            init_calls: 0,
            fail_init: false,
            fail_process: false,
            panic_process: false,
            shutdown: ShutdownMode::Succeed,
        }
    }

    /// Report "not ready" for the first `polls` initialize calls.
    pub fn ready_after(mut self, polls: u32) -> Self {
        self.ready_after = polls;
        self
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn failing_process(mut self) -> Self {
        self.fail_process = true;
        self
    }

    pub fn panicking_process(mut self) -> Self {
        self.panic_process = true;
        self
    }

    pub fn shutdown_mode(mut self, mode: ShutdownMode) -> Self {
        self.shutdown = mode;
        self
    }
}

impl Component for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, _ctx: &AppContext) -> Result<bool> {
        self.journal.push(format!("init:{}", self.name));
        if self.fail_init {
            return Err(Error::from("init failed"));
        }
        self.init_calls += 1;
        Ok(self.is_initialized())
    }

    fn is_initialized(&self) -> bool {
        self.init_calls > self.ready_after
    }

    fn process(&mut self, _ctx: &AppContext) -> Result<()> {
        self.journal.push(format!("process:{}", self.name));
        if self.panic_process {
            panic!("process exploded");
        }
        if self.fail_process {
            return Err(Error::from("process failed"));
        }
        Ok(())
    }

    fn as_shutdownable(&mut self) -> Option<&mut dyn Shutdownable> {
        match self.shutdown {
            ShutdownMode::Unsupported => None,
            _ => Some(self),
        }
    }
}

impl Shutdownable for Recorder {
    fn shutdown(&mut self, signal: i32) -> Result<()> {
        self.journal.push(format!("shutdown:{}:{}", self.name, signal));
        match self.shutdown {
            ShutdownMode::Fail(message) => Err(Error::from(message)),
            ShutdownMode::Panic => panic!("boom"),
            _ => Ok(()),
        }
    }
}
