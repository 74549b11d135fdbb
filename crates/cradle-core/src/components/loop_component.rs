use std::thread;

use crate::kernel::component::{Component, Shutdownable};
use crate::kernel::constants;
use crate::kernel::context::AppContext;
use crate::kernel::error::Result;

type InitFn = Box<dyn FnMut(&AppContext) -> Result<bool> + Send>;
type ExecuteFn = Box<dyn FnMut(&AppContext) -> Result<()> + Send>;
type ShutdownFn = Box<dyn FnMut(i32) -> Result<()> + Send>;

/// Component driven by optional closures.
///
/// Without an execute closure every pass sleeps for the idle interval so an
/// otherwise empty application does not spin.
pub struct LoopComponent {
    name: String,
    on_initialize: Option<InitFn>,
    on_execute: Option<ExecuteFn>,
    on_shutdown: Option<ShutdownFn>,
    initialized: bool,
}

impl LoopComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            on_initialize: None,
            on_execute: None,
            on_shutdown: None,
            initialized: false,
        }
    }

    pub fn on_initialize<F>(mut self, f: F) -> Self
    where
        F: FnMut(&AppContext) -> Result<bool> + Send + 'static,
    {
        self.on_initialize = Some(Box::new(f));
        self
    }

    pub fn on_execute<F>(mut self, f: F) -> Self
    where
        F: FnMut(&AppContext) -> Result<()> + Send + 'static,
    {
        self.on_execute = Some(Box::new(f));
        self
    }

    pub fn on_shutdown<F>(mut self, f: F) -> Self
    where
        F: FnMut(i32) -> Result<()> + Send + 'static,
    {
        self.on_shutdown = Some(Box::new(f));
        self
    }
}

impl Default for LoopComponent {
    fn default() -> Self {
        Self::new("loop")
    }
}

impl Component for LoopComponent {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, ctx: &AppContext) -> Result<bool> {
        let ready = match self.on_initialize.as_mut() {
            Some(f) => f(ctx)?,
            None => true,
        };
        self.initialized = ready;
        Ok(ready)
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn process(&mut self, ctx: &AppContext) -> Result<()> {
        match self.on_execute.as_mut() {
            Some(f) => f(ctx),
            None => {
                thread::sleep(constants::DEFAULT_IDLE_SLEEP);
                Ok(())
            }
        }
    }

    fn as_shutdownable(&mut self) -> Option<&mut dyn Shutdownable> {
        Some(self)
    }
}

impl Shutdownable for LoopComponent {
    fn shutdown(&mut self, signal: i32) -> Result<()> {
        match self.on_shutdown.as_mut() {
            Some(f) => f(signal),
            None => Ok(()),
        }
    }
}

/// User-side main loop.
///
/// `on_once` is polled until it returns `true`; after that `on_loop` runs once
/// per main-loop iteration.
pub trait AppLoop: Send {
    fn on_once(&mut self, _ctx: &AppContext) -> Result<bool> {
        Ok(true)
    }

    fn on_loop(&mut self, ctx: &AppContext) -> Result<()>;

    fn on_shutdown(&mut self, _signal: i32) -> Result<()> {
        Ok(())
    }
}

/// Adapts an [`AppLoop`] into a shutdown-capable component.
pub struct LoopHost<L> {
    name: String,
    inner: L,
    initialized: bool,
}

impl<L: AppLoop> LoopHost<L> {
    pub fn new(inner: L) -> Self {
        Self::named("app-loop", inner)
    }

    pub fn named(name: impl Into<String>, inner: L) -> Self {
        Self {
            name: name.into(),
            inner,
            initialized: false,
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut L {
        &mut self.inner
    }

    pub fn into_inner(self) -> L {
        self.inner
    }
}

impl<L: AppLoop> Component for LoopHost<L> {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, ctx: &AppContext) -> Result<bool> {
        self.initialized = self.inner.on_once(ctx)?;
        Ok(self.initialized)
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn process(&mut self, ctx: &AppContext) -> Result<()> {
        self.inner.on_loop(ctx)
    }

    fn as_shutdownable(&mut self) -> Option<&mut dyn Shutdownable> {
        Some(self)
    }
}

impl<L: AppLoop> Shutdownable for LoopHost<L> {
    fn shutdown(&mut self, signal: i32) -> Result<()> {
        self.inner.on_shutdown(signal)
    }
}
