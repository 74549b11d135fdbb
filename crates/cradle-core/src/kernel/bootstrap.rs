use std::io::{self, BufRead, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use crate::kernel::component::{Component, ComponentId, ComponentManager, ShutdownReport};
use crate::kernel::constants;
use crate::kernel::context::{AppContext, RunState, StopHandle};
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::kernel::registry::ServiceRegistry;
use crate::kernel::signals::SignalListener;

/// Tuning knobs for the run loop.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Sleep between initialization passes that did not finish.
    pub init_poll_interval: Duration,
    /// Give up initialization after this many passes. `None` polls forever.
    pub max_init_attempts: Option<u32>,
    /// Install SIGINT/SIGTERM/SIGQUIT handlers when `run` starts.
    pub install_signal_handlers: bool,
    /// After a fatal error, wait for the operator to press Enter before cleanup.
    pub wait_on_error: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            init_poll_interval: constants::DEFAULT_INIT_POLL_INTERVAL,
            max_init_attempts: None,
            install_signal_handlers: true,
            wait_on_error: false,
        }
    }
}

impl AppSettings {
    pub fn with_init_poll_interval(mut self, interval: Duration) -> Self {
        self.init_poll_interval = interval;
        self
    }

    pub fn with_max_init_attempts(mut self, attempts: u32) -> Self {
        self.max_init_attempts = Some(attempts);
        self
    }

    pub fn with_signal_handlers(mut self, install: bool) -> Self {
        self.install_signal_handlers = install;
        self
    }

    pub fn with_wait_on_error(mut self, wait: bool) -> Self {
        self.wait_on_error = wait;
        self
    }
}

/// Main application struct: owns the registry and the components and drives
/// them through initialize, process and a single cleanup.
pub struct Application {
    settings: AppSettings,
    services: Arc<ServiceRegistry>,
    manager: ComponentManager,
    stop: StopHandle,
    signals: Option<SignalListener>,
    last_shutdown: Option<ShutdownReport>,
    started: bool,
    initialized: bool,
}

impl Application {
    /// Creates a new application with default settings.
    pub fn new() -> Self {
        Self::with_settings(AppSettings::default())
    }

    pub fn with_settings(settings: AppSettings) -> Self {
        log::debug!("Creating {} v{} application", constants::APP_NAME, constants::APP_VERSION);
        Self {
            settings,
            services: Arc::new(ServiceRegistry::new()),
            manager: ComponentManager::new(),
            stop: StopHandle::new(),
            signals: None,
            last_shutdown: None,
            started: false,
            initialized: false,
        }
    }

    /// Add a component. Its `on_register` hook runs immediately.
    pub fn add<C: Component + 'static>(&mut self, component: C) -> Result<ComponentId> {
        self.add_boxed(Box::new(component))
    }

    pub fn add_boxed(&mut self, mut component: Box<dyn Component>) -> Result<ComponentId> {
        component.on_register(&self.services).map_err(|e| Error::Fatal {
            phase: KernelLifecyclePhase::Register,
            message: format!("component '{}' failed to register: {}", component.name(), e),
            source: Some(Box::new(e)),
        })?;
        Ok(self.manager.add(component))
    }

    pub fn services(&self) -> &Arc<ServiceRegistry> {
        &self.services
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn context(&self) -> AppContext {
        AppContext::new(self.services.clone(), self.stop.clone())
    }

    pub fn components(&self) -> &ComponentManager {
        &self.manager
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn state(&self) -> RunState {
        self.stop.state()
    }

    /// Report from the cleanup sweep, once cleanup has run.
    pub fn shutdown_report(&self) -> Option<&ShutdownReport> {
        self.last_shutdown.as_ref()
    }

    /// Request the main loop to stop. Idempotent.
    pub fn stop(&self) {
        self.stop.stop();
    }

    /// Poll every component until all of them are ready.
    pub fn initialize(&mut self) -> Result<bool> {
        self.initialize_with(|_| Ok(()))
    }

    /// Poll every component until all of them are ready, then call `action`
    /// once.
    ///
    /// Returns `Ok(false)` without calling `action` when a stop is requested
    /// first. Errors are returned as-is rather than taking the fatal path that
    /// `run` applies. A later `run` skips straight to the process loop.
    pub fn initialize_with<F>(&mut self, action: F) -> Result<bool>
    where
        F: FnOnce(&AppContext) -> Result<()>,
    {
        if self.stop.cleanup_started() {
            log::warn!("Application already cleaned up, initialize() ignored");
            return Ok(false);
        }
        self.begin();
        let ctx = self.context();
        self.initialize_in(&ctx, action)
    }

    /// Run until stopped. Returns the exit code after cleanup.
    ///
    /// With signal handlers enabled, the first SIGINT, SIGTERM or SIGQUIT stops
    /// the loop and becomes the exit code; a second one while cleanup has not
    /// finished exits the process at once. The handlers stay registered with
    /// the OS after `run` returns, so later signals are swallowed. Hosts that
    /// keep running afterwards should exit on their own, as
    /// [`run_and_exit`](Self::run_and_exit) does.
    pub fn run(&mut self) -> i32 {
        self.run_with(|_| Ok(()))
    }

    /// Run until stopped, calling `iteration_action` after every processing pass.
    pub fn run_with<F>(&mut self, mut iteration_action: F) -> i32
    where
        F: FnMut(&AppContext) -> Result<()>,
    {
        if self.stop.cleanup_started() {
            log::warn!("Application already cleaned up, run() ignored");
            return self.stop.exit_code();
        }
        self.begin();

        let ctx = self.context();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.drive(&ctx, &mut iteration_action)));

        let code = match outcome {
            Ok(Ok(())) => self.stop.exit_code(),
            Ok(Err(e)) => {
                let phase = e.phase().unwrap_or(KernelLifecyclePhase::Process);
                self.handle_fatal(Error::fatal(phase, e))
            }
            Err(payload) => self.handle_fatal(Error::from_panic(KernelLifecyclePhase::Process, payload.as_ref())),
        };
        self.cleanup(code)
    }

    /// Run and terminate the process with the resulting exit code.
    pub fn run_and_exit(mut self) -> ! {
        let code = self.run();
        drop(self);
        std::process::exit(code)
    }

    /// Shut every component down, clear the registry and mark the application
    /// cleaned up. Runs at most once; later calls return the code immediately.
    pub fn cleanup(&mut self, exit_code: i32) -> i32 {
        if !self.stop.begin_cleanup() {
            return exit_code;
        }
        log::info!("Cleaning up application for signal: {}", exit_code);
        self.stop.stop();

        let report = self.manager.shutdown_all(exit_code);
        self.services.clear_all();
        self.last_shutdown = Some(report);

        if let Some(mut listener) = self.signals.take() {
            listener.shutdown();
        }
        self.stop.mark_cleaned_up();
        exit_code
    }

    fn drive<F>(&mut self, ctx: &AppContext, iteration_action: &mut F) -> Result<()>
    where
        F: FnMut(&AppContext) -> Result<()>,
    {
        if !self.initialize_in(ctx, |_| Ok(()))? {
            return Ok(());
        }

        while !self.stop.is_stopping() {
            self.manager.process_all(ctx)?;
            iteration_action(ctx)?;
        }
        Ok(())
    }

    fn begin(&mut self) {
        self.started = true;
        if !self.stop.start() {
            log::debug!("Application state is {:?} at start", self.stop.state());
        }
        self.install_signal_handlers();
    }

    fn initialize_in<F>(&mut self, ctx: &AppContext, action: F) -> Result<bool>
    where
        F: FnOnce(&AppContext) -> Result<()>,
    {
        if !self.wait_until_initialized(ctx)? {
            return Ok(false);
        }
        if !self.initialized {
            self.initialized = true;
            log::info!("All {} component(s) initialized", self.manager.len());
        }
        action(ctx)?;
        Ok(true)
    }

    /// Poll `initialize_all` until it succeeds. Returns `Ok(false)` if a stop was
    /// requested first.
    fn wait_until_initialized(&mut self, ctx: &AppContext) -> Result<bool> {
        let mut attempts: u32 = 0;
        loop {
            if self.stop.is_stopping() {
                return Ok(false);
            }
            if self.manager.initialize_all(ctx)? {
                return Ok(true);
            }
            attempts = attempts.saturating_add(1);
            if let Some(max) = self.settings.max_init_attempts {
                if attempts >= max {
                    return Err(Error::InitTimeout { attempts });
                }
            }
            std::thread::sleep(self.settings.init_poll_interval);
        }
    }

    fn install_signal_handlers(&mut self) {
        if !self.settings.install_signal_handlers || self.signals.is_some() {
            return;
        }
        match SignalListener::spawn(self.stop.clone()) {
            Ok(listener) => self.signals = Some(listener),
            Err(e) => log::warn!("Failed to install signal handlers: {}", e),
        }
    }

    fn handle_fatal(&self, error: Error) -> i32 {
        log::error!("Unhandled exception: {}", error);
        eprintln!("{}", error);
        if self.settings.wait_on_error {
            wait_for_acknowledgment();
        }
        constants::EXIT_FATAL
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Application {
    /// Exit hook: an application that started running is always cleaned up, even
    /// when `run` was left by unwinding.
    fn drop(&mut self) {
        if self.started && !self.stop.cleanup_started() {
            let code = self.stop.exit_code();
            self.cleanup(code);
        }
    }
}

fn wait_for_acknowledgment() {
    eprint!("Press Enter to exit...");
    let _ = io::stderr().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
