use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use crate::components::cli::{CliArguments, CliOptions};
use crate::kernel::component::Component;
use crate::kernel::constants;
use crate::kernel::context::AppContext;
use crate::kernel::error::{Error, Result};
use crate::kernel::registry::ServiceRegistry;

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Reload handle of the subscriber installed by this module, `None` when another
/// subscriber was already the global default.
static GLOBAL_FILTER: OnceLock<Option<FilterHandle>> = OnceLock::new();

fn install_global(base_directive: &str) -> Option<FilterHandle> {
    GLOBAL_FILTER
        .get_or_init(|| {
            let filter = EnvFilter::try_new(base_directive).unwrap_or_else(|_| EnvFilter::new("info"));
            let (filter_layer, handle) = reload::Layer::new(filter);
            let subscriber = tracing_subscriber::registry()
                .with(filter_layer)
                .with(fmt::layer().with_target(true).with_writer(std::io::stderr));

            if tracing::subscriber::set_global_default(subscriber).is_err() {
                log::debug!("A global subscriber is already installed, keeping it");
                return None;
            }
            if let Err(e) = tracing_log::LogTracer::init() {
                tracing::warn!("Failed to bridge the log facade: {}", e);
            }
            Some(handle)
        })
        .clone()
}

/// Runtime control over the log filter, published in the service registry by
/// [`LoggerComponent`].
///
/// There is one subscriber per process, so every `LogControl` drives the same
/// filter.
#[derive(Debug)]
pub struct LogControl {
    filter: Option<FilterHandle>,
    base_directive: String,
    debug_directive: String,
    debug: AtomicBool,
}

impl LogControl {
    /// Whether the global subscriber is the one installed by [`LoggerComponent`].
    pub fn is_active(&self) -> bool {
        self.filter.is_some()
    }

    /// Last mode requested through this control.
    pub fn is_debug(&self) -> bool {
        self.debug.load(Ordering::SeqCst)
    }

    /// Switch between the debug directive and the startup filter.
    ///
    /// A no-op when some other subscriber owns the process.
    pub fn set_debug_mode(&self, enabled: bool) -> Result<()> {
        let Some(handle) = &self.filter else {
            log::debug!("Log filter not owned by cradle, debug mode unchanged");
            return Ok(());
        };
        let directive = if enabled { &self.debug_directive } else { &self.base_directive };
        let filter = EnvFilter::try_new(directive)
            .map_err(|e| Error::Other(format!("Invalid log directive '{}': {}", directive, e)))?;
        handle
            .modify(|current| *current = filter)
            .map_err(|e| Error::Other(format!("Failed to update log filter: {}", e)))?;
        self.debug.store(enabled, Ordering::SeqCst);
        Ok(())
    }
}

/// Installs the global log subscriber and raises verbosity on `--debug`.
///
/// Log lines go to stderr, leaving stdout to the program.
///
/// `log` records are bridged into `tracing`, so library code keeps using the
/// `log` macros. The filter comes from `RUST_LOG` when set, otherwise from the
/// default directive. A [`LogControl`] is registered as a service so other
/// components can change the level later.
pub struct LoggerComponent {
    default_directive: String,
    debug_directive: String,
    control: Option<Arc<LogControl>>,
    initialized: bool,
}

impl LoggerComponent {
    pub fn new() -> Self {
        Self {
            default_directive: "info".to_string(),
            debug_directive: "debug".to_string(),
            control: None,
            initialized: false,
        }
    }

    pub fn with_default_directive(mut self, directive: impl Into<String>) -> Self {
        self.default_directive = directive.into();
        self
    }

    pub fn with_debug_directive(mut self, directive: impl Into<String>) -> Self {
        self.debug_directive = directive.into();
        self
    }

    /// Whether the global subscriber is the one cradle installs.
    pub fn is_installed(&self) -> bool {
        self.control.as_ref().is_some_and(|control| control.is_active())
    }

    /// The control published at registration, if registered.
    pub fn control(&self) -> Option<Arc<LogControl>> {
        self.control.clone()
    }

    pub fn set_debug_mode(&self, enabled: bool) -> Result<()> {
        match &self.control {
            Some(control) => control.set_debug_mode(enabled),
            None => Ok(()),
        }
    }

    fn base_directive(&self) -> String {
        std::env::var(EnvFilter::DEFAULT_ENV)
            .ok()
            .filter(|value| EnvFilter::try_new(value).is_ok())
            .unwrap_or_else(|| self.default_directive.clone())
    }
}

impl Default for LoggerComponent {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for LoggerComponent {
    fn name(&self) -> &str {
        "logger"
    }

    fn on_register(&mut self, services: &ServiceRegistry) -> Result<()> {
        let base_directive = self.base_directive();
        let control = Arc::new(LogControl {
            filter: install_global(&base_directive),
            base_directive,
            debug_directive: self.debug_directive.clone(),
            debug: AtomicBool::new(false),
        });
        services.register_arc(control.clone())?;
        self.control = Some(control);
        Ok(())
    }

    fn initialize(&mut self, ctx: &AppContext) -> Result<bool> {
        let services = ctx.services();
        if services.has::<CliOptions>() {
            if !services.has::<CliArguments>() {
                return Ok(false);
            }
            let args = services.get::<CliArguments>()?;
            if args.flag(constants::DEBUG_CLI_KEY) {
                self.set_debug_mode(true)?;
                log::debug!("Debug logging enabled");
            }
        }
        self.initialized = true;
        Ok(true)
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn process(&mut self, _ctx: &AppContext) -> Result<()> {
        Ok(())
    }
}
