//! # Cradle Kernel Errors
//!
//! Defines error types specific to the Cradle kernel.
//!
//! [`Error`] is the primary enum. Subsystem errors ([`RegistryError`],
//! [`ConfigError`]) convert into it with `?`, and lifecycle failures carry the
//! [`KernelLifecyclePhase`] plus the index and name of the component that
//! failed.
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::config::error::ConfigError;

/// Errors raised by the typed service registry.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum RegistryError {
    /// A value for this type is already registered. Registration never overwrites.
    #[error("Service already registered: {type_name}")]
    DuplicateService { type_name: &'static str },

    /// No value for this type has been registered.
    #[error("Service not registered: {type_name}")]
    ServiceNotFound { type_name: &'static str },
}

/// Custom error type for the Cradle runtime
#[derive(Debug, ThisError)]
pub enum Error {
    /// Typed registry error (duplicate or missing service)
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Configuration loading or binding error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Command-line parsing error raised by the CLI component
    #[error("Command-line error: {0}")]
    Cli(#[from] clap::Error),

    /// A component raised an error from `initialize`. Fatal, aborts the whole pass.
    #[error("Component [{index}] '{name}' failed to initialize: {source}")]
    ComponentInit {
        index: usize,
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// A component raised an error from `process`. Fatal, aborts the current pass.
    #[error("Component [{index}] '{name}' failed while processing: {source}")]
    ComponentProcess {
        index: usize,
        name: String,
        #[source]
        source: Box<Error>,
    },

    /// Initialization never completed within the configured number of polls.
    #[error("Initialization did not complete after {attempts} attempts")]
    InitTimeout { attempts: u32 },

    /// Any failure that escaped the run loop. Always routed through cleanup.
    #[error("Fatal error during {phase}: {message}")]
    Fatal {
        phase: KernelLifecyclePhase,
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Represents a specific phase in the kernel's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum KernelLifecyclePhase {
    #[error("Register")]
    Register,
    #[error("Initialize")]
    Initialize,
    #[error("Process")]
    Process,
    #[error("Shutdown")]
    Shutdown,
    #[error("Cleanup")]
    Cleanup,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    /// Wrap an error that escaped the run loop into [`Error::Fatal`].
    pub fn fatal(phase: KernelLifecyclePhase, source: Error) -> Self {
        Error::Fatal {
            phase,
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Build an [`Error::Fatal`] from a caught panic payload.
    pub fn from_panic(phase: KernelLifecyclePhase, payload: &(dyn std::any::Any + Send)) -> Self {
        Error::Fatal {
            phase,
            message: format!("panic: {}", panic_message(payload)),
            source: None,
        }
    }

    /// The lifecycle phase this error is attributed to, if any.
    pub fn phase(&self) -> Option<KernelLifecyclePhase> {
        match self {
            Error::ComponentInit { .. } | Error::InitTimeout { .. } => Some(KernelLifecyclePhase::Initialize),
            Error::ComponentProcess { .. } => Some(KernelLifecyclePhase::Process),
            Error::Fatal { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

/// Extract a readable message from a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown error".to_string()
    }
}
