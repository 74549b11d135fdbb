//! Component-based runtime for console programs.
//!
//! An [`Application`] owns a set of [`Component`]s and a typed
//! [`ServiceRegistry`] they share. It polls the components until all are
//! initialized, processes them in insertion order until a stop is requested,
//! and then shuts them down exactly once.
pub mod components;
pub mod config;
pub mod kernel;
pub mod utils;

pub use components::{AppLoop, CliArguments, CliComponent, CliOptions, LogControl, LoggerComponent, LogoComponent, LoopComponent, LoopHost, TitleComponent};
pub use config::{ConfigComponent, ConfigError, ConfigFormat};
pub use kernel::error::Error as KernelError;
pub use kernel::{AppContext, AppSettings, Application, Component, Result, ServiceRegistry, Shutdownable, StopHandle};
