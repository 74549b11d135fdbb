//! # Cradle Core Kernel
//!
//! The `kernel` module forms the heart of `cradle-core`. It assembles a console
//! program out of independently written components and drives them through a
//! shared lifecycle: initialize once, process repeatedly, shut down exactly once.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Typed Registry**: [`ServiceRegistry`](registry::ServiceRegistry) stores at
//!   most one shared value per type so components can find each other's output
//!   without compile-time wiring.
//! - **Component Lifecycle**: the [`Component`](component::Component) and
//!   [`Shutdownable`](component::Shutdownable) traits and the
//!   [`ComponentManager`](component::ComponentManager) that sequences them.
//! - **Application Controller**: [`Application`](bootstrap::Application) owns the
//!   run state, the main loop and the single-shot cleanup path.
//! - **Signal Bridge**: the `signals` submodule turns SIGINT/SIGTERM/SIGQUIT into
//!   a stop request observed by the main loop.
//! - **Error Handling**: kernel error types ([`Error`](error::Error)) and a
//!   `Result` alias in the `error` submodule.
pub mod bootstrap;
pub mod component;
pub mod constants;
pub mod context;
pub mod error;
pub mod registry;
pub mod signals;

pub use bootstrap::{AppSettings, Application};
pub use component::{Component, ComponentId, ComponentManager, ShutdownFailure, ShutdownReport, Shutdownable};
pub use context::{AppContext, RunState, StopHandle};
pub use error::{Error, KernelLifecyclePhase, RegistryError, Result};
pub use registry::{ServiceKey, ServiceRegistry};
// Test module declaration
#[cfg(test)]
mod tests;
