use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use crate::kernel::context::AppContext;
use crate::kernel::error::{panic_message, Error, Result};
use crate::kernel::registry::ServiceRegistry;

/// Core lifecycle trait for all application components
pub trait Component: Send {
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// Called once when the component is added to an application, before any
    /// initialization pass. Use it to publish services other components look up.
    fn on_register(&mut self, _services: &ServiceRegistry) -> Result<()> {
        Ok(())
    }

    /// Prepare the component. `Ok(false)` means "not ready yet" and the manager
    /// will call again on the next poll; `Err` aborts the whole pass.
    fn initialize(&mut self, ctx: &AppContext) -> Result<bool>;

    fn is_initialized(&self) -> bool;

    /// One iteration of the component's work in the main loop.
    fn process(&mut self, ctx: &AppContext) -> Result<()>;

    /// Capability query for [`Shutdownable`].
    fn as_shutdownable(&mut self) -> Option<&mut dyn Shutdownable> {
        None
    }
}

/// Optional shutdown capability.
pub trait Shutdownable: Send {
    /// `signal` is the exit code the application is terminating with.
    fn shutdown(&mut self, signal: i32) -> Result<()>;
}

/// Stable handle to a component: its position in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId(pub usize);

impl ComponentId {
    pub fn index(&self) -> usize {
        self.0
    }
}

struct ComponentRecord {
    component: Box<dyn Component>,
    initialized: bool,
}

/// One failed shutdown call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShutdownFailure {
    pub index: usize,
    pub name: String,
    pub message: String,
}

impl fmt::Display for ShutdownFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Component [{}] error: {}", self.index, self.message)
    }
}

/// Outcome of one [`ComponentManager::shutdown_all`] sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Indices of components whose shutdown was invoked, in call order.
    pub invoked: Vec<usize>,
    pub failures: Vec<ShutdownFailure>,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// All failures joined with `"; "`.
    pub fn summary(&self) -> String {
        self.failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Owns the components and drives their lifecycle in insertion order.
#[derive(Default)]
pub struct ComponentManager {
    records: Vec<ComponentRecord>,
}

impl ComponentManager {
    pub fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Append a component. Insertion order is permanent.
    pub fn add(&mut self, component: Box<dyn Component>) -> ComponentId {
        let id = ComponentId(self.records.len());
        log::debug!("Adding component [{}] '{}'", id.0, component.name());
        self.records.push(ComponentRecord {
            component,
            initialized: false,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn names(&self) -> Vec<String> {
        self.records.iter().map(|r| r.component.name().to_string()).collect()
    }

    pub fn component(&self, id: ComponentId) -> Option<&dyn Component> {
        self.records.get(id.0).map(|r| r.component.as_ref())
    }

    /// True once every component has reported ready.
    pub fn is_initialized(&self) -> bool {
        self.records.iter().all(|r| r.initialized)
    }

    /// Run one initialization pass.
    ///
    /// Components that already reported ready are skipped. Returns `Ok(true)` once
    /// all of them are ready. The first error aborts the pass.
    pub fn initialize_all(&mut self, ctx: &AppContext) -> Result<bool> {
        for (index, record) in self.records.iter_mut().enumerate() {
            if record.initialized {
                continue;
            }
            match record.component.initialize(ctx) {
                Ok(ready) => {
                    record.initialized = ready;
                    if ready {
                        log::debug!("Component [{}] '{}' initialized", index, record.component.name());
                    }
                }
                Err(e) => {
                    log::error!("Initialization error in component [{}] '{}': {}", index, record.component.name(), e);
                    return Err(Error::ComponentInit {
                        index,
                        name: record.component.name().to_string(),
                        source: Box::new(e),
                    });
                }
            }
        }
        Ok(self.is_initialized())
    }

    /// Call `process` once on every component. The first error aborts the pass.
    pub fn process_all(&mut self, ctx: &AppContext) -> Result<()> {
        for (index, record) in self.records.iter_mut().enumerate() {
            if let Err(e) = record.component.process(ctx) {
                log::error!("Processing error in component [{}] '{}': {}", index, record.component.name(), e);
                return Err(Error::ComponentProcess {
                    index,
                    name: record.component.name().to_string(),
                    source: Box::new(e),
                });
            }
        }
        Ok(())
    }

    /// Soft shutdown of every shutdown-capable component, in insertion order.
    ///
    /// A failing (or panicking) component is recorded and the sweep continues.
    pub fn shutdown_all(&mut self, signal: i32) -> ShutdownReport {
        log::info!("Starting shutdown with signal: {}", signal);
        let mut report = ShutdownReport::default();

        for (index, record) in self.records.iter_mut().enumerate() {
            let name = record.component.name().to_string();
            let Some(shutdownable) = record.component.as_shutdownable() else {
                continue;
            };
            report.invoked.push(index);

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| shutdownable.shutdown(signal)));
            let message = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => e.to_string(),
                Err(payload) => panic_message(payload.as_ref()),
            };
            log::error!("Component [{}] '{}' shutdown error: {}", index, name, message);
            report.failures.push(ShutdownFailure { index, name, message });
        }

        if !report.is_clean() {
            log::error!("Shutdown completed with errors. Summary: {}", report.summary());
        }
        report
    }
}

impl fmt::Debug for ComponentManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentManager")
            .field("components", &self.names())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
