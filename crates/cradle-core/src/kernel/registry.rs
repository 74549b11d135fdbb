use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::kernel::error::RegistryError;

type SharedService = Arc<dyn Any + Send + Sync>;

/// Identifies one semantic type in the registry.
///
/// Equality and hashing use only the `TypeId`; the name is kept for messages.
#[derive(Clone, Copy)]
pub struct ServiceKey {
    type_id: TypeId,
    type_name: &'static str,
}

impl ServiceKey {
    pub fn of<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ServiceKey({})", self.type_name)
    }
}

/// Registry holding at most one shared value per type.
///
/// Reads run concurrently under the read side of an `RwLock`. Registration only
/// holds the write side around the map mutation, never while a factory runs.
#[derive(Default)]
pub struct ServiceRegistry {
    services: RwLock<HashMap<ServiceKey, SharedService>>,
}

impl ServiceRegistry {
    /// Create a new empty service registry
    pub fn new() -> Self {
        Self {
            services: RwLock::new(HashMap::new()),
        }
    }

    /// Register a value under its own type.
    pub fn register<T>(&self, value: T) -> Result<(), RegistryError>
    where
        T: Any + Send + Sync,
    {
        self.register_arc(Arc::new(value))
    }

    /// Register an already shared value under `T`.
    pub fn register_arc<T>(&self, value: Arc<T>) -> Result<(), RegistryError>
    where
        T: Any + Send + Sync,
    {
        let key = ServiceKey::of::<T>();
        let mut services = self.write();
        if services.contains_key(&key) {
            log::error!("Service already registered: {}", key.type_name());
            return Err(RegistryError::DuplicateService { type_name: key.type_name() });
        }
        services.insert(key, value);
        Ok(())
    }

    /// Register a value produced by `factory`.
    ///
    /// The duplicate check runs before and after construction. Between the two the
    /// lock is released, so two racing registrations of the same type may both run
    /// their factories; whichever inserts first wins and the other gets
    /// [`RegistryError::DuplicateService`].
    pub fn register_with<T, F>(&self, factory: F) -> Result<(), RegistryError>
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T,
    {
        let key = ServiceKey::of::<T>();
        if self.read().contains_key(&key) {
            log::error!("Service already registered: {}", key.type_name());
            return Err(RegistryError::DuplicateService { type_name: key.type_name() });
        }

        let value: SharedService = Arc::new(factory());

        let mut services = self.write();
        if services.contains_key(&key) {
            log::error!("Service already registered: {}", key.type_name());
            return Err(RegistryError::DuplicateService { type_name: key.type_name() });
        }
        services.insert(key, value);
        Ok(())
    }

    /// Get the value registered for `T`.
    ///
    /// Every call returns a handle to the same allocation. Values that need to be
    /// mutated after registration should be registered wrapped in a `Mutex` or
    /// `RwLock`.
    pub fn get<T>(&self) -> Result<Arc<T>, RegistryError>
    where
        T: Any + Send + Sync,
    {
        let key = ServiceKey::of::<T>();
        let service = self.read().get(&key).cloned().ok_or_else(|| {
            log::error!("Service not registered: {}", key.type_name());
            RegistryError::ServiceNotFound { type_name: key.type_name() }
        })?;
        // The key is derived from T, so the downcast cannot fail.
        Arc::downcast::<T>(service).map_err(|_| RegistryError::ServiceNotFound { type_name: key.type_name() })
    }

    /// Check whether a value is registered for `T`.
    pub fn has<T: Any>(&self) -> bool {
        self.read().contains_key(&ServiceKey::of::<T>())
    }

    /// Keys of all registered services, in no particular order.
    pub fn keys(&self) -> Vec<ServiceKey> {
        self.read().keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Remove every registered service.
    pub fn clear_all(&self) {
        let mut services = self.write();
        log::debug!("Clearing {} registered service(s)", services.len());
        services.clear();
    }

    // A panic while holding the lock leaves the map itself consistent (every
    // mutation is a single insert/clear), so poisoning is ignored.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<ServiceKey, SharedService>> {
        self.services.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<ServiceKey, SharedService>> {
        self.services.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("services", &self.keys())
            .finish()
    }
}
