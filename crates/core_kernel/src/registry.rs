//! Driver Registry and Instance Cache
//!
//! The registry maps driver names to factories. It is populated once at
//! startup, so the set of valid driver names is known up front.
//!
//! The cache memoizes one driver instance per `DriverKey` for the life of the
//! process so that repeated dispatches reuse connections and session tokens.
//! It is an explicit object owned by the application context rather than
//! ambient state, which keeps tests isolated from one another.
//!
//! # Usage
//!
//! ```rust,ignore
//! use core_kernel::registry::{DriverCache, DriverRegistry};
//!
//! let registry = DriverRegistry::new()
//!     .with_factory("sfdc", SfdcDriverFactory)
//!     .with_factory("mail", MailDriverFactory);
//! let cache = DriverCache::new();
//!
//! let driver = cache.resolve(&registry, "sfdc", &config)?;
//! let delivered = driver.notify(&payload).await?;
//! ```
//!
//! # Resolution
//!
//! 1. Look up the factory by name (`CoreError::UnknownDriver`).
//! 2. Validate the configuration, on every call (`CoreError::InvalidDriverConfig`).
//! 3. Return the cached instance for the key, or build and insert one while
//!    holding the key's entry, so two concurrent first resolutions of the same
//!    key cannot both construct an instance. Failed builds are not cached.
//!
//! Entries are never evicted: the key space is bounded by the static backend
//! configuration, not by request volume.

use std::collections::HashMap;
use std::sync::Arc;

use dashmap::DashMap;
use tracing::{debug, error};

use crate::config::DriverConfig;
use crate::error::CoreError;
use crate::identifiers::DriverKey;
use crate::ports::{DriverFactory, NotifyDriver};

/// Startup-populated mapping of driver name to factory
#[derive(Default, Clone)]
pub struct DriverRegistry {
    factories: HashMap<String, Arc<dyn DriverFactory>>,
}

impl DriverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `factory` under `name`, replacing any previous registration
    pub fn register(&mut self, name: impl Into<String>, factory: impl DriverFactory) {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Builder-style variant of `register`
    pub fn with_factory(mut self, name: impl Into<String>, factory: impl DriverFactory) -> Self {
        self.register(name, factory);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DriverFactory>> {
        self.factories.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered driver names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.names())
            .finish()
    }
}

/// Process-lifetime cache of driver instances
#[derive(Default)]
pub struct DriverCache {
    instances: DashMap<DriverKey, Arc<dyn NotifyDriver>>,
}

impl DriverCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the driver instance for (`name`, `config`)
    ///
    /// # Errors
    ///
    /// - `UnknownDriver` if no factory is registered under `name`
    /// - `InvalidDriverConfig` if `config` does not match the driver's schema
    /// - `DriverInit` if the factory fails to build the instance
    pub fn resolve(
        &self,
        registry: &DriverRegistry,
        name: &str,
        config: &DriverConfig,
    ) -> Result<Arc<dyn NotifyDriver>, CoreError> {
        let factory = registry.get(name).ok_or_else(|| {
            error!(driver = %name, "Unexpected driver");
            CoreError::unknown_driver(name)
        })?;

        factory.validate_config(name, config).map_err(|e| {
            error!(driver = %name, error = %e, "Bad driver configuration");
            e
        })?;

        let key = DriverKey::new(name, config);
        if let Some(existing) = self.instances.get(&key) {
            return Ok(Arc::clone(existing.value()));
        }

        // The entry guard holds the shard lock, so only one caller builds per key.
        let entry = self.instances.entry(key.clone()).or_try_insert_with(|| {
            debug!(driver = %name, key = %key, "Building driver instance");
            factory.build(name, config)
        })?;
        Ok(Arc::clone(entry.value()))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn contains(&self, name: &str, config: &DriverConfig) -> bool {
        self.instances.contains_key(&DriverKey::new(name, config))
    }
}

impl std::fmt::Debug for DriverCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverCache")
            .field("instances", &self.instances.len())
            .finish()
    }
}
