//! Spy drivers
//!
//! A `SpyFactory` builds `SpyDriver`s that follow a fixed `Script` and count
//! how often they were built and invoked, so tests can assert both the
//! classified outcome and whether a driver ran at all.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use core_kernel::{CoreError, DriverConfig, DriverError, DriverFactory, NotifyDriver, Payload};

/// Behaviour of a spy driver
#[derive(Debug, Clone)]
pub enum Script {
    Pass,
    Fail,
    Explained(String),
    Internal(String),
    Panic,
    /// Sleeps, then returns the given status
    Sleep(Duration, bool),
}

/// Driver that follows its script and records invocations
#[derive(Debug)]
pub struct SpyDriver {
    script: Script,
    calls: Arc<AtomicUsize>,
    self_timed: bool,
}

impl SpyDriver {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: Arc::new(AtomicUsize::new(0)),
            self_timed: false,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotifyDriver for SpyDriver {
    async fn notify(&self, _payload: &Payload) -> Result<bool, DriverError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Pass => Ok(true),
            Script::Fail => Ok(false),
            Script::Explained(message) => Err(DriverError::explained(message.clone())),
            Script::Internal(message) => Err(DriverError::internal(message.clone())),
            Script::Panic => panic!("spy driver panicked"),
            Script::Sleep(duration, status) => {
                tokio::time::sleep(*duration).await;
                Ok(*status)
            }
        }
    }

    fn self_timed(&self) -> bool {
        self.self_timed
    }
}

/// Factory for spy drivers sharing one set of counters
///
/// Configurations containing the key `"invalid"` fail validation.
#[derive(Debug, Clone)]
pub struct SpyFactory {
    script: Script,
    calls: Arc<AtomicUsize>,
    builds: Arc<AtomicUsize>,
    self_timed: bool,
}

impl SpyFactory {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: Arc::new(AtomicUsize::new(0)),
            builds: Arc::new(AtomicUsize::new(0)),
            self_timed: false,
        }
    }

    /// Builds drivers that declare they enforce their own deadline
    pub fn self_timed(script: Script) -> Self {
        Self {
            self_timed: true,
            ..Self::new(script)
        }
    }

    /// Total `notify` calls across every driver this factory built
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of driver instances built
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl DriverFactory for SpyFactory {
    fn validate_config(&self, driver: &str, config: &DriverConfig) -> Result<(), CoreError> {
        if config.contains_key("invalid") {
            return Err(CoreError::invalid_config(driver, "'invalid' is not allowed"));
        }
        Ok(())
    }

    fn build(&self, _driver: &str, _config: &DriverConfig) -> Result<Arc<dyn NotifyDriver>, CoreError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(SpyDriver {
            script: self.script.clone(),
            calls: Arc::clone(&self.calls),
            self_timed: self.self_timed,
        }))
    }
}
