//! Dispatch Engine
//!
//! For a set of requested backends the engine:
//!
//! 1. Rejects the whole call if no backend is requested or any requested
//!    backend is not configured.
//! 2. Resolves every (backend, driver) pair through the instance cache, so a
//!    configuration problem surfaces before any driver has been invoked.
//! 3. Runs every invocation as its own task. A semaphore local to the call
//!    bounds how many of its invocations are in flight, so a slow backend
//!    never holds up another request. Waiting for a permit and running the
//!    driver share one deadline; self-timed drivers are never cancelled
//!    once started.
//! 4. Merges the per-task outcomes into a report local to the call.
//!
//! Invocations are independent: a driver that fails, times out or panics is
//! recorded as an error and the remaining drivers still run. A self-timed
//! driver that never got a worker before the deadline is recorded as
//! declined.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::time::{timeout_at, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use core_kernel::{BackendsConfig, DriverCache, DriverRegistry, NotifyDriver, NotifyOutcome, Payload};

use crate::error::DispatchError;
use crate::report::DispatchReport;

/// Tuning for the dispatch worker pool
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Maximum driver invocations in flight at once within one dispatch
    pub max_concurrency: usize,
    /// Upper bound for a single driver invocation
    pub driver_timeout: Duration,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            driver_timeout: Duration::from_secs(60),
        }
    }
}

/// Fans an alert out to the drivers of the requested backends
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<DriverRegistry>,
    cache: Arc<DriverCache>,
    backends: Arc<BackendsConfig>,
    max_concurrency: usize,
    driver_timeout: Duration,
}

struct Invocation {
    backend: String,
    driver: String,
    handle: JoinHandle<NotifyOutcome>,
}

impl Dispatcher {
    /// Creates a dispatcher over a static backend configuration
    ///
    /// # Arguments
    ///
    /// * `registry` - Driver factories available to this process
    /// * `cache` - Instance cache shared for the life of the process
    /// * `backends` - Backend to driver configuration mapping
    /// * `options` - Worker pool size and per-driver timeout
    pub fn new(
        registry: Arc<DriverRegistry>,
        cache: Arc<DriverCache>,
        backends: Arc<BackendsConfig>,
        options: DispatchOptions,
    ) -> Self {
        Self {
            registry,
            cache,
            backends,
            max_concurrency: options.max_concurrency.max(1),
            driver_timeout: options.driver_timeout,
        }
    }

    pub fn backends(&self) -> &BackendsConfig {
        &self.backends
    }

    pub fn cache(&self) -> &DriverCache {
        &self.cache
    }

    /// Sends `payload` through every driver of every backend in `requested`
    ///
    /// # Errors
    ///
    /// - `DispatchError::NoBackends` if `requested` is empty
    /// - `DispatchError::UnknownBackends` if any requested name is not configured
    /// - `DispatchError::Driver` if a configured driver cannot be resolved
    ///
    /// In both cases no driver has been invoked. Driver failures after that
    /// point are reported per driver and never returned as an error.
    pub async fn dispatch(
        &self,
        requested: &BTreeSet<String>,
        payload: Arc<Payload>,
    ) -> Result<DispatchReport, DispatchError> {
        let dispatch_id = Uuid::new_v4();

        if requested.is_empty() {
            warn!(%dispatch_id, "No backends requested");
            return Err(DispatchError::NoBackends);
        }

        let unknown = self.backends.unknown(requested);
        if !unknown.is_empty() {
            warn!(%dispatch_id, backends = ?unknown, "Unexpected backends requested");
            return Err(DispatchError::unknown_backends(unknown));
        }

        let mut targets: Vec<(String, String, Arc<dyn NotifyDriver>)> = Vec::new();
        for backend in requested {
            let Some(drivers) = self.backends.backend(backend) else {
                continue;
            };
            for (name, config) in drivers {
                let instance = self.cache.resolve(&self.registry, name, config)?;
                targets.push((backend.clone(), name.clone(), instance));
            }
        }

        debug!(%dispatch_id, invocations = targets.len(), "Dispatching alert");

        let permits = Arc::new(Semaphore::new(self.max_concurrency));
        let deadline = Instant::now() + self.driver_timeout;

        let invocations: Vec<Invocation> = targets
            .into_iter()
            .map(|(backend, driver, instance)| Invocation {
                handle: tokio::spawn(invoke(
                    instance,
                    Arc::clone(&payload),
                    Arc::clone(&permits),
                    deadline,
                )),
                backend,
                driver,
            })
            .collect();

        let mut report = DispatchReport::new();
        for Invocation { backend, driver, handle } in invocations {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => NotifyOutcome::InternalError(format!("driver task failed: {}", e)),
            };
            match &outcome {
                NotifyOutcome::InternalError(detail) => {
                    error!(%dispatch_id, %backend, %driver, error = %detail, "Driver error");
                }
                NotifyOutcome::UserError(message) => {
                    warn!(%dispatch_id, %backend, %driver, %message, "Driver rejected alert");
                }
                NotifyOutcome::Delivered(status) => {
                    debug!(%dispatch_id, %backend, %driver, status, "Driver finished");
                }
            }
            report.record(&backend, &driver, &outcome);
        }

        info!(
            %dispatch_id,
            total = report.total,
            passed = report.passed,
            failed = report.failed,
            errors = report.errors,
            "Dispatch complete"
        );
        Ok(report)
    }
}

async fn invoke(
    instance: Arc<dyn NotifyDriver>,
    payload: Arc<Payload>,
    permits: Arc<Semaphore>,
    deadline: Instant,
) -> NotifyOutcome {
    let _permit = match timeout_at(deadline, permits.acquire_owned()).await {
        Ok(Ok(permit)) => permit,
        Ok(Err(_)) => return NotifyOutcome::InternalError("dispatch pool is closed".to_string()),
        Err(_) if instance.self_timed() => return NotifyOutcome::Delivered(false),
        Err(_) => return NotifyOutcome::InternalError("timed out waiting for a worker".to_string()),
    };

    if instance.self_timed() {
        return NotifyOutcome::from(instance.notify(&payload).await);
    }

    match timeout_at(deadline, instance.notify(&payload)).await {
        Ok(result) => NotifyOutcome::from(result),
        Err(_) => NotifyOutcome::InternalError("driver timed out".to_string()),
    }
}
