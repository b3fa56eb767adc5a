//! Built-in driver set

use std::sync::Arc;

use tracing::warn;

use core_kernel::{BackendsConfig, DriverCache, DriverRegistry};
use domain_dispatch::{DispatchOptions, Dispatcher};
use domain_mail::MailDriverFactory;
use domain_sfdc::SfdcDriverFactory;

/// Registry with every driver shipped in this workspace
pub fn builtin_registry() -> DriverRegistry {
    let mut registry = DriverRegistry::new()
        .with_factory("mail", MailDriverFactory)
        .with_factory("sfdc", SfdcDriverFactory);
    domain_dummy::register(&mut registry);
    registry
}

/// Driver names referenced by `backends` that `registry` does not know
pub fn unknown_drivers(registry: &DriverRegistry, backends: &BackendsConfig) -> Vec<(String, String)> {
    let mut unknown = Vec::new();
    for backend in backends.names() {
        let Some(drivers) = backends.backend(backend) else {
            continue;
        };
        for driver in drivers.keys() {
            if !registry.contains(driver) {
                unknown.push((backend.to_string(), driver.clone()));
            }
        }
    }
    unknown
}

/// Builds the process-wide dispatcher over the built-in drivers
///
/// Unknown driver names are logged here and reported per request.
pub fn build_dispatcher(backends: BackendsConfig, options: DispatchOptions) -> Dispatcher {
    let registry = builtin_registry();
    for (backend, driver) in unknown_drivers(&registry, &backends) {
        warn!(%backend, %driver, "Backend references an unknown driver");
    }
    Dispatcher::new(
        Arc::new(registry),
        Arc::new(DriverCache::new()),
        Arc::new(backends),
        options,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::DriverConfig;

    #[test]
    fn test_builtin_names() {
        assert_eq!(
            builtin_registry().names(),
            vec![
                "dummy_err",
                "dummy_err_explained",
                "dummy_fail",
                "dummy_pass",
                "dummy_random",
                "mail",
                "sfdc"
            ]
        );
    }

    #[test]
    fn test_unknown_drivers_listed() {
        let backends = BackendsConfig::new()
            .with_driver("ops", "dummy_pass", DriverConfig::new())
            .with_driver("ops", "pager", DriverConfig::new());
        assert_eq!(
            unknown_drivers(&builtin_registry(), &backends),
            vec![("ops".to_string(), "pager".to_string())]
        );
    }
}
