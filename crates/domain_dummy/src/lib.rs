//! Dummy Drivers
//!
//! Drivers with predictable outcomes, for checking backend wiring and the
//! response format without touching a real system.
//!
//! | Name                  | Outcome                                   |
//! |-----------------------|-------------------------------------------|
//! | `dummy_pass`          | `true`                                    |
//! | `dummy_fail`          | `false`                                   |
//! | `dummy_err`           | internal error                            |
//! | `dummy_err_explained` | error whose message reaches the caller    |
//! | `dummy_random`        | `true` with the configured `probability`  |

pub mod fixed;
pub mod random;

pub use fixed::{Fixed, FixedDriver, FixedDriverFactory, EXPLAINED_ERROR_MESSAGE, INTERNAL_ERROR_MESSAGE};
pub use random::{RandomConfig, RandomDriver, RandomDriverFactory};

use core_kernel::DriverRegistry;

/// Registers every dummy driver under its name
pub fn register(registry: &mut DriverRegistry) {
    registry.register("dummy_pass", FixedDriverFactory(Fixed::Pass));
    registry.register("dummy_fail", FixedDriverFactory(Fixed::Fail));
    registry.register("dummy_err", FixedDriverFactory(Fixed::Error));
    registry.register("dummy_err_explained", FixedDriverFactory(Fixed::ExplainedError));
    registry.register("dummy_random", RandomDriverFactory);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all_names() {
        let mut registry = DriverRegistry::new();
        register(&mut registry);
        assert_eq!(
            registry.names(),
            vec!["dummy_err", "dummy_err_explained", "dummy_fail", "dummy_pass", "dummy_random"]
        );
    }
}
