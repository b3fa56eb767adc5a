//! Drivers with a fixed outcome

use std::sync::Arc;

use async_trait::async_trait;

use core_kernel::{CoreError, DriverConfig, DriverError, DriverFactory, NotifyDriver, Payload};

/// Message of the `dummy_err` driver
pub const INTERNAL_ERROR_MESSAGE: &str = "This error message is for logging only!";

/// Message of the `dummy_err_explained` driver
pub const EXPLAINED_ERROR_MESSAGE: &str = "This error message must appear in API response!";

/// Outcome a `FixedDriver` always produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fixed {
    Pass,
    Fail,
    Error,
    ExplainedError,
}

#[derive(Debug, Clone, Copy)]
pub struct FixedDriver {
    outcome: Fixed,
}

impl FixedDriver {
    pub fn new(outcome: Fixed) -> Self {
        Self { outcome }
    }
}

#[async_trait]
impl NotifyDriver for FixedDriver {
    async fn notify(&self, _payload: &Payload) -> Result<bool, DriverError> {
        match self.outcome {
            Fixed::Pass => Ok(true),
            Fixed::Fail => Ok(false),
            Fixed::Error => Err(DriverError::internal(INTERNAL_ERROR_MESSAGE)),
            Fixed::ExplainedError => Err(DriverError::explained(EXPLAINED_ERROR_MESSAGE)),
        }
    }
}

/// Factory for a fixed-outcome driver; accepts any configuration object
#[derive(Debug, Clone, Copy)]
pub struct FixedDriverFactory(pub Fixed);

impl DriverFactory for FixedDriverFactory {
    fn validate_config(&self, _driver: &str, _config: &DriverConfig) -> Result<(), CoreError> {
        Ok(())
    }

    fn build(&self, _driver: &str, _config: &DriverConfig) -> Result<Arc<dyn NotifyDriver>, CoreError> {
        Ok(Arc::new(FixedDriver::new(self.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::NotifyOutcome;
    use test_utils::PayloadFixtures;

    async fn outcome(fixed: Fixed) -> NotifyOutcome {
        FixedDriver::new(fixed).notify(&PayloadFixtures::info_alert()).await.into()
    }

    #[tokio::test]
    async fn test_pass_and_fail() {
        assert_eq!(outcome(Fixed::Pass).await, NotifyOutcome::Delivered(true));
        assert_eq!(outcome(Fixed::Fail).await, NotifyOutcome::Delivered(false));
    }

    #[tokio::test]
    async fn test_errors() {
        assert_eq!(
            outcome(Fixed::Error).await,
            NotifyOutcome::InternalError(INTERNAL_ERROR_MESSAGE.to_string())
        );
        assert_eq!(
            outcome(Fixed::ExplainedError).await,
            NotifyOutcome::UserError(EXPLAINED_ERROR_MESSAGE.to_string())
        );
    }
}
