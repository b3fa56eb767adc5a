//! Core error types used across the system

use thiserror::Error;

/// Core error type for the kernel
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unexpected driver: '{0}'")]
    UnknownDriver(String),

    #[error("Bad configuration for driver '{driver}': {detail}")]
    InvalidDriverConfig { driver: String, detail: String },

    #[error("Failed to initialize driver '{driver}': {message}")]
    DriverInit { driver: String, message: String },

    #[error("Bad Payload: {0}")]
    InvalidPayload(String),
}

impl CoreError {
    pub fn unknown_driver(name: impl Into<String>) -> Self {
        CoreError::UnknownDriver(name.into())
    }

    pub fn invalid_config(driver: impl Into<String>, detail: impl ToString) -> Self {
        CoreError::InvalidDriverConfig {
            driver: driver.into(),
            detail: detail.to_string(),
        }
    }

    pub fn driver_init(driver: impl Into<String>, message: impl ToString) -> Self {
        CoreError::DriverInit {
            driver: driver.into(),
            message: message.to_string(),
        }
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        CoreError::InvalidPayload(message.into())
    }

    /// Returns the driver name this error refers to, if any
    pub fn driver(&self) -> Option<&str> {
        match self {
            CoreError::UnknownDriver(name) => Some(name),
            CoreError::InvalidDriverConfig { driver, .. } | CoreError::DriverInit { driver, .. } => {
                Some(driver)
            }
            CoreError::InvalidPayload(_) => None,
        }
    }
}
