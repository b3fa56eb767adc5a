//! Driver capability
//!
//! Every notification channel is a `NotifyDriver`: given a validated payload
//! it performs one outbound side effect and reports whether the backend
//! accepted it. Drivers are produced by a `DriverFactory`, which also owns the
//! driver's configuration schema.
//!
//! ```text
//!   DriverRegistry ── name ──▶ DriverFactory ── build(config) ──▶ Arc<dyn NotifyDriver>
//!                                                                     │
//!   Dispatcher ─────────────── notify(&payload) ◀─────────────────────┘
//!        │
//!        └── NotifyOutcome::{Delivered(bool), UserError(msg), InternalError(detail)}
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::DriverConfig;
use crate::error::CoreError;
use crate::payload::Payload;

/// Error raised by a driver while notifying
#[derive(Debug, Error)]
pub enum DriverError {
    /// A business-rule failure whose message is meant for the API caller
    #[error("{0}")]
    Explained(String),

    /// Any other failure; its detail is logged and never returned to callers
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DriverError {
    /// Creates a user-facing error
    pub fn explained(message: impl Into<String>) -> Self {
        DriverError::Explained(message.into())
    }

    /// Creates an opaque error
    pub fn internal(message: impl Into<String>) -> Self {
        DriverError::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an opaque error wrapping its cause
    pub fn internal_with<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        DriverError::Internal {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Classified result of one driver invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// The driver ran; `true` when the backend accepted the alert
    Delivered(bool),
    /// The driver rejected the alert with a message for the caller
    UserError(String),
    /// The driver failed; the string is internal detail for logs only
    InternalError(String),
}

impl NotifyOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, NotifyOutcome::UserError(_) | NotifyOutcome::InternalError(_))
    }
}

impl From<Result<bool, DriverError>> for NotifyOutcome {
    fn from(result: Result<bool, DriverError>) -> Self {
        match result {
            Ok(status) => NotifyOutcome::Delivered(status),
            Err(DriverError::Explained(message)) => NotifyOutcome::UserError(message),
            Err(DriverError::Internal { message, source }) => match source {
                Some(source) => NotifyOutcome::InternalError(format!("{}: {}", message, source)),
                None => NotifyOutcome::InternalError(message),
            },
        }
    }
}

/// A notification driver
///
/// Instances are cached for the life of the process and shared between
/// concurrent requests, so implementations must be `Send + Sync` and keep any
/// mutable connection state behind their own synchronization.
#[async_trait]
pub trait NotifyDriver: Send + Sync + 'static {
    /// Sends the alert
    ///
    /// # Returns
    ///
    /// `Ok(true)` if the backend accepted the alert, `Ok(false)` if delivery
    /// was attempted and declined, or a `DriverError`.
    async fn notify(&self, payload: &Payload) -> Result<bool, DriverError>;

    /// Returns true if the driver enforces its own deadline and reports
    /// expiry as `Ok(false)`
    ///
    /// The dispatcher never cancels such a driver once it has started, and a
    /// driver that could not start in time counts as declined.
    fn self_timed(&self) -> bool {
        false
    }
}

/// Builds driver instances and owns their configuration schema
pub trait DriverFactory: Send + Sync + 'static {
    /// Checks `config` against the driver's schema
    fn validate_config(&self, driver: &str, config: &DriverConfig) -> Result<(), CoreError>;

    /// Creates a new instance. Called once per distinct configuration.
    fn build(&self, driver: &str, config: &DriverConfig) -> Result<Arc<dyn NotifyDriver>, CoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_delivered() {
        assert_eq!(NotifyOutcome::from(Ok(true)), NotifyOutcome::Delivered(true));
        assert_eq!(NotifyOutcome::from(Ok(false)), NotifyOutcome::Delivered(false));
    }

    #[test]
    fn test_classify_explained() {
        let outcome = NotifyOutcome::from(Err(DriverError::explained("Spam!")));
        assert_eq!(outcome, NotifyOutcome::UserError("Spam!".to_string()));
        assert!(outcome.is_error());
    }

    #[test]
    fn test_classify_internal_keeps_source_detail() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let outcome = NotifyOutcome::from(Err(DriverError::internal_with("smtp failed", io)));
        match outcome {
            NotifyOutcome::InternalError(detail) => {
                assert!(detail.contains("smtp failed"));
                assert!(detail.contains("refused"));
            }
            other => panic!("Expected InternalError, got {:?}", other),
        }
    }
}
