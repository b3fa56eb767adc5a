//! Dispatch errors
//!
//! Only failures that prevent a dispatch from starting are errors. Anything a
//! driver does once it has been invoked is recorded in the report instead.

use thiserror::Error;

use core_kernel::CoreError;

/// Errors that abort a dispatch before any driver is invoked
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The request named no backend at all
    #[error("No backends requested")]
    NoBackends,

    /// One or more requested backends are not configured
    #[error("Unexpected backends: {}", .0.join(", "))]
    UnknownBackends(Vec<String>),

    /// A configured driver could not be resolved
    #[error(transparent)]
    Driver(#[from] CoreError),
}

impl DispatchError {
    pub fn unknown_backends<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        DispatchError::UnknownBackends(names.into_iter().map(Into::into).collect())
    }

    /// Returns true if the error was caused by the request rather than configuration
    pub fn is_caller_error(&self) -> bool {
        matches!(self, DispatchError::NoBackends | DispatchError::UnknownBackends(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_backends_message_lists_names() {
        let err = DispatchError::unknown_backends(["alpha", "zeta"]);
        assert_eq!(err.to_string(), "Unexpected backends: alpha, zeta");
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_no_backends_is_caller_error() {
        let err = DispatchError::NoBackends;
        assert_eq!(err.to_string(), "No backends requested");
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_driver_error_is_transparent() {
        let err: DispatchError = CoreError::unknown_driver("spam").into();
        assert_eq!(err.to_string(), "Unexpected driver: 'spam'");
        assert!(!err.is_caller_error());
    }
}
