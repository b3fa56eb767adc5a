//! CRM driver errors

use thiserror::Error;

/// Errors raised while talking to the CRM
#[derive(Debug, Error)]
pub enum SfdcError {
    /// The login endpoint rejected the credentials or answered unexpectedly
    #[error("Authentication failed: {message}")]
    Auth {
        status: Option<u16>,
        message: String,
    },

    /// Connection-level failure, including timeouts
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SfdcError {
    pub fn auth(message: impl Into<String>) -> Self {
        SfdcError::Auth {
            status: None,
            message: message.into(),
        }
    }

    pub fn auth_status(status: u16, message: impl Into<String>) -> Self {
        SfdcError::Auth {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Returns true for failures caused by the network rather than the CRM
    pub fn is_transport(&self) -> bool {
        matches!(self, SfdcError::Transport(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_message() {
        let err = SfdcError::auth_status(401, "invalid_grant");
        assert_eq!(err.to_string(), "Authentication failed: invalid_grant");
        assert!(!err.is_transport());
        assert!(matches!(err, SfdcError::Auth { status: Some(401), .. }));
    }
}
