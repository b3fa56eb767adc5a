//! Mail driver errors

use thiserror::Error;

/// Errors raised while composing or sending an alert e-mail
#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Invalid message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("No recipients configured")]
    NoRecipients,
}
