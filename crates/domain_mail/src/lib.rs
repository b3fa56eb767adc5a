//! Mail Driver
//!
//! Relays alerts as e-mail. The subject is `"{who}: {what}"`, followed by
//! the affected hosts in parentheses when there are any; the sender is the
//! sanitized region at the configured domain.

pub mod config;
pub mod message;
pub mod transport;
pub mod driver;
pub mod error;

pub use config::{MailConfig, Mimetype};
pub use message::{sanitize_name, MailMessage};
pub use transport::{MailTransport, SmtpTransport};
pub use driver::{MailDriver, MailDriverFactory};
pub use error::MailError;
