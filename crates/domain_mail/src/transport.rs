//! Mail delivery
//!
//! `MailTransport` is the seam between composing an alert e-mail and
//! delivering it. Production uses `SmtpTransport`; tests substitute a
//! recording transport.

use async_trait::async_trait;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::debug;

use crate::error::MailError;
use crate::message::MailMessage;

/// Delivers composed messages
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Plain SMTP relay
pub struct SmtpTransport {
    inner: AsyncSmtpTransport<Tokio1Executor>,
    host: String,
}

impl SmtpTransport {
    /// Creates a relay for `host`, on `port` or the SMTP default
    ///
    /// The connection is unencrypted and unauthenticated; the relay is
    /// expected to be local or otherwise trusted.
    pub fn new(host: &str, port: Option<u16>) -> Self {
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host);
        if let Some(port) = port {
            builder = builder.port(port);
        }
        Self {
            inner: builder.build(),
            host: host.to_string(),
        }
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let envelope = message.envelope()?;
        let email = message.to_lettre()?;
        let response = self.inner.send_raw(&envelope, &email.formatted()).await?;
        debug!(host = %self.host, code = %response.code(), "SMTP relay accepted message");
        Ok(())
    }
}

impl std::fmt::Debug for SmtpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpTransport").field("host", &self.host).finish()
    }
}
