//! Mail driver

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use core_kernel::{parse_config, CoreError, DriverConfig, DriverError, DriverFactory, NotifyDriver, Payload};

use crate::config::MailConfig;
use crate::message::MailMessage;
use crate::transport::{MailTransport, SmtpTransport};

/// Sends each alert as one e-mail to the configured recipients
///
/// Returns `true` once the relay accepts the message. Any composition or
/// delivery failure is an internal error.
#[derive(Clone)]
pub struct MailDriver {
    config: MailConfig,
    transport: Arc<dyn MailTransport>,
}

impl MailDriver {
    pub fn new(config: MailConfig) -> Self {
        let transport = SmtpTransport::new(&config.smtp_host, config.smtp_port);
        Self::with_transport(config, Arc::new(transport))
    }

    pub fn with_transport(config: MailConfig, transport: Arc<dyn MailTransport>) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &MailConfig {
        &self.config
    }
}

#[async_trait]
impl NotifyDriver for MailDriver {
    async fn notify(&self, payload: &Payload) -> Result<bool, DriverError> {
        let message = MailMessage::from_payload(&self.config, payload);
        self.transport
            .send(&message)
            .await
            .map_err(|e| DriverError::internal_with("mail delivery failed", e))?;
        info!(from = %message.from, recipients = message.recipients.len(), "Alert mailed");
        Ok(true)
    }
}

impl std::fmt::Debug for MailDriver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailDriver").field("config", &self.config).finish()
    }
}

/// Factory registered under the `mail` driver name
#[derive(Debug, Clone, Copy, Default)]
pub struct MailDriverFactory;

impl DriverFactory for MailDriverFactory {
    fn validate_config(&self, driver: &str, config: &DriverConfig) -> Result<(), CoreError> {
        parse_config::<MailConfig>(driver, config).map(|_| ())
    }

    fn build(&self, driver: &str, config: &DriverConfig) -> Result<Arc<dyn NotifyDriver>, CoreError> {
        let config: MailConfig = parse_config(driver, config)?;
        Ok(Arc::new(MailDriver::new(config)))
    }
}
