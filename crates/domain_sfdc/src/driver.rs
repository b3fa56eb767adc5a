//! CRM case driver
//!
//! # Notify flow
//!
//! ```text
//!   create case ──201──▶ Created(id) ─────────────────────────┐
//!        │                                                    │
//!        ├─ DUPLICATE_VALUE ─▶ get case ─▶ update case ─▶ Duplicate(id)
//!        │                        │            │              │
//!        └─ other ─▶ false        └─ non-2xx ──┴─▶ false      ▼
//!                                                   append feed item
//!                                                    200/201 ─▶ true
//!                                                    other   ─▶ false
//! ```
//!
//! Transport and authentication failures anywhere in the flow end it with
//! `false`; the driver never returns an error. The whole flow runs under the
//! configured deadline, and running out of time also yields `false`, so the
//! driver is self-timed and the dispatcher does not cancel it.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use core_kernel::{parse_config, CoreError, DriverConfig, DriverError, DriverFactory, NotifyDriver, Payload};

use crate::auth::{Authenticator, OAuth2};
use crate::case::{duplicate_case_id, is_record_id, CaseRecord, FeedItem};
use crate::client::SfdcClient;
use crate::config::{SfdcConfig, DEFAULT_TIMEOUT_SECS, UPSERT_REQUEST_BUDGET};
use crate::error::SfdcError;

/// Error code for a case whose alert id already exists
pub const DUPLICATE_VALUE: &str = "DUPLICATE_VALUE";

/// Notification driver that upserts a CRM case per alert
#[derive(Debug)]
pub struct SfdcDriver {
    client: SfdcClient,
    deadline: Duration,
}

impl SfdcDriver {
    /// Creates a driver logging in with the configured credentials
    pub fn new(config: &SfdcConfig) -> Result<Self, SfdcError> {
        let http = build_http_client(config.request_timeout())?;
        let auth = OAuth2::new(http.clone(), config);
        Ok(Self::with_client(SfdcClient::new(http, Arc::new(auth))).with_deadline(config.deadline()))
    }

    /// Creates a driver with a custom authenticator
    pub fn with_authenticator(
        config: &SfdcConfig,
        auth: Arc<dyn Authenticator>,
    ) -> Result<Self, SfdcError> {
        let http = build_http_client(config.request_timeout())?;
        Ok(Self::with_client(SfdcClient::new(http, auth)).with_deadline(config.deadline()))
    }

    pub fn with_client(client: SfdcClient) -> Self {
        Self {
            client,
            deadline: Duration::from_secs(DEFAULT_TIMEOUT_SECS) * UPSERT_REQUEST_BUDGET,
        }
    }

    /// Replaces the bound for one whole notification
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn client(&self) -> &SfdcClient {
        &self.client
    }

    /// Creates or updates the case for `payload` and appends a feed item
    pub async fn upsert_case(&self, payload: &Payload) -> Result<bool, SfdcError> {
        let CaseRecord {
            alert_id,
            mut fields,
            mut snapshot,
        } = CaseRecord::from_payload(payload);

        let created = self.client.create_case(&fields).await?;

        let case_id = if let Some(case_id) = created.id().filter(|_| matches!(created.status, 200 | 201)) {
            info!(%alert_id, %case_id, "Case created");
            case_id.to_string()
        } else if created.has_error_code(DUPLICATE_VALUE) {
            let message = created.error.as_ref().map(|e| e.message.as_str()).unwrap_or_default();
            let Some(case_id) = duplicate_case_id(message).filter(|id| is_record_id(id)).map(str::to_string)
            else {
                error!(%alert_id, %message, "Duplicate case without a usable id");
                return Ok(false);
            };
            info!(%alert_id, %case_id, "Case is a duplicate");

            let existing = self.client.get_case(&case_id).await?;
            if !existing.is_ok() {
                error!(%case_id, status = existing.status, "Failed to fetch existing case");
                return Ok(false);
            }
            if let Some(status) = existing.field("Status") {
                snapshot.status = status.to_string();
            }
            if let Some(subject) = existing.field("Subject") {
                fields.subject = subject.to_string();
            }

            let updated = self.client.update_case(&case_id, &fields).await?;
            if !updated.is_ok() {
                error!(%case_id, status = updated.status, "Failed to update case");
                return Ok(false);
            }
            case_id
        } else {
            error!(%alert_id, status = created.status, body = %created.body, "Unexpected case response");
            return Ok(false);
        };

        let item = FeedItem::new(case_id.as_str(), snapshot.to_body()?);
        let appended = self.client.create_feed_item(&item).await?;
        if !matches!(appended.status, 200 | 201) {
            warn!(%case_id, status = appended.status, "Feed item was not created");
            return Ok(false);
        }
        Ok(true)
    }
}

#[async_trait]
impl NotifyDriver for SfdcDriver {
    async fn notify(&self, payload: &Payload) -> Result<bool, DriverError> {
        match tokio::time::timeout(self.deadline, self.upsert_case(payload)).await {
            Ok(Ok(delivered)) => Ok(delivered),
            Ok(Err(e)) => {
                error!(error = %e, "CRM notification has failed");
                Ok(false)
            }
            Err(_) => {
                error!(deadline = ?self.deadline, what = %payload.what, "CRM notification timed out");
                Ok(false)
            }
        }
    }

    fn self_timed(&self) -> bool {
        true
    }
}

/// Factory registered under the `sfdc` driver name
#[derive(Debug, Clone, Copy, Default)]
pub struct SfdcDriverFactory;

impl DriverFactory for SfdcDriverFactory {
    fn validate_config(&self, driver: &str, config: &DriverConfig) -> Result<(), CoreError> {
        parse_config::<SfdcConfig>(driver, config).map(|_| ())
    }

    fn build(&self, driver: &str, config: &DriverConfig) -> Result<Arc<dyn NotifyDriver>, CoreError> {
        let config: SfdcConfig = parse_config(driver, config)?;
        let instance = SfdcDriver::new(&config).map_err(|e| CoreError::driver_init(driver, e))?;
        Ok(Arc::new(instance))
    }
}

/// HTTP client with a bound on every request
pub fn build_http_client(timeout: Duration) -> Result<reqwest::Client, SfdcError> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}
