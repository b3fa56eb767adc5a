//! CRM driver configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default login host
pub const DEFAULT_AUTH_URL: &str = "https://login.salesforce.com";

/// Default bound for every outbound request, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Requests one upsert may need, logins and the session retry included
pub const UPSERT_REQUEST_BUDGET: u32 = 8;

/// Configuration of one CRM driver section
///
/// When `organization_id` is set the driver logs in through the SOAP
/// endpoint scoped to that organization, otherwise it uses the OAuth2
/// password grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SfdcConfig {
    #[validate(length(min = 1))]
    pub username: String,
    pub password: String,
    #[validate(length(min = 1))]
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_url")]
    #[validate(url)]
    pub auth_url: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    #[serde(default = "default_timeout_secs")]
    #[validate(range(min = 1))]
    pub timeout_secs: u64,
    /// Bound for a whole notification; defaults to the request budget
    /// times `timeout_secs`
    #[serde(default)]
    #[validate(range(min = 1))]
    pub deadline_secs: Option<u64>,
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl SfdcConfig {
    /// Login host without a trailing slash
    pub fn auth_base(&self) -> &str {
        self.auth_url.trim_end_matches('/')
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn deadline(&self) -> Duration {
        match self.deadline_secs {
            Some(secs) => Duration::from_secs(secs),
            None => self.request_timeout() * UPSERT_REQUEST_BUDGET,
        }
    }
}
