//! CRM authentication
//!
//! Two login flows yield the same `Session`:
//!
//! - **SOAP**, when an organization id is configured: a partner `login`
//!   call scoped by `LoginScopeHeader`. The token is the `sessionId`
//!   element of the response and the instance URL is the login host.
//! - **REST** otherwise: the OAuth2 password grant, whose JSON response
//!   carries both `access_token` and `instance_url`.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use crate::config::SfdcConfig;
use crate::error::SfdcError;

/// SOAP partner API version used for login
pub const SOAP_LOGIN_PATH: &str = "/services/Soap/u/36.0";

/// OAuth2 token endpoint
pub const TOKEN_PATH: &str = "/services/oauth2/token";

static SESSION_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<(?:[\w-]+:)?sessionId(?:\s[^>]*)?>([^<]*)</(?:[\w-]+:)?sessionId>")
        .expect("Is a valid regex")
});

/// An authenticated CRM session
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub instance_url: String,
}

/// Produces CRM sessions
#[async_trait]
pub trait Authenticator: Send + Sync + 'static {
    async fn authenticate(&self) -> Result<Session, SfdcError>;
}

/// Username/password login against the CRM login host
#[derive(Debug, Clone)]
pub struct OAuth2 {
    http: reqwest::Client,
    auth_url: String,
    client_id: String,
    client_secret: String,
    username: String,
    password: String,
    organization_id: Option<String>,
}

impl OAuth2 {
    pub fn new(http: reqwest::Client, config: &SfdcConfig) -> Self {
        Self {
            http,
            auth_url: config.auth_base().to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            organization_id: config.organization_id.clone().filter(|id| !id.is_empty()),
        }
    }

    pub fn uses_soap(&self) -> bool {
        self.organization_id.is_some()
    }

    /// Logs in through the SOAP partner endpoint
    pub async fn authenticate_soap(&self, organization_id: &str) -> Result<Session, SfdcError> {
        debug!(username = %self.username, "Making SOAP login");

        let url = format!("{}{}", self.auth_url, SOAP_LOGIN_PATH);
        let envelope = login_envelope(organization_id, &self.username, &self.password);

        let response = self
            .http
            .post(&url)
            .header("SOAPAction", "login")
            .header("Charset", "UTF-8")
            .header(reqwest::header::CONTENT_TYPE, "text/xml")
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(status = status.as_u16(), "SOAP login response");

        if !status.is_success() {
            return Err(SfdcError::auth_status(status.as_u16(), format!("SOAP login returned {}", status)));
        }

        let access_token = session_id(&text)
            .ok_or_else(|| SfdcError::auth("SOAP login response has no sessionId"))?;

        Ok(Session {
            access_token,
            instance_url: self.auth_url.clone(),
        })
    }

    /// Logs in with the OAuth2 password grant
    pub async fn authenticate_rest(&self) -> Result<Session, SfdcError> {
        debug!(client_id = %self.client_id, "Making REST login");

        let url = format!("{}{}", self.auth_url, TOKEN_PATH);
        let form = [
            ("grant_type", "password"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("username", self.username.as_str()),
            ("password", self.password.as_str()),
        ];

        let response = self.http.post(&url).form(&form).send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), "REST login response");

        if !status.is_success() {
            return Err(SfdcError::auth_status(status.as_u16(), format!("token request returned {}", status)));
        }

        let text = response.text().await?;
        serde_json::from_str::<Session>(&text)
            .map_err(|e| SfdcError::auth(format!("unexpected token response: {}", e)))
    }
}

#[async_trait]
impl Authenticator for OAuth2 {
    async fn authenticate(&self) -> Result<Session, SfdcError> {
        match &self.organization_id {
            Some(organization_id) => self.authenticate_soap(organization_id).await,
            None => self.authenticate_rest().await,
        }
    }
}

/// Builds the SOAP `login` envelope
pub fn login_envelope(organization_id: &str, username: &str, password: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="utf-8"?>"#,
            r#"<soapenv:Envelope xmlns:soapenv="http://schemas.xmlsoap.org/soap/envelope/""#,
            r#" xmlns:urn="urn:partner.soap.sforce.com">"#,
            "<soapenv:Header><urn:CallOptions>",
            "<urn:client>RestForce</urn:client>",
            "<urn:defaultNamespace>sf</urn:defaultNamespace>",
            "</urn:CallOptions><urn:LoginScopeHeader>",
            "<urn:organizationId>{}</urn:organizationId>",
            "</urn:LoginScopeHeader></soapenv:Header>",
            "<soapenv:Body><urn:login>",
            "<urn:username>{}</urn:username>",
            "<urn:password>{}</urn:password>",
            "</urn:login></soapenv:Body>",
            "</soapenv:Envelope>"
        ),
        escape_xml(organization_id),
        escape_xml(username),
        escape_xml(password),
    )
}

/// Escapes text for use inside an XML element
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Extracts the text of the first `sessionId` element
pub fn session_id(xml: &str) -> Option<String> {
    SESSION_ID
        .captures(xml)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|token| !token.is_empty())
}
