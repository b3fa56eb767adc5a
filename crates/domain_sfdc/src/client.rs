//! CRM REST client
//!
//! The client owns one cached `Session`. Every request carries its bearer
//! token; a response whose first error element has code
//! `INVALID_SESSION_ID` triggers exactly one re-authentication and one
//! retry of the same request. A second expiry is returned to the caller as
//! an ordinary error response.
//!
//! Authentication is serialized through an async mutex. A caller that
//! asks to replace a stale session first checks whether another caller
//! already did, and reuses that session instead of logging in again.

use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::Mutex;
use tracing::{debug, error, warn};

use crate::auth::{Authenticator, Session};
use crate::case::{CaseFields, FeedItem};
use crate::error::SfdcError;

/// Object collection path of the REST API
pub const SOBJECTS_PATH: &str = "/services/data/v36.0/sobjects";

/// Error code returned for an expired or revoked token
pub const INVALID_SESSION_ID: &str = "INVALID_SESSION_ID";

/// First element of a CRM error array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// Reads `[{"errorCode": ..., "message": ...}, ...]`
    pub fn from_body(body: &Value) -> Option<Self> {
        let first = body.as_array()?.first()?;
        let code = first.get("errorCode")?.as_str()?;
        let message = first.get("message").and_then(Value::as_str).unwrap_or_default();
        Some(Self {
            code: code.to_string(),
            message: message.to_string(),
        })
    }
}

/// Decoded CRM response
#[derive(Debug, Clone, PartialEq)]
pub struct SfdcResponse {
    pub status: u16,
    /// `{}` when the body was empty or not JSON
    pub body: Value,
    pub error: Option<ApiError>,
}

impl SfdcResponse {
    pub fn new(status: u16, body: Value) -> Self {
        let error = ApiError::from_body(&body);
        Self { status, body, error }
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }

    pub fn has_error_code(&self, code: &str) -> bool {
        self.error_code() == Some(code)
    }

    /// `id` field of a create response
    pub fn id(&self) -> Option<&str> {
        self.body.get("id").and_then(Value::as_str)
    }

    /// Top-level string field of a record
    pub fn field(&self, name: &str) -> Option<&str> {
        self.body.get(name).and_then(Value::as_str)
    }
}

/// Session-caching REST client
pub struct SfdcClient {
    http: reqwest::Client,
    auth: Arc<dyn Authenticator>,
    session: Mutex<Option<Arc<Session>>>,
}

impl SfdcClient {
    pub fn new(http: reqwest::Client, auth: Arc<dyn Authenticator>) -> Self {
        Self {
            http,
            auth,
            session: Mutex::new(None),
        }
    }

    /// Returns the cached session, logging in if there is none
    pub async fn session(&self) -> Result<Arc<Session>, SfdcError> {
        let mut guard = self.session.lock().await;
        if let Some(session) = guard.as_ref() {
            return Ok(Arc::clone(session));
        }
        let session = Arc::new(self.auth.authenticate().await?);
        *guard = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Replaces `stale` with a fresh session
    ///
    /// If the cached session is no longer `stale`, another request has
    /// already refreshed it and that session is returned as is.
    pub async fn refresh(&self, stale: &Arc<Session>) -> Result<Arc<Session>, SfdcError> {
        let mut guard = self.session.lock().await;
        if let Some(current) = guard.as_ref() {
            if !Arc::ptr_eq(current, stale) {
                return Ok(Arc::clone(current));
            }
        }
        debug!("Session has expired, authenticating");
        *guard = None;
        let session = Arc::new(self.auth.authenticate().await?);
        *guard = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Sends an authenticated request, retrying once on session expiry
    ///
    /// `path` is relative to the session's instance URL.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<SfdcResponse, SfdcError> {
        let session = self.session().await?;
        let response = self.send(&session, method.clone(), path, body).await?;

        if !response.has_error_code(INVALID_SESSION_ID) {
            return Ok(response);
        }

        let session = self.refresh(&session).await?;
        self.send(&session, method, path, body).await
    }

    async fn send(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<SfdcResponse, SfdcError> {
        let url = format!("{}{}", session.instance_url.trim_end_matches('/'), path);
        debug!(%method, %path, "CRM request");

        let mut request = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&session.access_token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            error!(%method, %path, error = %e, "CRM request has failed");
            SfdcError::Transport(e)
        })?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let body = if text.trim().is_empty() {
            Value::Object(Map::new())
        } else {
            match serde_json::from_str::<Value>(&text) {
                Ok(value) => value,
                Err(e) => {
                    warn!(status, error = %e, "CRM response is not JSON");
                    Value::Object(Map::new())
                }
            }
        };

        let response = SfdcResponse::new(status, body);
        match &response.error {
            Some(api_error) => {
                warn!(status, code = %api_error.code, message = %api_error.message, "CRM error response");
            }
            None => debug!(status, "CRM response"),
        }
        Ok(response)
    }

    pub async fn create_case(&self, fields: &CaseFields) -> Result<SfdcResponse, SfdcError> {
        let body = to_body(fields)?;
        self.request(Method::POST, &format!("{}/Case", SOBJECTS_PATH), Some(&body))
            .await
    }

    pub async fn get_case(&self, id: &str) -> Result<SfdcResponse, SfdcError> {
        self.request(Method::GET, &format!("{}/Case/{}", SOBJECTS_PATH, id), None)
            .await
    }

    pub async fn update_case(&self, id: &str, fields: &CaseFields) -> Result<SfdcResponse, SfdcError> {
        let body = to_body(fields)?;
        self.request(Method::PATCH, &format!("{}/Case/{}", SOBJECTS_PATH, id), Some(&body))
            .await
    }

    pub async fn create_feed_item(&self, item: &FeedItem) -> Result<SfdcResponse, SfdcError> {
        let body = to_body(item)?;
        self.request(Method::POST, &format!("{}/FeedItem", SOBJECTS_PATH), Some(&body))
            .await
    }
}

impl std::fmt::Debug for SfdcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SfdcClient").finish_non_exhaustive()
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<Value, SfdcError> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_parsed_from_first_element() {
        let response = SfdcResponse::new(
            400,
            json!([{"errorCode": "FOO", "message": "Foo!"}, {"errorCode": "BAR"}]),
        );
        assert_eq!(
            response.error,
            Some(ApiError {
                code: "FOO".to_string(),
                message: "Foo!".to_string()
            })
        );
        assert!(!response.is_ok());
        assert!(response.has_error_code("FOO"));
    }

    #[test]
    fn test_object_body_has_no_error() {
        let response = SfdcResponse::new(201, json!({"id": "500x", "success": true}));
        assert!(response.error.is_none());
        assert!(response.is_ok());
        assert_eq!(response.id(), Some("500x"));
    }

    #[test]
    fn test_array_without_error_code() {
        assert!(ApiError::from_body(&json!([{"id": 1}])).is_none());
        assert!(ApiError::from_body(&json!([])).is_none());
    }
}
