//! Notify handler

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::debug;

use core_kernel::Payload;

use crate::dto::notify::{parse_backends, NotifyResponse};
use crate::{error::ApiError, AppState};

/// Relays an alert to every driver of the listed backends
///
/// `POST /api/v1/notify/{backend[,backend...]}`
///
/// The body is checked before the backend list: a missing body is reported
/// ahead of unknown backends.
pub async fn send_notification(
    State(state): State<AppState>,
    Path(backends): Path<String>,
    body: Bytes,
) -> Result<Json<NotifyResponse>, ApiError> {
    let value = read_body(&body).ok_or(ApiError::MissedPayload)?;
    let payload = Payload::from_json(value)?;
    let requested = parse_backends(&backends);

    debug!(backends = ?requested, what = %payload.what, "Notification requested");

    let report = state
        .dispatcher
        .dispatch(&requested, Arc::new(payload.clone()))
        .await?;

    Ok(Json(NotifyResponse { payload, report }))
}

/// Parses the body, treating empty, unparsable, `null` and `{}` bodies as absent
fn read_body(body: &[u8]) -> Option<Value> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match &value {
        Value::Null => None,
        Value::Object(map) if map.is_empty() => None,
        _ => Some(value),
    }
}
