//! HTTP API Layer
//!
//! This crate provides the REST API of the notify service using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Alert intake and health
//! - **Middleware**: Request logging
//! - **DTOs**: Response bodies and path parsing
//! - **Drivers**: The built-in driver registry and dispatcher wiring
//! - **Error Handling**: `{"error": message}` responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, drivers::build_dispatcher};
//!
//! let dispatcher = build_dispatcher(config.notify_backends.clone(), config.dispatch_options());
//! let app = create_router(dispatcher);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod drivers;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use domain_dispatch::Dispatcher;

use crate::handlers::{health, notify};
use crate::middleware::request_log_middleware;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
}

/// Creates the main API router
///
/// # Arguments
///
/// * `dispatcher` - Dispatcher owning the driver registry, cache and backends
///
/// # Returns
///
/// Configured Axum router with all routes and middleware
pub fn create_router(dispatcher: Dispatcher) -> Router {
    let state = AppState { dispatcher };

    let api_routes = Router::new().route("/notify/:backends", post(notify::send_notification));

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_routes)
        .layer(axum_middleware::from_fn(request_log_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
