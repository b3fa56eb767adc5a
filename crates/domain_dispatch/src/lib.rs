//! Dispatch Domain
//!
//! This crate relays one validated alert to every driver configured under
//! the requested backends and aggregates the per-driver outcomes.
//!
//! # Outcome classification
//!
//! | Driver result                  | Counted as | Returned to caller            |
//! |--------------------------------|------------|-------------------------------|
//! | `Ok(true)`                     | `passed`   | `{"status": true}`            |
//! | `Ok(false)`                    | `failed`   | `{"status": false}`           |
//! | `DriverError::Explained(msg)`  | `errors`   | `{"error": msg}`              |
//! | anything else, timeout, panic  | `errors`   | `{"error": <generic message>}`|
//!
//! Self-timed drivers report their own expiry as `Ok(false)`; the engine
//! never cancels them, so their outcomes stay within `passed` and `failed`.
//!
//! # Example
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new(registry, cache, backends, DispatchOptions::default());
//! let report = dispatcher.dispatch(&requested, Arc::new(payload)).await?;
//! assert_eq!(report.total, report.passed + report.failed + report.errors);
//! ```

pub mod engine;
pub mod report;
pub mod error;

pub use engine::{DispatchOptions, Dispatcher};
pub use report::{DispatchReport, DriverOutcome, GENERIC_ERROR_MESSAGE};
pub use error::DispatchError;
