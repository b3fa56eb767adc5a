//! CRM Case Driver
//!
//! Relays alerts into Salesforce as cases. One case exists per alert id;
//! repeated alerts update that case and append a feed item to it instead of
//! opening a new one.
//!
//! # Modules
//!
//! - `config`: Driver configuration section
//! - `auth`: SOAP and OAuth2 password-grant login
//! - `client`: REST client with session caching and expiry retry
//! - `case`: Case, feed item and alert snapshot records
//! - `driver`: The notify flow and its factory

pub mod config;
pub mod auth;
pub mod client;
pub mod case;
pub mod driver;
pub mod error;

pub use config::SfdcConfig;
pub use auth::{Authenticator, OAuth2, Session};
pub use client::{ApiError, SfdcClient, SfdcResponse};
pub use case::{AlertSnapshot, CaseFields, CaseRecord, FeedItem};
pub use driver::{SfdcDriver, SfdcDriverFactory};
pub use error::SfdcError;
