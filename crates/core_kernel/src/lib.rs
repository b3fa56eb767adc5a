//! Core Kernel - Foundational types for the notify service
//!
//! This crate provides the building blocks shared by the dispatch engine and
//! every notification driver:
//! - The validated alert payload and its severity scale
//! - The driver capability (`NotifyDriver`) and its tagged outcome
//! - The driver factory registry and the process-lifetime instance cache
//! - Backend configuration types

pub mod payload;
pub mod identifiers;
pub mod config;
pub mod ports;
pub mod registry;
pub mod error;

pub use payload::{Payload, Severity, Who};
pub use identifiers::DriverKey;
pub use config::{BackendsConfig, DriverConfig, parse_config};
pub use ports::{DriverError, DriverFactory, NotifyDriver, NotifyOutcome};
pub use registry::{DriverCache, DriverRegistry};
pub use error::CoreError;
