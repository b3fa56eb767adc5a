//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! notify test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built payloads and backend configurations
//! - `builders`: Builder for payloads with only the relevant fields set
//! - `drivers`: Spy drivers and factories with scripted behaviour
//! - `generators`: Property-based payload generators

pub mod fixtures;
pub mod builders;
pub mod drivers;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use drivers::*;
pub use generators::*;
