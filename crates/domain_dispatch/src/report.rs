//! Dispatch report

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use core_kernel::NotifyOutcome;

/// Message returned in place of an opaque driver failure
pub const GENERIC_ERROR_MESSAGE: &str = "Something has went wrong!";

/// Per-driver entry of a report, as returned to API callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DriverOutcome {
    Status { status: bool },
    Error { error: String },
}

impl DriverOutcome {
    pub fn status(&self) -> Option<bool> {
        match self {
            DriverOutcome::Status { status } => Some(*status),
            DriverOutcome::Error { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            DriverOutcome::Status { .. } => None,
            DriverOutcome::Error { error } => Some(error),
        }
    }
}

impl From<&NotifyOutcome> for DriverOutcome {
    fn from(outcome: &NotifyOutcome) -> Self {
        match outcome {
            NotifyOutcome::Delivered(status) => DriverOutcome::Status { status: *status },
            NotifyOutcome::UserError(message) => DriverOutcome::Error {
                error: message.clone(),
            },
            NotifyOutcome::InternalError(_) => DriverOutcome::Error {
                error: GENERIC_ERROR_MESSAGE.to_string(),
            },
        }
    }
}

/// Aggregated result of one dispatch call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    /// backend -> driver -> outcome
    pub result: BTreeMap<String, BTreeMap<String, DriverOutcome>>,
}

impl DispatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one classified invocation
    pub fn record(&mut self, backend: &str, driver: &str, outcome: &NotifyOutcome) {
        self.total += 1;
        match outcome {
            NotifyOutcome::Delivered(true) => self.passed += 1,
            NotifyOutcome::Delivered(false) => self.failed += 1,
            NotifyOutcome::UserError(_) | NotifyOutcome::InternalError(_) => self.errors += 1,
        }
        self.result
            .entry(backend.to_string())
            .or_default()
            .insert(driver.to_string(), DriverOutcome::from(outcome));
    }

    pub fn outcome(&self, backend: &str, driver: &str) -> Option<&DriverOutcome> {
        self.result.get(backend).and_then(|drivers| drivers.get(driver))
    }

    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}
