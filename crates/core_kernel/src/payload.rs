//! Alert payload
//!
//! The payload is the immutable record every driver receives. Serde enforces
//! the shape (required fields, the severity enumeration, no unknown fields);
//! `Payload::validate` covers the rules serde cannot express.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Alert severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Ok,
    Info,
    Unknown,
    Warning,
    Critical,
    Down,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ok => "OK",
            Severity::Info => "INFO",
            Severity::Unknown => "UNKNOWN",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Down => "DOWN",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origin of an alert: a single host/service name or a set of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Who {
    One(String),
    Many(Vec<String>),
}

impl Who {
    /// Returns the origin as one string, joining a set with `,`
    pub fn joined(&self) -> String {
        match self {
            Who::One(name) => name.clone(),
            Who::Many(names) => names.join(","),
        }
    }
}

impl fmt::Display for Who {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

impl From<&str> for Who {
    fn from(name: &str) -> Self {
        Who::One(name.to_string())
    }
}

/// A notification alert as accepted by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Payload {
    pub region: String,
    pub description: String,
    pub severity: Severity,
    pub who: Who,
    pub what: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affected_hosts: Option<Vec<String>>,
}

impl Payload {
    /// Parses and validates a payload from raw JSON
    pub fn from_json(value: serde_json::Value) -> Result<Self, CoreError> {
        let payload: Payload = serde_json::from_value(value)
            .map_err(|e| CoreError::invalid_payload(e.to_string()))?;
        payload.validate()?;
        Ok(payload)
    }

    /// Checks the rules that deserialization alone does not enforce
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Who::Many(names) = &self.who {
            if names.is_empty() {
                return Err(CoreError::invalid_payload("'who' must list at least one item"));
            }
            let mut seen = HashSet::with_capacity(names.len());
            for name in names {
                if !seen.insert(name.as_str()) {
                    return Err(CoreError::invalid_payload(format!(
                        "'who' has non-unique elements: '{}'",
                        name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Affected hosts, treating an empty list the same as an absent one
    pub fn hosts(&self) -> Option<&[String]> {
        match self.affected_hosts.as_deref() {
            Some(hosts) if !hosts.is_empty() => Some(hosts),
            _ => None,
        }
    }
}
