//! Pre-built Test Fixtures
//!
//! Provides ready-to-use payloads and configurations. These fixtures are
//! consistent and predictable so assertions can use literal values.

use core_kernel::{BackendsConfig, DriverConfig, Payload, Severity, Who};
use serde_json::{json, Value};

/// Fixture for alert payloads
pub struct PayloadFixtures;

impl PayloadFixtures {
    /// The canonical informational alert
    pub fn info_alert() -> Payload {
        Payload {
            region: "farfaraway".to_string(),
            description: "This is a test data.".to_string(),
            severity: Severity::Info,
            who: Who::One("John Doe".to_string()),
            what: "Hooray!".to_string(),
            affected_hosts: None,
        }
    }

    /// The canonical alert with two affected hosts
    pub fn with_hosts() -> Payload {
        Payload {
            affected_hosts: Some(vec!["foo.srv".to_string(), "bar.srv".to_string()]),
            ..Self::info_alert()
        }
    }

    /// A critical alert raised by several origins at once
    pub fn critical_multi_origin() -> Payload {
        Payload {
            region: "west-1".to_string(),
            description: "Disk full".to_string(),
            severity: Severity::Critical,
            who: Who::Many(vec!["db-1".to_string(), "db-2".to_string()]),
            what: "disk".to_string(),
            affected_hosts: None,
        }
    }

    /// The canonical alert as raw JSON, the way a client sends it
    pub fn info_alert_json() -> Value {
        json!({
            "region": "farfaraway",
            "description": "This is a test data.",
            "severity": "INFO",
            "who": "John Doe",
            "what": "Hooray!"
        })
    }
}

/// Fixture for driver and backend configurations
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// Converts a JSON object literal into a driver configuration
    ///
    /// Panics if `value` is not an object.
    pub fn driver(value: Value) -> DriverConfig {
        match value {
            Value::Object(map) => map,
            other => panic!("driver config must be a JSON object, got {}", other),
        }
    }

    /// Backends `backend1` and `backend2`, each with one driver of kind `driver`
    pub fn two_backends(driver: &str) -> BackendsConfig {
        BackendsConfig::new()
            .with_driver("backend1", driver, Self::driver(json!({"conf": 42})))
            .with_driver("backend2", driver, Self::driver(json!({"conf": 43})))
    }

    /// Minimal valid CRM driver configuration pointing at `auth_url`
    pub fn sfdc(auth_url: &str) -> DriverConfig {
        Self::driver(json!({
            "username": "foo_user",
            "password": "foo_pass",
            "client_id": "c_id",
            "client_secret": "c_sec",
            "auth_url": auth_url,
            "timeout_secs": 5
        }))
    }
}
