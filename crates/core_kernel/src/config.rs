//! Backend configuration
//!
//! Configuration arrives as a nested mapping: backend name to driver name to
//! an opaque driver configuration. The engine only reads it; each driver
//! interprets its own section through `parse_config`.

use std::collections::{BTreeMap, BTreeSet};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

/// Opaque configuration of a single driver
pub type DriverConfig = serde_json::Map<String, serde_json::Value>;

/// Mapping of backend name to its driver configurations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackendsConfig(BTreeMap<String, BTreeMap<String, DriverConfig>>);

impl BackendsConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) one driver section under `backend`
    pub fn with_driver(
        mut self,
        backend: impl Into<String>,
        driver: impl Into<String>,
        config: DriverConfig,
    ) -> Self {
        self.0
            .entry(backend.into())
            .or_default()
            .insert(driver.into(), config);
        self
    }

    /// Returns the driver sections of `backend`
    pub fn backend(&self, name: &str) -> Option<&BTreeMap<String, DriverConfig>> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns the requested names that are not configured, sorted
    pub fn unknown<'a>(&self, requested: &'a BTreeSet<String>) -> Vec<&'a str> {
        requested
            .iter()
            .filter(|name| !self.contains(name))
            .map(String::as_str)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, BTreeMap<String, DriverConfig>>> for BackendsConfig {
    fn from(map: BTreeMap<String, BTreeMap<String, DriverConfig>>) -> Self {
        Self(map)
    }
}

/// Interprets an opaque driver configuration as the driver's typed config
///
/// The target type decides the schema: serde rejects missing or mistyped
/// keys (and unknown ones when the type denies them), `Validate` checks the
/// remaining constraints.
pub fn parse_config<C>(driver: &str, config: &DriverConfig) -> Result<C, CoreError>
where
    C: DeserializeOwned + Validate,
{
    let typed: C = serde_json::from_value(serde_json::Value::Object(config.clone()))
        .map_err(|e| CoreError::invalid_config(driver, e))?;
    typed
        .validate()
        .map_err(|e| CoreError::invalid_config(driver, e))?;
    Ok(typed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Deserialize, Validate)]
    #[serde(deny_unknown_fields)]
    struct SampleConfig {
        #[validate(length(min = 1))]
        recipients: Vec<String>,
        #[serde(default)]
        port: Option<u16>,
    }

    fn cfg(value: serde_json::Value) -> DriverConfig {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_parse_config_accepts_valid() {
        let parsed: SampleConfig = parse_config("mail", &cfg(json!({"recipients": ["a"]}))).unwrap();
        assert_eq!(parsed.recipients, vec!["a".to_string()]);
        assert!(parsed.port.is_none());
    }

    #[test]
    fn test_parse_config_rejects_unknown_key() {
        let err = parse_config::<SampleConfig>("mail", &cfg(json!({"recipients": ["a"], "x": 1})))
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidDriverConfig { ref driver, .. } if driver == "mail"));
    }

    #[test]
    fn test_parse_config_runs_validation() {
        let err = parse_config::<SampleConfig>("mail", &cfg(json!({"recipients": []}))).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDriverConfig { .. }));
    }

    #[test]
    fn test_unknown_backends_sorted() {
        let backends = BackendsConfig::new().with_driver("ops", "dummy_pass", DriverConfig::new());
        let requested: BTreeSet<String> =
            ["zeta", "ops", "alpha"].iter().map(|s| s.to_string()).collect();
        assert_eq!(backends.unknown(&requested), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_deserialize_nested_mapping() {
        let backends: BackendsConfig = serde_json::from_value(json!({
            "ops": {"mail": {"sender_domain": "example.org"}, "dummy_pass": {}}
        }))
        .unwrap();
        let ops = backends.backend("ops").unwrap();
        assert_eq!(ops.len(), 2);
        assert!(ops.contains_key("mail"));
    }
}
