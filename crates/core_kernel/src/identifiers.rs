//! Identity of a driver instance
//!
//! A driver instance is identified by its driver name plus the content of its
//! configuration. The content part is a SHA-256 digest over a canonical
//! encoding of the configuration: object keys are visited in sorted order at
//! every depth and every value is prefixed with a type tag, so structurally
//! equal configurations always produce the same digest regardless of the
//! order their keys were written in.

use std::fmt;

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::config::DriverConfig;

const TAG_NULL: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_NUMBER: u8 = 2;
const TAG_STRING: u8 = 3;
const TAG_ARRAY: u8 = 4;
const TAG_OBJECT: u8 = 5;

/// Cache key for a driver instance
///
/// Displayed as `driver.<hex digest>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DriverKey {
    driver: String,
    digest: [u8; 32],
}

impl DriverKey {
    /// Derives the key for `driver` configured with `config`
    pub fn new(driver: &str, config: &DriverConfig) -> Self {
        let mut hasher = Sha256::new();
        write_object(&mut hasher, config);
        Self {
            driver: driver.to_string(),
            digest: hasher.finalize().into(),
        }
    }

    pub fn driver(&self) -> &str {
        &self.driver
    }

    /// Returns the hex-encoded configuration digest
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }
}

impl fmt::Display for DriverKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.driver, self.digest_hex())
    }
}

// Length-prefixed so that ("ab", "c") and ("a", "bc") never encode alike.
fn write_str(hasher: &mut Sha256, s: &str) {
    hasher.update((s.len() as u64).to_be_bytes());
    hasher.update(s.as_bytes());
}

fn write_object(hasher: &mut Sha256, map: &serde_json::Map<String, Value>) {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    hasher.update([TAG_OBJECT]);
    hasher.update((keys.len() as u64).to_be_bytes());
    for key in keys {
        write_str(hasher, key);
        write_value(hasher, &map[key]);
    }
}

fn write_value(hasher: &mut Sha256, value: &Value) {
    match value {
        Value::Null => hasher.update([TAG_NULL]),
        Value::Bool(b) => hasher.update([TAG_BOOL, *b as u8]),
        Value::Number(n) => {
            hasher.update([TAG_NUMBER]);
            write_str(hasher, &n.to_string());
        }
        Value::String(s) => {
            hasher.update([TAG_STRING]);
            write_str(hasher, s);
        }
        Value::Array(items) => {
            hasher.update([TAG_ARRAY]);
            hasher.update((items.len() as u64).to_be_bytes());
            for item in items {
                write_value(hasher, item);
            }
        }
        Value::Object(map) => write_object(hasher, map),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> DriverConfig {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_same_content_same_key() {
        let a = DriverKey::new("sfdc", &config(json!({"username": "u", "password": "p"})));
        let b = DriverKey::new("sfdc", &config(json!({"password": "p", "username": "u"})));
        assert_eq!(a, b);
    }

    #[test]
    fn test_driver_name_is_part_of_key() {
        let cfg = config(json!({"arg": 123}));
        assert_ne!(DriverKey::new("foo", &cfg), DriverKey::new("bar", &cfg));
    }

    #[test]
    fn test_value_types_do_not_collide() {
        let number = DriverKey::new("foo", &config(json!({"arg": 1})));
        let string = DriverKey::new("foo", &config(json!({"arg": "1"})));
        assert_ne!(number, string);
    }

    #[test]
    fn test_nested_objects_are_canonical() {
        let a = DriverKey::new("foo", &config(json!({"x": {"a": 1, "b": [1, 2]}})));
        let b = DriverKey::new("foo", &config(json!({"x": {"b": [1, 2], "a": 1}})));
        let c = DriverKey::new("foo", &config(json!({"x": {"b": [2, 1], "a": 1}})));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_display_names_driver_and_digest() {
        let key = DriverKey::new("foo", &DriverConfig::new());
        let shown = key.to_string();
        assert_eq!(key.driver(), "foo");
        assert_eq!(key.digest_hex().len(), 64);
        assert_eq!(shown, format!("foo.{}", key.digest_hex()));
    }

    #[test]
    fn test_digest_covers_config_only() {
        let cfg = config(json!({"arg": 123}));
        let foo = DriverKey::new("foo", &cfg);
        let bar = DriverKey::new("bar", &cfg);
        assert_eq!(foo.digest_hex(), bar.digest_hex());
        assert_ne!(foo, bar);
    }
}
