//! Mail driver configuration

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body content type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mimetype {
    #[default]
    Plain,
    Html,
}

/// Configuration of one mail driver section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct MailConfig {
    /// Domain part of the sender address; the local part is the alert region
    #[validate(length(min = 1))]
    pub sender_domain: String,
    #[validate(length(min = 1))]
    pub recipients: Vec<String>,
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP port; the transport default when absent
    #[serde(default)]
    pub smtp_port: Option<u16>,
    #[serde(default)]
    pub mimetype: Mimetype,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{parse_config, CoreError, DriverConfig};
    use serde_json::json;

    fn cfg(value: serde_json::Value) -> DriverConfig {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_defaults() {
        let config: MailConfig = parse_config(
            "mail",
            &cfg(json!({"sender_domain": "example.org", "recipients": ["ops@example.org"]})),
        )
        .unwrap();
        assert_eq!(config.smtp_host, "localhost");
        assert_eq!(config.smtp_port, None);
        assert_eq!(config.mimetype, Mimetype::Plain);
    }

    #[test]
    fn test_recipients_required_and_non_empty() {
        for value in [
            json!({"sender_domain": "example.org"}),
            json!({"sender_domain": "example.org", "recipients": []}),
            json!({"recipients": ["ops@example.org"]}),
        ] {
            let err = parse_config::<MailConfig>("mail", &cfg(value)).unwrap_err();
            assert!(matches!(err, CoreError::InvalidDriverConfig { .. }));
        }
    }

    #[test]
    fn test_mimetype_enumeration() {
        let html: MailConfig = parse_config(
            "mail",
            &cfg(json!({"sender_domain": "d", "recipients": ["r"], "mimetype": "html"})),
        )
        .unwrap();
        assert_eq!(html.mimetype, Mimetype::Html);

        assert!(parse_config::<MailConfig>(
            "mail",
            &cfg(json!({"sender_domain": "d", "recipients": ["r"], "mimetype": "rtf"})),
        )
        .is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = parse_config::<MailConfig>(
            "mail",
            &cfg(json!({"sender_domain": "d", "recipients": ["r"], "smtp_user": "x"})),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidDriverConfig { .. }));
    }
}
