//! Case model
//!
//! An alert maps to one CRM case identified by its alert id
//! (`region|what|who`). The case carries the latest alert data; every
//! notification also appends a feed item holding a snapshot of the alert,
//! so the case keeps a history of repeats.

use serde::{Deserialize, Serialize};

use core_kernel::{Payload, Severity};

/// Status given to the feed item of a newly created case
pub const NEW_CASE_STATUS: &str = "New";

/// CRM priority for a severity
pub fn priority(severity: Severity) -> &'static str {
    match severity {
        Severity::Ok | Severity::Info => "060 Informational",
        Severity::Unknown => "070 Unknown",
        Severity::Warning => "080 Warning",
        Severity::Critical | Severity::Down => "090 Critical",
    }
}

/// Case fields as sent on create and update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseFields {
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "IsMosAlert__c")]
    pub is_mos_alert: String,
    #[serde(rename = "Alert_ID__c")]
    pub alert_id: String,
    #[serde(rename = "Environment2__c")]
    pub environment: String,
    #[serde(rename = "Alert_Priority__c")]
    pub priority: String,
    #[serde(rename = "Alert_Host__c")]
    pub host: String,
    #[serde(rename = "Alert_Service__c")]
    pub service: String,
}

/// Alert snapshot posted as a feed item body
///
/// Fields are declared in key order so the pretty-printed JSON has sorted
/// keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSnapshot {
    #[serde(rename = "Alert_Id")]
    pub alert_id: String,
    #[serde(rename = "Alert_Priority")]
    pub priority: String,
    #[serde(rename = "Cloud_ID")]
    pub cloud_id: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Status")]
    pub status: String,
}

impl AlertSnapshot {
    pub fn to_body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Feed item attached to a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    #[serde(rename = "ParentId")]
    pub parent_id: String,
    #[serde(rename = "Visibility")]
    pub visibility: String,
    #[serde(rename = "Body")]
    pub body: String,
}

impl FeedItem {
    /// A feed item visible to all users
    pub fn new(parent_id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            visibility: "AllUsers".to_string(),
            body: body.into(),
        }
    }
}

/// Everything the driver sends for one alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    pub alert_id: String,
    pub fields: CaseFields,
    pub snapshot: AlertSnapshot,
}

impl CaseRecord {
    pub fn from_payload(payload: &Payload) -> Self {
        let who = payload.who.joined();
        let alert_id = alert_id(&payload.region, &payload.what, &who);
        let subject = match payload.hosts() {
            Some(hosts) => format!("{}|{}", alert_id, hosts.join(",")),
            None => alert_id.clone(),
        };
        let priority = priority(payload.severity).to_string();

        let fields = CaseFields {
            subject,
            description: payload.description.clone(),
            is_mos_alert: "true".to_string(),
            alert_id: alert_id.clone(),
            environment: payload.region.clone(),
            priority: priority.clone(),
            host: who,
            service: payload.what.clone(),
        };

        let snapshot = AlertSnapshot {
            alert_id: alert_id.clone(),
            priority,
            cloud_id: payload.region.clone(),
            description: payload.description.clone(),
            status: NEW_CASE_STATUS.to_string(),
        };

        Self {
            alert_id,
            fields,
            snapshot,
        }
    }
}

/// Idempotency key of an alert
pub fn alert_id(region: &str, what: &str, who: &str) -> String {
    format!("{}|{}|{}", region, what, who)
}

/// Existing case id from a `DUPLICATE_VALUE` message
///
/// The CRM puts the id as the last whitespace-separated token.
pub fn duplicate_case_id(message: &str) -> Option<&str> {
    message.split_whitespace().last()
}

/// Returns true if `id` is safe to use as an sObject path segment
pub fn is_record_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_utils::{name_strategy, payload_strategy, PayloadFixtures, TestPayloadBuilder};

    #[test]
    fn test_priority_table() {
        assert_eq!(priority(Severity::Ok), "060 Informational");
        assert_eq!(priority(Severity::Info), "060 Informational");
        assert_eq!(priority(Severity::Unknown), "070 Unknown");
        assert_eq!(priority(Severity::Warning), "080 Warning");
        assert_eq!(priority(Severity::Critical), "090 Critical");
        assert_eq!(priority(Severity::Down), "090 Critical");
    }

    #[test]
    fn test_record_without_hosts() {
        let record = CaseRecord::from_payload(&PayloadFixtures::info_alert());
        assert_eq!(record.alert_id, "farfaraway|Hooray!|John Doe");
        assert_eq!(record.fields.subject, "farfaraway|Hooray!|John Doe");
        assert_eq!(record.fields.priority, "060 Informational");
        assert_eq!(record.fields.host, "John Doe");
        assert_eq!(record.fields.service, "Hooray!");
        assert_eq!(record.snapshot.status, "New");
    }

    #[test]
    fn test_record_with_hosts_extends_subject_only() {
        let record = CaseRecord::from_payload(&PayloadFixtures::with_hosts());
        assert_eq!(record.alert_id, "farfaraway|Hooray!|John Doe");
        assert_eq!(record.fields.subject, "farfaraway|Hooray!|John Doe|foo.srv,bar.srv");
    }

    #[test]
    fn test_empty_host_list_is_ignored() {
        let payload = TestPayloadBuilder::new().hosts(Vec::<String>::new()).build();
        let record = CaseRecord::from_payload(&payload);
        assert_eq!(record.fields.subject, record.alert_id);
    }

    #[test]
    fn test_case_fields_wire_names() {
        let record = CaseRecord::from_payload(&PayloadFixtures::info_alert());
        let value = serde_json::to_value(&record.fields).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "Subject": "farfaraway|Hooray!|John Doe",
                "Description": "This is a test data.",
                "IsMosAlert__c": "true",
                "Alert_ID__c": "farfaraway|Hooray!|John Doe",
                "Environment2__c": "farfaraway",
                "Alert_Priority__c": "060 Informational",
                "Alert_Host__c": "John Doe",
                "Alert_Service__c": "Hooray!"
            })
        );
    }

    #[test]
    fn test_snapshot_body_sorted_and_indented() {
        let record = CaseRecord::from_payload(&PayloadFixtures::info_alert());
        let body = record.snapshot.to_body().unwrap();
        assert_eq!(
            body,
            "{\n  \"Alert_Id\": \"farfaraway|Hooray!|John Doe\",\n  \"Alert_Priority\": \"060 Informational\",\n  \"Cloud_ID\": \"farfaraway\",\n  \"Description\": \"This is a test data.\",\n  \"Status\": \"New\"\n}"
        );
    }

    #[test]
    fn test_duplicate_case_id_is_last_token() {
        assert_eq!(
            duplicate_case_id("duplicate value found: Alert_ID__c duplicates value on record with id: CASE123"),
            Some("CASE123")
        );
        assert_eq!(duplicate_case_id("  CASE9  "), Some("CASE9"));
        assert_eq!(duplicate_case_id("   "), None);
    }

    #[test]
    fn test_record_id_rejects_path_characters() {
        assert!(is_record_id("CASE123"));
        assert!(is_record_id("5003000000D8cuI"));
        assert!(!is_record_id(""));
        assert!(!is_record_id("../Account/001"));
        assert!(!is_record_id("CASE1?fields=Id"));
        assert!(!is_record_id("CASE1#x"));
        assert!(!is_record_id("id:"));
    }

    #[test]
    fn test_multi_origin_who_is_joined() {
        let record = CaseRecord::from_payload(&PayloadFixtures::critical_multi_origin());
        assert_eq!(record.alert_id, "west-1|disk|db-1,db-2");
        assert_eq!(record.fields.priority, "090 Critical");
    }

    proptest! {
        #[test]
        fn alert_id_ignores_affected_hosts(
            payload in payload_strategy(),
            hosts in prop::collection::vec(name_strategy(), 1..4),
        ) {
            let with_hosts = Payload { affected_hosts: Some(hosts), ..payload.clone() };
            let plain = CaseRecord::from_payload(&payload);
            let hosted = CaseRecord::from_payload(&with_hosts);
            prop_assert_eq!(&plain.alert_id, &hosted.alert_id);
            prop_assert!(hosted.fields.subject.starts_with(&hosted.alert_id));
        }
    }
}
