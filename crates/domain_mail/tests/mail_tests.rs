//! Tests for the mail driver

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use core_kernel::{DriverError, DriverFactory, NotifyDriver, NotifyOutcome};
use domain_mail::{MailConfig, MailDriver, MailDriverFactory, MailError, MailMessage, MailTransport, Mimetype};
use test_utils::{ConfigFixtures, PayloadFixtures, TestPayloadBuilder};

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<MailMessage>>,
}

impl RecordingTransport {
    fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

struct RefusingTransport;

#[async_trait]
impl MailTransport for RefusingTransport {
    async fn send(&self, _message: &MailMessage) -> Result<(), MailError> {
        Err(MailError::NoRecipients)
    }
}

fn config() -> MailConfig {
    MailConfig {
        sender_domain: "example.org".to_string(),
        recipients: vec!["foo@example.org".to_string(), "oncall@example.org".to_string()],
        smtp_host: "localhost".to_string(),
        smtp_port: None,
        mimetype: Mimetype::Plain,
    }
}

#[tokio::test]
async fn test_notify_sends_one_message() {
    let transport = Arc::new(RecordingTransport::default());
    let driver = MailDriver::with_transport(config(), transport.clone());
    let payload = TestPayloadBuilder::new()
        .region("fooenv42")
        .description("Message body")
        .what("Foo subject")
        .who("John Doe")
        .build();

    assert!(driver.notify(&payload).await.unwrap());

    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "John Doe: Foo subject");
    assert_eq!(sent[0].from, "fooenv42@example.org");
    assert_eq!(sent[0].to(), Some("foo@example.org"));
    assert_eq!(sent[0].recipients.len(), 2);
}

#[tokio::test]
async fn test_multi_origin_subject() {
    let transport = Arc::new(RecordingTransport::default());
    let driver = MailDriver::with_transport(config(), transport.clone());

    driver.notify(&PayloadFixtures::critical_multi_origin()).await.unwrap();

    assert_eq!(transport.sent()[0].subject, "db-1,db-2: disk");
    assert_eq!(transport.sent()[0].from, "west-1@example.org");
}

#[tokio::test]
async fn test_delivery_failure_is_internal_error() {
    let driver = MailDriver::with_transport(config(), Arc::new(RefusingTransport));

    let err = driver.notify(&PayloadFixtures::info_alert()).await.unwrap_err();

    assert!(matches!(err, DriverError::Internal { .. }));
    match NotifyOutcome::from(Err(err)) {
        NotifyOutcome::InternalError(detail) => assert!(detail.contains("No recipients")),
        other => panic!("Expected InternalError, got {:?}", other),
    }
}

#[test]
fn test_factory_validates_schema() {
    let factory = MailDriverFactory;
    assert!(factory
        .validate_config(
            "mail",
            &ConfigFixtures::driver(json!({"sender_domain": "example.org", "recipients": ["a@example.org"]}))
        )
        .is_ok());

    let err = factory
        .validate_config("mail", &ConfigFixtures::driver(json!({"sender_domain": "example.org"})))
        .unwrap_err();
    assert_eq!(err.driver(), Some("mail"));
}

#[tokio::test]
async fn test_factory_builds_smtp_driver() {
    let built = MailDriverFactory.build(
        "mail",
        &ConfigFixtures::driver(json!({
            "sender_domain": "example.org",
            "recipients": ["a@example.org"],
            "smtp_host": "mail.internal",
            "smtp_port": 2525
        })),
    );
    assert!(built.is_ok());
}
