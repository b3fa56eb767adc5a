//! Alert e-mail composition

use lettre::address::Envelope;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{Address, Message};

use core_kernel::Payload;

use crate::config::{MailConfig, Mimetype};
use crate::error::MailError;

/// An alert rendered as an e-mail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub from: String,
    /// Envelope recipients; the first one is also the `To` header
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
    pub mimetype: Mimetype,
}

impl MailMessage {
    pub fn from_payload(config: &MailConfig, payload: &Payload) -> Self {
        let mut subject = format!("{}: {}", payload.who, payload.what);
        if let Some(hosts) = payload.hosts() {
            subject.push_str(&format!(" ({})", hosts.join(",")));
        }

        Self {
            from: format!("{}@{}", sanitize_name(&payload.region), config.sender_domain),
            recipients: config.recipients.clone(),
            subject,
            body: payload.description.clone(),
            mimetype: config.mimetype,
        }
    }

    /// `To` header value
    pub fn to(&self) -> Option<&str> {
        self.recipients.first().map(String::as_str)
    }

    /// Builds the SMTP envelope covering every recipient
    pub fn envelope(&self) -> Result<Envelope, MailError> {
        let from: Address = self.from.parse()?;
        let to = self
            .recipients
            .iter()
            .map(|r| r.parse::<Address>())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Envelope::new(Some(from), to)?)
    }

    /// Builds the RFC 5322 message
    pub fn to_lettre(&self) -> Result<Message, MailError> {
        let to = self.to().ok_or(MailError::NoRecipients)?;
        let content_type = match self.mimetype {
            Mimetype::Plain => ContentType::TEXT_PLAIN,
            Mimetype::Html => ContentType::TEXT_HTML,
        };

        Ok(Message::builder()
            .from(self.from.parse::<Mailbox>()?)
            .to(to.parse::<Mailbox>()?)
            .subject(self.subject.as_str())
            .header(content_type)
            .body(self.body.clone())?)
    }
}

/// Turns a region name into an address local part
///
/// Lower-cases, maps `_` to `-` and drops everything except alphanumerics,
/// `-` and `.`.
pub fn sanitize_name(name: &str) -> String {
    name.to_lowercase()
        .replace('_', "-")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '.')
        .collect()
}
