//! Test Data Builders
//!
//! Builders let tests specify only the relevant fields and take the fixture
//! defaults for everything else.

use core_kernel::{Payload, Severity, Who};

use crate::fixtures::PayloadFixtures;

/// Builder for constructing test payloads
pub struct TestPayloadBuilder {
    payload: Payload,
}

impl Default for TestPayloadBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPayloadBuilder {
    /// Creates a new builder starting from `PayloadFixtures::info_alert`
    pub fn new() -> Self {
        Self {
            payload: PayloadFixtures::info_alert(),
        }
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.payload.region = region.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.payload.description = description.into();
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.payload.severity = severity;
        self
    }

    pub fn who(mut self, who: impl Into<String>) -> Self {
        self.payload.who = Who::One(who.into());
        self
    }

    pub fn who_many<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.payload.who = Who::Many(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn what(mut self, what: impl Into<String>) -> Self {
        self.payload.what = what.into();
        self
    }

    pub fn hosts<I, S>(mut self, hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.payload.affected_hosts = Some(hosts.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Payload {
        self.payload
    }
}
