//! Notify DTOs

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use core_kernel::Payload;
use domain_dispatch::DispatchReport;

/// Body of a successful notify call: the accepted payload plus the report
#[derive(Debug, Serialize, Deserialize)]
pub struct NotifyResponse {
    pub payload: Payload,
    #[serde(flatten)]
    pub report: DispatchReport,
}

/// Splits the comma-separated backends path segment into a set
pub fn parse_backends(segment: &str) -> BTreeSet<String> {
    segment
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
