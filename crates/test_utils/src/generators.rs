//! Property-Based Test Generators
//!
//! Provides proptest strategies for generating payloads that always satisfy
//! the upstream schema.

use core_kernel::{Payload, Severity, Who};
use proptest::prelude::*;

/// Strategy for generating any severity
pub fn severity_strategy() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Ok),
        Just(Severity::Info),
        Just(Severity::Unknown),
        Just(Severity::Warning),
        Just(Severity::Critical),
        Just(Severity::Down),
    ]
}

/// Strategy for host and region-like names
pub fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9._-]{0,15}"
}

/// Strategy for a non-empty origin, single or a unique set
pub fn who_strategy() -> impl Strategy<Value = Who> {
    prop_oneof![
        name_strategy().prop_map(Who::One),
        prop::collection::btree_set(name_strategy(), 1..4)
            .prop_map(|names| Who::Many(names.into_iter().collect())),
    ]
}

/// Strategy for valid payloads
pub fn payload_strategy() -> impl Strategy<Value = Payload> {
    (
        name_strategy(),
        ".{0,40}",
        severity_strategy(),
        who_strategy(),
        name_strategy(),
        prop::option::of(prop::collection::vec(name_strategy(), 0..4)),
    )
        .prop_map(|(region, description, severity, who, what, affected_hosts)| Payload {
            region,
            description,
            severity,
            who,
            what,
            affected_hosts,
        })
}
