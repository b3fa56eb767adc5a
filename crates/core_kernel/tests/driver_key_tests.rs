//! Property tests for driver instance identity

use core_kernel::{DriverConfig, DriverKey};
use proptest::prelude::*;
use serde_json::Value;

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-z0-9_.@-]{0,12}".prop_map(Value::from),
    ]
}

fn entries() -> impl Strategy<Value = Vec<(String, Value)>> {
    prop::collection::btree_map("[a-z_]{1,10}", scalar(), 0..8)
        .prop_map(|map| map.into_iter().collect())
}

fn build(entries: &[(String, Value)]) -> DriverConfig {
    let mut config = DriverConfig::new();
    for (k, v) in entries {
        config.insert(k.clone(), v.clone());
    }
    config
}

proptest! {
    #[test]
    fn key_ignores_insertion_order(entries in entries()) {
        let forward = build(&entries);
        let mut reversed_entries = entries.clone();
        reversed_entries.reverse();
        let reversed = build(&reversed_entries);

        prop_assert_eq!(DriverKey::new("sfdc", &forward), DriverKey::new("sfdc", &reversed));
    }

    #[test]
    fn key_changes_with_content(entries in entries(), extra_key in "[A-Z]{1,4}", extra in scalar()) {
        let base = build(&entries);
        let mut changed = base.clone();
        changed.insert(extra_key, extra);

        prop_assert_ne!(DriverKey::new("mail", &base), DriverKey::new("mail", &changed));
    }

    #[test]
    fn key_changes_with_driver_name(entries in entries()) {
        let config = build(&entries);
        prop_assert_ne!(DriverKey::new("mail", &config), DriverKey::new("sfdc", &config));
    }
}
