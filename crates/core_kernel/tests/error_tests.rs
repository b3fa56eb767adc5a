//! Tests for core_kernel error types

use core_kernel::error::CoreError;

#[test]
fn test_unknown_driver() {
    let error = CoreError::unknown_driver("pager");

    assert_eq!(error.to_string(), "Unexpected driver: 'pager'");
    assert_eq!(error.driver(), Some("pager"));
}

#[test]
fn test_invalid_config_names_driver() {
    let error = CoreError::invalid_config("sfdc", "missing field `username`");

    match &error {
        CoreError::InvalidDriverConfig { driver, detail } => {
            assert_eq!(driver, "sfdc");
            assert_eq!(detail, "missing field `username`");
        }
        _ => panic!("Expected InvalidDriverConfig error"),
    }
    assert_eq!(
        error.to_string(),
        "Bad configuration for driver 'sfdc': missing field `username`"
    );
}

#[test]
fn test_driver_init() {
    let error = CoreError::driver_init("mail", "relay unreachable");

    assert_eq!(error.to_string(), "Failed to initialize driver 'mail': relay unreachable");
    assert_eq!(error.driver(), Some("mail"));
}

#[test]
fn test_invalid_payload_has_no_driver() {
    let error = CoreError::invalid_payload("missing field `region`");

    assert_eq!(error.to_string(), "Bad Payload: missing field `region`");
    assert_eq!(error.driver(), None);
}

#[test]
fn test_error_is_std_error() {
    fn assert_error<E: std::error::Error + Send + Sync + 'static>(_: &E) {}
    assert_error(&CoreError::unknown_driver("x"));
}
