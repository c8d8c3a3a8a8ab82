//! Tests for the crate's error type

use binnacle::core::DetectError;

#[test]
fn test_io_error_display() {
    use std::io;
    let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let error: DetectError = io_err.into();
    let message = error.to_string();
    assert!(message.contains("IO error"));
    assert!(message.contains("permission denied"));
}

#[test]
fn test_unreadable_content_display() {
    let error = DetectError::unreadable_content("garbled payload".to_string());
    let message = error.to_string();
    assert!(message.contains("Unreadable content"));
    assert!(message.contains("garbled payload"));
}

#[test]
fn test_unsupported_extension_display() {
    let error = DetectError::unsupported_extension("vsdx".to_string());
    let message = error.to_string();
    assert!(message.contains("Unsupported extension"));
    assert!(message.contains("vsdx"));
}

#[test]
fn test_errors_are_std_errors() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    let error = DetectError::unreadable_content("oops".to_string());
    assert_error(&error);
}
