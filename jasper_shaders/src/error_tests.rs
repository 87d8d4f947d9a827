//! Unit tests for error.rs
//!
//! Tests all Error variants and their implementations (Display, Debug,
//! Clone, std::error::Error) plus the jasper_err!/jasper_bail! macros.

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_config_error_display() {
    let err = Error::Config("Target environment not supported".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Configuration error"));
    assert!(display.contains("Target environment not supported"));
}

#[test]
fn test_compile_error_display() {
    let err = Error::Compile("triangle.vert.glsl:3: 'vec5' : undeclared identifier".to_string());
    let display = format!("{}", err);
    assert!(display.contains("compilation failed"));
    assert!(display.contains("undeclared identifier"));
}

#[test]
fn test_reflection_error_display() {
    let err = Error::Reflection("truncated module".to_string());
    let display = format!("{}", err);
    assert!(display.contains("reflection failed"));
    assert!(display.contains("truncated module"));
}

#[test]
fn test_cache_error_display() {
    let err = Error::Cache("size 13 is not a multiple of 4 bytes".to_string());
    let display = format!("{}", err);
    assert!(display.contains("cache corrupt"));
    assert!(display.contains("13"));
}

#[test]
fn test_io_error_display() {
    let err = Error::Io("permission denied".to_string());
    let display = format!("{}", err);
    assert!(display.contains("I/O error"));
    assert!(display.contains("permission denied"));
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::Config("test".to_string());
    // Verify Error implements std::error::Error trait
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let err1 = Error::Compile("test".to_string());
    assert!(format!("{:?}", err1).contains("Compile"));

    let err2 = Error::Cache("test".to_string());
    assert!(format!("{:?}", err2).contains("Cache"));

    let err3 = Error::Config("test".to_string());
    assert!(format!("{:?}", err3).contains("Config"));
}

#[test]
fn test_error_clone() {
    let err1 = Error::Io("test".to_string());
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

// ============================================================================
// MACRO TESTS
// ============================================================================

#[test]
fn test_jasper_err_builds_variant() {
    let err = crate::jasper_err!(Compile, "jasper::tests", "stage {} failed", "Vertex");
    match err {
        Error::Compile(msg) => assert_eq!(msg, "stage Vertex failed"),
        other => panic!("unexpected variant: {:?}", other),
    }
}

#[test]
fn test_jasper_bail_returns_early() {
    fn failing() -> Result<u32> {
        crate::jasper_bail!(Config, "jasper::tests", "unsupported environment");
        #[allow(unreachable_code)]
        Ok(0)
    }

    let result = failing();
    assert!(matches!(result, Err(Error::Config(_))));
}
