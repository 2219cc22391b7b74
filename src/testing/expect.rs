//! Assertions for workflow tests
//!
//! Each helper returns `Error::TestAssertion` naming the checked value,
//! so a failing step reads like "routine detail name: expected ..., got ...".

use std::fmt::Debug;

use crate::clients::ApiResponse;
use crate::common::{Error, Result};

/// `actual == expected`
pub fn expect_eq<T: PartialEq + Debug>(what: &str, actual: T, expected: T) -> Result<()> {
    if actual != expected {
        return Err(Error::assertion(format!(
            "{}: expected {:?}, got {:?}",
            what, expected, actual
        )));
    }
    Ok(())
}

/// The response carries the expected HTTP status
pub fn expect_status<T>(what: &str, response: &ApiResponse<T>, expected: u16) -> Result<()> {
    if response.status != expected {
        return Err(Error::assertion(format!(
            "{}: expected status {}, got {}",
            what, expected, response.status
        )));
    }
    Ok(())
}

/// `haystack` contains `needle`
pub fn expect_contains(what: &str, haystack: &str, needle: &str) -> Result<()> {
    if !haystack.contains(needle) {
        return Err(Error::assertion(format!(
            "{}: expected '{}' to contain '{}'",
            what, haystack, needle
        )));
    }
    Ok(())
}

pub fn expect_true(what: &str, condition: bool) -> Result<()> {
    if !condition {
        return Err(Error::assertion(format!("{}: expected true", what)));
    }
    Ok(())
}

/// The value is present; hands it back for the next step
pub fn expect_some<T>(what: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| Error::assertion(format!("{}: expected a value, got none", what)))
}
