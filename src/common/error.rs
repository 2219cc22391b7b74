//! Error types for xq-keeper
//!
//! Error messages are meant to be read by whoever is running the suite,
//! with hints on how to resolve common issues.

use std::io;
use std::time::Duration;
use thiserror::Error;

use crate::clients::ApiError;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the launcher, the runner and workflow tests
#[derive(Error, Debug)]
pub enum Error {
    // === Launcher Errors ===
    #[error("Test runner not found. Searched: {searched}")]
    RunnerNotFound { searched: String },

    #[error("Error running test runner: {0}")]
    Spawn(#[source] io::Error),

    #[error("Option '{0}' requires a value")]
    MissingFlagValue(String),

    // === Runner Errors ===
    #[error("Project(s) \"{requested}\" not found. Available projects: \"{available}\"")]
    ProjectNotFound { requested: String, available: String },

    #[error("Invalid --grep pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("'only' is forbidden in CI, found in: {0}")]
    ForbiddenOnly(String),

    #[error("No report found at {0}. Run 'xq-keeper test' first")]
    ReportNotFound(String),

    #[error("'{command}' is not supported: {reason}")]
    Unsupported { command: String, reason: String },

    // === Test Errors ===
    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Test assertion failed: {0}")]
    TestAssertion(String),

    #[error("Test timeout of {}ms exceeded", .0.as_millis())]
    Timeout(Duration),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("Failed to write file '{path}': {error}")]
    FileWrite { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a runner not found error with the locations that were tried
    pub fn runner_not_found<S: AsRef<str>>(searched: &[S]) -> Self {
        Self::RunnerNotFound {
            searched: searched
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Create an unsupported command error
    pub fn unsupported(command: &str, reason: &str) -> Self {
        Self::Unsupported {
            command: command.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an assertion error
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::TestAssertion(message.into())
    }

    /// The structured API error response carried by this error, if any
    pub fn api_response(&self) -> Option<(u16, &str)> {
        match self {
            Error::Api(ApiError::Response { status, body }) => Some((*status, body.as_str())),
            _ => None,
        }
    }
}
