//! Error types for rigup operations.
//!
//! This module defines [`RigupError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration and validation errors are fatal and surface before any
//!   provisioning step runs
//! - Step errors are mapped to a `Failed` outcome by the runner; whether
//!   that halts the run depends on [`Step::required`](crate::steps::Step::required)
//! - Use `anyhow::Error` (via `RigupError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for rigup operations.
#[derive(Debug, Error)]
pub enum RigupError {
    /// The machine is not running a supported operating system.
    #[error("Unsupported operating system: {os} (rigup only provisions macOS)")]
    UnsupportedOs { os: String },

    /// Name or email was not supplied in non-interactive mode.
    #[error("Missing {field}: pass --{field} when running with --non-interactive")]
    MissingIdentity { field: &'static str },

    /// Email does not look like `local@domain.tld`.
    #[error("Invalid email address: {email}")]
    InvalidEmail { email: String },

    /// Name is empty or whitespace.
    #[error("Name must not be empty")]
    InvalidName,

    /// Python version is not `X.Y.Z`.
    #[error("Invalid Python version '{version}': expected X.Y.Z")]
    InvalidPythonVersion { version: String },

    /// Profile file passed with `--profile` does not exist.
    #[error("Profile not found: {path}")]
    ProfileNotFound { path: PathBuf },

    /// Profile file could not be parsed.
    #[error("Failed to parse profile at {path}: {message}")]
    ProfileParse { path: PathBuf, message: String },

    /// Two steps in a plan share a name.
    #[error("Duplicate step name in plan: {name}")]
    DuplicateStep { name: String },

    /// Step action failed.
    #[error("Step '{step}' failed: {message}")]
    StepFailed { step: String, message: String },

    /// External command exited non-zero or could not be spawned.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// Download failed.
    #[error("Network error fetching {url}: {message}")]
    Network { url: String, message: String },

    /// A retried operation failed on every attempt.
    #[error("{operation} failed after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        last_error: String,
    },

    /// Interactive prompt could not be shown or answered.
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RigupError {
    /// Shorthand for a [`RigupError::StepFailed`].
    pub fn step(step: &str, message: impl Into<String>) -> Self {
        Self::StepFailed {
            step: step.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for rigup operations.
pub type Result<T> = std::result::Result<T, RigupError>;
