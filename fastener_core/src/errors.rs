//! # Error Types
//!
//! Structured error types for fastener_core. These errors carry enough
//! context to be handled programmatically by report tooling and by the
//! app-facing dataset pipeline.
//!
//! ## Example
//!
//! ```rust
//! use fastener_core::errors::{RefError, RefResult};
//!
//! fn validate_pct(pct: f64) -> RefResult<()> {
//!     if !(0.0..=1.0).contains(&pct) {
//!         return Err(RefError::InvalidInput {
//!             field: "pct".to_string(),
//!             value: pct.to_string(),
//!             reason: "Target fraction must be within 0..=1".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for fastener_core operations
pub type RefResult<T> = Result<T, RefError>;

/// Structured error type for reference-data and computation operations.
///
/// Each variant provides specific context about what went wrong so
/// callers can branch on the failure instead of parsing a message.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum RefError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A diameter token could not be parsed.
    ///
    /// Diameter tokens are operator-curated, so a malformed token is a
    /// defect in the data, not a condition to tolerate at runtime.
    #[error("Malformed diameter token '{token}': {reason}")]
    DiameterParse { token: String, reason: String },

    /// Grade key not recognized by the reference tables
    #[error("Unknown grade: {grade_key}")]
    UnknownGrade { grade_key: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Dataset file is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Dataset schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl RefError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RefError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a DiameterParse error
    pub fn diameter_parse(token: impl Into<String>, reason: impl Into<String>) -> Self {
        RefError::DiameterParse {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Create an UnknownGrade error
    pub fn unknown_grade(grade_key: impl Into<String>) -> Self {
        RefError::UnknownGrade {
            grade_key: grade_key.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        RefError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        RefError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RefError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            RefError::InvalidInput { .. } => "INVALID_INPUT",
            RefError::DiameterParse { .. } => "DIAMETER_PARSE",
            RefError::UnknownGrade { .. } => "UNKNOWN_GRADE",
            RefError::FileError { .. } => "FILE_ERROR",
            RefError::FileLocked { .. } => "FILE_LOCKED",
            RefError::SerializationError { .. } => "SERIALIZATION_ERROR",
            RefError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
