//! Shared error types for the Tork governance crates
//!
//! This module provides the error vocabulary every other module builds on.
//!
//! # Error Handling Architecture
//!
//! 1. **`CommonError`**: error shapes that recur across modules
//!    (configuration, serialization, file I/O, validation, internal).
//!
//! 2. **`ErrorClassification` trait**: a uniform way to ask an error whether
//!    it is retryable, how severe it is, and whether it is critical.
//!
//! 3. **`ErrorSeverity` enum**: the severity scale used for logging levels.
//!
//! ## Composition
//!
//! Module-specific errors embed `CommonError` instead of duplicating its
//! variants:
//!
//! ```rust,ignore
//! #[derive(Debug, Error)]
//! pub enum RegistryError {
//!     #[error("Duplicate pattern: {0}")]
//!     Duplicate(String),
//!
//!     #[error(transparent)]
//!     Common(#[from] CommonError),
//! }
//!
//! impl_error_classification!(RegistryError, Common,
//!     Self::Duplicate(_) => {
//!         retryable: false,
//!         severity: ErrorSeverity::Error,
//!         critical: false,
//!     }
//! );
//! ```
//!
//! ## Severity Levels
//!
//! | Level | Use Case | Examples |
//! |-------|----------|----------|
//! | **Info** | Expected conditions | Reserved for module errors |
//! | **Warning** | Caller-visible refusal | Blocked by policy |
//! | **Error** | Needs attention | Invalid config, malformed rule |
//! | **Critical** | Integrity at risk | Matcher budget blown, invariant broken |
//!
//! ## Example
//!
//! ```rust,ignore
//! use tork_common::error::{CommonError, CommonResult};
//!
//! fn read_policy(path: &Path) -> CommonResult<String> {
//!     std::fs::read_to_string(path)
//!         .map_err(|e| CommonError::io_path(path.display().to_string(), e.to_string()))
//! }
//! ```

use std::fmt;
use std::time::Duration;

use thiserror::Error;

pub type CommonResult<T> = Result<T, CommonError>;

/// Failures shared by every Tork module.
///
/// Optional fields narrow the message down to a config field, a wire
/// format, a file or a component. They are also emitted as tracing fields
/// by [`CommonError::as_tracing_fields`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommonError {
    #[error("Configuration error{}: {message}", qualifier("in field", .field))]
    Config { message: String, field: Option<String> },

    #[error("Serialization error{}: {message}", tagged(.format))]
    Serialization { message: String, format: Option<String> },

    /// Reading a policy file failed.
    #[error("I/O error{}: {message}", qualifier("at", .path))]
    Io { message: String, path: Option<String> },

    #[error("Validation error for field '{field}': {message}")]
    Validation { field: String, message: String },

    /// A broken internal invariant. Never caused by caller input.
    #[error("Internal error{}: {message}", qualifier("in", .context))]
    Internal { message: String, context: Option<String> },
}

fn qualifier(label: &str, value: &Option<String>) -> String {
    value.as_ref().map(|v| format!(" {label} '{v}'")).unwrap_or_default()
}

fn tagged(format: &Option<String>) -> String {
    format.as_ref().map(|f| format!(" ({f})")).unwrap_or_default()
}

impl ErrorClassification for CommonError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Io { .. })
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Internal { .. } => ErrorSeverity::Critical,
            _ => ErrorSeverity::Error,
        }
    }

    fn is_critical(&self) -> bool {
        matches!(self, Self::Internal { .. })
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl CommonError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config { message: message.into(), field: None }
    }

    pub fn config_field<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::Config { message: message.into(), field: Some(field.into()) }
    }

    pub fn serialization<S: Into<String>>(message: S) -> Self {
        Self::Serialization { message: message.into(), format: None }
    }

    /// Serialization error tagged with its wire format, e.g. `JSON`.
    pub fn serialization_format<F: Into<String>, S: Into<String>>(format: F, message: S) -> Self {
        Self::Serialization { message: message.into(), format: Some(format.into()) }
    }

    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io { message: message.into(), path: None }
    }

    pub fn io_path<P: Into<String>, S: Into<String>>(path: P, message: S) -> Self {
        Self::Io { message: message.into(), path: Some(path.into()) }
    }

    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal { message: message.into(), context: None }
    }

    /// Internal error naming the component that detected it.
    pub fn internal_with_context<S: Into<String>, C: Into<String>>(message: S, context: C) -> Self {
        Self::Internal { message: message.into(), context: Some(context.into()) }
    }

    /// Key/value pairs for structured `tracing` fields. Messages are left
    /// out since they may quote rule text.
    pub fn as_tracing_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![("severity", self.severity().to_string())];
        let detail = match self {
            Self::Config { field: Some(field), .. } | Self::Validation { field, .. } => {
                Some(("field", field))
            }
            Self::Serialization { format: Some(format), .. } => Some(("format", format)),
            Self::Io { path: Some(path), .. } => Some(("path", path)),
            Self::Internal { context: Some(context), .. } => Some(("context", context)),
            _ => None,
        };
        fields.extend(detail.map(|(key, value)| (key, value.clone())));
        fields
    }
}

/// Standard interface for classifying errors
///
/// Every error type in the workspace implements this so callers can make
/// uniform logging and retry decisions.
pub trait ErrorClassification {
    /// Check if this error is retryable
    fn is_retryable(&self) -> bool;

    /// Get the error severity level
    fn severity(&self) -> ErrorSeverity;

    /// Check if this is a critical error requiring immediate attention
    fn is_critical(&self) -> bool;

    /// Get the suggested retry delay if applicable
    fn retry_after(&self) -> Option<Duration>;
}

/// Error severity levels for monitoring and alerting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational, typically for debugging
    Info,
    /// Warning, should be monitored but not critical
    Warning,
    /// Error, requires attention and action
    Error,
    /// Critical, immediate action required
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

// Standard conversions from common error types
impl From<serde_json::Error> for CommonError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization_format("JSON", err.to_string())
    }
}

impl From<std::io::Error> for CommonError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<toml::de::Error> for CommonError {
    fn from(err: toml::de::Error) -> Self {
        Self::serialization_format("TOML", err.to_string())
    }
}

/// Utility macro for creating error conversions from std types
///
/// ```rust,ignore
/// #[derive(Debug, thiserror::Error)]
/// pub enum MyError {
///     #[error(transparent)]
///     Common(#[from] CommonError),
/// }
///
/// impl_error_conversion!(MyError, Common);
/// ```
///
/// This generates `From<serde_json::Error>` and `From<std::io::Error>`
/// routed through `CommonError`.
#[macro_export]
macro_rules! impl_error_conversion {
    ($error_type:ty, $variant:ident) => {
        impl From<serde_json::Error> for $error_type {
            fn from(err: serde_json::Error) -> Self {
                Self::$variant($crate::error::CommonError::from(err))
            }
        }

        impl From<std::io::Error> for $error_type {
            fn from(err: std::io::Error) -> Self {
                Self::$variant($crate::error::CommonError::from(err))
            }
        }
    };
}

/// Macro to implement ErrorClassification by delegating to CommonError
///
/// ```rust,ignore
/// impl_error_classification!(MyError, Common,
///     Self::Specific(_) => {
///         retryable: false,
///         severity: ErrorSeverity::Error,
///         critical: false,
///     }
/// );
/// ```
#[macro_export]
macro_rules! impl_error_classification {
    (
        $error_type:ty,
        $common_variant:ident
        $(,
            $variant:pat => {
                retryable: $retryable:expr,
                severity: $severity:expr,
                critical: $critical:expr
                $(, retry_after: $retry_after:expr)?
                $(,)?
            }
        )*
        $(,)?
    ) => {
        impl $crate::error::ErrorClassification for $error_type {
            fn is_retryable(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_retryable(e),
                    $(
                        $variant => $retryable,
                    )*
                }
            }

            fn severity(&self) -> $crate::error::ErrorSeverity {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::severity(e),
                    $(
                        $variant => $severity,
                    )*
                }
            }

            fn is_critical(&self) -> bool {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::is_critical(e),
                    $(
                        $variant => $critical,
                    )*
                }
            }

            fn retry_after(&self) -> Option<std::time::Duration> {
                match self {
                    Self::$common_variant(e) => $crate::error::ErrorClassification::retry_after(e),
                    $(
                        $(
                            $variant => $retry_after,
                        )?
                    )*
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}
