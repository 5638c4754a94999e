//! Error taxonomy for governance calls

use thiserror::Error;
use tork_common::error::{CommonError, ErrorSeverity};
use tork_common::privacy::{HashError, PiiError};
use tork_common::{impl_error_classification, impl_error_conversion};

/// Errors surfaced by the engine to its immediate caller.
///
/// Configuration problems surface when the engine is built. A
/// [`TorkError::PolicyViolation`] is raised by a governance call and means
/// no output or receipt was produced for that call.
#[derive(Debug, Error)]
pub enum TorkError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Policy violation: blocked PII types [{}]", .types.join(", "))]
    PolicyViolation { types: Vec<String> },

    #[error("Detection error: {0}")]
    Detection(String),
}

pub type TorkResult<T> = Result<T, TorkError>;

impl TorkError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn is_policy_violation(&self) -> bool {
        matches!(self, Self::PolicyViolation { .. })
    }

    /// The PII types that triggered a block, sorted and deduplicated.
    pub fn blocked_types(&self) -> Option<&[String]> {
        match self {
            Self::PolicyViolation { types } => Some(types),
            _ => None,
        }
    }
}

impl From<PiiError> for TorkError {
    fn from(err: PiiError) -> Self {
        if err.is_configuration() {
            return Self::Config(err.to_string());
        }
        match err {
            PiiError::Common(common) => Self::Common(common),
            other => Self::Detection(other.to_string()),
        }
    }
}

impl From<HashError> for TorkError {
    fn from(err: HashError) -> Self {
        match err {
            HashError::ConfigurationError(_) => Self::Config(err.to_string()),
            HashError::Common(common) => Self::Common(common),
            other => Self::Common(CommonError::internal_with_context(other.to_string(), "hashing")),
        }
    }
}

impl_error_conversion!(TorkError, Common);

impl_error_classification!(TorkError, Common,
    Self::Config(_) => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    Self::PolicyViolation { .. } => {
        retryable: false,
        severity: ErrorSeverity::Warning,
        critical: false,
    },
    Self::Detection(_) => {
        retryable: false,
        severity: ErrorSeverity::Critical,
        critical: true,
    }
);
