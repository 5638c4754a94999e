use thiserror::Error;

use crate::error::{CommonError, ErrorSeverity};
use crate::{impl_error_classification, impl_error_conversion};

/// Errors raised while building a pattern registry or scanning text
#[derive(Debug, Error)]
pub enum PiiError {
    #[error(transparent)]
    Common(#[from] CommonError),

    #[error("Invalid pattern '{name}': {reason}")]
    InvalidPattern { name: String, reason: String },

    #[error("Pattern '{0}' is already registered")]
    DuplicatePattern(String),

    #[error("Invalid pattern name '{0}': expected lowercase letters, digits and underscores")]
    InvalidPatternName(String),

    #[error("Input of {len} bytes exceeds the {max} byte limit")]
    InputTooLarge { len: usize, max: usize },

    #[error("Pattern '{pattern}' produced more than {limit} candidates")]
    MatchBudgetExceeded { pattern: String, limit: usize },
}

pub type PiiResult<T> = Result<T, PiiError>;

impl PiiError {
    /// True for errors raised while registering patterns rather than while
    /// scanning.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidPattern { .. } | Self::DuplicatePattern(_) | Self::InvalidPatternName(_)
        ) || matches!(self, Self::Common(CommonError::Config { .. }))
    }
}

impl_error_conversion!(PiiError, Common);

impl_error_classification!(PiiError, Common,
    Self::InvalidPattern { .. } => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    Self::DuplicatePattern(_) => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    Self::InvalidPatternName(_) => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    Self::InputTooLarge { .. } => {
        retryable: false,
        severity: ErrorSeverity::Warning,
        critical: false,
    },
    Self::MatchBudgetExceeded { .. } => {
        retryable: false,
        severity: ErrorSeverity::Critical,
        critical: true,
    }
);

impl From<PiiError> for CommonError {
    fn from(err: PiiError) -> Self {
        match err {
            PiiError::Common(e) => e,
            PiiError::InvalidPattern { name, reason } => {
                CommonError::config_field(name, format!("Invalid pattern: {}", reason))
            }
            PiiError::DuplicatePattern(name) => {
                CommonError::config_field(name, "Duplicate pattern")
            }
            PiiError::InvalidPatternName(name) => {
                CommonError::validation("pattern_name", format!("Invalid name '{}'", name))
            }
            other => CommonError::internal(other.to_string()),
        }
    }
}
