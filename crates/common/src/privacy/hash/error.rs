use thiserror::Error;

use crate::error::{CommonError, ErrorSeverity};
use crate::impl_error_classification;

/// Failures building or using a [`SecureHasher`](super::SecureHasher).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HashError {
    /// Empty salt or zero salt length.
    #[error("Hash configuration error: {0}")]
    ConfigurationError(String),

    #[error("Cannot hash an empty value")]
    EmptyValue,

    #[error("Digest length {requested} is outside 1..={available}")]
    DigestLength { requested: usize, available: usize },

    #[error(transparent)]
    Common(#[from] CommonError),
}

pub type HashResult<T> = Result<T, HashError>;

impl_error_classification!(HashError, Common,
    Self::ConfigurationError(_) => {
        retryable: false,
        severity: ErrorSeverity::Error,
        critical: false,
    },
    Self::EmptyValue | Self::DigestLength { .. } => {
        retryable: false,
        severity: ErrorSeverity::Critical,
        critical: true,
    }
);
