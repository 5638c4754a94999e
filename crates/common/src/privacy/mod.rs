//! Privacy primitives
//!
//! Salted hashing for pseudonymized values and PII pattern detection.

pub mod hash;
pub mod patterns;

pub use hash::{sha256_hex, HashAlgorithm, HashConfig, HashError, HashResult, SecureHasher};
pub use patterns::{
    Detector, PatternCategory, PatternRegistry, PatternSpec, PiiError, PiiMatch, PiiResult,
    Region,
};
