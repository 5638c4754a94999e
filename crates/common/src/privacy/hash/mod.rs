//! Secure hashing
//!
//! Salted one-way digests used to pseudonymize detected values, plus the
//! plain SHA-256 fingerprint used for receipts.

pub mod config;
pub mod error;
pub mod hasher;

pub use config::{HashAlgorithm, HashConfig};
pub use error::{HashError, HashResult};
pub use hasher::{sha256_hex, SecureHasher};
