// Salted pseudonymization of detected values

use sha2::{Digest, Sha256, Sha384, Sha512};

use super::config::{HashAlgorithm, HashConfig};
use super::error::{HashError, HashResult};

/// Lowercase hex SHA-256 of `data`, unsalted.
pub fn sha256_hex(data: &[u8]) -> String {
    hex_digest::<Sha256>(&[data])
}

fn hex_digest<D: Digest>(parts: &[&[u8]]) -> String {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    hex::encode(hasher.finalize())
}

/// Salted one-way hasher behind the `hash` governance action.
///
/// The digest covers `value || org_salt`, so equal values hash equally under
/// one salt and unrelated under another.
#[derive(Debug, Clone)]
pub struct SecureHasher {
    config: HashConfig,
}

impl SecureHasher {
    pub fn with_config(config: HashConfig) -> HashResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    /// Salted digest of `value` as lowercase hex.
    pub fn hash_value(&self, value: &str) -> HashResult<String> {
        if value.is_empty() {
            return Err(HashError::EmptyValue);
        }

        let parts = [value.as_bytes(), self.config.org_salt.as_bytes()];
        Ok(match self.config.algorithm {
            HashAlgorithm::Sha256 => hex_digest::<Sha256>(&parts),
            HashAlgorithm::Sha384 => hex_digest::<Sha384>(&parts),
            HashAlgorithm::Sha512 => hex_digest::<Sha512>(&parts),
        })
    }

    /// First `len` hex characters of [`hash_value`](Self::hash_value).
    pub fn short_digest(&self, value: &str, len: usize) -> HashResult<String> {
        let mut digest = self.hash_value(value)?;
        if len == 0 || len > digest.len() {
            return Err(HashError::DigestLength { requested: len, available: digest.len() });
        }
        digest.truncate(len);
        Ok(digest)
    }
}
