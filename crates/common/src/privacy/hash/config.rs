use std::fmt;

use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};

use super::error::{HashError, HashResult};

const DEFAULT_SALT_LENGTH: usize = 32;

/// Salt and digest settings for the `hash` governance action.
///
/// The salt is part of the policy: two engines built from the same
/// `HashConfig` produce the same pseudonym for the same value.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashConfig {
    pub org_salt: String,
    pub salt_length: usize,
    pub algorithm: HashAlgorithm,
}

impl fmt::Debug for HashConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashConfig")
            .field("org_salt", &"[REDACTED]")
            .field("salt_length", &self.salt_length)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Sha256,
    Sha384,
    Sha512,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            org_salt: random_salt(DEFAULT_SALT_LENGTH),
            salt_length: DEFAULT_SALT_LENGTH,
            algorithm: HashAlgorithm::Sha256,
        }
    }
}

impl HashConfig {
    /// Random salt of the default length for `algorithm`.
    pub fn with_algorithm(algorithm: HashAlgorithm) -> HashResult<Self> {
        Self::with_algorithm_and_salt_length(algorithm, DEFAULT_SALT_LENGTH)
    }

    /// `salt_length` random bytes, hex-encoded into `org_salt`.
    pub fn with_algorithm_and_salt_length(
        algorithm: HashAlgorithm,
        salt_length: usize,
    ) -> HashResult<Self> {
        if salt_length == 0 {
            return Err(HashError::ConfigurationError("Salt length cannot be zero".to_string()));
        }
        Ok(Self { org_salt: random_salt(salt_length), salt_length, algorithm })
    }

    /// Fixed-salt config, for deployments that must correlate pseudonyms
    /// across processes.
    pub fn with_salt<S: Into<String>>(salt: S) -> HashResult<Self> {
        let mut config = Self::default();
        config.set_org_salt(salt.into())?;
        Ok(config)
    }

    pub fn set_org_salt(&mut self, salt: String) -> HashResult<()> {
        if salt.is_empty() {
            return Err(HashError::ConfigurationError("Salt cannot be empty".to_string()));
        }
        self.org_salt = salt;
        Ok(())
    }

    /// Rejects configs a hasher cannot be built from.
    pub fn validate(&self) -> HashResult<()> {
        if self.org_salt.is_empty() {
            return Err(HashError::ConfigurationError("Organization salt must be set".to_string()));
        }
        Ok(())
    }
}

fn random_salt(length: usize) -> String {
    let mut bytes = vec![0u8; length];
    thread_rng().fill(bytes.as_mut_slice());
    hex::encode(bytes)
}
