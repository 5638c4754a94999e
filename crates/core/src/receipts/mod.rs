//! Audit receipts
//!
//! A [`Receipt`] proves that one governance decision was applied to one
//! input/output pair without keeping either text: only their SHA-256 digests
//! are recorded.

mod generator;

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tork_common::privacy::sha256_hex;

pub use generator::{ReceiptGenerator, ReceiptRequest, RECEIPT_ID_PREFIX};

use crate::governance::GovernanceAction;

/// Which side of a model call was governed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Input,
    Output,
}

impl Direction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of one governance call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// `rcpt_` followed by 32 lowercase hex characters.
    pub receipt_id: String,
    pub timestamp: DateTime<Utc>,
    /// SHA-256 of the exact input bytes, lowercase hex.
    pub input_hash: String,
    /// SHA-256 of the exact output bytes, lowercase hex.
    pub output_hash: String,
    pub policy_version: String,
    pub action: GovernanceAction,
    pub direction: Direction,
    /// Detected types, sorted.
    pub pii_types: Vec<String>,
    pub pii_count: usize,
    pub processing_time_ns: u64,
}

impl Receipt {
    /// True when `input` and `output` are the exact texts this receipt was
    /// issued for.
    pub fn verify(&self, input: &str, output: &str) -> bool {
        sha256_hex(input.as_bytes()) == self.input_hash
            && sha256_hex(output.as_bytes()) == self.output_hash
    }

    /// ISO-8601 timestamp with microsecond precision and a `Z` suffix.
    pub fn timestamp_iso(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
    }
}
