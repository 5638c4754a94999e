use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use rand::{thread_rng, Rng};
use tork_common::privacy::sha256_hex;

use super::{Direction, Receipt};
use crate::governance::GovernanceAction;

pub const RECEIPT_ID_PREFIX: &str = "rcpt_";
const RECEIPT_ID_HEX_LEN: usize = 32;
const NONCE_BYTES: usize = 16;

/// Everything a receipt records about one call, borrowed from the caller.
#[derive(Debug, Clone)]
pub struct ReceiptRequest<'a> {
    pub input: &'a str,
    pub output: &'a str,
    pub action: GovernanceAction,
    pub direction: Direction,
    pub pii_types: Vec<String>,
    pub pii_count: usize,
    pub processing_time: Duration,
}

/// Issues receipts stamped with one policy version.
#[derive(Debug, Clone)]
pub struct ReceiptGenerator {
    policy_version: String,
}

impl ReceiptGenerator {
    pub fn new<S: Into<String>>(policy_version: S) -> Self {
        Self { policy_version: policy_version.into() }
    }

    pub fn policy_version(&self) -> &str {
        &self.policy_version
    }

    /// Builds the receipt for one call.
    ///
    /// The id is derived from the input digest, the timestamp and a fresh
    /// random nonce, so it is unique per call and reveals nothing about the
    /// text.
    pub fn issue(&self, request: ReceiptRequest<'_>) -> Receipt {
        let timestamp = Utc::now();
        let input_hash = sha256_hex(request.input.as_bytes());
        let output_hash = sha256_hex(request.output.as_bytes());

        let nonce: [u8; NONCE_BYTES] = thread_rng().gen();
        let seed = format!(
            "{}{}{}",
            input_hash,
            timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true),
            hex::encode(nonce)
        );
        let mut digest = sha256_hex(seed.as_bytes());
        digest.truncate(RECEIPT_ID_HEX_LEN);

        let mut pii_types = request.pii_types;
        pii_types.sort();
        pii_types.dedup();

        Receipt {
            receipt_id: format!("{}{}", RECEIPT_ID_PREFIX, digest),
            timestamp,
            input_hash,
            output_hash,
            policy_version: self.policy_version.clone(),
            action: request.action,
            direction: request.direction,
            pii_types,
            pii_count: request.pii_count,
            processing_time_ns: u64::try_from(request.processing_time.as_nanos())
                .unwrap_or(u64::MAX),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn request<'a>(input: &'a str, output: &'a str) -> ReceiptRequest<'a> {
        ReceiptRequest {
            input,
            output,
            action: GovernanceAction::Redact,
            direction: Direction::Input,
            pii_types: vec!["ssn".into(), "email".into(), "ssn".into()],
            pii_count: 3,
            processing_time: Duration::from_micros(250),
        }
    }

    /// Validates `ReceiptGenerator::issue` behavior for the hash stability
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms both digests equal SHA-256 of the exact texts.
    /// - Confirms `verify` accepts the pair and rejects a tampered output.
    #[test]
    fn test_hashes_and_verify() {
        let generator = ReceiptGenerator::new("2.1.0");
        let receipt = generator.issue(request("SSN 123-45-6789", "SSN [SSN_REDACTED]"));

        assert_eq!(receipt.input_hash, sha256_hex(b"SSN 123-45-6789"));
        assert_eq!(receipt.output_hash, sha256_hex(b"SSN [SSN_REDACTED]"));
        assert_eq!(receipt.policy_version, "2.1.0");
        assert!(receipt.verify("SSN 123-45-6789", "SSN [SSN_REDACTED]"));
        assert!(!receipt.verify("SSN 123-45-6789", "SSN 123-45-6789"));
    }

    /// Validates `ReceiptGenerator::issue` behavior for the id format and
    /// uniqueness scenario.
    ///
    /// Assertions:
    /// - Confirms `rcpt_` plus 32 lowercase hex characters.
    /// - Ensures identical calls get distinct ids.
    #[test]
    fn test_receipt_id_format_and_uniqueness() {
        let generator = ReceiptGenerator::new("1.0.0");
        let ids: HashSet<_> =
            (0..200).map(|_| generator.issue(request("same", "same")).receipt_id).collect();
        assert_eq!(ids.len(), 200);

        for id in ids {
            let hex = id.strip_prefix(RECEIPT_ID_PREFIX).unwrap();
            assert_eq!(hex.len(), RECEIPT_ID_HEX_LEN);
            assert!(hex.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        }
    }

    /// Validates `ReceiptGenerator::issue` behavior for the recorded metadata
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms types are sorted and deduplicated.
    /// - Confirms the processing time is recorded in nanoseconds.
    #[test]
    fn test_metadata() {
        let receipt = ReceiptGenerator::new("1.0.0").issue(request("a", "b"));
        assert_eq!(receipt.pii_types, vec!["email".to_string(), "ssn".to_string()]);
        assert_eq!(receipt.pii_count, 3);
        assert_eq!(receipt.processing_time_ns, 250_000);
        assert_eq!(receipt.direction, Direction::Input);
        assert!(receipt.timestamp_iso().ends_with('Z'));
    }

    /// Validates `Receipt` serde for the audit export scenario.
    ///
    /// Assertions:
    /// - Confirms a JSON round trip preserves the receipt.
    #[test]
    fn test_receipt_json() {
        let receipt = ReceiptGenerator::new("1.0.0").issue(request("a", "b"));
        let json = serde_json::to_string(&receipt).unwrap();
        assert!(json.contains("\"action\":\"redact\""));
        let back: Receipt = serde_json::from_str(&json).unwrap();
        assert_eq!(back, receipt);
    }
}
