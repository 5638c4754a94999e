//! Redactor
//!
//! Rewrites the matched spans of a text according to each match's resolved
//! action. Replacements run in descending offset order so earlier offsets
//! stay valid while later spans are rewritten.

use std::collections::BTreeSet;

use tork_common::privacy::{PatternRegistry, SecureHasher};
use tracing::warn;

use crate::errors::{TorkError, TorkResult};
use crate::governance::{GovernanceAction, GovernedMatch};

/// Hex characters of the salted digest embedded in a hash token.
pub const HASH_TOKEN_DIGEST_LEN: usize = 16;

#[derive(Debug, Clone)]
pub struct Redactor {
    hasher: SecureHasher,
}

impl Redactor {
    pub fn new(hasher: SecureHasher) -> Self {
        Self { hasher }
    }

    /// `[TYPE_HASH_<digest>]`, stable for one value under one salt.
    pub fn hash_token(&self, pii_type: &str, value: &str) -> TorkResult<String> {
        let digest = self.hasher.short_digest(value, HASH_TOKEN_DIGEST_LEN)?;
        Ok(format!("[{}_HASH_{}]", pii_type.to_ascii_uppercase(), digest))
    }

    /// Applies every match to `text`.
    ///
    /// `matches` must be non-overlapping. Redaction tokens come from the
    /// pattern in `registry` that produced each match.
    ///
    /// # Errors
    ///
    /// [`TorkError::PolicyViolation`] naming every blocked type when any
    /// match resolved to [`GovernanceAction::Block`]. Nothing is rewritten in
    /// that case.
    pub fn apply(
        &self,
        text: &str,
        matches: &[GovernedMatch],
        registry: &PatternRegistry,
    ) -> TorkResult<String> {
        let blocked: BTreeSet<&str> = matches
            .iter()
            .filter(|m| m.action == GovernanceAction::Block)
            .map(|m| m.detected.pii_type.as_str())
            .collect();
        if !blocked.is_empty() {
            let types: Vec<String> = blocked.into_iter().map(str::to_string).collect();
            warn!(blocked = ?types, "governance call blocked");
            return Err(TorkError::PolicyViolation { types });
        }

        let mut ordered: Vec<&GovernedMatch> = matches.iter().collect();
        ordered.sort_by(|a, b| b.detected.start.cmp(&a.detected.start));

        let mut output = text.to_string();
        for m in ordered {
            let span = m.detected.start..m.detected.end;
            match m.action {
                GovernanceAction::Allow | GovernanceAction::Block => {}
                GovernanceAction::Redact => {
                    let token = registry
                        .get(&m.detected.pii_type)
                        .map(|spec| spec.redaction().to_string())
                        .unwrap_or_else(|| {
                            format!("[{}_REDACTED]", m.detected.pii_type.to_ascii_uppercase())
                        });
                    output.replace_range(span, &token);
                }
                GovernanceAction::Hash => {
                    let token = self.hash_token(&m.detected.pii_type, &m.detected.value)?;
                    output.replace_range(span, &token);
                }
            }
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use tork_common::privacy::{HashConfig, PiiMatch};

    use super::*;

    fn redactor() -> Redactor {
        Redactor::new(SecureHasher::with_config(HashConfig::with_salt("unit-salt").unwrap()).unwrap())
    }

    fn governed(id: &str, text: &str, needle: &str, action: GovernanceAction) -> GovernedMatch {
        let start = text.find(needle).unwrap();
        let detected = PiiMatch::builder()
            .pii_type(id)
            .value(needle)
            .position(start, start + needle.len())
            .build()
            .unwrap();
        GovernedMatch { detected, action }
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Validates `Redactor::apply` behavior for the mixed actions scenario.
    ///
    /// Assertions:
    /// - Confirms redact, hash and allow each rewrite their own span only.
    /// - Confirms surrounding punctuation and whitespace survive verbatim.
    #[test]
    fn test_mixed_actions() {
        let registry = PatternRegistry::builtin().unwrap();
        let text = "mail: a@b.io,  ssn (123-45-6789); ip=10.0.0.1!";
        let matches = vec![
            governed("email", text, "a@b.io", GovernanceAction::Redact),
            governed("ssn", text, "123-45-6789", GovernanceAction::Hash),
            governed("ip_address", text, "10.0.0.1", GovernanceAction::Allow),
        ];

        let output = redactor().apply(text, &matches, &registry).unwrap();
        let hash = redactor().hash_token("ssn", "123-45-6789").unwrap();
        assert_eq!(output, format!("mail: [EMAIL_REDACTED],  ssn ({}); ip=10.0.0.1!", hash));
    }

    /// Validates `Redactor::hash_token` behavior for the correlation
    /// scenario.
    ///
    /// Assertions:
    /// - Confirms equal values share a token and different values do not.
    #[test]
    fn test_hash_token_correlates() {
        let r = redactor();
        let a = r.hash_token("email", "john@example.com").unwrap();
        assert_eq!(a, r.hash_token("email", "john@example.com").unwrap());
        assert_ne!(a, r.hash_token("email", "jane@example.com").unwrap());
        assert!(a.starts_with("[EMAIL_HASH_"));
        assert_eq!(a.len(), "[EMAIL_HASH_]".len() + HASH_TOKEN_DIGEST_LEN);
    }

    /// Validates `Redactor::apply` behavior for the block scenario.
    ///
    /// Assertions:
    /// - Ensures any blocked match fails the call with every blocked type.
    #[test]
    fn test_block_fails_whole_call() {
        let registry = PatternRegistry::builtin().unwrap();
        let text = "x@y.io and 123-45-6789";
        let matches = vec![
            governed("email", text, "x@y.io", GovernanceAction::Redact),
            governed("ssn", text, "123-45-6789", GovernanceAction::Block),
        ];
        let err = redactor().apply(text, &matches, &registry).unwrap_err();
        assert_eq!(err.blocked_types(), Some(&["ssn".to_string()][..]));
    }

    /// Validates `Redactor::apply` behavior for the adjacent spans scenario.
    ///
    /// Assertions:
    /// - Confirms back-to-back spans are both replaced.
    #[test]
    fn test_adjacent_spans() {
        let registry = PatternRegistry::empty();
        let text = "AAABBB";
        let matches = vec![
            governed("alpha", text, "AAA", GovernanceAction::Redact),
            governed("beta", text, "BBB", GovernanceAction::Redact),
        ];
        let output = redactor().apply(text, &matches, &registry).unwrap();
        assert_eq!(output, "[ALPHA_REDACTED][BETA_REDACTED]");
    }

    /// Validates `Redactor::apply` behavior for the multibyte text scenario.
    ///
    /// Assertions:
    /// - Confirms byte offsets after non-ASCII text are honoured.
    #[test]
    fn test_multibyte_offsets() {
        let registry = PatternRegistry::builtin().unwrap();
        let text = "Ünïcødé 🚀 → a@b.io";
        let matches = vec![governed("email", text, "a@b.io", GovernanceAction::Redact)];
        let output = redactor().apply(text, &matches, &registry).unwrap();
        assert_eq!(output, "Ünïcødé 🚀 → [EMAIL_REDACTED]");
    }
}
