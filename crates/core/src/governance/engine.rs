//! Governance engine
//!
//! Composes detection, per-match policy resolution, redaction and receipt
//! issuance into one call. Everything up to the receipt is computed without
//! holding a lock; the ledger mutex only guards the final append of one
//! receipt and one stats update.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::time::Instant;

use parking_lot::Mutex;
use tork_common::privacy::{Detector, PatternCategory, PatternRegistry, PiiMatch, SecureHasher};
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{GovernOptions, GovernanceAction, GovernanceResult, GovernanceStats, GovernedMatch, PiiReport};
use crate::config::TorkConfig;
use crate::errors::TorkResult;
use crate::receipts::{Receipt, ReceiptGenerator, ReceiptRequest};
use crate::redaction::Redactor;

/// Per-instance mutable state.
#[derive(Debug, Default)]
struct Ledger {
    receipts: Vec<Receipt>,
    stats: GovernanceStats,
}

/// An independently configured governance instance.
///
/// `Engine` is `Send + Sync`; share it behind an `Arc` to govern from many
/// threads at once. The policy is fixed at construction, so changing it
/// means building a new engine.
pub struct Engine {
    id: Uuid,
    config: TorkConfig,
    registry: PatternRegistry,
    detector: Detector,
    redactor: Redactor,
    receipts: ReceiptGenerator,
    category_actions: HashMap<PatternCategory, GovernanceAction>,
    ledger: Mutex<Ledger>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("id", &self.id)
            .field("policy_version", &self.config.policy_version)
            .field("patterns", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Builds an engine from `config`, compiling every active pattern.
    ///
    /// # Errors
    ///
    /// [`TorkError::Config`](crate::TorkError::Config) when the config is
    /// invalid, a custom rule does not compile, or a custom name collides
    /// with a built-in without `override_builtin`.
    #[instrument(skip(config), fields(policy_version = %config.policy_version))]
    pub fn new(config: TorkConfig) -> TorkResult<Self> {
        let registry = config.build_registry()?;
        let category_actions = config.parsed_category_actions()?;
        let redactor = Redactor::new(SecureHasher::with_config(config.hashing.clone())?);
        let engine = Self {
            id: Uuid::new_v4(),
            detector: Detector::new(config.limits),
            receipts: ReceiptGenerator::new(config.policy_version.clone()),
            registry,
            redactor,
            category_actions,
            ledger: Mutex::new(Ledger::default()),
            config,
        };

        info!(
            engine = %engine.id,
            patterns = engine.registry.len(),
            custom = engine.registry.custom_count(),
            "governance engine ready"
        );
        Ok(engine)
    }

    /// Engine over every built-in pattern with the default policy.
    pub fn with_defaults() -> TorkResult<Self> {
        Self::new(TorkConfig::default())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &TorkConfig {
        &self.config
    }

    pub fn registry(&self) -> &PatternRegistry {
        &self.registry
    }

    /// Active pattern ids in scan priority order.
    pub fn supported_types(&self) -> Vec<&str> {
        self.registry.ids().collect()
    }

    /// Governs `text` as model input with the configured policy.
    pub fn govern(&self, text: &str) -> TorkResult<GovernanceResult> {
        self.govern_with(text, &GovernOptions::input())
    }

    pub fn govern_input(&self, text: &str) -> TorkResult<GovernanceResult> {
        self.govern_with(text, &GovernOptions::input())
    }

    pub fn govern_output(&self, text: &str) -> TorkResult<GovernanceResult> {
        self.govern_with(text, &GovernOptions::output())
    }

    /// Detects, resolves, rewrites and records one call.
    ///
    /// On success exactly one receipt is appended and the stats are updated.
    /// On failure nothing is recorded.
    ///
    /// # Errors
    ///
    /// - [`TorkError::PolicyViolation`](crate::TorkError::PolicyViolation)
    ///   when any match resolves to `block`.
    /// - [`TorkError::Detection`](crate::TorkError::Detection) when the input
    ///   or a pattern exceeds the configured detection limits.
    #[instrument(
        skip(self, text, options),
        fields(engine = %self.id, direction = %options.direction, len = text.len())
    )]
    pub fn govern_with(&self, text: &str, options: &GovernOptions) -> TorkResult<GovernanceResult> {
        let started = Instant::now();
        let default_action = options.default_action.unwrap_or(self.config.default_action);

        let matches: Vec<GovernedMatch> = self
            .detector
            .detect(&self.registry, text)?
            .into_iter()
            .map(|detected| {
                let action = self.resolve_action(&detected, default_action);
                GovernedMatch { detected, action }
            })
            .collect();

        let output = self.redactor.apply(text, &matches, &self.registry)?;
        let action = matches.iter().map(|m| m.action).max().unwrap_or(GovernanceAction::Allow);
        let types: BTreeSet<String> =
            matches.iter().map(|m| m.detected.pii_type.clone()).collect();

        let report =
            PiiReport { types, count: matches.len(), matches, redacted_text: output.clone() };

        let receipt = self.receipts.issue(ReceiptRequest {
            input: text,
            output: &output,
            action,
            direction: options.direction,
            pii_types: report.types.iter().cloned().collect(),
            pii_count: report.count,
            processing_time: started.elapsed(),
        });

        let call_stats = GovernanceStats::for_call(&report, action, receipt.processing_time_ns);
        let logged = receipt.clone();
        {
            let mut ledger = self.ledger.lock();
            ledger.stats.merge(&call_stats);
            ledger.receipts.push(logged);
        }

        debug!(
            receipt_id = %receipt.receipt_id,
            pii_count = report.count,
            action = %action,
            "governance call complete"
        );
        Ok(GovernanceResult { action, output, pii: report, receipt })
    }

    /// The action for one match: pattern override, then category override,
    /// then `default_action`.
    pub fn resolve_action(
        &self,
        detected: &PiiMatch,
        default_action: GovernanceAction,
    ) -> GovernanceAction {
        self.config
            .pattern_actions
            .get(&detected.pii_type)
            .or_else(|| self.category_actions.get(&detected.category))
            .copied()
            .unwrap_or(default_action)
    }

    /// Snapshot of the counters since creation or the last reset.
    pub fn get_stats(&self) -> GovernanceStats {
        self.ledger.lock().stats.clone()
    }

    /// Zeroes the counters. Receipts are kept.
    pub fn reset_stats(&self) {
        self.ledger.lock().stats = GovernanceStats::default();
    }

    /// Snapshot of every receipt issued since creation or the last
    /// [`clear_receipts`](Self::clear_receipts), in call order.
    pub fn receipts(&self) -> Vec<Receipt> {
        self.ledger.lock().receipts.clone()
    }

    pub fn receipt_count(&self) -> usize {
        self.ledger.lock().receipts.len()
    }

    /// Drops the receipt log and returns how many receipts it held.
    pub fn clear_receipts(&self) -> usize {
        let cleared = std::mem::take(&mut self.ledger.lock().receipts);
        debug!(engine = %self.id, cleared = cleared.len(), "receipt log cleared");
        cleared.len()
    }
}
