//! Engine configuration
//!
//! [`TorkConfig`] is fixed when an engine is built. To change policy, build
//! a new engine.

pub mod loader;

use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tork_common::privacy::patterns::DetectionLimits;
use tork_common::privacy::{HashConfig, PatternCategory, PatternRegistry, PatternSpec, Region};
use tracing::warn;

pub use loader::{load, load_from_env, load_from_file, probe_config_paths};

use crate::errors::{TorkError, TorkResult};
use crate::governance::GovernanceAction;

pub const DEFAULT_POLICY_VERSION: &str = "1.0.0";

/// A user rule, either the bare rule text or a table with options.
///
/// ```toml
/// [custom_patterns]
/// employee_id = 'EMP-\d{6}'
/// email = { pattern = '\b\w+@corp\.example\b', override_builtin = true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomPattern {
    Rule(String),
    Detailed {
        pattern: String,
        #[serde(default)]
        redaction: Option<String>,
        /// Replace a built-in with the same name instead of failing.
        #[serde(default)]
        override_builtin: bool,
    },
}

impl CustomPattern {
    pub fn rule(&self) -> &str {
        match self {
            Self::Rule(rule) => rule,
            Self::Detailed { pattern, .. } => pattern,
        }
    }

    pub fn redaction(&self) -> Option<&str> {
        match self {
            Self::Rule(_) => None,
            Self::Detailed { redaction, .. } => redaction.as_deref(),
        }
    }

    pub fn overrides_builtin(&self) -> bool {
        matches!(self, Self::Detailed { override_builtin: true, .. })
    }
}

impl From<&str> for CustomPattern {
    fn from(rule: &str) -> Self {
        Self::Rule(rule.to_string())
    }
}

/// Policy for one engine instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TorkConfig {
    /// Copied into every receipt.
    pub policy_version: String,
    pub default_action: GovernanceAction,
    /// Scanned before every built-in, in name order.
    pub custom_patterns: BTreeMap<String, CustomPattern>,
    /// Pattern id -> action. Most specific override.
    pub pattern_actions: BTreeMap<String, GovernanceAction>,
    /// Category name -> action.
    pub category_actions: BTreeMap<String, GovernanceAction>,
    /// Built-in regions to load. Empty loads all; `global` patterns always
    /// load.
    pub regions: Vec<Region>,
    pub hashing: HashConfig,
    pub limits: DetectionLimits,
}

impl Default for TorkConfig {
    fn default() -> Self {
        Self {
            policy_version: DEFAULT_POLICY_VERSION.to_string(),
            default_action: GovernanceAction::Redact,
            custom_patterns: BTreeMap::new(),
            pattern_actions: BTreeMap::new(),
            category_actions: BTreeMap::new(),
            regions: Vec::new(),
            hashing: HashConfig::default(),
            limits: DetectionLimits::default(),
        }
    }
}

impl TorkConfig {
    pub fn builder() -> TorkConfigBuilder {
        TorkConfigBuilder::new()
    }

    /// Checks everything that can be checked without compiling rules.
    ///
    /// # Errors
    ///
    /// [`TorkError::Config`] for an empty policy version, an invalid custom
    /// name or empty rule, an unknown category, an empty salt or a zero
    /// limit.
    pub fn validate(&self) -> TorkResult<()> {
        if self.policy_version.trim().is_empty() {
            return Err(TorkError::config("policy_version must not be empty"));
        }
        for (name, custom) in &self.custom_patterns {
            if !is_pattern_name(name) {
                return Err(TorkError::config(format!(
                    "Invalid custom pattern name '{}': expected [a-z][a-z0-9_]*",
                    name
                )));
            }
            if custom.rule().trim().is_empty() {
                return Err(TorkError::config(format!(
                    "Custom pattern '{}' has an empty rule",
                    name
                )));
            }
        }
        self.parsed_category_actions()?;
        self.hashing.validate()?;
        if self.limits.max_input_bytes == 0 || self.limits.max_matches_per_pattern == 0 {
            return Err(TorkError::config("Detection limits must be greater than zero"));
        }
        Ok(())
    }

    /// Category overrides keyed by parsed category.
    pub fn parsed_category_actions(&self) -> TorkResult<HashMap<PatternCategory, GovernanceAction>> {
        self.category_actions
            .iter()
            .map(|(name, action)| {
                PatternCategory::from_str(name)
                    .map(|category| (category, *action))
                    .map_err(|_| TorkError::config(format!("Unknown pattern category '{}'", name)))
            })
            .collect()
    }

    /// Validates the config and compiles the merged pattern registry.
    ///
    /// # Errors
    ///
    /// [`TorkError::Config`] when [`validate`](Self::validate) fails, when a
    /// custom rule does not compile or collides with a built-in without
    /// `override_builtin`, or when `pattern_actions` names a pattern that is
    /// not active.
    pub fn build_registry(&self) -> TorkResult<PatternRegistry> {
        self.validate()?;

        let mut registry = PatternRegistry::builtin_for_regions(&self.regions)?;
        for (name, custom) in &self.custom_patterns {
            let spec = PatternSpec::custom(name, custom.rule(), custom.redaction())?;
            if custom.overrides_builtin() {
                registry.register_override(spec)?;
            } else {
                registry.register(spec)?;
            }
        }

        if let Some(unknown) = self.pattern_actions.keys().find(|id| !registry.contains(id)) {
            warn!(pattern = %unknown, "pattern action names no active pattern");
            return Err(TorkError::config(format!(
                "pattern_actions names unknown or inactive pattern '{}'",
                unknown
            )));
        }

        Ok(registry)
    }
}

fn is_pattern_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Builder for [`TorkConfig`].
#[derive(Debug, Default)]
pub struct TorkConfigBuilder {
    config: TorkConfig,
}

impl TorkConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy_version<S: Into<String>>(mut self, version: S) -> Self {
        self.config.policy_version = version.into();
        self
    }

    pub fn default_action(mut self, action: GovernanceAction) -> Self {
        self.config.default_action = action;
        self
    }

    pub fn custom_pattern<N: Into<String>, P: Into<CustomPattern>>(
        mut self,
        name: N,
        pattern: P,
    ) -> Self {
        self.config.custom_patterns.insert(name.into(), pattern.into());
        self
    }

    pub fn pattern_action<S: Into<String>>(mut self, pattern: S, action: GovernanceAction) -> Self {
        self.config.pattern_actions.insert(pattern.into(), action);
        self
    }

    pub fn category_action(mut self, category: PatternCategory, action: GovernanceAction) -> Self {
        self.config.category_actions.insert(category.as_str().to_string(), action);
        self
    }

    pub fn region(mut self, region: Region) -> Self {
        if !self.config.regions.contains(&region) {
            self.config.regions.push(region);
        }
        self
    }

    pub fn hashing(mut self, hashing: HashConfig) -> Self {
        self.config.hashing = hashing;
        self
    }

    pub fn limits(mut self, limits: DetectionLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Validates and returns the config.
    pub fn build(self) -> TorkResult<TorkConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // Serde
    // ========================================================================

    /// Validates `TorkConfig` deserialization for the mixed custom pattern
    /// forms scenario.
    ///
    /// Assertions:
    /// - Confirms bare rules and detailed tables both parse.
    /// - Confirms omitted fields take their defaults.
    #[test]
    fn test_deserialize_custom_forms() {
        let config: TorkConfig = serde_json::from_str(
            r#"{
                "policy_version": "2024.06",
                "default_action": "hash",
                "custom_patterns": {
                    "employee_id": "EMP-\\d{6}",
                    "badge": { "pattern": "BDG-\\d{4}", "redaction": "[BADGE]" }
                },
                "category_actions": { "financial": "block" }
            }"#,
        )
        .unwrap();

        assert_eq!(config.policy_version, "2024.06");
        assert_eq!(config.default_action, GovernanceAction::Hash);
        assert_eq!(config.custom_patterns["employee_id"].rule(), r"EMP-\d{6}");
        assert_eq!(config.custom_patterns["badge"].redaction(), Some("[BADGE]"));
        assert!(!config.custom_patterns["badge"].overrides_builtin());
        assert!(config.regions.is_empty());
        assert_eq!(config.limits, DetectionLimits::default());
        assert!(config.validate().is_ok());
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validates `TorkConfig::validate` behavior for the rejected fields
    /// scenario.
    ///
    /// Assertions:
    /// - Ensures each invalid field fails with `TorkError::Config`.
    #[test]
    fn test_validate_rejections() {
        let cases: Vec<TorkConfig> = vec![
            TorkConfig { policy_version: "  ".into(), ..Default::default() },
            TorkConfig {
                custom_patterns: BTreeMap::from([("Bad-Name".to_string(), CustomPattern::from("X"))]),
                ..Default::default()
            },
            TorkConfig {
                custom_patterns: BTreeMap::from([("blank".to_string(), CustomPattern::from(""))]),
                ..Default::default()
            },
            TorkConfig {
                category_actions: BTreeMap::from([("galactic".to_string(), GovernanceAction::Allow)]),
                ..Default::default()
            },
            TorkConfig {
                hashing: HashConfig { org_salt: String::new(), ..Default::default() },
                ..Default::default()
            },
            TorkConfig {
                limits: DetectionLimits { max_input_bytes: 0, ..Default::default() },
                ..Default::default()
            },
        ];
        for config in cases {
            assert!(matches!(config.validate(), Err(TorkError::Config(_))), "{:?}", config);
        }
    }

    /// Validates `TorkConfig::build_registry` behavior for the collision and
    /// override scenario.
    ///
    /// Assertions:
    /// - Ensures a custom pattern named like a built-in fails.
    /// - Confirms `override_builtin` replaces it instead.
    #[test]
    fn test_build_registry_collision() {
        let colliding = TorkConfig::builder().custom_pattern("email", r"\w+@corp\.io").build().unwrap();
        assert!(matches!(colliding.build_registry(), Err(TorkError::Config(_))));

        let overriding = TorkConfig::builder()
            .custom_pattern(
                "email",
                CustomPattern::Detailed {
                    pattern: r"\w+@corp\.io".into(),
                    redaction: None,
                    override_builtin: true,
                },
            )
            .build()
            .unwrap();
        let registry = overriding.build_registry().unwrap();
        assert_eq!(registry.all()[0].id(), "email");
        assert!(!registry.all()[0].is_builtin());
    }

    /// Validates `TorkConfig::build_registry` behavior for the inactive
    /// pattern action scenario.
    ///
    /// Assertions:
    /// - Ensures an action for a pattern filtered out by region fails.
    /// - Ensures a malformed custom rule fails.
    #[test]
    fn test_build_registry_rejects_unknown_actions_and_bad_rules() {
        let inactive = TorkConfig::builder()
            .region(Region::Uk)
            .pattern_action("ssn", GovernanceAction::Allow)
            .build()
            .unwrap();
        assert!(matches!(inactive.build_registry(), Err(TorkError::Config(_))));

        let malformed = TorkConfig::builder().custom_pattern("bad", r"(unclosed").build().unwrap();
        assert!(matches!(malformed.build_registry(), Err(TorkError::Config(_))));
    }

    /// Validates `TorkConfigBuilder` for the category action scenario.
    ///
    /// Assertions:
    /// - Confirms category keys are stored by name and parse back.
    #[test]
    fn test_builder_category_action() {
        let config = TorkConfig::builder()
            .category_action(PatternCategory::Healthcare, GovernanceAction::Block)
            .region(Region::Us)
            .region(Region::Us)
            .build()
            .unwrap();
        assert_eq!(config.regions, vec![Region::Us]);
        let parsed = config.parsed_category_actions().unwrap();
        assert_eq!(parsed.get(&PatternCategory::Healthcare), Some(&GovernanceAction::Block));
    }
}
