//! Pattern registry
//!
//! A [`PatternRegistry`] is the ordered, merged set of patterns one engine
//! scans with. Custom patterns sit in front of the built-ins so that a
//! user-registered identifier wins every overlap.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use regex::{Regex, RegexBuilder};
use tracing::{debug, instrument};

use super::catalog::{BuiltinPattern, BUILTIN_PATTERNS};
use super::error::{PiiError, PiiResult};
use super::types::{ConfidenceScore, DetectionMethod, PatternCategory, Region};

/// Compiled-program ceiling for user rules.
pub const CUSTOM_RULE_SIZE_LIMIT: usize = 1 << 20;
const CUSTOM_RULE_DFA_LIMIT: usize = 1 << 22;

/// Post-match check applied to every regex candidate.
#[derive(Debug, Clone, Copy)]
pub enum MatchCheck {
    None,
    /// Validate capture group 1, or the whole match when the group did not
    /// participate.
    Validate(fn(&str) -> bool),
    ValidateWhole(fn(&str) -> bool),
    /// Inspect `(text, start, end)`; a rejected candidate is retried one
    /// character later.
    Guard(fn(&str, usize, usize) -> bool),
}

/// One compiled pattern. Immutable once built.
pub struct PatternSpec {
    id: String,
    category: PatternCategory,
    region: Region,
    regex: Regex,
    redaction: String,
    confidence: ConfidenceScore,
    method: DetectionMethod,
    check: MatchCheck,
    builtin: bool,
}

impl fmt::Debug for PatternSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSpec")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("region", &self.region)
            .field("redaction", &self.redaction)
            .field("builtin", &self.builtin)
            .finish()
    }
}

impl PatternSpec {
    fn from_builtin(pattern: &BuiltinPattern) -> PiiResult<Self> {
        let regex = Regex::new(pattern.rule).map_err(|e| PiiError::InvalidPattern {
            name: pattern.id.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            id: pattern.id.to_string(),
            category: pattern.category,
            region: pattern.region,
            regex,
            redaction: pattern.redaction.to_string(),
            confidence: ConfidenceScore::new(pattern.confidence),
            method: pattern.method,
            check: pattern.check,
            builtin: true,
        })
    }

    /// Compiles a user-supplied rule.
    ///
    /// The name must match `[a-z][a-z0-9_]*`. The redaction token defaults to
    /// `[NAME_REDACTED]` with the name upper-cased. Rules are compiled with a
    /// bounded program size, and a rule that can match the empty string is
    /// rejected.
    pub fn custom(name: &str, rule: &str, redaction: Option<&str>) -> PiiResult<Self> {
        if !is_valid_name(name) {
            return Err(PiiError::InvalidPatternName(name.to_string()));
        }
        if rule.trim().is_empty() {
            return Err(PiiError::InvalidPattern {
                name: name.to_string(),
                reason: "rule is empty".to_string(),
            });
        }

        let regex = RegexBuilder::new(rule)
            .size_limit(CUSTOM_RULE_SIZE_LIMIT)
            .dfa_size_limit(CUSTOM_RULE_DFA_LIMIT)
            .build()
            .map_err(|e| PiiError::InvalidPattern {
                name: name.to_string(),
                reason: e.to_string(),
            })?;

        if regex.is_match("") {
            return Err(PiiError::InvalidPattern {
                name: name.to_string(),
                reason: "rule matches the empty string".to_string(),
            });
        }

        let redaction = match redaction {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => default_redaction(name),
        };

        Ok(Self {
            id: name.to_string(),
            category: PatternCategory::Custom,
            region: Region::Global,
            regex,
            redaction,
            confidence: ConfidenceScore::CUSTOM,
            method: DetectionMethod::Custom,
            check: MatchCheck::None,
            builtin: false,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> PatternCategory {
        self.category
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// The rule text this pattern was compiled from.
    pub fn rule(&self) -> &str {
        self.regex.as_str()
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn redaction(&self) -> &str {
        &self.redaction
    }

    pub fn confidence(&self) -> ConfidenceScore {
        self.confidence
    }

    pub fn method(&self) -> DetectionMethod {
        self.method
    }

    pub fn check(&self) -> MatchCheck {
        self.check
    }

    pub fn is_builtin(&self) -> bool {
        self.builtin
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn default_redaction(name: &str) -> String {
    format!("[{}_REDACTED]", name.to_ascii_uppercase())
}

static BUILTINS: OnceCell<Vec<Arc<PatternSpec>>> = OnceCell::new();

/// Compiles the built-in catalog once per process.
fn compiled_builtins() -> PiiResult<&'static [Arc<PatternSpec>]> {
    BUILTINS
        .get_or_try_init(|| {
            BUILTIN_PATTERNS
                .iter()
                .map(|pattern| PatternSpec::from_builtin(pattern).map(Arc::new))
                .collect()
        })
        .map(Vec::as_slice)
}

/// Ordered set of active patterns for one engine instance.
///
/// Order is scan priority: custom patterns in registration order, then the
/// built-ins in catalog order.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    specs: Vec<Arc<PatternSpec>>,
    custom_count: usize,
}

impl PatternRegistry {
    /// A registry with no patterns at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every built-in pattern.
    pub fn builtin() -> PiiResult<Self> {
        Self::builtin_for_regions(&[])
    }

    /// Built-ins tagged with one of `regions`, plus every `global` built-in.
    /// An empty slice selects all regions.
    pub fn builtin_for_regions(regions: &[Region]) -> PiiResult<Self> {
        let specs = compiled_builtins()?
            .iter()
            .filter(|spec| {
                regions.is_empty()
                    || spec.region() == Region::Global
                    || regions.contains(&spec.region())
            })
            .cloned()
            .collect();
        Ok(Self { specs, custom_count: 0 })
    }

    /// Adds a custom pattern after any custom patterns already present.
    #[instrument(skip(self, spec), fields(pattern = %spec.id()))]
    pub fn register(&mut self, spec: PatternSpec) -> PiiResult<()> {
        if self.contains(spec.id()) {
            return Err(PiiError::DuplicatePattern(spec.id().to_string()));
        }
        self.specs.insert(self.custom_count, Arc::new(spec));
        self.custom_count += 1;
        debug!(total = self.specs.len(), "registered custom pattern");
        Ok(())
    }

    /// Registers `spec`, replacing any pattern with the same id. The
    /// replacement moves to the custom tier. Returns the replaced pattern.
    #[instrument(skip(self, spec), fields(pattern = %spec.id()))]
    pub fn register_override(&mut self, spec: PatternSpec) -> PiiResult<Option<Arc<PatternSpec>>> {
        let replaced = match self.specs.iter().position(|existing| existing.id() == spec.id()) {
            Some(index) => {
                if index < self.custom_count {
                    self.custom_count -= 1;
                }
                Some(self.specs.remove(index))
            }
            None => None,
        };
        self.register(spec)?;
        debug!(replaced = replaced.is_some(), "registered override");
        Ok(replaced)
    }

    /// Active patterns in scan priority order.
    pub fn all(&self) -> &[Arc<PatternSpec>] {
        &self.specs
    }

    pub fn get(&self, id: &str) -> Option<&Arc<PatternSpec>> {
        self.specs.iter().find(|spec| spec.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.specs.iter().map(|spec| spec.id())
    }

    pub fn custom_count(&self) -> usize {
        self.custom_count
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}
