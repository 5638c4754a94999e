//! PII pattern detection
//!
//! [`PatternRegistry`] holds the ordered set of compiled patterns (the
//! built-in catalog plus custom rules) and [`Detector`] turns a registry and
//! a piece of text into non-overlapping [`PiiMatch`]es.

pub mod catalog;
pub mod detector;
pub mod error;
pub mod registry;
pub mod types;
pub mod validators;

pub use catalog::{BuiltinPattern, BUILTIN_PATTERNS};
pub use detector::{
    DetectionLimits, Detector, DEFAULT_MAX_INPUT_BYTES, DEFAULT_MAX_MATCHES_PER_PATTERN,
};
pub use error::{PiiError, PiiResult};
pub use registry::{MatchCheck, PatternRegistry, PatternSpec, CUSTOM_RULE_SIZE_LIMIT};
pub use types::{
    ConfidenceScore, DetectionMethod, PatternCategory, PiiMatch, PiiMatchBuilder, Region,
};
