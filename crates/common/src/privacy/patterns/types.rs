use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Category a PII pattern belongs to
///
/// Categories are the unit of per-category action overrides in governance
/// policy, so their serialized names are part of the configuration format.
///
/// # Examples
/// ```
/// use tork_common::privacy::patterns::PatternCategory;
///
/// let category: PatternCategory = "healthcare".parse().unwrap();
/// assert_eq!(category, PatternCategory::Healthcare);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternCategory {
    /// Person-level national identifiers (SSN, TFN, NINO, ...)
    National,
    /// Licences, business and tax registrations issued by a state
    RegionalGovernment,
    Financial,
    Healthcare,
    Biometric,
    /// Contact and network identifiers valid everywhere
    Universal,
    /// User-registered patterns
    Custom,
}

impl PatternCategory {
    pub const ALL: [PatternCategory; 7] = [
        Self::National,
        Self::RegionalGovernment,
        Self::Financial,
        Self::Healthcare,
        Self::Biometric,
        Self::Universal,
        Self::Custom,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::National => "national",
            Self::RegionalGovernment => "regional_government",
            Self::Financial => "financial",
            Self::Healthcare => "healthcare",
            Self::Biometric => "biometric",
            Self::Universal => "universal",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PatternCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown pattern category '{s}'"))
    }
}

/// Jurisdiction a pattern is specific to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Us,
    Au,
    Eu,
    Uk,
    Global,
}

impl Region {
    pub const ALL: [Region; 5] = [Self::Us, Self::Au, Self::Eu, Self::Uk, Self::Global];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Us => "us",
            Self::Au => "au",
            Self::Eu => "eu",
            Self::Uk => "uk",
            Self::Global => "global",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|region| region.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown region '{s}'"))
    }
}

/// How sure the detector is about a match, in `[0.0, 1.0]`.
///
/// Built-ins get one of the tier constants. A checksum-validated match is
/// certain.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct ConfidenceScore(f64);

impl ConfidenceScore {
    pub const GENERIC: Self = Self(0.5);
    pub const STRUCTURED: Self = Self(0.8);
    pub const CUSTOM: Self = Self(0.8);
    pub const LABELLED: Self = Self(0.9);
    pub const VALIDATED: Self = Self(1.0);

    /// Clamps `score` into `[0.0, 1.0]`.
    pub fn new(score: f64) -> Self {
        debug_assert!(score.is_finite(), "confidence must be finite");
        Self(score.clamp(0.0, 1.0))
    }

    pub const fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<f64> for ConfidenceScore {
    fn from(score: f64) -> Self {
        Self::new(score)
    }
}

/// How a match was confirmed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// Regular expression alone
    Regex,
    /// Regular expression plus a checksum or structural validator
    ChecksumValidation,
    /// A user-registered rule
    Custom,
}

impl fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regex => write!(f, "Regex"),
            Self::ChecksumValidation => write!(f, "Checksum Validation"),
            Self::Custom => write!(f, "Custom"),
        }
    }
}

/// One detected PII occurrence
///
/// Offsets are byte offsets into the scanned text and always fall on char
/// boundaries. A match lives for the duration of one governance call.
///
/// # Examples
/// ```
/// use tork_common::privacy::patterns::{PatternCategory, PiiMatch, Region};
///
/// let m = PiiMatch::builder()
///     .pii_type("email")
///     .category(PatternCategory::Universal)
///     .region(Region::Global)
///     .value("user@example.com")
///     .position(10, 26)
///     .build()
///     .unwrap();
/// assert_eq!(m.len(), 16);
/// ```
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct PiiMatch {
    pub pii_type: String,
    pub category: PatternCategory,
    pub region: Region,
    pub start: usize,
    pub end: usize,
    pub value: String,
    pub confidence: ConfidenceScore,
    pub detection_method: DetectionMethod,
}

impl PiiMatch {
    pub fn builder() -> PiiMatchBuilder {
        PiiMatchBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the two half-open spans share at least one byte.
    pub fn overlaps_with(&self, other: &PiiMatch) -> bool {
        !(self.end <= other.start || other.end <= self.start)
    }
}

impl fmt::Debug for PiiMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PiiMatch")
            .field("pii_type", &self.pii_type)
            .field("value", &"[REDACTED]")
            .field("position", &format!("{}..{}", self.start, self.end))
            .field("category", &self.category)
            .field("region", &self.region)
            .field("confidence", &self.confidence)
            .field("detection_method", &self.detection_method)
            .finish()
    }
}

#[derive(Default)]
pub struct PiiMatchBuilder {
    pii_type: Option<String>,
    category: Option<PatternCategory>,
    region: Option<Region>,
    start: Option<usize>,
    end: Option<usize>,
    value: Option<String>,
    confidence: Option<ConfidenceScore>,
    detection_method: Option<DetectionMethod>,
}

impl PiiMatchBuilder {
    pub fn pii_type<S: Into<String>>(mut self, pii_type: S) -> Self {
        self.pii_type = Some(pii_type.into());
        self
    }

    pub fn category(mut self, category: PatternCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn value<S: Into<String>>(mut self, value: S) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn position(mut self, start: usize, end: usize) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn confidence(mut self, confidence: ConfidenceScore) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn detection_method(mut self, method: DetectionMethod) -> Self {
        self.detection_method = Some(method);
        self
    }

    pub fn build(self) -> Result<PiiMatch, &'static str> {
        let pii_type = self.pii_type.ok_or("pii_type is required")?;
        let value = self.value.ok_or("value is required")?;
        let start = self.start.ok_or("start is required")?;
        let end = self.end.ok_or("end is required")?;

        if start >= end {
            return Err("start must be less than end");
        }

        Ok(PiiMatch {
            pii_type,
            category: self.category.unwrap_or(PatternCategory::Custom),
            region: self.region.unwrap_or(Region::Global),
            start,
            end,
            value,
            confidence: self.confidence.unwrap_or(ConfidenceScore::STRUCTURED),
            detection_method: self.detection_method.unwrap_or(DetectionMethod::Regex),
        })
    }
}

impl fmt::Debug for PiiMatchBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PiiMatchBuilder")
            .field("pii_type", &self.pii_type)
            .field("value", &if self.value.is_some() { "[REDACTED]" } else { "None" })
            .field("position", &format!("{:?}..{:?}", self.start, self.end))
            .finish()
    }
}
