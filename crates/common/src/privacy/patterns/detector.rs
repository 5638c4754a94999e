//! Detector
//!
//! Patterns run in registry order against a scan view of the input. Every
//! accepted span is masked in the view by a bracketed placeholder of the same
//! byte length, so later patterns only search the gaps between accepted spans
//! and see a masked neighbour the way they would see a redaction token.
//!
//! A span accepted by a lower-priority pattern can change the context of a
//! gap that a higher-priority pattern already searched, for instance by
//! removing a digit that blocked a boundary check. Detection therefore runs
//! in rounds: each round re-searches, per pattern, only the gaps next to
//! spans added since that pattern last ran, and detection ends after a round
//! that adds nothing. At that point no pattern matches anywhere in the
//! redacted text, which is what makes redaction idempotent.
//!
//! Spans are half-open byte ranges, so directly adjacent matches never
//! overlap.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::{PiiError, PiiResult};
use super::registry::{MatchCheck, PatternRegistry, PatternSpec};
use super::types::PiiMatch;

pub const DEFAULT_MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_MAX_MATCHES_PER_PATTERN: usize = 10_000;

/// Work bounds for a single detection pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionLimits {
    pub max_input_bytes: usize,
    /// Regex candidates one pattern may produce across all rounds of one
    /// call, counted before validation.
    pub max_matches_per_pattern: usize,
}

impl Default for DetectionLimits {
    fn default() -> Self {
        Self {
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            max_matches_per_pattern: DEFAULT_MAX_MATCHES_PER_PATTERN,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Detector {
    limits: DetectionLimits,
}

impl Detector {
    pub fn new(limits: DetectionLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> DetectionLimits {
        self.limits
    }

    /// Returns the non-overlapping matches in `text`, sorted by start offset.
    ///
    /// Empty and whitespace-only input yields no matches.
    ///
    /// # Errors
    ///
    /// [`PiiError::InputTooLarge`] when `text` exceeds `max_input_bytes`, and
    /// [`PiiError::MatchBudgetExceeded`] when one pattern produces more
    /// candidates than `max_matches_per_pattern`.
    #[instrument(skip(self, registry, text), fields(len = text.len(), patterns = registry.len()))]
    pub fn detect(&self, registry: &PatternRegistry, text: &str) -> PiiResult<Vec<PiiMatch>> {
        if text.len() > self.limits.max_input_bytes {
            return Err(PiiError::InputTooLarge {
                len: text.len(),
                max: self.limits.max_input_bytes,
            });
        }
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let patterns = registry.all();
        let mut spans = SpanMap::new(text);
        let mut produced = vec![0usize; patterns.len()];
        let mut last_scan: Vec<Option<u64>> = vec![None; patterns.len()];
        let mut step = 0u64;
        let mut rounds = 0usize;

        loop {
            rounds += 1;
            let before = spans.len();

            for (priority, spec) in patterns.iter().enumerate() {
                let gaps = spans.gaps(last_scan[priority]);
                last_scan[priority] = Some(step);
                if gaps.is_empty() {
                    step += 1;
                    continue;
                }

                let mut found = Vec::new();
                for gap in gaps {
                    self.scan(spec, spans.view(), gap, &mut produced[priority], &mut found)?;
                }
                for range in found {
                    spans.accept(spec, range, step);
                }
                step += 1;
            }

            if spans.len() == before {
                break;
            }
        }

        let matches = spans.into_matches();
        debug!(rounds, kept = matches.len(), "detection pass complete");
        Ok(matches)
    }

    /// Appends the accepted candidates for one pattern inside `gap`.
    ///
    /// The search never reads past `gap.end`. Boundary assertions and guards
    /// still see the masked characters around the gap.
    fn scan(
        &self,
        spec: &PatternSpec,
        view: &str,
        gap: Range<usize>,
        produced: &mut usize,
        found: &mut Vec<Range<usize>>,
    ) -> PiiResult<()> {
        let regex = spec.regex();
        let haystack = &view[..gap.end];
        let mut locations = regex.capture_locations();
        let mut pos = gap.start;

        while pos <= haystack.len() {
            let Some(whole) = regex.captures_read_at(&mut locations, haystack, pos) else {
                break;
            };
            let (start, end) = (whole.start(), whole.end());
            if start == end {
                pos = next_char_boundary(haystack, end);
                continue;
            }

            *produced += 1;
            if *produced > self.limits.max_matches_per_pattern {
                return Err(PiiError::MatchBudgetExceeded {
                    pattern: spec.id().to_string(),
                    limit: self.limits.max_matches_per_pattern,
                });
            }

            let accepted = match spec.check() {
                MatchCheck::None => true,
                MatchCheck::Validate(validator) => {
                    let (s, e) = locations.get(1).unwrap_or((start, end));
                    validator(&haystack[s..e])
                }
                MatchCheck::ValidateWhole(validator) => validator(&haystack[start..end]),
                MatchCheck::Guard(guard) => {
                    if !guard(view, start, end) {
                        pos = next_char_boundary(haystack, start);
                        continue;
                    }
                    true
                }
            };

            if accepted {
                found.push(start..end);
            }
            pos = end;
        }

        Ok(())
    }
}

/// Byte offset of the character after the one at `pos`.
fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map_or(pos + 1, |c| pos + c.len_utf8())
}

/// Placeholder written over an accepted span in the scan view.
///
/// Same byte length as the span, so offsets in the view stay offsets in the
/// input. Bracketed like a redaction token: no built-in rule consumes `[` or
/// `]`, and the underscores form one word run with no inner boundary.
fn mask(len: usize) -> String {
    match len {
        0 => String::new(),
        1 => "]".to_string(),
        _ => format!("[{}]", "_".repeat(len - 2)),
    }
}

struct Accepted {
    end: usize,
    /// Detection step that accepted the span.
    step: u64,
    found: PiiMatch,
}

/// Accepted spans keyed by start offset, plus the masked scan view.
struct SpanMap<'a> {
    text: &'a str,
    view: String,
    spans: BTreeMap<usize, Accepted>,
}

impl<'a> SpanMap<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, view: text.to_string(), spans: BTreeMap::new() }
    }

    fn len(&self) -> usize {
        self.spans.len()
    }

    fn view(&self) -> &str {
        &self.view
    }

    /// Unclaimed ranges that a pattern last run at `since` still has to
    /// search: all of them on the first run, afterwards only those bordering
    /// a span accepted at or after `since`.
    fn gaps(&self, since: Option<u64>) -> Vec<Range<usize>> {
        let touched = |step: Option<u64>| match (since, step) {
            (None, _) => true,
            (Some(since), Some(step)) => step >= since,
            (Some(_), None) => false,
        };

        let mut gaps = Vec::new();
        let mut cursor = 0;
        let mut left = None;
        for (&start, span) in &self.spans {
            if start > cursor && (touched(left) || touched(Some(span.step))) {
                gaps.push(cursor..start);
            }
            cursor = span.end;
            left = Some(span.step);
        }
        if self.text.len() > cursor && touched(left) {
            gaps.push(cursor..self.text.len());
        }
        gaps
    }

    fn accept(&mut self, spec: &PatternSpec, range: Range<usize>, step: u64) {
        let found = PiiMatch {
            pii_type: spec.id().to_string(),
            category: spec.category(),
            region: spec.region(),
            start: range.start,
            end: range.end,
            value: self.text[range.clone()].to_string(),
            confidence: spec.confidence(),
            detection_method: spec.method(),
        };
        self.view.replace_range(range.clone(), &mask(range.len()));
        self.spans.insert(range.start, Accepted { end: range.end, step, found });
    }

    fn into_matches(self) -> Vec<PiiMatch> {
        self.spans.into_values().map(|span| span.found).collect()
    }
}
