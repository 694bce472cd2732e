//! Citation-to-confidence heuristic and citation label formatting.
//!
//! The backend's retrieval score is a distance (unbounded, smaller is
//! better, no fixed scale) while the timeline needs a bounded percentage.
//! This module maps the best distance of a turn's citations into a clamped
//! confidence value and buckets it into the three display bands the meter
//! renders with.
//!
//! The mapping never returns below 0.5 (an answer was produced) and never
//! reaches 1.0 (no answer is certain). "Citations present but unscored" is
//! a distinct, slightly-more-confident default than "no citations at all".

use crate::models::Citation;

/// Confidence when a turn carries no citations at all.
pub const NO_CITATION_CONFIDENCE: f64 = 0.5;

/// Confidence when citations exist but none carries a distance score.
pub const UNSCORED_CONFIDENCE: f64 = 0.6;

/// Hard bounds on the displayed confidence fraction.
pub const MIN_CONFIDENCE: f64 = 0.5;
pub const MAX_CONFIDENCE: f64 = 0.98;

/// How many citation labels are shown inline under an assistant turn.
pub const INLINE_CITATION_LIMIT: usize = 3;

/// Map a turn's citations to a display confidence in `[0.5, 0.98]`.
///
/// The best (minimum) distance among scored citations drives the value:
/// `0.95 - min(0.35, max(0, d) * 0.25)`, so `d <= 0` yields `0.95` and the
/// penalty saturates once `d >= 1.4`, flooring at `0.60` before clamping.
///
/// Total over every input shape: malformed or missing data falls back to a
/// fixed default rather than an error.
pub fn estimate_confidence(citations: Option<&[Citation]>) -> f64 {
    let citations = match citations {
        Some(c) if !c.is_empty() => c,
        _ => return NO_CITATION_CONFIDENCE,
    };

    let d = match citations.iter().filter_map(|c| c.score).reduce(f64::min) {
        Some(d) => d,
        None => return UNSCORED_CONFIDENCE,
    };

    let conf = 0.95 - f64::min(0.35, f64::max(0.0, d) * 0.25);
    conf.clamp(MIN_CONFIDENCE, MAX_CONFIDENCE)
}

/// Round a confidence fraction to a whole display percentage.
pub fn confidence_percent(value: f64) -> u32 {
    (value * 100.0).round() as u32
}

/// Display band for a confidence value. The percentage thresholds (85, 70)
/// decide which of the three meter colors a turn renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    /// Bucket a confidence fraction by its rounded percentage.
    pub fn from_fraction(value: f64) -> Self {
        let pct = confidence_percent(value);
        if pct >= 85 {
            Self::High
        } else if pct >= 70 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Short bracketed label for one citation: `"[section; p. N]"`.
///
/// Uses only the fields that are present; a citation with neither section
/// nor page yields an empty string, which callers drop before joining
/// labels with spaces.
pub fn format_citation_label(citation: &Citation) -> String {
    let mut parts = Vec::with_capacity(2);
    if let Some(section) = &citation.section {
        parts.push(section.clone());
    }
    if let Some(page) = citation.page {
        parts.push(format!("p. {page}"));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!("[{}]", parts.join("; "))
    }
}

/// Inline citation line for a timeline entry: first three non-empty labels
/// joined with spaces. Empty string when nothing is labelable.
pub fn inline_citation_labels(citations: &[Citation]) -> String {
    citations
        .iter()
        .take(INLINE_CITATION_LIMIT)
        .map(format_citation_label)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
