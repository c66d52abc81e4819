//! Shared types for the risk analysis pipeline.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::classifier::InferenceScores;
use crate::pipeline::pattern::PatternHistogram;

// ── Email record ────────────────────────────────────────────────────

/// Canonical form of one mail-provider message.
///
/// Built once per batch by the normalizer, immutable thereafter.
/// Identity is the provider-assigned `id` — every downstream lookup is
/// keyed by it, never by position in a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailRecord {
    /// Provider-assigned message identifier.
    pub id: String,
    /// `From` header, or `"unknown"` when absent.
    pub sender: String,
    /// `Subject` header, or `"(no subject)"` when absent.
    pub subject: String,
    /// Plain-text body content, HTML already stripped.
    pub body_text: String,
    /// Parsed `Date` header; `None` means "unknown date" and is
    /// excluded from temporal aggregation.
    pub timestamp: Option<DateTime<FixedOffset>>,
}

// ── Verdicts ────────────────────────────────────────────────────────

/// Classification outcome for one email.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictLabel {
    Phishing,
    Safe,
    /// The classification attempt failed or timed out.
    Indeterminate,
}

impl VerdictLabel {
    /// Short label for logging and display.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Phishing => "phishing",
            Self::Safe => "safe",
            Self::Indeterminate => "indeterminate",
        }
    }
}

/// The classifier's judgment of a single email, keyed by email id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationVerdict {
    /// The email this verdict judges — a foreign key into the batch's
    /// record set, never a positional index.
    pub email_id: String,
    /// Raw scores, absent when the request did not complete.
    pub scores: Option<InferenceScores>,
    pub label: VerdictLabel,
}

impl ClassificationVerdict {
    /// Verdict from a completed classification.
    pub fn judged(email_id: impl Into<String>, scores: InferenceScores) -> Self {
        let label = if scores.phishing > scores.not_phishing {
            VerdictLabel::Phishing
        } else {
            VerdictLabel::Safe
        };
        Self {
            email_id: email_id.into(),
            scores: Some(scores),
            label,
        }
    }

    /// Verdict for a failed or timed-out classification.
    pub fn indeterminate(email_id: impl Into<String>) -> Self {
        Self {
            email_id: email_id.into(),
            scores: None,
            label: VerdictLabel::Indeterminate,
        }
    }

    pub fn is_judged(&self) -> bool {
        self.label != VerdictLabel::Indeterminate
    }
}

/// All verdicts for one settled batch, keyed by email id.
#[derive(Debug, Clone, PartialEq)]
pub struct VerdictSet {
    generation: u64,
    by_id: HashMap<String, ClassificationVerdict>,
}

impl VerdictSet {
    pub fn new(generation: u64, verdicts: Vec<ClassificationVerdict>) -> Self {
        let by_id = verdicts
            .into_iter()
            .map(|v| (v.email_id.clone(), v))
            .collect();
        Self { generation, by_id }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn get(&self, email_id: &str) -> Option<&ClassificationVerdict> {
        self.by_id.get(email_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassificationVerdict> {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

// ── Batch ───────────────────────────────────────────────────────────

/// One atomic unit of ingested-and-classified emails.
///
/// Published to consumers only as a whole, after every classification
/// request has settled. Never mutated — a new batch is a new value.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Monotonically increasing tag distinguishing successive batches.
    pub generation: u64,
    pub emails: Vec<EmailRecord>,
    pub verdicts: VerdictSet,
    /// Aggregate score in [0, 100]; higher is safer.
    pub risk_score: f64,
    pub histogram: PatternHistogram,
}

impl Batch {
    /// Verdict for one email, resolved by identity.
    pub fn verdict_for(&self, email_id: &str) -> Option<&ClassificationVerdict> {
        self.verdicts.get(email_id)
    }

    /// Label for one email; absent verdicts read as indeterminate.
    pub fn label_for(&self, email_id: &str) -> VerdictLabel {
        self.verdicts
            .get(email_id)
            .map(|v| v.label)
            .unwrap_or(VerdictLabel::Indeterminate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn judged_verdict_label_derivation() {
        let phishing = ClassificationVerdict::judged(
            "m1",
            InferenceScores {
                phishing: 0.9,
                not_phishing: 0.1,
            },
        );
        assert_eq!(phishing.label, VerdictLabel::Phishing);

        let safe = ClassificationVerdict::judged(
            "m2",
            InferenceScores {
                phishing: 0.1,
                not_phishing: 0.9,
            },
        );
        assert_eq!(safe.label, VerdictLabel::Safe);
    }

    #[test]
    fn tied_scores_read_as_safe() {
        let verdict = ClassificationVerdict::judged(
            "m1",
            InferenceScores {
                phishing: 0.5,
                not_phishing: 0.5,
            },
        );
        assert_eq!(verdict.label, VerdictLabel::Safe);
    }

    #[test]
    fn indeterminate_verdict_has_no_scores() {
        let verdict = ClassificationVerdict::indeterminate("m1");
        assert!(verdict.scores.is_none());
        assert!(!verdict.is_judged());
    }

    #[test]
    fn verdict_set_lookup_by_id() {
        let set = VerdictSet::new(
            1,
            vec![
                ClassificationVerdict::indeterminate("a"),
                ClassificationVerdict::judged(
                    "b",
                    InferenceScores {
                        phishing: 1.0,
                        not_phishing: 0.0,
                    },
                ),
            ],
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("b").map(|v| v.label), Some(VerdictLabel::Phishing));
        assert!(set.get("missing").is_none());
    }

    #[test]
    fn verdict_label_serializes_snake_case() {
        let json = serde_json::to_value(VerdictLabel::Indeterminate).unwrap();
        assert_eq!(json, "indeterminate");
    }
}
