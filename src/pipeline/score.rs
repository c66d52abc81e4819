//! Aggregate risk scoring over a settled verdict set.

use crate::pipeline::types::{VerdictLabel, VerdictSet};

/// Aggregate score in [0, 100]; higher is safer.
///
/// Indeterminate verdicts carry no information and are excluded from
/// both sides of the ratio — an unreachable classifier leaves the
/// score at 100 rather than implying danger.
pub fn risk_score(verdicts: &VerdictSet) -> f64 {
    let judged = verdicts.iter().filter(|v| v.is_judged()).count();
    if judged == 0 {
        return 100.0;
    }
    let phishing = verdicts
        .iter()
        .filter(|v| v.label == VerdictLabel::Phishing)
        .count();
    (100.0 - (phishing as f64 / judged as f64) * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::InferenceScores;
    use crate::pipeline::types::ClassificationVerdict;

    fn phishing(id: &str) -> ClassificationVerdict {
        ClassificationVerdict::judged(
            id,
            InferenceScores {
                phishing: 0.9,
                not_phishing: 0.1,
            },
        )
    }

    fn safe(id: &str) -> ClassificationVerdict {
        ClassificationVerdict::judged(
            id,
            InferenceScores {
                phishing: 0.1,
                not_phishing: 0.9,
            },
        )
    }

    fn set(verdicts: Vec<ClassificationVerdict>) -> VerdictSet {
        VerdictSet::new(1, verdicts)
    }

    #[test]
    fn empty_set_scores_100() {
        assert_eq!(risk_score(&set(vec![])), 100.0);
    }

    #[test]
    fn all_indeterminate_scores_100() {
        let verdicts = set(vec![
            ClassificationVerdict::indeterminate("a"),
            ClassificationVerdict::indeterminate("b"),
        ]);
        assert_eq!(risk_score(&verdicts), 100.0);
    }

    #[test]
    fn two_of_three_phishing_scores_one_third() {
        let verdicts = set(vec![phishing("a"), phishing("b"), safe("c")]);
        let score = risk_score(&verdicts);
        assert!((score - 100.0 / 3.0).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn indeterminate_excluded_from_denominator() {
        // One judged safe, one timed out: score comes from the judged
        // email alone.
        let verdicts = set(vec![safe("a"), ClassificationVerdict::indeterminate("b")]);
        assert_eq!(risk_score(&verdicts), 100.0);

        let verdicts = set(vec![
            phishing("a"),
            ClassificationVerdict::indeterminate("b"),
        ]);
        assert_eq!(risk_score(&verdicts), 0.0);
    }

    #[test]
    fn score_stays_in_bounds() {
        let all_phishing = set(vec![phishing("a"), phishing("b")]);
        assert_eq!(risk_score(&all_phishing), 0.0);

        let all_safe = set(vec![safe("a"), safe("b")]);
        assert_eq!(risk_score(&all_safe), 100.0);
    }
}
