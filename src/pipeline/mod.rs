//! Email risk analysis pipeline.
//!
//! One batch flows: raw messages → normalizer → {pattern histogram,
//! classification fan-out} → risk score → immutable `Batch` snapshot.
//! Batches are published whole — consumers never observe a batch with
//! some emails classified and others pending — and a newer batch
//! supersedes any in-flight classification for an older one.

pub mod normalizer;
pub mod orchestrator;
pub mod pattern;
pub mod score;
pub mod types;
pub mod view;

use std::sync::{Arc, RwLock};

use crate::classifier::Classifier;
use crate::config::AnalyzerConfig;
use crate::mail::RawMessage;

pub use normalizer::EmailNormalizer;
pub use orchestrator::{BatchOutcome, ClassificationOrchestrator};
pub use pattern::{PatternHistogram, hourly_histogram};
pub use score::risk_score;
pub use types::{Batch, ClassificationVerdict, EmailRecord, VerdictLabel, VerdictSet};

/// Runs batches end to end and holds the current snapshot.
pub struct BatchAnalyzer {
    normalizer: EmailNormalizer,
    orchestrator: Arc<ClassificationOrchestrator>,
    slot: BatchSlot,
}

impl BatchAnalyzer {
    pub fn new(classifier: Arc<dyn Classifier>, config: &AnalyzerConfig) -> Self {
        Self {
            normalizer: EmailNormalizer,
            orchestrator: Arc::new(ClassificationOrchestrator::new(
                classifier,
                config.max_in_flight,
                config.request_timeout,
            )),
            slot: BatchSlot::default(),
        }
    }

    /// Run one batch end to end.
    ///
    /// Returns the committed snapshot, or `None` if a newer batch
    /// superseded this one while its requests were in flight — in that
    /// case nothing is committed and the settled results are dropped.
    pub async fn analyze(&self, raw: Vec<RawMessage>) -> Option<Arc<Batch>> {
        let emails: Vec<EmailRecord> = raw.iter().map(|m| self.normalizer.normalize(m)).collect();
        let histogram = hourly_histogram(&emails);

        let verdicts = match self.orchestrator.classify_batch(&emails).await {
            BatchOutcome::Settled(verdicts) => verdicts,
            BatchOutcome::Superseded => return None,
        };

        let batch = Batch {
            generation: verdicts.generation(),
            risk_score: risk_score(&verdicts),
            emails,
            verdicts,
            histogram,
        };
        self.slot.commit(batch)
    }

    /// The most recently committed batch, if any.
    pub fn current(&self) -> Option<Arc<Batch>> {
        self.slot.current()
    }
}

/// The single shared mutable resource: the current settled batch.
///
/// Replaced whole under a lock held only for the swap; readers always
/// get a fully settled, immutable snapshot.
#[derive(Default)]
pub struct BatchSlot {
    current: RwLock<Option<Arc<Batch>>>,
}

impl BatchSlot {
    /// Commit a settled batch, unless a newer generation already holds
    /// the slot.
    pub fn commit(&self, batch: Batch) -> Option<Arc<Batch>> {
        let mut guard = self.current.write().unwrap();
        if guard
            .as_ref()
            .is_some_and(|current| current.generation >= batch.generation)
        {
            return None;
        }
        let snapshot = Arc::new(batch);
        *guard = Some(Arc::clone(&snapshot));
        Some(snapshot)
    }

    pub fn current(&self) -> Option<Arc<Batch>> {
        self.current.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn batch(generation: u64) -> Batch {
        Batch {
            generation,
            emails: vec![],
            verdicts: VerdictSet::new(generation, vec![]),
            risk_score: 100.0,
            histogram: PatternHistogram::default(),
        }
    }

    #[test]
    fn slot_commits_newer_generations() {
        let slot = BatchSlot::default();
        assert!(slot.commit(batch(1)).is_some());
        assert!(slot.commit(batch(2)).is_some());
        assert_eq!(slot.current().unwrap().generation, 2);
    }

    #[test]
    fn slot_rejects_stale_generations() {
        let slot = BatchSlot::default();
        assert!(slot.commit(batch(3)).is_some());
        assert!(slot.commit(batch(2)).is_none());
        assert!(slot.commit(batch(3)).is_none());
        assert_eq!(slot.current().unwrap().generation, 3);
    }

    #[test]
    fn slot_starts_empty() {
        assert!(BatchSlot::default().current().is_none());
    }
}
