//! Classification fan-out — one request per email, bounded concurrency,
//! generation-tagged batches.
//!
//! The highest-risk invariant lives here: results are correlated to
//! emails by id within a batch generation, and a batch superseded while
//! in flight has its settled results discarded unconditionally. The
//! external service offers no cancel primitive, so cancellation is
//! discard-on-arrival.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::classifier::Classifier;
use crate::pipeline::types::{ClassificationVerdict, EmailRecord, VerdictSet};

/// Outcome of classifying one batch.
#[derive(Debug)]
pub enum BatchOutcome {
    /// Every request settled and the batch is still current.
    Settled(VerdictSet),
    /// A newer batch was submitted while this one was in flight; its
    /// results must not be attached to anything.
    Superseded,
}

/// Issues one classification request per email record, in parallel.
pub struct ClassificationOrchestrator {
    classifier: Arc<dyn Classifier>,
    max_in_flight: usize,
    request_timeout: Duration,
    generation: AtomicU64,
}

impl ClassificationOrchestrator {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        max_in_flight: usize,
        request_timeout: Duration,
    ) -> Self {
        Self {
            classifier,
            max_in_flight: max_in_flight.max(1),
            request_timeout,
            generation: AtomicU64::new(0),
        }
    }

    /// Classify every record in the batch.
    ///
    /// Returns only once all requests have settled — succeeded, failed,
    /// or timed out. A failed or timed-out request yields an
    /// indeterminate verdict for that email and never fails the batch.
    pub async fn classify_batch(&self, emails: &[EmailRecord]) -> BatchOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let semaphore = Arc::new(Semaphore::new(self.max_in_flight));

        let requests = emails.iter().map(|email| {
            let classifier = Arc::clone(&self.classifier);
            let semaphore = Arc::clone(&semaphore);
            let email_id = email.id.clone();
            let body = email.body_text.clone();
            let deadline = self.request_timeout;

            async move {
                let Ok(_permit) = semaphore.acquire().await else {
                    return ClassificationVerdict::indeterminate(email_id);
                };
                match timeout(deadline, classifier.classify(&body)).await {
                    Ok(Ok(scores)) => ClassificationVerdict::judged(email_id.as_str(), scores),
                    Ok(Err(e)) => {
                        warn!(id = %email_id, error = %e, "Classification request failed");
                        ClassificationVerdict::indeterminate(email_id)
                    }
                    Err(_) => {
                        warn!(id = %email_id, timeout = ?deadline, "Classification request timed out");
                        ClassificationVerdict::indeterminate(email_id)
                    }
                }
            }
        });

        let verdicts = join_all(requests).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "Discarding settled verdicts for superseded batch");
            return BatchOutcome::Superseded;
        }

        BatchOutcome::Settled(VerdictSet::new(generation, verdicts))
    }
}
