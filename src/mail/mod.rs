//! Mail source boundary — message listing, raw payload fetch, and
//! label remediation against the user's mailbox.
//!
//! The sign-in and retrieval flow itself lives outside this crate; the
//! pipeline only depends on this trait.

pub mod file;
pub mod raw;

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::warn;

use crate::error::MailSourceError;

pub use file::FileSource;
pub use raw::{RawHeader, RawMessage, RawPart};

/// Trait for mailbox backends — pure I/O, no analysis logic.
#[async_trait]
pub trait MailSource: Send + Sync {
    /// Identifiers of the most recent messages, newest first.
    async fn list_message_ids(&self, max: usize) -> Result<Vec<String>, MailSourceError>;

    /// Full raw record (headers + body parts) for one message.
    async fn fetch_message(&self, id: &str) -> Result<RawMessage, MailSourceError>;

    /// Attach a label by name. Fire-and-forget from the pipeline's
    /// perspective — nothing feeds back into batch state.
    async fn add_label(&self, id: &str, label: &str) -> Result<(), MailSourceError>;

    /// Detach a label by name.
    async fn remove_label(&self, id: &str, label: &str) -> Result<(), MailSourceError>;
}

/// Fetch up to `max` recent messages, at most `max_in_flight` at once.
///
/// Messages the source fails to return are skipped with a warning
/// rather than failing the whole fetch.
pub async fn fetch_recent(
    source: &dyn MailSource,
    max: usize,
    max_in_flight: usize,
) -> Result<Vec<RawMessage>, MailSourceError> {
    let ids = source.list_message_ids(max).await?;
    let semaphore = Arc::new(Semaphore::new(max_in_flight.max(1)));

    let fetches = ids.iter().map(|id| {
        let semaphore = Arc::clone(&semaphore);
        async move {
            let Ok(_permit) = semaphore.acquire().await else {
                return (
                    id,
                    Err(MailSourceError::FetchFailed {
                        id: id.clone(),
                        reason: "fetch pool closed".into(),
                    }),
                );
            };
            (id, source.fetch_message(id).await)
        }
    });

    let mut messages = Vec::with_capacity(ids.len());
    for (id, result) in join_all(fetches).await {
        match result {
            Ok(msg) => messages.push(msg),
            Err(e) => warn!(id = %id, error = %e, "Skipping message the mail source failed to return"),
        }
    }
    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Source double that fails to fetch specific ids.
    struct FlakySource {
        messages: HashMap<String, RawMessage>,
        broken: Vec<String>,
    }

    #[async_trait]
    impl MailSource for FlakySource {
        async fn list_message_ids(&self, max: usize) -> Result<Vec<String>, MailSourceError> {
            let mut ids: Vec<String> = self.messages.keys().cloned().collect();
            ids.sort();
            ids.extend(self.broken.iter().cloned());
            ids.truncate(max);
            Ok(ids)
        }

        async fn fetch_message(&self, id: &str) -> Result<RawMessage, MailSourceError> {
            self.messages
                .get(id)
                .cloned()
                .ok_or_else(|| MailSourceError::FetchFailed {
                    id: id.into(),
                    reason: "not found".into(),
                })
        }

        async fn add_label(&self, _id: &str, _label: &str) -> Result<(), MailSourceError> {
            Ok(())
        }

        async fn remove_label(&self, _id: &str, _label: &str) -> Result<(), MailSourceError> {
            Ok(())
        }
    }

    /// Source double that records its peak number of in-flight fetches.
    struct SlowSource {
        ids: Vec<String>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl MailSource for SlowSource {
        async fn list_message_ids(&self, max: usize) -> Result<Vec<String>, MailSourceError> {
            Ok(self.ids.iter().take(max).cloned().collect())
        }

        async fn fetch_message(&self, id: &str) -> Result<RawMessage, MailSourceError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(raw(id))
        }

        async fn add_label(&self, _id: &str, _label: &str) -> Result<(), MailSourceError> {
            Ok(())
        }

        async fn remove_label(&self, _id: &str, _label: &str) -> Result<(), MailSourceError> {
            Ok(())
        }
    }

    fn raw(id: &str) -> RawMessage {
        RawMessage {
            id: id.into(),
            ..RawMessage::default()
        }
    }

    #[tokio::test]
    async fn fetch_recent_skips_failed_messages() {
        let source = FlakySource {
            messages: HashMap::from([("a".to_string(), raw("a")), ("b".to_string(), raw("b"))]),
            broken: vec!["ghost".to_string()],
        };

        let messages = fetch_recent(&source, 10, 4).await.unwrap();
        let mut ids: Vec<&str> = messages.iter().map(|m| m.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn fetch_recent_respects_max() {
        let source = FlakySource {
            messages: HashMap::from([
                ("a".to_string(), raw("a")),
                ("b".to_string(), raw("b")),
                ("c".to_string(), raw("c")),
            ]),
            broken: vec![],
        };

        let messages = fetch_recent(&source, 2, 4).await.unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[tokio::test]
    async fn fetch_recent_bounds_in_flight_fetches() {
        let source = SlowSource {
            ids: (0..6).map(|i| format!("m{i}")).collect(),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        };

        let messages = fetch_recent(&source, 10, 2).await.unwrap();
        assert_eq!(messages.len(), 6);
        assert!(source.peak.load(Ordering::SeqCst) <= 2);
    }
}
