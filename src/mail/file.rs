//! File-backed mail source — a JSON dump of raw provider messages.
//!
//! Lets the pipeline run end to end against an exported mailbox without
//! a live sign-in flow. Labels are tracked in memory only.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::MailSourceError;
use crate::mail::{MailSource, RawMessage};

/// Mail source backed by a JSON array of raw messages.
pub struct FileSource {
    messages: Vec<RawMessage>,
    labels: Mutex<HashMap<String, BTreeSet<String>>>,
}

impl FileSource {
    /// Load a JSON array of raw messages from `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MailSourceError> {
        let contents = std::fs::read_to_string(path)?;
        let messages: Vec<RawMessage> = serde_json::from_str(&contents)?;
        Ok(Self::new(messages))
    }

    pub fn new(messages: Vec<RawMessage>) -> Self {
        Self {
            messages,
            labels: Mutex::new(HashMap::new()),
        }
    }

    /// Labels currently attached to a message.
    pub fn labels_for(&self, id: &str) -> Vec<String> {
        self.labels
            .lock()
            .unwrap()
            .get(id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn find(&self, id: &str) -> Result<&RawMessage, MailSourceError> {
        self.messages
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| MailSourceError::FetchFailed {
                id: id.into(),
                reason: "no such message in dump".into(),
            })
    }
}

#[async_trait]
impl MailSource for FileSource {
    async fn list_message_ids(&self, max: usize) -> Result<Vec<String>, MailSourceError> {
        Ok(self
            .messages
            .iter()
            .take(max)
            .map(|m| m.id.clone())
            .collect())
    }

    async fn fetch_message(&self, id: &str) -> Result<RawMessage, MailSourceError> {
        self.find(id).cloned()
    }

    async fn add_label(&self, id: &str, label: &str) -> Result<(), MailSourceError> {
        self.find(id).map_err(|_| MailSourceError::LabelFailed {
            id: id.into(),
            label: label.into(),
            reason: "no such message in dump".into(),
        })?;
        self.labels
            .lock()
            .unwrap()
            .entry(id.to_string())
            .or_default()
            .insert(label.to_string());
        Ok(())
    }

    async fn remove_label(&self, id: &str, label: &str) -> Result<(), MailSourceError> {
        if let Some(set) = self.labels.lock().unwrap().get_mut(id) {
            set.remove(label);
        }
        Ok(())
    }
}
