//! New-sender review queue — emails from outside the trusted domains,
//! with label remediation against the mail source.

use tracing::info;

use crate::error::MailSourceError;
use crate::mail::MailSource;
use crate::pipeline::types::EmailRecord;

/// Label applied by `move_to_spam`.
pub const SPAM_LABEL: &str = "SPAM";
/// Label applied by `mark_suspicious`.
pub const SUSPICIOUS_LABEL: &str = "SUSPICIOUS";

/// Email ids whose senders are not on any trusted domain, pending a
/// user decision.
///
/// Entries are removed only after the mail source confirms the
/// remediation — a failed call leaves the entry queued so the local
/// view never drifts ahead of the mailbox's actual state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewQueue {
    entries: Vec<String>,
}

impl ReviewQueue {
    /// Collect the batch's records whose sender matches none of the
    /// trusted domains.
    pub fn from_batch(emails: &[EmailRecord], trusted_domains: &[String]) -> Self {
        let entries = emails
            .iter()
            .filter(|email| !is_trusted(&email.sender, trusted_domains))
            .map(|email| email.id.clone())
            .collect();
        Self { entries }
    }

    pub fn ids(&self) -> &[String] {
        &self.entries
    }

    pub fn contains(&self, email_id: &str) -> bool {
        self.entries.iter().any(|id| id == email_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move a message to spam; dequeued only once the source confirms.
    pub async fn move_to_spam(
        &mut self,
        source: &dyn MailSource,
        email_id: &str,
    ) -> Result<(), MailSourceError> {
        source.add_label(email_id, SPAM_LABEL).await?;
        self.dismiss(email_id);
        info!(id = %email_id, "Moved message to spam");
        Ok(())
    }

    /// Flag a message as suspicious; dequeued only once the source
    /// confirms.
    pub async fn mark_suspicious(
        &mut self,
        source: &dyn MailSource,
        email_id: &str,
    ) -> Result<(), MailSourceError> {
        source.add_label(email_id, SUSPICIOUS_LABEL).await?;
        self.dismiss(email_id);
        info!(id = %email_id, "Marked message as suspicious");
        Ok(())
    }

    fn dismiss(&mut self, email_id: &str) {
        self.entries.retain(|id| id != email_id);
    }
}

/// Whether the sender's address ends in one of the trusted domains.
///
/// The address is extracted from the `From` value first (the part
/// after any `<`), so a trusted domain appearing in the display name
/// or as a prefix of a longer domain never matches.
fn is_trusted(sender: &str, trusted_domains: &[String]) -> bool {
    let address = sender
        .rsplit_once('<')
        .map_or(sender, |(_, rest)| rest)
        .trim_end_matches('>')
        .trim()
        .to_lowercase();
    trusted_domains.iter().any(|domain| {
        let domain = domain.trim_start_matches('@').to_lowercase();
        !domain.is_empty() && address.ends_with(&format!("@{domain}"))
    })
}
