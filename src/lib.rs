//! mailscreen — phishing risk analysis for a personal mailbox.
//!
//! Ingests a batch of recent messages, classifies each against an
//! external inference service, and derives an aggregate risk score, an
//! hourly activity histogram, and a searchable/sortable/paginated view.

pub mod classifier;
pub mod config;
pub mod error;
pub mod mail;
pub mod pipeline;
pub mod senders;
