//! Error types for mailscreen.
//!
//! One enum per external concern; functions return the concrete enum
//! for their boundary rather than a crate-wide umbrella.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Mail source errors — listing, fetching, and label remediation.
#[derive(Debug, thiserror::Error)]
pub enum MailSourceError {
    #[error("Failed to list messages: {0}")]
    ListFailed(String),

    #[error("Failed to fetch message {id}: {reason}")]
    FetchFailed { id: String, reason: String },

    #[error("Failed to apply label {label} to message {id}: {reason}")]
    LabelFailed {
        id: String,
        label: String,
        reason: String,
    },

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Classification service errors.
///
/// These never escape the orchestrator — a failed request becomes an
/// indeterminate verdict for that one email, never a batch failure.
#[derive(Debug, thiserror::Error)]
pub enum ClassifierError {
    #[error("Inference request failed: {0}")]
    RequestFailed(String),

    #[error("Inference service returned status {0}")]
    BadStatus(u16),

    #[error("Invalid inference response: {0}")]
    InvalidResponse(String),
}
