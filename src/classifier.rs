//! Classifier client — the external phishing inference service, behind
//! a trait seam so the pipeline can be driven by a test double.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;

/// Raw scores returned by the inference service for one email body.
///
/// Unbounded but comparable — only their relative order matters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InferenceScores {
    pub phishing: f64,
    pub not_phishing: f64,
}

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    email_body: &'a str,
}

/// Trait for classification backends — pure I/O, no batch logic.
///
/// Correlation, fan-out, timeouts, and generation handling all live in
/// `ClassificationOrchestrator`.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a single email body.
    async fn classify(&self, email_body: &str) -> Result<InferenceScores, ClassifierError>;
}

/// HTTP classifier — `POST {base_url}/api/inference`.
pub struct HttpClassifier {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClassifier {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    fn api_url(&self) -> String {
        format!("{}/api/inference", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, email_body: &str) -> Result<InferenceScores, ClassifierError> {
        let response = self
            .client
            .post(self.api_url())
            .json(&InferenceRequest { email_body })
            .send()
            .await
            .map_err(|e| ClassifierError::RequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ClassifierError::BadStatus(response.status().as_u16()));
        }

        response
            .json::<InferenceScores>()
            .await
            .map_err(|e| ClassifierError::InvalidResponse(e.to_string()))
    }
}
