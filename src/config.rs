//! Configuration types.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// Analyzer configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Base URL of the inference service.
    pub classifier_url: String,
    /// Deadline for a single classification request.
    pub request_timeout: Duration,
    /// Maximum classification requests in flight at once.
    pub max_in_flight: usize,
    /// Emails per page in the result-set view.
    pub page_size: usize,
    /// Maximum messages fetched from the mail source per batch.
    pub max_emails: usize,
    /// Sender domains that skip the new-sender review queue.
    pub trusted_domains: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            classifier_url: "http://127.0.0.1:5000".to_string(),
            request_timeout: Duration::from_secs(10),
            max_in_flight: 4,
            page_size: 10,
            max_emails: 10,
            trusted_domains: Vec::new(),
        }
    }
}

impl AnalyzerConfig {
    /// Build config from `MAILSCREEN_*` environment variables.
    ///
    /// Unset variables fall back to defaults; a variable that is set
    /// but unparseable is an error, not a silent default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let classifier_url =
            get("MAILSCREEN_CLASSIFIER_URL").unwrap_or(defaults.classifier_url);

        let request_timeout = match parse_var(&get, "MAILSCREEN_REQUEST_TIMEOUT_SECS")? {
            Some(secs) => Duration::from_secs(secs),
            None => defaults.request_timeout,
        };
        let max_in_flight =
            parse_var(&get, "MAILSCREEN_MAX_IN_FLIGHT")?.unwrap_or(defaults.max_in_flight);
        let page_size = parse_var(&get, "MAILSCREEN_PAGE_SIZE")?.unwrap_or(defaults.page_size);
        let max_emails = parse_var(&get, "MAILSCREEN_MAX_EMAILS")?.unwrap_or(defaults.max_emails);

        let trusted_domains: Vec<String> = get("MAILSCREEN_TRUSTED_DOMAINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            classifier_url,
            request_timeout,
            max_in_flight: max_in_flight.max(1),
            page_size: page_size.max(1),
            max_emails,
            trusted_domains,
        })
    }
}

/// Parse an optional variable; set-but-invalid is an error.
fn parse_var<T: FromStr>(
    get: impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, ConfigError>
where
    T::Err: Display,
{
    let Some(raw) = get(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{e}: {raw:?}"),
        })
}
