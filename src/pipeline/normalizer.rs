//! Email normalization — raw provider messages into canonical records.
//!
//! Normalization never fails: missing headers get documented defaults
//! and undecodable bodies degrade to an empty string, so a malformed
//! message can never take down a batch.

use base64::Engine;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use chrono::DateTime;

use crate::mail::{RawMessage, RawPart};
use crate::pipeline::types::EmailRecord;

/// Sentinel sender for messages without a `From` header.
pub const UNKNOWN_SENDER: &str = "unknown";
/// Default subject for messages without a `Subject` header.
pub const NO_SUBJECT: &str = "(no subject)";
/// Body placeholder when neither an HTML nor a plain-text part exists.
pub const NO_BODY: &str = "No body found";

/// Converts one raw provider message into a canonical `EmailRecord`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailNormalizer;

impl EmailNormalizer {
    pub fn normalize(&self, raw: &RawMessage) -> EmailRecord {
        let sender = raw
            .header("From")
            .unwrap_or(UNKNOWN_SENDER)
            .to_string();
        let subject = raw
            .header("Subject")
            .unwrap_or(NO_SUBJECT)
            .to_string();
        let timestamp = raw
            .header("Date")
            .and_then(|d| DateTime::parse_from_rfc2822(d).ok());

        let body_text = extract_body(&raw.body);

        EmailRecord {
            id: raw.id.clone(),
            sender,
            subject,
            body_text,
            timestamp,
        }
    }
}

/// Extract readable text from the body tree.
///
/// Prefers the HTML part stripped to plain text, falls back to the
/// plain-text part, then to a literal placeholder.
fn extract_body(body: &RawPart) -> String {
    if let Some(html) = body.find("text/html") {
        return strip_html(&decode_part(html));
    }
    if let Some(plain) = body.find("text/plain") {
        return decode_part(plain);
    }
    NO_BODY.to_string()
}

/// Decode a leaf part's base64url content.
///
/// Malformed transport encoding degrades to an empty string rather
/// than propagating an error.
fn decode_part(part: &RawPart) -> String {
    let Some(data) = part.data.as_deref() else {
        return String::new();
    };
    URL_SAFE_NO_PAD
        .decode(data)
        .or_else(|_| URL_SAFE.decode(data))
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

/// Strip HTML tags from content and normalize whitespace.
pub fn strip_html(html: &str) -> String {
    let mut result = String::new();
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}
