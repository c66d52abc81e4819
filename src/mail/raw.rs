//! Raw provider message types — a flat header list plus a recursive
//! multipart body tree, the shape mail providers hand back before any
//! normalization.

use serde::{Deserialize, Serialize};

/// One raw message as returned by the mail source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawMessage {
    /// Provider-assigned message identifier.
    #[serde(default)]
    pub id: String,
    /// Header name/value pairs, in wire order.
    #[serde(default)]
    pub headers: Vec<RawHeader>,
    /// Root of the multipart body tree.
    #[serde(default)]
    pub body: RawPart,
}

/// A single header name/value pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHeader {
    pub name: String,
    pub value: String,
}

/// One node of the multipart body tree.
///
/// Leaf parts carry base64url-encoded `data`; container parts carry
/// nested `parts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPart {
    #[serde(default)]
    pub mime_type: String,
    /// Base64url-encoded part content, absent on container parts.
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub parts: Vec<RawPart>,
}

impl RawMessage {
    /// Look up a header by exact, case-sensitive name match.
    ///
    /// Returns the first match in wire order.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }
}

impl RawPart {
    /// Depth-first search of the body tree for the first part with the
    /// given MIME type.
    pub fn find(&self, mime_type: &str) -> Option<&RawPart> {
        if self.mime_type == mime_type {
            return Some(self);
        }
        self.parts.iter().find_map(|p| p.find(mime_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message_with_headers(headers: &[(&str, &str)]) -> RawMessage {
        RawMessage {
            id: "m1".into(),
            headers: headers
                .iter()
                .map(|(name, value)| RawHeader {
                    name: (*name).into(),
                    value: (*value).into(),
                })
                .collect(),
            body: RawPart::default(),
        }
    }

    #[test]
    fn header_lookup_exact_match() {
        let msg = message_with_headers(&[("From", "alice@example.com"), ("Subject", "Hi")]);
        assert_eq!(msg.header("From"), Some("alice@example.com"));
        assert_eq!(msg.header("Subject"), Some("Hi"));
    }

    #[test]
    fn header_lookup_is_case_sensitive() {
        let msg = message_with_headers(&[("from", "alice@example.com")]);
        assert_eq!(msg.header("From"), None);
        assert_eq!(msg.header("from"), Some("alice@example.com"));
    }

    #[test]
    fn header_lookup_first_match_wins() {
        let msg = message_with_headers(&[("From", "first@example.com"), ("From", "second@example.com")]);
        assert_eq!(msg.header("From"), Some("first@example.com"));
    }

    #[test]
    fn find_part_walks_nested_tree() {
        let body = RawPart {
            mime_type: "multipart/alternative".into(),
            data: None,
            parts: vec![
                RawPart {
                    mime_type: "text/plain".into(),
                    data: Some("cGxhaW4".into()),
                    parts: vec![],
                },
                RawPart {
                    mime_type: "multipart/related".into(),
                    data: None,
                    parts: vec![RawPart {
                        mime_type: "text/html".into(),
                        data: Some("aHRtbA".into()),
                        parts: vec![],
                    }],
                },
            ],
        };
        assert_eq!(
            body.find("text/html").and_then(|p| p.data.as_deref()),
            Some("aHRtbA")
        );
        assert!(body.find("image/png").is_none());
    }

    #[test]
    fn deserializes_provider_json() {
        let json = r#"{
            "id": "18f2a",
            "headers": [{"name": "From", "value": "alice@example.com"}],
            "body": {
                "mimeType": "multipart/alternative",
                "parts": [{"mimeType": "text/plain", "data": "aGVsbG8"}]
            }
        }"#;
        let msg: RawMessage = serde_json::from_str(json).unwrap();
        assert_eq!(msg.id, "18f2a");
        assert_eq!(msg.header("From"), Some("alice@example.com"));
        assert!(msg.body.find("text/plain").is_some());
    }
}
