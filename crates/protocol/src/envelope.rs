//! Request body and response envelope for the `/chat` endpoint.
//!
//! The backend wraps its reply in a doubly-encoded envelope: the outer
//! body is a JSON object whose `response` field is itself a JSON-encoded
//! string. Decoding is strict and two-staged. A failure at either stage
//! yields a typed error and never a partial turn — callers decide how to
//! recover.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::types::{DocumentMetadata, RetrievedDocument};

/// Body of `POST /chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Decode failures, tagged by the stage that rejected the payload
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("outer payload is not the expected envelope: {0}")]
    OuterMalformed(String),

    #[error("inner response payload is not a JSON object: {0}")]
    InnerMalformed(String),
}

/// A fully decoded assistant reply
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedTurn {
    /// Raw `response_msg` text (markdown, not yet rendered)
    pub text: String,
    /// Server-assigned message id, or a locally generated fallback
    pub turn_id: String,
    /// Whether the server actually supplied a `message_id`
    pub server_assigned: bool,
    /// Retrieved documents, in the envelope's insertion order
    pub sources: Vec<RetrievedDocument>,
    /// Session id from the outer envelope, when present
    pub session_id: Option<String>,
}

/// Decode the raw `/chat` response body.
///
/// Stage 1 parses the outer object and requires a string `response`
/// field (`OuterMalformed` otherwise). Stage 2 parses that string as a
/// JSON object (`InnerMalformed` otherwise). Missing inner fields fall
/// back to defaults: empty message text, a locally generated turn id,
/// and no sources.
pub fn decode_envelope(raw: &str) -> Result<DecodedTurn, DecodeError> {
    // Stage 1: outer object
    let outer: Value =
        serde_json::from_str(raw).map_err(|e| DecodeError::OuterMalformed(e.to_string()))?;
    let outer = outer
        .as_object()
        .ok_or_else(|| DecodeError::OuterMalformed("not a JSON object".to_string()))?;

    let session_id = outer
        .get("session_id")
        .and_then(Value::as_str)
        .map(str::to_string);

    let inner_raw = outer.get("response").and_then(Value::as_str).ok_or_else(|| {
        DecodeError::OuterMalformed("`response` field missing or not a string".to_string())
    })?;

    // Stage 2: inner object
    let inner: Value =
        serde_json::from_str(inner_raw).map_err(|e| DecodeError::InnerMalformed(e.to_string()))?;
    let inner = inner
        .as_object()
        .ok_or_else(|| DecodeError::InnerMalformed("not a JSON object".to_string()))?;

    let text = inner
        .get("response_msg")
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string();

    let (turn_id, server_assigned) = match inner.get("message_id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => (id.to_string(), true),
        _ => (crate::new_id("api"), false),
    };

    let sources = inner
        .get("rag_sources")
        .and_then(Value::as_object)
        .map(format_sources)
        .unwrap_or_default();

    Ok(DecodedTurn {
        text,
        turn_id,
        server_assigned,
        sources,
        session_id,
    })
}

/// Convert the `rag_sources` mapping (source id -> `{url, title, text,
/// score?}`) into an ordered document list. Iteration follows the map's
/// insertion order; `score` defaults to 0 and `title` to "Source".
fn format_sources(map: &serde_json::Map<String, Value>) -> Vec<RetrievedDocument> {
    let stamped_at = Utc::now();
    map.iter()
        .map(|(id, source)| RetrievedDocument {
            id: id.clone(),
            text: source
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            relevance_score: source.get("score").and_then(Value::as_f64).unwrap_or(0.0),
            metadata: DocumentMetadata {
                title: source
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or("Source")
                    .to_string(),
                document_type: "web".to_string(),
                processing_date: stamped_at,
                source_id: id.clone(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Build a valid envelope around an inner payload.
    fn envelope(inner: Value, session_id: Option<&str>) -> String {
        let mut outer = json!({ "response": inner.to_string() });
        if let Some(sid) = session_id {
            outer["session_id"] = json!(sid);
        }
        outer.to_string()
    }

    #[test]
    fn decodes_full_envelope() {
        let raw = envelope(
            json!({
                "response_msg": "Hi!",
                "message_id": "42",
                "rag_sources": {}
            }),
            Some("abc"),
        );

        let decoded = decode_envelope(&raw).expect("decode");
        assert_eq!(decoded.text, "Hi!");
        assert_eq!(decoded.turn_id, "42");
        assert!(decoded.server_assigned);
        assert!(decoded.sources.is_empty());
        assert_eq!(decoded.session_id.as_deref(), Some("abc"));
    }

    #[test]
    fn sources_keep_insertion_order_and_defaults() {
        let raw = envelope(
            json!({
                "response_msg": "See sources",
                "message_id": "7",
                "rag_sources": {
                    "doc-b": { "url": "https://b", "title": "Benefits overview",
                               "text": "excerpt b", "score": 0.91 },
                    "doc-a": { "url": "https://a", "text": "excerpt a" }
                }
            }),
            None,
        );

        let decoded = decode_envelope(&raw).expect("decode");
        assert_eq!(decoded.sources.len(), 2);

        // doc-b was inserted first and must come out first
        assert_eq!(decoded.sources[0].id, "doc-b");
        assert_eq!(decoded.sources[0].metadata.title, "Benefits overview");
        assert!((decoded.sources[0].relevance_score - 0.91).abs() < f64::EPSILON);

        // doc-a has no title or score
        assert_eq!(decoded.sources[1].id, "doc-a");
        assert_eq!(decoded.sources[1].metadata.title, "Source");
        assert_eq!(decoded.sources[1].relevance_score, 0.0);
        assert_eq!(decoded.sources[1].metadata.source_id, "doc-a");
    }

    #[test]
    fn missing_inner_fields_fall_back_to_defaults() {
        let raw = envelope(json!({}), None);

        let decoded = decode_envelope(&raw).expect("decode");
        assert_eq!(decoded.text, "");
        assert!(!decoded.server_assigned);
        assert!(decoded.turn_id.starts_with("api_"));
        assert!(decoded.sources.is_empty());
        assert!(decoded.session_id.is_none());
    }

    #[test]
    fn outer_garbage_is_outer_malformed() {
        let err = decode_envelope("not json at all").unwrap_err();
        assert!(matches!(err, DecodeError::OuterMalformed(_)));
    }

    #[test]
    fn outer_non_object_is_outer_malformed() {
        let err = decode_envelope("[1,2,3]").unwrap_err();
        assert!(matches!(err, DecodeError::OuterMalformed(_)));
    }

    #[test]
    fn non_string_response_field_is_outer_malformed() {
        let raw = json!({ "response": { "response_msg": "hi" } }).to_string();
        let err = decode_envelope(&raw).unwrap_err();
        assert!(matches!(err, DecodeError::OuterMalformed(_)));
    }

    #[test]
    fn unparseable_inner_is_inner_malformed() {
        let raw = json!({ "response": "{ this is not json" }).to_string();
        let err = decode_envelope(&raw).unwrap_err();
        assert!(matches!(err, DecodeError::InnerMalformed(_)));
    }

    #[test]
    fn inner_non_object_is_inner_malformed() {
        let raw = json!({ "response": "\"just a string\"" }).to_string();
        let err = decode_envelope(&raw).unwrap_err();
        assert!(matches!(err, DecodeError::InnerMalformed(_)));
    }

    #[test]
    fn chat_request_omits_absent_session_id() {
        let without = ChatRequest {
            message: "Hello".to_string(),
            session_id: None,
        };
        assert_eq!(
            serde_json::to_string(&without).unwrap(),
            r#"{"message":"Hello"}"#
        );

        let with = ChatRequest {
            message: "Hello".to_string(),
            session_id: Some("abc".to_string()),
        };
        assert_eq!(
            serde_json::to_string(&with).unwrap(),
            r#"{"message":"Hello","session_id":"abc"}"#
        );
    }

    #[test]
    fn roundtrip_recovers_message_and_sources() {
        let inner = json!({
            "response_msg": "You may qualify for retirement benefits.",
            "message_id": "msg-9",
            "rag_sources": {
                "kb-1": { "url": "https://kb/1", "title": "Retirement",
                          "text": "Workers earn credits...", "score": 0.5 }
            }
        });
        let raw = envelope(inner, Some("sess-1"));

        let decoded = decode_envelope(&raw).expect("decode");
        assert_eq!(decoded.text, "You may qualify for retirement benefits.");
        assert_eq!(decoded.turn_id, "msg-9");
        assert_eq!(decoded.sources[0].text, "Workers earn credits...");
        assert_eq!(decoded.session_id.as_deref(), Some("sess-1"));
    }
}
