//! Core types shared across the protocol

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Assistant,
}

/// A reaction applied to an assistant turn. Absence of a reaction is
/// represented as `Option::None`, so the wire only ever carries the two
/// thumb values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reaction {
    #[serde(rename = "thumbs_up")]
    Positive,
    #[serde(rename = "thumbs_down")]
    Negative,
}

/// One message unit in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    /// Unique within the conversation. Empty while the turn is a
    /// client-side placeholder awaiting server confirmation.
    pub id: String,
    pub text: String,
    pub sender: Sender,
    /// Client-stamped at creation; not server-authoritative.
    pub created_at: DateTime<Utc>,
    /// Whether `text` is display markup rather than literal text
    #[serde(default)]
    pub render_as_markup: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reaction: Option<Reaction>,
    /// Cited evidence; only present on retrieval-backed assistant turns
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<RetrievedDocument>,
}

impl Turn {
    /// Create a provisional user turn. The id stays empty until the
    /// server confirms one (or the reconciler assigns a local id).
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            text: text.into(),
            sender: Sender::User,
            created_at: Utc::now(),
            render_as_markup: false,
            reaction: None,
            sources: Vec::new(),
        }
    }

    /// Create an assistant turn with a known id.
    pub fn assistant(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            sender: Sender::Assistant,
            created_at: Utc::now(),
            render_as_markup: false,
            reaction: None,
            sources: Vec::new(),
        }
    }

    pub fn with_markup(mut self) -> Self {
        self.render_as_markup = true;
        self
    }

    pub fn with_sources(mut self, sources: Vec<RetrievedDocument>) -> Self {
        self.sources = sources;
        self
    }

    pub fn has_sources(&self) -> bool {
        !self.sources.is_empty()
    }
}

/// Evidence cited by an assistant turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    /// Unique within the turn's source set
    pub id: String,
    /// Excerpt content
    pub text: String,
    /// Relevance in `[0, 1]`
    pub relevance_score: f64,
    pub metadata: DocumentMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub document_type: String,
    /// Stamped at decode time — the envelope does not carry one
    pub processing_date: DateTime<Utc>,
    pub source_id: String,
}

/// Body of `POST /feedback`. Submitted out-of-band; never part of a Turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    #[serde(rename = "messageId")]
    pub turn_id: String,
    pub session_id: String,
    pub reaction: Reaction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Issue tags offered by the detail-capture step, as `(id, label)` pairs.
pub const ISSUE_TAGS: [(&str, &str); 6] = [
    ("inaccurate", "Inaccurate information"),
    ("unclear", "Unclear response"),
    ("incomplete", "Incomplete answer"),
    ("irrelevant", "Not relevant to my question"),
    ("unhelpful", "Not helpful"),
    ("other", "Other issue"),
];
