//! SSAssist Protocol
//!
//! Shared types for communication between the SSAssist widget client and
//! the assistant backend, plus the decoder for the `/chat` response
//! envelope. Everything here is pure data — no IO, no shared state.

use uuid::Uuid;

// Re-exports
pub mod envelope;
pub mod types;

pub use envelope::{decode_envelope, ChatRequest, DecodeError, DecodedTurn};
pub use types::*;

/// Generate a new unique ID, optionally namespaced by a prefix.
pub fn new_id(prefix: &str) -> String {
    if prefix.is_empty() {
        Uuid::new_v4().to_string()
    } else {
        format!("{}_{}", prefix, Uuid::new_v4())
    }
}
