//! SSAssist Client
//!
//! The chat session and response-ingestion pipeline behind the SSAssist
//! widget: session identity, optimistic turn reconciliation, the
//! reaction/feedback sub-protocol, and the conversation store the
//! rendering layer consumes. The network transport sits behind the
//! [`transport::Transport`] trait so the whole pipeline runs against an
//! in-memory channel in tests.

pub mod chat;
pub mod context;
pub mod export;
pub mod feedback;
pub mod markdown;
pub mod reaction;
pub mod session;
pub mod store;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use chat::{ChatClient, ReactionOutcome};
pub use context::PageContext;
pub use feedback::FeedbackError;
pub use reaction::{ReactionEffect, ReactionInput};
pub use session::SessionTracker;
pub use store::ConversationStore;
pub use transport::{HttpTransport, Transport, TransportError};
