//! Feedback submission
//!
//! One-shot, fire-and-forget delivery of a feedback signal for a turn.
//! A present session id is a hard precondition; a failed delivery is
//! terminal — logged, never retried, and never rolled back into the
//! local reaction state.

use ssassist_protocol::{FeedbackRecord, Reaction};
use thiserror::Error;
use tracing::debug;

use crate::session::SessionTracker;
use crate::transport::{Transport, TransportError};

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("no active session; feedback not submitted")]
    NoActiveSession,

    #[error("feedback submission failed: {0}")]
    Submission(#[from] TransportError),
}

/// Submit one feedback record for `turn_id` over `transport`.
///
/// Fails with [`FeedbackError::NoActiveSession`] before any network
/// activity when the tracker holds no session id.
pub async fn submit_feedback<T: Transport + ?Sized>(
    transport: &T,
    session: &SessionTracker,
    turn_id: &str,
    reaction: Reaction,
    issues: Option<Vec<String>>,
    comment: Option<String>,
) -> Result<(), FeedbackError> {
    let session_id = session
        .current()
        .ok_or(FeedbackError::NoActiveSession)?
        .to_string();

    let record = FeedbackRecord {
        turn_id: turn_id.to_string(),
        session_id,
        reaction,
        issues,
        comment,
    };

    transport.feedback(&record).await?;
    debug!(
        component = "feedback",
        turn_id = %record.turn_id,
        reaction = ?record.reaction,
        "feedback submitted"
    );
    Ok(())
}
