//! Chat client orchestration
//!
//! Turns one outbound user utterance into a validated conversation
//! turn: optimistic append, transport call, envelope decode, identity
//! finalization. Failures in this path never escape — they degrade into
//! apology turns the rendering layer shows like any other reply.
//!
//! Requests are serialized per conversation: `send` takes `&mut self`,
//! so a second turn cannot be issued while one is in flight and
//! responses always apply in submission order.

use std::time::Duration;

use chrono::{Local, Timelike};
use ssassist_protocol::{decode_envelope, new_id, ChatRequest, DecodedTurn, Reaction, Sender, Turn};
use tracing::{error, warn};

use crate::context::{compose_message, PageContext};
use crate::feedback::{submit_feedback, FeedbackError};
use crate::reaction::{self, ReactionEffect, ReactionInput};
use crate::session::SessionTracker;
use crate::store::ConversationStore;
use crate::transport::Transport;

/// Apology shown when a reply arrived but could not be decoded.
pub const PROCESSING_APOLOGY: &str =
    "Sorry, I encountered an error processing your request. Please try again later.";

/// Apology shown when the assistant could not be reached at all.
pub const CONNECT_APOLOGY: &str =
    "Could not connect to the assistant. Please ensure it is running and accessible.";

/// Apology shown for any other transport failure.
pub const GENERIC_APOLOGY: &str = "An unexpected error occurred while contacting the assistant.";

const GREETING_BODY: &str = "I'm SSAssist, your virtual assistant. I can help you with \
     questions about Social Security benefits, services, and more. How can I assist \
     you today?";

/// Delay before an apology turn is appended, so a failure reply never
/// lands faster than perceptible typing.
const ERROR_REPLY_DELAY: Duration = Duration::from_millis(1000);

/// Result of applying a reaction input to a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionOutcome {
    /// The turn's reaction after the transition
    pub reaction: Option<Reaction>,
    /// Whether the caller should open the detail-capture step
    pub detail_capture: bool,
}

/// One conversation: session identity, turn log, and the transport that
/// carries chat and feedback requests.
pub struct ChatClient<T: Transport> {
    transport: T,
    session: SessionTracker,
    store: ConversationStore,
    error_reply_delay: Duration,
}

impl<T: Transport> ChatClient<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            session: SessionTracker::new(),
            store: ConversationStore::new(),
            error_reply_delay: ERROR_REPLY_DELAY,
        }
    }

    /// Override the apology delay (tests run at zero).
    pub fn with_error_reply_delay(mut self, delay: Duration) -> Self {
        self.error_reply_delay = delay;
        self
    }

    pub fn turns(&self) -> &[Turn] {
        self.store.turns()
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    pub fn session(&self) -> &SessionTracker {
        &self.session
    }

    /// Append the assistant's opening turn for a fresh conversation.
    pub fn greet(&mut self) -> &Turn {
        let salutation = match Local::now().hour() {
            5..=11 => "Good morning!",
            12..=16 => "Good afternoon!",
            _ => "Good evening!",
        };
        let turn = Turn::assistant(new_id("assistant"), format!("{} {}", salutation, GREETING_BODY));
        self.store.append(turn);
        self.last_turn()
    }

    /// Send one user utterance and ingest the reply. The provisional
    /// user turn is appended before any network activity; the returned
    /// reference is the assistant (or apology) turn that closed the
    /// exchange.
    pub async fn send(&mut self, text: &str) -> &Turn {
        self.send_with_context(text, None).await
    }

    /// Like [`send`](Self::send), framing the current form page's
    /// answers into the outbound message.
    pub async fn send_with_context(&mut self, text: &str, page: Option<&PageContext>) -> &Turn {
        // Phase 1 of the commit: the optimistic user turn, placeholder id.
        self.store.append(Turn::user(text));
        let user_index = self.store.len() - 1;

        let request = ChatRequest {
            message: compose_message(text, page),
            session_id: self.session.current().map(str::to_string),
        };

        match self.transport.chat(&request).await {
            Ok(raw) => match decode_envelope(&raw) {
                Ok(decoded) => self.finalize(user_index, decoded),
                Err(err) => {
                    warn!(component = "chat", error = %err, "undecodable reply");
                    self.append_apology(PROCESSING_APOLOGY).await
                }
            },
            Err(err) => {
                warn!(component = "chat", error = %err, "chat request failed");
                let text = if err.is_connectivity() {
                    CONNECT_APOLOGY
                } else {
                    GENERIC_APOLOGY
                };
                self.append_apology(text).await
            }
        }
    }

    /// Phase 2 of the commit: assign durable identities and append the
    /// assistant turn. The provisional user record is rewritten, never
    /// dropped.
    fn finalize(&mut self, user_index: usize, decoded: DecodedTurn) -> &Turn {
        if let Some(sid) = &decoded.session_id {
            self.session.observe(sid.clone());
        }

        let (user_id, assistant_id) = if decoded.server_assigned {
            (
                format!("user_{}", decoded.turn_id),
                format!("assistant_{}", decoded.turn_id),
            )
        } else {
            (new_id("user"), new_id("assistant"))
        };

        let mut turns = self.store.turns().to_vec();
        if let Some(user) = turns.get_mut(user_index) {
            if user.sender == Sender::User && user.id.is_empty() {
                user.id = user_id;
            }
        }
        turns.push(
            Turn::assistant(assistant_id, decoded.text)
                .with_markup()
                .with_sources(decoded.sources),
        );
        self.store.replace_all(turns);

        self.last_turn()
    }

    /// Append an apology turn after the fixed delay. The user turn's id
    /// stays unresolved on this path.
    async fn append_apology(&mut self, text: &str) -> &Turn {
        if !self.error_reply_delay.is_zero() {
            tokio::time::sleep(self.error_reply_delay).await;
        }
        self.store.append(Turn::assistant(new_id("error"), text));
        self.last_turn()
    }

    /// Apply a reaction input to a turn: the local state always updates
    /// optimistically; submissions that cannot be delivered are logged
    /// and swallowed.
    pub async fn react(&mut self, turn_id: &str, input: ReactionInput) -> ReactionOutcome {
        let Some(current) = self.store.find(turn_id).map(|t| t.reaction) else {
            warn!(component = "feedback", turn_id = %turn_id, "reaction on unknown turn");
            return ReactionOutcome {
                reaction: None,
                detail_capture: false,
            };
        };

        let (next, effects) = reaction::transition(current, input);
        if let Some(turn) = self.store.find_mut(turn_id) {
            turn.reaction = next;
        }

        let mut detail_capture = false;
        for effect in effects {
            match effect {
                ReactionEffect::OpenDetailCapture => detail_capture = true,
                ReactionEffect::Submit {
                    reaction,
                    issues,
                    comment,
                } => {
                    let result = submit_feedback(
                        &self.transport,
                        &self.session,
                        turn_id,
                        reaction,
                        issues,
                        comment,
                    )
                    .await;
                    match result {
                        Ok(()) => {}
                        Err(FeedbackError::NoActiveSession) => {
                            error!(
                                component = "feedback",
                                turn_id = %turn_id,
                                "no active session; feedback skipped"
                            );
                        }
                        Err(err) => {
                            warn!(
                                component = "feedback",
                                turn_id = %turn_id,
                                error = %err,
                                "feedback failed; local reaction state retained"
                            );
                        }
                    }
                }
            }
        }

        ReactionOutcome {
            reaction: next,
            detail_capture,
        }
    }

    /// Clear the conversation and the session identity.
    pub fn reset(&mut self) {
        self.store.reset();
        self.session.reset();
    }

    fn last_turn(&self) -> &Turn {
        self.store
            .turns()
            .last()
            .expect("last_turn called on empty store")
    }
}
