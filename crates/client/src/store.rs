//! Conversation store
//!
//! Ordered, append-only log of turns — the only state the rendering
//! layer consumes. Turns keep strict creation order and are never
//! re-sorted. There is no deletion; `reset` clears the whole sequence
//! and is the only way it shrinks.

use ssassist_protocol::Turn;

#[derive(Debug, Default)]
pub struct ConversationStore {
    turns: Vec<Turn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn at the end of the log.
    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Replace the whole sequence. Used by the reconciler's second
    /// commit phase to rewrite provisional identities; callers must
    /// never drop a provisional record this way.
    pub fn replace_all(&mut self, turns: Vec<Turn>) {
        self.turns = turns;
    }

    /// Find a turn by id. Provisional turns carry an empty id until the
    /// reconciler assigns one, so lookups by empty id are rejected.
    pub fn find(&self, id: &str) -> Option<&Turn> {
        if id.is_empty() {
            return None;
        }
        self.turns.iter().find(|t| t.id == id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Turn> {
        if id.is_empty() {
            return None;
        }
        self.turns.iter_mut().find(|t| t.id == id)
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Drop every turn.
    pub fn reset(&mut self) {
        self.turns.clear();
    }
}
