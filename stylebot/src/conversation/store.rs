//! In-memory conversation store keyed by chat id, with expiry of abandoned sessions.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, info, warn};

use super::state::{ChatSession, ConversationState};

/// Chat id → session. Absent means Idle; setting Idle removes the entry.
#[derive(Debug, Default)]
pub struct ConversationStore {
    sessions: DashMap<i64, ChatSession>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, chat_id: i64) -> ConversationState {
        self.sessions
            .get(&chat_id)
            .map(|s| s.state.clone())
            .unwrap_or_default()
    }

    /// Replaces the chat's state and refreshes its timestamp.
    pub fn set(&self, chat_id: i64, state: ConversationState) {
        debug!(chat_id = chat_id, state = state.name(), "Conversation state set");
        if state.is_idle() {
            self.sessions.remove(&chat_id);
        } else {
            self.sessions.insert(chat_id, ChatSession::new(state));
        }
    }

    /// Refreshes the chat's timestamp without changing its state. False when the chat is Idle.
    pub fn touch(&self, chat_id: i64) -> bool {
        match self.sessions.get_mut(&chat_id) {
            Some(mut session) => {
                session.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// Returns the chat to Idle without touching stored files; returns the previous state.
    pub fn reset(&self, chat_id: i64) -> ConversationState {
        self.remove(chat_id).unwrap_or_default()
    }

    pub fn remove(&self, chat_id: i64) -> Option<ConversationState> {
        self.sessions.remove(&chat_id).map(|(_, s)| s.state)
    }

    /// Sessions not in Idle.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drops sessions untouched for longer than `ttl`, deleting their stored images.
    /// Returns the number of sessions removed.
    pub fn expire_idle(&self, ttl: Duration) -> usize {
        let Some(cutoff) = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_sub_signed(ttl))
        else {
            return 0;
        };

        let stale: Vec<i64> = self
            .sessions
            .iter()
            .filter(|entry| entry.value().updated_at < cutoff)
            .map(|entry| *entry.key())
            .collect();

        let mut removed = 0;
        for chat_id in stale {
            // Re-check under the entry lock: the chat may have moved on since the scan.
            if let Some((_, session)) = self
                .sessions
                .remove_if(&chat_id, |_, s| s.updated_at < cutoff)
            {
                if let Some(path) = session.state.stored_image() {
                    remove_image(path);
                }
                info!(chat_id = chat_id, state = session.state.name(), "Conversation expired");
                removed += 1;
            }
        }
        removed
    }

    #[cfg(test)]
    pub(crate) fn set_updated_at(&self, chat_id: i64, at: chrono::DateTime<Utc>) {
        if let Some(mut session) = self.sessions.get_mut(&chat_id) {
            session.updated_at = at;
        }
    }
}

pub(crate) fn remove_image(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "Removed stored image"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(error = %e, path = %path.display(), "Failed to remove stored image"),
    }
}
