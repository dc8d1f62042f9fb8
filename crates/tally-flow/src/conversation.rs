// conversation.rs — Per-chat conversation sessions.
//
// A conversation exists only while a multi-step dialog is in progress.
// The state enum carries its scratch data: the candidate name collected in
// the add flow, the target goal id in the edit flow. There is no separate
// "collected fields" bag — a state that hasn't collected a value has no
// field for it.
//
// Sessions expire lazily: the registry checks the idle clock whenever the
// chat's next event arrives. An abandoned dialog therefore cannot pin its
// scratch state forever.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Which goal field an edit-flow value applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalField {
    Name,
    Threshold,
    Kind,
}

/// Where a chat currently is in a dialog.
///
/// Add flow:  `AddAwaitName → AddAwaitThreshold → AddAwaitKind → commit`.
/// Edit flow: `EditSelectGoal → EditSelectAction → (delete | EditSelectField
/// → EditAwaitValue) → commit`. Terminal states are not represented — a
/// finished dialog simply has no session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationState {
    /// Waiting for the new goal's name.
    AddAwaitName,

    /// Name collected; waiting for the threshold.
    AddAwaitThreshold { name: String },

    /// Name and threshold collected; waiting for the kind choice.
    AddAwaitKind { name: String, threshold: u32 },

    /// Waiting for the user to pick which goal to manage.
    EditSelectGoal,

    /// Goal picked; waiting for edit-or-delete.
    EditSelectAction { goal_id: Uuid },

    /// Edit chosen; waiting for the field choice.
    EditSelectField { goal_id: Uuid },

    /// Field chosen; waiting for the new value (text or kind button).
    EditAwaitValue { goal_id: Uuid, field: GoalField },
}

impl ConversationState {
    /// True for the manage-goals dialog states, where the cancel button
    /// is live.
    pub fn is_edit_flow(&self) -> bool {
        matches!(
            self,
            ConversationState::EditSelectGoal
                | ConversationState::EditSelectAction { .. }
                | ConversationState::EditSelectField { .. }
                | ConversationState::EditAwaitValue { .. }
        )
    }
}

/// One chat's active dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub chat_id: String,
    pub state: ConversationState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    fn new(chat_id: &str, state: ConversationState, now: DateTime<Utc>) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            state,
            created_at: now,
            updated_at: now,
        }
    }
}

/// All active conversations, keyed by chat id.
///
/// Expiry is lazy: [`state`](ConversationRegistry::state) drops a session
/// whose last activity is older than the idle timeout before reporting it.
/// Reading a live session counts as activity — any handled input keeps the
/// dialog alive, including input that only produced a re-prompt.
pub struct ConversationRegistry {
    sessions: HashMap<String, Conversation>,
    idle_timeout: Duration,
}

impl ConversationRegistry {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            idle_timeout,
        }
    }

    /// Start a dialog for the chat, replacing any previous session.
    pub fn begin(&mut self, chat_id: &str, state: ConversationState) {
        let now = Utc::now();
        self.sessions
            .insert(chat_id.to_string(), Conversation::new(chat_id, state, now));
    }

    /// The chat's current dialog state, if a live session exists.
    /// Expired sessions are removed on the way.
    pub fn state(&mut self, chat_id: &str) -> Option<ConversationState> {
        self.state_at(chat_id, Utc::now())
    }

    /// Clock-injectable variant of [`state`](ConversationRegistry::state).
    pub fn state_at(&mut self, chat_id: &str, now: DateTime<Utc>) -> Option<ConversationState> {
        let expired = match self.sessions.get(chat_id) {
            Some(session) => now - session.updated_at > self.idle_timeout,
            None => return None,
        };
        if expired {
            self.sessions.remove(chat_id);
            tracing::debug!(chat_id, "conversation expired after idle timeout");
            return None;
        }
        let session = self.sessions.get_mut(chat_id)?;
        session.updated_at = now;
        Some(session.state.clone())
    }

    /// True if the chat has a live session.
    pub fn is_active(&mut self, chat_id: &str) -> bool {
        self.state(chat_id).is_some()
    }

    /// Move the chat's session to a new state.
    /// No-op if no session exists (an expired one stays gone).
    pub fn transition(&mut self, chat_id: &str, state: ConversationState) {
        if let Some(session) = self.sessions.get_mut(chat_id) {
            session.state = state;
            session.updated_at = Utc::now();
        }
    }

    /// End the chat's dialog. Returns true if there was one.
    pub fn end(&mut self, chat_id: &str) -> bool {
        self.sessions.remove(chat_id).is_some()
    }
}
