// event.rs — Inbound events the core consumes from the gateway.

/// Bot commands the router understands.
///
/// The transport adapter parses the raw command text (including any
/// `@botname` suffix) and drops anything it doesn't recognize before the
/// event reaches the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/start` — ensure the chat exists in the store, greet, show goals.
    Start,
    /// `/status` — show goals and controls, no mutation.
    Status,
    /// `/add_goal` — start the add-goal dialog.
    AddGoal,
    /// `/cancel` — abandon any active dialog.
    Cancel,
}

/// One inbound event, already translated out of the transport's wire shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A command was invoked in a chat.
    Command { chat_id: String, command: Command },

    /// An inline button was pressed. `token` is the raw callback string;
    /// the core parses it with [`ButtonToken::parse`](crate::ButtonToken::parse).
    /// `message_id` identifies the message carrying the keyboard, so the
    /// core can edit or delete it in place.
    Button {
        chat_id: String,
        message_id: i64,
        token: String,
    },

    /// A free-text message arrived (commands are never delivered as text).
    Text { chat_id: String, content: String },
}

impl Event {
    /// The chat this event originated from.
    pub fn chat_id(&self) -> &str {
        match self {
            Event::Command { chat_id, .. }
            | Event::Button { chat_id, .. }
            | Event::Text { chat_id, .. } => chat_id,
        }
    }
}
