// outbound.rs — Instructions the core emits back through the gateway.

use crate::keyboard::Keyboard;

/// One outbound instruction. The gateway delivers these in order, so a
/// handler can edit a message and then send a fresh one deterministically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Send a new message, optionally with an inline keyboard.
    Send {
        chat_id: String,
        text: String,
        keyboard: Option<Keyboard>,
    },

    /// Replace the text (and keyboard) of an already-displayed message.
    Edit {
        chat_id: String,
        message_id: i64,
        text: String,
        keyboard: Option<Keyboard>,
    },

    /// Remove a displayed message entirely.
    Delete { chat_id: String, message_id: i64 },
}

impl Outbound {
    /// Shorthand for a plain text send with no keyboard.
    pub fn text(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Outbound::Send {
            chat_id: chat_id.into(),
            text: text.into(),
            keyboard: None,
        }
    }
}
