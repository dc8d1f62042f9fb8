// ingest.rs — Telegram update → core event translation.
//
// Shared by both update sources (long polling and webhook). The adapter
// parses commands here — including the `@botname` suffix Telegram appends
// in group chats — so the core only ever sees its own Command vocabulary.
// Unknown commands are dropped; they are not free text.

use tally_chat::{Command, Event};

use crate::wire::Update;

/// The outcome of translating one update.
pub struct Ingested {
    /// The core event, if the update maps to one.
    pub event: Option<Event>,

    /// Callback query id to acknowledge, if the update was a button press.
    /// Acknowledged even when the event is dropped — the client's loading
    /// spinner must stop either way.
    pub callback_id: Option<String>,
}

/// Translate one Telegram update into a core event.
pub fn translate_update(update: Update, bot_username: Option<&str>) -> Ingested {
    if let Some(query) = update.callback_query {
        let event = match (query.message, query.data) {
            (Some(message), Some(data)) => Some(Event::Button {
                chat_id: message.chat.id.to_string(),
                message_id: message.message_id,
                token: data,
            }),
            _ => None,
        };
        return Ingested {
            event,
            callback_id: Some(query.id),
        };
    }

    let event = update.message.and_then(|message| {
        let chat_id = message.chat.id.to_string();
        let text = message.text?;
        if text.starts_with('/') {
            return parse_command(&text, bot_username)
                .map(|command| Event::Command { chat_id, command });
        }
        Some(Event::Text {
            chat_id,
            content: text,
        })
    });
    Ingested {
        event,
        callback_id: None,
    }
}

/// Parse a `/command` line, tolerating arguments and an `@botname` suffix.
///
/// Commands addressed to a different bot (mismatched suffix) and commands
/// outside the vocabulary return `None`.
pub fn parse_command(text: &str, bot_username: Option<&str>) -> Option<Command> {
    let first = text.split_whitespace().next()?;
    let (command, suffix) = match first.split_once('@') {
        Some((command, suffix)) => (command, Some(suffix)),
        None => (first, None),
    };
    if let (Some(suffix), Some(username)) = (suffix, bot_username) {
        if !suffix.eq_ignore_ascii_case(username) {
            return None;
        }
    }
    match command {
        "/start" => Some(Command::Start),
        "/status" => Some(Command::Status),
        "/add_goal" => Some(Command::AddGoal),
        "/cancel" => Some(Command::Cancel),
        _ => None,
    }
}
