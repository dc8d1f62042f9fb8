// wire.rs — Telegram Bot API wire types.
//
// Only the fields the bot actually reads are modeled; Telegram sends far
// more and serde skips the rest. Inbound types derive Deserialize, the
// keyboard markup we send derives Serialize.

use serde::{Deserialize, Serialize};

use tally_chat::Keyboard;

/// One item from `getUpdates` / a webhook POST body.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// An inline-button press. `message` is the message carrying the keyboard.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub message: Option<Message>,
}

/// The bot's own identity, from `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// Envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default = "Option::default")]
    pub result: Option<T>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl From<&Keyboard> for InlineKeyboardMarkup {
    fn from(keyboard: &Keyboard) -> Self {
        Self {
            inline_keyboard: keyboard
                .rows
                .iter()
                .map(|row| {
                    row.iter()
                        .map(|button| InlineKeyboardButton {
                            text: button.label.clone(),
                            callback_data: button.token.clone(),
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_chat::{Button, ButtonToken};

    #[test]
    fn update_parses_a_text_message() {
        let update: Update = serde_json::from_value(serde_json::json!({
            "update_id": 100,
            "message": {
                "message_id": 7,
                "chat": { "id": 42, "type": "private" },
                "from": { "id": 1, "is_bot": false, "first_name": "A" },
                "text": "hello"
            }
        }))
        .unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.chat.id, 42);
        assert_eq!(message.text.as_deref(), Some("hello"));
        assert!(update.callback_query.is_none());
    }

    #[test]
    fn update_parses_a_callback_query() {
        let update: Update = serde_json::from_value(serde_json::json!({
            "update_id": 101,
            "callback_query": {
                "id": "cb1",
                "from": { "id": 1, "is_bot": false, "first_name": "A" },
                "data": "add_goal",
                "message": { "message_id": 9, "chat": { "id": 42 } }
            }
        }))
        .unwrap();
        let query = update.callback_query.unwrap();
        assert_eq!(query.data.as_deref(), Some("add_goal"));
        assert_eq!(query.message.unwrap().message_id, 9);
    }

    #[test]
    fn keyboard_converts_to_reply_markup_shape() {
        let kb = Keyboard::new()
            .row(vec![
                Button::new("a", ButtonToken::AddGoal),
                Button::new("b", ButtonToken::EditStart),
            ])
            .single(Button::new("c", ButtonToken::EditCancel));
        let markup = InlineKeyboardMarkup::from(&kb);
        let json = serde_json::to_value(&markup).unwrap();
        assert_eq!(json["inline_keyboard"][0][0]["text"], "a");
        assert_eq!(json["inline_keyboard"][0][1]["callback_data"], "edit_start");
        assert_eq!(json["inline_keyboard"][1][0]["callback_data"], "edit_cancel");
    }
}
