// client.rs — Hand-rolled Telegram Bot API client.
//
// Every method POSTs JSON to `<api_root>/bot<token>/<method>` and unwraps
// the ApiResponse envelope. The api root is injectable so tests (or a
// local Bot API server) can point it somewhere else.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use tally_chat::Keyboard;

use crate::error::TelegramError;
use crate::wire::{ApiResponse, InlineKeyboardMarkup, Message, Update, User};

const API_ROOT: &str = "https://api.telegram.org";

#[derive(Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base: String,
}

impl TelegramClient {
    /// Client for the public Bot API.
    pub fn new(token: &str) -> Self {
        Self::with_api_root(API_ROOT, token)
    }

    /// Client against a custom api root (testing, self-hosted Bot API).
    pub fn with_api_root(api_root: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base: format!("{}/bot{token}", api_root.trim_end_matches('/')),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        payload: &Value,
    ) -> Result<T, TelegramError> {
        let response = self
            .http
            .post(format!("{}/{method}", self.base))
            .json(payload)
            .send()
            .await?;
        let body: ApiResponse<T> = response.json().await?;
        if !body.ok {
            return Err(TelegramError::Api {
                code: body.error_code.unwrap_or(0),
                description: body
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }
        body.result.ok_or(TelegramError::Api {
            code: 0,
            description: format!("{method}: ok response without result"),
        })
    }

    /// Fire a method whose result the bot doesn't care about.
    async fn call_ignored(&self, method: &str, payload: &Value) -> Result<(), TelegramError> {
        self.call::<Value>(method, payload).await.map(|_| ())
    }

    /// Identity check; fails fast on a bad token.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &json!({})).await
    }

    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<Message, TelegramError> {
        let mut payload = json!({ "chat_id": chat_id, "text": text });
        if let Some(keyboard) = keyboard {
            payload["reply_markup"] = serde_json::to_value(InlineKeyboardMarkup::from(keyboard))?;
        }
        self.call("sendMessage", &payload).await
    }

    pub async fn edit_message_text(
        &self,
        chat_id: &str,
        message_id: i64,
        text: &str,
        keyboard: Option<&Keyboard>,
    ) -> Result<(), TelegramError> {
        let mut payload = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
        });
        if let Some(keyboard) = keyboard {
            payload["reply_markup"] = serde_json::to_value(InlineKeyboardMarkup::from(keyboard))?;
        }
        self.call_ignored("editMessageText", &payload).await
    }

    pub async fn delete_message(&self, chat_id: &str, message_id: i64) -> Result<(), TelegramError> {
        self.call_ignored(
            "deleteMessage",
            &json!({ "chat_id": chat_id, "message_id": message_id }),
        )
        .await
    }

    /// Stop the client-side loading spinner on a pressed button.
    pub async fn answer_callback_query(&self, callback_id: &str) -> Result<(), TelegramError> {
        self.call_ignored("answerCallbackQuery", &json!({ "callback_query_id": callback_id }))
            .await
    }

    /// Long-poll for updates past `offset`.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        self.call(
            "getUpdates",
            &json!({
                "offset": offset,
                "timeout": timeout_secs,
                "allowed_updates": ["message", "callback_query"],
            }),
        )
        .await
    }

    pub async fn set_webhook(&self, url: &str) -> Result<(), TelegramError> {
        self.call_ignored(
            "setWebhook",
            &json!({ "url": url, "allowed_updates": ["message", "callback_query"] }),
        )
        .await
    }

    pub async fn delete_webhook(&self) -> Result<(), TelegramError> {
        self.call_ignored("deleteWebhook", &json!({})).await
    }
}
