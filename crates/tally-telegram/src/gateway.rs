// gateway.rs — ChatGateway implementation over the Telegram client.

use async_trait::async_trait;

use tally_chat::{ChatGateway, GatewayError, Outbound};

use crate::client::TelegramClient;
use crate::error::TelegramError;

/// Delivers core outbound instructions through the Telegram Bot API.
pub struct TelegramGateway {
    client: TelegramClient,
    channel_id: String,
}

impl TelegramGateway {
    pub fn new(client: TelegramClient, bot_username: &str) -> Self {
        Self {
            client,
            channel_id: format!("telegram:{bot_username}"),
        }
    }
}

impl From<TelegramError> for GatewayError {
    fn from(e: TelegramError) -> Self {
        match e {
            TelegramError::Api { code, description } => GatewayError::Api { code, description },
            other => GatewayError::Transport(other.to_string()),
        }
    }
}

#[async_trait]
impl ChatGateway for TelegramGateway {
    async fn deliver(&self, outbound: &Outbound) -> Result<(), GatewayError> {
        match outbound {
            Outbound::Send {
                chat_id,
                text,
                keyboard,
            } => {
                self.client
                    .send_message(chat_id, text, keyboard.as_ref())
                    .await?;
            }
            Outbound::Edit {
                chat_id,
                message_id,
                text,
                keyboard,
            } => {
                self.client
                    .edit_message_text(chat_id, *message_id, text, keyboard.as_ref())
                    .await?;
            }
            Outbound::Delete {
                chat_id,
                message_id,
            } => {
                self.client.delete_message(chat_id, *message_id).await?;
            }
        }
        Ok(())
    }

    fn channel_id(&self) -> &str {
        &self.channel_id
    }
}
