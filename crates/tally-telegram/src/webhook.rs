// webhook.rs — Webhook update source.
//
// Telegram POSTs updates to `/webhook/<token>` — the bot token doubles as
// the path secret, matching the setWebhook registration in tally-bot. A
// wrong token gets a 404 and no processing. The handler always answers
// 200 for valid-token requests; failing one would only make Telegram
// redeliver an update we already chose to drop.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::Json;
use tokio::sync::mpsc;

use tally_chat::Event;

use crate::client::TelegramClient;
use crate::ingest::translate_update;
use crate::wire::Update;

#[derive(Clone)]
pub struct WebhookState {
    client: TelegramClient,
    bot_username: String,
    token: String,
    tx: mpsc::Sender<Event>,
}

impl WebhookState {
    pub fn new(
        client: TelegramClient,
        bot_username: impl Into<String>,
        token: impl Into<String>,
        tx: mpsc::Sender<Event>,
    ) -> Self {
        Self {
            client,
            bot_username: bot_username.into(),
            token: token.into(),
            tx,
        }
    }
}

/// The axum router serving the webhook endpoint.
pub fn webhook_app(state: WebhookState) -> axum::Router {
    axum::Router::new()
        .route("/webhook/{token}", post(receive_update))
        .with_state(state)
}

/// Bind and serve the webhook app until the process shuts down.
pub async fn run_webhook(listen_addr: &str, state: WebhookState) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    tracing::info!(listen_addr, "webhook server listening");
    axum::serve(listener, webhook_app(state)).await
}

async fn receive_update(
    State(state): State<WebhookState>,
    Path(token): Path<String>,
    Json(update): Json<Update>,
) -> StatusCode {
    if token != state.token {
        tracing::warn!("webhook request with wrong path token");
        return StatusCode::NOT_FOUND;
    }
    let ingested = translate_update(update, Some(&state.bot_username));
    if let Some(callback_id) = &ingested.callback_id {
        if let Err(e) = state.client.answer_callback_query(callback_id).await {
            tracing::warn!(error = %e, "answerCallbackQuery failed");
        }
    }
    if let Some(event) = ingested.event {
        if state.tx.send(event).await.is_err() {
            tracing::warn!("dispatch channel closed, dropping webhook update");
        }
    }
    StatusCode::OK
}
