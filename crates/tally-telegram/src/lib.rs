//! # tally-telegram
//!
//! Telegram Bot API adapter: the concrete side of the messaging gateway
//! boundary. Everything Telegram-specific lives here — wire types, the
//! HTTP client, update→event translation, and the two update sources
//! (long polling and webhook). The core crates never see any of it.
//!
//! ## Key components
//!
//! - [`TelegramClient`] — hand-rolled Bot API client over reqwest
//! - [`TelegramGateway`] — [`ChatGateway`](tally_chat::ChatGateway)
//!   implementation delivering outbound instructions
//! - [`translate_update`] — Telegram update → core [`Event`](tally_chat::Event)
//! - [`run_polling`] / [`webhook_app`] — update sources feeding the
//!   dispatch channel

pub mod client;
pub mod error;
pub mod gateway;
pub mod ingest;
pub mod polling;
pub mod webhook;
pub mod wire;

pub use client::TelegramClient;
pub use error::TelegramError;
pub use gateway::TelegramGateway;
pub use ingest::{parse_command, translate_update, Ingested};
pub use polling::run_polling;
pub use webhook::{run_webhook, webhook_app, WebhookState};
