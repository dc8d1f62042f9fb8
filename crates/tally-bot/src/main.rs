//! # tally-bot
//!
//! The Tally daemon: wires the conversation core to Telegram and runs the
//! serial dispatch loop.
//!
//! Updates arrive through one of two sources (long polling by default,
//! webhook when configured), get translated into core events, and funnel
//! into a single mpsc channel. One task owns the router and consumes that
//! channel, so events are processed strictly one at a time — which is what
//! makes the store's load-mutate-save cycle safe without locking.
//!
//! ## Usage
//!
//! ```text
//! BOT_TOKEN=123456:ABC-... tally-bot --config tally.toml
//! ```

mod config;

use std::path::PathBuf;

use anyhow::Context;
use chrono::Duration;
use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use tally_chat::ChatGateway;
use tally_flow::Router;
use tally_goal::JsonFileStore;
use tally_telegram::{run_polling, run_webhook, TelegramClient, TelegramGateway, WebhookState};

use crate::config::{TallyConfig, UpdateMode};

/// Telegram goal-tracking bot daemon.
#[derive(Parser)]
#[command(name = "tally-bot", version, about = "Telegram goal-tracking bot daemon")]
struct Cli {
    /// Path to the config file.
    #[arg(long, default_value = "tally.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("tally_bot=info".parse()?)
                .add_directive("tally_flow=info".parse()?)
                .add_directive("tally_telegram=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = TallyConfig::load_or_default(&cli.config)?;
    let token = std::env::var("BOT_TOKEN").context("BOT_TOKEN is not set")?;

    let client = TelegramClient::new(&token);
    let me = client
        .get_me()
        .await
        .context("getMe failed — check BOT_TOKEN")?;
    let username = me.username.unwrap_or(me.first_name);
    tracing::info!(bot = %username, "authenticated with Telegram");

    let store = JsonFileStore::new(&config.storage.path)?;
    tracing::info!(path = %config.storage.path.display(), "goal store ready");
    let mut router = Router::new(
        store,
        Duration::seconds(config.conversation.idle_timeout_secs as i64),
    );
    let gateway = TelegramGateway::new(client.clone(), &username);

    // All update sources feed this one channel; the loop below is the
    // single consumer.
    let (tx, mut rx) = mpsc::channel(64);

    match config.telegram.mode {
        UpdateMode::Polling => {
            // A leftover webhook registration blocks getUpdates.
            client.delete_webhook().await?;
            tokio::spawn(run_polling(client.clone(), username.clone(), tx));
            tracing::info!("long polling for updates");
        }
        UpdateMode::Webhook => {
            let base = config
                .telegram
                .webhook_url
                .as_deref()
                .context("webhook mode requires telegram.webhook_url")?;
            let url = format!("{}/webhook/{token}", base.trim_end_matches('/'));
            client.set_webhook(&url).await?;
            let state = WebhookState::new(client.clone(), username.clone(), token.clone(), tx);
            let listen_addr = config.telegram.listen_addr.clone();
            tokio::spawn(async move {
                if let Err(e) = run_webhook(&listen_addr, state).await {
                    tracing::error!(error = %e, "webhook server failed");
                }
            });
            tracing::info!("webhook registered, awaiting updates");
        }
    }

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                break;
            }
            received = rx.recv() => {
                let Some(event) = received else { break };
                tracing::debug!(chat_id = event.chat_id(), "dispatching event");
                for outbound in router.handle(&event) {
                    if let Err(e) = gateway.deliver(&outbound).await {
                        tracing::warn!(channel = gateway.channel_id(), error = %e, "delivery failed");
                    }
                }
            }
        }
    }

    tracing::info!("tally-bot stopped");
    Ok(())
}
