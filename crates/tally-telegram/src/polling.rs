// polling.rs — Long-poll update source.
//
// Pulls updates with getUpdates and feeds translated events into the
// dispatch channel. Runs until the channel closes (daemon shutdown drops
// the receiver). API hiccups back off briefly and retry — polling is the
// resilient path and must not die over a transient 502.

use std::time::Duration;

use tokio::sync::mpsc;

use tally_chat::Event;

use crate::client::TelegramClient;
use crate::ingest::translate_update;

const POLL_TIMEOUT_SECS: u64 = 30;
const RETRY_BACKOFF: Duration = Duration::from_secs(3);

pub async fn run_polling(client: TelegramClient, bot_username: String, tx: mpsc::Sender<Event>) {
    let mut offset = 0i64;
    loop {
        let updates = match client.get_updates(offset, POLL_TIMEOUT_SECS).await {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "getUpdates failed, backing off");
                tokio::time::sleep(RETRY_BACKOFF).await;
                continue;
            }
        };
        for update in updates {
            offset = offset.max(update.update_id + 1);
            let ingested = translate_update(update, Some(&bot_username));
            if let Some(callback_id) = &ingested.callback_id {
                if let Err(e) = client.answer_callback_query(callback_id).await {
                    tracing::warn!(error = %e, "answerCallbackQuery failed");
                }
            }
            let Some(event) = ingested.event else { continue };
            if tx.send(event).await.is_err() {
                tracing::info!("dispatch channel closed, stopping polling");
                return;
            }
        }
    }
}
