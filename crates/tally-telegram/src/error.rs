// error.rs — Error types for the Telegram adapter.

use thiserror::Error;

/// Errors from talking to the Telegram Bot API.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// The HTTP request itself failed (network, TLS, malformed response body).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Telegram answered with `ok: false`.
    #[error("telegram api error {code}: {description}")]
    Api { code: i64, description: String },

    /// A request payload failed to serialize.
    #[error("payload encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}
