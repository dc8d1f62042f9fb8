// gateway.rs — ChatGateway trait: pluggable delivery of outbound instructions.
//
// The core produces Outbound values; a gateway implementation turns them
// into transport API calls. Implementations can target any medium — the
// shipped one is Telegram (tally-telegram), tests use a recording fake.

use async_trait::async_trait;

use crate::outbound::Outbound;

/// Errors from delivering an outbound instruction.
///
/// Delivery failures are logged and skipped by the dispatch loop — a chat
/// transport hiccup must never wedge event processing.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The transport could not be reached (network, DNS, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The transport API rejected the call.
    #[error("api error {code}: {description}")]
    Api { code: i64, description: String },

    /// The gateway has shut down and accepts no further instructions.
    #[error("gateway closed")]
    Closed,
}

/// Delivery seam between the core and the chat transport.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Deliver one outbound instruction.
    async fn deliver(&self, outbound: &Outbound) -> Result<(), GatewayError>;

    /// Gateway identity string for logs (e.g., "telegram:my_tally_bot").
    fn channel_id(&self) -> &str;
}
