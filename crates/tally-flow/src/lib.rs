//! # tally-flow
//!
//! The core of the bot: multi-step conversation flows, goal rendering, and
//! event routing.
//!
//! The [`Router`] receives [`Event`](tally_chat::Event)s from whatever
//! gateway is wired in, advances the per-chat [`Conversation`] state
//! machine, reads and writes goals through a
//! [`GoalStore`](tally_goal::GoalStore), and emits
//! [`Outbound`](tally_chat::Outbound) instructions. It is fully
//! synchronous and transport-agnostic, which is what makes the flows
//! testable without any network in sight.
//!
//! ## Key components
//!
//! - [`ConversationState`] — data-carrying state enum; scratch values
//!   (candidate name, threshold, edit target) live in the variant, so a
//!   half-collected goal cannot exist outside its flow state
//! - [`ConversationRegistry`] — per-chat sessions with lazy idle expiry
//! - [`render`] — pure goal list / keyboard rendering
//! - [`Router`] — event dispatch: commands, button tokens, free text

pub mod conversation;
pub mod render;
pub mod router;

pub use conversation::{Conversation, ConversationRegistry, ConversationState, GoalField};
pub use router::Router;
