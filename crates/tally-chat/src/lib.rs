//! # tally-chat
//!
//! The messaging gateway boundary: everything the core exchanges with
//! whatever chat transport is wired in.
//!
//! The core consumes [`Event`]s (command invoked, button pressed, text
//! received), produces [`Outbound`] instructions (send, edit, delete), and
//! tags buttons with an opaque [`ButtonToken`] that the transport
//! round-trips unmodified. Delivery happens behind the [`ChatGateway`]
//! trait — the core never talks to a transport API directly.
//!
//! Nothing in this crate knows about Telegram; the concrete adapter lives
//! in `tally-telegram`.

pub mod event;
pub mod gateway;
pub mod keyboard;
pub mod outbound;
pub mod token;

pub use event::{Command, Event};
pub use gateway::{ChatGateway, GatewayError};
pub use keyboard::{Button, Keyboard};
pub use outbound::Outbound;
pub use token::{ButtonToken, FieldToken, KindToken};
