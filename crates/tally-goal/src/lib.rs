//! # tally-goal
//!
//! Goal records and persistence for the Tally goal-tracking bot.
//!
//! A [`Goal`] is one tracked objective ("read 100 books ≥", "spend ≤ 50").
//! Goals live in a [`GoalBook`] — the single persisted aggregate, keyed by
//! chat id, one ordered list per chat. The whole book is loaded before each
//! operation, mutated in memory, and written back in full afterwards.
//!
//! ## Key components
//!
//! - [`Goal`] / [`GoalKind`] — one goal record and its counting direction
//! - [`GoalBook`] — ordered per-chat goal lists, the persisted aggregate
//! - [`GoalStore`] — storage seam (trait) so callers never touch the file directly
//! - [`JsonFileStore`] — production backend: one JSON document, atomic replace
//! - [`InMemoryStore`] — test fake and dry-run backend

pub mod book;
pub mod error;
pub mod goal;
pub mod store;

pub use book::GoalBook;
pub use error::StoreError;
pub use goal::{Goal, GoalKind};
pub use store::{GoalStore, InMemoryStore, JsonFileStore};
