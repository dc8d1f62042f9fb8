// router.rs — Event dispatch: commands, button tokens, free text.
//
// The router owns the goal store and the conversation registry. Every
// mutation is a full load-mutate-save cycle; the daemon keeps the router
// behind a single dispatch task, so at most one cycle is ever in flight
// and the non-transactional store cannot lose updates.
//
// Failure policy: malformed input re-prompts in place (both flows — the
// edit flow deliberately no longer aborts over a typo), vanished goals
// surface a not-found notice and end the dialog, storage failures abort
// the operation with an explicit notice and leave the dialog alive so the
// last input can be retried. Unrecognized tokens are a silent no-op.

use chrono::Duration;
use uuid::Uuid;

use tally_chat::{ButtonToken, Command, Event, FieldToken, Keyboard, KindToken, Outbound};
use tally_goal::{Goal, GoalBook, GoalKind, GoalStore};

use crate::conversation::{ConversationRegistry, ConversationState, GoalField};
use crate::render;

const GREETING: &str =
    "Hi! 🎯 I help you track yearly goals.\nUse /status to see progress and manage goals.";
const PROMPT_NAME: &str = "Enter the goal name:";
const PROMPT_NAME_EMPTY: &str = "The name cannot be empty. Enter the goal name:";
const PROMPT_THRESHOLD: &str = "Enter the threshold (a positive integer, e.g. 100):";
const PROMPT_THRESHOLD_INVALID: &str = "Please enter a positive integer.";
const PROMPT_KIND: &str = "Choose the goal type:";
const PROMPT_NEW_NAME: &str = "Enter the new name:";
const PROMPT_NEW_NAME_EMPTY: &str = "The name cannot be empty. Enter the new name:";
const PROMPT_NEW_THRESHOLD: &str = "Enter the new threshold (a positive integer):";
const PROMPT_NEW_KIND: &str = "Choose the new goal type:";
const PICK_GOAL: &str = "Choose a goal to manage:";
const PICK_FIELD: &str = "Which field do you want to change?";
const NOT_FOUND: &str = "❌ Goal not found.";
const BUSY: &str = "You're in the middle of another dialog. Finish it or use /cancel first.";
const CANCELLED: &str = "Cancelled. Nothing was changed.";
const NOTHING_TO_CANCEL: &str = "Nothing to cancel.";
const LOAD_FAILED: &str = "⚠️ Couldn't read your goals. Please try again.";
const SAVE_FAILED: &str = "⚠️ Couldn't save your goals — nothing was changed. Please try again.";

/// A validated new value for one goal field.
enum EditValue {
    Name(String),
    Threshold(u32),
    Kind(GoalKind),
}

/// Dispatches inbound events to flow handlers and stateless actions.
pub struct Router<S> {
    store: S,
    sessions: ConversationRegistry,
}

impl<S: GoalStore> Router<S> {
    pub fn new(store: S, idle_timeout: Duration) -> Self {
        Self {
            store,
            sessions: ConversationRegistry::new(idle_timeout),
        }
    }

    /// The underlying store (used by tests and offline tooling).
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handle one inbound event and return the outbound instructions it
    /// produced, in delivery order. An empty vec is a deliberate no-op.
    pub fn handle(&mut self, event: &Event) -> Vec<Outbound> {
        match event {
            Event::Command { chat_id, command } => match command {
                Command::Start => self.cmd_start(chat_id),
                Command::Status => self.cmd_status(chat_id),
                Command::AddGoal => self.start_add_flow(chat_id, None),
                Command::Cancel => self.cmd_cancel(chat_id),
            },
            Event::Button {
                chat_id,
                message_id,
                token,
            } => match ButtonToken::parse(token) {
                Some(token) => self.handle_button(chat_id, *message_id, token),
                None => {
                    tracing::debug!(chat_id, token, "unrecognized button token, ignoring");
                    Vec::new()
                }
            },
            Event::Text { chat_id, content } => self.handle_text(chat_id, content),
        }
    }

    // ---- commands -------------------------------------------------------

    fn cmd_start(&mut self, chat_id: &str) -> Vec<Outbound> {
        let mut book = match self.load_book(chat_id) {
            Ok(book) => book,
            Err(out) => return out,
        };
        if book.ensure_chat(chat_id) {
            if let Err(out) = self.save_book(chat_id, &book) {
                return out;
            }
            tracing::info!(chat_id, "registered new chat");
        }
        let goals = book.goals(chat_id);
        vec![send_kb(
            chat_id,
            format!("{GREETING}\n\n{}", render::goal_list_text(goals)),
            render::status_keyboard(goals),
        )]
    }

    fn cmd_status(&mut self, chat_id: &str) -> Vec<Outbound> {
        let book = match self.load_book(chat_id) {
            Ok(book) => book,
            Err(out) => return out,
        };
        let goals = book.goals(chat_id);
        vec![send_kb(
            chat_id,
            render::goal_list_text(goals),
            render::status_keyboard(goals),
        )]
    }

    fn cmd_cancel(&mut self, chat_id: &str) -> Vec<Outbound> {
        if self.sessions.end(chat_id) {
            vec![send(chat_id, CANCELLED)]
        } else {
            vec![send(chat_id, NOTHING_TO_CANCEL)]
        }
    }

    // ---- flow entry points ----------------------------------------------

    /// Start the add-goal dialog. Entry by button edits the originating
    /// message into the prompt; entry by command sends a fresh one.
    fn start_add_flow(&mut self, chat_id: &str, origin: Option<i64>) -> Vec<Outbound> {
        if self.sessions.is_active(chat_id) {
            return vec![send(chat_id, BUSY)];
        }
        self.sessions.begin(chat_id, ConversationState::AddAwaitName);
        match origin {
            Some(message_id) => vec![edit(chat_id, message_id, PROMPT_NAME, None)],
            None => vec![send(chat_id, PROMPT_NAME)],
        }
    }

    fn start_edit_flow(&mut self, chat_id: &str, message_id: i64) -> Vec<Outbound> {
        if self.sessions.is_active(chat_id) {
            return vec![send(chat_id, BUSY)];
        }
        let book = match self.load_book(chat_id) {
            Ok(book) => book,
            Err(out) => return out,
        };
        let goals = book.goals(chat_id);
        if goals.is_empty() {
            return vec![edit(
                chat_id,
                message_id,
                render::NO_GOALS,
                Some(render::status_keyboard(goals)),
            )];
        }
        self.sessions.begin(chat_id, ConversationState::EditSelectGoal);
        vec![edit(
            chat_id,
            message_id,
            PICK_GOAL,
            Some(render::goal_picker(goals)),
        )]
    }

    // ---- buttons --------------------------------------------------------

    fn handle_button(&mut self, chat_id: &str, message_id: i64, token: ButtonToken) -> Vec<Outbound> {
        match token {
            // Stateless actions — never intercepted by an active dialog.
            ButtonToken::Increment(goal_id) => self.adjust(chat_id, message_id, goal_id, 1),
            ButtonToken::Decrement(goal_id) => self.adjust(chat_id, message_id, goal_id, -1),
            ButtonToken::AddGoal => self.start_add_flow(chat_id, Some(message_id)),
            ButtonToken::EditStart => self.start_edit_flow(chat_id, message_id),
            other => self.flow_button(chat_id, message_id, other),
        }
    }

    /// Adjust a goal's progress by ±1 and re-render the list in place.
    fn adjust(&mut self, chat_id: &str, message_id: i64, goal_id: Uuid, delta: i32) -> Vec<Outbound> {
        let mut book = match self.load_book(chat_id) {
            Ok(book) => book,
            Err(out) => return out,
        };
        if book.adjust_progress(chat_id, goal_id, delta).is_none() {
            return vec![edit(chat_id, message_id, NOT_FOUND, None)];
        }
        if let Err(out) = self.save_book(chat_id, &book) {
            return out;
        }
        let goals = book.goals(chat_id);
        vec![edit(
            chat_id,
            message_id,
            render::goal_list_text(goals),
            Some(render::status_keyboard(goals)),
        )]
    }

    /// Buttons in the dialog namespaces: routed to the active conversation,
    /// no-ops without one (expired session, stale keyboard).
    fn flow_button(&mut self, chat_id: &str, message_id: i64, token: ButtonToken) -> Vec<Outbound> {
        let Some(state) = self.sessions.state(chat_id) else {
            tracing::debug!(chat_id, %token, "flow button with no active conversation, ignoring");
            return Vec::new();
        };

        // Cancel is live from every edit-flow state; the add flow is
        // cancelled via /cancel instead (its keyboards carry no cancel).
        if token == ButtonToken::EditCancel {
            if state.is_edit_flow() {
                self.sessions.end(chat_id);
                return vec![Outbound::Delete {
                    chat_id: chat_id.to_string(),
                    message_id,
                }];
            }
            return Vec::new();
        }

        match (state, token) {
            (ConversationState::AddAwaitKind { name, threshold }, ButtonToken::Kind(kind)) => {
                self.commit_add(chat_id, message_id, name, threshold, goal_kind(kind))
            }
            (ConversationState::EditSelectGoal, ButtonToken::EditSelect(goal_id)) => {
                self.select_goal(chat_id, message_id, goal_id)
            }
            (ConversationState::EditSelectAction { goal_id }, ButtonToken::ActionDelete) => {
                self.delete_goal(chat_id, message_id, goal_id)
            }
            (ConversationState::EditSelectAction { goal_id }, ButtonToken::ActionEdit) => {
                self.sessions
                    .transition(chat_id, ConversationState::EditSelectField { goal_id });
                vec![edit(chat_id, message_id, PICK_FIELD, Some(render::field_picker()))]
            }
            (ConversationState::EditSelectField { goal_id }, ButtonToken::Field(field)) => {
                self.select_field(chat_id, message_id, goal_id, field)
            }
            (
                ConversationState::EditAwaitValue {
                    goal_id,
                    field: GoalField::Kind,
                },
                ButtonToken::Kind(kind),
            ) => self.commit_edit(chat_id, Some(message_id), goal_id, EditValue::Kind(goal_kind(kind))),
            (state, token) => {
                tracing::debug!(chat_id, ?state, %token, "button does not match dialog state, ignoring");
                Vec::new()
            }
        }
    }

    fn select_goal(&mut self, chat_id: &str, message_id: i64, goal_id: Uuid) -> Vec<Outbound> {
        let book = match self.load_book(chat_id) {
            Ok(book) => book,
            Err(out) => return out,
        };
        match book.find_goal(chat_id, goal_id) {
            Some(goal) => {
                self.sessions
                    .transition(chat_id, ConversationState::EditSelectAction { goal_id });
                vec![edit(
                    chat_id,
                    message_id,
                    format!("What do you want to do with “{}”?", goal.name),
                    Some(render::action_picker()),
                )]
            }
            None => {
                self.sessions.end(chat_id);
                vec![edit(chat_id, message_id, NOT_FOUND, None)]
            }
        }
    }

    fn delete_goal(&mut self, chat_id: &str, message_id: i64, goal_id: Uuid) -> Vec<Outbound> {
        let mut book = match self.load_book(chat_id) {
            Ok(book) => book,
            Err(out) => return out,
        };
        let Some(name) = book.find_goal(chat_id, goal_id).map(|g| g.name.clone()) else {
            self.sessions.end(chat_id);
            return vec![edit(chat_id, message_id, NOT_FOUND, None)];
        };
        book.remove_goal(chat_id, goal_id);
        if let Err(out) = self.save_book(chat_id, &book) {
            return out;
        }
        self.sessions.end(chat_id);
        tracing::info!(chat_id, %goal_id, "goal deleted");
        let goals = book.goals(chat_id);
        vec![edit(
            chat_id,
            message_id,
            format!("🗑 Goal deleted: {name}.\n\n{}", render::goal_list_text(goals)),
            Some(render::status_keyboard(goals)),
        )]
    }

    fn select_field(
        &mut self,
        chat_id: &str,
        message_id: i64,
        goal_id: Uuid,
        field: FieldToken,
    ) -> Vec<Outbound> {
        match field {
            FieldToken::Name => {
                self.sessions.transition(
                    chat_id,
                    ConversationState::EditAwaitValue {
                        goal_id,
                        field: GoalField::Name,
                    },
                );
                // Text prompt replaces the button message entirely.
                vec![
                    Outbound::Delete {
                        chat_id: chat_id.to_string(),
                        message_id,
                    },
                    send(chat_id, PROMPT_NEW_NAME),
                ]
            }
            FieldToken::Threshold => {
                self.sessions.transition(
                    chat_id,
                    ConversationState::EditAwaitValue {
                        goal_id,
                        field: GoalField::Threshold,
                    },
                );
                vec![
                    Outbound::Delete {
                        chat_id: chat_id.to_string(),
                        message_id,
                    },
                    send(chat_id, PROMPT_NEW_THRESHOLD),
                ]
            }
            FieldToken::Kind => {
                self.sessions.transition(
                    chat_id,
                    ConversationState::EditAwaitValue {
                        goal_id,
                        field: GoalField::Kind,
                    },
                );
                vec![edit(
                    chat_id,
                    message_id,
                    PROMPT_NEW_KIND,
                    Some(render::kind_picker(true)),
                )]
            }
        }
    }

    // ---- free text ------------------------------------------------------

    fn handle_text(&mut self, chat_id: &str, content: &str) -> Vec<Outbound> {
        let Some(state) = self.sessions.state(chat_id) else {
            tracing::debug!(chat_id, "text with no active conversation, ignoring");
            return Vec::new();
        };
        match state {
            ConversationState::AddAwaitName => {
                let name = content.trim();
                if name.is_empty() {
                    return vec![send(chat_id, PROMPT_NAME_EMPTY)];
                }
                self.sessions.transition(
                    chat_id,
                    ConversationState::AddAwaitThreshold {
                        name: name.to_string(),
                    },
                );
                vec![send(chat_id, PROMPT_THRESHOLD)]
            }
            ConversationState::AddAwaitThreshold { name } => match parse_threshold(content) {
                None => vec![send(chat_id, PROMPT_THRESHOLD_INVALID)],
                Some(threshold) => {
                    self.sessions
                        .transition(chat_id, ConversationState::AddAwaitKind { name, threshold });
                    vec![send_kb(chat_id, PROMPT_KIND, render::kind_picker(false))]
                }
            },
            ConversationState::EditAwaitValue {
                goal_id,
                field: GoalField::Name,
            } => {
                let name = content.trim();
                if name.is_empty() {
                    return vec![send(chat_id, PROMPT_NEW_NAME_EMPTY)];
                }
                self.commit_edit(chat_id, None, goal_id, EditValue::Name(name.to_string()))
            }
            ConversationState::EditAwaitValue {
                goal_id,
                field: GoalField::Threshold,
            } => match parse_threshold(content) {
                // Same re-prompt policy as the add flow: a typo never
                // tears the dialog down.
                None => vec![send(chat_id, PROMPT_THRESHOLD_INVALID)],
                Some(threshold) => {
                    self.commit_edit(chat_id, None, goal_id, EditValue::Threshold(threshold))
                }
            },
            state => {
                tracing::debug!(chat_id, ?state, "text while waiting for a button press, ignoring");
                Vec::new()
            }
        }
    }

    // ---- commits --------------------------------------------------------

    /// Commit the add flow: construct the goal, append, persist.
    /// On save failure the dialog stays in the kind state so the choice
    /// can simply be pressed again.
    fn commit_add(
        &mut self,
        chat_id: &str,
        message_id: i64,
        name: String,
        threshold: u32,
        kind: GoalKind,
    ) -> Vec<Outbound> {
        let mut book = match self.load_book(chat_id) {
            Ok(book) => book,
            Err(out) => return out,
        };
        let goal = Goal::new(name, threshold, kind);
        let goal_name = goal.name.clone();
        let goal_id = goal.id;
        book.add_goal(chat_id, goal);
        if let Err(out) = self.save_book(chat_id, &book) {
            return out;
        }
        self.sessions.end(chat_id);
        tracing::info!(chat_id, %goal_id, "goal added");
        let goals = book.goals(chat_id);
        vec![edit(
            chat_id,
            message_id,
            format!("✅ Goal added: {goal_name}!\n\n{}", render::goal_list_text(goals)),
            Some(render::status_keyboard(goals)),
        )]
    }

    /// Commit an edit-flow value: apply the single-field mutation and
    /// persist, or touch nothing at all. `origin` is the kind-picker
    /// message for button commits; text commits send fresh messages.
    fn commit_edit(
        &mut self,
        chat_id: &str,
        origin: Option<i64>,
        goal_id: Uuid,
        value: EditValue,
    ) -> Vec<Outbound> {
        let mut book = match self.load_book(chat_id) {
            Ok(book) => book,
            Err(out) => return out,
        };
        if book.find_goal(chat_id, goal_id).is_none() {
            // Deleted out from under the dialog — notice and stop.
            self.sessions.end(chat_id);
            return match origin {
                Some(message_id) => vec![edit(chat_id, message_id, NOT_FOUND, None)],
                None => vec![send(chat_id, NOT_FOUND)],
            };
        }
        book.update_goal(chat_id, goal_id, |goal| match value {
            EditValue::Name(name) => goal.name = name,
            EditValue::Threshold(threshold) => goal.threshold = threshold,
            EditValue::Kind(kind) => goal.kind = kind,
        });
        if let Err(out) = self.save_book(chat_id, &book) {
            return out;
        }
        self.sessions.end(chat_id);
        tracing::info!(chat_id, %goal_id, "goal updated");
        let goals = book.goals(chat_id);
        let text = format!("✏️ Goal updated.\n\n{}", render::goal_list_text(goals));
        let keyboard = render::status_keyboard(goals);
        match origin {
            Some(message_id) => vec![edit(chat_id, message_id, text, Some(keyboard))],
            None => vec![send_kb(chat_id, text, keyboard)],
        }
    }

    // ---- storage helpers ------------------------------------------------

    fn load_book(&self, chat_id: &str) -> Result<GoalBook, Vec<Outbound>> {
        self.store.load().map_err(|e| {
            tracing::error!(chat_id, error = %e, "failed to load goal book");
            vec![send(chat_id, LOAD_FAILED)]
        })
    }

    fn save_book(&self, chat_id: &str, book: &GoalBook) -> Result<(), Vec<Outbound>> {
        self.store.save(book).map_err(|e| {
            tracing::error!(chat_id, error = %e, "failed to save goal book");
            vec![send(chat_id, SAVE_FAILED)]
        })
    }
}

fn goal_kind(token: KindToken) -> GoalKind {
    match token {
        KindToken::More => GoalKind::MoreThan,
        KindToken::Less => GoalKind::LessThan,
    }
}

/// Positive integer or nothing. `"0"`, `"-3"`, `"12.5"`, `"abc"` all fail.
fn parse_threshold(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok().filter(|t| *t > 0)
}

fn send(chat_id: &str, text: impl Into<String>) -> Outbound {
    Outbound::Send {
        chat_id: chat_id.to_string(),
        text: text.into(),
        keyboard: None,
    }
}

fn send_kb(chat_id: &str, text: impl Into<String>, keyboard: Keyboard) -> Outbound {
    Outbound::Send {
        chat_id: chat_id.to_string(),
        text: text.into(),
        keyboard: Some(keyboard),
    }
}

fn edit(chat_id: &str, message_id: i64, text: impl Into<String>, keyboard: Option<Keyboard>) -> Outbound {
    Outbound::Edit {
        chat_id: chat_id.to_string(),
        message_id,
        text: text.into(),
        keyboard,
    }
}
