// keyboard.rs — Inline keyboard layout the core hands to the gateway.

use serde::{Deserialize, Serialize};

use crate::token::ButtonToken;

/// One inline button: a label the user sees and a token the transport
/// round-trips back on press.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub token: String,
}

impl Button {
    /// Build a button from a label and a typed token.
    pub fn new(label: impl Into<String>, token: ButtonToken) -> Self {
        Self {
            label: label.into(),
            token: token.to_string(),
        }
    }
}

/// A grid of buttons, rendered row by row under a message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Keyboard {
    pub rows: Vec<Vec<Button>>,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a row of buttons.
    pub fn row(mut self, buttons: Vec<Button>) -> Self {
        self.rows.push(buttons);
        self
    }

    /// Append a row containing a single button.
    pub fn single(self, button: Button) -> Self {
        self.row(vec![button])
    }
}
