// render.rs — Goal list text and keyboard layouts.
//
// Pure functions: goals in, display content out. The router decides where
// the content goes (fresh message vs. in-place edit).

use tally_chat::{Button, ButtonToken, FieldToken, Keyboard, KindToken};
use tally_goal::{Goal, GoalKind};

/// Fixed message for a chat with no goals.
pub const NO_GOALS: &str = "No goals yet. Use /add_goal to add one.";

/// Render the goal list as display text.
///
/// `MoreThan` goals show raw progress against the threshold; `LessThan`
/// goals show the remaining budget, clamped at zero once spending passes
/// the threshold.
pub fn goal_list_text(goals: &[Goal]) -> String {
    if goals.is_empty() {
        return NO_GOALS.to_string();
    }
    let mut text = String::from("📊 Your goals for the year:\n\n");
    for goal in goals {
        let shown = match goal.kind {
            GoalKind::MoreThan => goal.current,
            GoalKind::LessThan => goal.remaining_budget(),
        };
        text.push_str(&format!(
            "• {}: {} / {} ({})\n",
            goal.name,
            shown,
            goal.threshold,
            goal.kind.symbol()
        ));
    }
    text
}

/// The control keyboard under the goal list: one +/- row per goal, a
/// trailing add button, and a manage button when there is anything to
/// manage.
pub fn status_keyboard(goals: &[Goal]) -> Keyboard {
    let mut kb = Keyboard::new();
    for goal in goals {
        kb = kb.row(vec![
            Button::new(format!("▶️ + {}", goal.name), ButtonToken::Increment(goal.id)),
            Button::new(format!("◀️ - {}", goal.name), ButtonToken::Decrement(goal.id)),
        ]);
    }
    kb = kb.single(Button::new("➕ Add goal", ButtonToken::AddGoal));
    if !goals.is_empty() {
        kb = kb.single(Button::new("🛠 Manage goals", ButtonToken::EditStart));
    }
    kb
}

/// Edit flow: pick which goal to manage.
pub fn goal_picker(goals: &[Goal]) -> Keyboard {
    let mut kb = Keyboard::new();
    for goal in goals {
        kb = kb.single(Button::new(goal.name.clone(), ButtonToken::EditSelect(goal.id)));
    }
    kb.single(cancel_button())
}

/// Edit flow: edit or delete the selected goal.
pub fn action_picker() -> Keyboard {
    Keyboard::new()
        .row(vec![
            Button::new("✏️ Edit", ButtonToken::ActionEdit),
            Button::new("🗑 Delete", ButtonToken::ActionDelete),
        ])
        .single(cancel_button())
}

/// Edit flow: pick which field to change.
pub fn field_picker() -> Keyboard {
    Keyboard::new()
        .row(vec![
            Button::new("Name", ButtonToken::Field(FieldToken::Name)),
            Button::new("Threshold", ButtonToken::Field(FieldToken::Threshold)),
            Button::new("Type", ButtonToken::Field(FieldToken::Kind)),
        ])
        .single(cancel_button())
}

/// Kind choice (≥ / ≤). The add flow shows it without a cancel button;
/// within the edit flow the cancel escape stays available.
pub fn kind_picker(with_cancel: bool) -> Keyboard {
    let mut kb = Keyboard::new()
        .single(Button::new("🎯 At least (≥)", ButtonToken::Kind(KindToken::More)))
        .single(Button::new("📦 At most (≤)", ButtonToken::Kind(KindToken::Less)));
    if with_cancel {
        kb = kb.single(cancel_button());
    }
    kb
}

fn cancel_button() -> Button {
    Button::new("✖️ Cancel", ButtonToken::EditCancel)
}
