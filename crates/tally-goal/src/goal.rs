// goal.rs — Goal: one tracked numeric objective.
//
// A goal counts either upward toward a target ("read 100 books, ≥") or
// against a budget ("spend at most 50, ≤"). The direction only changes how
// progress is displayed — there is no hard stop at the threshold.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which direction a goal counts in.
///
/// Serialized under the JSON key `type` as `"more_than"` / `"less_than"` —
/// this is the on-disk vocabulary and must not change without a migration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GoalKind {
    /// Progress counts up toward the threshold ("at least").
    MoreThan,

    /// Progress spends down a budget of `threshold` ("at most").
    LessThan,
}

impl GoalKind {
    /// Comparison symbol used in rendered goal lines.
    pub fn symbol(&self) -> &'static str {
        match self {
            GoalKind::MoreThan => "≥",
            GoalKind::LessThan => "≤",
        }
    }
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoalKind::MoreThan => write!(f, "more_than"),
            GoalKind::LessThan => write!(f, "less_than"),
        }
    }
}

/// One tracked objective.
///
/// Invariants: `name` is non-empty, `threshold > 0`, and `current >= 0`
/// (the latter by construction — `current` is unsigned and every mutation
/// goes through [`GoalBook::adjust_progress`](crate::GoalBook::adjust_progress),
/// which clamps at zero).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Goal {
    /// Unique within the owning chat. Immutable once created.
    pub id: Uuid,

    /// Display name, non-empty.
    pub name: String,

    /// Positive integer target (or budget, for `LessThan` goals).
    pub threshold: u32,

    /// Progress so far, clamped to ≥ 0.
    pub current: u32,

    /// Counting direction. JSON key is `type` for on-disk compatibility.
    #[serde(rename = "type")]
    pub kind: GoalKind,
}

impl Goal {
    /// Create a new goal with a fresh random id and zero progress.
    ///
    /// Callers are expected to have validated the name (non-empty after
    /// trimming) and threshold (> 0) already — the conversation flows do.
    pub fn new(name: impl Into<String>, threshold: u32, kind: GoalKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            threshold,
            current: 0,
            kind,
        }
    }

    /// Remaining budget for `LessThan` goals: `max(0, threshold - current)`.
    ///
    /// For `MoreThan` goals this is not meaningful and callers should show
    /// `current` directly.
    pub fn remaining_budget(&self) -> u32 {
        self.threshold.saturating_sub(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_goal_starts_at_zero() {
        let goal = Goal::new("Read books", 12, GoalKind::MoreThan);
        assert_eq!(goal.current, 0);
        assert_eq!(goal.threshold, 12);
        assert_eq!(goal.name, "Read books");
        assert_eq!(goal.kind, GoalKind::MoreThan);
    }

    #[test]
    fn goal_serializes_with_type_key() {
        let goal = Goal::new("Spend", 50, GoalKind::LessThan);
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["type"], "less_than");
        assert_eq!(json["threshold"], 50);
        assert_eq!(json["current"], 0);
        // No "kind" key leaks into the document.
        assert!(json.get("kind").is_none());
    }

    #[test]
    fn goal_round_trips_through_json() {
        let goal = Goal::new("Run km", 300, GoalKind::MoreThan);
        let json = serde_json::to_string(&goal).unwrap();
        let restored: Goal = serde_json::from_str(&json).unwrap();
        assert_eq!(goal, restored);
    }

    #[test]
    fn remaining_budget_clamps_at_zero() {
        let mut goal = Goal::new("Spend", 50, GoalKind::LessThan);
        goal.current = 20;
        assert_eq!(goal.remaining_budget(), 30);
        goal.current = 73;
        assert_eq!(goal.remaining_budget(), 0);
    }

    #[test]
    fn kind_display_matches_wire_names() {
        assert_eq!(GoalKind::MoreThan.to_string(), "more_than");
        assert_eq!(GoalKind::LessThan.to_string(), "less_than");
    }
}
