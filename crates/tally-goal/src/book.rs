// book.rs — GoalBook: the persisted aggregate of all goals, keyed by chat.
//
// The book is one flat JSON document: `{ "<chat-id>": [ {goal}, ... ] }`.
// Each chat's goals are an ordered Vec — insertion order is display order.
// All operations here are pure in-memory mutations; persistence goes
// through the GoalStore trait in store.rs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::goal::Goal;

/// All goals for all chats — the single persisted aggregate.
///
/// `#[serde(transparent)]` makes this serialize as the bare map, so the
/// on-disk layout stays exactly the flat per-chat document described above.
/// A BTreeMap keeps chat keys in a stable order, which makes saves
/// deterministic (save-after-load of an unchanged book is byte-identical).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct GoalBook {
    chats: BTreeMap<String, Vec<Goal>>,
}

impl GoalBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a chat has an entry. Idempotent; returns true if one was created.
    pub fn ensure_chat(&mut self, chat_id: &str) -> bool {
        if self.chats.contains_key(chat_id) {
            return false;
        }
        self.chats.insert(chat_id.to_string(), Vec::new());
        true
    }

    /// The chat's goals in display order. Empty slice for unknown chats.
    pub fn goals(&self, chat_id: &str) -> &[Goal] {
        self.chats.get(chat_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over `(chat_id, goals)` pairs in stable key order.
    pub fn chats(&self) -> impl Iterator<Item = (&str, &[Goal])> {
        self.chats.iter().map(|(id, goals)| (id.as_str(), goals.as_slice()))
    }

    /// Append a goal to the chat's list, creating the chat entry if absent.
    pub fn add_goal(&mut self, chat_id: &str, goal: Goal) {
        self.chats.entry(chat_id.to_string()).or_default().push(goal);
    }

    /// Linear lookup by id. Absence is not an error — the caller decides.
    pub fn find_goal(&self, chat_id: &str, goal_id: Uuid) -> Option<&Goal> {
        self.goals(chat_id).iter().find(|g| g.id == goal_id)
    }

    /// Apply a mutation to the goal in place. Returns false if not found.
    pub fn update_goal(
        &mut self,
        chat_id: &str,
        goal_id: Uuid,
        mutator: impl FnOnce(&mut Goal),
    ) -> bool {
        match self
            .chats
            .get_mut(chat_id)
            .and_then(|goals| goals.iter_mut().find(|g| g.id == goal_id))
        {
            Some(goal) => {
                mutator(goal);
                true
            }
            None => false,
        }
    }

    /// Remove a goal by id, preserving the order of the remaining goals.
    /// Returns false if absent.
    pub fn remove_goal(&mut self, chat_id: &str, goal_id: Uuid) -> bool {
        match self.chats.get_mut(chat_id) {
            Some(goals) => {
                let before = goals.len();
                goals.retain(|g| g.id != goal_id);
                goals.len() != before
            }
            None => false,
        }
    }

    /// The single numeric-update primitive: `current = max(0, current + delta)`.
    ///
    /// Both increment and decrement route through here with delta ±1.
    /// Returns the new value, or None if the goal was not found.
    pub fn adjust_progress(&mut self, chat_id: &str, goal_id: Uuid, delta: i32) -> Option<u32> {
        let mut result = None;
        self.update_goal(chat_id, goal_id, |goal| {
            goal.current = goal.current.saturating_add_signed(delta);
            result = Some(goal.current);
        });
        result
    }

    /// Check every goal against the record invariants.
    ///
    /// Used by stores on load so a hand-edited file cannot smuggle an
    /// empty name or a zero threshold past the constructors.
    pub fn validate(&self) -> Result<(), String> {
        for (chat_id, goals) in &self.chats {
            for goal in goals {
                if goal.name.trim().is_empty() {
                    return Err(format!("goal {} in chat {chat_id} has an empty name", goal.id));
                }
                if goal.threshold == 0 {
                    return Err(format!(
                        "goal {} in chat {chat_id} has a zero threshold",
                        goal.id
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goal::GoalKind;

    fn book_with_goal(chat_id: &str, name: &str) -> (GoalBook, Uuid) {
        let mut book = GoalBook::new();
        let goal = Goal::new(name, 10, GoalKind::MoreThan);
        let id = goal.id;
        book.add_goal(chat_id, goal);
        (book, id)
    }

    #[test]
    fn ensure_chat_is_idempotent() {
        let mut book = GoalBook::new();
        assert!(book.ensure_chat("42"));
        assert!(!book.ensure_chat("42"));
        assert!(book.goals("42").is_empty());
    }

    #[test]
    fn goals_for_unknown_chat_is_empty() {
        let book = GoalBook::new();
        assert!(book.goals("nope").is_empty());
    }

    #[test]
    fn add_and_find_goal() {
        let (book, id) = book_with_goal("42", "Read books");
        let found = book.find_goal("42", id).unwrap();
        assert_eq!(found.name, "Read books");
        assert!(book.find_goal("42", Uuid::new_v4()).is_none());
        assert!(book.find_goal("other", id).is_none());
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut book = GoalBook::new();
        for name in ["a", "b", "c"] {
            book.add_goal("42", Goal::new(name, 1, GoalKind::MoreThan));
        }
        let names: Vec<&str> = book.goals("42").iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn update_goal_mutates_in_place() {
        let (mut book, id) = book_with_goal("42", "Read books");
        assert!(book.update_goal("42", id, |g| g.name = "Read more books".to_string()));
        assert_eq!(book.find_goal("42", id).unwrap().name, "Read more books");
    }

    #[test]
    fn update_missing_goal_is_noop() {
        let (mut book, _) = book_with_goal("42", "Read books");
        let before = book.clone();
        assert!(!book.update_goal("42", Uuid::new_v4(), |g| g.threshold = 99));
        assert_eq!(book, before);
    }

    #[test]
    fn remove_goal_keeps_order_of_the_rest() {
        let mut book = GoalBook::new();
        let mut ids = Vec::new();
        for name in ["a", "b", "c"] {
            let goal = Goal::new(name, 1, GoalKind::MoreThan);
            ids.push(goal.id);
            book.add_goal("42", goal);
        }
        assert!(book.remove_goal("42", ids[1]));
        let names: Vec<&str> = book.goals("42").iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["a", "c"]);
    }

    #[test]
    fn remove_missing_goal_is_noop() {
        let (mut book, _) = book_with_goal("42", "Read books");
        let before = book.clone();
        assert!(!book.remove_goal("42", Uuid::new_v4()));
        assert_eq!(book, before);
    }

    #[test]
    fn adjust_progress_clamps_at_zero() {
        let (mut book, id) = book_with_goal("42", "Read books");
        assert_eq!(book.adjust_progress("42", id, -1), Some(0));
        assert_eq!(book.adjust_progress("42", id, -1), Some(0));
        assert_eq!(book.adjust_progress("42", id, 1), Some(1));
        assert_eq!(book.adjust_progress("42", id, -1), Some(0));
    }

    #[test]
    fn increment_then_decrement_restores_value() {
        let (mut book, id) = book_with_goal("42", "Read books");
        book.adjust_progress("42", id, 5);
        let original = book.find_goal("42", id).unwrap().current;
        book.adjust_progress("42", id, 1);
        book.adjust_progress("42", id, -1);
        assert_eq!(book.find_goal("42", id).unwrap().current, original);
    }

    #[test]
    fn adjust_progress_unknown_goal_returns_none() {
        let (mut book, _) = book_with_goal("42", "Read books");
        assert_eq!(book.adjust_progress("42", Uuid::new_v4(), 1), None);
    }

    #[test]
    fn book_serializes_as_flat_map() {
        let (book, _) = book_with_goal("42", "Read books");
        let json = serde_json::to_value(&book).unwrap();
        let goals = json["42"].as_array().unwrap();
        assert_eq!(goals.len(), 1);
        assert_eq!(goals[0]["name"], "Read books");
    }

    #[test]
    fn validate_rejects_invariant_violations() {
        let mut book = GoalBook::new();
        let mut goal = Goal::new("ok", 10, GoalKind::MoreThan);
        goal.name = " ".to_string();
        book.add_goal("42", goal);
        assert!(book.validate().unwrap_err().contains("empty name"));

        let mut book = GoalBook::new();
        let mut goal = Goal::new("ok", 10, GoalKind::MoreThan);
        goal.threshold = 0;
        book.add_goal("42", goal);
        assert!(book.validate().unwrap_err().contains("zero threshold"));
    }
}
