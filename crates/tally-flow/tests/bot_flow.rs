// bot_flow.rs — End-to-end flow test against the real file-backed store.
//
// Walks the canonical first-contact scenario:
//
//   1. A fresh chat "42" sends /start → the file gains {"42": []}
//   2. The add flow runs: name "Read books", threshold 12, at-least
//   3. The file gains exactly one goal with current = 0, type "more_than"
//   4. Progress buttons mutate and persist the goal in place
//   5. A second store instance sees the identical book (round-trip)

use std::fs;

use chrono::Duration;
use tempfile::tempdir;

use tally_chat::{ButtonToken, Command, Event, KindToken};
use tally_flow::Router;
use tally_goal::{GoalKind, GoalStore, JsonFileStore};

const CHAT: &str = "42";

fn cmd(command: Command) -> Event {
    Event::Command {
        chat_id: CHAT.to_string(),
        command,
    }
}

fn btn(message_id: i64, token: impl Into<String>) -> Event {
    Event::Button {
        chat_id: CHAT.to_string(),
        message_id,
        token: token.into(),
    }
}

fn text(content: &str) -> Event {
    Event::Text {
        chat_id: CHAT.to_string(),
        content: content.to_string(),
    }
}

#[test]
fn first_contact_add_and_track() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("goals.json");
    let store = JsonFileStore::new(&path).unwrap();
    let mut router = Router::new(store, Duration::minutes(30));

    // 1. /start registers the chat.
    let out = router.handle(&cmd(Command::Start));
    assert_eq!(out.len(), 1);
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[CHAT], serde_json::json!([]));

    // 2. Full add flow.
    router.handle(&cmd(Command::AddGoal));
    router.handle(&text("Read books"));
    router.handle(&text("12"));
    router.handle(&btn(10, ButtonToken::Kind(KindToken::More).to_string()));

    // 3. Exactly one goal, zero progress, wire vocabulary intact.
    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let goals = raw[CHAT].as_array().unwrap();
    assert_eq!(goals.len(), 1);
    assert_eq!(goals[0]["name"], "Read books");
    assert_eq!(goals[0]["threshold"], 12);
    assert_eq!(goals[0]["current"], 0);
    assert_eq!(goals[0]["type"], "more_than");
    let goal_id = goals[0]["id"].as_str().unwrap().parse().unwrap();

    // 4. Two increments and a decrement land at 1, persisted.
    router.handle(&btn(11, ButtonToken::Increment(goal_id).to_string()));
    router.handle(&btn(11, ButtonToken::Increment(goal_id).to_string()));
    router.handle(&btn(11, ButtonToken::Decrement(goal_id).to_string()));

    let book = router.store().load().unwrap();
    assert_eq!(book.find_goal(CHAT, goal_id).unwrap().current, 1);
    assert_eq!(book.find_goal(CHAT, goal_id).unwrap().kind, GoalKind::MoreThan);

    // 5. A fresh store instance reads the identical book.
    let reopened = JsonFileStore::new(&path).unwrap();
    assert_eq!(reopened.load().unwrap(), book);
}

#[test]
fn budget_goal_displays_remaining_and_clamps() {
    let dir = tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("goals.json")).unwrap();
    let mut router = Router::new(store, Duration::minutes(30));

    router.handle(&cmd(Command::AddGoal));
    router.handle(&text("Spend"));
    router.handle(&text("50"));
    router.handle(&btn(10, ButtonToken::Kind(KindToken::Less).to_string()));

    let book = router.store().load().unwrap();
    let goal_id = book.goals(CHAT)[0].id;

    // Spend 20: remaining budget 30.
    for _ in 0..20 {
        router.handle(&btn(11, ButtonToken::Increment(goal_id).to_string()));
    }
    let out = router.handle(&cmd(Command::Status));
    let text_out = match &out[0] {
        tally_chat::Outbound::Send { text, .. } => text.clone(),
        other => panic!("expected send, got {other:?}"),
    };
    assert!(text_out.contains("• Spend: 30 / 50 (≤)"));

    // Overspend past the threshold: display clamps at 0, current keeps counting.
    for _ in 0..53 {
        router.handle(&btn(11, ButtonToken::Increment(goal_id).to_string()));
    }
    let book = router.store().load().unwrap();
    assert_eq!(book.find_goal(CHAT, goal_id).unwrap().current, 73);
    let out = router.handle(&cmd(Command::Status));
    let text_out = match &out[0] {
        tally_chat::Outbound::Send { text, .. } => text.clone(),
        other => panic!("expected send, got {other:?}"),
    };
    assert!(text_out.contains("• Spend: 0 / 50 (≤)"));
}

#[test]
fn deleting_a_nonexistent_goal_leaves_the_file_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("goals.json");
    let store = JsonFileStore::new(&path).unwrap();
    let mut router = Router::new(store, Duration::minutes(30));

    router.handle(&cmd(Command::AddGoal));
    router.handle(&text("Read books"));
    router.handle(&text("12"));
    router.handle(&btn(10, ButtonToken::Kind(KindToken::More).to_string()));
    let before = fs::read(&path).unwrap();

    // A stale increment for a goal that never existed: in-place notice,
    // no write.
    let out = router.handle(&btn(11, ButtonToken::Increment(uuid::Uuid::new_v4()).to_string()));
    assert_eq!(out.len(), 1);
    assert_eq!(fs::read(&path).unwrap(), before);
}
