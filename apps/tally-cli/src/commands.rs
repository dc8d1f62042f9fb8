// commands.rs — Subcommand implementations over the goals file.

use std::path::Path;

use anyhow::bail;
use uuid::Uuid;

use tally_flow::render;
use tally_goal::{GoalStore, JsonFileStore};

pub fn list_chats(goals_file: &Path) -> anyhow::Result<()> {
    let store = JsonFileStore::new(goals_file)?;
    let book = store.load()?;

    let chats: Vec<_> = book.chats().collect();
    if chats.is_empty() {
        println!("No chats in {}.", goals_file.display());
        return Ok(());
    }

    println!("{:<20} {:<8}", "CHAT", "GOALS");
    println!("{}", "-".repeat(28));
    for (chat_id, goals) in &chats {
        println!("{:<20} {:<8}", chat_id, goals.len());
    }
    println!("\n{} chat(s) total.", chats.len());
    Ok(())
}

pub fn show_goals(goals_file: &Path, chat: &str) -> anyhow::Result<()> {
    let store = JsonFileStore::new(goals_file)?;
    let book = store.load()?;
    let goals = book.goals(chat);

    // Same rendering the bot sends, so what you see here is what users see.
    println!("{}", render::goal_list_text(goals));
    if !goals.is_empty() {
        println!("{:<38} {:<10} {:<10} {:<10}", "ID", "CURRENT", "THRESHOLD", "TYPE");
        println!("{}", "-".repeat(68));
        for goal in goals {
            println!(
                "{:<38} {:<10} {:<10} {:<10}",
                goal.id, goal.current, goal.threshold, goal.kind
            );
        }
    }
    Ok(())
}

pub fn remove_goal(goals_file: &Path, chat: &str, goal_id: Uuid) -> anyhow::Result<()> {
    let store = JsonFileStore::new(goals_file)?;
    let mut book = store.load()?;

    let Some(goal) = book.find_goal(chat, goal_id) else {
        bail!("no goal {goal_id} in chat {chat}");
    };
    let name = goal.name.clone();

    book.remove_goal(chat, goal_id);
    store.save(&book)?;
    println!("Removed goal: {name} ({goal_id})");
    Ok(())
}
