//! # tally-cli
//!
//! Offline operator CLI for the Tally goals file:
//! - `tally chats` — chat ids and goal counts
//! - `tally goals <chat>` — one chat's goals, rendered like the bot shows them
//! - `tally remove <chat> <goal-id>` — drop a goal (stuck or test data)
//!
//! Works directly on the JSON document through the same store the daemon
//! uses; run it while the daemon is stopped to avoid racing its writes.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Inspect and repair the Tally goals file.
#[derive(Parser)]
#[command(name = "tally", version, about)]
struct Cli {
    /// Path of the goals JSON document.
    #[arg(long, default_value = "goals.json")]
    goals_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all chats and their goal counts.
    Chats,
    /// Show one chat's goals.
    Goals {
        /// Chat identifier (as stored in the file).
        chat: String,
    },
    /// Remove a goal from a chat.
    Remove {
        /// Chat identifier.
        chat: String,
        /// Goal id (UUID).
        goal_id: uuid::Uuid,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Chats => commands::list_chats(&cli.goals_file),
        Commands::Goals { chat } => commands::show_goals(&cli.goals_file, &chat),
        Commands::Remove { chat, goal_id } => commands::remove_goal(&cli.goals_file, &chat, goal_id),
    }
}
