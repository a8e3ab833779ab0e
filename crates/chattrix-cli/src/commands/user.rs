//! User command

use super::Workspace;
use anyhow::Result;
use chattrix_core::UserId;
use clap::Subcommand;
use colored::Colorize;

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Show what a user has posted, commented and liked
    Activity {
        /// User ID
        user_id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the user command
pub fn execute(cmd: UserCommand, workspace: &Workspace) -> Result<()> {
    match cmd {
        UserCommand::Activity { user_id, json } => show_activity(workspace, &UserId::new(user_id.trim()), json),
    }
}

fn show_activity(workspace: &Workspace, user_id: &UserId, as_json: bool) -> Result<()> {
    let forum = workspace.open()?;
    let activity = forum.engine.user_activity(user_id);

    if as_json {
        println!("{}", serde_json::to_string_pretty(&activity)?);
        return Ok(());
    }

    if activity.is_empty() {
        println!("No activity for {}.", user_id);
        return Ok(());
    }

    println!("{}", format!("Activity for {}:", user_id).bold().underline());
    println!();
    println!("  {:<18} {}", "Posts", activity.posts_authored);
    println!("  {:<18} {}", "Comments", activity.comments_authored);
    println!("  {:<18} {}", "Likes received", activity.likes_received);
    println!("  {:<18} {}", "Likes given", activity.likes_given);
    Ok(())
}
