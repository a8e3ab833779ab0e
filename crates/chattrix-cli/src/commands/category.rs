//! Category command

use super::Workspace;
use anyhow::Result;
use chattrix_core::category::StaticCategories;
use clap::Subcommand;
use colored::Colorize;

/// Category subcommands
#[derive(Debug, Subcommand)]
pub enum CategoryCommand {
    /// List categories with their post counts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the category command
pub fn execute(cmd: CategoryCommand, workspace: &Workspace) -> Result<()> {
    match cmd {
        CategoryCommand::List { json } => list_categories(workspace, json),
    }
}

fn list_categories(workspace: &Workspace, as_json: bool) -> Result<()> {
    let forum = workspace.open()?;
    let summaries = forum
        .engine
        .categories_with_counts(&StaticCategories::default());

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    println!("{}", "Categories:".bold().underline());
    println!();
    for summary in &summaries {
        println!(
            "  {} {} {}",
            format!("{:>2}", summary.category.id.0).cyan(),
            summary.category.name.bold(),
            format!("({} posts)", summary.post_count).dimmed()
        );
        println!("     {}", summary.category.description);
    }
    Ok(())
}
