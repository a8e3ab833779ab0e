//! CLI commands module
//!
//! This module contains all CLI command implementations.

pub mod category;
pub mod comment;
pub mod config;
pub mod init;
pub mod post;
pub mod user;
mod workspace;

pub use workspace::Workspace;

use chattrix_core::UserId;
use clap::{Args, Parser, Subcommand};

/// chattrix - threaded discussion forum
#[derive(Debug, Parser)]
#[command(name = "chattrix")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<std::path::PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize chattrix in a directory
    Init(init::InitArgs),

    /// Create, browse and like posts
    #[command(subcommand)]
    Post(post::PostCommand),

    /// Comment on posts and reply to comments
    #[command(subcommand)]
    Comment(comment::CommentCommand),

    /// Browse categories
    #[command(subcommand)]
    Category(category::CategoryCommand),

    /// Show user activity
    #[command(subcommand)]
    User(user::UserCommand),

    /// Manage configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

/// Run the CLI application
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let workspace = Workspace::resolve(cli.config);

    match cli.command {
        Commands::Init(args) => init::execute(args, &workspace),
        Commands::Post(cmd) => post::execute(cmd, &workspace),
        Commands::Comment(cmd) => comment::execute(cmd, &workspace),
        Commands::Category(cmd) => category::execute(cmd, &workspace),
        Commands::User(cmd) => user::execute(cmd, &workspace),
        Commands::Config(cmd) => config::execute(cmd, &workspace),
    }
}

fn setup_logging(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let filter = match verbosity {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // stdout is reserved for command output, including --json
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Who is acting, for commands that record an author
#[derive(Debug, Clone, Args)]
pub struct Identity {
    /// User ID to act as
    #[arg(long, short, env = "CHATTRIX_USER")]
    pub user: String,

    /// Display name (default: the user ID)
    #[arg(long, env = "CHATTRIX_NAME")]
    pub name: Option<String>,
}

impl Identity {
    /// User ID
    pub fn user_id(&self) -> UserId {
        UserId::new(self.user.trim())
    }

    /// Display name, falling back to the user ID
    pub fn display_name(&self) -> String {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.user.trim())
            .to_string()
    }
}

/// Ask before a destructive action unless `--yes` was given
pub(crate) fn confirm(prompt: &str, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }

    let confirmed = dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(confirmed)
}
