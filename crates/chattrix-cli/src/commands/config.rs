//! Config command
//!
//! Manage chattrix configuration.

use super::{confirm, Workspace};
use anyhow::{Context, Result};
use chattrix_core::config::Config;
use clap::Subcommand;
use colored::Colorize;
use std::fs;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration file and data directory paths
    Path,

    /// Validate configuration
    Validate,

    /// Reset to default configuration
    Reset {
        /// Force reset without confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, workspace: &Workspace) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(workspace, json),
        ConfigCommand::Path => show_paths(workspace),
        ConfigCommand::Validate => validate_config(workspace),
        ConfigCommand::Reset { force } => reset_config(workspace, force),
    }
}

fn show_config(workspace: &Workspace, as_json: bool) -> Result<()> {
    let config = workspace.load_config()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if workspace.is_initialized() {
        println!("{}", workspace.config_path().display().to_string().dimmed());
    } else {
        println!("{}", "(defaults, no configuration file)".dimmed());
    }
    println!();
    println!("{}", config.to_toml()?);
    Ok(())
}

fn show_paths(workspace: &Workspace) -> Result<()> {
    let config = workspace.load_config()?;
    println!("config: {}", workspace.config_path().display());
    println!("data:   {}", workspace.data_dir(&config).display());
    Ok(())
}

fn validate_config(workspace: &Workspace) -> Result<()> {
    let config_path = workspace.config_path();

    if !config_path.exists() {
        eprintln!(
            "{} Configuration not found at {}",
            "✗".red(),
            config_path.display()
        );
        return Ok(());
    }

    let content = fs::read_to_string(config_path)?;
    let value = match toml::from_str::<toml::Value>(&content) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("{} Invalid TOML: {}", "✗".red(), e);
            return Ok(());
        }
    };
    println!("{} Configuration is valid TOML", "✓".green());

    let mut warnings = Vec::new();
    for section in ["storage", "limits", "listing"] {
        if value.get(section).is_none() {
            warnings.push(format!("[{}] section not found, using defaults", section));
        }
    }
    if warnings.is_empty() {
        println!("{} All expected sections present", "✓".green());
    } else {
        for warning in warnings {
            println!("{} {}", "⚠".yellow(), warning);
        }
    }

    match Config::load(config_path) {
        Ok(_) => println!("{} Settings are usable", "✓".green()),
        Err(e) => eprintln!("{} {}", "✗".red(), e),
    }

    Ok(())
}

fn reset_config(workspace: &Workspace, force: bool) -> Result<()> {
    let config_path = workspace.config_path();

    if !confirm("Reset configuration to defaults?", force)? {
        println!("Reset cancelled.");
        return Ok(());
    }

    if config_path.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            config_path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(config_path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    fs::create_dir_all(workspace.project_dir())?;
    fs::write(config_path, Config::default().to_toml()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("{} Configuration reset to defaults.", "✓".green());
    Ok(())
}
