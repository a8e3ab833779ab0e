//! Init command
//!
//! Initialize a chattrix forum in a directory.

use super::workspace::{Workspace, PROJECT_DIR};
use anyhow::{Context, Result};
use chattrix_core::config::Config;
use chattrix_core::seed::sample_posts;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

/// Arguments for the init command
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing configuration
    #[arg(long)]
    pub force: bool,

    /// Seed the forum with a few welcome posts
    #[arg(long)]
    pub with_samples: bool,

    /// Directory to initialize (default: current directory)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

/// Execute the init command
pub fn execute(args: InitArgs, workspace: &Workspace) -> Result<()> {
    use colored::Colorize;

    let workspace = match args.path {
        Some(ref path) => Workspace::for_project(path),
        None => workspace.clone(),
    };

    println!(
        "{} Initializing chattrix in {}...",
        "🚀",
        workspace.project_dir().display()
    );

    if workspace.is_initialized() && !args.force {
        eprintln!(
            "{} chattrix already initialized. Use --force to reinitialize.",
            "⚠".yellow()
        );
        return Ok(());
    }

    fs::create_dir_all(workspace.project_dir()).with_context(|| {
        format!("Failed to create {}", workspace.project_dir().display())
    })?;

    let config = Config::default();
    fs::write(workspace.config_path(), generate_config(&config)?)
        .context("Failed to write config.toml")?;
    println!("{} Generated {}", "✓".green(), workspace.config_path().display());

    let forum = workspace.open()?;
    println!(
        "{} Data directory ready at {}",
        "✓".green(),
        workspace.data_dir(&forum.config).display()
    );

    if args.with_samples {
        if forum.engine.post_count() > 0 {
            eprintln!(
                "{} Forum already has posts, skipping sample content.",
                "⚠".yellow()
            );
        } else {
            let mut created = 0;
            for draft in sample_posts() {
                forum.engine.create_post(draft)?;
                created += 1;
            }
            println!("{} Added {} sample posts", "✓".green(), created);
        }
    }

    if let Some(root) = git_root_for(&workspace) {
        update_gitignore(&root)?;
        println!("{} Updated .gitignore", "✓".green());
    }

    println!("\n{}", "Next steps:".bold());
    println!("  1. Review and customize {}", workspace.config_path().display());
    println!("  2. Write your first post:");
    println!("     ");
    println!(
        "     {}",
        "chattrix post create --user <id> --title \"Hello\" --content \"...\"".cyan()
    );
    println!("     ");
    println!("  3. Browse the forum:");
    println!("     ");
    println!("     {}", "chattrix post list".cyan());

    Ok(())
}

/// Render the default configuration with a header
fn generate_config(config: &Config) -> Result<String> {
    let body = config.to_toml().context("Failed to render configuration")?;
    Ok(format!(
        "# chattrix configuration\n#\n# storage.data_dir defaults to {}/data when unset.\n\n{}",
        PROJECT_DIR, body
    ))
}

/// The enclosing project directory, when it is a git repository
fn git_root_for(workspace: &Workspace) -> Option<PathBuf> {
    let root = workspace.project_dir().parent()?;
    let root = if root.as_os_str().is_empty() {
        Path::new(".")
    } else {
        root
    };
    root.join(".git").exists().then(|| root.to_path_buf())
}

fn update_gitignore(project_dir: &Path) -> Result<()> {
    let gitignore_path = project_dir.join(".gitignore");
    let entry = format!("{}/data/", PROJECT_DIR);
    let block = format!("\n# chattrix\n{}\n", entry);

    if gitignore_path.exists() {
        let content = fs::read_to_string(&gitignore_path)?;
        if !content.contains(&entry) {
            let mut file = fs::OpenOptions::new()
                .append(true)
                .open(&gitignore_path)?;
            use std::io::Write;
            file.write_all(block.as_bytes())?;
        }
    } else {
        fs::write(&gitignore_path, block)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_config_round_trips() {
        let rendered = generate_config(&Config::default()).unwrap();
        assert!(rendered.starts_with("# chattrix configuration"));

        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.limits.max_comment_length, 2000);
        assert_eq!(parsed.storage.file_name, "posts.json");
    }

    #[test]
    fn test_update_gitignore_once() {
        let temp = tempfile::tempdir().unwrap();
        update_gitignore(temp.path()).unwrap();
        update_gitignore(temp.path()).unwrap();

        let content = fs::read_to_string(temp.path().join(".gitignore")).unwrap();
        assert_eq!(content.matches(".chattrix/data/").count(), 1);
    }

    #[test]
    fn test_git_root_detection() {
        let temp = tempfile::tempdir().unwrap();
        let workspace = Workspace::for_project(temp.path());
        assert!(git_root_for(&workspace).is_none());

        fs::create_dir(temp.path().join(".git")).unwrap();
        assert_eq!(git_root_for(&workspace).unwrap(), temp.path());
    }
}
