//! Post command
//!
//! Create, browse, edit and like posts.

use super::comment::print_comment_tree;
use super::{confirm, Identity, Workspace};
use anyhow::{bail, Context, Result};
use chattrix_core::category::{CategoryDirectory, StaticCategories};
use chattrix_core::post::{Attachment, Post, PostDraft, PostFilter, PostInfo, PostUpdate, SortOrder};
use chattrix_core::validator::parse_tags;
use chattrix_core::{CategoryId, PostId, UserId};
use clap::Subcommand;
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Post subcommands
#[derive(Debug, Subcommand)]
pub enum PostCommand {
    /// Write a new post
    Create {
        #[command(flatten)]
        identity: Identity,

        /// Category ID (see `chattrix category list`)
        #[arg(long, default_value_t = 1)]
        category: u32,

        /// Post title
        #[arg(long, short)]
        title: String,

        /// Post body
        #[arg(long)]
        content: String,

        /// Comma separated tags
        #[arg(long)]
        tags: Option<String>,

        /// Files to attach
        #[arg(long = "attach")]
        attachments: Vec<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List posts
    List {
        /// Only posts in this category
        #[arg(long)]
        category: Option<u32>,

        /// Only posts by this user
        #[arg(long)]
        author: Option<String>,

        /// Only posts with this tag
        #[arg(long)]
        tag: Option<String>,

        /// Only posts whose title or body contains this text
        #[arg(long, short)]
        search: Option<String>,

        /// Most liked first instead of newest first
        #[arg(long)]
        popular: bool,

        /// Limit number of posts
        #[arg(long, short)]
        limit: Option<usize>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a post with its comments
    Show {
        /// Post ID
        id: PostId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a post's title, body or tags
    Edit {
        /// Post ID
        id: PostId,

        /// New title
        #[arg(long, short)]
        title: Option<String>,

        /// New body
        #[arg(long)]
        content: Option<String>,

        /// New comma separated tags (empty to clear)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Delete a post and all its comments
    Delete {
        /// Post ID
        id: PostId,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Like a post
    Like {
        /// Post ID
        id: PostId,

        #[command(flatten)]
        identity: Identity,
    },

    /// Remove your like from a post
    Unlike {
        /// Post ID
        id: PostId,

        #[command(flatten)]
        identity: Identity,
    },
}

/// Execute the post command
pub fn execute(cmd: PostCommand, workspace: &Workspace) -> Result<()> {
    match cmd {
        PostCommand::Create {
            identity,
            category,
            title,
            content,
            tags,
            attachments,
            json,
        } => {
            let mut draft = PostDraft::new(
                CategoryId(category),
                identity.user_id(),
                identity.display_name(),
                title,
                content,
            );
            if let Some(tags) = tags {
                draft = draft.tag_list(&tags);
            }
            for path in attachments {
                draft = draft.attachment(read_attachment(&path)?);
            }
            create_post(workspace, draft, json)
        }
        PostCommand::List {
            category,
            author,
            tag,
            search,
            popular,
            limit,
            json,
        } => {
            let mut filter = PostFilter::new();
            if let Some(category) = category {
                filter = filter.with_category(CategoryId(category));
            }
            if let Some(author) = author {
                filter = filter.with_author(author);
            }
            if let Some(tag) = tag {
                filter = filter.with_tag(tag);
            }
            if let Some(search) = search {
                filter = filter.with_text(search);
            }
            if popular {
                filter = filter.sorted_by(SortOrder::Popular);
            }
            list_posts(workspace, filter, limit, json)
        }
        PostCommand::Show { id, json } => show_post(workspace, id, json),
        PostCommand::Edit {
            id,
            title,
            content,
            tags,
        } => {
            let mut update = PostUpdate::new();
            if let Some(title) = title {
                update = update.title(title);
            }
            if let Some(content) = content {
                update = update.content(content);
            }
            if let Some(tags) = tags {
                update = update.tags(parse_tags(&tags));
            }
            edit_post(workspace, id, update)
        }
        PostCommand::Delete { id, yes } => delete_post(workspace, id, yes),
        PostCommand::Like { id, identity } => {
            like_post(workspace, id, &identity.user_id(), true)
        }
        PostCommand::Unlike { id, identity } => {
            like_post(workspace, id, &identity.user_id(), false)
        }
    }
}

fn read_attachment(path: &Path) -> Result<Attachment> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    Ok(Attachment::from_bytes(file_name, &bytes))
}

fn create_post(workspace: &Workspace, draft: PostDraft, as_json: bool) -> Result<()> {
    let categories = StaticCategories::default();
    if !categories.contains(draft.category_id()) {
        bail!(
            "Unknown category {}. Run 'chattrix category list' to see the choices.",
            draft.category_id()
        );
    }

    let forum = workspace.open()?;
    let post = forum.engine.create_post(draft)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&post)?);
        return Ok(());
    }

    println!("{} Created post #{}: {}", "✓".green(), post.id, post.title.bold());
    for attachment in &post.attachments {
        println!(
            "  {} {} ({} bytes, {})",
            "📎",
            attachment.file_name,
            attachment.size,
            attachment.short_digest().dimmed()
        );
    }
    Ok(())
}

fn list_posts(
    workspace: &Workspace,
    filter: PostFilter,
    limit: Option<usize>,
    as_json: bool,
) -> Result<()> {
    let forum = workspace.open()?;
    let default_limit = match filter.sort {
        SortOrder::Recent => forum.config.listing.recent_limit,
        SortOrder::Popular => forum.config.listing.popular_limit,
    };
    let filter = filter.limit(limit.unwrap_or(default_limit));

    let posts: Vec<PostInfo> = forum.engine.query(&filter).iter().map(PostInfo::from).collect();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&posts)?);
        return Ok(());
    }

    if posts.is_empty() {
        println!("No posts found.");
        return Ok(());
    }

    let heading = match filter.sort {
        SortOrder::Recent => "Recent posts:",
        SortOrder::Popular => "Popular posts:",
    };
    println!("{}", heading.bold().underline());
    println!();

    let categories = StaticCategories::default();
    for info in &posts {
        print_post_line(info, &categories);
    }

    println!();
    println!("Showing {} of {} posts", posts.len(), forum.engine.post_count());
    Ok(())
}

fn print_post_line(info: &PostInfo, categories: &StaticCategories) {
    println!(
        "  {} {}",
        format!("#{}", info.id).cyan(),
        info.title.bold()
    );
    println!(
        "      {} · {} · {} · {} {} · {} {}",
        category_name(categories, info.category_id).dimmed(),
        info.author_name,
        info.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed(),
        "♥".red(),
        info.like_count,
        "💬",
        info.comment_count
    );
    if !info.tags.is_empty() {
        println!("      {}", format!("[{}]", info.tags.join(", ")).yellow());
    }
}

fn category_name(categories: &StaticCategories, id: CategoryId) -> String {
    categories
        .get(id)
        .map(|c| c.name)
        .unwrap_or_else(|| format!("Category {}", id))
}

fn show_post(workspace: &Workspace, id: PostId, as_json: bool) -> Result<()> {
    let forum = workspace.open()?;
    let post = forum.engine.get_post(id)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&post)?);
        return Ok(());
    }

    print_post_detail(&post);
    Ok(())
}

fn print_post_detail(post: &Post) {
    let categories = StaticCategories::default();

    println!("{}", post.title.bold().underline());
    println!(
        "{} · {} ({}) · {}",
        category_name(&categories, post.category_id).dimmed(),
        post.author_name,
        post.author_id.to_string().dimmed(),
        post.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
    );
    if let Some(updated) = post.updated_at {
        println!(
            "{}",
            format!("edited {}", updated.format("%Y-%m-%d %H:%M")).dimmed()
        );
    }
    if !post.tags.is_empty() {
        println!("{}", format!("[{}]", post.tags.join(", ")).yellow());
    }
    println!();
    println!("{}", post.content);
    println!();

    for attachment in &post.attachments {
        println!(
            "{} {} ({} bytes, {})",
            "📎",
            attachment.file_name,
            attachment.size,
            attachment.short_digest().dimmed()
        );
    }

    println!(
        "{} {}   {} {}",
        "♥".red(),
        post.like_count,
        "💬",
        post.comment_count
    );

    if !post.comments.is_empty() {
        println!();
        println!("{}", "Comments:".bold());
        print_comment_tree(&post.comments);
    }
}

fn edit_post(workspace: &Workspace, id: PostId, update: PostUpdate) -> Result<()> {
    if update.is_empty() {
        eprintln!(
            "{} Nothing to change. Pass --title, --content or --tags.",
            "⚠".yellow()
        );
        return Ok(());
    }

    let forum = workspace.open()?;
    let post = forum.engine.update_post(id, update)?;
    println!("{} Updated post #{}: {}", "✓".green(), post.id, post.title.bold());
    Ok(())
}

fn delete_post(workspace: &Workspace, id: PostId, yes: bool) -> Result<()> {
    let forum = workspace.open()?;
    let post = forum.engine.get_post(id)?;

    if !confirm(
        &format!(
            "Delete post #{} '{}' and its {} comments?",
            post.id, post.title, post.comment_count
        ),
        yes,
    )? {
        println!("Deletion cancelled.");
        return Ok(());
    }

    let removed = forum.engine.delete_post(id)?;
    println!(
        "{} Deleted post #{} ({} comments removed)",
        "✓".green(),
        removed.id,
        removed.comment_count
    );
    Ok(())
}

fn like_post(workspace: &Workspace, id: PostId, user: &UserId, like: bool) -> Result<()> {
    let forum = workspace.open()?;
    let count = if like {
        forum.engine.like(id, user)?
    } else {
        forum.engine.unlike(id, user)?
    };

    let action = if like { "Liked" } else { "Unliked" };
    println!(
        "{} {} post #{} ({} {})",
        "✓".green(),
        action,
        id,
        count,
        if count == 1 { "like" } else { "likes" }
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_name_fallback() {
        let categories = StaticCategories::default();
        assert_eq!(category_name(&categories, CategoryId(3)), "Programming");
        assert_eq!(category_name(&categories, CategoryId(42)), "Category 42");
    }

    #[test]
    fn test_read_attachment() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("notes.txt");
        fs::write(&path, "hello").unwrap();

        let attachment = read_attachment(&path).unwrap();
        assert_eq!(attachment.file_name, "notes.txt");
        assert_eq!(attachment.size, 5);
    }

    #[test]
    fn test_read_missing_attachment() {
        let temp = tempfile::tempdir().unwrap();
        assert!(read_attachment(&temp.path().join("missing.bin")).is_err());
    }
}
