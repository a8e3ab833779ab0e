//! Comment command
//!
//! Comment on posts, reply to comments, edit and delete them.

use super::{confirm, Identity, Workspace};
use anyhow::{bail, Result};
use chattrix_core::comment::{Comment, CommentDraft};
use chattrix_core::post::Post;
use chattrix_core::{CommentId, PostId};
use clap::Subcommand;
use colored::Colorize;

/// Comment subcommands
#[derive(Debug, Subcommand)]
pub enum CommentCommand {
    /// Comment on a post, or reply to a top-level comment
    Add {
        /// Post ID
        post_id: PostId,

        /// Comment text
        content: String,

        #[command(flatten)]
        identity: Identity,

        /// Comment ID (or unique prefix) to reply to
        #[arg(long)]
        reply_to: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List a post's comments as a thread
    List {
        /// Post ID
        post_id: PostId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a comment
    Edit {
        /// Post ID
        post_id: PostId,

        /// Comment ID (or unique prefix)
        comment_id: String,

        /// New comment text
        content: String,
    },

    /// Delete a comment; a top-level comment takes its replies with it
    Delete {
        /// Post ID
        post_id: PostId,

        /// Comment ID (or unique prefix)
        comment_id: String,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },
}

/// Execute the comment command
pub fn execute(cmd: CommentCommand, workspace: &Workspace) -> Result<()> {
    match cmd {
        CommentCommand::Add {
            post_id,
            content,
            identity,
            reply_to,
            json,
        } => add_comment(workspace, post_id, content, &identity, reply_to, json),
        CommentCommand::List { post_id, json } => list_comments(workspace, post_id, json),
        CommentCommand::Edit {
            post_id,
            comment_id,
            content,
        } => edit_comment(workspace, post_id, &comment_id, content),
        CommentCommand::Delete {
            post_id,
            comment_id,
            yes,
        } => delete_comment(workspace, post_id, &comment_id, yes),
    }
}

/// Resolve a full comment ID or a unique prefix of one
fn resolve_comment_id(post: &Post, raw: &str) -> Result<CommentId> {
    let raw = raw.trim();
    if let Ok(id) = CommentId::from_string(raw) {
        return Ok(id);
    }
    if raw.is_empty() {
        bail!("Comment ID cannot be empty");
    }

    let prefix = raw.to_ascii_lowercase();
    let matches: Vec<&Comment> = post
        .all_comments()
        .filter(|c| c.id.to_string().starts_with(&prefix))
        .collect();

    match matches.as_slice() {
        [comment] => Ok(comment.id.clone()),
        [] => bail!("Comment not found: {} on post #{}", raw, post.id),
        _ => bail!(
            "Comment ID prefix '{}' is ambiguous ({} matches)",
            raw,
            matches.len()
        ),
    }
}

fn add_comment(
    workspace: &Workspace,
    post_id: PostId,
    content: String,
    identity: &Identity,
    reply_to: Option<String>,
    as_json: bool,
) -> Result<()> {
    let forum = workspace.open()?;

    let mut draft = CommentDraft::new(identity.user_id(), identity.display_name(), content);
    if let Some(raw) = reply_to {
        let post = forum.engine.get_post(post_id)?;
        draft = draft.reply_to(resolve_comment_id(&post, &raw)?);
    }

    let comment = forum.engine.add_comment(post_id, draft)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&comment)?);
        return Ok(());
    }

    let kind = if comment.is_reply() { "reply" } else { "comment" };
    println!(
        "{} Added {} {} to post #{}",
        "✓".green(),
        kind,
        comment.id.short().cyan(),
        post_id
    );
    Ok(())
}

fn list_comments(workspace: &Workspace, post_id: PostId, as_json: bool) -> Result<()> {
    let forum = workspace.open()?;
    let comments = forum.engine.list_comments(post_id)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&comments)?);
        return Ok(());
    }

    if comments.is_empty() {
        println!("No comments on post #{}.", post_id);
        return Ok(());
    }

    print_comment_tree(&comments);
    Ok(())
}

/// Print top-level comments with their replies indented beneath
pub fn print_comment_tree(comments: &[Comment]) {
    for comment in comments {
        print_comment(comment, "  ");
        for reply in &comment.replies {
            print_comment(reply, "      ↳ ");
        }
    }
}

fn print_comment(comment: &Comment, indent: &str) {
    let edited = if comment.is_edited() { " (edited)" } else { "" };
    println!(
        "{}{} {} {}{}",
        indent,
        comment.id.short().cyan(),
        comment.author_name.bold(),
        comment
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .dimmed(),
        edited.dimmed()
    );

    let body_indent = " ".repeat(indent.chars().count() + 9);
    for line in comment.content.lines() {
        println!("{}{}", body_indent, line);
    }
}

fn edit_comment(
    workspace: &Workspace,
    post_id: PostId,
    raw_id: &str,
    content: String,
) -> Result<()> {
    let forum = workspace.open()?;
    let post = forum.engine.get_post(post_id)?;
    let comment_id = resolve_comment_id(&post, raw_id)?;

    let comment = forum.engine.update_comment(post_id, &comment_id, content)?;
    println!(
        "{} Updated comment {} on post #{}",
        "✓".green(),
        comment.id.short().cyan(),
        post_id
    );
    Ok(())
}

fn delete_comment(workspace: &Workspace, post_id: PostId, raw_id: &str, yes: bool) -> Result<()> {
    let forum = workspace.open()?;
    let post = forum.engine.get_post(post_id)?;
    let comment_id = resolve_comment_id(&post, raw_id)?;

    let prompt = match post.find_top_level(&comment_id) {
        Some(top) if !top.replies.is_empty() => format!(
            "Delete comment {} and its {} replies?",
            comment_id.short(),
            top.replies.len()
        ),
        _ => format!("Delete comment {}?", comment_id.short()),
    };
    if !confirm(&prompt, yes)? {
        println!("Deletion cancelled.");
        return Ok(());
    }

    let removed = forum.engine.delete_comment(post_id, &comment_id)?;
    println!(
        "{} Deleted {} {} from post #{}",
        "✓".green(),
        removed,
        if removed == 1 { "comment" } else { "comments" },
        post_id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chattrix_core::engine::{ForumEngine, MemoryStorage};
    use chattrix_core::post::PostDraft;
    use chattrix_core::CategoryId;

    fn create_thread() -> (Post, Comment, Comment) {
        let engine = ForumEngine::open(MemoryStorage::new()).unwrap();
        let post = engine
            .create_post(PostDraft::new(CategoryId(1), "ann", "Ann", "Thread", "Body"))
            .unwrap();
        let top = engine
            .add_comment(post.id, CommentDraft::new("bo", "Bo", "top"))
            .unwrap();
        let reply = engine
            .add_comment(post.id, CommentDraft::new("ann", "Ann", "reply").reply_to(top.id.clone()))
            .unwrap();
        (engine.get_post(post.id).unwrap(), top, reply)
    }

    #[test]
    fn test_resolve_full_id() {
        let (post, top, _) = create_thread();
        let resolved = resolve_comment_id(&post, &top.id.to_string()).unwrap();
        assert_eq!(resolved, top.id);
    }

    #[test]
    fn test_resolve_prefix() {
        let (post, _, reply) = create_thread();
        let prefix = reply.id.to_string()[..8].to_string();
        let resolved = resolve_comment_id(&post, &prefix).unwrap();
        assert_eq!(resolved, reply.id);
    }

    #[test]
    fn test_resolve_unknown_prefix() {
        let (post, _, _) = create_thread();
        assert!(resolve_comment_id(&post, "zzzz").is_err());
        assert!(resolve_comment_id(&post, "  ").is_err());
    }
}
