//! Sample content for a fresh forum

use crate::post::PostDraft;
use crate::types::CategoryId;

/// Welcome posts written by `init --with-samples`, oldest first
pub fn sample_posts() -> Vec<PostDraft> {
    vec![
        PostDraft::new(
            CategoryId(1),
            "admin",
            "Admin",
            "Welcome to CHATTRIX!",
            "Welcome to our community forum! Please read the guidelines before posting. \
             Be respectful, stay on topic and help each other out.",
        )
        .tags(["announcement", "welcome"]),
        PostDraft::new(
            CategoryId(3),
            "john-doe",
            "John Doe",
            "React Best Practices 2025",
            "What are your favorite React patterns this year? I have been moving most \
             state into server components and keeping client components small.",
        )
        .tags(["react", "javascript", "frontend"]),
        PostDraft::new(
            CategoryId(3),
            "jane-smith",
            "Jane Smith",
            "Getting Started with TypeScript",
            "A beginner's guide to TypeScript: start with strict mode, type your \
             function boundaries and let inference handle the rest.",
        )
        .tags(["typescript", "tutorial"]),
    ]
}
