//! Content validation for posts and comments

use crate::config::LimitsConfig;
use crate::error::{ForumError, Result};

/// Validator for user-supplied text
#[derive(Debug, Clone)]
pub struct ContentValidator {
    limits: LimitsConfig,
}

impl ContentValidator {
    /// Create a new validator with default limits
    pub fn new() -> Self {
        Self {
            limits: LimitsConfig::default(),
        }
    }

    /// Create a validator from configured limits
    pub fn with_limits(limits: LimitsConfig) -> Self {
        Self { limits }
    }

    /// Limits in effect
    pub fn limits(&self) -> &LimitsConfig {
        &self.limits
    }

    /// Validate a post title
    pub fn validate_title(&self, title: &str) -> Result<()> {
        check_text("Post title", title, self.limits.max_title_length)
    }

    /// Validate a post body
    pub fn validate_content(&self, content: &str) -> Result<()> {
        check_text("Post content", content, self.limits.max_content_length)
    }

    /// Validate comment content
    pub fn validate_comment(&self, content: &str) -> Result<()> {
        check_text("Comment content", content, self.limits.max_comment_length)
    }

    /// Normalize a tag list: trimmed, blanks dropped, duplicates removed
    /// (first occurrence wins). Fails when more than `max_tags` remain.
    pub fn normalize_tags<I, S>(&self, tags: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if tag.is_empty() || normalized.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
                continue;
            }
            normalized.push(tag.to_string());
        }

        if normalized.len() > self.limits.max_tags {
            return Err(ForumError::Validation(format!(
                "A post can have at most {} tags",
                self.limits.max_tags
            )));
        }

        Ok(normalized)
    }
}

impl Default for ContentValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a comma separated tag string
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn check_text(field: &str, value: &str, max_length: usize) -> Result<()> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ForumError::Validation(format!("{} cannot be empty", field)));
    }

    if trimmed.chars().count() > max_length {
        return Err(ForumError::Validation(format!(
            "{} exceeds maximum length of {} characters",
            field, max_length
        )));
    }

    Ok(())
}
