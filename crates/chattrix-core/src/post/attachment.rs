//! Post attachments

use serde::{Deserialize, Serialize};

/// A file attached to a post
///
/// Only the descriptor is stored with the post; the digest identifies the
/// content so the same upload can be recognised later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Original file name
    pub file_name: String,
    /// Content size in bytes
    pub size: u64,
    /// blake3 hex digest of the content
    pub digest: String,
}

impl Attachment {
    /// Describe an attachment from its content
    pub fn from_bytes(file_name: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            file_name: file_name.into(),
            size: bytes.len() as u64,
            digest: blake3::hash(bytes).to_hex().to_string(),
        }
    }

    /// Short digest for display
    pub fn short_digest(&self) -> &str {
        &self.digest[..self.digest.len().min(12)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes() {
        let attachment = Attachment::from_bytes("diagram.png", b"not really a png");
        assert_eq!(attachment.file_name, "diagram.png");
        assert_eq!(attachment.size, 16);
        assert_eq!(attachment.digest.len(), 64);
        assert_eq!(attachment.short_digest().len(), 12);
    }

    #[test]
    fn test_digest_stability() {
        let a = Attachment::from_bytes("a.txt", b"same content");
        let b = Attachment::from_bytes("b.txt", b"same content");
        let c = Attachment::from_bytes("a.txt", b"other content");
        assert_eq!(a.digest, b.digest);
        assert_ne!(a.digest, c.digest);
    }
}
