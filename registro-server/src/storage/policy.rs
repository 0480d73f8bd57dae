//! Upload acceptance rules

use super::{AvatarUpload, StorageError};

/// Largest accepted avatar, in bytes (5 MiB)
pub const MAX_AVATAR_BYTES: usize = 5 * 1024 * 1024;

/// Media types accepted for avatars
pub const ALLOWED_MEDIA_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Size ceiling and media type allow-list for avatar uploads
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub max_bytes: usize,
    pub allowed_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: MAX_AVATAR_BYTES,
            allowed_types: ALLOWED_MEDIA_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl UploadPolicy {
    /// Whether a declared media type is on the allow-list.
    ///
    /// Parameters (`; charset=...`) are ignored and the comparison is
    /// case-insensitive.
    pub fn allows_type(&self, content_type: &str) -> bool {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        self.allowed_types.iter().any(|t| *t == essence)
    }

    /// Check an upload before it is written anywhere.
    pub fn check(&self, upload: &AvatarUpload) -> Result<(), StorageError> {
        let content_type = upload.content_type.as_deref().unwrap_or("application/octet-stream");
        if !self.allows_type(content_type) {
            return Err(StorageError::UnsupportedMediaType {
                content_type: content_type.to_owned(),
            });
        }

        if upload.bytes.len() > self.max_bytes {
            return Err(StorageError::PayloadTooLarge {
                limit: self.max_bytes,
            });
        }

        Ok(())
    }
}
