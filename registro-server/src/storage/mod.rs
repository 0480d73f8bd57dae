//! Avatar storage - upload policy and disk persistence
//!
//! Uploaded avatars are checked against an [`UploadPolicy`] before anything
//! touches the disk, then written to a flat directory under a
//! collision-free name and exposed at `/uploads/<name>`.

pub mod disk;
pub mod naming;
pub mod policy;

pub use disk::{AvatarStorage, StoredAvatar, PUBLIC_PREFIX};
pub use naming::storage_name;
pub use policy::{UploadPolicy, ALLOWED_MEDIA_TYPES, MAX_AVATAR_BYTES};

/// A single file attachment as received in the `avatar` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarUpload {
    /// Client-supplied file name (untrusted)
    pub file_name: String,
    /// Declared media type, if the client sent one
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unsupported media type: {content_type}")]
    UnsupportedMediaType { content_type: String },

    #[error("file exceeds maximum size of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}
