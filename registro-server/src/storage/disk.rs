//! Disk-backed avatar store

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use super::{storage_name, AvatarUpload, StorageError, UploadPolicy};
use crate::models::AvatarRef;

/// URL prefix under which stored avatars are served
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Attempts at finding a free file name before giving up
const MAX_NAME_ATTEMPTS: usize = 8;

/// An avatar written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAvatar {
    pub file_name: String,
    pub path: PathBuf,
    /// Public path, e.g. `/uploads/1700000000000_me.png`
    pub public_path: AvatarRef,
}

/// Writes avatars into a single flat directory.
///
/// Cloning is cheap; clones share the uniqueness token so names stay
/// distinct across concurrent requests.
#[derive(Debug, Clone)]
pub struct AvatarStorage {
    root: PathBuf,
    policy: UploadPolicy,
    last_token: Arc<AtomicI64>,
}

impl AvatarStorage {
    /// Open (creating if needed) an upload directory with the default policy.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        Self::open_with_policy(root, UploadPolicy::default()).await
    }

    pub async fn open_with_policy(
        root: impl Into<PathBuf>,
        policy: UploadPolicy,
    ) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).await?;

        Ok(Self {
            root,
            policy,
            last_token: Arc::new(AtomicI64::new(0)),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Next uniqueness token: epoch milliseconds, strictly increasing.
    fn next_token(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .last_token
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or(now);
        now.max(prev + 1)
    }

    /// Check an upload against the policy and write it to disk.
    ///
    /// Nothing is written when the policy check fails.
    pub async fn store(&self, upload: &AvatarUpload) -> Result<StoredAvatar, StorageError> {
        self.policy.check(upload)?;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let file_name = storage_name(&upload.file_name, self.next_token());
            let path = self.root.join(&file_name);

            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            };

            if let Err(e) = write_all(&mut file, &upload.bytes).await {
                drop(file);
                let _ = fs::remove_file(&path).await;
                return Err(e.into());
            }

            tracing::debug!(path = %path.display(), bytes = upload.bytes.len(), "stored avatar");
            return Ok(StoredAvatar {
                public_path: AvatarRef::stored(format!("{}/{}", PUBLIC_PREFIX, file_name)),
                file_name,
                path,
            });
        }

        Err(StorageError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "could not find a free avatar file name",
        )))
    }

    /// Remove a previously stored avatar.
    pub async fn discard(&self, stored: &StoredAvatar) -> Result<(), StorageError> {
        fs::remove_file(&stored.path).await?;
        tracing::debug!(path = %stored.path.display(), "discarded avatar");
        Ok(())
    }
}

async fn write_all(file: &mut fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.sync_all().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MAX_AVATAR_BYTES;

    fn png(name: &str, len: usize) -> AvatarUpload {
        AvatarUpload {
            file_name: name.into(),
            content_type: Some("image/png".into()),
            bytes: vec![7; len],
        }
    }

    async fn file_count(dir: &Path) -> usize {
        let mut entries = fs::read_dir(dir).await.unwrap();
        let mut count = 0;
        while entries.next_entry().await.unwrap().is_some() {
            count += 1;
        }
        count
    }

    #[tokio::test]
    async fn creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("nested").join("uploads");
        let storage = AvatarStorage::open(&root).await.unwrap();
        assert!(storage.root().is_dir());
    }

    #[tokio::test]
    async fn stores_under_public_path() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = AvatarStorage::open(tmp.path()).await.unwrap();

        let stored = storage.store(&png("foo photo.png", 10 * 1024)).await.unwrap();

        assert!(stored.file_name.ends_with("_foo_photo.png"));
        assert_eq!(
            stored.public_path.as_str(),
            format!("/uploads/{}", stored.file_name)
        );
        let written = fs::read(&stored.path).await.unwrap();
        assert_eq!(written.len(), 10 * 1024);
    }

    #[tokio::test]
    async fn same_name_never_collides() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = AvatarStorage::open(tmp.path()).await.unwrap();

        let first = png("me.png", 4);
        let second = png("me.png", 4);
        let (a, b) = tokio::join!(storage.store(&first), storage.store(&second));

        assert_ne!(a.unwrap().file_name, b.unwrap().file_name);
        assert_eq!(file_count(tmp.path()).await, 2);
    }

    #[tokio::test]
    async fn rejected_upload_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = AvatarStorage::open(tmp.path()).await.unwrap();

        let too_big = png("big.png", MAX_AVATAR_BYTES + 1);
        assert!(matches!(
            storage.store(&too_big).await,
            Err(StorageError::PayloadTooLarge { .. })
        ));

        let mut svg = png("x.svg", 10);
        svg.content_type = Some("image/svg+xml".into());
        assert!(matches!(
            storage.store(&svg).await,
            Err(StorageError::UnsupportedMediaType { .. })
        ));

        assert_eq!(file_count(tmp.path()).await, 0);
    }

    #[tokio::test]
    async fn discard_removes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = AvatarStorage::open(tmp.path()).await.unwrap();

        let stored = storage.store(&png("a.png", 1)).await.unwrap();
        storage.discard(&stored).await.unwrap();
        assert!(!stored.path.exists());
    }

    #[test]
    fn tokens_are_strictly_increasing() {
        let storage = AvatarStorage {
            root: PathBuf::from("unused"),
            policy: UploadPolicy::default(),
            last_token: Arc::new(AtomicI64::new(0)),
        };

        let tokens: Vec<i64> = (0..100).map(|_| storage.next_token()).collect();
        assert!(tokens.windows(2).all(|w| w[0] < w[1]));
    }
}
