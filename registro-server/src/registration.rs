//! Registration workflow
//!
//! Turns a raw [`RegistrationForm`] into a stored [`Participant`]:
//!
//! 1. Upload policy check (nothing written yet)
//! 2. Field validation
//! 3. Avatar resolution: uploaded file or external URL
//! 4. Consent
//! 5. Avatar write
//! 6. Single create on the store
//!
//! Every rejection from steps 1-4 happens before storage or persistence is
//! touched. If the create fails, the avatar written in step 5 is removed.

use std::sync::Arc;

use crate::db::{DbError, ParticipantStore};
use crate::models::{
    AvatarRef, Consent, FieldErrors, NewParticipant, Participant, ParticipantFields,
    RegistrationForm,
};
use crate::storage::{AvatarStorage, StorageError, StoredAvatar};

/// Why a registration was refused
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("invalid registration fields: {0}")]
    InvalidFields(FieldErrors),

    #[error("an avatar file or URL is required")]
    MissingAvatar,

    #[error("terms must be accepted")]
    ConsentRequired,

    #[error("unsupported avatar media type: {content_type}")]
    UnsupportedMediaType { content_type: String },

    #[error("avatar exceeds maximum size of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("email already registered")]
    DuplicateEmail,

    #[error("avatar storage failed: {0}")]
    Storage(std::io::Error),

    #[error("persistence failed: {0}")]
    Persistence(DbError),
}

impl From<StorageError> for RegistrationError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::UnsupportedMediaType { content_type } => {
                Self::UnsupportedMediaType { content_type }
            }
            StorageError::PayloadTooLarge { limit } => Self::PayloadTooLarge { limit },
            StorageError::Io(e) => Self::Storage(e),
        }
    }
}

impl From<DbError> for RegistrationError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::DuplicateEmail { .. } => Self::DuplicateEmail,
            other => Self::Persistence(other),
        }
    }
}

/// Where the avatar of a submission comes from
enum AvatarSource<'a> {
    Upload(&'a crate::storage::AvatarUpload),
    External(AvatarRef),
}

/// Runs registrations against a store and an avatar directory
#[derive(Clone)]
pub struct Registrar {
    store: Arc<dyn ParticipantStore>,
    avatars: AvatarStorage,
}

impl Registrar {
    pub fn new(store: Arc<dyn ParticipantStore>, avatars: AvatarStorage) -> Self {
        Self { store, avatars }
    }

    /// Validate a submission and create the participant.
    pub async fn register(&self, form: RegistrationForm) -> Result<Participant, RegistrationError> {
        if let Some(upload) = &form.avatar_file {
            self.avatars.policy().check(upload)?;
        }

        let fields = ParticipantFields::validate(&form).map_err(RegistrationError::InvalidFields)?;
        let source = resolve_avatar(&form)?;

        let terms = Consent::parse(form.consent.as_ref())
            .accepted()
            .ok_or(RegistrationError::ConsentRequired)?;

        let (avatar, stored) = match source {
            AvatarSource::Upload(upload) => {
                let stored = self.avatars.store(upload).await?;
                (stored.public_path.clone(), Some(stored))
            }
            AvatarSource::External(avatar) => (avatar, None),
        };

        let new = NewParticipant::new(fields, avatar, terms);

        match self.store.create(new).await {
            Ok(participant) => {
                tracing::info!(
                    participant_id = participant.id,
                    avatar = %participant.avatar,
                    "participant registered"
                );
                Ok(participant)
            }
            Err(e) => {
                if let Some(stored) = stored {
                    self.discard_orphan(&stored).await;
                }
                Err(e.into())
            }
        }
    }

    async fn discard_orphan(&self, stored: &StoredAvatar) {
        if let Err(e) = self.avatars.discard(stored).await {
            tracing::warn!(
                path = %stored.path.display(),
                error = %e,
                "failed to remove avatar of rejected registration"
            );
        }
    }
}

fn resolve_avatar(form: &RegistrationForm) -> Result<AvatarSource<'_>, RegistrationError> {
    if let Some(upload) = &form.avatar_file {
        return Ok(AvatarSource::Upload(upload));
    }

    form.external_avatar()
        .and_then(|url| AvatarRef::new(url).ok())
        .map(AvatarSource::External)
        .ok_or(RegistrationError::MissingAvatar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryParticipantStore;
    use crate::models::{ConsentInput, ListingFilter};
    use crate::storage::{AvatarUpload, MAX_AVATAR_BYTES};
    use std::path::Path;

    struct Fixture {
        _tmp: tempfile::TempDir,
        store: Arc<MemoryParticipantStore>,
        registrar: Registrar,
    }

    async fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let store = Arc::new(MemoryParticipantStore::new());
        let avatars = AvatarStorage::open(tmp.path()).await.unwrap();
        let registrar = Registrar::new(store.clone(), avatars);
        Fixture {
            _tmp: tmp,
            store,
            registrar,
        }
    }

    fn form(email: &str) -> RegistrationForm {
        RegistrationForm {
            name: Some("Ada".into()),
            surnames: Some("Lovelace".into()),
            email: Some(email.into()),
            social_handle: Some("@ada".into()),
            occupation: Some("Mathematician".into()),
            avatar_url: Some("https://example.com/ada.png".into()),
            consent: Some(ConsentInput::Text("on".into())),
            ..Default::default()
        }
    }

    fn png(name: &str, len: usize) -> AvatarUpload {
        AvatarUpload {
            file_name: name.into(),
            content_type: Some("image/png".into()),
            bytes: vec![1; len],
        }
    }

    fn files_in(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn registers_with_external_url() {
        let fx = fixture().await;
        let p = fx.registrar.register(form("ada@example.com")).await.unwrap();

        assert_eq!(p.avatar, "https://example.com/ada.png");
        assert!(p.terms_accepted);
        assert_eq!(fx.store.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn uploaded_file_wins_over_url() {
        let fx = fixture().await;
        let mut f = form("ada@example.com");
        f.avatar_file = Some(png("foo photo.png", 10 * 1024));

        let p = fx.registrar.register(f).await.unwrap();

        assert!(p.avatar.starts_with("/uploads/"));
        assert!(p.avatar.ends_with("_foo_photo.png"));
        assert_eq!(files_in(fx.registrar.avatars.root()), 1);
    }

    #[tokio::test]
    async fn missing_avatar() {
        let fx = fixture().await;
        let mut f = form("ada@example.com");
        f.avatar_url = Some("   ".into());

        let err = fx.registrar.register(f).await.unwrap_err();
        assert!(matches!(err, RegistrationError::MissingAvatar));
        assert!(fx.store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn consent_required_even_with_valid_fields() {
        let fx = fixture().await;
        for consent in [None, Some(ConsentInput::Text("off".into())), Some(ConsentInput::Bool(false))] {
            let mut f = form("ada@example.com");
            f.consent = consent;
            let err = fx.registrar.register(f).await.unwrap_err();
            assert!(matches!(err, RegistrationError::ConsentRequired));
        }
        assert!(fx.store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn invalid_fields_checked_before_upload() {
        let fx = fixture().await;
        let mut f = form("broken");
        f.name = None;
        f.avatar_file = Some(png("a.png", 10));

        match fx.registrar.register(f).await.unwrap_err() {
            RegistrationError::InvalidFields(errors) => {
                assert!(errors.contains("nombre"));
                assert!(errors.contains("email"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(files_in(fx.registrar.avatars.root()), 0);
        assert!(fx.store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn oversize_or_wrong_type_writes_nothing() {
        let fx = fixture().await;

        let mut f = form("ada@example.com");
        f.avatar_file = Some(png("big.png", MAX_AVATAR_BYTES + 1));
        assert!(matches!(
            fx.registrar.register(f).await.unwrap_err(),
            RegistrationError::PayloadTooLarge { .. }
        ));

        let mut f = form("ada@example.com");
        let mut pdf = png("doc.pdf", 10);
        pdf.content_type = Some("application/pdf".into());
        f.avatar_file = Some(pdf);
        assert!(matches!(
            fx.registrar.register(f).await.unwrap_err(),
            RegistrationError::UnsupportedMediaType { .. }
        ));

        assert_eq!(files_in(fx.registrar.avatars.root()), 0);
        assert!(fx.store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn duplicate_email_removes_uploaded_avatar() {
        let fx = fixture().await;
        fx.registrar.register(form("ada@example.com")).await.unwrap();

        let mut f = form("ada@example.com");
        f.avatar_file = Some(png("again.png", 10));
        let err = fx.registrar.register(f).await.unwrap_err();

        assert!(matches!(err, RegistrationError::DuplicateEmail));
        assert_eq!(files_in(fx.registrar.avatars.root()), 0);
        assert_eq!(
            fx.store.list(&ListingFilter::All).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn display_name_variant_of_registered_email_is_refused() {
        let fx = fixture().await;
        fx.registrar.register(form("ada@example.com")).await.unwrap();

        let err = fx
            .registrar
            .register(form("Ada <ada@example.com>"))
            .await
            .unwrap_err();

        match err {
            RegistrationError::InvalidFields(errors) => assert!(errors.contains("email")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fx.store.len().unwrap(), 1);
    }
}
