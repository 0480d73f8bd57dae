//! Participant stores
//!
//! [`ParticipantStore`] is the seam between the HTTP layer and persistence:
//! - [`PgParticipantRepo`] for PostgreSQL
//! - [`MemoryParticipantStore`] for tests and `--in-memory` runs

pub mod memory;
pub mod participants;

pub use memory::MemoryParticipantStore;
pub use participants::PgParticipantRepo;

use async_trait::async_trait;

use crate::models::{ListingFilter, NewParticipant, Participant};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("email already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistence operations the registration API needs
#[async_trait]
pub trait ParticipantStore: Send + Sync {
    /// Insert a participant. Fails with [`DbError::DuplicateEmail`] when the
    /// email is already taken; the check is atomic with the insert.
    async fn create(&self, new: NewParticipant) -> Result<Participant, DbError>;

    /// Fetch one participant, or [`DbError::NotFound`].
    async fn find_by_id(&self, id: i64) -> Result<Participant, DbError>;

    /// List participants ordered by surname, then name.
    async fn list(&self, filter: &ListingFilter) -> Result<Vec<Participant>, DbError>;
}
