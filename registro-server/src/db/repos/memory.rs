//! In-memory participant store

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::{DbError, ParticipantStore};
use crate::models::listing::listing_order;
use crate::models::{ListingFilter, NewParticipant, Participant};

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    records: BTreeMap<i64, Participant>,
}

/// Participant store kept in process memory.
///
/// The email check and the insert happen under one lock, matching the
/// uniqueness guarantee of the database constraint.
#[derive(Debug, Default)]
pub struct MemoryParticipantStore {
    inner: Mutex<Inner>,
}

impl MemoryParticipantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored participants.
    pub fn len(&self) -> Result<usize, DbError> {
        self.lock().map(|inner| inner.records.len())
    }

    pub fn is_empty(&self) -> Result<bool, DbError> {
        self.len().map(|n| n == 0)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Inner>, DbError> {
        self.inner
            .lock()
            .map_err(|_| DbError::Unavailable("participant store lock poisoned".into()))
    }
}

#[async_trait]
impl ParticipantStore for MemoryParticipantStore {
    async fn create(&self, new: NewParticipant) -> Result<Participant, DbError> {
        let mut inner = self.lock()?;

        if inner.records.values().any(|p| p.email == new.email()) {
            return Err(DbError::DuplicateEmail {
                email: new.email().to_owned(),
            });
        }

        inner.next_id += 1;
        let participant = new.into_participant(inner.next_id, Utc::now());
        inner.records.insert(participant.id, participant.clone());
        Ok(participant)
    }

    async fn find_by_id(&self, id: i64) -> Result<Participant, DbError> {
        self.lock()?
            .records
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::NotFound {
                resource: "participant",
                id: id.to_string(),
            })
    }

    async fn list(&self, filter: &ListingFilter) -> Result<Vec<Participant>, DbError> {
        let mut selected: Vec<Participant> = self
            .lock()?
            .records
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();

        selected.sort_by(listing_order);
        if let Some(limit) = filter.limit() {
            selected.truncate(limit);
        }
        Ok(selected)
    }
}
