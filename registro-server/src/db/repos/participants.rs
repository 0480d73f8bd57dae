//! PostgreSQL participant repository
//!
//! - create: plain INSERT, the UNIQUE(email) constraint decides conflicts
//! - list: single query, ordering done by the database

use async_trait::async_trait;
use sqlx::PgPool;

use super::{DbError, ParticipantStore};
use crate::models::{ListingFilter, NewParticipant, Participant, LISTING_CAP};

const COLUMNS: &str =
    "id, nombre, apellidos, email, twitter, ocupacion, avatar, acepto_terminos, created_at";

/// Participant repository backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgParticipantRepo {
    pool: PgPool,
}

impl PgParticipantRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantStore for PgParticipantRepo {
    async fn create(&self, new: NewParticipant) -> Result<Participant, DbError> {
        let fields = new.fields();
        let result = sqlx::query_as::<_, Participant>(&format!(
            r#"
            INSERT INTO participantes
                (nombre, apellidos, email, twitter, ocupacion, avatar, acepto_terminos)
            VALUES ($1, $2, $3, $4, $5, $6, TRUE)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&fields.name)
        .bind(&fields.surnames)
        .bind(&fields.email)
        .bind(&fields.social_handle)
        .bind(&fields.occupation)
        .bind(new.avatar().as_str())
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(participant) => Ok(participant),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(DbError::DuplicateEmail {
                    email: new.email().to_owned(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Participant, DbError> {
        sqlx::query_as::<_, Participant>(&format!(
            "SELECT {COLUMNS} FROM participantes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound {
            resource: "participant",
            id: id.to_string(),
        })
    }

    async fn list(&self, filter: &ListingFilter) -> Result<Vec<Participant>, DbError> {
        let rows = match filter {
            ListingFilter::All => {
                sqlx::query_as::<_, Participant>(&format!(
                    r#"
                    SELECT {COLUMNS}
                    FROM participantes
                    ORDER BY apellidos ASC, nombre ASC
                    LIMIT $1
                    "#
                ))
                .bind(LISTING_CAP as i64)
                .fetch_all(&self.pool)
                .await?
            }
            // strpos keeps LIKE wildcards in the query literal
            ListingFilter::Search { query, first, rest } => {
                sqlx::query_as::<_, Participant>(&format!(
                    r#"
                    SELECT {COLUMNS}
                    FROM participantes
                    WHERE strpos(nombre, $1) > 0
                       OR strpos(apellidos, $1) > 0
                       OR ($3::text IS NOT NULL
                           AND strpos(nombre, $2) > 0
                           AND strpos(apellidos, $3) > 0)
                    ORDER BY apellidos ASC, nombre ASC
                    "#
                ))
                .bind(query)
                .bind(first)
                .bind(rest.as_deref())
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows)
    }
}
