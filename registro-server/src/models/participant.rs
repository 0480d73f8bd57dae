//! Participant record and its validated insert payload

use chrono::{DateTime, Utc};
use email_address::{EmailAddress, Options};
use serde::Serialize;
use sqlx::FromRow;

use super::form::{fields, RegistrationForm};
use super::{FieldErrors, TermsAccepted, ValidationError};

/// Participant record as stored and returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Participant {
    pub id: i64,
    #[serde(rename = "nombre")]
    #[sqlx(rename = "nombre")]
    pub name: String,
    #[serde(rename = "apellidos")]
    #[sqlx(rename = "apellidos")]
    pub surnames: String,
    pub email: String,
    #[serde(rename = "twitter")]
    #[sqlx(rename = "twitter")]
    pub social_handle: String,
    #[serde(rename = "ocupacion")]
    #[sqlx(rename = "ocupacion")]
    pub occupation: String,
    pub avatar: String,
    #[serde(rename = "aceptoTerminos")]
    #[sqlx(rename = "acepto_terminos")]
    pub terms_accepted: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

/// Text fields of a registration that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantFields {
    pub name: String,
    pub surnames: String,
    pub email: String,
    pub social_handle: String,
    pub occupation: String,
}

impl ParticipantFields {
    /// Validate the text fields of a submission.
    ///
    /// # Rules
    /// - `nombre`, `apellidos`, `twitter`, `ocupacion`: required, non-empty
    ///   after trimming whitespace
    /// - `email`: required, valid address
    ///
    /// Every violation is reported, not just the first one.
    pub fn validate(form: &RegistrationForm) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(fields::NAME, form.name.as_deref(), &mut errors);
        let surnames = required(fields::SURNAMES, form.surnames.as_deref(), &mut errors);
        let email = email(form.email.as_deref(), &mut errors);
        let social_handle =
            required(fields::SOCIAL_HANDLE, form.social_handle.as_deref(), &mut errors);
        let occupation = required(fields::OCCUPATION, form.occupation.as_deref(), &mut errors);

        match (name, surnames, email, social_handle, occupation) {
            (Some(name), Some(surnames), Some(email), Some(social_handle), Some(occupation)) => {
                Ok(Self {
                    name,
                    surnames,
                    email,
                    social_handle,
                    occupation,
                })
            }
            _ => Err(errors),
        }
    }
}

fn required(field: &'static str, value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Some(v.to_owned()),
        _ => {
            errors.push(ValidationError::Empty { field });
            None
        }
    }
}

/// Bare `local@domain.tld` only. Display names, domain literals and dotless
/// hosts are refused.
fn email_options() -> Options {
    Options::default()
        .without_display_text()
        .without_domain_literal()
        .with_required_tld()
}

fn email(value: Option<&str>, errors: &mut FieldErrors) -> Option<String> {
    let value = required(fields::EMAIL, value, errors)?;
    match EmailAddress::parse_with_options(&value, email_options()) {
        Ok(address) if !address.local_part().starts_with('"') => Some(address.email()),
        _ => {
            errors.push(ValidationError::InvalidFormat {
                field: fields::EMAIL,
                reason: "must be a valid email address",
            });
            None
        }
    }
}

/// Non-empty path or URL of a participant's avatar image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarRef(String);

impl AvatarRef {
    /// Wrap an avatar path or URL. Blank input is rejected.
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: fields::AVATAR,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Path of an avatar this service wrote, always under the uploads prefix.
    pub(crate) fn stored(public_path: String) -> Self {
        Self(public_path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for AvatarRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Insert payload for a participant.
///
/// Only obtainable from validated fields, a resolved avatar and proof of
/// accepted terms; the stored record always has `aceptoTerminos = true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
    fields: ParticipantFields,
    avatar: AvatarRef,
}

impl NewParticipant {
    pub fn new(fields: ParticipantFields, avatar: AvatarRef, _terms: TermsAccepted) -> Self {
        Self { fields, avatar }
    }

    pub fn fields(&self) -> &ParticipantFields {
        &self.fields
    }

    pub fn email(&self) -> &str {
        &self.fields.email
    }

    pub fn avatar(&self) -> &AvatarRef {
        &self.avatar
    }

    /// Build the stored record once the store has assigned identity.
    pub fn into_participant(self, id: i64, created_at: DateTime<Utc>) -> Participant {
        let ParticipantFields {
            name,
            surnames,
            email,
            social_handle,
            occupation,
        } = self.fields;

        Participant {
            id,
            name,
            surnames,
            email,
            social_handle,
            occupation,
            avatar: self.avatar.0,
            terms_accepted: true,
            created_at,
        }
    }
}
