//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod consent;
pub mod form;
pub mod listing;
pub mod participant;
pub mod validation;

pub use consent::{Consent, ConsentInput, TermsAccepted};
pub use form::RegistrationForm;
pub use listing::{ListingFilter, LISTING_CAP};
pub use participant::{AvatarRef, NewParticipant, Participant, ParticipantFields};
pub use validation::{FieldErrors, ValidationError};
