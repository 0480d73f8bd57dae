//! registro-server: participant registration API
//!
//! Lists, fetches and creates participant records, optionally storing an
//! uploaded avatar image on disk next to the database record.

pub mod db;
pub mod http;
pub mod models;
pub mod registration;
pub mod storage;

pub use db::{DbError, MemoryParticipantStore, ParticipantStore, PgParticipantRepo};
pub use http::{build_router, run_server, ApiError, AppState, ServerConfig};
pub use registration::{Registrar, RegistrationError};
pub use storage::{AvatarStorage, UploadPolicy};
