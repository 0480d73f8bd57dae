//! Route handlers organized by resource

pub mod health;
pub mod participants;
pub mod registration;
pub mod uploads;
