//! Database layer - connection pool, schema, and participant stores
//!
//! # Design Principles
//!
//! - Connection pool with explicit limits - no Arc<Mutex<Connection>>
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Handlers talk to a `ParticipantStore`, never to the pool directly

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{create_pool, create_pool_with_options, DEFAULT_MAX_CONNECTIONS};
pub use repos::*;
