//! # aerotech-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `aerotech-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations)
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `aerotech-app` (for port traits) and `aerotech-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod actuator_state_repo;
mod device_repo;
pub mod error;
pub mod pool;
mod reading_repo;
mod targets_repo;
mod transition_log;

pub use actuator_state_repo::SqliteActuatorStateRepository;
pub use device_repo::SqliteDeviceRepository;
pub use error::StorageError;
pub use pool::{Config, Database};
pub use reading_repo::SqliteReadingRepository;
pub use targets_repo::SqliteTargetsRepository;
pub use transition_log::SqliteTransitionLog;
