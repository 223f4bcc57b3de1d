//! # medfleet-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `medfleet-app::ports::storage`
//! - Manage `SQLite` connection pool lifecycle
//! - Run database migrations (using sqlx embedded migrations), including
//!   the medication catalog seed
//! - Map between domain types and database rows
//!
//! ## Dependency rule
//! Depends on `medfleet-app` (for port traits) and `medfleet-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

pub mod drone_repo;
pub mod error;
pub mod medication_repo;
pub mod pool;
pub mod user_repo;

pub use drone_repo::SqliteDroneRepository;
pub use error::StorageError;
pub use medication_repo::SqliteMedicationRepository;
pub use pool::{Config, Database};
pub use user_repo::SqliteAppUserRepository;
