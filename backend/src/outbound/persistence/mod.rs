//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Provides the `PosRepository` implementation backed by PostgreSQL via
//! `diesel-async` and a `bb8` connection pool, plus the embedded schema
//! migrations it depends on.
//!
//! Row structs (`models.rs`) and table definitions (`schema.rs`) are internal
//! details and never reach the domain layer.
//!
//! # Example
//!
//! ```ignore
//! use campus_coffee_backend::outbound::persistence::{DbPool, DieselPosRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/campus_coffee")).await?;
//! let repo = DieselPosRepository::new(pool, Arc::new(DefaultClock));
//! ```

mod diesel_pos_repository;
mod migrations;
mod models;
mod pool;
mod pos_error_mapping;
mod schema;

pub use diesel_pos_repository::DieselPosRepository;
pub use migrations::run_pending_migrations;
pub use pool::{DbPool, PoolConfig, PoolError};
