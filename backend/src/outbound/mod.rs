//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **osm_api**: reqwest-backed `OsmNodeSource` for the OpenStreetMap API
//! - **persistence**: PostgreSQL-backed `PosRepository` using Diesel ORM
//! - **memory**: mutex-guarded `PosRepository` for tests and dry runs
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod osm_api;
pub mod persistence;
